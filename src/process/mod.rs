// src/process/mod.rs
pub mod convert;
pub mod split;
pub mod strategy;
pub mod utils;

use std::{collections::HashSet, fmt, sync::Arc};
use thiserror::Error;
use tracing::trace;

use convert::{parse_value, Value};
use split::split_line;
use utils::clean_str;

/// Column names from line 1 of the file, in column order.
///
/// Built once per read and shared read-only by every row. Names are held as
/// `Arc<str>` so each record points at the header's names instead of copying
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    names: Vec<Arc<str>>,
    /// Index of the first name that repeats an earlier one. Any row long
    /// enough to reach it cannot be built into a record.
    first_duplicate: Option<usize>,
}

impl Header {
    /// Tokenize the header line and clean each name the same way string
    /// values are cleaned (trim, then strip one pair of quotes).
    pub fn parse(line: &str) -> Self {
        Self::from_names(split_line(line).into_iter().map(clean_str))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<Arc<str>> = names.into_iter().map(|n| Arc::from(n.as_ref())).collect();
        let mut seen = HashSet::with_capacity(names.len());
        let first_duplicate = names.iter().position(|n| !seen.insert(n.clone()));
        Self {
            names,
            first_duplicate,
        }
    }

    pub fn names(&self) -> &[Arc<str>] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One line of the data region, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based line number in the source file (the header is line 1).
    pub number: usize,
    /// Line content without its terminator.
    pub bytes: Vec<u8>,
}

impl RawLine {
    pub fn new(number: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            number,
            bytes: bytes.into(),
        }
    }
}

/// One row's name → value mapping, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(Arc<str>, Value)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_ref(), v))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Why a single row was dropped. Never fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("line {line}: not valid UTF-8")]
    InvalidUtf8 { line: usize },
    #[error("line {line}: field name '{name}' appears more than once in the header")]
    DuplicateField { line: usize, name: String },
}

impl RowError {
    pub fn line(&self) -> usize {
        match self {
            RowError::InvalidUtf8 { line } | RowError::DuplicateField { line, .. } => *line,
        }
    }
}

pub type RowResult = Result<Record, RowError>;

/// Decode and parse one raw line into a record.
pub fn process_line(header: &Header, line: &RawLine) -> RowResult {
    let text = std::str::from_utf8(&line.bytes)
        .map_err(|_| RowError::InvalidUtf8 { line: line.number })?;
    parse_row(header, line.number, text)
}

/// Tokenize `text`, pair token `i` with header name `i`, and coerce.
///
/// Tokens past the last header column are dropped before coercion; missing
/// trailing columns are simply absent from the record.
pub fn parse_row(header: &Header, number: usize, text: &str) -> RowResult {
    let mut tokens = split_line(text);
    tokens.truncate(header.len());

    if let Some(dup) = header.first_duplicate {
        if tokens.len() > dup {
            return Err(RowError::DuplicateField {
                line: number,
                name: header.names[dup].to_string(),
            });
        }
    }

    let fields = header
        .names
        .iter()
        .zip(tokens)
        .map(|(name, token)| (Arc::clone(name), parse_value(token)))
        .collect::<Vec<_>>();
    trace!(line = number, fields = fields.len(), "parsed row");

    Ok(Record { fields })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Header {
        Header::parse("id,name,score")
    }

    #[test]
    fn test_header_parse_cleans_names() {
        let h = Header::parse("\" id \", name ,\"a,b\"");
        let names: Vec<&str> = h.names().iter().map(|n| n.as_ref()).collect();
        assert_eq!(names, vec![" id ", "name", "a,b"]);
    }

    #[test]
    fn test_parse_row_full() {
        let rec = parse_row(&header(), 2, "1, \"Smith, John\" ,9.5").unwrap();
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.get("id"), Some(&Value::Integer(1)));
        assert_eq!(rec.get("name"), Some(&Value::String("Smith, John".into())));
        assert_eq!(rec.get("score"), Some(&Value::Float(9.5)));
        assert_eq!(rec.to_string(), "{id=1, name=Smith, John, score=9.5}");
    }

    #[test]
    fn test_parse_row_short_line_leaves_keys_absent() {
        let rec = parse_row(&header(), 2, "7,bob").unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get("score"), None);
    }

    #[test]
    fn test_parse_row_truncates_extra_tokens() {
        let rec = parse_row(&header(), 2, "1,a,2,extra,more").unwrap();
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.get("score"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_empty_line_gives_single_empty_field() {
        let rec = parse_row(&header(), 2, "").unwrap();
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("id"), Some(&Value::empty()));
    }

    #[test]
    fn test_duplicate_header_rejects_rows_reaching_it() {
        let h = Header::parse("a,b,a");
        let err = parse_row(&h, 3, "1,2,3").unwrap_err();
        assert_eq!(
            err,
            RowError::DuplicateField {
                line: 3,
                name: "a".into()
            }
        );
        // a short row never reaches the repeated name
        assert!(parse_row(&h, 4, "1,2").is_ok());
    }

    #[test]
    fn test_process_line_invalid_utf8() {
        let line = RawLine::new(5, vec![b'1', b',', 0xff, 0xfe]);
        let err = process_line(&header(), &line).unwrap_err();
        assert_eq!(err, RowError::InvalidUtf8 { line: 5 });
        assert_eq!(err.line(), 5);
    }

    #[test]
    fn test_process_line_ok() {
        let line = RawLine::new(2, "3,x,4");
        let rec = process_line(&header(), &line).unwrap();
        assert_eq!(rec.to_string(), "{id=3, name=x, score=4}");
    }
}

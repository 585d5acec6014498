// src/process/split.rs

/// Split one raw line into field tokens.
///
/// Without any `"` in the line every comma is a delimiter. Otherwise a comma
/// is a delimiter iff an even number of `"` follow it up to the end of the
/// line, so commas inside a quoted span stay part of the token. An unmatched
/// quote is not an error: the count still decides for every comma before it.
///
/// Tokens borrow from `line` and keep their quotes and surrounding whitespace;
/// cleaning is left to [`crate::process::convert::parse_value`].
pub fn split_line(line: &str) -> Vec<&str> {
    let total_quotes = line.bytes().filter(|&b| b == b'"').count();
    if total_quotes == 0 {
        return line.split(',').collect();
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut seen = 0;
    for (pos, b) in line.bytes().enumerate() {
        match b {
            b'"' => seen += 1,
            b',' if (total_quotes - seen) % 2 == 0 => {
                tokens.push(&line[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    tokens.push(&line[start..]);
    tokens
}

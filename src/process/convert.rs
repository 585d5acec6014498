use crate::process::utils::strip_quotes;
use std::fmt;

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i32),
    Float(f64),
    String(String),
}

impl Value {
    pub fn empty() -> Self {
        Value::String(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            // Debug keeps the `.0` on integral floats: 1.0 rather than 1
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => f.write_str(s),
        }
    }
}

/// Coerce one token into the most specific value.
///
/// Precedence, first match wins:
/// 1. absent token → empty string
/// 2. empty after trimming → empty string
/// 3. base-10 `i32` → [`Value::Integer`]
/// 4. decimal float literal → [`Value::Float`]
/// 5. anything else → [`Value::String`], with one pair of surrounding quotes
///    stripped when both are present
///
/// Numbers that overflow `i32` fall through to `Float`.
pub fn parse_value<'a>(token: impl Into<Option<&'a str>>) -> Value {
    let Some(raw) = token.into() else {
        return Value::empty();
    };
    let s = raw.trim();
    if s.is_empty() {
        return Value::empty();
    }
    if let Some(i) = parse_integer(s) {
        return Value::Integer(i);
    }
    if let Some(x) = parse_float(s) {
        return Value::Float(x);
    }
    Value::String(strip_quotes(s).to_string())
}

pub fn parse_integer(s: &str) -> Option<i32> {
    s.parse::<i32>().ok()
}

/// Decimal float literals only: digits, sign, point and exponent. Words that
/// `f64::from_str` would take (`nan`, `inf`, `infinity`) stay strings.
pub fn parse_float(s: &str) -> Option<f64> {
    let literal = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !literal || !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}

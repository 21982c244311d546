//! Lenient numeric fields. Currency columns arrive from the database as
//! numbers, numeric strings, or occasionally garbage; every read goes through
//! [`safe_parse_float`] so bad input counts as zero instead of failing.

use serde::{Deserialize, Serialize};

/// A decimal column as it was stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    /// Booleans, objects, arrays: kept as-is, read as 0.
    Other(serde_json::Value),
}

impl Numeric {
    /// Numeric value, with anything unparseable or non-finite read as 0.
    pub fn value(&self) -> f64 {
        match self {
            Numeric::Number(n) if n.is_finite() => *n,
            Numeric::Number(_) => 0.0,
            Numeric::Text(s) => safe_parse_float(s),
            Numeric::Missing | Numeric::Other(_) => 0.0,
        }
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Number(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Numeric::Text(value.to_string())
    }
}

/// Parse the longest leading decimal literal of `raw`, ignoring leading
/// whitespace and trailing junk (`"12.5 USD"` is 12.5). Returns 0 when no
/// digits lead the string or the result is not finite.
pub fn safe_parse_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let end = numeric_prefix_len(s);
    if end == 0 {
        return 0.0;
    }
    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut digits = int_end - i;
    i = int_end;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_end = digits_from(i + 1);
        let frac_digits = frac_end - (i + 1);
        if frac_digits > 0 {
            digits += frac_digits;
            i = frac_end;
        }
    }
    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}

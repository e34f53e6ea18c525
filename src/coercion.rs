use crate::schema::FieldValue;

/// Converts a cell to a number. Thousands separators and whitespace are
/// stripped from text before parsing; text with no leading numeric part is
/// `None`, as is a NaN number.
pub fn coerce(value: Option<&FieldValue>) -> Option<f64> {
    match value? {
        FieldValue::Integer(i) => Some(*i as f64),
        FieldValue::Number(n) if n.is_nan() => None,
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => parse_number(s),
        FieldValue::Null => None,
    }
}

/// Parses the leading numeric portion of `raw` after removing commas and all
/// whitespace, e.g. `" 1,234.5 "` is `1234.5` and `"12%"` is `12`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = strip_separators(raw);
    if cleaned.is_empty() {
        return None;
    }
    float_prefix(&cleaned)
}

/// Resolves a "Year" cell to an integer year.
///
/// Numbers are truncated, text that is itself a plain number ("2021.0") is
/// parsed as one, and any other text falls back to its digits ("FY2021").
/// Returns `None` when no year can be recovered, leaving the caller to keep
/// the original value.
pub fn coerce_year(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Integer(i) => Some(*i),
        FieldValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
        FieldValue::Number(_) => None,
        FieldValue::Text(s) => {
            let cleaned = strip_separators(s);
            match cleaned.parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n.trunc() as i64),
                // Numeric but out of range: not a year, and not a source of digits either.
                Ok(_) => None,
                Err(_) => {
                    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
                    digits.parse::<i64>().ok()
                }
            }
        }
        FieldValue::Null => None,
    }
}

fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect()
}

// Longest prefix of the form [+-]digits[.digits][e[+-]digits], or a signed "Infinity".
fn float_prefix(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            end = j;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse::<f64>().ok()
}

//! Lenient decoding of spreadsheet-style cells.
//!
//! Roster rows come from sheet exports where every column is optional and
//! any cell may be a string, a number, a boolean or null. These helpers
//! normalize cells to text and flags so a malformed row never fails to load.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Cell contents that mean "nothing here"
const EMPTY_MARKERS: [&str; 4] = ["", "nan", "none", "n/a"];

/// Cell contents that mean "yes" for boolean-like columns
const TRUTHY_MARKERS: [&str; 6] = ["done", "yes", "y", "true", "1", "checked-in"];

/// Normalize a raw text cell: trim, map empty markers to "", strip a float suffix
pub fn clean(raw: &str) -> String {
    let text = raw.trim();
    if EMPTY_MARKERS.iter().any(|m| text.eq_ignore_ascii_case(m)) {
        return String::new();
    }
    match text.strip_suffix(".0") {
        Some(int_part) if !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit()) => {
            int_part.to_string()
        }
        _ => text.to_string(),
    }
}

/// Render any JSON cell as cleaned text
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => clean(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.is_nan() {
                    String::new()
                } else if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", f as i64)
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        other => clean(&other.to_string()),
    }
}

/// Check whether a text cell reads as "yes"
pub fn is_truthy(text: &str) -> bool {
    let lower = text.trim().to_ascii_lowercase();
    TRUTHY_MARKERS.contains(&lower.as_str())
}

pub fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| value_to_text(&v)).unwrap_or_default())
}

pub fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let text = de_text(deserializer)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

pub fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(other) => is_truthy(&value_to_text(&other)),
        None => false,
    })
}

/// Write an entry flag the way the sheet spells it
pub fn ser_entry_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "Done" } else { "N/A" })
}

/// Write a collected flag the way the sheet spells it
pub fn ser_yes_no<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "Yes" } else { "No" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_strips_float_suffix() {
        assert_eq!(clean("1001.0"), "1001");
        assert_eq!(clean(" 017123.0 "), "017123");
        assert_eq!(clean("Class 9.0"), "Class 9.0");
        assert_eq!(clean(".0"), ".0");
    }

    #[test]
    fn test_clean_empty_markers() {
        assert_eq!(clean("nan"), "");
        assert_eq!(clean("None"), "");
        assert_eq!(clean("N/A"), "");
        assert_eq!(clean("   "), "");
        assert_eq!(clean("Nancy"), "Nancy");
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!(1001)), "1001");
        assert_eq!(value_to_text(&json!(1001.0)), "1001");
        assert_eq!(value_to_text(&json!(12.5)), "12.5");
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&json!("  Bus 2 ")), "Bus 2");
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("Done"));
        assert!(is_truthy("YES"));
        assert!(is_truthy(" y "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("N/A"));
        assert!(!is_truthy("No"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("Pending"));
    }
}

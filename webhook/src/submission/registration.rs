//! Vehicle registration extraction and normalization.

use serde_json::{Number, Value};

/// Coerce the raw `registration` field to text.
///
/// Returns `None` when the field is missing or falsy (`null`, `false`, `0`,
/// `""`) or is not a scalar.
pub fn registration_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Whole floats drop their fraction, so `1.0` reads as `1`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Strip every whitespace character and upper-case the rest.
///
/// `" ab 12 cde "` becomes `"AB12CDE"`.
pub fn normalize_registration(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_registration() {
        assert_eq!(normalize_registration(" ab 12 cde "), "AB12CDE");
        assert_eq!(normalize_registration("AB12CDE"), "AB12CDE");
        assert_eq!(normalize_registration("ab\t12\ncde"), "AB12CDE");
        assert_eq!(normalize_registration("ab\u{00a0}12"), "AB12");
        assert_eq!(normalize_registration("   "), "");
    }

    #[test]
    fn test_registration_text_scalars() {
        assert_eq!(registration_text(Some(&json!("ab12"))), Some("ab12".to_string()));
        assert_eq!(registration_text(Some(&json!(1234))), Some("1234".to_string()));
        assert_eq!(registration_text(Some(&json!(true))), Some("true".to_string()));
    }

    #[test]
    fn test_registration_text_floats() {
        assert_eq!(registration_text(Some(&json!(1.0))), Some("1".to_string()));
        assert_eq!(registration_text(Some(&json!(-42.0))), Some("-42".to_string()));
        assert_eq!(registration_text(Some(&json!(2.5))), Some("2.5".to_string()));
        assert_eq!(registration_text(Some(&json!(0.0))), None);
    }

    #[test]
    fn test_registration_text_falsy() {
        assert_eq!(registration_text(None), None);
        assert_eq!(registration_text(Some(&json!(null))), None);
        assert_eq!(registration_text(Some(&json!(""))), None);
        assert_eq!(registration_text(Some(&json!(false))), None);
        assert_eq!(registration_text(Some(&json!(0))), None);
    }

    #[test]
    fn test_registration_text_non_scalar() {
        assert_eq!(registration_text(Some(&json!(["AB12"]))), None);
        assert_eq!(registration_text(Some(&json!({"value": "AB12"}))), None);
    }
}

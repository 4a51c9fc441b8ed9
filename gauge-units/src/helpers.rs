//! Argument extraction shared by the unit functions

use gauge_core::{GaugeError, Value};

/// Extract a number. Numeric text is accepted so tool callers can pass raw
/// input; text that is not a number is reported as invalid input.
pub fn extract_number(value: &Value, func: &str, arg: &str) -> Result<f64, GaugeError> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Text(s) => match value.to_number() {
            Value::Number(n) => Ok(n),
            _ => Err(GaugeError::invalid_input(format!("{}() argument '{}': '{}' is not a number", func, arg, s))),
        },
        Value::Error(e) => Err(e.clone()),
        other => Err(GaugeError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a Text string from a Value
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, GaugeError> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        other => Err(GaugeError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract optional Text string
pub fn extract_optional_text(args: &[Value], index: usize) -> Option<&str> {
    args.get(index).and_then(Value::as_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_core::{codes, Severity};

    #[test]
    fn test_extract_number_accepts_numeric_text() {
        let v = Value::Text("2.5".to_string());
        assert_eq!(extract_number(&v, "convert", "value"), Ok(2.5));
    }

    #[test]
    fn test_extract_number_rejects_words() {
        let v = Value::Text("abc".to_string());
        let err = extract_number(&v, "convert", "value").unwrap_err();
        assert_eq!(err.code, codes::INVALID_INPUT);
        assert_eq!(err.severity, Severity::Warning);
        assert!(err.message.contains("'abc' is not a number"));
    }

    #[test]
    fn test_extract_number_rejects_other_types() {
        let err = extract_number(&Value::Bool(true), "convert", "value").unwrap_err();
        assert_eq!(err.code, codes::ARG_TYPE);
    }

    #[test]
    fn test_extract_text_passes_errors_through() {
        let v = Value::Error(GaugeError::unknown_unit("furlong", "length"));
        let err = extract_text(&v, "convert", "from_unit").unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_UNIT);
    }
}

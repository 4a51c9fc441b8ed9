//! Numeric input validation: validate_input, parse_input

use std::collections::HashMap;
use std::sync::OnceLock;
use gauge_plugin::prelude::*;
use regex::Regex;
use thiserror::Error;

/// Largest integer an IEEE double represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Smallest accepted value, symmetric with `MAX_SAFE_INTEGER`
pub const MIN_SAFE_INTEGER: f64 = -MAX_SAFE_INTEGER;

// ============ Compiled regex patterns ============

/// Optional minus, digits with an optional fraction, optional exponent
fn get_numeric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^-?\d*\.?\d+(?:[eE][-+]?\d+)?$").unwrap()
    })
}

/// Why a piece of input cannot be converted. Messages are shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a value")]
    Empty,

    #[error("Please enter a valid number")]
    NotANumber,

    #[error("Value is out of range")]
    OutOfRange,
}

/// Verdict for one piece of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<InputError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn invalid(error: InputError) -> Self {
        Self { is_valid: false, error: Some(error) }
    }

    /// Human-readable reason when invalid
    pub fn reason(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }
}

/// Check and parse raw input.
///
/// Blank input is `Empty`. Otherwise the untrimmed text must be a plain
/// numeric literal (`123`, `-1.5`, `.5`, `1.23e-4`) and lie within the
/// safe-integer range.
pub fn parse_input(input: &str) -> Result<f64, InputError> {
    if input.trim().is_empty() {
        return Err(InputError::Empty);
    }

    if !get_numeric_regex().is_match(input) {
        return Err(InputError::NotANumber);
    }

    let value: f64 = input.parse().map_err(|_| InputError::NotANumber)?;
    if value > MAX_SAFE_INTEGER || value < MIN_SAFE_INTEGER {
        return Err(InputError::OutOfRange);
    }

    Ok(value)
}

/// Validate raw input. Never fails; problems are reported in the result.
pub fn validate_input(input: &str) -> ValidationResult {
    match parse_input(input) {
        Ok(_) => ValidationResult::valid(),
        Err(e) => ValidationResult::invalid(e),
    }
}

// ============ ValidateInput ============

pub struct ValidateInput;

static VALIDATE_INPUT_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("input", "Text", "Raw text typed by the user"),
];

static VALIDATE_INPUT_EXAMPLES: [&str; 4] = [
    "validate_input(\"123.45\") → {is_valid: true}",
    "validate_input(\"1.23e-4\") → {is_valid: true}",
    "validate_input(\"   \") → {is_valid: false, error: \"Please enter a value\"}",
    "validate_input(\"123abc\") → {is_valid: false, error: \"Please enter a valid number\"}",
];

static VALIDATE_INPUT_RELATED: [&str; 2] = ["convert", "format_result"];

impl FunctionPlugin for ValidateInput {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "validate_input",
            description: "Check whether text is an acceptable number to convert",
            usage: "validate_input(input)",
            args: &VALIDATE_INPUT_ARGS,
            returns: "Object {is_valid: Bool, error?: Text}",
            examples: &VALIDATE_INPUT_EXAMPLES,
            category: "text/validate",
            related: &VALIDATE_INPUT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.is_empty() {
            return Value::Error(GaugeError::arg_count("validate_input", 1, 0));
        }

        // Null reads as empty input; numbers are checked in their display form
        let input = match &args[0] {
            Value::Text(s) => s.clone(),
            Value::Null => String::new(),
            Value::Number(n) => n.to_string(),
            Value::Error(e) => return Value::Error(e.clone()),
            other => return Value::Error(GaugeError::arg_type("validate_input", "input", "Text", other.type_name())),
        };

        let result = validate_input(&input);
        let mut obj = HashMap::new();
        obj.insert("is_valid".to_string(), Value::Bool(result.is_valid));
        if let Some(reason) = result.reason() {
            obj.insert("error".to_string(), Value::Text(reason));
        }
        Value::Object(obj)
    }
}

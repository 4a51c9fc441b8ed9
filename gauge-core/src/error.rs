//! Structured errors for tool and plugin consumers
//!
//! Errors never crash the converter. They are values that propagate through
//! plugin calls and carry a machine-readable code plus a hint for the caller.

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const UNDEFINED_FIELD: &str = "UNDEFINED_FIELD";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Conversion continued with degraded result
    Warning,
    /// Conversion failed for this request
    Error,
    /// The converter cannot continue
    Fatal,
}

/// Structured error value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Severity level
    pub severity: Severity,
}

impl GaugeError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Enter a plain decimal number such as 12.5 or 1.2e-3")
    }

    /// User input rejected by the validator. The message is the validator's reason.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::new(codes::INVALID_INPUT, reason)
            .with_severity(Severity::Warning)
    }

    pub fn unknown_unit(unit: &str, category: &str) -> Self {
        Self::new(codes::UNKNOWN_UNIT, format!("Unknown {} unit: {}", category, unit))
            .with_suggestion(format!("Use list_units('{}') to see valid unit ids", category))
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use help() to list available functions")
    }

    pub fn undefined_field(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FIELD, format!("Undefined field: {}", name))
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(codes::TYPE_ERROR, format!("Expected {}, got {}", expected, got))
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for GaugeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for GaugeError {}

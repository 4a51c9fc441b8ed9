//! Gauge Text - what goes in and what comes out
//!
//! - `validate_input`: decide whether typed text is a convertible number
//! - `format_result`: render a converted number for display

mod validate;
mod format;

pub use validate::{
    parse_input, validate_input, InputError, ValidationResult,
    MAX_SAFE_INTEGER, MIN_SAFE_INTEGER,
};
pub use format::format_result;

use gauge_plugin::PluginRegistry;

/// Load text functions into registry
pub fn load_text_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        .with_function(validate::ValidateInput)
        .with_function(format::FormatResult)
}

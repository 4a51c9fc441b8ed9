//! Gauge Core - Fundamental types
//!
//! This crate provides the core types used throughout Gauge:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `GaugeError`: Structured errors carried as values

mod value;
mod error;

pub use value::Value;
pub use error::{GaugeError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, GaugeError, Severity};
    pub use crate::error::codes;
}

//! Gauge Plugin System
//!
//! Provides the `FunctionPlugin` trait used to expose conversion,
//! validation and formatting as named, self-describing functions.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, DEFAULT_DECIMALS};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use gauge_core::prelude::*;
}

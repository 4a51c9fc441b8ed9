//! Evaluation Context

use crate::PluginRegistry;
use std::sync::Arc;

/// Decimal places used when rendering converted values
pub const DEFAULT_DECIMALS: usize = 6;

/// Evaluation context passed to plugins
pub struct EvalContext {
    pub decimals: usize,
    pub registry: Arc<PluginRegistry>,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            registry,
        }
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }
}

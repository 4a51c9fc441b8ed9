//! Gauge - Unit Converter
//!
//! Ties the libraries together: a plugin registry with the unit and text
//! functions, per-category converter forms, and the session that hosts them.

mod config;
mod form;
mod session;

pub use config::{Config, ConfigError, StoreKind, ENV_DATA_PATH, ENV_DECIMALS, ENV_STORE};
pub use form::{ConverterForm, FormState};
pub use session::ConverterSession;

pub use gauge_core::{GaugeError, Value};
pub use gauge_prefs::{PreferenceStore, Preferences};
pub use gauge_units::{Category, CATEGORIES};

use gauge_plugin::{EvalContext, PluginRegistry, DEFAULT_DECIMALS};
use std::sync::Arc;

/// Registry with every built-in function loaded
pub fn standard_registry() -> PluginRegistry {
    let registry = PluginRegistry::new();
    let registry = gauge_units::load_units_library(registry);
    gauge_text::load_text_library(registry)
}

/// Main Gauge engine
pub struct Gauge {
    registry: Arc<PluginRegistry>,
    decimals: usize,
}

impl Gauge {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            decimals: DEFAULT_DECIMALS,
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(standard_registry())
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    /// Call a registered function by name
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        let ctx = EvalContext::new(self.registry.clone()).with_decimals(self.decimals);
        self.registry.call_function(name, args, &ctx)
    }

    /// Start a converter session backed by `store`
    pub fn session(&self, store: Arc<dyn PreferenceStore>) -> ConverterSession {
        ConverterSession::with_decimals(store, self.decimals)
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_prefs::MemoryStore;

    #[test]
    fn test_standard_registry_functions() {
        let names = standard_registry().function_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        for name in ["convert", "convert_temperature", "list_units", "list_categories", "validate_input", "format_result"] {
            assert!(names.iter().any(|n| n == name), "missing {}", name);
        }
    }

    #[test]
    fn test_call_convert() {
        let gauge = Gauge::default();
        let result = gauge.call("convert", &[
            Value::from(5.0),
            Value::from("meter"),
            Value::from("centimeter"),
            Value::from("length"),
        ]);
        assert_eq!(result.as_number(), Some(500.0));
    }

    #[test]
    fn test_call_unknown_function() {
        let gauge = Gauge::default();
        let result = gauge.call("convrt", &[]);
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some("UNDEFINED_FUNC"));
    }

    #[test]
    fn test_format_uses_engine_decimals() {
        let gauge = Gauge::default().with_decimals(2);
        let result = gauge.call("format_result", &[Value::from(3.28084)]);
        assert_eq!(result.as_text(), Some("3.28"));
    }

    #[test]
    fn test_session_uses_engine_decimals() {
        let gauge = Gauge::default().with_decimals(1);
        let mut session = gauge.session(Arc::new(MemoryStore::new()));
        let form = session.active_form_mut();
        form.set_to_unit("foot").unwrap();
        form.set_from_value("1");
        assert_eq!(form.to_value(), "3.3");
    }

    #[test]
    fn test_help_lists_functions() {
        let gauge = Gauge::default();
        assert!(!gauge.help(None).is_error());
        assert!(gauge.help(Some("convert")).as_object().is_some());
    }
}

//! Gauge Units - Unit registry and conversion
//!
//! Four fixed categories:
//! - Length (meter base: km, cm, mm, in, ft, yd, mi)
//! - Weight (kilogram base: g, mg, lb, oz, t, st)
//! - Temperature (Celsius, Fahrenheit, Kelvin; formula-based)
//! - Volume (liter base: mL, m³, gal, qt, pt, cup, fl oz)
//!
//! Linear categories convert by factor relative to the base unit.
//! Temperature converts through Celsius.

mod category;
mod unit;
mod units;
mod temperature;
mod convert;
mod helpers;

pub use category::{Category, CategoryError, CATEGORIES};
pub use unit::{Unit, UnitSet, ConversionError};
pub use units::{units_for_category, LENGTH_UNITS, WEIGHT_UNITS, TEMPERATURE_UNITS, VOLUME_UNITS};
pub use temperature::{convert_temperature, TemperatureUnit};
pub use convert::{convert_value, convert_with_factor};

use gauge_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversion
        .with_function(convert::Convert)
        .with_function(convert::ConvertTemperature)

        // Inspection
        .with_function(convert::ListUnits)
        .with_function(convert::ListCategories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_units_library() {
        let registry = load_units_library(PluginRegistry::new());

        assert!(registry.get_function("convert").is_some());
        assert!(registry.get_function("convert_temperature").is_some());
        assert!(registry.get_function("list_units").is_some());
        assert!(registry.get_function("list_categories").is_some());
    }
}

//! Temperature conversion
//!
//! Temperature scales are affine, not proportional, so every conversion
//! goes through Celsius: source -> Celsius -> target.

const KELVIN_OFFSET: f64 = 273.15;
const FAHRENHEIT_OFFSET: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "celsius" => Some(TemperatureUnit::Celsius),
            "fahrenheit" => Some(TemperatureUnit::Fahrenheit),
            "kelvin" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }

    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - FAHRENHEIT_OFFSET) * (5.0 / 9.0),
            TemperatureUnit::Kelvin => value - KELVIN_OFFSET,
        }
    }

    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * (9.0 / 5.0) + FAHRENHEIT_OFFSET,
            TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
        }
    }
}

/// Convert a temperature between unit ids.
///
/// An unrecognized source or target id is read as Celsius.
pub fn convert_temperature(value: f64, from_unit: &str, to_unit: &str) -> f64 {
    if from_unit == to_unit {
        return value;
    }
    let from = resolve(from_unit);
    let to = resolve(to_unit);
    to.from_celsius(from.to_celsius(value))
}

fn resolve(id: &str) -> TemperatureUnit {
    TemperatureUnit::from_id(id).unwrap_or_else(|| {
        tracing::debug!(unit = id, "unknown temperature unit, reading as celsius");
        TemperatureUnit::Celsius
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(convert_temperature(100.0, "celsius", "fahrenheit"), 212.0);
    }

    #[test]
    fn test_fahrenheit_to_celsius() {
        assert_eq!(convert_temperature(32.0, "fahrenheit", "celsius"), 0.0);
    }

    #[test]
    fn test_celsius_to_kelvin() {
        assert_eq!(convert_temperature(0.0, "celsius", "kelvin"), 273.15);
    }

    #[test]
    fn test_kelvin_to_celsius() {
        assert_eq!(convert_temperature(273.15, "kelvin", "celsius"), 0.0);
    }

    #[test]
    fn test_fahrenheit_to_kelvin() {
        assert_eq!(convert_temperature(32.0, "fahrenheit", "kelvin"), 273.15);
    }

    #[test]
    fn test_kelvin_to_fahrenheit() {
        assert_eq!(convert_temperature(273.15, "kelvin", "fahrenheit"), 32.0);
    }

    #[test]
    fn test_minus_forty_is_shared() {
        assert_relative_eq!(convert_temperature(-40.0, "celsius", "fahrenheit"), -40.0, epsilon = 1e-12);
        assert_relative_eq!(convert_temperature(-40.0, "fahrenheit", "celsius"), -40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_celsius_fahrenheit_round_trip() {
        for v in [-273.15, -40.0, 0.0, 36.6, 100.0, 1.0e6] {
            let f = convert_temperature(v, "celsius", "fahrenheit");
            let back = convert_temperature(f, "fahrenheit", "celsius");
            assert_relative_eq!(back, v, max_relative = 1e-9, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_same_unit_is_identity() {
        for unit in ["celsius", "fahrenheit", "kelvin"] {
            assert_eq!(convert_temperature(98.6, unit, unit), 98.6);
        }
    }

    #[test]
    fn test_unknown_units_read_as_celsius() {
        assert_eq!(convert_temperature(25.0, "rankine", "kelvin"), 25.0 + 273.15);
        assert_eq!(convert_temperature(300.0, "kelvin", "rankine"), 300.0 - 273.15);
        assert_eq!(convert_temperature(12.5, "rankine", "reaumur"), 12.5);
    }

    #[test]
    fn test_unit_scales() {
        assert_eq!(TemperatureUnit::from_id("kelvin").map(|k| k.to_celsius(0.0)), Some(-273.15));
        assert_eq!(TemperatureUnit::Fahrenheit.from_celsius(100.0), 212.0);
        assert_eq!(TemperatureUnit::from_id("rankine"), None);
    }
}

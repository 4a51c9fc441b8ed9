//! Unit conversion: pure functions and their plugin wrappers

use std::collections::HashMap;
use gauge_plugin::prelude::*;
use crate::helpers::{extract_number, extract_optional_text, extract_text};
use crate::temperature::convert_temperature;
use crate::unit::{ConversionError, UnitSet};
use crate::units::units_for_category;
use crate::{Category, CATEGORIES};

/// Convert `value` between two units of one category.
///
/// Linear categories multiply by the source factor and divide by the target
/// factor. Temperature goes through Celsius. An unrecognized category id
/// returns `value` unchanged; an unknown unit in a linear category is an
/// error.
pub fn convert_value(value: f64, from_unit: &str, to_unit: &str, category: &str) -> Result<f64, ConversionError> {
    match category.parse::<Category>() {
        Ok(Category::Temperature) => Ok(convert_temperature(value, from_unit, to_unit)),
        Ok(cat) => convert_with_factor(value, from_unit, to_unit, &cat.units()),
        Err(_) => {
            tracing::debug!(category, "unknown category, returning value unchanged");
            Ok(value)
        }
    }
}

/// Factor-based conversion within any unit set
pub fn convert_with_factor(value: f64, from_unit: &str, to_unit: &str, units: &UnitSet) -> Result<f64, ConversionError> {
    let from_factor = units.factor(from_unit)?;
    let to_factor = units.factor(to_unit)?;
    if from_unit == to_unit {
        return Ok(value);
    }
    Ok((value * from_factor) / to_factor)
}

fn unit_to_value(unit: &crate::Unit) -> Value {
    let mut obj = HashMap::new();
    obj.insert("id".to_string(), Value::Text(unit.id.to_string()));
    obj.insert("name".to_string(), Value::Text(unit.name.to_string()));
    if let Some(factor) = unit.factor {
        obj.insert("factor".to_string(), Value::Number(factor));
    }
    Value::Object(obj)
}

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("value", "Number", "Value to convert"),
    ArgMeta::required("from_unit", "Text", "Source unit id (e.g., \"meter\")"),
    ArgMeta::required("to_unit", "Text", "Target unit id (e.g., \"centimeter\")"),
    ArgMeta::required("category", "Text", "Category: \"length\", \"weight\", \"temperature\" or \"volume\""),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(5, \"meter\", \"centimeter\", \"length\") → 500",
    "convert(1, \"kilogram\", \"gram\", \"weight\") → 1000",
    "convert(100, \"celsius\", \"fahrenheit\", \"temperature\") → 212",
];

static CONVERT_RELATED: [&str; 3] = ["convert_temperature", "list_units", "validate_input"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert a value from one unit to another within a category",
            usage: "convert(value, from_unit, to_unit, category)",
            args: &CONVERT_ARGS,
            returns: "Number",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() < 4 {
            return Value::Error(GaugeError::arg_count("convert", 4, args.len()));
        }

        let value = match extract_number(&args[0], "convert", "value") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let from_unit = match extract_text(&args[1], "convert", "from_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let to_unit = match extract_text(&args[2], "convert", "to_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let category = match extract_text(&args[3], "convert", "category") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match convert_value(value, from_unit, to_unit, category) {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e.into()),
        }
    }
}

// ============ convert_temperature ============

pub struct ConvertTemperature;

static CONVERT_TEMPERATURE_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("value", "Number", "Temperature to convert"),
    ArgMeta::required("from_unit", "Text", "\"celsius\", \"fahrenheit\" or \"kelvin\""),
    ArgMeta::required("to_unit", "Text", "\"celsius\", \"fahrenheit\" or \"kelvin\""),
];

static CONVERT_TEMPERATURE_EXAMPLES: [&str; 3] = [
    "convert_temperature(32, \"fahrenheit\", \"celsius\") → 0",
    "convert_temperature(0, \"celsius\", \"kelvin\") → 273.15",
    "convert_temperature(273.15, \"kelvin\", \"fahrenheit\") → 32",
];

static CONVERT_TEMPERATURE_RELATED: [&str; 1] = ["convert"];

impl FunctionPlugin for ConvertTemperature {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert_temperature",
            description: "Convert a temperature; unrecognized unit ids are read as Celsius",
            usage: "convert_temperature(value, from_unit, to_unit)",
            args: &CONVERT_TEMPERATURE_ARGS,
            returns: "Number",
            examples: &CONVERT_TEMPERATURE_EXAMPLES,
            category: "units",
            related: &CONVERT_TEMPERATURE_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() < 3 {
            return Value::Error(GaugeError::arg_count("convert_temperature", 3, args.len()));
        }

        let value = match extract_number(&args[0], "convert_temperature", "value") {
            Ok(n) => n,
            Err(e) => return Value::Error(e),
        };
        let from_unit = match extract_text(&args[1], "convert_temperature", "from_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let to_unit = match extract_text(&args[2], "convert_temperature", "to_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        Value::Number(convert_temperature(value, from_unit, to_unit))
    }
}

// ============ list_units ============

pub struct ListUnits;

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::optional("category", "Text", "Category id; unknown ids list length units", "length"),
];

static LIST_UNITS_EXAMPLES: [&str; 2] = [
    "list_units(\"weight\") → [{id: \"kilogram\", name: \"Kilogram (kg)\", factor: 1}, ...]",
    "list_units(\"temperature\") → [{id: \"celsius\", name: \"Celsius (°C)\"}, ...]",
];

static LIST_UNITS_RELATED: [&str; 2] = ["list_categories", "convert"];

impl FunctionPlugin for ListUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_units",
            description: "List the units of a category in display order",
            usage: "list_units([category])",
            args: &LIST_UNITS_ARGS,
            returns: "List of Object {id, name, factor?}",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &LIST_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        let category = extract_optional_text(args, 0).unwrap_or("length");
        let units = units_for_category(category);
        Value::List(units.iter().map(unit_to_value).collect())
    }
}

// ============ list_categories ============

pub struct ListCategories;

static LIST_CATEGORIES_EXAMPLES: [&str; 1] = [
    "list_categories() → [{id: \"length\", label: \"Length\"}, ...]",
];

static LIST_CATEGORIES_RELATED: [&str; 1] = ["list_units"];

impl FunctionPlugin for ListCategories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_categories",
            description: "List the unit categories in tab order",
            usage: "list_categories()",
            args: &[],
            returns: "List of Object {id, label}",
            examples: &LIST_CATEGORIES_EXAMPLES,
            category: "units",
            related: &LIST_CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        Value::List(CATEGORIES.iter()
            .map(|c| {
                let mut obj = HashMap::new();
                obj.insert("id".to_string(), Value::Text(c.id().to_string()));
                obj.insert("label".to_string(), Value::Text(c.label().to_string()));
                Value::Object(obj)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn eval_ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    // ---- pure functions ----

    #[test]
    fn test_meters_to_centimeters() {
        assert_eq!(convert_value(5.0, "meter", "centimeter", "length"), Ok(500.0));
        assert_eq!(convert_value(1.0, "meter", "centimeter", "length"), Ok(100.0));
    }

    #[test]
    fn test_centimeters_to_meters() {
        assert_eq!(convert_value(250.0, "centimeter", "meter", "length"), Ok(2.5));
    }

    #[test]
    fn test_kilograms_to_grams() {
        assert_eq!(convert_value(1.0, "kilogram", "gram", "weight"), Ok(1000.0));
    }

    #[test]
    fn test_liters_to_milliliters() {
        assert_eq!(convert_value(1.0, "liter", "milliliter", "volume"), Ok(1000.0));
    }

    #[test]
    fn test_temperature_dispatch() {
        assert_eq!(convert_value(0.0, "celsius", "fahrenheit", "temperature"), Ok(32.0));
    }

    #[test]
    fn test_convert_with_explicit_unit_set() {
        let units = Category::Length.units();
        assert_eq!(convert_with_factor(5.0, "meter", "centimeter", &units), Ok(500.0));
    }

    #[test]
    fn test_linear_round_trip_all_pairs() {
        for cat in CATEGORIES.iter().filter(|c| c.is_linear()) {
            let units = cat.units();
            for from in units.ids() {
                for to in units.ids() {
                    for v in [-12.75, 0.001, 1.0, 42.0, 9.5e6] {
                        let there = convert_value(v, from, to, cat.id()).unwrap();
                        let back = convert_value(there, to, from, cat.id()).unwrap();
                        assert_relative_eq!(back, v, max_relative = 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_unit_is_identity() {
        for cat in CATEGORIES {
            for unit in cat.units().ids() {
                for v in [0.1, -3.3, 1234.5678] {
                    assert_eq!(convert_value(v, unit, unit, cat.id()), Ok(v));
                }
            }
        }
    }

    #[test]
    fn test_unknown_category_is_identity() {
        assert_eq!(convert_value(7.5, "meter", "centimeter", "speed"), Ok(7.5));
        assert_eq!(convert_value(7.5, "anything", "else", ""), Ok(7.5));
    }

    #[test]
    fn test_unknown_linear_unit_fails() {
        let err = convert_value(1.0, "meter", "furlong", "length").unwrap_err();
        assert_eq!(err.unit(), "furlong");
        assert_eq!(err.category(), Category::Length);

        // Units from another category are just as unknown
        assert!(convert_value(1.0, "gram", "meter", "length").is_err());
    }

    #[test]
    fn test_unknown_unit_fails_even_when_ids_match() {
        assert!(convert_value(1.0, "furlong", "furlong", "length").is_err());
    }

    // ---- plugins ----

    #[test]
    fn test_convert_plugin() {
        let args = vec![Value::Number(1.0), text("kilometer"), text("meter"), text("length")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_number(), Some(1000.0));
    }

    #[test]
    fn test_convert_plugin_accepts_numeric_text() {
        let args = vec![text("250"), text("centimeter"), text("meter"), text("length")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_number(), Some(2.5));
    }

    #[test]
    fn test_convert_plugin_rejects_word_input() {
        let args = vec![text("five"), text("meter"), text("centimeter"), text("length")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some(codes::INVALID_INPUT));
    }

    #[test]
    fn test_convert_plugin_unknown_unit() {
        let args = vec![Value::Number(1.0), text("cubit"), text("meter"), text("length")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some(codes::UNKNOWN_UNIT));
    }

    #[test]
    fn test_convert_plugin_arg_count() {
        let result = Convert.call(&[Value::Number(1.0)], &eval_ctx());
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some(codes::ARG_COUNT));
    }

    #[test]
    fn test_convert_temperature_plugin() {
        let args = vec![Value::Number(32.0), text("fahrenheit"), text("kelvin")];
        let result = ConvertTemperature.call(&args, &eval_ctx());
        assert_eq!(result.as_number(), Some(273.15));
    }

    #[test]
    fn test_list_units_plugin() {
        let result = ListUnits.call(&[text("temperature")], &eval_ctx());
        let units = result.as_list().unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].get("id").as_text(), Some("celsius"));
        assert!(units[0].get("factor").is_error());
    }

    #[test]
    fn test_list_units_defaults_to_length() {
        let result = ListUnits.call(&[], &eval_ctx());
        let units = result.as_list().unwrap();
        assert_eq!(units[0].get("id").as_text(), Some("meter"));
        assert_eq!(units[0].get("factor").as_number(), Some(1.0));
    }

    #[test]
    fn test_list_categories_plugin() {
        let result = ListCategories.call(&[], &eval_ctx());
        let ids: Vec<_> = result.as_list().unwrap()
            .iter()
            .map(|c| c.get("id").as_text().map(str::to_string))
            .collect();
        assert_eq!(ids, vec![
            Some("length".to_string()),
            Some("weight".to_string()),
            Some("temperature".to_string()),
            Some("volume".to_string()),
        ]);
    }
}

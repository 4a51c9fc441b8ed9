//! Unit definitions, one table per category

use crate::{Category, Unit, UnitSet};

/// Length units, factors relative to the meter
pub static LENGTH_UNITS: [Unit; 8] = [
    Unit::linear("meter", "Meter (m)", 1.0),
    Unit::linear("kilometer", "Kilometer (km)", 1000.0),
    Unit::linear("centimeter", "Centimeter (cm)", 0.01),
    Unit::linear("millimeter", "Millimeter (mm)", 0.001),
    Unit::linear("inch", "Inch (in)", 0.0254),
    Unit::linear("foot", "Foot (ft)", 0.3048),
    Unit::linear("yard", "Yard (yd)", 0.9144),
    Unit::linear("mile", "Mile (mi)", 1609.34),
];

/// Weight units, factors relative to the kilogram
pub static WEIGHT_UNITS: [Unit; 7] = [
    Unit::linear("kilogram", "Kilogram (kg)", 1.0),
    Unit::linear("gram", "Gram (g)", 0.001),
    Unit::linear("milligram", "Milligram (mg)", 0.000001),
    Unit::linear("pound", "Pound (lb)", 0.453592),
    Unit::linear("ounce", "Ounce (oz)", 0.0283495),
    Unit::linear("ton", "Metric Ton (t)", 1000.0),
    Unit::linear("stone", "Stone (st)", 6.35029),
];

/// Temperature units (converted by formula, see `temperature`)
pub static TEMPERATURE_UNITS: [Unit; 3] = [
    Unit::formula("celsius", "Celsius (°C)"),
    Unit::formula("fahrenheit", "Fahrenheit (°F)"),
    Unit::formula("kelvin", "Kelvin (K)"),
];

/// Volume units, factors relative to the liter
pub static VOLUME_UNITS: [Unit; 8] = [
    Unit::linear("liter", "Liter (L)", 1.0),
    Unit::linear("milliliter", "Milliliter (mL)", 0.001),
    Unit::linear("cubicMeter", "Cubic Meter (m³)", 1000.0),
    Unit::linear("gallon", "Gallon (gal)", 3.78541),
    Unit::linear("quart", "Quart (qt)", 0.946353),
    Unit::linear("pint", "Pint (pt)", 0.473176),
    Unit::linear("cup", "Cup (c)", 0.24),
    Unit::linear("fluidOunce", "Fluid Ounce (fl oz)", 0.0295735),
];

/// Units for a category id.
///
/// Unrecognized ids get the length set rather than an error. Use
/// `Category::from_str` when an unknown id must be rejected.
pub fn units_for_category(category: &str) -> UnitSet {
    match category.parse::<Category>() {
        Ok(cat) => cat.units(),
        Err(_) => {
            tracing::debug!(category, "unknown category, falling back to length units");
            Category::Length.units()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CATEGORIES;

    #[test]
    fn test_units_for_known_categories() {
        assert_eq!(units_for_category("length").len(), 8);
        assert_eq!(units_for_category("weight").len(), 7);
        assert_eq!(units_for_category("temperature").len(), 3);
        assert_eq!(units_for_category("volume").len(), 8);
    }

    #[test]
    fn test_unknown_category_falls_back_to_length() {
        let units = units_for_category("speed");
        assert_eq!(units.category(), Category::Length);
        assert_eq!(units.ids().collect::<Vec<_>>(), LENGTH_UNITS.iter().map(|u| u.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_linear_categories_have_one_base_unit_first() {
        for cat in CATEGORIES.iter().filter(|c| c.is_linear()) {
            let units = cat.units();
            assert!(units.nth(0).unwrap().is_base(), "{} base unit should come first", cat);
            assert_eq!(units.iter().filter(|u| u.is_base()).count(), 1);
            assert!(units.iter().all(|u| u.factor.map_or(false, |f| f > 0.0)));
        }
    }

    #[test]
    fn test_temperature_units_are_formula_based() {
        assert!(TEMPERATURE_UNITS.iter().all(|u| u.factor.is_none()));
    }

    #[test]
    fn test_unit_ids_unique_within_category() {
        for cat in CATEGORIES {
            let mut ids: Vec<_> = cat.units().ids().collect();
            let total = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), total, "duplicate unit id in {}", cat);
        }
    }
}

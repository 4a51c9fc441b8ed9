//! Unit representation with conversion factors

use std::fmt;
use serde::Serialize;
use thiserror::Error;
use crate::Category;

/// A single measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Unit {
    /// Stable identifier (e.g., "meter", "fluidOunce")
    pub id: &'static str,
    /// Display label (e.g., "Meter (m)")
    pub name: &'static str,
    /// Base units per one of this unit. `None` for temperature units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}

impl Unit {
    /// A unit converted by multiplying with `factor`
    pub const fn linear(id: &'static str, name: &'static str, factor: f64) -> Self {
        Unit { id, name, factor: Some(factor) }
    }

    /// A unit converted by formula (no factor)
    pub const fn formula(id: &'static str, name: &'static str) -> Self {
        Unit { id, name, factor: None }
    }

    /// The base unit of a linear category has factor 1
    pub fn is_base(&self) -> bool {
        self.factor == Some(1.0)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The closed set of units belonging to one category.
///
/// Declaration order is kept; the first two units are the default
/// source and target of a fresh converter form.
#[derive(Debug, Clone, Copy)]
pub struct UnitSet {
    category: Category,
    units: &'static [Unit],
}

impl UnitSet {
    pub(crate) const fn new(category: Category, units: &'static [Unit]) -> Self {
        UnitSet { category, units }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn get(&self, id: &str) -> Option<&'static Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Unit> {
        self.units.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        self.units.iter().map(|u| u.id)
    }

    /// Unit at a declaration position
    pub fn nth(&self, index: usize) -> Option<&'static Unit> {
        self.units.get(index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Factor of `id`, failing for ids outside the set or units without a factor
    pub fn factor(&self, id: &str) -> Result<f64, ConversionError> {
        let unit = self.get(id).ok_or_else(|| ConversionError::UnknownUnit {
            unit: id.to_string(),
            category: self.category,
        })?;
        unit.factor.ok_or_else(|| ConversionError::NoFactor {
            unit: id.to_string(),
            category: self.category,
        })
    }
}

/// Errors that can occur during unit conversion.
///
/// These signal caller bugs (ids that never came from the registry), not
/// bad user input; user input is screened by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("unknown {category} unit: {unit}")]
    UnknownUnit { unit: String, category: Category },

    #[error("{category} unit {unit} has no conversion factor")]
    NoFactor { unit: String, category: Category },
}

impl ConversionError {
    pub fn unit(&self) -> &str {
        match self {
            ConversionError::UnknownUnit { unit, .. } | ConversionError::NoFactor { unit, .. } => unit,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            ConversionError::UnknownUnit { category, .. } | ConversionError::NoFactor { category, .. } => *category,
        }
    }
}

impl From<ConversionError> for gauge_core::GaugeError {
    fn from(err: ConversionError) -> Self {
        match &err {
            ConversionError::UnknownUnit { unit, category } => {
                gauge_core::GaugeError::unknown_unit(unit, category.id())
            }
            ConversionError::NoFactor { .. } => gauge_core::GaugeError::internal(err.to_string()),
        }
    }
}

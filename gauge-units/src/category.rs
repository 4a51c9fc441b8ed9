//! Unit categories

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::unit::{Unit, UnitSet};
use crate::units::{LENGTH_UNITS, TEMPERATURE_UNITS, VOLUME_UNITS, WEIGHT_UNITS};

/// A family of units sharing one conversion method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Volume,
}

/// All categories, in tab order
pub const CATEGORIES: [Category; 4] = [
    Category::Length,
    Category::Weight,
    Category::Temperature,
    Category::Volume,
];

impl Category {
    /// Stable identifier used in requests and stored preferences
    pub fn id(self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Temperature => "temperature",
            Category::Volume => "volume",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Weight => "Weight",
            Category::Temperature => "Temperature",
            Category::Volume => "Volume",
        }
    }

    /// Linear categories convert by factor; temperature is affine
    pub fn is_linear(self) -> bool {
        !matches!(self, Category::Temperature)
    }

    pub fn units(self) -> UnitSet {
        let units: &'static [Unit] = match self {
            Category::Length => &LENGTH_UNITS,
            Category::Weight => &WEIGHT_UNITS,
            Category::Temperature => &TEMPERATURE_UNITS,
            Category::Volume => &VOLUME_UNITS,
        };
        UnitSet::new(self, units)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("unknown category: {0}")]
    Unknown(String),
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORIES.iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| CategoryError::Unknown(s.to_string()))
    }
}

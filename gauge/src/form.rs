//! Converter form: one category's input, units and result
//!
//! Every change runs the same pipeline: validate the input, convert it,
//! format the result, then remember the form in the preference store.

use std::sync::Arc;
use serde::Serialize;
use gauge_prefs::{load_user_preferences, save_user_preferences, CategoryPreferences, PreferenceStore, Preferences};
use gauge_plugin::DEFAULT_DECIMALS;
use gauge_text::{format_result, parse_input, InputError};
use gauge_units::{convert_value, Category, ConversionError, UnitSet};

/// Snapshot of a form for display or serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub category: Category,
    pub from_unit: String,
    pub to_unit: String,
    pub from_value: String,
    pub to_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ConverterForm {
    category: Category,
    units: UnitSet,
    from_unit: String,
    to_unit: String,
    from_value: String,
    to_value: String,
    error: Option<InputError>,
    decimals: usize,
    store: Arc<dyn PreferenceStore>,
}

impl ConverterForm {
    pub fn new(category: Category, store: Arc<dyn PreferenceStore>) -> Self {
        Self::with_decimals(category, store, DEFAULT_DECIMALS)
    }

    /// Restore the form from saved preferences, falling back to the first two
    /// units of the category and an empty input.
    pub fn with_decimals(category: Category, store: Arc<dyn PreferenceStore>, decimals: usize) -> Self {
        let units = category.units();
        let saved = load_user_preferences(store.as_ref())
            .and_then(|p| p.category_state(category.id()).cloned())
            .unwrap_or_default();

        let from_unit = restore_unit(&units, saved.from_unit.as_deref(), 0);
        let to_unit = restore_unit(&units, saved.to_unit.as_deref(), 1);

        let mut form = Self {
            category,
            units,
            from_unit,
            to_unit,
            from_value: saved.from_value.unwrap_or_default(),
            to_value: String::new(),
            error: None,
            decimals,
            store,
        };
        form.recompute();
        form
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn units(&self) -> &UnitSet {
        &self.units
    }

    pub fn from_unit(&self) -> &str {
        &self.from_unit
    }

    pub fn to_unit(&self) -> &str {
        &self.to_unit
    }

    pub fn from_value(&self) -> &str {
        &self.from_value
    }

    /// Formatted result; empty while there is no valid input
    pub fn to_value(&self) -> &str {
        &self.to_value
    }

    pub fn error(&self) -> Option<InputError> {
        self.error
    }

    pub fn state(&self) -> FormState {
        FormState {
            category: self.category,
            from_unit: self.from_unit.clone(),
            to_unit: self.to_unit.clone(),
            from_value: self.from_value.clone(),
            to_value: self.to_value.clone(),
            error: self.error.map(|e| e.to_string()),
        }
    }

    pub fn set_from_value(&mut self, value: impl Into<String>) {
        self.from_value = value.into();
        self.recompute();
    }

    pub fn set_from_unit(&mut self, unit: &str) -> Result<(), ConversionError> {
        self.from_unit = self.checked_unit(unit)?;
        self.recompute();
        Ok(())
    }

    pub fn set_to_unit(&mut self, unit: &str) -> Result<(), ConversionError> {
        self.to_unit = self.checked_unit(unit)?;
        self.recompute();
        Ok(())
    }

    /// Swap source and target units. A valid result also becomes the new input.
    pub fn swap(&mut self) {
        if !self.to_value.is_empty() && self.error.is_none() {
            self.from_value = std::mem::take(&mut self.to_value);
        }
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
        self.recompute();
    }

    /// Clear input, result and error. Stored preferences are left alone.
    pub fn reset(&mut self) {
        self.from_value.clear();
        self.to_value.clear();
        self.error = None;
    }

    fn checked_unit(&self, unit: &str) -> Result<String, ConversionError> {
        self.units.get(unit)
            .map(|u| u.id.to_string())
            .ok_or_else(|| ConversionError::UnknownUnit {
                unit: unit.to_string(),
                category: self.category,
            })
    }

    fn recompute(&mut self) {
        if self.from_value.is_empty() {
            self.to_value.clear();
            self.error = None;
            return;
        }

        let value = match parse_input(&self.from_value) {
            Ok(v) => v,
            Err(e) => {
                self.error = Some(e);
                self.to_value.clear();
                return;
            }
        };
        self.error = None;

        match convert_value(value, &self.from_unit, &self.to_unit, self.category.id()) {
            Ok(result) => self.to_value = format_result(result, self.decimals),
            Err(e) => {
                // Units are checked on entry, so this is a bug
                tracing::error!(error = %e, category = %self.category, "conversion failed");
                self.to_value.clear();
                return;
            }
        }

        save_user_preferences(self.store.as_ref(), &Preferences::for_category(
            self.category.id(),
            CategoryPreferences {
                from_unit: Some(self.from_unit.clone()),
                to_unit: Some(self.to_unit.clone()),
                from_value: Some(self.from_value.clone()),
            },
        ));
    }
}

fn restore_unit(units: &UnitSet, saved: Option<&str>, default_index: usize) -> String {
    if let Some(id) = saved {
        if units.contains(id) {
            return id.to_string();
        }
        tracing::warn!(unit = id, category = %units.category(), "ignoring saved unit not in category");
    }
    units.nth(default_index)
        .or_else(|| units.nth(0))
        .map(|u| u.id.to_string())
        .unwrap_or_default()
}

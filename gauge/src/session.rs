//! Converter session: the category tabs and their forms

use std::collections::HashMap;
use std::sync::Arc;
use gauge_plugin::DEFAULT_DECIMALS;
use gauge_prefs::{load_user_preferences, save_user_preferences, PreferenceStore, Preferences};
use gauge_units::{Category, CategoryError, CATEGORIES};
use crate::ConverterForm;

pub struct ConverterSession {
    active: Category,
    forms: HashMap<Category, ConverterForm>,
    store: Arc<dyn PreferenceStore>,
    decimals: usize,
}

impl ConverterSession {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self::with_decimals(store, DEFAULT_DECIMALS)
    }

    /// Open on the remembered tab, or the first category
    pub fn with_decimals(store: Arc<dyn PreferenceStore>, decimals: usize) -> Self {
        let saved = load_user_preferences(store.as_ref()).and_then(|p| p.category);
        let active = match saved.as_deref().map(str::parse::<Category>) {
            Some(Ok(category)) => category,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring saved category");
                CATEGORIES[0]
            }
            None => CATEGORIES[0],
        };

        save_user_preferences(store.as_ref(), &Preferences::with_active(active.id()));

        Self {
            active,
            forms: HashMap::new(),
            store,
            decimals,
        }
    }

    pub fn active_category(&self) -> Category {
        self.active
    }

    /// Switch tabs and remember the choice
    pub fn set_active_category(&mut self, id: &str) -> Result<Category, CategoryError> {
        let category: Category = id.parse()?;
        self.active = category;
        save_user_preferences(self.store.as_ref(), &Preferences::with_active(category.id()));
        self.form_mut(category);
        tracing::debug!(category = %category, "active category changed");
        Ok(category)
    }

    /// Form for a category, if it has been opened
    pub fn form(&self, category: Category) -> Option<&ConverterForm> {
        self.forms.get(&category)
    }

    /// Form for a category, opening it from saved preferences on first use
    pub fn form_mut(&mut self, category: Category) -> &mut ConverterForm {
        let store = &self.store;
        let decimals = self.decimals;
        self.forms
            .entry(category)
            .or_insert_with(|| ConverterForm::with_decimals(category, store.clone(), decimals))
    }

    pub fn active_form_mut(&mut self) -> &mut ConverterForm {
        self.form_mut(self.active)
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }
}

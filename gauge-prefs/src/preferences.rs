//! Preference document and the load/save/clear operations
//!
//! Failures never reach the caller: they are logged and the operation
//! becomes a no-op (or reads as "no preferences").

use std::collections::BTreeMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use crate::PreferenceStore;

/// Fixed key the preference document lives under
pub const STORAGE_KEY: &str = "unit-converter-preferences";

type Document = Map<String, JsonValue>;

/// Last-used state of one category's converter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_value: Option<String>,
}

impl CategoryPreferences {
    /// Read the fields that have a usable type, skip the rest
    fn from_fields(fields: &Document) -> Self {
        let text = |key: &str| fields.get(key).and_then(JsonValue::as_str).map(str::to_string);
        let from_value = match fields.get("fromValue") {
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            from_unit: text("fromUnit"),
            to_unit: text("toUnit"),
            from_value,
        }
    }
}

/// The whole stored document:
/// `{"category": "length", "length": {"fromUnit": ..., "toUnit": ..., "fromValue": ...}}`
///
/// Only object-valued keys are category states. Other keys in the stored
/// document are left alone by saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preferences {
    /// Last active category tab
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Per-category state keyed by category id
    #[serde(flatten)]
    pub categories: BTreeMap<String, CategoryPreferences>,
}

impl Preferences {
    /// Only the active tab
    pub fn with_active(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            categories: BTreeMap::new(),
        }
    }

    /// Active tab plus that tab's converter state
    pub fn for_category(category: impl Into<String>, state: CategoryPreferences) -> Self {
        let category = category.into();
        let mut categories = BTreeMap::new();
        categories.insert(category.clone(), state);
        Self {
            category: Some(category),
            categories,
        }
    }

    pub fn category_state(&self, category: &str) -> Option<&CategoryPreferences> {
        self.categories.get(category)
    }

    fn from_document(document: &Document) -> Self {
        let mut prefs = Preferences::default();
        for (key, value) in document {
            match (key.as_str(), value) {
                ("category", JsonValue::String(id)) => prefs.category = Some(id.clone()),
                (_, JsonValue::Object(fields)) => {
                    prefs.categories.insert(key.clone(), CategoryPreferences::from_fields(fields));
                }
                _ => tracing::debug!(key = %key, "skipping non-category preference entry"),
            }
        }
        prefs
    }
}

/// Raw stored document; `None` when missing, unreadable or not a JSON object
fn read_document(store: &dyn PreferenceStore) -> Option<Document> {
    if !store.is_available() {
        return None;
    }

    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!(error = %e, "error loading preferences");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(JsonValue::Object(document)) => Some(document),
        Ok(_) => {
            tracing::error!("stored preferences are not a JSON object, ignoring");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "stored preferences are not valid JSON, ignoring");
            None
        }
    }
}

/// Read the stored preferences. `None` when nothing is stored, the store is
/// unavailable, or the stored document cannot be read.
pub fn load_user_preferences(store: &dyn PreferenceStore) -> Option<Preferences> {
    read_document(store).map(|document| Preferences::from_document(&document))
}

/// Merge `preferences` into what is stored and write the result back.
///
/// Category states merge field by field; every other stored key is kept.
pub fn save_user_preferences(store: &dyn PreferenceStore, preferences: &Preferences) {
    if !store.is_available() {
        return;
    }

    let update = match serde_json::to_value(preferences) {
        Ok(JsonValue::Object(update)) => update,
        Ok(_) => return,
        Err(e) => {
            tracing::error!(error = %e, "error serializing preferences");
            return;
        }
    };

    let mut document = read_document(store).unwrap_or_default();
    for (key, value) in update {
        match value {
            JsonValue::Object(fields) => {
                match document.entry(key).or_insert_with(|| JsonValue::Object(Map::new())) {
                    JsonValue::Object(existing) => existing.extend(fields),
                    other => *other = JsonValue::Object(fields),
                }
            }
            value => {
                document.insert(key, value);
            }
        }
    }

    let raw = match serde_json::to_string(&document) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "error serializing preferences");
            return;
        }
    };

    if let Err(e) = store.set(STORAGE_KEY, &raw) {
        tracing::error!(error = %e, "error saving preferences");
    }
}

/// Forget everything stored
pub fn clear_user_preferences(store: &dyn PreferenceStore) {
    if !store.is_available() {
        return;
    }

    if let Err(e) = store.remove(STORAGE_KEY) {
        tracing::error!(error = %e, "error clearing preferences");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, StoreError, UnavailableStore};
    use serde_json::json;

    fn length_state(from: Option<&str>, to: Option<&str>) -> CategoryPreferences {
        CategoryPreferences {
            from_unit: from.map(str::to_string),
            to_unit: to.map(str::to_string),
            from_value: None,
        }
    }

    fn stored_json(store: &MemoryStore) -> serde_json::Value {
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn is_available(&self) -> bool {
            true
        }
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Poisoned)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[test]
    fn test_save_writes_document_under_fixed_key() {
        let store = MemoryStore::new();
        let prefs = Preferences::for_category("length", length_state(Some("meter"), Some("centimeter")));
        save_user_preferences(&store, &prefs);

        assert_eq!(stored_json(&store), json!({
            "category": "length",
            "length": {"fromUnit": "meter", "toUnit": "centimeter"}
        }));
    }

    #[test]
    fn test_save_merges_with_existing() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"category":"length","length":{"fromUnit":"meter"}}"#).unwrap();

        let mut update = Preferences::default();
        update.categories.insert("length".to_string(), length_state(None, Some("centimeter")));
        save_user_preferences(&store, &update);

        assert_eq!(stored_json(&store), json!({
            "category": "length",
            "length": {"fromUnit": "meter", "toUnit": "centimeter"}
        }));
    }

    #[test]
    fn test_save_active_tab_keeps_category_states() {
        let store = MemoryStore::new();
        save_user_preferences(&store, &Preferences::for_category("weight", CategoryPreferences {
            from_value: Some("3".to_string()),
            ..Default::default()
        }));
        save_user_preferences(&store, &Preferences::with_active("volume"));

        let prefs = load_user_preferences(&store).unwrap();
        assert_eq!(prefs.category.as_deref(), Some("volume"));
        assert_eq!(prefs.category_state("weight").and_then(|s| s.from_value.as_deref()), Some("3"));
    }

    #[test]
    fn test_load_returns_saved_preferences() {
        let store = MemoryStore::new();
        let prefs = Preferences::for_category("length", length_state(Some("meter"), Some("centimeter")));
        store.set(STORAGE_KEY, &serde_json::to_string(&prefs).unwrap()).unwrap();

        assert_eq!(load_user_preferences(&store), Some(prefs));
    }

    #[test]
    fn test_load_returns_none_when_nothing_saved() {
        assert_eq!(load_user_preferences(&MemoryStore::new()), None);
    }

    #[test]
    fn test_load_ignores_corrupt_document() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert_eq!(load_user_preferences(&store), None);
    }

    #[test]
    fn test_save_over_corrupt_document_starts_fresh() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "[1, 2").unwrap();
        save_user_preferences(&store, &Preferences::with_active("temperature"));
        assert_eq!(stored_json(&store), json!({"category": "temperature"}));
    }

    #[test]
    fn test_clear_removes_document() {
        let store = MemoryStore::new();
        save_user_preferences(&store, &Preferences::with_active("length"));
        clear_user_preferences(&store);
        assert!(store.is_empty());
        assert_eq!(load_user_preferences(&store), None);
    }

    #[test]
    fn test_unavailable_store_is_a_no_op() {
        let store = UnavailableStore;
        save_user_preferences(&store, &Preferences::with_active("length"));
        clear_user_preferences(&store);
        assert_eq!(load_user_preferences(&store), None);
    }

    #[test]
    fn test_failing_store_degrades_quietly() {
        let store = BrokenStore;
        save_user_preferences(&store, &Preferences::with_active("length"));
        clear_user_preferences(&store);
        assert_eq!(load_user_preferences(&store), None);
    }

    #[test]
    fn test_unknown_top_level_objects_are_kept() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"speed":{"fromUnit":"knot"}}"#).unwrap();
        save_user_preferences(&store, &Preferences::with_active("length"));
        assert_eq!(stored_json(&store), json!({
            "category": "length",
            "speed": {"fromUnit": "knot"}
        }));
    }

    #[test]
    fn test_save_keeps_scalar_top_level_keys() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"theme":"dark","version":2,"weight":{"fromValue":"3"}}"#).unwrap();
        save_user_preferences(&store, &Preferences::with_active("length"));

        assert_eq!(stored_json(&store), json!({
            "category": "length",
            "theme": "dark",
            "version": 2,
            "weight": {"fromValue": "3"}
        }));
    }

    #[test]
    fn test_load_reads_categories_beside_foreign_keys() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"category":"weight","theme":"dark","weight":{"fromUnit":"gram"}}"#).unwrap();

        let prefs = load_user_preferences(&store).unwrap();
        assert_eq!(prefs.category.as_deref(), Some("weight"));
        assert_eq!(prefs.category_state("weight").and_then(|s| s.from_unit.as_deref()), Some("gram"));
        assert!(prefs.category_state("theme").is_none());
    }

    #[test]
    fn test_load_skips_mistyped_fields() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"category":7,"length":{"fromUnit":1,"toUnit":"foot","fromValue":3}}"#).unwrap();

        let prefs = load_user_preferences(&store).unwrap();
        assert_eq!(prefs.category, None);
        assert_eq!(prefs.category_state("length"), Some(&CategoryPreferences {
            from_unit: None,
            to_unit: Some("foot".to_string()),
            from_value: Some("3".to_string()),
        }));
    }

    #[test]
    fn test_load_ignores_non_object_document() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "[1, 2]").unwrap();
        assert_eq!(load_user_preferences(&store), None);
    }

    #[test]
    fn test_save_replaces_mistyped_category_entry() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"length":"meter"}"#).unwrap();
        save_user_preferences(&store, &Preferences::for_category("length", length_state(Some("meter"), None)));
        assert_eq!(stored_json(&store), json!({
            "category": "length",
            "length": {"fromUnit": "meter"}
        }));
    }
}

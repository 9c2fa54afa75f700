//! FormDraft — accumulated field values for one registration attempt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value of a single form field.
///
/// Every field has a defaulted value from the moment the draft is created
/// (empty string, empty list, or null) — the draft is never partially typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text or a single selection.
    Text(String),
    /// A multi-selection (e.g. preferred delivery zones).
    List(Vec<String>),
    /// Not set, and no meaningful empty value (serializes as `null`).
    Empty,
}

impl FieldValue {
    /// Build a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The text content, or `""` for non-text values.
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            _ => "",
        }
    }

    /// Whether the value counts as "not filled in".
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Empty => true,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Mutable accumulator of field values across all wizard steps, keyed by
/// field name.
///
/// Owned exclusively by the wizard machine for the lifetime of one
/// registration attempt; discarded on successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    values: BTreeMap<String, FieldValue>,
}

impl FormDraft {
    /// An empty draft with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft with `(name, default)` pairs.
    pub fn with_defaults<I>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        Self {
            values: defaults.into_iter().collect(),
        }
    }

    /// Merge a single field update into the draft.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.values.insert(field.into(), value);
    }

    /// Current value of a field (`Empty` if never declared or set).
    pub fn get(&self, field: &str) -> &FieldValue {
        static EMPTY: FieldValue = FieldValue::Empty;
        self.values.get(field).unwrap_or(&EMPTY)
    }

    /// Text content of a field (`""` for unset or non-text values).
    pub fn text(&self, field: &str) -> &str {
        self.get(field).as_text()
    }

    /// Whether a field counts as not filled in.
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).is_empty()
    }

    /// Iterate over all `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_read_as_empty() {
        let draft = FormDraft::new();
        assert_eq!(draft.get("first_name"), &FieldValue::Empty);
        assert_eq!(draft.text("first_name"), "");
        assert!(draft.is_blank("first_name"));
    }

    #[test]
    fn set_and_read_back() {
        let mut draft = FormDraft::new();
        draft.set("first_name", "Ana".into());
        assert_eq!(draft.text("first_name"), "Ana");
        assert!(!draft.is_blank("first_name"));
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let mut draft = FormDraft::new();
        draft.set("city", "   ".into());
        assert!(draft.is_blank("city"));
    }

    #[test]
    fn empty_list_is_blank() {
        let mut draft = FormDraft::new();
        draft.set("zones", FieldValue::List(vec![]));
        assert!(draft.is_blank("zones"));
        draft.set("zones", FieldValue::List(vec!["north".into()]));
        assert!(!draft.is_blank("zones"));
    }

    #[test]
    fn defaults_seed_the_union_of_fields() {
        let draft = FormDraft::with_defaults([
            ("email".to_string(), FieldValue::text("")),
            ("zones".to_string(), FieldValue::List(vec![])),
            ("avatar".to_string(), FieldValue::Empty),
        ]);
        assert_eq!(draft.iter().count(), 3);
        assert!(draft.is_blank("email"));
        assert!(draft.is_blank("zones"));
        assert!(draft.is_blank("avatar"));
    }

    #[test]
    fn serde_roundtrip() {
        let mut draft = FormDraft::new();
        draft.set("first_name", "John".into());
        draft.set("zones", FieldValue::List(vec!["north".into(), "south".into()]));
        draft.set("avatar", FieldValue::Empty);

        let json = serde_json::to_string(&draft).unwrap();
        let parsed: FormDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, draft);
        // Empty serializes as null
        assert!(json.contains("\"avatar\":null"));
    }
}

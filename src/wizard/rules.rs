//! Declarative per-field validation rules.
//!
//! Rules are declared on each field of a step and evaluated on Advance and
//! Submit. Evaluation is pure and deterministic: the same draft and step
//! always yield the same result, and the engine never mutates anything.
//! Each field reports its *first* failing rule (fail-fast per field, not
//! globally), so the user sees one reason at a time.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::draft::{FieldValue, FormDraft};
use super::step::StepDefinition;

/// Outcome of validating a single field. Recomputed on every pass, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldStatus {
    Valid,
    Invalid { reason: String },
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { reason } => Some(reason),
        }
    }
}

/// A single validation rule. Declared per field, independent of order
/// between fields.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Non-empty text or non-empty selection.
    Required,
    /// Text must match the pattern.
    Pattern { regex: Regex, reason: String },
    /// Text must be at least `min` characters.
    MinLength { min: usize },
    /// Text must parse as a number.
    Numeric,
    /// Text must parse as a date in the given chrono format.
    Date { format: &'static str },
    /// Text must equal the *current* value of another field (e.g. password
    /// confirmation). The referenced field is read from the draft at
    /// validation time, never from a cached copy.
    EqualsField { other: String, reason: String },
}

impl Rule {
    /// Pattern rule from a regex literal. Panics on an invalid pattern, so
    /// only use with patterns known at compile time.
    pub fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::Pattern {
            regex: Regex::new(pattern).unwrap(),
            reason: reason.into(),
        }
    }

    pub fn min_length(min: usize) -> Self {
        Self::MinLength { min }
    }

    pub fn equals_field(other: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EqualsField {
            other: other.into(),
            reason: reason.into(),
        }
    }

    /// Check one rule against a value. Returns the failure reason, or `None`
    /// when the rule passes.
    fn check(&self, value: &FieldValue, draft: &FormDraft) -> Option<String> {
        match self {
            Self::Required => value
                .is_empty()
                .then(|| "This field is required".to_string()),
            Self::Pattern { regex, reason } => {
                (!regex.is_match(value.as_text())).then(|| reason.clone())
            }
            Self::MinLength { min } => {
                (value.as_text().chars().count() < *min)
                    .then(|| format!("Must be at least {min} characters"))
            }
            Self::Numeric => value
                .as_text()
                .trim()
                .parse::<f64>()
                .is_err()
                .then(|| "Must be a number".to_string()),
            Self::Date { format } => {
                chrono::NaiveDate::parse_from_str(value.as_text().trim(), format)
                    .is_err()
                    .then(|| "Must be a valid date (YYYY-MM-DD)".to_string())
            }
            Self::EqualsField { other, reason } => {
                (value.as_text() != draft.text(other)).then(|| reason.clone())
            }
        }
    }
}

/// Validate every field of a step against the current draft.
///
/// Optional fields that are empty are always valid, regardless of their
/// other rules (an unfilled tax-token field must not block the rider).
pub fn validate_step(step: &StepDefinition, draft: &FormDraft) -> BTreeMap<String, FieldStatus> {
    let mut statuses = BTreeMap::new();

    for field in &step.fields {
        let value = draft.get(&field.name);

        if field.optional && value.is_empty() {
            statuses.insert(field.name.clone(), FieldStatus::Valid);
            continue;
        }

        let status = field
            .rules
            .iter()
            .find_map(|rule| rule.check(value, draft))
            .map_or(FieldStatus::Valid, |reason| FieldStatus::Invalid { reason });

        if let Some(reason) = status.reason() {
            debug!(step = %step.id, field = %field.name, reason, "Field failed validation");
        }
        statuses.insert(field.name.clone(), status);
    }

    statuses
}

/// Whether every field in a validation result passed.
pub fn all_valid(statuses: &BTreeMap<String, FieldStatus>) -> bool {
    statuses.values().all(FieldStatus::is_valid)
}

//! Step definitions — static descriptors of each wizard screen.

use std::fmt;
use std::sync::Arc;

use super::draft::{FieldValue, FormDraft};
use super::rules::Rule;

/// Decides whether a step is included, given the current draft.
pub type BranchPredicate = Arc<dyn Fn(&FormDraft) -> bool + Send + Sync>;

/// One field within a step: its name, default value, and validation rules.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    /// Value the field starts with before the user touches it.
    pub default: FieldValue,
    /// Optional fields are valid whenever they are empty.
    pub optional: bool,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    /// A required-by-default field with an empty-string default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: FieldValue::text(""),
            optional: false,
            rules: Vec::new(),
        }
    }

    /// An optional field (empty is always valid).
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            optional: true,
            ..Self::new(name)
        }
    }

    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.default = default;
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Static, immutable descriptor of one wizard step: its fields and an
/// optional branch predicate deciding inclusion.
#[derive(Clone)]
pub struct StepDefinition {
    /// Stable identifier, e.g. `"vehicle-details"`.
    pub id: String,
    /// Heading shown above the step's fields.
    pub title: String,
    pub fields: Vec<FieldSpec>,
    branch: Option<BranchPredicate>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
            branch: None,
        }
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Restrict the step to drafts matching `predicate`. Steps without a
    /// branch are always included.
    pub fn with_branch<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FormDraft) -> bool + Send + Sync + 'static,
    {
        self.branch = Some(Arc::new(predicate));
        self
    }

    /// Whether this step belongs to the flow for the given draft.
    pub fn is_included(&self, draft: &FormDraft) -> bool {
        self.branch.as_ref().is_none_or(|predicate| predicate(draft))
    }

    /// `(name, default)` pairs for seeding a draft.
    pub fn field_defaults(&self) -> impl Iterator<Item = (String, FieldValue)> + '_ {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("id", &self.id)
            .field("fields", &self.fields.len())
            .field("branched", &self.branch.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_without_a_branch_are_always_included() {
        let step = StepDefinition::new("basics", "About you");
        assert!(step.is_included(&FormDraft::new()));
    }

    #[test]
    fn branch_predicate_reads_the_draft() {
        let step = StepDefinition::new("vehicle-details", "Your vehicle")
            .with_branch(|draft| draft.text("vehicle_type") == "bike");

        let mut draft = FormDraft::new();
        assert!(!step.is_included(&draft));

        draft.set("vehicle_type", "bike".into());
        assert!(step.is_included(&draft));
    }

    #[test]
    fn field_defaults_seed_declared_values() {
        let step = StepDefinition::new("zones", "Delivery zones")
            .with_field(FieldSpec::new("city"))
            .with_field(FieldSpec::optional("zones").with_default(FieldValue::List(vec![])));

        let defaults: Vec<_> = step.field_defaults().collect();
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults[0], ("city".to_string(), FieldValue::text("")));
        assert_eq!(defaults[1], ("zones".to_string(), FieldValue::List(vec![])));
    }
}

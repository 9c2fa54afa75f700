//! Restaurant-partner onboarding.

use serde_json::json;

use crate::clients::{ProfilePayload, Role};
use crate::submit::SubmissionRequest;
use crate::wizard::{FieldSpec, FormDraft, Rule, StepDefinition};

use super::fields::*;
use super::{confirm_password_field, credentials, email_field, full_name, password_field, phone_field};

pub fn steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("business", "Your restaurant")
            .with_field(FieldSpec::new(RESTAURANT_NAME).with_rule(Rule::Required))
            .with_field(FieldSpec::new(ADDRESS).with_rule(Rule::Required))
            .with_field(FieldSpec::new(CITY).with_rule(Rule::Required))
            .with_field(FieldSpec::optional(CUISINE)),
        StepDefinition::new("contact", "Contact person")
            .with_field(FieldSpec::new(FIRST_NAME).with_rule(Rule::Required))
            .with_field(FieldSpec::new(LAST_NAME).with_rule(Rule::Required))
            .with_field(email_field())
            .with_field(phone_field()),
        StepDefinition::new("account", "Secure your account")
            .with_field(password_field())
            .with_field(confirm_password_field()),
    ]
}

pub fn submission_request(draft: &FormDraft) -> SubmissionRequest {
    let name = full_name(draft);
    let (email, password) = credentials(draft);

    let mut details = serde_json::Map::new();
    details.insert(
        "restaurant_name".to_string(),
        json!(draft.text(RESTAURANT_NAME)),
    );
    details.insert("address".to_string(), json!(draft.text(ADDRESS)));
    details.insert("city".to_string(), json!(draft.text(CITY)));
    details.insert("phone".to_string(), json!(draft.text(PHONE)));
    if !draft.is_blank(CUISINE) {
        details.insert("cuisine".to_string(), json!(draft.text(CUISINE)));
    }

    SubmissionRequest {
        payload: ProfilePayload::new(name.clone(), email.clone(), Role::Partner)
            .with_details(details.into()),
        display_name: name,
        email,
        password,
    }
}

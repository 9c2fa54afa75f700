//! Rider onboarding — the vehicle-details step only exists for motorised
//! vehicles.

use serde_json::json;

use crate::clients::{ProfilePayload, Role};
use crate::submit::SubmissionRequest;
use crate::wizard::{FieldSpec, FormDraft, Rule, StepDefinition};

use super::fields::*;
use super::{confirm_password_field, credentials, email_field, full_name, password_field, phone_field};

/// Bikes and cars carry registration papers; cycles don't. The original UI
/// sent capitalised display values, so compare case-insensitively.
fn is_motorised(vehicle_type: &str) -> bool {
    matches!(
        vehicle_type.to_ascii_lowercase().as_str(),
        "bike" | "car"
    )
}

pub fn steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("profile", "About you")
            .with_field(FieldSpec::new(FIRST_NAME).with_rule(Rule::Required))
            .with_field(FieldSpec::new(LAST_NAME).with_rule(Rule::Required))
            .with_field(email_field())
            .with_field(phone_field())
            .with_field(FieldSpec::new(CITY).with_rule(Rule::Required)),
        StepDefinition::new("vehicle", "Your vehicle")
            .with_field(FieldSpec::new(VEHICLE_TYPE).with_rule(Rule::Required)),
        StepDefinition::new("vehicle-details", "Vehicle details")
            .with_field(FieldSpec::new(REGISTRATION_NUMBER).with_rule(Rule::Required))
            .with_field(FieldSpec::new(DRIVING_LICENSE).with_rule(Rule::Required))
            .with_field(FieldSpec::optional(TAX_TOKEN))
            .with_branch(|draft| is_motorised(draft.text(VEHICLE_TYPE))),
        StepDefinition::new("account", "Secure your account")
            .with_field(password_field())
            .with_field(confirm_password_field()),
    ]
}

pub fn submission_request(draft: &FormDraft) -> SubmissionRequest {
    let name = full_name(draft);
    let (email, password) = credentials(draft);

    let mut details = serde_json::Map::new();
    details.insert("phone".to_string(), json!(draft.text(PHONE)));
    details.insert("city".to_string(), json!(draft.text(CITY)));
    details.insert(
        "vehicle_type".to_string(),
        json!(draft.text(VEHICLE_TYPE).to_ascii_lowercase()),
    );
    for field in [REGISTRATION_NUMBER, DRIVING_LICENSE, TAX_TOKEN] {
        if !draft.is_blank(field) {
            details.insert(field.to_string(), json!(draft.text(field)));
        }
    }

    SubmissionRequest {
        payload: ProfilePayload::new(name.clone(), email.clone(), Role::Rider)
            .with_details(details.into()),
        display_name: name,
        email,
        password,
    }
}

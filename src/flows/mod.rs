//! The flow catalog — concrete step definitions and payload builders for
//! the three registration flows the platform ships.

pub mod partner;
pub mod rider;
pub mod user;

use secrecy::SecretString;

use crate::clients::Role;
use crate::submit::SubmissionRequest;
use crate::wizard::{FieldSpec, FormDraft, Rule, StepDefinition};

/// Field names shared across flows.
pub mod fields {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirm_password";
    pub const PHONE: &str = "phone";
    pub const CITY: &str = "city";
    pub const VEHICLE_TYPE: &str = "vehicle_type";
    pub const REGISTRATION_NUMBER: &str = "registration_number";
    pub const DRIVING_LICENSE: &str = "driving_license";
    pub const TAX_TOKEN: &str = "tax_token";
    pub const RESTAURANT_NAME: &str = "restaurant_name";
    pub const ADDRESS: &str = "address";
    pub const CUISINE: &str = "cuisine";
}

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PHONE_PATTERN: &str = r"^\+?[0-9]{7,15}$";

/// The steps for a role's registration wizard.
pub fn steps_for(role: Role) -> Vec<StepDefinition> {
    match role {
        Role::User => user::steps(),
        Role::Rider => rider::steps(),
        Role::Partner => partner::steps(),
    }
}

/// Build the orchestrator request from a validated draft.
pub fn submission_request(role: Role, draft: &FormDraft) -> SubmissionRequest {
    match role {
        Role::User => user::submission_request(draft),
        Role::Rider => rider::submission_request(draft),
        Role::Partner => partner::submission_request(draft),
    }
}

pub(crate) fn email_field() -> FieldSpec {
    FieldSpec::new(fields::EMAIL)
        .with_rule(Rule::Required)
        .with_rule(Rule::pattern(EMAIL_PATTERN, "Enter a valid email address"))
}

pub(crate) fn phone_field() -> FieldSpec {
    FieldSpec::new(fields::PHONE)
        .with_rule(Rule::Required)
        .with_rule(Rule::pattern(PHONE_PATTERN, "Enter a valid phone number"))
}

pub(crate) fn password_field() -> FieldSpec {
    FieldSpec::new(fields::PASSWORD)
        .with_rule(Rule::Required)
        .with_rule(Rule::min_length(6))
}

pub(crate) fn confirm_password_field() -> FieldSpec {
    FieldSpec::new(fields::CONFIRM_PASSWORD)
        .with_rule(Rule::Required)
        .with_rule(Rule::equals_field(fields::PASSWORD, "Passwords do not match"))
}

/// "first_name last_name", trimmed, tolerating a missing half.
pub(crate) fn full_name(draft: &FormDraft) -> String {
    format!(
        "{} {}",
        draft.text(fields::FIRST_NAME).trim(),
        draft.text(fields::LAST_NAME).trim()
    )
    .trim()
    .to_string()
}

/// Email + password pulled out of the draft for the identity call.
pub(crate) fn credentials(draft: &FormDraft) -> (String, SecretString) {
    (
        draft.text(fields::EMAIL).to_string(),
        SecretString::from(draft.text(fields::PASSWORD).to_string()),
    )
}

//! Customer registration — a single-step wizard.

use crate::clients::{ProfilePayload, Role};
use crate::submit::SubmissionRequest;
use crate::wizard::{FieldSpec, FormDraft, Rule, StepDefinition};

use super::fields::*;
use super::{confirm_password_field, credentials, email_field, full_name, password_field};

pub fn steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("account", "Create your account")
            .with_field(FieldSpec::new(FIRST_NAME).with_rule(Rule::Required))
            .with_field(FieldSpec::new(LAST_NAME).with_rule(Rule::Required))
            .with_field(email_field())
            .with_field(password_field())
            .with_field(confirm_password_field()),
    ]
}

pub fn submission_request(draft: &FormDraft) -> SubmissionRequest {
    let name = full_name(draft);
    let (email, password) = credentials(draft);
    SubmissionRequest {
        payload: ProfilePayload::new(name.clone(), email.clone(), Role::User),
        display_name: name,
        email,
        password,
    }
}

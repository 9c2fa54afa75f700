//! RegistrationSession — glues one flow's wizard machine to the
//! orchestrator and drives submission end-to-end.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::clients::Role;
use crate::error::WizardError;
use crate::flows;
use crate::wizard::{EventOutcome, FieldStatus, FieldValue, WizardEvent, WizardMachine};

use super::orchestrator::SubmissionOrchestrator;
use super::outcome::SubmissionOutcome;

/// What a submit attempt did.
#[derive(Debug)]
pub enum SubmitAttempt {
    /// The orchestrator ran and resolved; the machine already reflects the
    /// outcome.
    Resolved(SubmissionOutcome),
    /// The last step failed validation; nothing was sent.
    Rejected {
        errors: BTreeMap<String, FieldStatus>,
    },
    /// Not on the last step, or a submission is already in flight.
    Ignored,
}

/// One registration attempt for one role: the machine plus the orchestrator.
pub struct RegistrationSession {
    role: Role,
    machine: WizardMachine,
    orchestrator: Arc<SubmissionOrchestrator>,
}

impl RegistrationSession {
    pub fn new(
        role: Role,
        orchestrator: Arc<SubmissionOrchestrator>,
    ) -> Result<Self, WizardError> {
        Ok(Self {
            role,
            machine: WizardMachine::new(flows::steps_for(role))?,
            orchestrator,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn machine(&self) -> &WizardMachine {
        &self.machine
    }

    /// Merge a field edit into the draft.
    pub fn set_field(&mut self, field: &str, value: impl Into<FieldValue>) -> EventOutcome {
        self.machine.apply(WizardEvent::FieldChanged {
            field: field.to_string(),
            value: value.into(),
        })
    }

    pub fn advance(&mut self) -> EventOutcome {
        self.machine.apply(WizardEvent::Advance)
    }

    pub fn retreat(&mut self) -> EventOutcome {
        self.machine.apply(WizardEvent::Retreat)
    }

    /// Validate the last step, run the orchestrator once, and feed the
    /// outcome back into the machine.
    ///
    /// While a submission is in flight the machine is in `Submitting`, so a
    /// re-entrant call comes back as `Ignored` without reaching the
    /// orchestrator.
    pub async fn submit(&mut self) -> SubmitAttempt {
        match self.machine.apply(WizardEvent::Submit) {
            EventOutcome::SubmitReady => {
                let request = flows::submission_request(self.role, self.machine.draft());
                let outcome = self.orchestrator.submit(&request).await;
                self.machine.resolve_submission(&outcome);
                SubmitAttempt::Resolved(outcome)
            }
            EventOutcome::Rejected { errors } => SubmitAttempt::Rejected { errors },
            _ => SubmitAttempt::Ignored,
        }
    }
}

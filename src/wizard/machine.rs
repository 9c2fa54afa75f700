//! The wizard state machine — owns the draft and the step cursor.
//!
//! All transitions are pure functions of the machine's own state plus one
//! event; nothing here touches the network or a rendering framework. The
//! submission itself is delegated: an accepted `Submit` flips the machine
//! into `Submitting` and hands control to the orchestrator, whose outcome is
//! fed back through [`WizardMachine::resolve_submission`].

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::WizardError;
use crate::submit::SubmissionOutcome;

use super::draft::{FieldValue, FormDraft};
use super::rules::{FieldStatus, all_valid, validate_step};
use super::step::StepDefinition;

/// Where the wizard currently is.
///
/// `Failed` keeps the user on the last step with a banner message; the draft
/// is preserved so a corrected re-submit is possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardPhase {
    /// The user is filling in steps.
    Editing,
    /// A submission is in flight. All further events are ignored.
    Submitting,
    /// The submission fully succeeded. Terminal.
    Completed,
    /// The submission failed (or partially failed); banner shown, retry
    /// allowed.
    Failed { message: String },
}

impl WizardPhase {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}

/// A user or host event fed into the machine.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    /// Merge a single field update into the draft.
    FieldChanged { field: String, value: FieldValue },
    /// Move to the next included step, if the current one validates.
    Advance,
    /// Move to the previous step. Never re-validates the step being left.
    Retreat,
    /// Request submission from the last included step.
    Submit,
}

/// What an event did. The presentation layer only ever sees this — never an
/// exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Draft updated or cursor moved.
    Changed,
    /// Transition blocked by validation; per-field statuses included.
    Rejected { errors: BTreeMap<String, FieldStatus> },
    /// The event had no effect (Retreat on the first step, Submit while
    /// already submitting, ...).
    Ignored,
    /// Submit accepted: the machine is now `Submitting` and the caller must
    /// run the orchestrator exactly once, then call `resolve_submission`.
    SubmitReady,
}

/// Holds the current step cursor, the accumulated [`FormDraft`], and the
/// conditional branching over step definitions.
pub struct WizardMachine {
    attempt_id: Uuid,
    steps: Vec<StepDefinition>,
    draft: FormDraft,
    /// Index into the *included* step sequence, not `steps`.
    cursor: usize,
    phase: WizardPhase,
}

impl WizardMachine {
    /// Build a machine at the first step with a defaulted draft.
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptyFlow);
        }
        let draft = Self::default_draft(&steps);
        let machine = Self {
            attempt_id: Uuid::new_v4(),
            steps,
            draft,
            cursor: 0,
            phase: WizardPhase::Editing,
        };
        debug!(attempt = %machine.attempt_id, steps = machine.steps.len(), "Wizard started");
        Ok(machine)
    }

    /// Seed a draft with every declared field's default — the draft is the
    /// union of all steps' fields, including currently excluded ones.
    fn default_draft(steps: &[StepDefinition]) -> FormDraft {
        FormDraft::with_defaults(steps.iter().flat_map(StepDefinition::field_defaults))
    }

    /// Correlation id for this registration attempt.
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    /// Indices (into the full step list) of the steps included for the
    /// current draft.
    fn included(&self) -> Vec<usize> {
        let included: Vec<usize> = self
            .steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.is_included(&self.draft))
            .map(|(i, _)| i)
            .collect();
        // The first step of every flow is unconditional, so this is never
        // empty in practice; keep step 0 as a floor regardless.
        if included.is_empty() { vec![0] } else { included }
    }

    /// The steps currently included, in order.
    pub fn included_steps(&self) -> Vec<&StepDefinition> {
        self.included().into_iter().map(|i| &self.steps[i]).collect()
    }

    /// The step the user is on.
    pub fn current_step(&self) -> &StepDefinition {
        let included = self.included();
        let idx = included[self.cursor.min(included.len() - 1)];
        &self.steps[idx]
    }

    /// `(current, total)` for a progress indicator, 1-based.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.included().len();
        (self.cursor.min(total - 1) + 1, total)
    }

    /// Validate the current step against the current draft (e.g. for inline
    /// on-blur feedback). Pure; does not transition.
    pub fn validate_current(&self) -> BTreeMap<String, FieldStatus> {
        validate_step(self.current_step(), &self.draft)
    }

    /// Apply one event and report what it did.
    pub fn apply(&mut self, event: WizardEvent) -> EventOutcome {
        match self.phase {
            WizardPhase::Submitting | WizardPhase::Completed => {
                debug!(
                    attempt = %self.attempt_id,
                    phase = self.phase.label(),
                    ?event,
                    "Event ignored in terminal/in-flight phase"
                );
                return EventOutcome::Ignored;
            }
            WizardPhase::Editing | WizardPhase::Failed { .. } => {}
        }

        match event {
            WizardEvent::FieldChanged { field, value } => self.field_changed(field, value),
            WizardEvent::Advance => self.advance(),
            WizardEvent::Retreat => self.retreat(),
            WizardEvent::Submit => self.submit(),
        }
    }

    fn field_changed(&mut self, field: String, value: FieldValue) -> EventOutcome {
        self.draft.set(field, value);
        // A branching field may have shrunk the included set; keep the
        // cursor within [0, last included step].
        let last = self.included().len() - 1;
        if self.cursor > last {
            debug!(attempt = %self.attempt_id, cursor = self.cursor, last, "Cursor re-clamped");
            self.cursor = last;
        }
        EventOutcome::Changed
    }

    fn advance(&mut self) -> EventOutcome {
        let statuses = self.validate_current();
        if !all_valid(&statuses) {
            return EventOutcome::Rejected { errors: statuses };
        }

        // Recompute the included set before moving: a just-entered value may
        // have added or removed later steps.
        let included = self.included();
        if self.cursor + 1 >= included.len() {
            debug!(attempt = %self.attempt_id, "Already on the last included step");
            return EventOutcome::Ignored;
        }
        self.cursor += 1;
        EventOutcome::Changed
    }

    fn retreat(&mut self) -> EventOutcome {
        if self.cursor == 0 {
            return EventOutcome::Ignored;
        }
        // Values already entered are retained; the step being left is not
        // re-validated, and leaving clears any failure banner.
        self.cursor -= 1;
        self.phase = WizardPhase::Editing;
        EventOutcome::Changed
    }

    fn submit(&mut self) -> EventOutcome {
        let included = self.included();
        if self.cursor != included.len() - 1 {
            debug!(attempt = %self.attempt_id, "Submit only allowed from the last included step");
            return EventOutcome::Ignored;
        }

        let statuses = self.validate_current();
        if !all_valid(&statuses) {
            return EventOutcome::Rejected { errors: statuses };
        }

        self.phase = WizardPhase::Submitting;
        info!(attempt = %self.attempt_id, "Submission accepted, handing off to the orchestrator");
        EventOutcome::SubmitReady
    }

    /// Feed the orchestrator's outcome back into the machine.
    ///
    /// Full success discards the draft and completes the wizard; anything
    /// else keeps the draft and parks the user on the last step with the
    /// outcome's banner message.
    pub fn resolve_submission(&mut self, outcome: &SubmissionOutcome) {
        if self.phase != WizardPhase::Submitting {
            warn!(
                attempt = %self.attempt_id,
                phase = self.phase.label(),
                "resolve_submission called outside Submitting; ignoring"
            );
            return;
        }

        info!(attempt = %self.attempt_id, outcome = outcome.label(), "Submission resolved");
        if outcome.is_full_success() {
            self.draft = Self::default_draft(&self.steps);
            self.phase = WizardPhase::Completed;
        } else {
            self.phase = WizardPhase::Failed {
                message: outcome.message(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::rules::Rule;
    use crate::wizard::step::FieldSpec;

    fn two_step_flow() -> Vec<StepDefinition> {
        vec![
            StepDefinition::new("basics", "About you")
                .with_field(FieldSpec::new("first_name").with_rule(Rule::Required)),
            StepDefinition::new("account", "Your account")
                .with_field(FieldSpec::new("password").with_rule(Rule::Required)),
        ]
    }

    fn branched_flow() -> Vec<StepDefinition> {
        vec![
            StepDefinition::new("vehicle", "Your vehicle")
                .with_field(FieldSpec::new("vehicle_type").with_rule(Rule::Required)),
            StepDefinition::new("vehicle-details", "Vehicle details")
                .with_field(FieldSpec::new("registration_number").with_rule(Rule::Required))
                .with_branch(|draft| draft.text("vehicle_type") == "bike"),
            StepDefinition::new("account", "Your account")
                .with_field(FieldSpec::new("password").with_rule(Rule::Required)),
        ]
    }

    fn set(machine: &mut WizardMachine, field: &str, value: &str) {
        let outcome = machine.apply(WizardEvent::FieldChanged {
            field: field.to_string(),
            value: value.into(),
        });
        assert_eq!(outcome, EventOutcome::Changed);
    }

    #[test]
    fn starts_on_the_first_step_with_defaulted_draft() {
        let machine = WizardMachine::new(two_step_flow()).unwrap();
        assert_eq!(machine.current_step().id, "basics");
        assert_eq!(machine.phase(), &WizardPhase::Editing);
        assert_eq!(machine.draft().text("first_name"), "");
        assert_eq!(machine.draft().text("password"), "");
        assert_eq!(machine.progress(), (1, 2));
    }

    #[test]
    fn empty_flow_is_rejected() {
        assert!(matches!(
            WizardMachine::new(vec![]),
            Err(WizardError::EmptyFlow)
        ));
    }

    #[test]
    fn advance_is_rejected_while_required_fields_are_empty() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        match machine.apply(WizardEvent::Advance) {
            EventOutcome::Rejected { errors } => {
                assert!(!errors["first_name"].is_valid());
                assert!(!errors["first_name"].reason().unwrap().is_empty());
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
        assert_eq!(machine.current_step().id, "basics");
    }

    #[test]
    fn advance_moves_once_the_step_validates() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        assert_eq!(machine.apply(WizardEvent::Advance), EventOutcome::Changed);
        assert_eq!(machine.current_step().id, "account");
        assert_eq!(machine.progress(), (2, 2));
    }

    #[test]
    fn retreat_preserves_previously_entered_values() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        machine.apply(WizardEvent::Advance);
        assert_eq!(machine.apply(WizardEvent::Retreat), EventOutcome::Changed);
        assert_eq!(machine.current_step().id, "basics");
        assert_eq!(machine.draft().text("first_name"), "Ana");
    }

    #[test]
    fn retreat_on_the_first_step_is_ignored() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        assert_eq!(machine.apply(WizardEvent::Retreat), EventOutcome::Ignored);
    }

    #[test]
    fn retreat_never_revalidates_the_step_being_left() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        machine.apply(WizardEvent::Advance);
        // Invalidate the step we are about to leave backwards from.
        set(&mut machine, "password", "");
        assert_eq!(machine.apply(WizardEvent::Retreat), EventOutcome::Changed);
    }

    #[test]
    fn branching_field_adds_and_removes_the_details_step() {
        let mut machine = WizardMachine::new(branched_flow()).unwrap();
        assert_eq!(machine.included_steps().len(), 2);

        set(&mut machine, "vehicle_type", "bike");
        let ids: Vec<_> = machine.included_steps().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, ["vehicle", "vehicle-details", "account"]);

        set(&mut machine, "vehicle_type", "cycle");
        assert_eq!(machine.included_steps().len(), 2);
    }

    #[test]
    fn cursor_is_clamped_when_a_branch_removes_the_current_step() {
        let mut machine = WizardMachine::new(branched_flow()).unwrap();
        set(&mut machine, "vehicle_type", "bike");
        machine.apply(WizardEvent::Advance);
        assert_eq!(machine.current_step().id, "vehicle-details");

        // Switching vehicle type drops the step the user is standing on.
        set(&mut machine, "vehicle_type", "cycle");
        assert_eq!(machine.current_step().id, "account");
        let (current, total) = machine.progress();
        assert!(current <= total);
    }

    #[test]
    fn submit_is_ignored_before_the_last_step() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        assert_eq!(machine.apply(WizardEvent::Submit), EventOutcome::Ignored);
    }

    #[test]
    fn submit_validates_the_last_step() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        machine.apply(WizardEvent::Advance);
        assert!(matches!(
            machine.apply(WizardEvent::Submit),
            EventOutcome::Rejected { .. }
        ));

        set(&mut machine, "password", "Abcdef1");
        assert_eq!(machine.apply(WizardEvent::Submit), EventOutcome::SubmitReady);
        assert_eq!(machine.phase(), &WizardPhase::Submitting);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        machine.apply(WizardEvent::Advance);
        set(&mut machine, "password", "Abcdef1");

        assert_eq!(machine.apply(WizardEvent::Submit), EventOutcome::SubmitReady);
        // The first submission has not resolved yet — the machine must gate.
        assert_eq!(machine.apply(WizardEvent::Submit), EventOutcome::Ignored);
        assert_eq!(
            machine.apply(WizardEvent::FieldChanged {
                field: "password".into(),
                value: "other".into(),
            }),
            EventOutcome::Ignored
        );
    }

    #[test]
    fn failure_keeps_the_draft_and_allows_retry() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        machine.apply(WizardEvent::Advance);
        set(&mut machine, "password", "Abcdef1");
        machine.apply(WizardEvent::Submit);

        let outcome = SubmissionOutcome::Failure {
            error: crate::error::IdentityError::Unknown {
                reason: "boom".into(),
            },
        };
        machine.resolve_submission(&outcome);

        assert!(matches!(machine.phase(), WizardPhase::Failed { .. }));
        assert_eq!(machine.draft().text("first_name"), "Ana");
        // Retry is a plain re-Submit.
        assert_eq!(machine.apply(WizardEvent::Submit), EventOutcome::SubmitReady);
    }

    #[test]
    fn full_success_completes_and_discards_the_draft() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        set(&mut machine, "first_name", "Ana");
        machine.apply(WizardEvent::Advance);
        set(&mut machine, "password", "Abcdef1");
        machine.apply(WizardEvent::Submit);

        let outcome = SubmissionOutcome::FullSuccess {
            profile: crate::clients::ProfileRecord::test_record("Ana", "ana@x.com"),
        };
        machine.resolve_submission(&outcome);

        assert_eq!(machine.phase(), &WizardPhase::Completed);
        assert_eq!(machine.draft().text("first_name"), "");
        // Terminal: nothing else lands.
        assert_eq!(machine.apply(WizardEvent::Retreat), EventOutcome::Ignored);
        assert_eq!(machine.apply(WizardEvent::Submit), EventOutcome::Ignored);
    }

    #[test]
    fn resolve_outside_submitting_is_a_no_op() {
        let mut machine = WizardMachine::new(two_step_flow()).unwrap();
        let outcome = SubmissionOutcome::Failure {
            error: crate::error::IdentityError::Unknown {
                reason: "boom".into(),
            },
        };
        machine.resolve_submission(&outcome);
        assert_eq!(machine.phase(), &WizardPhase::Editing);
    }
}

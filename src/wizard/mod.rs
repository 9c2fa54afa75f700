//! The multi-step wizard core: draft accumulation, declarative validation,
//! and the step state machine.

pub mod draft;
pub mod machine;
pub mod rules;
pub mod step;

pub use draft::{FieldValue, FormDraft};
pub use machine::{EventOutcome, WizardEvent, WizardMachine, WizardPhase};
pub use rules::{FieldStatus, Rule, all_valid, validate_step};
pub use step::{BranchPredicate, FieldSpec, StepDefinition};

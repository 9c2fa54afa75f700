//! SubmissionOutcome — the tagged result the presentation layer renders.

use crate::clients::{Identity, ProfileRecord};
use crate::error::{IdentityError, ProfileApiError};

/// Result of one submission attempt. Drives user-visible messaging; never
/// persisted beyond the attempt.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Identity created and profile persisted.
    FullSuccess { profile: ProfileRecord },
    /// The identity was created upstream but the profile save failed. The
    /// identity is *not* rolled back — documented product behavior.
    PartialSuccess {
        identity: Identity,
        error: ProfileApiError,
    },
    /// Identity creation itself failed; nothing exists upstream.
    Failure { error: IdentityError },
}

impl SubmissionOutcome {
    pub fn is_full_success(&self) -> bool {
        matches!(self, Self::FullSuccess { .. })
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullSuccess { .. } => "full_success",
            Self::PartialSuccess { .. } => "partial_success",
            Self::Failure { .. } => "failure",
        }
    }

    /// Human-readable banner text.
    ///
    /// The partial-success wording deliberately says the account was created
    /// — it must not read as a total failure.
    pub fn message(&self) -> String {
        match self {
            Self::FullSuccess { .. } => "You're all set — your account is ready.".to_string(),
            Self::PartialSuccess { error, .. } => format!(
                "Your account was created, but we could not save your profile: {error}. \
                 Your details are still here — please try submitting again."
            ),
            Self::Failure { error } => format!("We could not create your account: {error}"),
        }
    }
}

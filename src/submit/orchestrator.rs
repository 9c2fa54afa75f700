//! Submission orchestrator — sequences the external calls with
//! partial-failure semantics.
//!
//! The sequence is strictly ordered: create identity → update display name
//! → persist profile. Each call is awaited to resolution (success, failure,
//! or timeout) before the next begins; there is no fan-out and no automatic
//! retry. At-most-one invocation per attempt is enforced upstream by the
//! wizard machine's `Submitting` phase.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::clients::{IdentityProvider, ProfileApi, ProfilePayload};
use crate::config::SignupConfig;
use crate::error::{IdentityError, ProfileApiError};

use super::outcome::SubmissionOutcome;

/// Everything the orchestrator needs for one attempt, built from the
/// validated draft by the flow catalog.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub email: String,
    pub password: SecretString,
    pub display_name: String,
    pub payload: ProfilePayload,
}

/// Runs the identity → display-name → profile sequence.
pub struct SubmissionOrchestrator {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileApi>,
    request_timeout: Duration,
}

impl SubmissionOrchestrator {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileApi>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            identity,
            profiles,
            request_timeout,
        }
    }

    /// Wire up the HTTP collaborators from config.
    pub fn over_http(config: &SignupConfig) -> Self {
        Self::new(
            Arc::new(crate::clients::HttpIdentityProvider::new(config)),
            Arc::new(crate::clients::HttpProfileApi::new(config)),
            config.request_timeout,
        )
    }

    /// Run the submission sequence once.
    ///
    /// Exactly one identity-creation request and at most one
    /// profile-persistence request are issued; if identity creation fails,
    /// the profile API is never called.
    pub async fn submit(&self, request: &SubmissionRequest) -> SubmissionOutcome {
        // 1. Create the upstream identity.
        let created = tokio::time::timeout(
            self.request_timeout,
            self.identity.create_account(&request.email, &request.password),
        )
        .await
        .unwrap_or(Err(IdentityError::Timeout {
            timeout: self.request_timeout,
        }));

        let identity = match created {
            Ok(identity) => identity,
            Err(error) => {
                info!(email = %request.email, %error, "Identity creation failed");
                return SubmissionOutcome::Failure { error };
            }
        };

        // 2. Set the display name. Non-fatal: the account already exists, so
        // a failure here is logged and the sequence continues.
        let renamed = tokio::time::timeout(
            self.request_timeout,
            self.identity
                .update_display_name(&identity, &request.display_name),
        )
        .await
        .unwrap_or(Err(IdentityError::Timeout {
            timeout: self.request_timeout,
        }));
        if let Err(error) = renamed {
            warn!(uid = %identity.uid, %error, "Display-name update failed; continuing");
        }

        // 3. Persist the profile.
        let persisted = tokio::time::timeout(
            self.request_timeout,
            self.profiles.create_profile(&request.payload),
        )
        .await
        .unwrap_or(Err(ProfileApiError::Timeout {
            timeout: self.request_timeout,
        }));

        let outcome = match persisted {
            Ok(profile) => SubmissionOutcome::FullSuccess { profile },
            Err(error) => {
                warn!(uid = %identity.uid, %error, "Profile save failed after identity creation");
                SubmissionOutcome::PartialSuccess { identity, error }
            }
        };
        info!(outcome = outcome.label(), "Submission sequence finished");
        outcome
    }
}

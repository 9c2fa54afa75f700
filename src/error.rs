//! Error types for the signup core.

use std::time::Duration;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Identity provider error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Profile API error: {0}")]
    Profile(#[from] ProfileApiError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Wizard construction errors.
///
/// Transition *rejections* (a field failed validation, a Retreat from the
/// first step) are not errors — they come back as event outcomes. This enum
/// covers misuse that no event sequence can recover from.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WizardError {
    #[error("A wizard needs at least one step")]
    EmptyFlow,
}

/// Failures from the identity-provider collaborator.
///
/// `Timeout` is how a slow network surfaces here; it is handled exactly like
/// any other creation failure (no automatic retry).
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    #[error("The email {email} is already registered")]
    AlreadyInUse { email: String },

    #[error("Invalid email or password: {reason}")]
    InvalidCredentialShape { reason: String },

    #[error("The identity provider did not respond within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Identity provider request failed: {reason}")]
    Unknown { reason: String },
}

/// Failures from the backend profile API collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileApiError {
    #[error("The profile was rejected: {reason}")]
    Validation { reason: String },

    #[error("Profile service error (status {status}): {reason}")]
    Server { status: u16, reason: String },

    #[error("The profile service did not respond within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Profile request failed: {reason}")]
    Http { reason: String },
}

/// Failures from the image-host collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadError {
    #[error("Upload rejected (status {status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Upload request failed: {reason}")]
    Http { reason: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

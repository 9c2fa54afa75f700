//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Signup core configuration.
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// Base URL of the identity provider.
    pub identity_base_url: String,
    /// API key sent with identity-provider requests.
    pub identity_api_key: Option<SecretString>,
    /// Base URL of the backend profile API.
    pub profile_base_url: String,
    /// Base URL of the image host used for avatar/cover uploads.
    pub image_base_url: String,
    /// Per-request timeout applied to every collaborator call.
    ///
    /// A call that exceeds this surfaces as the `Timeout` variant of that
    /// collaborator's error type instead of hanging.
    pub request_timeout: Duration,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            identity_base_url: "http://localhost:9099".to_string(),
            identity_api_key: None,
            profile_base_url: "http://localhost:8000".to_string(),
            image_base_url: "http://localhost:8081".to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl SignupConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized variables: `SIGNUP_IDENTITY_URL`, `SIGNUP_IDENTITY_API_KEY`,
    /// `SIGNUP_PROFILE_API_URL`, `SIGNUP_IMAGE_HOST_URL`,
    /// `SIGNUP_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SIGNUP_IDENTITY_URL") {
            config.identity_base_url = url;
        }
        if let Ok(key) = std::env::var("SIGNUP_IDENTITY_API_KEY") {
            config.identity_api_key = Some(SecretString::from(key));
        }
        if let Ok(url) = std::env::var("SIGNUP_PROFILE_API_URL") {
            config.profile_base_url = url;
        }
        if let Ok(url) = std::env::var("SIGNUP_IMAGE_HOST_URL") {
            config.image_base_url = url;
        }
        if let Ok(secs) = std::env::var("SIGNUP_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SIGNUP_REQUEST_TIMEOUT_SECS".to_string(),
                message: format!("expected a number of seconds, got {secs:?}"),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_fifteen_seconds() {
        let config = SignupConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(config.identity_api_key.is_none());
    }
}

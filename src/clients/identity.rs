//! Identity-provider collaborator — account creation and display-name
//! updates.
//!
//! The wizard core never implements authentication itself; it talks to a
//! hosted identity service through the [`IdentityProvider`] trait so tests
//! can substitute a fake.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::SignupConfig;
use crate::error::IdentityError;

/// An account that exists upstream at the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned account id.
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The identity-provider seam consumed by the submission orchestrator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account. Exactly one call per submission attempt.
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError>;

    /// Set the display name on a just-created identity. Callers treat a
    /// failure here as non-fatal — the account already exists.
    async fn update_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> Result<(), IdentityError>;
}

/// HTTP implementation of [`IdentityProvider`].
pub struct HttpIdentityProvider {
    base_url: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(config: &SignupConfig) -> Self {
        Self {
            base_url: config.identity_base_url.trim_end_matches('/').to_string(),
            api_key: config.identity_api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key.expose_secret()),
            None => builder,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    uid: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .request(self.client.post(self.api_url("v1/accounts")))
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Unknown {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::CONFLICT {
            return Err(IdentityError::AlreadyInUse {
                email: email.to_string(),
            });
        }
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            let reason = resp.text().await.unwrap_or_default();
            return Err(IdentityError::InvalidCredentialShape { reason });
        }
        if !status.is_success() {
            let reason = resp.text().await.unwrap_or_default();
            return Err(IdentityError::Unknown {
                reason: format!("account creation failed (status {status}): {reason}"),
            });
        }

        let account: AccountResponse =
            resp.json().await.map_err(|e| IdentityError::Unknown {
                reason: format!("malformed account response: {e}"),
            })?;

        Ok(Identity {
            uid: account.uid,
            email: account.email,
            display_name: account.display_name,
            created_at: account.created_at.unwrap_or_else(Utc::now),
        })
    }

    async fn update_display_name(
        &self,
        identity: &Identity,
        name: &str,
    ) -> Result<(), IdentityError> {
        let body = serde_json::json!({ "display_name": name });
        let url = self.api_url(&format!("v1/accounts/{}", identity.uid));

        let resp = self
            .request(self.client.patch(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Unknown {
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let reason = resp.text().await.unwrap_or_default();
            return Err(IdentityError::Unknown {
                reason: format!("display-name update failed (status {status}): {reason}"),
            });
        }

        Ok(())
    }
}

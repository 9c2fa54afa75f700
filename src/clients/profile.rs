//! Backend profile API collaborator — persists the registered profile.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SignupConfig;
use crate::error::ProfileApiError;

/// Which kind of account is being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// An ordering customer.
    User,
    /// A delivery rider.
    Rider,
    /// A restaurant partner.
    Partner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Rider => "rider",
            Self::Partner => "partner",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON body POSTed to the `/users` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: String,
    /// Role-specific details (vehicle fields for riders, business fields for
    /// partners). Omitted entirely for plain users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ProfilePayload {
    /// A payload for a new, active profile.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
            status: "active".to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// The persisted profile, as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
impl ProfileRecord {
    pub(crate) fn test_record(name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role: Role::User,
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }
}

/// The profile-persistence seam consumed by the submission orchestrator.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Persist a new profile. At most one call per submission attempt.
    async fn create_profile(&self, payload: &ProfilePayload)
    -> Result<ProfileRecord, ProfileApiError>;
}

/// HTTP implementation of [`ProfileApi`].
pub struct HttpProfileApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProfileApi {
    pub fn new(config: &SignupConfig) -> Self {
        Self {
            base_url: config.profile_base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn create_profile(
        &self,
        payload: &ProfilePayload,
    ) -> Result<ProfileRecord, ProfileApiError> {
        let resp = self
            .client
            .post(format!("{}/users", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(|e| ProfileApiError::Http {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            let reason = resp.text().await.unwrap_or_default();
            return Err(ProfileApiError::Validation { reason });
        }
        if status.is_server_error() {
            let reason = resp.text().await.unwrap_or_default();
            return Err(ProfileApiError::Server {
                status: status.as_u16(),
                reason,
            });
        }
        if !status.is_success() {
            let reason = resp.text().await.unwrap_or_default();
            return Err(ProfileApiError::Http {
                reason: format!("profile creation failed (status {status}): {reason}"),
            });
        }

        resp.json().await.map_err(|e| ProfileApiError::Http {
            reason: format!("malformed profile response: {e}"),
        })
    }
}

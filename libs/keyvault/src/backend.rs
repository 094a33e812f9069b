//! Trait definition for the secrets backend and its wire types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::credential::CredentialError;

/// Raw failure reported by a backend, before normalization
#[derive(Error, Debug)]
pub enum BackendError {
    /// The service answered with a non-success status
    #[error("Key Vault responded with HTTP {status}")]
    Response {
        status: u16,
        body: String,
        request_id: Option<String>,
    },

    /// The request never produced a response
    #[error("Request to Key Vault failed: {0}")]
    Transport(String),

    /// A success response could not be decoded
    #[error("Failed to decode Key Vault response: {0}")]
    Decode(String),

    /// No access token could be obtained
    #[error("Failed to acquire access token: {0}")]
    Credential(#[from] CredentialError),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

/// Secret attributes as exchanged with the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Expiry, Unix seconds on the wire
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub exp: Option<DateTime<Utc>>,
}

/// Body of a set-secret request
#[derive(Clone, Default, Serialize)]
pub struct SetSecretParameters {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<SecretAttributes>,
}

impl fmt::Debug for SetSecretParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetSecretParameters")
            .field("value", &"[REDACTED]")
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// A secret as returned by get and set
#[derive(Clone, Deserialize)]
pub struct SecretBundle {
    #[serde(default)]
    pub id: String,
    pub value: String,
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("id", &self.id)
            .field("value", &"[REDACTED]")
            .field("attributes", &self.attributes)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletedSecretBundle {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "recoveryId")]
    pub recovery_id: Option<String>,
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
}

/// Metadata of one secret in a listing; never carries the value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretProperties {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
}

/// One page of a listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretPropertiesPage {
    #[serde(default)]
    pub value: Vec<SecretProperties>,
    /// Continuation link; `None` on the last page
    #[serde(default, rename = "nextLink")]
    pub next_link: Option<String>,
}

/// Trait for secrets backends
///
/// Implement this trait to plug in a transport other than the REST backend
/// (test doubles, emulators, ...).
#[async_trait]
pub trait SecretsBackend: Send + Sync {
    async fn set_secret(
        &self,
        name: &str,
        parameters: SetSecretParameters,
    ) -> Result<SecretBundle, BackendError>;

    /// An empty `version` selects the latest version
    async fn get_secret(&self, name: &str, version: &str) -> Result<SecretBundle, BackendError>;

    async fn delete_secret(&self, name: &str) -> Result<DeletedSecretBundle, BackendError>;

    /// Fetch one page of secret metadata.
    ///
    /// Pass `None` for the first page and the previous page's `next_link`
    /// afterwards.
    async fn list_secret_properties(
        &self,
        next_link: Option<String>,
    ) -> Result<SecretPropertiesPage, BackendError>;

    /// Get the backend name (for logging)
    fn name(&self) -> &'static str;
}

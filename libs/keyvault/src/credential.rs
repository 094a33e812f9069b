//! Access token providers for the REST backend
//!
//! Token acquisition is delegated to Microsoft Entra ID through the OAuth2
//! client credentials flow, or skipped entirely with a pre-issued token.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Fallback lifetime when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Token endpoint rejected the request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Token request failed: {0}")]
    Request(String),

    #[error("Failed to parse token response: {0}")]
    Parse(String),
}

/// Source of bearer tokens for Key Vault requests
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn token(&self) -> Result<SecretString, CredentialError>;
}

/// Credential that always hands out the same, externally issued token
pub struct StaticTokenCredential {
    token: SecretString,
}

impl StaticTokenCredential {
    pub fn new(token: SecretString) -> Self {
        let trimmed = token.expose_secret().trim();
        let bare = trimmed
            .strip_prefix("Bearer ")
            .or_else(|| trimmed.strip_prefix("bearer "))
            .unwrap_or(trimmed);
        Self {
            token: SecretString::new(bare.to_string()),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self) -> Result<SecretString, CredentialError> {
        Ok(self.token.clone())
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    token: SecretString,
    expires_at: Instant,
}

impl AccessToken {
    fn is_expired(&self) -> bool {
        // Consider expired 30 seconds before actual expiry for safety
        self.expires_at
            .checked_sub(Duration::from_secs(30))
            .map(|t| Instant::now() > t)
            .unwrap_or(true)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Client credentials flow against a Microsoft Entra ID tenant
pub struct ClientSecretCredential {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    scope: String,
    /// Cached access token
    cached: Arc<RwLock<Option<AccessToken>>>,
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: SecretString,
        scope: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CredentialError> {
        Self::with_authority(
            DEFAULT_AUTHORITY,
            tenant_id,
            client_id,
            client_secret,
            scope,
            timeout,
        )
    }

    /// Same as [`ClientSecretCredential::new`] against a non-public cloud authority
    pub fn with_authority(
        authority: &str,
        tenant_id: &str,
        client_id: impl Into<String>,
        client_secret: SecretString,
        scope: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CredentialError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CredentialError::Request(e.to_string()))?;

        Ok(Self {
            http,
            token_url: token_url(authority, tenant_id),
            client_id: client_id.into(),
            client_secret,
            scope: scope.into(),
            cached: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_token(&self) -> Result<AccessToken, CredentialError> {
        debug!(client_id = %self.client_id, "Requesting Key Vault access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret().as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CredentialError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| CredentialError::Request(e.to_string()))?;
            return Err(CredentialError::Rejected { status, body });
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::Parse(e.to_string()))?;

        let expires_in = payload.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        Ok(AccessToken {
            token: SecretString::new(payload.access_token),
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        })
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn token(&self) -> Result<SecretString, CredentialError> {
        {
            let guard = self.cached.read().await;
            if let Some(ref cached) = *guard {
                if !cached.is_expired() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        {
            let mut guard = self.cached.write().await;
            *guard = Some(fresh);
        }

        debug!("Key Vault access token refreshed");
        Ok(token)
    }
}

fn token_url(authority: &str, tenant_id: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        authority.trim_end_matches('/'),
        urlencoding::encode(tenant_id)
    )
}

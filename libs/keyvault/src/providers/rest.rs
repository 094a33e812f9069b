//! Key Vault REST backend
//!
//! Talks to the secrets endpoints of the data plane API directly.
//! See: https://learn.microsoft.com/rest/api/keyvault/secrets

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::backend::{
    BackendError, DeletedSecretBundle, SecretBundle, SecretPropertiesPage, SecretsBackend,
    SetSecretParameters,
};
use crate::credential::TokenCredential;

pub const API_VERSION: &str = "7.4";
const REQUEST_ID_HEADER: &str = "x-ms-request-id";

/// Secrets backend using the Key Vault REST API
pub struct RestBackend {
    http: Client,
    vault_url: String,
    credential: Arc<dyn TokenCredential>,
}

impl RestBackend {
    pub fn new(
        vault_url: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;
        let vault_url = vault_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            vault_url,
            credential,
        })
    }

    pub fn vault_url(&self) -> &str {
        &self.vault_url
    }

    fn secrets_url(&self) -> String {
        format!("{}/secrets?api-version={}", self.vault_url, API_VERSION)
    }

    fn secret_url(&self, name: &str, version: &str) -> String {
        let mut url = format!("{}/secrets/{}", self.vault_url, urlencoding::encode(name));
        if !version.is_empty() {
            url.push('/');
            url.push_str(&urlencoding::encode(version));
        }
        url.push_str("?api-version=");
        url.push_str(API_VERSION);
        url
    }

    /// Authorize and send a request, turning non-success statuses into
    /// [`BackendError::Response`]
    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let token = self.credential.token().await?;
        let response = request.bearer_auth(token.expose_secret()).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.text().await?;
        debug!(status = status.as_u16(), request_id = ?request_id, "Key Vault request failed");

        Err(BackendError::Response {
            status: status.as_u16(),
            body,
            request_id,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SecretsBackend for RestBackend {
    async fn set_secret(
        &self,
        name: &str,
        parameters: SetSecretParameters,
    ) -> Result<SecretBundle, BackendError> {
        let request = self.http.put(self.secret_url(name, "")).json(&parameters);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn get_secret(&self, name: &str, version: &str) -> Result<SecretBundle, BackendError> {
        let request = self.http.get(self.secret_url(name, version));
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn delete_secret(&self, name: &str) -> Result<DeletedSecretBundle, BackendError> {
        let request = self.http.delete(self.secret_url(name, ""));
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn list_secret_properties(
        &self,
        next_link: Option<String>,
    ) -> Result<SecretPropertiesPage, BackendError> {
        // nextLink already carries the api-version and skip token
        let url = next_link.unwrap_or_else(|| self.secrets_url());
        let response = self.send(self.http.get(url)).await?;
        Self::decode(response).await
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}

//! Per-vault client context

use std::sync::Arc;
use tracing::info;

use crate::backend::SecretsBackend;
use crate::config::{ConfigError, KeyVaultConfig};
use crate::credential::{ClientSecretCredential, StaticTokenCredential, TokenCredential};
use crate::operations::SecretsManager;
use crate::providers::RestBackend;

/// Base URL of a vault in the public cloud
pub fn vault_url(name: &str) -> String {
    format!("https://{name}.vault.azure.net")
}

/// Client bound to one vault. Cheap to clone; read-only after construction.
#[derive(Clone)]
pub struct KeyVaultClient {
    name: String,
    url: String,
    backend: Arc<dyn SecretsBackend>,
}

impl KeyVaultClient {
    /// Create a client for the named vault over the given backend
    pub fn new(name: impl Into<String>, backend: Arc<dyn SecretsBackend>) -> Self {
        let name = name.into();
        let url = vault_url(&name);
        Self { name, url, backend }
    }

    /// Create a client whose base URL does not follow the public cloud template
    pub fn with_url(
        name: impl Into<String>,
        url: impl Into<String>,
        backend: Arc<dyn SecretsBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            backend,
        }
    }

    /// Create a client talking to the REST API with credentials from the config
    pub fn from_config(config: KeyVaultConfig) -> Result<Self, ConfigError> {
        let credential = credential_from_config(&config)?;
        let url = config.base_url();
        let backend = RestBackend::new(url.clone(), credential, config.timeout)
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        info!(vault = %config.vault_name, url = %url, "Key Vault client initialized");
        Ok(Self::with_url(config.vault_name, url, Arc::new(backend)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn backend(&self) -> &Arc<dyn SecretsBackend> {
        &self.backend
    }

    /// Secret operations against this vault
    pub fn secrets(&self) -> SecretsManager {
        SecretsManager::new(self.clone())
    }
}

fn credential_from_config(
    config: &KeyVaultConfig,
) -> Result<Arc<dyn TokenCredential>, ConfigError> {
    if let Some(token) = config.bearer_token.clone() {
        info!("Key Vault credential: static bearer token");
        return Ok(Arc::new(StaticTokenCredential::new(token)));
    }

    let (tenant_id, client_id, client_secret) = config.client_credentials()?;
    info!(tenant_id = %tenant_id, scope = %config.scope, "Key Vault credential: client secret");
    let credential = ClientSecretCredential::new(
        tenant_id,
        client_id,
        client_secret.clone(),
        config.scope.clone(),
        config.timeout,
    )
    .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
    Ok(Arc::new(credential))
}

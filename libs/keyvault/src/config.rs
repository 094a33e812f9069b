//! Configuration for the Key Vault client

use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

use crate::client::vault_url;
use crate::credential::DEFAULT_SCOPE;

const AZURE_KEYVAULT_NAME: &str = "AZURE_KEYVAULT_NAME";
const AZURE_KEYVAULT_URL: &str = "AZURE_KEYVAULT_URL";
const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
const AZURE_KEYVAULT_BEARER_TOKEN: &str = "AZURE_KEYVAULT_BEARER_TOKEN";
const AZURE_KEYVAULT_SCOPE: &str = "AZURE_KEYVAULT_SCOPE";
const AZURE_KEYVAULT_TIMEOUT_SECS: &str = "AZURE_KEYVAULT_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Configuration for a client targeting one vault
#[derive(Debug, Clone)]
pub struct KeyVaultConfig {
    /// Vault name, e.g. `contoso` for `https://contoso.vault.azure.net`
    pub vault_name: String,
    /// Explicit base URL (emulators, sovereign clouds)
    pub vault_url: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    /// Pre-issued token; takes precedence over client credentials
    pub bearer_token: Option<SecretString>,
    pub scope: String,
    pub timeout: Duration,
}

impl KeyVaultConfig {
    /// Config for a vault with defaults and no credentials
    pub fn new(vault_name: impl Into<String>) -> Self {
        Self {
            vault_name: vault_name.into(),
            vault_url: None,
            tenant_id: None,
            client_id: None,
            client_secret: None,
            bearer_token: None,
            scope: DEFAULT_SCOPE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let vault_name = var(AZURE_KEYVAULT_NAME).ok_or(ConfigError::Missing(AZURE_KEYVAULT_NAME))?;

        let timeout = match var(AZURE_KEYVAULT_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: AZURE_KEYVAULT_TIMEOUT_SECS,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: AZURE_KEYVAULT_TIMEOUT_SECS,
                        reason: e.to_string(),
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            vault_name,
            vault_url: var(AZURE_KEYVAULT_URL),
            tenant_id: var(AZURE_TENANT_ID),
            client_id: var(AZURE_CLIENT_ID),
            client_secret: var(AZURE_CLIENT_SECRET).map(SecretString::new),
            bearer_token: var(AZURE_KEYVAULT_BEARER_TOKEN).map(SecretString::new),
            scope: var(AZURE_KEYVAULT_SCOPE).unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            timeout,
        })
    }

    /// Base URL of the vault, derived from the name unless overridden
    pub fn base_url(&self) -> String {
        self.vault_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| vault_url(&self.vault_name))
    }

    /// Tenant id, client id and client secret, or the first one missing
    pub fn client_credentials(&self) -> Result<(&str, &str, &SecretString), ConfigError> {
        let tenant_id = self
            .tenant_id
            .as_deref()
            .ok_or(ConfigError::Missing(AZURE_TENANT_ID))?;
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ConfigError::Missing(AZURE_CLIENT_ID))?;
        let client_secret = self
            .client_secret
            .as_ref()
            .ok_or(ConfigError::Missing(AZURE_CLIENT_SECRET))?;
        Ok((tenant_id, client_id, client_secret))
    }
}

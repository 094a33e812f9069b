//! Secret operations over a [`KeyVaultClient`]

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::KeyVaultClient;
use crate::error::KeyVaultError;
use crate::pager::Pager;
use crate::secret::Secret;

/// Version selector for the latest version of a secret
const LATEST_VERSION: &str = "";

/// Message returned by [`KeyVaultSecrets::get`] when the secret does not exist
pub fn secret_not_found_message(name: &str, vault: &str) -> String {
    format!("A secret with name ({name}) was not found in the KeyVault ({vault})")
}

/// Operations available on the secrets of one vault
#[async_trait]
pub trait KeyVaultSecrets: Send + Sync {
    /// List every secret in the vault, metadata only.
    ///
    /// All-or-nothing: a failure on any page discards the secrets gathered
    /// from earlier pages.
    async fn list(&self) -> Result<Vec<Secret>, KeyVaultError>;

    /// Get the latest version of a secret
    async fn get(&self, name: &str) -> Result<Secret, KeyVaultError>;

    /// Create or update a secret
    async fn set(&self, secret: Secret) -> Result<(), KeyVaultError>;

    async fn delete(&self, name: &str) -> Result<(), KeyVaultError>;
}

/// [`KeyVaultSecrets`] backed by the client's secrets backend
pub struct SecretsManager {
    client: KeyVaultClient,
}

impl SecretsManager {
    pub fn new(client: KeyVaultClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &KeyVaultClient {
        &self.client
    }
}

#[async_trait]
impl KeyVaultSecrets for SecretsManager {
    async fn list(&self) -> Result<Vec<Secret>, KeyVaultError> {
        let mut secrets = Vec::new();
        let mut pager = Pager::new(self.client.backend().clone());

        while pager.more() {
            let page = pager.next_page().await.map_err(|e| {
                warn!(vault = %self.client.name(), error = %e, "Listing secrets failed");
                KeyVaultError::from(e)
            })?;
            secrets.extend(page.value.into_iter().map(Secret::from_properties));
        }

        debug!(
            vault = %self.client.name(),
            backend = self.client.backend().name(),
            count = secrets.len(),
            "Secrets listed"
        );
        Ok(secrets)
    }

    async fn get(&self, name: &str) -> Result<Secret, KeyVaultError> {
        let bundle = self
            .client
            .backend()
            .get_secret(name, LATEST_VERSION)
            .await
            .map_err(|e| {
                let err = KeyVaultError::from(e);
                if err.is_not_found() {
                    err.with_message(secret_not_found_message(name, self.client.name()))
                } else {
                    err
                }
            })?;

        debug!(vault = %self.client.name(), secret = %name, "Secret retrieved");
        Ok(Secret::from_bundle(name, bundle))
    }

    async fn set(&self, secret: Secret) -> Result<(), KeyVaultError> {
        self.client
            .backend()
            .set_secret(&secret.name, secret.to_parameters())
            .await?;

        debug!(vault = %self.client.name(), secret = %secret.name, "Secret stored");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), KeyVaultError> {
        self.client.backend().delete_secret(name).await?;

        debug!(vault = %self.client.name(), secret = %name, "Secret deleted");
        Ok(())
    }
}

//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use keyvault::{
    BackendError, DeletedSecretBundle, SecretBundle, SecretProperties, SecretPropertiesPage,
    SecretsBackend, SetSecretParameters,
};

pub const VAULT_URL: &str = "https://test-vault.vault.azure.net";

/// Install a tracing subscriber honouring RUST_LOG; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Error body as Key Vault sends it
pub fn error_response(status: u16, message: &str) -> BackendError {
    BackendError::Response {
        status,
        body: serde_json::json!({
            "error": { "code": "TestError", "message": message }
        })
        .to_string(),
        request_id: None,
    }
}

/// In-memory vault serving listings `page_size` items at a time
pub struct InMemoryBackend {
    secrets: Mutex<BTreeMap<String, SetSecretParameters>>,
    page_size: usize,
}

impl InMemoryBackend {
    pub fn new(page_size: usize) -> Self {
        Self {
            secrets: Mutex::new(BTreeMap::new()),
            page_size,
        }
    }

    fn id(name: &str) -> String {
        format!("{VAULT_URL}/secrets/{name}")
    }
}

#[async_trait]
impl SecretsBackend for InMemoryBackend {
    async fn set_secret(
        &self,
        name: &str,
        parameters: SetSecretParameters,
    ) -> Result<SecretBundle, BackendError> {
        self.secrets
            .lock()
            .unwrap()
            .insert(name.to_string(), parameters.clone());
        Ok(SecretBundle {
            id: Self::id(name),
            value: parameters.value,
            attributes: parameters.attributes,
        })
    }

    async fn get_secret(&self, name: &str, _version: &str) -> Result<SecretBundle, BackendError> {
        let secrets = self.secrets.lock().unwrap();
        let stored = secrets
            .get(name)
            .ok_or_else(|| error_response(404, &format!("Secret not found: {name}")))?;
        Ok(SecretBundle {
            id: Self::id(name),
            value: stored.value.clone(),
            attributes: stored.attributes.clone(),
        })
    }

    async fn delete_secret(&self, name: &str) -> Result<DeletedSecretBundle, BackendError> {
        let removed = self.secrets.lock().unwrap().remove(name);
        match removed {
            Some(stored) => Ok(DeletedSecretBundle {
                id: Self::id(name),
                recovery_id: None,
                attributes: stored.attributes,
            }),
            None => Err(error_response(404, &format!("Secret not found: {name}"))),
        }
    }

    async fn list_secret_properties(
        &self,
        next_link: Option<String>,
    ) -> Result<SecretPropertiesPage, BackendError> {
        let offset = next_link
            .map(|link| link.parse::<usize>().unwrap())
            .unwrap_or(0);
        let secrets = self.secrets.lock().unwrap();
        let value: Vec<SecretProperties> = secrets
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|(name, stored)| SecretProperties {
                id: Self::id(name),
                attributes: stored.attributes.clone(),
            })
            .collect();
        let next = offset + self.page_size;
        Ok(SecretPropertiesPage {
            value,
            next_link: (next < secrets.len()).then(|| next.to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

//! The domain [`Secret`] value and its mapping to and from the wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backend::{SecretAttributes, SecretBundle, SecretProperties, SetSecretParameters};

/// A named secret stored in a vault
///
/// `value` is empty for secrets obtained from a listing; listings never
/// carry secret material.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

impl Secret {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expiration: None,
        }
    }

    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Build a secret from a single-secret read. The requested name wins
    /// over whatever the bundle id says.
    pub fn from_bundle(name: &str, bundle: SecretBundle) -> Self {
        Self {
            name: name.to_string(),
            value: bundle.value,
            expiration: bundle.attributes.and_then(|attrs| attrs.exp),
        }
    }

    /// Build a secret from a listing entry
    pub fn from_properties(properties: SecretProperties) -> Self {
        Self {
            name: secret_name_from_id(&properties.id).to_string(),
            value: String::new(),
            expiration: properties.attributes.and_then(|attrs| attrs.exp),
        }
    }

    pub fn to_parameters(&self) -> SetSecretParameters {
        SetSecretParameters {
            value: self.value.clone(),
            attributes: self.expiration.map(|exp| SecretAttributes {
                enabled: None,
                exp: Some(exp),
            }),
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("value", &value)
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Last path segment of a secret identifier,
/// e.g. `https://demo.vault.azure.net/secrets/db-password` -> `db-password`
pub(crate) fn secret_name_from_id(id: &str) -> &str {
    id.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

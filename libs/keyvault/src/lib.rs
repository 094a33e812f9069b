//! # Key Vault Secrets Client
//!
//! A thin client for the secrets of an Azure Key Vault that reports every
//! failure through one small, stable error type.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 SecretsManager (list/get/set/delete)        │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │  1. Call the SecretsBackend held by KeyVaultClient  │   │
//! │  │  2. Map wire items to Secret values                 │   │
//! │  │  3. Normalize BackendError into KeyVaultError       │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Error codes: `INTERNAL_SERVER_ERROR`, `NOT_FOUND`, `UNAUTHORIZED`,
//! `INSUFFICIENT_ACCESS`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use keyvault::{KeyVaultClient, KeyVaultConfig, KeyVaultSecrets, Secret};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KeyVaultClient::from_config(KeyVaultConfig::from_env()?)?;
//!     let secrets = client.secrets();
//!
//!     secrets.set(Secret::new("db-password", "s3cr3t")).await?;
//!     let secret = secrets.get("db-password").await?;
//!
//!     for item in secrets.list().await? {
//!         println!("{} expires {:?}", item.name, item.expiration);
//!     }
//!     secrets.delete(&secret.name).await?;
//!     Ok(())
//! }
//! ```

mod backend;
mod client;
mod config;
mod credential;
mod error;
mod normalize;
mod operations;
mod pager;
mod secret;
#[cfg(test)]
mod test_server;

pub mod providers;

pub use backend::{
    BackendError, DeletedSecretBundle, SecretAttributes, SecretBundle, SecretProperties,
    SecretPropertiesPage, SecretsBackend, SetSecretParameters,
};
pub use client::{vault_url, KeyVaultClient};
pub use config::{ConfigError, KeyVaultConfig};
pub use credential::{
    ClientSecretCredential, CredentialError, StaticTokenCredential, TokenCredential,
    DEFAULT_AUTHORITY, DEFAULT_SCOPE,
};
pub use error::{ErrorCode, ErrorList, KeyVaultError};
pub use normalize::normalize;
pub use operations::{secret_not_found_message, KeyVaultSecrets, SecretsManager};
pub use pager::Pager;
pub use secret::Secret;

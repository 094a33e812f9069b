//! Secrets backend implementations

mod rest;

pub use rest::{RestBackend, API_VERSION};

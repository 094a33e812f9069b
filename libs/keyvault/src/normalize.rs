//! Mapping of raw backend failures onto [`KeyVaultError`]

use serde::Deserialize;
use tracing::debug;

use crate::backend::BackendError;
use crate::error::KeyVaultError;

/// Error envelope sent by Key Vault on non-success responses
#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default, rename = "innererror", alias = "Innererror")]
    inner_error: Option<InnerError>,
}

#[derive(Debug, Default, Deserialize)]
struct InnerError {
    #[serde(default)]
    code: String,
}

/// Normalize an optional backend failure. `None` stays `None`.
pub fn normalize(raw: Option<&BackendError>) -> Option<KeyVaultError> {
    raw.map(KeyVaultError::from)
}

impl From<&BackendError> for KeyVaultError {
    fn from(err: &BackendError) -> Self {
        let (status, message, trace_id) = match err {
            BackendError::Response {
                status,
                body,
                request_id,
            } => {
                let trace_id = request_id.clone().unwrap_or_default();
                match serde_json::from_str::<ErrorResponse>(body) {
                    Ok(envelope) => {
                        debug!(
                            status = *status,
                            code = %envelope.error.code,
                            inner_code = envelope.error.inner_error.as_ref().map(|e| e.code.as_str()),
                            "Key Vault returned an error response"
                        );
                        (Some(*status), envelope.error.message, trace_id)
                    }
                    Err(decode) => {
                        return KeyVaultError::internal_server_error(format!(
                            "Unable to decode the azure error response: {decode}"
                        ))
                        .with_trace_id(trace_id);
                    }
                }
            }
            other => (None, other.to_string(), String::new()),
        };

        let normalized = match status {
            Some(404) => KeyVaultError::not_found(""),
            Some(401) => KeyVaultError::unauthorized(message),
            Some(403) => KeyVaultError::insufficient_access(message),
            _ => KeyVaultError::internal_server_error(message),
        };
        normalized.with_trace_id(trace_id)
    }
}

impl From<BackendError> for KeyVaultError {
    fn from(err: BackendError) -> Self {
        KeyVaultError::from(&err)
    }
}

//! Error types for the generation client.

use thiserror::Error;

/// Result type alias using GeneratorError
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors from calls to the generation service.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// No API key in the configured environment variable
    #[error("API key not set: export {env_var}")]
    MissingApiKey { env_var: String },

    /// Every attempt hit the per-call deadline
    #[error("timed out after {attempts} attempts ({timeout_ms}ms per attempt)")]
    Timeout { attempts: u32, timeout_ms: u64 },

    /// The service rejected the request (4xx); never retried
    #[error("client error {status}: {body}")]
    Client { status: u16, body: String },

    /// The service kept failing (5xx) until retries ran out
    #[error("server error {status} after {attempts} attempts")]
    Server { status: u16, attempts: u32 },

    /// Connection-level failure after retries ran out
    #[error("network error after {attempts} attempts: {reason}")]
    Network { attempts: u32, reason: String },

    /// A successful response that does not look like a chat completion
    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl GeneratorError {
    /// True if the failure was a deadline rather than an error reply.
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeneratorError::Timeout { .. })
    }

    /// True for failures a later attempt could avoid.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeneratorError::Timeout { .. }
                | GeneratorError::Server { .. }
                | GeneratorError::Network { .. }
        )
    }

    /// True if the request itself was rejected.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GeneratorError::Client { .. } | GeneratorError::MissingApiKey { .. }
        )
    }

    pub fn invalid_response(reason: impl Into<String>) -> Self {
        GeneratorError::InvalidResponse {
            reason: reason.into(),
        }
    }
}

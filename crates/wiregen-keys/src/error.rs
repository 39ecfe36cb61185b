//! Error types for WireGuard key operations.

use thiserror::Error;

/// Result alias for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;

/// Errors that can occur during WireGuard key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The supplied key text is not a WireGuard key.
    #[error("supplied WireGuard key is not a valid key: {0}")]
    InvalidKeyFormat(String),

    /// Invalid base64 encoding.
    #[error("invalid base64 encoding: {0}")]
    InvalidBase64(String),

    /// Invalid key length.
    #[error("invalid key length: expected 32, got {0}")]
    InvalidKeyLength(usize),

    /// The external key tool failed or produced unusable output.
    #[error("`{command}` failed: {message}")]
    Tool {
        /// The command line that was run.
        command: String,
        /// What went wrong.
        message: String,
    },
}

use std::fmt;

use thiserror::Error;

/// Yggdrasil authentication error types
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Yggdrasil(#[from] YggdrasilError),

    #[error("Malformed error response from authentication server (HTTP {status})")]
    MalformedResponse { status: u16 },

    #[error("'{0}' is not set")]
    Precondition(MissingToken),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid profile name: '{0}'")]
    InvalidProfile(String),

    #[error("Token store is locked by another process")]
    LockTimeout,

    #[error("Token store unavailable - could not determine a storage directory")]
    StoreUnavailable,
}

/// Token a local precondition found missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingToken {
    AccessToken,
    ClientToken,
}

impl fmt::Display for MissingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken => f.write_str("access_token"),
            Self::ClientToken => f.write_str("client_token"),
        }
    }
}

/// Error reported by the Yggdrasil server: `{"error": .., "errorMessage": ..}`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{status}] {error}: '{error_message}'")]
pub struct YggdrasilError {
    pub status: u16,
    pub error: String,
    pub error_message: String,
}

pub type Result<T> = std::result::Result<T, AuthError>;

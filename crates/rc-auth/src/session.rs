use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, MissingToken, Result};

/// Yggdrasil token pair
///
/// See <https://wiki.vg/Legacy_Mojang_Authentication>. Tokens are redacted from
/// the `Debug` output so the struct can sit in tracing spans safely.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

impl AuthenticationToken {
    pub fn new(access_token: Option<String>, client_token: Option<String>) -> Self {
        Self {
            access_token,
            client_token,
        }
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Access token, or a precondition error when it is not set
    pub fn require_access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or(AuthError::Precondition(MissingToken::AccessToken))
    }

    /// Client token, or a precondition error when it is not set
    pub fn require_client_token(&self) -> Result<&str> {
        self.client_token
            .as_deref()
            .ok_or(AuthError::Precondition(MissingToken::ClientToken))
    }

    /// Drop the access token; the client token identifies the installation and is kept
    pub fn clear(&mut self) {
        self.access_token = None;
    }
}

impl fmt::Debug for AuthenticationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "<redacted>");
        f.debug_struct("AuthenticationToken")
            .field("access_token", &redact(&self.access_token))
            .field("client_token", &redact(&self.client_token))
            .finish()
    }
}

/// Where a session stands with the auth server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No access token
    Unauthenticated,
    /// Access token obtained or refreshed by this session
    Authenticated,
    /// Access token present but never confirmed, e.g. loaded from disk
    Unknown,
}

impl SessionState {
    /// Initial state for a token pair handed in from outside
    pub fn for_token(token: &AuthenticationToken) -> Self {
        if token.has_access_token() {
            Self::Unknown
        } else {
            Self::Unauthenticated
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str("unauthenticated"),
            Self::Authenticated => f.write_str("authenticated"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Agent block of the `authenticate` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentPayload {
    pub name: String,
    pub version: u32,
}

/// Yggdrasil `authenticate` request
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticateRequest {
    pub agent: AgentPayload,
    pub username: String,
    pub password: String,
}

/// Yggdrasil `refresh` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub access_token: String,
    pub client_token: String,
}

/// Yggdrasil `validate` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub access_token: String,
}

/// Yggdrasil `signout` request
#[derive(Debug, Clone, Serialize)]
pub struct SignoutRequest {
    pub username: String,
    pub password: String,
}

/// Yggdrasil `invalidate` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateRequest {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

/// Token pair returned by `authenticate` and `refresh`
///
/// The server also sends `availableProfiles`, `selectedProfile` and `user`;
/// they are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub client_token: String,
}

/// Error body sent with any non-success status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub error_message: String,
}

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Agent;
use crate::errors::{AuthError, Result, YggdrasilError};
use crate::models::*;
use crate::session::{AuthenticationToken, SessionState};
use crate::transport::{Endpoint, Transport, TransportResponse};

/// Yggdrasil session: a token pair plus the transport used to maintain it
///
/// Every operation is one blocking round trip through the transport. Nothing
/// is retried. Operations that change the token pair take `&mut self`; share a
/// session between threads behind a `Mutex`.
#[derive(Debug)]
pub struct AuthSession<T> {
    transport: T,
    agent: Agent,
    token: AuthenticationToken,
    state: SessionState,
}

impl<T: Transport> AuthSession<T> {
    /// Create a session without any tokens
    pub fn new(transport: T) -> Self {
        Self::with_token(transport, AuthenticationToken::default())
    }

    /// Create a session around an existing token pair
    ///
    /// The session starts in [`SessionState::Unknown`] when an access token is
    /// present, since nothing has confirmed it yet.
    pub fn with_token(transport: T, token: AuthenticationToken) -> Self {
        let state = SessionState::for_token(&token);
        Self {
            transport,
            agent: Agent::minecraft(),
            token,
            state,
        }
    }

    /// Use a different agent for `authenticate`
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agent = agent;
        self
    }

    pub fn token(&self) -> &AuthenticationToken {
        &self.token
    }

    pub fn into_token(self) -> AuthenticationToken {
        self.token
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Forget the local access token, e.g. after a rejected `validate`
    pub fn mark_unauthenticated(&mut self) {
        self.token.clear();
        self.state = SessionState::Unauthenticated;
    }

    /// Authenticate with username (or email) and password
    ///
    /// On success both tokens are replaced from the response. On failure the
    /// session is left untouched.
    #[instrument(skip(self, password))]
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let request = AuthenticateRequest {
            agent: AgentPayload {
                name: self.agent.name.clone(),
                version: self.agent.version,
            },
            username: username.to_string(),
            password: password.to_string(),
        };

        debug!("Authenticating with Yggdrasil");
        let response = self.post(Endpoint::Authenticate, &request)?;
        self.store_tokens(response)?;

        info!("Authenticated");
        Ok(())
    }

    /// Exchange the current token pair for a fresh one
    ///
    /// Used to keep a user logged in between runs without storing the password.
    #[instrument(skip(self))]
    pub fn refresh(&mut self) -> Result<()> {
        let request = RefreshRequest {
            access_token: self.token.require_access_token()?.to_string(),
            client_token: self.token.require_client_token()?.to_string(),
        };

        debug!("Refreshing access token");
        let response = self.post(Endpoint::Refresh, &request)?;
        self.store_tokens(response)?;

        info!("Access token refreshed");
        Ok(())
    }

    /// Check the access token with the server
    ///
    /// Does not change the session state; a rejection is returned as
    /// [`AuthError::Yggdrasil`] and the caller decides what to do with it.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<()> {
        let request = ValidateRequest {
            access_token: self.token.require_access_token()?.to_string(),
        };

        debug!("Validating access token");
        self.post(Endpoint::Validate, &request)?;
        Ok(())
    }

    /// Invalidate every token of the account, using its credentials
    ///
    /// Works on credentials only: the local token pair is neither read nor
    /// modified.
    #[instrument(skip(self, password))]
    pub fn sign_out(&self, username: &str, password: &str) -> Result<()> {
        let request = SignoutRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        debug!("Signing out");
        self.post(Endpoint::SignOut, &request)?;

        info!("Signed out");
        Ok(())
    }

    /// Invalidate the stored token pair server-side
    ///
    /// On success the local access token is cleared and the session becomes
    /// unauthenticated. The client token is kept.
    #[instrument(skip(self))]
    pub fn invalidate(&mut self) -> Result<()> {
        let request = InvalidateRequest {
            access_token: self.token.require_access_token()?.to_string(),
            client_token: self.token.client_token.clone(),
        };

        debug!("Invalidating token pair");
        self.post(Endpoint::Invalidate, &request)?;
        self.mark_unauthenticated();

        info!("Token pair invalidated");
        Ok(())
    }

    fn post<R: Serialize>(&self, endpoint: Endpoint, request: &R) -> Result<TransportResponse> {
        let body = serde_json::to_value(request)?;
        let response = self.transport.post(endpoint, &body)?;
        check_response(response)
    }

    fn store_tokens(&mut self, response: TransportResponse) -> Result<()> {
        let tokens: TokenResponse = serde_json::from_value(response.body).map_err(|e| {
            AuthError::InvalidResponse(format!("Missing token pair in response: {}", e))
        })?;

        self.token.access_token = Some(tokens.access_token);
        self.token.client_token = Some(tokens.client_token);
        self.state = SessionState::Authenticated;
        Ok(())
    }
}

/// Turn a non-success response into the matching error
///
/// Success responses pass through unchanged. A failure body needs both `error`
/// and `errorMessage` to become a [`YggdrasilError`]; anything else is
/// reported as [`AuthError::MalformedResponse`].
pub fn check_response(response: TransportResponse) -> Result<TransportResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let status = response.status;
    match serde_json::from_value::<ErrorResponse>(response.body) {
        Ok(body) => {
            let error = YggdrasilError {
                status,
                error: body.error,
                error_message: body.error_message,
            };
            warn!("Authentication server rejected request: {}", error);
            Err(error.into())
        }
        Err(_) => {
            warn!(status, "Malformed error response from authentication server");
            Err(AuthError::MalformedResponse { status })
        }
    }
}

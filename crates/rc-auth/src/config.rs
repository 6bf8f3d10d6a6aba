use std::time::Duration;
use url::Url;

use crate::errors::Result;

/// Yggdrasil authentication server
pub mod endpoints {
    pub const AUTHSERVER: &str = "https://authserver.mojang.com";
    pub const AUTHENTICATE: &str = "authenticate";
    pub const REFRESH: &str = "refresh";
    pub const VALIDATE: &str = "validate";
    pub const SIGNOUT: &str = "signout";
    pub const INVALIDATE: &str = "invalidate";
}

/// Game agent sent along with `authenticate`
pub mod agent {
    pub const NAME: &str = "Minecraft";
    pub const VERSION: u32 = 1;
}

/// Content type the authserver insists on
pub const CONTENT_TYPE: &str = "application/json";

/// User agent sent when the config does not name one
pub const DEFAULT_USER_AGENT: &str = "rauncher-net";

/// Agent identification for the `authenticate` payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    pub version: u32,
}

impl Agent {
    pub fn minecraft() -> Self {
        Self {
            name: agent::NAME.to_string(),
            version: agent::VERSION,
        }
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::minecraft()
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// Configuration for the Yggdrasil transport and session
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL every endpoint is resolved against
    pub base_url: Url,

    /// Agent reported on `authenticate`
    pub agent: Agent,

    /// HTTP client timeouts
    pub http_timeouts: HttpTimeouts,

    /// Custom user agent (optional)
    pub user_agent: Option<String>,
}

impl AuthConfig {
    /// Create config for the official Mojang authserver
    pub fn mojang() -> Self {
        Self {
            base_url: Url::parse(endpoints::AUTHSERVER).expect("valid authserver URL"),
            agent: Agent::minecraft(),
            http_timeouts: HttpTimeouts::default(),
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Create config for a self-hosted Yggdrasil-compatible server
    pub fn custom(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            ..Self::mojang()
        })
    }

    /// Full URL of an endpoint, e.g. `https://authserver.mojang.com/refresh`
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, endpoint))?)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::mojang()
    }
}

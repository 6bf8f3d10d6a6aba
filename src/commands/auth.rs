//! Yggdrasil authentication commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::debug;

use rc_auth::{
    AuthConfig, AuthSession, FileTokenStore, ReqwestTransport, SessionState, TokenStore,
};

/// Authentication against a Yggdrasil server.
#[derive(Args, Debug)]
pub struct AuthCommand {
    /// Base URL of the authentication server
    #[arg(long, env = "RAUNCHER_AUTH_SERVER", global = true)]
    pub auth_server: Option<String>,

    /// Name the token pair is stored under
    #[arg(long, default_value = "default", global = true)]
    pub profile: String,

    #[command(subcommand)]
    pub action: AuthAction,
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Log in with username (or email) and password and store the token pair
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "RAUNCHER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Trade the stored token pair for a fresh one
    Refresh,

    /// Check the stored access token with the server
    Validate,

    /// Invalidate every token of an account
    Signout {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "RAUNCHER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Invalidate the stored token pair
    Invalidate,

    /// Show what is stored for the profile
    Status,
}

pub fn handle(cmd: AuthCommand) -> Result<()> {
    let config = match &cmd.auth_server {
        Some(url) => AuthConfig::custom(url).context("Invalid auth server URL")?,
        None => AuthConfig::mojang(),
    };
    debug!("Using auth server {}", config.base_url);

    let store = FileTokenStore::new(FileTokenStore::default_storage_dir()?)
        .context("Failed to open token store")?;
    let token = store
        .load(&cmd.profile)
        .context("Failed to load stored token")?
        .unwrap_or_default();

    let transport = ReqwestTransport::new(config).context("Failed to build HTTP client")?;
    let mut session = AuthSession::with_token(transport, token);

    match cmd.action {
        AuthAction::Login { username, password } => {
            session
                .authenticate(&username, &password)
                .context("Login failed")?;
            store.save(&cmd.profile, session.token())?;
            println!("Logged in; token pair stored as '{}'", cmd.profile);
        }
        AuthAction::Refresh => {
            session.refresh().context("Refresh failed")?;
            store.save(&cmd.profile, session.token())?;
            println!("Token pair refreshed");
        }
        AuthAction::Validate => {
            session.validate().context("Access token rejected")?;
            println!("Access token is valid");
        }
        AuthAction::Signout { username, password } => {
            session
                .sign_out(&username, &password)
                .context("Sign out failed")?;
            println!("Signed out; every token of the account is now invalid");
        }
        AuthAction::Invalidate => {
            session.invalidate().context("Invalidate failed")?;
            store.save(&cmd.profile, session.token())?;
            println!("Token pair invalidated");
        }
        AuthAction::Status => print_status(&cmd.profile, &session),
    }

    Ok(())
}

fn print_status(profile: &str, session: &AuthSession<ReqwestTransport>) {
    let token = session.token();
    let state = match session.state() {
        SessionState::Unknown => "stored, not validated".to_string(),
        other => other.to_string(),
    };

    println!("Profile:      {}", profile);
    println!("State:        {}", state);
    println!("Access token: {}", present(token.access_token.is_some()));
    println!("Client token: {}", token.client_token.as_deref().unwrap_or("none"));
}

fn present(set: bool) -> &'static str {
    if set { "present" } else { "none" }
}

//! Yggdrasil authentication for Minecraft clients
//!
//! This crate manages the access/client token pair issued by the Yggdrasil
//! authentication server (`https://authserver.mojang.com`).
//!
//! # Operations
//!
//! An [`AuthSession`] owns a token pair and talks to the server through a
//! [`Transport`]:
//!
//! - `authenticate` - log in with username and password, storing the new pair
//! - `refresh` - trade the current pair for a fresh one
//! - `validate` - ask whether the access token is still usable
//! - `sign_out` - invalidate every token of an account by its credentials
//! - `invalidate` - invalidate the current pair
//!
//! Every call is a single blocking round trip. Nothing is retried; callers
//! own their retry policy.
//!
//! # Example
//!
//! ```no_run
//! use rc_auth::{AuthConfig, AuthSession, FileTokenStore, ReqwestTransport, TokenStore};
//!
//! fn main() -> rc_auth::Result<()> {
//!     let transport = ReqwestTransport::new(AuthConfig::mojang())?;
//!     let store = FileTokenStore::new(FileTokenStore::default_storage_dir()?)?;
//!
//!     // Resume a stored session, or log in from scratch
//!     let mut session = match store.load("default")? {
//!         Some(token) => {
//!             let mut session = AuthSession::with_token(transport, token);
//!             session.refresh()?;
//!             session
//!         }
//!         None => {
//!             let mut session = AuthSession::new(transport);
//!             session.authenticate("user@example.com", "password")?;
//!             session
//!         }
//!     };
//!
//!     session.validate()?;
//!     store.save("default", session.token())?;
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! [`Transport`] is a one-method trait, so sessions can be driven by an
//! in-memory double instead of the network.
//!
//! # Important Notes
//!
//! - Tokens should be stored securely and never logged; `AuthenticationToken`
//!   redacts them from its `Debug` output
//! - `sign_out` does not touch the local token pair; `invalidate` clears the
//!   local access token once the server has accepted it

pub mod client;
pub mod config;
pub mod errors;
pub mod file_store;
pub mod models;
pub mod session;
pub mod store;
pub mod transport;

// Re-export main types
pub use client::{AuthSession, check_response};
pub use config::{Agent, AuthConfig, HttpTimeouts};
pub use errors::{AuthError, MissingToken, Result, YggdrasilError};
pub use file_store::FileTokenStore;
pub use session::{AuthenticationToken, SessionState};
pub use store::{MemoryTokenStore, TokenStore};
pub use transport::{Endpoint, ReqwestTransport, Transport, TransportResponse};

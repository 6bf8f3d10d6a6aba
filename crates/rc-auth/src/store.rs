use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::errors::{AuthError, Result};
use crate::session::AuthenticationToken;

/// Trait for storing and retrieving token pairs between runs
pub trait TokenStore: Send + Sync {
    /// Load the token pair saved under `profile`
    fn load(&self, profile: &str) -> Result<Option<AuthenticationToken>>;

    /// Save a token pair under `profile`, replacing any previous one
    fn save(&self, profile: &str, token: &AuthenticationToken) -> Result<()>;

    /// Remove the token pair saved under `profile`
    fn remove(&self, profile: &str) -> Result<()>;

    /// List all stored profiles
    fn list_profiles(&self) -> Result<Vec<String>>;
}

/// In-memory token store for testing and simple use cases
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, AuthenticationToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AuthError {
    AuthError::InvalidResponse("Lock poisoned".to_string())
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, profile: &str) -> Result<Option<AuthenticationToken>> {
        Ok(self.tokens.read().map_err(poisoned)?.get(profile).cloned())
    }

    fn save(&self, profile: &str, token: &AuthenticationToken) -> Result<()> {
        self.tokens
            .write()
            .map_err(poisoned)?
            .insert(profile.to_string(), token.clone());
        Ok(())
    }

    fn remove(&self, profile: &str) -> Result<()> {
        self.tokens.write().map_err(poisoned)?.remove(profile);
        Ok(())
    }

    fn list_profiles(&self) -> Result<Vec<String>> {
        let mut profiles: Vec<String> = self.tokens.read().map_err(poisoned)?.keys().cloned().collect();
        profiles.sort();
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        let token = AuthenticationToken::new(Some("A".to_string()), Some("C".to_string()));

        assert!(store.load("default").unwrap().is_none());

        store.save("default", &token).unwrap();
        store.save("alt", &AuthenticationToken::default()).unwrap();
        assert_eq!(store.load("default").unwrap(), Some(token));
        assert_eq!(store.list_profiles().unwrap(), vec!["alt", "default"]);

        store.remove("default").unwrap();
        assert!(store.load("default").unwrap().is_none());
        assert_eq!(store.list_profiles().unwrap(), vec!["alt"]);
    }
}

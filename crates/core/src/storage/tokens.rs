//! Typed accessors for the persisted session token and display name

use std::sync::Arc;

use tracing::warn;

use super::traits::KeyValueStore;
use crate::error::Result;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "streamia_token";
/// Storage key holding the name used to label local comments
pub const DISPLAY_NAME_KEY: &str = "currentUserName";

/// The single session token of this client.
///
/// Read failures are logged and reported as "no token": a client that
/// cannot read its token is, for every practical purpose, signed out.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    pub fn is_present(&self) -> bool {
        self.token().is_some()
    }

    pub fn save(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)
    }

    /// The backing store, for sibling accessors
    pub fn backing(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_token", &self.is_present())
            .finish()
    }
}

/// Denormalized display name of the signed-in user
#[derive(Clone)]
pub struct DisplayNameStore {
    store: Arc<dyn KeyValueStore>,
}

impl DisplayNameStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Option<String> {
        match self.store.get(DISPLAY_NAME_KEY) {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read display name");
                None
            }
        }
    }

    pub fn set(&self, name: &str) -> Result<()> {
        self.store.set(DISPLAY_NAME_KEY, name)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(DISPLAY_NAME_KEY)
    }
}

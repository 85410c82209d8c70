//! Bearer-token storage abstraction
//!
//! Network code never reads ambient storage. Wherever the session token
//! actually lives (browser storage, keychain, test fixture), it is reached
//! through this trait, which also lets tests observe the 401 clearing
//! behavior.

use std::sync::{PoisonError, RwLock};

/// Get/set/clear semantics over wherever the session token lives
pub trait TokenStore: Send + Sync {
    /// Current token, if any
    fn get(&self) -> Option<String>;
    /// Store a token
    fn set(&self, token: String);
    /// Forget the token
    fn clear(&self);
}

/// In-memory store, the default for tests and embedded use
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::storage::Storage;

/// Well-known storage key holding the bearer credential.
/// The value is a plain string and must never be JSON-shaped.
pub const TOKEN_KEY: &str = "token";

/// Holder of the current bearer credential, backed by durable storage.
///
/// Exactly one credential is held at a time. Presence is necessary but not
/// sufficient for authentication: the backend is the sole authority on
/// validity, and the request pipeline reacts to rejection after the fact.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Persist the credential, overwriting any previous value.
    /// The only shape requirement is "non-empty string".
    pub fn set(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            bail!("Refusing to store an empty credential");
        }
        self.storage
            .set(TOKEN_KEY, token)
            .context("Failed to persist credential")
    }

    /// The stored credential, if any. Storage read failures are reported
    /// as absent so callers never have to handle them.
    pub fn get(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "Failed to read credential, treating as absent");
                None
            }
        }
    }

    /// Remove the credential. Idempotent, and callable from paths that must
    /// not fail (the pipeline's 401 handling), so errors are only logged.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "Failed to clear credential");
        }
    }

    /// Presence check only: no backend contact, no token inspection.
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_set_then_get() {
        let session = store();
        session.set("abc").unwrap();
        assert_eq!(session.get().as_deref(), Some("abc"));
    }

    #[test]
    fn test_set_overwrites() {
        let session = store();
        session.set("first").unwrap();
        session.set("second").unwrap();
        assert_eq!(session.get().as_deref(), Some("second"));
    }

    #[test]
    fn test_empty_credential_rejected() {
        let session = store();
        assert!(session.set("").is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let session = store();
        session.set("abc").unwrap();
        session.clear();
        assert_eq!(session.get(), None);
        // Clearing an already-empty store is not an error
        session.clear();
        assert_eq!(session.get(), None);
    }

    #[test]
    fn test_is_authenticated_tracks_presence() {
        let session = store();
        assert!(!session.is_authenticated());
        session.set("abc").unwrap();
        assert!(session.is_authenticated());
        session.clear();
        assert!(!session.is_authenticated());
    }
}

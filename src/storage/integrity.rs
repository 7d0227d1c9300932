//! Startup integrity sweep for durable storage.
//!
//! Leftover malformed entries (from a prior version or a partial write) are
//! repaired once at process start: a credential entry that looks like JSON is
//! purged (a valid credential is never JSON), and any other JSON-shaped entry
//! that fails to parse is purged. Plain-string entries are left untouched.

use tracing::{debug, warn};

use crate::auth::session::TOKEN_KEY;

use super::Storage;

/// True if the value is syntactically a JSON object or array literal.
fn is_json_shaped(value: &str) -> bool {
    value.starts_with('{') || value.starts_with('[')
}

/// Repair malformed storage entries. Best-effort: never fails, every internal
/// error is logged and swallowed.
pub fn sweep(storage: &dyn Storage) {
    // The credential entry is special: it must not look like JSON at all.
    match storage.get(TOKEN_KEY) {
        Ok(Some(token)) if is_json_shaped(&token) => {
            warn!("Corrupted credential entry found, purging");
            if let Err(e) = storage.remove(TOKEN_KEY) {
                warn!(error = %e, "Failed to purge corrupted credential entry");
            }
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Failed to read credential entry during sweep"),
    }

    let keys = match storage.keys() {
        Ok(keys) => keys,
        Err(e) => {
            warn!(error = %e, "Failed to enumerate storage entries, sweep aborted");
            return;
        }
    };

    for key in keys {
        if key == TOKEN_KEY {
            continue;
        }
        if let Err(e) = sweep_entry(storage, &key) {
            warn!(key = %key, error = %e, "Failed to sweep storage entry");
        }
    }
}

fn sweep_entry(storage: &dyn Storage, key: &str) -> anyhow::Result<()> {
    let Some(value) = storage.get(key)? else {
        return Ok(());
    };
    if is_json_shaped(&value) && serde_json::from_str::<serde_json::Value>(&value).is_err() {
        warn!(key = %key, "Corrupted storage entry found, purging");
        storage.remove(key)?;
    } else {
        debug!(key = %key, "Storage entry healthy");
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_json_shaped_credential_is_purged() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "{\"a\":1}").unwrap();

        sweep(&storage);

        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_plain_credential_survives() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "eyJhbGciOiJIUzI1NiJ9.payload.sig").unwrap();

        sweep(&storage);

        assert!(storage.get(TOKEN_KEY).unwrap().is_some());
    }

    #[test]
    fn test_unparsable_json_entry_is_purged() {
        let storage = MemoryStorage::new();
        storage.set("x", "{bad json").unwrap();

        sweep(&storage);

        assert_eq!(storage.get("x").unwrap(), None);
    }

    #[test]
    fn test_valid_json_entry_survives() {
        let storage = MemoryStorage::new();
        storage.set("prefs", "{\"theme\":\"dark\"}").unwrap();

        sweep(&storage);

        assert_eq!(
            storage.get("prefs").unwrap().as_deref(),
            Some("{\"theme\":\"dark\"}")
        );
    }

    #[test]
    fn test_plain_string_entry_untouched() {
        let storage = MemoryStorage::new();
        storage.set("y", "hello").unwrap();

        sweep(&storage);

        assert_eq!(storage.get("y").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_array_shaped_corrupt_entry_is_purged() {
        let storage = MemoryStorage::new();
        storage.set("list", "[1, 2,").unwrap();

        sweep(&storage);

        assert_eq!(storage.get("list").unwrap(), None);
    }
}

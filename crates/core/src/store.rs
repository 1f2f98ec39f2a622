// crates/core/src/store.rs
//! Write-once, read-many holder for the public configuration record.
//!
//! Lifecycle is `Unloaded -> Loaded`, exactly once. Consumers either receive
//! the record explicitly (`Arc<ConfigRecord>`) or go through [`global()`],
//! the one process-wide instance.

use std::sync::{Arc, OnceLock};

use siteconf_types::ConfigRecord;
use tracing::{info, warn};

use crate::error::{Findings, StoreError};
use crate::scan::scan_record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
}

/// Holds at most one record for its whole lifetime.
#[derive(Debug, Default)]
pub struct ConfigStore {
    cell: OnceLock<Arc<ConfigRecord>>,
}

static GLOBAL: ConfigStore = ConfigStore::new();

/// Process-wide store.
pub fn global() -> &'static ConfigStore {
    &GLOBAL
}

fn default_record() -> &'static ConfigRecord {
    static DEFAULT: OnceLock<ConfigRecord> = OnceLock::new();
    DEFAULT.get_or_init(ConfigRecord::default)
}

impl ConfigStore {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Bind `record`. Fails closed: a record with secret-like content is never
    /// bound, and a second load leaves the first record in place.
    pub fn load(&self, record: ConfigRecord) -> Result<Arc<ConfigRecord>, StoreError> {
        let findings = scan_record(&record);
        if !findings.is_empty() {
            warn!(count = findings.len(), "refusing to bind configuration record");
            return Err(StoreError::SecretContent(Findings(findings)));
        }

        let shared = Arc::new(record);
        match self.cell.set(Arc::clone(&shared)) {
            Ok(()) => {
                info!(
                    ai_provider = %shared.ai_provider(),
                    provider_subtype = %shared.provider_subtype(),
                    model = %shared.model(),
                    chat_url = %shared.chat_url(),
                    "configuration loaded"
                );
                Ok(shared)
            }
            Err(_) => Err(StoreError::AlreadyLoaded),
        }
    }

    pub fn state(&self) -> LoadState {
        if self.cell.get().is_some() {
            LoadState::Loaded
        } else {
            LoadState::Unloaded
        }
    }

    /// The bound record, or `None` before load.
    pub fn get(&self) -> Option<&ConfigRecord> {
        self.cell.get().map(Arc::as_ref)
    }

    /// Shared handle for consumers that outlive a borrow (server state, tasks).
    pub fn shared(&self) -> Option<Arc<ConfigRecord>> {
        self.cell.get().cloned()
    }

    /// Never fails: before load this resolves to the built-in defaults without
    /// changing state.
    pub fn get_or_default(&self) -> &ConfigRecord {
        self.get().unwrap_or_else(|| default_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteconf_types::{AiProvider, ChatEndpoint, ModelId, ProviderSubtype};
    use std::thread;

    fn sample(model: &str) -> ConfigRecord {
        ConfigRecord::new(
            AiProvider::Adk,
            ChatEndpoint::parse("https://chat.example.com/api/chat").unwrap(),
            ProviderSubtype::Vertex,
            ModelId::parse(model).unwrap(),
        )
    }

    #[test]
    fn test_starts_unloaded() {
        let store = ConfigStore::new();
        assert_eq!(store.state(), LoadState::Unloaded);
        assert!(store.get().is_none());
        assert!(store.shared().is_none());
    }

    #[test]
    fn test_load_transitions_once() {
        let store = ConfigStore::new();
        store.load(sample("gemini-2.5-flash")).unwrap();
        assert_eq!(store.state(), LoadState::Loaded);

        let err = store.load(sample("gemini-2.5-pro")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyLoaded));
        assert_eq!(store.get().unwrap().model().as_str(), "gemini-2.5-flash");
    }

    #[test]
    fn test_reads_are_identical() {
        let store = ConfigStore::new();
        store.load(sample("gemini-2.5-flash")).unwrap();
        let a = store.get().unwrap();
        let b = store.get().unwrap();
        assert!(std::ptr::eq(a, b));
        let shared = store.shared().unwrap();
        assert!(std::ptr::eq(a, shared.as_ref()));
    }

    #[test]
    fn test_get_or_default_does_not_load() {
        let store = ConfigStore::new();
        assert_eq!(store.get_or_default(), &ConfigRecord::default());
        assert_eq!(store.state(), LoadState::Unloaded);
    }

    #[test]
    fn test_get_or_default_on_local_store() {
        let store = ConfigStore::new();
        let before: &ConfigRecord = store.get_or_default();
        assert_eq!(before.model().as_str(), "gemini-2.5-flash");

        store.load(sample("gemini-2.0-flash")).unwrap();
        assert_eq!(store.get_or_default().model().as_str(), "gemini-2.0-flash");
    }

    #[test]
    fn test_secret_like_record_is_not_bound() {
        let store = ConfigStore::new();
        let err = store
            .load(sample("sk-abcdefghijklmnopqrstuvwxyz012345"))
            .unwrap_err();
        assert!(matches!(err, StoreError::SecretContent(_)));
        assert_eq!(store.state(), LoadState::Unloaded);
        assert!(!err.to_string().contains("abcdefghijklmnop"));
    }

    #[test]
    fn test_concurrent_loads_have_one_winner() {
        let store = Arc::new(ConfigStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.load(sample(&format!("model-{i}"))).is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.state(), LoadState::Loaded);
    }
}

// Application state module
// Immutable per-process state shared by every connection task

use std::sync::atomic::{AtomicBool, Ordering};

use super::types::Config;
use crate::store::{CacheMode, KvAssetStore};

/// Application state
///
/// Shared behind an `Arc`; nothing here is mutated on the request path,
/// so connection tasks never take a lock.
pub struct AppState {
    pub config: Config,
    pub store: KvAssetStore,

    // Cached config value for lock-free access on the hot path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, store: KvAssetStore) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            store,
            cached_access_log,
        }
    }

    /// Cache mode for store lookups: debug bypasses the snapshot.
    pub const fn cache_mode(&self) -> CacheMode {
        if self.config.assets.debug {
            CacheMode::Bypass
        } else {
            CacheMode::Default
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}

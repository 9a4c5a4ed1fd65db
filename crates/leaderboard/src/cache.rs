//! Single-slot freshness cache for the ranked achievement list.
//!
//! Readers and the writer only hold the lock while copying an `Arc` or
//! swapping the slot, never across a network call.

use std::sync::Arc;
use std::time::Duration;

use common::Achievement;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Longest TTL honored by [`FreshnessCache::store`].
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Default)]
struct Slot {
    data: Arc<Vec<Achievement>>,
    /// `None` until the first store.
    expires_at: Option<Instant>,
}

/// The last ranked result and its expiry. Replaced wholesale on every store;
/// last writer wins.
#[derive(Debug, Default)]
pub struct FreshnessCache {
    slot: RwLock<Slot>,
}

/// Thread-safe handle shared between request handlers.
pub type SharedCache = Arc<FreshnessCache>;

/// Create a new empty SharedCache.
pub fn new_shared_cache() -> SharedCache {
    Arc::new(FreshnessCache::new())
}

impl FreshnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached list if it is non-empty and strictly before its expiry.
    ///
    /// Never stored, expired, and stored-but-empty are all misses.
    pub async fn lookup(&self) -> Option<Arc<Vec<Achievement>>> {
        let slot = self.slot.read().await;
        match slot.expires_at {
            Some(expires_at) if Instant::now() < expires_at && !slot.data.is_empty() => {
                Some(Arc::clone(&slot.data))
            }
            _ => None,
        }
    }

    /// Replace the slot with `data`, fresh for `ttl` (capped at [`MAX_TTL`]).
    pub async fn store(&self, data: Vec<Achievement>, ttl: Duration) -> Arc<Vec<Achievement>> {
        let data = Arc::new(data);
        let mut slot = self.slot.write().await;
        slot.data = Arc::clone(&data);
        slot.expires_at = Some(Instant::now() + ttl.min(MAX_TTL));
        data
    }

    pub async fn expires_at(&self) -> Option<Instant> {
        self.slot.read().await.expires_at
    }
}

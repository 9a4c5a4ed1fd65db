//! Request orchestration: cache check, refresh on miss, store on success.

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{Achievement, Result};
use tracing::{debug, info, warn};

use crate::cache::SharedCache;
use crate::merge::merge_and_rank;
use crate::source::AchievementSource;

/// Serves the ranked list, refreshing it from the source when the cache misses.
///
/// Concurrent misses may each refresh; the cache keeps whichever store lands
/// last.
#[derive(Clone)]
pub struct AchievementService {
    source: Arc<dyn AchievementSource>,
    cache: SharedCache,
    ttl: Duration,
}

impl AchievementService {
    pub fn new(source: Arc<dyn AchievementSource>, cache: SharedCache, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached list on a hit, otherwise a fresh one.
    ///
    /// A failed refresh returns the error and leaves the cache as it was.
    pub async fn achievements(&self) -> Result<Arc<Vec<Achievement>>> {
        if let Some(cached) = self.cache.lookup().await {
            debug!("Cache hit ({} achievements)", cached.len());
            return Ok(cached);
        }

        debug!("Cache miss, refreshing");
        self.refresh().await
    }

    /// Fetch both datasets, merge, rank, and store the result.
    pub async fn refresh(&self) -> Result<Arc<Vec<Achievement>>> {
        let started = Instant::now();

        // Both reads run concurrently; the first failure aborts the refresh.
        let fetched = tokio::try_join!(
            self.source.fetch_schema(),
            self.source.fetch_percentages()
        );
        let (schema, percentages) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Refresh failed after {:?}: {}", started.elapsed(), e);
                return Err(e);
            }
        };

        let schema_len = schema.len();
        let matched = schema
            .iter()
            .filter(|a| percentages.contains_key(&a.api_name))
            .count();
        let ranked = merge_and_rank(schema, &percentages);
        let stored = self.cache.store(ranked, self.ttl).await;

        info!(
            "Refreshed {} achievements ({} with percentages) in {:?}, fresh for {:?}",
            schema_len,
            matched,
            started.elapsed(),
            self.ttl
        );
        Ok(stored)
    }
}

//! Achievement leaderboard crate.
//!
//! Merges schema and percentage data, ranks it, and serves it from a
//! time-bounded cache.

pub mod cache;
pub mod merge;
pub mod service;
pub mod source;

pub use cache::{new_shared_cache, FreshnessCache, SharedCache};
pub use merge::{merge_and_rank, rank_order};
pub use service::AchievementService;
pub use source::{AchievementSource, SteamSource};

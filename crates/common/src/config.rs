//! Service configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Steam Web API key. Only the schema call needs it, so an empty key is
    /// accepted at startup and fails each refresh instead.
    #[serde(default)]
    pub steam_api_key: String,

    /// Directory served for every path other than the API.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Upstream provider parameters.
    #[serde(default)]
    pub steam: SteamConfig,

    /// Cache parameters.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Which game to serve and how to reach the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamConfig {
    /// Steam app id (Terraria by default).
    #[serde(default = "default_app_id")]
    pub app_id: u32,

    /// Language tag for localized display names, e.g. "french".
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a successful refresh stays fresh, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl ServiceConfig {
    /// The API key, or `None` when unset or blank.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.steam_api_key.trim();
        (!key.is_empty()).then_some(key)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.steam.timeout_secs)
    }
}

// ── Defaults ──────────────────────────────────────────────────────────

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            steam_api_key: String::new(),
            static_dir: default_static_dir(),
            steam: SteamConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            language: default_language(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_port() -> u16 {
    8080
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

fn default_app_id() -> u32 {
    105600
}
fn default_language() -> String {
    "french".into()
}
fn default_base_url() -> String {
    "https://api.steampowered.com".into()
}
fn default_timeout_secs() -> u64 {
    12
}

fn default_ttl_secs() -> u64 {
    6 * 60 * 60
}

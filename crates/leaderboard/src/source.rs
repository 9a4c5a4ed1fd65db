//! Where refreshes get their raw data from.

use async_trait::async_trait;
use common::{Achievement, PercentageMap, Result, ServiceConfig};
use steam_client::SteamClient;

/// The two independent upstream reads a refresh needs.
#[async_trait]
pub trait AchievementSource: Send + Sync {
    /// Schema records with `global_pct` still at 0.0.
    async fn fetch_schema(&self) -> Result<Vec<Achievement>>;

    async fn fetch_percentages(&self) -> Result<PercentageMap>;
}

/// Steam Web API source for a single app.
#[derive(Debug, Clone)]
pub struct SteamSource {
    client: SteamClient,
    app_id: u32,
    language: String,
    api_key: Option<String>,
}

impl SteamSource {
    pub fn new(
        client: SteamClient,
        app_id: u32,
        language: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            app_id,
            language,
            api_key,
        }
    }

    pub fn from_config(cfg: &ServiceConfig) -> Self {
        let client = SteamClient::with_base_url(&cfg.steam.base_url, cfg.upstream_timeout());
        Self::new(
            client,
            cfg.steam.app_id,
            cfg.steam.language.clone(),
            cfg.api_key().map(str::to_string),
        )
    }

    pub fn app_id(&self) -> u32 {
        self.app_id
    }
}

#[async_trait]
impl AchievementSource for SteamSource {
    async fn fetch_schema(&self) -> Result<Vec<Achievement>> {
        self.client
            .fetch_schema(self.app_id, &self.language, self.api_key.as_deref())
            .await
    }

    async fn fetch_percentages(&self) -> Result<PercentageMap> {
        self.client.fetch_global_percentages(self.app_id).await
    }
}

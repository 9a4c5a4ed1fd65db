//! `GetSchemaForGame` payload and its conversion to [`Achievement`].

use std::collections::HashSet;

use common::{Achievement, Error};
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Response from `ISteamUserStats/GetSchemaForGame/v2`.
///
/// Games without stats come back as `{"game": {}}`, so every level defaults.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaResponse {
    #[serde(default)]
    pub game: SchemaGame,
}

#[derive(Debug, Default, Deserialize)]
pub struct SchemaGame {
    #[serde(rename = "availableGameStats", default)]
    pub available_game_stats: AvailableGameStats,
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailableGameStats {
    #[serde(default)]
    pub achievements: Vec<SchemaAchievement>,
}

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One achievement record as the provider ships it.
///
/// Hidden records often carry `null` in place of text fields.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaAchievement {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "displayName", default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(rename = "icongray", default, deserialize_with = "null_as_default")]
    pub icon_gray: String,
    /// 1 = hidden, anything else = visible.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hidden: i64,
}

impl From<SchemaAchievement> for Achievement {
    fn from(raw: SchemaAchievement) -> Self {
        Achievement {
            api_name: raw.name,
            name: raw.display_name,
            description: raw.description,
            icon: raw.icon,
            icon_gray: raw.icon_gray,
            hidden: raw.hidden == 1,
            global_pct: 0.0,
        }
    }
}

/// Decode a schema body into achievements with `global_pct` left at 0.0.
pub fn parse_schema(body: &[u8]) -> Result<Vec<Achievement>, Error> {
    let resp: SchemaResponse = serde_json::from_slice(body).map_err(|e| Error::Parse {
        payload: "schema".into(),
        message: e.to_string(),
    })?;
    Ok(normalize_schema(resp.game.available_game_stats.achievements))
}

/// Convert raw records, keeping the key invariant: records with an empty key
/// are dropped and a repeated key keeps its first record.
pub fn normalize_schema(records: Vec<SchemaAchievement>) -> Vec<Achievement> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());

    for raw in records {
        if raw.name.is_empty() {
            warn!("Dropping schema record without a key: {:?}", raw.display_name);
            continue;
        }
        if !seen.insert(raw.name.clone()) {
            warn!("Dropping duplicate schema record for {}", raw.name);
            continue;
        }
        out.push(Achievement::from(raw));
    }

    out
}

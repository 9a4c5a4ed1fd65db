//! `GetGlobalAchievementPercentagesForApp` payload and its conversion to a
//! [`PercentageMap`].

use common::{Error, PercentageMap};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PercentagesResponse {
    #[serde(rename = "achievementpercentages", default)]
    pub achievement_percentages: AchievementPercentages,
}

#[derive(Debug, Default, Deserialize)]
pub struct AchievementPercentages {
    #[serde(default)]
    pub achievements: Vec<PercentageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PercentageRecord {
    #[serde(default)]
    pub name: String,
    /// Either a number or a numeric string, depending on the endpoint version.
    #[serde(default)]
    pub percent: serde_json::Value,
}

fn parse_error(message: String) -> Error {
    Error::Parse {
        payload: "global pct".into(),
        message,
    }
}

fn percent_value(record: &PercentageRecord) -> Result<f64, Error> {
    match &record.percent {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| parse_error(format!("percent out of range for {}", record.name))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                parse_error(format!("percent {:?} is not a number for {}", s, record.name))
            }),
        serde_json::Value::Null => Ok(0.0),
        other => Err(parse_error(format!(
            "unexpected percent {} for {}",
            other, record.name
        ))),
    }
}

/// Decode a global-percentages body.
pub fn parse_percentages(body: &[u8]) -> Result<PercentageMap, Error> {
    let resp: PercentagesResponse =
        serde_json::from_slice(body).map_err(|e| parse_error(e.to_string()))?;
    normalize_percentages(resp.achievement_percentages.achievements)
}

/// Build the key -> percent map. A repeated key keeps its last value.
pub fn normalize_percentages(records: Vec<PercentageRecord>) -> Result<PercentageMap, Error> {
    let mut out = PercentageMap::with_capacity(records.len());
    for record in records {
        let pct = percent_value(&record)?;
        out.insert(record.name, pct);
    }
    Ok(out)
}

//! Domain types shared by the upstream client, the ranking engine, and the
//! HTTP surface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One achievement as served by `/api/achievements`.
///
/// Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Stable provider-assigned key. Never empty, unique within a result set.
    pub api_name: String,
    /// Localized display name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unlocked icon URL (may be empty).
    #[serde(default)]
    pub icon: String,
    /// Locked icon URL (may be empty).
    #[serde(default)]
    pub icon_gray: String,
    #[serde(default)]
    pub hidden: bool,
    /// Share of players that unlocked it, 0.0 to 100.0. 0.0 when unknown.
    #[serde(default)]
    pub global_pct: f64,
}

/// Stable key -> global unlock percentage. Built per refresh, dropped after merge.
pub type PercentageMap = HashMap<String, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_in_wire_order() {
        let a = Achievement {
            api_name: "ACH_WIN".into(),
            name: "Winner".into(),
            description: String::new(),
            icon: "on.jpg".into(),
            icon_gray: "off.jpg".into(),
            hidden: true,
            global_pct: 12.5,
        };
        let json = serde_json::to_string(&a).expect("achievement should serialize");
        assert_eq!(
            json,
            r#"{"apiName":"ACH_WIN","name":"Winner","description":"","icon":"on.jpg","iconGray":"off.jpg","hidden":true,"globalPct":12.5}"#
        );
    }
}

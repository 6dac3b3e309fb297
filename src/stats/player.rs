//! Player season record.

use serde::{Deserialize, Serialize};

/// One player's season statistics, as stored in the `players` table.
///
/// JSON field names follow the table columns (`player`, `G+A`, ...), so a
/// table export deserializes directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(default)]
pub struct Player {
    pub id: i64,
    /// Canonical player name.
    #[serde(rename = "player")]
    pub name: String,
    pub team: String,
    pub league: String,
    pub position: String,
    pub matches: i64,
    pub minutes: i64,
    pub goals: i64,
    pub assists: i64,
    pub xg: f64,
    pub xa: f64,
    pub np_goals: i64,
    pub np_xg: f64,
    pub penalties: i64,
    pub shots: i64,
    pub key_passes: i64,
    pub xg_chain: f64,
    pub xg_buildup: f64,
    pub goals_per90: f64,
    pub assists_per90: f64,
    pub xg_per90: f64,
    pub xa_per90: f64,
    #[serde(rename = "G+A")]
    pub goals_plus_assists: i64,
    #[serde(rename = "npG+A")]
    pub np_goals_plus_assists: i64,
}

impl Player {
    /// Convenience constructor for a named player with zeroed stats.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_table_column_names() {
        let json = r#"{
            "id": 7,
            "player": "Lionel Messi",
            "team": "Inter Miami",
            "league": "MLS",
            "position": "F",
            "goals": 20,
            "assists": 16,
            "G+A": 36,
            "npG+A": 33,
            "xg": 17.4
        }"#;
        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.name, "Lionel Messi");
        assert_eq!(p.goals_plus_assists, 36);
        assert_eq!(p.np_goals_plus_assists, 33);
        assert!((p.xg - 17.4).abs() < 1e-9);
        // Missing columns default to zero
        assert_eq!(p.shots, 0);
    }
}

//! Player scouting reports.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::InsightKind;
use super::parse::Fields;
use super::prompts::player_prompt;
use crate::Result;
use crate::cache::keys::player_insight_key;
use crate::stats::Player;

/// Reports requested on demand live for a day.
pub const PLAYER_INSIGHT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Reports written by the prewarm routine live for a week.
pub const PREWARM_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Scouting report plus the canonical player identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReport {
    pub player: String,
    pub team: String,
    pub league: String,
    pub position: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub player_type: String,
    pub rating: f64,
}

/// Report request for an already resolved player.
#[derive(Debug, Clone)]
pub struct PlayerInsightRequest {
    player: Player,
    ttl: Duration,
}

impl PlayerInsightRequest {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            ttl: PLAYER_INSIGHT_TTL,
        }
    }

    /// Override the cache lifetime (the prewarm routine uses [`PREWARM_TTL`]).
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn player(&self) -> &Player {
        &self.player
    }
}

impl InsightKind for PlayerInsightRequest {
    type Payload = PlayerReport;

    const KIND: &'static str = "player";

    fn cache_key(&self) -> String {
        player_insight_key(&self.player.name)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn prompt(&self) -> String {
        player_prompt(&self.player)
    }

    fn validate(&self, value: &Value) -> Result<PlayerReport> {
        let fields = Fields::of(value)?;
        Ok(PlayerReport {
            player: self.player.name.clone(),
            team: self.player.team.clone(),
            league: self.player.league.clone(),
            position: self.player.position.clone(),
            summary: fields.string("summary")?,
            strengths: fields.string_array("strengths")?,
            weaknesses: fields.string_array("weaknesses")?,
            player_type: fields.string("playerType")?,
            rating: fields.number("rating")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FutplotError;
    use serde_json::json;

    fn messi() -> Player {
        Player {
            name: "Lionel Messi".into(),
            team: "Inter Miami".into(),
            league: "MLS".into(),
            position: "F".into(),
            ..Player::default()
        }
    }

    fn valid() -> Value {
        json!({
            "summary": "Still decisive.",
            "strengths": ["Vision", "Finishing"],
            "weaknesses": ["Pressing"],
            "playerType": "False Nine",
            "rating": 9
        })
    }

    #[test]
    fn key_and_default_ttl() {
        let req = PlayerInsightRequest::new(messi());
        assert_eq!(req.cache_key(), "player:Lionel Messi");
        assert_eq!(req.ttl(), PLAYER_INSIGHT_TTL);
        assert_eq!(req.with_ttl(PREWARM_TTL).ttl(), PREWARM_TTL);
    }

    #[test]
    fn report_carries_identity_and_wire_names() {
        let report = PlayerInsightRequest::new(messi()).validate(&valid()).unwrap();
        assert_eq!(report.player, "Lionel Messi");
        assert_eq!(report.rating, 9.0);

        let wire = serde_json::to_value(&report).unwrap();
        assert_eq!(wire["playerType"], "False Nine");
        assert_eq!(wire["team"], "Inter Miami");
        assert!(wire.get("player_type").is_none());
    }

    #[test]
    fn missing_rating_is_invalid_shape() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("rating");
        let err = PlayerInsightRequest::new(messi()).validate(&value).unwrap_err();
        assert!(matches!(err, FutplotError::InvalidShape(_)));
    }

    #[test]
    fn non_string_strength_is_invalid_shape() {
        let mut value = valid();
        value["strengths"] = json!(["Vision", 42]);
        let err = PlayerInsightRequest::new(messi()).validate(&value).unwrap_err();
        assert!(matches!(err, FutplotError::InvalidShape(_)));
    }

    #[test]
    fn string_rating_is_invalid_shape() {
        let mut value = valid();
        value["rating"] = json!("9");
        let err = PlayerInsightRequest::new(messi()).validate(&value).unwrap_err();
        assert!(matches!(err, FutplotError::InvalidShape(_)));
    }
}

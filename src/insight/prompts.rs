//! Prompt builders. Pure functions of their inputs.

use crate::stats::Player;
use crate::stats::catalog::{Metric, relevant_descriptions};

/// Prompt asking for short positive/negative labels for both plot axes.
pub fn axis_prompt(x: &Metric, y: &Metric) -> String {
    let descriptions = relevant_descriptions(&[x, y]);
    format!(
        r#"You are a football analytics expert. I have a scatter plot with two axes showing player statistics.

Relevant column descriptions:
{descriptions}

X-AXIS metric: "{x_label}" (type: {x_type})
Y-AXIS metric: "{y_label}" (type: {y_type})

For each axis, provide a SHORT descriptor (3 words max, shorter if possible) for the POSITIVE end (high/right/top) and NEGATIVE end (low/left/bottom). Use intuitive football terms.

Example: For "G - xG", positive = "Clinical", negative = "Wasteful".

Respond with ONLY valid JSON: {{"xPositive":"...","xNegative":"...","yPositive":"...","yNegative":"..."}}"#,
        x_label = x.label,
        x_type = x.metric_type,
        y_label = y.label,
        y_type = y.metric_type,
    )
}

/// Prompt asking for a scouting report on one player's season.
pub fn player_prompt(player: &Player) -> String {
    format!(
        r#"You are a professional football scout. Write a concise scouting report for this player based on their season statistics.

Player: {name}
Team: {team}
League: {league}
Position: {position}

Season statistics:
- Matches: {matches}
- Minutes: {minutes}
- Goals: {goals} (non-penalty: {np_goals}, penalties: {penalties})
- Assists: {assists}
- xG: {xg:.2} (non-penalty: {np_xg:.2})
- xA: {xa:.2}
- Shots: {shots}
- Key passes: {key_passes}
- xG chain: {xg_chain:.2}
- xG buildup: {xg_buildup:.2}
- Goals per 90: {goals_per90:.2}
- Assists per 90: {assists_per90:.2}
- xG per 90: {xg_per90:.2}
- xA per 90: {xa_per90:.2}

Give a 2-3 sentence summary, 3 strengths, 3 weaknesses, a short player archetype (e.g. "Poacher", "Deep-lying Playmaker") and an overall rating from 1 to 10.

Respond with ONLY valid JSON: {{"summary":"...","strengths":["...","...","..."],"weaknesses":["...","...","..."],"playerType":"...","rating":7}}"#,
        name = player.name,
        team = player.team,
        league = player.league,
        position = player.position,
        matches = player.matches,
        minutes = player.minutes,
        goals = player.goals,
        np_goals = player.np_goals,
        penalties = player.penalties,
        assists = player.assists,
        xg = player.xg,
        np_xg = player.np_xg,
        xa = player.xa,
        shots = player.shots,
        key_passes = player.key_passes,
        xg_chain = player.xg_chain,
        xg_buildup = player.xg_buildup,
        goals_per90 = player.goals_per90,
        assists_per90 = player.assists_per90,
        xg_per90 = player.xg_per90,
        xa_per90 = player.xa_per90,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::metric;

    #[test]
    fn axis_prompt_names_both_metrics_and_shape() {
        let x = metric("goals_minus_xg").unwrap();
        let y = metric("assists_minus_xa").unwrap();
        let prompt = axis_prompt(x, y);
        assert!(prompt.contains(r#"X-AXIS metric: "G - xG" (type: differential)"#));
        assert!(prompt.contains(r#"Y-AXIS metric: "A - xA" (type: differential)"#));
        assert!(prompt.contains("- xg: "));
        assert!(prompt.contains(r#"{"xPositive":"...","xNegative":"...","yPositive":"...","yNegative":"..."}"#));
    }

    #[test]
    fn axis_prompt_is_order_sensitive() {
        let x = metric("goals_minus_xg").unwrap();
        let y = metric("xg_minus_xa").unwrap();
        assert_ne!(axis_prompt(x, y), axis_prompt(y, x));
    }

    #[test]
    fn player_prompt_includes_identity_and_rating_scale() {
        let player = Player {
            name: "Lionel Messi".into(),
            team: "Inter Miami".into(),
            league: "MLS".into(),
            goals: 20,
            xg: 17.456,
            ..Player::default()
        };
        let prompt = player_prompt(&player);
        assert!(prompt.contains("Player: Lionel Messi"));
        assert!(prompt.contains("Team: Inter Miami"));
        assert!(prompt.contains("- xG: 17.46"));
        assert!(prompt.contains("rating from 1 to 10"));
        assert!(prompt.contains(r#""playerType":"...""#));
    }
}

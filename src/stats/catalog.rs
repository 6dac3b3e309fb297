//! Statistic catalog.
//!
//! Every metric the plots can use: raw table columns and differential
//! metrics derived from them. Axis insights are requested by metric id, so
//! this catalog is what decides whether an id is known and what its
//! canonical spelling is.

use std::fmt;

use serde::Serialize;

use super::Player;
use crate::{FutplotError, Result};

/// Whether a metric is a stored column or derived from several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Raw,
    Differential,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::Raw => f.write_str("raw"),
            MetricType::Differential => f.write_str("differential"),
        }
    }
}

/// A plottable statistic.
pub struct Metric {
    /// Canonical id (also the column name for raw metrics).
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    pub metric_type: MetricType,
    /// Raw columns this metric is computed from.
    pub components: &'static [&'static str],
    value: fn(&Player) -> f64,
}

impl Metric {
    /// Compute this metric for a player.
    pub fn value(&self, player: &Player) -> f64 {
        (self.value)(player)
    }

    /// Table column backing this metric, if it is a raw column.
    pub fn column(&self) -> Option<&'static str> {
        match self.metric_type {
            MetricType::Raw => Some(self.id),
            MetricType::Differential => None,
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metric")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("metric_type", &self.metric_type)
            .finish()
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

const fn raw(id: &'static str, label: &'static str, value: fn(&Player) -> f64) -> Metric {
    Metric {
        id,
        label,
        metric_type: MetricType::Raw,
        components: &[],
        value,
    }
}

const fn diff(
    id: &'static str,
    label: &'static str,
    components: &'static [&'static str],
    value: fn(&Player) -> f64,
) -> Metric {
    Metric {
        id,
        label,
        metric_type: MetricType::Differential,
        components,
        value,
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

pub static RAW_METRICS: &[Metric] = &[
    raw("goals", "Goals", |p| p.goals as f64),
    raw("assists", "Assists", |p| p.assists as f64),
    raw("G+A", "G+A", |p| p.goals_plus_assists as f64),
    raw("npG+A", "npG+A", |p| p.np_goals_plus_assists as f64),
    raw("xg", "xG", |p| p.xg),
    raw("xa", "xA", |p| p.xa),
    raw("np_goals", "Non-Penalty Goals", |p| p.np_goals as f64),
    raw("np_xg", "Non-Penalty xG", |p| p.np_xg),
    raw("shots", "Shots", |p| p.shots as f64),
    raw("key_passes", "Key Passes", |p| p.key_passes as f64),
    raw("minutes", "Minutes", |p| p.minutes as f64),
    raw("goals_per90", "Goals per 90", |p| p.goals_per90),
    raw("assists_per90", "Assists per 90", |p| p.assists_per90),
    raw("xg_per90", "xG per 90", |p| p.xg_per90),
    raw("xa_per90", "xA per 90", |p| p.xa_per90),
    raw("xg_chain", "xG Chain", |p| p.xg_chain),
    raw("xg_buildup", "xG Buildup", |p| p.xg_buildup),
    raw("matches", "Matches", |p| p.matches as f64),
];

pub static DIFFERENTIAL_METRICS: &[Metric] = &[
    diff("shots/goals", "Shots / G", &["shots", "goals"], |p| {
        ratio(p.shots as f64, p.goals as f64)
    }),
    diff("keypasses/assists", "KP / A", &["key_passes", "assists"], |p| {
        ratio(p.key_passes as f64, p.assists as f64)
    }),
    diff(
        "minutes_per_match",
        "Minutes / Matches",
        &["minutes", "matches"],
        |p| ratio(p.minutes as f64, p.matches as f64),
    ),
    diff("goals_minus_xg", "G - xG", &["goals", "xg"], |p| {
        p.goals as f64 - p.xg
    }),
    diff("assists_minus_xa", "A - xA", &["assists", "xa"], |p| {
        p.assists as f64 - p.xa
    }),
    diff(
        "npgoals_minus_npxg",
        "npG - npxG",
        &["np_goals", "np_xg"],
        |p| p.np_goals as f64 - p.np_xg,
    ),
    diff(
        "gper90_minus_xgper90",
        "G/90 - xG/90",
        &["goals_per90", "xg_per90"],
        |p| p.goals_per90 - p.xg_per90,
    ),
    diff(
        "aper90_minus_xaper90",
        "A/90 - xA/90",
        &["assists_per90", "xa_per90"],
        |p| p.assists_per90 - p.xa_per90,
    ),
    diff(
        "npga_minus_npxgxa",
        "npG+A - npxG+xA",
        &["npG+A", "np_xg", "xa"],
        |p| p.np_goals_plus_assists as f64 - (p.np_xg + p.xa),
    ),
    diff("xg_minus_xa", "xG - xA", &["xg", "xa"], |p| p.xg - p.xa),
    diff(
        "goals_minus_assists",
        "G - A",
        &["goals", "assists"],
        |p| (p.goals - p.assists) as f64,
    ),
];

/// Short descriptions of the raw columns, used as prompt context.
static COLUMN_DESCRIPTIONS: &[(&str, &str)] = &[
    ("goals", "Total goals scored, including penalties"),
    ("assists", "Passes that directly led to a goal"),
    ("G+A", "Goals plus assists"),
    ("npG+A", "Non-penalty goals plus assists"),
    ("xg", "Expected goals: summed probability that the player's shots become goals"),
    ("xa", "Expected assists: summed xG of shots created by the player's passes"),
    ("np_goals", "Goals excluding penalties"),
    ("np_xg", "Expected goals excluding penalties"),
    ("shots", "Total shots attempted"),
    ("key_passes", "Passes that led directly to a shot"),
    ("minutes", "Minutes played"),
    ("matches", "Matches played"),
    ("goals_per90", "Goals per 90 minutes played"),
    ("assists_per90", "Assists per 90 minutes played"),
    ("xg_per90", "Expected goals per 90 minutes played"),
    ("xa_per90", "Expected assists per 90 minutes played"),
    ("xg_chain", "xG of every possession the player was involved in"),
    ("xg_buildup", "xG chain excluding the player's own shots and key passes"),
];

/// Positive/negative label pair for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisLabels {
    pub positive: &'static str,
    pub negative: &'static str,
}

/// Static labels shown while a generated insight is unavailable.
static FALLBACK_LABELS: &[(&str, AxisLabels)] = &[
    ("goals_minus_xg", AxisLabels { positive: "Clinical", negative: "Wasteful" }),
    ("assists_minus_xa", AxisLabels { positive: "Creative", negative: "Underperforming" }),
    ("npgoals_minus_npxg", AxisLabels { positive: "Clinical", negative: "Wasteful" }),
    ("gper90_minus_xgper90", AxisLabels { positive: "Clinical", negative: "Wasteful" }),
    ("aper90_minus_xaper90", AxisLabels { positive: "Creative", negative: "Underperforming" }),
    ("npga_minus_npxgxa", AxisLabels { positive: "Overperforming", negative: "Underperforming" }),
    ("xg_minus_xa", AxisLabels { positive: "Goal Threat", negative: "Playmaker" }),
    ("goals_minus_assists", AxisLabels { positive: "Scorer", negative: "Provider" }),
    ("shots/goals", AxisLabels { positive: "Inefficient", negative: "Efficient" }),
    ("keypasses/assists", AxisLabels { positive: "Unlucky", negative: "Efficient" }),
    ("minutes_per_match", AxisLabels { positive: "Starter", negative: "Rotation" }),
];

/// Every metric, raw first.
pub fn all_metrics() -> impl Iterator<Item = &'static Metric> {
    RAW_METRICS.iter().chain(DIFFERENTIAL_METRICS.iter())
}

/// Metrics offered as plot axes.
pub fn axis_metrics() -> &'static [Metric] {
    DIFFERENTIAL_METRICS
}

/// Look up a metric by its exact canonical id.
pub fn metric(id: &str) -> Option<&'static Metric> {
    all_metrics().find(|m| m.id == id)
}

/// Resolve user input to a catalog metric.
///
/// Accepts the canonical id, or a case-insensitive match on id or label
/// (`"G - xG"` and `"GOALS_MINUS_XG"` both resolve to `goals_minus_xg`).
/// Unknown or blank input is `InvalidParameter`.
pub fn resolve_metric(input: &str) -> Result<&'static Metric> {
    let needle = input.trim();
    if needle.is_empty() {
        return Err(FutplotError::InvalidParameter(
            "metric id must not be empty".to_string(),
        ));
    }
    metric(needle)
        .or_else(|| all_metrics().find(|m| m.id.eq_ignore_ascii_case(needle)))
        .or_else(|| all_metrics().find(|m| m.label.eq_ignore_ascii_case(needle)))
        .ok_or_else(|| FutplotError::InvalidParameter(format!("unknown metric: {needle}")))
}

/// Description of a raw column, if known.
pub fn column_description(column: &str) -> Option<&'static str> {
    COLUMN_DESCRIPTIONS
        .iter()
        .find(|(c, _)| *c == column)
        .map(|(_, d)| *d)
}

/// `- column: description` lines for the columns behind `metrics`,
/// deduplicated, in first-seen order.
pub fn relevant_descriptions(metrics: &[&Metric]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let mut lines = Vec::new();
    for metric in metrics {
        let columns: &[&str] = if metric.components.is_empty() {
            std::slice::from_ref(&metric.id)
        } else {
            metric.components
        };
        for column in columns {
            if seen.contains(column) {
                continue;
            }
            seen.push(*column);
            if let Some(desc) = column_description(column) {
                lines.push(format!("- {column}: {desc}"));
            }
        }
    }
    lines.join("\n")
}

/// Static fallback labels for an axis metric.
pub fn fallback_labels(id: &str) -> Option<AxisLabels> {
    FALLBACK_LABELS
        .iter()
        .find(|(m, _)| *m == id)
        .map(|(_, labels)| *labels)
}

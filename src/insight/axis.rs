//! Axis-insight labels for a scatter plot.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::InsightKind;
use super::parse::Fields;
use super::prompts::axis_prompt;
use crate::Result;
use crate::cache::keys::axis_insight_key;
use crate::stats::catalog::{Metric, resolve_metric};

/// Axis labels are stable for a week.
pub const AXIS_INSIGHT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Positive/negative descriptors for both axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisInsight {
    pub x_positive: String,
    pub x_negative: String,
    pub y_positive: String,
    pub y_negative: String,
}

/// A resolved `(x, y)` metric pair. Order matters.
#[derive(Debug, Clone, Copy)]
pub struct AxisInsightRequest {
    x: &'static Metric,
    y: &'static Metric,
}

impl AxisInsightRequest {
    /// Resolve user-supplied metric ids to catalog metrics.
    ///
    /// Either id being blank or unknown is `InvalidParameter`.
    pub fn resolve(x: &str, y: &str) -> Result<Self> {
        Ok(Self {
            x: resolve_metric(x)?,
            y: resolve_metric(y)?,
        })
    }

    pub fn x(&self) -> &'static Metric {
        self.x
    }

    pub fn y(&self) -> &'static Metric {
        self.y
    }
}

impl InsightKind for AxisInsightRequest {
    type Payload = AxisInsight;

    const KIND: &'static str = "axis";

    fn cache_key(&self) -> String {
        axis_insight_key(self.x.id, self.y.id)
    }

    fn ttl(&self) -> Duration {
        AXIS_INSIGHT_TTL
    }

    fn prompt(&self) -> String {
        axis_prompt(self.x, self.y)
    }

    fn validate(&self, value: &Value) -> Result<AxisInsight> {
        let fields = Fields::of(value)?;
        Ok(AxisInsight {
            x_positive: fields.string("xPositive")?,
            x_negative: fields.string("xNegative")?,
            y_positive: fields.string("yPositive")?,
            y_negative: fields.string("yNegative")?,
        })
    }
}

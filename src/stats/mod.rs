//! Player statistics: the season record, the metric catalog and player
//! lookup.

pub mod catalog;
pub mod directory;
pub mod player;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use catalog::{
    AxisLabels, Metric, MetricType, all_metrics, axis_metrics, fallback_labels, metric,
    resolve_metric,
};
pub use directory::{InMemoryPlayers, PlayerDirectory, best_match};
pub use player::Player;
#[cfg(feature = "postgres")]
pub use postgres::PgPlayers;

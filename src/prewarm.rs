//! Batch prewarm of player reports.
//!
//! Run after the player table is refreshed: every cached report is stale at
//! that point, so the whole `player:` namespace is flushed and the most
//! requested players are regenerated with a long TTL. Generation calls are
//! spaced out to stay under the upstream rate limit.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::cache::keys::{PLAYER_INSIGHT_NAMESPACE, namespace_prefix};
use crate::config::PrewarmConfig;
use crate::insight::{PREWARM_TTL, PlayerInsightRequest};
use crate::service::InsightService;
use crate::stats::resolve_metric;
use crate::telemetry;
use crate::{FutplotError, Result};

/// One player whose report could not be regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrewarmFailure {
    pub player: String,
    pub kind: &'static str,
    pub reason: String,
}

/// Outcome of a prewarm run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrewarmReport {
    /// Player entries deleted before regenerating.
    pub flushed: u64,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<PrewarmFailure>,
}

/// Flushes and regenerates the top players' reports.
pub struct Prewarmer {
    service: InsightService,
    top_n: usize,
    delay: Duration,
    ranking: String,
}

impl Prewarmer {
    pub fn new(service: InsightService, config: &PrewarmConfig) -> Self {
        Self {
            service,
            top_n: config.top_n,
            delay: config.delay(),
            ranking: config.ranking.clone(),
        }
    }

    /// Override how many players are regenerated.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Override the pause between generations.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Flush every player report, then regenerate the top N.
    ///
    /// Fails if the ranking metric is unknown, the cache or player directory
    /// is unavailable, or generation is misconfigured. Other per-player
    /// failures are logged and collected in the report; the run continues
    /// past them.
    #[instrument(skip(self), fields(top_n = self.top_n, ranking = %self.ranking))]
    pub async fn run(&self) -> Result<PrewarmReport> {
        // Resolve before flushing so a bad config leaves the cache intact.
        let ranking = resolve_metric(&self.ranking)?;

        let flushed = self
            .service
            .cache()
            .delete_prefix(&namespace_prefix(PLAYER_INSIGHT_NAMESPACE))
            .await?;
        info!(flushed, "flushed cached player reports");

        let players = self.service.players().top_players(ranking, self.top_n).await?;
        info!(count = players.len(), ranking = ranking.id, "prewarming top players");

        let mut report = PrewarmReport {
            flushed,
            attempted: players.len(),
            ..PrewarmReport::default()
        };

        for (i, player) in players.into_iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let name = player.name.clone();
            let team = player.team.clone();
            let request = PlayerInsightRequest::new(player).with_ttl(PREWARM_TTL);
            match self.service.generate_and_store(&request).await {
                Ok(_) => {
                    metrics::counter!(telemetry::PREWARM_PLAYERS_TOTAL, "status" => "ok")
                        .increment(1);
                    info!(player = %name, team = %team, "prewarmed");
                    report.succeeded += 1;
                }
                Err(e @ FutplotError::Configuration(_)) => return Err(e),
                Err(e) => {
                    metrics::counter!(telemetry::PREWARM_PLAYERS_TOTAL, "status" => "error")
                        .increment(1);
                    warn!(player = %name, error = %e, "prewarm failed");
                    report.failures.push(PrewarmFailure {
                        player: name,
                        kind: e.kind().as_str(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            attempted = report.attempted,
            "prewarm complete"
        );
        Ok(report)
    }
}

//! Player lookup.
//!
//! [`PlayerDirectory`] is the domain-data capability the insight service
//! consumes: fuzzy name resolution to one canonical record, and top-N
//! ranking for the prewarm routine.
//!
//! # Name resolution
//!
//! A query matches every player whose name contains it, ignoring case. When
//! several match, one is chosen deterministically:
//!
//! 1. an exact (case-insensitive) name match;
//! 2. otherwise the player with the most minutes played;
//! 3. then the shortest name;
//! 4. then alphabetical order.
//!
//! So "messi" picks "Lionel Messi" even if a reserve-team "Messias" exists,
//! and a query for a full name never resolves to a longer namesake.

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;

use super::{Metric, Player};
use crate::{FutplotError, Result};

/// Source of canonical player records.
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Resolve a fuzzy name to at most one canonical player.
    ///
    /// A blank query is `InvalidParameter`; no match is `Ok(None)`.
    async fn find_player(&self, query: &str) -> Result<Option<Player>>;

    /// The `limit` highest-ranked players by `ranking`, best first.
    async fn top_players(&self, ranking: &Metric, limit: usize) -> Result<Vec<Player>>;
}

/// Trimmed query, or `InvalidParameter` if blank.
pub(crate) fn normalize_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(FutplotError::InvalidParameter(
            "player name must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Order two candidates for `query` by the resolution policy (best first).
fn compare_candidates(query_lower: &str, a: &Player, b: &Player) -> Ordering {
    let a_exact = a.name.to_lowercase() == query_lower;
    let b_exact = b.name.to_lowercase() == query_lower;
    b_exact
        .cmp(&a_exact)
        .then_with(|| b.minutes.cmp(&a.minutes))
        .then_with(|| a.name.chars().count().cmp(&b.name.chars().count()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Pick the best match for `query` among `players`.
pub fn best_match<'a>(
    query: &str,
    players: impl IntoIterator<Item = &'a Player>,
) -> Option<&'a Player> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return None;
    }
    players
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&query_lower))
        .min_by(|a, b| compare_candidates(&query_lower, a, b))
}

/// In-memory player directory.
///
/// Useful for tests and for running against a JSON export of the table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayers {
    players: Vec<Player>,
}

impl InMemoryPlayers {
    /// Create a directory over the given players.
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Load a JSON array of player rows.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FutplotError::Data(format!("failed to read players file {path:?}: {e}"))
        })?;
        let players: Vec<Player> = serde_json::from_str(&content).map_err(|e| {
            FutplotError::Data(format!("failed to parse players file {path:?}: {e}"))
        })?;
        Ok(Self::new(players))
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[async_trait]
impl PlayerDirectory for InMemoryPlayers {
    async fn find_player(&self, query: &str) -> Result<Option<Player>> {
        let query = normalize_query(query)?;
        Ok(best_match(query, &self.players).cloned())
    }

    async fn top_players(&self, ranking: &Metric, limit: usize) -> Result<Vec<Player>> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| {
            ranking
                .value(b)
                .partial_cmp(&ranking.value(a))
                .unwrap_or(Ordering::Equal)
        });
        Ok(ranked.into_iter().take(limit).cloned().collect())
    }
}

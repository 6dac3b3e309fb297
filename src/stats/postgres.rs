//! PostgreSQL-backed player directory.
//!
//! Reads the `players` table. Name resolution runs the same policy as
//! [`best_match`](super::best_match), expressed in SQL so only one row comes
//! back.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use super::directory::{PlayerDirectory, normalize_query};
use super::{Metric, Player};
use crate::{FutplotError, Result};

/// Columns selected for a [`Player`], cast to the field types.
const PLAYER_COLUMNS: &str = r#"
    id::int8 AS id,
    player AS name,
    team, league, position,
    matches::int8 AS matches,
    minutes::int8 AS minutes,
    goals::int8 AS goals,
    assists::int8 AS assists,
    xg::float8 AS xg,
    xa::float8 AS xa,
    np_goals::int8 AS np_goals,
    np_xg::float8 AS np_xg,
    penalties::int8 AS penalties,
    shots::int8 AS shots,
    key_passes::int8 AS key_passes,
    xg_chain::float8 AS xg_chain,
    xg_buildup::float8 AS xg_buildup,
    goals_per90::float8 AS goals_per90,
    assists_per90::float8 AS assists_per90,
    xg_per90::float8 AS xg_per90,
    xa_per90::float8 AS xa_per90,
    "G+A"::int8 AS goals_plus_assists,
    "npG+A"::int8 AS np_goals_plus_assists
"#;

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn db_error(e: sqlx::Error) -> FutplotError {
    FutplotError::Data(format!("players query failed: {e}"))
}

/// Player directory over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgPlayers {
    pool: PgPool,
}

impl PgPlayers {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with the default pool settings (10 connections, 5 s acquire
    /// timeout, 30 s idle timeout).
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .map_err(|e| FutplotError::Configuration(format!("database connection failed: {e}")))?;
        info!("connected to players database");
        Ok(Self { pool })
    }
}

#[async_trait]
impl PlayerDirectory for PgPlayers {
    #[instrument(skip(self))]
    async fn find_player(&self, query: &str) -> Result<Option<Player>> {
        let query = normalize_query(query)?;
        let sql = format!(
            r#"SELECT {PLAYER_COLUMNS} FROM players
               WHERE player ILIKE $1 ESCAPE '\'
               ORDER BY (lower(player) = lower($2)) DESC,
                        minutes DESC,
                        length(player) ASC,
                        player ASC
               LIMIT 1"#
        );
        let pattern = format!("%{}%", escape_like(query));
        let found = sqlx::query_as::<_, Player>(&sql)
            .bind(pattern)
            .bind(query)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        debug!(found = found.is_some(), "player lookup");
        Ok(found)
    }

    #[instrument(skip(self, ranking), fields(ranking = ranking.id))]
    async fn top_players(&self, ranking: &Metric, limit: usize) -> Result<Vec<Player>> {
        let sql = match ranking.column() {
            // Column names come from the static catalog, never from input.
            Some(column) => format!(
                r#"SELECT {PLAYER_COLUMNS} FROM players
                   ORDER BY "{column}" DESC NULLS LAST
                   LIMIT $1"#
            ),
            None => {
                return Err(FutplotError::InvalidParameter(format!(
                    "ranking metric must be a stored column: {}",
                    ranking.id
                )));
            }
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        sqlx::query_as::<_, Player>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)
    }
}

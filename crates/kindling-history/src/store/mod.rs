//! SQLite-backed append-only history store.
//!
//! Split into focused submodules:
//! - `records` — inserting selected prompts and recency queries over them

mod records;

use kindling_core::KindlingError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Append-only prompt history backed by a single SQLite file.
///
/// There is no locking beyond SQLite's own: overlapping runs against the same
/// file must be serialized by the caller.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Open (creating if missing) the store at `db_path` and run migrations.
    pub async fn open(db_path: &str) -> Result<Self, KindlingError> {
        // Ensure parent directory exists.
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    KindlingError::History(format!("failed to create state dir: {e}"))
                })?;
            }
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| KindlingError::History(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| KindlingError::History(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("history store opened at {db_path}");

        Ok(Self { pool })
    }

    /// Total number of stored records.
    pub async fn count(&self) -> Result<i64, KindlingError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM daily_prompts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| KindlingError::History(format!("count failed: {e}")))?;
        Ok(count)
    }

    /// Close the pool, flushing the WAL.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run SQL migrations, tracking which have already been applied.
    ///
    /// A `daily_prompts` table created by earlier tooling is adopted as-is,
    /// including any values in its reserved columns.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), KindlingError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| KindlingError::History(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] = &[
            (
                "001_daily_prompts",
                include_str!("../../migrations/001_daily_prompts.sql"),
            ),
            (
                "002_recency_index",
                include_str!("../../migrations/002_recency_index.sql"),
            ),
        ];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        KindlingError::History(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| KindlingError::History(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    KindlingError::History(format!("failed to record migration {name}: {e}"))
                })?;
        }
        Ok(())
    }
}

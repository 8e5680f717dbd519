//! Inserting selected prompts and recency queries. There is no update or delete.

use chrono::{NaiveDate, SecondsFormat, Utc};
use kindling_core::{signature, Candidate, KindlingError};
use tracing::debug;

use super::HistoryStore;
use crate::record::{HistoryColumn, HistoryRecord};
use crate::window::HistoryWindow;

const RECENCY_ORDER: &str = "ORDER BY date DESC, created_at DESC, id DESC";

/// Raw `daily_prompts` row, in `SELECT` column order.
type HistoryRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<i64>,
    Option<f64>,
    Option<Vec<u8>>,
);

impl HistoryStore {
    /// Commit a selected candidate. Returns the new record id.
    pub async fn insert(&self, candidate: &Candidate) -> Result<i64, KindlingError> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let result = sqlx::query(
            "INSERT INTO daily_prompts \
             (date, topic_bucket, template_id, format, tone, constraint_label, twist, \
              prompt_text, created_at, ngram_signature, length) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(candidate.date.to_string())
        .bind(&candidate.topic_bucket)
        .bind(&candidate.template_id)
        .bind(&candidate.format)
        .bind(&candidate.tone)
        .bind(&candidate.constraint_label)
        .bind(&candidate.twist)
        .bind(candidate.prompt_text())
        .bind(&created_at)
        .bind(candidate.signature())
        .bind(candidate.length() as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| KindlingError::History(format!("insert failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(
            "history: stored #{id} for {} ({})",
            candidate.date, candidate.template_id
        );
        Ok(id)
    }

    /// The `limit` most recent records, most recent first.
    pub async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, KindlingError> {
        let sql = format!(
            "SELECT id, date, topic_bucket, template_id, format, tone, constraint_label, twist, \
             prompt_text, created_at, ngram_signature, length, engagement_score, embedding_vector \
             FROM daily_prompts {RECENCY_ORDER} LIMIT ?"
        );
        let rows: Vec<HistoryRow> = sqlx::query_as(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| KindlingError::History(format!("fetch recent failed: {e}")))?;

        rows.into_iter().map(into_record).collect()
    }

    /// Snapshot of the `size` most recent records.
    pub async fn window(&self, size: usize) -> Result<HistoryWindow, KindlingError> {
        Ok(HistoryWindow::new(self.fetch_recent(size).await?))
    }

    /// Most recent date on which `value` was selected for `column`, over all history.
    pub async fn last_used(
        &self,
        column: HistoryColumn,
        value: &str,
    ) -> Result<Option<NaiveDate>, KindlingError> {
        let sql = format!(
            "SELECT date FROM daily_prompts WHERE {} = ? {RECENCY_ORDER} LIMIT 1",
            column.column_name()
        );
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| KindlingError::History(format!("last_used({column}) failed: {e}")))?;

        row.map(|(date,)| parse_date(&date)).transpose()
    }
}

fn into_record(row: HistoryRow) -> Result<HistoryRecord, KindlingError> {
    let (
        id,
        date,
        topic_bucket,
        template_id,
        format,
        tone,
        constraint_label,
        twist,
        prompt_text,
        created_at,
        ngram_signature,
        length,
        engagement_score,
        embedding_vector,
    ) = row;

    // Rows written by other tools may lack the derived columns.
    let signature = ngram_signature.unwrap_or_else(|| signature::signature(&prompt_text));
    let length = length
        .and_then(|l| usize::try_from(l).ok())
        .unwrap_or_else(|| prompt_text.chars().count());

    Ok(HistoryRecord {
        id,
        date: parse_date(&date)?,
        topic_bucket,
        template_id,
        format,
        tone,
        constraint_label,
        twist,
        prompt_text,
        created_at,
        signature,
        length,
        engagement_score,
        embedding_vector,
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, KindlingError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| KindlingError::History(format!("invalid stored date '{value}': {e}")))
}

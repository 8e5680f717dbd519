//! History records and the dimensions they can be queried by.

use chrono::NaiveDate;
use kindling_core::Candidate;
use serde::Serialize;
use std::fmt;

/// A persisted candidate. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub topic_bucket: String,
    pub template_id: String,
    pub format: String,
    pub tone: String,
    pub constraint_label: String,
    pub twist: String,
    pub prompt_text: String,
    pub created_at: String,
    pub signature: String,
    pub length: usize,
    /// Reserved; never written by the composer.
    pub engagement_score: Option<f64>,
    /// Reserved; never written by the composer.
    pub embedding_vector: Option<Vec<u8>>,
}

/// A categorical dimension of a prompt, mapped to its history column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryColumn {
    Topic,
    Template,
    Format,
    Tone,
    Constraint,
    Twist,
}

impl HistoryColumn {
    /// SQL column name in `daily_prompts`.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Topic => "topic_bucket",
            Self::Template => "template_id",
            Self::Format => "format",
            Self::Tone => "tone",
            Self::Constraint => "constraint_label",
            Self::Twist => "twist",
        }
    }

    pub fn value_of(self, record: &HistoryRecord) -> &str {
        match self {
            Self::Topic => &record.topic_bucket,
            Self::Template => &record.template_id,
            Self::Format => &record.format,
            Self::Tone => &record.tone,
            Self::Constraint => &record.constraint_label,
            Self::Twist => &record.twist,
        }
    }

    pub fn value_of_candidate(self, candidate: &Candidate) -> &str {
        match self {
            Self::Topic => &candidate.topic_bucket,
            Self::Template => &candidate.template_id,
            Self::Format => &candidate.format,
            Self::Tone => &candidate.tone,
            Self::Constraint => &candidate.constraint_label,
            Self::Twist => &candidate.twist,
        }
    }
}

impl fmt::Display for HistoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

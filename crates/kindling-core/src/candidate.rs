//! Candidate prompts produced by the generator.

use chrono::NaiveDate;
use serde::Serialize;

use crate::signature;

/// A fully assembled prompt proposal for one day.
///
/// `length` and `signature` are derived from `prompt_text` at construction
/// and are only readable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub date: NaiveDate,
    pub topic_bucket: String,
    pub template_id: String,
    pub format: String,
    pub tone: String,
    pub constraint_label: String,
    pub twist: String,
    prompt_text: String,
    /// Soft ranking value; 0.0 until the candidate passes the hard filter.
    pub score: f64,
    length: usize,
    signature: String,
}

impl Candidate {
    /// Build a candidate, computing its length and signature from `prompt_text`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        topic_bucket: impl Into<String>,
        template_id: impl Into<String>,
        format: impl Into<String>,
        tone: impl Into<String>,
        constraint_label: impl Into<String>,
        twist: impl Into<String>,
        prompt_text: impl Into<String>,
    ) -> Self {
        let prompt_text = prompt_text.into();
        let length = prompt_text.chars().count();
        let signature = signature::signature(&prompt_text);
        Self {
            date,
            topic_bucket: topic_bucket.into(),
            template_id: template_id.into(),
            format: format.into(),
            tone: tone.into(),
            constraint_label: constraint_label.into(),
            twist: twist.into(),
            prompt_text,
            score: 0.0,
            length,
            signature,
        }
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// Character count of the prompt text.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Bonus when there is no history to be diverse against.
pub const EMPTY_HISTORY_BONUS: f64 = 0.5;
/// Bonus when the topic differs from the most recent record's topic.
pub const NEW_TOPIC_BONUS: f64 = 0.3;
/// Bonus when the format is absent from the lookback window.
pub const NEW_FORMAT_BONUS: f64 = 0.2;
/// Bonus when the tone is absent from the lookback window.
pub const NEW_TONE_BONUS: f64 = 0.1;
/// Number of most recent records consulted for format/tone diversity.
pub const DIVERSITY_LOOKBACK: usize = 7;
/// Base score for a prompt within the global maximum length.
pub const LENGTH_CONFORMANCE_SCORE: f64 = 1.0;

/// Scoring weights. Every field defaults to the constant of the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_empty_history_bonus")]
    pub empty_history_bonus: f64,
    #[serde(default = "default_new_topic_bonus")]
    pub new_topic_bonus: f64,
    #[serde(default = "default_new_format_bonus")]
    pub new_format_bonus: f64,
    #[serde(default = "default_new_tone_bonus")]
    pub new_tone_bonus: f64,
    #[serde(default = "default_diversity_lookback")]
    pub diversity_lookback: usize,
    #[serde(default = "default_length_conformance")]
    pub length_conformance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            empty_history_bonus: EMPTY_HISTORY_BONUS,
            new_topic_bonus: NEW_TOPIC_BONUS,
            new_format_bonus: NEW_FORMAT_BONUS,
            new_tone_bonus: NEW_TONE_BONUS,
            diversity_lookback: DIVERSITY_LOOKBACK,
            length_conformance: LENGTH_CONFORMANCE_SCORE,
        }
    }
}

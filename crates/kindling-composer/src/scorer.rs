//! Soft scoring of candidates that passed the hard filter.
//!
//! `score = base + diversity_bonus - max_similarity`, with every weight taken
//! from [`ScoringConfig`] (whose defaults are the named constants in
//! `kindling_core::config`).

use kindling_core::config::{Config, ScoringConfig};
use kindling_core::Candidate;
use kindling_history::{HistoryColumn, HistoryRecord, HistoryWindow};

use crate::similarity::SimilarityStrategy;

pub struct Scorer<'a> {
    weights: &'a ScoringConfig,
    max_length: usize,
    similarity: &'a dyn SimilarityStrategy,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a Config, similarity: &'a dyn SimilarityStrategy) -> Self {
        Self {
            weights: &config.scoring,
            max_length: config.length.max,
            similarity,
        }
    }

    pub fn score(&self, candidate: &Candidate, window: &HistoryWindow) -> f64 {
        let base = if candidate.length() <= self.max_length {
            self.weights.length_conformance
        } else {
            0.0
        };
        base + self.diversity_bonus(candidate, window)
            - self.similarity.max_similarity(candidate, window)
    }

    /// Reward a topic change from yesterday and a format or tone absent from the past week.
    pub fn diversity_bonus(&self, candidate: &Candidate, window: &HistoryWindow) -> f64 {
        if window.is_empty() {
            return self.weights.empty_history_bonus;
        }
        let lookback = window.recent(self.weights.diversity_lookback);

        let mut bonus = 0.0;
        if window
            .most_recent()
            .is_some_and(|last| last.topic_bucket != candidate.topic_bucket)
        {
            bonus += self.weights.new_topic_bonus;
        }
        if absent_from(HistoryColumn::Format, candidate, lookback) {
            bonus += self.weights.new_format_bonus;
        }
        if absent_from(HistoryColumn::Tone, candidate, lookback) {
            bonus += self.weights.new_tone_bonus;
        }
        bonus
    }
}

fn absent_from(column: HistoryColumn, candidate: &Candidate, records: &[HistoryRecord]) -> bool {
    let value = column.value_of_candidate(candidate);
    records.iter().all(|r| column.value_of(r) != value)
}

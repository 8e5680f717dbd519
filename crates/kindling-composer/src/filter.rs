//! Hard filter: rules a candidate must satisfy to be considered at all.

use kindling_core::config::{Config, Template};
use kindling_core::Candidate;
use kindling_history::HistoryWindow;
use std::fmt;

use crate::similarity::SimilarityStrategy;

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Length { length: usize, min: usize, max: usize },
    BannedPhrase(String),
    TooSimilar { similarity: f64, threshold: f64 },
    Sensitive,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { length, min, max } => {
                write!(f, "length {length} outside [{min}, {max}]")
            }
            Self::BannedPhrase(phrase) => write!(f, "contains banned phrase '{phrase}'"),
            Self::TooSimilar {
                similarity,
                threshold,
            } => write!(f, "similarity {similarity:.3} >= threshold {threshold:.3}"),
            Self::Sensitive => f.write_str("sensitive template not allowed"),
        }
    }
}

/// Applies the length, banned-phrase, novelty, and sensitivity rules, in that order.
pub struct HardFilter<'a> {
    config: &'a Config,
    banned: Vec<String>,
    similarity: &'a dyn SimilarityStrategy,
}

impl<'a> HardFilter<'a> {
    pub fn new(config: &'a Config, similarity: &'a dyn SimilarityStrategy) -> Self {
        Self {
            config,
            banned: config
                .banned_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            similarity,
        }
    }

    pub fn passes(&self, candidate: &Candidate, template: &Template, window: &HistoryWindow) -> bool {
        self.rejection(candidate, template, window).is_none()
    }

    /// The first rule the candidate breaks, if any.
    pub fn rejection(
        &self,
        candidate: &Candidate,
        template: &Template,
        window: &HistoryWindow,
    ) -> Option<Rejection> {
        let bounds = template.length_bounds(&self.config.length);
        if !bounds.contains(candidate.length()) {
            return Some(Rejection::Length {
                length: candidate.length(),
                min: bounds.min,
                max: bounds.max,
            });
        }

        let lowered = candidate.prompt_text().to_lowercase();
        if let Some(phrase) = self.banned.iter().find(|p| lowered.contains(p.as_str())) {
            return Some(Rejection::BannedPhrase(phrase.clone()));
        }

        let threshold = self.config.similarity.threshold;
        let similarity = self.similarity.max_similarity(candidate, window);
        if similarity >= threshold {
            return Some(Rejection::TooSimilar {
                similarity,
                threshold,
            });
        }

        if template.is_sensitive() && !self.config.flags.allow_sensitive {
            return Some(Rejection::Sensitive);
        }
        None
    }
}

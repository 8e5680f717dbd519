//! Pluggable novelty measures between a candidate and recent history.

use kindling_core::config::SimilarityMode;
use kindling_core::signature::{jaccard, parse_signature};
use kindling_core::Candidate;
use kindling_history::{HistoryRecord, HistoryWindow};
use std::sync::Once;
use tracing::warn;

static EMBEDDING_FALLBACK: Once = Once::new();

/// A similarity measure in `[0, 1]` between a candidate and a stored record.
pub trait SimilarityStrategy: Send + Sync {
    /// Human-readable strategy name.
    fn name(&self) -> &str;

    fn similarity(&self, candidate: &Candidate, record: &HistoryRecord) -> f64;

    /// Greatest similarity against any record in the window; 0.0 if it is empty.
    fn max_similarity(&self, candidate: &Candidate, window: &HistoryWindow) -> f64 {
        window
            .records()
            .iter()
            .map(|r| self.similarity(candidate, r))
            .fold(0.0, f64::max)
    }
}

/// Jaccard similarity over 3-character shingle signatures.
pub struct NgramSimilarity;

impl SimilarityStrategy for NgramSimilarity {
    fn name(&self) -> &str {
        "ngram"
    }

    fn similarity(&self, candidate: &Candidate, record: &HistoryRecord) -> f64 {
        jaccard(
            &parse_signature(candidate.signature()),
            &parse_signature(&record.signature),
        )
    }

    fn max_similarity(&self, candidate: &Candidate, window: &HistoryWindow) -> f64 {
        let own = parse_signature(candidate.signature());
        window
            .records()
            .iter()
            .map(|r| jaccard(&own, &parse_signature(&r.signature)))
            .fold(0.0, f64::max)
    }
}

/// Resolve the configured mode to a strategy.
///
/// No embedding backend ships with the composer, so `Embedding` resolves to
/// n-gram similarity. The fallback is logged once per process.
pub fn strategy_for(mode: SimilarityMode) -> Box<dyn SimilarityStrategy> {
    match mode {
        SimilarityMode::Ngram => Box::new(NgramSimilarity),
        SimilarityMode::Embedding => {
            EMBEDDING_FALLBACK.call_once(|| {
                warn!("similarity mode 'embedding' has no backend; falling back to n-gram similarity");
            });
            Box::new(NgramSimilarity)
        }
    }
}

//! # kindling-composer
//!
//! Builds one novel daily prompt from the configured pools, the recent
//! history window, and a date-seeded random stream.

pub mod filter;
pub mod generator;
pub mod render;
pub mod rng;
pub mod sampler;
pub mod scorer;
pub mod select;
pub mod similarity;

#[cfg(test)]
mod tests;

pub use filter::{HardFilter, Rejection};
pub use generator::{Generator, ATTEMPTS_PER_CANDIDATE};
pub use scorer::Scorer;
pub use select::select;
pub use similarity::{strategy_for, NgramSimilarity, SimilarityStrategy};

use chrono::NaiveDate;
use kindling_core::{Candidate, Config, KindlingError};
use kindling_history::HistoryStore;
use tracing::{debug, info};

/// Ties a validated config to a history store.
pub struct Composer {
    config: Config,
    store: HistoryStore,
    similarity: Box<dyn SimilarityStrategy>,
}

impl Composer {
    pub fn new(config: Config, store: HistoryStore) -> Self {
        let similarity = strategy_for(config.similarity.mode);
        debug!("composer using {} similarity", similarity.name());
        Self {
            config,
            store,
            similarity,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Generate scored candidates for `date` without selecting or persisting.
    ///
    /// `count` overrides `generation.candidate_count` for this call only.
    pub async fn generate_candidates(
        &self,
        date: NaiveDate,
        count: Option<usize>,
    ) -> Result<Vec<Candidate>, KindlingError> {
        let desired = count.unwrap_or(self.config.generation.candidate_count);
        if desired == 0 {
            return Err(KindlingError::Config(
                "candidate count must be at least 1".into(),
            ));
        }
        let window = self
            .store
            .window(self.config.similarity.history_size)
            .await?;
        debug!("history window holds {} records for {date}", window.len());
        let mut rng = rng::build(&self.config.generation, date);
        Generator::new(&self.config, self.similarity.as_ref()).generate(
            &mut rng,
            &window,
            desired,
            date,
        )
    }

    /// Pick the day's prompt but leave history untouched.
    pub async fn preview(
        &self,
        date: NaiveDate,
        count: Option<usize>,
    ) -> Result<Candidate, KindlingError> {
        select(self.generate_candidates(date, count).await?)
    }

    /// Pick the day's prompt and record it in history.
    pub async fn compose(
        &self,
        date: NaiveDate,
        count: Option<usize>,
    ) -> Result<Candidate, KindlingError> {
        let chosen = self.preview(date, count).await?;
        let id = self.persist(&chosen).await?;
        info!(
            "composed prompt #{id} for {date}: template={} topic={} score={:.3}",
            chosen.template_id, chosen.topic_bucket, chosen.score
        );
        Ok(chosen)
    }

    pub async fn persist(&self, candidate: &Candidate) -> Result<i64, KindlingError> {
        self.store.insert(candidate).await
    }
}

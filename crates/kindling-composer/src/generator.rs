//! Candidate generation: sample, render, hard-filter, score.

use chrono::NaiveDate;
use kindling_core::config::{Config, PoolEntry, Template};
use kindling_core::{Candidate, KindlingError};
use kindling_history::{HistoryColumn, HistoryWindow};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

use crate::filter::HardFilter;
use crate::render;
use crate::sampler::{is_cooling_down, sample_with_cooldown, weighted_choice};
use crate::scorer::Scorer;
use crate::similarity::SimilarityStrategy;

/// Attempts allowed per requested candidate before giving up.
pub const ATTEMPTS_PER_CANDIDATE: usize = 10;

pub struct Generator<'a> {
    config: &'a Config,
    filter: HardFilter<'a>,
    scorer: Scorer<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config, similarity: &'a dyn SimilarityStrategy) -> Self {
        Self {
            config,
            filter: HardFilter::new(config, similarity),
            scorer: Scorer::new(config, similarity),
        }
    }

    /// Collect up to `desired` scored candidates that pass the hard filter.
    ///
    /// Stops after `desired * ATTEMPTS_PER_CANDIDATE` attempts and fails with
    /// `GenerationExhausted` if nothing survived by then.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        window: &HistoryWindow,
        desired: usize,
        date: NaiveDate,
    ) -> Result<Vec<Candidate>, KindlingError> {
        let max_attempts = desired.saturating_mul(ATTEMPTS_PER_CANDIDATE);
        let mut survivors = Vec::with_capacity(desired);
        let mut attempts = 0;

        while survivors.len() < desired && attempts < max_attempts {
            attempts += 1;
            let Some((template, mut candidate)) = self.attempt(rng, window, date)? else {
                continue;
            };
            if let Some(reason) = self.filter.rejection(&candidate, template, window) {
                debug!("attempt {attempts}: rejected {}: {reason}", candidate.template_id);
                continue;
            }
            candidate.score = self.scorer.score(&candidate, window);
            survivors.push(candidate);
        }

        if survivors.is_empty() {
            return Err(KindlingError::GenerationExhausted { attempts });
        }
        debug!(
            "generated {} candidates for {date} in {attempts} attempts",
            survivors.len()
        );
        Ok(survivors)
    }

    /// One sampling pass. `None` when no template is eligible for the drawn topic.
    fn attempt<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        window: &HistoryWindow,
        date: NaiveDate,
    ) -> Result<Option<(&'a Template, Candidate)>, KindlingError> {
        let cfg = self.config;
        let cooldowns = &cfg.cooldowns;

        let topic = sample_with_cooldown(
            rng,
            &pool_weights(&cfg.topics),
            HistoryColumn::Topic,
            cooldowns.topic_days,
            date,
            window,
        )?;

        let Some(template) = self.choose_template(rng, topic, window, date) else {
            debug!("no eligible template for topic '{topic}' on {date}");
            return Ok(None);
        };

        let tone = sample_with_cooldown(
            rng,
            &self.tone_weights(template),
            HistoryColumn::Tone,
            cooldowns.tone_days,
            date,
            window,
        )?;
        let constraint = sample_with_cooldown(
            rng,
            &pool_weights(&cfg.constraints),
            HistoryColumn::Constraint,
            cooldowns.constraint_days,
            date,
            window,
        )?;
        let twist = sample_with_cooldown(
            rng,
            &pool_weights(&cfg.twists),
            HistoryColumn::Twist,
            cooldowns.twist_days,
            date,
            window,
        )?;

        let base = render::fill_template(template, rng)?;
        let prompt_text = render::assemble(
            &base,
            &[
                cfg.constraints.get(constraint).and_then(PoolEntry::text),
                cfg.twists.get(twist).and_then(PoolEntry::text),
            ],
        );

        let candidate = Candidate::new(
            date,
            topic,
            &template.id,
            &template.format,
            tone,
            constraint,
            twist,
            prompt_text,
        );
        Ok(Some((template, candidate)))
    }

    /// Weighted draw over templates that pair with `topic`, are permitted, and are off cooldown.
    fn choose_template<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        topic: &str,
        window: &HistoryWindow,
        date: NaiveDate,
    ) -> Option<&'a Template> {
        let cfg = self.config;
        let eligible: Vec<(&'a Template, f64)> = cfg
            .templates
            .iter()
            .filter(|t| t.allows_topic(topic))
            .filter(|t| cfg.flags.allow_sensitive || !t.is_sensitive())
            .filter(|t| {
                !is_cooling_down(
                    window.last_used(HistoryColumn::Template, &t.id),
                    date,
                    t.cooldown_days(cfg.cooldowns.template_days),
                )
            })
            .map(|t| (t, t.weight))
            .collect();
        weighted_choice(rng, &eligible).copied()
    }

    /// Tone pool restricted to the template's compatible tones, if it names any.
    fn tone_weights(&self, template: &Template) -> Vec<(&'a str, f64)> {
        let tones = &self.config.tones;
        if template.compatible_tones.is_empty() {
            return pool_weights(tones);
        }
        tones
            .iter()
            .filter(|(key, _)| template.compatible_tones.contains(*key))
            .map(|(key, entry)| (key.as_str(), entry.weight()))
            .collect()
    }
}

fn pool_weights(pool: &BTreeMap<String, PoolEntry>) -> Vec<(&str, f64)> {
    pool.iter()
        .map(|(key, entry)| (key.as_str(), entry.weight()))
        .collect()
}

mod defaults;
mod pools;
mod scoring;
mod templates;


pub use pools::*;
pub use scoring::*;
pub use templates::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

use crate::error::KindlingError;
use defaults::*;

/// Top-level composer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub length: LengthConfig,
    #[serde(default)]
    pub cooldowns: CooldownConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub flags: FlagsConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub banned_phrases: Vec<String>,
    pub topics: BTreeMap<String, PoolEntry>,
    pub tones: BTreeMap<String, PoolEntry>,
    pub constraints: BTreeMap<String, PoolEntry>,
    pub twists: BTreeMap<String, PoolEntry>,
    pub templates: Vec<Template>,
}

/// Candidate generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Surviving candidates to collect before selection.
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,
    /// Seed the RNG from the target date so reruns are reproducible.
    #[serde(default = "default_true")]
    pub deterministic_by_date: bool,
    /// Explicit seed; always wins over the date seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            candidate_count: default_candidate_count(),
            deterministic_by_date: true,
            seed: None,
        }
    }
}

/// Inclusive prompt length bounds, in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthConfig {
    #[serde(default = "default_min_length")]
    pub min: usize,
    #[serde(default = "default_max_length")]
    pub max: usize,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            min: default_min_length(),
            max: default_max_length(),
        }
    }
}

impl LengthConfig {
    pub fn contains(&self, length: usize) -> bool {
        (self.min..=self.max).contains(&length)
    }
}

/// Per-dimension cooldowns, in days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    #[serde(default = "default_template_days")]
    pub template_days: u32,
    #[serde(default = "default_topic_days")]
    pub topic_days: u32,
    #[serde(default = "default_tone_days")]
    pub tone_days: u32,
    #[serde(default = "default_constraint_days")]
    pub constraint_days: u32,
    #[serde(default = "default_twist_days")]
    pub twist_days: u32,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            template_days: default_template_days(),
            topic_days: default_topic_days(),
            tone_days: default_tone_days(),
            constraint_days: default_constraint_days(),
            twist_days: default_twist_days(),
        }
    }
}

/// Similarity strategy selector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMode {
    /// Jaccard over character shingles (default).
    #[default]
    Ngram,
    /// Embedding vectors. Falls back to `Ngram` when no backend is available.
    Embedding,
}

/// Novelty settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    #[serde(default)]
    pub mode: SimilarityMode,
    /// Candidates at or above this similarity to any recent record are rejected.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Number of most recent records forming the working history window.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            mode: SimilarityMode::default(),
            threshold: default_threshold(),
            history_size: default_history_size(),
        }
    }
}

/// Feature flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagsConfig {
    #[serde(default)]
    pub allow_sensitive: bool,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, KindlingError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| KindlingError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-references and value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), KindlingError> {
        validate_pool("topics", &self.topics)?;
        validate_pool("tones", &self.tones)?;
        validate_pool("constraints", &self.constraints)?;
        validate_pool("twists", &self.twists)?;

        if self.generation.candidate_count == 0 {
            return Err(invalid("generation.candidate_count must be at least 1"));
        }
        if self.similarity.history_size == 0 {
            return Err(invalid("similarity.history_size must be at least 1"));
        }
        let threshold = self.similarity.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(invalid(format!(
                "similarity.threshold must be in (0, 1], got {threshold}"
            )));
        }
        if self.length.min > self.length.max {
            return Err(invalid(format!(
                "length.min ({}) exceeds length.max ({})",
                self.length.min, self.length.max
            )));
        }
        if self.banned_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid("banned_phrases must not contain blank entries"));
        }

        if self.templates.is_empty() {
            return Err(invalid("at least one template is required"));
        }
        let mut seen = HashSet::new();
        for tpl in &self.templates {
            if !seen.insert(tpl.id.as_str()) {
                return Err(invalid(format!("duplicate template id '{}'", tpl.id)));
            }
            if tpl.allowed_topics.is_empty() {
                return Err(invalid(format!(
                    "template '{}' has no allowed_topics",
                    tpl.id
                )));
            }
            if let Some(topic) = tpl
                .allowed_topics
                .iter()
                .find(|t| !self.topics.contains_key(*t))
            {
                return Err(invalid(format!(
                    "template '{}' references undeclared topic '{topic}'",
                    tpl.id
                )));
            }
            if let Some(tone) = tpl
                .compatible_tones
                .iter()
                .find(|t| !self.tones.contains_key(*t))
            {
                return Err(invalid(format!(
                    "template '{}' references undeclared tone '{tone}'",
                    tpl.id
                )));
            }
            if !tpl.compatible_tones.is_empty()
                && tpl
                    .compatible_tones
                    .iter()
                    .all(|t| self.tones.get(t).map_or(true, |e| e.weight() <= 0.0))
            {
                return Err(invalid(format!(
                    "template '{}' has no compatible tone with a positive weight",
                    tpl.id
                )));
            }
            if !tpl.weight.is_finite() || tpl.weight < 0.0 {
                return Err(invalid(format!(
                    "template '{}' has invalid weight {}",
                    tpl.id, tpl.weight
                )));
            }
            let bounds = tpl.length_bounds(&self.length);
            if bounds.min > bounds.max {
                return Err(invalid(format!(
                    "template '{}' length bounds min ({}) exceed max ({})",
                    tpl.id, bounds.min, bounds.max
                )));
            }
        }
        Ok(())
    }
}

fn validate_pool(name: &str, pool: &BTreeMap<String, PoolEntry>) -> Result<(), KindlingError> {
    if pool.is_empty() {
        return Err(invalid(format!("'{name}' must declare at least one entry")));
    }
    if let Some((key, entry)) = pool
        .iter()
        .find(|(_, e)| !e.weight().is_finite() || e.weight() < 0.0)
    {
        return Err(invalid(format!(
            "{name}.{key} has invalid weight {}",
            entry.weight()
        )));
    }
    if pool.values().all(|e| e.weight() <= 0.0) {
        return Err(invalid(format!(
            "'{name}' needs at least one positive weight"
        )));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> KindlingError {
    KindlingError::Config(msg.into())
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load and validate configuration from a TOML file.
///
/// A missing file is an error; there is no built-in prompt library to fall back to.
pub fn load(path: &str) -> Result<Config, KindlingError> {
    let expanded = shellexpand(path);
    let path = Path::new(&expanded);
    if !path.exists() {
        return Err(KindlingError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| KindlingError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config = Config::from_toml_str(&content)?;
    info!(
        "loaded config from {} ({} templates, {} topics)",
        path.display(),
        config.templates.len(),
        config.topics.len()
    );
    Ok(config)
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::defaults::default_weight;
use super::LengthConfig;

/// Template flag marking content that needs `flags.allow_sensitive`.
pub const SENSITIVE_FLAG: &str = "avoid_sensitive";

/// Per-template override of the global length bounds. Each side is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthOverride {
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
}

/// A prompt template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub format: String,
    /// Topic keys this template may pair with.
    pub allowed_topics: Vec<String>,
    /// Tone keys this template may pair with. Empty = every configured tone.
    #[serde(default)]
    pub compatible_tones: Vec<String>,
    /// Text with `{name}` placeholders; `{{` and `}}` are literal braces.
    pub base_text: String,
    #[serde(default)]
    pub variable_pools: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub length_bounds: Option<LengthOverride>,
    #[serde(default)]
    pub cooldown_days: Option<u32>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl Template {
    pub fn allows_topic(&self, topic: &str) -> bool {
        self.allowed_topics.iter().any(|t| t == topic)
    }

    pub fn is_sensitive(&self) -> bool {
        self.flags.iter().any(|f| f == SENSITIVE_FLAG)
    }

    /// Effective length bounds: each side of the override, else the global side.
    pub fn length_bounds(&self, global: &LengthConfig) -> LengthConfig {
        let over = self.length_bounds.as_ref();
        LengthConfig {
            min: over.and_then(|o| o.min).unwrap_or(global.min),
            max: over.and_then(|o| o.max).unwrap_or(global.max),
        }
    }

    /// Effective cooldown: the template's own, else the global template cooldown.
    pub fn cooldown_days(&self, global_days: u32) -> u32 {
        self.cooldown_days.unwrap_or(global_days)
    }
}

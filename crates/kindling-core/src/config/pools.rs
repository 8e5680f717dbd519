use serde::{Deserialize, Serialize};

use super::defaults::default_weight;

/// One entry of a weighted pool (`topics`, `tones`, `constraints`, `twists`).
///
/// Written either as a bare weight (`calm = 1.5`) or as a table with
/// auxiliary text appended to the prompt (`[constraints.short] text = "..."`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolEntry {
    Weight(f64),
    Detailed {
        #[serde(default = "default_weight")]
        weight: f64,
        #[serde(default)]
        text: Option<String>,
    },
}

impl PoolEntry {
    pub fn weight(&self) -> f64 {
        match self {
            Self::Weight(w) => *w,
            Self::Detailed { weight, .. } => *weight,
        }
    }

    /// Auxiliary text, if any non-blank text is configured.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Detailed {
                text: Some(text), ..
            } if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

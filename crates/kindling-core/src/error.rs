use thiserror::Error;

/// Top-level error type for Kindling.
#[derive(Debug, Error)]
pub enum KindlingError {
    /// Configuration missing or structurally invalid.
    #[error("config error: {0}")]
    Config(String),

    /// A template could not be rendered (missing placeholder values, bad syntax).
    #[error("template '{template}' failed to render: {reason}")]
    TemplateRender { template: String, reason: String },

    /// No candidate survived the hard filter within the attempt budget.
    #[error("no viable prompt candidates after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// Selection was asked to choose from an empty candidate list.
    #[error("no candidates to select from")]
    NoCandidates,

    /// History storage error.
    #[error("history error: {0}")]
    History(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    /// Execution or construction error raised by the token layer.
    #[error(transparent)]
    Token(#[from] hytoken::utils::Error),

    #[error("Failed to parse search configuration: {source}")]
    ConfigParseError {
        source: toml::de::Error,
        text: String,
    },

    #[error("Failed to serialize search configuration: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),

    #[error("A search needs at least one training example, none were provided.")]
    NoExamples,

    #[error(
        "Search iteration limit exhausted after {iterations} iterations without finding a solution."
    )]
    SearchIterationLimitExceeded { iterations: usize },

    #[error("Search time budget of {budget_ms} ms exhausted without finding a solution.")]
    SearchTimeBudgetExceeded { budget_ms: u128 },
}

pub type SynthResult<T> = Result<T, SynthError>;

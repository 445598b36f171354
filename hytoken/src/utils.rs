use strum::EnumIs;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum Error {
    /// A `Recurse` token re-entered its program more often than the program allows.
    #[error(
        "Recursive call limit of {limit} reached. The program kept re-entering itself without reaching a base case."
    )]
    RecursionLimitExceeded { limit: usize },

    /// A `LoopWhile` token iterated without its condition becoming false.
    #[error(
        "Loop iteration limit of {limit} reached. The loop condition never became false."
    )]
    LoopLimitExceeded { limit: usize },

    /// A construction action is not in the legal set for the builder's current state.
    #[error("Action `{action}` is illegal while the builder is {state}.")]
    IllegalAction { action: String, state: String },

    /// An incomplete token was asked to execute or to produce its final form.
    #[error("Token `{token}` still has open slots and cannot be applied.")]
    ApplyingIncompleteToken { token: String },

    /// An incomplete program was asked to execute or to produce its final form.
    #[error("Program `{program}` is not complete and cannot be interpreted.")]
    ProgramNotComplete { program: String },

    /// A construction action was applied to a token with no open slot left.
    #[error("Token `{token}` is already complete. No further action can be applied.")]
    TokenAlreadyCompleted { token: String },

    /// A construction action was applied to a closed program.
    #[error("Program `{program}` is already complete. No further action can be applied.")]
    ProgramAlreadyCompleted { program: String },

    /// A library token cannot be applied to the given environment.
    #[error("Token `{token}` cannot be applied: {reason}")]
    InvalidTransition { token: String, reason: String },
}

impl Error {
    /// Returns true for the two execution budget conditions (recursion and loop limits).
    pub fn is_resource_limit(&self) -> bool {
        self.is_recursion_limit_exceeded() || self.is_loop_limit_exceeded()
    }

    /// Returns true for misuse of the construction state machine.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Error::IllegalAction { .. }
                | Error::ApplyingIncompleteToken { .. }
                | Error::ProgramNotComplete { .. }
                | Error::TokenAlreadyCompleted { .. }
                | Error::ProgramAlreadyCompleted { .. }
        )
    }
}

pub type TokenResult<T> = Result<T, Error>;

/// Indent every line but the first of `text` by one tab.
pub(crate) fn indent(text: &str) -> String {
    text.replace('\n', "\n\t")
}

/// Render a list of items as `a, b, c` using their `Display` impl.
pub(crate) fn join_display<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

use std::time::Duration;

use hytoken::magic::{DEFAULT_CONTROL_COST, DEFAULT_RECURSION_LIMIT};
use serde::{Deserialize, Serialize};

use crate::utils::error::{SynthError, SynthResult};

/// Budgets and shape limits shared by search procedures.
///
/// Every field has a default, so a TOML document only lists what it
/// overrides:
///
/// ```
/// # use hysearch::config::SearchConfig;
/// let config = SearchConfig::from_toml_str("max_iterations = 500\nmax_nesting = 2").unwrap();
/// assert_eq!(config.max_iterations, 500);
/// assert_eq!(config.max_nesting, 2);
/// assert_eq!(config.time_budget(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of search iterations (node expansions).
    pub max_iterations: usize,
    /// Wall-clock budget for one search, in milliseconds. Unlimited when absent.
    pub time_budget_ms: Option<u64>,
    /// Recursive-call budget given to every candidate program.
    pub recursion_limit: usize,
    /// Maximum number of construction actions per candidate.
    pub max_program_actions: usize,
    /// Maximum depth of nested control tokens.
    pub max_nesting: usize,
    /// Size overhead of a control token when reporting program length.
    pub control_cost: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: 20_000,
            time_budget_ms: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            max_program_actions: 8,
            max_nesting: 1,
            control_cost: DEFAULT_CONTROL_COST,
        }
    }
}

impl SearchConfig {
    /// Parse a configuration from TOML text. Missing keys keep their default.
    pub fn from_toml_str(text: &str) -> SynthResult<Self> {
        toml::from_str(text).map_err(|source| SynthError::ConfigParseError {
            source,
            text: text.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> SynthResult<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

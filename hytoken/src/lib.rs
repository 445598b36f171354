//! Program representation and execution semantics for example-guided synthesis.
//!
//! A synthesized program is an ordered list of [`token::Token`]s applied one
//! after the other to an [`env::Environment`]. Leaf tokens come from a domain
//! library (see [`library::TokenLibrary`]); control tokens ([`control::If`],
//! [`control::Recurse`], [`control::LoopWhile`]) compose them.
//!
//! Execution is bounded: recursion is limited by the program's recursive-call
//! budget and loops by [`magic::LOOP_ITERATION_LIMIT`]. Exceeding either yields
//! an [`utils::Error`] rather than a hang.
//!
//! Programs can be built incrementally through [`builder::ProgramBuilder`],
//! which exposes the legal next actions at every step so tree-search procedures
//! can expand a partial program one slot at a time.
//!
//! ```
//! use std::fmt;
//!
//! use hytoken::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter(i64);
//!
//! impl Environment for Counter {
//!     fn distance(&self, other: &Self) -> f64 {
//!         (self.0 - other.0).abs() as f64
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Incr;
//!
//! impl fmt::Display for Incr {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Incr")
//!     }
//! }
//!
//! impl EnvToken<Counter> for Incr {
//!     fn apply(&self, env: Counter) -> TokenResult<Counter> {
//!         Ok(Counter(env.0 + 1))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Below3;
//!
//! impl fmt::Display for Below3 {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Below3")
//!     }
//! }
//!
//! impl BoolToken<Counter> for Below3 {
//!     fn apply(&self, env: &Counter) -> TokenResult<bool> {
//!         Ok(env.0 < 3)
//!     }
//! }
//!
//! let program = Program::new(vec![Token::recurse(
//!     Some(Below3.into_ref()),
//!     vec![],
//!     vec![Token::atom(Incr)],
//! )]);
//! assert_eq!(program.interp(Counter(0)).unwrap(), Counter(3));
//! assert_eq!(program.number_of_tokens(), 3);
//! ```

pub mod builder;
pub mod control;
pub mod env;
pub mod library;
pub mod magic;
pub mod program;
pub mod token;
#[cfg(any(test, feature = "test-utils"))]
pub mod tests_utils;
pub mod utils;

pub mod prelude {
    //! Convenient re-exports for token library authors and search procedures.
    pub use crate::builder::{Action, Completable, ControlBuilder, ControlKind, ProgramBuilder};
    pub use crate::control::{If, LoopWhile, Recurse};
    pub use crate::env::Environment;
    pub use crate::library::TokenLibrary;
    pub use crate::program::{ExecutionContext, ExecutionStats, Program};
    pub use crate::token::{Always, BoolToken, BoolTokenRef, EnvToken, EnvTokenRef, Not, Token};
    pub use crate::utils::{Error, TokenResult};
}

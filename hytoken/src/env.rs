//! Domain state acted on by tokens.
use std::fmt;

/// Mutable domain state threaded through a program.
///
/// Concrete domains (strings, robots, pixel grids, ...) implement this trait
/// for their state record. Tokens receive the environment by value and hand
/// back the updated one, so an implementation is free to mutate in place.
///
/// The executing program is *not* stored in the environment. Control tokens
/// that need it (recursion) read it from the
/// [`ExecutionContext`](crate::program::ExecutionContext) passed alongside.
pub trait Environment: Clone + fmt::Debug + Send + Sync + 'static {
    /// Mismatch between two environments of the same domain.
    ///
    /// Must return `0.0` exactly when both are considered equal for
    /// correctness purposes, and a positive value otherwise.
    fn distance(&self, other: &Self) -> f64;

    /// Returns true when `self` and `other` are equal for correctness purposes.
    fn matches(&self, other: &Self) -> bool {
        self.distance(other) == 0.0
    }
}

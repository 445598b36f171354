//! Scoring programs against examples.
//!
//! Execution failures are recovered here and never reach the caller: an
//! example whose execution fails costs [`f64::INFINITY`]. The total cost is
//! the sum of per-example costs, so it is zero exactly when every example is
//! reproduced and grows with every additional or larger mismatch.
use hytoken::{env::Environment, program::Program, utils::Error};
use log::trace;
use strum::EnumIs;

use crate::example::Example;

/// Result of running a program on one example.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum ExampleOutcome<E> {
    /// Output equal to the expected one.
    Matched,
    /// Execution finished with a different output.
    Mismatched { output: E, distance: f64 },
    /// Execution failed (resource limit or domain failure).
    Failed { error: Error },
}

impl<E> ExampleOutcome<E> {
    pub fn cost(&self) -> f64 {
        match self {
            ExampleOutcome::Matched => 0.0,
            ExampleOutcome::Mismatched { distance, .. } => *distance,
            ExampleOutcome::Failed { .. } => f64::INFINITY,
        }
    }
}

/// Run `program` on a single example.
pub fn evaluate_example<E: Environment>(example: &Example<E>, program: &Program<E>) -> ExampleOutcome<E> {
    match program.interp(example.input.clone()) {
        Ok(output) => {
            let distance = output.distance(&example.output);
            if distance == 0.0 {
                ExampleOutcome::Matched
            } else {
                ExampleOutcome::Mismatched { output, distance }
            }
        }
        Err(error) => {
            trace!("Program {} failed on {:?}: {}", program, example.input, error);
            ExampleOutcome::Failed { error }
        }
    }
}

/// Run `program` on every example.
pub fn evaluate<E: Environment>(examples: &[Example<E>], program: &Program<E>) -> Vec<ExampleOutcome<E>> {
    examples
        .iter()
        .map(|example| evaluate_example(example, program))
        .collect()
}

/// Total mismatch of `program` over `examples`. Zero means every example is solved.
pub fn cost<E: Environment>(examples: &[Example<E>], program: &Program<E>) -> f64 {
    examples
        .iter()
        .map(|example| evaluate_example(example, program).cost())
        .sum()
}

/// Returns true when `program` reproduces every example.
pub fn solves<E: Environment>(examples: &[Example<E>], program: &Program<E>) -> bool {
    examples
        .iter()
        .all(|example| evaluate_example(example, program).is_matched())
}

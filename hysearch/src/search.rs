//! Search algorithm interface.
//!
//! ## Core concepts
//! * [`SearchAlgorithm`] – Trait implemented by concrete search strategies.
//! * [`SearchOutput`] – What a strategy's `search` step produces.
//! * [`SearchReport`] – Output plus timing and size metrics, produced by the
//!   provided [`SearchAlgorithm::run`] method.
//!
//! ## Outcome semantics
//! Running out of iterations or time is not an error: the report carries
//! [`SearchStatus::Exhausted`] / [`SearchStatus::TimedOut`] and the best
//! complete program seen so far. Errors returned by `run` are contract
//! violations (for example, an illegal construction action) and should be
//! treated as crashes by drivers.
use std::time::{Duration, Instant};

use hytoken::{env::Environment, library::TokenLibrary, magic::DEFAULT_CONTROL_COST, program::Program};
use log::debug;
use serde::Serialize;
use strum::EnumIs;

use crate::{
    cost,
    example::Example,
    utils::error::{SynthError, SynthResult},
};

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Serialize, strum::Display)]
pub enum SearchStatus {
    /// A program with cost zero on the training examples was found.
    Solved,
    /// The iteration budget or the candidate space ran out first.
    Exhausted,
    /// The time budget ran out first.
    TimedOut,
}

/// Result of a strategy's search step.
#[derive(Debug, Clone)]
pub struct SearchOutput<E> {
    /// Best complete program found; the empty program if none was scored.
    pub program: Program<E>,
    pub status: SearchStatus,
    /// Complete candidate programs that were scored.
    pub visited_programs: usize,
    pub iterations: usize,
}

/// Result record of [`SearchAlgorithm::run`].
#[derive(Debug, Clone)]
pub struct SearchReport<E> {
    pub program: Program<E>,
    pub status: SearchStatus,
    pub execution_time: Duration,
    /// Structural size of `program`.
    pub program_length: usize,
    pub visited_programs: usize,
    pub iterations: usize,
}

impl<E: Environment> SearchReport<E> {
    /// Take the program if the search solved its examples.
    pub fn into_solution(self) -> SynthResult<Program<E>> {
        match self.status {
            SearchStatus::Solved => Ok(self.program),
            SearchStatus::Exhausted => Err(SynthError::SearchIterationLimitExceeded {
                iterations: self.iterations,
            }),
            SearchStatus::TimedOut => Err(SynthError::SearchTimeBudgetExceeded {
                budget_ms: self.execution_time.as_millis(),
            }),
        }
    }
}

/// A program search strategy.
///
/// ### Required methods
/// * `name` – Label used in batch reports.
/// * `search` – Look for a program reproducing `examples` using primitives
///   from `library`. Must return a complete program.
///
/// ### Provided methods
/// * `run` – Validates inputs, times `search` and assembles a [`SearchReport`].
/// * `cost` – The shared scoring function, see [`crate::cost::cost`].
pub trait SearchAlgorithm<E: Environment> {
    fn name(&self) -> &str;

    fn search(
        &mut self,
        examples: &[Example<E>],
        library: &TokenLibrary<E>,
    ) -> SynthResult<SearchOutput<E>>;

    /// Control overhead used when measuring the returned program.
    fn control_cost(&self) -> usize {
        DEFAULT_CONTROL_COST
    }

    fn run(
        &mut self,
        examples: &[Example<E>],
        library: &TokenLibrary<E>,
    ) -> SynthResult<SearchReport<E>> {
        if examples.is_empty() {
            return Err(SynthError::NoExamples);
        }

        let start_time = Instant::now();
        let output = self.search(examples, library)?;
        let execution_time = start_time.elapsed();

        debug!(
            "{} finished as {} after {} iteration(s) and {} program(s) in {:?}: {}",
            self.name(),
            output.status,
            output.iterations,
            output.visited_programs,
            execution_time,
            output.program
        );

        Ok(SearchReport {
            program_length: output.program.number_of_tokens_with(self.control_cost()),
            program: output.program,
            status: output.status,
            execution_time,
            visited_programs: output.visited_programs,
            iterations: output.iterations,
        })
    }

    fn cost(examples: &[Example<E>], program: &Program<E>) -> f64
    where
        Self: Sized,
    {
        cost::cost(examples, program)
    }
}

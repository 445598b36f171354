//! Run a search algorithm over many test cases and summarize the results.
//!
//! The runner keeps everything in memory: the returned [`BatchReport`] is
//! `Serialize`, persisting it is up to the caller.
use hytoken::{env::Environment, library::TokenLibrary};
use log::{info, warn};
use serde::Serialize;
use strum::EnumIs;

use crate::{
    cost::{ExampleOutcome, cost, evaluate},
    example::TestCase,
    search::{SearchAlgorithm, SearchStatus},
};

/// How a single test case ended.
#[derive(Debug, Clone, PartialEq, Serialize, EnumIs)]
pub enum CaseOutcome {
    /// Zero cost on training and held-out examples.
    Solved,
    /// The search returned a program that misses at least one example.
    Unsolved,
    /// The search itself failed.
    Crashed { error: String },
}

/// Per test case record.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub outcome: CaseOutcome,
    pub status: Option<SearchStatus>,
    pub program: String,
    pub train_cost: f64,
    pub test_cost: f64,
    /// Seconds spent in the search.
    pub execution_time: f64,
    pub program_length: usize,
    pub visited_programs: usize,
    pub iterations: usize,
    /// Outputs (or failures) for training examples that were not reproduced.
    pub failed_train_outputs: Vec<String>,
    /// Outputs (or failures) for held-out examples that were not reproduced.
    pub failed_test_outputs: Vec<String>,
}

impl CaseResult {
    fn crashed(name: &str, error: String) -> Self {
        CaseResult {
            name: name.to_string(),
            outcome: CaseOutcome::Crashed { error },
            status: None,
            program: String::new(),
            train_cost: f64::INFINITY,
            test_cost: f64::INFINITY,
            execution_time: 0.0,
            program_length: 0,
            visited_programs: 0,
            iterations: 0,
            failed_train_outputs: Vec::new(),
            failed_test_outputs: Vec::new(),
        }
    }
}

/// Averages over a group of case results.
///
/// Infinite values are left out of the sums but still count in the divisor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Averages {
    pub test_cost: f64,
    pub train_cost: f64,
    pub execution_time: f64,
    pub program_length: f64,
    pub visited_programs: f64,
    pub iterations: f64,
}

impl Averages {
    pub fn of<'a>(results: impl IntoIterator<Item = &'a CaseResult>) -> Self {
        let results: Vec<&CaseResult> = results.into_iter().collect();
        if results.is_empty() {
            return Averages::default();
        }

        let count = results.len() as f64;
        let average = |value: fn(&CaseResult) -> f64| {
            results
                .iter()
                .map(|result| value(result))
                .filter(|value| value.is_finite())
                .sum::<f64>()
                / count
        };

        Averages {
            test_cost: average(|r| r.test_cost),
            train_cost: average(|r| r.train_cost),
            execution_time: average(|r| r.execution_time),
            program_length: average(|r| r.program_length as f64),
            visited_programs: average(|r| r.visited_programs as f64),
            iterations: average(|r| r.iterations as f64),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub algorithm: String,
    pub results: Vec<CaseResult>,
    pub solved: usize,
    pub crashed: usize,
    pub average: Averages,
    pub average_correct: Averages,
    pub average_failed: Averages,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Share of solved cases, in percent.
    pub fn solved_percentage(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            100.0 * self.solved as f64 / self.results.len() as f64
        }
    }
}

/// Runs one search algorithm with one token library over a set of test cases.
pub struct BatchRun<E, S> {
    algorithm: S,
    library: TokenLibrary<E>,
}

impl<E: Environment, S: SearchAlgorithm<E>> BatchRun<E, S> {
    pub fn new(algorithm: S, library: TokenLibrary<E>) -> Self {
        BatchRun { algorithm, library }
    }

    pub fn run(&mut self, test_cases: &[TestCase<E>]) -> BatchReport {
        let results: Vec<CaseResult> = test_cases
            .iter()
            .map(|test_case| {
                let result = self.test_case(test_case);
                info!(
                    "{}: {:?} (train cost {}, test cost {}) {}",
                    result.name, result.outcome, result.train_cost, result.test_cost, result.program
                );
                result
            })
            .collect();

        let solved = results.iter().filter(|r| r.outcome.is_solved()).count();
        let crashed = results.iter().filter(|r| r.outcome.is_crashed()).count();
        let average = Averages::of(&results);
        let average_correct = Averages::of(results.iter().filter(|r| r.outcome.is_solved()));
        let average_failed = Averages::of(results.iter().filter(|r| !r.outcome.is_solved()));

        let report = BatchReport {
            algorithm: self.algorithm.name().to_string(),
            results,
            solved,
            crashed,
            average,
            average_correct,
            average_failed,
        };

        info!(
            "{} / {} ({:.1}%) cases solved, {} crashed.",
            report.solved,
            report.total(),
            report.solved_percentage(),
            report.crashed
        );
        info!("Average overall: {:?}", report.average);
        info!("Average correct: {:?}", report.average_correct);
        info!("Average not correct: {:?}", report.average_failed);

        report
    }

    fn test_case(&mut self, test_case: &TestCase<E>) -> CaseResult {
        let report = match self
            .algorithm
            .run(&test_case.training_examples, &self.library)
        {
            Ok(report) => report,
            Err(error) => {
                warn!("Search crashed on {}: {}", test_case.name, error);
                return CaseResult::crashed(&test_case.name, error.to_string());
            }
        };

        let program = &report.program;
        let train_cost = cost(&test_case.training_examples, program);
        let test_cost = cost(&test_case.test_examples, program);
        let outcome = if train_cost == 0.0 && test_cost == 0.0 {
            CaseOutcome::Solved
        } else {
            CaseOutcome::Unsolved
        };

        CaseResult {
            name: test_case.name.clone(),
            outcome,
            status: Some(report.status),
            program: program.to_string(),
            train_cost,
            test_cost,
            execution_time: report.execution_time.as_secs_f64(),
            program_length: report.program_length,
            visited_programs: report.visited_programs,
            iterations: report.iterations,
            failed_train_outputs: failed_outputs(&evaluate(&test_case.training_examples, program)),
            failed_test_outputs: failed_outputs(&evaluate(&test_case.test_examples, program)),
        }
    }
}

fn failed_outputs<E: Environment>(outcomes: &[ExampleOutcome<E>]) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            ExampleOutcome::Matched => None,
            ExampleOutcome::Mismatched { output, .. } => Some(format!("{:?}", output)),
            ExampleOutcome::Failed { error } => Some(format!("Failed: {}", error)),
        })
        .collect()
}

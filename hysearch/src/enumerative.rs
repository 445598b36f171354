//! Breadth-first enumeration of programs.
//!
//! Partial programs are [`ProgramBuilder`]s. Each iteration pops the oldest
//! builder from the frontier and applies every legal action to a copy of it.
//! Completed children are scored; incomplete ones go back into the frontier
//! unless they already used their action budget. Shorter action sequences are
//! therefore always tried first.
use std::collections::VecDeque;
use std::time::Instant;

use hytoken::{
    builder::{Completable, ProgramBuilder},
    env::Environment,
    library::TokenLibrary,
    program::Program,
};
use log::{debug, trace};

use crate::{
    config::SearchConfig,
    cost::cost,
    example::Example,
    search::{SearchAlgorithm, SearchOutput, SearchStatus},
    utils::error::SynthResult,
};

#[derive(Debug, Clone, Default)]
pub struct Enumerative {
    config: SearchConfig,
}

impl Enumerative {
    pub fn new(config: SearchConfig) -> Self {
        Enumerative { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

struct Best<E> {
    cost: f64,
    program: Program<E>,
}

impl<E: Environment> SearchAlgorithm<E> for Enumerative {
    fn name(&self) -> &str {
        "enumerative"
    }

    fn control_cost(&self) -> usize {
        self.config.control_cost
    }

    fn search(
        &mut self,
        examples: &[Example<E>],
        library: &TokenLibrary<E>,
    ) -> SynthResult<SearchOutput<E>> {
        let start_time = Instant::now();
        let time_budget = self.config.time_budget();

        let root = ProgramBuilder::new(library.clone(), self.config.max_nesting)
            .with_recursion_limit(self.config.recursion_limit);
        let mut frontier = VecDeque::from([root]);
        let mut best: Option<Best<E>> = None;
        let mut visited_programs = 0;
        let mut iterations = 0;

        let status = loop {
            let Some(node) = frontier.pop_front() else {
                break SearchStatus::Exhausted;
            };
            if iterations >= self.config.max_iterations {
                break SearchStatus::Exhausted;
            }
            if time_budget.is_some_and(|budget| start_time.elapsed() >= budget) {
                break SearchStatus::TimedOut;
            }
            iterations += 1;

            let actions = node.legal_actions();
            trace!("Expanding {} with {} action(s)", node, actions.len());

            let mut solved = false;
            for action in actions {
                let mut child = node.clone();
                child.apply_action(action)?;

                if !child.is_complete() {
                    if child.actions_applied() < self.config.max_program_actions {
                        frontier.push_back(child);
                    }
                    continue;
                }

                let program = child.finish()?;
                visited_programs += 1;
                let candidate_cost = cost(examples, &program);

                if best.as_ref().is_none_or(|best| candidate_cost < best.cost) {
                    debug!("New best program (cost {}): {}", candidate_cost, program);
                    best = Some(Best {
                        cost: candidate_cost,
                        program,
                    });
                }
                if candidate_cost == 0.0 {
                    solved = true;
                    break;
                }
            }

            if solved {
                break SearchStatus::Solved;
            }
        };

        let program = best
            .map(|best| best.program)
            .unwrap_or_else(|| Program::empty().with_recursion_limit(self.config.recursion_limit));

        Ok(SearchOutput {
            program,
            status,
            visited_programs,
            iterations,
        })
    }
}

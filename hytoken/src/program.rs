//! Programs and their execution context.
use std::fmt;

use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    control::{If, LoopWhile, Recurse},
    env::Environment,
    magic::{DEFAULT_CONTROL_COST, DEFAULT_RECURSION_LIMIT},
    token::{Token, apply_sequence, sequence_size},
    utils::{Error, TokenResult, join_display},
};

/// Ordered token sequence with a recursive-call budget.
///
/// A `Program` is always complete: partially built programs are represented by
/// [`ProgramBuilder`](crate::builder::ProgramBuilder) and only become a
/// `Program` once every slot is filled.
#[derive(Debug, Clone)]
pub struct Program<E> {
    tokens: Vec<Token<E>>,
    recursion_limit: usize,
}

impl<E: Environment> Program<E> {
    pub fn new(tokens: Vec<Token<E>>) -> Self {
        Program {
            tokens,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// The identity program.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    pub fn tokens(&self) -> &[Token<E>] {
        &self.tokens
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Execute the program on `env`.
    ///
    /// This is the entry point for external callers. A fresh execution context
    /// is created so recursion budgets never leak between calls.
    pub fn interp(&self, env: E) -> TokenResult<E> {
        self.interp_with_stats(env).map(|(env, _)| env)
    }

    /// Same as [`Program::interp`] but also reports execution statistics.
    pub fn interp_with_stats(&self, env: E) -> TokenResult<(E, ExecutionStats)> {
        let mut ctx = ExecutionContext::new(self);
        let env = self.interp_in(env, &mut ctx)?;
        Ok((env, ctx.stats))
    }

    /// Apply every token within an existing execution context.
    ///
    /// Used for recursive re-entry: budgets already consumed by `ctx` keep
    /// counting.
    pub fn interp_in(&self, env: E, ctx: &mut ExecutionContext<'_, E>) -> TokenResult<E> {
        apply_sequence(&self.tokens, env, ctx)
    }

    /// Structural size using [`DEFAULT_CONTROL_COST`].
    pub fn number_of_tokens(&self) -> usize {
        self.number_of_tokens_with(DEFAULT_CONTROL_COST)
    }

    pub fn number_of_tokens_with(&self, control_cost: usize) -> usize {
        sequence_size(&self.tokens, control_cost)
    }

    /// Number of control tokens, at any depth.
    pub fn control_tokens(&self) -> usize {
        fn count<E>(tokens: &[Token<E>]) -> usize {
            tokens
                .iter()
                .map(|token| match token {
                    Token::Atom(_) => 0,
                    Token::If(If { e1, e2, .. }) => 1 + count(e1) + count(e2),
                    Token::Recurse(Recurse {
                        base_case,
                        recursive_case,
                        ..
                    }) => 1 + count(base_case) + count(recursive_case),
                    Token::LoopWhile(LoopWhile { loop_body, .. }) => 1 + count(loop_body),
                })
                .sum()
        }
        count(&self.tokens)
    }

    /// Indented pseudo-code listing, one token per line. Debugging only.
    pub fn to_formatted_string(&self) -> String {
        self.tokens
            .iter()
            .map(|token| token.to_formatted_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<E: Environment> From<Vec<Token<E>>> for Program<E> {
    fn from(tokens: Vec<Token<E>>) -> Self {
        Program::new(tokens)
    }
}

impl<E> fmt::Display for Program<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", join_display(&self.tokens))
    }
}

/// Counters gathered while executing one top-level program call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionStats {
    /// Tokens applied, control tokens included.
    pub tokens_applied: usize,
    /// Applications of `Recurse` tokens.
    pub recursive_calls: usize,
    /// Completed `LoopWhile` iterations, over all loops.
    pub loop_iterations: usize,
}

/// Per-execution state threaded alongside the environment.
///
/// Holds a non-owning reference to the executing program, which `Recurse`
/// re-enters, and the global recursive-call counter. A context is created per
/// top-level [`Program::interp`] call, so token instances stay free of
/// execution state and can be shared between programs.
pub struct ExecutionContext<'p, E> {
    program: &'p Program<E>,
    stats: ExecutionStats,
}

impl<'p, E: Environment> ExecutionContext<'p, E> {
    pub fn new(program: &'p Program<E>) -> Self {
        ExecutionContext {
            program,
            stats: ExecutionStats::default(),
        }
    }

    /// Program currently executing.
    pub fn program(&self) -> &'p Program<E> {
        self.program
    }

    pub fn stats(&self) -> ExecutionStats {
        self.stats
    }

    /// Account for one `Recurse` application, failing once the budget is spent.
    pub fn enter_recursion(&mut self) -> TokenResult<()> {
        let limit = self.program.recursion_limit;
        if self.stats.recursive_calls >= limit {
            trace!(
                "Recursive call limit {} reached while executing {}",
                limit, self.program
            );
            return Err(Error::RecursionLimitExceeded { limit });
        }
        self.stats.recursive_calls += 1;
        Ok(())
    }

    pub(crate) fn record_token(&mut self) {
        self.stats.tokens_applied += 1;
    }

    pub(crate) fn record_loop_iteration(&mut self) {
        self.stats.loop_iterations += 1;
    }
}

impl<E> fmt::Debug for ExecutionContext<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("program", &format_args!("{}", self.program))
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tests_utils::{AtGoal, Line, Move},
        token::{BoolToken, Not},
    };

    #[test]
    fn empty_program_is_identity() {
        let env = Line::new(4, 1);
        let program = Program::<Line>::empty();
        assert!(program.is_empty());
        assert_eq!(program.interp(env.clone()).unwrap(), env);
        assert_eq!(program.number_of_tokens(), 0);
        assert_eq!(program.to_string(), "[]");
    }

    #[test]
    fn stats_count_every_token() {
        let program = Program::new(vec![
            Token::atom(Move(1)),
            Token::loop_while(Not::new(AtGoal).into_ref(), vec![Token::atom(Move(1))]),
        ]);
        let (out, stats) = program.interp_with_stats(Line::new(0, 3)).unwrap();
        assert_eq!(out.pos, 3);
        assert_eq!(
            stats,
            ExecutionStats {
                // Move, LoopWhile, then two body moves
                tokens_applied: 4,
                recursive_calls: 0,
                loop_iterations: 2,
            }
        );
    }

    #[test]
    fn end_to_end_recursive_walk() {
        let walk = Program::new(vec![Token::recurse(
            Some(Not::new(AtGoal).into_ref()),
            vec![],
            vec![Token::atom(Move(1))],
        )]);
        let expected = Line::new(3, 3);

        let out = walk.interp(Line::new(0, 3)).unwrap();
        assert!(out.matches(&expected));
        assert_eq!(walk.number_of_tokens(), 3);
        assert_eq!(walk.control_tokens(), 1);

        for limit in 0..3 {
            let limited = walk.clone().with_recursion_limit(limit);
            assert_eq!(
                limited.interp(Line::new(0, 3)).unwrap_err(),
                Error::RecursionLimitExceeded { limit }
            );
        }
    }

    #[test]
    fn listing_joins_tokens_by_line() {
        let program = Program::new(vec![
            Token::atom(Move(1)),
            Token::if_then_else(AtGoal.into_ref(), vec![Token::atom(Move(-1))], vec![]),
        ]);
        assert_eq!(program.to_string(), "[Move(1), If(AtGoal [Move(-1)] [])]");
        assert_eq!(program.to_formatted_string(), "Move(1)\nif AtGoal:\n\tMove(-1)");
    }
}

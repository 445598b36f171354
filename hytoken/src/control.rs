//! Control-flow combinators.
//!
//! Every combinator composes lists of other tokens. None of them keeps state
//! between applications: the recursive-call counter lives in the
//! [`ExecutionContext`] and the loop counter is local to one application.
use std::fmt;

use log::trace;

use crate::{
    env::Environment,
    magic::LOOP_ITERATION_LIMIT,
    program::ExecutionContext,
    token::{BoolTokenRef, Token, apply_sequence, sequence_size},
    utils::{Error, TokenResult, indent, join_display},
};

/// Conditional: `e1` runs when `cond` holds, `e2` otherwise.
///
/// An empty `e2` is a legal no-op branch.
#[derive(Debug, Clone)]
pub struct If<E> {
    pub cond: BoolTokenRef<E>,
    pub e1: Vec<Token<E>>,
    pub e2: Vec<Token<E>>,
}

impl<E: Environment> If<E> {
    pub fn new(cond: BoolTokenRef<E>, e1: Vec<Token<E>>, e2: Vec<Token<E>>) -> Self {
        If { cond, e1, e2 }
    }

    pub fn apply(&self, env: E, ctx: &mut ExecutionContext<'_, E>) -> TokenResult<E> {
        if self.cond.apply(&env)? {
            apply_sequence(&self.e1, env, ctx)
        } else {
            apply_sequence(&self.e2, env, ctx)
        }
    }

    /// Both branches count, whichever one executes.
    pub fn number_of_tokens(&self, control_cost: usize) -> usize {
        control_cost + sequence_size(&self.e1, control_cost) + sequence_size(&self.e2, control_cost)
    }

    pub fn to_formatted_string(&self) -> String {
        let mut result = format!(
            "if {}:\n\t{}",
            self.cond.to_formatted_string(),
            formatted_block(&self.e1)
        );
        if !self.e2.is_empty() {
            result.push_str(&format!("\nelse:\n\t{}", formatted_block(&self.e2)));
        }
        result
    }
}

impl<E> fmt::Display for If<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "If({} [{}] [{}])",
            self.cond,
            join_display(&self.e1),
            join_display(&self.e2)
        )
    }
}

/// Bounded self-recursion of the enclosing program.
///
/// When `cond` is absent or holds, `recursive_case` runs and the whole
/// executing program is applied again to the result. Otherwise `base_case`
/// runs and the call chain ends. Every application counts against the
/// program's recursive-call limit, which is shared by all nested re-entries
/// of one top-level execution.
#[derive(Debug, Clone)]
pub struct Recurse<E> {
    pub cond: Option<BoolTokenRef<E>>,
    pub base_case: Vec<Token<E>>,
    pub recursive_case: Vec<Token<E>>,
}

impl<E: Environment> Recurse<E> {
    pub fn new(
        cond: Option<BoolTokenRef<E>>,
        base_case: Vec<Token<E>>,
        recursive_case: Vec<Token<E>>,
    ) -> Self {
        Recurse {
            cond,
            base_case,
            recursive_case,
        }
    }

    pub fn apply(&self, env: E, ctx: &mut ExecutionContext<'_, E>) -> TokenResult<E> {
        ctx.enter_recursion()?;

        let recurse = match &self.cond {
            None => true,
            Some(cond) => cond.apply(&env)?,
        };

        if recurse {
            let env = apply_sequence(&self.recursive_case, env, ctx)?;
            let program = ctx.program();
            program.interp_in(env, ctx)
        } else {
            apply_sequence(&self.base_case, env, ctx)
        }
    }

    pub fn number_of_tokens(&self, control_cost: usize) -> usize {
        control_cost
            + sequence_size(&self.base_case, control_cost)
            + sequence_size(&self.recursive_case, control_cost)
    }

    pub fn to_formatted_string(&self) -> String {
        let cond = self
            .cond
            .as_ref()
            .map(|cond| cond.to_formatted_string())
            .unwrap_or_else(|| "true".to_string());
        let mut result = format!(
            "while {} do:\n\t{}",
            cond,
            formatted_block(&self.recursive_case)
        );
        if !self.base_case.is_empty() {
            result.push_str(&format!("\nfinally:\n\t{}", formatted_block(&self.base_case)));
        }
        result
    }
}

impl<E> fmt::Display for Recurse<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recurse(")?;
        match &self.cond {
            Some(cond) => write!(f, "{}", cond)?,
            None => write!(f, "None")?,
        }
        write!(
            f,
            " [{}] [{}])",
            join_display(&self.base_case),
            join_display(&self.recursive_case)
        )
    }
}

/// Loop running `loop_body` as long as `cond` holds.
///
/// A single application performs at most [`LOOP_ITERATION_LIMIT`] iterations.
/// The body result is threaded from one iteration to the next.
#[derive(Debug, Clone)]
pub struct LoopWhile<E> {
    pub cond: BoolTokenRef<E>,
    pub loop_body: Vec<Token<E>>,
}

impl<E: Environment> LoopWhile<E> {
    pub fn new(cond: BoolTokenRef<E>, loop_body: Vec<Token<E>>) -> Self {
        LoopWhile { cond, loop_body }
    }

    pub fn apply(&self, mut env: E, ctx: &mut ExecutionContext<'_, E>) -> TokenResult<E> {
        let mut iterations = 0;
        while self.cond.apply(&env)? {
            if iterations >= LOOP_ITERATION_LIMIT {
                trace!("Loop `{}` exceeded {} iterations", self, LOOP_ITERATION_LIMIT);
                return Err(Error::LoopLimitExceeded {
                    limit: LOOP_ITERATION_LIMIT,
                });
            }
            iterations += 1;
            ctx.record_loop_iteration();

            env = apply_sequence(&self.loop_body, env, ctx)?;
        }

        Ok(env)
    }

    pub fn number_of_tokens(&self, control_cost: usize) -> usize {
        control_cost + sequence_size(&self.loop_body, control_cost)
    }

    pub fn to_formatted_string(&self) -> String {
        format!(
            "while {} do:\n\t{}",
            self.cond.to_formatted_string(),
            formatted_block(&self.loop_body)
        )
    }
}

impl<E> fmt::Display for LoopWhile<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoopWhile({} [{}])", self.cond, join_display(&self.loop_body))
    }
}

fn formatted_block<E: Environment>(tokens: &[Token<E>]) -> String {
    tokens
        .iter()
        .map(|token| indent(&token.to_formatted_string()))
        .collect::<Vec<_>>()
        .join("\n\t")
}

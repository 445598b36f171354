//! A one-dimensional robot domain used by tests and benchmarks.
//!
//! The robot sits at `pos` on a line of cells `0..=width` and wants to reach
//! `goal`. Moving off the line is a declared failure of the `Move` token.
use std::fmt;

use crate::{
    env::Environment,
    library::TokenLibrary,
    token::{BoolToken, EnvToken, Not},
    utils::{Error, TokenResult},
};

/// Width used by [`Line::new`].
pub const DEFAULT_LINE_WIDTH: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    pub pos: i64,
    pub goal: i64,
    pub width: i64,
}

impl Line {
    pub fn new(pos: i64, goal: i64) -> Self {
        Self::with_width(pos, goal, DEFAULT_LINE_WIDTH)
    }

    pub fn with_width(pos: i64, goal: i64, width: i64) -> Self {
        Line { pos, goal, width }
    }
}

impl Environment for Line {
    fn distance(&self, other: &Self) -> f64 {
        (self.pos - other.pos).abs() as f64
    }
}

/// Move the robot by `self.0` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(pub i64);

impl EnvToken<Line> for Move {
    fn apply(&self, mut env: Line) -> TokenResult<Line> {
        let pos = env.pos + self.0;
        if !(0..=env.width).contains(&pos) {
            return Err(Error::InvalidTransition {
                token: self.to_string(),
                reason: format!("position {} is outside 0..={}", pos, env.width),
            });
        }
        env.pos = pos;
        Ok(env)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.0)
    }
}

/// Holds when the robot stands on its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtGoal;

impl BoolToken<Line> for AtGoal {
    fn apply(&self, env: &Line) -> TokenResult<bool> {
        Ok(env.pos == env.goal)
    }
}

impl fmt::Display for AtGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtGoal")
    }
}

/// Holds when the robot stands at or beyond `self.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtLeast(pub i64);

impl BoolToken<Line> for AtLeast {
    fn apply(&self, env: &Line) -> TokenResult<bool> {
        Ok(env.pos >= self.0)
    }
}

impl fmt::Display for AtLeast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtLeast({})", self.0)
    }
}

/// `Move(1)`, `Move(-1)` and the predicates `AtGoal`, `Not(AtGoal)`.
pub fn line_library() -> TokenLibrary<Line> {
    TokenLibrary::default()
        .with_env_token(Move(1))
        .with_env_token(Move(-1))
        .with_bool_token(AtGoal)
        .with_bool_token(Not::new(AtGoal))
}

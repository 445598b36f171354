//! Token hierarchy.
//!
//! A [`Token`] is the unit a program is made of. Domain libraries provide leaf
//! tokens through the [`EnvToken`] (environment transformer) and [`BoolToken`]
//! (predicate) traits; the control-flow combinators live in
//! [`crate::control`] and are wrapped by the corresponding [`Token`] variants.
use std::{fmt, sync::Arc};

use strum::{EnumDiscriminants, EnumIs};

use crate::{
    control::{If, LoopWhile, Recurse},
    env::Environment,
    program::ExecutionContext,
    utils::TokenResult,
};

/// Primitive operation producing a new environment.
///
/// Implementations must be deterministic and may only fail through a declared
/// failure mode (usually [`Error::InvalidTransition`](crate::utils::Error)).
pub trait EnvToken<E>: fmt::Debug + fmt::Display + Send + Sync {
    /// Apply the operation to `env`.
    fn apply(&self, env: E) -> TokenResult<E>;

    /// Structural size of this token. Leaf tokens count as one.
    fn number_of_tokens(&self) -> usize {
        1
    }

    /// Human-readable rendering used in formatted program listings.
    fn to_formatted_string(&self) -> String {
        self.to_string()
    }

    /// Move this token behind a shared reference so it can be placed in libraries.
    fn into_ref(self) -> EnvTokenRef<E>
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// Predicate over an environment, used as the condition of control tokens.
///
/// The environment is only borrowed: a predicate cannot modify the state it
/// inspects.
pub trait BoolToken<E>: fmt::Debug + fmt::Display + Send + Sync {
    fn apply(&self, env: &E) -> TokenResult<bool>;

    fn to_formatted_string(&self) -> String {
        self.to_string()
    }

    fn into_ref(self) -> BoolTokenRef<E>
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// Shared handle to a library environment token.
pub type EnvTokenRef<E> = Arc<dyn EnvToken<E>>;

/// Shared handle to a library predicate.
pub type BoolTokenRef<E> = Arc<dyn BoolToken<E>>;

/// Executable token: a library primitive or a control-flow combinator.
///
/// Use the generated `TokenKind` discriminant for cheap classification.
#[derive(Debug, Clone, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(TokenKind), derive(Hash))]
pub enum Token<E> {
    /// Library primitive.
    Atom(EnvTokenRef<E>),
    /// Conditional branch.
    If(If<E>),
    /// Bounded self-recursion of the enclosing program.
    Recurse(Recurse<E>),
    /// Bounded loop.
    LoopWhile(LoopWhile<E>),
}

impl<E: Environment> Token<E> {
    /// Wrap a library primitive.
    pub fn atom(token: impl EnvToken<E> + 'static) -> Self {
        Token::Atom(Arc::new(token))
    }

    pub fn if_then_else(cond: BoolTokenRef<E>, e1: Vec<Token<E>>, e2: Vec<Token<E>>) -> Self {
        Token::If(If::new(cond, e1, e2))
    }

    pub fn recurse(
        cond: Option<BoolTokenRef<E>>,
        base_case: Vec<Token<E>>,
        recursive_case: Vec<Token<E>>,
    ) -> Self {
        Token::Recurse(Recurse::new(cond, base_case, recursive_case))
    }

    pub fn loop_while(cond: BoolTokenRef<E>, loop_body: Vec<Token<E>>) -> Self {
        Token::LoopWhile(LoopWhile::new(cond, loop_body))
    }

    /// Apply this token to `env` within the execution described by `ctx`.
    pub fn apply(&self, env: E, ctx: &mut ExecutionContext<'_, E>) -> TokenResult<E> {
        ctx.record_token();
        match self {
            Token::Atom(token) => token.apply(env),
            Token::If(token) => token.apply(env, ctx),
            Token::Recurse(token) => token.apply(env, ctx),
            Token::LoopWhile(token) => token.apply(env, ctx),
        }
    }

    /// Structural size of the token.
    ///
    /// Leaf tokens report their own size; control tokens add `control_cost`
    /// to the size of all their children, including branches that may never
    /// execute.
    pub fn number_of_tokens(&self, control_cost: usize) -> usize {
        match self {
            Token::Atom(token) => token.number_of_tokens(),
            Token::If(token) => token.number_of_tokens(control_cost),
            Token::Recurse(token) => token.number_of_tokens(control_cost),
            Token::LoopWhile(token) => token.number_of_tokens(control_cost),
        }
    }

    pub fn to_formatted_string(&self) -> String {
        match self {
            Token::Atom(token) => token.to_formatted_string(),
            Token::If(token) => token.to_formatted_string(),
            Token::Recurse(token) => token.to_formatted_string(),
            Token::LoopWhile(token) => token.to_formatted_string(),
        }
    }
}

impl<E> From<EnvTokenRef<E>> for Token<E> {
    fn from(token: EnvTokenRef<E>) -> Self {
        Token::Atom(token)
    }
}

impl<E> fmt::Display for Token<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Atom(token) => write!(f, "{}", token),
            Token::If(token) => write!(f, "{}", token),
            Token::Recurse(token) => write!(f, "{}", token),
            Token::LoopWhile(token) => write!(f, "{}", token),
        }
    }
}

/// Apply `tokens` in order, each one receiving the previous result.
pub(crate) fn apply_sequence<E: Environment>(
    tokens: &[Token<E>],
    env: E,
    ctx: &mut ExecutionContext<'_, E>,
) -> TokenResult<E> {
    tokens
        .iter()
        .try_fold(env, |env, token| token.apply(env, ctx))
}

/// Summed size of a token sequence.
pub(crate) fn sequence_size<E: Environment>(tokens: &[Token<E>], control_cost: usize) -> usize {
    tokens
        .iter()
        .map(|token| token.number_of_tokens(control_cost))
        .sum()
}

/// Negation of another predicate.
#[derive(Debug)]
pub struct Not<E> {
    pub inner: BoolTokenRef<E>,
}

impl<E> Not<E> {
    pub fn new(inner: impl BoolToken<E> + 'static) -> Self {
        Not {
            inner: Arc::new(inner),
        }
    }

    pub fn from_ref(inner: BoolTokenRef<E>) -> Self {
        Not { inner }
    }
}

impl<E: Environment> BoolToken<E> for Not<E> {
    fn apply(&self, env: &E) -> TokenResult<bool> {
        self.inner.apply(env).map(|value| !value)
    }

    fn to_formatted_string(&self) -> String {
        format!("not {}", self.inner.to_formatted_string())
    }
}

impl<E> fmt::Display for Not<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not({})", self.inner)
    }
}

/// Constant predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Always(pub bool);

impl<E: Environment> BoolToken<E> for Always {
    fn apply(&self, _env: &E) -> TokenResult<bool> {
        Ok(self.0)
    }
}

impl fmt::Display for Always {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

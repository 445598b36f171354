use std::{fmt, sync::Arc};

use crate::token::{BoolToken, BoolTokenRef, EnvToken, EnvTokenRef};

/// Primitives a search procedure may draw from.
///
/// A domain supplies one library holding its environment tokens and its
/// predicates. Libraries are cheap to clone: tokens are shared.
pub struct TokenLibrary<E> {
    pub env_tokens: Vec<EnvTokenRef<E>>,
    pub bool_tokens: Vec<BoolTokenRef<E>>,
}

impl<E> TokenLibrary<E> {
    pub fn new(env_tokens: Vec<EnvTokenRef<E>>, bool_tokens: Vec<BoolTokenRef<E>>) -> Self {
        TokenLibrary {
            env_tokens,
            bool_tokens,
        }
    }

    pub fn with_env_token(mut self, token: impl EnvToken<E> + 'static) -> Self {
        self.env_tokens.push(Arc::new(token));
        self
    }

    pub fn with_bool_token(mut self, token: impl BoolToken<E> + 'static) -> Self {
        self.bool_tokens.push(Arc::new(token));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.env_tokens.is_empty() && self.bool_tokens.is_empty()
    }
}

impl<E> Default for TokenLibrary<E> {
    fn default() -> Self {
        TokenLibrary::new(Vec::new(), Vec::new())
    }
}

impl<E> Clone for TokenLibrary<E> {
    fn clone(&self) -> Self {
        TokenLibrary {
            env_tokens: self.env_tokens.clone(),
            bool_tokens: self.bool_tokens.clone(),
        }
    }
}

impl<E> fmt::Debug for TokenLibrary<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenLibrary")
            .field("env_tokens", &self.env_tokens)
            .field("bool_tokens", &self.bool_tokens)
            .finish()
    }
}

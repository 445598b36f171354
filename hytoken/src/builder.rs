//! Incremental construction of tokens and programs.
//!
//! Search procedures that grow programs one decision at a time (tree search,
//! enumeration) represent a partial program as a builder. A builder is either
//! *incomplete*, with at least one open slot, or *complete*. Every open slot is
//! filled by exactly one [`Action`]; the set of legal actions for the current
//! state is queryable through [`Completable::legal_actions`].
//!
//! ## Slot order
//! * [`ControlBuilder`]: the condition first, then each branch in declaration
//!   order (`If`: `e1`, `e2`; `Recurse`: `base_case`, `recursive_case`;
//!   `LoopWhile`: `loop_body`). A branch is filled with `Push`/`Begin` and
//!   closed with `EndBranch`.
//! * [`ProgramBuilder`]: a token sequence filled with `Push`/`Begin` and
//!   closed with `Close`. `Begin` opens a nested control builder which
//!   receives every following action until it completes.
//!
//! ## Contract
//! * Applying an action to a complete builder fails with
//!   [`Error::TokenAlreadyCompleted`] / [`Error::ProgramAlreadyCompleted`].
//! * Applying an action outside the legal set fails with
//!   [`Error::IllegalAction`] and leaves the builder unchanged.
//! * Executing or finishing an incomplete builder fails with
//!   [`Error::ApplyingIncompleteToken`] / [`Error::ProgramNotComplete`].
//!
//! A builder owns the [`TokenLibrary`] it draws from. `Push` and `Condition`
//! only accept the library's own token handles (compared by identity), and
//! `Begin` is only offered for control tokens whose condition slot the
//! library can fill, so an incomplete [`ProgramBuilder`] always has at least
//! one legal action.
use std::{fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{EnumIs, EnumIter, IntoEnumIterator};

use crate::{
    control::{If, LoopWhile, Recurse},
    env::Environment,
    library::TokenLibrary,
    magic::DEFAULT_RECURSION_LIMIT,
    program::{ExecutionContext, Program},
    token::{BoolTokenRef, EnvTokenRef, Token},
    utils::{Error, TokenResult},
};

/// Control-flow combinator a `Begin` action opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControlKind {
    If,
    Recurse,
    LoopWhile,
}

impl ControlKind {
    /// Number of token branches the combinator holds.
    pub fn branch_count(self) -> usize {
        match self {
            ControlKind::If | ControlKind::Recurse => 2,
            ControlKind::LoopWhile => 1,
        }
    }

    /// Whether the condition slot may be left empty.
    pub fn has_optional_condition(self) -> bool {
        matches!(self, ControlKind::Recurse)
    }
}

/// A single construction step.
///
/// Two actions are equal when they do the same thing with the same token
/// handle; tokens are compared by identity, not by value.
#[derive(Debug, Clone, EnumIs)]
pub enum Action<E> {
    /// Append a library token to the open sequence.
    Push(EnvTokenRef<E>),
    /// Open a control token in the open sequence.
    Begin(ControlKind),
    /// Fill the condition slot of the control token under construction.
    Condition(BoolTokenRef<E>),
    /// Leave an optional condition slot empty.
    NoCondition,
    /// Close the branch being filled.
    EndBranch,
    /// Close the program.
    Close,
}

impl<E> PartialEq for Action<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Action::Push(lhs), Action::Push(rhs)) => Arc::ptr_eq(lhs, rhs),
            (Action::Begin(lhs), Action::Begin(rhs)) => lhs == rhs,
            (Action::Condition(lhs), Action::Condition(rhs)) => Arc::ptr_eq(lhs, rhs),
            (Action::NoCondition, Action::NoCondition)
            | (Action::EndBranch, Action::EndBranch)
            | (Action::Close, Action::Close) => true,
            _ => false,
        }
    }
}

impl<E> fmt::Display for Action<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Push(token) => write!(f, "Push({})", token),
            Action::Begin(kind) => write!(f, "Begin({})", kind),
            Action::Condition(cond) => write!(f, "Condition({})", cond),
            Action::NoCondition => write!(f, "NoCondition"),
            Action::EndBranch => write!(f, "EndBranch"),
            Action::Close => write!(f, "Close"),
        }
    }
}

/// Incremental construction capability.
pub trait Completable<E> {
    /// Value produced once every slot is filled.
    type Output;

    fn is_complete(&self) -> bool;

    /// Actions that may be applied in the current state. Empty once complete.
    fn legal_actions(&self) -> Vec<Action<E>>;

    /// Fill one slot with an action from [`Completable::legal_actions`].
    fn apply_action(&mut self, action: Action<E>) -> TokenResult<()>;

    /// Consume the builder and produce its final form.
    fn finish(self) -> TokenResult<Self::Output>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Branch,
    Program,
}

impl Closing {
    fn action<E>(self) -> Action<E> {
        match self {
            Closing::Branch => Action::EndBranch,
            Closing::Program => Action::Close,
        }
    }

    fn accepts<E>(self, action: &Action<E>) -> bool {
        match self {
            Closing::Branch => action.is_end_branch(),
            Closing::Program => action.is_close(),
        }
    }
}

fn illegal<E>(action: Action<E>, state: String) -> Error {
    Error::IllegalAction {
        action: action.to_string(),
        state,
    }
}

/// Token sequence under construction, shared by branches and program bodies.
#[derive(Debug, Clone)]
struct SequenceBuilder<E> {
    tokens: Vec<Token<E>>,
    pending: Option<Box<ControlSlots<E>>>,
    /// Further control levels that may still be opened below this sequence.
    nesting: usize,
    closed: bool,
}

impl<E: Environment> SequenceBuilder<E> {
    fn new(nesting: usize) -> Self {
        SequenceBuilder {
            tokens: Vec::new(),
            pending: None,
            nesting,
            closed: false,
        }
    }

    fn legal_actions(&self, library: &TokenLibrary<E>, closing: Closing) -> Vec<Action<E>> {
        if self.closed {
            return Vec::new();
        }
        if let Some(pending) = &self.pending {
            return pending.legal_actions(library);
        }

        let mut actions: Vec<Action<E>> =
            library.env_tokens.iter().cloned().map(Action::Push).collect();
        if self.nesting > 0 {
            actions.extend(
                ControlKind::iter()
                    .filter(|kind| {
                        kind.has_optional_condition() || !library.bool_tokens.is_empty()
                    })
                    .map(Action::Begin),
            );
        }
        actions.push(closing.action());
        actions
    }

    fn apply_action(&mut self, action: Action<E>, closing: Closing) -> TokenResult<()> {
        if let Some(mut pending) = self.pending.take() {
            let result = pending.apply_action(action);
            if pending.is_complete() {
                self.tokens.push((*pending).finish()?);
            } else {
                self.pending = Some(pending);
            }
            return result;
        }

        match action {
            Action::Push(token) => self.tokens.push(Token::Atom(token)),
            Action::Begin(kind) if self.nesting > 0 => {
                self.pending = Some(Box::new(ControlSlots::new(kind, self.nesting - 1)));
            }
            action if closing.accepts(&action) => self.closed = true,
            action => return Err(illegal(action, self.state())),
        }
        Ok(())
    }

    /// State of the innermost open builder, for diagnostics.
    fn state(&self) -> String {
        match &self.pending {
            Some(pending) => pending.state(),
            None => format!(
                "filling a sequence of {} token(s) with {} nesting level(s) left",
                self.tokens.len(),
                self.nesting
            ),
        }
    }
}

impl<E> fmt::Display for SequenceBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<String> = self.tokens.iter().map(ToString::to_string).collect();
        match &self.pending {
            Some(pending) => items.push(pending.to_string()),
            None if !self.closed => items.push("?".to_string()),
            None => {}
        }
        write!(f, "[{}]", items.join(", "))
    }
}

#[derive(Debug, Clone)]
enum ConditionSlot<E> {
    Open,
    Absent,
    Filled(BoolTokenRef<E>),
}

/// Slots of one control token. The library lives with the outermost builder.
#[derive(Debug, Clone)]
struct ControlSlots<E> {
    kind: ControlKind,
    condition: ConditionSlot<E>,
    branches: SmallVec<SequenceBuilder<E>, 2>,
    nesting: usize,
}

impl<E: Environment> ControlSlots<E> {
    fn new(kind: ControlKind, nesting: usize) -> Self {
        ControlSlots {
            kind,
            condition: ConditionSlot::Open,
            branches: SmallVec::new(),
            nesting,
        }
    }

    fn is_complete(&self) -> bool {
        !matches!(self.condition, ConditionSlot::Open)
            && self.branches.len() == self.kind.branch_count()
            && self.branches.last().is_some_and(|branch| branch.closed)
    }

    fn legal_actions(&self, library: &TokenLibrary<E>) -> Vec<Action<E>> {
        if self.is_complete() {
            return Vec::new();
        }

        match self.condition {
            ConditionSlot::Open => {
                let mut actions: Vec<Action<E>> = library
                    .bool_tokens
                    .iter()
                    .cloned()
                    .map(Action::Condition)
                    .collect();
                if self.kind.has_optional_condition() {
                    actions.push(Action::NoCondition);
                }
                actions
            }
            _ => self
                .branches
                .last()
                .map(|branch| branch.legal_actions(library, Closing::Branch))
                .unwrap_or_default(),
        }
    }

    fn apply_action(&mut self, action: Action<E>) -> TokenResult<()> {
        if let ConditionSlot::Open = self.condition {
            self.condition = match action {
                Action::Condition(cond) => ConditionSlot::Filled(cond),
                Action::NoCondition if self.kind.has_optional_condition() => ConditionSlot::Absent,
                action => return Err(illegal(action, self.state())),
            };
            self.branches.push(SequenceBuilder::new(self.nesting));
            return Ok(());
        }

        let index = match self.branches.len() {
            0 => return Err(illegal(action, self.state())),
            len => len - 1,
        };
        let branch = &mut self.branches[index];
        branch.apply_action(action, Closing::Branch)?;
        let closed = branch.closed;
        if closed && self.branches.len() < self.kind.branch_count() {
            self.branches.push(SequenceBuilder::new(self.nesting));
        }
        Ok(())
    }

    fn finish(self) -> TokenResult<Token<E>> {
        if !self.is_complete() {
            return Err(Error::ApplyingIncompleteToken {
                token: self.to_string(),
            });
        }

        let kind = self.kind;
        let cond = match self.condition {
            ConditionSlot::Filled(cond) => Some(cond),
            _ => None,
        };
        let mut branches = self.branches.into_iter().map(|branch| branch.tokens);
        let first = branches.next().unwrap_or_default();
        let second = branches.next().unwrap_or_default();

        match (kind, cond) {
            (ControlKind::If, Some(cond)) => Ok(Token::If(If::new(cond, first, second))),
            (ControlKind::Recurse, cond) => Ok(Token::Recurse(Recurse::new(cond, first, second))),
            (ControlKind::LoopWhile, Some(cond)) => Ok(Token::LoopWhile(LoopWhile::new(cond, first))),
            (kind, None) => Err(Error::ApplyingIncompleteToken {
                token: format!("{}(?)", kind),
            }),
        }
    }

    fn state(&self) -> String {
        if let ConditionSlot::Open = self.condition {
            return format!("a {} awaiting its condition", self.kind);
        }
        match self.branches.last() {
            Some(branch) if branch.pending.is_some() => branch.state(),
            _ => format!(
                "a {} filling branch {} of {}",
                self.kind,
                self.branches.len(),
                self.kind.branch_count()
            ),
        }
    }
}

impl<E> fmt::Display for ControlSlots<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        match &self.condition {
            ConditionSlot::Open => write!(f, "?")?,
            ConditionSlot::Absent => write!(f, "None")?,
            ConditionSlot::Filled(cond) => write!(f, "{}", cond)?,
        }
        for index in 0..self.kind.branch_count() {
            match self.branches.get(index) {
                Some(branch) => write!(f, " {}", branch)?,
                None => write!(f, " ?")?,
            }
        }
        write!(f, ")")
    }
}

/// A control token under construction.
#[derive(Debug, Clone)]
pub struct ControlBuilder<E> {
    slots: ControlSlots<E>,
    library: Arc<TokenLibrary<E>>,
}

impl<E: Environment> ControlBuilder<E> {
    /// Builder whose branches accept library tokens only.
    pub fn new(kind: ControlKind, library: TokenLibrary<E>) -> Self {
        Self::with_nesting(kind, library, 0)
    }

    /// Builder whose branches may open up to `nesting` further control levels.
    pub fn with_nesting(kind: ControlKind, library: TokenLibrary<E>, nesting: usize) -> Self {
        ControlBuilder {
            slots: ControlSlots::new(kind, nesting),
            library: Arc::new(library),
        }
    }

    pub fn kind(&self) -> ControlKind {
        self.slots.kind
    }

    pub fn library(&self) -> &TokenLibrary<E> {
        &self.library
    }

    /// Execute the token. Fails while any slot is open.
    pub fn apply(&self, env: E, ctx: &mut ExecutionContext<'_, E>) -> TokenResult<E> {
        if !self.is_complete() {
            return Err(Error::ApplyingIncompleteToken {
                token: self.to_string(),
            });
        }
        self.slots.clone().finish()?.apply(env, ctx)
    }
}

impl<E: Environment> Completable<E> for ControlBuilder<E> {
    type Output = Token<E>;

    fn is_complete(&self) -> bool {
        self.slots.is_complete()
    }

    fn legal_actions(&self) -> Vec<Action<E>> {
        self.slots.legal_actions(&self.library)
    }

    fn apply_action(&mut self, action: Action<E>) -> TokenResult<()> {
        if self.is_complete() {
            return Err(Error::TokenAlreadyCompleted {
                token: self.to_string(),
            });
        }
        if !self.legal_actions().contains(&action) {
            return Err(illegal(action, self.slots.state()));
        }
        self.slots.apply_action(action)
    }

    fn finish(self) -> TokenResult<Token<E>> {
        self.slots.finish()
    }
}

impl<E> fmt::Display for ControlBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slots)
    }
}

/// A program under construction.
#[derive(Debug, Clone)]
pub struct ProgramBuilder<E> {
    body: SequenceBuilder<E>,
    library: Arc<TokenLibrary<E>>,
    recursion_limit: usize,
    actions_applied: usize,
}

impl<E: Environment> ProgramBuilder<E> {
    /// Empty builder drawing from `library` and allowing control tokens nested
    /// `max_nesting` levels deep.
    pub fn new(library: TokenLibrary<E>, max_nesting: usize) -> Self {
        ProgramBuilder {
            body: SequenceBuilder::new(max_nesting),
            library: Arc::new(library),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            actions_applied: 0,
        }
    }

    /// Recursive-call budget handed to the finished program.
    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    pub fn library(&self) -> &TokenLibrary<E> {
        &self.library
    }

    /// Number of actions successfully applied so far.
    pub fn actions_applied(&self) -> usize {
        self.actions_applied
    }

    /// Top-level tokens completed so far.
    pub fn tokens(&self) -> &[Token<E>] {
        &self.body.tokens
    }

    /// Execute the program being built. Fails while it is incomplete.
    pub fn interp(&self, env: E) -> TokenResult<E> {
        if !self.is_complete() {
            return Err(Error::ProgramNotComplete {
                program: self.to_string(),
            });
        }
        self.to_program().interp(env)
    }

    fn to_program(&self) -> Program<E> {
        Program::new(self.body.tokens.clone()).with_recursion_limit(self.recursion_limit)
    }
}

impl<E: Environment> Completable<E> for ProgramBuilder<E> {
    type Output = Program<E>;

    fn is_complete(&self) -> bool {
        self.body.closed
    }

    fn legal_actions(&self) -> Vec<Action<E>> {
        self.body.legal_actions(&self.library, Closing::Program)
    }

    fn apply_action(&mut self, action: Action<E>) -> TokenResult<()> {
        if self.is_complete() {
            return Err(Error::ProgramAlreadyCompleted {
                program: self.to_string(),
            });
        }
        if !self.legal_actions().contains(&action) {
            return Err(illegal(action, self.body.state()));
        }
        self.body.apply_action(action, Closing::Program)?;
        self.actions_applied += 1;
        Ok(())
    }

    fn finish(self) -> TokenResult<Program<E>> {
        if !self.is_complete() {
            return Err(Error::ProgramNotComplete {
                program: self.to_string(),
            });
        }
        Ok(Program::new(self.body.tokens).with_recursion_limit(self.recursion_limit))
    }
}

impl<E> fmt::Display for ProgramBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tests_utils::{AtGoal, Line, Move, line_library},
        token::{BoolToken, EnvToken},
        utils::join_display,
    };

    fn apply_all<C: Completable<Line>>(builder: &mut C, actions: Vec<Action<Line>>) {
        for action in actions {
            builder.apply_action(action).unwrap();
        }
    }

    // Handles taken from `line_library()`, which lists Move(1), Move(-1)
    // then AtGoal, Not(AtGoal).
    fn move_right(library: &TokenLibrary<Line>) -> Action<Line> {
        Action::Push(library.env_tokens[0].clone())
    }

    fn at_goal(library: &TokenLibrary<Line>) -> Action<Line> {
        Action::Condition(library.bool_tokens[0].clone())
    }

    fn not_at_goal(library: &TokenLibrary<Line>) -> Action<Line> {
        Action::Condition(library.bool_tokens[1].clone())
    }

    #[test]
    fn if_builder_fills_condition_then_branches() {
        let library = line_library();
        let mut builder = ControlBuilder::new(ControlKind::If, library.clone());
        assert!(!builder.is_complete());

        let actions = builder.legal_actions();
        assert_eq!(actions.len(), library.bool_tokens.len());
        assert!(actions.iter().all(Action::is_condition));

        builder.apply_action(at_goal(&library)).unwrap();
        assert_eq!(
            join_display(&builder.legal_actions()),
            "Push(Move(1)), Push(Move(-1)), EndBranch"
        );

        apply_all(&mut builder, vec![move_right(&library), Action::EndBranch]);
        assert!(!builder.is_complete());
        assert_eq!(builder.to_string(), "If(AtGoal [Move(1)] [?])");

        builder.apply_action(Action::EndBranch).unwrap();
        assert!(builder.is_complete());
        assert!(builder.legal_actions().is_empty());

        let token = builder.finish().unwrap();
        assert_eq!(token.to_string(), "If(AtGoal [Move(1)] [])");
    }

    #[test]
    fn optional_condition_only_for_recurse() {
        let recurse = ControlBuilder::new(ControlKind::Recurse, line_library());
        assert!(recurse.legal_actions().last().unwrap().is_no_condition());

        let mut loop_builder = ControlBuilder::new(ControlKind::LoopWhile, line_library());
        assert!(!loop_builder.legal_actions().iter().any(Action::is_no_condition));
        let err = loop_builder.apply_action(Action::NoCondition).unwrap_err();
        assert!(err.is_illegal_action());
        assert_eq!(loop_builder.to_string(), "LoopWhile(? ?)");
    }

    #[test]
    fn actions_on_complete_token_fail() {
        let library = line_library();
        let mut builder = ControlBuilder::new(ControlKind::LoopWhile, library.clone());
        apply_all(&mut builder, vec![not_at_goal(&library), Action::EndBranch]);
        assert!(builder.is_complete());

        let err = builder.apply_action(Action::EndBranch).unwrap_err();
        assert!(err.is_token_already_completed());
    }

    #[test]
    fn applying_incomplete_token_fails() {
        let mut builder = ControlBuilder::new(ControlKind::Recurse, line_library());
        builder.apply_action(Action::NoCondition).unwrap();

        let program = Program::<Line>::empty();
        let mut ctx = ExecutionContext::new(&program);
        let err = builder.apply(Line::new(0, 3), &mut ctx).unwrap_err();
        assert!(err.is_applying_incomplete_token());
        assert!(builder.clone().finish().unwrap_err().is_applying_incomplete_token());
    }

    #[test]
    fn complete_control_builder_applies_like_its_token() {
        let library = line_library();
        let mut builder = ControlBuilder::new(ControlKind::LoopWhile, library.clone());
        apply_all(
            &mut builder,
            vec![not_at_goal(&library), move_right(&library), Action::EndBranch],
        );
        let program = Program::<Line>::empty();
        let mut ctx = ExecutionContext::new(&program);
        assert_eq!(builder.apply(Line::new(1, 4), &mut ctx).unwrap().pos, 4);
    }

    #[test]
    fn illegal_action_leaves_builder_unchanged() {
        let library = line_library();
        let mut builder = ControlBuilder::new(ControlKind::If, library.clone());
        builder.apply_action(at_goal(&library)).unwrap();
        let before = builder.to_string();

        // No nesting allowed below this builder.
        let err = builder.apply_action(Action::Begin(ControlKind::If)).unwrap_err();
        assert!(err.is_illegal_action());
        let err = builder.apply_action(Action::Close).unwrap_err();
        assert!(err.is_illegal_action());
        assert_eq!(builder.to_string(), before);
    }

    #[test]
    fn tokens_outside_the_library_are_rejected() {
        let library = line_library();
        let mut builder = ControlBuilder::new(ControlKind::If, library.clone());

        // Same value as a library predicate, but not the library's handle.
        let err = builder
            .apply_action(Action::Condition(AtGoal.into_ref()))
            .unwrap_err();
        assert!(err.is_illegal_action());
        assert_eq!(builder.to_string(), "If(? ? ?)");

        builder.apply_action(at_goal(&library)).unwrap();
        let err = builder
            .apply_action(Action::Push(Move(1).into_ref()))
            .unwrap_err();
        assert!(err.is_illegal_action());
        assert_eq!(builder.to_string(), "If(AtGoal [?] ?)");
    }

    #[test]
    fn actions_compare_tokens_by_identity() {
        let library = line_library();
        assert_eq!(move_right(&library), move_right(&library));
        assert_ne!(move_right(&library), Action::Push(Move(1).into_ref()));
        assert_ne!(at_goal(&library), not_at_goal(&library));
        assert_eq!(
            Action::<Line>::Begin(ControlKind::If),
            Action::Begin(ControlKind::If)
        );
        assert_ne!(Action::<Line>::EndBranch, Action::Close);
    }

    #[test]
    fn program_builder_nests_control_tokens() {
        let library = line_library();
        let mut builder = ProgramBuilder::new(library.clone(), 1);

        assert_eq!(
            join_display(&builder.legal_actions()),
            "Push(Move(1)), Push(Move(-1)), Begin(If), Begin(Recurse), Begin(LoopWhile), Close"
        );

        apply_all(
            &mut builder,
            vec![
                Action::Begin(ControlKind::Recurse),
                not_at_goal(&library),
                Action::EndBranch,
            ],
        );
        assert_eq!(builder.to_string(), "[Recurse(Not(AtGoal) [] [?])]");

        // Close is not legal while the recursion is still open.
        assert!(
            builder
                .apply_action(Action::Close)
                .unwrap_err()
                .is_illegal_action()
        );
        assert!(
            builder
                .apply_action(Action::Begin(ControlKind::If))
                .unwrap_err()
                .is_illegal_action()
        );
        assert_eq!(builder.actions_applied(), 3);

        apply_all(&mut builder, vec![move_right(&library), Action::EndBranch]);
        assert_eq!(builder.tokens().len(), 1);
        assert!(!builder.is_complete());
        assert!(
            builder
                .interp(Line::new(0, 3))
                .unwrap_err()
                .is_program_not_complete()
        );

        builder.apply_action(Action::Close).unwrap();
        assert!(builder.is_complete());
        assert_eq!(builder.actions_applied(), 6);
        assert_eq!(builder.interp(Line::new(0, 3)).unwrap().pos, 3);

        let err = builder.apply_action(Action::Close).unwrap_err();
        assert!(err.is_program_already_completed());

        let program = builder.finish().unwrap();
        assert_eq!(program.to_string(), "[Recurse(Not(AtGoal) [] [Move(1)])]");
    }

    #[test]
    fn every_legal_action_is_accepted() {
        let mut frontier = vec![ProgramBuilder::new(line_library(), 2)];
        let mut expanded = 0;

        while let Some(node) = frontier.pop() {
            if node.actions_applied() >= 4 {
                continue;
            }
            for action in node.legal_actions() {
                let mut child = node.clone();
                child.apply_action(action).unwrap();
                assert_eq!(child.actions_applied(), node.actions_applied() + 1);
                if !child.is_complete() {
                    assert!(!child.legal_actions().is_empty(), "{} has no way forward", child);
                    frontier.push(child);
                }
                expanded += 1;
            }
        }
        assert!(expanded > 100);
    }

    #[test]
    fn begin_without_predicates_is_pruned() {
        let library = TokenLibrary::<Line>::default().with_env_token(Move(1));
        let builder = ProgramBuilder::new(library, 1);
        assert_eq!(
            join_display(&builder.legal_actions()),
            "Push(Move(1)), Begin(Recurse), Close"
        );
    }

    #[test]
    fn actions_outside_the_legal_set_are_rejected() {
        let library = TokenLibrary::<Line>::default().with_env_token(Move(1));
        let mut builder = ProgramBuilder::new(library, 1);
        let legal_before = join_display(&builder.legal_actions());

        for action in [
            Action::Begin(ControlKind::If),
            Action::Begin(ControlKind::LoopWhile),
            Action::Push(Move(1).into_ref()),
            Action::Push(Move(-1).into_ref()),
            Action::NoCondition,
            Action::EndBranch,
        ] {
            let err = builder.apply_action(action).unwrap_err();
            assert!(err.is_illegal_action());
            assert_eq!(builder.to_string(), "[?]");
            assert_eq!(builder.actions_applied(), 0);
            assert_eq!(join_display(&builder.legal_actions()), legal_before);
        }

        // The library's own handle is accepted.
        let push = builder.legal_actions().remove(0);
        builder.apply_action(push).unwrap();
        assert_eq!(builder.to_string(), "[Move(1), ?]");
    }

    #[test]
    fn finishing_incomplete_program_fails() {
        let library = line_library();
        let mut builder = ProgramBuilder::new(library.clone(), 0);
        builder.apply_action(move_right(&library)).unwrap();
        assert_eq!(builder.to_string(), "[Move(1), ?]");
        assert!(builder.finish().unwrap_err().is_program_not_complete());
    }

    #[test]
    fn recursion_limit_is_carried_to_the_program() {
        let library = line_library();
        let mut builder = ProgramBuilder::new(library.clone(), 1).with_recursion_limit(2);
        apply_all(
            &mut builder,
            vec![
                Action::Begin(ControlKind::Recurse),
                not_at_goal(&library),
                Action::EndBranch,
                move_right(&library),
                Action::EndBranch,
                Action::Close,
            ],
        );
        let program = builder.finish().unwrap();
        assert_eq!(program.recursion_limit(), 2);
        assert!(
            program
                .interp(Line::new(0, 3))
                .unwrap_err()
                .is_recursion_limit_exceeded()
        );
    }
}

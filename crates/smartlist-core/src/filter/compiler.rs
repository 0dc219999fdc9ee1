//! Compilation of filter trees into backend predicates.
//!
//! Compilation is pure: it only builds predicates and never touches the store.

use super::ast::{Conjunction, ConjunctionNode, FilterNode};
use super::criterion::Condition;
use super::error::FilterResult;
use crate::backend::QueryBackend;

/// Compiles filter trees against one backend.
///
/// Children are combined left to right with the backend's `and` / `or`. An
/// empty AND group compiles to [`QueryBackend::match_all`] and an empty OR
/// group to [`QueryBackend::match_none`]; the compiler never relies on how a
/// backend treats an empty group.
///
/// # Example
///
/// ```
/// use smartlist_core::backend::{MemoryBackend, Row};
/// use smartlist_core::filter::{Conjunction, ConjunctionNode, FilterNode, PredicateCompiler};
///
/// let backend = MemoryBackend::new();
/// let nothing = FilterNode::from(ConjunctionNode::empty(Conjunction::Or));
/// let pred = PredicateCompiler::new(&backend).compile(&nothing).unwrap();
/// assert!(!pred.matches(&Row::new()));
/// ```
pub struct PredicateCompiler<'a, B: QueryBackend> {
    backend: &'a B,
}

impl<'a, B: QueryBackend> PredicateCompiler<'a, B> {
    /// Creates a compiler for `backend`.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Compiles a tree.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::BackendPredicate` if a leaf or the backend
    /// cannot build a predicate. The error is passed through unchanged.
    pub fn compile(&self, node: &FilterNode) -> FilterResult<B::Predicate> {
        match node {
            FilterNode::Leaf(leaf) => self.lower(&leaf.criterion().condition()?),
            FilterNode::Conjunction(group) => self.compile_group(group),
        }
    }

    fn compile_group(&self, group: &ConjunctionNode) -> FilterResult<B::Predicate> {
        let compiled = group
            .children()
            .iter()
            .map(|child| self.compile(child))
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(self.fold(group.operator(), compiled))
    }

    fn fold(&self, operator: Conjunction, predicates: Vec<B::Predicate>) -> B::Predicate {
        let mut iter = predicates.into_iter();
        let Some(first) = iter.next() else {
            return match operator {
                Conjunction::And => self.backend.match_all(),
                Conjunction::Or => self.backend.match_none(),
            };
        };
        iter.fold(first, |acc, next| match operator {
            Conjunction::And => self.backend.and(acc, next),
            Conjunction::Or => self.backend.or(acc, next),
        })
    }

    /// Lowers a leaf's condition through the backend.
    fn lower(&self, condition: &Condition) -> FilterResult<B::Predicate> {
        match condition {
            Condition::Equals { field, value } => self.backend.equals(field, value),
            Condition::NotEquals { field, value } => self.backend.not_equals(field, value),
            Condition::Like { field, pattern } => self.backend.like(field, pattern),
            Condition::All(inner) => {
                let lowered = inner
                    .iter()
                    .map(|c| self.lower(c))
                    .collect::<FilterResult<Vec<_>>>()?;
                Ok(self.fold(Conjunction::And, lowered))
            }
            Condition::Any(inner) => {
                let lowered = inner
                    .iter()
                    .map(|c| self.lower(c))
                    .collect::<FilterResult<Vec<_>>>()?;
                Ok(self.fold(Conjunction::Or, lowered))
            }
        }
    }
}

impl FilterNode {
    /// Compiles this tree into a predicate for `backend`.
    pub fn compile<B: QueryBackend>(&self, backend: &B) -> FilterResult<B::Predicate> {
        tracing::debug!(leaves = self.leaf_count(), depth = self.depth(), "compiling filter");
        PredicateCompiler::new(backend).compile(self)
    }
}

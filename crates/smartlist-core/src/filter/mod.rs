//! Smart-list filter expressions.
//!
//! A smart list is defined by a tree of [`FilterNode`]s: leaves are atomic
//! criteria, inner nodes are AND/OR [`ConjunctionNode`]s. This module covers
//! everything done with such a tree:
//!
//! - **Building**: [`ConjunctionNode::new`], [`ConjunctionNode::wrap`] and
//!   whole-list replacement via [`ConjunctionNode::with_children`].
//! - **Persisting**: the [`tagged`] codec with a [`TypeRegistry`], which
//!   round-trips trees exactly.
//! - **Exporting**: the compact [textual form](text), written by
//!   [`FilterNode::to_text`] and read back (lossily) by [`TextReader`].
//! - **Evaluating**: [`PredicateCompiler`] turns a tree into a predicate of any
//!   [`QueryBackend`](crate::backend::QueryBackend).
//! - **Describing**: [`SummaryFormatter`] renders localized text such as
//!   `(name matches '%milk%' or tag is home) and status is open`.
//!
//! # Example
//!
//! ```
//! use smartlist_core::backend::{MemoryBackend, Row};
//! use smartlist_core::filter::criteria::FieldEquals;
//! use smartlist_core::filter::{Catalog, Conjunction, ConjunctionNode, FilterNode, Leaf, TypeRegistry};
//!
//! let open = Leaf::new(FieldEquals::new("status", "open")).unwrap();
//! let urgent = Leaf::new(FieldEquals::new("tag", "urgent")).unwrap();
//! let tree = FilterNode::from(ConjunctionNode::new(
//!     Conjunction::And,
//!     vec![open.into(), urgent.into()],
//! ));
//!
//! assert_eq!(tree.to_text(), "[status=open,tag=urgent]");
//! assert_eq!(tree.summary(&Catalog::builtin(), "en"), "status is open and tag is urgent");
//!
//! let bytes = tree.to_tagged_bytes().unwrap();
//! let restored = FilterNode::from_tagged_bytes(&bytes, &TypeRegistry::with_builtin()).unwrap();
//! assert_eq!(restored, tree);
//!
//! let predicate = tree.compile(&MemoryBackend::new()).unwrap();
//! assert!(!predicate.matches(&Row::new()));
//! ```

mod ast;
mod compiler;
pub mod criteria;
mod criterion;
mod error;
mod lexer;
mod parser;
mod registry;
mod summary;
pub mod tagged;
pub mod text;

pub use ast::{Conjunction, ConjunctionNode, FilterNode, MAX_DEPTH};
pub use compiler::PredicateCompiler;
pub use criterion::{Condition, Criterion, CriterionKind, Leaf, Value};
pub use error::{FilterError, FilterResult};
pub use parser::TextReader;
pub use registry::TypeRegistry;
pub use summary::{
    localized_operator_word, localized_operator_word_for_ordinal, Catalog, Localizer, Phrase,
    SummaryFormatter,
};
pub use tagged::{Decoded, TaggedDecoder, UnknownLeafPolicy};

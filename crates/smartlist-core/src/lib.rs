//! Filter-expression engine for smart lists.
//!
//! A smart list is a named view over stored items, defined by an arbitrary
//! AND/OR combination of atomic criteria. This crate owns that expression
//! tree: building it, persisting and restoring it exactly, compiling it into
//! store-level predicates, and rendering it as localized text.
//!
//! - [`filter`] - the tree, its codecs, the compiler and the summary formatter
//! - [`backend`] - the query-backend contract plus in-memory and SQL backends
//!
//! Storage of rows and of the persisted bytes belongs to the application; the
//! core only builds predicates and byte payloads for it.

pub mod backend;
pub mod filter;

pub use filter::{Conjunction, ConjunctionNode, FilterError, FilterNode, FilterResult};

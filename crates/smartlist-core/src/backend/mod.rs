//! Query backends that compiled filters target.
//!
//! A backend is a predicate builder: it turns field comparisons into its own
//! predicate type and combines predicates with AND / OR. The core never runs
//! queries itself; it only hands fully built predicates to the backend's owner.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryBackend`] evaluates predicates against in-memory rows.
//! - [`SqlBackend`] renders a parameterized SQL `WHERE` fragment.

mod memory;
mod sql;

pub use memory::{MemoryBackend, MemoryPredicate, Row};
pub use sql::{SqlBackend, SqlPredicate};

use crate::filter::{FilterResult, Value};

/// Predicate-builder capability a query store exposes.
pub trait QueryBackend {
    /// The backend's compiled predicate type.
    type Predicate;

    /// `field == value`.
    fn equals(&self, field: &str, value: &Value) -> FilterResult<Self::Predicate>;

    /// `field != value`.
    fn not_equals(&self, field: &str, value: &Value) -> FilterResult<Self::Predicate>;

    /// `field LIKE pattern`.
    fn like(&self, field: &str, pattern: &str) -> FilterResult<Self::Predicate>;

    /// Both predicates hold.
    fn and(&self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;

    /// Either predicate holds.
    fn or(&self, left: Self::Predicate, right: Self::Predicate) -> Self::Predicate;

    /// A predicate matching every row (identity of AND).
    fn match_all(&self) -> Self::Predicate;

    /// A predicate matching no row (identity of OR).
    fn match_none(&self) -> Self::Predicate;
}

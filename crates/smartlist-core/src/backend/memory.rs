//! In-memory backend: predicates evaluated directly against rows.

use std::collections::BTreeMap;

use super::QueryBackend;
use crate::filter::{FilterResult, Value};

/// A row: field name → value. Missing fields behave like SQL NULL.
pub type Row = BTreeMap<String, Value>;

/// Predicate tree evaluated by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryPredicate {
    /// Matches every row.
    All,
    /// Matches no row.
    Nothing,
    /// Field equals value.
    Equals(String, Value),
    /// Field differs from value.
    NotEquals(String, Value),
    /// Text field matches a lowercase `LIKE` pattern.
    Like(String, String),
    /// Logical AND.
    And(Box<MemoryPredicate>, Box<MemoryPredicate>),
    /// Logical OR.
    Or(Box<MemoryPredicate>, Box<MemoryPredicate>),
}

impl MemoryPredicate {
    /// Returns true if the row satisfies the predicate.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            MemoryPredicate::All => true,
            MemoryPredicate::Nothing => false,
            MemoryPredicate::Equals(field, value) => field_value(row, field) == value,
            MemoryPredicate::NotEquals(field, value) => field_value(row, field) != value,
            MemoryPredicate::Like(field, pattern) => match row.get(field) {
                Some(Value::Text(text)) => like_match(&text.to_lowercase(), pattern),
                _ => false,
            },
            MemoryPredicate::And(left, right) => left.matches(row) && right.matches(row),
            MemoryPredicate::Or(left, right) => left.matches(row) || right.matches(row),
        }
    }
}

fn field_value<'a>(row: &'a Row, field: &str) -> &'a Value {
    row.get(field).unwrap_or(&Value::Null)
}

/// SQL `LIKE` matching: `%` is any run of characters, `_` exactly one.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // Iterative wildcard match with single backtrack point.
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

/// Backend over in-memory rows.
///
/// # Example
///
/// ```
/// use smartlist_core::backend::{MemoryBackend, QueryBackend, Row};
///
/// let backend = MemoryBackend::new();
/// let pred = backend.equals("status", &"open".into()).unwrap();
///
/// let mut row = Row::new();
/// row.insert("status".to_string(), "open".into());
/// assert!(pred.matches(&row));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

impl MemoryBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }

    /// Returns the rows matching `predicate`, in input order.
    pub fn filter_rows<'a>(&self, predicate: &MemoryPredicate, rows: &'a [Row]) -> Vec<&'a Row> {
        rows.iter().filter(|row| predicate.matches(row)).collect()
    }
}

impl QueryBackend for MemoryBackend {
    type Predicate = MemoryPredicate;

    fn equals(&self, field: &str, value: &Value) -> FilterResult<MemoryPredicate> {
        Ok(MemoryPredicate::Equals(field.to_string(), value.clone()))
    }

    fn not_equals(&self, field: &str, value: &Value) -> FilterResult<MemoryPredicate> {
        Ok(MemoryPredicate::NotEquals(field.to_string(), value.clone()))
    }

    fn like(&self, field: &str, pattern: &str) -> FilterResult<MemoryPredicate> {
        Ok(MemoryPredicate::Like(field.to_string(), pattern.to_lowercase()))
    }

    fn and(&self, left: MemoryPredicate, right: MemoryPredicate) -> MemoryPredicate {
        MemoryPredicate::And(Box::new(left), Box::new(right))
    }

    fn or(&self, left: MemoryPredicate, right: MemoryPredicate) -> MemoryPredicate {
        MemoryPredicate::Or(Box::new(left), Box::new(right))
    }

    fn match_all(&self) -> MemoryPredicate {
        MemoryPredicate::All
    }

    fn match_none(&self) -> MemoryPredicate {
        MemoryPredicate::Nothing
    }
}

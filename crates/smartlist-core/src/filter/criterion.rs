//! The leaf criterion contract.
//!
//! A leaf is an atomic filter criterion: an opaque payload plus a stable type
//! tag. The tree treats every leaf uniformly through the [`Criterion`] trait;
//! concrete criteria live outside the core (see [`super::criteria`] for the
//! stock field criteria).

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{FilterError, FilterResult};
use super::summary::Localizer;

/// A scalar stored in a row field or carried by a criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent / SQL NULL.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Free text.
    Text(String),
}

impl Value {
    /// Reads a value from its textual form.
    ///
    /// `null`, `true`/`false` and integers are recognized; anything else is text.
    pub fn from_text(text: &str) -> Self {
        match text {
            "null" => Value::Null,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => other
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(other.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Backend-neutral description of the predicate a leaf stands for.
///
/// The compiler lowers a `Condition` through a
/// [`QueryBackend`](crate::backend::QueryBackend), so leaves never depend on a
/// concrete backend type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field == value`.
    Equals { field: String, value: Value },
    /// `field != value`.
    NotEquals { field: String, value: Value },
    /// `field LIKE pattern` (`%` and `_` wildcards).
    Like { field: String, pattern: String },
    /// Every inner condition holds. Empty matches every row.
    All(Vec<Condition>),
    /// Any inner condition holds. Empty matches no row.
    Any(Vec<Condition>),
}

/// Capabilities every leaf criterion provides.
pub trait Criterion: fmt::Debug + Send + Sync + 'static {
    /// Stable identifier used to select the reconstruction factory.
    fn type_tag(&self) -> &'static str;

    /// Criterion-specific data written into the tagged form.
    fn payload(&self) -> serde_json::Result<serde_json::Value>;

    /// Textual-form encoding. Must not contain unescaped `[`, `]` or `,`.
    fn to_text(&self) -> String;

    /// The predicate this criterion stands for.
    fn condition(&self) -> FilterResult<Condition>;

    /// Standalone description, e.g. "status is open".
    fn describe(&self, localizer: &dyn Localizer, locale: &str) -> String;

    /// Description used when the leaf appears inside a combined expression.
    fn describe_in_conjunction(&self, localizer: &dyn Localizer, locale: &str) -> String {
        self.describe(localizer, locale)
    }
}

/// A criterion that can be registered generically with a
/// [`TypeRegistry`](super::registry::TypeRegistry).
pub trait CriterionKind: Criterion + DeserializeOwned + Sized {
    /// The tag returned by [`Criterion::type_tag`].
    const TYPE_TAG: &'static str;

    /// Reads the criterion back from its textual form, if recognized.
    fn from_text(_text: &str) -> Option<Self> {
        None
    }
}

/// A leaf node: a shared criterion plus its captured payload.
///
/// Two leaves are equal when their type tags and payloads are equal, which is
/// exactly what survives a tagged round-trip.
#[derive(Clone)]
pub struct Leaf {
    criterion: Arc<dyn Criterion>,
    payload: serde_json::Value,
}

impl Leaf {
    /// Wraps a criterion, capturing its payload.
    pub fn new(criterion: impl Criterion) -> FilterResult<Self> {
        Self::from_arc(Arc::new(criterion))
    }

    /// Wraps an already shared criterion.
    pub fn from_arc(criterion: Arc<dyn Criterion>) -> FilterResult<Self> {
        let payload = criterion
            .payload()
            .map_err(|e| FilterError::InvalidCriterion {
                tag: criterion.type_tag().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { criterion, payload })
    }

    /// The criterion's type tag.
    pub fn type_tag(&self) -> &'static str {
        self.criterion.type_tag()
    }

    /// The payload captured at construction.
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// The wrapped criterion.
    pub fn criterion(&self) -> &dyn Criterion {
        self.criterion.as_ref()
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.type_tag() == other.type_tag() && self.payload == other.payload
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("tag", &self.type_tag())
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_text() {
        assert_eq!(Value::from_text("null"), Value::Null);
        assert_eq!(Value::from_text("true"), Value::Bool(true));
        assert_eq!(Value::from_text("-12"), Value::Integer(-12));
        assert_eq!(Value::from_text("open"), Value::Text("open".to_string()));
    }

    #[test]
    fn test_value_serde_untagged() {
        let values = vec![Value::Null, Value::Bool(false), Value::Integer(3), "x".into()];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,false,3,"x"]"#);
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[derive(Debug)]
    struct Unserializable;

    impl Criterion for Unserializable {
        fn type_tag(&self) -> &'static str {
            "unserializable"
        }
        fn payload(&self) -> serde_json::Result<serde_json::Value> {
            Err(serde::ser::Error::custom("map key must be a string"))
        }
        fn to_text(&self) -> String {
            String::new()
        }
        fn condition(&self) -> FilterResult<Condition> {
            Ok(Condition::Any(Vec::new()))
        }
        fn describe(&self, _: &dyn Localizer, _: &str) -> String {
            String::new()
        }
    }

    #[test]
    fn test_leaf_reports_payload_failure_as_invalid_criterion() {
        let err = Leaf::new(Unserializable).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidCriterion {
                tag: "unserializable".to_string(),
                reason: "map key must be a string".to_string(),
            }
        );
    }
}

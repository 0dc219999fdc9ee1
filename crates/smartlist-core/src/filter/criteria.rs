//! Stock field criteria.
//!
//! These generic leaves compare a single row field. Applications with richer
//! criteria (date ranges, tag membership, ...) implement [`Criterion`] and
//! [`CriterionKind`] themselves and register them the same way.

use serde::{Deserialize, Serialize};

use super::criterion::{Condition, Criterion, CriterionKind, Value};
use super::error::{FilterError, FilterResult};
use super::summary::{Localizer, Phrase};
use super::text::{escape, split_operator};

fn require_field(field: &str) -> FilterResult<()> {
    if field.is_empty() {
        return Err(FilterError::backend("criterion has an empty field name"));
    }
    Ok(())
}

/// Matches rows whose `field` equals `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEquals {
    pub field: String,
    pub value: Value,
}

impl FieldEquals {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl Criterion for FieldEquals {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn to_text(&self) -> String {
        format!("{}={}", escape(&self.field), escape(&self.value.to_string()))
    }

    fn condition(&self) -> FilterResult<Condition> {
        require_field(&self.field)?;
        Ok(Condition::Equals {
            field: self.field.clone(),
            value: self.value.clone(),
        })
    }

    fn describe(&self, localizer: &dyn Localizer, locale: &str) -> String {
        format!(
            "{} {} {}",
            self.field,
            localizer.text(Phrase::Is, locale),
            self.value
        )
    }
}

impl CriterionKind for FieldEquals {
    const TYPE_TAG: &'static str = "field_eq";

    fn from_text(text: &str) -> Option<Self> {
        match split_operator(text)? {
            (field, "=", value) => Some(Self::new(field, Value::from_text(&value))),
            _ => None,
        }
    }
}

/// Matches rows whose `field` differs from `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNotEquals {
    pub field: String,
    pub value: Value,
}

impl FieldNotEquals {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl Criterion for FieldNotEquals {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn to_text(&self) -> String {
        format!("{}!={}", escape(&self.field), escape(&self.value.to_string()))
    }

    fn condition(&self) -> FilterResult<Condition> {
        require_field(&self.field)?;
        Ok(Condition::NotEquals {
            field: self.field.clone(),
            value: self.value.clone(),
        })
    }

    fn describe(&self, localizer: &dyn Localizer, locale: &str) -> String {
        format!(
            "{} {} {}",
            self.field,
            localizer.text(Phrase::IsNot, locale),
            self.value
        )
    }
}

impl CriterionKind for FieldNotEquals {
    const TYPE_TAG: &'static str = "field_ne";

    fn from_text(text: &str) -> Option<Self> {
        match split_operator(text)? {
            (field, "!=", value) => Some(Self::new(field, Value::from_text(&value))),
            _ => None,
        }
    }
}

/// Matches rows whose text `field` matches a `LIKE` pattern.
///
/// `%` matches any run of characters and `_` exactly one; matching ignores case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLike {
    pub field: String,
    pub pattern: String,
}

impl FieldLike {
    pub fn new(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            pattern: pattern.into(),
        }
    }
}

impl Criterion for FieldLike {
    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn to_text(&self) -> String {
        format!("{}~{}", escape(&self.field), escape(&self.pattern))
    }

    fn condition(&self) -> FilterResult<Condition> {
        require_field(&self.field)?;
        Ok(Condition::Like {
            field: self.field.clone(),
            pattern: self.pattern.clone(),
        })
    }

    fn describe(&self, localizer: &dyn Localizer, locale: &str) -> String {
        format!(
            "{} {} '{}'",
            self.field,
            localizer.text(Phrase::Matches, locale),
            self.pattern
        )
    }
}

impl CriterionKind for FieldLike {
    const TYPE_TAG: &'static str = "field_like";

    fn from_text(text: &str) -> Option<Self> {
        match split_operator(text)? {
            (field, "~", pattern) => Some(Self::new(field, pattern)),
            _ => None,
        }
    }
}

//! SQL backend: renders a parameterized `WHERE` fragment.

use super::QueryBackend;
use crate::filter::{FilterError, FilterResult, Value};

/// A rendered SQL condition with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlPredicate {
    /// SQL text using `?` placeholders.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<Value>,
}

impl SqlPredicate {
    fn literal(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            params: Vec::new(),
        }
    }

    fn combine(left: Self, keyword: &str, right: Self) -> Self {
        let mut params = left.params;
        params.extend(right.params);
        Self {
            sql: format!("({}) {} ({})", left.sql, keyword, right.sql),
            params,
        }
    }
}

/// Backend producing SQL fragments with `?` placeholders and double-quoted
/// identifiers.
///
/// `NULL` values compare with `IS` / `IS NOT`. Inequality is null-safe: a row
/// whose column is `NULL` satisfies `field != value`, like [`MemoryBackend`].
///
/// [`MemoryBackend`]: super::MemoryBackend
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlBackend;

impl SqlBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }

    fn column(field: &str) -> FilterResult<String> {
        let mut chars = field.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::backend(format!(
                "invalid column name '{field}'"
            )));
        }
        Ok(format!("\"{field}\""))
    }
}

impl QueryBackend for SqlBackend {
    type Predicate = SqlPredicate;

    fn equals(&self, field: &str, value: &Value) -> FilterResult<SqlPredicate> {
        let column = Self::column(field)?;
        Ok(match value {
            Value::Null => SqlPredicate::literal(&format!("{column} IS NULL")),
            other => SqlPredicate {
                sql: format!("{column} = ?"),
                params: vec![other.clone()],
            },
        })
    }

    fn not_equals(&self, field: &str, value: &Value) -> FilterResult<SqlPredicate> {
        let column = Self::column(field)?;
        Ok(match value {
            Value::Null => SqlPredicate::literal(&format!("{column} IS NOT NULL")),
            other => SqlPredicate {
                sql: format!("({column} IS NULL OR {column} <> ?)"),
                params: vec![other.clone()],
            },
        })
    }

    fn like(&self, field: &str, pattern: &str) -> FilterResult<SqlPredicate> {
        let column = Self::column(field)?;
        Ok(SqlPredicate {
            sql: format!("LOWER({column}) LIKE ?"),
            params: vec![Value::Text(pattern.to_lowercase())],
        })
    }

    fn and(&self, left: SqlPredicate, right: SqlPredicate) -> SqlPredicate {
        SqlPredicate::combine(left, "AND", right)
    }

    fn or(&self, left: SqlPredicate, right: SqlPredicate) -> SqlPredicate {
        SqlPredicate::combine(left, "OR", right)
    }

    fn match_all(&self) -> SqlPredicate {
        SqlPredicate::literal("1=1")
    }

    fn match_none(&self) -> SqlPredicate {
        SqlPredicate::literal("1=0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_renders_placeholder() {
        let pred = SqlBackend::new().equals("status", &"open".into()).unwrap();
        assert_eq!(pred.sql, r#""status" = ?"#);
        assert_eq!(pred.params, vec![Value::Text("open".to_string())]);
    }

    #[test]
    fn test_null_comparisons() {
        let backend = SqlBackend::new();
        assert_eq!(
            backend.equals("due", &Value::Null).unwrap().sql,
            r#""due" IS NULL"#
        );
        assert_eq!(
            backend.not_equals("due", &Value::Null).unwrap().sql,
            r#""due" IS NOT NULL"#
        );
    }

    #[test]
    fn test_not_equals_is_null_safe() {
        let pred = SqlBackend::new().not_equals("tag", &"x".into()).unwrap();
        assert_eq!(pred.sql, r#"("tag" IS NULL OR "tag" <> ?)"#);
    }

    #[test]
    fn test_combinators_keep_param_order() {
        let backend = SqlBackend::new();
        let a = backend.equals("a", &Value::Integer(1)).unwrap();
        let b = backend.like("b", "X%").unwrap();
        let pred = backend.or(a, b);
        assert_eq!(pred.sql, r#"("a" = ?) OR (LOWER("b") LIKE ?)"#);
        assert_eq!(pred.params, vec![Value::Integer(1), Value::Text("x%".to_string())]);
    }

    #[test]
    fn test_rejects_unsafe_column_names() {
        let backend = SqlBackend::new();
        for field in ["", "1abc", "a b", "x\"; DROP TABLE t; --"] {
            let err = backend.equals(field, &Value::Null).unwrap_err();
            assert!(matches!(err, FilterError::BackendPredicate { .. }), "{field}");
        }
        assert!(backend.equals("_due_at2", &Value::Null).is_ok());
    }

    #[test]
    fn test_identities() {
        let backend = SqlBackend::new();
        assert_eq!(backend.match_all().sql, "1=1");
        assert_eq!(backend.match_none().sql, "1=0");
    }
}

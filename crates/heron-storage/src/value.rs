//! Positional arguments and dynamically shaped rows.

use indexmap::IndexMap;
use serde_json::Value;

/// One result row: column name to value, in projection order.
pub type Row = IndexMap<String, Value>;

/// A positional statement argument, bound as `$1`, `$2`, ...
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    /// SQL `NULL`.
    Null,
    /// 64-bit integer.
    Integer(i64),
    /// Double-precision float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Boolean, stored by SQLite as `0`/`1`.
    Bool(bool),
}

impl From<i64> for SqlArg {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for SqlArg {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u32> for SqlArg {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for SqlArg {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for SqlArg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for SqlArg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for SqlArg {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl<T: Into<SqlArg>> From<Option<T>> for SqlArg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(SqlArg::from(7_i32), SqlArg::Integer(7));
        assert_eq!(SqlArg::from("John Doe"), SqlArg::Text("John Doe".into()));
        assert_eq!(SqlArg::from(None::<i64>), SqlArg::Null);
        assert_eq!(SqlArg::from(Some(true)), SqlArg::Bool(true));
    }

    #[test]
    fn test_row_keeps_column_order() {
        let mut row = Row::new();
        row.insert("id".into(), Value::from(1));
        row.insert("name".into(), Value::from("John Doe"));
        row.insert("email".into(), Value::from("johndoe@example.com"));

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"John Doe","email":"johndoe@example.com"}"#
        );
    }
}

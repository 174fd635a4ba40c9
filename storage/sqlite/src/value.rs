//! SQLite values, named parameter bindings and result rows

use std::sync::Arc;

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single SQLite value, one variant per storage class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Get the SQLite storage class name
    pub fn sqlite_type(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(f) => ValueRef::Real(*f),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        }))
    }
}

/// Convert rusqlite Value to our Value
impl From<rusqlite::types::Value> for Value {
    fn from(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null => Value::Null,
            rusqlite::types::Value::Integer(i) => Value::Integer(i),
            rusqlite::types::Value::Real(f) => Value::Real(f),
            rusqlite::types::Value::Text(s) => Value::Text(s),
            rusqlite::types::Value::Blob(b) => Value::Blob(b),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Integer(if b { 1 } else { 0 }),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Real(f)
                } else {
                    Value::Text(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            // arrays and objects are stored as JSON text
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Real(f) => serde_json::Value::from(*f),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Blob(b) => serde_json::Value::from(b.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Integer(i) }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Integer(i as i64) }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self { Value::Integer(i as i64) }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self { Value::Real(f) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Integer(if b { 1 } else { 0 }) }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self { Value::Blob(b) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Named parameter bindings for one execution.
///
/// Keys are placeholder names. A key without a `$`, `:` or `@` sigil is taken to mean the
/// `$`-prefixed placeholder, so `name` binds `$name`. Binding a name the statement does not
/// declare fails the execution with the engine's error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self { Self::default() }

    pub fn bind(mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a binding, replacing an earlier value for the same placeholder
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<Value>) {
        let key = placeholder(name.as_ref());
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Value bound to a placeholder, with or without its sigil
    pub fn get(&self, name: &str) -> Option<&Value> {
        let key = placeholder(name);
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> { self.0.iter().map(|(k, v)| (k.as_str(), v)) }

    pub(crate) fn as_named(&self) -> Vec<(&str, &dyn ToSql)> { self.0.iter().map(|(k, v)| (k.as_str(), v as &dyn ToSql)).collect() }
}

fn placeholder(name: &str) -> String {
    match name.chars().next() {
        Some('$' | ':' | '@') => name.to_string(),
        _ => format!("${}", name),
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K: AsRef<str>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self { pairs.into_iter().collect() }
}

impl<K: AsRef<str>, V: Into<Value>> From<Vec<(K, V)>> for Params {
    fn from(pairs: Vec<(K, V)>) -> Self { pairs.into_iter().collect() }
}

impl From<serde_json::Map<String, serde_json::Value>> for Params {
    fn from(object: serde_json::Map<String, serde_json::Value>) -> Self { object.into_iter().collect() }
}

/// One result row. Column names are shared by every row of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self { Self { columns, values } }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn values(&self) -> &[Value] { &self.values }

    pub fn into_values(self) -> Vec<Value> { self.values }

    pub fn get(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index)
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> { self.values.get(index) }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// The row as a JSON object keyed by column name
    pub fn to_json(&self) -> serde_json::Value {
        let object = self.columns.iter().cloned().zip(self.values.iter().map(serde_json::Value::from)).collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_sigil() {
        let params = Params::from([("name", "a"), ("$info", "b"), (":other", "c")]);
        let keys = params.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["$name", "$info", ":other"]);
        assert_eq!(params.get("name"), Some(&Value::from("a")));
        assert_eq!(params.get("$name"), Some(&Value::from("a")));
    }

    #[test]
    fn test_rebind_replaces() {
        let params = Params::new().bind("limit", 10).bind("$limit", 20);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("limit"), Some(&Value::Integer(20)));
    }

    #[test]
    fn test_params_from_json_object() {
        let json = json!({ "name": "a", "count": 3, "ratio": 0.5, "flag": true, "missing": null });
        let serde_json::Value::Object(object) = json else { unreachable!() };
        let params = Params::from(object);
        assert_eq!(params.get("name"), Some(&Value::Text("a".into())));
        assert_eq!(params.get("count"), Some(&Value::Integer(3)));
        assert_eq!(params.get("ratio"), Some(&Value::Real(0.5)));
        assert_eq!(params.get("flag"), Some(&Value::Integer(1)));
        assert_eq!(params.get("missing"), Some(&Value::Null));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_row_json() {
        let columns: Arc<[String]> = vec!["id".to_string(), "name".to_string(), "info".to_string()].into();
        let row = Row::new(columns, vec![Value::Integer(1), Value::from("a"), Value::Null]);
        assert_eq!(row.get("name").and_then(Value::as_str), Some("a"));
        assert_eq!(row.get("nope"), None);
        assert_eq!(row.to_json(), json!({ "id": 1, "name": "a", "info": null }));
        assert_eq!(serde_json::to_value(&row).unwrap(), json!({ "id": 1, "name": "a", "info": null }));
    }
}

//! Column definitions for `CREATE TABLE`.

use serde::{Deserialize, Deserializer, Serialize};

/// Constraints attached to a column definition.
///
/// Deserializes from a constraints object with the keys `primary`, `unique`, `notnull`,
/// `default`, `foreign` and `foreign_field`; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub primary: bool,
    pub unique: bool,
    pub notnull: bool,
    /// Default value, as SQL literal text (`'test'`, `0`, `CURRENT_TIMESTAMP`)
    #[serde(deserialize_with = "literal", skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Referenced table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign: Option<String>,
    /// Referenced column in `foreign`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_field: Option<String>,
}

impl FieldOptions {
    pub fn new() -> Self { Default::default() }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.notnull = true;
        self
    }

    pub fn default_value(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    /// Reference `table(column)`; rows are deleted with the row they point at.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign = Some(table.into());
        self.foreign_field = Some(column.into());
        self
    }
}

/// Accepts a string, number or boolean for `default` and keeps it as literal text.
fn literal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Literal {
        Text(String),
        Integer(i64),
        Real(f64),
        Bool(bool),
    }

    Ok(Option::<Literal>::deserialize(deserializer)?.map(|literal| match literal {
        Literal::Text(s) => s,
        Literal::Integer(i) => i.to_string(),
        Literal::Real(f) => f.to_string(),
        Literal::Bool(b) => String::from(if b { "TRUE" } else { "FALSE" }),
    }))
}

/// One column of a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Declared type, e.g. `INTEGER` or `TEXT`
    pub ty: String,
    pub options: FieldOptions,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, options: FieldOptions) -> Self {
        Self { name: name.into(), ty: ty.into(), options }
    }

    /// `<name> <type>[ PRIMARY KEY][ UNIQUE][ NOT NULL][ DEFAULT <value>]`
    pub fn clause(&self) -> String {
        let mut tokens = vec![self.name.as_str(), self.ty.as_str()];
        if self.options.primary {
            tokens.push("PRIMARY KEY");
        }
        if self.options.unique {
            tokens.push("UNIQUE");
        }
        if self.options.notnull {
            tokens.push("NOT NULL");
        }
        if let Some(default) = &self.options.default {
            tokens.push("DEFAULT");
            tokens.push(default);
        }
        tokens.join(" ")
    }

    /// The table-level foreign key clause, if this field references another table.
    pub fn foreign_key_clause(&self) -> Option<String> {
        let table = self.options.foreign.as_ref()?;
        let column = self.options.foreign_field.as_deref().unwrap_or(&self.name);
        Some(format!("FOREIGN KEY({}) REFERENCES {}({}) ON DELETE CASCADE", self.name, table, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_token_order() {
        let field = Field::new("code", "TEXT", FieldOptions::new().default_value("x").not_null().unique().primary());
        assert_eq!(field.clause(), "code TEXT PRIMARY KEY UNIQUE NOT NULL DEFAULT x");
    }

    #[test]
    fn test_plain_field() {
        let field = Field::new("info", "TEXT", FieldOptions::new());
        assert_eq!(field.clause(), "info TEXT");
        assert_eq!(field.foreign_key_clause(), None);
    }

    #[test]
    fn test_foreign_key_clause() {
        let field = Field::new("owner", "INTEGER", FieldOptions::new().references("users", "id"));
        assert_eq!(field.clause(), "owner INTEGER");
        assert_eq!(field.foreign_key_clause().unwrap(), "FOREIGN KEY(owner) REFERENCES users(id) ON DELETE CASCADE");
    }

    #[test]
    fn test_foreign_key_without_column_uses_own_name() {
        let options = FieldOptions { foreign: Some("users".into()), ..Default::default() };
        let field = Field::new("user_id", "INTEGER", options);
        assert_eq!(field.foreign_key_clause().unwrap(), "FOREIGN KEY(user_id) REFERENCES users(user_id) ON DELETE CASCADE");
    }

    #[test]
    fn test_options_from_json() {
        let options: FieldOptions =
            serde_json::from_str(r#"{"primary": true, "unique": true, "foreign": "t", "foreign_field": "id"}"#).unwrap();
        assert_eq!(options, FieldOptions::new().primary().unique().references("t", "id"));

        let options: FieldOptions = serde_json::from_str(r#"{"notnull": true, "default": 0}"#).unwrap();
        assert!(options.notnull);
        assert_eq!(options.default.as_deref(), Some("0"));

        let options: FieldOptions = serde_json::from_str(r#"{"default": "'test'"}"#).unwrap();
        assert_eq!(Field::new("name", "TEXT", options).clause(), "name TEXT DEFAULT 'test'");
    }
}

use std::fmt;

/// A projected column, optionally renamed in the result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub name: String,
    pub alias: Option<String>,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), alias: None } }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name the column carries in the result set
    pub fn output_name(&self) -> &str { self.alias.as_deref().unwrap_or(&self.name) }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {}", self.name, alias),
            None => f.write_str(&self.name),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self { Self::new(name) }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self { Self::new(name) }
}

impl<N: Into<String>, A: Into<String>> From<(N, A)> for ColumnRef {
    fn from((name, alias): (N, A)) -> Self { Self::new(name).alias(alias) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(ColumnRef::from("id").to_string(), "id");
        assert_eq!(ColumnRef::from(("id", "uid")).to_string(), "id AS uid");
        assert_eq!(ColumnRef::from(("id", "uid")).output_name(), "uid");
    }
}

//! Trusted predicate fragments.

use std::fmt;

/// A raw SQL condition, spliced into a `WHERE` clause exactly as given.
///
/// There is no escaping and no injection protection: the text is trusted. Values that come from
/// outside the program must not be formatted into a predicate; write a named placeholder
/// (`name = $name`) and bind the value when executing the request instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate(String);

impl Predicate {
    pub fn trusted(text: impl Into<String>) -> Self { Self(text.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Predicate {
    fn from(text: &str) -> Self { Self::trusted(text) }
}

impl From<String> for Predicate {
    fn from(text: String) -> Self { Self::trusted(text) }
}

/// Join predicates with `AND`. `None` when there are none.
pub fn conjunction(predicates: &[Predicate]) -> Option<String> {
    if predicates.is_empty() {
        return None;
    }
    Some(predicates.iter().map(Predicate::as_str).collect::<Vec<_>>().join(" AND "))
}

//! Name query submitted by the user.

use serde::{Deserialize, Serialize};

/// Validation error for a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Name must not be empty")]
    Empty,
}

/// A non-empty name to look up.
///
/// The value is stored exactly as entered. Encoding for the wire is left to
/// the HTTP client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// Create a query from user input.
    ///
    /// # Errors
    /// Returns `QueryError::Empty` if the input is empty or whitespace only.
    pub fn new(name: impl Into<String>) -> Result<Self, QueryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(name))
    }

    /// The name as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, safe to log.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl TryFrom<String> for Query {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Names are personal data; keep them out of `{:?}` output in logs.
impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Query(<{} chars>)", self.char_len())
    }
}

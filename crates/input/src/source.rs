//! External input sources for the `post`/`query`/`request` accessors.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which part of a request a value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Posted form values.
    Post,
    /// Query-string values.
    Query,
    /// Posted and query values merged.
    Request,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Post => "post",
            Self::Query => "query",
            Self::Request => "request",
        })
    }
}

/// Provides raw input values by source and name.
pub trait InputSource: Send + Sync {
    /// Returns the value, or `None` if the source has no such name.
    fn get(&self, kind: SourceKind, name: &str) -> Option<Value>;
}

/// In-memory posted and query values.
///
/// `Request` lookups prefer posted values over query values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestValues {
    #[serde(default)]
    post: HashMap<String, Value>,
    #[serde(default)]
    query: HashMap<String, Value>,
}

impl RequestValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a posted value.
    #[must_use]
    pub fn with_post(mut self, name: impl Into<String>, value: Value) -> Self {
        self.post.insert(name.into(), value);
        self
    }

    /// Set a query-string value.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: Value) -> Self {
        self.query.insert(name.into(), value);
        self
    }
}

impl InputSource for RequestValues {
    fn get(&self, kind: SourceKind, name: &str) -> Option<Value> {
        match kind {
            SourceKind::Post => self.post.get(name).cloned(),
            SourceKind::Query => self.query.get(name).cloned(),
            SourceKind::Request => self
                .post
                .get(name)
                .or_else(|| self.query.get(name))
                .cloned(),
        }
    }
}

//! Chain configuration.

use serde::{Deserialize, Serialize};

/// Shape of the errors returned by [`Chain::errors`](crate::Chain::errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLayout {
    /// One list, in check order then step order.
    #[default]
    Flat,
    /// Messages grouped by check name; valid checks are omitted.
    ByName,
}

/// Defaults used by a [`Chain`](crate::Chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Error layout used by `is_valid()`.
    pub error_layout: ErrorLayout,
    /// Whether `walk_all()` keeps going after an invalid element.
    pub walk_continue_on_invalid: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            error_layout: ErrorLayout::Flat,
            walk_continue_on_invalid: true,
        }
    }
}

impl ChainConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_error_layout(mut self, layout: ErrorLayout) -> Self {
        self.error_layout = layout;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_walk_continue_on_invalid(mut self, continue_on_invalid: bool) -> Self {
        self.walk_continue_on_invalid = continue_on_invalid;
        self
    }
}

//! The records API's paginated list envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelResult;

/// One page of a list response: `{count, next, previous, results}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items across all pages.
    #[serde(default)]
    pub count: usize,
    /// Link to the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// Link to the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    /// Wraps a complete list as a single page.
    pub fn from_items(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            next: None,
            previous: None,
            results,
        }
    }

    /// Wraps one window of a larger result set.
    pub fn window(results: Vec<T>, count: usize) -> Self {
        Self {
            count,
            next: None,
            previous: None,
            results,
        }
    }

    /// Returns true if items remain beyond this page.
    pub fn has_more(&self) -> bool {
        self.next.is_some() || self.count > self.results.len()
    }

    /// Returns the number of items on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Consumes the page and returns its items.
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Decodes a list payload.
    ///
    /// Accepts the paginated envelope or a bare JSON array. Any other shape
    /// decodes as an empty page; a malformed item is still an error.
    pub fn from_value(value: Value) -> ModelResult<Self> {
        let is_envelope = value.get("results").is_some_and(Value::is_array);
        match value {
            Value::Array(items) => {
                let results = items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<T>, _>>()?;
                Ok(Self::from_items(results))
            }
            Value::Object(_) if is_envelope => {
                let mut page: Page<T> = serde_json::from_value(value)?;
                page.count = page.count.max(page.results.len());
                Ok(page)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Decodes a list payload from JSON text.
    pub fn from_json(text: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }
}

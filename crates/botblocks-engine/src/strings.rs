//! Localised display strings addressed by dotted keys.
//!
//! A table is a nested JSON object:
//!
//! ```json
//! {"levels": {"back": "Voltar", "title": "Níveis"}}
//! ```
//!
//! `levels.back` resolves to `"Voltar"`. A key that does not lead to a
//! string is a lookup miss.

use std::fs;
use std::path::Path;

use botblocks_common::warning::warn_once;
use serde_json::{Map, Value};

/// Error type for string tables.
#[derive(Debug, thiserror::Error)]
pub enum StringsError {
    /// Strict lookup of a key that does not resolve to a string.
    #[error("string '{0}' not found")]
    KeyNotFound(String),
    /// The file could not be read.
    #[error("failed to read strings '{path}': {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not JSON, or its top level is not an object.
    #[error("invalid string table: {0}")]
    Json(#[from] serde_json::Error),
}

/// A loaded string table.
#[derive(Debug, Clone, PartialEq)]
pub struct StringTable {
    root: Value,
}

impl Default for StringTable {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl StringTable {
    /// A table with no strings; every lookup falls back to its key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from JSON text.
    ///
    /// # Errors
    ///
    /// Malformed JSON or a top level that is not an object.
    pub fn from_json(text: &str) -> Result<Self, StringsError> {
        let map: Map<String, Value> = serde_json::from_str(text)?;
        Ok(Self {
            root: Value::Object(map),
        })
    }

    /// Read a table file.
    ///
    /// # Errors
    ///
    /// I/O failures, plus everything [`StringTable::from_json`] rejects.
    pub fn load(path: &Path) -> Result<Self, StringsError> {
        let text = fs::read_to_string(path).map_err(|source| StringsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Look `key` up without reporting a miss.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.root, |node, part| node.get(part))?
            .as_str()
    }

    /// Display string for `key`, or `key` itself when it does not resolve.
    #[must_use]
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or_else(|| {
            warn_once("strings", &format!("no string for '{key}'"));
            key
        })
    }

    /// Display string for `key`.
    ///
    /// # Errors
    ///
    /// [`StringsError::KeyNotFound`] when the key does not resolve to a string.
    pub fn resolve_strict(&self, key: &str) -> Result<&str, StringsError> {
        self.get(key)
            .ok_or_else(|| StringsError::KeyNotFound(key.to_string()))
    }
}

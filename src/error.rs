//! Load-time errors.
//!
//! Turn processing never fails: every user-facing problem is a reply. The only
//! fallible work is reading gazetteer and route data at startup, and even
//! there most problems are per-record: the record is skipped, the error is
//! logged and collected into a [`LoadReport`](crate::LoadReport), and loading
//! continues.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// The file could not be read at all.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong top-level shape.
    #[error("invalid {what} document: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A single route record was skipped.
    #[error("route #{index} skipped: {reason}")]
    MalformedRoute { index: usize, reason: String },

    /// Two canonical cities claimed the same surface form.
    #[error("surface form '{form}' already belongs to '{owner}', rejected for '{rejected}'")]
    ConflictingForm { form: String, owner: String, rejected: String },

    /// A gazetteer entry whose value is not a list of forms.
    #[error("gazetteer entry '{name}' skipped: {reason}")]
    InvalidEntry { name: String, reason: String },

    /// A city name normalized to nothing.
    #[error("empty city name in {context}")]
    EmptyCity { context: String },
}

impl DataError {
    pub fn malformed_route(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRoute { index, reason: reason.into() }
    }
}

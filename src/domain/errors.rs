// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the document tree and its codecs.
//!
//! This module defines the errors that can occur while reading, writing, or
//! persisting a [`Value`](crate::domain::Value) tree. All errors use `thiserror`
//! for proper error handling and conversion.
//!
//! Reading a scalar of the wrong type is *not* an error: typed accessors return a
//! zero-equivalent default instead, so there is no variant for it here.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for tree and codec operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use treecfg::domain::errors::{ErrorKind, TreeError};
///
/// let error = TreeError::schema("an array cannot exist within another array");
/// assert_eq!(error.kind(), ErrorKind::Schema);
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TreeError {
    /// A file could not be opened, read, or written.
    #[error("Could not access file '{}': {source}", path.display())]
    FileAccess {
        /// The path that could not be accessed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input was not well-formed for its wire format.
    #[error("Failed to parse {format} input: {message}")]
    Parse {
        /// The wire format being parsed ("json", "xml")
        format: &'static str,
        /// The error message
        message: String,
        /// The underlying parsing error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A node violates a structural rule of the document being written or read.
    #[error("Invalid document structure: {message}")]
    Schema {
        /// The error message
        message: String,
    },
}

/// The class of a [`TreeError`], for callers that only branch on the kind of failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path missing, unreadable, or unwritable.
    FileAccess,
    /// Malformed JSON or XML syntax.
    Parse,
    /// A structural rule was violated (array-of-array, XML root array, ...).
    Schema,
}

impl TreeError {
    /// Creates a `FileAccess` error for the given path.
    pub fn file_access(path: &Path, source: std::io::Error) -> Self {
        TreeError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a `Schema` error with the given message.
    pub fn schema(message: impl Into<String>) -> Self {
        TreeError::Schema {
            message: message.into(),
        }
    }

    /// Creates a `Parse` error wrapping the underlying parser error.
    pub fn parse<E>(format: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TreeError::Parse {
            format,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TreeError::FileAccess { .. } => ErrorKind::FileAccess,
            TreeError::Parse { .. } => ErrorKind::Parse,
            TreeError::Schema { .. } => ErrorKind::Schema,
        }
    }
}

/// A specialized Result type for tree and codec operations.
pub type Result<T> = std::result::Result<T, TreeError>;

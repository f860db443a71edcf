// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource directory resolution.
//!
//! A search path document names a relative resource path and a list of prefixes
//! to try, for example:
//!
//! ```json
//! {"resources": {"path": "assets/", "search_prefix": ["../", "/usr/share/game/"]}}
//! ```
//!
//! The first `prefix + path` that exists on disk is the resolved location.

use crate::domain::{Result, TreeError, Value};
use crate::ports::{LogSink, ValueCodec};
use std::io;
use std::path::{Path, PathBuf};

/// Resolves a resource directory from a search path document.
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::adapters::JsonCodec;
/// use treecfg::service::SearchPath;
/// use std::path::Path;
///
/// # fn main() -> treecfg::domain::Result<()> {
/// let mut search = SearchPath::new(JsonCodec::new());
/// search.load_file(Path::new("resources.json"), "resources")?;
/// println!("using resources from {}", search.path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SearchPath<C: ValueCodec> {
    codec: C,
    logger: LogSink,
    candidates: Vec<PathBuf>,
    path: PathBuf,
}

impl<C: ValueCodec> SearchPath<C> {
    /// Creates an unresolved search path that reads documents with `codec`.
    pub fn new(codec: C) -> Self {
        let logger = codec.logger().clone();
        Self {
            codec,
            logger,
            candidates: Vec::new(),
            path: PathBuf::new(),
        }
    }

    /// Returns the resolved path, or an empty path before a successful
    /// [`load_file`](Self::load_file).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every candidate considered by the last [`load_file`](Self::load_file),
    /// in the order they were tried.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Reads the document at `filename` and resolves the entry named `node`.
    ///
    /// # Errors
    ///
    /// Returns a schema error when `node` is missing or malformed, and a file
    /// access error when the document cannot be read or no candidate exists.
    pub fn load_file(&mut self, filename: &Path, node: &str) -> Result<()> {
        let document = self.codec.load(filename)?;
        let logger = self.logger.clone();
        let resolved = logger.in_scope(|| self.resolve(&document, node));
        logger.report(resolved)
    }

    fn resolve(&mut self, document: &Value, node: &str) -> Result<()> {
        let entry = document.find(node);
        if entry.is_null() {
            return Err(TreeError::schema(format!(
                "search path '{}' is not defined",
                node
            )));
        }
        if !entry.is_object() {
            return Err(TreeError::schema(format!(
                "search path '{}' must be an object",
                node
            )));
        }

        let path = match entry.find("path") {
            Value::String(path) => path.as_str(),
            Value::Null => {
                return Err(TreeError::schema(format!("path is not defined for '{}'", node)))
            }
            _ => {
                return Err(TreeError::schema(format!(
                    "path must be a string for '{}'",
                    node
                )))
            }
        };

        let prefixes = match entry.find("search_prefix") {
            Value::Array(prefixes) => prefixes,
            Value::Null => {
                return Err(TreeError::schema(format!(
                    "search prefix is not defined for '{}'",
                    node
                )))
            }
            _ => {
                return Err(TreeError::schema(format!(
                    "search prefix must be an array for '{}'",
                    node
                )))
            }
        };

        self.candidates = prefixes
            .iter()
            .filter_map(|prefix| match prefix {
                Value::String(prefix) => Some(PathBuf::from(format!("{}{}", prefix, path))),
                other => {
                    tracing::debug!(kind = other.type_name(), "skipping search prefix that is not a string");
                    None
                }
            })
            .collect();

        for candidate in &self.candidates {
            if candidate.exists() {
                tracing::info!("using resources from {}", candidate.display());
                self.path = candidate.clone();
                return Ok(());
            }
            tracing::debug!("not using non-existent search path {}", candidate.display());
        }

        Err(TreeError::file_access(
            Path::new(path),
            io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "none of the {} search prefixes for '{}' exist",
                    self.candidates.len(),
                    node
                ),
            ),
        ))
    }
}

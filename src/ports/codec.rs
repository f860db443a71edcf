// SPDX-License-Identifier: MIT OR Apache-2.0

//! Codec trait definition.
//!
//! This module defines the `ValueCodec` trait, which pairs a serializer and a
//! deserializer for one wire format. A codec translates a [`Value`] tree to and
//! from the format library's own document tree, renders that tree as text, and
//! persists it to a file.

use crate::domain::{Result, TreeError, Value};
use crate::ports::LogSink;
use std::fs;
use std::io;
use std::path::Path;

/// Maximum size of a document file read by [`ValueCodec::load`] (10MB).
pub const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// How a codec lays out its text output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// One node per line with a fixed two-space indent.
    #[default]
    Pretty,
    /// No insignificant whitespace.
    Compact,
}

/// A bidirectional transform between [`Value`] and one wire format.
///
/// Implementors provide the tree-to-tree transforms ([`write`](Self::write) and
/// [`read`](Self::read)) and the text layer; file persistence is provided on top.
/// Every failure is returned as a [`TreeError`] and reported once through the
/// codec's [`LogSink`]. Nothing here panics.
///
/// File access is open-operate-close per call. A crash during [`save`](Self::save)
/// can leave a partially written file.
pub trait ValueCodec {
    /// The format library's document tree.
    type Native;

    /// Returns the short name of the wire format, such as `"json"`.
    fn format(&self) -> &'static str;

    /// Returns the file extensions (without the leading dot) this codec handles.
    fn supported_extensions(&self) -> &[&str];

    /// Returns the sink this codec reports to.
    fn logger(&self) -> &LogSink;

    /// Transforms a value tree into the native document tree.
    fn write(&self, root: &Value) -> Result<Self::Native>;

    /// Transforms a native document tree back into a value tree.
    fn read(&self, source: &Self::Native) -> Result<Value>;

    /// Writes a value tree and renders it as text.
    fn serialize(&self, root: &Value) -> Result<String>;

    /// Parses text and reads it into a value tree.
    fn deserialize(&self, input: &str) -> Result<Value>;

    /// Serializes `root` into the file at `path`, creating or truncating it.
    fn save(&self, root: &Value, path: &Path) -> Result<()> {
        let text = self.serialize(root)?;
        let written = fs::write(path, text).map_err(|e| TreeError::file_access(path, e));
        self.logger().report(written)?;
        self.logger()
            .in_scope(|| tracing::debug!("saved {} document to {}", self.format(), path.display()));
        Ok(())
    }

    /// Deserializes the file at `path`.
    fn load(&self, path: &Path) -> Result<Value> {
        let content = self.logger().report(read_document(path))?;
        self.logger()
            .in_scope(|| tracing::debug!("loaded {} document from {}", self.format(), path.display()));
        self.deserialize(&content)
    }
}

/// The leaf and container steps of a codec's tree writer.
///
/// [`encode`] owns the recursion over the [`Value`] sum type and the
/// array-of-array check; an encoder only decides how each finished piece is
/// represented in its own format.
pub trait NodeEncoder {
    /// The output produced for one value.
    type Node;

    /// Encodes a scalar or a null.
    fn leaf(&self, value: &Value) -> Result<Self::Node>;

    /// Combines already-encoded array entries.
    fn array(&self, items: Vec<Self::Node>) -> Result<Self::Node>;

    /// Combines already-encoded object members, in key order.
    fn object(&self, members: Vec<(&str, Self::Node)>) -> Result<Self::Node>;
}

/// Walks `value` depth-first, handing every node to `encoder`.
///
/// Fails with a schema error as soon as an array is found directly inside another
/// array. Nodes already produced for earlier siblings are discarded.
pub fn encode<E: NodeEncoder>(encoder: &E, value: &Value) -> Result<E::Node> {
    match value {
        Value::Array(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                if item.is_array() {
                    return Err(TreeError::schema(format!(
                        "array nested directly inside an array at index {}",
                        index
                    )));
                }
                nodes.push(encode(encoder, item)?);
            }
            encoder.array(nodes)
        }
        Value::Object(members) => {
            let mut nodes = Vec::with_capacity(members.len());
            for (key, member) in members {
                tracing::trace!(key = %key, kind = member.type_name(), "encoding member");
                nodes.push((key.as_str(), encode(encoder, member)?));
            }
            encoder.object(nodes)
        }
        leaf => encoder.leaf(leaf),
    }
}

fn read_document(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| TreeError::file_access(path, e))?;

    if metadata.len() > MAX_DOCUMENT_SIZE {
        return Err(TreeError::file_access(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "document too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_DOCUMENT_SIZE
                ),
            ),
        ));
    }

    fs::read_to_string(path).map_err(|e| TreeError::file_access(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use tempfile::TempDir;

    // Line-per-scalar codec for exercising the provided file methods
    struct LineCodec {
        logger: LogSink,
    }

    impl ValueCodec for LineCodec {
        type Native = Vec<String>;

        fn format(&self) -> &'static str {
            "lines"
        }

        fn supported_extensions(&self) -> &[&str] {
            &["txt"]
        }

        fn logger(&self) -> &LogSink {
            &self.logger
        }

        fn write(&self, root: &Value) -> Result<Vec<String>> {
            if !root.is_array() {
                return Err(TreeError::schema("root must be an array"));
            }
            Ok(root.iter().map(|(_, v)| v.stringify()).collect())
        }

        fn read(&self, source: &Vec<String>) -> Result<Value> {
            Ok(source.iter().map(|line| Value::from(line.as_str())).collect())
        }

        fn serialize(&self, root: &Value) -> Result<String> {
            Ok(self.logger.report(self.write(root))?.join("\n"))
        }

        fn deserialize(&self, input: &str) -> Result<Value> {
            self.read(&input.lines().map(str::to_string).collect())
        }
    }

    fn codec() -> LineCodec {
        LineCodec {
            logger: LogSink::silent(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.txt");
        let root: Value = vec![Value::from("a"), Value::from("b")].into();

        codec().save(&root, &path).unwrap();
        let loaded = codec().load(&path).unwrap();

        assert_eq!(loaded, root);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = codec().load(&dir.path().join("absent.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileAccess);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/values.txt");
        let err = codec().save(&Value::with_type(crate::domain::ValueType::ArrayValues), &path);
        assert_eq!(err.unwrap_err().kind(), ErrorKind::FileAccess);
    }

    #[test]
    fn test_save_schema_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.txt");
        let err = codec().save(&Value::from(1), &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(!path.exists());
    }

    struct Brackets;

    impl NodeEncoder for Brackets {
        type Node = String;

        fn leaf(&self, value: &Value) -> Result<String> {
            Ok(value.stringify())
        }

        fn array(&self, items: Vec<String>) -> Result<String> {
            Ok(format!("[{}]", items.join(",")))
        }

        fn object(&self, members: Vec<(&str, String)>) -> Result<String> {
            let parts: Vec<String> = members.into_iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            Ok(format!("{{{}}}", parts.join(",")))
        }
    }

    #[test]
    fn test_encode_walks_in_key_order() {
        let mut root = Value::Null;
        root["b"] = Value::from(2);
        root["a"] = vec![Value::from(true), Value::from("x")].into();

        assert_eq!(encode(&Brackets, &root).unwrap(), "{a=[true,x],b=2}");
    }

    #[test]
    fn test_encode_rejects_array_of_array() {
        let mut root = Value::Null;
        root["grid"].append(Value::from(1));
        root["grid"].append(Value::with_type(crate::domain::ValueType::ArrayValues));

        let err = encode(&Brackets, &root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_default_layout_is_pretty() {
        assert_eq!(Layout::default(), Layout::Pretty);
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON codec adapter.
//!
//! This module provides a codec that translates [`Value`] trees to and from
//! `serde_json`'s document tree.

use crate::domain::{ArrayList, ObjectMap, Result, TreeError, Value};
use crate::ports::{encode, Layout, LogSink, NodeEncoder, ValueCodec};
use serde_json::{Map, Number};

/// Codec for JSON documents.
///
/// A JSON document root is either a single object or an array whose entries are
/// all objects. Numbers keep their integer or real tag across a round trip; since
/// JSON text does not record signedness, non-negative integers that fit in an
/// `i64` read back as signed.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::JsonCodec;
/// use treecfg::domain::Value;
/// use treecfg::ports::{Layout, ValueCodec};
///
/// let codec = JsonCodec::new().with_layout(Layout::Compact);
///
/// let mut root = Value::Null;
/// root["count"] = Value::from(42);
/// root["name"] = Value::from("Squall");
///
/// let text = codec.serialize(&root).unwrap();
/// assert_eq!(text, r#"{"count":42,"name":"Squall"}"#);
/// assert_eq!(codec.deserialize(&text).unwrap(), root);
/// ```
#[derive(Clone, Debug)]
pub struct JsonCodec {
    logger: LogSink,
    layout: Layout,
}

impl JsonCodec {
    /// Creates a JSON codec reporting to the current default dispatcher.
    pub fn new() -> Self {
        Self {
            logger: LogSink::current(),
            layout: Layout::Pretty,
        }
    }

    /// Sets the logging sink.
    pub fn with_logger(mut self, logger: LogSink) -> Self {
        self.logger = logger;
        self
    }

    /// Sets the text layout used by [`serialize`](ValueCodec::serialize).
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Pretty-prints any value as JSON for diagnostics.
    ///
    /// Unlike [`serialize`](ValueCodec::serialize), no document rules are applied:
    /// scalars and nested arrays print as they are. Non-finite reals print as `null`.
    pub fn dump(&self, value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_default()
    }

    fn check_root(root: &Value) -> Result<()> {
        match root {
            Value::Object(_) => Ok(()),
            Value::Array(items) => match items.iter().position(|item| !item.is_object()) {
                None => Ok(()),
                Some(index) => Err(TreeError::schema(format!(
                    "array document entry {} is a {}, expected an object",
                    index,
                    items[index].type_name()
                ))),
            },
            other => Err(TreeError::schema(format!(
                "document root must be an object or an array of objects, found {}",
                other.type_name()
            ))),
        }
    }

    fn read_node(node: &serde_json::Value) -> Value {
        match node {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => read_number(n),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Self::read_node).collect::<ArrayList>())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, member)| (key.clone(), Self::read_node(member)))
                    .collect::<ObjectMap>(),
            ),
        }
    }
}

fn read_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::SignedInteger(i)
    } else if let Some(u) = n.as_u64() {
        Value::UnsignedInteger(u)
    } else {
        Value::Real(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeEncoder for JsonCodec {
    type Node = serde_json::Value;

    fn leaf(&self, value: &Value) -> Result<serde_json::Value> {
        Ok(match value {
            Value::SignedInteger(n) => serde_json::Value::from(*n),
            Value::UnsignedInteger(n) => serde_json::Value::from(*n),
            Value::Real(n) => match Number::from_f64(*n) {
                Some(number) => serde_json::Value::Number(number),
                None => {
                    return Err(TreeError::schema(format!(
                        "JSON cannot represent the real number {}",
                        n
                    )))
                }
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            _ => serde_json::Value::Null,
        })
    }

    fn array(&self, items: Vec<serde_json::Value>) -> Result<serde_json::Value> {
        Ok(serde_json::Value::Array(items))
    }

    fn object(&self, members: Vec<(&str, serde_json::Value)>) -> Result<serde_json::Value> {
        let mut map = Map::new();
        for (key, member) in members {
            map.insert(key.to_string(), member);
        }
        Ok(serde_json::Value::Object(map))
    }
}

impl ValueCodec for JsonCodec {
    type Native = serde_json::Value;

    fn format(&self) -> &'static str {
        "json"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn logger(&self) -> &LogSink {
        &self.logger
    }

    fn write(&self, root: &Value) -> Result<serde_json::Value> {
        self.logger.report(self.logger.in_scope(|| {
            Self::check_root(root)?;
            encode(self, root)
        }))
    }

    fn read(&self, source: &serde_json::Value) -> Result<Value> {
        let value = match source {
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => Ok(Self::read_node(source)),
            _ => Err(TreeError::schema(
                "document root must be an object or an array of objects",
            )),
        };
        self.logger.report(value)
    }

    fn serialize(&self, root: &Value) -> Result<String> {
        let native = self.write(root)?;
        let text = match self.layout {
            Layout::Pretty => serde_json::to_string_pretty(&native),
            Layout::Compact => serde_json::to_string(&native),
        };
        self.logger.report(text.map_err(|e| TreeError::parse("json", e)))
    }

    fn deserialize(&self, input: &str) -> Result<Value> {
        let native: serde_json::Value = self
            .logger
            .report(serde_json::from_str(input).map_err(|e| TreeError::parse("json", e)))?;
        self.read(&native)
    }
}

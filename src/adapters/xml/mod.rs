// SPDX-License-Identifier: MIT OR Apache-2.0

//! XML codec adapter.
//!
//! This module provides a codec that translates [`Value`] trees to and from an
//! [`XmlDocument`]. Object members become child elements named by their key,
//! scalars become text content, and arrays become a wrapper element holding one
//! `<item>` element per entry.

pub mod document;

pub use document::{XmlDeclaration, XmlDocument, XmlElement, XmlNode};

use crate::domain::{ArrayList, ObjectMap, Result, TreeError, Value};
use crate::ports::{encode, Layout, LogSink, NodeEncoder, ValueCodec};

/// Name of the element wrapping each array entry.
pub const ITEM_ELEMENT: &str = "item";

/// Codec for XML documents.
///
/// The document root must be an object with exactly one member; that member is
/// the root element. Every written document starts with
/// `<?xml version="1.0" encoding="utf-8"?>`.
///
/// XML text is untyped, so reading infers each scalar's tag from its text:
/// `true`/`false` are booleans, integers are signed (or unsigned when above
/// `i64::MAX`), numbers with a fractional or exponent part are reals and anything
/// else is a string. Elements without content, including empty arrays and
/// objects, read back as null. An element whose children are all `<item>`
/// elements reads back as an array.
///
/// Comments, CDATA sections, doctypes and processing instructions are kept in the
/// [`XmlDocument`] but contribute nothing to the value read from it.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::XmlCodec;
/// use treecfg::domain::Value;
/// use treecfg::ports::{Layout, ValueCodec};
///
/// let codec = XmlCodec::new().with_layout(Layout::Compact);
///
/// let mut root = Value::Null;
/// root["player"]["hp"] = Value::from(100);
/// root["player"]["name"] = Value::from("Rinoa");
///
/// let text = codec.serialize(&root).unwrap();
/// assert_eq!(
///     text,
///     "<?xml version=\"1.0\" encoding=\"utf-8\"?><player><hp>100</hp><name>Rinoa</name></player>"
/// );
/// assert_eq!(codec.deserialize(&text).unwrap(), root);
/// ```
#[derive(Clone, Debug)]
pub struct XmlCodec {
    logger: LogSink,
    layout: Layout,
}

impl XmlCodec {
    /// Creates an XML codec reporting to the current default dispatcher.
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

    fn check_root(root: &Value) -> Result<()> {
        match root {
            Value::Object(members) if members.len() == 1 => Ok(()),
            Value::Object(members) => Err(TreeError::schema(format!(
                "document root must hold exactly one element, found {}",
                members.len()
            ))),
            other => Err(TreeError::schema(format!(
                "document root must be an object, found {}",
                other.type_name()
            ))),
        }
    }

    fn read_element(element: &XmlElement) -> Value {
        let mut has_elements = false;
        let mut text = String::new();

        for child in &element.children {
            match child {
                XmlNode::Element(_) => has_elements = true,
                XmlNode::Text(content) => text.push_str(content),
                skipped => tracing::debug!(element = %element.name, node = ?skipped, "skipping non-data node"),
            }
        }

        if has_elements {
            if !text.trim().is_empty() {
                tracing::debug!(element = %element.name, "ignoring text mixed with child elements");
            }
            return Self::read_container(element);
        }

        if text.is_empty() {
            Value::Null
        } else {
            infer_scalar(&text)
        }
    }

    fn read_container(element: &XmlElement) -> Value {
        if element.elements().all(|child| child.name == ITEM_ELEMENT) {
            return Value::Array(element.elements().map(Self::read_element).collect::<ArrayList>());
        }

        let mut members = ObjectMap::new();
        for child in element.elements() {
            let value = Self::read_element(child);
            if members.insert(child.name.clone(), value).is_some() {
                tracing::debug!(element = %element.name, key = %child.name, "duplicate element replaces earlier value");
            }
        }
        Value::Object(members)
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Infers the tag of a scalar from its text content.
fn infer_scalar(text: &str) -> Value {
    match text {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::SignedInteger(n);
    }
    if let Ok(n) = text.parse::<u64>() {
        return Value::UnsignedInteger(n);
    }
    let looks_real = text.contains(&['.', 'e', 'E'][..]) || matches!(text, "inf" | "-inf" | "NaN");
    if looks_real {
        if let Ok(n) = text.parse::<f64>() {
            return Value::Real(n);
        }
    }
    Value::String(text.to_string())
}

/// Checks that `name` can be used as an element name.
fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(TreeError::schema(format!("'{}' is not a valid element name", name)))
    }
}

impl NodeEncoder for XmlCodec {
    type Node = Vec<XmlNode>;

    fn leaf(&self, value: &Value) -> Result<Vec<XmlNode>> {
        Ok(match value {
            Value::Null => Vec::new(),
            scalar => vec![XmlNode::Text(scalar.stringify())],
        })
    }

    fn array(&self, items: Vec<Vec<XmlNode>>) -> Result<Vec<XmlNode>> {
        Ok(items
            .into_iter()
            .map(|content| XmlNode::Element(XmlElement::new(ITEM_ELEMENT, content)))
            .collect())
    }

    fn object(&self, members: Vec<(&str, Vec<XmlNode>)>) -> Result<Vec<XmlNode>> {
        members
            .into_iter()
            .map(|(key, content)| {
                validate_name(key)?;
                Ok(XmlNode::Element(XmlElement::new(key, content)))
            })
            .collect()
    }
}

impl ValueCodec for XmlCodec {
    type Native = XmlDocument;

    fn format(&self) -> &'static str {
        "xml"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn logger(&self) -> &LogSink {
        &self.logger
    }

    fn write(&self, root: &Value) -> Result<XmlDocument> {
        self.logger.report(self.logger.in_scope(|| {
            Self::check_root(root)?;
            Ok(XmlDocument {
                declaration: Some(XmlDeclaration::default()),
                nodes: encode(self, root)?,
            })
        }))
    }

    fn read(&self, source: &XmlDocument) -> Result<Value> {
        let value = self.logger.in_scope(|| {
            let mut roots = source.nodes.iter().filter_map(|node| match node {
                XmlNode::Element(element) => Some(element),
                _ => None,
            });
            match (roots.next(), roots.next()) {
                (Some(root), None) => {
                    let mut members = ObjectMap::new();
                    members.insert(root.name.clone(), Self::read_element(root));
                    Ok(Value::Object(members))
                }
                (None, _) => Err(TreeError::schema("document has no root element")),
                (Some(_), Some(_)) => Err(TreeError::schema("document has more than one root element")),
            }
        });
        self.logger.report(value)
    }

    fn serialize(&self, root: &Value) -> Result<String> {
        let document = self.write(root)?;
        self.logger.report(document.to_xml_string(self.layout))
    }

    fn deserialize(&self, input: &str) -> Result<Value> {
        let document = self.logger.report(XmlDocument::parse(input))?;
        self.read(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, ValueType};

    fn codec() -> XmlCodec {
        XmlCodec::new().with_logger(LogSink::silent())
    }

    fn player() -> Value {
        let mut root = Value::Null;
        root["player"]["hp"] = Value::from(100);
        root["player"]["name"] = Value::from("Rinoa");
        root
    }

    #[test]
    fn test_write_prepends_declaration() {
        let doc = codec().write(&player()).unwrap();
        assert_eq!(doc.declaration, Some(XmlDeclaration::default()));
    }

    #[test]
    fn test_write_player_elements() {
        let doc = codec().write(&player()).unwrap();
        let root = doc.root().unwrap();

        assert_eq!(root.name, "player");
        assert_eq!(
            root.children,
            vec![
                XmlNode::Element(XmlElement::new("hp", vec![XmlNode::Text("100".to_string())])),
                XmlNode::Element(XmlElement::new("name", vec![XmlNode::Text("Rinoa".to_string())])),
            ]
        );
    }

    #[test]
    fn test_pretty_layout() {
        let text = codec().serialize(&player()).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains("\n  <hp>100</hp>"));
        assert!(text.contains("\n  <name>Rinoa</name>"));
    }

    #[test]
    fn test_write_rejects_array_root() {
        let mut item = Value::Null;
        item["a"] = Value::from(1);
        let root: Value = vec![item].into();

        let err = codec().write(&root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_write_rejects_multiple_roots() {
        let mut root = Value::Null;
        root["a"] = Value::from(1);
        root["b"] = Value::from(2);

        let err = codec().write(&root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_write_rejects_array_of_array() {
        let mut root = Value::Null;
        root["grid"].append(Value::with_type(ValueType::ArrayValues));

        let err = codec().write(&root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_write_rejects_invalid_names() {
        for key in ["", "1st", "has space", "a<b"] {
            let mut root = Value::Null;
            root["settings"][key] = Value::from(true);

            let err = codec().write(&root).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Schema, "key {:?}", key);
        }
    }

    #[test]
    fn test_arrays_use_item_elements() {
        let mut root = Value::Null;
        root["bag"]["items"].append("potion");
        root["bag"]["items"].append("ether");

        let text = codec().with_layout(Layout::Compact).serialize(&root).unwrap();
        assert!(text.ends_with("<bag><items><item>potion</item><item>ether</item></items></bag>"));
        assert_eq!(codec().deserialize(&text).unwrap(), root);
    }

    #[test]
    fn test_scalar_inference() {
        assert_eq!(infer_scalar("true"), Value::Boolean(true));
        assert_eq!(infer_scalar("-12"), Value::SignedInteger(-12));
        assert_eq!(infer_scalar("18446744073709551615"), Value::UnsignedInteger(u64::MAX));
        assert_eq!(infer_scalar("2.0"), Value::Real(2.0));
        assert_eq!(infer_scalar("1e100"), Value::Real(1e100));
        assert_eq!(infer_scalar("inf"), Value::Real(f64::INFINITY));
        assert_eq!(infer_scalar("name"), Value::from("name"));
        assert_eq!(infer_scalar(" 5"), Value::from(" 5"));
    }

    #[test]
    fn test_mixed_scalars_round_trip() {
        let mut root = Value::Null;
        root["cfg"]["ratio"] = Value::from(0.25);
        root["cfg"]["fullscreen"] = Value::from(false);
        root["cfg"]["title"] = Value::from("Balamb <Garden> & co");
        root["cfg"]["nothing"] = Value::Null;
        root["cfg"]["audio"]["gain"] = Value::from(-3);

        let text = codec().serialize(&root).unwrap();
        assert_eq!(codec().deserialize(&text).unwrap(), root);
    }

    #[test]
    fn test_empty_containers_read_back_null() {
        let mut root = Value::Null;
        root["cfg"]["list"] = Value::with_type(ValueType::ArrayValues);
        root["cfg"]["map"] = Value::with_type(ValueType::ObjectValues);

        let back = codec().deserialize(&codec().serialize(&root).unwrap()).unwrap();
        assert!(back["cfg"]["list"].is_null());
        assert!(back["cfg"]["map"].is_null());
    }

    #[test]
    fn test_read_skips_non_data_nodes() {
        let input = "<?xml version=\"1.0\"?>\n<!DOCTYPE cfg>\n<cfg><!-- volume --><volume>80</volume><?hint x?><![CDATA[ignored]]></cfg>";
        let value = codec().deserialize(input).unwrap();

        let mut expected = Value::Null;
        expected["cfg"]["volume"] = Value::from(80);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_read_rejects_malformed_text() {
        let err = codec().deserialize("<cfg><a></cfg>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_read_rejects_document_without_element() {
        let err = codec().read(&XmlDocument::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_supported_extensions() {
        assert_eq!(codec().supported_extensions(), &["xml"]);
        assert_eq!(codec().format(), "xml");
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory XML document model.
//!
//! The DOM owns every name and every piece of text it holds, so values written
//! into it never borrow from the tree they were produced from. Attributes are not
//! part of the model: they carry no data in the documents this crate reads and
//! writes, and are dropped when parsing.

use crate::domain::{Result, TreeError};
use crate::ports::Layout;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

/// The `<?xml ...?>` declaration at the head of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDeclaration {
    /// The `version` pseudo-attribute
    pub version: String,
    /// The `encoding` pseudo-attribute, if present
    pub encoding: Option<String>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("utf-8".to_string()),
        }
    }
}

/// A node of the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    /// An element and its content
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
    /// A `<![CDATA[...]]>` section
    CData(String),
    /// A `<!--...-->` comment
    Comment(String),
    /// A `<!DOCTYPE ...>` declaration
    DocType(String),
    /// A `<?target ...?>` processing instruction
    ProcessingInstruction(String),
}

/// A named element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlElement {
    /// The element name
    pub name: String,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an element with the given name and content.
    pub fn new(name: impl Into<String>, children: Vec<XmlNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Iterates over the child elements, skipping every other node kind.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// A parsed or constructed XML document.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::XmlDocument;
/// use treecfg::ports::Layout;
///
/// let doc = XmlDocument::parse("<?xml version=\"1.0\"?><!-- note --><a><b>1</b></a>").unwrap();
/// assert_eq!(doc.root().map(|root| root.name.as_str()), Some("a"));
/// assert_eq!(
///     doc.to_xml_string(Layout::Compact).unwrap(),
///     "<?xml version=\"1.0\"?><!-- note --><a><b>1</b></a>"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlDocument {
    /// The leading declaration, if any
    pub declaration: Option<XmlDeclaration>,
    /// Top-level nodes: at most one element plus comments, doctypes and
    /// processing instructions around it
    pub nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parses XML text.
    ///
    /// The input must contain exactly one root element. Whitespace outside the
    /// root element is discarded; whitespace inside it is kept as text nodes.
    pub fn parse(input: &str) -> Result<Self> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        let mut document = XmlDocument::default();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut has_root = false;

        loop {
            let node = match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(XmlElement::new(element_name(&e), Vec::new()));
                    continue;
                }
                Ok(Event::End(e)) => {
                    let Some(element) = stack.pop() else {
                        return Err(syntax_error(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    };
                    XmlNode::Element(element)
                }
                Ok(Event::Empty(e)) => XmlNode::Element(XmlElement::new(element_name(&e), Vec::new())),
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| syntax_error(format!("invalid text content: {}", err)))?;
                    if stack.is_empty() {
                        if text.trim().is_empty() {
                            continue;
                        }
                        return Err(syntax_error("text outside the root element"));
                    }
                    XmlNode::Text(text.into_owned())
                }
                Ok(Event::CData(e)) => XmlNode::CData(lossy(e.as_ref())),
                Ok(Event::Comment(e)) => XmlNode::Comment(lossy(e.as_ref())),
                Ok(Event::PI(e)) => XmlNode::ProcessingInstruction(lossy(e.as_ref())),
                Ok(Event::DocType(e)) => XmlNode::DocType(lossy(e.as_ref())),
                Ok(Event::Decl(e)) => {
                    let version = e
                        .version()
                        .map(|v| lossy(&v))
                        .unwrap_or_else(|_| "1.0".to_string());
                    let encoding = e.encoding().and_then(|r| r.ok()).map(|v| lossy(&v));
                    document.declaration = Some(XmlDeclaration { version, encoding });
                    continue;
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(syntax_error(format!(
                        "{} at position {}",
                        e,
                        reader.error_position()
                    )));
                }
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => {
                    if matches!(node, XmlNode::Element(_)) {
                        if has_root {
                            return Err(syntax_error("multiple root elements"));
                        }
                        has_root = true;
                    }
                    document.nodes.push(node);
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(syntax_error(format!("missing closing tag </{}>", open.name)));
        }
        if !has_root {
            return Err(syntax_error("no root element"));
        }

        Ok(document)
    }

    /// Returns the first top-level element.
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Renders the document as text.
    ///
    /// [`Layout::Pretty`] puts each element on its own line with a two-space
    /// indent; text content stays on the line of its element.
    pub fn to_xml_string(&self, layout: Layout) -> Result<String> {
        let mut writer = match layout {
            Layout::Pretty => Writer::new_with_indent(Vec::new(), b' ', 2),
            Layout::Compact => Writer::new(Vec::new()),
        };

        if let Some(decl) = &self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new(
                    &decl.version,
                    decl.encoding.as_deref(),
                    None,
                )))
                .map_err(render_error)?;
        }
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }

        String::from_utf8(writer.into_inner()).map_err(render_error)
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<()> {
    let event = match node {
        XmlNode::Element(element) => return write_element(writer, element),
        XmlNode::Text(text) => Event::Text(BytesText::new(text)),
        XmlNode::CData(text) => Event::CData(BytesCData::new(text.as_str())),
        XmlNode::Comment(text) => Event::Comment(BytesText::from_escaped(text.as_str())),
        XmlNode::DocType(text) => Event::DocType(BytesText::from_escaped(text.as_str())),
        XmlNode::ProcessingInstruction(text) => Event::PI(BytesPI::new(text.as_str())),
    };
    writer.write_event(event).map_err(render_error)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let name = element.name.as_str();
    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(render_error);
    }

    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(render_error)?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(render_error)
}

fn element_name(e: &BytesStart<'_>) -> String {
    lossy(e.name().as_ref())
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn syntax_error(message: impl Into<String>) -> TreeError {
    TreeError::Parse {
        format: "xml",
        message: message.into(),
        source: None,
    }
}

fn render_error(err: impl Display) -> TreeError {
    TreeError::schema(format!("document could not be rendered: {}", err))
}

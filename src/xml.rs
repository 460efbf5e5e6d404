//! XML serialization and parsing of DataCite documents.
//!
//! [`document_to_xml`] walks a [`Document`] tree and writes it with
//! `quick-xml`. [`xml_to_document`] reads DataCite XML back into the same tree
//! shape so that already serialized records can be merged.
//!
//! # Examples
//!
//! ```ignore
//! use datacite_convert::{document::{Document, Node}, xml, XmlStyle};
//!
//! let mut doc = Document::with_namespace(
//!     "http://datacite.org/schema/kernel-3",
//!     "http://schema.datacite.org/meta/kernel-3/metadata.xsd",
//! );
//! doc.set("version", Node::text("1.0"));
//!
//! let text = xml::document_to_xml(&doc, XmlStyle::Compact)?;
//! let restored = xml::xml_to_document(&text)?;
//! assert_eq!(doc, restored);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::config::XmlStyle;
use crate::document::{Document, ElementList, Node, TextLeaf, ROOT_ELEMENT};
use crate::error::{ConvertError, Result};

/// Serialize a document to XML text.
///
/// The output starts with an XML declaration followed by the `resource` root
/// element carrying the header attributes. Containers without children are
/// left out.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn document_to_xml(doc: &Document, style: XmlStyle) -> Result<String> {
    let mut writer = match style {
        XmlStyle::Compact => Writer::new(Vec::new()),
        XmlStyle::Pretty => Writer::new_with_indent(Vec::new(), b' ', 2),
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new(ROOT_ELEMENT);
    for (name, value) in &doc.header {
        root.push_attribute((name.as_str(), value.as_str()));
    }

    if doc.elements.is_empty() {
        writer.write_event(Event::Empty(root))?;
    } else {
        writer.write_event(Event::Start(root))?;
        for (name, node) in &doc.elements {
            write_node(&mut writer, name, node)?;
        }
        writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|e| ConvertError::InvalidXml(format!("Non UTF-8 output: {e}")))
}

fn write_node(writer: &mut Writer<Vec<u8>>, name: &str, node: &Node) -> Result<()> {
    match node {
        Node::Text(leaf) => {
            let mut start = BytesStart::new(name);
            for (attr, value) in &leaf.attributes {
                start.push_attribute((attr.as_str(), value.as_str()));
            }
            if leaf.text.is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(&leaf.text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        },
        Node::List(list) => {
            // An empty container would read back as an empty text element.
            if list.is_empty() {
                return Ok(());
            }
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (child_name, items) in &list.children {
                for item in items {
                    write_node(writer, child_name, item)?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        },
    }
    Ok(())
}

/// An element being read, before it is known to be a leaf or a container.
#[derive(Debug, Default)]
struct OpenElement {
    name: String,
    attributes: IndexMap<String, String>,
    text: String,
    children: IndexMap<String, Vec<Node>>,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = OpenElement {
            name: utf8(start.name().as_ref())?,
            ..OpenElement::default()
        };
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ConvertError::InvalidXml(e.to_string()))?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr.unescape_value()?.into_owned();
            element.attributes.insert(key, value);
        }
        Ok(element)
    }

    fn into_node(self) -> Result<(String, Node)> {
        if self.children.is_empty() {
            let leaf = TextLeaf {
                text: self.text,
                attributes: self.attributes,
            };
            return Ok((self.name, Node::Text(leaf)));
        }
        if !self.attributes.is_empty() {
            return Err(ConvertError::InvalidXml(format!(
                "Container element <{}> has attributes",
                self.name
            )));
        }
        if !self.text.trim().is_empty() {
            return Err(ConvertError::InvalidXml(format!(
                "Container element <{}> has mixed content",
                self.name
            )));
        }
        Ok((
            self.name,
            Node::List(ElementList {
                children: self.children,
            }),
        ))
    }
}

/// Parse DataCite XML text into a document.
///
/// Elements without child elements become [`Node::Text`]; elements with child
/// elements become [`Node::List`]. Top-level element names must be unique.
/// Leaf text is kept verbatim; whitespace between child elements is ignored.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the root element is not
/// `resource`, or the element structure does not fit the document tree.
pub fn xml_to_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<OpenElement> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(OpenElement::from_start(&start)?),
            Event::Empty(start) => {
                let element = OpenElement::from_start(&start)?;
                if let Some(doc) = close_element(&mut stack, element)? {
                    return Ok(doc);
                }
            },
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text.unescape()?);
                }
            },
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&utf8(&data.into_inner())?);
                }
            },
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ConvertError::InvalidXml("Unbalanced end tag".into()))?;
                if let Some(doc) = close_element(&mut stack, element)? {
                    return Ok(doc);
                }
            },
            Event::Eof => {
                return Err(ConvertError::InvalidXml(if stack.is_empty() {
                    "No root element".into()
                } else {
                    "Unexpected end of input".into()
                }));
            },
            _ => {},
        }
    }
}

/// Attach a finished element to its parent, or build the document when the
/// root element closes.
fn close_element(stack: &mut Vec<OpenElement>, element: OpenElement) -> Result<Option<Document>> {
    if let Some(parent) = stack.last_mut() {
        let (name, node) = element.into_node()?;
        parent.children.entry(name).or_default().push(node);
        return Ok(None);
    }

    if element.name != ROOT_ELEMENT {
        return Err(ConvertError::InvalidXml(format!(
            "Expected root <{ROOT_ELEMENT}>, found <{}>",
            element.name
        )));
    }

    let mut doc = Document {
        header: element.attributes,
        elements: IndexMap::new(),
    };
    for (name, mut nodes) in element.children {
        if nodes.len() != 1 {
            return Err(ConvertError::InvalidXml(format!(
                "Top-level element <{name}> appears {} times",
                nodes.len()
            )));
        }
        if let Some(node) = nodes.pop() {
            doc.elements.insert(name, node);
        }
    }
    Ok(Some(doc))
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ConvertError::InvalidXml(format!("Invalid UTF-8: {e}")))
}

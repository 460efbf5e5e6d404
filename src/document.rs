//! DataCite document tree.
//!
//! A converted record is an ordered tree rooted at the `resource` element.
//! Each top-level element is a [`Node`]:
//!
//! - [`Node::Text`]: an element with text content and attributes, such as
//!   `<publicationYear>2020</publicationYear>` or
//!   `<identifier identifierType="DOI">10.1234/x</identifier>`
//! - [`Node::List`]: a container whose children are grouped by element name,
//!   such as `<titles><title>..</title><title>..</title></titles>`
//!
//! Children of a list are themselves nodes, so `creators/creator/creatorName`
//! is a list holding lists holding a text leaf.

use indexmap::IndexMap;

/// The root element name of a DataCite record.
pub const ROOT_ELEMENT: &str = "resource";

/// Namespace of the `xsi:` prefix used in the header.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// An element carrying text content and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLeaf {
    /// Text content
    pub text: String,
    /// Attributes in output order, keyed without any prefix marker
    pub attributes: IndexMap<String, String>,
}

impl TextLeaf {
    /// Creates a leaf with text and no attributes.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        TextLeaf {
            text: text.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Adds an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// A container element whose children are grouped by element name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementList {
    /// Child elements grouped by name, in output order
    pub children: IndexMap<String, Vec<Node>>,
}

impl ElementList {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a container holding `items` under a single child name.
    #[must_use]
    pub fn of(name: impl Into<String>, items: Vec<Node>) -> Self {
        let mut list = ElementList::new();
        list.children.insert(name.into(), items);
        list
    }

    /// Appends a child element.
    pub fn push(&mut self, name: impl Into<String>, node: Node) {
        self.children.entry(name.into()).or_default().push(node);
    }

    /// Returns the children stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> &[Node] {
        self.children
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if no child element is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.values().all(Vec::is_empty)
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with text content
    Text(TextLeaf),
    /// Element with child elements
    List(ElementList),
}

impl Node {
    /// Shorthand for a text node without attributes.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextLeaf::new(text))
    }

    /// Returns the leaf if this is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextLeaf> {
        match self {
            Node::Text(leaf) => Some(leaf),
            Node::List(_) => None,
        }
    }

    /// Returns the container if this is a list node.
    #[must_use]
    pub fn as_list(&self) -> Option<&ElementList> {
        match self {
            Node::List(list) => Some(list),
            Node::Text(_) => None,
        }
    }
}

impl From<TextLeaf> for Node {
    fn from(leaf: TextLeaf) -> Self {
        Node::Text(leaf)
    }
}

impl From<ElementList> for Node {
    fn from(list: ElementList) -> Self {
        Node::List(list)
    }
}

/// A DataCite record: header attributes of `resource` plus its elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Attributes of the root element (`xmlns`, `xsi:schemaLocation`, ...)
    pub header: IndexMap<String, String>,
    /// Top-level elements in output order
    pub elements: IndexMap<String, Node>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document with the standard DataCite namespace header.
    #[must_use]
    pub fn with_namespace(namespace: &str, xsd_url: &str) -> Self {
        let mut doc = Document::new();
        doc.header
            .insert("xsi:schemaLocation".into(), format!("{namespace} {xsd_url}"));
        doc.header.insert("xmlns".into(), namespace.to_string());
        doc.header.insert("xmlns:xsi".into(), XSI_NAMESPACE.to_string());
        doc
    }

    /// Sets a top-level element, replacing any existing one in place.
    pub fn set(&mut self, name: impl Into<String>, node: impl Into<Node>) {
        self.elements.insert(name.into(), node.into());
    }

    /// Sets a `group/item` container if `items` is not empty.
    pub fn set_group(&mut self, group: &str, item: &str, items: Vec<Node>) {
        if !items.is_empty() {
            self.set(group, ElementList::of(item, items));
        }
    }

    /// Returns a top-level element.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.elements.get(name)
    }

    /// Returns the texts of the leaves under `group/item`.
    #[must_use]
    pub fn group_texts(&self, group: &str, item: &str) -> Vec<&str> {
        self.get(group)
            .and_then(Node::as_list)
            .map(|list| {
                list.get(item)
                    .iter()
                    .filter_map(Node::as_text)
                    .map(|leaf| leaf.text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_header_order() {
        let doc =
            Document::with_namespace("http://datacite.org/schema/kernel-3", "http://x/m.xsd");
        let keys: Vec<&str> = doc.header.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["xsi:schemaLocation", "xmlns", "xmlns:xsi"]);
        assert_eq!(
            doc.header["xsi:schemaLocation"],
            "http://datacite.org/schema/kernel-3 http://x/m.xsd"
        );
    }

    #[test]
    fn test_set_group_skips_empty() {
        let mut doc = Document::new();
        doc.set_group("titles", "title", Vec::new());
        assert!(doc.get("titles").is_none());

        doc.set_group("titles", "title", vec![Node::text("A"), Node::text("B")]);
        assert_eq!(doc.group_texts("titles", "title"), vec!["A", "B"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut doc = Document::new();
        doc.set("version", Node::text("1"));
        doc.set("language", Node::text("en"));
        doc.set("version", Node::text("2"));
        let keys: Vec<&str> = doc.elements.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["version", "language"]);
        assert_eq!(doc.get("version"), Some(&Node::text("2")));
    }

    #[test]
    fn test_leaf_equality_includes_attributes() {
        let a = TextLeaf::new("x").with_attribute("xml:lang", "en-us");
        let b = TextLeaf::new("x").with_attribute("xml:lang", "de");
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }
}

//! HTML document tree.
//!
//! The page builder produces a [`Document`] made of [`Node`]s; the
//! [`serialize`] module turns it into text. Keeping the tree as a value lets
//! callers inspect ids, classes and links without matching on markup.

pub mod serialize;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Text, escaped on output.
    Text(String),
    /// Markup, emitted verbatim.
    Raw(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: &'static str,
    /// Attributes in output order.
    pub attrs: Vec<(&'static str, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any previous value.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add a CSS class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        match self.attrs.iter_mut().find(|(n, _)| *n == "class") {
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.attrs.push(("class", class.to_string())),
        }
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several child nodes.
    #[must_use]
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Append a raw markup child.
    #[must_use]
    pub fn raw(self, markup: impl Into<String>) -> Self {
        self.child(Node::Raw(markup.into()))
    }

    /// Value of an attribute.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the element carries the CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Child elements, skipping text and raw nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First element in this subtree (including itself) with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|e| e.find_by_id(id))
    }

    /// All elements in this subtree matching `pred`, in document order.
    pub fn find_all<F>(&self, pred: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        self.collect(&pred, &mut found);
        found
    }

    fn collect<'a, F>(&'a self, pred: &F, found: &mut Vec<&'a Element>)
    where
        F: Fn(&Element) -> bool,
    {
        if pred(self) {
            found.push(self);
        }
        for element in self.elements() {
            element.collect(pred, found);
        }
    }

    /// Concatenated text and raw content of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Element(e) => out.push_str(&e.text_content()),
                Node::Text(t) | Node::Raw(t) => out.push_str(t),
            }
        }
        out
    }
}

/// A complete HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The `<html>` element.
    pub root: Element,
}

impl Document {
    /// Wrap a root element.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// The `<head>` element, if present.
    pub fn head(&self) -> Option<&Element> {
        self.root.elements().find(|e| e.tag == "head")
    }

    /// The `<body>` element, if present.
    pub fn body(&self) -> Option<&Element> {
        self.root.elements().find(|e| e.tag == "body")
    }

    /// Serialize to HTML text.
    pub fn to_html(&self) -> String {
        serialize::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .class("top")
            .child(Element::new("div").id("Alpha").class("classbox").text("Alpha"))
            .child(
                Element::new("div")
                    .class("classbox")
                    .class("wide")
                    .id("Beta")
                    .child(Element::new("span").id("Beta::io").raw("<b>io</b>")),
            )
    }

    #[test]
    fn test_find_by_id() {
        let tree = sample();
        assert_eq!(tree.find_by_id("Alpha").unwrap().text_content(), "Alpha");
        assert_eq!(tree.find_by_id("Beta::io").unwrap().tag, "span");
        assert!(tree.find_by_id("Gamma").is_none());
    }

    #[test]
    fn test_classes_accumulate() {
        let tree = sample();
        let boxes = tree.find_all(|e| e.has_class("classbox"));
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[1].get_attr("class"), Some("classbox wide"));
        assert!(!tree.has_class("classbox"));
    }

    #[test]
    fn test_attr_replaces() {
        let element = Element::new("a").attr("href", "#a").attr("href", "#b");
        assert_eq!(element.attrs, vec![("href", "#b".to_string())]);
    }
}

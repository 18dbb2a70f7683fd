// XML document tree
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of Sage.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Owned XML tree mutated in place by the view pipeline.
//!
//! A view configuration is parsed into this representation once per
//!   request and owned exclusively by that request,
//!     so nodes are plain owned data with no parent pointers or
//!     interior mutability.
//! "Importing" a node from another tree is therefore simply [`Clone`]
//!   (or a move when the source is already owned).
//!
//! Namespace _declarations_ (`xmlns`, `xmlns:*`) are ordinary attributes
//!   here so that documents round-trip;
//!     the resolved namespace URI of each element is stored alongside its
//!     [`QName`] by the [`reader`](super::reader).

use super::QName;

/// A node within an XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// XML element.
    Element(Element),

    /// Text content (unescaped).
    Text(String),

    /// Comment node.
    Comment(String),

    /// CData node (`<![CDATA[...]]>`).
    CData(String),
}

impl Node {
    /// Yield a reference to the inner value if it is an [`Element`],
    ///   otherwise [`None`].
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(ele) => Some(ele),
            _ => None,
        }
    }

    /// Yield a mutable reference to the inner value if it is an
    ///   [`Element`],
    ///   otherwise [`None`].
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(ele) => Some(ele),
            _ => None,
        }
    }
}

/// Element attribute.
///
/// The name is lexical;
///   attribute values are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    name: QName,
    value: String,
}

impl Attr {
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: QName,
    namespace: Option<String>,
    attrs: Vec<Attr>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    ///
    /// `namespace` is the _resolved_ namespace URI the element belongs to,
    ///   independent of the prefix carried by `name`;
    ///     the writer will declare the prefix if no ancestor does.
    pub fn new(name: QName, namespace: Option<&str>) -> Self {
        Self {
            name,
            namespace: namespace.map(str::to_string),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Resolved namespace URI of this element, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether this element has the given resolved namespace URI and local
    ///   name.
    ///
    /// This is how the pipeline identifies its vocabulary,
    ///   so that documents are free to bind any prefix they like.
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
            && &**self.name.local_name() == local
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Look up an attribute by its lexical qualified name
    ///   (e.g. `"id"` or `"sage:resourceName"`).
    pub fn attr(&self, name: &str) -> Option<&str> {
        let (prefix, local) = match name.split_once(':') {
            Some((p, l)) => (Some(p), l),
            None => (None, name),
        };

        self.attrs
            .iter()
            .find(|attr| {
                attr.name.prefix().map(|p| &**p) == prefix
                    && &**attr.name.local_name() == local
            })
            .map(|attr| attr.value.as_str())
    }

    /// Look up an attribute node by [`QName`].
    pub fn attr_node(&self, name: &QName) -> Option<&Attr> {
        self.attrs.iter().find(|attr| attr.name == *name)
    }

    /// Set an attribute,
    ///   replacing the value of an existing attribute with the same
    ///   [`QName`] or appending a new one.
    pub fn set_attr(&mut self, name: QName, value: impl Into<String>) {
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value.into(),
            None => self.attrs.push(Attr::new(name, value)),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable child list.
    ///
    /// This is the mutation surface used by the processing loop for
    ///   positional replacement and removal.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given local name and resolved
    ///   namespace.
    pub fn first_child(
        &self,
        namespace: Option<&str>,
        local: &str,
    ) -> Option<&Element> {
        self.child_elements().find(|child| {
            child.namespace.as_deref() == namespace
                && &**child.name.local_name() == local
        })
    }

    /// Position within the child list of the first child element with the
    ///   given local name and resolved namespace.
    pub fn position_of_child(
        &self,
        namespace: Option<&str>,
        local: &str,
    ) -> Option<usize> {
        self.children.iter().position(|node| match node {
            Node::Element(child) => {
                child.namespace.as_deref() == namespace
                    && &**child.name.local_name() == local
            }
            _ => false,
        })
    }

    pub fn append_child(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Append a child element,
    ///   returning a mutable reference to it so construction can continue
    ///   in place.
    pub fn append_element(&mut self, element: Element) -> &mut Element {
        self.children.push(Node::Element(element));

        match self.children.last_mut() {
            Some(Node::Element(ele)) => ele,
            _ => unreachable!("append_element: just-pushed element missing"),
        }
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Concatenated text content of this element and its descendants,
    ///   in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) | Node::CData(text) => out.push_str(text),
                Node::Element(ele) => ele.collect_text(out),
                Node::Comment(_) => (),
            }
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(Node::Text(text.into()));
    }
}

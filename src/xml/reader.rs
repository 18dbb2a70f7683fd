// XML reader
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

//! Parse XML documents into the owned [`Element`] tree.
//!
//! This uses [`quick_xml`] as the parser,
//!   lowering its event stream into the tree and resolving namespace
//!   declarations onto each element as it is opened.
//! Unescaping is delegated to [`quick_xml::escape`],
//!   the only part of the system that touches escaped data on read.
//!
//! The view pipeline processes a whole configuration document at a time,
//!   so unlike a streaming reader the entire tree is materialized here;
//!     view configurations are small and this is not a concern.

use super::tree::{Attr, Element, Node};
use super::{Error, QName};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Namespace URI bound to the reserved `xml` prefix.
const XML_NS_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// Parse a complete XML document into its root [`Element`].
///
/// The document must have exactly one root element.
/// Comments,
///   text,
///   and CData within the root are preserved;
///     the XML declaration,
///     processing instructions,
///     and doctype are discarded.
pub fn parse_document(src: &str) -> Result<Element, Error> {
    let mut reader = Reader::from_str(src);
    let mut buf = Vec::new();

    let mut stack: Vec<Element> = Vec::new();
    let mut scope = Scope::default();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event(&mut buf)? {
            Event::Eof => break,

            Event::Start(ref ev) => {
                stack.push(open_element(ev, &mut scope)?);
            }

            Event::Empty(ref ev) => {
                let ele = open_element(ev, &mut scope)?;
                scope.pop();
                close_element(ele, &mut stack, &mut root)?;
            }

            Event::End(ref ev) => {
                // Tag balance itself is enforced by quick_xml.
                let ele = match stack.pop() {
                    Some(ele) => ele,
                    None => {
                        return Err(Error::Xml(
                            quick_xml::Error::EndEventMismatch {
                                expected: String::new(),
                                found: utf8(ev.name())?,
                            },
                        ))
                    }
                };

                scope.pop();
                close_element(ele, &mut stack, &mut root)?;
            }

            Event::Text(ref ev) => {
                // quick_xml emits whitespace between the declaration and
                //   the root element as text; there is no parent to hold
                //   it, so it is dropped.
                if let Some(parent) = stack.last_mut() {
                    let text = unescape(ev.escaped())
                        .map_err(quick_xml::Error::from)?;
                    parent.append_child(Node::Text(utf8(&text)?));
                }
            }

            Event::CData(ref ev) => {
                if let Some(parent) = stack.last_mut() {
                    parent.append_child(Node::CData(utf8(ev)?));
                }
            }

            Event::Comment(ref ev) => {
                if let Some(parent) = stack.last_mut() {
                    parent.append_child(Node::Comment(utf8(ev.escaped())?));
                }
            }

            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => (),
        }

        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(Error::UnclosedElement(open.name().to_string()));
    }

    root.ok_or(Error::NoRootElement)
}

fn utf8(bytes: &[u8]) -> Result<String, Error> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::InvalidUtf8)
}

/// Lower an opening tag into an [`Element`],
///   recording its namespace declarations and resolving its own namespace.
///
/// A new scope frame is pushed regardless of whether the element declares
///   anything,
///     so that [`Scope::pop`] stays balanced with element depth.
fn open_element(ev: &BytesStart, scope: &mut Scope) -> Result<Element, Error> {
    let name = QName::try_from(ev.name())?;

    let mut frame = Vec::new();
    let mut parsed: Vec<Attr> = Vec::new();

    let mut attrs = ev.attributes();
    for result in attrs.with_checks(true) {
        let attr =
            result.map_err(|e| Error::InvalidAttribute(e.to_string()))?;

        let attr_name = QName::try_from(attr.key)?;

        let raw: &[u8] = &attr.value;
        let value = utf8(&unescape(raw).map_err(quick_xml::Error::from)?)?;

        match (attr_name.prefix(), &**attr_name.local_name()) {
            (None, "xmlns") => frame.push((None, value.clone())),
            (Some(prefix), local) if &**prefix == "xmlns" => {
                frame.push((Some(local.to_string()), value.clone()))
            }
            _ => (),
        }

        parsed.push(Attr::new(attr_name, value));
    }

    scope.push(frame);

    let namespace = match name.prefix() {
        Some(prefix) => Some(
            scope
                .resolve(Some(&**prefix))
                .ok_or_else(|| Error::UnboundPrefix(prefix.to_string()))?
                .to_string(),
        ),

        // An empty default declaration (`xmlns=""`) un-binds the default
        //   namespace.
        None => scope
            .resolve(None)
            .filter(|uri| !uri.is_empty())
            .map(str::to_string),
    };

    let mut ele = Element::new(name, namespace.as_deref());
    for attr in parsed {
        ele.set_attr(attr.name().clone(), attr.value());
    }

    Ok(ele)
}

fn close_element(
    ele: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
) -> Result<(), Error> {
    match stack.last_mut() {
        Some(parent) => {
            parent.append_child(Node::Element(ele));
            Ok(())
        }

        None if root.is_some() => Err(Error::MultipleRootElements),

        None => {
            *root = Some(ele);
            Ok(())
        }
    }
}

/// In-scope namespace declarations,
///   one frame per open element.
#[derive(Debug, Default)]
struct Scope(Vec<Vec<(Option<String>, String)>>);

impl Scope {
    fn push(&mut self, frame: Vec<(Option<String>, String)>) {
        self.0.push(frame);
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    /// Innermost binding for the given prefix
    ///   (or the default namespace when [`None`]).
    fn resolve(&self, prefix: Option<&str>) -> Option<&str> {
        for frame in self.0.iter().rev() {
            for (bound, uri) in frame.iter().rev() {
                if bound.as_deref() == prefix {
                    return Some(uri);
                }
            }
        }

        match prefix {
            Some("xml") => Some(XML_NS_URI),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test;

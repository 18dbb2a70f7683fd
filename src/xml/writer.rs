// XML writer
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

//! Serialize an [`Element`] tree into an XML byte stream via [`Write`].
//!
//! Escaping is delegated to [`quick_xml::escape`],
//!   mirroring the reader.
//!
//! Namespace fixup
//! ===============
//! Elements parsed from a document carry their namespace declarations as
//!   ordinary attributes and serialize back unchanged.
//! Elements created programmatically
//!   (module replacements, the envelope vocabulary)
//!   carry only a resolved namespace URI,
//!     so the writer declares the element's prefix at its first use
//!     whenever no declaration is already in scope.
//! An unprefixed, namespace-less element under a foreign default namespace
//!   is un-bound with `xmlns=""` for the same reason.

use super::tree::{Element, Node};
use super::Error;
use quick_xml::escape::escape;
use std::io::Write;

/// Serialize `root` as a complete document,
///   preceded by an XML declaration.
pub fn write_document<W: Write>(
    root: &Element,
    sink: &mut W,
) -> Result<(), Error> {
    sink.write_all(b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n")?;

    let mut scope = Scope::default();
    write_element(root, sink, &mut scope)
}

/// Serialize `root` into a new owned string.
///
/// This is intended primarily for testing and diagnostics;
///   prefer [`write_document`] when a sink is available.
pub fn document_to_string(root: &Element) -> Result<String, Error> {
    let mut buf = Vec::new();
    write_document(root, &mut buf)?;

    String::from_utf8(buf).map_err(|_| Error::InvalidUtf8)
}

fn write_element<W: Write>(
    ele: &Element,
    sink: &mut W,
    scope: &mut Scope,
) -> Result<(), Error> {
    let mut frame = Vec::new();
    for attr in ele.attrs() {
        match (attr.name().prefix(), &**attr.name().local_name()) {
            (None, "xmlns") => {
                frame.push((None, attr.value().to_string()));
            }
            (Some(prefix), local) if &**prefix == "xmlns" => {
                frame.push((Some(local.to_string()), attr.value().to_string()));
            }
            _ => (),
        }
    }

    scope.push(frame);

    let prefix = ele.name().prefix().map(|p| (**p).to_string());

    let fixup = match ele.namespace() {
        Some(uri) if scope.resolve(prefix.as_deref()) != Some(uri) => {
            Some((prefix.clone(), uri.to_string()))
        }

        // A namespace-less, unprefixed element under a default namespace
        //   must un-bind it to retain its meaning.
        None if prefix.is_none()
            && scope
                .resolve(None)
                .filter(|uri| !uri.is_empty())
                .is_some() =>
        {
            Some((None, String::new()))
        }

        _ => None,
    };

    sink.write_all(b"<")?;
    write_name(ele, sink)?;

    for attr in ele.attrs() {
        sink.write_all(b" ")?;
        sink.write_all(attr.name().to_string().as_bytes())?;
        sink.write_all(b"=\"")?;
        sink.write_all(&escape(attr.value().as_bytes()))?;
        sink.write_all(b"\"")?;
    }

    if let Some((decl_prefix, uri)) = fixup {
        match &decl_prefix {
            Some(p) => {
                sink.write_all(b" xmlns:")?;
                sink.write_all(p.as_bytes())?;
            }
            None => sink.write_all(b" xmlns")?,
        }

        sink.write_all(b"=\"")?;
        sink.write_all(&escape(uri.as_bytes()))?;
        sink.write_all(b"\"")?;

        scope.declare(decl_prefix, uri);
    }

    if ele.children().is_empty() {
        sink.write_all(b"/>")?;
    } else {
        sink.write_all(b">")?;

        for child in ele.children() {
            match child {
                Node::Element(child) => write_element(child, sink, scope)?,

                Node::Text(text) => {
                    sink.write_all(&escape(text.as_bytes()))?
                }

                Node::Comment(comment) => {
                    sink.write_all(b"<!--")?;
                    sink.write_all(comment.as_bytes())?;
                    sink.write_all(b"-->")?;
                }

                Node::CData(data) => {
                    sink.write_all(b"<![CDATA[")?;
                    sink.write_all(data.as_bytes())?;
                    sink.write_all(b"]]>")?;
                }
            }
        }

        sink.write_all(b"</")?;
        write_name(ele, sink)?;
        sink.write_all(b">")?;
    }

    scope.pop();
    Ok(())
}

fn write_name<W: Write>(ele: &Element, sink: &mut W) -> Result<(), Error> {
    if let Some(prefix) = ele.name().prefix() {
        sink.write_all(prefix.as_bytes())?;
        sink.write_all(b":")?;
    }

    sink.write_all(ele.name().local_name().as_bytes())?;
    Ok(())
}

/// In-scope namespace declarations during serialization,
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

    /// Record a fixup declaration on the innermost frame.
    fn declare(&mut self, prefix: Option<String>, uri: String) {
        if let Some(frame) = self.0.last_mut() {
            frame.push((prefix, uri));
        }
    }

    fn resolve(&self, prefix: Option<&str>) -> Option<&str> {
        for frame in self.0.iter().rev() {
            for (bound, uri) in frame.iter().rev() {
                if bound.as_deref() == prefix {
                    return Some(uri);
                }
            }
        }

        match prefix {
            Some("xml") => Some("http://www.w3.org/XML/1998/namespace"),
            _ => None,
        }
    }
}

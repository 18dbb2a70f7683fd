// View envelope assembly
//
//  Copyright (C) 2014-2023 Ryan Specialty Group, LLC.
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

//! Assembly of the final transform-input document.
//!
//! The envelope wraps a processed [`ViewInput`] in the fixed vocabulary
//!   the transform stage consumes:
//!
//! ```xml
//! <sage:view controller="..." action="...">
//!   <sage:request>  <!-- opaque, supplied by the hosting layer -->
//!   <sage:response>
//!     <sage:resources>  <!-- only when any resource applies -->
//!       <!-- inline data resources -->
//!       <sage:head>...</sage:head>
//!       <sage:body>...</sage:body>
//!     </sage:resources>
//!     <sage:model>  <!-- the processed configuration document -->
//!     <!-- one element per extra view-data value -->
//!   </sage:response>
//! </sage:view>
//! ```
//!
//! The finished envelope is folded through an ordered chain of document
//!   filters registered at startup.

use super::ViewInput;
use crate::context::Context;
use crate::resource::{ResourceError, ResourceLocation};
use crate::xml::tree::{Element, Node};
use crate::xml::{QName, SAGE_NS_URI, XHTML_NS_URI};

/// A value able to render itself into the envelope.
///
/// Implemented by hosting-layer types that want structured
///   representation in the response rather than stringification.
pub trait XmlConvertible {
    /// Render this value as an element,
    ///   or [`None`] to contribute nothing.
    fn to_xml(&self) -> Option<Element>;
}

/// One named view-data value,
///   rendered into the response polymorphically by kind.
pub enum ViewValue {
    /// An XML node, imported as-is.
    Node(Node),

    /// A value rendered via its [`XmlConvertible`] capability;
    ///   skipped entirely when it declines.
    Convertible(Box<dyn XmlConvertible>),

    /// Anything else,
    ///   serialized as `sage:value[@id]` with stringified content.
    Text(String),
}

/// A pure document-to-document rewrite applied to the finished envelope.
pub type ViewXmlFilter = Box<dyn Fn(Element) -> Element>;

/// Builder of the envelope document.
///
/// Holds the filter chain,
///   registered once at application startup and applied in registration
///   order to every envelope built.
#[derive(Default)]
pub struct ViewEnvelope {
    filters: Vec<ViewXmlFilter>,
}

impl ViewEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter to the chain.
    pub fn add_filter(&mut self, filter: ViewXmlFilter) {
        self.filters.push(filter);
    }

    /// Wrap `input` into the envelope document.
    ///
    /// `request` is the opaque request-context subtree supplied by the
    ///   hosting layer
    ///     (see [`Context::to_xml`] for the default).
    /// Resources not valid for the context's user agent are omitted.
    pub fn build(
        &self,
        input: &ViewInput,
        context: &Context,
        request: Element,
        values: Vec<(String, ViewValue)>,
    ) -> Result<Element, ResourceError> {
        let mut view =
            Element::new(QName::prefixed("sage", "view"), Some(SAGE_NS_URI));
        view.set_attr(QName::prefixed("xmlns", "sage"), SAGE_NS_URI);
        view.set_attr(QName::prefixed("xmlns", "xhtml"), XHTML_NS_URI);
        view.set_attr(QName::local("controller"), context.controller());
        view.set_attr(QName::local("action"), input.action());

        view.append_element(request);

        let response = view.append_element(Element::new(
            QName::prefixed("sage", "response"),
            Some(SAGE_NS_URI),
        ));

        let usable: Vec<_> = input
            .resources()
            .iter()
            .filter(|resource| resource.is_valid_for(context.user_agent()))
            .collect();

        if !usable.is_empty() {
            let resources = response.append_element(Element::new(
                QName::prefixed("sage", "resources"),
                Some(SAGE_NS_URI),
            ));

            for resource in bucket(&usable, ResourceLocation::Data) {
                resources
                    .append_child(Node::Element(resource.to_xml(context)?));
            }

            let head = bucket(&usable, ResourceLocation::Head);
            if !head.is_empty() {
                let head_node = resources.append_element(Element::new(
                    QName::prefixed("sage", "head"),
                    Some(SAGE_NS_URI),
                ));

                for resource in head {
                    head_node.append_child(Node::Element(
                        resource.to_xml(context)?,
                    ));
                }
            }

            let body = bucket(&usable, ResourceLocation::Body);
            if !body.is_empty() {
                let body_node = resources.append_element(Element::new(
                    QName::prefixed("sage", "body"),
                    Some(SAGE_NS_URI),
                ));

                for resource in body {
                    body_node.append_child(Node::Element(
                        resource.to_xml(context)?,
                    ));
                }
            }
        }

        response
            .append_element(Element::new(
                QName::prefixed("sage", "model"),
                Some(SAGE_NS_URI),
            ))
            .append_child(Node::Element(input.model().clone()));

        for (id, value) in values {
            match value {
                ViewValue::Node(node) => response.append_child(node),

                ViewValue::Convertible(convertible) => {
                    if let Some(ele) = convertible.to_xml() {
                        response.append_child(Node::Element(ele));
                    }
                }

                ViewValue::Text(text) => {
                    let value_node = response.append_element(Element::new(
                        QName::prefixed("sage", "value"),
                        Some(SAGE_NS_URI),
                    ));
                    value_node.set_attr(QName::local("id"), id);
                    value_node.set_text(text);
                }
            }
        }

        let mut envelope = view;
        for filter in &self.filters {
            envelope = filter(envelope);
        }

        Ok(envelope)
    }
}

fn bucket<'a>(
    resources: &[&'a crate::resource::Resource],
    location: ResourceLocation,
) -> Vec<&'a crate::resource::Resource> {
    resources
        .iter()
        .filter(|resource| resource.location() == location)
        .copied()
        .collect()
}

#[cfg(test)]
mod test;

// Content modules
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

//! Pluggable content modules.
//!
//! A module consumes one element of a view configuration and produces
//!   either a replacement fragment plus resource references,
//!   or a non-[`Ok`](ModuleStatus::Ok) status.
//! Implementations are registered in a [`ModuleRegistry`] under the
//!   element name they claim,
//!     and are dispatched by the view-configuration processing loop.
//!
//! A module signals failure by _returning_ an error,
//!   never by panicking;
//!     the dispatch boundary converts a returned error into a
//!     status-[`Error`](ModuleStatus::Error) result so that one module's
//!     failure cannot take down the rest of the document.

use crate::context::Context;
use crate::resource::Resource;
use crate::xml::tree::Element;
use crate::xml::{QName, MODULES_NS_URI};

pub mod registry;
pub use registry::{ModuleFactory, ModuleRegistry};

/// Error type modules may return from
///   [`process_element`](Module::process_element).
///
/// Modules are third-party plugins,
///   so no error vocabulary is imposed on them.
pub type ModuleError = Box<dyn std::error::Error + Send + Sync>;

/// A pluggable unit of content production.
pub trait Module {
    /// Process one module element from a view configuration.
    ///
    /// The element has already had its type-level defaults merged in.
    /// The returned result decides whether the element is replaced or
    ///   removed;
    ///     an `Err` is isolated at the dispatch boundary and treated as a
    ///     removal.
    fn process_element(
        &mut self,
        element: &Element,
        context: &Context,
    ) -> Result<ModuleResult, ModuleError>;
}

/// Outcome classification of one module invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Module produced its content.
    Ok,

    /// Module is not (or incorrectly) configured at the project level.
    ConfigurationError,

    /// The module element is missing required parameters.
    MissingParameters,

    /// Parameters were valid but there was nothing to produce.
    NoData,

    /// Module raised an error during processing.
    Error,
}

/// Result of invoking one module on one element.
///
/// Created by the module,
///   consumed immediately by the processing loop,
///   which copies the resources into the aggregate and splices the
///   replacement element (if any) into the document.
#[derive(Debug)]
pub struct ModuleResult {
    status: ModuleStatus,
    element: Option<Element>,
    resources: Vec<Resource>,
}

impl ModuleResult {
    /// Successful result that replaces the module element with `element`.
    ///
    /// Modules typically pass (a clone of) their own element,
    ///   augmented with produced data.
    pub fn new(element: Element) -> Self {
        Self {
            status: ModuleStatus::Ok,
            element: Some(element),
            resources: Vec::new(),
        }
    }

    /// Result carrying only a status and no replacement element;
    ///   the module element will be removed from the document.
    pub fn with_status(status: ModuleStatus) -> Self {
        Self {
            status,
            element: None,
            resources: Vec::new(),
        }
    }

    pub fn status(&self) -> ModuleStatus {
        self.status
    }

    pub fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Attach a resource reference produced by the module.
    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// The `mod:data` child of the replacement element,
    ///   created on first use,
    ///     under which modules conventionally place their produced data.
    ///
    /// Yields [`None`] when this result carries no replacement element.
    pub fn data_element(&mut self) -> Option<&mut Element> {
        let element = self.element.as_mut()?;

        let pos = match element.position_of_child(Some(MODULES_NS_URI), "data")
        {
            Some(pos) => pos,
            None => {
                element.append_element(Element::new(
                    QName::prefixed("mod", "data"),
                    Some(MODULES_NS_URI),
                ));

                element.children().len() - 1
            }
        };

        element.children_mut()[pos].as_element_mut()
    }

    /// Decompose the result for consumption by the processing loop.
    pub fn into_parts(self) -> (ModuleStatus, Option<Element>, Vec<Resource>) {
        (self.status, self.element, self.resources)
    }
}

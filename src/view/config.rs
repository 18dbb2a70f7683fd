// View configuration processing
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

//! Discovery and processing of module elements in a view configuration.
//!
//! Construction walks the document once,
//!   identifying every element that names a registered module
//!     (excluding anything under a `sage:literal` marker,
//!       which exists so documentation views can show module markup
//!       verbatim)
//!   and assigning each a document-unique id.
//! That id set is the processing snapshot:
//!   [`ViewConfiguration::process`] dispatches exactly those elements,
//!     in document order,
//!     so elements introduced by module replacements are never rescanned
//!     and recursive module expansion cannot loop.
//!
//! Replacement and removal happen in place as each element is dispatched.
//! After the module pass,
//!   `sage:library[@ref]` references are recorded and stripped.
//!
//! The equivalent of the original system's cached union selector is the
//!   registry lookup itself;
//!     matching is recomputed directly from the registry each pass,
//!       which also holds the registered namespace for each name.

use super::{ConfigurationError, ViewInput};
use crate::context::Context;
use crate::module::{ModuleRegistry, ModuleStatus};
use crate::resource::Resource;
use crate::xml::tree::{Element, Node};
use crate::xml::{QName, SAGE_NS_URI};
use fxhash::FxHashSet;
use tracing::debug;

/// Per-request processing of one view-configuration document.
///
/// Owns the document root for the duration of processing;
///   [`process`](Self::process) consumes the configuration and yields the
///   [`ViewInput`] that owns the final document state.
pub struct ViewConfiguration<'a> {
    registry: &'a ModuleRegistry,
    context: &'a Context,
    config: Element,
    module_ids: Vec<String>,
}

impl<'a> ViewConfiguration<'a> {
    /// Prepare `config` for processing,
    ///   discovering its module elements and assigning ids.
    ///
    /// An element without an explicit id receives `module{N}`,
    ///   where `N` is the number of module elements discovered before it.
    /// A duplicate id is a [`ConfigurationError`];
    ///   no module has been invoked at that point.
    pub fn new(
        registry: &'a ModuleRegistry,
        context: &'a Context,
        config: Element,
    ) -> Result<Self, ConfigurationError> {
        let mut configuration = Self {
            registry,
            context,
            config,
            module_ids: Vec::new(),
        };

        if !registry.is_empty() {
            let mut seen = FxHashSet::default();
            discover_modules(
                &mut configuration.config,
                registry,
                &mut configuration.module_ids,
                &mut seen,
            )?;

            debug!(
                count = configuration.module_ids.len(),
                "found module elements in view configuration",
            );
        }

        Ok(configuration)
    }

    /// Name of the action associated with this view configuration.
    pub fn name(&self) -> &str {
        self.context.action()
    }

    /// Root element of this view configuration.
    pub fn config_element(&self) -> &Element {
        &self.config
    }

    /// Ids assigned to the discovered module elements, in document order.
    pub fn module_ids(&self) -> &[String] {
        &self.module_ids
    }

    /// Dispatch every discovered module element and collect the library
    ///   references,
    ///     yielding the aggregate [`ViewInput`].
    ///
    /// One module's execution failure removes only its own element;
    ///   a [`ConfigurationError`] aborts the document.
    pub fn process(mut self) -> Result<ViewInput, ConfigurationError> {
        let mut resources = Vec::new();
        let mut statuses = Vec::new();
        let mut libraries = Vec::new();

        if self.registry.is_empty() {
            debug!("no modules are registered; module processing is disabled");
        } else {
            let mut pending: FxHashSet<String> =
                self.module_ids.iter().cloned().collect();

            process_children(
                &mut self.config,
                self.registry,
                self.context,
                &mut pending,
                &mut resources,
                &mut statuses,
            )?;
        }

        collect_libraries(&mut self.config, &mut libraries);

        Ok(ViewInput::new(
            self.context.action().to_string(),
            self.config,
            resources,
            libraries,
            statuses,
        ))
    }
}

/// Walk `ele`'s subtree in document order,
///   assigning an id to every element that names a registered module.
///
/// Subtrees under a `sage:literal` marker are not entered.
fn discover_modules(
    ele: &mut Element,
    registry: &ModuleRegistry,
    ids: &mut Vec<String>,
    seen: &mut FxHashSet<String>,
) -> Result<(), ConfigurationError> {
    for node in ele.children_mut() {
        let child = match node {
            Node::Element(child) => child,
            _ => continue,
        };

        if child.is(SAGE_NS_URI, "literal") {
            continue;
        }

        if registry.matches(child) {
            let id = match child.attr("id") {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => format!("module{}", ids.len()),
            };

            if !seen.insert(id.clone()) {
                return Err(ConfigurationError::DuplicateModuleId(id));
            }

            child.set_attr(QName::local("id"), id.clone());
            ids.push(id);
        }

        discover_modules(child, registry, ids, seen)?;
    }

    Ok(())
}

enum Step {
    Skip,
    Recurse,
    Dispatch(String),
}

/// Process `parent`'s children in document order,
///   dispatching each element whose assigned id is still pending.
///
/// A replacement takes the original element's position and is _not_
///   entered;
///     the snapshot was fixed at discovery.
/// Pending elements that left the document inside a replaced or removed
///   ancestor are simply never encountered again.
fn process_children(
    parent: &mut Element,
    registry: &ModuleRegistry,
    context: &Context,
    pending: &mut FxHashSet<String>,
    resources: &mut Vec<Resource>,
    statuses: &mut Vec<(String, ModuleStatus)>,
) -> Result<(), ConfigurationError> {
    let mut i = 0;

    while i < parent.children().len() {
        let step = match &parent.children()[i] {
            Node::Element(child) => {
                if child.is(SAGE_NS_URI, "literal") {
                    Step::Skip
                } else if registry.matches(child) {
                    match child.attr("id") {
                        Some(id) if pending.contains(id) => {
                            Step::Dispatch(id.to_string())
                        }
                        _ => Step::Recurse,
                    }
                } else {
                    Step::Recurse
                }
            }

            _ => Step::Skip,
        };

        match step {
            Step::Skip => i += 1,

            Step::Recurse => {
                if let Node::Element(child) = &mut parent.children_mut()[i] {
                    process_children(
                        child, registry, context, pending, resources,
                        statuses,
                    )?;
                }

                i += 1;
            }

            Step::Dispatch(id) => {
                pending.remove(&id);

                let result = match &mut parent.children_mut()[i] {
                    Node::Element(child) => {
                        registry.dispatch(child, context)?
                    }

                    // Step::Dispatch is only produced for elements.
                    _ => unreachable!("dispatch target is not an element"),
                };

                let (status, replacement, produced) = result.into_parts();

                statuses.push((id, status));

                for resource in produced {
                    if !resources.contains(&resource) {
                        resources.push(resource);
                    }
                }

                match replacement {
                    Some(ele) => {
                        parent.children_mut()[i] = Node::Element(ele);
                        i += 1;
                    }

                    // Any result without a replacement element removes the
                    //   original, regardless of status.
                    None => {
                        parent.children_mut().remove(i);
                    }
                }
            }
        }
    }

    Ok(())
}

enum LibraryStep {
    Skip,
    Recurse,
    Take(String),
}

/// Record and strip `sage:library[@ref]` elements.
///
/// A `sage:library` without `@ref` is left in the document untouched,
///   as are references under a `sage:literal` marker.
fn collect_libraries(parent: &mut Element, libraries: &mut Vec<String>) {
    let mut i = 0;

    while i < parent.children().len() {
        let step = match &parent.children()[i] {
            Node::Element(child) => {
                if child.is(SAGE_NS_URI, "literal") {
                    LibraryStep::Skip
                } else if child.is(SAGE_NS_URI, "library") {
                    match child.attr("ref") {
                        Some(name) => LibraryStep::Take(name.to_string()),
                        None => LibraryStep::Recurse,
                    }
                } else {
                    LibraryStep::Recurse
                }
            }

            _ => LibraryStep::Skip,
        };

        match step {
            LibraryStep::Skip => i += 1,

            LibraryStep::Recurse => {
                if let Node::Element(child) = &mut parent.children_mut()[i] {
                    collect_libraries(child, libraries);
                }

                i += 1;
            }

            LibraryStep::Take(name) => {
                if !libraries.contains(&name) {
                    libraries.push(name);
                }

                parent.children_mut().remove(i);
            }
        }
    }
}

// Module registry and dispatch
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

//! Registry mapping module element names to implementations.
//!
//! The registry is populated once at application startup from project
//!   configuration and passed by reference into view processing;
//!     there is no process-global state.
//! Lookup is by exact element local name,
//!   qualified by the namespace URI the module registered under.
//!
//! [`ModuleRegistry::dispatch`] is the per-element entry point:
//!   it resolves the implementation,
//!   merges the registered defaults into the element
//!     (filling only what the element does not itself declare),
//!   and invokes the implementation inside the fault boundary.

use super::{Module, ModuleResult, ModuleStatus};
use crate::context::Context;
use crate::view::ConfigurationError;
use crate::xml::merge::synchronize;
use crate::xml::tree::Element;
use fxhash::FxHashMap;
use tracing::{error, warn};

/// Factory producing a fresh [`Module`] instance per invocation.
pub type ModuleFactory = Box<dyn Fn() -> Box<dyn Module> + Send + Sync>;

struct Entry {
    namespace: String,
    factory: ModuleFactory,
    defaults: Option<Element>,
}

/// Lookup table from module element name to implementation.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: FxHashMap<String, Entry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under `name` in `namespace`,
    ///   with an optional defaults fragment merged into every element of
    ///   this module type before invocation.
    ///
    /// Re-registering a name replaces the previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
        factory: ModuleFactory,
        defaults: Option<Element>,
    ) {
        let name = name.into();

        let previous = self.entries.insert(
            name.clone(),
            Entry {
                namespace: namespace.into(),
                factory,
                defaults,
            },
        );

        if previous.is_some() {
            warn!(module = %name, "module registration replaced");
        }
    }

    /// Whether no modules are registered at all.
    ///
    /// This is the module-subsystem-disabled state:
    ///   the processing loop skips module discovery entirely rather than
    ///   treating every element as undefined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether `element` names a registered module
    ///   (matching local name and registered namespace URI).
    pub fn matches(&self, element: &Element) -> bool {
        self.entries
            .get(&**element.name().local_name())
            .map(|entry| Some(entry.namespace.as_str()) == element.namespace())
            .unwrap_or(false)
    }

    /// Defaults fragment registered for `name`, if any.
    pub fn defaults(&self, name: &str) -> Option<&Element> {
        self.entries.get(name)?.defaults.as_ref()
    }

    /// Dispatch one module element to its implementation.
    ///
    /// The element is mutated in place by the defaults merge before the
    ///   implementation runs.
    /// An error _returned by the module_ is logged and converted into a
    ///   status-[`Error`](ModuleStatus::Error) result here,
    ///     so that processing of sibling elements continues unaffected;
    /// an element with no registered implementation is a
    ///   [`ConfigurationError`] that aborts the whole document.
    pub fn dispatch(
        &self,
        element: &mut Element,
        context: &Context,
    ) -> Result<ModuleResult, ConfigurationError> {
        let entry = self
            .entries
            .get(&**element.name().local_name())
            .filter(|entry| {
                Some(entry.namespace.as_str()) == element.namespace()
            })
            .ok_or_else(|| {
                ConfigurationError::UndefinedModule(element.name().clone())
            })?;

        if let Some(defaults) = &entry.defaults {
            synchronize(element, defaults);
        }

        let mut module = (entry.factory)();

        match module.process_element(element, context) {
            Ok(result) => Ok(result),

            Err(e) => {
                error!(
                    element = %element.name(),
                    error = %e,
                    "error processing module element",
                );

                Ok(ModuleResult::with_status(ModuleStatus::Error))
            }
        }
    }
}

#[cfg(test)]
mod test;

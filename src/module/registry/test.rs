// Tests for module registry and dispatch
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

use super::*;
use crate::module::ModuleError;
use crate::xml::{QName, MODULES_NS_URI};

fn context() -> Context {
    Context::new("home", "index", ".")
}

fn module_element(name: &str) -> Element {
    Element::new(QName::prefixed("mod", name), Some(MODULES_NS_URI))
}

/// Module that echoes its element back with a marker attribute.
struct EchoModule;

impl Module for EchoModule {
    fn process_element(
        &mut self,
        element: &Element,
        _context: &Context,
    ) -> Result<ModuleResult, ModuleError> {
        let mut replacement = element.clone();
        replacement.set_attr(QName::local("processed"), "yes");

        Ok(ModuleResult::new(replacement))
    }
}

/// Module that always fails.
struct FailingModule;

impl Module for FailingModule {
    fn process_element(
        &mut self,
        _element: &Element,
        _context: &Context,
    ) -> Result<ModuleResult, ModuleError> {
        Err("boom".into())
    }
}

fn echo_factory() -> ModuleFactory {
    Box::new(|| Box::new(EchoModule))
}

#[test]
fn empty_registry_reports_disabled_state() {
    let sut = ModuleRegistry::new();

    assert!(sut.is_empty());
    assert_eq!(sut.len(), 0);
}

#[test]
fn matches_requires_name_and_namespace() {
    let mut sut = ModuleRegistry::new();
    sut.register("echo", MODULES_NS_URI, echo_factory(), None);

    assert!(sut.matches(&module_element("echo")));
    assert!(!sut.matches(&module_element("other")));

    // Same local name in a foreign namespace is not a module element.
    let foreign =
        Element::new(QName::prefixed("x", "echo"), Some("urn:elsewhere"));
    assert!(!sut.matches(&foreign));
}

#[test]
fn dispatch_invokes_module() {
    let mut sut = ModuleRegistry::new();
    sut.register("echo", MODULES_NS_URI, echo_factory(), None);

    let mut element = module_element("echo");
    let result = sut.dispatch(&mut element, &context()).unwrap();

    assert_eq!(result.status(), ModuleStatus::Ok);
    assert_eq!(result.element().unwrap().attr("processed"), Some("yes"));
}

#[test]
fn dispatch_merges_defaults_before_invocation() {
    let mut defaults = module_element("echo");
    defaults.set_attr(QName::local("mode"), "default-mode");
    defaults.set_attr(QName::local("depth"), "3");

    let mut sut = ModuleRegistry::new();
    sut.register("echo", MODULES_NS_URI, echo_factory(), Some(defaults));

    // The element overrides `mode` but not `depth`.
    let mut element = module_element("echo");
    element.set_attr(QName::local("mode"), "custom");

    let result = sut.dispatch(&mut element, &context()).unwrap();
    let replacement = result.element().unwrap();

    assert_eq!(replacement.attr("mode"), Some("custom"));
    assert_eq!(replacement.attr("depth"), Some("3"));
}

#[test]
fn dispatch_isolates_module_errors() {
    let mut sut = ModuleRegistry::new();
    sut.register(
        "fails",
        MODULES_NS_URI,
        Box::new(|| Box::new(FailingModule)),
        None,
    );

    let mut element = module_element("fails");
    let result = sut.dispatch(&mut element, &context()).unwrap();

    assert_eq!(result.status(), ModuleStatus::Error);
    assert!(result.element().is_none());
    assert!(result.resources().is_empty());
}

#[test]
fn dispatch_of_undefined_module_is_configuration_error() {
    let sut = {
        let mut registry = ModuleRegistry::new();
        registry.register("echo", MODULES_NS_URI, echo_factory(), None);
        registry
    };

    let mut element = module_element("unknown");

    assert!(matches!(
        sut.dispatch(&mut element, &context()),
        Err(ConfigurationError::UndefinedModule(name))
            if name == QName::prefixed("mod", "unknown"),
    ));
}

// Request context
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

//! Per-request context exposed to the pipeline and to modules.
//!
//! The hosting layer constructs one [`Context`] per request and passes it
//!   by reference through view processing;
//!     it is the only surface modules receive besides their own element.
//! It carries the controller and action names,
//!   path resolution rooted at the project base,
//!   the requesting user agent (when known),
//!   and the phrase table for the active locale.

use crate::fs::{self, LoadError};
use crate::xml::tree::Element;
use crate::xml::{QName, SAGE_NS_URI};
use fxhash::FxHashMap;
use std::path::{Path, PathBuf};

/// Context for a single view-processing request.
#[derive(Debug)]
pub struct Context {
    controller: String,
    action: String,
    base_path: PathBuf,
    user_agent: Option<String>,
    phrases: FxHashMap<String, String>,
}

impl Context {
    pub fn new(
        controller: impl Into<String>,
        action: impl Into<String>,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            base_path: base_path.into(),
            user_agent: None,
            phrases: FxHashMap::default(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Identifier of the requesting user agent,
    ///   when the hosting layer provided one.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Define a localized phrase for lookup by modules.
    pub fn define_phrase(
        &mut self,
        id: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.phrases.insert(id.into(), text.into());
    }

    /// Localized phrase with the given id, if defined.
    pub fn phrase(&self, id: &str) -> Option<&str> {
        self.phrases.get(id).map(String::as_str)
    }

    /// Resolve a declared resource path into a reference suitable for the
    ///   rendered page.
    ///
    /// Absolute references (rooted or with a scheme) pass through
    ///   unchanged;
    ///     anything else is joined onto the base path.
    pub fn resolve_path(&self, path: &str) -> String {
        if path.starts_with('/') || path.contains("://") {
            return path.to_string();
        }

        format!("{}/{}", self.base_path.display(), path)
    }

    /// Resolve a declared resource path to a location on disk.
    pub fn resolve_file(&self, path: &str) -> PathBuf {
        let trimmed = path.trim_start_matches('/');
        self.base_path.join(trimmed)
    }

    /// Load and parse the XML document a resource path refers to.
    pub fn load_document(&self, path: &str) -> Result<Element, LoadError> {
        fs::load_document(self.resolve_file(path))
    }

    /// Serialize this context as the opaque `sage:request` subtree of the
    ///   envelope.
    pub fn to_xml(&self) -> Element {
        let mut request =
            Element::new(QName::prefixed("sage", "request"), Some(SAGE_NS_URI));
        request.set_attr(QName::local("controller"), &self.controller);
        request.set_attr(QName::local("action"), &self.action);

        request
            .append_element(Element::new(
                QName::prefixed("sage", "path"),
                Some(SAGE_NS_URI),
            ))
            .set_text(self.base_path.display().to_string());

        if let Some(user_agent) = &self.user_agent {
            request
                .append_element(Element::new(
                    QName::prefixed("sage", "useragent"),
                    Some(SAGE_NS_URI),
                ))
                .set_text(user_agent);
        }

        request
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_path_joins_relative_onto_base() {
        let sut = Context::new("home", "index", "/srv/app");

        assert_eq!(sut.resolve_path("lib/styles.css"), "/srv/app/lib/styles.css");
        assert_eq!(sut.resolve_path("/already/rooted.css"), "/already/rooted.css");
        assert_eq!(
            sut.resolve_path("https://cdn.example/x.js"),
            "https://cdn.example/x.js",
        );
    }

    #[test]
    fn phrase_lookup() {
        let mut sut = Context::new("home", "index", ".");
        sut.define_phrase("greeting", "hello");

        assert_eq!(sut.phrase("greeting"), Some("hello"));
        assert_eq!(sut.phrase("missing"), None);
    }

    #[test]
    fn request_xml_carries_names_and_agent() {
        let sut =
            Context::new("home", "index", "/srv/app").with_user_agent("ie6");
        let request = sut.to_xml();

        assert!(request.is(SAGE_NS_URI, "request"));
        assert_eq!(request.attr("controller"), Some("home"));
        assert_eq!(request.attr("action"), Some("index"));

        let agent = request.first_child(Some(SAGE_NS_URI), "useragent");
        assert_eq!(agent.unwrap().text(), "ie6");
    }
}

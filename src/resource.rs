// Page resources
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

//! External references contributed to the rendered page.
//!
//! Modules and libraries declare scripts,
//!   styles,
//!   icons,
//!   and inline data documents as [`Resource`]s;
//!     the envelope builder renders each into its XHTML (or imported
//!     document) form and places it into the bucket named by its
//!     [`ResourceLocation`].
//!
//! A resource is immutable once parsed from its defining element.

use crate::context::Context;
use crate::fs::LoadError;
use crate::xml::tree::Element;
use crate::xml::{QName, SAGE_NS_URI, XHTML_NS_URI};
use std::fmt::Display;

/// What kind of artifact a [`Resource`] refers to.
///
/// The type determines the XML rendering in the envelope,
///   independently of where the resource is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Style,
    Script,
    Icon,

    /// An XML document imported inline.
    Template,
}

impl TryFrom<&str> for ResourceType {
    type Error = ResourceError;

    /// Parse a `type` attribute value, case-insensitively.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "style" => Ok(Self::Style),
            "script" => Ok(Self::Script),
            "icon" => Ok(Self::Icon),
            "template" => Ok(Self::Template),
            _ => Err(ResourceError::InvalidType(value.to_string())),
        }
    }
}

/// Where in the rendered page a [`Resource`] is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLocation {
    Head,
    Body,

    /// Inlined at the top of the resource block,
    ///   ahead of the head and body buckets.
    Data,
}

impl TryFrom<&str> for ResourceLocation {
    type Error = ResourceError;

    /// Parse a `location` attribute value, case-insensitively.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "head" => Ok(Self::Head),
            "body" => Ok(Self::Body),
            "data" => Ok(Self::Data),
            _ => Err(ResourceError::InvalidLocation(value.to_string())),
        }
    }
}

/// Error parsing or rendering a [`Resource`].
#[derive(Debug)]
pub enum ResourceError {
    /// `type` attribute missing or not a known [`ResourceType`].
    InvalidType(String),

    /// `location` attribute missing or not a known [`ResourceLocation`].
    InvalidLocation(String),

    /// `path` attribute missing or empty.
    MissingPath,

    /// A template resource's document could not be loaded.
    Load(LoadError),
}

impl Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidType(value) => {
                write!(f, "unknown resource type `{}`", value)
            }
            Self::InvalidLocation(value) => {
                write!(f, "unknown resource location `{}`", value)
            }
            Self::MissingPath => {
                write!(f, "resource element is missing its `path` attribute")
            }
            Self::Load(e) => {
                write!(f, "unable to load resource document: {}", e)
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for ResourceError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

/// A script, style, icon, or inline-document reference.
#[derive(Debug, Clone)]
pub struct Resource {
    resource_type: ResourceType,
    location: ResourceLocation,
    path: String,
    name: Option<String>,
    limit_to: Vec<String>,
}

impl Resource {
    pub fn new(
        resource_type: ResourceType,
        location: ResourceLocation,
        path: impl Into<String>,
    ) -> Self {
        Self {
            resource_type,
            location,
            path: path.into(),
            name: None,
            limit_to: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restrict this resource to user agents whose id starts with one of
    ///   the given (case-normalized) prefixes.
    pub fn with_limit_to(mut self, agents: &[&str]) -> Self {
        self.limit_to =
            agents.iter().map(|a| a.trim().to_lowercase()).collect();
        self
    }

    /// Parse a resource from its defining element.
    ///
    /// `type`, `location`, and a non-empty `path` are required;
    ///   `name` and the comma-separated `limitTo` allow-list are optional.
    pub fn from_element(ele: &Element) -> Result<Self, ResourceError> {
        let resource_type =
            ResourceType::try_from(ele.attr("type").unwrap_or_default())?;
        let location =
            ResourceLocation::try_from(ele.attr("location").unwrap_or_default())?;

        let path = match ele.attr("path") {
            Some(path) if !path.trim().is_empty() => path.to_string(),
            _ => return Err(ResourceError::MissingPath),
        };

        let mut resource = Self::new(resource_type, location, path);
        resource.name = ele
            .attr("name")
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string);

        if let Some(limit) = ele.attr("limitTo") {
            resource.limit_to = limit
                .split(',')
                .map(|agent| agent.trim().to_lowercase())
                .filter(|agent| !agent.is_empty())
                .collect();
        }

        Ok(resource)
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn location(&self) -> ResourceLocation {
        self.location
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this resource applies to the given user agent.
    ///
    /// A resource with no restrictions applies to everything,
    ///   and an unknown agent is never restricted.
    pub fn is_valid_for(&self, user_agent: Option<&str>) -> bool {
        let agent = match user_agent {
            Some(agent) if !agent.trim().is_empty() => agent.to_lowercase(),
            _ => return true,
        };

        if self.limit_to.is_empty() {
            return true;
        }

        self.limit_to.iter().any(|prefix| agent.starts_with(prefix))
    }

    /// Render this resource as the XML that represents it in the envelope.
    ///
    /// Styles,
    ///   scripts,
    ///   and icons become XHTML references to the resolved path;
    /// templates load the referenced document and import its root,
    ///   stamped with `sage:resourceName` when the resource is named.
    pub fn to_xml(&self, context: &Context) -> Result<Element, ResourceError> {
        let path = context.resolve_path(&self.path);

        let rendered = match self.resource_type {
            ResourceType::Style => {
                let mut link = Element::new(
                    QName::prefixed("xhtml", "link"),
                    Some(XHTML_NS_URI),
                );
                link.set_attr(QName::local("type"), "text/css");
                link.set_attr(QName::local("rel"), "stylesheet");
                link.set_attr(QName::local("href"), path);
                link
            }

            ResourceType::Script => {
                let mut script = Element::new(
                    QName::prefixed("xhtml", "script"),
                    Some(XHTML_NS_URI),
                );
                script.set_attr(QName::local("type"), "text/javascript");
                script.set_attr(QName::local("language"), "javascript");
                script.set_attr(QName::local("src"), path);
                script
            }

            ResourceType::Icon => {
                let mut link = Element::new(
                    QName::prefixed("xhtml", "link"),
                    Some(XHTML_NS_URI),
                );
                link.set_attr(QName::local("rel"), "icon");
                link.set_attr(QName::local("href"), path);
                link
            }

            ResourceType::Template => {
                let mut root = context.load_document(&self.path)?;

                if let Some(name) = &self.name {
                    root.set_attr(
                        QName::prefixed("sage", "resourceName"),
                        name,
                    );
                    root.set_attr(
                        QName::prefixed("xmlns", "sage"),
                        SAGE_NS_URI,
                    );
                }

                root
            }
        };

        Ok(rendered)
    }
}

/// Resources are identified by type, location, and (case-insensitive)
///   path;
///     the aggregate collapses duplicate declarations on this identity.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type
            && self.location == other.location
            && self.path.eq_ignore_ascii_case(&other.path)
    }
}

impl Eq for Resource {}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:?}) ({:?})",
            self.path, self.resource_type, self.location
        )
    }
}

// XML errors
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

//! Error conditions while reading or writing XML documents.

use std::fmt::Display;
use std::io;

/// Error attempting to read or write an XML document.
#[derive(Debug)]
pub enum Error {
    /// Error from the underlying XML parser.
    Xml(quick_xml::Error),

    /// I/O error while serializing a document.
    Io(io::Error),

    /// Provided name is not a valid QName.
    InvalidQName(String),

    /// A colon appeared in a context where a name must be an NCName.
    NCColon(String),

    /// Name or content was not valid UTF-8.
    InvalidUtf8,

    /// Element name uses a namespace prefix that is not in scope.
    UnboundPrefix(String),

    /// An attribute could not be parsed.
    InvalidAttribute(String),

    /// Document ended before the named element was closed.
    UnclosedElement(String),

    /// Document contains more than one root element.
    MultipleRootElements,

    /// Document contains no root element at all.
    NoRootElement,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "XML error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidQName(name) => write!(f, "invalid QName `{}`", name),
            Self::NCColon(name) => {
                write!(f, "NCName `{}` cannot contain a colon", name)
            }
            Self::InvalidUtf8 => write!(f, "invalid UTF-8 in document"),
            Self::UnboundPrefix(prefix) => {
                write!(f, "namespace prefix `{}` is not declared", prefix)
            }
            Self::InvalidAttribute(msg) => {
                write!(f, "malformed attribute: {}", msg)
            }
            Self::UnclosedElement(name) => {
                write!(f, "element `{}` is missing its closing tag", name)
            }
            Self::MultipleRootElements => {
                write!(f, "document has more than one root element")
            }
            Self::NoRootElement => write!(f, "document has no root element"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// The wrapped parser and I/O errors do not provide equality,
//   so compare their rendered messages;
//     this exists for assertions in tests.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        use Error::*;

        match (self, other) {
            (Xml(a), Xml(b)) => a.to_string() == b.to_string(),
            (Io(a), Io(b)) => a.kind() == b.kind(),
            (InvalidQName(a), InvalidQName(b)) => a == b,
            (NCColon(a), NCColon(b)) => a == b,
            (InvalidUtf8, InvalidUtf8) => true,
            (UnboundPrefix(a), UnboundPrefix(b)) => a == b,
            (InvalidAttribute(a), InvalidAttribute(b)) => a == b,
            (UnclosedElement(a), UnclosedElement(b)) => a == b,
            (MultipleRootElements, MultipleRootElements) => true,
            (NoRootElement, NoRootElement) => true,
            _ => false,
        }
    }
}

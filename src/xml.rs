// XML names and namespaces
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

//! XML name model and document tree for the view pipeline.
//!
//! This module serves as an abstraction layer atop of whatever XML library
//!   is used (e.g. `quick_xml`),
//!     and is _not_ intended to be comprehensive;
//!       it exists to solve concerns specific to processing Sage view
//!       configurations.
//!
//! A view configuration is read into an owned [`tree::Element`]
//!   (see [`reader`]),
//!     mutated in place by the processing pipeline,
//!     and serialized back out (see [`writer`]).
//! Names are modeled by [`QName`],
//!   with namespace _prefixes_ preserved verbatim for round-tripping and
//!   namespace _URIs_ resolved separately onto each element,
//!     since the pipeline matches elements by URI rather than by prefix.

use memchr::memchr;
use std::fmt::Display;
use std::ops::Deref;

mod error;
pub use error::Error;

pub mod merge;
pub mod reader;
pub mod tree;
pub mod writer;

/// Namespace URI of the Sage vocabulary
///   (`sage:view`, `sage:library`, `sage:literal` and friends).
pub const SAGE_NS_URI: &str = "http://www.lovullo.com/sage";

/// Namespace URI shared by the stock content modules.
///
/// Individual modules may register under any URI;
///   this is merely the default vocabulary.
pub const MODULES_NS_URI: &str = "http://www.lovullo.com/sage/modules";

/// XHTML namespace URI,
///   used for resource renderings in the envelope.
pub const XHTML_NS_URI: &str = "http://www.w3.org/1999/xhtml";

/// Conventional prefix for [`SAGE_NS_URI`].
pub const SAGE_PREFIX: &str = "sage";

/// Conventional prefix for [`MODULES_NS_URI`].
pub const MODULES_PREFIX: &str = "mod";

/// Conventional prefix for [`XHTML_NS_URI`].
pub const XHTML_PREFIX: &str = "xhtml";

/// XML Name minus `":"`.
///
/// The intent is to check a string for validity when it enters the system,
///   so that the rest of the pipeline does not have to concern itself with
///   whether a name is syntactically valid as XML.
///
/// See <https://www.w3.org/TR/REC-xml-names/#NT-NCName>.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NCName(String);

impl NCName {
    /// Create an NCName without validating it.
    ///
    /// This is intended for string literals known at compile time;
    ///   a colon in `name` will produce a name that can never match
    ///   anything read from a document.
    pub(crate) fn new_unchecked(name: &str) -> Self {
        debug_assert!(!name.contains(':'), "NCName with colon: {name}");
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for NCName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::InvalidQName(value.into()));
        }

        if value.contains(':') {
            return Err(Error::NCColon(value.into()));
        }

        Ok(Self(value.into()))
    }
}

impl TryFrom<&[u8]> for NCName {
    type Error = Error;

    /// Attempt to parse a byte slice into an [`NCName`].
    ///
    /// If the slice contains `b':'`,
    ///   an error will be produced.
    /// No other checks are performed beyond checking that the byte sequence
    ///   represents a valid UTF-8 string.
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        std::str::from_utf8(value)
            .map_err(|_| Error::InvalidUtf8)
            .and_then(NCName::try_from)
    }
}

impl Deref for NCName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for NCName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Namespace prefix of a [`QName`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix(NCName);

/// Local name portion of a [`QName`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalPart(NCName);

impl Deref for Prefix {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.deref()
    }
}

impl Deref for LocalPart {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.deref()
    }
}

impl From<NCName> for Prefix {
    fn from(name: NCName) -> Self {
        Self(name)
    }
}

impl From<NCName> for LocalPart {
    fn from(name: NCName) -> Self {
        Self(name)
    }
}

impl TryFrom<&str> for Prefix {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self(value.try_into()?))
    }
}

impl TryFrom<&str> for LocalPart {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self(value.try_into()?))
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for LocalPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A qualified name (namespace prefix and local name).
///
/// The prefix is lexical;
///   the namespace URI it was bound to at parse time lives on
///   [`tree::Element`] instead,
///     so that a [`QName`] can be compared and written without a
///     namespace context in scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName(Option<Prefix>, LocalPart);

impl QName {
    /// Create a new fully-qualified name (prefix and local name).
    pub fn new(prefix: Option<Prefix>, local_name: LocalPart) -> Self {
        Self(prefix, local_name)
    }

    /// Create a new name from a local name only.
    pub fn new_local(local_name: LocalPart) -> Self {
        Self(None, local_name)
    }

    /// Construct a prefixed name from string literals known to be valid
    ///   NCNames.
    ///
    /// This is a convenience for the fixed vocabulary
    ///   (`sage:*`, `mod:*`, `xhtml:*`);
    ///     names originating from documents must go through [`TryFrom`].
    pub fn prefixed(prefix: &str, local: &str) -> Self {
        Self(
            Some(Prefix(NCName::new_unchecked(prefix))),
            LocalPart(NCName::new_unchecked(local)),
        )
    }

    /// Construct an unprefixed name from a string literal known to be a
    ///   valid NCName.
    ///
    /// See [`QName::prefixed`].
    pub fn local(local: &str) -> Self {
        Self(None, LocalPart(NCName::new_unchecked(local)))
    }

    /// Namespace prefix of the name, if any.
    pub fn prefix(&self) -> Option<&Prefix> {
        self.0.as_ref()
    }

    /// Local part of the name (name without prefix).
    pub fn local_name(&self) -> &LocalPart {
        &self.1
    }
}

impl TryFrom<&str> for QName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.as_bytes().try_into()
    }
}

impl TryFrom<&[u8]> for QName {
    type Error = Error;

    /// Attempt to parse a byte slice into a [`QName`].
    ///
    /// The byte slice must represent a valid QName in UTF-8.
    /// If a colon is present,
    ///   it delimits the namespace [`Prefix`] and [`LocalPart`],
    ///   and therefore must not be in the first or last byte position.
    fn try_from(name: &[u8]) -> Result<Self, Self::Error> {
        match memchr(b':', name) {
            // Leading colon means we're missing a prefix, trailing means
            //   that we have no local part.
            Some(pos) if pos == 0 || pos == name.len() - 1 => {
                Err(Error::InvalidQName(
                    String::from_utf8_lossy(name).into_owned(),
                ))
            }

            // There is _at least_ one colon in the string.
            Some(pos) => {
                // The prefix is before the first colon,
                //   and so itself must not contain a colon and is therefore
                //   a valid NCName.
                let prefix = NCName::try_from(&name[..pos])?;

                // But there could be a _second_ colon,
                //   so the local part requires validation.
                let local = NCName::try_from(&name[(pos + 1)..])?;

                Ok(Self::new(Some(prefix.into()), local.into()))
            }

            // There are no colons in the string, so the entire string is
            //   both a local part and a valid NCName.
            None => Ok(Self::new(None, NCName::try_from(name)?.into())),
        }
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QName(Some(prefix), suffix) => write!(f, "{}:{}", prefix, suffix),
            QName(None, suffix) => suffix.fmt(f),
        }
    }
}

// Light filesystem helpers
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

//! Lightweight filesystem access.
//!
//! This makes no attempt to be comprehensive;
//!   it includes only what the pipeline needs,
//!     which is reading an XML document from a path
//!       (view configurations, module defaults, data resources).

use crate::xml::{self, reader::parse_document, tree::Element};
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Failure to load an XML document from disk.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(xml::Error),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "unable to read document: {}", e),
            Self::Parse(e) => write!(f, "unable to parse document: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<xml::Error> for LoadError {
    fn from(e: xml::Error) -> Self {
        Self::Parse(e)
    }
}

/// Open, read, and parse the XML document at `path`.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Element, LoadError> {
    let mut contents = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut contents)?;

    Ok(parse_document(&contents)?)
}

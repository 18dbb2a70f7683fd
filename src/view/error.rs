// View configuration errors
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

//! Document-level failures of view-configuration processing.

use crate::xml::QName;
use std::fmt::Display;

/// Structural problem with a view configuration.
///
/// Unlike a failure within a single module,
///   which is isolated to its element,
///   a configuration error aborts processing of the whole document;
///     the page cannot render.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Two module elements declare the same id.
    DuplicateModuleId(String),

    /// A module element's name has no registered implementation.
    UndefinedModule(QName),
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateModuleId(id) => write!(
                f,
                "Duplicate module id: '{}'. Make sure all modules in the \
                 view configuration have unique ids.",
                id
            ),

            Self::UndefinedModule(name) => write!(
                f,
                "no module implementation is registered for element `{}`",
                name
            ),
        }
    }
}

impl std::error::Error for ConfigurationError {}

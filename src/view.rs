// View processing
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

//! The view-configuration processing pipeline.
//!
//! A request's view configuration flows through this module in three
//!   steps:
//!
//!   1. [`ViewConfiguration`] discovers the module elements in the
//!        document and assigns their ids;
//!   2. [`ViewConfiguration::process`] dispatches each one and collects
//!        resources and library references into a [`ViewInput`]; and
//!   3. [`ViewEnvelope`] wraps that input into the document the transform
//!        stage consumes.
//!
//! Processing is single-threaded per request:
//!   the document is owned exclusively for the duration,
//!   and the only shared state is the read-only
//!   [`ModuleRegistry`](crate::module::ModuleRegistry).

pub mod config;
pub mod envelope;
pub mod input;

mod error;

pub use config::ViewConfiguration;
pub use envelope::{ViewEnvelope, ViewValue, ViewXmlFilter, XmlConvertible};
pub use error::ConfigurationError;
pub use input::ViewInput;

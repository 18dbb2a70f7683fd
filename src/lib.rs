// Sage in Rust
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

//! An incremental rewrite of the Sage view pipeline in Rust.
//!
//! Sage maps each request to an XML view configuration,
//!   expands the module placeholders inside it by dispatching to
//!   registered content modules,
//!   and wraps the assembled document in the envelope consumed by the
//!   transform stage that renders the final markup.
//! This crate is that pipeline;
//!   routing,
//!   the transform engine,
//!   and the extension installer remain with the host.
//!
//! Start with [`view`] for the processing flow,
//!   [`module`] for the plugin surface,
//!   and [`xml`] for the document representation everything operates on.

pub mod context;
pub mod fs;
pub mod module;
pub mod resource;
pub mod view;
pub mod xml;

// Processed view input
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

//! Aggregate result of processing a view configuration.

use crate::module::ModuleStatus;
use crate::resource::Resource;
use crate::xml::tree::Element;

/// Everything the envelope stage needs from a processed view
///   configuration.
///
/// Owns the mutated configuration document (the model),
///   the resources collected from module results in declaration order with
///   duplicates collapsed,
///   the referenced shared-library names,
///   and the status each dispatched module reported.
#[derive(Debug)]
pub struct ViewInput {
    action: String,
    model: Element,
    resources: Vec<Resource>,
    libraries: Vec<String>,
    module_statuses: Vec<(String, ModuleStatus)>,
}

impl ViewInput {
    pub(crate) fn new(
        action: String,
        model: Element,
        resources: Vec<Resource>,
        libraries: Vec<String>,
        module_statuses: Vec<(String, ModuleStatus)>,
    ) -> Self {
        Self {
            action,
            model,
            resources,
            libraries,
            module_statuses,
        }
    }

    /// Name of the action this view was processed for.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The processed configuration document.
    pub fn model(&self) -> &Element {
        &self.model
    }

    pub fn into_model(self) -> Element {
        self.model
    }

    /// Collected resources in declaration order,
    ///   duplicates collapsed on (type, location, path).
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Referenced shared-library names,
    ///   first reference wins,
    ///   duplicates collapsed.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    /// Outcome of each dispatched module,
    ///   keyed by its assigned id,
    ///   in document order.
    pub fn module_statuses(&self) -> &[(String, ModuleStatus)] {
        &self.module_statuses
    }
}

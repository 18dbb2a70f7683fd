// XML defaults merge
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

//! Merge a defaults subtree into a target subtree.
//!
//! [`synchronize`] fills in data that is _missing_ from the target,
//!   and never overwrites data the target already has;
//!     this is what allows a module element in a view configuration to
//!     override its type-level defaults simply by declaring the attribute
//!     or child itself.
//!
//! The merge operates purely on in-memory trees and has no error
//!   conditions.

use super::tree::{Element, Node};

/// Recursively merge the `source` defaults subtree into `target`.
///
/// For every attribute present on `source` but absent on `target`,
///   the attribute is copied verbatim onto `target`.
/// For every child element of `source` in document order,
///   the _first_ child of `target` with the same local name and namespace
///   is merged into recursively;
///     when `target` has no such child,
///       an empty element with the source child's name and namespace is
///       appended and then merged into.
///
/// If `target` has multiple children sharing a local name,
///   only the first is merged into;
///     surplus duplicates are left untouched.
///
/// `target` is mutated in place; `source` is never mutated.
pub fn synchronize(target: &mut Element, source: &Element) {
    for attr in source.attrs() {
        if target.attr_node(attr.name()).is_none() {
            target.set_attr(attr.name().clone(), attr.value());
        }
    }

    for source_child in source.child_elements() {
        let local = &**source_child.name().local_name();
        let namespace = source_child.namespace();

        let pos = match target.position_of_child(namespace, local) {
            Some(pos) => pos,
            None => {
                target.append_element(Element::new(
                    source_child.name().clone(),
                    namespace,
                ));

                target.children().len() - 1
            }
        };

        match &mut target.children_mut()[pos] {
            Node::Element(target_child) => {
                synchronize(target_child, source_child)
            }

            // position_of_child only yields element positions.
            _ => unreachable!("synchronize: non-element merge target"),
        }
    }
}

#[cfg(test)]
mod test;

// Tests for the XML defaults merge
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

use super::*;
use crate::xml::QName;

fn ele(name: &str) -> Element {
    Element::new(QName::local(name), None)
}

#[test]
fn copies_missing_attributes() {
    let mut target = ele("m");

    let mut source = ele("m");
    source.set_attr(QName::local("a"), "1");
    source.set_attr(QName::local("b"), "2");

    synchronize(&mut target, &source);

    assert_eq!(target.attr("a"), Some("1"));
    assert_eq!(target.attr("b"), Some("2"));
}

#[test]
fn existing_attributes_take_precedence() {
    let mut target = ele("m");
    target.set_attr(QName::local("a"), "x");

    let mut source = ele("m");
    source.set_attr(QName::local("a"), "y");

    synchronize(&mut target, &source);

    assert_eq!(target.attr("a"), Some("x"));
}

#[test]
fn creates_missing_child_with_its_data() {
    let mut target = ele("m");

    let mut source = ele("m");
    source
        .append_element(ele("c"))
        .set_attr(QName::local("foo"), "1");

    synchronize(&mut target, &source);

    assert_eq!(target.child_elements().count(), 1);

    let child = target.first_child(None, "c").unwrap();
    assert_eq!(child.attr("foo"), Some("1"));
}

#[test]
fn recurses_into_existing_child() {
    let mut target = ele("m");
    target
        .append_element(ele("c"))
        .set_attr(QName::local("keep"), "target");

    let mut source = ele("m");
    let source_child = source.append_element(ele("c"));
    source_child.set_attr(QName::local("keep"), "source");
    source_child.append_element(ele("grandchild"));

    synchronize(&mut target, &source);

    let child = target.first_child(None, "c").unwrap();
    assert_eq!(child.attr("keep"), Some("target"));
    assert!(child.first_child(None, "grandchild").is_some());

    // No second `c` was created.
    assert_eq!(target.child_elements().count(), 1);
}

#[test]
fn only_first_matching_child_is_merged_into() {
    let mut target = ele("m");
    target.append_element(ele("c"));
    target.append_element(ele("c"));

    let mut source = ele("m");
    source
        .append_element(ele("c"))
        .set_attr(QName::local("merged"), "1");

    synchronize(&mut target, &source);

    let children: Vec<_> = target.child_elements().collect();
    assert_eq!(children[0].attr("merged"), Some("1"));
    assert_eq!(children[1].attr("merged"), None);
}

#[test]
fn children_matched_by_namespace() {
    let mut target = ele("m");
    target.append_element(Element::new(
        QName::prefixed("other", "c"),
        Some("urn:other"),
    ));

    let mut source = ele("m");
    source
        .append_element(Element::new(QName::prefixed("mod", "c"), Some("urn:mod")))
        .set_attr(QName::local("x"), "1");

    synchronize(&mut target, &source);

    // The same-namespace child did not exist, so a new one was created
    //   rather than merging into the other-namespace sibling.
    assert_eq!(target.child_elements().count(), 2);

    let created = target.first_child(Some("urn:mod"), "c").unwrap();
    assert_eq!(created.attr("x"), Some("1"));

    let untouched = target.first_child(Some("urn:other"), "c").unwrap();
    assert_eq!(untouched.attr("x"), None);
}

#[test]
fn idempotent() {
    let mut target = ele("m");
    target.set_attr(QName::local("a"), "x");
    target.append_element(ele("c"));

    let mut source = ele("m");
    source.set_attr(QName::local("a"), "y");
    source.set_attr(QName::local("b"), "2");
    source
        .append_element(ele("c"))
        .set_attr(QName::local("foo"), "1");
    source.append_element(ele("d"));

    synchronize(&mut target, &source);
    let once = target.clone();

    synchronize(&mut target, &source);
    assert_eq!(once, target);
}

#[test]
fn source_is_not_mutated() {
    let mut target = ele("m");
    target.set_attr(QName::local("a"), "x");

    let mut source = ele("m");
    source.append_element(ele("c"));
    let before = source.clone();

    synchronize(&mut target, &source);

    assert_eq!(before, source);
}

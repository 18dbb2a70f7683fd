// Tests for the XML reader
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
use crate::xml::SAGE_NS_URI;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn parses_root_with_attributes_and_text() -> TestResult {
    let root = parse_document(r#"<view id="home">hello</view>"#)?;

    assert_eq!(root.name().to_string(), "view");
    assert_eq!(root.attr("id"), Some("home"));
    assert_eq!(root.text(), "hello");

    Ok(())
}

#[test]
fn resolves_prefixed_namespaces() -> TestResult {
    let root = parse_document(&format!(
        r#"<sage:view xmlns:sage="{}"><sage:literal/></sage:view>"#,
        SAGE_NS_URI,
    ))?;

    assert_eq!(root.namespace(), Some(SAGE_NS_URI));
    assert!(root.is(SAGE_NS_URI, "view"));

    let child = root.child_elements().next().unwrap();
    assert!(child.is(SAGE_NS_URI, "literal"));

    Ok(())
}

#[test]
fn resolves_default_namespace() -> TestResult {
    let root = parse_document(
        r#"<view xmlns="urn:a"><inner/><other xmlns=""><bare/></other></view>"#,
    )?;

    assert_eq!(root.namespace(), Some("urn:a"));

    let inner = root.first_child(Some("urn:a"), "inner");
    assert!(inner.is_some());

    // `xmlns=""` un-binds the default namespace for the subtree.
    let other = root.first_child(None, "other").unwrap();
    assert!(other.first_child(None, "bare").is_some());

    Ok(())
}

#[test]
fn inner_declaration_shadows_outer() -> TestResult {
    let root = parse_document(
        r#"<a xmlns:p="urn:outer"><p:x/><b xmlns:p="urn:inner"><p:x/></b></a>"#,
    )?;

    let outer = root.first_child(Some("urn:outer"), "x");
    assert!(outer.is_some());

    let b = root.first_child(None, "b").unwrap();
    assert!(b.first_child(Some("urn:inner"), "x").is_some());

    Ok(())
}

#[test]
fn namespace_declarations_are_kept_as_attributes() -> TestResult {
    let root = parse_document(&format!(
        r#"<sage:view xmlns:sage="{}"/>"#,
        SAGE_NS_URI,
    ))?;

    assert_eq!(root.attr("xmlns:sage"), Some(SAGE_NS_URI));

    Ok(())
}

#[test]
fn unescapes_text_and_attributes() -> TestResult {
    let root = parse_document(r#"<a b="1 &lt; 2">&amp;&gt;</a>"#)?;

    assert_eq!(root.attr("b"), Some("1 < 2"));
    assert_eq!(root.text(), "&>");

    Ok(())
}

#[test]
fn preserves_comments_and_cdata() -> TestResult {
    let root = parse_document("<a><!--note--><![CDATA[<raw>]]></a>")?;

    assert_eq!(
        root.children(),
        &[
            Node::Comment("note".into()),
            Node::CData("<raw>".into()),
        ]
    );

    Ok(())
}

#[test]
fn skips_declaration_before_root() -> TestResult {
    let root =
        parse_document("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<a/>")?;

    assert_eq!(root.name().to_string(), "a");

    Ok(())
}

#[test]
fn unbound_prefix_fails() {
    assert_eq!(
        parse_document("<p:a/>"),
        Err(Error::UnboundPrefix("p".into())),
    );
}

#[test]
fn unclosed_element_fails() {
    assert_eq!(
        parse_document("<a><b></b>"),
        Err(Error::UnclosedElement("a".into())),
    );
}

#[test]
fn empty_input_fails() {
    assert_eq!(parse_document(""), Err(Error::NoRootElement));
}

#[test]
fn second_root_fails() {
    assert_eq!(parse_document("<a/><b/>"), Err(Error::MultipleRootElements));
}

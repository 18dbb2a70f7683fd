// Tests for view envelope assembly
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

use super::*;
use crate::resource::{Resource, ResourceType};
use crate::xml::reader::parse_document;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn context() -> Context {
    Context::new("home", "index", "/srv/app")
}

fn input_with(resources: Vec<Resource>) -> ViewInput {
    let model = parse_document("<page><content/></page>").unwrap();

    ViewInput::new(
        "index".to_string(),
        model,
        resources,
        Vec::new(),
        Vec::new(),
    )
}

fn build(
    input: &ViewInput,
    context: &Context,
    values: Vec<(String, ViewValue)>,
) -> Element {
    ViewEnvelope::new()
        .build(input, context, context.to_xml(), values)
        .unwrap()
}

#[test]
fn envelope_has_fixed_shape() {
    let context = context();
    let sut = build(&input_with(Vec::new()), &context, Vec::new());

    assert!(sut.is(SAGE_NS_URI, "view"));
    assert_eq!(sut.attr("controller"), Some("home"));
    assert_eq!(sut.attr("action"), Some("index"));

    assert!(sut.first_child(Some(SAGE_NS_URI), "request").is_some());

    let response = sut.first_child(Some(SAGE_NS_URI), "response").unwrap();

    let model = response.first_child(Some(SAGE_NS_URI), "model").unwrap();
    let page = model.first_child(None, "page").unwrap();
    assert!(page.first_child(None, "content").is_some());
}

#[test]
fn no_resources_no_container() {
    let context = context();
    let sut = build(&input_with(Vec::new()), &context, Vec::new());

    let response = sut.first_child(Some(SAGE_NS_URI), "response").unwrap();
    assert!(response.first_child(Some(SAGE_NS_URI), "resources").is_none());
}

#[test]
fn resources_grouped_into_buckets_in_declaration_order() {
    let context = context();

    let input = input_with(vec![
        Resource::new(ResourceType::Script, ResourceLocation::Head, "h1.js"),
        Resource::new(ResourceType::Script, ResourceLocation::Body, "b1.js"),
        Resource::new(ResourceType::Style, ResourceLocation::Head, "h2.css"),
    ]);

    let sut = build(&input, &context, Vec::new());
    let response = sut.first_child(Some(SAGE_NS_URI), "response").unwrap();
    let resources =
        response.first_child(Some(SAGE_NS_URI), "resources").unwrap();

    let head = resources.first_child(Some(SAGE_NS_URI), "head").unwrap();
    let head_refs: Vec<_> = head
        .child_elements()
        .map(|ele| {
            ele.attr("src").or_else(|| ele.attr("href")).unwrap_or("")
        })
        .collect();
    assert_eq!(head_refs, &["/srv/app/h1.js", "/srv/app/h2.css"]);

    let body = resources.first_child(Some(SAGE_NS_URI), "body").unwrap();
    assert_eq!(body.child_elements().count(), 1);
}

#[test]
fn empty_buckets_are_omitted() {
    let context = context();

    let input = input_with(vec![Resource::new(
        ResourceType::Script,
        ResourceLocation::Head,
        "h.js",
    )]);

    let sut = build(&input, &context, Vec::new());
    let response = sut.first_child(Some(SAGE_NS_URI), "response").unwrap();
    let resources =
        response.first_child(Some(SAGE_NS_URI), "resources").unwrap();

    assert!(resources.first_child(Some(SAGE_NS_URI), "head").is_some());
    assert!(resources.first_child(Some(SAGE_NS_URI), "body").is_none());
}

#[test]
fn resources_filtered_by_user_agent() {
    let context =
        Context::new("home", "index", "/srv/app").with_user_agent("moz5");

    let input = input_with(vec![
        Resource::new(ResourceType::Script, ResourceLocation::Head, "all.js"),
        Resource::new(ResourceType::Script, ResourceLocation::Head, "ie.js")
            .with_limit_to(&["ie"]),
    ]);

    let sut = build(&input, &context, Vec::new());
    let response = sut.first_child(Some(SAGE_NS_URI), "response").unwrap();
    let head = response
        .first_child(Some(SAGE_NS_URI), "resources")
        .and_then(|r| r.first_child(Some(SAGE_NS_URI), "head"))
        .unwrap();

    let srcs: Vec<_> = head
        .child_elements()
        .filter_map(|ele| ele.attr("src"))
        .collect();
    assert_eq!(srcs, &["/srv/app/all.js"]);
}

struct Declining;

impl XmlConvertible for Declining {
    fn to_xml(&self) -> Option<Element> {
        None
    }
}

struct Badge(&'static str);

impl XmlConvertible for Badge {
    fn to_xml(&self) -> Option<Element> {
        let mut ele = Element::new(QName::local("badge"), None);
        ele.set_attr(QName::local("label"), self.0);
        Some(ele)
    }
}

#[test]
fn view_data_values_rendered_by_kind() {
    let context = context();

    let node = Element::new(QName::local("raw"), None);

    let values = vec![
        ("raw".to_string(), ViewValue::Node(Node::Element(node))),
        (
            "badge".to_string(),
            ViewValue::Convertible(Box::new(Badge("ok"))),
        ),
        (
            "quiet".to_string(),
            ViewValue::Convertible(Box::new(Declining)),
        ),
        ("plain".to_string(), ViewValue::Text("42".to_string())),
    ];

    let sut = build(&input_with(Vec::new()), &context, values);
    let response = sut.first_child(Some(SAGE_NS_URI), "response").unwrap();

    assert!(response.first_child(None, "raw").is_some());

    let badge = response.first_child(None, "badge").unwrap();
    assert_eq!(badge.attr("label"), Some("ok"));

    let value = response.first_child(Some(SAGE_NS_URI), "value").unwrap();
    assert_eq!(value.attr("id"), Some("plain"));
    assert_eq!(value.text(), "42");

    // Model plus three contributions; the declining convertible
    //   contributed nothing at all.
    assert_eq!(response.children().len(), 4);
}

#[test]
fn filters_applied_in_registration_order() -> TestResult {
    let context = context();

    let mut sut = ViewEnvelope::new();
    sut.add_filter(Box::new(|mut doc| {
        doc.set_attr(QName::local("filtered"), "first");
        doc
    }));
    sut.add_filter(Box::new(|mut doc| {
        let previous = doc.attr("filtered").unwrap_or("").to_string();
        doc.set_attr(QName::local("filtered"), format!("{},second", previous));
        doc
    }));

    let envelope = sut.build(
        &input_with(Vec::new()),
        &context,
        context.to_xml(),
        Vec::new(),
    )?;

    assert_eq!(envelope.attr("filtered"), Some("first,second"));

    Ok(())
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Document construction and the ownership rules between entity kinds.

use protograph::SchemaError;
use protograph::syntax::{
    DocumentBuilder, EntityId, EntityKind, EnumConstant, EnumDecl, ExtensionsRange, Field,
    FileRoot, MapField, Message, OneOf, OptionDecl, ReservedRange, Rpc, Service, TagRange,
};
use rstest::rstest;

use crate::helpers::fixtures::*;

fn make_owner(builder: &mut DocumentBuilder, owner: &str) -> EntityId {
    let root = EntityId::ROOT;
    match owner {
        "document" => root,
        "message" => builder.add(root, Message::new("M")).unwrap(),
        "extend" => builder.add(root, Message::extend("other.M")).unwrap(),
        "enum" => builder.add(root, EnumDecl::new("E")).unwrap(),
        "enum constant" => {
            let e = builder.add(root, EnumDecl::new("E")).unwrap();
            builder.add(e, EnumConstant::new("A", 0)).unwrap()
        }
        "service" => builder.add(root, Service::new("S")).unwrap(),
        "rpc" => {
            let s = builder.add(root, Service::new("S")).unwrap();
            builder.add(s, Rpc::new("Call", "A", "B")).unwrap()
        }
        "field" | "map field" | "oneof" | "extensions" => {
            let m = builder.add(root, Message::new("M")).unwrap();
            builder.add(m, make_child(owner)).unwrap()
        }
        "option" => builder.add(root, OptionDecl::new("o", "1")).unwrap(),
        _ => panic!("unknown owner {owner}"),
    }
}

fn make_child(child: &str) -> EntityKind {
    match child {
        "option" => OptionDecl::new("deprecated", "true").into(),
        "enum constant" => EnumConstant::new("B", 1).into(),
        "enum" => EnumDecl::new("Nested").into(),
        "rpc" => Rpc::new("Get", "A", "B").into(),
        "service" => Service::new("Other").into(),
        "field" => Field::new("f", "string", 1).into(),
        "map field" => MapField::new("m", "string", "int32", 2).into(),
        "oneof" => OneOf::new("choice").into(),
        "extensions" => ExtensionsRange(TagRange::new(100, 199)).into(),
        "reserved range" => ReservedRange(TagRange::new(5, 9)).into(),
        "message" => Message::new("Inner").into(),
        "extend" => Message::extend("other.Target").into(),
        "document" => EntityKind::Document(FileRoot::default()),
        _ => panic!("unknown child {child}"),
    }
}

#[rstest]
#[case("document", "message", true)]
#[case("document", "extend", true)]
#[case("document", "enum", true)]
#[case("document", "service", true)]
#[case("document", "option", true)]
#[case("document", "field", false)]
#[case("document", "rpc", false)]
#[case("document", "document", false)]
#[case("message", "field", true)]
#[case("message", "map field", true)]
#[case("message", "oneof", true)]
#[case("message", "enum", true)]
#[case("message", "message", true)]
#[case("message", "extend", true)]
#[case("message", "extensions", true)]
#[case("message", "reserved range", true)]
#[case("message", "option", true)]
#[case("message", "service", false)]
#[case("message", "rpc", false)]
#[case("message", "enum constant", false)]
#[case("extend", "field", true)]
#[case("oneof", "field", true)]
#[case("oneof", "oneof", true)]
#[case("oneof", "option", true)]
#[case("oneof", "enum", false)]
#[case("enum", "enum constant", true)]
#[case("enum", "option", true)]
#[case("enum", "message", false)]
#[case("enum constant", "option", true)]
#[case("enum constant", "field", false)]
#[case("service", "rpc", true)]
#[case("service", "option", true)]
#[case("service", "field", false)]
#[case("rpc", "option", true)]
#[case("rpc", "rpc", false)]
#[case("field", "option", true)]
#[case("field", "field", false)]
#[case("map field", "option", true)]
#[case("extensions", "option", false)]
#[case("option", "option", false)]
fn test_ownership_rules(#[case] owner: &str, #[case] child: &str, #[case] accepted: bool) {
    let mut builder = DocumentBuilder::new();
    let owner_id = make_owner(&mut builder, owner);
    let result = builder.add(owner_id, make_child(child));

    if accepted {
        let id = result.unwrap();
        let doc = builder.build();
        assert_eq!(doc.parent(id), Some(owner_id));
    } else {
        assert!(
            matches!(result, Err(SchemaError::InvalidScope { .. })),
            "{child} under {owner} should be rejected"
        );
    }
}

#[test]
fn test_children_keep_insertion_order() {
    let doc = user_proto();
    let user = doc.messages()[0];
    let message = doc.kind(user).and_then(EntityKind::as_message).unwrap();

    let names: Vec<_> = message
        .fields()
        .iter()
        .filter_map(|&id| doc.name(id))
        .collect();
    assert_eq!(names, vec!["name", "address", "contact"]);
    assert_eq!(doc.first_tag(message.fields()[2]), Some(3));
}

#[test]
fn test_root_collections() {
    let doc = labels_proto();
    assert_eq!(doc.package(), "p_opts");
    assert_eq!(doc.syntax(), "proto2");
    assert_eq!(doc.messages().len(), 3);
    let extends = doc
        .messages()
        .iter()
        .filter(|&&id| doc.kind(id).is_some_and(EntityKind::is_extend))
        .count();
    assert_eq!(extends, 2);
    assert_eq!(doc.root().services().len(), 0);
}

#[test]
fn test_service_and_rpc_shape() {
    let doc = user_proto();
    let service_id = doc.root().services()[0];
    let service = doc.kind(service_id).and_then(EntityKind::as_service).unwrap();
    let rpc = match doc.kind(service.rpcs()[0]) {
        Some(EntityKind::Rpc(rpc)) => rpc,
        other => panic!("expected rpc, got {other:?}"),
    };
    assert_eq!(rpc.request_type, "google.protobuf.Empty");
    assert!(!rpc.streams_request && !rpc.streams_response);
}

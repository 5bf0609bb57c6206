#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Custom and built-in option resolution.

use protograph::OptionKind;
use protograph::syntax::EntityKind;
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::graph_helpers::*;

#[test]
fn test_custom_field_option() {
    let graph = standard_graph();
    let option = graph
        .get_option(OptionKind::Field, "p_opts.label")
        .unwrap()
        .expect("label is a field option");

    assert_eq!(option.option_name(), "p_opts.label");
    assert_eq!(option.kind(), OptionKind::Field);
    assert!(!option.is_builtin());
    assert_eq!(option.name(), "label");
    assert_eq!(
        option.source_option().full_name(),
        "google.protobuf.FieldOptions"
    );

    let ext = option.option().unwrap();
    assert!(ext.is_extend());
    assert_eq!(ext.file().unwrap().path(), LABELS_PATH);
    assert_eq!(ext.alias(), "p_opts");

    let field = option.field().unwrap();
    assert_eq!(field.name(), Some("label"));
    assert_eq!(option.field_rest(), "");
}

#[test]
fn test_custom_option_with_sub_field() {
    let graph = standard_graph();
    let option = graph
        .get_option(OptionKind::Message, "p_opts.rules.max")
        .unwrap()
        .unwrap();

    assert_eq!(option.field().unwrap().name(), Some("rules"));
    assert_eq!(option.field_rest(), "max");
    assert!(matches!(
        option.field().unwrap().entity().map(|e| e.kind()),
        Some(EntityKind::Field(_))
    ));
}

#[test]
fn test_option_of_other_kind_is_not_found() {
    let graph = standard_graph();
    assert!(
        graph
            .get_option(OptionKind::Message, "p_opts.label")
            .unwrap()
            .is_none()
    );
    assert!(
        graph
            .get_option(OptionKind::Field, "p_opts.unknown")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_package_only_name_matches_any_extension() {
    let graph = standard_graph();
    let option = graph
        .get_option(OptionKind::Field, "p_opts")
        .unwrap()
        .unwrap();
    assert!(!option.is_builtin());
    assert!(option.field().is_none());
    assert_eq!(option.name(), "");
}

#[rstest]
#[case(OptionKind::Field, "deprecated")]
#[case(OptionKind::Field, "packed")]
#[case(OptionKind::File, "java_package")]
#[case(OptionKind::Enum, "allow_alias")]
#[case(OptionKind::Method, "deprecated")]
fn test_builtin_options(#[case] kind: OptionKind, #[case] name: &str) {
    let graph = standard_graph();
    let option = graph.get_option(kind, name).unwrap().expect("built-in option");

    assert!(option.is_builtin());
    assert!(option.option().is_none());
    assert_eq!(option.field().unwrap().name(), Some(name));
    assert_eq!(option.field().unwrap().file().path(), DESCRIPTOR_PATH);
    assert_eq!(option.source_option().full_name(), kind.carrier_name());
}

#[test]
fn test_builtin_missing_on_carrier() {
    let graph = standard_graph();
    assert!(
        graph
            .get_option(OptionKind::Enum, "packed")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_without_carrier_nothing_resolves() {
    let graph = graph_of(vec![(EMPTY_PATH, empty_proto()), (USER_PATH, user_proto())]);
    assert!(
        graph
            .get_option(OptionKind::Field, "deprecated")
            .unwrap()
            .is_none()
    );
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Loading through include directories, providers and directory walks.

use protograph::project::SourceFile;
use protograph::syntax::{DocumentBuilder, ImportKind};
use protograph::{DependencyGraph, FileDepType, SchemaError};
use tempfile::TempDir;

use crate::helpers::graph_helpers::*;

fn parsing_graph() -> DependencyGraph {
    DependencyGraph::new().with_parser(line_parser)
}

// =============================================================================
// INCLUDE DIRECTORIES
// =============================================================================

#[test]
fn test_first_include_dir_wins() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_tree(first.path(), &[("a/b.proto", "package first\nmessage One\n")]);
    write_tree(second.path(), &[("a/b.proto", "package second\nmessage Two\n")]);

    let mut graph = parsing_graph();
    graph.add_include_dir(first.path()).unwrap();
    graph.add_include_dir(second.path()).unwrap();
    graph
        .add_file("main.proto", "package main\nimport a/b.proto\n", FileDepType::Own)
        .unwrap();

    let imported = graph.get_file("a/b.proto").unwrap();
    assert_eq!(imported.original_alias(), "first");
    assert_eq!(imported.dep_type(), FileDepType::Imported);
    assert!(graph.get_type("first.One").unwrap().is_some());
    assert!(graph.get_type("second.Two").unwrap().is_none());
    assert_eq!(graph.include_dirs().len(), 2);
}

#[test]
fn test_imports_load_transitively() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_tree(
        first.path(),
        &[("a/b.proto", "package mid\nimport c/d.proto\nmessage Mid\n")],
    );
    write_tree(second.path(), &[("c/d.proto", "package leaf\nmessage Leaf\n")]);

    let mut graph = parsing_graph();
    graph.add_include_dir(first.path()).unwrap();
    graph.add_include_dir(second.path()).unwrap();
    graph
        .add_file("main.proto", "package main\nimport a/b.proto\n", FileDepType::Own)
        .unwrap();

    assert_eq!(graph.len(), 3);
    assert!(graph.get_type("leaf.Leaf").unwrap().is_some());
}

#[test]
fn test_import_cycle_terminates() {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("x.proto", "package x\nimport y.proto\nmessage X\n"),
            ("y.proto", "package y\nimport x.proto\nmessage Y\n"),
        ],
    );

    let mut graph = parsing_graph();
    graph.add_include_dir(dir.path()).unwrap();
    graph
        .add_file("x.proto", "package x\nimport y.proto\nmessage X\n", FileDepType::Own)
        .unwrap();

    assert_eq!(graph.len(), 2);
    let y = graph.get_file("y.proto").unwrap();
    assert!(y.get_type(&graph, "x.X").unwrap().is_some());
}

#[test]
fn test_missing_import_is_not_found() {
    let dir = TempDir::new().unwrap();
    let mut graph = parsing_graph();
    graph.add_include_dir(dir.path()).unwrap();

    let err = graph
        .add_file("main.proto", "package main\nimport gone.proto\n", FileDepType::Own)
        .unwrap_err();
    assert!(matches!(err, SchemaError::NotFound(ref path) if path == "gone.proto"));
    assert!(graph.get_file("main.proto").is_none());
}

#[test]
fn test_tolerant_mode_stubs_missing_import() {
    let mut graph = parsing_graph();
    graph.set_ignore_not_found(true);
    graph
        .add_file(
            "main.proto",
            "package main\nimport gone.proto\nmessage Main\n",
            FileDepType::Own,
        )
        .unwrap();

    assert!(graph.get_file("gone.proto").unwrap().is_stub());
    assert!(graph.get_type("main.Main").unwrap().is_some());
    assert!(graph.ignore_not_found());
}

#[test]
fn test_include_dir_must_be_directory() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path(), &[("file.proto", "")]);
    let mut graph = DependencyGraph::new();

    assert!(matches!(
        graph.add_include_dir(dir.path().join("file.proto")),
        Err(SchemaError::NotADirectory(_))
    ));
    assert!(matches!(
        graph.add_include_dir(dir.path().join("nope")),
        Err(SchemaError::InvalidIncludeDir { .. })
    ));
    assert!(graph.include_dirs().is_empty());
}

#[test]
fn test_include_dir_needs_parser() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path(), &[("dep.proto", "package dep\n")]);
    let mut graph = DependencyGraph::new();
    graph.add_include_dir(dir.path()).unwrap();

    let mut builder = DocumentBuilder::new();
    builder.add_import(ImportKind::Weak, "dep.proto");
    let err = graph
        .add_document("main.proto", builder.build(), FileDepType::Own)
        .unwrap_err();
    assert!(matches!(err, SchemaError::MissingParser(_)));
}

// =============================================================================
// PARSER AND PROVIDERS
// =============================================================================

#[test]
fn test_parse_failure_is_wrapped() {
    let mut graph = parsing_graph();
    let err = graph
        .add_file("bad.proto", "this is not a schema", FileDepType::Own)
        .unwrap_err();
    match err {
        SchemaError::Parse { path, .. } => assert_eq!(path, "bad.proto"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_add_provider_from_iterator() {
    let files = vec![
        SourceFile::new("a.proto", "package a\nmessage A\n", FileDepType::Own),
        SourceFile::new("b.proto", "package b\nimport a.proto\nmessage B\n", FileDepType::Own),
    ];
    let mut graph = parsing_graph();
    let added = graph.add_provider(files.into_iter()).unwrap();

    assert_eq!(added, 2);
    let b = graph.get_file("b.proto").unwrap();
    assert_eq!(b.get_type(&graph, "a.A").unwrap().unwrap().alias(), "a");
}

#[test]
fn test_add_path_names_files_relative_to_dir() {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("common/base.proto", "package common\nmessage Base\n"),
            ("svc/api.proto", "package svc\nimport common/base.proto\nmessage Api\n"),
            ("README.md", "not a schema"),
        ],
    );

    let mut graph = parsing_graph();
    let added = graph.add_path(dir.path(), FileDepType::Own).unwrap();

    assert_eq!(added, 2);
    assert!(graph.get_file("common/base.proto").is_some());
    assert!(graph.get_file("svc/api.proto").is_some());
    assert!(graph.get_type("svc.Api").unwrap().is_some());
}

#[test]
fn test_add_path_with_root() {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("common/base.proto", "package common\nmessage Base\n"),
            ("svc/api.proto", "package svc\nmessage Api\n"),
        ],
    );

    let mut graph = parsing_graph();
    let added = graph
        .add_path_with_root(dir.path(), &dir.path().join("svc"), FileDepType::Imported)
        .unwrap();

    assert_eq!(added, 1);
    let api = graph.get_file("svc/api.proto").unwrap();
    assert_eq!(api.dep_type(), FileDepType::Imported);
    assert!(graph.get_file("common/base.proto").is_none());
}

//! Graph construction helpers and a toy line-based schema parser.

use std::path::Path;

use protograph::project::ParseFailure;
use protograph::syntax::{Document, DocumentBuilder, EntityId, Field, ImportKind, Message};
use protograph::{DependencyGraph, FileDepType};

use super::fixtures::*;

/// A graph holding every given file as `Own`.
pub fn graph_of(files: Vec<(&str, Document)>) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for (path, doc) in files {
        graph
            .add_document(path, doc, FileDepType::Own)
            .unwrap_or_else(|e| panic!("failed to add {path}: {e}"));
    }
    graph
}

/// The user, empty, mail, descriptor and labels fixtures.
pub fn standard_graph() -> DependencyGraph {
    graph_of(vec![
        (EMPTY_PATH, empty_proto()),
        (DESCRIPTOR_PATH, descriptor_proto()),
        (USER_PATH, user_proto()),
        (MAIL_PATH, mail_proto()),
        (LABELS_PATH, labels_proto()),
    ])
}

/// Parses a minimal line format:
///
/// ```text
/// package a.b
/// import x/y.proto
/// import public x/z.proto
/// message Name
/// extend Target
/// field name type tag      (into the last message or extend)
/// ```
pub fn line_parser(path: &str, text: &str) -> Result<Document, ParseFailure> {
    let mut builder = DocumentBuilder::new();
    let mut current: Option<EntityId> = None;
    for (line_no, line) in text.lines().enumerate() {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["package", name] => {
                builder.set_package(*name);
            }
            ["import", import] => {
                builder.add_import(ImportKind::Plain, *import);
            }
            ["import", "public", import] => {
                builder.add_import(ImportKind::Public, *import);
            }
            ["message", name] => {
                current = Some(builder.add(EntityId::ROOT, Message::new(*name))?);
            }
            ["extend", target] => {
                current = Some(builder.add(EntityId::ROOT, Message::extend(*target))?);
            }
            ["field", name, type_name, tag] => {
                let owner = current.ok_or_else(|| format!("{path}:{line_no}: field outside message"))?;
                builder.add(owner, Field::new(*name, *type_name, tag.parse()?))?;
            }
            _ => return Err(format!("{path}:{line_no}: cannot parse '{line}'").into()),
        }
    }
    Ok(builder.build())
}

/// Writes `files` below `root`, creating directories as needed.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, text) in files {
        let full = root.join(relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, text).unwrap();
    }
}

//! Name search inside one document.
//!
//! Lookups split a dotted name on its first segment and descend: items that
//! cannot nest (enums, services, fields) match only the last segment, messages
//! recurse into the remainder. Oneof members belong to the enclosing message's
//! scope and are also reachable through the oneof's own name.

use crate::base::name_split;
use crate::syntax::{Document, EntityId, EntityKind, Message};

/// Dot-joined names along the owner chain, root excluded.
pub fn scoped_name(doc: &Document, id: EntityId) -> String {
    let mut segments: Vec<&str> = doc.ancestors(id).filter_map(|a| doc.name(a)).collect();
    segments.reverse();
    segments.extend(doc.name(id));
    segments.join(".")
}

/// Every entity `name` denotes inside `doc`, relative to the document root.
///
/// Top-level `extend` blocks match only when their declared target equals the
/// whole of `name`.
pub fn find_name(doc: &Document, name: &str) -> Vec<EntityId> {
    let mut found: Vec<EntityId> = doc
        .messages()
        .iter()
        .copied()
        .filter(|&id| {
            doc.kind(id)
                .and_then(EntityKind::as_message)
                .is_some_and(|m| m.is_extend && m.name == name)
        })
        .collect();
    found.extend(find_declared_name(doc, name));
    found
}

/// Like [`find_name`], ignoring `extend` blocks.
pub fn find_declared_name(doc: &Document, name: &str) -> Vec<EntityId> {
    let mut found = Vec::new();
    if name.is_empty() {
        return found;
    }
    let root = doc.root();
    let members = root
        .enums()
        .iter()
        .chain(root.services())
        .chain(root.messages())
        .copied();
    search(doc, members, name, &mut found);
    found
}

/// Matches the first segment of `name` against the fields of `owner`.
///
/// Returns the field and whatever follows the first segment.
pub fn find_partial_name<'n>(
    doc: &Document,
    owner: EntityId,
    name: &'n str,
) -> Option<(EntityId, &'n str)> {
    let message = doc.kind(owner)?.as_message()?;
    let (first, rest) = name_split(name);
    let mut fields = Vec::new();
    flatten_fields(doc, message.fields(), &mut fields);
    fields
        .into_iter()
        .find(|&id| {
            doc.kind(id)
                .and_then(EntityKind::as_field_like)
                .is_some_and(|f| f.field_name() == first)
        })
        .map(|id| (id, rest))
}

/// Message members searchable by name, oneof members included.
fn message_members(doc: &Document, message: &Message) -> Vec<EntityId> {
    let mut members = Vec::new();
    flatten_fields(doc, message.fields(), &mut members);
    members.extend_from_slice(message.enums());
    members.extend_from_slice(message.messages());
    members
}

fn flatten_fields(doc: &Document, fields: &[EntityId], out: &mut Vec<EntityId>) {
    for &id in fields {
        out.push(id);
        if let Some(EntityKind::OneOf(oneof)) = doc.kind(id) {
            flatten_fields(doc, oneof.fields(), out);
        }
    }
}

fn search(
    doc: &Document,
    members: impl Iterator<Item = EntityId>,
    name: &str,
    found: &mut Vec<EntityId>,
) {
    let (first, rest) = name_split(name);
    for id in members {
        let Some(kind) = doc.kind(id) else {
            continue;
        };
        match kind {
            EntityKind::Message(m) if m.is_extend => {}
            EntityKind::Message(m) if m.name == first => {
                if rest.is_empty() {
                    found.push(id);
                } else {
                    search(doc, message_members(doc, m).into_iter(), rest, found);
                }
            }
            EntityKind::OneOf(oneof) if !rest.is_empty() && oneof.name == first => {
                let mut members = Vec::new();
                flatten_fields(doc, oneof.fields(), &mut members);
                search(doc, members.into_iter(), rest, found);
            }
            other if rest.is_empty() && other.name() == Some(first) => found.push(id),
            _ => {}
        }
    }
}

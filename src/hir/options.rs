//! Custom option resolution.
//!
//! A custom option `(pkg.name)` is a field of an `extend` block on one of the
//! well-known option carriers. Names that match no extension can still be
//! built-in options: plain fields of the carrier itself.

use std::fmt;

use tracing::{debug, trace};

use crate::base::join_name;
use crate::base::constants::WELL_KNOWN_PACKAGE;
use crate::error::{SchemaError, SchemaResult};
use crate::syntax::{Document, Entity, EntityId, EntityKind};

use super::graph::{DependencyGraph, FileDep};
use super::resolve::DepType;
use super::scope::find_partial_name;

/// Which declaration an option is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    File,
    Message,
    Field,
    Enum,
    EnumValue,
    Service,
    Method,
}

impl OptionKind {
    pub const ALL: [OptionKind; 7] = [
        OptionKind::File,
        OptionKind::Message,
        OptionKind::Field,
        OptionKind::Enum,
        OptionKind::EnumValue,
        OptionKind::Service,
        OptionKind::Method,
    ];

    /// Local name of the carrier message.
    pub fn carrier_message(self) -> &'static str {
        match self {
            OptionKind::File => "FileOptions",
            OptionKind::Message => "MessageOptions",
            OptionKind::Field => "FieldOptions",
            OptionKind::Enum => "EnumOptions",
            OptionKind::EnumValue => "EnumValueOptions",
            OptionKind::Service => "ServiceOptions",
            OptionKind::Method => "MethodOptions",
        }
    }

    /// Fully-qualified carrier name, e.g. `google.protobuf.FieldOptions`.
    pub fn carrier_name(self) -> String {
        join_name(WELL_KNOWN_PACKAGE, self.carrier_message())
    }

    /// The option kind for options declared directly on `kind`.
    pub fn for_entity(kind: &EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Document(_) => Some(OptionKind::File),
            EntityKind::Message(m) if !m.is_extend => Some(OptionKind::Message),
            EntityKind::Field(_) | EntityKind::MapField(_) | EntityKind::OneOf(_) => {
                Some(OptionKind::Field)
            }
            EntityKind::Enum(_) => Some(OptionKind::Enum),
            EntityKind::EnumConstant(_) => Some(OptionKind::EnumValue),
            EntityKind::Service(_) => Some(OptionKind::Service),
            EntityKind::Rpc(_) => Some(OptionKind::Method),
            _ => None,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.carrier_message())
    }
}

/// An entity inside a loaded file.
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'a> {
    file: &'a FileDep,
    id: EntityId,
}

impl<'a> EntityRef<'a> {
    pub fn file(&self) -> &'a FileDep {
        self.file
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn entity(&self) -> Option<&'a Entity> {
        self.file.document().and_then(|doc| doc.get(self.id))
    }

    pub fn name(&self) -> Option<&'a str> {
        self.entity().and_then(Entity::name)
    }
}

/// A resolved option name.
#[derive(Debug, Clone)]
pub struct OptionType<'a> {
    option_name: String,
    kind: OptionKind,
    source_option: DepType<'a>,
    option: Option<DepType<'a>>,
    name: String,
    field: Option<EntityRef<'a>>,
    field_rest: String,
}

impl<'a> OptionType<'a> {
    /// The option name as queried.
    pub fn option_name(&self) -> &str {
        &self.option_name
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// The carrier message.
    pub fn source_option(&self) -> &DepType<'a> {
        &self.source_option
    }

    /// The `extend` block declaring the option. `None` for built-in options.
    pub fn option(&self) -> Option<&DepType<'a>> {
        self.option.as_ref()
    }

    /// The queried name past its package.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field the first segment of [`OptionType::name`] matched.
    pub fn field(&self) -> Option<EntityRef<'a>> {
        self.field
    }

    /// Segments after the matched field, e.g. a sub-field path.
    pub fn field_rest(&self) -> &str {
        &self.field_rest
    }

    pub fn is_builtin(&self) -> bool {
        self.option.is_none()
    }
}

impl DependencyGraph {
    /// Resolves an option name of the given kind.
    ///
    /// Custom options are searched in every file whose package prefixes
    /// `name`; built-in carrier fields are the fallback. `Ok(None)` when the
    /// carrier itself is not loaded or nothing matches.
    pub fn get_option(&self, kind: OptionKind, name: &str) -> SchemaResult<Option<OptionType<'_>>> {
        let carrier_name = kind.carrier_name();
        let mut carriers: Vec<DepType<'_>> = self
            .get_types(&carrier_name)
            .into_iter()
            .filter(DepType::is_message)
            .collect();
        let carrier = match carriers.len() {
            0 => {
                debug!("Option carrier {carrier_name} is not loaded, cannot resolve {name}");
                return Ok(None);
            }
            1 => carriers.remove(0),
            n => return Err(SchemaError::ambiguous(carrier_name, n)),
        };
        let carrier_full = carrier.full_name();

        let mut found = Vec::new();
        for of_name in self.get_files_of_name(name) {
            let Some(doc) = of_name.file.document() else {
                continue;
            };
            for (id, target) in of_name.file.extensions() {
                if target != carrier_full || doc.parent(id) != Some(EntityId::ROOT) {
                    continue;
                }
                let matched = if of_name.rest.is_empty() {
                    Some((None, ""))
                } else {
                    find_partial_name(doc, id, &of_name.rest)
                        .map(|(field, rest)| (Some(field), rest))
                };
                let Some((field, field_rest)) = matched else {
                    continue;
                };
                found.push(OptionType {
                    option_name: name.to_string(),
                    kind,
                    source_option: carrier.clone(),
                    option: Some(DepType::from_entity(self, of_name.file, &of_name.package, id)),
                    name: of_name.rest.clone(),
                    field: field.map(|id| EntityRef {
                        file: of_name.file,
                        id,
                    }),
                    field_rest: field_rest.to_string(),
                });
            }
        }

        match found.len() {
            0 => {}
            1 => return Ok(found.pop()),
            n => return Err(SchemaError::ambiguous(name, n)),
        }

        trace!("No extension declares {name}, trying {carrier_full} fields");
        Ok(builtin_option(&carrier, kind, name))
    }
}

fn builtin_option<'a>(carrier: &DepType<'a>, kind: OptionKind, name: &str) -> Option<OptionType<'a>> {
    let file = carrier.file()?;
    let doc: &Document = file.document()?;
    let (field, rest) = find_partial_name(doc, carrier.entity_id()?, name)?;
    Some(OptionType {
        option_name: name.to_string(),
        kind,
        source_option: carrier.clone(),
        option: None,
        name: name.to_string(),
        field: Some(EntityRef { file, id: field }),
        field_rest: rest.to_string(),
    })
}

//! Schema data model: scalar types, entity payloads and the per-file arena.
//!
//! Text parsing happens elsewhere; this module only holds the tree a parser
//! produces.

mod document;
mod entity;
pub mod scalar;

pub use document::{Document, DocumentBuilder, Entity};
pub use entity::{
    Comment, EntityId, EntityKind, EnumConstant, EnumDecl, ExtensionsRange, Field, FieldLike,
    FileRoot, ImportKind, MapField, Message, OneOf, OptionDecl, ReservedRange, Rpc, Service,
    TagRange,
};
pub use scalar::ScalarType;

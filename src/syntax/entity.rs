//! Schema entity payloads.
//!
//! Every declaration of a schema file is one [`EntityKind`] variant stored in a
//! [`Document`](super::Document) arena. Payloads never own their children directly;
//! they hold ordered [`EntityId`] lists into the same arena.

use smol_str::SmolStr;

/// Stable index of an entity inside its document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// The document root, always the first entity of an arena.
    pub const ROOT: EntityId = EntityId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A block of documentation text attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// How a document imports another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import "a.proto";`
    Plain,
    /// `import public "a.proto";` - re-exported to importers of this document
    Public,
    /// `import weak "a.proto";`
    Weak,
}

// ============================================================================
// PAYLOADS
// ============================================================================

/// `option name = value;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: SmolStr,
    pub value: String,
    /// Custom options are written `(my.option)`; the name is stored without parentheses.
    pub parenthesized: bool,
}

impl OptionDecl {
    pub fn new(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            parenthesized: false,
        }
    }

    pub fn custom(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            parenthesized: true,
            ..Self::new(name, value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: SmolStr,
    pub tag: i32,
    pub(crate) options: Vec<EntityId>,
}

impl EnumConstant {
    pub fn new(name: impl Into<SmolStr>, tag: i32) -> Self {
        Self {
            name: name.into(),
            tag,
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: SmolStr,
    pub(crate) options: Vec<EntityId>,
    pub(crate) constants: Vec<EntityId>,
}

impl EnumDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            constants: Vec::new(),
        }
    }

    pub fn constants(&self) -> &[EntityId] {
        &self.constants
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rpc {
    pub name: SmolStr,
    pub request_type: String,
    pub streams_request: bool,
    pub response_type: String,
    pub streams_response: bool,
    pub(crate) options: Vec<EntityId>,
}

impl Rpc {
    pub fn new(
        name: impl Into<SmolStr>,
        request_type: impl Into<String>,
        response_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            request_type: request_type.into(),
            streams_request: false,
            response_type: response_type.into(),
            streams_response: false,
            options: Vec::new(),
        }
    }

    pub fn streaming(mut self, request: bool, response: bool) -> Self {
        self.streams_request = request;
        self.streams_response = response;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: SmolStr,
    pub(crate) options: Vec<EntityId>,
    pub(crate) rpcs: Vec<EntityId>,
}

impl Service {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            rpcs: Vec::new(),
        }
    }

    pub fn rpcs(&self) -> &[EntityId] {
        &self.rpcs
    }
}

/// A message field, a oneof member, or a field of an `extend` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: SmolStr,
    pub type_name: String,
    pub tag: i32,
    pub repeated: bool,
    pub optional: bool,
    pub required: bool,
    pub(crate) options: Vec<EntityId>,
}

impl Field {
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<String>, tag: i32) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            tag,
            repeated: false,
            optional: false,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// `map<key_type, value_type> name = tag;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapField {
    pub name: SmolStr,
    pub key_type: String,
    pub value_type: String,
    pub tag: i32,
    pub(crate) options: Vec<EntityId>,
}

impl MapField {
    pub fn new(
        name: impl Into<SmolStr>,
        key_type: impl Into<String>,
        value_type: impl Into<String>,
        tag: i32,
    ) -> Self {
        Self {
            name: name.into(),
            key_type: key_type.into(),
            value_type: value_type.into(),
            tag,
            options: Vec::new(),
        }
    }
}

/// A group of fields sharing one slot. Members are field-likes, so oneofs may nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    pub name: SmolStr,
    pub(crate) options: Vec<EntityId>,
    pub(crate) fields: Vec<EntityId>,
}

impl OneOf {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[EntityId] {
        &self.fields
    }
}

/// A numeric tag range, `start to end` or `start to max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRange {
    pub start: i32,
    pub end: i32,
    pub is_max: bool,
}

impl TagRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self {
            start,
            end,
            is_max: false,
        }
    }

    pub fn to_max(start: i32) -> Self {
        Self {
            start,
            end: start,
            is_max: true,
        }
    }

    pub fn contains(&self, tag: i32) -> bool {
        tag >= self.start && (self.is_max || tag <= self.end)
    }
}

/// `extensions 100 to 199;` - tags reserved for `extend` blocks of other files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionsRange(pub TagRange);

/// `reserved 5 to 9;`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRange(pub TagRange);

/// A message declaration or an `extend` block.
///
/// The name of an `extend` block is the dotted path of the extended type as written,
/// not a local identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: SmolStr,
    pub is_extend: bool,
    pub(crate) options: Vec<EntityId>,
    pub(crate) fields: Vec<EntityId>,
    pub(crate) enums: Vec<EntityId>,
    pub(crate) messages: Vec<EntityId>,
    pub(crate) extensions: Vec<EntityId>,
    pub(crate) reserved_ranges: Vec<EntityId>,
    pub(crate) reserved_names: Vec<SmolStr>,
}

impl Message {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            is_extend: false,
            options: Vec::new(),
            fields: Vec::new(),
            enums: Vec::new(),
            messages: Vec::new(),
            extensions: Vec::new(),
            reserved_ranges: Vec::new(),
            reserved_names: Vec::new(),
        }
    }

    /// An `extend <target> { ... }` block.
    pub fn extend(target: impl Into<SmolStr>) -> Self {
        Self {
            is_extend: true,
            ..Self::new(target)
        }
    }

    pub fn fields(&self) -> &[EntityId] {
        &self.fields
    }

    pub fn enums(&self) -> &[EntityId] {
        &self.enums
    }

    /// Nested messages, `extend` blocks included.
    pub fn messages(&self) -> &[EntityId] {
        &self.messages
    }

    pub fn extensions(&self) -> &[EntityId] {
        &self.extensions
    }

    pub fn reserved_ranges(&self) -> &[EntityId] {
        &self.reserved_ranges
    }

    pub fn reserved_names(&self) -> &[SmolStr] {
        &self.reserved_names
    }
}

/// Root payload of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRoot {
    pub package: String,
    pub syntax: String,
    pub(crate) dependencies: Vec<String>,
    pub(crate) public_dependencies: Vec<String>,
    pub(crate) weak_dependencies: Vec<String>,
    pub(crate) options: Vec<EntityId>,
    pub(crate) enums: Vec<EntityId>,
    pub(crate) messages: Vec<EntityId>,
    pub(crate) services: Vec<EntityId>,
}

impl FileRoot {
    /// Imports of one kind, in declaration order.
    pub fn imports(&self, kind: ImportKind) -> &[String] {
        match kind {
            ImportKind::Plain => &self.dependencies,
            ImportKind::Public => &self.public_dependencies,
            ImportKind::Weak => &self.weak_dependencies,
        }
    }

    pub fn enums(&self) -> &[EntityId] {
        &self.enums
    }

    /// Top-level messages, `extend` blocks included.
    pub fn messages(&self) -> &[EntityId] {
        &self.messages
    }

    pub fn services(&self) -> &[EntityId] {
        &self.services
    }
}

// ============================================================================
// ENTITY KIND
// ============================================================================

/// The closed set of schema entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Option(OptionDecl),
    EnumConstant(EnumConstant),
    Enum(EnumDecl),
    Rpc(Rpc),
    Service(Service),
    Field(Field),
    MapField(MapField),
    OneOf(OneOf),
    Extensions(ExtensionsRange),
    ReservedRange(ReservedRange),
    Message(Message),
    Document(FileRoot),
}

/// Borrowed view of the field-like variants.
#[derive(Debug, Clone, Copy)]
pub enum FieldLike<'a> {
    Field(&'a Field),
    MapField(&'a MapField),
    OneOf(&'a OneOf),
}

impl<'a> FieldLike<'a> {
    pub fn field_name(&self) -> &'a str {
        match *self {
            FieldLike::Field(f) => f.name.as_str(),
            FieldLike::MapField(f) => f.name.as_str(),
            FieldLike::OneOf(f) => f.name.as_str(),
        }
    }

    /// The tag declared directly on this item. A oneof has none of its own.
    pub fn own_tag(&self) -> Option<i32> {
        match self {
            FieldLike::Field(f) => Some(f.tag),
            FieldLike::MapField(f) => Some(f.tag),
            FieldLike::OneOf(_) => None,
        }
    }
}

impl EntityKind {
    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Option(_) => "option",
            EntityKind::EnumConstant(_) => "enum constant",
            EntityKind::Enum(_) => "enum",
            EntityKind::Rpc(_) => "rpc",
            EntityKind::Service(_) => "service",
            EntityKind::Field(_) => "field",
            EntityKind::MapField(_) => "map field",
            EntityKind::OneOf(_) => "oneof",
            EntityKind::Extensions(_) => "extensions",
            EntityKind::ReservedRange(_) => "reserved range",
            EntityKind::Message(m) if m.is_extend => "extend",
            EntityKind::Message(_) => "message",
            EntityKind::Document(_) => "document",
        }
    }

    /// The local name. Ranges and the document root have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            EntityKind::Option(e) => Some(e.name.as_str()),
            EntityKind::EnumConstant(e) => Some(e.name.as_str()),
            EntityKind::Enum(e) => Some(e.name.as_str()),
            EntityKind::Rpc(e) => Some(e.name.as_str()),
            EntityKind::Service(e) => Some(e.name.as_str()),
            EntityKind::Field(e) => Some(e.name.as_str()),
            EntityKind::MapField(e) => Some(e.name.as_str()),
            EntityKind::OneOf(e) => Some(e.name.as_str()),
            EntityKind::Message(e) => Some(e.name.as_str()),
            EntityKind::Extensions(_) | EntityKind::ReservedRange(_) | EntityKind::Document(_) => {
                None
            }
        }
    }

    pub fn as_field_like(&self) -> Option<FieldLike<'_>> {
        match self {
            EntityKind::Field(f) => Some(FieldLike::Field(f)),
            EntityKind::MapField(f) => Some(FieldLike::MapField(f)),
            EntityKind::OneOf(f) => Some(FieldLike::OneOf(f)),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            EntityKind::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDecl> {
        match self {
            EntityKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&Service> {
        match self {
            EntityKind::Service(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_option(&self) -> Option<&OptionDecl> {
        match self {
            EntityKind::Option(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_extend(&self) -> bool {
        matches!(self, EntityKind::Message(m) if m.is_extend)
    }

    /// Options attached to this entity, empty for kinds that carry none.
    pub fn options(&self) -> &[EntityId] {
        match self {
            EntityKind::EnumConstant(e) => &e.options,
            EntityKind::Enum(e) => &e.options,
            EntityKind::Rpc(e) => &e.options,
            EntityKind::Service(e) => &e.options,
            EntityKind::Field(e) => &e.options,
            EntityKind::MapField(e) => &e.options,
            EntityKind::OneOf(e) => &e.options,
            EntityKind::Message(e) => &e.options,
            EntityKind::Document(e) => &e.options,
            EntityKind::Option(_) | EntityKind::Extensions(_) | EntityKind::ReservedRange(_) => {
                &[]
            }
        }
    }

    /// The child list `child` belongs in, or `None` when this kind cannot own it.
    pub(crate) fn child_list(&mut self, child: &EntityKind) -> Option<&mut Vec<EntityId>> {
        use EntityKind as K;
        match (self, child) {
            (K::EnumConstant(e), K::Option(_)) => Some(&mut e.options),
            (K::Enum(e), K::Option(_)) => Some(&mut e.options),
            (K::Enum(e), K::EnumConstant(_)) => Some(&mut e.constants),
            (K::Rpc(e), K::Option(_)) => Some(&mut e.options),
            (K::Service(e), K::Option(_)) => Some(&mut e.options),
            (K::Service(e), K::Rpc(_)) => Some(&mut e.rpcs),
            (K::Field(e), K::Option(_)) => Some(&mut e.options),
            (K::MapField(e), K::Option(_)) => Some(&mut e.options),
            (K::OneOf(e), K::Option(_)) => Some(&mut e.options),
            (K::OneOf(e), K::Field(_) | K::MapField(_) | K::OneOf(_)) => Some(&mut e.fields),
            (K::Message(e), K::Option(_)) => Some(&mut e.options),
            (K::Message(e), K::Field(_) | K::MapField(_) | K::OneOf(_)) => Some(&mut e.fields),
            (K::Message(e), K::Enum(_)) => Some(&mut e.enums),
            (K::Message(e), K::Message(_)) => Some(&mut e.messages),
            (K::Message(e), K::Extensions(_)) => Some(&mut e.extensions),
            (K::Message(e), K::ReservedRange(_)) => Some(&mut e.reserved_ranges),
            (K::Document(e), K::Option(_)) => Some(&mut e.options),
            (K::Document(e), K::Enum(_)) => Some(&mut e.enums),
            (K::Document(e), K::Message(_)) => Some(&mut e.messages),
            (K::Document(e), K::Service(_)) => Some(&mut e.services),
            _ => None,
        }
    }
}

macro_rules! impl_from_payload {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for EntityKind {
                fn from(payload: $payload) -> Self {
                    EntityKind::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload! {
    OptionDecl => Option,
    EnumConstant => EnumConstant,
    EnumDecl => Enum,
    Rpc => Rpc,
    Service => Service,
    Field => Field,
    MapField => MapField,
    OneOf => OneOf,
    ExtensionsRange => Extensions,
    ReservedRange => ReservedRange,
    Message => Message,
}

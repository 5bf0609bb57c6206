//! Per-file entity arena.
//!
//! A [`Document`] owns every entity parsed from one schema file. Entities are
//! addressed by [`EntityId`]; index 0 is always the [`FileRoot`]. Upward walks
//! follow the `parent` link, downward walks follow the id lists in each payload.

use smol_str::SmolStr;

use crate::error::{SchemaError, SchemaResult};

use super::entity::{Comment, EntityId, EntityKind, FileRoot, ImportKind};

/// One arena slot: a payload plus its owner link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    parent: Option<EntityId>,
    documentation: Option<Comment>,
    kind: EntityKind,
}

impl Entity {
    /// The lexical owner. `None` only for the document root.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn documentation(&self) -> Option<&Comment> {
        self.documentation.as_ref()
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.kind.name()
    }
}

/// A parsed schema file. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    entities: Vec<Entity>,
}

impl Document {
    /// The root payload.
    pub fn root(&self) -> &FileRoot {
        match &self.entities[EntityId::ROOT.index()].kind {
            EntityKind::Document(root) => root,
            _ => unreachable!("document arena always starts with its root"),
        }
    }

    pub fn package(&self) -> &str {
        &self.root().package
    }

    pub fn syntax(&self) -> &str {
        &self.root().syntax
    }

    pub fn imports(&self, kind: ImportKind) -> &[String] {
        self.root().imports(kind)
    }

    /// Every import with its kind: plain, then public, then weak.
    pub fn all_imports(&self) -> impl Iterator<Item = (ImportKind, &str)> {
        [ImportKind::Plain, ImportKind::Public, ImportKind::Weak]
            .into_iter()
            .flat_map(move |kind| self.imports(kind).iter().map(move |p| (kind, p.as_str())))
    }

    /// Top-level messages, `extend` blocks included.
    pub fn messages(&self) -> &[EntityId] {
        self.root().messages()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn kind(&self, id: EntityId) -> Option<&EntityKind> {
        self.get(id).map(Entity::kind)
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.get(id).and_then(Entity::name)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(Entity::parent)
    }

    /// Owners of `id` from the nearest outwards, ending at the root.
    pub fn ancestors(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Smallest tag declared by a field-like entity.
    ///
    /// A oneof answers with the minimum over its members, recursively. An empty
    /// oneof, or any entity that is not field-like, has no first tag.
    pub fn first_tag(&self, id: EntityId) -> Option<i32> {
        let field = self.kind(id)?.as_field_like()?;
        if let Some(tag) = field.own_tag() {
            return Some(tag);
        }
        match self.kind(id)? {
            EntityKind::OneOf(oneof) => oneof
                .fields()
                .iter()
                .filter_map(|&member| self.first_tag(member))
                .min(),
            _ => None,
        }
    }

    /// Finds an option by name on an option-bearing entity.
    ///
    /// An `Option` entity answers for itself when its own name matches.
    pub fn find_option(&self, id: EntityId, name: &str) -> Option<EntityId> {
        let kind = self.kind(id)?;
        if let Some(option) = kind.as_option() {
            return (option.name == name).then_some(id);
        }
        kind.options().iter().copied().find(|&option| {
            self.kind(option)
                .and_then(EntityKind::as_option)
                .is_some_and(|o| o.name == name)
        })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false: a document holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(idx, entity)| (EntityId::new(idx), entity))
    }
}

/// Builds a [`Document`] top-down, enforcing which owners may hold which entities.
///
/// ```
/// use protograph::syntax::{DocumentBuilder, Field, Message};
///
/// let mut builder = DocumentBuilder::new();
/// builder.set_package("p_user");
/// let user = builder.add(builder.root(), Message::new("User")).unwrap();
/// builder.add(user, Field::new("name", "string", 1)).unwrap();
/// let doc = builder.build();
/// assert_eq!(doc.package(), "p_user");
/// assert_eq!(doc.messages(), &[user]);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    entities: Vec<Entity>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            entities: vec![Entity {
                parent: None,
                documentation: None,
                kind: EntityKind::Document(FileRoot::default()),
            }],
        }
    }

    pub fn root(&self) -> EntityId {
        EntityId::ROOT
    }

    fn root_mut(&mut self) -> &mut FileRoot {
        match &mut self.entities[EntityId::ROOT.index()].kind {
            EntityKind::Document(root) => root,
            _ => unreachable!("document arena always starts with its root"),
        }
    }

    pub fn set_package(&mut self, package: impl Into<String>) -> &mut Self {
        self.root_mut().package = package.into();
        self
    }

    pub fn set_syntax(&mut self, syntax: impl Into<String>) -> &mut Self {
        self.root_mut().syntax = syntax.into();
        self
    }

    pub fn add_import(&mut self, kind: ImportKind, path: impl Into<String>) -> &mut Self {
        let root = self.root_mut();
        let list = match kind {
            ImportKind::Plain => &mut root.dependencies,
            ImportKind::Public => &mut root.public_dependencies,
            ImportKind::Weak => &mut root.weak_dependencies,
        };
        list.push(path.into());
        self
    }

    /// Appends `kind` as the last child of `parent`.
    ///
    /// Fails with [`SchemaError::InvalidScope`] when `parent` does not exist or
    /// cannot own this kind of entity.
    pub fn add(&mut self, parent: EntityId, kind: impl Into<EntityKind>) -> SchemaResult<EntityId> {
        let kind = kind.into();
        let id = EntityId::new(self.entities.len());
        let invalid = || SchemaError::invalid_scope(kind.label(), kind.name().unwrap_or_default());

        let owner = self.entities.get_mut(parent.index()).ok_or_else(invalid)?;
        owner.kind.child_list(&kind).ok_or_else(invalid)?.push(id);

        self.entities.push(Entity {
            parent: Some(parent),
            documentation: None,
            kind,
        });
        Ok(id)
    }

    /// Records `reserved "name";` on a message.
    pub fn add_reserved_name(
        &mut self,
        message: EntityId,
        name: impl Into<SmolStr>,
    ) -> SchemaResult<()> {
        let name = name.into();
        match self.entities.get_mut(message.index()).map(|e| &mut e.kind) {
            Some(EntityKind::Message(m)) => {
                m.reserved_names.push(name);
                Ok(())
            }
            _ => Err(SchemaError::invalid_scope("reserved name", name.as_str())),
        }
    }

    /// Attaches documentation. Returns false for an unknown id.
    pub fn set_documentation(&mut self, id: EntityId, comment: Comment) -> bool {
        match self.entities.get_mut(id.index()) {
            Some(entity) => {
                entity.documentation = Some(comment);
                true
            }
            None => false,
        }
    }

    pub fn build(self) -> Document {
        Document {
            entities: self.entities,
        }
    }
}

//! Type resolution across files and packages.
//!
//! A query gathers candidates in a fixed order and never picks a winner:
//!
//! 1. a built-in scalar whose keyword matches, ignoring case
//! 2. entities of the context document itself
//! 3. for every leading run of segments that names a package (the empty
//!    prefix included), entities of that package's files
//!
//! Scoped queries only see the context document, its imports, and whatever
//! those re-export through public imports. Candidates are deduplicated by
//! (file, entity); the first occurrence wins.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::base::{NamePrefix, dotted_prefixes, join_name, package_prefixes};
use crate::error::{SchemaError, SchemaResult};
use crate::syntax::{Document, Entity, EntityId, EntityKind, ImportKind, ScalarType};

use super::graph::{DependencyGraph, FileDep};
use super::scope::{find_declared_name, find_name, scoped_name};

/// What a resolved name points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeItem {
    Entity(EntityId),
    Scalar(ScalarType),
}

/// A resolved name.
///
/// Borrows the graph so it can serve as the scope of further lookups.
#[derive(Clone)]
pub struct DepType<'a> {
    graph: &'a DependencyGraph,
    file: Option<&'a FileDep>,
    alias: String,
    original_alias: String,
    name: String,
    item: TypeItem,
}

impl fmt::Debug for DepType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepType")
            .field("file", &self.file.map(FileDep::path))
            .field("alias", &self.alias)
            .field("original_alias", &self.original_alias)
            .field("name", &self.name)
            .field("item", &self.item)
            .finish()
    }
}

impl<'a> DepType<'a> {
    pub(crate) fn from_entity(
        graph: &'a DependencyGraph,
        file: &'a FileDep,
        alias: &str,
        id: EntityId,
    ) -> Self {
        let name = file
            .document()
            .map(|doc| scoped_name(doc, id))
            .unwrap_or_default();
        Self {
            graph,
            file: Some(file),
            alias: alias.to_string(),
            original_alias: file.original_alias().to_string(),
            name,
            item: TypeItem::Entity(id),
        }
    }

    fn scalar(graph: &'a DependencyGraph, scalar: ScalarType) -> Self {
        Self {
            graph,
            file: None,
            alias: String::new(),
            original_alias: String::new(),
            name: scalar.keyword().to_string(),
            item: TypeItem::Scalar(scalar),
        }
    }

    /// The owning file, `None` for scalars.
    pub fn file(&self) -> Option<&'a FileDep> {
        self.file
    }

    /// Package prefix the query used to reach this entity. Empty when it was
    /// found without one.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The package that declares this entity.
    pub fn original_alias(&self) -> &str {
        &self.original_alias
    }

    /// Scoped name inside the owning file, e.g. `User.Address`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item(&self) -> TypeItem {
        self.item
    }

    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self.item {
            TypeItem::Scalar(scalar) => Some(scalar),
            TypeItem::Entity(_) => None,
        }
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        match self.item {
            TypeItem::Entity(id) => Some(id),
            TypeItem::Scalar(_) => None,
        }
    }

    pub fn document(&self) -> Option<&'a Document> {
        self.file.and_then(FileDep::document)
    }

    pub fn entity(&self) -> Option<&'a Entity> {
        self.document()?.get(self.entity_id()?)
    }

    pub fn kind(&self) -> Option<&'a EntityKind> {
        self.entity().map(Entity::kind)
    }

    /// Package-qualified name. Scalars answer with their keyword.
    pub fn full_name(&self) -> String {
        match self.item {
            TypeItem::Scalar(scalar) => scalar.keyword().to_string(),
            TypeItem::Entity(_) => join_name(&self.original_alias, &self.name),
        }
    }

    /// True for message declarations, false for `extend` blocks.
    pub fn is_message(&self) -> bool {
        matches!(self.kind(), Some(EntityKind::Message(m)) if !m.is_extend)
    }

    pub fn is_extend(&self) -> bool {
        self.kind().is_some_and(EntityKind::is_extend)
    }

    /// Resolves `name` as written inside this entity.
    ///
    /// Tries, stopping at the first stage with results: the owning file as a
    /// whole, then each enclosing scope of this entity from the innermost
    /// outwards, then each dotted prefix of the declaring package.
    pub fn get_types(&self, name: &str) -> Vec<DepType<'a>> {
        match (self.file, self.item) {
            (Some(file), TypeItem::Entity(_)) => {
                self.graph.lookup_relative(file, &self.name, name, |_| true)
            }
            _ => self.graph.get_types(name),
        }
    }

    /// Like [`DepType::get_types`], failing when more than one candidate matches.
    pub fn get_type(&self, name: &str) -> SchemaResult<Option<DepType<'a>>> {
        single(name, self.get_types(name))
    }

    fn key(&self) -> (Option<&'a str>, TypeItem) {
        (self.file.map(FileDep::path), self.item)
    }
}

impl FileDep {
    /// Resolves `name` as written at the top level of this file.
    pub fn get_types<'a>(&'a self, graph: &'a DependencyGraph, name: &str) -> Vec<DepType<'a>> {
        graph.lookup_relative(self, "", name, |_| true)
    }

    pub fn get_type<'a>(
        &'a self,
        graph: &'a DependencyGraph,
        name: &str,
    ) -> SchemaResult<Option<DepType<'a>>> {
        single(name, self.get_types(graph, name))
    }
}

pub(crate) fn single<'a>(
    name: &str,
    mut found: Vec<DepType<'a>>,
) -> SchemaResult<Option<DepType<'a>>> {
    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        n => Err(SchemaError::ambiguous(name, n)),
    }
}

/// Messages and enums, the things an `extend` may target or a field may use.
fn is_declared_type(candidate: &DepType<'_>) -> bool {
    matches!(
        candidate.kind(),
        Some(EntityKind::Message(m)) if !m.is_extend
    ) || matches!(candidate.kind(), Some(EntityKind::Enum(_)))
}

/// Ordered candidate list with (file, entity) dedupe.
struct Candidates<'a> {
    graph: &'a DependencyGraph,
    seen: FxHashSet<(Option<&'a str>, TypeItem)>,
    found: Vec<DepType<'a>>,
}

impl<'a> Candidates<'a> {
    fn new(graph: &'a DependencyGraph) -> Self {
        Self {
            graph,
            seen: FxHashSet::default(),
            found: Vec::new(),
        }
    }

    fn push(&mut self, candidate: DepType<'a>) {
        if self.seen.insert(candidate.key()) {
            self.found.push(candidate);
        }
    }

    fn push_entity(&mut self, file: &'a FileDep, alias: &str, id: EntityId) {
        self.push(DepType::from_entity(self.graph, file, alias, id));
    }
}

impl DependencyGraph {
    /// Every candidate for `name`, looked up across all loaded files.
    pub fn get_types(&self, name: &str) -> Vec<DepType<'_>> {
        self.lookup(None, name)
    }

    /// The single candidate for `name`.
    ///
    /// `Ok(None)` when nothing matches, [`SchemaError::AmbiguousName`] when
    /// more than one does.
    pub fn get_type(&self, name: &str) -> SchemaResult<Option<DepType<'_>>> {
        single(name, self.get_types(name))
    }

    pub(crate) fn lookup<'a>(
        &'a self,
        context: Option<&'a FileDep>,
        name: &str,
    ) -> Vec<DepType<'a>> {
        let mut out = Candidates::new(self);
        if name.is_empty() {
            return out.found;
        }

        if let Some(scalar) = ScalarType::parse(name) {
            out.push(DepType::scalar(self, scalar));
        }

        if let Some(file) = context {
            if let Some(doc) = file.document() {
                for id in find_name(doc, name) {
                    out.push_entity(file, "", id);
                }
            }
        }

        let visible = context.map(|file| self.visible_files(file));
        for NamePrefix { prefix, rest } in package_prefixes(name) {
            for file in self.prefix_files(prefix, visible.as_ref()) {
                let Some(doc) = file.document() else {
                    continue;
                };
                let ids = if prefix.is_empty() {
                    find_declared_name(doc, rest)
                } else {
                    find_name(doc, rest)
                };
                for id in ids {
                    out.push_entity(file, prefix, id);
                }
            }
        }

        trace!(
            "Resolved {name} in {:?}: {} candidate(s)",
            context.map(FileDep::path),
            out.found.len()
        );
        out.found
    }

    /// Staged lookup relative to a scope inside `file`. The first stage with a
    /// candidate accepted by `keep` wins.
    pub(crate) fn lookup_relative<'a>(
        &'a self,
        file: &'a FileDep,
        scope: &str,
        name: &str,
        keep: impl Fn(&DepType<'a>) -> bool,
    ) -> Vec<DepType<'a>> {
        let attempt = |qualified: &str| -> Vec<DepType<'a>> {
            self.lookup(Some(file), qualified)
                .into_iter()
                .filter(|candidate| keep(candidate))
                .collect()
        };

        let found = attempt(name);
        if !found.is_empty() {
            return found;
        }

        let scopes: Vec<&str> = dotted_prefixes(scope).collect();
        for scope in scopes.into_iter().rev() {
            let found = attempt(&join_name(scope, name));
            if !found.is_empty() {
                return found;
            }
        }

        for package in dotted_prefixes(file.original_alias()) {
            let found = attempt(&join_name(package, name));
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Fully-qualified name of the one declared type `name` denotes, or `name`
    /// itself when that is not exactly one type.
    pub(crate) fn canonical_name(&self, file: Option<&FileDep>, scope: &str, name: &str) -> String {
        let found: Vec<DepType<'_>> = match file {
            Some(file) => self.lookup_relative(file, scope, name, is_declared_type),
            None => self
                .get_types(name)
                .into_iter()
                .filter(is_declared_type)
                .collect(),
        };
        match found.as_slice() {
            [only] => only.full_name(),
            _ => name.to_string(),
        }
    }

    /// Paths a scoped lookup from `file` may see.
    fn visible_files<'a>(&'a self, file: &'a FileDep) -> FxHashSet<&'a str> {
        let mut visible = FxHashSet::default();
        visible.insert(file.path());
        let Some(doc) = file.document() else {
            return visible;
        };

        let mut pending: Vec<&'a str> = doc.all_imports().map(|(_, path)| path).collect();
        while let Some(path) = pending.pop() {
            if !visible.insert(path) {
                continue;
            }
            if let Some(doc) = self.get_file(path).and_then(FileDep::document) {
                pending.extend(doc.imports(ImportKind::Public).iter().map(String::as_str));
            }
        }
        visible
    }

    /// Files a package prefix selects. The empty prefix selects every loaded
    /// file when unscoped.
    fn prefix_files<'a>(
        &'a self,
        prefix: &str,
        visible: Option<&FxHashSet<&'a str>>,
    ) -> Vec<&'a FileDep> {
        match visible {
            None if prefix.is_empty() => self.files().filter(|f| !f.is_stub()).collect(),
            None => self.package_files(prefix).collect(),
            Some(visible) => self
                .package_files(prefix)
                .filter(|f| visible.contains(f.path()))
                .collect(),
        }
    }
}

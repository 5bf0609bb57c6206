//! The dependency graph: every loaded schema file, indexed by path, by
//! package and by the types its `extend` blocks target.
//!
//! The graph is built with `add_*` calls and then queried through shared
//! references. Queries never mutate it.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::base::package_prefixes;
use crate::error::{SchemaError, SchemaResult};
use crate::project::{
    DirectorySource, FileDepType, FileProvider, IncludePath, SchemaParser, SourceFile,
};
use crate::syntax::{Document, EntityId, EntityKind};

use super::resolve::{DepType, single};
use super::scope::scoped_name;

// ============================================================================
// FILE RECORDS
// ============================================================================

/// One loaded file, or a stub for an import that could not be located.
#[derive(Debug, Clone)]
pub struct FileDep {
    path: String,
    dep_type: FileDepType,
    document: Option<Document>,
    /// `extend` blocks with their canonical target names.
    extensions: Vec<(EntityId, String)>,
}

impl FileDep {
    fn loaded(path: String, document: Document, dep_type: FileDepType) -> Self {
        Self {
            path,
            dep_type,
            document: Some(document),
            extensions: Vec::new(),
        }
    }

    fn stub(path: String) -> Self {
        Self {
            path,
            dep_type: FileDepType::Imported,
            document: None,
            extensions: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn dep_type(&self) -> FileDepType {
        self.dep_type
    }

    /// The parsed content. `None` for a stub.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn is_stub(&self) -> bool {
        self.document.is_none()
    }

    /// The declared package, empty for stubs and files without one.
    pub fn original_alias(&self) -> &str {
        self.document.as_ref().map_or("", Document::package)
    }

    /// `extend` blocks in declaration order, with their canonical targets.
    pub fn extensions(&self) -> impl Iterator<Item = (EntityId, &str)> {
        self.extensions.iter().map(|(id, target)| (*id, target.as_str()))
    }

    pub fn is_same(&self, other: &FileDep) -> bool {
        self.path == other.path
    }

    /// Same directory and same declared package.
    pub fn is_same_package(&self, other: &FileDep) -> bool {
        self.is_same(other)
            || (parent_dir(&self.path) == parent_dir(&other.path)
                && self.original_alias() == other.original_alias())
    }

    /// Value of a file-level option, e.g. `go_package`.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        let doc = self.document()?;
        let option = doc.find_option(EntityId::ROOT, name)?;
        doc.kind(option)
            .and_then(EntityKind::as_option)
            .map(|o| o.value.as_str())
    }
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// A file that would declare a dotted name, with the name split at its package.
#[derive(Debug, Clone)]
pub struct FileDepOfName<'a> {
    pub file: &'a FileDep,
    /// The package prefix of the queried name.
    pub package: String,
    /// What follows the package, possibly empty.
    pub rest: String,
}

// ============================================================================
// GRAPH
// ============================================================================

/// Index of all loaded schema files.
#[derive(Default)]
pub struct DependencyGraph {
    files: IndexMap<String, FileDep>,
    packages: IndexMap<String, Vec<String>>,
    /// Canonical target name -> packages declaring an `extend` for it.
    extensions: IndexMap<String, Vec<String>>,
    include: IncludePath,
    ignore_not_found: bool,
    parser: Option<Box<dyn SchemaParser>>,
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .field("packages", &self.packages)
            .field("extensions", &self.extensions)
            .field("include", &self.include)
            .field("ignore_not_found", &self.ignore_not_found)
            .field("parser", &self.parser.is_some())
            .finish()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `parser` for files read from include directories and providers.
    pub fn with_parser(mut self, parser: impl SchemaParser + 'static) -> Self {
        self.set_parser(parser);
        self
    }

    pub fn set_parser(&mut self, parser: impl SchemaParser + 'static) {
        self.parser = Some(Box::new(parser));
    }

    /// Tolerant mode: imports missing from every include directory become stubs.
    pub fn set_ignore_not_found(&mut self, ignore: bool) {
        self.ignore_not_found = ignore;
    }

    pub fn ignore_not_found(&self) -> bool {
        self.ignore_not_found
    }

    /// Appends a search root for imports. Earlier roots take priority.
    pub fn add_include_dir(&mut self, dir: impl Into<PathBuf>) -> SchemaResult<()> {
        self.include.push(dir)
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        self.include.dirs()
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Adds a parsed file, replacing any earlier file at the same path.
    ///
    /// Imports not yet in the graph are loaded from the include directories
    /// first. When one cannot be found and tolerant mode is off, the graph is
    /// left as it was before the call and [`SchemaError::NotFound`] is returned.
    pub fn add_document(
        &mut self,
        path: impl Into<String>,
        document: Document,
        dep_type: FileDepType,
    ) -> SchemaResult<()> {
        let path = path.into();
        if self.files.contains_key(&path) {
            debug!("Replacing {path}");
            self.deindex(&path);
        }

        let imports: Vec<String> = document
            .all_imports()
            .map(|(_, import)| import.to_string())
            .collect();
        let displaced = self.files.insert(
            path.clone(),
            FileDep::loaded(path.clone(), document, dep_type),
        );
        self.index_package(&path);
        let mark = self.files.len();

        for import in &imports {
            if self.files.contains_key(import) {
                continue;
            }
            if let Err(err) = self.load_import(import) {
                self.roll_back(&path, displaced, mark);
                return Err(err);
            }
        }

        self.index_extensions(&path);
        debug!("Added {path} ({dep_type})");
        Ok(())
    }

    /// Undoes a failed `add_document`: drops every record added after `mark`
    /// and puts back the file that was displaced at `path`, if any.
    fn roll_back(&mut self, path: &str, displaced: Option<FileDep>, mark: usize) {
        let loaded: Vec<String> = self.files.keys().skip(mark).cloned().collect();
        for import in &loaded {
            self.deindex(import);
        }
        self.files.truncate(mark);
        self.deindex(path);

        match displaced {
            Some(previous) => {
                debug!("Restoring previous version of {path}");
                self.files.insert(path.to_string(), previous);
                self.index_package(path);
                self.index_extensions(path);
            }
            None => {
                self.files.shift_remove(path);
            }
        }
    }

    /// Loads one import path through the include directories, unless present.
    pub fn add_include_file(&mut self, import: &str) -> SchemaResult<()> {
        if self.files.contains_key(import) {
            return Ok(());
        }
        self.load_import(import)
    }

    /// Parses `text` with the configured parser and adds the result.
    pub fn add_file(
        &mut self,
        path: impl Into<String>,
        text: &str,
        dep_type: FileDepType,
    ) -> SchemaResult<()> {
        let path = path.into();
        let document = self.parse(&path, text)?;
        self.add_document(path, document, dep_type)
    }

    /// Adds every file a provider yields. Returns how many were added.
    pub fn add_provider(&mut self, mut provider: impl FileProvider) -> SchemaResult<usize> {
        let mut added = 0;
        while let Some(file) = provider.next_file() {
            let SourceFile {
                path,
                text,
                dep_type,
            } = file?;
            self.add_file(path, &text, dep_type)?;
            added += 1;
        }
        Ok(added)
    }

    /// Adds every schema file below `dir`, named relative to `dir`.
    pub fn add_path(&mut self, dir: &Path, dep_type: FileDepType) -> SchemaResult<usize> {
        self.add_path_with_root(dir, dir, dep_type)
    }

    /// Adds every schema file below `dir`, named relative to `root`.
    pub fn add_path_with_root(
        &mut self,
        root: &Path,
        dir: &Path,
        dep_type: FileDepType,
    ) -> SchemaResult<usize> {
        let source = DirectorySource::new(root, dir, dep_type)?;
        self.add_provider(source)
    }

    fn parse(&self, path: &str, text: &str) -> SchemaResult<Document> {
        let parser = self
            .parser
            .as_ref()
            .ok_or_else(|| SchemaError::MissingParser(path.to_string()))?;
        parser.parse(path, text).map_err(|source| SchemaError::Parse {
            path: path.to_string(),
            source,
        })
    }

    fn load_import(&mut self, import: &str) -> SchemaResult<()> {
        match self.include.locate(import) {
            Some(full) => {
                debug!("Loading import {import} from {}", full.display());
                let text = std::fs::read_to_string(&full)?;
                let document = self.parse(import, &text)?;
                self.add_document(import, document, FileDepType::Imported)
            }
            None if self.ignore_not_found => {
                warn!("Import {import} not found in include path, keeping a stub");
                self.files
                    .insert(import.to_string(), FileDep::stub(import.to_string()));
                Ok(())
            }
            None => Err(SchemaError::not_found(import)),
        }
    }

    // ------------------------------------------------------------------------
    // Indexing
    // ------------------------------------------------------------------------

    fn index_package(&mut self, path: &str) {
        let Some(file) = self.files.get(path).filter(|f| !f.is_stub()) else {
            return;
        };
        let paths = self
            .packages
            .entry(file.original_alias().to_string())
            .or_default();
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }

    fn index_extensions(&mut self, path: &str) {
        let Some(file) = self.files.get(path) else {
            return;
        };
        let Some(doc) = file.document() else {
            return;
        };

        let mut found = Vec::new();
        for (id, entity) in doc.iter() {
            let EntityKind::Message(message) = entity.kind() else {
                continue;
            };
            if !message.is_extend {
                continue;
            }
            let scope = entity
                .parent()
                .filter(|&parent| parent != EntityId::ROOT)
                .map(|parent| scoped_name(doc, parent))
                .unwrap_or_default();
            let target = self.canonical_name(Some(file), &scope, &message.name);
            found.push((id, target));
        }

        let package = file.original_alias().to_string();
        for (_, target) in &found {
            self.extensions
                .entry(target.clone())
                .or_default()
                .push(package.clone());
        }
        if let Some(file) = self.files.get_mut(path) {
            file.extensions = found;
        }
    }

    /// Removes a file's package and extension entries.
    fn deindex(&mut self, path: &str) {
        let Some(file) = self.files.get(path) else {
            return;
        };
        let package = file.original_alias().to_string();
        let targets: Vec<String> = file.extensions().map(|(_, t)| t.to_string()).collect();

        if !file.is_stub() {
            if let Some(paths) = self.packages.get_mut(&package) {
                paths.retain(|p| p != path);
                if paths.is_empty() {
                    self.packages.shift_remove(&package);
                }
            }
        }
        for target in targets {
            if let Some(packages) = self.extensions.get_mut(&target) {
                if let Some(pos) = packages.iter().position(|p| *p == package) {
                    packages.remove(pos);
                }
                if packages.is_empty() {
                    self.extensions.shift_remove(&target);
                }
            }
        }
        if let Some(file) = self.files.get_mut(path) {
            file.extensions.clear();
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn get_file(&self, path: &str) -> Option<&FileDep> {
        self.files.get(path)
    }

    /// All records, stubs included, in insertion order.
    pub fn files(&self) -> impl Iterator<Item = &FileDep> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Registered package names, files without a package appearing as `""`.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Files registered under `package`, in registration order.
    pub fn package_files(&self, package: &str) -> impl Iterator<Item = &FileDep> {
        self.packages
            .get(package)
            .into_iter()
            .flatten()
            .filter_map(|path| self.files.get(path))
    }

    /// Packages that declared an `extend` block for the canonical `target`.
    pub fn extending_packages(&self, target: &str) -> &[String] {
        self.extensions.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Files that could declare `name`, without checking the rest of the name exists.
    ///
    /// Every leading run of segments that is a registered package contributes
    /// its files, including the whole name with an empty rest.
    pub fn get_files_of_name(&self, name: &str) -> Vec<FileDepOfName<'_>> {
        let whole = std::iter::once((name, ""));
        let splits = package_prefixes(name)
            .map(|p| (p.prefix, p.rest))
            .chain(whole.filter(|(n, _)| !n.is_empty()));

        let mut found = Vec::new();
        for (package, rest) in splits {
            for file in self.package_files(package) {
                found.push(FileDepOfName {
                    file,
                    package: package.to_string(),
                    rest: rest.to_string(),
                });
            }
        }
        found
    }

    /// The single file that could declare `name`.
    pub fn get_file_of_name(&self, name: &str) -> SchemaResult<Option<FileDepOfName<'_>>> {
        let mut found = self.get_files_of_name(name);
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            n => Err(SchemaError::ambiguous(name, n)),
        }
    }

    /// The `extend` block `package` declared for the type `name`.
    pub fn get_type_extension(
        &self,
        name: &str,
        package: &str,
    ) -> SchemaResult<Option<DepType<'_>>> {
        let target = self.canonical_name(None, "", name);
        if !self.extending_packages(&target).iter().any(|p| p == package) {
            return Ok(None);
        }

        let mut found = Vec::new();
        for file in self.package_files(package) {
            for (id, extended) in file.extensions() {
                if extended == target {
                    found.push(DepType::from_entity(self, file, package, id));
                }
            }
        }
        single(name, found)
    }
}

//! Where schema text comes from and how it becomes a [`Document`].
//!
//! Grammar-level parsing is not part of this crate. Callers plug a parser in
//! through [`SchemaParser`] and feed files through a [`FileProvider`].

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::base::constants::PROTO_EXTENSION;
use crate::error::{SchemaError, SchemaResult};
use crate::syntax::Document;

/// Error type returned by parser implementations.
pub type ParseFailure = Box<dyn std::error::Error + Send + Sync>;

/// Turns schema text into a [`Document`].
///
/// Any `Fn(&str, &str) -> Result<Document, ParseFailure>` is a parser.
pub trait SchemaParser {
    /// Parses `text`, which was read from the import path `path`.
    fn parse(&self, path: &str, text: &str) -> Result<Document, ParseFailure>;
}

impl<F> SchemaParser for F
where
    F: Fn(&str, &str) -> Result<Document, ParseFailure>,
{
    fn parse(&self, path: &str, text: &str) -> Result<Document, ParseFailure> {
        self(path, text)
    }
}

/// Whether a file was loaded on purpose or pulled in by an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileDepType {
    Own,
    Imported,
}

impl fmt::Display for FileDepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileDepType::Own => f.write_str("OWN"),
            FileDepType::Imported => f.write_str("IMPORTED"),
        }
    }
}

/// One schema file as handed to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Import path, `/`-separated and relative to its root.
    pub path: String,
    pub text: String,
    pub dep_type: FileDepType,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>, dep_type: FileDepType) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            dep_type,
        }
    }
}

/// A pull-based source of schema files.
pub trait FileProvider {
    /// The next file, `None` once exhausted.
    fn next_file(&mut self) -> Option<SchemaResult<SourceFile>>;
}

impl<I> FileProvider for I
where
    I: Iterator<Item = SourceFile>,
{
    fn next_file(&mut self) -> Option<SchemaResult<SourceFile>> {
        self.next().map(Ok)
    }
}

/// Every `.proto` file below a directory, named relative to a root.
#[derive(Debug)]
pub struct DirectorySource {
    root: PathBuf,
    files: std::vec::IntoIter<PathBuf>,
    dep_type: FileDepType,
}

impl DirectorySource {
    /// Collects schema files below `dir`. Paths are sorted so loading order is stable.
    pub fn new(root: &Path, dir: &Path, dep_type: FileDepType) -> SchemaResult<Self> {
        let metadata = std::fs::metadata(dir).map_err(|source| SchemaError::InvalidIncludeDir {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(SchemaError::NotADirectory(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| SchemaError::Io(e.into()))?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(PROTO_EXTENSION)
            {
                files.push(path.to_path_buf());
            }
        }
        files.sort();

        Ok(Self {
            root: root.to_path_buf(),
            files: files.into_iter(),
            dep_type,
        })
    }

    fn import_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl FileProvider for DirectorySource {
    fn next_file(&mut self) -> Option<SchemaResult<SourceFile>> {
        let path = self.files.next()?;
        let file = std::fs::read_to_string(&path)
            .map(|text| SourceFile::new(self.import_path(&path), text, self.dep_type))
            .map_err(SchemaError::from);
        Some(file)
    }
}

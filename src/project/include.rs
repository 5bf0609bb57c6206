//! Ordered include directories used to locate imports.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::error::{SchemaError, SchemaResult};

/// Search roots for imports. The first directory holding a file wins.
#[derive(Debug, Clone, Default)]
pub struct IncludePath {
    dirs: Vec<PathBuf>,
}

impl IncludePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a search root after checking it is an existing directory.
    pub fn push(&mut self, dir: impl Into<PathBuf>) -> SchemaResult<()> {
        let dir = dir.into();
        let metadata = std::fs::metadata(&dir).map_err(|source| SchemaError::InvalidIncludeDir {
            path: dir.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(SchemaError::NotADirectory(dir));
        }
        self.dirs.push(dir);
        Ok(())
    }

    /// Full path of the first regular file named `relative` below any root.
    ///
    /// Absolute paths and paths with `..` segments are never located.
    pub fn locate(&self, relative: &str) -> Option<PathBuf> {
        if !is_contained(Path::new(relative)) {
            warn!("Import path {relative} leaves the include roots, ignoring it");
            return None;
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file())
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

fn is_contained(relative: &Path) -> bool {
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

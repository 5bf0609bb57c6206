//! Semantic layer: the dependency graph and name resolution over it.
//!
//! ## Key Types
//!
//! - [`DependencyGraph`] - Every loaded file, indexed by path, package and extension target
//! - [`FileDep`] - One loaded file (or a stub for an unresolved import)
//! - [`DepType`] - A resolved name, usable as the scope of further lookups
//! - [`OptionType`] - A resolved custom or built-in option
//!
//! ## Query Layers
//!
//! ```text
//! add_document / add_file     ← INPUT: parsed documents
//!     │
//!     ▼
//! package + extension index   ← built as files are added
//!     │
//!     ▼
//! get_type(s)                 ← scalar, in-document, package-prefix candidates
//!     │
//!     ▼
//! DepType::get_type(s)        ← relative to an already resolved entity
//!     │
//!     ▼
//! get_option                  ← extension fields of the option carriers
//! ```

mod graph;
mod options;
mod resolve;
pub mod scope;

pub use graph::{DependencyGraph, FileDep, FileDepOfName};
pub use options::{EntityRef, OptionKind, OptionType};
pub use resolve::{DepType, TypeItem};

//! # protograph-base
//!
//! Core library for protocol schema dependency graphs and cross-file name
//! resolution.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir       → Dependency graph, type and option resolution
//!   ↓
//! project   → Include directories, schema sources, parser seam
//!   ↓
//! syntax    → Entity payloads, per-file arena, scalar types
//!   ↓
//! base      → Dotted names, constants
//! ```
//!
//! Grammar-level parsing is not part of this crate: parsed [`Document`]s are
//! added directly, or raw text is routed through a [`SchemaParser`].

// ============================================================================
// MODULES (dependency order: base → syntax → project → hir)
// ============================================================================

/// Foundation: dotted name handling, constants
pub mod base;

/// Error type shared by every layer
pub mod error;

/// Syntax: entity model and document arena
pub mod syntax;

/// Project inputs: include directories, file providers
pub mod project;

/// High-level IR: dependency graph and resolvers
pub mod hir;

pub use error::{SchemaError, SchemaResult};
pub use hir::{DepType, DependencyGraph, FileDep, OptionKind, OptionType, TypeItem};
pub use project::{FileDepType, SchemaParser};
pub use syntax::{Document, DocumentBuilder, EntityId, EntityKind, ScalarType};

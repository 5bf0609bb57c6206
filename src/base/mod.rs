//! Foundation types for the protograph toolchain.
//!
//! This module provides primitives used throughout the crate:
//! - [`name_split`], [`package_prefixes`], [`join_name`] - Dotted name handling
//! - Domain constants (file extension, well-known option package)
//!
//! This module has NO dependencies on other protograph modules.

pub mod constants;
mod name;

pub use name::{NamePrefix, dotted_prefixes, join_name, name_split, package_prefixes};

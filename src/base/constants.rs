//! Domain constants shared across the crate.

/// File extension of schema sources, without the leading dot.
pub const PROTO_EXTENSION: &str = "proto";

/// Package declaring the well-known option-carrier messages.
pub const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Separator between name segments.
pub const NAME_SEPARATOR: char = '.';

//! Project inputs: include directories, schema sources and the parser seam.

mod include;
mod source;

pub use include::IncludePath;
pub use source::{DirectorySource, FileDepType, FileProvider, ParseFailure, SchemaParser, SourceFile};

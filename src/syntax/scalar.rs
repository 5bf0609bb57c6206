//! Built-in scalar field types.

use std::fmt;
use std::str::FromStr;

/// A primitive field type known to every schema without declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    Bool,
    Bytes,
    Double,
    Float,
    Fixed32,
    Fixed64,
    Int32,
    Int64,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    String,
    Uint32,
    Uint64,
}

impl ScalarType {
    /// All scalar types, in keyword order.
    pub const ALL: [ScalarType; 15] = [
        ScalarType::Bool,
        ScalarType::Bytes,
        ScalarType::Double,
        ScalarType::Float,
        ScalarType::Fixed32,
        ScalarType::Fixed64,
        ScalarType::Int32,
        ScalarType::Int64,
        ScalarType::Sfixed32,
        ScalarType::Sfixed64,
        ScalarType::Sint32,
        ScalarType::Sint64,
        ScalarType::String,
        ScalarType::Uint32,
        ScalarType::Uint64,
    ];

    /// The canonical (lowercase) keyword of this scalar.
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Bytes => "bytes",
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::String => "string",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
        }
    }

    /// Parses a scalar keyword, ignoring ASCII case.
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scalar| scalar.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Returns true for the integer scalars.
    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            ScalarType::Bool
                | ScalarType::Bytes
                | ScalarType::Double
                | ScalarType::Float
                | ScalarType::String
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Error for [`ScalarType::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScalar(pub String);

impl fmt::Display for UnknownScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scalar type '{}'", self.0)
    }
}

impl std::error::Error for UnknownScalar {}

impl FromStr for ScalarType {
    type Err = UnknownScalar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownScalar(s.to_string()))
    }
}

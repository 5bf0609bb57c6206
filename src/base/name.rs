//! Dotted name handling.
//!
//! Schema names are dot-separated paths (`google.protobuf.Empty`, `User.Address`).
//! Everything here works on borrowed slices of the input name.

use super::constants::NAME_SEPARATOR;

/// A split of a dotted name into a package-candidate prefix and the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePrefix<'a> {
    /// Leading segments, possibly empty.
    pub prefix: &'a str,
    /// Trailing segments after the prefix. Never empty for a non-empty name.
    pub rest: &'a str,
}

/// Splits a name into the part before the first dot and the part after it.
///
/// `name_split("User.Address")` is `("User", "Address")`; a name without dots
/// yields an empty rest.
pub fn name_split(name: &str) -> (&str, &str) {
    match name.split_once(NAME_SEPARATOR) {
        Some((first, rest)) => (first, rest),
        None => (name, ""),
    }
}

/// Every way to read a leading run of segments as a package name.
///
/// Shortest prefix first, starting with the empty prefix. The remainder always
/// keeps at least one segment:
///
/// ```
/// use protograph::base::package_prefixes;
///
/// let splits: Vec<_> = package_prefixes("google.protobuf.Empty")
///     .map(|p| (p.prefix, p.rest))
///     .collect();
/// assert_eq!(
///     splits,
///     vec![
///         ("", "google.protobuf.Empty"),
///         ("google", "protobuf.Empty"),
///         ("google.protobuf", "Empty"),
///     ]
/// );
/// ```
pub fn package_prefixes(name: &str) -> impl Iterator<Item = NamePrefix<'_>> {
    let head = std::iter::once(NamePrefix {
        prefix: "",
        rest: name,
    });
    let tail = name
        .match_indices(NAME_SEPARATOR)
        .map(move |(idx, _)| NamePrefix {
            prefix: &name[..idx],
            rest: &name[idx + 1..],
        });
    head.chain(tail)
}

/// Successively longer dotted prefixes of a name, ending with the name itself.
///
/// `dotted_prefixes("a.b.c")` yields `a`, `a.b`, `a.b.c`. An empty name yields nothing.
pub fn dotted_prefixes(name: &str) -> impl Iterator<Item = &str> {
    let inner = name
        .match_indices(NAME_SEPARATOR)
        .map(move |(idx, _)| &name[..idx]);
    let whole = (!name.is_empty()).then_some(name);
    inner.chain(whole)
}

/// Joins a scope and a name with a dot, skipping the dot for an empty scope.
pub fn join_name(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        scope.to_string()
    } else {
        format!("{scope}{NAME_SEPARATOR}{name}")
    }
}

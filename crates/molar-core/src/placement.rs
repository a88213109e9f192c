//! Wildcard expansion for manifest placement rules.

use molar_schema::metadata::PlaceEntry;
use molar_schema::rel_path::{PathParseError, RelPath};

/// Marker that turns a placement source into a prefix match.
const WILDCARD: char = '*';

/// A concrete source → destination mapping with parsed paths.
///
/// This is the post-resolution form of a [`PlaceEntry`]: the source names an
/// actual archived file and neither side carries a wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRule {
    /// Source path inside the asset archive.
    pub src: RelPath,
    /// Destination path at install time.
    pub dest: RelPath,
}

impl From<&PlacementRule> for PlaceEntry {
    fn from(rule: &PlacementRule) -> Self {
        PlaceEntry {
            src: rule.src.to_string(),
            dest: rule.dest.to_string(),
        }
    }
}

/// Expands wildcard placement entries against a concrete candidate list.
///
/// Entries whose `src` does not end in `*` are copied through unchanged, in
/// their original position. A wildcard entry like `{src: "assets/*", dest:
/// "out"}` emits one concrete entry per candidate path under `assets/`, with
/// the destination rebased onto `out`; expansions appear in candidate order.
/// A wildcard matching zero candidates contributes zero entries, which is
/// not an error.
///
/// # Errors
///
/// Returns [`PathParseError`] if a wildcard entry's source prefix or
/// destination cannot be parsed as a relative path.
pub fn resolve_place(
    entries: &[PlaceEntry],
    candidates: &[RelPath],
) -> Result<Vec<PlaceEntry>, PathParseError> {
    let mut resolved = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(prefix) = entry.src.strip_suffix(WILDCARD) else {
            resolved.push(entry.clone());
            continue;
        };

        let src_prefix = RelPath::parse(prefix)?;
        let dest_prefix = RelPath::parse(&entry.dest)?;

        for candidate in candidates {
            if !candidate.has_prefix(&src_prefix) {
                continue;
            }
            let rule = PlacementRule {
                src: candidate.clone(),
                dest: dest_prefix.join(&candidate.strip_prefix(&src_prefix)),
            };
            resolved.push(PlaceEntry::from(&rule));
        }
    }

    Ok(resolved)
}

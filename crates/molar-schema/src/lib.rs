//! Shared types for molar: normalized paths, manifest metadata, and
//! module-style repository identifiers.
//!
//! This crate is pure data: no I/O, no network. The operations over these
//! types (archive ingestion, wildcard resolution, version fetching) live in
//! `molar-core`.

pub mod metadata;
pub mod rel_path;
pub mod repo;

// Re-exports
pub use metadata::{MANIFEST_FILE_NAME, Metadata, MetadataError, PlaceEntry, RawMetadata};
pub use rel_path::{PathParseError, RelPath};
pub use repo::{RepoPathError, validate_repo_path, version_list_url};

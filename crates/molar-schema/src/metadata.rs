//! Manifest metadata for tooth packages.
//!
//! A tooth archive carries a `tooth.json` manifest declaring the package's
//! identity, an optional external asset URL, and the file-placement rules to
//! apply at install time. [`RawMetadata`] is the verbatim serde view of that
//! JSON; [`Metadata`] wraps it after validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the manifest inside a tooth archive, relative to the
/// inferred package root.
pub const MANIFEST_FILE_NAME: &str = "tooth.json";

/// Errors raised when manifest bytes cannot be turned into [`Metadata`].
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The manifest is not well-formed JSON or misses a required key.
    #[error("malformed manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is present but empty.
    #[error("manifest field {0:?} must not be empty")]
    EmptyField(&'static str),
}

/// Verbatim serde view of a `tooth.json` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMetadata {
    /// Module-style repository path identifying the tooth.
    pub tooth: String,

    /// URL of an external asset archive, if the files to place do not ship
    /// inside the tooth archive itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,

    /// The `files` section.
    #[serde(default)]
    pub files: RawFiles,
}

/// The `files` section of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFiles {
    /// Ordered placement rules.
    #[serde(default)]
    pub place: Vec<PlaceEntry>,
}

/// One `src` → `dest` placement rule as written in the manifest.
///
/// Before wildcard resolution `src` may end in `*`, meaning every archived
/// path under that prefix; after resolution every entry is a concrete 1:1
/// mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceEntry {
    /// Source path inside the asset archive.
    pub src: String,
    /// Destination path at install time.
    pub dest: String,
}

/// A validated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    raw: RawMetadata,
}

impl Metadata {
    /// Parses and validates manifest bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MetadataError> {
        let raw: RawMetadata = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    /// Validates an already-decoded manifest.
    pub fn from_raw(raw: RawMetadata) -> Result<Self, MetadataError> {
        if raw.tooth.is_empty() {
            return Err(MetadataError::EmptyField("tooth"));
        }
        Ok(Self { raw })
    }

    /// The module-style repository path identifying this tooth.
    pub fn tooth_repo_path(&self) -> &str {
        &self.raw.tooth
    }

    /// The external asset URL, if one is declared and non-empty.
    pub fn asset_url(&self) -> Option<&str> {
        self.raw.asset_url.as_deref().filter(|url| !url.is_empty())
    }

    /// The placement rules, in manifest order.
    pub fn place(&self) -> &[PlaceEntry] {
        &self.raw.files.place
    }

    /// Returns a copy of this metadata with its placement rules replaced.
    ///
    /// Used by archive ingestion to swap wildcard rules for their concrete
    /// expansions; every other field is carried over verbatim.
    pub fn with_place(mut self, place: Vec<PlaceEntry>) -> Self {
        self.raw.files.place = place;
        self
    }

    /// The underlying raw manifest.
    pub fn raw(&self) -> &RawMetadata {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_manifest() {
        let metadata = Metadata::from_slice(
            br#"{
                "tooth": "example.com/org/pkg",
                "asset_url": "https://example.com/pkg.zip",
                "files": {"place": [{"src": "bin/*", "dest": "plugins"}]}
            }"#,
        )
        .expect("valid manifest");

        assert_eq!(metadata.tooth_repo_path(), "example.com/org/pkg");
        assert_eq!(metadata.asset_url(), Some("https://example.com/pkg.zip"));
        assert_eq!(
            metadata.place(),
            [PlaceEntry {
                src: "bin/*".to_string(),
                dest: "plugins".to_string(),
            }]
        );
    }

    #[test]
    fn asset_url_and_files_are_optional() {
        let metadata =
            Metadata::from_slice(br#"{"tooth": "example.com/org/pkg"}"#).expect("valid manifest");
        assert_eq!(metadata.asset_url(), None);
        assert!(metadata.place().is_empty());
    }

    #[test]
    fn empty_asset_url_reads_as_absent() {
        let metadata =
            Metadata::from_slice(br#"{"tooth": "example.com/org/pkg", "asset_url": ""}"#)
                .expect("valid manifest");
        assert_eq!(metadata.asset_url(), None);
    }

    #[test]
    fn rejects_malformed_or_incomplete_manifests() {
        assert!(matches!(
            Metadata::from_slice(b"not json"),
            Err(MetadataError::Json(_))
        ));
        assert!(matches!(
            Metadata::from_slice(br#"{"files": {"place": []}}"#),
            Err(MetadataError::Json(_))
        ));
        assert!(matches!(
            Metadata::from_slice(br#"{"tooth": ""}"#),
            Err(MetadataError::EmptyField("tooth"))
        ));
    }

    #[test]
    fn with_place_preserves_other_fields() {
        let metadata = Metadata::from_slice(
            br#"{"tooth": "example.com/org/pkg", "files": {"place": [{"src": "a/*", "dest": "b"}]}}"#,
        )
        .expect("valid manifest");

        let replaced = metadata.clone().with_place(vec![PlaceEntry {
            src: "a/x".to_string(),
            dest: "b/x".to_string(),
        }]);
        assert_eq!(replaced.tooth_repo_path(), metadata.tooth_repo_path());
        assert_eq!(replaced.place().len(), 1);
        assert_eq!(replaced.place()[0].src, "a/x");
    }
}

//! Reading tooth archives: root inference and manifest extraction.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use molar_schema::metadata::{MANIFEST_FILE_NAME, Metadata, MetadataError};
use molar_schema::rel_path::{PathParseError, RelPath};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::placement::{PlacementRule, resolve_place};

/// Errors raised while ingesting a tooth archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The file could not be opened or is not a valid zip archive.
    #[error("failed to open archive {}: {source}", path.display())]
    Open {
        /// Path of the archive on disk.
        path: PathBuf,
        /// Underlying zip or I/O failure.
        #[source]
        source: ZipError,
    },

    /// An entry could not be read from the archive.
    #[error("failed to read {name} from archive {}: {source}", path.display())]
    Entry {
        /// Path of the archive on disk.
        path: PathBuf,
        /// Name of the entry being read.
        name: String,
        /// Underlying zip or I/O failure.
        #[source]
        source: ZipError,
    },

    /// The archive has no manifest at the inferred package root.
    #[error("archive {} does not contain {manifest}", path.display())]
    ManifestNotFound {
        /// Path of the archive on disk.
        path: PathBuf,
        /// Expected manifest location inside the archive.
        manifest: String,
    },

    /// The manifest could not be parsed.
    #[error("failed to parse tooth.json in {}: {source}", path.display())]
    Manifest {
        /// Path of the archive on disk.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: MetadataError,
    },

    /// The manifest's asset URL and the externally supplied asset archive
    /// path disagree: either both must be given or neither.
    #[error("asset URL and external asset archive path must be both specified or both empty")]
    AssetMismatch,

    /// An entry name or placement rule is not a valid relative path.
    #[error(transparent)]
    Path(#[from] PathParseError),
}

/// An ingested tooth archive.
///
/// Construction via [`ToothArchive::open`] fully consumes the zip: after it
/// returns, the metadata is validated, every wildcard placement rule has
/// been expanded against the archive's contents, and the file handle is
/// closed. Exactly one of two shapes holds: either the files to place live
/// in this archive itself (then [`asset_root`](Self::asset_root) is the
/// inferred package root) or they come from an external asset archive (then
/// the root is empty).
#[derive(Debug, Clone)]
pub struct ToothArchive {
    metadata: Metadata,
    asset_archive_path: PathBuf,
    asset_root: RelPath,
}

impl ToothArchive {
    /// Opens the zip at `archive_path` and ingests the tooth inside it.
    ///
    /// `external_asset_path` is the local path of a separately downloaded
    /// asset archive. It must be given exactly when the manifest declares an
    /// `asset_url`. In the self-contained case wildcards are resolved
    /// against this archive's entries relative to the inferred root; in the
    /// external case they are resolved against the untrimmed entry list (the
    /// external archive itself is not inspected here).
    pub fn open(
        archive_path: &Path,
        external_asset_path: Option<&Path>,
    ) -> Result<Self, ArchiveError> {
        let open_err = |source| ArchiveError::Open {
            path: archive_path.to_path_buf(),
            source,
        };
        let file = File::open(archive_path).map_err(|e| open_err(ZipError::Io(e)))?;
        let mut zip = ZipArchive::new(file).map_err(open_err)?;

        // Entry names paired with their parsed form, in central-directory
        // order. Directory entries carry no placeable files.
        let mut entries: Vec<(String, RelPath)> = Vec::new();
        for index in 0..zip.len() {
            let entry = zip.by_index_raw(index).map_err(|source| ArchiveError::Entry {
                path: archive_path.to_path_buf(),
                name: format!("#{index}"),
                source,
            })?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let parsed = RelPath::parse(&name)?;
            entries.push((name, parsed));
        }

        let paths: Vec<RelPath> = entries.iter().map(|(_, p)| p.clone()).collect();
        let root = infer_root(&paths);
        tracing::debug!(archive = %archive_path.display(), root = %root, "inferred package root");

        let manifest_rel = root.join(&RelPath::parse(MANIFEST_FILE_NAME)?);
        let manifest_name = entries
            .iter()
            .find(|(_, parsed)| *parsed == manifest_rel)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| ArchiveError::ManifestNotFound {
                path: archive_path.to_path_buf(),
                manifest: manifest_rel.to_string(),
            })?;

        let manifest_bytes = read_entry(&mut zip, archive_path, &manifest_name)?;
        let metadata =
            Metadata::from_slice(&manifest_bytes).map_err(|source| ArchiveError::Manifest {
                path: archive_path.to_path_buf(),
                source,
            })?;

        if metadata.asset_url().is_some() != external_asset_path.is_some() {
            return Err(ArchiveError::AssetMismatch);
        }

        if let Some(external) = external_asset_path {
            let place = resolve_place(metadata.place(), &paths)?;
            Ok(Self {
                metadata: metadata.with_place(place),
                asset_archive_path: external.to_path_buf(),
                asset_root: RelPath::empty(),
            })
        } else {
            let trimmed: Vec<RelPath> = paths.iter().map(|p| p.strip_prefix(&root)).collect();
            let place = resolve_place(metadata.place(), &trimmed)?;
            Ok(Self {
                metadata: metadata.with_place(place),
                asset_archive_path: archive_path.to_path_buf(),
                asset_root: root,
            })
        }
    }

    /// The validated metadata, with wildcard placements already expanded.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Local path of the archive holding the files to place: this archive
    /// itself, or the external asset archive.
    pub fn asset_archive_path(&self) -> &Path {
        &self.asset_archive_path
    }

    /// Root of the package inside the asset archive. Empty when the asset
    /// archive is external.
    pub fn asset_root(&self) -> &RelPath {
        &self.asset_root
    }

    /// The resolved placement rules as parsed paths.
    ///
    /// # Errors
    ///
    /// Returns [`PathParseError`] if a concrete (non-wildcard) manifest rule
    /// that was copied through resolution names an unparseable path.
    pub fn placements(&self) -> Result<Vec<PlacementRule>, PathParseError> {
        self.metadata
            .place()
            .iter()
            .map(|entry| {
                Ok(PlacementRule {
                    src: RelPath::parse(&entry.src)?,
                    dest: RelPath::parse(&entry.dest)?,
                })
            })
            .collect()
    }
}

/// Infers the package root of an archive from its entry paths.
///
/// The root is the longest common path prefix of all entries. A single-entry
/// archive is special-cased: its common prefix would be the entry itself
/// (including the file name), so the root is that entry's parent directory
/// instead.
pub fn infer_root(entries: &[RelPath]) -> RelPath {
    if let [only] = entries {
        return only.parent();
    }
    RelPath::common_prefix(entries)
}

fn read_entry(
    zip: &mut ZipArchive<File>,
    archive_path: &Path,
    name: &str,
) -> Result<Vec<u8>, ArchiveError> {
    let entry_err = |source| ArchiveError::Entry {
        path: archive_path.to_path_buf(),
        name: name.to_string(),
        source,
    };
    let mut entry = zip.by_name(name).map_err(entry_err)?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| entry_err(ZipError::Io(e)))?;
    Ok(bytes)
}

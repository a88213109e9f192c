//! Listing and looking up installed tooth manifests.
//!
//! Installed packages persist one manifest-shaped JSON file each in a
//! metadata directory. File names carry no meaning; identity is the `tooth`
//! field inside each file. The directory is scanned fresh on every call,
//! never cached, and this module never writes to it.

use std::path::{Path, PathBuf};

use molar_schema::metadata::{Metadata, MetadataError};
use thiserror::Error;

/// Errors raised while reading the installed-package metadata directory.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The metadata directory could not be scanned.
    #[error("failed to scan metadata directory {}: {source}", dir.display())]
    Scan {
        /// The directory being scanned.
        dir: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A metadata file could not be read.
    #[error("failed to read metadata file {}: {source}", path.display())]
    Read {
        /// The offending file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A metadata file could not be parsed. The local store is trusted, so
    /// corruption aborts the whole listing rather than being skipped.
    #[error("failed to parse metadata file {}: {source}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: MetadataError,
    },

    /// No installed tooth matches the requested repository path.
    #[error("cannot find installed tooth metadata: {0}")]
    NotFound(String),
}

/// Lists the metadata of every installed tooth.
///
/// Reads every `*.json` file in `metadata_dir` and parses each one; the
/// first unreadable or unparseable file fails the whole listing. The result
/// is sorted ascending, case-insensitively, by repository path, and repeated
/// calls against an unchanged directory return identical orderings.
pub fn list_all(metadata_dir: &Path) -> Result<Vec<Metadata>, RegistryError> {
    let scan_err = |source| RegistryError::Scan {
        dir: metadata_dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for dir_entry in std::fs::read_dir(metadata_dir).map_err(scan_err)? {
        let dir_entry = dir_entry.map_err(scan_err)?;
        let path = dir_entry.path();
        let is_file = dir_entry.file_type().map_err(scan_err)?.is_file();
        if is_file && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    // Directory iteration order is platform-dependent; sort so that the
    // fail-fast behavior below surfaces the same error every time.
    files.sort();

    let mut list = Vec::with_capacity(files.len());
    for path in files {
        let bytes = std::fs::read(&path).map_err(|source| RegistryError::Read {
            path: path.clone(),
            source,
        })?;
        let metadata =
            Metadata::from_slice(&bytes).map_err(|source| RegistryError::Parse { path, source })?;
        list.push(metadata);
    }

    list.sort_by_cached_key(|m| m.tooth_repo_path().to_lowercase());
    tracing::debug!(dir = %metadata_dir.display(), count = list.len(), "listed installed teeth");
    Ok(list)
}

/// Whether a tooth with exactly this repository path is installed.
///
/// The match is case-sensitive, unlike the ordering of [`list_all`].
pub fn is_installed(metadata_dir: &Path, repo_path: &str) -> Result<bool, RegistryError> {
    let list = list_all(metadata_dir)?;
    Ok(list.iter().any(|m| m.tooth_repo_path() == repo_path))
}

/// Finds the installed metadata for exactly this repository path.
pub fn find(metadata_dir: &Path, repo_path: &str) -> Result<Metadata, RegistryError> {
    list_all(metadata_dir)?
        .into_iter()
        .find(|m| m.tooth_repo_path() == repo_path)
        .ok_or_else(|| RegistryError::NotFound(repo_path.to_string()))
}

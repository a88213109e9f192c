//! Manifest ingestion and version resolution for tooth packages.
//!
//! A tooth ships as a zip archive containing a `tooth.json` manifest plus
//! files to install. This crate covers the two algorithmic subsystems of the
//! package manager:
//!
//! - **archive ingestion** ([`archive`], [`placement`]) — locating the
//!   package root inside an arbitrarily nested zip, loading the manifest,
//!   and expanding wildcard placement rules into concrete mappings;
//! - **version resolution** ([`versions`], [`fetch`]) — fetching a tooth's
//!   version index from a module-proxy-style listing service, parsing it
//!   tolerantly, and selecting the latest stable release.
//!
//! The [`registry`] module lists previously installed manifests from a local
//! metadata directory. Everything here is synchronous and free of shared
//! state: each operation is a pure function of its explicit arguments, and
//! directories and proxy URLs are always passed in rather than read from
//! process-wide configuration.

pub mod archive;
pub mod fetch;
pub mod placement;
pub mod registry;
pub mod versions;

// Re-exports
#[cfg(feature = "network")]
pub use fetch::HttpFetcher;
pub use fetch::{Fetch, FetchError};

pub use archive::{ArchiveError, ToothArchive};
pub use placement::{PlacementRule, resolve_place};
pub use registry::RegistryError;
pub use versions::{VersionError, fetch_versions, latest_stable};

//! Fetching and selecting tooth versions from a module-proxy index.
//!
//! The index is a newline-separated list of version strings, optionally
//! `v`-prefixed and `+incompatible`-suffixed. It comes from an untrusted
//! remote service, so individual lines that fail to parse are skipped
//! rather than failing the whole fetch — the opposite policy from the
//! trusted local registry, where corruption is loud.

use molar_schema::repo::{RepoPathError, validate_repo_path, version_list_url};
use semver::Version;
use thiserror::Error;

use crate::fetch::{Fetch, FetchError};

/// Errors raised while resolving a tooth's versions.
#[derive(Error, Debug)]
pub enum VersionError {
    /// The repository path is not module-style.
    #[error("invalid repository path {path:?}: {source}")]
    InvalidRepoPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        #[source]
        source: RepoPathError,
    },

    /// The fetch collaborator failed; its error is carried verbatim.
    #[error("failed to fetch version list for {path}: {source}")]
    Fetch {
        /// Repository path whose index was being fetched.
        path: String,
        /// The collaborator's failure.
        #[source]
        source: FetchError,
    },

    /// The version list contains no release without a pre-release component.
    #[error("cannot find latest stable version")]
    NoStableVersion,
}

/// Fetches the available versions of a tooth, sorted descending.
///
/// Validates `repo_path`, builds the index URL on `proxy_base_url`, fetches
/// it through `fetcher`, and parses the response tolerantly: one version per
/// line, unparseable lines skipped. The returned list is ordered by
/// descending semantic-version precedence.
pub fn fetch_versions(
    fetcher: &dyn Fetch,
    repo_path: &str,
    proxy_base_url: &str,
) -> Result<Vec<Version>, VersionError> {
    validate_repo_path(repo_path).map_err(|source| VersionError::InvalidRepoPath {
        path: repo_path.to_string(),
        source,
    })?;

    let url = version_list_url(repo_path, proxy_base_url);
    let body = fetcher.fetch(&url).map_err(|source| VersionError::Fetch {
        path: repo_path.to_string(),
        source,
    })?;

    let mut versions = parse_version_lines(&body);
    versions.sort();
    versions.reverse();
    tracing::debug!(repo = repo_path, count = versions.len(), "fetched version list");
    Ok(versions)
}

/// Parses one version per line, skipping lines that are not versions.
fn parse_version_lines(body: &[u8]) -> Vec<Version> {
    let text = String::from_utf8_lossy(body);
    let mut versions = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let stripped = line.strip_prefix('v').unwrap_or(line);
        let stripped = stripped.strip_suffix("+incompatible").unwrap_or(stripped);
        match Version::parse(stripped) {
            Ok(version) => versions.push(version),
            Err(_) => tracing::debug!(line, "skipping unparseable version line"),
        }
    }
    versions
}

/// Picks the latest stable version from a descending version list.
///
/// Returns the first entry with an empty pre-release component, or
/// [`VersionError::NoStableVersion`] if there is none (including an empty
/// list).
pub fn latest_stable(versions: &[Version]) -> Result<Version, VersionError> {
    versions
        .iter()
        .find(|version| version.pre.is_empty())
        .cloned()
        .ok_or(VersionError::NoStableVersion)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(&'static str);

    impl Fetch for StaticFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    struct FailingFetcher;

    impl Fetch for FailingFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::new(std::io::Error::other("connection refused")))
        }
    }

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    #[test]
    fn parses_tolerantly_and_sorts_descending() {
        let fetcher = StaticFetcher("v1.2.3\n2.0.0+incompatible\nnot-a-version\nv1.3.0-rc1\n");
        let versions =
            fetch_versions(&fetcher, "example.com/org/pkg", "https://proxy").expect("fetch");
        assert_eq!(versions, [v("2.0.0"), v("1.3.0-rc1"), v("1.2.3")]);
    }

    #[test]
    fn empty_body_yields_empty_list() {
        let fetcher = StaticFetcher("");
        let versions =
            fetch_versions(&fetcher, "example.com/org/pkg", "https://proxy").expect("fetch");
        assert!(versions.is_empty());
    }

    #[test]
    fn rejects_invalid_repo_paths_before_fetching() {
        let err = fetch_versions(&FailingFetcher, "no-dots/pkg", "https://proxy")
            .expect_err("must not fetch");
        assert!(matches!(err, VersionError::InvalidRepoPath { .. }));
    }

    #[test]
    fn propagates_fetch_failures() {
        let err = fetch_versions(&FailingFetcher, "example.com/org/pkg", "https://proxy")
            .expect_err("fetch fails");
        match err {
            VersionError::Fetch { path, source } => {
                assert_eq!(path, "example.com/org/pkg");
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn latest_stable_skips_pre_releases() {
        let versions = [v("2.1.0-beta.1"), v("2.0.0"), v("1.9.0")];
        assert_eq!(latest_stable(&versions).expect("stable"), v("2.0.0"));
    }

    #[test]
    fn latest_stable_fails_without_stable_entries() {
        assert!(matches!(
            latest_stable(&[]),
            Err(VersionError::NoStableVersion)
        ));
        assert!(matches!(
            latest_stable(&[v("1.0.0-rc1"), v("0.9.0-alpha")]),
            Err(VersionError::NoStableVersion)
        ));
    }
}

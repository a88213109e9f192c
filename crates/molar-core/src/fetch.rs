//! The network collaborator seam for version resolution.
//!
//! Version resolution needs exactly one capability from the outside world:
//! fetch the bytes at a URL or fail. [`Fetch`] captures that seam so the
//! resolver stays a pure function of its inputs; [`HttpFetcher`] is the
//! production implementation over a blocking HTTP client.

use thiserror::Error;

/// A failure reported by the fetch collaborator, propagated verbatim.
///
/// This core applies no retry, backoff, or classification of its own; the
/// underlying error is carried through untouched.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct FetchError(Box<dyn std::error::Error + Send + Sync>);

impl FetchError {
    /// Wraps a collaborator's error.
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self(err.into())
    }
}

/// Blocking byte fetcher for version-index URLs.
///
/// Timeout, retry, and cancellation policy belong to implementations; the
/// resolver issues a single call per operation and propagates failures
/// unchanged.
pub trait Fetch {
    /// Fetches the response body at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches over HTTP with a shared blocking client.
#[cfg(feature = "network")]
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl HttpFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher with a preconfigured client, e.g. to set timeouts
    /// or a proxy.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "network")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(FetchError::new)?;
        let body = response.bytes().map_err(FetchError::new)?;
        Ok(body.to_vec())
    }
}

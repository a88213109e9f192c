//! Module-style repository paths and version-index URLs.
//!
//! A tooth is identified by a hierarchical path like `example.com/org/name`,
//! which doubles as the lookup key on a module-proxy-style listing service.
//! The proxy convention case-escapes uppercase letters (`X` becomes `!x`) so
//! that paths stay unambiguous on case-insensitive file systems.

use thiserror::Error;

/// Reasons a string is not a valid module-style repository path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoPathError {
    /// The path is empty.
    #[error("repository path is empty")]
    Empty,

    /// A `/`-separated element is empty.
    #[error("repository path has an empty element")]
    EmptyElement,

    /// The leading element must look like a host name: lowercase, with at
    /// least one dot.
    #[error("leading element {0:?} must be a host name containing a dot")]
    BadHost(String),

    /// An element begins or ends with a dot.
    #[error("element {0:?} may not begin or end with a dot")]
    DotElement(String),

    /// An element contains a character outside the allowed set.
    #[error("element {0:?} contains invalid character {1:?}")]
    BadCharacter(String, char),
}

/// Checks that `path` is a well-formed module-style repository path.
///
/// Elements are separated by `/` and limited to ASCII letters, digits, and
/// `-._~`. The leading element must be a plausible host name: lowercase, not
/// starting with a dash, containing at least one dot.
pub fn validate_repo_path(path: &str) -> Result<(), RepoPathError> {
    if path.is_empty() {
        return Err(RepoPathError::Empty);
    }

    let mut elements = path.split('/');
    let host = elements.next().unwrap_or_default();
    check_host(host)?;
    for element in elements {
        check_element(element)?;
    }
    Ok(())
}

fn check_host(host: &str) -> Result<(), RepoPathError> {
    if host.is_empty() {
        return Err(RepoPathError::EmptyElement);
    }
    if !host.contains('.') || host.starts_with('-') || host.starts_with('.') || host.ends_with('.')
    {
        return Err(RepoPathError::BadHost(host.to_string()));
    }
    for ch in host.chars() {
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '.' || ch == '-') {
            return Err(RepoPathError::BadHost(host.to_string()));
        }
    }
    Ok(())
}

fn check_element(element: &str) -> Result<(), RepoPathError> {
    if element.is_empty() {
        return Err(RepoPathError::EmptyElement);
    }
    if element.starts_with('.') || element.ends_with('.') {
        return Err(RepoPathError::DotElement(element.to_string()));
    }
    for ch in element.chars() {
        if !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')) {
            return Err(RepoPathError::BadCharacter(element.to_string(), ch));
        }
    }
    Ok(())
}

/// Builds the version-list URL for `repo_path` on the given proxy.
///
/// Follows the module-proxy "list versions" convention:
/// `{proxy}/{case-escaped path}/@v/list`.
pub fn version_list_url(repo_path: &str, proxy_base_url: &str) -> String {
    format!(
        "{}/{}/@v/list",
        proxy_base_url.trim_end_matches('/'),
        case_escape(repo_path)
    )
}

/// Case-escapes a repository path: each uppercase letter `X` becomes `!x`.
fn case_escape(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for ch in path.chars() {
        if ch.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(ch.to_ascii_lowercase());
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

//! Normalized relative paths with `/` separators.
//!
//! Zip entry names, manifest placement rules, and archive roots all use the
//! same `/`-separated relative form regardless of platform. [`RelPath`] keeps
//! that form normalized and provides the prefix operations that root
//! inference and wildcard expansion are built on, so that no raw string
//! slicing happens anywhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a string cannot be interpreted as a relative path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// The path starts with `/`; only relative paths are meaningful here.
    #[error("path {0:?} is absolute")]
    Absolute(String),

    /// The path contains a `..` segment and would escape its root.
    #[error("path {0:?} escapes its root")]
    ParentTraversal(String),

    /// The path contains a character with no portable meaning (`\` or NUL).
    #[error("path {0:?} contains an invalid character")]
    InvalidCharacter(String),
}

/// A normalized, `/`-separated relative path.
///
/// Parsing drops empty and `.` segments, so `"a//./b"` equals `"a/b"`. The
/// empty path is a valid value and acts as the identity for [`RelPath::join`]
/// and as a prefix of every path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelPath {
    segments: Vec<String>,
}

impl RelPath {
    /// Parses a `/`-separated relative path, normalizing it.
    pub fn parse(s: &str) -> Result<Self, PathParseError> {
        if s.contains('\\') || s.contains('\0') {
            return Err(PathParseError::InvalidCharacter(s.to_string()));
        }
        if s.starts_with('/') {
            return Err(PathParseError::Absolute(s.to_string()));
        }

        let mut segments = Vec::new();
        for segment in s.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(PathParseError::ParentTraversal(s.to_string())),
                _ => segments.push(segment.to_string()),
            }
        }
        Ok(Self { segments })
    }

    /// The empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this is the empty path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The normalized segments of this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Appends `other` to this path.
    pub fn join(&self, other: &RelPath) -> RelPath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        RelPath { segments }
    }

    /// The parent directory of this path. The empty path is its own parent.
    pub fn parent(&self) -> RelPath {
        let mut segments = self.segments.clone();
        segments.pop();
        RelPath { segments }
    }

    /// Whether `prefix` is a segment-wise prefix of this path.
    ///
    /// The empty path is a prefix of everything; every path is a prefix of
    /// itself.
    pub fn has_prefix(&self, prefix: &RelPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Removes `prefix` from the front of this path.
    ///
    /// If `prefix` is not actually a prefix, the path is returned unchanged.
    pub fn strip_prefix(&self, prefix: &RelPath) -> RelPath {
        if self.has_prefix(prefix) {
            RelPath {
                segments: self.segments[prefix.segments.len()..].to_vec(),
            }
        } else {
            self.clone()
        }
    }

    /// The longest path that is a segment-wise prefix of every given path.
    ///
    /// An empty input yields the empty path. Note that for a single path the
    /// common prefix is the path itself, including its final file segment;
    /// callers that want a directory must take the parent themselves.
    pub fn common_prefix(paths: &[RelPath]) -> RelPath {
        let Some((first, rest)) = paths.split_first() else {
            return RelPath::empty();
        };

        let mut len = first.segments.len();
        for path in rest {
            let shared = first
                .segments
                .iter()
                .zip(&path.segments)
                .take_while(|(a, b)| a == b)
                .count();
            len = len.min(shared);
        }
        RelPath {
            segments: first.segments[..len].to_vec(),
        }
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for RelPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RelPath {
    type Error = PathParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<RelPath> for String {
    fn from(path: RelPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> RelPath {
        RelPath::parse(s).expect("valid path")
    }

    #[test]
    fn parse_normalizes_segments() {
        assert_eq!(p("a//./b/"), p("a/b"));
        assert_eq!(p("").segments().len(), 0);
        assert!(p("").is_empty());
        assert_eq!(p("a/b").to_string(), "a/b");
    }

    #[test]
    fn parse_rejects_invalid_paths() {
        assert!(matches!(
            RelPath::parse("/etc/passwd"),
            Err(PathParseError::Absolute(_))
        ));
        assert!(matches!(
            RelPath::parse("a/../b"),
            Err(PathParseError::ParentTraversal(_))
        ));
        assert!(matches!(
            RelPath::parse("a\\b"),
            Err(PathParseError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn join_and_parent() {
        assert_eq!(p("a/b").join(&p("c")), p("a/b/c"));
        assert_eq!(p("").join(&p("c")), p("c"));
        assert_eq!(p("a/b").join(&p("")), p("a/b"));
        assert_eq!(p("a/b/c").parent(), p("a/b"));
        assert_eq!(p("a").parent(), p(""));
        assert_eq!(p("").parent(), p(""));
    }

    #[test]
    fn prefix_operations() {
        assert!(p("assets/sub/b.png").has_prefix(&p("assets")));
        assert!(!p("assets2/x").has_prefix(&p("assets")));
        assert!(p("a/b").has_prefix(&p("")));
        assert!(p("a/b").has_prefix(&p("a/b")));

        assert_eq!(p("assets/sub/b.png").strip_prefix(&p("assets")), p("sub/b.png"));
        assert_eq!(p("a/b").strip_prefix(&p("a/b")), p(""));
        // Not a prefix: path comes back unchanged.
        assert_eq!(p("other/c.png").strip_prefix(&p("assets")), p("other/c.png"));
    }

    #[test]
    fn common_prefix_of_many() {
        let paths = [p("pkgs/A/tooth.json"), p("pkgs/A/file.txt")];
        assert_eq!(RelPath::common_prefix(&paths), p("pkgs/A"));

        let disjoint = [p("a/x"), p("b/x")];
        assert_eq!(RelPath::common_prefix(&disjoint), p(""));

        assert_eq!(RelPath::common_prefix(&[]), p(""));
    }

    #[test]
    fn common_prefix_of_one_is_the_path_itself() {
        // The single-path prefix includes the file segment; root inference
        // relies on taking the parent afterwards.
        assert_eq!(RelPath::common_prefix(&[p("a/tooth.json")]), p("a/tooth.json"));
    }

    #[test]
    fn serde_round_trip() {
        let path: RelPath = serde_json::from_str("\"a/b/c\"").expect("deserialize");
        assert_eq!(path, p("a/b/c"));
        assert_eq!(serde_json::to_string(&path).expect("serialize"), "\"a/b/c\"");
        assert!(serde_json::from_str::<RelPath>("\"../up\"").is_err());
    }
}

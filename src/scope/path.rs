//! Repository-relative paths and segment-prefix matching.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScopeError;

/// Splits a raw path into normalized segments.
///
/// Both `/` and `\` separate segments. Empty and `.` segments are dropped and
/// `..` removes the segment before it; a leading `..` with nothing to remove
/// is kept so callers can detect paths that climb out of the root.
pub fn normalize_segments(raw: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    segments
}

/// A normalized path relative to the repository root.
///
/// Used for the package root and for every configured dependency root. It is
/// never empty, never absolute and never points above the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoPath {
    segments: Vec<String>,
}

impl RepoPath {
    /// Normalizes `raw` into a repository path.
    pub fn new(raw: &str) -> Result<Self, ScopeError> {
        let trimmed = raw.trim();
        let invalid = |reason| ScopeError::InvalidPath {
            path: raw.to_string(),
            reason,
        };

        if is_absolute(trimmed) {
            return Err(invalid("must be relative to the repository root"));
        }

        let segments = normalize_segments(trimmed);
        match segments.first().copied() {
            None => Err(invalid("resolves to the repository root itself")),
            Some("..") => Err(invalid("points outside the repository")),
            Some(_) => Ok(Self {
                segments: segments.into_iter().map(str::to_string).collect(),
            }),
        }
    }

    /// Builds a repository path from a filesystem path that is already
    /// relative to the repository root.
    pub fn from_relative(path: &Path) -> Result<Self, ScopeError> {
        Self::new(&path.to_string_lossy())
    }

    /// Returns true when `file` is this path or lies beneath it.
    ///
    /// Every segment of `self` must equal the file segment at the same index,
    /// so `packages/foo` contains `packages/foo/a.js` but not
    /// `packages/foobar/a.js` and not `packages`.
    pub fn contains(&self, file: &str) -> bool {
        self.contains_segments(&normalize_segments(file))
    }

    pub(crate) fn contains_segments(&self, file: &[&str]) -> bool {
        self.segments.len() <= file.len()
            && self
                .segments
                .iter()
                .zip(file)
                .all(|(root, file)| root == file)
    }
}

// Rooted paths and drive prefixes such as `C:` or `C:\work`.
fn is_absolute(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let drive = bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes.get(2), None | Some(b'/' | b'\\'));
    raw.starts_with(['/', '\\']) || drive
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl std::str::FromStr for RepoPath {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for RepoPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RepoPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

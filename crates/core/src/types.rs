//! Type-path normalization and dispatch-key construction.
//!
//! Upstream content types arrive either as a slash-delimited path
//! (`"Content/Page/Article"`) or as an explicit segment list, in
//! least-specific-to-most-specific order. Normalization turns either form
//! into the canonical segment list used for renderer dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when joining a dispatch key into its string form.
///
/// Reserved: type segments must not contain it.
pub const KEY_SEPARATOR: &str = "/";

/// Sentinel key for empty or blank type paths, so "no type" stays addressable.
pub const EMPTY_KEY: &str = "$empty";

/// The universal base type present on every content item. Stripped from
/// dispatch keys because it carries no dispatch information.
pub const BASE_TYPE: &str = "Content";

/// Leading marker on internal type names, stripped before comparison.
const INTERNAL_MARKER: char = '_';

/// Raw type declaration as delivered by the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypePath {
    /// Slash-delimited path, e.g. `"Content/Page/Article"`.
    Joined(String),
    /// Explicit segment list, least specific first.
    Segments(Vec<String>),
}

impl TypePath {
    /// Returns the raw segments without any normalization applied.
    pub fn raw_segments(&self) -> Vec<String> {
        match self {
            TypePath::Joined(path) => path
                .split(KEY_SEPARATOR)
                .map(|s| s.to_string())
                .collect(),
            TypePath::Segments(segments) => segments.clone(),
        }
    }
}

impl From<&str> for TypePath {
    fn from(path: &str) -> Self {
        TypePath::Joined(path.to_string())
    }
}

impl From<String> for TypePath {
    fn from(path: String) -> Self {
        TypePath::Joined(path)
    }
}

impl From<Vec<String>> for TypePath {
    fn from(segments: Vec<String>) -> Self {
        TypePath::Segments(segments)
    }
}

impl From<&[&str]> for TypePath {
    fn from(segments: &[&str]) -> Self {
        TypePath::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TypePath {
    fn from(segments: [&str; N]) -> Self {
        TypePath::Segments(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Normalizes a raw type declaration into canonical segments.
///
/// Empty segments are dropped and one leading `_` internal marker is
/// stripped from each segment. With `strip_base` set, segments equal to
/// [`BASE_TYPE`] (case-insensitive) are removed as well. Returns `None`
/// when nothing survives.
pub fn normalize(types: Option<&TypePath>, strip_base: bool) -> Option<Vec<String>> {
    let raw = types?.raw_segments();
    let segments: Vec<String> = raw
        .iter()
        .map(|segment| segment.strip_prefix(INTERNAL_MARKER).unwrap_or(segment))
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !strip_base || !segment.eq_ignore_ascii_case(BASE_TYPE))
        .map(|segment| segment.to_string())
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Normalizes with the base type stripped, then ensures the first
/// (least-specific) segment equals `prefix`, inserting it when absent.
pub fn normalize_and_prefix(types: Option<&TypePath>, prefix: &str) -> Vec<String> {
    let mut segments = normalize(types, true).unwrap_or_default();
    if segments.first().map(String::as_str) != Some(prefix) {
        segments.insert(0, prefix.to_string());
    }
    segments
}

/// Canonical registry lookup key: normalized type segments, least specific
/// first. Never contains the universal base type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    segments: Vec<String>,
}

impl DispatchKey {
    /// Builds a key from already-normalized segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Builds a key from raw type data, falling back to the sentinel key
    /// when nothing survives normalization.
    pub fn from_types(types: Option<&TypePath>) -> Self {
        match normalize(types, true) {
            Some(segments) => Self { segments },
            None => Self::empty(),
        }
    }

    /// The reserved sentinel key for untyped content.
    pub fn empty() -> Self {
        Self {
            segments: vec![EMPTY_KEY.to_string()],
        }
    }

    /// Returns true for the sentinel key.
    pub fn is_empty_sentinel(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == EMPTY_KEY
    }

    /// The normalized segments, least specific first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The joined string form used as the registry table key.
    pub fn joined(&self) -> String {
        self.segments.join(KEY_SEPARATOR)
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

//! Field-path addressing.
//!
//! Every address into a check's value tree is a dotted string such as
//! `settings.multihttp.entries.1.checks.0.expression`. This module is the one
//! place that builds, matches and normalizes those strings:
//!
//! - [`create_path`] / [`field_path!`](crate::field_path) join name and index segments.
//! - [`FieldMatcher`] describes which paths a wizard section owns, either as a
//!   literal prefix or as a regular expression over the shape of a path.
//! - [`WildcardRules`] rewrites list indices inside configured repeatable
//!   lists to the sentinel [`WILDCARD_INDEX`], so a static matcher such as
//!   `settings.multihttp.entries.-1.checks` covers every entry.
//!
//! # Example
//!
//! ```
//! use checkform::path::{FieldMatcher, normalize_index};
//! use checkform::field_path;
//!
//! let path = field_path!("settings", "multihttp", "entries", 1, "checks", 0, "expression");
//! let normalized = normalize_index(&path.to_string());
//! assert_eq!(normalized, "settings.multihttp.entries.-1.checks.-1.expression");
//!
//! let matcher = FieldMatcher::field("settings.multihttp.entries.-1.checks");
//! assert!(matcher.matches(&normalized));
//! ```

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel that replaces a list index in a normalized path.
///
/// It can never be a legitimate array index, so the rewrite is unambiguous.
pub const WILDCARD_INDEX: &str = "-1";

/// Default separator used to join error paths for pattern matchers.
pub const DEFAULT_PATH_SEPARATOR: &str = ",";

/// Returns true for segments matching `^[0-9]+$`.
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// PathSegment / FieldPath
// ============================================================================

/// One segment of a field path: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named field.
    Key(String),
    /// A position in a list.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Integer literals default to `i32`. A negative value becomes the wildcard
/// key, so `field_path!("entries", -1)` spells a normalized matcher.
impl From<i32> for PathSegment {
    fn from(index: i32) -> Self {
        match usize::try_from(index) {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Key(WILDCARD_INDEX.to_string()),
        }
    }
}

/// A structured field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// An empty path (the root of the value tree).
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Return a copy of this path extended by a key segment.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Key(key.into()));
        next
    }

    /// Return a copy of this path extended by an index segment.
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Index(index));
        next
    }

    /// The segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Join name and index segments with `.`.
///
/// ```
/// use checkform::path::{create_path, PathSegment};
///
/// let path = create_path([PathSegment::from("settings"), PathSegment::from(2usize)]);
/// assert_eq!(path, "settings.2");
/// ```
pub fn create_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<PathSegment>,
{
    FieldPath::from_segments(segments).to_string()
}

/// Build a [`FieldPath`] from mixed name and index segments.
///
/// ```
/// use checkform::field_path;
///
/// let path = field_path!("settings", "multihttp", "entries", 2, "checks", 0, "expression");
/// assert_eq!(path.to_string(), "settings.multihttp.entries.2.checks.0.expression");
/// ```
#[macro_export]
macro_rules! field_path {
    ($($segment:expr),* $(,)?) => {
        $crate::path::FieldPath::from_segments(
            [$($crate::path::PathSegment::from($segment)),*]
        )
    };
}

// ============================================================================
// FieldMatcher
// ============================================================================

/// Describes which error paths belong to a wizard section.
#[derive(Debug, Clone)]
pub enum FieldMatcher {
    /// A dotted path; matches itself and everything beneath it.
    Field(String),
    /// A regular expression describing the shape of an offending path.
    Pattern(Regex),
}

impl FieldMatcher {
    /// Create a literal path matcher.
    pub fn field(path: impl Into<String>) -> Self {
        Self::Field(path.into())
    }

    /// Compile a pattern matcher.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| Error::invalid_pattern(pattern, source))
    }

    /// Test a single error path.
    ///
    /// A literal matcher accepts the path itself or any descendant of it.
    pub fn matches(&self, error_path: &str) -> bool {
        match self {
            Self::Field(field) => matches_field(field, error_path),
            Self::Pattern(regex) => regex.is_match(error_path),
        }
    }

    /// Test a set of error paths.
    ///
    /// A literal matcher is checked against each path. A pattern is tested once
    /// against all paths joined by `separator`, so it only needs to describe
    /// the shape of an offending path rather than enumerate indices.
    pub fn matches_any<S: AsRef<str>>(&self, error_paths: &[S], separator: &str) -> bool {
        match self {
            Self::Field(field) => error_paths.iter().any(|p| matches_field(field, p.as_ref())),
            Self::Pattern(regex) => {
                if error_paths.is_empty() {
                    return false;
                }
                let joined = error_paths
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<_>>()
                    .join(separator);
                regex.is_match(&joined)
            }
        }
    }
}

impl PartialEq for FieldMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Field(a), Self::Field(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for FieldMatcher {}

impl fmt::Display for FieldMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.write_str(field),
            Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl From<&str> for FieldMatcher {
    fn from(path: &str) -> Self {
        Self::field(path)
    }
}

impl From<FieldPath> for FieldMatcher {
    fn from(path: FieldPath) -> Self {
        Self::Field(path.to_string())
    }
}

impl From<Regex> for FieldMatcher {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

/// Literal matching rule: equal, or a descendant of `matcher`.
pub fn matches_field(matcher: &str, error_path: &str) -> bool {
    if matcher.is_empty() {
        return false;
    }
    error_path == matcher
        || error_path
            .strip_prefix(matcher)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Drop the holes of a sparse matcher list.
///
/// Some call sites build matcher lists keyed by tab index and leave gaps.
pub fn compact_matchers<I>(matchers: I) -> Vec<FieldMatcher>
where
    I: IntoIterator<Item = Option<FieldMatcher>>,
{
    matchers.into_iter().flatten().collect()
}

// ============================================================================
// Wildcarding
// ============================================================================

/// Per-list wildcarding rules.
///
/// Each rule is the dotted prefix of a repeatable list. Every numeric segment
/// after a matching prefix is rewritten to [`WILDCARD_INDEX`]. A `-1` segment
/// inside a prefix matches any index, so rules can target nested lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WildcardRules {
    prefixes: Vec<String>,
}

impl WildcardRules {
    /// Rules that wildcard nothing.
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Build rules from list prefixes.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one list prefix.
    pub fn with_list(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// The configured list prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Rewrite list indices under any configured prefix. Idempotent.
    pub fn normalize(&self, path: &str) -> String {
        let segments: Vec<&str> = path.split('.').collect();
        let Some(start) = self
            .prefixes
            .iter()
            .filter_map(|prefix| prefix_len(prefix, &segments))
            .min()
        else {
            return path.to_string();
        };

        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i >= start && is_index_segment(segment) {
                    WILDCARD_INDEX
                } else {
                    *segment
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl Default for WildcardRules {
    fn default() -> Self {
        Self::new(["settings.multihttp.entries"])
    }
}

/// Number of path segments covered by `prefix`, if it matches.
fn prefix_len(prefix: &str, segments: &[&str]) -> Option<usize> {
    let prefix: Vec<&str> = prefix.split('.').filter(|s| !s.is_empty()).collect();
    if prefix.is_empty() || prefix.len() > segments.len() {
        return None;
    }
    let matched = prefix.iter().zip(segments).all(|(want, got)| {
        want == got || (*want == WILDCARD_INDEX && (is_index_segment(got) || *got == WILDCARD_INDEX))
    });
    matched.then_some(prefix.len())
}

/// Normalize with the default rules (`settings.multihttp.entries`).
pub fn normalize_index(path: &str) -> String {
    WildcardRules::default().normalize(path)
}

//! Schema validation of a whole check.
//!
//! A [`CheckSchema`] validates the full value tree under one variant and
//! reports every failing field as a [`ValidationIssue`]. Validation never
//! fails with `Err`: an invalid check is an ordinary [`ValidationOutcome`].
//!
//! Collaborator data the schema needs (tenant limits, available probes,
//! feature flags) arrives already resolved in a [`ValidationContext`].

mod rules;
mod schemas;

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::check::Check;
use crate::path::FieldPath;

pub use schemas::StandardSchema;

// ============================================================================
// ValidationIssue / ValidationOutcome
// ============================================================================

/// A failing field and why it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Where the failure is attached. A failure of a list as a whole is
    /// attached to the list's own path.
    pub path: FieldPath,
    /// User-facing message.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The result of validating a check against a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    /// A successful outcome.
    pub fn valid() -> Self {
        Self::default()
    }

    /// An outcome carrying `issues`; valid when the list is empty.
    pub fn with_issues(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Check if the validation passed.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// The failing fields.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// First message, if any.
    pub fn first_message(&self) -> Option<&str> {
        self.issues.first().map(|i| i.message.as_str())
    }

    /// Record a failure.
    pub fn add(&mut self, path: FieldPath, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, message));
    }

    /// Merge another outcome into this one.
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.issues.extend(other.issues);
    }

    /// Flatten into a sorted, de-duplicated list of dotted error paths.
    pub fn error_paths(&self) -> Vec<String> {
        self.issues
            .iter()
            .map(|issue| issue.path.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The message attached to `path`, if any.
    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.path.to_string() == path)
            .map(|issue| issue.message.as_str())
    }
}

// ============================================================================
// ValidationContext
// ============================================================================

/// Per-tenant limits, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantLimits {
    pub max_labels_per_check: usize,
    pub max_multihttp_entries: usize,
    pub max_assertions_per_entry: usize,
}

impl Default for TenantLimits {
    fn default() -> Self {
        Self {
            max_labels_per_check: 10,
            max_multihttp_entries: 10,
            max_assertions_per_entry: 20,
        }
    }
}

/// A probe location a check can run from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub id: u64,
    pub name: String,
    pub public: bool,
    pub online: bool,
}

/// Resolved feature-flag predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    enabled: HashSet<String>,
}

impl FeatureFlags {
    /// Per-check alert rows are validated only behind this flag.
    pub const ALERTS_PER_CHECK: &'static str = "alerts-per-check";

    pub fn new<I, S>(enabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: enabled.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_enabled(&self, flag: &str) -> bool {
        self.enabled.contains(flag)
    }
}

/// Everything a schema reads besides the check itself.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub limits: TenantLimits,
    /// Known probes. An empty list disables the unknown-probe rule.
    pub probes: Vec<Probe>,
    pub flags: FeatureFlags,
}

impl ValidationContext {
    pub fn with_limits(mut self, limits: TenantLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_probes(mut self, probes: Vec<Probe>) -> Self {
        self.probes = probes;
        self
    }

    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }
}

// ============================================================================
// CheckSchema
// ============================================================================

/// A full-check validation ruleset for one variant.
pub trait CheckSchema: Send + Sync {
    /// Validate every field of `check`.
    fn validate(&self, check: &Check, context: &ValidationContext) -> ValidationOutcome;
}

impl<F> CheckSchema for F
where
    F: Fn(&Check, &ValidationContext) -> ValidationOutcome + Send + Sync,
{
    fn validate(&self, check: &Check, context: &ValidationContext) -> ValidationOutcome {
        self(check, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_path;

    #[test]
    fn test_outcome_flattens_and_dedupes() {
        let mut outcome = ValidationOutcome::valid();
        assert!(outcome.is_valid());

        outcome.add(field_path!("target"), "Target is required");
        outcome.add(field_path!("labels", 0, "name"), "Invalid label name");
        outcome.add(field_path!("target"), "Target must be a URL");

        assert!(!outcome.is_valid());
        assert_eq!(outcome.error_paths(), vec!["labels.0.name", "target"]);
        assert_eq!(outcome.first_message(), Some("Target is required"));
        assert_eq!(outcome.message_for("labels.0.name"), Some("Invalid label name"));
    }

    #[test]
    fn test_closure_schema() {
        let schema = |_: &Check, _: &ValidationContext| {
            ValidationOutcome::with_issues(vec![ValidationIssue::new(field_path!("job"), "nope")])
        };
        let check = crate::check::default_check(crate::check::CheckType::Ping);
        let outcome = schema.validate(&check, &ValidationContext::default());
        assert_eq!(outcome.error_paths(), vec!["job"]);
    }

    #[test]
    fn test_feature_flags() {
        let flags = FeatureFlags::new([FeatureFlags::ALERTS_PER_CHECK]);
        assert!(flags.is_enabled("alerts-per-check"));
        assert!(!flags.is_enabled("other"));
    }
}

//! Error aggregation.
//!
//! [`ErrorAggregator`] keeps the flat list of error paths produced by running
//! the active schema over the whole check. Value changes only *schedule* a
//! recomputation on a [`TickQueue`]; the host drains it once its handler
//! returns, so a burst of keystrokes costs one validation pass. A newer
//! schedule supersedes the pending one.
//!
//! The committed list lives in a [`Property`] and is replaced only when its
//! content changes. The list is a set: sorted and de-duplicated, with no
//! meaning attached to its order.

use std::collections::HashSet;

use checkform_core::logging::{PerfSpan, span_names, targets};
use checkform_core::{Property, TickId, TickQueue};

use crate::check::Check;
use crate::path::{FieldMatcher, matches_field};
use crate::section::SectionRegistry;
use crate::validation::{CheckSchema, ValidationContext, ValidationOutcome};

/// Live, debounced view of a check's validation errors.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Property<Vec<String>>,
    outcome: ValidationOutcome,
    queue: TickQueue<u64>,
    revision: u64,
}

impl ErrorAggregator {
    /// An aggregator with no errors and nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a recomputation for the next tick.
    pub fn schedule(&mut self) -> TickId {
        self.revision += 1;
        self.queue.schedule(self.revision)
    }

    /// Drop the pending recomputation, if any.
    pub fn cancel_pending(&mut self) {
        self.queue.clear();
    }

    /// Whether a recomputation is waiting.
    pub fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }

    /// Number of scheduled recomputations that never ran.
    pub fn superseded_count(&self) -> u64 {
        self.queue.superseded_count()
    }

    /// Run the pending recomputation, if there is one.
    ///
    /// Returns `Some(changed)` when a recomputation ran.
    pub fn process_pending(
        &mut self,
        schema: &dyn CheckSchema,
        check: &Check,
        context: &ValidationContext,
    ) -> Option<bool> {
        let revision = self.queue.take_due()?;
        tracing::trace!(target: targets::AGGREGATE, revision, "running scheduled recompute");
        Some(self.recompute(schema, check, context))
    }

    /// Validate `check` now and commit the flattened error paths.
    ///
    /// Any pending recomputation is cancelled: this one sees the latest
    /// values. Returns `true` if the committed list changed.
    pub fn recompute(
        &mut self,
        schema: &dyn CheckSchema,
        check: &Check,
        context: &ValidationContext,
    ) -> bool {
        let _span = PerfSpan::new(span_names::RECOMPUTE);
        self.queue.clear();

        let outcome = schema.validate(check, context);
        let paths = outcome.error_paths();
        self.outcome = outcome;

        let changed = self.errors.set(paths);
        tracing::debug!(
            target: targets::AGGREGATE,
            variant = %check.check_type(),
            errors = self.errors.with(Vec::len),
            changed,
            "errors recomputed"
        );
        changed
    }

    /// Forget every error, e.g. after a variant switch.
    pub fn reset(&mut self) -> bool {
        self.queue.clear();
        self.outcome = ValidationOutcome::valid();
        self.errors.set(Vec::new())
    }

    /// The full committed error list.
    pub fn errors(&self) -> Vec<String> {
        self.errors.get()
    }

    /// Whether the committed list is empty.
    pub fn is_valid(&self) -> bool {
        self.errors.with(Vec::is_empty)
    }

    /// The outcome behind the committed list, with messages.
    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    /// The committed paths owned by `matchers`.
    pub fn errors_for(&self, registry: &SectionRegistry, matchers: &[FieldMatcher]) -> Vec<String> {
        if matchers.is_empty() {
            return Vec::new();
        }
        self.errors.with(|errors| {
            errors
                .iter()
                .filter(|path| registry.owns_path(matchers, path))
                .cloned()
                .collect()
        })
    }

    /// The outcome restricted to paths owned by `matchers`.
    pub fn outcome_for(&self, registry: &SectionRegistry, matchers: &[FieldMatcher]) -> ValidationOutcome {
        ValidationOutcome::with_issues(
            self.outcome
                .issues()
                .iter()
                .filter(|issue| registry.owns_path(matchers, &issue.path.to_string()))
                .cloned()
                .collect(),
        )
    }

    /// The committed paths that are, or sit beneath, a field in `relevant`.
    ///
    /// Fields that have since disappeared (a removed list entry) drop out of
    /// `relevant`, and their stale errors with them.
    pub fn live_errors(&self, relevant: &HashSet<String>) -> Vec<String> {
        self.errors.with(|errors| {
            errors
                .iter()
                .filter(|path| {
                    relevant.contains(path.as_str())
                        || relevant.iter().any(|field| matches_field(field, path))
                })
                .cloned()
                .collect()
        })
    }

    /// One flag per entry of the list at `list_path`: whether that entry has
    /// an error anywhere beneath it.
    pub fn entry_error_flags(&self, list_path: &str, len: usize) -> Vec<bool> {
        self.errors.with(|errors| {
            (0..len)
                .map(|i| {
                    let entry = format!("{list_path}.{i}");
                    errors.iter().any(|path| matches_field(&entry, path))
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckType, default_check};
    use crate::field_path;
    use crate::validation::ValidationIssue;

    fn failing(paths: &'static [&'static str]) -> impl CheckSchema {
        move |_: &Check, _: &ValidationContext| {
            ValidationOutcome::with_issues(
                paths
                    .iter()
                    .map(|p| ValidationIssue::new(field_path!(*p), "invalid"))
                    .collect(),
            )
        }
    }

    #[test]
    fn test_schedule_is_latest_write_wins() {
        let mut aggregator = ErrorAggregator::new();
        let first = aggregator.schedule();
        let second = aggregator.schedule();
        assert_ne!(first, second);
        assert_eq!(aggregator.superseded_count(), 1);

        let schema = failing(&["job"]);
        let check = default_check(CheckType::Http);
        let context = ValidationContext::default();
        assert_eq!(aggregator.process_pending(&schema, &check, &context), Some(true));
        assert_eq!(aggregator.process_pending(&schema, &check, &context), None);
        assert_eq!(aggregator.errors(), vec!["job"]);
    }

    #[test]
    fn test_recompute_commits_only_on_change() {
        let mut aggregator = ErrorAggregator::new();
        let schema = failing(&["target", "job", "target"]);
        let check = default_check(CheckType::Http);
        let context = ValidationContext::default();

        assert!(aggregator.recompute(&schema, &check, &context));
        assert_eq!(aggregator.errors(), vec!["job", "target"]);
        assert!(!aggregator.recompute(&schema, &check, &context));
    }

    #[test]
    fn test_narrow_views() {
        let mut aggregator = ErrorAggregator::new();
        let schema = failing(&[
            "job",
            "settings.multihttp.entries.1.checks.0.expression",
            "settings.multihttp.entries.3.request.url",
        ]);
        aggregator.recompute(&schema, &default_check(CheckType::MultiHttp), &ValidationContext::default());

        let registry = SectionRegistry::default();
        let uptime = [FieldMatcher::field("settings.multihttp.entries.-1.checks")];
        assert_eq!(
            aggregator.errors_for(&registry, &uptime),
            vec!["settings.multihttp.entries.1.checks.0.expression"]
        );
        assert!(aggregator.errors_for(&registry, &[]).is_empty());
        assert_eq!(aggregator.outcome_for(&registry, &uptime).issues().len(), 1);

        assert_eq!(
            aggregator.entry_error_flags("settings.multihttp.entries", 4),
            vec![false, true, false, true]
        );

        let relevant: HashSet<String> = ["job".to_string(), "settings.multihttp.entries.1".to_string()]
            .into_iter()
            .collect();
        assert_eq!(
            aggregator.live_errors(&relevant),
            vec!["job", "settings.multihttp.entries.1.checks.0.expression"]
        );
    }

    #[test]
    fn test_reset_clears() {
        let mut aggregator = ErrorAggregator::new();
        aggregator.recompute(&failing(&["job"]), &default_check(CheckType::Ping), &ValidationContext::default());
        aggregator.schedule();
        assert!(aggregator.reset());
        assert!(aggregator.is_valid());
        assert!(!aggregator.has_pending());
    }
}

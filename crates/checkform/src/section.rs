//! Wizard sections and the registry of the fields each one owns.
//!
//! Section content registers its [`FieldMatcher`]s when it mounts. The
//! registry answers one question for the rest of the engine: does a given set
//! of error paths touch any field a section owns?
//!
//! Registration is keyed by section: registering again for the same section
//! replaces that section's list, so matchers from a superseded variant never
//! linger and misattribute errors.

use std::collections::HashMap;
use std::fmt;

use checkform_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::path::{DEFAULT_PATH_SEPARATOR, FieldMatcher, WildcardRules};

/// A step of the check wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    /// What is checked: job name, target and request details.
    Check,
    /// What counts as success.
    Uptime,
    /// Custom labels.
    Labels,
    /// Probes and schedule.
    Execution,
    /// Alert rules.
    Alerting,
}

impl SectionId {
    /// Every section, in the default order.
    pub const ALL: [SectionId; 5] = [
        SectionId::Check,
        SectionId::Uptime,
        SectionId::Labels,
        SectionId::Execution,
        SectionId::Alerting,
    ];

    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Check => "Request",
            Self::Uptime => "Uptime",
            Self::Labels => "Labels",
            Self::Execution => "Execution",
            Self::Alerting => "Alerting",
        }
    }

    /// Stable identifier used in URLs and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Uptime => "uptime",
            Self::Labels => "labels",
            Self::Execution => "execution",
            Self::Alerting => "alerting",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section id to owned field matchers.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    fields: HashMap<SectionId, Vec<FieldMatcher>>,
    rules: WildcardRules,
    separator: String,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new(WildcardRules::default(), DEFAULT_PATH_SEPARATOR)
    }
}

impl SectionRegistry {
    /// Create an empty registry.
    pub fn new(rules: WildcardRules, separator: impl Into<String>) -> Self {
        Self {
            fields: HashMap::new(),
            rules,
            separator: separator.into(),
        }
    }

    /// The wildcarding rules applied to error paths before literal matching.
    pub fn rules(&self) -> &WildcardRules {
        &self.rules
    }

    /// Register the fields `id` owns, replacing anything registered before.
    ///
    /// Accepts sparse lists: `None` entries are dropped. Returns `true` if the
    /// effective matcher list for `id` changed.
    pub fn register_section_fields<I, M>(&mut self, id: SectionId, matchers: I) -> bool
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<FieldMatcher>>,
    {
        let matchers: Vec<FieldMatcher> = matchers.into_iter().filter_map(Into::into).collect();
        if self.fields.get(&id) == Some(&matchers) {
            return false;
        }

        tracing::debug!(
            target: targets::REGISTRY,
            section = %id,
            count = matchers.len(),
            "section fields registered"
        );
        self.fields.insert(id, matchers);
        true
    }

    /// Fields registered for `id`; empty if the section never registered.
    pub fn get_section_fields(&self, id: SectionId) -> &[FieldMatcher] {
        self.fields.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `id` has registered.
    pub fn is_registered(&self, id: SectionId) -> bool {
        self.fields.contains_key(&id)
    }

    /// Forget one section's fields.
    pub fn unregister(&mut self, id: SectionId) -> bool {
        self.fields.remove(&id).is_some()
    }

    /// Forget every registration.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Whether any of `matchers` matches any of `error_paths`.
    ///
    /// Literal matchers are tried against each path as reported and after
    /// wildcarding, so `settings.multihttp.entries.-1.checks` matches an
    /// error on entry 1. Patterns are tested once against the joined paths.
    pub fn has_section_error<S: AsRef<str>>(
        &self,
        matchers: &[FieldMatcher],
        error_paths: &[S],
    ) -> bool {
        if matchers.is_empty() || error_paths.is_empty() {
            return false;
        }
        let normalized: Vec<String> = error_paths
            .iter()
            .map(|p| self.rules.normalize(p.as_ref()))
            .collect();

        matchers.iter().any(|matcher| match matcher {
            FieldMatcher::Field(_) => {
                matcher.matches_any(error_paths, &self.separator)
                    || matcher.matches_any(&normalized, &self.separator)
            }
            FieldMatcher::Pattern(_) => matcher.matches_any(error_paths, &self.separator),
        })
    }

    /// Whether the fields registered for `id` match any of `error_paths`.
    pub fn section_has_error<S: AsRef<str>>(&self, id: SectionId, error_paths: &[S]) -> bool {
        self.has_section_error(self.get_section_fields(id), error_paths)
    }

    /// Whether one error path belongs to `matchers`.
    pub fn owns_path(&self, matchers: &[FieldMatcher], error_path: &str) -> bool {
        let normalized = self.rules.normalize(error_path);
        matchers.iter().any(|matcher| match matcher {
            FieldMatcher::Field(_) => matcher.matches(error_path) || matcher.matches(&normalized),
            FieldMatcher::Pattern(_) => matcher.matches(error_path),
        })
    }

    /// The sections among `order` whose fields match any of `error_paths`.
    pub fn sections_with_errors<S: AsRef<str>>(
        &self,
        order: &[SectionId],
        error_paths: &[S],
    ) -> Vec<SectionId> {
        order
            .iter()
            .copied()
            .filter(|id| self.section_has_error(*id, error_paths))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_pattern() -> FieldMatcher {
        FieldMatcher::pattern(r"\.entries\.\d+\.request").unwrap()
    }

    #[test]
    fn test_unregistered_section_has_no_fields() {
        let registry = SectionRegistry::default();
        assert!(registry.get_section_fields(SectionId::Alerting).is_empty());
        assert!(!registry.section_has_error(SectionId::Alerting, &["alerts.0.name"]));
    }

    #[test]
    fn test_registration_replaces() {
        let mut registry = SectionRegistry::default();
        assert!(registry.register_section_fields(SectionId::Check, [FieldMatcher::field("job")]));
        assert!(registry.register_section_fields(SectionId::Check, [FieldMatcher::field("target")]));
        assert_eq!(
            registry.get_section_fields(SectionId::Check),
            &[FieldMatcher::field("target")]
        );
        assert!(!registry.register_section_fields(SectionId::Check, [FieldMatcher::field("target")]));
        assert!(!registry.section_has_error(SectionId::Check, &["job"]));
    }

    #[test]
    fn test_sparse_registration() {
        let mut registry = SectionRegistry::default();
        registry.register_section_fields(
            SectionId::Uptime,
            [Some(FieldMatcher::field("settings.http.validStatusCodes")), None],
        );
        assert_eq!(registry.get_section_fields(SectionId::Uptime).len(), 1);
    }

    #[test]
    fn test_has_section_error_literal_and_pattern() {
        let registry = SectionRegistry::default();
        assert!(registry.has_section_error(
            &[request_pattern()],
            &["settings.multihttp.entries.0.request.url"]
        ));
        assert!(!registry.has_section_error(&[request_pattern()], &["target"]));
        assert!(registry.has_section_error(&[FieldMatcher::field("target")], &["target"]));
        assert!(!registry.has_section_error::<&str>(&[], &["target"]));
    }

    #[test]
    fn test_wildcard_matcher_covers_any_entry() {
        let registry = SectionRegistry::default();
        let matchers = [FieldMatcher::field("settings.multihttp.entries.-1.checks")];
        for path in [
            "settings.multihttp.entries.0.checks.3.value",
            "settings.multihttp.entries.1.checks.0.expression",
            "settings.multihttp.entries.17.checks",
        ] {
            assert!(registry.has_section_error(&matchers, &[path]), "{path}");
            assert!(registry.owns_path(&matchers, path));
        }
        assert!(!registry.has_section_error(&matchers, &["settings.multihttp.entries.1.request.url"]));
    }

    #[test]
    fn test_sections_with_errors_in_order() {
        let mut registry = SectionRegistry::default();
        registry.register_section_fields(SectionId::Check, [FieldMatcher::field("job")]);
        registry.register_section_fields(SectionId::Execution, [FieldMatcher::field("probes")]);
        let sections = registry.sections_with_errors(&SectionId::ALL, &["probes", "job"]);
        assert_eq!(sections, vec![SectionId::Check, SectionId::Execution]);
    }
}

//! The check editor.
//!
//! [`CheckEditor`] owns the check being edited and every piece of wizard
//! state: the resolved [`VariantProfile`], the [`SectionRegistry`], the
//! [`ErrorAggregator`] and the [`WizardNavigator`]. The rendering layer reads
//! through accessors and mutates only through the transition methods.
//!
//! # Example
//!
//! ```
//! use checkform::prelude::*;
//!
//! let mut editor = CheckEditor::create(Some("http"), EngineConfig::default()).unwrap();
//! editor.process_pending_tick();
//!
//! // The job is empty: the Check section blocks `next()`.
//! assert!(!editor.next());
//! assert_eq!(editor.active_section(), SectionId::Check);
//!
//! editor.update(|check| {
//!     check.job = "homepage".into();
//!     check.target = "https://grafana.com".into();
//! });
//! assert!(editor.next());
//! assert_eq!(editor.active_section(), SectionId::Uptime);
//! ```

use std::collections::HashSet;

use checkform_core::Signal;
use checkform_core::logging::{PerfSpan, span_names, targets};

use crate::aggregate::ErrorAggregator;
use crate::check::{Check, CheckType};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::navigation::WizardNavigator;
use crate::path::FieldMatcher;
use crate::section::{SectionId, SectionRegistry};
use crate::validation::{ValidationContext, ValidationOutcome};
use crate::variant::{VariantProfile, VariantResolver};

/// The wizard engine for one check.
///
/// # Signals
///
/// - `active_section_changed(SectionId)`
/// - `errors_changed(Vec<String>)`: the full error list, after a
///   recomputation that changed it
/// - `variant_changed(CheckType)`
/// - `validation_failed(ValidationOutcome)`: `next()` or `submit()` was
///   refused; carries the failing fields
/// - `submitted(bool)`: a submit was attempted; `true` if the check is valid
pub struct CheckEditor {
    config: EngineConfig,
    resolver: VariantResolver,
    profile: VariantProfile,
    check: Check,
    context: ValidationContext,
    registry: SectionRegistry,
    aggregator: ErrorAggregator,
    navigator: WizardNavigator,

    /// Emitted when the active section changes.
    pub active_section_changed: Signal<SectionId>,
    /// Emitted when the committed error list changes.
    pub errors_changed: Signal<Vec<String>>,
    /// Emitted after a variant switch.
    pub variant_changed: Signal<CheckType>,
    /// Emitted when `next()` or `submit()` is refused.
    pub validation_failed: Signal<ValidationOutcome>,
    /// Emitted on every submit attempt.
    pub submitted: Signal<bool>,
}

impl CheckEditor {
    /// Start a new check of the type named by `tag`.
    ///
    /// An absent or unknown tag falls back to the configured default variant.
    pub fn create(tag: Option<&str>, config: EngineConfig) -> Result<Self> {
        let check_type = CheckType::from_tag_or(tag, config.default_variant);
        let resolver = VariantResolver::standard()?;
        let check = resolver.resolve(check_type)?.default_value.clone();
        Self::with_resolver(check, config, resolver)
    }

    /// Edit an existing check.
    pub fn edit(check: Check, config: EngineConfig) -> Result<Self> {
        Self::with_resolver(check, config, VariantResolver::standard()?)
    }

    /// Edit `check` with a custom resolver.
    pub fn with_resolver(check: Check, config: EngineConfig, resolver: VariantResolver) -> Result<Self> {
        let profile = resolver.resolve(check.check_type())?.clone();
        let registry = SectionRegistry::new(
            config.wildcard_lists.clone(),
            config.error_path_separator.clone(),
        );
        let context = ValidationContext::default().with_limits(config.limits);

        let mut editor = Self {
            navigator: WizardNavigator::new(profile.section_order.clone()),
            config,
            resolver,
            profile,
            check,
            context,
            registry,
            aggregator: ErrorAggregator::new(),
            active_section_changed: Signal::new(),
            errors_changed: Signal::new(),
            variant_changed: Signal::new(),
            validation_failed: Signal::new(),
            submitted: Signal::new(),
        };
        editor.register_default_fields();
        editor.aggregator.schedule();
        tracing::debug!(target: targets::EDITOR, variant = %editor.check_type(), "editor created");
        Ok(editor)
    }

    /// Replace the collaborator data the schema reads.
    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.set_context(context);
        self
    }

    // =========================================================================
    // Value tree
    // =========================================================================

    /// The check being edited.
    pub fn check(&self) -> &Check {
        &self.check
    }

    /// The active variant.
    pub fn check_type(&self) -> CheckType {
        self.profile.check_type
    }

    /// The resolved profile of the active variant.
    pub fn profile(&self) -> &VariantProfile {
        &self.profile
    }

    /// The configuration the editor was opened with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Probes, tenant limits and feature flags the schema validates against.
    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Replace the collaborator data and schedule a recomputation.
    pub fn set_context(&mut self, context: ValidationContext) {
        self.context = context;
        self.aggregator.schedule();
    }

    /// Mutate the check and schedule a recomputation.
    ///
    /// The variant cannot change here: settings of another case are put back
    /// and the switch must go through [`change_variant`](Self::change_variant).
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Check),
    {
        let settings = self.check.settings.clone();
        f(&mut self.check);
        if self.check.check_type() != self.profile.check_type {
            tracing::warn!(
                target: targets::EDITOR,
                variant = %self.profile.check_type,
                attempted = %self.check.check_type(),
                "settings case changed outside change_variant, restoring"
            );
            self.check.settings = settings;
        }
        self.aggregator.schedule();
    }

    /// Run the pending recomputation, if any.
    ///
    /// Hosts call this once the handler that mutated the check has returned.
    /// Returns `true` if the error list changed.
    pub fn process_pending_tick(&mut self) -> bool {
        let changed = self
            .aggregator
            .process_pending(self.profile.schema.as_ref(), &self.check, &self.context)
            .unwrap_or(false);
        if changed {
            self.errors_changed.emit(self.aggregator.errors());
        }
        changed
    }

    /// Whether a recomputation is waiting.
    pub fn has_pending_tick(&self) -> bool {
        self.aggregator.has_pending()
    }

    /// Recompute now against the latest values, dropping any pending tick.
    pub fn validate_now(&mut self) -> bool {
        let changed =
            self.aggregator
                .recompute(self.profile.schema.as_ref(), &self.check, &self.context);
        if changed {
            self.errors_changed.emit(self.aggregator.errors());
        }
        changed
    }

    // =========================================================================
    // Variant
    // =========================================================================

    /// Switch the check to the variant named by `tag`.
    ///
    /// The value tree is reset to the variant's default, keeping the filled-in
    /// common fields. Section fields are re-registered from the new profile
    /// and navigation starts over. Switching to the current variant is a
    /// no-op.
    pub fn change_variant(&mut self, tag: &str) -> Result<()> {
        let profile = self.resolver.resolve_tag(tag)?.clone();
        if profile.check_type == self.profile.check_type {
            return Ok(());
        }
        let _span = PerfSpan::new(span_names::VARIANT_SWITCH);
        tracing::debug!(
            target: targets::EDITOR,
            from = %self.profile.check_type,
            to = %profile.check_type,
            "changing variant"
        );

        let mut check = profile.default_value.clone().with_common_fields_from(&self.check);
        check.id = self.check.id;
        self.check = check;
        self.profile = profile;

        self.registry.clear();
        self.register_default_fields();
        self.navigator.reset(self.profile.section_order.clone());
        if self.aggregator.reset() {
            self.errors_changed.emit(Vec::new());
        }
        self.aggregator.schedule();

        self.variant_changed.emit(self.profile.check_type);
        self.active_section_changed.emit(self.navigator.active());
        Ok(())
    }

    fn register_default_fields(&mut self) {
        for (id, fields) in &self.profile.section_fields {
            self.registry.register_section_fields(*id, fields.iter().cloned());
        }
    }

    // =========================================================================
    // Sections
    // =========================================================================

    /// The section the wizard is showing.
    pub fn active_section(&self) -> SectionId {
        self.navigator.active()
    }

    /// Visited sections, in order.
    pub fn visited_sections(&self) -> Vec<SectionId> {
        self.navigator.visited()
    }

    /// Wizard steps of the active variant.
    pub fn section_order(&self) -> &[SectionId] {
        self.navigator.order()
    }

    /// Check if `id` is the active section.
    pub fn is_section_active(&self, id: SectionId) -> bool {
        self.navigator.is_active(id)
    }

    /// Whether the errors of `id` are shown.
    pub fn is_section_visited(&self, id: SectionId) -> bool {
        self.navigator.is_visited(id)
    }

    /// Whether a submit has been attempted since the last variant switch.
    pub fn is_submitted(&self) -> bool {
        self.navigator.is_submitted()
    }

    /// Jump to `id`, ungated. Ids outside the current order are ignored.
    pub fn set_section_active(&mut self, id: SectionId) -> bool {
        let changed = self.navigator.set_section_active(id);
        if changed {
            self.active_section_changed.emit(id);
        }
        changed
    }

    /// Register the fields section `id` owns, replacing earlier ones.
    pub fn register_section_fields<I, M>(&mut self, id: SectionId, matchers: I) -> bool
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<FieldMatcher>>,
    {
        self.registry.register_section_fields(id, matchers)
    }

    /// Matchers registered for `id`; empty if none.
    pub fn get_section_fields(&self, id: SectionId) -> &[FieldMatcher] {
        self.registry.get_section_fields(id)
    }

    /// The section registry, for queries over an explicit error list.
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Move to the next section if the active section's own fields are valid.
    ///
    /// The whole check is validated against the latest values, then only the
    /// errors owned by the active section are considered. On failure
    /// `validation_failed` carries those errors and the section stays put.
    pub fn next(&mut self) -> bool {
        let _span = PerfSpan::new(span_names::SECTION_GATE);
        self.validate_now();

        let active = self.navigator.active();
        let fields = self.registry.get_section_fields(active);
        let failures = self.aggregator.outcome_for(&self.registry, fields);
        if !failures.is_valid() {
            tracing::debug!(
                target: targets::NAVIGATION,
                section = %active,
                errors = failures.issues().len(),
                "next refused"
            );
            self.validation_failed.emit(failures);
            return false;
        }

        let advanced = self.navigator.advance();
        if advanced {
            self.active_section_changed.emit(self.navigator.active());
        }
        advanced
    }

    /// Move to the previous section, ungated.
    pub fn previous(&mut self) -> bool {
        let moved = self.navigator.previous();
        if moved {
            self.active_section_changed.emit(self.navigator.active());
        }
        moved
    }

    /// Attempt a full-form submit.
    ///
    /// Every section becomes visited, so every outstanding error is shown
    /// from here on. Returns `true` if the check is valid.
    pub fn submit(&mut self) -> bool {
        self.navigator.mark_all_visited();
        self.validate_now();

        let valid = self.aggregator.is_valid();
        tracing::debug!(target: targets::EDITOR, valid, "submit attempted");
        if !valid {
            self.validation_failed.emit(self.aggregator.outcome().clone());
        }
        self.submitted.emit(valid);
        valid
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Every committed error path, shown or not.
    pub fn errors(&self) -> Vec<String> {
        self.aggregator.errors()
    }

    /// Message of the committed error at `path`.
    pub fn error_message(&self, path: &str) -> Option<&str> {
        self.aggregator.outcome().message_for(path)
    }

    /// Errors owned by a visited section. After a submit, every error.
    pub fn visible_errors(&self) -> Vec<String> {
        let errors = self.aggregator.errors();
        if self.navigator.is_submitted() {
            return errors;
        }
        let visited = self.navigator.visited();
        errors
            .into_iter()
            .filter(|path| {
                visited
                    .iter()
                    .any(|id| self.registry.owns_path(self.registry.get_section_fields(*id), path))
            })
            .collect()
    }

    /// Whether `matchers` match any shown error.
    pub fn has_section_error(&self, matchers: &[FieldMatcher]) -> bool {
        self.registry.has_section_error(matchers, &self.visible_errors())
    }

    /// Whether section `id` should show an error badge.
    ///
    /// Always false for a section that is neither visited nor revealed by a
    /// submit.
    pub fn section_has_error(&self, id: SectionId) -> bool {
        self.navigator.is_visited(id) && self.registry.section_has_error(id, &self.errors())
    }

    /// Committed errors owned by `matchers`, shown or not.
    pub fn errors_for(&self, matchers: &[FieldMatcher]) -> Vec<String> {
        self.aggregator.errors_for(&self.registry, matchers)
    }

    /// Committed errors on or beneath a field in `relevant`.
    pub fn live_errors(&self, relevant: &HashSet<String>) -> Vec<String> {
        self.aggregator.live_errors(relevant)
    }

    /// Per-entry error flags of the list at `list_path`.
    pub fn entry_error_flags(&self, list_path: &str, len: usize) -> Vec<bool> {
        self.aggregator.entry_error_flags(list_path, len)
    }

    /// The first erroring path, in the variant's field order.
    pub fn first_error_field(&self) -> Option<String> {
        let errors = self.aggregator.errors();
        self.profile
            .field_order
            .iter()
            .find_map(|field| {
                errors
                    .iter()
                    .find(|path| crate::path::matches_field(field, path))
                    .cloned()
            })
            .or_else(|| errors.first().cloned())
    }
}

impl std::fmt::Debug for CheckEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckEditor")
            .field("variant", &self.profile.check_type)
            .field("active", &self.navigator.active())
            .field("visited", &self.navigator.visited())
            .field("errors", &self.aggregator.errors())
            .finish_non_exhaustive()
    }
}

//! Wizard navigation state.
//!
//! [`WizardNavigator`] owns the active section, the section order of the
//! current variant and the visited set. It knows nothing about validation:
//! gating `next()` on the current section's fields is the editor's job.

use std::collections::HashSet;

use checkform_core::logging::targets;

use crate::section::SectionId;

/// Active section, order and visited set of one wizard.
#[derive(Debug, Clone)]
pub struct WizardNavigator {
    order: Vec<SectionId>,
    active: SectionId,
    visited: HashSet<SectionId>,
    submitted: bool,
}

impl WizardNavigator {
    /// Start at the first section of `order`, which counts as visited.
    ///
    /// The resolver never hands out an empty order. Given one anyway, the
    /// navigator sits on [`SectionId::Check`] and every move is refused.
    pub fn new(order: Vec<SectionId>) -> Self {
        let active = order.first().copied().unwrap_or(SectionId::Check);
        Self {
            order,
            active,
            visited: HashSet::from([active]),
            submitted: false,
        }
    }

    /// The active section.
    pub fn active(&self) -> SectionId {
        self.active
    }

    /// Check if `id` is the active section.
    pub fn is_active(&self, id: SectionId) -> bool {
        self.active == id
    }

    /// The section order of the current variant.
    pub fn order(&self) -> &[SectionId] {
        &self.order
    }

    /// Position of `id` in the order.
    pub fn position(&self, id: SectionId) -> Option<usize> {
        self.order.iter().position(|s| *s == id)
    }

    /// Visited sections, in order.
    pub fn visited(&self) -> Vec<SectionId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.visited.contains(id))
            .collect()
    }

    /// Whether errors of `id` are shown.
    pub fn is_visited(&self, id: SectionId) -> bool {
        self.visited.contains(&id)
    }

    /// Whether a full-form submit has been attempted.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_first(&self) -> bool {
        self.position(self.active) == Some(0)
    }

    pub fn is_last(&self) -> bool {
        self.position(self.active).is_some_and(|i| i + 1 == self.order.len())
    }

    /// Jump to `id`. Ids outside the order are ignored.
    ///
    /// `id` and every section before it become visited. Returns `true` if
    /// the active section changed.
    pub fn set_section_active(&mut self, id: SectionId) -> bool {
        let Some(index) = self.position(id) else {
            tracing::debug!(target: targets::NAVIGATION, section = %id, "ignoring section outside the current order");
            return false;
        };
        self.visited.extend(self.order[..=index].iter().copied());

        if self.active == id {
            return false;
        }
        tracing::debug!(target: targets::NAVIGATION, from = %self.active, to = %id, "section activated");
        self.active = id;
        true
    }

    /// The section after the active one.
    pub fn next_section(&self) -> Option<SectionId> {
        let index = self.position(self.active)?;
        self.order.get(index + 1).copied()
    }

    /// The section before the active one.
    pub fn previous_section(&self) -> Option<SectionId> {
        let index = self.position(self.active)?;
        index.checked_sub(1).and_then(|i| self.order.get(i).copied())
    }

    /// Move forward one section, ungated.
    pub fn advance(&mut self) -> bool {
        self.next_section()
            .is_some_and(|next| self.set_section_active(next))
    }

    /// Move back one section.
    pub fn previous(&mut self) -> bool {
        self.previous_section()
            .is_some_and(|previous| self.set_section_active(previous))
    }

    /// Enter full error display: every section counts as visited.
    pub fn mark_all_visited(&mut self) {
        self.visited.extend(self.order.iter().copied());
        if !self.submitted {
            tracing::debug!(target: targets::NAVIGATION, "first submit, showing all errors");
        }
        self.submitted = true;
    }

    /// Start over with a new order, as after a variant switch.
    pub fn reset(&mut self, order: Vec<SectionId>) {
        *self = Self::new(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> WizardNavigator {
        WizardNavigator::new(SectionId::ALL.to_vec())
    }

    #[test]
    fn test_starts_on_first_section() {
        let nav = navigator();
        assert_eq!(nav.active(), SectionId::Check);
        assert_eq!(nav.visited(), vec![SectionId::Check]);
        assert!(nav.is_first());
        assert!(!nav.is_submitted());
    }

    #[test]
    fn test_empty_order_refuses_every_move() {
        let mut nav = WizardNavigator::new(Vec::new());
        assert_eq!(nav.active(), SectionId::Check);
        assert!(nav.visited().is_empty());
        assert!(!nav.advance());
        assert!(!nav.previous());
        assert!(!nav.set_section_active(SectionId::Uptime));
    }

    #[test]
    fn test_jump_marks_earlier_sections_visited() {
        let mut nav = navigator();
        assert!(nav.set_section_active(SectionId::Execution));
        assert_eq!(
            nav.visited(),
            vec![SectionId::Check, SectionId::Uptime, SectionId::Labels, SectionId::Execution]
        );
        assert!(!nav.is_visited(SectionId::Alerting));

        assert!(nav.set_section_active(SectionId::Check));
        assert!(nav.is_visited(SectionId::Execution));
    }

    #[test]
    fn test_jump_outside_order_is_ignored() {
        let mut nav = WizardNavigator::new(vec![SectionId::Check, SectionId::Labels]);
        assert!(!nav.set_section_active(SectionId::Uptime));
        assert_eq!(nav.active(), SectionId::Check);
        assert!(!nav.is_visited(SectionId::Uptime));
    }

    #[test]
    fn test_advance_and_previous() {
        let mut nav = navigator();
        assert!(!nav.previous());
        assert!(nav.advance());
        assert_eq!(nav.active(), SectionId::Uptime);
        assert!(nav.previous());
        assert_eq!(nav.active(), SectionId::Check);

        nav.set_section_active(SectionId::Alerting);
        assert!(nav.is_last());
        assert!(!nav.advance());
    }

    #[test]
    fn test_submit_then_reset() {
        let mut nav = navigator();
        nav.mark_all_visited();
        assert!(nav.is_submitted());
        assert!(SectionId::ALL.iter().all(|id| nav.is_visited(*id)));

        nav.reset(vec![SectionId::Check, SectionId::Execution]);
        assert_eq!(nav.visited(), vec![SectionId::Check]);
        assert!(!nav.is_submitted());
        assert_eq!(nav.order(), &[SectionId::Check, SectionId::Execution]);
    }
}

//! Visibility-driven requests for the next page.
//!
//! The trigger watches exactly one target, the last displayed recipe, and
//! reports when it scrolls into view.

use crate::model::RecipeId;
use log::debug;

/// Handle for one active observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(pub u64);

/// Capability to be told when an element becomes visible.
///
/// Implementations deliver visibility changes back through
/// [`PaginationTrigger::on_visibility`].
pub trait VisibilityNotifier {
    fn observe(&mut self, target: &RecipeId) -> ObservationId;

    fn disconnect(&mut self, observation: ObservationId);
}

/// Snapshot of list progress used to gate the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStatus {
    pub has_more: bool,
    pub is_loading: bool,
}

#[derive(Debug)]
struct Watch {
    target: RecipeId,
    observation: ObservationId,
    visible: bool,
}

/// Keeps at most one observation on the last displayed recipe
#[derive(Debug, Default)]
pub struct PaginationTrigger {
    current: Option<Watch>,
}

impl PaginationTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipe currently observed, if any
    pub fn target(&self) -> Option<&RecipeId> {
        self.current.as_ref().map(|watch| &watch.target)
    }

    /// Point the observation at `last`, the final displayed recipe.
    ///
    /// The previous observation is disconnected before a new one is made.
    /// While a page is loading the existing target is kept as is.
    pub fn bind(
        &mut self,
        notifier: &mut dyn VisibilityNotifier,
        last: Option<&RecipeId>,
        status: ListStatus,
    ) {
        if self.target() == last {
            return;
        }
        if status.is_loading && last.is_some() {
            return;
        }

        if let Some(previous) = self.current.take() {
            debug!("Disconnecting observation of {}", previous.target);
            notifier.disconnect(previous.observation);
        }

        if let Some(target) = last {
            let observation = notifier.observe(target);
            debug!("Observing {} for pagination", target);
            self.current = Some(Watch {
                target: target.clone(),
                observation,
                visible: false,
            });
        }
    }

    /// Replace the current observation with a fresh one on the same target.
    ///
    /// A notifier reports the current visibility of a new observation, so a
    /// target that stayed on screen across a page load counts as a new edge.
    pub fn rearm(&mut self, notifier: &mut dyn VisibilityNotifier) {
        let Some(previous) = self.current.take() else {
            return;
        };
        notifier.disconnect(previous.observation);
        let observation = notifier.observe(&previous.target);
        debug!("Re-observing {} after page load", previous.target);
        self.current = Some(Watch {
            target: previous.target,
            observation,
            visible: false,
        });
    }

    /// Record a visibility change and decide whether to load the next page.
    ///
    /// Returns `true` only on a hidden-to-visible edge of the current target
    /// while more pages exist and nothing is loading.
    pub fn on_visibility(
        &mut self,
        observation: ObservationId,
        visible: bool,
        status: ListStatus,
    ) -> bool {
        let Some(watch) = self.current.as_mut() else {
            return false;
        };
        if watch.observation != observation {
            return false;
        }

        let rising = visible && !watch.visible;
        watch.visible = visible;
        rising && status.has_more && !status.is_loading
    }

    /// Drop the current observation
    pub fn disconnect(&mut self, notifier: &mut dyn VisibilityNotifier) {
        if let Some(previous) = self.current.take() {
            notifier.disconnect(previous.observation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeNotifier {
        next: u64,
        active: HashMap<ObservationId, RecipeId>,
        observed_total: usize,
    }

    impl VisibilityNotifier for FakeNotifier {
        fn observe(&mut self, target: &RecipeId) -> ObservationId {
            self.next += 1;
            self.observed_total += 1;
            let id = ObservationId(self.next);
            self.active.insert(id, target.clone());
            id
        }

        fn disconnect(&mut self, observation: ObservationId) {
            self.active.remove(&observation);
        }
    }

    impl FakeNotifier {
        fn observation_of(&self, target: &RecipeId) -> ObservationId {
            *self
                .active
                .iter()
                .find(|(_, t)| *t == target)
                .map(|(id, _)| id)
                .unwrap()
        }
    }

    const IDLE: ListStatus = ListStatus {
        has_more: true,
        is_loading: false,
    };

    #[test]
    fn test_rebinding_keeps_single_observation() {
        let mut notifier = FakeNotifier::default();
        let mut trigger = PaginationTrigger::new();

        trigger.bind(&mut notifier, Some(&RecipeId::Int(12)), IDLE);
        trigger.bind(&mut notifier, Some(&RecipeId::Int(12)), IDLE);
        assert_eq!(notifier.observed_total, 1);

        trigger.bind(&mut notifier, Some(&RecipeId::Int(24)), IDLE);
        assert_eq!(notifier.active.len(), 1);
        assert_eq!(notifier.active.values().next(), Some(&RecipeId::Int(24)));

        trigger.bind(&mut notifier, None, IDLE);
        assert!(notifier.active.is_empty());
        assert!(trigger.target().is_none());
    }

    #[test]
    fn test_fires_once_per_visibility_edge() {
        let mut notifier = FakeNotifier::default();
        let mut trigger = PaginationTrigger::new();
        trigger.bind(&mut notifier, Some(&RecipeId::Int(1)), IDLE);
        let obs = notifier.observation_of(&RecipeId::Int(1));

        assert!(trigger.on_visibility(obs, true, IDLE));
        assert!(!trigger.on_visibility(obs, true, IDLE));
        assert!(!trigger.on_visibility(obs, false, IDLE));
        assert!(trigger.on_visibility(obs, true, IDLE));
    }

    #[test]
    fn test_gated_by_status() {
        let mut notifier = FakeNotifier::default();
        let mut trigger = PaginationTrigger::new();
        trigger.bind(&mut notifier, Some(&RecipeId::Int(1)), IDLE);
        let obs = notifier.observation_of(&RecipeId::Int(1));

        let loading = ListStatus {
            has_more: true,
            is_loading: true,
        };
        assert!(!trigger.on_visibility(obs, true, loading));
        trigger.on_visibility(obs, false, IDLE);

        let exhausted = ListStatus {
            has_more: false,
            is_loading: false,
        };
        assert!(!trigger.on_visibility(obs, true, exhausted));
    }

    #[test]
    fn test_ignores_stale_observation() {
        let mut notifier = FakeNotifier::default();
        let mut trigger = PaginationTrigger::new();
        trigger.bind(&mut notifier, Some(&RecipeId::Int(1)), IDLE);
        let old = notifier.observation_of(&RecipeId::Int(1));
        trigger.bind(&mut notifier, Some(&RecipeId::Int(2)), IDLE);

        assert!(!trigger.on_visibility(old, true, IDLE));
    }

    #[test]
    fn test_rearm_fires_again_for_still_visible_target() {
        let mut notifier = FakeNotifier::default();
        let mut trigger = PaginationTrigger::new();
        trigger.bind(&mut notifier, Some(&RecipeId::Int(1)), IDLE);
        let first = notifier.observation_of(&RecipeId::Int(1));
        assert!(trigger.on_visibility(first, true, IDLE));

        trigger.rearm(&mut notifier);
        let second = notifier.observation_of(&RecipeId::Int(1));
        assert_ne!(first, second);
        assert_eq!(notifier.active.len(), 1);
        assert_eq!(trigger.target(), Some(&RecipeId::Int(1)));

        assert!(!trigger.on_visibility(first, true, IDLE));
        assert!(trigger.on_visibility(second, true, IDLE));
    }

    #[test]
    fn test_rearm_without_target_observes_nothing() {
        let mut notifier = FakeNotifier::default();
        let mut trigger = PaginationTrigger::new();
        trigger.rearm(&mut notifier);
        assert_eq!(notifier.observed_total, 0);
        assert!(trigger.target().is_none());
    }

    #[test]
    fn test_keeps_target_while_loading() {
        let mut notifier = FakeNotifier::default();
        let mut trigger = PaginationTrigger::new();
        trigger.bind(&mut notifier, Some(&RecipeId::Int(1)), IDLE);

        let loading = ListStatus {
            has_more: true,
            is_loading: true,
        };
        trigger.bind(&mut notifier, Some(&RecipeId::Int(2)), loading);
        assert_eq!(trigger.target(), Some(&RecipeId::Int(1)));
        assert_eq!(notifier.observed_total, 1);
    }
}

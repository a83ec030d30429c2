//! Integer domains and the events their mutators emit.
//!
//! A [`SparseSetDomain`] wraps a [`StateSparseSet`] and reports every
//! observable consequence of a mutation to a [`DomainListener`]: the variable
//! layer turns those events into constraint scheduling. Events are delivered
//! synchronously, in a fixed order per mutator, and an `empty` event always
//! comes first and aborts the rest of the mutation's delivery.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::solver::sparse_set::StateSparseSet;
use crate::solver::state::StateManager;

/// Receiver for domain-mutation events.
pub trait DomainListener {
    /// The domain lost its last value.
    fn empty(&mut self);
    /// At least one value was removed.
    fn change(&mut self);
    /// The minimum moved up.
    fn change_min(&mut self);
    /// The maximum moved down.
    fn change_max(&mut self);
    /// Exactly one value remains.
    fn fix(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEvent {
    Empty,
    Change,
    ChangeMin,
    ChangeMax,
    Fix,
}

/// A [`DomainListener`] that records events in emission order.
///
/// Each event kind fires at most once per mutation, so a fixed-size buffer
/// suffices and recording never allocates.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventRecorder {
    events: [Option<DomainEvent>; 5],
    len: usize,
}

impl EventRecorder {
    pub fn iter(&self) -> impl Iterator<Item = DomainEvent> + '_ {
        self.events[..self.len].iter().flatten().copied()
    }

    fn record(&mut self, event: DomainEvent) {
        debug_assert!(self.len < self.events.len());
        self.events[self.len] = Some(event);
        self.len += 1;
    }
}

impl DomainListener for EventRecorder {
    fn empty(&mut self) {
        self.record(DomainEvent::Empty);
    }

    fn change(&mut self) {
        self.record(DomainEvent::Change);
    }

    fn change_min(&mut self) {
        self.record(DomainEvent::ChangeMin);
    }

    fn change_max(&mut self) {
        self.record(DomainEvent::ChangeMax);
    }

    fn fix(&mut self) {
        self.record(DomainEvent::Fix);
    }
}

/// An integer domain on a reversible sparse set.
pub struct SparseSetDomain {
    set: StateSparseSet,
}

impl SparseSetDomain {
    /// Builds the domain of every value yielded by `values`: the universe is
    /// `[min, max]` of the input and every absent value in between is
    /// removed up front.
    pub fn new(
        sm: &mut dyn StateManager,
        values: impl IntoIterator<Item = i32>,
    ) -> Result<Self> {
        let present: HashSet<i32> = values.into_iter().collect();
        let (min, max) = match (present.iter().min(), present.iter().max()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Err(Error::EmptyDomain),
        };
        let mut set = StateSparseSet::new(sm, min, max);
        for v in min..=max {
            if !present.contains(&v) {
                set.remove(sm, v);
            }
        }
        Ok(Self { set })
    }

    pub fn min(&self, sm: &dyn StateManager) -> i32 {
        self.set.min(sm)
    }

    pub fn max(&self, sm: &dyn StateManager) -> i32 {
        self.set.max(sm)
    }

    pub fn size(&self, sm: &dyn StateManager) -> usize {
        self.set.size(sm)
    }

    pub fn contains(&self, sm: &dyn StateManager, v: i32) -> bool {
        self.set.contains(sm, v)
    }

    pub fn is_fixed(&self, sm: &dyn StateManager) -> bool {
        self.set.size(sm) == 1
    }

    pub fn fill(&self, sm: &dyn StateManager, dest: &mut Vec<i32>) {
        self.set.fill(sm, dest);
    }

    pub fn to_vec(&self, sm: &dyn StateManager) -> Vec<i32> {
        self.set.to_vec(sm)
    }

    /// Removes `v`; no-op when absent. Emits `empty` when the domain wipes
    /// out, otherwise `change`, then `change_min`/`change_max` when a bound
    /// moved, then `fix` when one value is left.
    pub fn remove(&mut self, sm: &mut dyn StateManager, v: i32, l: &mut dyn DomainListener) {
        if !self.set.contains(sm, v) {
            return;
        }
        let min_changed = self.set.min(sm) == v;
        let max_changed = self.set.max(sm) == v;
        self.set.remove(sm, v);
        if self.set.is_empty(sm) {
            l.empty();
        }
        l.change();
        if min_changed {
            l.change_min();
        }
        if max_changed {
            l.change_max();
        }
        if self.set.size(sm) == 1 {
            l.fix();
        }
    }

    /// Reduces the domain to `{v}`. When `v` is absent the domain is cleared
    /// and only `empty` is emitted; when the domain is already `{v}` nothing
    /// fires.
    pub fn remove_all_but(
        &mut self,
        sm: &mut dyn StateManager,
        v: i32,
        l: &mut dyn DomainListener,
    ) {
        if self.set.contains(sm, v) {
            if self.set.size(sm) > 1 {
                let min_changed = self.set.min(sm) != v;
                let max_changed = self.set.max(sm) != v;
                self.set.remove_all_but(sm, v);
                l.fix();
                l.change();
                if min_changed {
                    l.change_min();
                }
                if max_changed {
                    l.change_max();
                }
            }
        } else {
            self.set.remove_all(sm);
            l.empty();
        }
    }

    /// Removes every value below `v`; no-op when `min >= v`.
    pub fn remove_below(&mut self, sm: &mut dyn StateManager, v: i32, l: &mut dyn DomainListener) {
        if v > self.set.min(sm) {
            self.set.remove_below(sm, v);
            if self.set.is_empty(sm) {
                l.empty();
            } else {
                if self.set.size(sm) == 1 {
                    l.fix();
                }
                l.change_min();
                l.change();
            }
        }
    }

    /// Removes every value above `v`; no-op when `max <= v`.
    pub fn remove_above(&mut self, sm: &mut dyn StateManager, v: i32, l: &mut dyn DomainListener) {
        if v < self.set.max(sm) {
            self.set.remove_above(sm, v);
            if self.set.is_empty(sm) {
                l.empty();
            } else {
                if self.set.size(sm) == 1 {
                    l.fix();
                }
                l.change_max();
                l.change();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::state::Copier;

    #[derive(Default)]
    struct Log(Vec<&'static str>);

    impl Log {
        fn take(&mut self) -> Vec<&'static str> {
            std::mem::take(&mut self.0)
        }
    }

    impl DomainListener for Log {
        fn empty(&mut self) {
            self.0.push("empty");
        }
        fn change(&mut self) {
            self.0.push("change");
        }
        fn change_min(&mut self) {
            self.0.push("change_min");
        }
        fn change_max(&mut self) {
            self.0.push("change_max");
        }
        fn fix(&mut self) {
            self.0.push("fix");
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut sm = Copier::new();
        assert_eq!(
            SparseSetDomain::new(&mut sm, std::iter::empty()).err(),
            Some(Error::EmptyDomain)
        );
    }

    #[test]
    fn sparse_input_removes_holes() {
        let mut sm = Copier::new();
        let d = SparseSetDomain::new(&mut sm, [2, 6, 4]).unwrap();
        assert_eq!(d.to_vec(&sm), vec![2, 4, 6]);
        assert_eq!(d.min(&sm), 2);
        assert_eq!(d.max(&sm), 6);
        assert_eq!(d.size(&sm), 3);
        assert!(!d.contains(&sm, 3));
    }

    #[test]
    fn remove_event_sequences() {
        let mut sm = Copier::new();
        let mut log = Log::default();
        let mut d = SparseSetDomain::new(&mut sm, 5..10).unwrap();

        d.remove(&mut sm, 7, &mut log);
        assert_eq!(log.take(), vec!["change"]);

        d.remove(&mut sm, 7, &mut log);
        assert_eq!(log.take(), Vec::<&str>::new());

        d.remove(&mut sm, 5, &mut log);
        assert_eq!(log.take(), vec!["change", "change_min"]);
        assert_eq!(d.to_vec(&sm), vec![6, 8, 9]);

        sm.save_state();
        d.remove_below(&mut sm, 9, &mut log);
        assert_eq!(log.take(), vec!["fix", "change_min", "change"]);
        assert_eq!(d.to_vec(&sm), vec![9]);

        d.remove(&mut sm, 9, &mut log);
        assert_eq!(
            log.take(),
            vec!["empty", "change", "change_min", "change_max"]
        );
        assert_eq!(d.size(&sm), 0);

        sm.restore_state();
        assert_eq!(d.to_vec(&sm), vec![6, 8, 9]);
    }

    #[test]
    fn remove_above_event_sequence() {
        let mut sm = Copier::new();
        let mut log = Log::default();
        let mut d = SparseSetDomain::new(&mut sm, [6, 8, 9]).unwrap();
        d.remove_above(&mut sm, 6, &mut log);
        assert_eq!(log.take(), vec!["fix", "change_max", "change"]);
        assert_eq!(d.to_vec(&sm), vec![6]);
        // Already satisfied: nothing fires.
        d.remove_above(&mut sm, 6, &mut log);
        assert_eq!(log.take(), Vec::<&str>::new());
    }

    #[test]
    fn remove_all_but_event_sequences() {
        let mut sm = Copier::new();
        let mut log = Log::default();
        let mut d = SparseSetDomain::new(&mut sm, [6, 8, 9]).unwrap();

        d.remove_all_but(&mut sm, 8, &mut log);
        assert_eq!(log.take(), vec!["fix", "change", "change_min", "change_max"]);
        assert_eq!(d.to_vec(&sm), vec![8]);

        // Fixing to the value already fixed is a no-op.
        d.remove_all_but(&mut sm, 8, &mut log);
        assert_eq!(log.take(), Vec::<&str>::new());

        // Fixing to an absent value clears the domain.
        d.remove_all_but(&mut sm, 9, &mut log);
        assert_eq!(log.take(), vec!["empty"]);
        assert_eq!(d.size(&sm), 0);
    }

    #[test]
    fn remove_all_but_keeps_untouched_bounds_quiet() {
        let mut sm = Copier::new();
        let mut log = Log::default();
        let mut d = SparseSetDomain::new(&mut sm, [3, 4, 5]).unwrap();
        d.remove_all_but(&mut sm, 3, &mut log);
        // min stayed at 3, so only the max moved.
        assert_eq!(log.take(), vec!["fix", "change", "change_max"]);
    }

    #[test]
    fn recorder_preserves_order() {
        let mut sm = Copier::new();
        let mut rec = EventRecorder::default();
        let mut d = SparseSetDomain::new(&mut sm, 0..4).unwrap();
        d.remove_below(&mut sm, 3, &mut rec);
        assert_eq!(
            rec.iter().collect::<Vec<_>>(),
            vec![DomainEvent::Fix, DomainEvent::ChangeMin, DomainEvent::Change]
        );
    }
}

//! A reversible sparse set over a contiguous integer universe.
//!
//! Two parallel arrays `values` and `indices` hold a permutation of the
//! universe such that `values[indices[v]] == v`; the first `size` entries of
//! `values` are the live elements. Removal swaps the victim with the last
//! live element and shrinks `size`; nothing ever shifts, so membership stays
//! O(1) and restoring `size`/`min`/`max` (all reversible cells) undoes any
//! sequence of removals.

use crate::solver::state::{ReversibleInt, StateManager};

pub struct StateSparseSet {
    values: Vec<usize>,
    indices: Vec<usize>,
    size: ReversibleInt,
    min: ReversibleInt,
    max: ReversibleInt,
    offset: i32,
}

impl StateSparseSet {
    /// Creates the full set over `[min, max]`.
    pub fn new(sm: &mut dyn StateManager, min: i32, max: i32) -> Self {
        assert!(min <= max, "sparse set universe is empty");
        let n = (max - min + 1) as usize;
        Self {
            values: (0..n).collect(),
            indices: (0..n).collect(),
            size: sm.make_state_int(n as i32),
            min: sm.make_state_int(0),
            max: sm.make_state_int(n as i32 - 1),
            offset: min,
        }
    }

    pub fn size(&self, sm: &dyn StateManager) -> usize {
        self.size.value(sm) as usize
    }

    pub fn is_empty(&self, sm: &dyn StateManager) -> bool {
        self.size(sm) == 0
    }

    pub fn min(&self, sm: &dyn StateManager) -> i32 {
        assert!(!self.is_empty(sm), "min of an empty set");
        self.min.value(sm) + self.offset
    }

    pub fn max(&self, sm: &dyn StateManager) -> i32 {
        assert!(!self.is_empty(sm), "max of an empty set");
        self.max.value(sm) + self.offset
    }

    pub fn contains(&self, sm: &dyn StateManager, value: i32) -> bool {
        self.raw_contains(sm, value - self.offset)
    }

    /// Membership on internal values; tolerates values outside the universe.
    fn raw_contains(&self, sm: &dyn StateManager, intern: i32) -> bool {
        if intern < self.min.value(sm) || intern > self.max.value(sm) {
            return false;
        }
        self.indices[intern as usize] < self.size(sm)
    }

    /// Removes `value` in O(1). Returns whether it was present.
    pub fn remove(&mut self, sm: &mut dyn StateManager, value: i32) -> bool {
        if !self.contains(sm, value) {
            return false;
        }
        let intern = (value - self.offset) as usize;
        let last = self.values[self.size(sm) - 1];
        self.swap_positions(intern, last);
        self.size.decrement(sm);
        self.update_min(sm, intern);
        self.update_max(sm, intern);
        true
    }

    fn swap_positions(&mut self, v1: usize, v2: usize) {
        let i1 = self.indices[v1];
        let i2 = self.indices[v2];
        self.values[i1] = v2;
        self.values[i2] = v1;
        self.indices[v1] = i2;
        self.indices[v2] = i1;
    }

    /// Shrinks the set to the single element `value`, which must be present.
    pub fn remove_all_but(&mut self, sm: &mut dyn StateManager, value: i32) {
        debug_assert!(self.contains(sm, value), "value is not in the set");
        let intern = (value - self.offset) as usize;
        let index = self.indices[intern];
        self.indices[intern] = 0;
        self.indices[self.values[0]] = index;
        self.values.swap(0, index);
        self.size.set_value(sm, 1);
        self.min.set_value(sm, intern as i32);
        self.max.set_value(sm, intern as i32);
    }

    pub fn remove_all(&mut self, sm: &mut dyn StateManager) {
        self.size.set_value(sm, 0);
    }

    /// Removes every element strictly below `value`. The set must be
    /// non-empty.
    pub fn remove_below(&mut self, sm: &mut dyn StateManager, value: i32) {
        if value > self.max(sm) {
            self.remove_all(sm);
        } else {
            let mut v = self.min(sm);
            while v < value {
                self.remove(sm, v);
                v += 1;
            }
        }
    }

    /// Removes every element strictly above `value`. The set must be
    /// non-empty.
    pub fn remove_above(&mut self, sm: &mut dyn StateManager, value: i32) {
        if value < self.min(sm) {
            self.remove_all(sm);
        } else {
            let mut v = self.max(sm);
            while v > value {
                self.remove(sm, v);
                v -= 1;
            }
        }
    }

    fn update_min(&mut self, sm: &mut dyn StateManager, removed: usize) {
        if !self.is_empty(sm) && removed as i32 == self.min.value(sm) {
            let mut val = self.min.value(sm) + 1;
            while !self.raw_contains(sm, val) {
                val += 1;
            }
            self.min.set_value(sm, val);
        }
    }

    fn update_max(&mut self, sm: &mut dyn StateManager, removed: usize) {
        if !self.is_empty(sm) && removed as i32 == self.max.value(sm) {
            let mut val = self.max.value(sm) - 1;
            while !self.raw_contains(sm, val) {
                val -= 1;
            }
            self.max.set_value(sm, val);
        }
    }

    /// Copies the live elements into `dest` in no particular order.
    pub fn fill(&self, sm: &dyn StateManager, dest: &mut Vec<i32>) {
        dest.clear();
        dest.extend(
            self.values[..self.size(sm)]
                .iter()
                .map(|&v| v as i32 + self.offset),
        );
    }

    /// The live elements in increasing order.
    pub fn to_vec(&self, sm: &dyn StateManager) -> Vec<i32> {
        let mut out = Vec::new();
        self.fill(sm, &mut out);
        out.sort_unstable();
        out
    }
}

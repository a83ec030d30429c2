//! Integer variables.
//!
//! An [`IntVar`] is a copyable handle into the solver's variable store. Each
//! variable owns a sparse-set domain and three reversible stacks of
//! subscribed constraints; every domain event reported by a mutator is
//! translated here into scheduling (or into
//! [`Error::Inconsistency`](crate::Error::Inconsistency) when the domain
//! wiped out).

use crate::error::{Error, Result};
use crate::solver::constraint::ConstraintId;
use crate::solver::constraints::func::FuncConstraint;
use crate::solver::domain::{DomainEvent, EventRecorder, SparseSetDomain};
use crate::solver::engine::Solver;
use crate::solver::state_stack::StateStack;

/// Handle to an integer variable of a [`Solver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntVar(pub(crate) u32);

impl IntVar {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

pub(crate) struct VarEntry {
    pub(crate) domain: SparseSetDomain,
    pub(crate) on_domain: StateStack<ConstraintId>,
    pub(crate) on_bound: StateStack<ConstraintId>,
    pub(crate) on_fix: StateStack<ConstraintId>,
}

#[derive(Clone, Copy)]
enum Watched {
    Domain,
    Bound,
    Fix,
}

impl Solver {
    /// Creates a variable whose domain is the set of values yielded by
    /// `values`, and registers it on the reversible variable stack.
    ///
    /// Returns [`Error::EmptyDomain`] when `values` is empty.
    pub fn add_variable(&mut self, values: impl IntoIterator<Item = i32>) -> Result<IntVar> {
        let domain = SparseSetDomain::new(self.state.as_mut(), values)?;
        let on_domain = StateStack::new(self.state.as_mut());
        let on_bound = StateStack::new(self.state.as_mut());
        let on_fix = StateStack::new(self.state.as_mut());
        self.vars.push(VarEntry {
            domain,
            on_domain,
            on_bound,
            on_fix,
        });
        let var = IntVar(self.vars.len() as u32 - 1);
        self.active_vars.push(self.state.as_mut(), var);
        Ok(var)
    }

    /// The live variables, in creation order. Variables created inside a
    /// since-restored search branch are not yielded.
    pub fn variables(&self) -> impl Iterator<Item = IntVar> + '_ {
        (0..self.active_vars.len(self.state.as_ref()))
            .map(move |i| self.active_vars.get(self.state.as_ref(), i))
    }

    pub fn min(&self, x: IntVar) -> i32 {
        self.vars[x.index()].domain.min(self.state.as_ref())
    }

    pub fn max(&self, x: IntVar) -> i32 {
        self.vars[x.index()].domain.max(self.state.as_ref())
    }

    pub fn size(&self, x: IntVar) -> usize {
        self.vars[x.index()].domain.size(self.state.as_ref())
    }

    pub fn contains(&self, x: IntVar, v: i32) -> bool {
        self.vars[x.index()].domain.contains(self.state.as_ref(), v)
    }

    pub fn is_fixed(&self, x: IntVar) -> bool {
        self.vars[x.index()].domain.is_fixed(self.state.as_ref())
    }

    /// The domain of `x` in increasing order.
    pub fn domain_values(&self, x: IntVar) -> Vec<i32> {
        self.vars[x.index()].domain.to_vec(self.state.as_ref())
    }

    /// Copies the domain of `x` into `dest` (unsorted). Lets filtering code
    /// iterate a domain snapshot through a reusable scratch buffer while it
    /// removes values from the live domain.
    pub fn fill_array(&self, x: IntVar, dest: &mut Vec<i32>) {
        self.vars[x.index()].domain.fill(self.state.as_ref(), dest);
    }

    /// Removes `v` from the domain of `x`.
    pub fn remove(&mut self, x: IntVar, v: i32) -> Result<()> {
        let mut events = EventRecorder::default();
        self.vars[x.index()]
            .domain
            .remove(self.state.as_mut(), v, &mut events);
        self.apply_events(x, &events)
    }

    /// Fixes `x` to `v`, removing every other value.
    pub fn fix(&mut self, x: IntVar, v: i32) -> Result<()> {
        let mut events = EventRecorder::default();
        self.vars[x.index()]
            .domain
            .remove_all_but(self.state.as_mut(), v, &mut events);
        self.apply_events(x, &events)
    }

    /// Removes every value of `x` below `v`.
    pub fn remove_below(&mut self, x: IntVar, v: i32) -> Result<()> {
        let mut events = EventRecorder::default();
        self.vars[x.index()]
            .domain
            .remove_below(self.state.as_mut(), v, &mut events);
        self.apply_events(x, &events)
    }

    /// Removes every value of `x` above `v`.
    pub fn remove_above(&mut self, x: IntVar, v: i32) -> Result<()> {
        let mut events = EventRecorder::default();
        self.vars[x.index()]
            .domain
            .remove_above(self.state.as_mut(), v, &mut events);
        self.apply_events(x, &events)
    }

    /// Schedules `c` whenever any value is removed from `x`.
    pub fn propagate_on_domain_change(&mut self, x: IntVar, c: ConstraintId) {
        self.vars[x.index()].on_domain.push(self.state.as_mut(), c);
    }

    /// Schedules `c` whenever the minimum or maximum of `x` moves.
    pub fn propagate_on_bound_change(&mut self, x: IntVar, c: ConstraintId) {
        self.vars[x.index()].on_bound.push(self.state.as_mut(), c);
    }

    /// Schedules `c` when `x` becomes fixed.
    pub fn propagate_on_fix(&mut self, x: IntVar, c: ConstraintId) {
        self.vars[x.index()].on_fix.push(self.state.as_mut(), c);
    }

    /// Runs `f` (as a constraint) whenever the domain of `x` changes.
    pub fn when_domain_change(
        &mut self,
        x: IntVar,
        f: impl FnMut(&mut Solver) -> Result<()> + 'static,
    ) -> Result<ConstraintId> {
        let cid = self.post_with(FuncConstraint::new(f), false)?;
        self.propagate_on_domain_change(x, cid);
        Ok(cid)
    }

    /// Runs `f` (as a constraint) whenever a bound of `x` moves.
    pub fn when_bound_change(
        &mut self,
        x: IntVar,
        f: impl FnMut(&mut Solver) -> Result<()> + 'static,
    ) -> Result<ConstraintId> {
        let cid = self.post_with(FuncConstraint::new(f), false)?;
        self.propagate_on_bound_change(x, cid);
        Ok(cid)
    }

    /// Runs `f` (as a constraint) when `x` becomes fixed.
    pub fn when_fixed(
        &mut self,
        x: IntVar,
        f: impl FnMut(&mut Solver) -> Result<()> + 'static,
    ) -> Result<ConstraintId> {
        let cid = self.post_with(FuncConstraint::new(f), false)?;
        self.propagate_on_fix(x, cid);
        Ok(cid)
    }

    fn apply_events(&mut self, x: IntVar, events: &EventRecorder) -> Result<()> {
        for event in events.iter() {
            match event {
                DomainEvent::Empty => return Err(Error::Inconsistency),
                DomainEvent::Change => self.schedule_watchers(x, Watched::Domain),
                DomainEvent::ChangeMin | DomainEvent::ChangeMax => {
                    self.schedule_watchers(x, Watched::Bound)
                }
                DomainEvent::Fix => self.schedule_watchers(x, Watched::Fix),
            }
        }
        Ok(())
    }

    fn schedule_watchers(&mut self, x: IntVar, watched: Watched) {
        let n = self.watcher_stack(x, watched).len(self.state.as_ref());
        for i in 0..n {
            let cid = self.watcher_stack(x, watched).get(self.state.as_ref(), i);
            self.schedule(cid);
        }
    }

    fn watcher_stack(&self, x: IntVar, watched: Watched) -> &StateStack<ConstraintId> {
        let entry = &self.vars[x.index()];
        match watched {
            Watched::Domain => &entry.on_domain,
            Watched::Bound => &entry.on_bound,
            Watched::Fix => &entry.on_fix,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn observers_and_mutators() {
        let mut cp = Solver::new();
        let x = cp.add_variable([2, 3, 4, 6, 8]).unwrap();
        assert_eq!(cp.size(x), 5);
        assert!(cp.contains(x, 3));
        assert!(!cp.contains(x, 18));
        assert_eq!((cp.min(x), cp.max(x)), (2, 8));
        assert!(!cp.is_fixed(x));

        cp.state_manager_mut().save_state();
        cp.remove(x, 3).unwrap();
        assert_eq!(cp.domain_values(x), vec![2, 4, 6, 8]);
        cp.remove(x, 3).unwrap();
        cp.fix(x, 4).unwrap();
        assert_eq!(cp.domain_values(x), vec![4]);
        assert!(cp.is_fixed(x));

        cp.state_manager_mut().restore_state();
        assert_eq!(cp.domain_values(x), vec![2, 3, 4, 6, 8]);

        cp.remove_below(x, 1).unwrap();
        assert_eq!(cp.domain_values(x), vec![2, 3, 4, 6, 8]);
        cp.remove_below(x, 6).unwrap();
        assert_eq!(cp.domain_values(x), vec![6, 8]);
        assert_eq!(cp.remove_below(x, 10), Err(Error::Inconsistency));
    }

    #[test]
    fn bound_and_removal_mutations_reverse_exactly() {
        for mut cp in [
            Solver::new(),
            Solver::with_state_manager(Box::new(crate::solver::state::Trailer::new())),
        ] {
            let x = cp.add_variable([3, 4, 5, 6, 7]).unwrap();
            cp.state_manager_mut().save_state();
            cp.remove_below(x, 5).unwrap();
            assert_eq!(cp.domain_values(x), vec![5, 6, 7]);
            cp.state_manager_mut().save_state();
            cp.remove(x, 6).unwrap();
            assert_eq!(cp.domain_values(x), vec![5, 7]);
            cp.state_manager_mut().restore_state();
            assert_eq!(cp.domain_values(x), vec![5, 6, 7]);
            cp.state_manager_mut().restore_state();
            assert_eq!(cp.domain_values(x), vec![3, 4, 5, 6, 7]);
        }
    }

    #[test]
    fn empty_iterable_is_rejected() {
        let mut cp = Solver::new();
        assert_eq!(cp.add_variable(2..2).err(), Some(Error::EmptyDomain));
    }

    #[test]
    fn fixing_to_an_absent_value_is_inconsistent() {
        let mut cp = Solver::new();
        let x = cp.add_variable([1, 2]).unwrap();
        assert_eq!(cp.fix(x, 5), Err(Error::Inconsistency));
    }

    #[test]
    fn variables_created_in_a_branch_disappear_on_restore() {
        let mut cp = Solver::new();
        let x = cp.add_variable(0..2).unwrap();
        cp.state_manager_mut().save_state();
        let y = cp.add_variable(0..2).unwrap();
        assert_eq!(cp.variables().collect::<Vec<_>>(), vec![x, y]);
        cp.state_manager_mut().restore_state();
        assert_eq!(cp.variables().collect::<Vec<_>>(), vec![x]);
    }

    #[test]
    fn when_fixed_runs_on_fix() {
        let mut cp = Solver::new();
        let x = cp.add_variable(0..4).unwrap();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        cp.when_fixed(x, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();
        assert_eq!(fired.get(), 0);
        cp.remove(x, 3).unwrap();
        cp.fix_point().unwrap();
        assert_eq!(fired.get(), 0);
        cp.fix(x, 1).unwrap();
        cp.fix_point().unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn when_domain_change_runs_on_any_removal() {
        let mut cp = Solver::new();
        let x = cp.add_variable(0..4).unwrap();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        cp.when_domain_change(x, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();
        cp.remove(x, 2).unwrap();
        cp.fix_point().unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn when_bound_change_runs_when_a_bound_moves() {
        let mut cp = Solver::new();
        let x = cp.add_variable(0..5).unwrap();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        cp.when_bound_change(x, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();
        // An interior removal does not move a bound.
        cp.remove(x, 2).unwrap();
        cp.fix_point().unwrap();
        assert_eq!(fired.get(), 0);
        cp.remove_below(x, 1).unwrap();
        cp.fix_point().unwrap();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn subscription_stacks_roll_back() {
        let mut cp = Solver::new();
        let x = cp.add_variable(0..4).unwrap();
        let fired = Rc::new(Cell::new(0));
        cp.state_manager_mut().save_state();
        let counter = Rc::clone(&fired);
        cp.when_domain_change(x, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();
        cp.state_manager_mut().restore_state();
        // The subscription was undone with the state.
        cp.remove(x, 2).unwrap();
        cp.fix_point().unwrap();
        assert_eq!(fired.get(), 0);
    }
}

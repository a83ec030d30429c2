//! The solver core: constraint registry, propagation queue and fix point.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::Result;
use crate::solver::constraint::{Constraint, ConstraintId};
use crate::solver::state::{Copier, ReversibleBool, StateManager};
use crate::solver::state_stack::StateStack;
use crate::solver::variable::{IntVar, VarEntry};

pub(crate) struct ConstraintSlot {
    /// Taken out while the constraint runs so it can receive `&mut Solver`.
    pub(crate) body: Option<Box<dyn Constraint>>,
    /// Queue membership; not reversible.
    pub(crate) scheduled: bool,
    /// Reversible: an entailed constraint deactivates itself for the rest of
    /// the subtree and is revived by the restore.
    pub(crate) active: ReversibleBool,
}

/// A constraint-programming solver over integer variables.
///
/// The solver owns the reversible state manager, every variable and every
/// posted constraint. Model code creates variables with
/// [`add_variable`](Solver::add_variable), posts constraints with
/// [`post`](Solver::post) (which runs the propagation fix point), and hands
/// the solver to [`DFSearch`](crate::solver::search::DFSearch) to enumerate
/// solutions.
pub struct Solver {
    pub(crate) state: Box<dyn StateManager>,
    pub(crate) vars: Vec<VarEntry>,
    pub(crate) active_vars: StateStack<IntVar>,
    pub(crate) constraints: Vec<ConstraintSlot>,
    pub(crate) queue: VecDeque<ConstraintId>,
    pub(crate) fix_point_listeners: Vec<Box<dyn FnMut()>>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// A solver backed by the copy strategy.
    pub fn new() -> Self {
        Self::with_state_manager(Box::new(Copier::new()))
    }

    /// A solver backed by the given state-manager strategy.
    pub fn with_state_manager(mut state: Box<dyn StateManager>) -> Self {
        let active_vars = StateStack::new(state.as_mut());
        Self {
            state,
            vars: Vec::new(),
            active_vars,
            constraints: Vec::new(),
            queue: VecDeque::new(),
            fix_point_listeners: Vec::new(),
        }
    }

    pub fn state_manager(&self) -> &dyn StateManager {
        self.state.as_ref()
    }

    pub fn state_manager_mut(&mut self) -> &mut dyn StateManager {
        self.state.as_mut()
    }

    /// Posts `c` and runs the fix point.
    pub fn post(&mut self, c: impl Constraint + 'static) -> Result<ConstraintId> {
        self.post_with(c, true)
    }

    /// Posts `c`, optionally skipping the fix point (used when a batch of
    /// constraints is installed and a single fix point at the end suffices,
    /// and by subscription setup to avoid recursive fix points).
    pub fn post_with(
        &mut self,
        c: impl Constraint + 'static,
        enforce_fix_point: bool,
    ) -> Result<ConstraintId> {
        let cid = self.register(Box::new(c));
        if let Err(error) = self.run_post(cid) {
            debug!(cid, %error, "constraint rejected at post time");
            self.clear_queue();
            return Err(error);
        }
        if enforce_fix_point {
            self.fix_point()?;
        }
        Ok(cid)
    }

    fn register(&mut self, body: Box<dyn Constraint>) -> ConstraintId {
        let active = self.state.make_state_bool(true);
        self.constraints.push(ConstraintSlot {
            body: Some(body),
            scheduled: false,
            active,
        });
        self.constraints.len() - 1
    }

    fn run_post(&mut self, cid: ConstraintId) -> Result<()> {
        let mut body = self.constraints[cid]
            .body
            .take()
            .expect("constraint entered re-entrantly");
        let result = body.post(self, cid);
        self.constraints[cid].body = Some(body);
        result
    }

    /// Enqueues `c` unless it is inactive or already queued.
    pub fn schedule(&mut self, c: ConstraintId) {
        let active = self.constraints[c].active.value(self.state.as_ref());
        if active && !self.constraints[c].scheduled {
            self.constraints[c].scheduled = true;
            self.queue.push_back(c);
        }
    }

    pub fn is_scheduled(&self, c: ConstraintId) -> bool {
        self.constraints[c].scheduled
    }

    pub fn is_active(&self, c: ConstraintId) -> bool {
        self.constraints[c].active.value(self.state.as_ref())
    }

    /// Reversibly activates or deactivates `c`. An inactive constraint is
    /// skipped when dequeued and never re-enqueued until a restore revives
    /// it.
    pub fn set_active(&mut self, c: ConstraintId, active: bool) {
        self.constraints[c].active.set_value(self.state.as_mut(), active);
    }

    /// Registers a listener fired at the start of every fix point. This is
    /// also the hook a bound-and-prune objective would use to tighten its
    /// bound on each solve step.
    pub fn on_fix_point(&mut self, listener: Box<dyn FnMut()>) {
        self.fix_point_listeners.push(listener);
    }

    /// Propagates until quiescence or inconsistency.
    ///
    /// On inconsistency the queue is drained, every drained constraint is
    /// unscheduled, and the error is re-raised.
    pub fn fix_point(&mut self) -> Result<()> {
        self.notify_fix_point();
        while let Some(cid) = self.queue.pop_front() {
            if let Err(error) = self.propagate(cid) {
                self.clear_queue();
                debug!(cid, "inconsistency during propagation, queue drained");
                return Err(error);
            }
        }
        trace!("propagation reached a fix point");
        Ok(())
    }

    fn propagate(&mut self, cid: ConstraintId) -> Result<()> {
        self.constraints[cid].scheduled = false;
        if !self.constraints[cid].active.value(self.state.as_ref()) {
            return Ok(());
        }
        let mut body = self.constraints[cid]
            .body
            .take()
            .expect("constraint entered re-entrantly");
        trace!(cid, constraint = ?body, "propagating");
        let result = body.propagate(self, cid);
        self.constraints[cid].body = Some(body);
        result
    }

    fn clear_queue(&mut self) {
        while let Some(cid) = self.queue.pop_front() {
            self.constraints[cid].scheduled = false;
        }
    }

    fn notify_fix_point(&mut self) {
        if self.fix_point_listeners.is_empty() {
            return;
        }
        let mut active = std::mem::take(&mut self.fix_point_listeners);
        for listener in &mut active {
            listener();
        }
        let added = std::mem::replace(&mut self.fix_point_listeners, active);
        self.fix_point_listeners.extend(added);
    }
}

use crate::error::Result;
use crate::solver::engine::Solver;

/// A numeric identifier for a posted constraint.
///
/// The solver keeps the scheduled flag and the reversible active flag in a
/// per-constraint slot addressed by this id; constraints receive their own id
/// in `post`/`propagate` so they can subscribe to variables and deactivate
/// themselves.
pub type ConstraintId = usize;

/// The propagation contract.
///
/// `post` is called exactly once, when the constraint is added to the solver:
/// it registers subscriptions on its variables and performs the initial
/// filtering. `propagate` runs whenever the constraint is dequeued from the
/// propagation queue while active. Both may raise
/// [`Error::Inconsistency`](crate::Error::Inconsistency) and must leave the
/// solver consistent before doing so.
pub trait Constraint: std::fmt::Debug {
    fn post(&mut self, cp: &mut Solver, cid: ConstraintId) -> Result<()>;

    fn propagate(&mut self, cp: &mut Solver, cid: ConstraintId) -> Result<()>;
}

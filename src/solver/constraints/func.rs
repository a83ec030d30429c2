use crate::error::Result;
use crate::solver::constraint::{Constraint, ConstraintId};
use crate::solver::engine::Solver;

/// Wraps a closure as a constraint whose `propagate` runs the closure.
///
/// This is what backs the variable `when_*` subscriptions: the closure is
/// posted (without enforcing a fix point) and scheduled like any other
/// constraint.
pub struct FuncConstraint<F> {
    filtering: F,
}

impl<F> FuncConstraint<F>
where
    F: FnMut(&mut Solver) -> Result<()>,
{
    pub fn new(filtering: F) -> Self {
        Self { filtering }
    }
}

impl<F> std::fmt::Debug for FuncConstraint<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FuncConstraint")
    }
}

impl<F> Constraint for FuncConstraint<F>
where
    F: FnMut(&mut Solver) -> Result<()>,
{
    fn post(&mut self, _cp: &mut Solver, _cid: ConstraintId) -> Result<()> {
        Ok(())
    }

    fn propagate(&mut self, cp: &mut Solver, _cid: ConstraintId) -> Result<()> {
        (self.filtering)(cp)
    }
}

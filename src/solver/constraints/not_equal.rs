use crate::error::Result;
use crate::solver::constraint::{Constraint, ConstraintId};
use crate::solver::engine::Solver;
use crate::solver::variable::IntVar;

/// Enforces `x != y + offset`.
///
/// Nothing can be filtered until one side is fixed, so the constraint only
/// subscribes on fix events. Once it has propagated it is entailed for the
/// rest of the subtree and deactivates itself; backtracking past the
/// deactivation revives it.
#[derive(Debug, Clone)]
pub struct NotEqual {
    x: IntVar,
    y: IntVar,
    offset: i32,
}

impl NotEqual {
    pub fn new(x: IntVar, y: IntVar) -> Self {
        Self::with_offset(x, y, 0)
    }

    pub fn with_offset(x: IntVar, y: IntVar, offset: i32) -> Self {
        Self { x, y, offset }
    }
}

impl Constraint for NotEqual {
    fn post(&mut self, cp: &mut Solver, cid: ConstraintId) -> Result<()> {
        if cp.is_fixed(self.y) {
            cp.remove(self.x, cp.min(self.y) + self.offset)
        } else if cp.is_fixed(self.x) {
            cp.remove(self.y, cp.min(self.x) - self.offset)
        } else {
            cp.propagate_on_fix(self.x, cid);
            cp.propagate_on_fix(self.y, cid);
            Ok(())
        }
    }

    fn propagate(&mut self, cp: &mut Solver, cid: ConstraintId) -> Result<()> {
        if cp.is_fixed(self.y) {
            cp.remove(self.x, cp.min(self.y) + self.offset)?;
        } else {
            cp.remove(self.y, cp.min(self.x) - self.offset)?;
        }
        cp.set_active(cid, false);
        Ok(())
    }
}

use crate::error::Result;
use crate::solver::constraint::{Constraint, ConstraintId};
use crate::solver::engine::Solver;
use crate::solver::variable::IntVar;

/// Enforces `x == y`.
///
/// When one side is already fixed at post time the other is fixed outright.
/// Otherwise both bounds are intersected, each domain is pruned of values the
/// other lacks, and the constraint re-runs on every domain change of either
/// side. Pruning iterates a snapshot of the target domain taken into a
/// reusable scratch buffer, since values are removed from the live domain
/// while iterating.
#[derive(Debug)]
pub struct Equal {
    x: IntVar,
    y: IntVar,
    values: Vec<i32>,
}

impl Equal {
    pub fn new(x: IntVar, y: IntVar) -> Self {
        Self {
            x,
            y,
            values: Vec::new(),
        }
    }

    fn bounds_intersect(&self, cp: &mut Solver) -> Result<()> {
        let new_min = cp.min(self.x).max(cp.min(self.y));
        let new_max = cp.max(self.x).min(cp.max(self.y));
        cp.remove_below(self.x, new_min)?;
        cp.remove_above(self.x, new_max)?;
        cp.remove_below(self.y, new_min)?;
        cp.remove_above(self.y, new_max)?;
        Ok(())
    }

    /// Removes from `to` every value absent from `from`.
    fn prune_equals(&mut self, cp: &mut Solver, from: IntVar, to: IntVar) -> Result<()> {
        cp.fill_array(to, &mut self.values);
        for &v in &self.values {
            if !cp.contains(from, v) {
                cp.remove(to, v)?;
            }
        }
        Ok(())
    }
}

impl Constraint for Equal {
    fn post(&mut self, cp: &mut Solver, cid: ConstraintId) -> Result<()> {
        if cp.is_fixed(self.y) {
            cp.fix(self.x, cp.min(self.y))
        } else if cp.is_fixed(self.x) {
            cp.fix(self.y, cp.min(self.x))
        } else {
            self.bounds_intersect(cp)?;
            self.prune_equals(cp, self.y, self.x)?;
            self.prune_equals(cp, self.x, self.y)?;
            cp.propagate_on_domain_change(self.x, cid);
            cp.propagate_on_domain_change(self.y, cid);
            Ok(())
        }
    }

    fn propagate(&mut self, cp: &mut Solver, _cid: ConstraintId) -> Result<()> {
        self.bounds_intersect(cp)?;
        self.prune_equals(cp, self.y, self.x)?;
        self.prune_equals(cp, self.x, self.y)?;
        Ok(())
    }
}

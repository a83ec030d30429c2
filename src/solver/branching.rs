//! Branching strategies for the depth-first search.
//!
//! A strategy inspects the solver and returns the child branches of the
//! current node; an empty list marks a solution leaf. Every strategy here is
//! binary: it picks an unfixed variable `x`, takes `m = min(x)`, and returns
//! the pair `x == m` / `x != m`, each posted against a fresh singleton
//! variable created inside the branch scope so the restore unwinds it.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::solver::constraints::equal::Equal;
use crate::solver::constraints::not_equal::NotEqual;
use crate::solver::engine::Solver;
use crate::solver::variable::IntVar;

/// A branch action: mutates the solver to enter a child node, typically by
/// posting a constraint (which runs the fix point).
pub type Branch = Box<dyn FnOnce(&mut Solver) -> Result<()>>;

/// The two branches `x == v` and `x != v`, in that order.
pub fn branch_on(x: IntVar, v: i32) -> Vec<Branch> {
    let left: Branch = Box::new(move |cp: &mut Solver| {
        let value = cp.add_variable([v])?;
        cp.post(Equal::new(x, value))?;
        Ok(())
    });
    let right: Branch = Box::new(move |cp: &mut Solver| {
        let value = cp.add_variable([v])?;
        cp.post(NotEqual::new(x, value))?;
        Ok(())
    });
    vec![left, right]
}

/// The default strategy: branch on the first unfixed variable in solver
/// order.
pub fn first_unfixed(cp: &mut Solver) -> Vec<Branch> {
    match cp.variables().find(|&x| !cp.is_fixed(x)) {
        None => Vec::new(),
        Some(x) => branch_on(x, cp.min(x)),
    }
}

/// Fail-first: branch on the unfixed variable with the smallest domain,
/// breaking ties by creation order for determinism.
pub fn first_fail(cp: &mut Solver) -> Vec<Branch> {
    let candidate = cp
        .variables()
        .filter(|&x| !cp.is_fixed(x))
        .min_by_key(|&x| (cp.size(x), x.index()));
    match candidate {
        None => Vec::new(),
        Some(x) => branch_on(x, cp.min(x)),
    }
}

/// Branch on a uniformly random unfixed variable, driven by a seeded rng so
/// runs are reproducible.
pub fn randomized(seed: u64) -> impl FnMut(&mut Solver) -> Vec<Branch> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    move |cp: &mut Solver| {
        let unfixed: Vec<IntVar> = cp.variables().filter(|&x| !cp.is_fixed(x)).collect();
        match unfixed.choose(&mut rng) {
            None => Vec::new(),
            Some(&x) => branch_on(x, cp.min(x)),
        }
    }
}

//! Reverso is a small finite-domain constraint programming (CP) solver.
//!
//! The engine assigns integer values to variables subject to constraints by
//! interleaving domain reduction (propagation to a fix point) with
//! depth-first backtracking search over reversible state.
//!
//! # Core Concepts
//!
//! - **[`Solver`]**: owns the variables, the constraints, the propagation
//!   queue and the reversible [`StateManager`]. Posting a constraint runs
//!   propagation until quiescence or inconsistency.
//! - **[`IntVar`]**: a handle to an integer variable whose domain is a
//!   reversible sparse set; removals are undone when the enclosing state
//!   scope is restored.
//! - **[`Constraint`]**: the post/propagate contract. [`NotEqual`] and
//!   [`Equal`] ship with the crate; [`FuncConstraint`] wraps a closure.
//! - **[`DFSearch`]**: a depth-first search that wraps every branch in a
//!   save/restore pair and reports `branch`/`solution`/`failure` events.
//!
//! # Example: A Simple 2-Variable Problem
//!
//! Solving `a != b` where `a` can be `1` or `2` and `b` can only be `1`:
//! the solver deduces that `a` must be `2` at post time.
//!
//! ```
//! use reverso::constraints::not_equal::NotEqual;
//! use reverso::Solver;
//!
//! let mut cp = Solver::new();
//! let a = cp.add_variable([1, 2])?;
//! let b = cp.add_variable([1])?;
//! cp.post(NotEqual::new(a, b))?;
//!
//! assert!(cp.is_fixed(a));
//! assert_eq!(cp.min(a), 2);
//! # Ok::<(), reverso::Error>(())
//! ```
//!
//! # Example: Enumerating Solutions
//!
//! ```
//! use reverso::constraints::not_equal::NotEqual;
//! use reverso::{DFSearch, Solver};
//!
//! let mut cp = Solver::new();
//! let x = cp.add_variable(0..2)?;
//! let y = cp.add_variable(0..2)?;
//! cp.post(NotEqual::new(x, y))?;
//!
//! let mut solutions = Vec::new();
//! let mut search = DFSearch::new(&mut cp);
//! search.on_solution(|cp, _| solutions.push((cp.min(x), cp.min(y))));
//! let stats = search.solve();
//!
//! assert_eq!(stats.n_solutions, 2);
//! assert!(stats.completed);
//! # Ok::<(), reverso::Error>(())
//! ```
//!
//! Larger models (N-Queens, Sudoku) live in [`examples`].

pub mod error;
pub mod examples;
pub mod solver;

pub use error::{Error, Result};
pub use solver::{
    branching::{self, Branch},
    constraint::{Constraint, ConstraintId},
    constraints,
    constraints::{equal::Equal, func::FuncConstraint, not_equal::NotEqual},
    domain::{DomainEvent, DomainListener, SparseSetDomain},
    engine::Solver,
    search::{DFSearch, NodeInfo, SearchEvent, SearchStatistics},
    sparse_set::StateSparseSet,
    state::{
        make_state_obj, Copier, ReversibleBool, ReversibleInt, ReversibleObj, StateManager,
        Trailer,
    },
    state_stack::StateStack,
    stats::render_stats_table,
    variable::IntVar,
};

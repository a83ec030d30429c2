//! Depth-first search over the solver's reversible state.
//!
//! Every branch of the choice tree is wrapped in a `save_state` /
//! `restore_state` pair, so an inconsistent subtree unwinds without leaking
//! mutations into its siblings. Search events (`branch`, `solution`,
//! `failure`) are multiplexed to any number of handlers, fired in
//! registration order; handlers get a shared view of the solver so solution
//! handlers can read the fixed variables.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::solver::branching::{self, Branch};
use crate::solver::engine::Solver;

/// Counters aggregated over one `solve` call.
///
/// `completed` stays false when the limit predicate stopped the search
/// early; a completed search with zero solutions proves infeasibility.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStatistics {
    pub n_nodes: u64,
    pub n_failures: u64,
    pub n_solutions: u64,
    pub completed: bool,
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "\n\t#choice: {}\n\t#fail: {}\n\t#sols : {}\n\tcompleted : {}\n",
            self.n_nodes, self.n_failures, self.n_solutions, self.completed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEvent {
    Branch,
    Solution,
    Failure,
}

/// Identity of the search-tree node an event refers to.
#[derive(Debug, Clone, Copy)]
pub struct NodeInfo {
    pub node_id: u64,
    pub parent: Option<u64>,
    /// Position of this node among its siblings.
    pub position: Option<usize>,
    /// Zero for solution and failure leaves.
    pub n_children: usize,
}

type Handler<'a> = Box<dyn FnMut(&Solver, &NodeInfo) + 'a>;

/// A depth-first search bound to a solver and a branching strategy.
pub struct DFSearch<'a> {
    solver: &'a mut Solver,
    branching: Box<dyn FnMut(&mut Solver) -> Vec<Branch> + 'a>,
    on_branch: Vec<Handler<'a>>,
    on_solution: Vec<Handler<'a>>,
    on_failure: Vec<Handler<'a>>,
    cur_node_id: u64,
}

impl<'a> DFSearch<'a> {
    /// A search using the default binary branching
    /// ([`branching::first_unfixed`]).
    pub fn new(solver: &'a mut Solver) -> Self {
        Self::with_branching(solver, branching::first_unfixed)
    }

    pub fn with_branching(
        solver: &'a mut Solver,
        branching: impl FnMut(&mut Solver) -> Vec<Branch> + 'a,
    ) -> Self {
        Self {
            solver,
            branching: Box::new(branching),
            on_branch: Vec::new(),
            on_solution: Vec::new(),
            on_failure: Vec::new(),
            cur_node_id: 0,
        }
    }

    /// Registers `handler` for `event`; handlers fire in registration order.
    pub fn on(&mut self, event: SearchEvent, handler: impl FnMut(&Solver, &NodeInfo) + 'a) {
        let handlers = match event {
            SearchEvent::Branch => &mut self.on_branch,
            SearchEvent::Solution => &mut self.on_solution,
            SearchEvent::Failure => &mut self.on_failure,
        };
        handlers.push(Box::new(handler));
    }

    pub fn on_branch(&mut self, handler: impl FnMut(&Solver, &NodeInfo) + 'a) {
        self.on(SearchEvent::Branch, handler);
    }

    pub fn on_solution(&mut self, handler: impl FnMut(&Solver, &NodeInfo) + 'a) {
        self.on(SearchEvent::Solution, handler);
    }

    pub fn on_failure(&mut self, handler: impl FnMut(&Solver, &NodeInfo) + 'a) {
        self.on(SearchEvent::Failure, handler);
    }

    /// Explores the whole tree.
    pub fn solve(&mut self) -> SearchStatistics {
        self.solve_with_limit(|_| false)
    }

    /// Explores until exhaustion or until `limit` returns true. The limit is
    /// evaluated at the top of every node; when it fires, the current
    /// statistics are returned with `completed` left false.
    pub fn solve_with_limit(
        &mut self,
        mut limit: impl FnMut(&SearchStatistics) -> bool,
    ) -> SearchStatistics {
        let mut stats = SearchStatistics::default();
        self.cur_node_id = 0;
        let root_level = self.solver.state_manager().level();
        self.solver.state_manager_mut().save_state();
        let outcome = self.dfs(&mut stats, &mut limit, None, None);
        self.solver.state_manager_mut().restore_state_until(root_level);
        match outcome {
            Ok(()) => stats.completed = true,
            Err(Error::StopSearch) => {}
            Err(error) => panic!("search aborted by a non-search error: {error}"),
        }
        debug!(?stats, "search finished");
        stats
    }

    fn dfs(
        &mut self,
        stats: &mut SearchStatistics,
        limit: &mut dyn FnMut(&SearchStatistics) -> bool,
        parent: Option<u64>,
        position: Option<usize>,
    ) -> Result<()> {
        if limit(stats) {
            return Err(Error::StopSearch);
        }

        let branches = (self.branching)(&mut *self.solver);
        self.cur_node_id += 1;
        let node_id = self.cur_node_id;

        if branches.is_empty() {
            stats.n_solutions += 1;
            let info = NodeInfo {
                node_id,
                parent,
                position,
                n_children: 0,
            };
            Self::emit(&mut self.on_solution, self.solver, &info);
            return Ok(());
        }

        let info = NodeInfo {
            node_id,
            parent,
            position,
            n_children: branches.len(),
        };
        Self::emit(&mut self.on_branch, self.solver, &info);

        for (pos, branch) in branches.into_iter().enumerate() {
            let level = self.solver.state_manager().level();
            self.solver.state_manager_mut().save_state();
            stats.n_nodes += 1;

            let mut outcome = branch(&mut *self.solver);
            if outcome.is_ok() {
                outcome = self.dfs(stats, limit, Some(node_id), Some(pos));
            }
            match outcome {
                Ok(()) => {}
                Err(Error::Inconsistency) => {
                    stats.n_failures += 1;
                    self.cur_node_id += 1;
                    let info = NodeInfo {
                        node_id: self.cur_node_id,
                        parent: Some(node_id),
                        position: Some(pos),
                        n_children: 0,
                    };
                    Self::emit(&mut self.on_failure, self.solver, &info);
                }
                Err(stop) => {
                    self.solver.state_manager_mut().restore_state_until(level);
                    return Err(stop);
                }
            }
            self.solver.state_manager_mut().restore_state_until(level);
        }
        Ok(())
    }

    fn emit(handlers: &mut [Handler<'a>], solver: &Solver, info: &NodeInfo) {
        for handler in handlers {
            handler(solver, info);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::constraints::not_equal::NotEqual;

    fn two_variable_model() -> (Solver, Vec<crate::solver::variable::IntVar>) {
        let mut cp = Solver::new();
        let x = cp.add_variable(0..2).unwrap();
        let y = cp.add_variable(0..2).unwrap();
        cp.post(NotEqual::new(x, y)).unwrap();
        (cp, vec![x, y])
    }

    #[test]
    fn enumerates_every_solution_exactly_once() {
        let (mut cp, vars) = two_variable_model();
        let mut solutions = Vec::new();
        let stats;
        {
            let mut search = DFSearch::new(&mut cp);
            search.on_solution(|cp, _| {
                solutions.push(vars.iter().map(|&v| cp.min(v)).collect::<Vec<_>>());
            });
            stats = search.solve();
        }
        solutions.sort();
        assert_eq!(solutions, vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(stats.n_solutions, 2);
        assert!(stats.completed);
    }

    #[test]
    fn infeasible_model_completes_with_zero_solutions() {
        let mut cp = Solver::new();
        let x = cp.add_variable(0..2).unwrap();
        let y = cp.add_variable(0..2).unwrap();
        let z = cp.add_variable(0..2).unwrap();
        cp.post(NotEqual::new(x, y)).unwrap();
        cp.post(NotEqual::new(y, z)).unwrap();
        cp.post(NotEqual::new(x, z)).unwrap();
        let stats = DFSearch::new(&mut cp).solve();
        assert_eq!(stats.n_solutions, 0);
        assert!(stats.completed);
        assert!(stats.n_failures > 0);
    }

    #[test]
    fn limit_stops_the_search_without_completing() {
        let (mut cp, _) = two_variable_model();
        let stats =
            DFSearch::new(&mut cp).solve_with_limit(|stats| stats.n_solutions >= 1);
        assert_eq!(stats.n_solutions, 1);
        assert!(!stats.completed);
    }

    #[test]
    fn state_level_is_unchanged_by_solve() {
        let (mut cp, _) = two_variable_model();
        let before = cp.state_manager().level();
        DFSearch::new(&mut cp).solve();
        assert_eq!(cp.state_manager().level(), before);

        // Also when the search is cut short mid-tree.
        let before = cp.state_manager().level();
        DFSearch::new(&mut cp).solve_with_limit(|stats| stats.n_nodes >= 1);
        assert_eq!(cp.state_manager().level(), before);
    }

    #[test]
    fn solving_twice_gives_the_same_statistics() {
        let (mut cp, _) = two_variable_model();
        let first = DFSearch::new(&mut cp).solve();
        let second = DFSearch::new(&mut cp).solve();
        assert_eq!(first, second);
    }

    #[test]
    fn handlers_fire_in_registration_order() {
        let (mut cp, _) = two_variable_model();
        let order = std::cell::RefCell::new(Vec::new());
        {
            let mut search = DFSearch::new(&mut cp);
            search.on_solution(|_, _| order.borrow_mut().push("first"));
            search.on_solution(|_, _| order.borrow_mut().push("second"));
            search.solve_with_limit(|stats| stats.n_solutions >= 1);
        }
        assert_eq!(order.into_inner(), vec!["first", "second"]);
    }

    #[test]
    fn events_carry_consistent_node_ids() {
        let (mut cp, _) = two_variable_model();
        let mut branches = Vec::new();
        let mut solutions = Vec::new();
        {
            let mut search = DFSearch::new(&mut cp);
            search.on(SearchEvent::Branch, |_, info| branches.push(*info));
            search.on(SearchEvent::Solution, |_, info| solutions.push(*info));
            search.solve();
        }
        assert!(!branches.is_empty());
        assert_eq!(branches[0].parent, None);
        assert_eq!(branches[0].n_children, 2);
        for info in &solutions {
            assert_eq!(info.n_children, 0);
            assert!(info.parent.is_some());
        }
    }

    #[test]
    fn statistics_render_in_the_classic_format() {
        let stats = SearchStatistics {
            n_nodes: 3,
            n_failures: 1,
            n_solutions: 2,
            completed: true,
        };
        let text = stats.to_string();
        assert!(text.contains("#choice: 3"));
        assert!(text.contains("#fail: 1"));
        assert!(text.contains("#sols : 2"));
        assert!(text.contains("completed : true"));
    }
}

//! The N-Queens model: one variable per row holding the queen's column,
//! pairwise not-equal on columns and on both diagonals.

use crate::error::Result;
use crate::solver::constraints::not_equal::NotEqual;
use crate::solver::engine::Solver;
use crate::solver::search::{DFSearch, SearchStatistics};
use crate::solver::variable::IntVar;

/// Posts the queens model on `cp` and returns the row variables.
pub fn build(cp: &mut Solver, n: usize) -> Result<Vec<IntVar>> {
    let queens: Vec<IntVar> = (0..n)
        .map(|_| cp.add_variable(0..n as i32))
        .collect::<Result<_>>()?;
    for i in 0..n {
        for j in (i + 1)..n {
            cp.post(NotEqual::new(queens[i], queens[j]))?;
            cp.post(NotEqual::with_offset(
                queens[i],
                queens[j],
                i as i32 - j as i32,
            ))?;
            cp.post(NotEqual::with_offset(
                queens[i],
                queens[j],
                j as i32 - i as i32,
            ))?;
        }
    }
    Ok(queens)
}

/// Enumerates every placement of `n` queens.
pub fn solve_all(n: usize) -> Result<(Vec<Vec<i32>>, SearchStatistics)> {
    let mut cp = Solver::new();
    let queens = build(&mut cp, n)?;
    let mut solutions = Vec::new();
    let stats;
    {
        let mut search = DFSearch::new(&mut cp);
        search.on_solution(|cp, _| {
            solutions.push(queens.iter().map(|&q| cp.min(q)).collect::<Vec<i32>>());
        });
        stats = search.solve();
    }
    Ok((solutions, stats))
}

/// Whether `columns` places one queen per row with no two queens sharing a
/// column or a diagonal.
pub fn is_valid(columns: &[i32]) -> bool {
    let n = columns.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if columns[i] == columns[j] {
                return false;
            }
            if (columns[i] - columns[j]).abs() == (j - i) as i32 {
                return false;
            }
        }
    }
    true
}

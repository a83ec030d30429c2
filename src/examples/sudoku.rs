//! The Sudoku model: one variable per cell (a singleton domain for givens)
//! and pairwise not-equal constraints over every row, column and box.

use crate::error::Result;
use crate::solver::constraints::not_equal::NotEqual;
use crate::solver::engine::Solver;
use crate::solver::search::{DFSearch, SearchStatistics};
use crate::solver::variable::IntVar;

pub type Grid = [[i32; 9]; 9];

/// Posts `x != y` for every pair of `vars`.
pub fn all_different(cp: &mut Solver, vars: &[IntVar]) -> Result<()> {
    for i in 0..vars.len() {
        for j in (i + 1)..vars.len() {
            cp.post(NotEqual::new(vars[i], vars[j]))?;
        }
    }
    Ok(())
}

/// Posts the puzzle on `cp` and returns the cell variables, row-major.
/// Conflicting givens surface as an inconsistency here, at post time.
pub fn build(cp: &mut Solver, puzzle: &Grid) -> Result<Vec<Vec<IntVar>>> {
    let mut cells: Vec<Vec<IntVar>> = Vec::with_capacity(9);
    for row in puzzle {
        let vars: Vec<IntVar> = row
            .iter()
            .map(|&given| {
                if given == 0 {
                    cp.add_variable(1..=9)
                } else {
                    cp.add_variable([given])
                }
            })
            .collect::<Result<_>>()?;
        cells.push(vars);
    }

    for row in &cells {
        all_different(cp, row)?;
    }
    for c in 0..9 {
        let column: Vec<IntVar> = (0..9).map(|r| cells[r][c]).collect();
        all_different(cp, &column)?;
    }
    for br in 0..3 {
        for bc in 0..3 {
            let square: Vec<IntVar> = (0..3)
                .flat_map(|r| (0..3).map(move |c| (br * 3 + r, bc * 3 + c)))
                .map(|(r, c)| cells[r][c])
                .collect();
            all_different(cp, &square)?;
        }
    }
    Ok(cells)
}

/// Solves `puzzle`, stopping at the first solution.
pub fn solve(puzzle: &Grid) -> Result<(Option<Grid>, SearchStatistics)> {
    let mut cp = Solver::new();
    let cells = build(&mut cp, puzzle)?;
    let mut result = None;
    let stats;
    {
        let mut search = DFSearch::new(&mut cp);
        search.on_solution(|cp, _| {
            let mut grid = [[0i32; 9]; 9];
            for (r, row) in cells.iter().enumerate() {
                for (c, &cell) in row.iter().enumerate() {
                    grid[r][c] = cp.min(cell);
                }
            }
            result = Some(grid);
        });
        stats = search.solve_with_limit(|stats| stats.n_solutions >= 1);
    }
    Ok((result, stats))
}

/// The classic puzzle used by the demo binary and the tests.
pub fn classic_puzzle() -> Grid {
    [
        [5, 3, 0, 0, 7, 0, 0, 0, 0],
        [6, 0, 0, 1, 9, 5, 0, 0, 0],
        [0, 9, 8, 0, 0, 0, 0, 6, 0],
        [8, 0, 0, 0, 6, 0, 0, 0, 3],
        [4, 0, 0, 8, 0, 3, 0, 0, 1],
        [7, 0, 0, 0, 2, 0, 0, 0, 6],
        [0, 6, 0, 0, 0, 0, 2, 8, 0],
        [0, 0, 0, 4, 1, 9, 0, 0, 5],
        [0, 0, 0, 0, 8, 0, 0, 7, 9],
    ]
}

/// Whether `solution` is a fully and legally filled grid that respects the
/// clues of `puzzle`.
pub fn is_valid_solution(puzzle: &Grid, solution: &Grid) -> bool {
    for r in 0..9 {
        for c in 0..9 {
            if puzzle[r][c] != 0 && puzzle[r][c] != solution[r][c] {
                return false;
            }
        }
    }

    for i in 0..9 {
        let mut row_digits = std::collections::HashSet::new();
        let mut col_digits = std::collections::HashSet::new();
        for j in 0..9 {
            if solution[i][j] < 1 || solution[i][j] > 9 || !row_digits.insert(solution[i][j]) {
                return false;
            }
            if !col_digits.insert(solution[j][i]) {
                return false;
            }
        }
    }

    for br in 0..3 {
        for bc in 0..3 {
            let mut box_digits = std::collections::HashSet::new();
            for r in 0..3 {
                for c in 0..3 {
                    if !box_digits.insert(solution[br * 3 + r][bc * 3 + c]) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

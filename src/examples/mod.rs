//! Ready-made models used by the tests, the benchmarks and the demo
//! binaries.

pub mod n_queens;
pub mod sudoku;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reverso::examples::sudoku::{self, Grid};
use reverso::render_stats_table;

/// Solve the built-in Sudoku puzzle.
#[derive(Parser)]
#[command(about = "Solve a Sudoku grid with a propagation-based CP solver")]
struct Args {
    /// Emit the search statistics as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn print_grid(grid: &Grid) {
    for r in 0..9 {
        if r % 3 == 0 && r != 0 {
            println!("- - - + - - - + - - -");
        }
        for c in 0..9 {
            if c % 3 == 0 && c != 0 {
                print!("| ");
            }
            print!("{} ", grid[r][c]);
        }
        println!();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let puzzle = sudoku::classic_puzzle();
    println!("Puzzle:");
    print_grid(&puzzle);

    let (solution, stats) = sudoku::solve(&puzzle).expect("the built-in puzzle posts cleanly");
    match solution {
        Some(grid) => {
            println!("\nSolution:");
            print_grid(&grid);
        }
        None => println!("\nNo solution found."),
    }
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).expect("statistics serialize")
        );
    } else {
        println!("{}", render_stats_table(&stats));
    }
}

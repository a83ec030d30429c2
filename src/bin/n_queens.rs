use clap::Parser;
use tracing_subscriber::EnvFilter;

use reverso::examples::n_queens;
use reverso::render_stats_table;

/// Enumerate the solutions of the N-Queens problem.
#[derive(Parser)]
#[command(about = "Solve N-Queens with a propagation-based CP solver")]
struct Args {
    /// Board size.
    #[arg(default_value_t = 8)]
    n: usize,
    /// Print every solution as a board.
    #[arg(long)]
    boards: bool,
    /// Emit the search statistics as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn print_board(n: usize, columns: &[i32]) {
    for &col in columns {
        let mut row = vec!['.'; n];
        row[col as usize] = 'Q';
        println!("{}", row.iter().collect::<String>());
    }
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    println!("Solving N-Queens for N={}", args.n);

    let (solutions, stats) = n_queens::solve_all(args.n).expect("queens model posts cleanly");

    if args.boards {
        for solution in &solutions {
            print_board(args.n, solution);
        }
    }
    println!("#Solutions: {}", solutions.len());
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).expect("statistics serialize")
        );
    } else {
        println!("{}", render_stats_table(&stats));
    }
}

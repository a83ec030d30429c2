use prettytable::{Cell, Row, Table};

use crate::solver::search::SearchStatistics;

/// Renders the statistics of a solve as a bordered text table.
pub fn render_stats_table(stats: &SearchStatistics) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Nodes"),
        Cell::new("Failures"),
        Cell::new("Solutions"),
        Cell::new("Completed"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new(&stats.n_nodes.to_string()),
        Cell::new(&stats.n_failures.to_string()),
        Cell::new(&stats.n_solutions.to_string()),
        Cell::new(&stats.completed.to_string()),
    ]));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_contains_the_counters() {
        let stats = SearchStatistics {
            n_nodes: 21,
            n_failures: 8,
            n_solutions: 2,
            completed: true,
        };
        let rendered = render_stats_table(&stats);
        assert!(rendered.contains("21"));
        assert!(rendered.contains("Solutions"));
        assert!(rendered.contains("true"));
    }
}

use std::time::Duration;

use crate::result::Incumbent;
use crate::stats::TreeStatistics;

/// Everything the progress table shows about a node once it is processed.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProgress {
    pub number: usize,
    pub depth: usize,
    pub unexplored: usize,
    pub generated: u64,
    pub node_bound: Option<f64>, // None if the node was infeasible
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub node_gap: f64,
    pub global_gap: f64,
    pub pool_size: usize,
    pub time_master: Duration,
    pub time_pricing: Duration,
    pub time_at_node: Duration,
}

/// Hooks called by the tree while it searches.
pub trait TreeMonitor {
    fn on_enter_search(&mut self) {}
    fn on_node(&mut self, _progress: &NodeProgress, _stats: &TreeStatistics) {}
    fn on_incumbent(&mut self, _incumbent: &Incumbent) {}
    fn on_exit_search(&mut self, _stats: &TreeStatistics) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMonitor;

impl TreeMonitor for NoOpMonitor {}

/// Prints the progress table to stdout, one row per node.
#[derive(Debug, Default, Clone)]
pub struct LogMonitor {
    rows: usize,
}

impl LogMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn print_header(&self) {
        println!(
            "{:>6} {:>6} | {:>12} {:>12} {:>12} | {:>7} {:>7} | {:>7} | {:>8} {:>8} {:>8} {:>8} {:>8} | {:>5}",
            "Open",
            "Gen",
            "Node LB",
            "Global LB",
            "UB",
            "Gap%",
            "GGap%",
            "Pool",
            "Master",
            "Pricing",
            "Node",
            "AvgPr",
            "MaxEx",
            "Depth"
        );
        println!("{}", "-".repeat(150));
    }
}

fn bound(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "inf".to_string()
    }
}

fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "-".to_string()
    }
}

impl TreeMonitor for LogMonitor {
    fn on_enter_search(&mut self) {
        self.rows = 0;
        self.print_header();
    }

    fn on_node(&mut self, progress: &NodeProgress, stats: &TreeStatistics) {
        let node_bound = match progress.node_bound {
            Some(b) => bound(b),
            None => "infeas".to_string(),
        };
        println!(
            "{:>6} {:>6} | {:>12} {:>12} {:>12} | {:>7} {:>7} | {:>7} | {:>7.2}s {:>7.2}s {:>7.2}s {:>7.3}s {:>7.3}s | {:>5}",
            progress.unexplored,
            progress.generated,
            node_bound,
            bound(progress.lower_bound),
            bound(progress.upper_bound),
            percent(progress.node_gap),
            percent(progress.global_gap),
            progress.pool_size,
            progress.time_master.as_secs_f64(),
            progress.time_pricing.as_secs_f64(),
            progress.time_at_node.as_secs_f64(),
            stats.average_pricing_time().as_secs_f64(),
            stats.max_exact_pricing.as_secs_f64(),
            progress.depth
        );
        self.rows += 1;
    }

    fn on_incumbent(&mut self, incumbent: &Incumbent) {
        println!(
            "  new incumbent {:.2} ({}) at node {}",
            incumbent.objective(),
            incumbent.bound_type(),
            incumbent.node()
        );
    }

    fn on_exit_search(&mut self, stats: &TreeStatistics) {
        println!("{}", "-".repeat(150));
        println!("Search finished after {} nodes.", self.rows);
        print!("{}", stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_bounds_are_printed_as_such() {
        assert_eq!(bound(f64::INFINITY), "inf");
        assert_eq!(bound(12.345), "12.35");
        assert_eq!(percent(f64::INFINITY), "-");
    }

    #[test]
    fn log_monitor_counts_rows() {
        let mut monitor = LogMonitor::new();
        let stats = TreeStatistics::default();
        let progress = NodeProgress {
            number: 0,
            depth: 0,
            unexplored: 2,
            generated: 3,
            node_bound: Some(10.0),
            lower_bound: 10.0,
            upper_bound: f64::INFINITY,
            node_gap: f64::INFINITY,
            global_gap: f64::INFINITY,
            pool_size: 7,
            time_master: Duration::ZERO,
            time_pricing: Duration::ZERO,
            time_at_node: Duration::ZERO,
        };
        monitor.on_enter_search();
        monitor.on_node(&progress, &stats);
        monitor.on_node(&progress, &stats);
        assert_eq!(monitor.rows, 2);
    }
}

use std::fmt;
use std::time::Duration;

/// Counters of a branch-and-price run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeStatistics {
    /// Nodes created, the root included.
    pub nodes_generated: u64,
    /// Nodes whose column generation was run.
    pub nodes_explored: u64,
    /// Pruned because the dummy column stayed in the basis or the master was infeasible.
    pub prunings_infeasible: u64,
    /// Pruned because the node bound was no better than the incumbent.
    pub prunings_bound: u64,
    pub branchings: u64,
    pub incumbent_updates: u64,
    pub max_depth: u64,
    pub cg_iterations: u64,
    pub columns_generated: u64,
    pub early_branchings: u64,
    pub mip_solves: u64,
    pub time_master: Duration,
    pub time_pricing: Duration,
    /// Longest single exact pricing call.
    pub max_exact_pricing: Duration,
    /// Gap in percent after the root node; None if the root found no incumbent.
    pub gap_at_root: Option<f64>,
    pub time_total: Duration,
}

impl TreeStatistics {
    pub fn on_node_generated(&mut self) {
        self.nodes_generated = self.nodes_generated.saturating_add(1);
    }

    pub fn on_node_explored(&mut self, depth: usize) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    pub fn on_branching(&mut self, children: usize) {
        self.branchings = self.branchings.saturating_add(1);
        self.nodes_generated = self.nodes_generated.saturating_add(children as u64);
    }

    pub fn on_incumbent(&mut self) {
        self.incumbent_updates = self.incumbent_updates.saturating_add(1);
    }

    pub fn on_iteration(&mut self, columns_added: usize) {
        self.cg_iterations = self.cg_iterations.saturating_add(1);
        self.columns_generated = self.columns_generated.saturating_add(columns_added as u64);
    }

    pub fn on_early_branching(&mut self) {
        self.early_branchings = self.early_branchings.saturating_add(1);
    }

    pub fn on_mip_solve(&mut self, duration: Duration) {
        self.mip_solves = self.mip_solves.saturating_add(1);
        self.time_master += duration;
    }

    pub fn on_master_time(&mut self, duration: Duration) {
        self.time_master += duration;
    }

    pub fn on_pricing_time(&mut self, duration: Duration) {
        self.time_pricing += duration;
    }

    pub fn on_exact_pricing(&mut self, duration: Duration) {
        self.max_exact_pricing = self.max_exact_pricing.max(duration);
    }

    pub fn set_gap_at_root(&mut self, gap: f64) {
        self.gap_at_root = Some(gap);
    }

    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// average pricing time per column generation iteration.
    pub fn average_pricing_time(&self) -> Duration {
        if self.cg_iterations == 0 {
            Duration::ZERO
        } else {
            self.time_pricing / self.cg_iterations as u32
        }
    }
}

impl fmt::Display for TreeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Branch-and-price statistics:")?;
        writeln!(f, "  Nodes generated:       {}", self.nodes_generated)?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Max depth reached:     {}", self.max_depth)?;
        writeln!(f, "  Branchings:            {}", self.branchings)?;
        writeln!(f, "  Prunings (infeasible): {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):      {}", self.prunings_bound)?;
        writeln!(f, "  Early branchings:      {}", self.early_branchings)?;
        writeln!(f, "  Incumbent updates:     {}", self.incumbent_updates)?;
        writeln!(f, "  CG iterations:         {}", self.cg_iterations)?;
        writeln!(f, "  Columns generated:     {}", self.columns_generated)?;
        writeln!(f, "  MIP solves:            {}", self.mip_solves)?;
        match self.gap_at_root {
            Some(gap) => writeln!(f, "  Gap at root:           {:.2}%", gap)?,
            None => writeln!(f, "  Gap at root:           -")?,
        }
        writeln!(f, "  Time on master:        {:.2?}", self.time_master)?;
        writeln!(f, "  Time on pricing:       {:.2?}", self.time_pricing)?;
        writeln!(f, "  Max exact pricing:     {:.2?}", self.max_exact_pricing)?;
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut stats = TreeStatistics::default();
        stats.on_node_generated();
        stats.on_node_explored(0);
        stats.on_branching(2);
        stats.on_node_explored(3);
        stats.on_iteration(5);
        stats.on_iteration(0);
        stats.on_pricing_time(Duration::from_millis(30));
        stats.on_exact_pricing(Duration::from_millis(7));
        stats.on_exact_pricing(Duration::from_millis(3));

        assert_eq!(stats.nodes_generated, 3);
        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.cg_iterations, 2);
        assert_eq!(stats.columns_generated, 5);
        assert_eq!(stats.average_pricing_time(), Duration::from_millis(15));
        assert_eq!(stats.max_exact_pricing, Duration::from_millis(7));
    }

    #[test]
    fn display_lists_the_root_gap() {
        let mut stats = TreeStatistics::default();
        assert!(stats.to_string().contains("Gap at root:           -"));
        stats.set_gap_at_root(1.5);
        assert!(stats.to_string().contains("1.50%"));
    }
}

use itertools::Itertools;
use model::config::Config;
use model::network::Network;
use solution::{Column, ColumnOrigin, GlobalColumnPool};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::branching::select_branching;
use crate::column_generation::{ColumnGeneration, NodeSolution, NodeStatus};
use crate::err::SolverError;
use crate::master::{MasterError, MasterSolver};
use crate::monitor::{NodeProgress, NoOpMonitor, TreeMonitor};
use crate::node::{BranchNode, NodeQueue};
use crate::result::{relative_gap, BoundType, Incumbent, TreeOutcome};
use crate::stats::TreeStatistics;

/// Best-first branch-and-price over the rotations of all vessel classes.
pub struct BranchAndPrice<'a, M: MasterSolver> {
    network: &'a Network,
    config: &'a Config,
    master: &'a M,
}

/// Mutable state of one run.
struct Search {
    queue: NodeQueue,
    global: GlobalColumnPool,
    incumbent: Option<Incumbent>,
    lower_bound: f64,
    next_number: usize,
    stats: TreeStatistics,
}

impl Search {
    fn upper_bound(&self) -> f64 {
        self.incumbent
            .as_ref()
            .map(|i| i.objective())
            .unwrap_or(f64::INFINITY)
    }
}

impl<'a, M: MasterSolver> BranchAndPrice<'a, M> {
    pub fn new(network: &'a Network, config: &'a Config, master: &'a M) -> Self {
        BranchAndPrice {
            network,
            config,
            master,
        }
    }

    pub fn solve(&self) -> Result<TreeOutcome, SolverError> {
        self.solve_with_monitor(&mut NoOpMonitor)
    }

    pub fn solve_with_monitor(
        &self,
        monitor: &mut impl TreeMonitor,
    ) -> Result<TreeOutcome, SolverError> {
        let start = Instant::now();
        let eps = self.config.lp_tolerance;
        let column_generation = ColumnGeneration::new(self.master, self.network, self.config);
        let mut search = Search {
            queue: NodeQueue::new(),
            global: GlobalColumnPool::new(),
            incumbent: None,
            lower_bound: f64::NEG_INFINITY,
            next_number: 1,
            stats: TreeStatistics::default(),
        };
        let root = BranchNode::root(self.network, self.config.dummy_column_price);
        for column in root.pool().iter() {
            search.global.push(column.clone());
        }
        search.stats.on_node_generated();
        search.queue.push(root);
        monitor.on_enter_search();

        let mut timed_out = false;
        while let Some(mut node) = search.queue.pop() {
            if let Some(father_lb) = node.father_lb() {
                if father_lb >= search.upper_bound() - eps {
                    debug!("node {}: pruned by father bound {:.4}", node.number(), father_lb);
                    search.stats.on_pruning_bound();
                    continue;
                }
            }

            let node_start = Instant::now();
            let master_before = search.stats.time_master;
            let pricing_before = search.stats.time_pricing;
            search.stats.on_node_explored(node.depth());

            let status =
                column_generation.solve_node(&mut node, &mut search.global, &mut search.stats)?;
            let node_bound = match status {
                NodeStatus::Infeasible => {
                    info!("node {}: infeasible", node.number());
                    search.stats.on_pruning_infeasible();
                    None
                }
                NodeStatus::Solved(solution) => {
                    let value = solution.value;
                    self.process(&node, solution, &mut search, monitor)?;
                    Some(value)
                }
            };

            let upper_bound = search.upper_bound();
            if node.is_root() {
                if let Some(value) = node_bound {
                    search.lower_bound = value;
                }
            }
            if search.queue.is_empty() {
                if upper_bound.is_finite() {
                    search.lower_bound = upper_bound;
                }
            } else if let Some(best) = search.queue.best_father_lb() {
                search.lower_bound = search.lower_bound.max(best.min(upper_bound));
            }
            let global_gap = relative_gap(upper_bound, search.lower_bound);
            if node.is_root() && upper_bound.is_finite() {
                search.stats.set_gap_at_root(global_gap);
            }

            monitor.on_node(
                &NodeProgress {
                    number: node.number(),
                    depth: node.depth(),
                    unexplored: search.queue.len(),
                    generated: search.stats.nodes_generated,
                    node_bound,
                    lower_bound: search.lower_bound,
                    upper_bound,
                    node_gap: node_bound
                        .map(|b| relative_gap(upper_bound, b))
                        .unwrap_or(f64::INFINITY),
                    global_gap,
                    pool_size: search.global.len(),
                    time_master: search.stats.time_master - master_before,
                    time_pricing: search.stats.time_pricing - pricing_before,
                    time_at_node: node_start.elapsed(),
                },
                &search.stats,
            );

            if start.elapsed().as_secs_f64() > self.config.time_limit_in_s {
                timed_out = !search.queue.is_empty();
                if timed_out {
                    warn!(
                        "time limit of {}s reached with {} open nodes",
                        self.config.time_limit_in_s,
                        search.queue.len()
                    );
                }
                break;
            }
        }

        search.stats.set_total_time(start.elapsed());
        monitor.on_exit_search(&search.stats);
        let Search {
            incumbent,
            lower_bound,
            stats,
            ..
        } = search;
        if timed_out {
            return Ok(TreeOutcome::timed_out(incumbent, lower_bound, stats));
        }
        Ok(match incumbent {
            Some(incumbent) => TreeOutcome::optimal(incumbent, stats),
            None => TreeOutcome::infeasible(stats),
        })
    }

    /// Prunes, tightens the upper bound, then branches or accepts the node.
    fn process(
        &self,
        node: &BranchNode,
        solution: NodeSolution,
        search: &mut Search,
        monitor: &mut impl TreeMonitor,
    ) -> Result<(), SolverError> {
        let eps = self.config.lp_tolerance;
        let basic = solution.basic_columns(eps);

        if basic.iter().any(|(c, _)| c.is_dummy()) {
            debug!("node {}: dummy column in the basis", node.number());
            search.stats.on_pruning_infeasible();
            return Ok(());
        }
        if solution.value >= search.upper_bound() - eps {
            debug!(
                "node {}: pruned by bound {:.4} >= {:.4}",
                node.number(),
                solution.value,
                search.upper_bound()
            );
            search.stats.on_pruning_bound();
            return Ok(());
        }

        self.improve_upper_bound(node, &solution, search, monitor)?;
        if solution.value >= search.upper_bound() - eps {
            search.stats.on_pruning_bound();
            return Ok(());
        }

        let ports = self.network.ports();
        let num_vessel_classes = self.network.vessel_classes().len();
        match select_branching(&basic, &ports, num_vessel_classes, eps) {
            Some(decision) => {
                info!(
                    "node {}: {} branching into {} children",
                    node.number(),
                    decision.kind,
                    decision.children.len()
                );
                search.stats.on_branching(decision.children.len());
                for rules in decision.children {
                    debug!("node {}: {}", search.next_number, rules.iter().join(", "));
                    search
                        .queue
                        .push(node.child(search.next_number, solution.value, rules));
                    search.next_number += 1;
                }
            }
            None => {
                // integral and acyclic
                if solution.value < search.upper_bound() - eps {
                    let incumbent =
                        Incumbent::new(solution.value, basic, BoundType::FromLp, node.number());
                    monitor.on_incumbent(&incumbent);
                    search.incumbent = Some(incumbent);
                    search.stats.on_incumbent();
                }
            }
        }
        Ok(())
    }

    /// Solves the integer master over the acyclic columns of the node, at the
    /// root or when there are few enough of them.
    fn improve_upper_bound(
        &self,
        node: &BranchNode,
        solution: &NodeSolution,
        search: &mut Search,
        monitor: &mut impl TreeMonitor,
    ) -> Result<(), SolverError> {
        let columns: Vec<Arc<Column>> = node
            .pool()
            .iter()
            .filter(|c| !c.is_dummy() && !c.has_cycles())
            .cloned()
            .collect();
        if columns.is_empty()
            || !(node.is_root() || columns.len() <= self.config.max_cols_to_solve_mp)
        {
            return Ok(());
        }

        let mip_start = Instant::now();
        let result = self.master.solve_mip(&solution.layout, &columns);
        search.stats.on_mip_solve(mip_start.elapsed());
        let mip = match result {
            Ok(mip) => mip,
            Err(MasterError::Infeasible) => {
                debug!("node {}: integer master infeasible", node.number());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if mip.objective < search.upper_bound() - self.config.lp_tolerance {
            let num_vessel_classes = self.network.vessel_classes().len();
            let chosen = columns
                .iter()
                .zip(mip.values.iter())
                .filter(|(_, v)| **v > 0.5)
                .filter_map(|(c, v)| {
                    let solution = c.solution()?.clone();
                    Some((
                        Arc::new(Column::new(solution, num_vessel_classes, ColumnOrigin::Mip)),
                        v.round(),
                    ))
                })
                .collect();
            let incumbent = Incumbent::new(mip.objective, chosen, BoundType::FromMip, node.number());
            monitor.on_incumbent(&incumbent);
            search.incumbent = Some(incumbent);
            search.stats.on_incumbent();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;

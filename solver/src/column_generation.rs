use model::config::Config;
use model::network::Network;
use solution::{Column, ColumnOrigin, GlobalColumnPool, Solution};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::err::SolverError;
use crate::master::{LinearSolution, MasterError, MasterSolver, RowLayout};
use crate::node::BranchNode;
use crate::pricing::{DiscardCounters, Pricing};
use crate::stats::TreeStatistics;

/// The LP relaxation of a node after column generation.
pub struct NodeSolution {
    /// LP objective; the father bound if the node was branched early.
    pub value: f64,
    pub lp: LinearSolution,
    /// the pool the last master problem was solved over, in `lp.values` order.
    pub columns: Vec<Arc<Column>>,
    pub layout: RowLayout,
    pub early_branched: bool,
}

impl NodeSolution {
    pub fn basic_columns(&self, tolerance: f64) -> Vec<(Arc<Column>, f64)> {
        self.lp.basic_columns(&self.columns, tolerance)
    }
}

pub enum NodeStatus {
    Solved(NodeSolution),
    Infeasible,
}

/// Alternates master solves and pricing at one node until no column with
/// negative reduced cost is found.
pub struct ColumnGeneration<'a, M: MasterSolver> {
    master: &'a M,
    network: &'a Network,
    config: &'a Config,
}

impl<'a, M: MasterSolver> ColumnGeneration<'a, M> {
    pub fn new(master: &'a M, network: &'a Network, config: &'a Config) -> Self {
        ColumnGeneration {
            master,
            network,
            config,
        }
    }

    /// New columns are added to the node and to `global`.
    pub fn solve_node(
        &self,
        node: &mut BranchNode,
        global: &mut GlobalColumnPool,
        stats: &mut TreeStatistics,
    ) -> Result<NodeStatus, SolverError> {
        let ports = self.network.ports();
        let vessel_classes = self.network.vessel_classes();
        let layout = node.row_layout(&ports, &vessel_classes, self.config.port_row_sense);
        let start = Instant::now();
        let every_n = self.config.elementary_labelling_every_n_nodes.max(1);
        let mut try_elementary =
            self.config.try_elementary_labelling && node.number() % every_n == 0;
        let mut iteration = 0;

        loop {
            let columns = node.pool().to_vec();
            let master_start = Instant::now();
            let lp = match self.master.solve_lp(&layout, &columns) {
                Ok(lp) => lp,
                Err(MasterError::Infeasible) => {
                    stats.on_master_time(master_start.elapsed());
                    debug!("node {}: master problem infeasible", node.number());
                    return Ok(NodeStatus::Infeasible);
                }
                Err(e) => return Err(e.into()),
            };
            stats.on_master_time(master_start.elapsed());
            debug!(
                "node {} iteration {}: master objective {:.4} over {} columns",
                node.number(),
                iteration,
                lp.objective,
                columns.len()
            );

            let views = node
                .views()
                .iter()
                .map(|view| {
                    let vessel_class_dual = lp
                        .vessel_class_duals
                        .get(view.vessel_class().idx())
                        .copied()
                        .unwrap_or(0.0);
                    view.with_duals(lp.port_duals.clone(), vessel_class_dual)
                })
                .collect();
            node.set_views(views);

            if self.config.early_branching {
                if let Some(father_lb) = node.father_lb() {
                    if start.elapsed().as_secs_f64() > self.config.early_branching_timeout {
                        info!(
                            "node {}: early branching after {:.1}s",
                            node.number(),
                            start.elapsed().as_secs_f64()
                        );
                        stats.on_early_branching();
                        return Ok(NodeStatus::Solved(NodeSolution {
                            value: father_lb,
                            lp,
                            columns,
                            layout,
                            early_branched: true,
                        }));
                    }
                }
            }

            let pricing_start = Instant::now();
            let priced = Pricing::new(
                self.config,
                &vessel_classes,
                node.pool(),
                try_elementary,
                node.number(),
                iteration,
            )
            .price_all(node.views());
            stats.on_pricing_time(pricing_start.elapsed());

            let mut discarded = DiscardCounters::default();
            let mut accepted: Vec<(Solution, ColumnOrigin)> = Vec::new();
            for class_columns in priced {
                discarded.add(&class_columns.discarded);
                if let Some(duration) = class_columns.exact_time {
                    stats.on_exact_pricing(duration);
                }
                for (solution, origin) in class_columns.solutions {
                    if accepted.iter().any(|(s, _)| *s == solution) {
                        discarded.duplicate_in_iteration += 1;
                    } else {
                        accepted.push((solution, origin));
                    }
                }
            }
            if discarded.total() > 0 {
                debug!(
                    "node {} iteration {}: discarded {} (reduced cost {}, capacity {}, duplicate {}, in pool {})",
                    node.number(),
                    iteration,
                    discarded.total(),
                    discarded.non_negative_reduced_cost,
                    discarded.over_capacity,
                    discarded.duplicate_in_iteration,
                    discarded.already_in_pool
                );
            }

            if accepted.iter().any(|(_, origin)| {
                !matches!(origin, ColumnOrigin::FastHeuristic | ColumnOrigin::Elementary)
            }) {
                try_elementary = false;
            }

            let added = accepted.len();
            for (solution, origin) in accepted {
                let column = Arc::new(Column::new(solution, vessel_classes.len(), origin));
                node.add_column(column.clone());
                global.push(column);
            }
            stats.on_iteration(added);
            iteration += 1;

            if added == 0 {
                return Ok(NodeStatus::Solved(NodeSolution {
                    value: lp.objective,
                    lp,
                    columns,
                    layout,
                    early_branched: false,
                }));
            }
        }
    }
}

use derive_more::Display;
use model::base_types::{Quantity, VesselClassIdx};
use model::config::Config;
use model::vessel_classes::VesselClasses;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use solution::{ColumnOrigin, ColumnPool, Solution};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::heuristics::FastHeuristic;
use crate::labelling::LabelSetting;
use crate::network_view::NetworkView;
use crate::reduction::{cost_reduced, smart_reduced};

/// Solutions need a reduced cost below `-REDUCED_COST_TOLERANCE` to be accepted.
pub const REDUCED_COST_TOLERANCE: f64 = 1e-6;

#[derive(Display, Debug, Clone, Copy, PartialEq)]
pub enum PricingMode {
    #[display(fmt = "fast heuristic")]
    FastHeuristic,
    #[display(fmt = "elementary on {:.0}% of the arcs", "_0 * 100.0")]
    ElementaryReduced(f64),
    #[display(fmt = "elementary on smart reduced graph")]
    ElementarySmartReduced,
    #[display(fmt = "smart reduced")]
    SmartReduced,
    #[display(fmt = "reduced to {:.0}% of the arcs", "_0 * 100.0")]
    Reduced(f64),
    #[display(fmt = "exact")]
    Exact,
}

impl PricingMode {
    pub fn origin(&self) -> ColumnOrigin {
        match self {
            PricingMode::FastHeuristic => ColumnOrigin::FastHeuristic,
            PricingMode::ElementaryReduced(_) | PricingMode::ElementarySmartReduced => {
                ColumnOrigin::Elementary
            }
            PricingMode::SmartReduced => ColumnOrigin::SmartReduced,
            PricingMode::Reduced(_) => ColumnOrigin::Reduced,
            PricingMode::Exact => ColumnOrigin::Exact,
        }
    }

    pub fn is_elementary(&self) -> bool {
        matches!(
            self,
            PricingMode::ElementaryReduced(_) | PricingMode::ElementarySmartReduced
        )
    }
}

/// Runs a single pricing mode on the view. Returns every path found, whatever
/// its reduced cost.
pub fn price(
    view: &NetworkView,
    capacity: Quantity,
    mode: PricingMode,
    config: &Config,
    rng: &mut ChaCha8Rng,
) -> Vec<Solution> {
    match mode {
        PricingMode::FastHeuristic => {
            FastHeuristic::new(view, config.greedy_max_outarcs, config.greedy_reruns).run(rng)
        }
        PricingMode::ElementaryReduced(pct) => {
            LabelSetting::elementary(&cost_reduced(view, pct), capacity).run()
        }
        PricingMode::ElementarySmartReduced => {
            let reduced = smart_reduced(view, config.smart_min_chance, config.smart_max_chance, rng);
            LabelSetting::elementary(&reduced, capacity).run()
        }
        PricingMode::SmartReduced => {
            let reduced = smart_reduced(view, config.smart_min_chance, config.smart_max_chance, rng);
            LabelSetting::new(&reduced, capacity).run()
        }
        PricingMode::Reduced(pct) => LabelSetting::new(&cost_reduced(view, pct), capacity).run(),
        PricingMode::Exact => LabelSetting::new(view, capacity).run(),
    }
}

/// The stages tried in order until one of them yields an accepted column. The
/// exact stage always comes last.
pub fn escalation_stages(config: &Config, try_elementary: bool) -> Vec<PricingMode> {
    let mut stages = vec![PricingMode::FastHeuristic];
    if try_elementary {
        stages.extend(
            config
                .reduction
                .steps_up_to(config.reduction.end_elementary)
                .into_iter()
                .map(PricingMode::ElementaryReduced),
        );
        if config.try_smart_graph_reduction {
            stages.push(PricingMode::ElementarySmartReduced);
        }
    }
    if config.try_smart_graph_reduction {
        stages.push(PricingMode::SmartReduced);
    }
    if config.try_reduced_labelling {
        stages.extend(
            config
                .reduction
                .steps_up_to(config.reduction.end)
                .into_iter()
                .filter(|pct| *pct < config.reduction.end - 1e-9)
                .map(PricingMode::Reduced),
        );
    }
    stages.push(PricingMode::Exact);
    stages
}

/// Why solutions were not turned into columns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiscardCounters {
    pub non_negative_reduced_cost: usize,
    pub over_capacity: usize,
    pub duplicate_in_iteration: usize,
    pub already_in_pool: usize,
}

impl DiscardCounters {
    pub fn add(&mut self, other: &DiscardCounters) {
        self.non_negative_reduced_cost += other.non_negative_reduced_cost;
        self.over_capacity += other.over_capacity;
        self.duplicate_in_iteration += other.duplicate_in_iteration;
        self.already_in_pool += other.already_in_pool;
    }

    pub fn total(&self) -> usize {
        self.non_negative_reduced_cost
            + self.over_capacity
            + self.duplicate_in_iteration
            + self.already_in_pool
    }
}

/// The result of the escalation for one vessel class.
#[derive(Default)]
pub struct PricedColumns {
    pub vessel_class: Option<VesselClassIdx>,
    pub solutions: Vec<(Solution, ColumnOrigin)>,
    pub stage: Option<PricingMode>, // the stage that found them
    pub exact_time: Option<Duration>,
    pub discarded: DiscardCounters,
}

/// The escalation state of one vessel class across the stages.
struct ClassPricing<'v> {
    view: &'v NetworkView,
    capacity: Quantity,
    rng: ChaCha8Rng,
    priced: PricedColumns,
}

/// The pricing step of one column generation iteration.
pub struct Pricing<'a> {
    config: &'a Config,
    vessel_classes: &'a VesselClasses,
    pool: &'a ColumnPool,
    try_elementary: bool,
    node_number: usize,
    iteration: usize,
}

// static functions
impl<'a> Pricing<'a> {
    pub fn new(
        config: &'a Config,
        vessel_classes: &'a VesselClasses,
        pool: &'a ColumnPool,
        try_elementary: bool,
        node_number: usize,
        iteration: usize,
    ) -> Pricing<'a> {
        Pricing {
            config,
            vessel_classes,
            pool,
            try_elementary,
            node_number,
            iteration,
        }
    }
}

// methods
impl<'a> Pricing<'a> {
    /// Runs the stages in order, each one on all vessel classes (on the rayon
    /// pool if parallel labelling is on). Stops after the first stage that
    /// yields an accepted column for any vessel class.
    pub fn price_all(&self, views: &[NetworkView]) -> Vec<PricedColumns> {
        let mut classes: Vec<ClassPricing> = views
            .iter()
            .map(|view| {
                let vessel_class = view.vessel_class();
                ClassPricing {
                    view,
                    capacity: self.vessel_classes.vessel_class(vessel_class).capacity(),
                    rng: self.rng_for(vessel_class),
                    priced: PricedColumns {
                        vessel_class: Some(vessel_class),
                        ..PricedColumns::default()
                    },
                }
            })
            .collect();

        for stage in escalation_stages(self.config, self.try_elementary) {
            if self.config.parallel_labelling {
                classes
                    .par_iter_mut()
                    .for_each(|class| self.run_stage(class, stage));
            } else {
                classes
                    .iter_mut()
                    .for_each(|class| self.run_stage(class, stage));
            }

            let found: usize = classes.iter().map(|c| c.priced.solutions.len()).sum();
            if found > 0 {
                debug!("{} columns from {}", found, stage);
                for class in classes.iter_mut() {
                    if !class.priced.solutions.is_empty() {
                        class.priced.stage = Some(stage);
                    }
                }
                break;
            }
        }
        classes.into_iter().map(|class| class.priced).collect()
    }

    /// the escalation for a single vessel class.
    pub fn price_vessel_class(&self, view: &NetworkView) -> PricedColumns {
        self.price_all(std::slice::from_ref(view))
            .pop()
            .unwrap_or_default()
    }
}

// private methods
impl<'a> Pricing<'a> {
    /// prices one vessel class with `stage` and keeps the accepted solutions.
    fn run_stage(&self, class: &mut ClassPricing, stage: PricingMode) {
        let vessel_class = class.view.vessel_class();
        let start = Instant::now();
        let found = price(class.view, class.capacity, stage, self.config, &mut class.rng);
        if stage == PricingMode::Exact {
            class.priced.exact_time = Some(start.elapsed());
        }
        trace!(
            "vc{}: {} found {} paths in {:.3}s",
            vessel_class,
            stage,
            found.len(),
            start.elapsed().as_secs_f64()
        );

        let priced = &mut class.priced;
        let check_capacity = stage == PricingMode::FastHeuristic;
        for solution in found {
            if solution.reduced_cost() >= -REDUCED_COST_TOLERANCE {
                priced.discarded.non_negative_reduced_cost += 1;
            } else if check_capacity && !solution.satisfies_capacity_constraints(class.capacity) {
                priced.discarded.over_capacity += 1;
            } else if priced.solutions.iter().any(|(s, _)| *s == solution) {
                priced.discarded.duplicate_in_iteration += 1;
            } else if self.pool.contains_solution(&solution) {
                priced.discarded.already_in_pool += 1;
            } else {
                priced.solutions.push((solution, stage.origin()));
            }
        }
    }

    /// Independent of the thread the vessel class is priced on.
    fn rng_for(&self, vessel_class: VesselClassIdx) -> ChaCha8Rng {
        let seed = self.config.random_seed
            ^ (self.node_number as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (self.iteration as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ (vessel_class.0 as u64 + 1).wrapping_mul(0x1656_67B1_9E37_79F9);
        ChaCha8Rng::seed_from_u64(seed)
    }
}

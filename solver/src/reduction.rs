use model::base_types::ArcIdx;
use rand::Rng;

use crate::network_view::NetworkView;

/// Hides every arc more expensive than the arc at position
/// `pct * (visible arcs)` of the cost ranking.
pub fn cost_reduced(view: &NetworkView, pct: f64) -> NetworkView {
    let graph = view.graph();
    let ranking = graph.arcs_by_cost();
    if ranking.is_empty() {
        return view.clone();
    }
    let visible = graph.num_arcs().saturating_sub(view.num_erased());
    let limit = ((visible as f64 * pct).floor() as usize).min(ranking.len() - 1);
    let ceiling = graph.leg(ranking[limit]).cost();

    let expensive: Vec<ArcIdx> = ranking[limit..]
        .iter()
        .copied()
        .filter(|a| graph.leg(*a).cost() > ceiling && !view.is_erased(*a))
        .collect();
    view.with_erased(expensive)
}

/// Randomly hides arcs into port calls. The survival chance grows linearly with
/// the dual of the called port-role, from `min_chance` for the lowest port dual
/// to `max_chance` for the highest.
pub fn smart_reduced(
    view: &NetworkView,
    min_chance: f64,
    max_chance: f64,
    rng: &mut impl Rng,
) -> NetworkView {
    let graph = view.graph();
    let mut min_prize = f64::INFINITY;
    let mut max_prize: f64 = 0.0;
    for dual in view.port_duals().values() {
        for prize in [dual.pickup, dual.delivery] {
            min_prize = min_prize.min(prize);
            max_prize = max_prize.max(prize);
        }
    }
    let flat = !min_prize.is_finite() || (max_prize - min_prize).abs() < f64::EPSILON;

    let mut hidden = Vec::new();
    for arc in graph.arcs() {
        if view.is_erased(arc) {
            continue;
        }
        let target = graph.arc_target(arc);
        if !graph.node(target).is_regular_port() {
            continue;
        }
        let chance = if flat {
            max_chance
        } else {
            min_chance
                + (view.dual_of(target) - min_prize) * (max_chance - min_chance)
                    / (max_prize - min_prize)
        };
        if rng.random::<f64>() > chance {
            hidden.push(arc);
        }
    }
    view.with_erased(hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network_view::PortDual;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use solution::test_utilities::{arc, init_test_data};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn cost_reduction_keeps_the_cheap_arcs() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let view = NetworkView::new(graph.clone());
        // 13 arcs: position 6 of the ranking costs 9
        let reduced = cost_reduced(&view, 0.5);
        for a in graph.arcs() {
            assert_eq!(reduced.is_erased(a), graph.leg(a).cost() > 9.0, "{}", a);
        }
        let everything = cost_reduced(&view, 1.0);
        assert_eq!(everything.num_erased(), 0);
    }

    #[test]
    fn cost_reduction_builds_on_the_erased_arcs() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let forbidden = arc(&graph, d.a_pu, d.b_de);
        let view = NetworkView::new(graph.clone()).with_erased([forbidden]);
        let reduced = cost_reduced(&view, 0.1);
        assert!(reduced.is_erased(forbidden));
        assert!(reduced.num_erased() > view.num_erased());
    }

    #[test]
    fn smart_reduction_prefers_high_duals() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let mut duals = HashMap::new();
        duals.insert(d.port_a, PortDual { pickup: 50.0, delivery: 0.0 });
        duals.insert(d.port_b, PortDual { pickup: 0.0, delivery: 0.0 });
        let view = NetworkView::new(graph.clone()).with_duals(Arc::new(duals), 0.0);
        let into_a_pu = arc(&graph, d.source, d.a_pu);
        let to_sink = arc(&graph, d.a_pu, d.sink);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            // the highest dual survives with chance 1
            let reduced = smart_reduced(&view, 0.0, 1.0, &mut rng);
            assert!(!reduced.is_erased(into_a_pu));
            assert!(!reduced.is_erased(to_sink));
        }
        // the lowest dual never survives with chance 0
        let reduced = smart_reduced(&view, 0.0, 1.0, &mut rng);
        assert!(reduced.is_erased(arc(&graph, d.source, d.a_de)));
    }

    #[test]
    fn smart_reduction_without_duals_uses_the_max_chance() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let view = NetworkView::new(graph.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let reduced = smart_reduced(&view, 0.0, 1.0, &mut rng);
        assert_eq!(reduced.num_erased(), 0);
    }
}

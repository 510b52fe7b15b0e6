use model::base_types::{ArcIdx, Cost, NodeIdx, PortIdx};
use rand::Rng;
use solution::Solution;
use std::collections::HashSet;

use crate::network_view::NetworkView;

/// Randomized greedy walks through the graph of one vessel class.
///
/// Each walk extends the path by one of the `max_outarcs` arcs of least reduced
/// cost and never calls a port twice. `reruns` walks start at the source and as
/// many start at the sink and walk backwards. The walks ignore capacities; the
/// caller has to check them.
pub struct FastHeuristic<'a> {
    view: &'a NetworkView,
    max_outarcs: usize,
    reruns: usize,
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

// static functions
impl<'a> FastHeuristic<'a> {
    pub fn new(view: &'a NetworkView, max_outarcs: usize, reruns: usize) -> FastHeuristic<'a> {
        FastHeuristic {
            view,
            max_outarcs: max_outarcs.max(1),
            reruns,
        }
    }
}

// methods
impl<'a> FastHeuristic<'a> {
    pub fn run(&self, rng: &mut impl Rng) -> Vec<Solution> {
        let mut solutions = Vec::new();
        for direction in [Direction::Forward, Direction::Backward] {
            for _ in 0..self.reruns {
                if let Some(solution) = self.walk(direction, rng) {
                    solutions.push(solution);
                }
            }
        }
        solutions
    }
}

// private methods
impl<'a> FastHeuristic<'a> {
    /// None if the walk runs into a dead end.
    fn walk(&self, direction: Direction, rng: &mut impl Rng) -> Option<Solution> {
        let graph = self.view.graph();
        let (mut current, goal) = match direction {
            Direction::Forward => (graph.source(), graph.sink()),
            Direction::Backward => (graph.sink(), graph.source()),
        };
        let mut visited: HashSet<PortIdx> = HashSet::new();
        let mut arcs: Vec<ArcIdx> = Vec::new();
        let mut reduced_cost: Cost = 0.0;

        while current != goal {
            let mut candidates: Vec<(ArcIdx, NodeIdx, Cost)> = self
                .steps(direction, current)
                .filter_map(|arc| {
                    let next = match direction {
                        Direction::Forward => graph.arc_target(arc),
                        Direction::Backward => graph.arc_source(arc),
                    };
                    let node = graph.node(next);
                    if node.is_regular_port() && visited.contains(&node.port()) {
                        return None;
                    }
                    Some((arc, next, self.view.reduced_cost(arc)))
                })
                .collect();
            if candidates.is_empty() {
                return None;
            }
            candidates.sort_by(|a, b| a.2.total_cmp(&b.2));
            let pick = rng.random_range(0..candidates.len().min(self.max_outarcs));
            let (arc, next, arc_reduced_cost) = candidates[pick];

            let node = graph.node(next);
            if node.is_regular_port() {
                visited.insert(node.port());
            }
            arcs.push(arc);
            reduced_cost += arc_reduced_cost;
            current = next;
        }

        if let Direction::Backward = direction {
            arcs.reverse();
        }
        Some(Solution::new(arcs, reduced_cost, graph.clone()))
    }

    fn steps(&self, direction: Direction, node: NodeIdx) -> Box<dyn Iterator<Item = ArcIdx> + '_> {
        match direction {
            Direction::Forward => Box::new(self.view.visible_out_arcs(node)),
            Direction::Backward => Box::new(self.view.visible_in_arcs(node)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use solution::test_utilities::{arc, init_test_data};

    #[test]
    fn greedy_walk_follows_the_cheapest_arcs() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let view = NetworkView::new(graph.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let solutions = FastHeuristic::new(&view, 1, 1).run(&mut rng);

        assert_eq!(solutions.len(), 2);
        // forward: src -> B pu (-25) is the cheapest first step
        let forward = &solutions[0];
        assert_eq!(
            forward.arcs(),
            &[arc(&graph, d.source, d.b_pu4), arc(&graph, d.b_pu4, d.sink)]
        );
        assert_eq!(forward.reduced_cost(), -16.0);

        // backward: the three arcs of cost 9 into the sink tie, each leads to one walk
        let backward = &solutions[1];
        assert_eq!(graph.arc_source(backward.arcs()[0]), d.source);
        assert!([-40.0, -38.0, -4.0].contains(&backward.reduced_cost()));
    }

    #[test]
    fn walks_ignore_capacities() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        // only src - A pu - B pu@3 - snk is left, it needs a capacity of 12
        let view = NetworkView::new(graph.clone()).with_erased([
            arc(&graph, d.source, d.a_de),
            arc(&graph, d.source, d.b_pu4),
            arc(&graph, d.a_pu, d.sink),
            arc(&graph, d.a_pu, d.b_pu4),
            arc(&graph, d.a_pu, d.b_de),
            arc(&graph, d.b_pu4, d.sink),
            arc(&graph, d.b_de, d.sink),
            arc(&graph, d.a_de, d.sink),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let solutions = FastHeuristic::new(&view, 5, 1).run(&mut rng);
        assert_eq!(solutions.len(), 2);
        for solution in solutions.iter() {
            assert_eq!(solution.reduced_cost(), -40.0);
            assert!(!solution.satisfies_capacity_constraints(10));
        }
    }

    #[test]
    fn walks_respect_erased_arcs_and_reduced_costs() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let view = NetworkView::new(graph.clone()).with_erased([arc(&graph, d.source, d.a_pu)]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let solutions = FastHeuristic::new(&view, 3, 10).run(&mut rng);
        // backward walks through B pu@3 end up at A pu, which is cut off from the source
        assert!(solutions.len() >= 10 && solutions.len() <= 20);
        for solution in solutions.iter() {
            assert!(!solution.uses_arc(arc(&graph, d.source, d.a_pu)));
            let summed: f64 = solution.arcs().iter().map(|a| view.reduced_cost(*a)).sum();
            assert!((summed - solution.reduced_cost()).abs() < 1e-9);
            assert_eq!(graph.arc_source(solution.arcs()[0]), d.source);
            assert_eq!(graph.arc_target(*solution.arcs().last().unwrap()), d.sink);
        }
    }
}

use std::sync::Arc;

use model::{
    base_types::{ArcIdx, NodeIdx, PortIdx, PortType, VesselClassIdx},
    json_serialisation::load_instance_from_json,
    network::{graph::VesselGraph, Network},
};

use crate::Solution;

const TEST_INSTANCE: &str = include_str!("../../model/resources/test_instance.json");

/// The shared test instance: hub H, ports A and B; vessel classes Small
/// (capacity 10) and Large (capacity 20).
pub struct TestData {
    pub network: Arc<Network>,
    pub small: VesselClassIdx,
    pub large: VesselClassIdx,
    pub port_a: PortIdx,
    pub port_b: PortIdx,
    // vertices of the graph of Small
    pub source: NodeIdx,
    pub a_pu: NodeIdx,
    pub a_de: NodeIdx,
    pub b_pu3: NodeIdx,
    pub b_pu4: NodeIdx,
    pub b_de: NodeIdx,
    pub sink: NodeIdx,
}

pub fn init_test_data() -> TestData {
    let input_data: serde_json::Value = serde_json::from_str(TEST_INSTANCE).unwrap();
    let network = Arc::new(load_instance_from_json(input_data).unwrap());
    let small = VesselClassIdx(0);
    let graph = network.graph(small);
    let port_a = PortIdx(1);
    let port_b = PortIdx(2);
    TestData {
        small,
        large: VesselClassIdx(1),
        port_a,
        port_b,
        source: graph.source(),
        a_pu: graph.get_vertex(port_a, PortType::Pickup, 2).unwrap(),
        a_de: graph.get_vertex(port_a, PortType::Delivery, 2).unwrap(),
        b_pu3: graph.get_vertex(port_b, PortType::Pickup, 3).unwrap(),
        b_pu4: graph.get_vertex(port_b, PortType::Pickup, 4).unwrap(),
        b_de: graph.get_vertex(port_b, PortType::Delivery, 5).unwrap(),
        sink: graph.sink(),
        network,
    }
}

/// the arc from `from` to `to`; panics if there is none.
pub fn arc(graph: &VesselGraph, from: NodeIdx, to: NodeIdx) -> ArcIdx {
    graph
        .out_arcs(from)
        .find(|a| graph.arc_target(*a) == to)
        .unwrap_or_else(|| panic!("no arc from {} to {}", from, to))
}

/// the solution traversing `nodes` in the given vessel class's graph.
pub fn solution_through(
    network: &Network,
    vessel_class: VesselClassIdx,
    nodes: &[NodeIdx],
    reduced_cost: f64,
) -> Solution {
    let graph = network.graph(vessel_class);
    let arcs = nodes
        .windows(2)
        .map(|w| arc(&graph, w[0], w[1]))
        .collect();
    Solution::new(arcs, reduced_cost, graph)
}

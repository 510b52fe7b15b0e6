//! Small instances and a scripted master problem for the tests of this crate
//! and its dependents.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use model::{
    base_types::{NodeIdx, VesselClassIdx},
    json_serialisation::load_instance_from_json,
    network::Network,
};
use serde_json::json;
use solution::{Column, Solution};

use crate::master::{IntegerSolution, LinearSolution, MasterError, MasterSolver, RowLayout};

/// Hub H and a single port P with a pickup demand of 4 and no penalty. One
/// vessel class of capacity 10 with the only rotation H -> P -> H costing 100.
pub fn single_port_network() -> Arc<Network> {
    let input = json!({
        "numTimes": 3,
        "vesselClasses": [
            { "name": "V", "capacity": 10, "numVessels": 1 }
        ],
        "ports": [
            { "name": "H", "hub": true },
            { "name": "P", "pickup": { "demand": 4 } }
        ],
        "graphs": [{
            "vesselClass": "V",
            "nodes": [
                { "port": "H", "portType": "both", "nodeType": "source", "time": 0 },
                { "port": "P", "portType": "pickup", "nodeType": "regularPort", "time": 1 },
                { "port": "H", "portType": "both", "nodeType": "sink", "time": 2 }
            ],
            "arcs": [
                {
                    "from": { "port": "H", "portType": "both", "time": 0 },
                    "to": { "port": "P", "portType": "pickup", "time": 1 },
                    "arcType": "sourceToPort", "timeCharter": 60.0, "length": 10.0, "speed": 10.0
                },
                {
                    "from": { "port": "P", "portType": "pickup", "time": 1 },
                    "to": { "port": "H", "portType": "both", "time": 2 },
                    "arcType": "portToSink", "timeCharter": 40.0, "length": 10.0, "speed": 10.0
                }
            ]
        }]
    });
    Arc::new(load_instance_from_json(input).unwrap())
}

/// Pickups at P and Q that can be called twice: P@1, Q@2, P@3, Q@4.
pub struct LoopingNetwork {
    pub network: Arc<Network>,
    pub source: NodeIdx,
    pub p1: NodeIdx,
    pub q2: NodeIdx,
    pub p3: NodeIdx,
    pub q4: NodeIdx,
    pub sink: NodeIdx,
}

impl LoopingNetwork {
    /// the rotation through `nodes`, with a reduced cost of zero.
    pub fn rotation(&self, nodes: &[NodeIdx]) -> Solution {
        solution::test_utilities::solution_through(&self.network, VesselClassIdx(0), nodes, 0.0)
    }
}

pub fn looping_network() -> LoopingNetwork {
    let vertex = |port: &str, port_type: &str, time: u32| {
        json!({ "port": port, "portType": port_type, "time": time })
    };
    let leg = |from: serde_json::Value, to: serde_json::Value, arc_type: &str| {
        json!({
            "from": from, "to": to, "arcType": arc_type,
            "timeCharter": 1.0, "length": 10.0, "speed": 10.0
        })
    };
    let node = |port: &str, port_type: &str, node_type: &str, time: u32| {
        json!({ "port": port, "portType": port_type, "nodeType": node_type, "time": time })
    };
    let input = json!({
        "numTimes": 6,
        "vesselClasses": [
            { "name": "V", "capacity": 10, "numVessels": 1 }
        ],
        "ports": [
            { "name": "H", "hub": true },
            { "name": "P", "pickup": { "demand": 1, "penalty": 10.0 } },
            { "name": "Q", "pickup": { "demand": 1, "penalty": 10.0 } }
        ],
        "graphs": [{
            "vesselClass": "V",
            "nodes": [
                node("H", "both", "source", 0),
                node("P", "pickup", "regularPort", 1),
                node("Q", "pickup", "regularPort", 2),
                node("P", "pickup", "regularPort", 3),
                node("Q", "pickup", "regularPort", 4),
                node("H", "both", "sink", 5)
            ],
            "arcs": [
                leg(vertex("H", "both", 0), vertex("P", "pickup", 1), "sourceToPort"),
                leg(vertex("P", "pickup", 1), vertex("Q", "pickup", 2), "portToPort"),
                leg(vertex("Q", "pickup", 2), vertex("P", "pickup", 3), "portToPort"),
                leg(vertex("P", "pickup", 3), vertex("Q", "pickup", 4), "portToPort"),
                leg(vertex("Q", "pickup", 4), vertex("H", "both", 5), "portToSink"),
                leg(vertex("P", "pickup", 3), vertex("H", "both", 5), "portToSink")
            ]
        }]
    });
    let network = Arc::new(load_instance_from_json(input).unwrap());
    let graph = network.graph(VesselClassIdx(0));
    let port = |name: &str| network.ports().idx_of(name).unwrap();
    let pickup = |name: &str, time| {
        graph
            .get_vertex(port(name), model::base_types::PortType::Pickup, time)
            .unwrap()
    };
    LoopingNetwork {
        source: graph.source(),
        p1: pickup("P", 1),
        q2: pickup("Q", 2),
        p3: pickup("P", 3),
        q4: pickup("Q", 4),
        sink: graph.sink(),
        network: network.clone(),
    }
}

/// A single pickup port P that can be called before and after a return to
/// the hub: H -> P@1 -> CB@2 -> P@3 -> H, or straight back from P@1.
pub struct ComebackNetwork {
    pub network: Arc<Network>,
    pub source: NodeIdx,
    pub p1: NodeIdx,
    pub comeback: NodeIdx,
    pub p3: NodeIdx,
    pub sink: NodeIdx,
}

impl ComebackNetwork {
    /// the rotation through `nodes`, with a reduced cost of zero.
    pub fn rotation(&self, nodes: &[NodeIdx]) -> Solution {
        solution::test_utilities::solution_through(&self.network, VesselClassIdx(0), nodes, 0.0)
    }
}

pub fn comeback_network() -> ComebackNetwork {
    let vertex = |port_type: &str, time: u32| {
        let port = if port_type == "both" { "H" } else { "P" };
        json!({ "port": port, "portType": port_type, "time": time })
    };
    let leg = |from: serde_json::Value, to: serde_json::Value, arc_type: &str| {
        json!({
            "from": from, "to": to, "arcType": arc_type,
            "timeCharter": 1.0, "length": 10.0, "speed": 10.0
        })
    };
    let input = json!({
        "numTimes": 5,
        "vesselClasses": [
            { "name": "V", "capacity": 10, "numVessels": 1 }
        ],
        "ports": [
            { "name": "H", "hub": true },
            { "name": "P", "pickup": { "demand": 1, "penalty": 10.0 } }
        ],
        "graphs": [{
            "vesselClass": "V",
            "nodes": [
                { "port": "H", "portType": "both", "nodeType": "source", "time": 0 },
                { "port": "P", "portType": "pickup", "nodeType": "regularPort", "time": 1 },
                { "port": "H", "portType": "both", "nodeType": "comebackHub", "time": 2 },
                { "port": "P", "portType": "pickup", "nodeType": "regularPort", "time": 3 },
                { "port": "H", "portType": "both", "nodeType": "sink", "time": 4 }
            ],
            "arcs": [
                leg(vertex("both", 0), vertex("pickup", 1), "sourceToPort"),
                leg(vertex("pickup", 1), vertex("both", 2), "portToComebackHub"),
                leg(vertex("both", 2), vertex("pickup", 3), "comebackHubToPort"),
                leg(vertex("pickup", 3), vertex("both", 4), "portToSink"),
                leg(vertex("pickup", 1), vertex("both", 4), "portToSink")
            ]
        }]
    });
    let network = Arc::new(load_instance_from_json(input).unwrap());
    let graph = network.graph(VesselClassIdx(0));
    let hub = network.ports().idx_of("H").unwrap();
    let port = network.ports().idx_of("P").unwrap();
    let pickup = |time| {
        graph
            .get_vertex(port, model::base_types::PortType::Pickup, time)
            .unwrap()
    };
    ComebackNetwork {
        source: graph.source(),
        p1: pickup(1),
        comeback: graph
            .get_vertex(hub, model::base_types::PortType::Both, 2)
            .unwrap(),
        p3: pickup(3),
        sink: graph.sink(),
        network: network.clone(),
    }
}

/// Pickups at P and Q reachable in either order: H -> P@1 -> Q@2 -> H and
/// H -> Q@1 -> P@2 -> H.
pub struct TwoOrdersNetwork {
    pub network: Arc<Network>,
    pub p_first: Solution,
    pub q_first: Solution,
}

pub fn two_orders_network() -> TwoOrdersNetwork {
    let vertex = |port: &str, time: u32| {
        let port_type = if port == "H" { "both" } else { "pickup" };
        json!({ "port": port, "portType": port_type, "time": time })
    };
    let node = |port: &str, node_type: &str, time: u32| {
        let port_type = if port == "H" { "both" } else { "pickup" };
        json!({ "port": port, "portType": port_type, "nodeType": node_type, "time": time })
    };
    let leg = |from: serde_json::Value, to: serde_json::Value, arc_type: &str| {
        json!({
            "from": from, "to": to, "arcType": arc_type,
            "timeCharter": 1.0, "length": 10.0, "speed": 10.0
        })
    };
    let input = json!({
        "numTimes": 4,
        "vesselClasses": [
            { "name": "V", "capacity": 10, "numVessels": 2 }
        ],
        "ports": [
            { "name": "H", "hub": true },
            { "name": "P", "pickup": { "demand": 1, "penalty": 10.0 } },
            { "name": "Q", "pickup": { "demand": 1, "penalty": 10.0 } }
        ],
        "graphs": [{
            "vesselClass": "V",
            "nodes": [
                node("H", "source", 0),
                node("P", "regularPort", 1),
                node("Q", "regularPort", 2),
                node("Q", "regularPort", 1),
                node("P", "regularPort", 2),
                node("H", "sink", 3)
            ],
            "arcs": [
                leg(vertex("H", 0), vertex("P", 1), "sourceToPort"),
                leg(vertex("P", 1), vertex("Q", 2), "portToPort"),
                leg(vertex("Q", 2), vertex("H", 3), "portToSink"),
                leg(vertex("H", 0), vertex("Q", 1), "sourceToPort"),
                leg(vertex("Q", 1), vertex("P", 2), "portToPort"),
                leg(vertex("P", 2), vertex("H", 3), "portToSink")
            ]
        }]
    });
    let network = Arc::new(load_instance_from_json(input).unwrap());
    let graph = network.graph(VesselClassIdx(0));
    let pickup = |name: &str, time| {
        let port = network.ports().idx_of(name).unwrap();
        graph
            .get_vertex(port, model::base_types::PortType::Pickup, time)
            .unwrap()
    };
    let rotation = |nodes: &[NodeIdx]| {
        solution::test_utilities::solution_through(&network, VesselClassIdx(0), nodes, 0.0)
    };
    TwoOrdersNetwork {
        p_first: rotation(&[graph.source(), pickup("P", 1), pickup("Q", 2), graph.sink()]),
        q_first: rotation(&[graph.source(), pickup("Q", 1), pickup("P", 2), graph.sink()]),
        network: network.clone(),
    }
}

type LpScript =
    Box<dyn Fn(&RowLayout, &[Arc<Column>]) -> Result<LinearSolution, MasterError> + Send>;
type MipScript =
    Box<dyn Fn(&RowLayout, &[Arc<Column>]) -> Result<IntegerSolution, MasterError> + Send>;

/// A master problem answering from a queue of prepared responses. An exhausted
/// queue answers with a solver error.
#[derive(Default)]
pub struct ScriptedMaster {
    lp: Mutex<VecDeque<LpScript>>,
    mip: Mutex<VecDeque<MipScript>>,
}

impl ScriptedMaster {
    pub fn new() -> ScriptedMaster {
        ScriptedMaster::default()
    }

    pub fn then_lp(
        self,
        script: impl Fn(&RowLayout, &[Arc<Column>]) -> Result<LinearSolution, MasterError>
            + Send
            + 'static,
    ) -> ScriptedMaster {
        self.lp.lock().unwrap().push_back(Box::new(script));
        self
    }

    pub fn then_mip(
        self,
        script: impl Fn(&RowLayout, &[Arc<Column>]) -> Result<IntegerSolution, MasterError>
            + Send
            + 'static,
    ) -> ScriptedMaster {
        self.mip.lock().unwrap().push_back(Box::new(script));
        self
    }

    pub fn remaining_lps(&self) -> usize {
        self.lp.lock().unwrap().len()
    }
}

impl MasterSolver for ScriptedMaster {
    fn solve_lp(
        &self,
        layout: &RowLayout,
        columns: &[Arc<Column>],
    ) -> Result<LinearSolution, MasterError> {
        let script = self.lp.lock().unwrap().pop_front();
        match script {
            Some(script) => script(layout, columns),
            None => Err(MasterError::Solver("no lp response left".to_string())),
        }
    }

    fn solve_mip(
        &self,
        layout: &RowLayout,
        columns: &[Arc<Column>],
    ) -> Result<IntegerSolution, MasterError> {
        let script = self.mip.lock().unwrap().pop_front();
        match script {
            Some(script) => script(layout, columns),
            None => Err(MasterError::Solver("no mip response left".to_string())),
        }
    }
}

/// An LP solution with the same dual on every port row, a zero dual on the
/// vessel class rows and the given value per column.
pub fn uniform_lp_solution(
    layout: &RowLayout,
    columns: &[Arc<Column>],
    port_dual: f64,
    objective: f64,
    value_of: impl Fn(usize, &Column) -> f64,
) -> LinearSolution {
    let row_duals = vec![port_dual; layout.num_port_rows()];
    LinearSolution {
        objective,
        port_duals: Arc::new(layout.port_duals(&row_duals)),
        vessel_class_duals: vec![0.0; layout.vessel_class_rows().len()],
        values: columns
            .iter()
            .enumerate()
            .map(|(i, c)| value_of(i, c))
            .collect(),
    }
}

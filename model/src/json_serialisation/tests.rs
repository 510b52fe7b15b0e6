// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use serde_json::json;

use crate::{
    base_types::{NodeType, PortIdx, PortType, VesselClassIdx, HUB},
    config::{Config, PortRowSense},
    err::ModelError,
    json_serialisation::{load_config_from_json, load_instance_from_file, load_instance_from_json},
};

#[test]
fn test_load_from_json() {
    // ACT
    let network = load_instance_from_file("resources/test_instance.json").unwrap();

    // ASSERT
    assert_eq!(network.num_times(), 8);

    let ports = network.ports();
    assert_eq!(ports.len(), 3);
    assert!(ports.hub().is_hub());
    assert_eq!(ports.idx_of("PortB"), Some(PortIdx(2)));
    assert_eq!(ports.num_rows(), 4);

    let port_a = ports.port(PortIdx(1));
    assert_eq!(port_a.demand(PortType::Pickup), 4);
    assert_eq!(port_a.demand(PortType::Delivery), 3);
    assert_eq!(port_a.penalty(PortType::Pickup), 30.0);
    assert_eq!(port_a.penalty(PortType::Delivery), 25.0);
    assert_eq!(port_a.variable_fee(VesselClassIdx(1)), 1.0);
    assert_eq!(port_a.closing_time_windows(), &[(2, 4), (5, 6)]);
    assert!(port_a.allows(VesselClassIdx(0)));
    assert!(port_a.allows(VesselClassIdx(1)));
    assert_eq!(ports.all_penalties(), 115.0);

    let vessel_classes = network.vessel_classes();
    assert_eq!(vessel_classes.len(), 2);
    let small = vessel_classes.vessel_class(VesselClassIdx(0));
    assert_eq!(small.name(), "Small");
    assert_eq!(small.capacity(), 10);
    assert_eq!(small.num_vessels(), 2);
    assert_eq!(small.speeds().collect::<Vec<_>>(), vec![10.0, 14.0]);
    assert_eq!(small.bunker_cost_per_time_unit(14.0), Some(3.5));
    assert_eq!(small.top_speed(), 14.0);
}

#[test]
fn test_graph_cleanup_on_load() {
    let network = load_instance_from_file("resources/test_instance.json").unwrap();
    let graph = network.graph(VesselClassIdx(0));

    // the pickup at PortB@6 has only an in-arc and gets removed together with it,
    // of the two parallel source arcs into PortA only the cheaper one survives.
    assert_eq!(graph.num_nodes(), 7);
    assert_eq!(graph.num_arcs(), 13);
    assert_eq!(graph.get_vertex(PortIdx(2), PortType::Pickup, 6), None);

    let source = graph.source();
    assert_eq!(graph.node(source).node_type(), NodeType::Source);
    assert_eq!(graph.node(graph.sink()).node_type(), NodeType::Sink);
    let a_pu = graph.get_vertex(PortIdx(1), PortType::Pickup, 2).unwrap();
    let arcs_into_a_pu: Vec<_> = graph
        .out_arcs(source)
        .filter(|a| graph.arc_target(*a) == a_pu)
        .collect();
    assert_eq!(arcs_into_a_pu.len(), 1);
    assert_eq!(graph.leg(arcs_into_a_pu[0]).cost(), 10.0);

    // arcs_by_cost is ascending
    let costs: Vec<_> = graph
        .arcs_by_cost()
        .iter()
        .map(|a| graph.leg(*a).cost())
        .collect();
    assert!(costs.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(costs[0], 5.0);

    let large = network.graph(VesselClassIdx(1));
    assert_eq!(large.num_nodes(), 4);
    assert_eq!(large.num_arcs(), 5);
    assert_eq!(large.node(large.source()).port(), HUB);
}

#[test]
fn test_leg_costs_are_summed() {
    let network = load_instance_from_file("resources/test_instance.json").unwrap();
    let graph = network.graph(VesselClassIdx(0));
    let b_de = graph.get_vertex(PortIdx(2), PortType::Delivery, 5).unwrap();
    let arc = graph.out_arcs(b_de).next().unwrap();
    assert_eq!(graph.arc_target(arc), graph.sink());
    // time charter 12 minus revenue 1
    assert_eq!(graph.leg(arc).cost(), 11.0);
    assert_eq!(graph.leg(arc).costs().revenue, 1.0);
}

#[test]
fn test_unknown_port_in_graph() {
    let input = json!({
        "numTimes": 3,
        "vesselClasses": [{ "name": "V", "capacity": 5, "numVessels": 1 }],
        "ports": [{ "name": "HUB00", "hub": true }, { "name": "P" }],
        "graphs": [{
            "vesselClass": "V",
            "nodes": [{ "port": "Q", "portType": "pickup", "nodeType": "regularPort", "time": 1 }],
            "arcs": []
        }]
    });
    match load_instance_from_json(input) {
        Err(ModelError::UnknownPort(name)) => assert_eq!(name, "Q"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_hub_must_come_first() {
    let input = json!({
        "numTimes": 3,
        "vesselClasses": [],
        "ports": [{ "name": "P" }, { "name": "HUB00", "hub": true }],
        "graphs": []
    });
    assert!(matches!(
        load_instance_from_json(input),
        Err(ModelError::InvalidHub(_))
    ));
}

#[test]
fn test_missing_vertex_is_reported() {
    let input = json!({
        "numTimes": 3,
        "vesselClasses": [{ "name": "V", "capacity": 5, "numVessels": 1 }],
        "ports": [{ "name": "HUB00", "hub": true }, { "name": "P" }],
        "graphs": [{
            "vesselClass": "V",
            "nodes": [
                { "port": "HUB00", "portType": "both", "nodeType": "source", "time": 0 },
                { "port": "HUB00", "portType": "both", "nodeType": "sink", "time": 2 }
            ],
            "arcs": [{
                "from": { "port": "HUB00", "portType": "both", "time": 0 },
                "to": { "port": "P", "portType": "pickup", "time": 1 },
                "arcType": "sourceToPort"
            }]
        }]
    });
    match load_instance_from_json(input) {
        Err(ModelError::MissingVertex { port, time, .. }) => {
            assert_eq!(port, "P");
            assert_eq!(time, 1);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_load_config_with_defaults() {
    let config = load_config_from_json(json!({
        "greedy_reruns": 3,
        "port_row_sense": "atMostOne",
        "reduction": { "start": 0.2 }
    }))
    .unwrap();
    assert_eq!(config.greedy_reruns, 3);
    assert_eq!(config.port_row_sense, PortRowSense::AtMostOne);
    assert_eq!(config.reduction.start, 0.2);
    assert_eq!(config.reduction.end, 1.0);
    assert_eq!(config.greedy_max_outarcs, Config::default().greedy_max_outarcs);
}

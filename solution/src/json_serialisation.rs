use model::network::Network;
use serde::{Deserialize, Serialize};

use crate::Column;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonRotation {
    vessel_class: String,
    cost: f64,
    reduced_cost: f64,
    value: f64,
    origin: String,
    length: f64,
    calls: Vec<JsonCall>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonCall {
    port: String,
    port_type: String,
    node_type: String,
    time: u32,
}

/// the rotations (column and its value in the master) with their port calls.
pub fn rotations_to_json(rotations: &[(&Column, f64)], network: &Network) -> serde_json::Value {
    let ports = network.ports();
    let vessel_classes = network.vessel_classes();
    let json_rotations: Vec<JsonRotation> = rotations
        .iter()
        .filter_map(|(column, value)| {
            let solution = column.solution()?;
            let graph = solution.graph();
            Some(JsonRotation {
                vessel_class: vessel_classes
                    .vessel_class(solution.vessel_class())
                    .name()
                    .clone(),
                cost: solution.cost(),
                reduced_cost: solution.reduced_cost(),
                value: *value,
                origin: column.origin().to_string(),
                length: solution.length(),
                calls: solution
                    .nodes()
                    .map(|v| {
                        let node = graph.node(v);
                        JsonCall {
                            port: ports.port(node.port()).name().clone(),
                            port_type: node.port_type().to_string(),
                            node_type: node.node_type().to_string(),
                            time: node.time_step(),
                        }
                    })
                    .collect(),
            })
        })
        .collect();
    serde_json::json!(json_rotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{init_test_data, solution_through};
    use crate::ColumnOrigin;
    use model::base_types::PortType;

    #[test]
    fn rotations_list_their_calls() {
        let d = init_test_data();
        let solution =
            solution_through(&d.network, d.small, &[d.source, d.a_de, d.b_pu4, d.sink], -38.0);
        let column = Column::new(solution, 2, ColumnOrigin::Exact);
        let dummy = Column::dummy(&d.network.ports(), 2, 1e8);

        let json = rotations_to_json(&[(&column, 1.0), (&dummy, 0.0)], &d.network);
        let rotations = json.as_array().unwrap();
        assert_eq!(rotations.len(), 1);
        assert_eq!(rotations[0]["vesselClass"], "Small");
        assert_eq!(rotations[0]["origin"], "exact");
        assert_eq!(rotations[0]["calls"].as_array().unwrap().len(), 4);
        assert_eq!(rotations[0]["calls"][1]["port"], "PortA");
        assert_eq!(
            rotations[0]["calls"][1]["portType"],
            PortType::Delivery.to_string()
        );
    }
}

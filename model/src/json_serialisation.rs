#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::sync::Arc;

use crate::base_types::{
    ArcType, Cost, Distance, Idx, NodeType, PortIdx, PortType, Quantity, Speed, TimeStep,
    VesselClassIdx, VesselCount,
};
use crate::config::Config;
use crate::err::ModelError;
use crate::network::builder::GraphBuilder;
use crate::network::graph::VesselGraph;
use crate::network::legs::{Leg, LegCosts};
use crate::network::nodes::Node;
use crate::network::Network;
use crate::ports::{Port, Ports};
use crate::vessel_classes::{VesselClass, VesselClasses};

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonSpeedCost {
    speed: Speed,
    cost: Cost,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonVesselClass {
    name: String,
    capacity: Quantity,
    num_vessels: VesselCount,
    #[serde(default)]
    time_charter_cost_per_time_unit: Cost,
    #[serde(default)]
    hotel_cost_per_time_unit: Cost,
    #[serde(default)]
    bunker_cost_per_time_unit: Vec<JsonSpeedCost>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct JsonCall {
    demand: Quantity,
    transit: TimeStep,
    handling: TimeStep,
    revenue: Cost,
    penalty: Cost,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonPort {
    name: String,
    #[serde(default)]
    hub: bool,
    #[serde(default)]
    pickup: JsonCall,
    #[serde(default)]
    delivery: JsonCall,
    #[serde(default)]
    fixed_fee: Cost,
    #[serde(default)]
    variable_fees: HashMap<String, Cost>, // by vessel class name
    #[serde(default)]
    movement_costs: HashMap<String, Cost>, // by vessel class name
    #[serde(default)]
    allowed_vessel_classes: Option<Vec<String>>, // None means all
    #[serde(default)]
    closing_time_windows: Vec<(TimeStep, TimeStep)>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonVertex {
    port: String,
    port_type: PortType,
    time: TimeStep,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonNode {
    port: String,
    port_type: PortType,
    node_type: NodeType,
    time: TimeStep,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonArc {
    from: JsonVertex,
    to: JsonVertex,
    arc_type: ArcType,
    #[serde(flatten)]
    costs: LegCosts,
    #[serde(default)]
    length: Distance,
    #[serde(default)]
    speed: Speed,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonGraph {
    vessel_class: String,
    nodes: Vec<JsonNode>,
    arcs: Vec<JsonArc>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonInput {
    num_times: TimeStep,
    vessel_classes: Vec<JsonVesselClass>,
    ports: Vec<JsonPort>,
    graphs: Vec<JsonGraph>,
}

pub fn load_instance_from_file(path: &str) -> Result<Network, ModelError> {
    load_instance_from_json(read_json(path)?)
}

pub fn load_instance_from_json(input_data: serde_json::Value) -> Result<Network, ModelError> {
    let json_input: JsonInput = serde_json::from_value(input_data)?;
    let vessel_classes = Arc::new(create_vessel_classes(&json_input));
    let ports = Arc::new(create_ports(&json_input, &vessel_classes)?);
    let graphs = create_graphs(&json_input, &ports, &vessel_classes)?;
    Ok(Network::new(
        json_input.num_times,
        ports,
        vessel_classes,
        graphs,
    ))
}

pub fn load_config_from_file(path: &str) -> Result<Config, ModelError> {
    load_config_from_json(read_json(path)?)
}

pub fn load_config_from_json(input_data: serde_json::Value) -> Result<Config, ModelError> {
    Ok(serde_json::from_value(input_data)?)
}

fn read_json(path: &str) -> Result<serde_json::Value, ModelError> {
    let mut file = File::open(path)?;
    let mut data = String::new();
    file.read_to_string(&mut data)?;
    Ok(serde_json::from_str(&data)?)
}

fn create_vessel_classes(json_input: &JsonInput) -> VesselClasses {
    VesselClasses::new(
        json_input
            .vessel_classes
            .iter()
            .enumerate()
            .map(|(i, vc)| {
                VesselClass::new(
                    VesselClassIdx(i as Idx),
                    vc.name.clone(),
                    vc.capacity,
                    vc.num_vessels,
                    vc.time_charter_cost_per_time_unit,
                    vc.hotel_cost_per_time_unit,
                    vc.bunker_cost_per_time_unit
                        .iter()
                        .map(|sc| (sc.speed, sc.cost))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn by_vessel_class(
    values: &HashMap<String, Cost>,
    vessel_classes: &VesselClasses,
) -> Result<HashMap<VesselClassIdx, Cost>, ModelError> {
    values
        .iter()
        .map(|(name, value)| {
            vessel_classes
                .idx_of(name)
                .map(|vc| (vc, *value))
                .ok_or_else(|| ModelError::UnknownVesselClass(name.clone()))
        })
        .collect()
}

fn create_ports(json_input: &JsonInput, vessel_classes: &VesselClasses) -> Result<Ports, ModelError> {
    let mut ports = Vec::new();
    for (i, p) in json_input.ports.iter().enumerate() {
        let allowed = match &p.allowed_vessel_classes {
            None => vessel_classes.iter().collect(),
            Some(names) => names
                .iter()
                .map(|name| {
                    vessel_classes
                        .idx_of(name)
                        .ok_or_else(|| ModelError::UnknownVesselClass(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };
        ports.push(
            Port::new(PortIdx(i as Idx), p.name.clone(), p.hub)
                .with_pickup(
                    p.pickup.demand,
                    p.pickup.transit,
                    p.pickup.handling,
                    p.pickup.revenue,
                    p.pickup.penalty,
                )
                .with_delivery(
                    p.delivery.demand,
                    p.delivery.transit,
                    p.delivery.handling,
                    p.delivery.revenue,
                    p.delivery.penalty,
                )
                .with_fees(
                    p.fixed_fee,
                    by_vessel_class(&p.variable_fees, vessel_classes)?,
                    by_vessel_class(&p.movement_costs, vessel_classes)?,
                )
                .with_allowed_vessel_classes(allowed)
                .with_closing_time_windows(p.closing_time_windows.clone()),
        );
    }
    Ports::new(ports)
}

fn create_graphs(
    json_input: &JsonInput,
    ports: &Arc<Ports>,
    vessel_classes: &VesselClasses,
) -> Result<Vec<VesselGraph>, ModelError> {
    let port_idx = |name: &String| {
        ports
            .idx_of(name)
            .ok_or_else(|| ModelError::UnknownPort(name.clone()))
    };

    let mut graphs = Vec::new();
    for vessel_class in vessel_classes.iter() {
        let name = vessel_classes.vessel_class(vessel_class).name();
        let json_graph = json_input
            .graphs
            .iter()
            .find(|g| &g.vessel_class == name)
            .ok_or_else(|| ModelError::MissingGraph(name.clone()))?;

        let mut builder = GraphBuilder::new(vessel_class, ports.clone());
        for n in json_graph.nodes.iter() {
            builder.add_vertex(Node::new(
                port_idx(&n.port)?,
                n.port_type,
                n.node_type,
                n.time,
                vessel_class,
            ))?;
        }
        for a in json_graph.arcs.iter() {
            builder.add_arc(
                (port_idx(&a.from.port)?, a.from.port_type, a.from.time),
                (port_idx(&a.to.port)?, a.to.port_type, a.to.time),
                Leg::new(a.arc_type, a.costs, a.length, a.speed),
            )?;
        }
        graphs.push(builder.finalize()?);
    }
    Ok(graphs)
}

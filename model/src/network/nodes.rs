use crate::base_types::{NodeType, PortIdx, PortType, PortWithType, TimeStep, VesselClassIdx, HUB};

use std::fmt;

/// Payload of a vertex of a vessel class's time-expanded graph.
/// (port, port_type, time_step) is unique within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    port: PortIdx,
    port_type: PortType,
    node_type: NodeType,
    time_step: TimeStep,
    vessel_class: VesselClassIdx,
}

// static functions
impl Node {
    pub fn new(
        port: PortIdx,
        port_type: PortType,
        node_type: NodeType,
        time_step: TimeStep,
        vessel_class: VesselClassIdx,
    ) -> Node {
        Node {
            port,
            port_type,
            node_type,
            time_step,
            vessel_class,
        }
    }

    pub fn source(time_step: TimeStep, vessel_class: VesselClassIdx) -> Node {
        Node::new(HUB, PortType::Both, NodeType::Source, time_step, vessel_class)
    }

    pub fn sink(time_step: TimeStep, vessel_class: VesselClassIdx) -> Node {
        Node::new(HUB, PortType::Both, NodeType::Sink, time_step, vessel_class)
    }

    pub fn comeback_hub(time_step: TimeStep, vessel_class: VesselClassIdx) -> Node {
        Node::new(
            HUB,
            PortType::Both,
            NodeType::ComebackHub,
            time_step,
            vessel_class,
        )
    }

    pub fn regular(
        port: PortIdx,
        port_type: PortType,
        time_step: TimeStep,
        vessel_class: VesselClassIdx,
    ) -> Node {
        Node::new(
            port,
            port_type,
            NodeType::RegularPort,
            time_step,
            vessel_class,
        )
    }
}

// methods
impl Node {
    pub fn port(&self) -> PortIdx {
        self.port
    }

    pub fn port_type(&self) -> PortType {
        self.port_type
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn time_step(&self) -> TimeStep {
        self.time_step
    }

    pub fn vessel_class(&self) -> VesselClassIdx {
        self.vessel_class
    }

    pub fn port_with_type(&self) -> PortWithType {
        (self.port, self.port_type)
    }

    pub fn is_regular_port(&self) -> bool {
        self.node_type == NodeType::RegularPort
    }

    pub fn is_comeback_hub(&self) -> bool {
        self.node_type == NodeType::ComebackHub
    }

    /// both nodes refer to the same master problem row.
    pub fn same_row_as(&self, other: &Node) -> bool {
        self.port == other.port && self.port_type == other.port_type
    }

    pub fn is_row(&self, row: PortWithType) -> bool {
        self.port == row.0 && self.port_type == row.1
    }

    pub fn key(&self) -> (PortIdx, PortType, TimeStep) {
        (self.port, self.port_type, self.time_step)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{} p{}-{}@{}]",
            self.node_type, self.port, self.port_type, self.time_step
        )
    }
}

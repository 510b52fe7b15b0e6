use rs_graph::traits::{Directed, FiniteDigraph, FiniteGraph};
use rs_graph::{IndexGraph, LinkedListGraph};

use crate::base_types::{
    ArcIdx, Cost, Idx, NodeIdx, PortIdx, PortType, Quantity, TimeStep, VesselClassIdx,
};
use crate::network::legs::Leg;
use crate::network::nodes::Node;
use crate::ports::Ports;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The time-expanded graph of one vessel class.
///
/// The topology is immutable once finalized by the
/// [`GraphBuilder`](crate::network::builder::GraphBuilder); branching only hides
/// arcs through an overlay kept outside of the graph. Vertex and arc indices are
/// contiguous and 0-based.
pub struct VesselGraph {
    vessel_class: VesselClassIdx,
    graph: LinkedListGraph<u32>,
    nodes: Vec<Node>,
    legs: Vec<Leg>,
    source: NodeIdx,
    sink: NodeIdx,
    vertex_lookup: HashMap<(PortIdx, PortType, TimeStep), NodeIdx>,
    arcs_by_cost: Vec<ArcIdx>, // ascending cost
    ports: Arc<Ports>,
}

// static functions
impl VesselGraph {
    pub(crate) fn new(
        vessel_class: VesselClassIdx,
        graph: LinkedListGraph<u32>,
        nodes: Vec<Node>,
        legs: Vec<Leg>,
        source: NodeIdx,
        sink: NodeIdx,
        ports: Arc<Ports>,
    ) -> VesselGraph {
        let vertex_lookup = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.key(), NodeIdx(i as Idx)))
            .collect();
        let mut arcs_by_cost: Vec<ArcIdx> = (0..legs.len()).map(|i| ArcIdx(i as Idx)).collect();
        arcs_by_cost.sort_by(|a, b| legs[a.idx()].cost().total_cmp(&legs[b.idx()].cost()));
        VesselGraph {
            vessel_class,
            graph,
            nodes,
            legs,
            source,
            sink,
            vertex_lookup,
            arcs_by_cost,
            ports,
        }
    }
}

// methods
impl VesselGraph {
    pub fn vessel_class(&self) -> VesselClassIdx {
        self.vessel_class
    }

    pub fn ports(&self) -> &Ports {
        &self.ports
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    pub fn num_arcs(&self) -> usize {
        self.graph.num_edges()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> {
        (0..self.nodes.len()).map(|i| NodeIdx(i as Idx))
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcIdx> {
        (0..self.legs.len()).map(|i| ArcIdx(i as Idx))
    }

    pub fn node(&self, node: NodeIdx) -> &Node {
        &self.nodes[node.idx()]
    }

    pub fn leg(&self, arc: ArcIdx) -> &Leg {
        &self.legs[arc.idx()]
    }

    pub fn source(&self) -> NodeIdx {
        self.source
    }

    pub fn sink(&self) -> NodeIdx {
        self.sink
    }

    pub fn get_vertex(
        &self,
        port: PortIdx,
        port_type: PortType,
        time_step: TimeStep,
    ) -> Option<NodeIdx> {
        self.vertex_lookup
            .get(&(port, port_type, time_step))
            .copied()
    }

    pub fn arc_source(&self, arc: ArcIdx) -> NodeIdx {
        let edge = self.graph.id2edge(arc.idx());
        NodeIdx(self.graph.node_id(self.graph.src(edge)) as Idx)
    }

    pub fn arc_target(&self, arc: ArcIdx) -> NodeIdx {
        let edge = self.graph.id2edge(arc.idx());
        NodeIdx(self.graph.node_id(self.graph.snk(edge)) as Idx)
    }

    pub fn out_arcs(&self, node: NodeIdx) -> impl Iterator<Item = ArcIdx> + '_ {
        self.graph
            .outedges(self.graph.id2node(node.idx()))
            .map(move |(e, _)| ArcIdx(self.graph.edge_id(e) as Idx))
    }

    pub fn in_arcs(&self, node: NodeIdx) -> impl Iterator<Item = ArcIdx> + '_ {
        self.graph
            .inedges(self.graph.id2node(node.idx()))
            .map(move |(e, _)| ArcIdx(self.graph.edge_id(e) as Idx))
    }

    pub fn arcs_by_cost(&self) -> &[ArcIdx] {
        &self.arcs_by_cost
    }

    /// pickup demand of the node; 0 unless it is a pickup node.
    pub fn pickup_demand(&self, node: NodeIdx) -> Quantity {
        let n = self.node(node);
        match n.port_type() {
            PortType::Pickup => self.ports.port(n.port()).demand(PortType::Pickup),
            _ => 0,
        }
    }

    /// delivery demand of the node; 0 unless it is a delivery node.
    pub fn delivery_demand(&self, node: NodeIdx) -> Quantity {
        let n = self.node(node);
        match n.port_type() {
            PortType::Delivery => self.ports.port(n.port()).demand(PortType::Delivery),
            _ => 0,
        }
    }

    /// penalty for not serving the node's row; only regular port calls carry one.
    pub fn penalty(&self, node: NodeIdx) -> Cost {
        let n = self.node(node);
        if n.is_regular_port() {
            self.ports.port(n.port()).penalty(n.port_type())
        } else {
            0.0
        }
    }

    pub fn handling_time(&self, node: NodeIdx) -> TimeStep {
        let n = self.node(node);
        self.ports.port(n.port()).handling(n.port_type())
    }

    pub fn path_cost(&self, arcs: &[ArcIdx]) -> Cost {
        arcs.iter().map(|a| self.leg(*a).cost()).sum()
    }

    /// writes vertices (id, type, pickup, delivery, penalty) and arcs (id, source,
    /// target, cost) to `dir/graph_<vessel class>.txt`.
    pub fn dump(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(format!("graph_{}.txt", self.vessel_class));
        let mut file = File::create(&path)?;
        writeln!(file, "{} #{}", self.num_nodes(), self.vessel_class)?;
        for node in self.nodes() {
            writeln!(
                file,
                "{}\t{}\t{}\t{}\t{}",
                node,
                self.node(node).node_type(),
                self.pickup_demand(node),
                self.delivery_demand(node),
                self.penalty(node)
            )?;
        }
        for arc in self.arcs() {
            writeln!(
                file,
                "{}\t{}\t{}\t{}",
                arc,
                self.arc_source(arc),
                self.arc_target(arc),
                self.leg(arc).cost()
            )?;
        }
        Ok(path)
    }
}

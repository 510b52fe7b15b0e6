use rs_graph::traits::FiniteGraph;
use rs_graph::{Buildable, Builder, IndexGraph, LinkedListGraph};

use crate::base_types::{Idx, NodeIdx, NodeType, PortIdx, PortType, TimeStep, VesselClassIdx};
use crate::err::ModelError;
use crate::network::graph::VesselGraph;
use crate::network::legs::Leg;
use crate::network::nodes::Node;
use crate::ports::Ports;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

type VertexKey = (PortIdx, PortType, TimeStep);

/// Collects the vertices and arcs of one vessel class's graph and turns them
/// into an immutable [`VesselGraph`].
pub struct GraphBuilder {
    vessel_class: VesselClassIdx,
    ports: Arc<Ports>,
    nodes: Vec<Node>,
    lookup: HashMap<VertexKey, usize>,
    arcs: Vec<(usize, usize, Leg)>,
}

impl GraphBuilder {
    pub fn new(vessel_class: VesselClassIdx, ports: Arc<Ports>) -> GraphBuilder {
        GraphBuilder {
            vessel_class,
            ports,
            nodes: Vec::new(),
            lookup: HashMap::new(),
            arcs: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, node: Node) -> Result<(), ModelError> {
        if self.lookup.contains_key(&node.key()) {
            return Err(ModelError::DuplicateVertex {
                vessel_class: self.vessel_class,
                port: self.port_name(node.port()),
                port_type: node.port_type(),
                time: node.time_step(),
            });
        }
        self.lookup.insert(node.key(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn get_vertex(&self, port: PortIdx, port_type: PortType, time: TimeStep) -> Option<usize> {
        self.lookup.get(&(port, port_type, time)).copied()
    }

    /// adds an arc between two existing vertices. A missing vertex means the
    /// network is inconsistent: the staged graph is dumped for post-mortem
    /// analysis and an error is returned.
    pub fn add_arc(
        &mut self,
        origin: VertexKey,
        destination: VertexKey,
        leg: Leg,
    ) -> Result<(), ModelError> {
        let origin_vertex = self.find_or_dump(origin)?;
        let destination_vertex = self.find_or_dump(destination)?;
        self.arcs.push((origin_vertex, destination_vertex, leg));
        Ok(())
    }

    /// removes regular port vertices that cannot be part of any path, keeps only the
    /// cheapest of parallel arcs and assigns contiguous ids.
    pub fn finalize(self) -> Result<VesselGraph, ModelError> {
        let n = self.nodes.len();
        let source = self
            .nodes
            .iter()
            .position(|node| node.node_type() == NodeType::Source)
            .ok_or(ModelError::MissingTerminal(self.vessel_class, "source"))?;
        let sink = self
            .nodes
            .iter()
            .position(|node| node.node_type() == NodeType::Sink)
            .ok_or(ModelError::MissingTerminal(self.vessel_class, "sink"))?;

        let mut alive_node = vec![true; n];
        let mut alive_arc = vec![true; self.arcs.len()];

        // clean up dangling port calls until nothing changes
        loop {
            let mut in_degree = vec![0usize; n];
            let mut out_degree = vec![0usize; n];
            for (i, (u, v, _)) in self.arcs.iter().enumerate() {
                if alive_arc[i] {
                    out_degree[*u] += 1;
                    in_degree[*v] += 1;
                }
            }
            let mut clean = true;
            for v in 0..n {
                if alive_node[v]
                    && self.nodes[v].is_regular_port()
                    && (in_degree[v] == 0 || out_degree[v] == 0 || in_degree[v] + out_degree[v] <= 1)
                {
                    alive_node[v] = false;
                    clean = false;
                }
            }
            if clean {
                break;
            }
            for (i, (u, v, _)) in self.arcs.iter().enumerate() {
                alive_arc[i] = alive_arc[i] && alive_node[*u] && alive_node[*v];
            }
        }

        // parallel arcs: keep the cheapest one
        let mut best_arcs: HashMap<(usize, usize), usize> = HashMap::new();
        for (i, (u, v, leg)) in self.arcs.iter().enumerate() {
            if !alive_arc[i] {
                continue;
            }
            match best_arcs.get(&(*u, *v)).copied() {
                None => {
                    best_arcs.insert((*u, *v), i);
                }
                Some(best) => {
                    if self.arcs[best].2.cost() > leg.cost() {
                        alive_arc[best] = false;
                        best_arcs.insert((*u, *v), i);
                    } else {
                        alive_arc[i] = false;
                    }
                }
            }
        }

        let mut builder = LinkedListGraph::<u32>::new_builder();
        let mut rs_nodes = Vec::with_capacity(n);
        let mut staged_to_rs = vec![None; n];
        for v in (0..n).filter(|v| alive_node[*v]) {
            let rs_node = builder.add_node();
            staged_to_rs[v] = Some(rs_nodes.len());
            rs_nodes.push((rs_node, self.nodes[v]));
        }
        let mut rs_edges = Vec::new();
        for (i, (u, v, leg)) in self.arcs.iter().enumerate() {
            if let (true, Some(u_rs), Some(v_rs)) = (alive_arc[i], staged_to_rs[*u], staged_to_rs[*v]) {
                let edge = builder.add_edge(rs_nodes[u_rs].0, rs_nodes[v_rs].0);
                rs_edges.push((edge, *leg));
            }
        }
        let graph = builder.into_graph();

        let mut nodes: Vec<Option<Node>> = vec![None; graph.num_nodes()];
        for (rs_node, node) in rs_nodes.iter() {
            nodes[graph.node_id(*rs_node)] = Some(*node);
        }
        let mut legs: Vec<Option<Leg>> = vec![None; graph.num_edges()];
        for (edge, leg) in rs_edges.iter() {
            legs[graph.edge_id(*edge)] = Some(*leg);
        }

        // source and sink are never removed
        let source_idx = staged_to_rs[source]
            .map(|i| NodeIdx(graph.node_id(rs_nodes[i].0) as Idx))
            .ok_or(ModelError::MissingTerminal(self.vessel_class, "source"))?;
        let sink_idx = staged_to_rs[sink]
            .map(|i| NodeIdx(graph.node_id(rs_nodes[i].0) as Idx))
            .ok_or(ModelError::MissingTerminal(self.vessel_class, "sink"))?;

        Ok(VesselGraph::new(
            self.vessel_class,
            graph,
            nodes.into_iter().flatten().collect(),
            legs.into_iter().flatten().collect(),
            source_idx,
            sink_idx,
            self.ports,
        ))
    }
}

// private methods
impl GraphBuilder {
    fn port_name(&self, port: PortIdx) -> String {
        self.ports
            .get(port)
            .map(|p| p.name().clone())
            .unwrap_or_else(|| format!("p{}", port))
    }

    fn find_or_dump(&self, key: VertexKey) -> Result<usize, ModelError> {
        match self.lookup.get(&key) {
            Some(v) => Ok(*v),
            None => {
                let dump = match self.dump_staged() {
                    Ok(path) => path.display().to_string(),
                    Err(error) => format!("<dump failed: {}>", error),
                };
                tracing::error!(
                    "missing vertex {}-{}@{} for vessel class {}, staged graph dumped to {}",
                    self.port_name(key.0),
                    key.1,
                    key.2,
                    self.vessel_class,
                    dump
                );
                Err(ModelError::MissingVertex {
                    vessel_class: self.vessel_class,
                    port: self.port_name(key.0),
                    port_type: key.1,
                    time: key.2,
                    dump,
                })
            }
        }
    }

    fn dump_staged(&self) -> io::Result<PathBuf> {
        let path = std::env::temp_dir().join(format!("graph_{}.txt", self.vessel_class));
        let mut file = File::create(&path)?;
        writeln!(file, "{} #{}", self.nodes.len(), self.vessel_class)?;
        for (i, node) in self.nodes.iter().enumerate() {
            writeln!(file, "{}\t{}", i, node)?;
        }
        for (i, (u, v, leg)) in self.arcs.iter().enumerate() {
            writeln!(file, "{}\t{}\t{}\t{}", i, u, v, leg.cost())?;
        }
        Ok(path)
    }
}

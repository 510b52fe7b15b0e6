pub mod builder;
pub mod graph;
pub mod legs;
pub mod nodes;

use graph::VesselGraph;

use crate::base_types::{TimeStep, VesselClassIdx};
use crate::ports::Ports;
use crate::vessel_classes::VesselClasses;

use std::sync::Arc;

/// All reference data of an instance together with one finalized graph per
/// vessel class. Loaded once and shared read-only.
pub struct Network {
    num_times: TimeStep,
    ports: Arc<Ports>,
    vessel_classes: Arc<VesselClasses>,
    graphs: Vec<Arc<VesselGraph>>, // indexed by vessel class
}

impl Network {
    /// `graphs` must contain exactly one graph per vessel class, in vessel class order.
    pub fn new(
        num_times: TimeStep,
        ports: Arc<Ports>,
        vessel_classes: Arc<VesselClasses>,
        mut graphs: Vec<VesselGraph>,
    ) -> Network {
        graphs.sort_by_key(|g| g.vessel_class());
        Network {
            num_times,
            ports,
            vessel_classes,
            graphs: graphs.into_iter().map(Arc::new).collect(),
        }
    }
}

// methods
impl Network {
    pub fn num_times(&self) -> TimeStep {
        self.num_times
    }

    pub fn ports(&self) -> Arc<Ports> {
        self.ports.clone()
    }

    pub fn vessel_classes(&self) -> Arc<VesselClasses> {
        self.vessel_classes.clone()
    }

    pub fn graph(&self, vessel_class: VesselClassIdx) -> Arc<VesselGraph> {
        self.graphs[vessel_class.idx()].clone()
    }

    pub fn graphs(&self) -> impl Iterator<Item = &Arc<VesselGraph>> + '_ {
        self.graphs.iter()
    }
}

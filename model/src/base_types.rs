use derive_more::Display;
use derive_more::From;
use serde::{Deserialize, Serialize};

pub type Idx = u32;

pub type Cost = f64;
pub type Quantity = u32;
pub type TimeStep = u32;
pub type Speed = f64;
pub type Distance = f64;
pub type VesselCount = u32;

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortIdx(pub Idx);

#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VesselClassIdx(pub Idx);

/// Vertex of one vessel class's graph. Contiguous and 0-based per graph.
#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(pub Idx);

/// Arc of one vessel class's graph. Contiguous and 0-based per graph.
#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcIdx(pub Idx);

impl PortIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

impl VesselClassIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

impl NodeIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

impl ArcIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

/// The hub is always the first port of an instance.
pub const HUB: PortIdx = PortIdx(0);

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortType {
    #[display(fmt = "pu")]
    Pickup,
    #[display(fmt = "de")]
    Delivery,
    #[display(fmt = "both")]
    Both,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    #[display(fmt = "src")]
    Source,
    #[display(fmt = "snk")]
    Sink,
    #[display(fmt = "hub")]
    ComebackHub,
    #[display(fmt = "reg")]
    RegularPort,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArcType {
    SourceToPort,
    PortToSink,
    ComebackHubToPort,
    PortToComebackHub,
    PortToPort,
    DeliveryToPickup,
}

/// A port together with the role (pickup or delivery) it is visited in.
/// This is what a master problem row refers to.
pub type PortWithType = (PortIdx, PortType);

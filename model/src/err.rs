use derive_more::Display;

use crate::base_types::{PortType, TimeStep, VesselClassIdx};

#[derive(Debug, Display)]
pub enum ModelError {
    #[display(fmt = "io error: {}", _0)]
    Io(std::io::Error),
    #[display(fmt = "json error: {}", _0)]
    Json(serde_json::Error),
    #[display(fmt = "unknown port '{}'", _0)]
    UnknownPort(String),
    #[display(fmt = "unknown vessel class '{}'", _0)]
    UnknownVesselClass(String),
    #[display(fmt = "the first port must be the only hub, found: {}", _0)]
    InvalidHub(String),
    #[display(fmt = "vertex {}-{}@{} exists twice in graph of vessel class {}", port, port_type, time, vessel_class)]
    DuplicateVertex {
        vessel_class: VesselClassIdx,
        port: String,
        port_type: PortType,
        time: TimeStep,
    },
    #[display(fmt = "can't find vertex {}-{}@{} in graph of vessel class {} (graph dumped to {})", port, port_type, time, vessel_class, dump)]
    MissingVertex {
        vessel_class: VesselClassIdx,
        port: String,
        port_type: PortType,
        time: TimeStep,
        dump: String,
    },
    #[display(fmt = "graph of vessel class {} has no {}", _0, _1)]
    MissingTerminal(VesselClassIdx, &'static str),
    #[display(fmt = "no graph given for vessel class {}", _0)]
    MissingGraph(String),
    #[display(fmt = "closing time windows of port '{}' do not settle arrival {}", _0, _1)]
    UnsettledTimeWindows(String, TimeStep),
}

impl std::error::Error for ModelError {}

impl From<std::io::Error> for ModelError {
    fn from(error: std::io::Error) -> Self {
        ModelError::Io(error)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(error: serde_json::Error) -> Self {
        ModelError::Json(error)
    }
}

pub mod base_types;
pub mod config;
pub mod err;
pub mod ports;
pub mod vessel_classes;

pub mod network;

pub mod json_serialisation;

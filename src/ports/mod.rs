//! Port traits: abstract interfaces to the outside world.

pub mod config_port;
pub mod data_port;

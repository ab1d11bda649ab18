// Domain layer: record model and the remote table port.

pub mod model;
pub mod ports;

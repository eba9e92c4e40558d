// Domain layer: request model and the fetch port. No I/O here.

pub mod model;
pub mod ports;

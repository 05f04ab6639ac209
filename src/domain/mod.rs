// Domain layer: the record model and the ports (capabilities) the core consumes.

pub mod model;
pub mod ports;

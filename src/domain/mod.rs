// Domain layer: markup model, trigger descriptors and ports (interfaces).

pub mod model;
pub mod ports;

// Domain layer: core models, the static style table and ports (interfaces).

pub mod model;
pub mod ports;
pub mod style;

// Domain layer: value types and ports. Pure data plus the traits adapters implement.

pub mod model;
pub mod ports;

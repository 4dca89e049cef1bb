// Domain layer: typed records of the booking API and the ports the core depends on.

pub mod model;
pub mod ports;

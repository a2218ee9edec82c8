// Domain layer - Estimation pipeline and its data model
pub mod emission;
pub mod indicator;
pub mod mapping;
pub mod power;
pub mod snapshot;
pub mod weather;
pub mod windparks;

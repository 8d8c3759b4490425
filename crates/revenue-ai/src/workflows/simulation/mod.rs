//! Seeded synthetic occupancy: a deterministic sequence generator and a
//! 7-state unit lifecycle simulator used to exercise the pricing engine
//! without live property data.

mod domain;
mod sequence;
mod simulator;

pub use domain::{
    FloorplanProfile, OccupancyCensus, SimulatedUnit, SimulationConfig, SimulationError,
    TickSummary,
};
pub use sequence::DeterministicSequence;
pub use simulator::OccupancySimulator;

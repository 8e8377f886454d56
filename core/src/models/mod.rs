//! Domain models for the passenger flow simulator

pub mod flight;
pub mod passenger;
pub mod resources;
pub mod state;

// Re-exports
pub use flight::{Flight, MarkerShape};
pub use passenger::{Passenger, PassengerId, PurchaseChannel};
pub use resources::{CheckpointConfig, CounterConfig, HoldRoomConfig};
pub use state::{EngineState, FlightTally, LiveCounts};

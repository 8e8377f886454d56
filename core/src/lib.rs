//! Passenger Flow Simulator Core
//!
//! Models passenger flow through an airport departure process (arrival →
//! ticket counter → security checkpoint → hold room → departure) at
//! one-minute granularity, for capacity-planning analysis.
//!
//! # Architecture
//!
//! - **core**: timeline and clock math
//! - **models**: domain types (Flight, Passenger, resource configs, state)
//! - **arrivals**: arrival-curve configuration and generators
//! - **engine**: the interval step, hold-room assignment, snapshots, history
//! - **rng**: deterministic seeded random number generation
//!
//! # Critical Invariants
//!
//! 1. Arrival curves sum exactly to `round(seats × fill)` per flight
//! 2. All randomness is seeded and runs once, before stepping
//! 3. Collaborators only ever receive owned copies of mutable state

// Module declarations
pub mod arrivals;
pub mod core;
pub mod engine;
pub mod models;
pub mod rng;

// Re-exports for convenience
pub use arrivals::{
    ArrivalCurveConfig, ArrivalCurveGenerator, EditedSplitGaussianCurve, LegacyGaussianCurve,
};
pub use engine::{
    EngineConfig, EngineError, EngineSnapshot, FlightSummary, IntervalHistory, SimulationEngine,
    SnapshotStore,
};
pub use models::{
    CheckpointConfig, CounterConfig, EngineState, Flight, FlightTally, HoldRoomConfig, LiveCounts,
    MarkerShape, Passenger, PassengerId, PurchaseChannel,
};
pub use rng::RngManager;

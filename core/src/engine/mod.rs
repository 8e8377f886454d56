//! Engine — the interval simulation step plus its supporting pieces:
//! hold-room assignment, snapshot store and per-interval history.
//!
//! See `simulation.rs` for the state machine itself.

mod assignment;
pub mod history;
pub mod simulation;
pub mod snapshot;

// Re-export main types for convenience
pub use history::IntervalHistory;
pub use simulation::{EngineConfig, EngineError, FlightSummary, SimulationEngine};
pub use snapshot::{compute_config_hash, EngineSnapshot, SnapshotStore};

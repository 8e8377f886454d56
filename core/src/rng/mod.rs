//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm. The only consumer is the pre-simulation
//! hold-room tie-break: randomness never runs during interval stepping, so
//! the generator state is deliberately excluded from engine snapshots.

mod xorshift;

pub use xorshift::RngManager;

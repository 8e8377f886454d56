//! Snapshot store — O(1) rewind over computed history
//!
//! After every simulated interval the engine captures a full deep copy of
//! its mutable state. Rewinding or revisiting any computed interval is then
//! a restore, never a re-simulation. Snapshot *N* is always derivable by
//! replaying the interval step *N* times from snapshot 0; the store exists
//! purely to avoid that replay cost.
//!
//! # Critical Invariants
//!
//! - Restore hands out a *copy*: later mutation of live state never
//!   corrupts a stored snapshot.
//! - The high-water mark is the highest interval ever computed; targets at
//!   or below it restore, anything beyond requires actual stepping.
//! - Capturing an already-stored interval overwrites it (deterministic
//!   re-simulation after a restore).

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::engine::simulation::EngineError;
use crate::models::EngineState;

/// Immutable point-in-time copy of the complete engine state.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    interval: usize,
    state: EngineState,
}

impl EngineSnapshot {
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Read-only view of the captured state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }
}

/// Per-interval snapshot storage plus the high-water mark.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: Vec<EngineSnapshot>,
    high_water: usize,
}

impl SnapshotStore {
    /// Drop all snapshots (run restart).
    pub(crate) fn reset(&mut self) {
        self.snapshots.clear();
        self.high_water = 0;
    }

    /// Store a deep copy of `state` for `interval`, overwriting any
    /// existing snapshot at that interval.
    ///
    /// # Panics
    /// Panics if `interval` would leave a gap in the store, which would mean
    /// a corrupted stepping invariant.
    pub(crate) fn capture(&mut self, interval: usize, state: &EngineState) {
        assert!(
            interval <= self.snapshots.len(),
            "snapshot capture out of sequence: interval {} with only {} stored",
            interval,
            self.snapshots.len()
        );
        let snapshot = EngineSnapshot {
            interval,
            state: state.clone(),
        };
        if interval < self.snapshots.len() {
            self.snapshots[interval] = snapshot;
        } else {
            self.snapshots.push(snapshot);
        }
        self.high_water = self.high_water.max(interval);
    }

    /// Read-only access to a stored snapshot, without touching live state.
    pub fn get(&self, interval: usize) -> Option<&EngineSnapshot> {
        self.snapshots.get(interval)
    }

    /// Highest interval number ever computed.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute a deterministic SHA-256 hash of a configuration value.
///
/// Uses canonical JSON with recursively sorted keys so the hash does not
/// depend on map iteration order. The engine hashes its structural
/// configuration (flights, resources, delays) at construction; the
/// arrival-curve settings are excluded on purpose, since swapping curves
/// before a run must keep existing snapshots restorable.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, EngineError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config)
        .map_err(|e| EngineError::Serialization(format!("config serialization failed: {}", e)))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| EngineError::Serialization(format!("config serialization failed: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

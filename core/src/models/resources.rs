//! Resource configuration: ticket counters, checkpoints, hold rooms.
//!
//! Rates keep their industry input units (counters: passengers/minute,
//! checkpoints: passengers/hour); the engine normalizes both to service
//! units per simulated interval. Eligibility is a set of flight numbers so
//! configs stay stable across copies and snapshots — an empty set means the
//! resource accepts all flights.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Configuration for a single ticket counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    pub id: u32,

    /// Passengers served per minute.
    pub rate_per_minute: f64,

    /// Flight numbers this counter accepts; empty = all flights.
    pub allowed_flights: BTreeSet<String>,
}

impl CounterConfig {
    /// Default: rate 1.0 passenger/minute, accepts all flights.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            rate_per_minute: 1.0,
            allowed_flights: BTreeSet::new(),
        }
    }

    pub fn with_rate(mut self, rate_per_minute: f64) -> Self {
        self.rate_per_minute = rate_per_minute;
        self
    }

    pub fn accepts(&self, flight_number: &str) -> bool {
        self.allowed_flights.is_empty() || self.allowed_flights.contains(flight_number)
    }
}

/// Configuration for a single security checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub id: u32,

    /// Passengers screened per hour (industry standard input).
    pub rate_per_hour: f64,

    /// Flight numbers this checkpoint accepts; empty = all flights.
    pub allowed_flights: BTreeSet<String>,
}

impl CheckpointConfig {
    /// Default: 120 passengers/hour (2/min), accepts all flights.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            rate_per_hour: 120.0,
            allowed_flights: BTreeSet::new(),
        }
    }

    pub fn with_rate_per_hour(mut self, rate_per_hour: f64) -> Self {
        self.rate_per_hour = rate_per_hour;
        self
    }

    pub fn accepts(&self, flight_number: &str) -> bool {
        self.allowed_flights.is_empty() || self.allowed_flights.contains(flight_number)
    }
}

/// Configuration for a single hold room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldRoomConfig {
    pub id: u32,

    /// Total walk time from checkpoint to this room, in seconds
    /// (sub-minute precision; the engine rounds up to whole minutes).
    pub walk_seconds: u32,

    /// Flight numbers this room accepts; empty = all flights.
    pub allowed_flights: BTreeSet<String>,
}

impl HoldRoomConfig {
    /// Default: zero walk time, accepts all flights.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            walk_seconds: 0,
            allowed_flights: BTreeSet::new(),
        }
    }

    pub fn with_walk_time(mut self, minutes: u32, seconds: u32) -> Self {
        self.walk_seconds = minutes * 60 + seconds.min(59);
        self
    }

    pub fn with_allowed_flight(mut self, flight_number: impl Into<String>) -> Self {
        self.allowed_flights.insert(flight_number.into());
        self
    }

    /// True when the room has no flight restriction at all.
    pub fn accepts_all(&self) -> bool {
        self.allowed_flights.is_empty()
    }

    pub fn accepts(&self, flight_number: &str) -> bool {
        self.allowed_flights.is_empty() || self.allowed_flights.contains(flight_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_eligibility_accepts_all() {
        let counter = CounterConfig::new(1);
        assert!(counter.accepts("AA1"));
        assert!(counter.accepts("ZZ999"));
    }

    #[test]
    fn test_restricted_eligibility() {
        let mut checkpoint = CheckpointConfig::new(1);
        checkpoint.allowed_flights.insert("AA1".to_string());
        assert!(checkpoint.accepts("AA1"));
        assert!(!checkpoint.accepts("BB2"));
    }

    #[test]
    fn test_walk_time_builder_clamps_seconds() {
        let room = HoldRoomConfig::new(1).with_walk_time(2, 75);
        // Seconds part is clamped into 0..=59.
        assert_eq!(room.walk_seconds, 2 * 60 + 59);

        let room = HoldRoomConfig::new(2).with_walk_time(0, 30);
        assert_eq!(room.walk_seconds, 30);
    }

    #[test]
    fn test_hold_room_accepts_all_flag() {
        let open = HoldRoomConfig::new(1);
        assert!(open.accepts_all());

        let restricted = HoldRoomConfig::new(2).with_allowed_flight("AA1");
        assert!(!restricted.accepts_all());
        assert!(restricted.accepts("AA1"));
        assert!(!restricted.accepts("BB2"));
    }
}

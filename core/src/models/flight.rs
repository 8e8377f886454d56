//! Flight model
//!
//! A flight is identified by its flight number everywhere in the engine:
//! hold-room assignment, eligibility filters, tallies and histories all key
//! on the number, never on instance identity.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Display marker for a flight (cosmetic only, carried for renderers;
/// has no effect on simulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Circle,
    Triangle,
    Square,
    Diamond,
    Star,
    Hexagon,
}

/// A scheduled departure. Immutable once the simulation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Flight number, the identity key used throughout the engine.
    number: String,

    /// Scheduled departure time (wall clock).
    departure: NaiveTime,

    /// Seat count.
    seats: u32,

    /// Expected fill fraction. Values above 1.0 are allowed (overbooking);
    /// negative values are treated as 0 when realizing passengers.
    fill_fraction: f64,

    /// Cosmetic display marker.
    marker: MarkerShape,
}

impl Flight {
    pub fn new(
        number: impl Into<String>,
        departure: NaiveTime,
        seats: u32,
        fill_fraction: f64,
        marker: MarkerShape,
    ) -> Self {
        Self {
            number: number.into(),
            departure,
            seats,
            fill_fraction,
            marker,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn departure(&self) -> NaiveTime {
        self.departure
    }

    pub fn seats(&self) -> u32 {
        self.seats
    }

    pub fn fill_fraction(&self) -> f64 {
        self.fill_fraction
    }

    pub fn marker(&self) -> MarkerShape {
        self.marker
    }

    /// Total passengers this flight generates: `round(seats × fill)`.
    ///
    /// This is the exact count the arrival curve must sum to.
    pub fn expected_passengers(&self) -> u32 {
        (self.seats as f64 * self.fill_fraction.max(0.0)).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_expected_passengers_rounds() {
        let f = Flight::new("AA1", t(9, 0), 150, 0.85, MarkerShape::Circle);
        assert_eq!(f.expected_passengers(), 128); // 127.5 rounds up

        let f = Flight::new("AA2", t(9, 0), 100, 1.0, MarkerShape::Square);
        assert_eq!(f.expected_passengers(), 100);
    }

    #[test]
    fn test_expected_passengers_negative_fill_clamped() {
        let f = Flight::new("AA3", t(9, 0), 100, -0.5, MarkerShape::Star);
        assert_eq!(f.expected_passengers(), 0);
    }

    #[test]
    fn test_expected_passengers_overbooking_allowed() {
        let f = Flight::new("AA4", t(9, 0), 100, 1.1, MarkerShape::Diamond);
        assert_eq!(f.expected_passengers(), 110);
    }
}

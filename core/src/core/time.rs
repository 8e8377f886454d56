//! Simulation timeline
//!
//! The engine runs in discrete one-minute intervals. Interval 0 corresponds
//! to the global start time, derived from the flight schedule as
//! `min(departure) − arrivalSpan`. All per-flight indices (arrival-curve
//! offset, boarding close, departure) are minutes since that global start.

use chrono::{Duration, NaiveTime};

use crate::arrivals::DEFAULT_BOARDING_CLOSE;
use crate::models::Flight;

/// Convert a walk time in seconds to whole minutes, rounding up.
///
/// # Example
/// ```
/// use passenger_flow_core_rs::core::time::ceil_minutes;
///
/// assert_eq!(ceil_minutes(0), 0);
/// assert_eq!(ceil_minutes(30), 1);
/// assert_eq!(ceil_minutes(60), 1);
/// assert_eq!(ceil_minutes(61), 2);
/// ```
pub fn ceil_minutes(seconds: u32) -> i64 {
    let s = seconds as i64;
    s / 60 + i64::from(s % 60 > 0)
}

/// Signed whole minutes from `from` to `to` (negative if `to` is earlier).
pub fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    to.signed_duration_since(from).num_minutes()
}

/// Fixed mapping between the flight schedule and interval indices.
///
/// Derived once from the flight list at engine construction; immutable for
/// the whole run.
#[derive(Debug, Clone)]
pub struct Timeline {
    global_start: NaiveTime,
    arrival_span_minutes: i64,
    total_intervals: usize,
}

impl Timeline {
    /// Derive the timeline from the flight list.
    ///
    /// Global start is `min(departure) − arrivalSpan`; the run extends one
    /// interval past the latest departure. An empty flight list yields a
    /// single-interval timeline anchored at midnight.
    pub fn from_flights(flights: &[Flight], arrival_span_minutes: i64) -> Self {
        let first_departure = flights
            .iter()
            .map(Flight::departure)
            .min()
            .unwrap_or(NaiveTime::MIN);
        let global_start = first_departure - Duration::minutes(arrival_span_minutes);

        let max_departure = flights
            .iter()
            .map(|f| minutes_between(global_start, f.departure()))
            .max()
            .unwrap_or(0);

        Self {
            global_start,
            arrival_span_minutes,
            total_intervals: (max_departure + 1).max(1) as usize,
        }
    }

    pub fn global_start(&self) -> NaiveTime {
        self.global_start
    }

    pub fn arrival_span_minutes(&self) -> i64 {
        self.arrival_span_minutes
    }

    /// Number of intervals in a full run (one past the latest departure).
    pub fn total_intervals(&self) -> usize {
        self.total_intervals
    }

    /// Minutes from global start to the given wall-clock time.
    pub fn minutes_from_start(&self, t: NaiveTime) -> i64 {
        minutes_between(self.global_start, t)
    }

    /// Interval at which the flight departs.
    pub fn departure_interval(&self, flight: &Flight) -> i64 {
        self.minutes_from_start(flight.departure())
    }

    /// Interval at which the flight closes boarding (fixed 20 minutes before
    /// departure; the arrival-curve configuration cannot change this).
    pub fn boarding_close_interval(&self, flight: &Flight) -> i64 {
        self.departure_interval(flight) - DEFAULT_BOARDING_CLOSE
    }

    /// Interval at which the flight's arrival-curve bucket 0 falls, i.e. the
    /// start of its arrival window.
    pub fn curve_offset(&self, flight: &Flight) -> i64 {
        self.departure_interval(flight) - self.arrival_span_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarkerShape;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn flight(number: &str, dep: NaiveTime) -> Flight {
        Flight::new(number, dep, 100, 1.0, MarkerShape::Circle)
    }

    #[test]
    fn test_timeline_single_flight() {
        let flights = vec![flight("AA100", t(10, 0))];
        let tl = Timeline::from_flights(&flights, 120);

        assert_eq!(tl.global_start(), t(8, 0));
        assert_eq!(tl.departure_interval(&flights[0]), 120);
        assert_eq!(tl.boarding_close_interval(&flights[0]), 100);
        assert_eq!(tl.curve_offset(&flights[0]), 0);
        assert_eq!(tl.total_intervals(), 121);
    }

    #[test]
    fn test_timeline_two_flights() {
        let flights = vec![flight("AA100", t(10, 0)), flight("BB200", t(11, 30))];
        let tl = Timeline::from_flights(&flights, 120);

        // Anchored on the earliest departure.
        assert_eq!(tl.global_start(), t(8, 0));
        assert_eq!(tl.departure_interval(&flights[1]), 210);
        assert_eq!(tl.curve_offset(&flights[1]), 90);
        assert_eq!(tl.total_intervals(), 211);
    }

    #[test]
    fn test_timeline_no_flights() {
        let tl = Timeline::from_flights(&[], 120);
        assert_eq!(tl.total_intervals(), 1);
    }

    #[test]
    fn test_minutes_between_signed() {
        assert_eq!(minutes_between(t(8, 0), t(9, 30)), 90);
        assert_eq!(minutes_between(t(9, 30), t(8, 0)), -90);
    }

    #[test]
    fn test_ceil_minutes() {
        assert_eq!(ceil_minutes(0), 0);
        assert_eq!(ceil_minutes(1), 1);
        assert_eq!(ceil_minutes(59), 1);
        assert_eq!(ceil_minutes(60), 1);
        assert_eq!(ceil_minutes(90), 2);
        assert_eq!(ceil_minutes(120), 2);
    }
}

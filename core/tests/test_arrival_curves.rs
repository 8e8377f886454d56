//! Engine-level arrival curve tests
//!
//! Exactness of the per-minute arrival arrays as seen through the engine:
//! totals always equal `round(seats × fill)` and arrivals stay inside the
//! flight's window.

use chrono::NaiveTime;
use passenger_flow_core_rs::{
    ArrivalCurveConfig, CheckpointConfig, CounterConfig, EngineConfig, Flight, HoldRoomConfig,
    MarkerShape, SimulationEngine,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn single_flight_config(seats: u32, fill: f64) -> EngineConfig {
    EngineConfig {
        percent_in_person: 0.5,
        counters: vec![CounterConfig::new(1)],
        checkpoints: vec![CheckpointConfig::new(1)],
        hold_rooms: Some(vec![HoldRoomConfig::new(1)]),
        arrival_span_minutes: 120,
        flights: vec![Flight::new("AA1", t(10, 0), seats, fill, MarkerShape::Circle)],
        rng_seed: 42,
        ..EngineConfig::default()
    }
}

#[test]
fn test_legacy_120_minute_span_scenario() {
    // One flight, 100 seats, 100% fill, legacy curve, span 120: per-minute
    // arrivals sum to 100, all within minutes 0..=99 of the 100-minute
    // window (120 − 20).
    let engine = SimulationEngine::new(single_flight_config(100, 1.0)).unwrap();

    let curve = engine.minute_arrivals("AA1").unwrap();
    assert_eq!(curve.len(), 100);
    assert_eq!(curve.iter().sum::<u32>(), 100);

    for minute in 0..100 {
        // The flight's window starts at interval 0 (earliest departure).
        assert_eq!(engine.total_arrivals_at_minute(minute), curve[minute as usize]);
    }
    for minute in 100..121 {
        assert_eq!(engine.total_arrivals_at_minute(minute), 0);
    }
}

#[test]
fn test_arrival_total_matches_rounded_fill() {
    for (seats, fill) in [(100u32, 1.0f64), (150, 0.85), (73, 0.33), (1, 1.0), (200, 0.0)] {
        let engine = SimulationEngine::new(single_flight_config(seats, fill)).unwrap();
        let expected = (seats as f64 * fill).round() as u32;
        let total: u32 = engine.minute_arrivals("AA1").unwrap().iter().sum();
        assert_eq!(total, expected, "seats {} fill {}", seats, fill);
    }
}

#[test]
fn test_edited_curve_swap_keeps_total_exact() {
    let mut engine = SimulationEngine::new(single_flight_config(137, 0.9)).unwrap();
    let expected = (137.0f64 * 0.9).round() as u32;

    let mut cfg = engine.arrival_curve_config();
    cfg.mark_edited();
    cfg.peak_minutes_before_departure = 55;
    cfg.left_sigma_minutes = 25;
    cfg.right_sigma_minutes = 9;
    engine.set_arrival_curve_config(cfg);

    let total: u32 = engine.minute_arrivals("AA1").unwrap().iter().sum();
    assert_eq!(total, expected);
    assert!(!engine.arrival_curve_config().legacy_mode);
}

#[test]
fn test_cumulative_realized_arrivals_match_curve() {
    let mut engine = SimulationEngine::new(single_flight_config(100, 1.0)).unwrap();
    engine.run_to_completion();

    assert_eq!(engine.flight_tally("AA1").arrivals, 100);

    // Interval-indexed arrivals: interval k reports the bucket realized
    // while computing minute k − 1.
    assert_eq!(engine.total_arrivals_at_interval(0), 0);
    let total: u32 = (0..=engine.max_computed_interval())
        .map(|k| engine.total_arrivals_at_interval(k))
        .sum();
    assert_eq!(total, 100);
}

#[test]
fn test_two_flights_offset_windows() {
    let config = EngineConfig {
        counters: vec![CounterConfig::new(1)],
        checkpoints: vec![CheckpointConfig::new(1)],
        hold_rooms: None,
        arrival_span_minutes: 120,
        flights: vec![
            Flight::new("AA1", t(10, 0), 80, 1.0, MarkerShape::Circle),
            Flight::new("BB2", t(11, 0), 60, 1.0, MarkerShape::Square),
        ],
        rng_seed: 42,
        ..EngineConfig::default()
    };
    let engine = SimulationEngine::new(config).unwrap();

    // BB2's window is shifted 60 minutes later than AA1's.
    let aa = engine.minute_arrivals("AA1").unwrap().to_vec();
    let bb = engine.minute_arrivals("BB2").unwrap().to_vec();
    assert_eq!(aa.iter().sum::<u32>(), 80);
    assert_eq!(bb.iter().sum::<u32>(), 60);

    for minute in 0..60 {
        let expected = aa.get(minute as usize).copied().unwrap_or(0);
        assert_eq!(engine.total_arrivals_at_minute(minute), expected);
    }
    let m = 70i64; // inside both windows
    assert_eq!(
        engine.total_arrivals_at_minute(m),
        aa[m as usize] + bb[(m - 60) as usize]
    );
}

#[test]
fn test_default_curve_is_legacy_with_fixed_close() {
    let engine = SimulationEngine::new(single_flight_config(10, 1.0)).unwrap();
    let cfg = engine.arrival_curve_config();
    assert!(cfg.legacy_mode);
    assert_eq!(cfg.boarding_close_minutes_before_departure, 20);

    // Even a config that tries to move the close gets forced back.
    let mut edited = ArrivalCurveConfig::legacy_default();
    edited.boarding_close_minutes_before_departure = 45;
    let mut engine = SimulationEngine::new(single_flight_config(10, 1.0)).unwrap();
    engine.set_arrival_curve_config(edited);
    assert_eq!(
        engine.arrival_curve_config().boarding_close_minutes_before_departure,
        20
    );
}

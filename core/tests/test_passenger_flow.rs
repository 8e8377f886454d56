//! Single-passenger stage timing
//!
//! One ticket counter at 1/min, one checkpoint at 60/hr, one hold room with
//! a 0:30 walk, transit delay 2 min. A single passenger enqueued at minute 0
//! completes ticketing at minute 1, enters the checkpoint at minute 3,
//! completes the checkpoint at minute 4 and enters the hold room at minute 5
//! (ceil(30 s) = 1 min walk).

use chrono::NaiveTime;
use passenger_flow_core_rs::{
    ArrivalCurveConfig, CheckpointConfig, CounterConfig, EngineConfig, Flight, HoldRoomConfig,
    MarkerShape, PurchaseChannel, SimulationEngine,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Edited curve peaked hard at the very start of the window, so the single
/// passenger's largest-remainder bucket is minute 0.
fn arrive_at_window_start_curve() -> ArrivalCurveConfig {
    let mut cfg = ArrivalCurveConfig::legacy_default();
    cfg.mark_edited();
    cfg.peak_minutes_before_departure = 120;
    cfg.left_sigma_minutes = 1;
    cfg.right_sigma_minutes = 1;
    cfg
}

fn single_passenger_config() -> EngineConfig {
    EngineConfig {
        percent_in_person: 1.0, // through the ticket counter
        counters: vec![CounterConfig::new(1).with_rate(1.0)],
        checkpoints: vec![CheckpointConfig::new(1).with_rate_per_hour(60.0)],
        hold_rooms: Some(vec![HoldRoomConfig::new(1).with_walk_time(0, 30)]),
        arrival_span_minutes: 120,
        transit_delay_minutes: 2,
        flights: vec![Flight::new("AA1", t(10, 0), 1, 1.0, MarkerShape::Circle)],
        arrival_curve: arrive_at_window_start_curve(),
        rng_seed: 42,
        ..EngineConfig::default()
    }
}

#[test]
fn test_stage_timing_end_to_end() {
    let mut engine = SimulationEngine::new(single_passenger_config()).unwrap();

    // Precondition: the single passenger arrives at minute 0.
    let curve = engine.minute_arrivals("AA1").unwrap();
    assert_eq!(curve[0], 1);
    assert_eq!(curve.iter().sum::<u32>(), 1);

    engine.run_to_completion();

    // The passenger is in the hold room as of minute 5's history entry.
    let rooms = engine.history().hold_rooms_at(5).unwrap();
    assert_eq!(rooms[0].len(), 1);
    let p = &rooms[0][0];

    assert_eq!(p.flight(), "AA1");
    assert_eq!(p.channel(), PurchaseChannel::InPerson);
    assert_eq!(p.arrival_minute(), 0);
    assert_eq!(p.ticket_completion_minute(), Some(1));
    assert_eq!(p.checkpoint_entry_minute(), Some(3));
    assert_eq!(p.checkpoint_completion_minute(), Some(4));
    assert_eq!(p.hold_room_entry_minute(), Some(5));
    assert_eq!(p.hold_room_sequence(), Some(1));
    assert_eq!(p.assigned_hold_room(), Some(0));
    assert!(!p.is_missed());

    // Not in the room one minute earlier.
    assert!(engine.history().hold_rooms_at(4).unwrap()[0].is_empty());
}

#[test]
fn test_stage_locations_minute_by_minute() {
    let mut engine = SimulationEngine::new(single_passenger_config()).unwrap();

    let counts_at = |engine: &SimulationEngine| engine.flight_live_counts("AA1");

    engine.step(); // processed minute 0: waiting at the counter
    assert_eq!(counts_at(&engine).ticket_queued, 1);

    engine.step(); // minute 1: ticketing done, in transit
    let counts = counts_at(&engine);
    assert_eq!(counts.ticket_queued, 0);
    assert_eq!(counts.in_transit_to_checkpoint, 1);

    engine.step(); // minute 2: still in transit (delay 2)
    assert_eq!(counts_at(&engine).in_transit_to_checkpoint, 1);

    engine.step(); // minute 3: joined the checkpoint queue
    assert_eq!(counts_at(&engine).checkpoint_queued, 1);

    engine.step(); // minute 4: screened, walking to the hold room
    let counts = counts_at(&engine);
    assert_eq!(counts.checkpoint_queued, 0);
    assert_eq!(counts.in_transit_to_hold, 1);

    engine.step(); // minute 5: in the hold room
    assert_eq!(counts_at(&engine).hold_room, 1);
    assert_eq!(engine.hold_room_total_at(engine.current_interval()), 1);
}

#[test]
fn test_visible_completed_ticket_line_window() {
    let mut engine = SimulationEngine::new(single_passenger_config()).unwrap();

    // After minute 1 the passenger has completed ticketing but not yet moved
    // on: visible at the counter.
    engine.step();
    engine.step();
    assert_eq!(engine.visible_completed_ticket_line(0).len(), 1);

    // After minute 3 they joined a checkpoint queue: no longer visible.
    engine.step();
    engine.step();
    assert!(engine.visible_completed_ticket_line(0).is_empty());
}

#[test]
fn test_departure_clears_the_hold_room() {
    let mut engine = SimulationEngine::new(single_passenger_config()).unwrap();
    engine.run_to_completion();

    // Interval k's totals describe the state after minute k − 1, so the
    // room shows occupied through interval 120 and empty at interval 121,
    // once the departure at minute 120 has cleared it.
    assert_eq!(engine.hold_room_total_at(120), 1);
    assert_eq!(engine.hold_room_total_at(121), 0);

    let summary = &engine.flight_summaries()[0];
    assert_eq!(summary.flight_number, "AA1");
    assert_eq!(summary.expected_passengers, 1);
    assert_eq!(summary.arrivals, 1);
    assert_eq!(summary.boarded, 1);
    assert_eq!(summary.missed, 0);
}

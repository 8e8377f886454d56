//! Conservation properties across randomized configurations
//!
//! For every flight, at every interval boundary:
//! `ticketQueued + inTransitToCheckpoint + checkpointQueued +
//!  inTransitToHold + holdRoomOccupants + missed + departed == arrivals`
//! and at run end everyone has either boarded or missed.

use chrono::NaiveTime;
use passenger_flow_core_rs::{
    CheckpointConfig, CounterConfig, EngineConfig, Flight, HoldRoomConfig, MarkerShape,
    SimulationEngine,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct FlightSpec {
    departure_offset: i64,
    seats: u32,
    fill: f64,
}

fn flight_spec() -> impl Strategy<Value = FlightSpec> {
    (0i64..120, 0u32..150, 0.0f64..1.2).prop_map(|(departure_offset, seats, fill)| FlightSpec {
        departure_offset,
        seats,
        fill,
    })
}

#[derive(Debug, Clone)]
struct ScenarioSpec {
    flights: Vec<FlightSpec>,
    percent_in_person: f64,
    counter_rates: Vec<f64>,
    checkpoint_rates: Vec<f64>,
    walk_seconds: Vec<u32>,
    transit_delay: i64,
    span: i64,
    seed: u64,
}

fn scenario_spec() -> impl Strategy<Value = ScenarioSpec> {
    (
        prop::collection::vec(flight_spec(), 1..=3),
        0.0f64..=1.0,
        prop::collection::vec(0.0f64..2.0, 0..=2),
        prop::collection::vec(0.0f64..150.0, 1..=2),
        prop::collection::vec(0u32..=180, 1..=2),
        0i64..=4,
        40i64..=140,
        any::<u64>(),
    )
        .prop_map(
            |(
                flights,
                percent_in_person,
                counter_rates,
                checkpoint_rates,
                walk_seconds,
                transit_delay,
                span,
                seed,
            )| ScenarioSpec {
                flights,
                percent_in_person,
                counter_rates,
                checkpoint_rates,
                walk_seconds,
                transit_delay,
                span,
                seed,
            },
        )
}

fn build_config(spec: &ScenarioSpec) -> EngineConfig {
    let markers = [
        MarkerShape::Circle,
        MarkerShape::Triangle,
        MarkerShape::Square,
    ];
    let base = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let flights: Vec<Flight> = spec
        .flights
        .iter()
        .enumerate()
        .map(|(i, f)| {
            Flight::new(
                format!("FL{:03}", i + 1),
                base + chrono::Duration::minutes(f.departure_offset),
                f.seats,
                f.fill,
                markers[i % markers.len()],
            )
        })
        .collect();

    EngineConfig {
        percent_in_person: spec.percent_in_person,
        counters: spec
            .counter_rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| CounterConfig::new(i as u32 + 1).with_rate(rate))
            .collect(),
        checkpoints: spec
            .checkpoint_rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| CheckpointConfig::new(i as u32 + 1).with_rate_per_hour(rate))
            .collect(),
        hold_rooms: Some(
            spec.walk_seconds
                .iter()
                .enumerate()
                .map(|(i, &walk)| {
                    let mut room = HoldRoomConfig::new(i as u32 + 1);
                    room.walk_seconds = walk;
                    room
                })
                .collect(),
        ),
        arrival_span_minutes: spec.span,
        transit_delay_minutes: spec.transit_delay,
        flights,
        rng_seed: spec.seed,
        ..EngineConfig::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_per_flight_conservation_at_every_interval(spec in scenario_spec()) {
        let mut engine = SimulationEngine::new(build_config(&spec)).unwrap();
        let numbers: Vec<String> =
            engine.flights().iter().map(|f| f.number().to_string()).collect();

        while engine.current_interval() < engine.total_intervals() {
            engine.step();
            for number in &numbers {
                let live = engine.flight_live_counts(number);
                let tally = engine.flight_tally(number);
                prop_assert_eq!(
                    live.total() + tally.missed + tally.departed,
                    tally.arrivals,
                    "conservation broken for {} at interval {}",
                    number,
                    engine.current_interval()
                );
            }
        }
    }

    #[test]
    fn prop_arrivals_match_expected_and_all_resolve(spec in scenario_spec()) {
        let mut engine = SimulationEngine::new(build_config(&spec)).unwrap();
        engine.run_to_completion();

        for summary in engine.flight_summaries() {
            prop_assert_eq!(summary.arrivals, summary.expected_passengers);
            prop_assert_eq!(summary.boarded + summary.missed, summary.arrivals);
            let live = engine.flight_live_counts(&summary.flight_number);
            prop_assert_eq!(live.total(), 0);
        }
    }

    #[test]
    fn prop_hold_room_occupants_never_missed(spec in scenario_spec()) {
        let mut engine = SimulationEngine::new(build_config(&spec)).unwrap();
        while engine.current_interval() < engine.total_intervals() {
            engine.step();
            for room in engine.hold_room_lines() {
                for p in &room {
                    prop_assert!(!p.is_missed());
                }
            }
        }
    }

    #[test]
    fn prop_aggregate_series_match_state_totals(spec in scenario_spec()) {
        let mut engine = SimulationEngine::new(build_config(&spec)).unwrap();
        while engine.current_interval() < engine.total_intervals() {
            engine.step();
            let k = engine.current_interval();
            prop_assert_eq!(engine.ticket_queued_at(k), engine.state().ticket_queue_total());
            prop_assert_eq!(
                engine.checkpoint_queued_at(k),
                engine.state().checkpoint_queue_total()
            );
            prop_assert_eq!(engine.hold_room_total_at(k), engine.state().hold_room_total());
            prop_assert_eq!(
                engine.held_up_at(k),
                engine.state().ticket_queue_total() + engine.state().checkpoint_queue_total()
            );
        }
    }
}

//! Simulation engine
//!
//! The interval step state machine integrating all components:
//! - Arrival realization (per-flight precomputed arrival curves)
//! - Ticket-counter and checkpoint service (fractional capacity banking)
//! - Timed transitions (ticket→checkpoint transit, checkpoint→hold walk)
//! - Boarding-close marking / clearing and the missed-passenger purge
//! - Departure clearing
//! - Per-interval history and full-state snapshots
//!
//! # Architecture
//!
//! Each call to [`SimulationEngine::simulate_interval`] advances global time
//! by exactly one minute, in this fixed order:
//!
//! ```text
//! For minute m:
//! 1. Realize arrivals; detect boarding close (mark missed, never remove)
//! 2. Ticket-counter service
//! 3. Ticket→checkpoint transition (transit delay elapsed)
//! 4. Checkpoint service
//! 5. Checkpoint→hold-room transition (walk time elapsed)
//! 6. Departure clearing (hold rooms empty at departure minute)
//! 7. History record (owned copies of every collection)
//! 8. Boarding-close clearing (non-hold collections)
//! 9. Missed purge
//! 10. Advance the minute counter; record aggregates; capture snapshot
//! ```
//!
//! # Service timing
//!
//! A resource serves from the capacity banked in previous minutes (the floor
//! of its accumulator), then banks this minute's capacity; a resource whose
//! queue is empty after serving banks nothing. A passenger therefore never
//! completes service in the minute they joined the queue: at rate 1/min a
//! passenger queued at minute 0 completes at minute 1.
//!
//! # Determinism
//!
//! The only random choice (hold-room tie-break) runs once, pre-simulation,
//! from a seeded generator; stepping itself is fully deterministic, so
//! restoring snapshot *k* and re-running the step reproduces snapshot *k+1*
//! exactly.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::arrivals::{
    ArrivalCurveConfig, ArrivalCurveGenerator, EditedSplitGaussianCurve, LegacyGaussianCurve,
    DEFAULT_BOARDING_CLOSE,
};
use crate::core::time::{ceil_minutes, Timeline};
use crate::engine::assignment::resolve_hold_rooms;
use crate::engine::history::IntervalHistory;
use crate::engine::snapshot::{compute_config_hash, EngineSnapshot, SnapshotStore};
use crate::models::{
    CheckpointConfig, CounterConfig, EngineState, Flight, FlightTally, HoldRoomConfig, LiveCounts,
    Passenger, PassengerId, PurchaseChannel,
};
use crate::rng::RngManager;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete engine configuration.
///
/// One explicit, typed struct carries everything a run needs; out-of-range
/// values are clamped at construction and missing resources are replaced
/// with synthesized fallbacks rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fraction of each arrival bucket buying in person (ticket counter
    /// first); the rest bought online and go straight to a checkpoint.
    pub percent_in_person: f64,

    /// Ticket counters. May be empty: all traffic becomes online.
    pub counters: Vec<CounterConfig>,

    /// Checkpoints. An empty list is replaced with one fallback checkpoint
    /// of rate 0.
    pub checkpoints: Vec<CheckpointConfig>,

    /// Hold rooms. `None` or empty synthesizes one room per flight with the
    /// legacy default delay and single-flight eligibility.
    pub hold_rooms: Option<Vec<HoldRoomConfig>>,

    /// Arrival window length: arrivals for a flight start this many minutes
    /// before its departure.
    pub arrival_span_minutes: i64,

    /// Interval length used to scale service rates (clamped to ≥ 1).
    pub interval_minutes: i64,

    /// Minutes between finishing ticketing and joining a checkpoint queue.
    pub transit_delay_minutes: i64,

    /// Legacy default checkpoint→hold delay, used when synthesizing rooms.
    pub hold_delay_minutes: i64,

    /// The schedule. Flight numbers must be unique.
    pub flights: Vec<Flight>,

    /// Arrival-curve settings (legacy or edited).
    pub arrival_curve: ArrivalCurveConfig,

    /// Seed for the hold-room tie-break.
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            percent_in_person: 0.4,
            counters: Vec::new(),
            checkpoints: Vec::new(),
            hold_rooms: None,
            arrival_span_minutes: 120,
            interval_minutes: 1,
            transit_delay_minutes: 2,
            hold_delay_minutes: 5,
            flights: Vec::new(),
            arrival_curve: ArrivalCurveConfig::legacy_default(),
            rng_seed: 1,
        }
    }
}

/// Engine error types. Almost every bad input is silently corrected; the
/// variants here are the programmer errors construction refuses to absorb.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Final per-flight report: how many passengers the flight generated and
/// where they ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub flight_number: String,
    pub expected_passengers: u32,
    pub arrivals: u32,
    pub boarded: u32,
    pub missed: u32,
    /// Index of the physical hold room chosen for this flight.
    pub hold_room: usize,
}

/// The structural slice of the configuration whose mutation would
/// invalidate stored snapshots. Arrival-curve settings and the RNG seed are
/// excluded: curve swaps before a run must keep old snapshots restorable.
#[derive(Serialize)]
struct StructuralConfig<'a> {
    percent_in_person: f64,
    counters: &'a [CounterConfig],
    checkpoints: &'a [CheckpointConfig],
    hold_rooms: &'a [HoldRoomConfig],
    arrival_span_minutes: i64,
    interval_minutes: i64,
    transit_delay_minutes: i64,
    hold_delay_minutes: i64,
    flights: &'a [Flight],
}

// ============================================================================
// SimulationEngine
// ============================================================================

/// Owns all simulation state and coordinates the interval step, the rewind
/// API and the read-only views handed to collaborators.
#[derive(Debug)]
pub struct SimulationEngine {
    percent_in_person: f64,
    counters: Vec<CounterConfig>,
    checkpoints: Vec<CheckpointConfig>,
    hold_rooms: Vec<HoldRoomConfig>,
    flights: Vec<Flight>,
    interval_minutes: i64,
    transit_delay_minutes: i64,
    hold_delay_minutes: i64,

    arrival_curve: ArrivalCurveConfig,
    timeline: Timeline,
    config_hash: String,

    /// Per-flight per-minute arrival counts, rebuilt on curve swap.
    minute_arrivals: HashMap<String, Vec<u32>>,

    /// Flight number → chosen physical hold room. Resolved once, immutable.
    chosen_hold_room: HashMap<String, usize>,

    state: EngineState,
    current_interval: usize,
    history: IntervalHistory,
    snapshots: SnapshotStore,
}

impl SimulationEngine {
    /// Build an engine from configuration.
    ///
    /// Applies all silent corrections (clamps, fallback synthesis), derives
    /// the timeline, resolves hold-room assignment with the seeded RNG,
    /// builds the arrival curves and captures snapshot 0.
    ///
    /// The only rejected input is a duplicate flight number: flight numbers
    /// are the identity keys for the whole run.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let EngineConfig {
            percent_in_person,
            mut counters,
            mut checkpoints,
            hold_rooms,
            arrival_span_minutes,
            interval_minutes,
            transit_delay_minutes,
            hold_delay_minutes,
            flights,
            arrival_curve,
            rng_seed,
        } = config;

        let mut seen = HashSet::new();
        for flight in &flights {
            if !seen.insert(flight.number().to_string()) {
                return Err(EngineError::InvalidConfig(format!(
                    "duplicate flight number: {}",
                    flight.number()
                )));
            }
        }

        let clamped_percent = percent_in_person.clamp(0.0, 1.0);
        if clamped_percent != percent_in_person {
            warn!(
                given = percent_in_person,
                used = clamped_percent,
                "percent_in_person out of range, clamped"
            );
        }
        let interval_minutes = interval_minutes.max(1);
        let transit_delay_minutes = transit_delay_minutes.max(0);
        let hold_delay_minutes = hold_delay_minutes.max(0);

        for counter in &mut counters {
            counter.rate_per_minute = counter.rate_per_minute.max(0.0);
        }
        for checkpoint in &mut checkpoints {
            checkpoint.rate_per_hour = checkpoint.rate_per_hour.max(0.0);
        }
        if checkpoints.is_empty() {
            warn!("no checkpoints configured, synthesizing one with rate 0");
            checkpoints.push(CheckpointConfig::new(1).with_rate_per_hour(0.0));
        }

        let mut hold_rooms = match hold_rooms {
            Some(rooms) if !rooms.is_empty() => rooms,
            _ => default_hold_rooms(&flights, hold_delay_minutes),
        };
        if hold_rooms.is_empty() {
            hold_rooms.push(HoldRoomConfig::new(1).with_walk_time(hold_delay_minutes as u32, 0));
        }

        let timeline = Timeline::from_flights(&flights, arrival_span_minutes);

        let mut rng = RngManager::new(rng_seed);
        let chosen_hold_room = resolve_hold_rooms(&flights, &hold_rooms, &mut rng);

        let config_hash = compute_config_hash(&StructuralConfig {
            percent_in_person: clamped_percent,
            counters: &counters,
            checkpoints: &checkpoints,
            hold_rooms: &hold_rooms,
            arrival_span_minutes,
            interval_minutes,
            transit_delay_minutes,
            hold_delay_minutes,
            flights: &flights,
        })?;

        let state = EngineState::new(
            counters.len(),
            checkpoints.len(),
            hold_rooms.len(),
            flights.iter().map(Flight::number),
        );

        let mut engine = Self {
            percent_in_person: clamped_percent,
            counters,
            checkpoints,
            hold_rooms,
            flights,
            interval_minutes,
            transit_delay_minutes,
            hold_delay_minutes,
            arrival_curve: ArrivalCurveConfig::legacy_default(),
            timeline,
            config_hash,
            minute_arrivals: HashMap::new(),
            chosen_hold_room,
            state,
            current_interval: 0,
            history: IntervalHistory::default(),
            snapshots: SnapshotStore::default(),
        };

        engine.set_arrival_curve_config(arrival_curve);
        engine.capture_initial_snapshot();

        info!(
            flights = engine.flights.len(),
            counters = engine.counters.len(),
            checkpoints = engine.checkpoints.len(),
            hold_rooms = engine.hold_rooms.len(),
            total_intervals = engine.timeline.total_intervals(),
            "engine initialized"
        );

        Ok(engine)
    }

    // ========================================================================
    // Arrival curve
    // ========================================================================

    /// Apply an arrival-curve configuration and rebuild every per-flight
    /// per-minute arrival array.
    ///
    /// Intended to be called before the simulation runs. The boarding-close
    /// offset is forced back to the fixed 20-minute rule, and previously
    /// captured snapshots are left untouched.
    pub fn set_arrival_curve_config(&mut self, cfg: ArrivalCurveConfig) {
        let mut cfg = cfg;
        cfg.boarding_close_minutes_before_departure = DEFAULT_BOARDING_CLOSE;
        cfg.validate_and_clamp();
        self.arrival_curve = cfg;
        self.rebuild_minute_arrivals();
    }

    /// Copy of the active arrival-curve configuration.
    pub fn arrival_curve_config(&self) -> ArrivalCurveConfig {
        self.arrival_curve.clone()
    }

    fn rebuild_minute_arrivals(&mut self) {
        self.minute_arrivals.clear();
        let span = self.timeline.arrival_span_minutes();
        for flight in &self.flights {
            let total = flight.expected_passengers();
            let per_minute = if self.arrival_curve.legacy_mode {
                LegacyGaussianCurve.per_minute_arrivals(total, &self.arrival_curve, span)
            } else {
                EditedSplitGaussianCurve.per_minute_arrivals(total, &self.arrival_curve, span)
            };
            self.minute_arrivals
                .insert(flight.number().to_string(), per_minute);
        }
    }

    // ========================================================================
    // Rewind API
    // ========================================================================

    pub fn current_interval(&self) -> usize {
        self.current_interval
    }

    pub fn total_intervals(&self) -> usize {
        self.timeline.total_intervals()
    }

    /// Highest interval number ever computed.
    pub fn max_computed_interval(&self) -> usize {
        self.snapshots.high_water()
    }

    pub fn can_rewind(&self) -> bool {
        self.current_interval > 0
    }

    pub fn can_fast_forward(&self) -> bool {
        self.current_interval < self.snapshots.high_water()
    }

    /// Advance one interval: a pure restore when the next interval is
    /// already computed, an actual simulation step otherwise. No-op once the
    /// run is complete.
    pub fn step(&mut self) {
        if self.current_interval >= self.timeline.total_intervals() {
            return;
        }
        if self.current_interval + 1 <= self.snapshots.high_water() {
            self.restore_to(self.current_interval + 1);
            return;
        }
        self.simulate_interval();
    }

    /// Move back one interval (restore; clamped at 0).
    pub fn rewind_one(&mut self) {
        if self.can_rewind() {
            self.restore_to(self.current_interval - 1);
        }
    }

    /// Move forward one interval, restoring when below the high-water mark
    /// and stepping otherwise.
    pub fn fast_forward_one(&mut self) {
        if self.can_fast_forward() {
            self.restore_to(self.current_interval + 1);
        } else {
            self.step();
        }
    }

    /// Jump to any computed interval; targets beyond the high-water mark
    /// are clamped to it.
    pub fn go_to_interval(&mut self, target: usize) {
        self.restore_to(target);
    }

    /// Reset and simulate the whole run from interval 0.
    pub fn run_to_completion(&mut self) {
        self.current_interval = 0;
        self.history.clear();
        self.state.reset();
        self.capture_initial_snapshot();

        while self.current_interval < self.timeline.total_intervals() {
            self.simulate_interval();
        }
    }

    /// Read-only access to a stored snapshot without mutating the engine's
    /// visible current state.
    pub fn peek_interval(&self, interval: usize) -> Option<&EngineSnapshot> {
        self.snapshots.get(interval)
    }

    fn capture_initial_snapshot(&mut self) {
        self.snapshots.reset();
        self.state.just_closed.clear();
        self.state.ticket_completed_visible.clear();
        self.state.held_up_by_interval.clear();
        self.state.ticket_queued_by_interval.clear();
        self.state.checkpoint_queued_by_interval.clear();
        self.state.hold_room_total_by_interval.clear();

        self.state.record_queue_totals(0);
        self.snapshots.capture(0, &self.state);
    }

    fn restore_to(&mut self, target: usize) {
        let target = target.min(self.snapshots.high_water());
        let snapshot = self
            .snapshots
            .get(target)
            .expect("snapshot store is missing a computed interval");
        let restored = snapshot.state().clone();

        // A shape mismatch means the structural configuration mutated
        // mid-run: a corrupted invariant, not a recoverable condition.
        assert_eq!(
            restored.ticket_queues.len(),
            self.state.ticket_queues.len(),
            "snapshot/live ticket line count mismatch"
        );
        assert_eq!(
            restored.checkpoint_queues.len(),
            self.state.checkpoint_queues.len(),
            "snapshot/live checkpoint line count mismatch"
        );
        assert_eq!(
            restored.hold_rooms.len(),
            self.state.hold_rooms.len(),
            "snapshot/live hold room count mismatch"
        );

        self.current_interval = snapshot.interval();
        self.state = restored;
    }

    // ========================================================================
    // Rates
    // ========================================================================

    fn counter_rate_per_interval(&self, counter: usize) -> f64 {
        self.counters
            .get(counter)
            .map_or(0.0, |c| c.rate_per_minute.max(0.0) * self.interval_minutes as f64)
    }

    fn checkpoint_rate_per_interval(&self, checkpoint: usize) -> f64 {
        self.checkpoints.get(checkpoint).map_or(0.0, |c| {
            c.rate_per_hour.max(0.0) / 60.0 * self.interval_minutes as f64
        })
    }

    fn chosen_room_index(&self, flight_number: &str) -> usize {
        self.chosen_hold_room
            .get(flight_number)
            .copied()
            .unwrap_or(0)
            .min(self.hold_rooms.len() - 1)
    }

    fn flight_by_number(&self, number: &str) -> Option<&Flight> {
        self.flights.iter().find(|f| f.number() == number)
    }

    // ========================================================================
    // Interval step
    // ========================================================================

    /// Simulate exactly one interval from the current state, regardless of
    /// any existing snapshot for the next interval (which is overwritten).
    /// Use [`step`] for restore-when-computed semantics.
    ///
    /// [`step`]: SimulationEngine::step
    pub fn simulate_interval(&mut self) {
        if self.current_interval >= self.timeline.total_intervals() {
            return;
        }

        let minute = self.current_interval as i64;
        self.state.just_closed.clear();
        let mut departing: Vec<String> = Vec::new();

        // Stage 1: arrivals and boarding-close detection. All effects are
        // relative to the current minute, before the counter increments.
        for fi in 0..self.flights.len() {
            if minute == self.timeline.departure_interval(&self.flights[fi]) {
                departing.push(self.flights[fi].number().to_string());
            }

            let idx = minute - self.timeline.curve_offset(&self.flights[fi]);
            let count = self
                .minute_arrivals
                .get(self.flights[fi].number())
                .filter(|curve| idx >= 0 && (idx as usize) < curve.len())
                .map_or(0, |curve| curve[idx as usize]);

            if count > 0 {
                self.realize_arrivals(fi, count, minute);
            }

            if minute == self.timeline.boarding_close_interval(&self.flights[fi]) {
                let number = self.flights[fi].number().to_string();
                let room = self.chosen_room_index(&number);
                let safe = self.state.hold_room_occupants_of(room, &number);
                debug!(flight = %number, minute, safe = safe.len(), "boarding closed");
                self.state.just_closed.push(number.clone());
                self.state.mark_flight_missed_outside(&number, &safe);
            }
        }

        // Stage 2: ticket-counter service.
        for c in 0..self.counters.len() {
            let banked = self.state.counter_progress[c].floor();
            let mut to_complete = banked as u32;
            self.state.counter_progress[c] -= banked;

            while to_complete > 0 {
                let Some(id) = self.state.take_first_not_missed_ticket(c) else {
                    break;
                };
                to_complete -= 1;
                if let Some(p) = self.state.passenger_mut(id) {
                    p.set_ticket_completion_minute(minute);
                }
                self.state.ticket_completed[c].push(id);
                self.state.ticket_completed_visible.insert(id);
                self.state
                    .pending_to_checkpoint
                    .entry(minute + self.transit_delay_minutes)
                    .or_default()
                    .push(id);
            }

            let rate = self.counter_rate_per_interval(c);
            self.state.counter_progress[c] += rate;
            // An idle counter banks no capacity for future minutes.
            if self.state.ticket_queues[c].is_empty() {
                self.state.counter_progress[c] = 0.0;
            }
        }

        // Stage 3: ticket→checkpoint transition. Arrivals due this minute
        // join the globally shortest checkpoint queue.
        if let Some(ids) = self.state.pending_to_checkpoint.remove(&minute) {
            let all: Vec<usize> = (0..self.state.checkpoint_queues.len()).collect();
            for id in ids {
                let Some(p) = self.state.passenger(id) else {
                    continue;
                };
                if p.is_missed() {
                    continue;
                }
                self.state.ticket_completed_visible.remove(&id);
                if let Some(p) = self.state.passenger_mut(id) {
                    p.set_checkpoint_entry_minute(minute);
                }
                let best = shortest_queue(&self.state.checkpoint_queues, &all);
                self.state.checkpoint_queues[best].push_back(id);
            }
        }

        // Stage 4: checkpoint service. Completions are routed toward the
        // flight's precomputed hold room after the walk delay.
        for c in 0..self.checkpoints.len() {
            let banked = self.state.checkpoint_progress[c].floor();
            let mut to_complete = banked as u32;
            self.state.checkpoint_progress[c] -= banked;

            while to_complete > 0 {
                let Some(id) = self.state.take_first_not_missed_checkpoint(c) else {
                    break;
                };
                to_complete -= 1;
                if let Some(p) = self.state.passenger_mut(id) {
                    p.set_checkpoint_completion_minute(minute);
                }
                self.state.checkpoint_completed[c].push(id);

                let Some(flight_number) =
                    self.state.passenger(id).map(|p| p.flight().to_string())
                else {
                    continue;
                };
                let room = self.chosen_room_index(&flight_number);
                if let Some(p) = self.state.passenger_mut(id) {
                    p.set_assigned_hold_room(room);
                }
                let arrive = minute + ceil_minutes(self.hold_rooms[room].walk_seconds);
                self.state.pending_to_hold.entry(arrive).or_default().push(id);
            }

            let rate = self.checkpoint_rate_per_interval(c);
            self.state.checkpoint_progress[c] += rate;
            if self.state.checkpoint_queues[c].is_empty() {
                self.state.checkpoint_progress[c] = 0.0;
            }
        }

        // Stage 5: checkpoint→hold-room transition. A passenger whose flight
        // already closed boarding is marked missed instead of admitted.
        if let Some(ids) = self.state.pending_to_hold.remove(&minute) {
            for id in ids {
                let Some(p) = self.state.passenger(id) else {
                    continue;
                };
                if p.is_missed() {
                    continue;
                }
                let flight_number = p.flight().to_string();
                let assigned = p.assigned_hold_room();
                let Some(close) = self
                    .flight_by_number(&flight_number)
                    .map(|f| self.timeline.boarding_close_interval(f))
                else {
                    continue;
                };

                if minute < close {
                    let room = assigned
                        .unwrap_or_else(|| self.chosen_room_index(&flight_number))
                        .min(self.hold_rooms.len() - 1);
                    self.state.remove_from_checkpoint_completed(id);
                    let sequence = (self.state.hold_rooms[room].len() + 1) as u32;
                    if let Some(p) = self.state.passenger_mut(id) {
                        p.set_assigned_hold_room(room);
                        p.enter_hold_room(minute, sequence);
                    }
                    self.state.hold_rooms[room].push(id);
                } else if let Some(p) = self.state.passenger_mut(id) {
                    p.mark_missed();
                }
            }
        }

        // Stage 6: departure clearing (occupants board and leave).
        for number in &departing {
            debug!(flight = %number, minute, "departure, clearing hold room");
            self.state.clear_flight_from_hold_rooms(number);
        }

        // Stage 7: history record (before close clearing, so the final
        // pre-close composition stays visible at this interval).
        self.history.record_at(self.current_interval, &self.state);

        // Stage 8: boarding-close clearing of all non-hold collections.
        let closed = self.state.just_closed.clone();
        for number in &closed {
            self.state.clear_flight_from_non_hold(number);
        }

        // Stage 9: purge everyone flagged missed.
        self.state.purge_missed();

        // Stage 10: advance, record aggregates for the new interval, snapshot.
        self.current_interval += 1;
        self.state.record_held_up(self.current_interval);
        self.state.record_queue_totals(self.current_interval);
        self.snapshots.capture(self.current_interval, &self.state);
    }

    /// Split one arrival bucket into in-person and online passengers and
    /// enqueue them.
    fn realize_arrivals(&mut self, flight_idx: usize, count: u32, minute: i64) {
        let number = self.flights[flight_idx].number().to_string();

        let mut in_person = (count as f64 * self.percent_in_person).round() as u32;
        let mut online = count - in_person;
        // With no ticket counters everyone is effectively an online buyer.
        if self.counters.is_empty() {
            online += in_person;
            in_person = 0;
        }

        if in_person > 0 {
            let mut allowed: Vec<usize> = (0..self.counters.len())
                .filter(|&i| self.counters[i].accepts(&number))
                .collect();
            if allowed.is_empty() {
                allowed = (0..self.counters.len()).collect();
            }
            for _ in 0..in_person {
                let id = self
                    .state
                    .spawn_passenger(&number, minute, PurchaseChannel::InPerson);
                let best = shortest_queue(&self.state.ticket_queues, &allowed);
                self.state.ticket_queues[best].push_back(id);
            }
        }

        if online > 0 {
            let mut allowed: Vec<usize> = (0..self.checkpoints.len())
                .filter(|&i| self.checkpoints[i].accepts(&number))
                .collect();
            if allowed.is_empty() {
                allowed = (0..self.checkpoints.len()).collect();
            }
            for _ in 0..online {
                let id = self
                    .state
                    .spawn_passenger(&number, minute, PurchaseChannel::Online);
                if let Some(p) = self.state.passenger_mut(id) {
                    p.set_checkpoint_entry_minute(minute);
                }
                let best = shortest_queue(&self.state.checkpoint_queues, &allowed);
                self.state.checkpoint_queues[best].push_back(id);
            }
        }
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn history(&self) -> &IntervalHistory {
        &self.history
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn counters(&self) -> &[CounterConfig] {
        &self.counters
    }

    pub fn checkpoints(&self) -> &[CheckpointConfig] {
        &self.checkpoints
    }

    pub fn hold_rooms(&self) -> &[HoldRoomConfig] {
        &self.hold_rooms
    }

    pub fn interval_minutes(&self) -> i64 {
        self.interval_minutes
    }

    pub fn transit_delay_minutes(&self) -> i64 {
        self.transit_delay_minutes
    }

    pub fn hold_delay_minutes(&self) -> i64 {
        self.hold_delay_minutes
    }

    pub fn arrival_span_minutes(&self) -> i64 {
        self.timeline.arrival_span_minutes()
    }

    pub fn global_start(&self) -> chrono::NaiveTime {
        self.timeline.global_start()
    }

    /// SHA-256 of the structural configuration (flights, resources, delays).
    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    /// Flights whose boarding closed during the most recently simulated
    /// interval. Cleared at the start of the next step (one-shot
    /// notification).
    pub fn flights_just_closed(&self) -> &[String] {
        &self.state.just_closed
    }

    /// Per-minute arrival counts for a flight, as built by the active curve.
    pub fn minute_arrivals(&self, flight_number: &str) -> Option<&[u32]> {
        self.minute_arrivals.get(flight_number).map(Vec::as_slice)
    }

    /// The hold room chosen for a flight by the pre-simulation resolver.
    pub fn chosen_hold_room(&self, flight_number: &str) -> Option<usize> {
        self.chosen_hold_room.get(flight_number).copied()
    }

    /// Total arrivals realized while computing the given interval (0 for
    /// interval 0, which is the initial state).
    pub fn total_arrivals_at_interval(&self, interval: usize) -> u32 {
        if interval == 0 {
            return 0;
        }
        self.total_arrivals_at_minute(interval as i64 - 1)
    }

    /// Total arrivals across all flights at a given minute since global
    /// start.
    pub fn total_arrivals_at_minute(&self, minute: i64) -> u32 {
        let mut sum = 0;
        for flight in &self.flights {
            let Some(curve) = self.minute_arrivals.get(flight.number()) else {
                continue;
            };
            let idx = minute - self.timeline.curve_offset(flight);
            if idx >= 0 && (idx as usize) < curve.len() {
                sum += curve[idx as usize];
            }
        }
        sum
    }

    pub fn held_up_at(&self, interval: usize) -> u32 {
        self.state
            .held_up_by_interval
            .get(&interval)
            .copied()
            .unwrap_or(0)
    }

    pub fn ticket_queued_at(&self, interval: usize) -> u32 {
        self.state
            .ticket_queued_by_interval
            .get(&interval)
            .copied()
            .unwrap_or(0)
    }

    pub fn checkpoint_queued_at(&self, interval: usize) -> u32 {
        self.state
            .checkpoint_queued_by_interval
            .get(&interval)
            .copied()
            .unwrap_or(0)
    }

    pub fn hold_room_total_at(&self, interval: usize) -> u32 {
        self.state
            .hold_room_total_by_interval
            .get(&interval)
            .copied()
            .unwrap_or(0)
    }

    pub fn held_up_series(&self) -> &BTreeMap<usize, u32> {
        &self.state.held_up_by_interval
    }

    pub fn ticket_queued_series(&self) -> &BTreeMap<usize, u32> {
        &self.state.ticket_queued_by_interval
    }

    pub fn checkpoint_queued_series(&self) -> &BTreeMap<usize, u32> {
        &self.state.checkpoint_queued_by_interval
    }

    pub fn hold_room_total_series(&self) -> &BTreeMap<usize, u32> {
        &self.state.hold_room_total_by_interval
    }

    /// Owned copies of the live ticket waiting lines, one per counter.
    pub fn ticket_queue_lines(&self) -> Vec<Vec<Passenger>> {
        self.state.resolve_queues(&self.state.ticket_queues)
    }

    /// Owned copies of the live checkpoint waiting lines.
    pub fn checkpoint_queue_lines(&self) -> Vec<Vec<Passenger>> {
        self.state.resolve_queues(&self.state.checkpoint_queues)
    }

    /// Owned copies of the live completed-at-counter lists.
    pub fn completed_ticket_lines(&self) -> Vec<Vec<Passenger>> {
        self.state.resolve_lines(&self.state.ticket_completed)
    }

    /// Owned copies of the live completed-at-checkpoint lists.
    pub fn completed_checkpoint_lines(&self) -> Vec<Vec<Passenger>> {
        self.state.resolve_lines(&self.state.checkpoint_completed)
    }

    /// Owned copies of the live hold-room occupant lists.
    pub fn hold_room_lines(&self) -> Vec<Vec<Passenger>> {
        self.state.resolve_lines(&self.state.hold_rooms)
    }

    /// The completed-at-counter passengers still displayed at the counter
    /// area (those whose transit to a checkpoint has not elapsed yet).
    pub fn visible_completed_ticket_line(&self, counter: usize) -> Vec<Passenger> {
        let Some(line) = self.state.ticket_completed.get(counter) else {
            return Vec::new();
        };
        line.iter()
            .filter(|id| self.state.ticket_completed_visible.contains(*id))
            .filter_map(|id| self.state.passenger(*id))
            .cloned()
            .collect()
    }

    pub fn flight_live_counts(&self, flight_number: &str) -> LiveCounts {
        self.state.flight_live_counts(flight_number)
    }

    pub fn flight_tally(&self, flight_number: &str) -> FlightTally {
        self.state.tally(flight_number)
    }

    /// Per-flight final report, one entry per flight in schedule order.
    pub fn flight_summaries(&self) -> Vec<FlightSummary> {
        self.flights
            .iter()
            .map(|flight| {
                let tally = self.state.tally(flight.number());
                FlightSummary {
                    flight_number: flight.number().to_string(),
                    expected_passengers: flight.expected_passengers(),
                    arrivals: tally.arrivals,
                    boarded: tally.departed,
                    missed: tally.missed,
                    hold_room: self.chosen_room_index(flight.number()),
                }
            })
            .collect()
    }
}

/// Build the legacy default hold rooms: one per flight, the configured hold
/// delay as walk time, single-flight eligibility.
fn default_hold_rooms(flights: &[Flight], hold_delay_minutes: i64) -> Vec<HoldRoomConfig> {
    flights
        .iter()
        .enumerate()
        .map(|(i, flight)| {
            HoldRoomConfig::new(i as u32 + 1)
                .with_walk_time(hold_delay_minutes.max(0) as u32, 0)
                .with_allowed_flight(flight.number())
        })
        .collect()
}

/// Index of the shortest queue among `allowed` (first-found tie-break).
fn shortest_queue(queues: &[VecDeque<PassengerId>], allowed: &[usize]) -> usize {
    let mut best = allowed[0];
    for &i in allowed {
        if queues[i].len() < queues[best].len() {
            best = i;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================

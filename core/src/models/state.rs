//! Engine state
//!
//! The complete mutable state of a running simulation. Passengers are owned
//! by one central map; every other collection (ticket/checkpoint queues,
//! per-resource completed lists, in-transit pending maps, hold rooms) stores
//! `PassengerId`s. A passenger can legitimately appear in two collections at
//! once (a completed list plus a pending map), so the single owning record
//! is what keeps the `missed` flag consistent everywhere.
//!
//! # Critical Invariants
//!
//! 1. Every id held by any collection resolves in the passenger map (ids are
//!    removed from all collections before the record is dropped).
//! 2. Per flight, at every interval boundary:
//!    `ticketQueued + inTransitToCheckpoint + checkpointQueued +
//!     inTransitToHold + holdRoomOccupants + missed + departed == arrivals`.
//! 3. A cloned state is a complete deep snapshot: no collection shares
//!    storage with the live state.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::models::passenger::{Passenger, PassengerId, PurchaseChannel};

/// Per-flight running counters. Part of engine state so snapshots preserve
/// conservation accounting across rewind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightTally {
    /// Passengers realized from the arrival curve so far.
    pub arrivals: u32,

    /// Passengers purged after missing the flight.
    pub missed: u32,

    /// Passengers cleared from the hold room at departure (boarded).
    pub departed: u32,
}

/// Where a flight's live passengers currently are, one count per location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveCounts {
    pub ticket_queued: u32,
    pub in_transit_to_checkpoint: u32,
    pub checkpoint_queued: u32,
    pub in_transit_to_hold: u32,
    pub hold_room: u32,
}

impl LiveCounts {
    pub fn total(&self) -> u32 {
        self.ticket_queued
            + self.in_transit_to_checkpoint
            + self.checkpoint_queued
            + self.in_transit_to_hold
            + self.hold_room
    }
}

/// Complete mutable simulation state.
///
/// Collection counts are fixed at construction (one queue + completed list
/// per counter and per checkpoint, one line per hold room) and must match
/// between a snapshot and the live state on restore.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// All live passengers, indexed by id.
    pub(crate) passengers: HashMap<PassengerId, Passenger>,

    /// Next passenger id to allocate. Part of state so replay after a
    /// restore hands out identical ids.
    pub(crate) next_passenger_id: PassengerId,

    /// Waiting line per ticket counter.
    pub(crate) ticket_queues: Vec<VecDeque<PassengerId>>,

    /// Passengers who finished service at each counter (display/history
    /// collection; members are simultaneously in `pending_to_checkpoint`
    /// until their transit delay elapses).
    pub(crate) ticket_completed: Vec<Vec<PassengerId>>,

    /// Waiting line per checkpoint.
    pub(crate) checkpoint_queues: Vec<VecDeque<PassengerId>>,

    /// Passengers who finished service at each checkpoint.
    pub(crate) checkpoint_completed: Vec<Vec<PassengerId>>,

    /// Occupants per physical hold room, in arrival order.
    pub(crate) hold_rooms: Vec<Vec<PassengerId>>,

    /// Fractional service capacity banked per counter.
    pub(crate) counter_progress: Vec<f64>,

    /// Fractional service capacity banked per checkpoint.
    pub(crate) checkpoint_progress: Vec<f64>,

    /// Ticket→checkpoint transit: arrival minute → passengers due then.
    pub(crate) pending_to_checkpoint: HashMap<i64, Vec<PassengerId>>,

    /// Checkpoint→hold-room walk: arrival minute → passengers due then.
    pub(crate) pending_to_hold: HashMap<i64, Vec<PassengerId>>,

    /// Completed-at-counter passengers still shown at the counter area
    /// (cleared when they move on to a checkpoint).
    pub(crate) ticket_completed_visible: HashSet<PassengerId>,

    /// Flights whose boarding closed during the most recent interval
    /// (one-shot notification list, cleared at the next step).
    pub(crate) just_closed: Vec<String>,

    /// Per-flight conservation counters.
    pub(crate) tallies: HashMap<String, FlightTally>,

    /// Waiting-line total (ticket + checkpoint) per interval.
    pub(crate) held_up_by_interval: BTreeMap<usize, u32>,

    /// Ticket-queue total per interval.
    pub(crate) ticket_queued_by_interval: BTreeMap<usize, u32>,

    /// Checkpoint-queue total per interval.
    pub(crate) checkpoint_queued_by_interval: BTreeMap<usize, u32>,

    /// Hold-room occupancy total per interval.
    pub(crate) hold_room_total_by_interval: BTreeMap<usize, u32>,
}

impl EngineState {
    /// Create empty state shaped for the given resource counts.
    pub(crate) fn new<'a>(
        num_counters: usize,
        num_checkpoints: usize,
        num_hold_rooms: usize,
        flight_numbers: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            passengers: HashMap::new(),
            next_passenger_id: 0,
            ticket_queues: vec![VecDeque::new(); num_counters],
            ticket_completed: vec![Vec::new(); num_counters],
            checkpoint_queues: vec![VecDeque::new(); num_checkpoints],
            checkpoint_completed: vec![Vec::new(); num_checkpoints],
            hold_rooms: vec![Vec::new(); num_hold_rooms],
            counter_progress: vec![0.0; num_counters],
            checkpoint_progress: vec![0.0; num_checkpoints],
            pending_to_checkpoint: HashMap::new(),
            pending_to_hold: HashMap::new(),
            ticket_completed_visible: HashSet::new(),
            just_closed: Vec::new(),
            tallies: flight_numbers
                .into_iter()
                .map(|n| (n.to_string(), FlightTally::default()))
                .collect(),
            held_up_by_interval: BTreeMap::new(),
            ticket_queued_by_interval: BTreeMap::new(),
            checkpoint_queued_by_interval: BTreeMap::new(),
            hold_room_total_by_interval: BTreeMap::new(),
        }
    }

    /// Clear everything back to the post-construction empty state while
    /// keeping the collection shape. Used by `run_to_completion`.
    pub(crate) fn reset(&mut self) {
        self.passengers.clear();
        self.next_passenger_id = 0;
        self.ticket_queues.iter_mut().for_each(VecDeque::clear);
        self.ticket_completed.iter_mut().for_each(Vec::clear);
        self.checkpoint_queues.iter_mut().for_each(VecDeque::clear);
        self.checkpoint_completed.iter_mut().for_each(Vec::clear);
        self.hold_rooms.iter_mut().for_each(Vec::clear);
        self.counter_progress.iter_mut().for_each(|p| *p = 0.0);
        self.checkpoint_progress.iter_mut().for_each(|p| *p = 0.0);
        self.pending_to_checkpoint.clear();
        self.pending_to_hold.clear();
        self.ticket_completed_visible.clear();
        self.just_closed.clear();
        self.tallies.values_mut().for_each(|t| *t = FlightTally::default());
        self.held_up_by_interval.clear();
        self.ticket_queued_by_interval.clear();
        self.checkpoint_queued_by_interval.clear();
        self.hold_room_total_by_interval.clear();
    }

    /// Allocate a new passenger record and count it toward the flight's
    /// cumulative arrivals.
    pub(crate) fn spawn_passenger(
        &mut self,
        flight: &str,
        arrival_minute: i64,
        channel: PurchaseChannel,
    ) -> PassengerId {
        let id = self.next_passenger_id;
        self.next_passenger_id += 1;
        self.passengers
            .insert(id, Passenger::new(id, flight, arrival_minute, channel));
        self.tallies.entry(flight.to_string()).or_default().arrivals += 1;
        id
    }

    pub(crate) fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.get(&id)
    }

    pub(crate) fn passenger_mut(&mut self, id: PassengerId) -> Option<&mut Passenger> {
        self.passengers.get_mut(&id)
    }

    // ========================================================================
    // Queue helpers
    // ========================================================================

    /// Dequeue the first non-missed passenger from a ticket line.
    pub(crate) fn take_first_not_missed_ticket(&mut self, counter: usize) -> Option<PassengerId> {
        let Self {
            ticket_queues,
            passengers,
            ..
        } = self;
        let queue = &mut ticket_queues[counter];
        let pos = queue
            .iter()
            .position(|id| passengers.get(id).is_some_and(|p| !p.is_missed()))?;
        queue.remove(pos)
    }

    /// Dequeue the first non-missed passenger from a checkpoint line.
    pub(crate) fn take_first_not_missed_checkpoint(
        &mut self,
        checkpoint: usize,
    ) -> Option<PassengerId> {
        let Self {
            checkpoint_queues,
            passengers,
            ..
        } = self;
        let queue = &mut checkpoint_queues[checkpoint];
        let pos = queue
            .iter()
            .position(|id| passengers.get(id).is_some_and(|p| !p.is_missed()))?;
        queue.remove(pos)
    }

    /// Drop a passenger from whichever completed-checkpoint list holds it
    /// (at most one does); used when the passenger enters a hold room.
    pub(crate) fn remove_from_checkpoint_completed(&mut self, id: PassengerId) {
        for line in &mut self.checkpoint_completed {
            if let Some(pos) = line.iter().position(|&other| other == id) {
                line.remove(pos);
                return;
            }
        }
    }

    // ========================================================================
    // Boarding close
    // ========================================================================

    /// Ids of the given flight's passengers already inside the given room.
    /// These passengers are permanently safe from missed-marking.
    pub(crate) fn hold_room_occupants_of(&self, room: usize, flight: &str) -> HashSet<PassengerId> {
        self.hold_rooms[room]
            .iter()
            .copied()
            .filter(|id| self.passengers.get(id).is_some_and(|p| p.flight() == flight))
            .collect()
    }

    /// Boarding-close marking: flag every passenger of `flight` outside the
    /// `safe` set as missed. Queues and completed lists keep their (now
    /// flagged) members; the in-transit pending maps drop them immediately,
    /// matching the ordered-purge contract: marking never deletes a
    /// passenger record, removal happens in the later purge stages.
    pub(crate) fn mark_flight_missed_outside(&mut self, flight: &str, safe: &HashSet<PassengerId>) {
        let mut to_flag: Vec<PassengerId> = Vec::new();

        for queue in &self.ticket_queues {
            to_flag.extend(queue.iter().copied());
        }
        for queue in &self.checkpoint_queues {
            to_flag.extend(queue.iter().copied());
        }
        for line in &self.ticket_completed {
            to_flag.extend(line.iter().copied());
        }
        for line in &self.checkpoint_completed {
            to_flag.extend(line.iter().copied());
        }

        for id in to_flag {
            if safe.contains(&id) {
                continue;
            }
            if let Some(p) = self.passengers.get_mut(&id) {
                if p.flight() == flight {
                    p.mark_missed();
                }
            }
        }

        let Self {
            passengers,
            pending_to_checkpoint,
            pending_to_hold,
            ..
        } = self;
        for pending in [pending_to_checkpoint, pending_to_hold] {
            pending.retain(|_, due| {
                due.retain(|id| {
                    let belongs = passengers
                        .get(id)
                        .is_some_and(|p| p.flight() == flight && !safe.contains(id));
                    if belongs {
                        if let Some(p) = passengers.get_mut(id) {
                            p.mark_missed();
                        }
                    }
                    !belongs
                });
                !due.is_empty()
            });
        }
    }

    /// Boarding-close clearing: remove every passenger of `flight` from all
    /// non-hold-room collections. Runs after the interval's history record
    /// so the final pre-close composition stays visible at that interval.
    pub(crate) fn clear_flight_from_non_hold(&mut self, flight: &str) {
        let Self {
            passengers,
            ticket_queues,
            ticket_completed,
            checkpoint_queues,
            checkpoint_completed,
            pending_to_checkpoint,
            pending_to_hold,
            ticket_completed_visible,
            ..
        } = self;

        let of_flight =
            |id: &PassengerId| passengers.get(id).is_some_and(|p| p.flight() == flight);

        for queue in ticket_queues {
            queue.retain(|id| !of_flight(id));
        }
        for line in ticket_completed {
            line.retain(|id| !of_flight(id));
        }
        for queue in checkpoint_queues {
            queue.retain(|id| !of_flight(id));
        }
        for line in checkpoint_completed {
            line.retain(|id| !of_flight(id));
        }
        for pending in [pending_to_checkpoint, pending_to_hold] {
            pending.retain(|_, due| {
                due.retain(|id| !of_flight(id));
                !due.is_empty()
            });
        }
        ticket_completed_visible.retain(|id| !of_flight(id));
    }

    // ========================================================================
    // Departure and purge
    // ========================================================================

    /// Departure clearing: everyone of `flight` in a hold room boards and
    /// leaves the system.
    pub(crate) fn clear_flight_from_hold_rooms(&mut self, flight: &str) {
        let mut boarded: Vec<PassengerId> = Vec::new();
        {
            let Self {
                passengers,
                hold_rooms,
                ..
            } = self;
            for room in hold_rooms {
                room.retain(|id| {
                    let departs =
                        passengers.get(id).is_some_and(|p| p.flight() == flight);
                    if departs {
                        boarded.push(*id);
                    }
                    !departs
                });
            }
        }
        for id in boarded {
            self.passengers.remove(&id);
            self.tallies.entry(flight.to_string()).or_default().departed += 1;
        }
    }

    /// Remove every missed-flagged passenger from all live collections and
    /// drop the record, counting each toward its flight's missed tally.
    pub(crate) fn purge_missed(&mut self) {
        let missed: Vec<PassengerId> = self
            .passengers
            .iter()
            .filter(|(_, p)| p.is_missed())
            .map(|(id, _)| *id)
            .collect();
        if missed.is_empty() {
            return;
        }

        let gone: HashSet<PassengerId> = missed.iter().copied().collect();
        for queue in &mut self.ticket_queues {
            queue.retain(|id| !gone.contains(id));
        }
        for line in &mut self.ticket_completed {
            line.retain(|id| !gone.contains(id));
        }
        for queue in &mut self.checkpoint_queues {
            queue.retain(|id| !gone.contains(id));
        }
        for line in &mut self.checkpoint_completed {
            line.retain(|id| !gone.contains(id));
        }
        for room in &mut self.hold_rooms {
            room.retain(|id| !gone.contains(id));
        }

        for id in missed {
            if let Some(p) = self.passengers.remove(&id) {
                self.tallies
                    .entry(p.flight().to_string())
                    .or_default()
                    .missed += 1;
            }
        }
    }

    // ========================================================================
    // Totals
    // ========================================================================

    pub fn ticket_queue_total(&self) -> u32 {
        self.ticket_queues.iter().map(|q| q.len() as u32).sum()
    }

    pub fn checkpoint_queue_total(&self) -> u32 {
        self.checkpoint_queues.iter().map(|q| q.len() as u32).sum()
    }

    pub fn hold_room_total(&self) -> u32 {
        self.hold_rooms.iter().map(|r| r.len() as u32).sum()
    }

    pub fn in_transit_to_checkpoint_total(&self) -> u32 {
        self.pending_to_checkpoint
            .values()
            .map(|v| v.len() as u32)
            .sum()
    }

    pub fn in_transit_to_hold_total(&self) -> u32 {
        self.pending_to_hold.values().map(|v| v.len() as u32).sum()
    }

    /// Count the flight's live passengers by current location.
    pub fn flight_live_counts(&self, flight: &str) -> LiveCounts {
        let of_flight = |id: &PassengerId| {
            self.passengers
                .get(id)
                .is_some_and(|p| p.flight() == flight) as u32
        };

        let mut counts = LiveCounts::default();
        for queue in &self.ticket_queues {
            counts.ticket_queued += queue.iter().map(of_flight).sum::<u32>();
        }
        for due in self.pending_to_checkpoint.values() {
            counts.in_transit_to_checkpoint += due.iter().map(of_flight).sum::<u32>();
        }
        for queue in &self.checkpoint_queues {
            counts.checkpoint_queued += queue.iter().map(of_flight).sum::<u32>();
        }
        for due in self.pending_to_hold.values() {
            counts.in_transit_to_hold += due.iter().map(of_flight).sum::<u32>();
        }
        for room in &self.hold_rooms {
            counts.hold_room += room.iter().map(of_flight).sum::<u32>();
        }
        counts
    }

    pub fn tally(&self, flight: &str) -> FlightTally {
        self.tallies.get(flight).cloned().unwrap_or_default()
    }

    /// Record the three waiting/occupancy aggregates for `interval`.
    pub(crate) fn record_queue_totals(&mut self, interval: usize) {
        let ticket = self.ticket_queue_total();
        let checkpoint = self.checkpoint_queue_total();
        let hold = self.hold_room_total();
        self.ticket_queued_by_interval.insert(interval, ticket);
        self.checkpoint_queued_by_interval.insert(interval, checkpoint);
        self.hold_room_total_by_interval.insert(interval, hold);
    }

    /// Record the held-up total (everyone still in a waiting line) for
    /// `interval`.
    pub(crate) fn record_held_up(&mut self, interval: usize) {
        let total = self.ticket_queue_total() + self.checkpoint_queue_total();
        self.held_up_by_interval.insert(interval, total);
    }

    // ========================================================================
    // Owned copies for collaborators
    // ========================================================================

    /// Resolve a list of ids into owned passenger copies, skipping any id
    /// with no live record.
    pub(crate) fn resolve(&self, ids: &[PassengerId]) -> Vec<Passenger> {
        ids.iter()
            .filter_map(|id| self.passengers.get(id))
            .cloned()
            .collect()
    }

    /// Resolve one owned copy per line of a `Vec`-backed collection.
    pub(crate) fn resolve_lines(&self, lines: &[Vec<PassengerId>]) -> Vec<Vec<Passenger>> {
        lines.iter().map(|line| self.resolve(line)).collect()
    }

    /// Resolve one owned copy per line of a queue-backed collection.
    pub(crate) fn resolve_queues(&self, queues: &[VecDeque<PassengerId>]) -> Vec<Vec<Passenger>> {
        queues
            .iter()
            .map(|queue| {
                queue
                    .iter()
                    .filter_map(|id| self.passengers.get(id))
                    .cloned()
                    .collect()
            })
            .collect()
    }
}

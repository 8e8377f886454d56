//! Passenger model
//!
//! Passengers are owned by the central map in [`EngineState`]; every queue,
//! completed list, pending-transition map and hold room holds `PassengerId`s
//! only. Marking a passenger missed therefore mutates exactly one record no
//! matter how many collections currently reference it.
//!
//! [`EngineState`]: crate::models::EngineState

use serde::{Deserialize, Serialize};

/// Sequentially allocated passenger identifier.
///
/// IDs come from a counter inside engine state (not a random source), so a
/// restored snapshot re-allocates the exact same IDs on replay.
pub type PassengerId = u64;

/// How the passenger bought their ticket. In-person buyers go through the
/// ticket counters; online buyers go straight to a checkpoint queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseChannel {
    InPerson,
    Online,
}

/// One passenger's journey through the departure process.
///
/// Stage timestamps are minutes since global start and stay `None` until the
/// passenger reaches that stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    id: PassengerId,

    /// Flight number of the flight this passenger is on.
    flight: String,

    /// Minute the passenger arrived at the airport.
    arrival_minute: i64,

    channel: PurchaseChannel,

    /// Minute service finished at the ticket counter.
    ticket_completion_minute: Option<i64>,

    /// Minute the passenger joined a checkpoint queue.
    checkpoint_entry_minute: Option<i64>,

    /// Minute service finished at the checkpoint.
    checkpoint_completion_minute: Option<i64>,

    /// Minute the passenger entered their hold room.
    hold_room_entry_minute: Option<i64>,

    /// Arrival order within the hold room (1-based, strictly increasing).
    hold_room_sequence: Option<u32>,

    /// Index of the physical hold room this passenger was routed to.
    assigned_hold_room: Option<usize>,

    /// Set when boarding closed before the passenger reached the hold room.
    /// A passenger already inside the chosen hold room is never marked.
    missed: bool,
}

impl Passenger {
    pub fn new(id: PassengerId, flight: impl Into<String>, arrival_minute: i64, channel: PurchaseChannel) -> Self {
        Self {
            id,
            flight: flight.into(),
            arrival_minute,
            channel,
            ticket_completion_minute: None,
            checkpoint_entry_minute: None,
            checkpoint_completion_minute: None,
            hold_room_entry_minute: None,
            hold_room_sequence: None,
            assigned_hold_room: None,
            missed: false,
        }
    }

    pub fn id(&self) -> PassengerId {
        self.id
    }

    pub fn flight(&self) -> &str {
        &self.flight
    }

    pub fn arrival_minute(&self) -> i64 {
        self.arrival_minute
    }

    pub fn channel(&self) -> PurchaseChannel {
        self.channel
    }

    pub fn ticket_completion_minute(&self) -> Option<i64> {
        self.ticket_completion_minute
    }

    pub fn set_ticket_completion_minute(&mut self, minute: i64) {
        self.ticket_completion_minute = Some(minute);
    }

    pub fn checkpoint_entry_minute(&self) -> Option<i64> {
        self.checkpoint_entry_minute
    }

    pub fn set_checkpoint_entry_minute(&mut self, minute: i64) {
        self.checkpoint_entry_minute = Some(minute);
    }

    pub fn checkpoint_completion_minute(&self) -> Option<i64> {
        self.checkpoint_completion_minute
    }

    pub fn set_checkpoint_completion_minute(&mut self, minute: i64) {
        self.checkpoint_completion_minute = Some(minute);
    }

    pub fn hold_room_entry_minute(&self) -> Option<i64> {
        self.hold_room_entry_minute
    }

    pub fn hold_room_sequence(&self) -> Option<u32> {
        self.hold_room_sequence
    }

    /// Record hold-room entry: entry minute plus per-room arrival sequence.
    pub fn enter_hold_room(&mut self, minute: i64, sequence: u32) {
        self.hold_room_entry_minute = Some(minute);
        self.hold_room_sequence = Some(sequence);
    }

    pub fn assigned_hold_room(&self) -> Option<usize> {
        self.assigned_hold_room
    }

    pub fn set_assigned_hold_room(&mut self, room: usize) {
        self.assigned_hold_room = Some(room);
    }

    pub fn is_missed(&self) -> bool {
        self.missed
    }

    pub fn mark_missed(&mut self) {
        self.missed = true;
    }
}

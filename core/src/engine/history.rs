//! Per-interval passenger history
//!
//! After the service and transition stages of each interval (and before the
//! boarding-close clearing), the engine records an owned copy of every
//! queue, completed list and hold room, indexed by the interval just
//! simulated. Renderers and exporters read these copies; they never see
//! live collections.
//!
//! History entries are written only when an interval is actually simulated —
//! restores do not append — so entry *k* always describes the step that took
//! the engine from interval *k* to *k + 1*, and the history length always
//! equals the snapshot high-water mark. Re-simulating an interval after a
//! rewind overwrites its entry in place.

use crate::models::{EngineState, Passenger};

/// Owned per-interval copies of all five passenger collections.
#[derive(Debug, Clone, Default)]
pub struct IntervalHistory {
    queued_ticket: Vec<Vec<Vec<Passenger>>>,
    served_ticket: Vec<Vec<Vec<Passenger>>>,
    queued_checkpoint: Vec<Vec<Vec<Passenger>>>,
    served_checkpoint: Vec<Vec<Vec<Passenger>>>,
    hold_rooms: Vec<Vec<Vec<Passenger>>>,
}

fn put<T>(series: &mut Vec<T>, interval: usize, entry: T) {
    debug_assert!(interval <= series.len(), "history record out of sequence");
    if interval < series.len() {
        series[interval] = entry;
    } else {
        series.push(entry);
    }
}

impl IntervalHistory {
    pub(crate) fn clear(&mut self) {
        self.queued_ticket.clear();
        self.served_ticket.clear();
        self.queued_checkpoint.clear();
        self.served_checkpoint.clear();
        self.hold_rooms.clear();
    }

    /// Record owned copies of the current collections for `interval`,
    /// overwriting any existing entry (re-simulation after a rewind).
    pub(crate) fn record_at(&mut self, interval: usize, state: &EngineState) {
        put(
            &mut self.queued_ticket,
            interval,
            state.resolve_queues(&state.ticket_queues),
        );
        put(
            &mut self.served_ticket,
            interval,
            state.resolve_lines(&state.ticket_completed),
        );
        put(
            &mut self.queued_checkpoint,
            interval,
            state.resolve_queues(&state.checkpoint_queues),
        );
        put(
            &mut self.served_checkpoint,
            interval,
            state.resolve_lines(&state.checkpoint_completed),
        );
        put(
            &mut self.hold_rooms,
            interval,
            state.resolve_lines(&state.hold_rooms),
        );
    }

    /// Number of recorded intervals.
    pub fn len(&self) -> usize {
        self.hold_rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hold_rooms.is_empty()
    }

    /// Ticket waiting lines as of interval `k`'s step, one entry per counter.
    pub fn queued_ticket_at(&self, interval: usize) -> Option<&[Vec<Passenger>]> {
        self.queued_ticket.get(interval).map(Vec::as_slice)
    }

    /// Completed-at-counter passengers as of interval `k`'s step.
    pub fn served_ticket_at(&self, interval: usize) -> Option<&[Vec<Passenger>]> {
        self.served_ticket.get(interval).map(Vec::as_slice)
    }

    /// Checkpoint waiting lines as of interval `k`'s step.
    pub fn queued_checkpoint_at(&self, interval: usize) -> Option<&[Vec<Passenger>]> {
        self.queued_checkpoint.get(interval).map(Vec::as_slice)
    }

    /// Completed-at-checkpoint passengers as of interval `k`'s step.
    pub fn served_checkpoint_at(&self, interval: usize) -> Option<&[Vec<Passenger>]> {
        self.served_checkpoint.get(interval).map(Vec::as_slice)
    }

    /// Hold-room occupants as of interval `k`'s step, one entry per room.
    pub fn hold_rooms_at(&self, interval: usize) -> Option<&[Vec<Passenger>]> {
        self.hold_rooms.get(interval).map(Vec::as_slice)
    }
}

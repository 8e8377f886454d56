//! Hold-room assignment
//!
//! Resolved once per flight before simulation starts: collect the rooms
//! whose eligibility accepts the flight, keep the subset with minimal walk
//! time, break remaining ties uniformly at random. The resulting
//! flight→room mapping is immutable for the whole run and is consulted,
//! never recomputed, during stepping.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Flight, HoldRoomConfig};
use crate::rng::RngManager;

/// Compute the flight-number → hold-room-index mapping.
///
/// A flight no room accepts falls back to the first room with an
/// unrestricted eligibility set, else index 0. The caller guarantees at
/// least one room exists.
pub(crate) fn resolve_hold_rooms(
    flights: &[Flight],
    rooms: &[HoldRoomConfig],
    rng: &mut RngManager,
) -> HashMap<String, usize> {
    let mut chosen = HashMap::new();
    if rooms.is_empty() {
        return chosen;
    }

    for flight in flights {
        let mut best_seconds = u32::MAX;
        let mut candidates: Vec<usize> = Vec::new();

        for (r, room) in rooms.iter().enumerate() {
            if !room.accepts(flight.number()) {
                continue;
            }
            match room.walk_seconds.cmp(&best_seconds) {
                Ordering::Less => {
                    best_seconds = room.walk_seconds;
                    candidates.clear();
                    candidates.push(r);
                }
                Ordering::Equal => candidates.push(r),
                Ordering::Greater => {}
            }
        }

        let pick = if candidates.is_empty() {
            rooms.iter().position(HoldRoomConfig::accepts_all).unwrap_or(0)
        } else {
            candidates[rng.range(0, candidates.len() as i64) as usize]
        };

        chosen.insert(flight.number().to_string(), pick.min(rooms.len() - 1));
    }

    chosen
}

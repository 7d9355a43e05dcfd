//! Nearest-slot assignment policy
//!
//! The policy is a greedy nearest-neighbour pick: every candidate is scored by
//! its distance to the entrance and the smallest score wins. Queue order alone
//! decides which car is served next; there is no job-size metric.

use ordered_float::OrderedFloat;

use super::error::{SimError, SimResult};
use super::grid::SimSlot;
use super::types::{GridPosition, SlotId};

/// The winning slot of one selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub slot: SlotId,
    pub position: GridPosition,
    pub distance: f32,
}

/// Pick the candidate closest to `origin`
///
/// Callers pass free slots only. On equal distances the candidate seen first
/// wins, so the same candidate order always yields the same slot. An empty
/// candidate set yields [`SimError::NoCandidateSlot`].
pub fn select_slot<'a, I>(candidates: I, origin: &GridPosition) -> SimResult<Selection>
where
    I: IntoIterator<Item = &'a SimSlot>,
{
    candidates
        .into_iter()
        .map(|slot| Selection {
            slot: slot.id,
            position: slot.position,
            distance: slot.position.distance(origin),
        })
        // min_by_key keeps the first of several equal minima
        .min_by_key(|selection| OrderedFloat(selection.distance))
        .ok_or(SimError::NoCandidateSlot)
}

/// Distances from `origin` to each candidate, in candidate order
///
/// Used for the distance overlay. The list goes stale as soon as any slot
/// changes occupancy.
pub fn candidate_distances<'a, I>(candidates: I, origin: &GridPosition) -> Vec<(SlotId, f32)>
where
    I: IntoIterator<Item = &'a SimSlot>,
{
    candidates
        .into_iter()
        .map(|slot| (slot.id, slot.position.distance(origin)))
        .collect()
}

//! Cars waiting for, or parked in, a slot

use super::types::{CarId, SlotId, Tick};

/// A car in the parking simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimCar {
    pub id: CarId,
    /// Tick at which the car arrived
    pub arrival_tick: Tick,
    /// Ticks spent waiting in the queue; frozen once the car is parked
    pub wait_ticks: Tick,
    /// The slot this car was assigned to, if any
    pub assigned_slot: Option<SlotId>,
    /// Distance from the entrance to the assigned slot
    pub distance: Option<f32>,
}

impl SimCar {
    pub fn new(id: CarId, arrival_tick: Tick) -> Self {
        Self {
            id,
            arrival_tick,
            wait_ticks: 0,
            assigned_slot: None,
            distance: None,
        }
    }

    pub fn is_parked(&self) -> bool {
        self.assigned_slot.is_some()
    }

    /// Record the slot assignment. Only the lot calls this, together with
    /// occupying the slot.
    pub(crate) fn park(&mut self, slot: SlotId, distance: f32) {
        self.assigned_slot = Some(slot);
        self.distance = Some(distance);
    }
}

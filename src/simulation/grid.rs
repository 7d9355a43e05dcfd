//! The parking grid
//!
//! A fixed rows × cols arrangement of slots. The slot set is built once and
//! never grows or shrinks; only occupancy changes.

use super::car::SimCar;
use super::error::{SimError, SimResult};
use super::types::{CarId, GridPosition, SlotId};

/// A parking slot
#[derive(Debug, Clone)]
pub struct SimSlot {
    pub id: SlotId,
    pub position: GridPosition,
    /// The parked car, present iff the slot is occupied
    occupant: Option<SimCar>,
}

impl SimSlot {
    pub fn new(id: SlotId, position: GridPosition) -> Self {
        Self {
            id,
            position,
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&SimCar> {
        self.occupant.as_ref()
    }

    pub fn occupant_id(&self) -> Option<CarId> {
        self.occupant.as_ref().map(|car| car.id)
    }
}

/// Read-only view of one slot handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSnapshot {
    pub id: SlotId,
    pub position: GridPosition,
    pub is_occupied: bool,
    pub occupant: Option<CarId>,
}

impl From<&SimSlot> for SlotSnapshot {
    fn from(slot: &SimSlot) -> Self {
        Self {
            id: slot.id,
            position: slot.position,
            is_occupied: slot.is_occupied(),
            occupant: slot.occupant_id(),
        }
    }
}

/// The full grid of slots plus the entrance used for distances
#[derive(Debug, Clone)]
pub struct SimGrid {
    rows: usize,
    cols: usize,
    entrance: GridPosition,
    slots: Vec<SimSlot>,
}

impl SimGrid {
    /// Build a grid with one free slot per cell, numbered row-major
    ///
    /// `rows * cols` must not overflow; [`LotConfig::validate`] bounds it.
    ///
    /// [`LotConfig::validate`]: super::config::LotConfig::validate
    pub fn new(rows: usize, cols: usize, entrance: GridPosition) -> Self {
        let slots = (0..rows * cols)
            .map(|i| SimSlot::new(SlotId(i), GridPosition::new(i / cols, i % cols)))
            .collect();

        Self {
            rows,
            cols,
            entrance,
            slots,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn entrance(&self) -> GridPosition {
        self.entrance
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[SimSlot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Option<&SimSlot> {
        self.slots.get(id.0)
    }

    pub fn slot_at(&self, position: GridPosition) -> Option<&SimSlot> {
        if position.row >= self.rows || position.col >= self.cols {
            return None;
        }
        self.slots.get(position.row * self.cols + position.col)
    }

    /// Free slots in enumeration order
    pub fn free_slots(&self) -> impl Iterator<Item = &SimSlot> {
        self.slots.iter().filter(|slot| !slot.is_occupied())
    }

    pub fn free_count(&self) -> usize {
        self.free_slots().count()
    }

    pub fn occupied_count(&self) -> usize {
        self.len() - self.free_count()
    }

    pub fn has_free_slot(&self) -> bool {
        self.slots.iter().any(|slot| !slot.is_occupied())
    }

    /// Fraction of slots currently occupied, in `[0, 1]`
    pub fn utilization(&self) -> f32 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.occupied_count() as f32 / self.len() as f32
    }

    /// Distance from the entrance to a slot
    pub fn distance_to(&self, slot: &SimSlot) -> f32 {
        slot.position.distance(&self.entrance)
    }

    pub fn snapshot(&self) -> Vec<SlotSnapshot> {
        self.slots.iter().map(SlotSnapshot::from).collect()
    }

    /// Park `car` in the slot. Fails if the slot is unknown or taken.
    pub(crate) fn occupy(&mut self, id: SlotId, car: SimCar) -> SimResult<()> {
        let slot = self.slots.get_mut(id.0).ok_or(SimError::UnknownSlot(id))?;
        if slot.is_occupied() {
            return Err(SimError::SlotOccupied(id));
        }
        slot.occupant = Some(car);
        Ok(())
    }

    /// Free the slot and hand back the car that was parked there
    pub(crate) fn vacate(&mut self, id: SlotId) -> SimResult<SimCar> {
        let slot = self.slots.get_mut(id.0).ok_or(SimError::UnknownSlot(id))?;
        slot.occupant.take().ok_or(SimError::SlotNotOccupied(id))
    }

    /// Free every slot
    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.occupant = None;
        }
    }
}

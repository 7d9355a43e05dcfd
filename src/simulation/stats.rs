//! Running statistics for the parking lot
//!
//! Averages are updated incrementally on each assignment; nothing is
//! recomputed from history.

use super::types::Tick;

/// Statistics snapshot handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimStats {
    /// Cars successfully parked since the last reset
    pub total_cars_parked: usize,

    /// Mean queue wait (in ticks) at the moment of assignment
    pub average_wait_ticks: f32,

    /// Mean distance from the entrance to the assigned slot
    pub average_distance: f32,

    /// Occupied slots / total slots, right now
    pub utilization: f32,
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one assignment into the running averages
    pub fn record_assignment(&mut self, wait_ticks: Tick, distance: f32) {
        let n = self.total_cars_parked as f32;
        let new_total = n + 1.0;
        self.average_wait_ticks = (self.average_wait_ticks * n + wait_ticks as f32) / new_total;
        self.average_distance = (self.average_distance * n + distance) / new_total;
        self.total_cars_parked += 1;
    }

    /// Recompute utilization from the current occupancy
    pub fn update_utilization(&mut self, occupied: usize, total: usize) {
        self.utilization = if total == 0 {
            0.0
        } else {
            occupied as f32 / total as f32
        };
    }

    pub fn utilization_percent(&self) -> f32 {
        self.utilization * 100.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Parked: {} | Avg wait: {:.1} ticks | Avg distance: {:.2} | Utilization: {:.0}%",
            self.total_cars_parked,
            self.average_wait_ticks,
            self.average_distance,
            self.utilization_percent()
        )
    }
}

//! FIFO queue of cars waiting for a slot

use std::collections::VecDeque;

use super::car::SimCar;
use super::types::{CarId, Tick};

/// Read-only view of one waiting car
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: CarId,
    pub wait_ticks: Tick,
}

/// Cars in arrival order
///
/// Only the head can be inspected or removed, and there is no way to reorder
/// cars once they are in.
#[derive(Debug, Clone, Default)]
pub struct CarQueue {
    cars: VecDeque<SimCar>,
}

impl CarQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, car: SimCar) {
        self.cars.push_back(car);
    }

    pub fn front(&self) -> Option<&SimCar> {
        self.cars.front()
    }

    pub fn dequeue_front(&mut self) -> Option<SimCar> {
        self.cars.pop_front()
    }

    /// Add one tick of waiting time to every queued car
    pub fn tick_wait(&mut self) {
        for car in &mut self.cars {
            car.wait_ticks += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimCar> {
        self.cars.iter()
    }

    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.cars
            .iter()
            .map(|car| QueueEntry {
                id: car.id,
                wait_ticks: car.wait_ticks,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.cars.clear();
    }
}

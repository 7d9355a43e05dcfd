//! The parking lot controller
//!
//! `SimLot` owns the grid, the queue and the statistics, and is the only
//! thing allowed to change them. Every operation takes `&mut self`, so
//! mutations are serialized by construction.
//!
//! An assignment cycle moves through `Selecting` and `Assigning` one
//! [`SimLot::step_cycle`] call at a time. Callers that want pacing (see
//! `SimClock`) wait between steps; callers that don't can use
//! [`SimLot::run_cycle`] or [`SimLot::process_queue`].

use log::{debug, error, info, warn};

use super::car::SimCar;
use super::config::LotConfig;
use super::error::{SimError, SimResult};
use super::events::SimEvent;
use super::grid::{SimGrid, SlotSnapshot};
use super::policy::{candidate_distances, select_slot, Selection};
use super::queue::{CarQueue, QueueEntry};
use super::stats::SimStats;
use super::types::{CarId, GridPosition, SlotId, Tick};

/// Where the lot is in its arrival/assignment state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing in flight
    Idle,
    /// A car is being created and queued
    Arriving,
    /// The free-slot set has been computed and is on display
    Selecting { candidates: Vec<SlotId> },
    /// The winning slot is on display and about to be committed
    Assigning { selection: Selection },
    /// Every slot is taken; arrivals are turned away until a release
    Full,
}

impl Phase {
    pub fn is_cycle_in_flight(&self) -> bool {
        matches!(self, Phase::Selecting { .. } | Phase::Assigning { .. })
    }
}

/// Outcome of a single [`SimLot::step_cycle`] call
#[derive(Debug, Clone, PartialEq)]
pub enum CycleStep {
    /// No cycle was in flight and none could start
    Nothing,
    /// A cycle started; this many free slots are candidates
    Started { candidates: usize },
    /// The policy picked a slot
    Selected(Selection),
    /// The head car was parked and the cycle is over
    Parked { car: CarId, selection: Selection },
}

/// The parking lot simulation state
#[derive(Debug, Clone)]
pub struct SimLot {
    config: LotConfig,
    grid: SimGrid,
    queue: CarQueue,
    stats: SimStats,
    phase: Phase,

    /// Next car id to hand out
    next_car_id: u64,

    /// Monotonic tick counter
    tick: Tick,

    /// Whether automatic arrivals are enabled
    auto_mode: bool,

    /// Notifications not yet collected by the presentation layer
    events: Vec<SimEvent>,
}

impl Default for SimLot {
    fn default() -> Self {
        Self::new_internal(LotConfig::default())
    }
}

impl SimLot {
    fn new_internal(config: LotConfig) -> Self {
        Self {
            grid: SimGrid::new(config.rows, config.cols, config.entrance),
            config,
            queue: CarQueue::new(),
            stats: SimStats::new(),
            phase: Phase::Idle,
            next_car_id: 1,
            tick: 0,
            auto_mode: false,
            events: Vec::new(),
        }
    }

    /// Create a lot from a configuration, rejecting invalid layouts
    pub fn new(config: LotConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::new_internal(config))
    }

    pub fn config(&self) -> &LotConfig {
        &self.config
    }

    pub fn grid(&self) -> &SimGrid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut SimGrid {
        &mut self.grid
    }

    pub fn queue(&self) -> &CarQueue {
        &self.queue
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    pub fn is_cycle_in_flight(&self) -> bool {
        self.phase.is_cycle_in_flight()
    }

    pub fn slots_snapshot(&self) -> Vec<SlotSnapshot> {
        self.grid.snapshot()
    }

    pub fn queue_snapshot(&self) -> Vec<QueueEntry> {
        self.queue.snapshot()
    }

    /// Slots the presentation layer should highlight right now
    pub fn highlighted_slots(&self) -> Vec<SlotId> {
        match &self.phase {
            Phase::Selecting { candidates } => candidates.clone(),
            Phase::Assigning { selection } => vec![selection.slot],
            _ => Vec::new(),
        }
    }

    /// Whether the distance overlay should be on
    pub fn show_distances(&self) -> bool {
        self.phase.is_cycle_in_flight()
    }

    /// Distance of every free slot, while the overlay is on
    pub fn distance_overlay(&self) -> Vec<(SlotId, f32)> {
        if !self.show_distances() {
            return Vec::new();
        }
        candidate_distances(self.grid.free_slots(), &self.grid.entrance())
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Hand over all pending notifications
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// `Full` when no slot is free, `Idle` otherwise
    fn settle(&mut self) {
        self.phase = if self.grid.has_free_slot() {
            Phase::Idle
        } else {
            Phase::Full
        };
    }

    fn next_car_id(&mut self) -> CarId {
        let id = CarId(self.next_car_id);
        self.next_car_id += 1;
        id
    }

    fn refresh_utilization(&mut self) {
        self.stats
            .update_utilization(self.grid.occupied_count(), self.grid.len());
    }

    /// Advance simulation time by one tick
    pub fn tick(&mut self) {
        self.tick += 1;
        self.queue.tick_wait();
        debug!("tick {} ({} cars waiting)", self.tick, self.queue.len());
    }

    /// A new car arrives and joins the back of the queue
    ///
    /// Turned away with [`SimError::CapacityExceeded`] when no slot is free;
    /// that also switches automatic arrivals off. Processing is not started
    /// here.
    pub fn add_car(&mut self) -> SimResult<CarId> {
        if !self.grid.has_free_slot() {
            warn!(
                "Parking lot full ({} slots), rejecting arrival",
                self.grid.len()
            );
            if !self.phase.is_cycle_in_flight() {
                self.phase = Phase::Full;
            }
            self.events.push(SimEvent::CapacityExceeded);
            self.set_auto_mode(false);
            return Err(SimError::CapacityExceeded);
        }

        let in_flight = self.phase.is_cycle_in_flight();
        if !in_flight {
            self.phase = Phase::Arriving;
        }

        let id = self.next_car_id();
        self.queue.enqueue(SimCar::new(id, self.tick));
        self.events.push(SimEvent::CarArrived { car: id });
        info!(
            "Car {} arrived at tick {} ({} waiting)",
            id,
            self.tick,
            self.queue.len()
        );

        if !in_flight {
            self.settle();
        }
        Ok(id)
    }

    /// Whether a new assignment cycle may start right now
    pub fn can_begin_cycle(&self) -> bool {
        self.phase == Phase::Idle && !self.queue.is_empty() && self.grid.has_free_slot()
    }

    /// Move the current assignment cycle forward by one stage
    ///
    /// `Idle` starts a cycle (if one may start), `Selecting` runs the policy
    /// and `Assigning` commits the car to its slot.
    pub fn step_cycle(&mut self) -> SimResult<CycleStep> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Selecting { candidates } => self.select(candidates),
            Phase::Assigning { selection } => self.commit(selection),
            other => {
                self.phase = other;
                if self.can_begin_cycle() {
                    Ok(self.begin())
                } else {
                    Ok(CycleStep::Nothing)
                }
            }
        }
    }

    fn begin(&mut self) -> CycleStep {
        let candidates: Vec<SlotId> = self.grid.free_slots().map(|slot| slot.id).collect();
        debug!(
            "Selecting a slot for car {:?} among {} free slots",
            self.queue.front().map(|car| car.id),
            candidates.len()
        );
        let count = candidates.len();
        self.phase = Phase::Selecting { candidates };
        CycleStep::Started { candidates: count }
    }

    fn select(&mut self, candidates: Vec<SlotId>) -> SimResult<CycleStep> {
        let slots = candidates.iter().filter_map(|id| self.grid.slot(*id));
        match select_slot(slots, &self.grid.entrance()) {
            Ok(selection) => {
                debug!(
                    "Nearest free slot is {} at {} (distance {:.2})",
                    selection.slot, selection.position, selection.distance
                );
                self.phase = Phase::Assigning { selection };
                Ok(CycleStep::Selected(selection))
            }
            Err(err) => {
                error!("Aborting assignment cycle: {}", err);
                self.settle();
                Err(err)
            }
        }
    }

    fn commit(&mut self, selection: Selection) -> SimResult<CycleStep> {
        let slot_free = self
            .grid
            .slot(selection.slot)
            .is_some_and(|slot| !slot.is_occupied());
        if !slot_free {
            error!(
                "Aborting assignment cycle: {} is no longer free",
                selection.slot
            );
            self.settle();
            return Err(SimError::SlotOccupied(selection.slot));
        }

        let Some(mut car) = self.queue.front().cloned() else {
            error!("Aborting assignment cycle: queue is empty");
            self.settle();
            return Ok(CycleStep::Nothing);
        };

        let car_id = car.id;
        let wait = car.wait_ticks;
        car.park(selection.slot, selection.distance);
        if let Err(err) = self.grid.occupy(selection.slot, car) {
            error!("Aborting assignment cycle: {}", err);
            self.settle();
            return Err(err);
        }
        // The head car now lives in its slot
        self.queue.dequeue_front();

        self.stats.record_assignment(wait, selection.distance);
        self.refresh_utilization();
        self.events.push(SimEvent::CarParked {
            car: car_id,
            slot: selection.slot,
            distance: selection.distance,
        });
        info!(
            "Car {} parked in {} at {} (distance {:.1}, waited {} ticks)",
            car_id, selection.slot, selection.position, selection.distance, wait
        );

        self.settle();
        Ok(CycleStep::Parked {
            car: car_id,
            selection,
        })
    }

    /// Run one full assignment cycle with no pauses between stages
    ///
    /// Finishes a cycle already in flight, or starts and finishes a new one.
    /// Returns the parked car, or `None` if there was nothing to do.
    pub fn run_cycle(&mut self) -> SimResult<Option<CarId>> {
        loop {
            match self.step_cycle()? {
                CycleStep::Nothing => return Ok(None),
                CycleStep::Parked { car, .. } => return Ok(Some(car)),
                CycleStep::Started { .. } | CycleStep::Selected(_) => {}
            }
        }
    }

    /// Park queued cars until the queue is empty or the lot is full
    pub fn process_queue(&mut self) -> SimResult<Vec<CarId>> {
        let mut parked = Vec::new();
        while let Some(car) = self.run_cycle()? {
            parked.push(car);
        }
        Ok(parked)
    }

    /// Free an occupied slot; the car parked there leaves the simulation
    ///
    /// Releasing a free or unknown slot does nothing and returns `Ok(None)`.
    /// Releases are refused while an assignment cycle is in flight.
    pub fn remove_car(&mut self, slot: SlotId) -> SimResult<Option<CarId>> {
        if self.phase.is_cycle_in_flight() {
            debug!("Ignoring release of {} during an assignment cycle", slot);
            return Err(SimError::CycleInFlight);
        }

        let car = match self.grid.vacate(slot) {
            Ok(car) => car,
            Err(err) => {
                debug!("Ignoring release: {}", err);
                return Ok(None);
            }
        };

        self.refresh_utilization();
        self.events.push(SimEvent::CarLeft { car: car.id, slot });
        info!("Car {} left {}", car.id, slot);

        self.settle();
        Ok(Some(car.id))
    }

    /// Switch automatic arrivals on or off; returns the new setting
    pub fn toggle_auto_mode(&mut self) -> bool {
        self.set_auto_mode(!self.auto_mode);
        self.auto_mode
    }

    pub fn set_auto_mode(&mut self, enabled: bool) {
        if self.auto_mode == enabled {
            return;
        }
        self.auto_mode = enabled;
        self.events.push(SimEvent::AutoModeChanged { enabled });
        info!(
            "Auto mode {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Clear the queue, free every slot and zero the statistics and clock
    ///
    /// Any cycle in flight is discarded and automatic arrivals stop.
    /// Notifications not yet drained are kept, followed by [`SimEvent::Reset`].
    pub fn reset(&mut self) {
        self.grid.clear();
        self.queue.clear();
        self.stats.reset();
        self.phase = Phase::Idle;
        self.next_car_id = 1;
        self.tick = 0;
        self.auto_mode = false;
        self.events.push(SimEvent::Reset);
        info!("Lot reset");
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Tick: {} | Phase: {} | Waiting: {} | Free: {}/{} | {}",
            self.tick,
            self.phase_name(),
            self.queue.len(),
            self.grid.free_count(),
            self.grid.len(),
            self.stats.summary()
        )
    }

    fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Idle => "idle",
            Phase::Arriving => "arriving",
            Phase::Selecting { .. } => "selecting",
            Phase::Assigning { .. } => "assigning",
            Phase::Full => "full",
        }
    }

    /// Draw the lot as text
    ///
    /// Parked cars show their id, highlighted free slots a `*`, other free
    /// slots a `.`; the entrance cell is bracketed.
    pub fn render_map(&self) -> String {
        let highlighted = self.highlighted_slots();
        let entrance = self.grid.entrance();
        let mut out = String::new();

        out.push_str("=== Parking Lot ===\n");
        out.push_str("Legend: [ ]=Entrance, .=Free, *=Highlighted, n=Parked car\n");
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let Some(slot) = self.grid.slot_at(GridPosition::new(row, col))
                else {
                    continue;
                };
                let label = match slot.occupant_id() {
                    Some(car) => car.0.to_string(),
                    None if highlighted.contains(&slot.id) => "*".to_string(),
                    None => ".".to_string(),
                };
                if slot.position == entrance {
                    out.push_str(&format!("{:>5}", format!("[{label}]")));
                } else {
                    out.push_str(&format!("{label:>5}"));
                }
            }
            out.push('\n');
        }

        if !self.queue.is_empty() {
            let waiting: Vec<String> = self
                .queue
                .iter()
                .map(|car| format!("{}({}t)", car.id, car.wait_ticks))
                .collect();
            out.push_str(&format!("Queue: {}\n", waiting.join(" ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_conflict_keeps_car_queued() {
        let mut lot = SimLot::new(LotConfig::new(1, 2)).unwrap();
        lot.add_car().unwrap();
        lot.step_cycle().unwrap();
        let CycleStep::Selected(selection) = lot.step_cycle().unwrap() else {
            panic!("expected a selection");
        };

        // Something else takes the chosen slot before the commit
        lot.grid
            .occupy(selection.slot, SimCar::new(CarId(99), 0))
            .unwrap();

        assert_eq!(
            lot.step_cycle(),
            Err(SimError::SlotOccupied(selection.slot))
        );
        assert_eq!(lot.queue.len(), 1);
        assert_eq!(lot.queue.front().map(|car| car.id), Some(CarId(1)));
        assert!(!lot.is_cycle_in_flight());
        assert_eq!(lot.stats.total_cars_parked, 0);

        // The car is still there for the next cycle
        assert_eq!(lot.run_cycle().unwrap(), Some(CarId(1)));
        assert_eq!(
            lot.grid.slot(SlotId(1)).and_then(|slot| slot.occupant_id()),
            Some(CarId(1))
        );
    }
}

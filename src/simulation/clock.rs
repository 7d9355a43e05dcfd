//! Timer-driven pacing around the lot
//!
//! `SimClock` plays the part of the browser timers in the interactive demo: a
//! tick timer, an automatic-arrival timer, and the pauses that keep each stage
//! of an assignment cycle on screen long enough to see. All of them run on a
//! virtual clock advanced with [`SimClock::advance`], one due timer at a time,
//! so the same inputs always produce the same sequence of lot operations.
//!
//! The pauses only delay when a transition happens. Which car goes to which
//! slot is decided entirely by [`SimLot`].

use std::time::Duration;

use log::{debug, warn};

use super::config::{LotConfig, Pacing};
use super::error::SimResult;
use super::events::SimEvent;
use super::lot::{Phase, SimLot};
use super::types::{CarId, SlotId};

/// The cycle stage currently waiting on a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// A car is queued and a slot is free; selection starts after the delay
    Process,
    /// Free slots are highlighted; the policy runs after the delay
    Select,
    /// The winner is highlighted; the car is parked after the delay
    Commit,
}

/// Which timer fired in one step of [`SimClock::advance`]
enum Due {
    Tick,
    AutoArrival,
    Stage,
}

/// A lot plus the timers that drive it
#[derive(Debug, Clone)]
pub struct SimClock {
    lot: SimLot,
    pacing: Pacing,

    /// Virtual time since creation or the last reset
    now: Duration,

    tick_elapsed: Duration,
    auto_elapsed: Duration,

    stage: Option<Stage>,
    stage_elapsed: Duration,
}

impl SimClock {
    pub fn new(config: LotConfig) -> SimResult<Self> {
        let lot = SimLot::new(config)?;
        Ok(Self::with_lot(lot))
    }

    /// Drive an existing lot with the pacing from its configuration
    pub fn with_lot(lot: SimLot) -> Self {
        let pacing = lot.config().pacing;
        Self {
            lot,
            pacing,
            now: Duration::ZERO,
            tick_elapsed: Duration::ZERO,
            auto_elapsed: Duration::ZERO,
            stage: None,
            stage_elapsed: Duration::ZERO,
        }
    }

    pub fn lot(&self) -> &SimLot {
        &self.lot
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn add_car(&mut self) -> SimResult<CarId> {
        self.lot.add_car()
    }

    pub fn remove_car(&mut self, slot: SlotId) -> SimResult<Option<CarId>> {
        self.lot.remove_car(slot)
    }

    pub fn toggle_auto_mode(&mut self) -> bool {
        self.lot.toggle_auto_mode()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.lot.drain_events()
    }

    /// Reset the lot and cancel every pending timer
    pub fn reset(&mut self) {
        self.lot.reset();
        self.now = Duration::ZERO;
        self.tick_elapsed = Duration::ZERO;
        self.auto_elapsed = Duration::ZERO;
        self.stage = None;
        self.stage_elapsed = Duration::ZERO;
    }

    fn current_stage(&self) -> Option<Stage> {
        match self.lot.phase() {
            Phase::Selecting { .. } => Some(Stage::Select),
            Phase::Assigning { .. } => Some(Stage::Commit),
            _ if self.lot.can_begin_cycle() => Some(Stage::Process),
            _ => None,
        }
    }

    fn stage_delay(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Process => self.pacing.process_delay,
            Stage::Select => self.pacing.selection_delay,
            Stage::Commit => self.pacing.commit_delay,
        }
    }

    /// Restart the stage timer whenever the pending stage changes
    fn sync_timers(&mut self) {
        let stage = self.current_stage();
        if stage != self.stage {
            self.stage = stage;
            self.stage_elapsed = Duration::ZERO;
        }
        if !self.lot.auto_mode() {
            self.auto_elapsed = Duration::ZERO;
        }
    }

    fn elapse(&mut self, delta: Duration) {
        self.now += delta;
        self.tick_elapsed += delta;
        if self.lot.auto_mode() {
            self.auto_elapsed += delta;
        }
        if self.stage.is_some() {
            self.stage_elapsed += delta;
        }
    }

    /// The next timer to fire and how long until it does
    ///
    /// Timers due at the same instant fire in the order tick, auto arrival,
    /// cycle stage. The stage timer is skipped when `stages` is false.
    fn next_due(&self, stages: bool) -> (Duration, Due) {
        let mut next = (
            self.pacing.tick_period.saturating_sub(self.tick_elapsed),
            Due::Tick,
        );
        if self.lot.auto_mode() {
            let wait = self
                .pacing
                .auto_arrival_period
                .saturating_sub(self.auto_elapsed);
            if wait < next.0 {
                next = (wait, Due::AutoArrival);
            }
        }
        if let Some(stage) = self.stage.filter(|_| stages) {
            let wait = self.stage_delay(stage).saturating_sub(self.stage_elapsed);
            if wait < next.0 {
                next = (wait, Due::Stage);
            }
        }
        next
    }

    /// Run the lot forward by `delta` of virtual time
    ///
    /// If a cycle stage fails, no further stages run until the next call;
    /// ticks and arrivals keep firing on schedule.
    pub fn advance(&mut self, delta: Duration) {
        let mut remaining = delta;
        let mut stages = true;
        loop {
            self.sync_timers();
            let (wait, due) = self.next_due(stages);
            if wait > remaining {
                self.elapse(remaining);
                return;
            }
            self.elapse(wait);
            remaining -= wait;

            match due {
                Due::Tick => {
                    self.tick_elapsed = Duration::ZERO;
                    self.lot.tick();
                }
                Due::AutoArrival => {
                    self.auto_elapsed = Duration::ZERO;
                    debug!("Automatic arrival attempt at {:?}", self.now);
                    // A full lot turns the arrival away and disables auto mode
                    let _ = self.lot.add_car();
                }
                Due::Stage => {
                    self.stage_elapsed = Duration::ZERO;
                    if let Err(err) = self.lot.step_cycle() {
                        warn!("Assignment cycle aborted: {}", err);
                        // A zero-delay stage that keeps failing would never let time pass
                        stages = false;
                    }
                }
            }
        }
    }

    /// Advance in `step` increments until `total` has elapsed
    pub fn run_for(&mut self, total: Duration, step: Duration) {
        if step.is_zero() {
            self.advance(total);
            return;
        }
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            let delta = step.min(total - elapsed);
            self.advance(delta);
            elapsed += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::car::SimCar;

    #[test]
    fn test_failed_stage_does_not_swallow_ticks() {
        let mut clock = SimClock::new(LotConfig::new(1, 2)).unwrap();
        clock.add_car().unwrap();
        clock.advance(Duration::from_millis(2000));
        let Phase::Assigning { selection } = clock.lot().phase().clone() else {
            panic!("expected an assignment on display");
        };
        assert_eq!(clock.lot().current_tick(), 2);

        // The chosen slot is taken before the commit fires at 2800ms
        clock
            .lot
            .grid_mut()
            .occupy(selection.slot, SimCar::new(CarId(99), 0))
            .unwrap();

        clock.advance(Duration::from_millis(3500));
        assert_eq!(clock.now(), Duration::from_millis(5500));
        assert_eq!(clock.lot().current_tick(), 5);
        assert_eq!(clock.lot().stats().total_cars_parked, 0);
        assert_eq!(clock.lot().queue().len(), 1);
        assert_eq!(
            clock.lot().grid().slot(selection.slot).map(|slot| slot.occupant_id()),
            Some(Some(CarId(99)))
        );

        // The next call picks the cycle up again
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.lot().current_tick(), 10);
        assert_eq!(clock.lot().stats().total_cars_parked, 1);
        assert!(clock.lot().queue().is_empty());
    }
}

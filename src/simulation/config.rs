//! Lot layout and pacing configuration

use std::time::Duration;

use super::error::{SimError, SimResult};
use super::types::{GridPosition, DEFAULT_COLS, DEFAULT_ENTRANCE, DEFAULT_ROWS};

/// Period of the simulation tick
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(1000);
/// Period between automatic arrival attempts
pub const DEFAULT_AUTO_ARRIVAL_PERIOD: Duration = Duration::from_millis(3000);
/// Pause between a car being ready for processing and selection starting
pub const DEFAULT_PROCESS_DELAY: Duration = Duration::from_millis(500);
/// How long the free-slot set stays highlighted
pub const DEFAULT_SELECTION_DELAY: Duration = Duration::from_millis(1500);
/// How long the winning slot stays highlighted before the car is parked
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(800);
/// Largest slot count a lot may be built with
pub const MAX_SLOTS: usize = 1 << 20;

/// Timer periods and presentation delays
///
/// The stage delays only control when a transition becomes visible. They never
/// change which slot a car ends up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub tick_period: Duration,
    pub auto_arrival_period: Duration,
    pub process_delay: Duration,
    pub selection_delay: Duration,
    pub commit_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            auto_arrival_period: DEFAULT_AUTO_ARRIVAL_PERIOD,
            process_delay: DEFAULT_PROCESS_DELAY,
            selection_delay: DEFAULT_SELECTION_DELAY,
            commit_delay: DEFAULT_COMMIT_DELAY,
        }
    }
}

impl Pacing {
    /// Default timer periods with every stage delay collapsed to zero
    pub fn instant() -> Self {
        Self {
            process_delay: Duration::ZERO,
            selection_delay: Duration::ZERO,
            commit_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Everything needed to build a lot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotConfig {
    pub rows: usize,
    pub cols: usize,
    pub entrance: GridPosition,
    pub pacing: Pacing,
}

impl Default for LotConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            entrance: DEFAULT_ENTRANCE,
            pacing: Pacing::default(),
        }
    }
}

impl LotConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn with_entrance(mut self, entrance: GridPosition) -> Self {
        self.entrance = entrance;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Number of slots the grid will hold, `None` if `rows * cols` overflows
    pub fn total_slots(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimError::InvalidConfig(format!(
                "grid must have at least one row and one column, got {}x{}",
                self.rows, self.cols
            )));
        }
        match self.total_slots() {
            Some(total) if total <= MAX_SLOTS => {}
            _ => {
                return Err(SimError::InvalidConfig(format!(
                    "a {}x{} grid exceeds the limit of {} slots",
                    self.rows, self.cols, MAX_SLOTS
                )))
            }
        }
        if self.entrance.row >= self.rows || self.entrance.col >= self.cols {
            return Err(SimError::InvalidConfig(format!(
                "entrance {} lies outside the {}x{} grid",
                self.entrance, self.rows, self.cols
            )));
        }
        if self.pacing.tick_period.is_zero() {
            return Err(SimError::InvalidConfig("tick period must be positive".into()));
        }
        if self.pacing.auto_arrival_period.is_zero() {
            return Err(SimError::InvalidConfig(
                "auto arrival period must be positive".into(),
            ));
        }
        Ok(())
    }
}

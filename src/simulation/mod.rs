//! Standalone parking simulation module
//!
//! This module contains the assignment and queueing engine. It has no
//! presentation code of its own: a front end (such as the headless CLI in
//! `main.rs`) calls the trigger methods and renders the snapshots.

mod car;
mod clock;
mod config;
mod error;
mod events;
mod grid;
mod lot;
mod policy;
mod queue;
mod stats;
mod types;

pub use car::SimCar;
pub use clock::SimClock;
pub use config::{
    LotConfig, Pacing, DEFAULT_AUTO_ARRIVAL_PERIOD, DEFAULT_COMMIT_DELAY, DEFAULT_PROCESS_DELAY,
    DEFAULT_SELECTION_DELAY, DEFAULT_TICK_PERIOD, MAX_SLOTS,
};
pub use error::{SimError, SimResult};
pub use events::SimEvent;
pub use grid::{SimGrid, SimSlot, SlotSnapshot};
pub use lot::{CycleStep, Phase, SimLot};
pub use policy::{candidate_distances, select_slot, Selection};
pub use queue::{CarQueue, QueueEntry};
pub use stats::SimStats;
pub use types::{
    CarId, GridPosition, SlotId, Tick, DEFAULT_COLS, DEFAULT_ENTRANCE, DEFAULT_ROWS,
};

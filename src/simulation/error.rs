//! Error type shared by every lot operation

use thiserror::Error;

use super::types::SlotId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("parking lot full: no free slot for a new car")]
    CapacityExceeded,

    #[error("no candidate slot to choose from")]
    NoCandidateSlot,

    #[error("{0} does not exist")]
    UnknownSlot(SlotId),

    #[error("{0} is already occupied")]
    SlotOccupied(SlotId),

    #[error("{0} is not occupied")]
    SlotNotOccupied(SlotId),

    #[error("an assignment cycle is already in flight")]
    CycleInFlight,

    #[error("invalid lot configuration: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;

//! Parking Simulation Library
//!
//! Nearest-slot assignment for an educational parking-lot simulation. Cars
//! queue in arrival order and each one is parked in the free slot closest to
//! the entrance.

pub mod simulation;

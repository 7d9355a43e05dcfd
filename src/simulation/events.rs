//! Notifications emitted by the lot for the presentation layer

use std::fmt;

use super::types::{CarId, SlotId};

/// Something the presentation layer may want to tell the user about
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A car joined the queue
    CarArrived { car: CarId },
    /// A car was parked in its nearest free slot
    CarParked {
        car: CarId,
        slot: SlotId,
        distance: f32,
    },
    /// A car left its slot
    CarLeft { car: CarId, slot: SlotId },
    /// An arrival was turned away because every slot is taken
    CapacityExceeded,
    /// Automatic arrivals were switched on or off
    AutoModeChanged { enabled: bool },
    /// The whole lot was reset
    Reset,
}

impl SimEvent {
    /// Short headline, the way a toast would show it
    pub fn title(&self) -> &'static str {
        match self {
            SimEvent::CarArrived { .. } => "Car Arrived",
            SimEvent::CarParked { .. } => "Car Parked!",
            SimEvent::CarLeft { .. } => "Car Left",
            SimEvent::CapacityExceeded => "Parking Lot Full",
            SimEvent::AutoModeChanged { enabled: true } => "Auto Mode On",
            SimEvent::AutoModeChanged { enabled: false } => "Auto Mode Off",
            SimEvent::Reset => "Demo Reset",
        }
    }

    pub fn description(&self) -> String {
        match self {
            SimEvent::CarArrived { car } => format!("Car {car} joined the queue"),
            SimEvent::CarParked { car, distance, .. } => format!(
                "Car {car} assigned to nearest slot (distance: {distance:.1})"
            ),
            SimEvent::CarLeft { car, .. } => format!("Car {car} has left the parking lot"),
            SimEvent::CapacityExceeded => {
                "No available slots. Please reset to continue.".to_string()
            }
            SimEvent::AutoModeChanged { enabled: true } => {
                "Cars will arrive automatically".to_string()
            }
            SimEvent::AutoModeChanged { enabled: false } => {
                "Automatic arrivals stopped".to_string()
            }
            SimEvent::Reset => "Ready for a fresh demonstration".to_string(),
        }
    }

    /// Whether the event reports a problem rather than progress
    pub fn is_destructive(&self) -> bool {
        matches!(self, SimEvent::CapacityExceeded)
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

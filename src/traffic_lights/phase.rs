use crate::map::position::Axis;
use std::fmt;

/// The two green phases of the crossing signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPhase {
    /// North-south traffic flows, east-west waits.
    NsGreen,
    /// East-west traffic flows, north-south waits.
    EwGreen,
}

impl LightPhase {
    /// The axis that currently has the green.
    pub fn axis(self) -> Axis {
        match self {
            LightPhase::NsGreen => Axis::NorthSouth,
            LightPhase::EwGreen => Axis::EastWest,
        }
    }

    /// The other phase.
    pub fn toggled(self) -> LightPhase {
        match self {
            LightPhase::NsGreen => LightPhase::EwGreen,
            LightPhase::EwGreen => LightPhase::NsGreen,
        }
    }
}

impl fmt::Display for LightPhase {
    /// Formats the phase for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crossroads_sim_core::traffic_lights::LightPhase;
    ///
    /// assert_eq!(format!("{}", LightPhase::NsGreen), "ns_green");
    /// assert_eq!(format!("{}", LightPhase::EwGreen), "ew_green");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightPhase::NsGreen => write!(f, "ns_green"),
            LightPhase::EwGreen => write!(f, "ew_green"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_involutive() {
        assert_eq!(LightPhase::NsGreen.toggled(), LightPhase::EwGreen);
        assert_eq!(LightPhase::EwGreen.toggled().toggled(), LightPhase::EwGreen);
    }

    #[test]
    fn test_axes() {
        assert_eq!(LightPhase::NsGreen.axis(), Axis::NorthSouth);
        assert_eq!(LightPhase::EwGreen.axis(), Axis::EastWest);
    }
}

//! Power Switching
//!
//! The instrument's power output latch. The latch itself is plain on/off
//! state; the physical output uses inverted logic (asserted-low means
//! powered) which lives entirely in the HAL implementation of
//! [`PowerLine`]. The OFF→ON edge is reported to the caller because it
//! carries a side effect: the controller drops back to single-step mode.

/// Hardware-facing side of the power latch
pub trait PowerLine {
    /// Reflect the latch state on the power output line
    fn set_power_enabled(&mut self, on: bool);
}

/// The power output latch
#[derive(Clone, Copy, Debug, Default)]
pub struct PowerSwitch {
    on: bool,
}

impl PowerSwitch {
    /// Create the latch in its powered-off default
    #[must_use]
    pub const fn new() -> Self {
        Self { on: false }
    }

    /// Check whether power is on
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }

    /// Set the latch, returning true on the OFF→ON edge
    pub fn set(&mut self, on: bool, line: &mut impl PowerLine) -> bool {
        let turned_on = !self.on && on;
        self.on = on;
        line.set_power_enabled(on);
        turned_on
    }

    /// Flip the latch, returning true on the OFF→ON edge
    pub fn toggle(&mut self, line: &mut impl PowerLine) -> bool {
        let next = !self.on;
        self.set(next, line)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PowerSwitch {
    fn format(&self, f: defmt::Formatter) {
        if self.on {
            defmt::write!(f, "ON");
        } else {
            defmt::write!(f, "OFF");
        }
    }
}

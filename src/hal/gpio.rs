//! GPIO Abstractions
//!
//! Type-safe wrappers for the front-panel buttons, the indicator LEDs,
//! and the reset/power output lines.

use embassy_rp::gpio::{Input, Output};

use crate::clock::controller::{ButtonLevels, LedSnapshot};

/// A single indicator LED
pub struct StatusLed<'d> {
    pin: Output<'d>,
}

impl<'d> StatusLed<'d> {
    /// Wrap an output pin (caller picks the initial level)
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }

    /// Drive the LED
    pub fn set(&mut self, lit: bool) {
        if lit {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

/// The front-panel buttons, active low with pull-ups
pub struct Buttons<'d> {
    /// Button 1: single step / manual toggle
    pub single_step: Input<'d>,
    /// Button 2: low-frequency mode
    pub low_freq: Input<'d>,
    /// Button 3: high-frequency mode
    pub high_freq: Input<'d>,
    /// Dedicated reset pulse button
    pub reset: Input<'d>,
    /// Dedicated power toggle button
    pub power: Input<'d>,
}

impl Buttons<'_> {
    /// Sample every button level once
    #[must_use]
    pub fn levels(&self) -> ButtonLevels {
        ButtonLevels {
            single_step: self.single_step.is_low(),
            low_freq: self.low_freq.is_low(),
            high_freq: self.high_freq.is_low(),
            reset: self.reset.is_low(),
            power: self.power.is_low(),
        }
    }
}

/// The indicator LED bank
///
/// Every LED is a pure function of the controller's state; the bank just
/// copies the snapshot out to the pins. The clock activity LED lives with
/// the signal task instead, so it can follow software toggling.
pub struct LedBank<'d> {
    /// Single step mode indicator
    pub single_step: StatusLed<'d>,
    /// Low-frequency mode indicator
    pub low_freq: StatusLed<'d>,
    /// High-frequency mode indicator
    pub high_freq: StatusLed<'d>,
    /// Remote-control mode indicator
    pub remote: StatusLed<'d>,
    /// Lit while the reset output is held low
    pub reset_low: StatusLed<'d>,
    /// Lit briefly when a reset pulse completes
    pub reset_done: StatusLed<'d>,
    /// Lit while the power latch is on
    pub power_on: StatusLed<'d>,
}

impl LedBank<'_> {
    /// Copy a controller snapshot out to the pins
    pub fn show(&mut self, snapshot: &LedSnapshot) {
        self.single_step.set(snapshot.single_step);
        self.low_freq.set(snapshot.low_freq);
        self.high_freq.set(snapshot.high_freq);
        self.remote.set(snapshot.remote);
        self.reset_low.set(snapshot.reset_low);
        self.reset_done.set(snapshot.reset_done);
        self.power_on.set(snapshot.power_on);
    }
}

/// The reset output line, idle high
pub struct ResetOutput<'d> {
    pin: Output<'d>,
}

impl<'d> ResetOutput<'d> {
    /// Wrap the reset pin (construct with the line high)
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }

    /// Drive the line
    pub fn set_level(&mut self, high: bool) {
        if high {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

/// The power output line
///
/// Inverted logic: the load is powered while the pin is low. The latch's
/// plain on/off semantics stay in `power::PowerSwitch`; only this wrapper
/// knows the polarity.
pub struct PowerOutput<'d> {
    pin: Output<'d>,
}

impl<'d> PowerOutput<'d> {
    /// Wrap the power pin (construct with the line high, i.e. off)
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }

    /// Reflect the latch state on the line
    pub fn set_enabled(&mut self, on: bool) {
        if on {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }
}

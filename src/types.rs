//! Shared types used across the clock source firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// Frequency in Hertz with validation
///
/// Represents a valid output frequency within the instrument's range.
/// The frequency is stored in Hz for precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u32);

impl Frequency {
    /// Minimum supported frequency (1 Hz)
    pub const MIN_HZ: u32 = 1;

    /// Maximum supported frequency (1 MHz)
    pub const MAX_HZ: u32 = 1_000_000;

    /// Create a new Frequency from Hz, returns None if out of range
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        if hz >= Self::MIN_HZ && hz <= Self::MAX_HZ {
            Some(Self(hz))
        } else {
            None
        }
    }

    /// Create a new Frequency from kHz
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        Self::from_hz(khz * 1000)
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        self.0
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0 / 1000
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} Hz)", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.0);
    }
}

/// Operating mode for the clock source
///
/// Exactly one mode is active at any instant; the mode is mutated only by
/// the controller's transition logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Manual single-step toggling via the front-panel button
    #[default]
    SingleStep,
    /// Potentiometer-controlled output, 1 Hz to 100 kHz
    LowFrequency,
    /// Fixed 1 MHz output
    HighFrequency,
    /// Line-oriented control over the console UART
    Remote,
}

impl ClockMode {
    /// Human-readable mode name as printed in the status block
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SingleStep => "Single Step",
            Self::LowFrequency => "Low Frequency",
            Self::HighFrequency => "High Frequency",
            Self::Remote => "UART Control",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SingleStep => defmt::write!(f, "SINGLE-STEP"),
            Self::LowFrequency => defmt::write!(f, "LOW-FREQ"),
            Self::HighFrequency => defmt::write!(f, "HIGH-FREQ"),
            Self::Remote => defmt::write!(f, "REMOTE"),
        }
    }
}

/// How the clock output line is currently being driven
///
/// The synthesizer guarantees at most one method is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GenerationMethod {
    /// No periodic generation; the line holds a static level
    #[default]
    Idle,
    /// Periodic toggling by a scheduled software timer
    SoftwareToggle,
    /// Free-running hardware PWM at 50% duty
    HardwarePwm,
}

impl GenerationMethod {
    /// Check whether a periodic source is driving the line
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for GenerationMethod {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::SoftwareToggle => defmt::write!(f, "SOFT-TOGGLE"),
            Self::HardwarePwm => defmt::write!(f, "PWM"),
        }
    }
}

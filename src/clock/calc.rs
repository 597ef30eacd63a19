//! PWM Timing Calculation
//!
//! Solves the RP2040 PWM slice parameters (clock divider, wrap count, and
//! compare level) for a target output frequency, and maps raw potentiometer
//! samples onto the low-frequency tuning range. This module is testable on
//! the host.
//!
//! # Theory of Operation
//!
//! The PWM slice counts the 125 MHz reference clock down through an 8-bit
//! divider and a 16-bit wrap counter:
//!
//! `f_out = R / (divider * (wrap + 1))`
//!
//! with `level = wrap / 2` for a 50% duty cycle. Two independent solvers
//! exist on purpose: [`banded_params`] serves the potentiometer-driven path
//! with fixed per-band trade-offs, while [`free_running_params`] serves the
//! remote `freq` command by reshaping a seeded wrap until the divider fits.
//! Their outputs differ at the same target frequency; both behaviors are
//! load-bearing and separately tested.

use crate::config::{
    HIGH_FREQ_DIVIDER, HIGH_FREQ_WRAP, MIN_LOW_FREQ_HZ, POT_FULL_SCALE, POT_RANGE1_MAX_HZ,
    POT_RANGE1_TOP, POT_RANGE2_MAX_HZ, SYSTEM_CLOCK_HZ,
};

/// PWM slice parameters for one output frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DutyParams {
    /// Reference clock divider. The slice accepts 1-255; the banded solver
    /// can produce larger values for targets just above 1 kHz, which the
    /// hardware layer clamps when programming (the slice then runs at its
    /// maximum division).
    pub divider: u32,
    /// Wrap count; the counter runs 0..=wrap
    pub wrap: u16,
    /// Compare level for 50% duty
    pub level: u16,
}

impl DutyParams {
    /// Smallest divider the slice accepts
    pub const MIN_DIVIDER: u32 = 1;
    /// Largest divider the slice accepts
    pub const MAX_DIVIDER: u32 = 255;
    /// Largest wrap count the slice accepts
    pub const MAX_WRAP: u16 = 65535;

    /// Create parameters from raw values
    #[must_use]
    pub const fn new(divider: u32, wrap: u16, level: u16) -> Self {
        Self {
            divider,
            wrap,
            level,
        }
    }

    /// Reconstruct the output frequency these parameters produce
    #[must_use]
    pub fn output_frequency(&self) -> u32 {
        let counts = u64::from(self.divider) * (u64::from(self.wrap) + 1);
        (u64::from(SYSTEM_CLOCK_HZ) / counts) as u32
    }

    /// Check the divider sits inside the hardware range
    #[must_use]
    pub const fn is_hardware_exact(&self) -> bool {
        self.divider >= Self::MIN_DIVIDER && self.divider <= Self::MAX_DIVIDER
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DutyParams {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "div={} wrap={} level={}", self.divider, self.wrap, self.level);
    }
}

/// Constant parameter pair for the fixed high-frequency mode
///
/// 125 MHz / (125 * (1 + 1)) = exactly 1 MHz; neither solver is consulted.
pub const HIGH_SPEED_PARAMS: DutyParams = DutyParams {
    divider: HIGH_FREQ_DIVIDER,
    wrap: HIGH_FREQ_WRAP,
    level: 1,
};

/// Banded PWM solver for the potentiometer-driven and mode-entry paths
///
/// Policy by frequency band:
/// - below 8 Hz: maximum divider and wrap, the slowest representable rate
///   (~7.5 Hz); lower targets alias to this floor
/// - 8 Hz to 1 kHz: divider pinned at 255, wrap solved and clamped
/// - 1 kHz and up: wrap pinned at 124 for duty resolution, divider solved;
///   if the divider would fall below 1 the wrap is re-solved at divider 1
#[must_use]
pub fn banded_params(target_hz: u32) -> DutyParams {
    let r = u64::from(SYSTEM_CLOCK_HZ);

    if target_hz < 8 {
        let wrap = DutyParams::MAX_WRAP;
        return DutyParams::new(DutyParams::MAX_DIVIDER, wrap, wrap / 2);
    }

    if target_hz < 1000 {
        let counts = r / (255 * u64::from(target_hz));
        let wrap = (counts - 1).min(u64::from(DutyParams::MAX_WRAP)) as u16;
        return DutyParams::new(255, wrap, wrap / 2);
    }

    // Wrap 124 keeps 125 duty steps per cycle
    let wrap: u16 = 124;
    let divider = (r / (u64::from(target_hz) * 125)) as u32;
    if divider >= 1 {
        return DutyParams::new(divider, wrap, wrap / 2);
    }

    // Target above what wrap 124 can reach at divider 1
    let wrap = (r / u64::from(target_hz))
        .saturating_sub(1)
        .min(u64::from(DutyParams::MAX_WRAP)) as u16;
    DutyParams::new(1, wrap, wrap / 2)
}

/// Free-running PWM solver for the remote `freq` command
///
/// Seeds the wrap at 1000 for duty resolution, then reshapes: if the
/// divider overflows 255 the wrap is re-solved for divider 255; if the
/// divider underflows 1 the wrap absorbs the whole division at divider 1.
/// The wrap never drops below 2 so a 50% level always exists.
#[must_use]
pub fn free_running_params(target_hz: u32) -> DutyParams {
    let r = u64::from(SYSTEM_CLOCK_HZ);
    let target = u64::from(target_hz.max(1));

    let mut wrap: u16 = 1000;
    let mut divider = (r / (target * (u64::from(wrap) + 1))) as u32;

    if divider > 255 {
        wrap = (r / (target * 255))
            .saturating_sub(1)
            .min(u64::from(DutyParams::MAX_WRAP))
            .max(1) as u16;
        divider = (r / (target * (u64::from(wrap) + 1))) as u32;
    }

    if divider < 1 {
        wrap = (r / target)
            .saturating_sub(1)
            .min(u64::from(DutyParams::MAX_WRAP)) as u16;
        divider = 1;
    }

    let wrap = wrap.max(2);
    DutyParams::new(divider, wrap, wrap / 2)
}

/// Map a raw 12-bit potentiometer sample onto the tuning range
///
/// Piecewise-linear over two named sub-ranges: the lowest 20% of travel
/// spans 1-100 Hz, the remaining 80% spans 100 Hz-100 kHz. A sample
/// exactly at the split belongs to the first branch.
#[must_use]
pub fn frequency_from_pot(adc_value: u16) -> u32 {
    let adc_value = adc_value.min(POT_FULL_SCALE);

    if adc_value <= POT_RANGE1_TOP {
        let span = POT_RANGE1_MAX_HZ - MIN_LOW_FREQ_HZ;
        MIN_LOW_FREQ_HZ + (u32::from(adc_value) * span) / u32::from(POT_RANGE1_TOP)
    } else {
        let scaled = u32::from(adc_value - POT_RANGE1_TOP);
        let span = POT_RANGE2_MAX_HZ - POT_RANGE1_MAX_HZ;
        let range = u32::from(POT_FULL_SCALE - POT_RANGE1_TOP);
        POT_RANGE1_MAX_HZ + (scaled * span) / range
    }
}

//! Signal Synthesizer
//!
//! Owns the clock output state and guarantees that at most one generation
//! method drives the line at a time. Targets below the PWM floor are
//! produced by scheduled software toggling; everything else is handed to
//! the PWM slice. Hardware effects go through the [`SignalSink`] seam so
//! the synthesizer runs unchanged on the host.

use crate::clock::calc::{self, DutyParams, HIGH_SPEED_PARAMS};
use crate::config::{HIGH_FREQ_OUTPUT_HZ, SOFT_TOGGLE_CEILING_HZ};
use crate::types::{Frequency, GenerationMethod};

/// Hardware-facing side of the synthesizer
///
/// Implemented by the board layer on the device and by test doubles on the
/// host. Cancellation is synchronous: when a method returns, the previous
/// generation source is no longer running.
pub trait SignalSink {
    /// Drive the clock line to a static level
    fn set_level(&mut self, high: bool);
    /// Begin periodic software toggling at the given half-period
    fn start_toggle(&mut self, half_period_us: u32);
    /// Begin free-running hardware PWM
    fn start_pwm(&mut self, params: DutyParams);
    /// Cancel any periodic source without touching the line level
    fn stop_generation(&mut self);
}

/// Snapshot of the output line's logical state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalState {
    /// Level of the line as last driven by this core (authoritative only
    /// while no background source is toggling it)
    pub is_high: bool,
    /// Advisory output frequency in Hz, 0 when idle
    pub frequency_hz: u32,
    /// Active generation method
    pub method: GenerationMethod,
}

/// The signal synthesizer
#[derive(Clone, Copy, Debug, Default)]
pub struct Synthesizer {
    state: SignalState,
}

impl Synthesizer {
    /// Create an idle synthesizer with the line low
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SignalState {
                is_high: false,
                frequency_hz: 0,
                method: GenerationMethod::Idle,
            },
        }
    }

    /// Current signal state
    #[must_use]
    pub const fn state(&self) -> SignalState {
        self.state
    }

    /// Level of the output line as last driven by this core
    #[must_use]
    pub const fn is_high(&self) -> bool {
        self.state.is_high
    }

    /// Advisory output frequency in Hz, 0 when idle
    #[must_use]
    pub const fn frequency_hz(&self) -> u32 {
        self.state.frequency_hz
    }

    /// Active generation method
    #[must_use]
    pub const fn method(&self) -> GenerationMethod {
        self.state.method
    }

    /// Retune to a target frequency on the banded path
    ///
    /// Zero stops output. Targets below the PWM floor get software
    /// toggling at half the signal period; the rest go to the PWM slice
    /// via [`calc::banded_params`]. The previous source is cancelled
    /// before the new one starts.
    pub fn set_frequency(&mut self, target_hz: u32, sink: &mut impl SignalSink) {
        if target_hz == 0 {
            self.stop(sink);
            self.state.frequency_hz = 0;
            return;
        }

        sink.stop_generation();
        self.state.frequency_hz = target_hz;

        if target_hz < SOFT_TOGGLE_CEILING_HZ {
            let half_period_us = 1_000_000 / (target_hz * 2);
            sink.start_toggle(half_period_us);
            self.state.method = GenerationMethod::SoftwareToggle;
        } else {
            sink.start_pwm(calc::banded_params(target_hz));
            self.state.method = GenerationMethod::HardwarePwm;
        }
    }

    /// Start the fixed 1 MHz output, bypassing the solvers
    pub fn set_fixed_high_speed(&mut self, sink: &mut impl SignalSink) {
        sink.stop_generation();
        self.state.frequency_hz = HIGH_FREQ_OUTPUT_HZ;
        self.state.method = GenerationMethod::HardwarePwm;
        sink.start_pwm(HIGH_SPEED_PARAMS);
    }

    /// Start hardware generation for a remote-commanded frequency
    ///
    /// Uses the free-running solver; the remote path always generates by
    /// PWM, down to 1 Hz (sub-floor targets alias upward in hardware).
    pub fn set_remote_frequency(&mut self, target: Frequency, sink: &mut impl SignalSink) {
        sink.stop_generation();
        self.state.frequency_hz = target.as_hz();
        self.state.method = GenerationMethod::HardwarePwm;
        sink.start_pwm(calc::free_running_params(target.as_hz()));
    }

    /// Perform one manual transition of the output line
    pub fn toggle_once(&mut self, sink: &mut impl SignalSink) {
        self.state.is_high = !self.state.is_high;
        sink.set_level(self.state.is_high);
    }

    /// Stop generation and release the line to a quiescent low
    ///
    /// Idempotent; the advisory frequency is left for the caller to reset
    /// or reuse.
    pub fn stop(&mut self, sink: &mut impl SignalSink) {
        sink.stop_generation();
        sink.set_level(false);
        self.state.is_high = false;
        self.state.method = GenerationMethod::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        level: Option<bool>,
        toggle_half_period: Option<u32>,
        pwm: Option<DutyParams>,
        stops: u32,
    }

    impl SignalSink for RecordingSink {
        fn set_level(&mut self, high: bool) {
            self.level = Some(high);
        }
        fn start_toggle(&mut self, half_period_us: u32) {
            self.toggle_half_period = Some(half_period_us);
        }
        fn start_pwm(&mut self, params: DutyParams) {
            self.pwm = Some(params);
        }
        fn stop_generation(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn sub_floor_targets_use_software_toggle() {
        let mut sink = RecordingSink::default();
        let mut synth = Synthesizer::new();
        synth.set_frequency(2, &mut sink);
        assert_eq!(synth.method(), GenerationMethod::SoftwareToggle);
        assert_eq!(sink.toggle_half_period, Some(250_000));
        assert!(sink.pwm.is_none());
    }

    #[test]
    fn floor_and_above_use_pwm() {
        let mut sink = RecordingSink::default();
        let mut synth = Synthesizer::new();
        synth.set_frequency(8, &mut sink);
        assert_eq!(synth.method(), GenerationMethod::HardwarePwm);
        assert!(sink.pwm.is_some());
        assert!(sink.toggle_half_period.is_none());
    }

    #[test]
    fn zero_stops_and_clears_frequency() {
        let mut sink = RecordingSink::default();
        let mut synth = Synthesizer::new();
        synth.set_frequency(500, &mut sink);
        synth.set_frequency(0, &mut sink);
        assert_eq!(synth.frequency_hz(), 0);
        assert_eq!(synth.method(), GenerationMethod::Idle);
        assert_eq!(sink.level, Some(false));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut sink = RecordingSink::default();
        let mut synth = Synthesizer::new();
        synth.set_fixed_high_speed(&mut sink);
        synth.stop(&mut sink);
        synth.stop(&mut sink);
        assert_eq!(synth.method(), GenerationMethod::Idle);
        assert!(!synth.is_high());
    }

    #[test]
    fn toggle_once_flips_level() {
        let mut sink = RecordingSink::default();
        let mut synth = Synthesizer::new();
        synth.toggle_once(&mut sink);
        assert!(synth.is_high());
        assert_eq!(sink.level, Some(true));
        synth.toggle_once(&mut sink);
        assert!(!synth.is_high());
    }
}

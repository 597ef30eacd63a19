//! Board Seam Implementation
//!
//! Binds the decision core's trait seams to the real hardware: signal
//! commands go to the signal task's queue, the reset and power lines are
//! driven directly, and the potentiometer reads come from the sampler's
//! atomic.

use crate::clock::calc::DutyParams;
use crate::clock::controller::Board;
use crate::clock::reset::ResetLine;
use crate::clock::synth::SignalSink;
use crate::hal::adc::latest_pot_sample;
use crate::hal::gpio::{PowerOutput, ResetOutput};
use crate::hal::signal::{SignalCommand, SignalSender};
use crate::power::PowerLine;

/// The assembled board seam handed to the controller
pub struct PicoBoard {
    signal: SignalSender,
    reset_line: ResetOutput<'static>,
    power_line: PowerOutput<'static>,
}

impl PicoBoard {
    /// Assemble the seam from its hardware halves
    #[must_use]
    pub fn new(
        signal: SignalSender,
        reset_line: ResetOutput<'static>,
        power_line: PowerOutput<'static>,
    ) -> Self {
        Self {
            signal,
            reset_line,
            power_line,
        }
    }

    fn send(&mut self, command: SignalCommand) {
        // The queue outruns anything a 10 ms poll can produce; a full
        // queue means the signal task died, which panic-probe reports
        if self.signal.try_send(command).is_err() {
            defmt::warn!("signal queue full, dropping {}", command);
        }
    }
}

impl SignalSink for PicoBoard {
    fn set_level(&mut self, high: bool) {
        self.send(SignalCommand::SetLevel(high));
    }

    fn start_toggle(&mut self, half_period_us: u32) {
        self.send(SignalCommand::StartToggle(half_period_us));
    }

    fn start_pwm(&mut self, params: DutyParams) {
        self.send(SignalCommand::StartPwm(params));
    }

    fn stop_generation(&mut self) {
        self.send(SignalCommand::StopGeneration);
    }
}

impl ResetLine for PicoBoard {
    fn set_reset_level(&mut self, high: bool) {
        self.reset_line.set_level(high);
    }
}

impl PowerLine for PicoBoard {
    fn set_power_enabled(&mut self, on: bool) {
        self.power_line.set_enabled(on);
    }
}

impl Board for PicoBoard {
    fn read_pot(&mut self) -> u16 {
        latest_pot_sample()
    }
}

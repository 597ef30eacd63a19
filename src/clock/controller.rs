//! Mode Controller
//!
//! The owned context object the polling shell drives. Holds the active
//! mode and every component that reads it; all mode transitions funnel
//! through [`Controller::set_mode`], which runs to completion before any
//! other component can observe the new mode.
//!
//! Text produced for the operator accumulates in two bounded buffers (the
//! console stream and the status mirror) which the shell drains once per
//! poll; the core never blocks on I/O.

use core::fmt::Write;

use heapless::String;

use crate::clock::calc;
use crate::clock::remote::RemoteSession;
use crate::clock::reset::{ResetLine, ResetSequencer};
use crate::clock::synth::{SignalSink, Synthesizer};
use crate::config::{CONSOLE_BUFFER_SIZE, HIGH_FREQ_OUTPUT_HZ, MIRROR_BUFFER_SIZE};
use crate::input::{ButtonId, DebounceTracker};
use crate::power::{PowerLine, PowerSwitch};
use crate::protocol::{self, Command, InputEvent, PROMPT};
use crate::status::{write_status, StatusSnapshot};
use crate::types::{ClockMode, Frequency, GenerationMethod};

/// Everything the controller needs from the hardware, in one seam
///
/// The board layer implements this on the device; tests implement it with
/// recording doubles.
pub trait Board: SignalSink + ResetLine + PowerLine {
    /// Sample the potentiometer (12-bit)
    fn read_pot(&mut self) -> u16;
}

/// Raw (undebounced) button levels captured once per poll
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonLevels {
    /// Button 1 asserted
    pub single_step: bool,
    /// Button 2 asserted
    pub low_freq: bool,
    /// Button 3 asserted
    pub high_freq: bool,
    /// Reset button asserted
    pub reset: bool,
    /// Power button asserted
    pub power: bool,
}

impl ButtonLevels {
    /// Any of the three mode buttons asserted (remote-exit condition)
    #[must_use]
    pub const fn any_mode_button(&self) -> bool {
        self.single_step || self.low_freq || self.high_freq
    }
}

/// Indicator line states, derived purely from controller state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedSnapshot {
    /// Single step mode indicator
    pub single_step: bool,
    /// Low-frequency mode indicator
    pub low_freq: bool,
    /// High-frequency mode indicator
    pub high_freq: bool,
    /// Remote-control mode indicator
    pub remote: bool,
    /// Clock activity (line high or PWM running)
    pub clock_activity: bool,
    /// Reset line currently asserted low
    pub reset_low: bool,
    /// Reset pulse recently completed
    pub reset_done: bool,
    /// Power latch on
    pub power_on: bool,
}

/// The mode controller and its owned components
pub struct Controller {
    mode: ClockMode,
    previous_mode: ClockMode,
    synth: Synthesizer,
    reset: ResetSequencer,
    remote: RemoteSession,
    power: PowerSwitch,
    buttons: DebounceTracker,
    single_step_active: bool,
    remote_buttons_released: bool,
    console: String<CONSOLE_BUFFER_SIZE>,
    mirror: String<MIRROR_BUFFER_SIZE>,
}

impl Controller {
    /// Create a controller in its power-up defaults
    ///
    /// No entry actions run until [`Self::startup`]; the shell calls that
    /// once after the hardware is up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: ClockMode::SingleStep,
            previous_mode: ClockMode::SingleStep,
            synth: Synthesizer::new(),
            reset: ResetSequencer::new(),
            remote: RemoteSession::new(),
            power: PowerSwitch::new(),
            buttons: DebounceTracker::new(),
            single_step_active: false,
            remote_buttons_released: false,
            console: String::new(),
            mirror: String::new(),
        }
    }

    /// Apply the power-up banner and enter the default mode
    pub fn startup(&mut self, now_ms: u32, board: &mut impl Board) {
        let _ = self
            .console
            .push_str("Multimode Clock Source Starting...\n");
        self.set_mode(ClockMode::SingleStep, now_ms, board);
    }

    /// Active mode
    #[must_use]
    pub const fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Mode that was active before the current one
    #[must_use]
    pub const fn previous_mode(&self) -> ClockMode {
        self.previous_mode
    }

    /// The synthesizer's signal state
    #[must_use]
    pub const fn signal(&self) -> crate::clock::synth::SignalState {
        self.synth.state()
    }

    /// Remote session state (read-only)
    #[must_use]
    pub const fn remote(&self) -> &RemoteSession {
        &self.remote
    }

    /// Whether the power latch is on
    #[must_use]
    pub const fn power_on(&self) -> bool {
        self.power.is_on()
    }

    /// Whether a reset pulse is in flight
    #[must_use]
    pub const fn reset_active(&self) -> bool {
        self.reset.is_active()
    }

    /// Switch the active mode
    ///
    /// The transition is atomic from the point of view of every other
    /// component: generation stops, the old mode's session state is torn
    /// down, the new mode's entry action runs, and the status report is
    /// queued, all before this returns.
    pub fn set_mode(&mut self, mode: ClockMode, now_ms: u32, board: &mut impl Board) {
        // 1. Halt whatever is driving the output line
        self.synth.stop(board);

        // 2. Leaving remote control tears its session down
        if self.mode == ClockMode::Remote {
            self.remote.clear();
        }

        // 3. Commit the mode; the line is already low
        self.previous_mode = self.mode;
        self.mode = mode;
        self.single_step_active = false;

        // 4. Mode-specific entry action
        match mode {
            ClockMode::SingleStep => {
                self.synth.set_frequency(0, board);
            }
            ClockMode::LowFrequency => {
                let hz = calc::frequency_from_pot(board.read_pot());
                self.synth.set_frequency(hz, board);
            }
            ClockMode::HighFrequency => {
                self.synth.set_fixed_high_speed(board);
            }
            ClockMode::Remote => {
                self.remote.arm(now_ms);
                self.remote_buttons_released = false;
                let _ = protocol::write_menu(&mut self.console);
                let _ = self.console.push_str(PROMPT);
            }
        }

        // 5. Report the new state on both streams
        self.emit_status();
    }

    /// Run one polling iteration
    ///
    /// `levels` are the raw input levels sampled this tick; debouncing
    /// happens here. The reset sequencer advances unconditionally.
    pub fn poll(&mut self, now_ms: u32, levels: &ButtonLevels, board: &mut impl Board) {
        if self.mode == ClockMode::Remote {
            self.poll_remote_exit(now_ms, levels, board);
        } else {
            self.handle_mode_buttons(now_ms, levels, board);
        }

        // The dedicated buttons work in every mode
        if self
            .buttons
            .record_if_stable(ButtonId::Reset, levels.reset, now_ms)
        {
            self.request_reset(now_ms, board);
        }
        if self
            .buttons
            .record_if_stable(ButtonId::Power, levels.power, now_ms)
        {
            self.toggle_power(now_ms, board);
        }

        // Track the potentiometer while it owns the frequency
        if self.mode == ClockMode::LowFrequency {
            let hz = calc::frequency_from_pot(board.read_pot());
            if hz != self.synth.frequency_hz() {
                self.synth.set_frequency(hz, board);
                self.emit_status();
            }
        }

        let frequency = self.active_frequency();
        if self
            .reset
            .advance(now_ms, self.synth.is_high(), frequency, board)
        {
            let _ = self.console.push_str("Reset pulse complete\n");
        }
    }

    /// Feed one byte received on the console stream
    ///
    /// Only meaningful in remote-control mode; bytes arriving in any other
    /// mode are discarded. Every byte pushes the inactivity deadline out.
    pub fn handle_console_byte(&mut self, byte: u8, now_ms: u32, board: &mut impl Board) {
        if self.mode != ClockMode::Remote {
            return;
        }

        self.remote.touch(now_ms);
        match self.remote.feed(byte) {
            InputEvent::Ignored => {}
            InputEvent::Echo(c) => {
                let _ = self.console.push(c);
            }
            InputEvent::Erase => {
                let _ = self.console.push_str("\x08 \x08");
            }
            InputEvent::EmptyLine => {
                let _ = self.console.push_str(PROMPT);
            }
            InputEvent::Line(parsed) => {
                let _ = self.console.push_str("\n");
                match parsed {
                    Ok(command) => self.execute(command, now_ms, board),
                    Err(error) => {
                        let _ = error.write_message(&mut self.console);
                    }
                }
                let _ = self.console.push_str(PROMPT);
            }
        }
    }

    /// Text queued for the console stream
    #[must_use]
    pub fn console_output(&self) -> &str {
        &self.console
    }

    /// Discard drained console text
    pub fn clear_console(&mut self) {
        self.console.clear();
    }

    /// Text queued for the status mirror stream
    #[must_use]
    pub fn mirror_output(&self) -> &str {
        &self.mirror
    }

    /// Discard drained mirror text
    pub fn clear_mirror(&mut self) {
        self.mirror.clear();
    }

    /// Indicator line states for the LED bank
    #[must_use]
    pub fn led_snapshot(&mut self, now_ms: u32) -> LedSnapshot {
        LedSnapshot {
            single_step: self.mode == ClockMode::SingleStep,
            low_freq: self.mode == ClockMode::LowFrequency,
            high_freq: self.mode == ClockMode::HighFrequency,
            remote: self.mode == ClockMode::Remote,
            clock_activity: self.synth.is_high()
                || self.synth.method() == GenerationMethod::HardwarePwm,
            reset_low: self.reset.line_asserted(),
            reset_done: self.reset.indicator_lit(now_ms),
            power_on: self.power.is_on(),
        }
    }

    fn poll_remote_exit(&mut self, now_ms: u32, levels: &ButtonLevels, board: &mut impl Board) {
        // The entry gesture is made of mode buttons; wait for them to come
        // back up before a press can mean "leave"
        if !self.remote_buttons_released {
            if !levels.any_mode_button() {
                self.remote_buttons_released = true;
            }
            return;
        }

        if levels.any_mode_button() {
            let previous = self.previous_mode;
            let _ = write!(
                self.console,
                "Button pressed - returning to {} mode\n",
                previous.name()
            );
            self.set_mode(previous, now_ms, board);
        } else if self.remote.expired(now_ms) {
            let previous = self.previous_mode;
            let _ = write!(
                self.console,
                "UART menu timeout - returning to {} mode\n",
                previous.name()
            );
            self.set_mode(previous, now_ms, board);
        }
    }

    fn handle_mode_buttons(&mut self, now_ms: u32, levels: &ButtonLevels, board: &mut impl Board) {
        let gesture = levels.low_freq && levels.high_freq;
        if self
            .buttons
            .record_if_stable(ButtonId::RemoteGesture, gesture, now_ms)
        {
            self.set_mode(ClockMode::Remote, now_ms, board);
            return;
        }

        if self
            .buttons
            .record_if_stable(ButtonId::SingleStep, levels.single_step, now_ms)
        {
            if self.mode == ClockMode::SingleStep {
                self.synth.toggle_once(board);
                self.single_step_active = true;
            } else {
                self.set_mode(ClockMode::SingleStep, now_ms, board);
            }
        }
        if self
            .buttons
            .record_if_stable(ButtonId::LowFreq, levels.low_freq, now_ms)
        {
            self.set_mode(ClockMode::LowFrequency, now_ms, board);
        }
        if self
            .buttons
            .record_if_stable(ButtonId::HighFreq, levels.high_freq, now_ms)
        {
            self.set_mode(ClockMode::HighFrequency, now_ms, board);
        }
    }

    fn request_reset(&mut self, now_ms: u32, board: &mut impl Board) {
        match self
            .reset
            .start(self.mode, self.synth.is_high(), now_ms, board)
        {
            Ok(()) => {
                let _ = self.console.push_str("Reset pulse initiated\n");
            }
            Err(_) => {
                let _ = self.console.push_str("Reset pulse already active\n");
            }
        }
    }

    fn toggle_power(&mut self, now_ms: u32, board: &mut impl Board) {
        let turned_on = self.power.toggle(board);
        if self.power.is_on() {
            let _ = self.console.push_str("Power ON\n");
        } else {
            let _ = self.console.push_str("Power OFF\n");
        }

        if turned_on {
            self.set_mode(ClockMode::SingleStep, now_ms, board);
            let _ = self
                .console
                .push_str("Power ON - automatically switched to Mode 1 (Single Step)\n");
        }
    }

    fn execute(&mut self, command: Command, now_ms: u32, board: &mut impl Board) {
        match command {
            Command::Empty => {}
            Command::Stop => {
                self.synth.stop(board);
                self.remote.mark_stopped();
                let _ = self.console.push_str("Clock stopped\n");
            }
            Command::Toggle => {
                self.synth.stop(board);
                self.remote.mark_stopped();
                self.synth.toggle_once(board);
                let level = if self.synth.is_high() { "HIGH" } else { "LOW" };
                let _ = write!(self.console, "Clock toggled to {level}\n");
            }
            Command::SetFrequency(frequency) => {
                self.set_remote_frequency(frequency, board);
            }
            Command::Reset => {
                self.request_reset(now_ms, board);
            }
            Command::PowerOn => {
                let turned_on = self.power.set(true, board);
                let _ = self.console.push_str("Power turned ON\n");
                if turned_on {
                    self.set_mode(ClockMode::SingleStep, now_ms, board);
                    let _ = self
                        .console
                        .push_str("Automatically switched to Mode 1 (Single Step)\n");
                }
            }
            Command::PowerOff => {
                let _ = self.power.set(false, board);
                let _ = self.console.push_str("Power turned OFF\n");
            }
            Command::Menu => {
                let _ = protocol::write_menu(&mut self.console);
            }
            Command::Status => {
                self.emit_status();
            }
        }
    }

    fn set_remote_frequency(&mut self, frequency: Frequency, board: &mut impl Board) {
        self.remote.mark_running(frequency);
        self.synth.set_remote_frequency(frequency, board);
        let _ = write!(
            self.console,
            "Frequency set to {} Hz and running\n",
            frequency.as_hz()
        );
        self.emit_status();
    }

    /// Frequency the reset time budget runs against in the current mode
    fn active_frequency(&self) -> Option<u32> {
        match self.mode {
            ClockMode::SingleStep => None,
            ClockMode::LowFrequency => Some(self.synth.frequency_hz()),
            ClockMode::HighFrequency => Some(HIGH_FREQ_OUTPUT_HZ),
            ClockMode::Remote => Some(self.remote.frequency_hz()),
        }
    }

    fn emit_status(&mut self) {
        let snapshot = StatusSnapshot {
            mode: self.mode,
            single_step_active: self.single_step_active,
            frequency_hz: self.synth.frequency_hz(),
            remote_running: self.remote.running(),
            remote_frequency_hz: self.remote.frequency_hz(),
            pwm_active: self.synth.method() == GenerationMethod::HardwarePwm,
            clock_high: self.synth.is_high(),
            power_on: self.power.is_on(),
        };
        let _ = write_status(&mut self.console, &snapshot);
        let _ = write_status(&mut self.mirror, &snapshot);
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

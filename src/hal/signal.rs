//! Clock Output Driver
//!
//! Owns the PWM slice behind the clock output pin and executes the
//! synthesizer's commands. The pin stays in PWM function permanently:
//! static levels are produced by pinning the compare register at 0
//! (always low) or above the wrap (always high), so switching between
//! manual, software-toggled, and PWM generation never reconfigures the
//! pin function.
//!
//! Software toggling runs inside this task between command arrivals, so
//! cancellation is as simple as the next command showing up.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{with_timeout, Duration};
use fixed::traits::ToFixed;

use crate::clock::calc::DutyParams;
use crate::hal::gpio::StatusLed;

/// Depth of the signal command queue
pub const SIGNAL_QUEUE_DEPTH: usize = 16;

/// Channel type carrying synthesizer commands to the signal task
pub type SignalChannel = Channel<CriticalSectionRawMutex, SignalCommand, SIGNAL_QUEUE_DEPTH>;
/// Sending half held by the board
pub type SignalSender = Sender<'static, CriticalSectionRawMutex, SignalCommand, SIGNAL_QUEUE_DEPTH>;
/// Receiving half held by the signal task
pub type SignalReceiver =
    Receiver<'static, CriticalSectionRawMutex, SignalCommand, SIGNAL_QUEUE_DEPTH>;

/// One synthesizer command
#[derive(Clone, Copy, Debug, defmt::Format)]
pub enum SignalCommand {
    /// Hold the line at a static level
    SetLevel(bool),
    /// Toggle the line every `half_period_us` microseconds
    StartToggle(u32),
    /// Run the slice free at the given parameters
    StartPwm(DutyParams),
    /// Cancel any periodic source, leaving the level as-is
    StopGeneration,
}

/// How the slice is currently being driven
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DriveState {
    /// Compare pinned; line static
    Static,
    /// This task toggles the line on a timer
    Toggling(u32),
    /// Slice free-running
    FreeRunning,
}

/// The clock output pin, wrapped as a permanently-PWM slice
pub struct ClockOutput<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
}

impl<'d> ClockOutput<'d> {
    /// Wrap a configured output-B PWM slice
    #[must_use]
    pub fn new(pwm: Pwm<'d>) -> Self {
        let mut config = PwmConfig::default();
        config.enable = true;
        config.divider = 1u8.to_fixed();
        config.top = 1;
        config.compare_b = 0;
        let mut this = Self { pwm, config };
        this.apply();
        this
    }

    /// Pin the line at a static level
    pub fn set_level(&mut self, high: bool) {
        self.config.divider = 1u8.to_fixed();
        self.config.top = 1;
        // Compare above the wrap holds the output high for the whole cycle
        self.config.compare_b = if high { 2 } else { 0 };
        self.apply();
    }

    /// Program the slice from solver output
    ///
    /// The solvers may hand over dividers beyond the 8-bit hardware range;
    /// the slice saturates at its maximum division, matching the shipped
    /// behavior.
    pub fn run_at(&mut self, params: DutyParams) {
        let divider = params.divider.clamp(1, DutyParams::MAX_DIVIDER) as u16;
        self.config.divider = divider.to_fixed();
        self.config.top = params.wrap;
        self.config.compare_b = params.level;
        self.apply();
    }

    fn apply(&mut self) {
        self.pwm.set_config(&self.config);
    }
}

/// Execute synthesizer commands against the real slice
///
/// Also drives the clock activity LED, which follows the line level (or
/// stays lit while the slice free-runs faster than the eye).
#[embassy_executor::task]
pub async fn signal_task(
    mut output: ClockOutput<'static>,
    mut activity_led: StatusLed<'static>,
    commands: SignalReceiver,
) {
    let mut state = DriveState::Static;
    let mut level = false;

    loop {
        let command = match state {
            DriveState::Toggling(half_period_us) => {
                match with_timeout(
                    Duration::from_micros(u64::from(half_period_us)),
                    commands.receive(),
                )
                .await
                {
                    Ok(command) => command,
                    Err(_) => {
                        level = !level;
                        output.set_level(level);
                        activity_led.set(level);
                        continue;
                    }
                }
            }
            _ => commands.receive().await,
        };

        match command {
            SignalCommand::SetLevel(high) => {
                level = high;
                state = DriveState::Static;
                output.set_level(high);
                activity_led.set(high);
            }
            SignalCommand::StartToggle(half_period_us) => {
                state = DriveState::Toggling(half_period_us);
            }
            SignalCommand::StartPwm(params) => {
                state = DriveState::FreeRunning;
                output.run_at(params);
                activity_led.set(true);
            }
            SignalCommand::StopGeneration => {
                if state == DriveState::FreeRunning {
                    // Freeze the slice at the current logical level
                    output.set_level(level);
                    activity_led.set(level);
                }
                state = DriveState::Static;
            }
        }
    }
}

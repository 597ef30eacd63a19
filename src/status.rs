//! Status Reporting
//!
//! Formats the bordered status block shown on the console and mirrored on
//! the second UART. Emitted after every mode change, every frequency
//! change, and on an explicit `status` command.

use core::fmt;

use crate::types::ClockMode;

/// Everything the status block reports, captured at one instant
#[derive(Clone, Copy, Debug)]
pub struct StatusSnapshot {
    /// Active mode
    pub mode: ClockMode,
    /// Whether a manual pulse has been delivered since entering single step
    pub single_step_active: bool,
    /// Advisory output frequency in Hz
    pub frequency_hz: u32,
    /// Remote clock marked running
    pub remote_running: bool,
    /// Remembered remote frequency in Hz
    pub remote_frequency_hz: u32,
    /// Hardware PWM currently driving the line
    pub pwm_active: bool,
    /// Output line level
    pub clock_high: bool,
    /// Power latch state
    pub power_on: bool,
}

/// Write the bordered status block
///
/// # Errors
///
/// Propagates the writer's error.
pub fn write_status<W: fmt::Write>(w: &mut W, snapshot: &StatusSnapshot) -> fmt::Result {
    w.write_str("\n=== Clock Source Status ===\n")?;

    match snapshot.mode {
        ClockMode::SingleStep => {
            w.write_str("Mode: Single Step\n")?;
            if snapshot.single_step_active {
                w.write_str("Status: Active\n")?;
            } else {
                w.write_str("Status: Waiting for button press\n")?;
            }
        }
        ClockMode::LowFrequency => {
            w.write_str("Mode: Low Frequency\n")?;
            write!(w, "Frequency: {} Hz\n", snapshot.frequency_hz)?;
        }
        ClockMode::HighFrequency => {
            w.write_str("Mode: High Frequency\n")?;
            write!(w, "Frequency: {} Hz (1MHz)\n", snapshot.frequency_hz)?;
        }
        ClockMode::Remote => {
            w.write_str("Mode: UART Control\n")?;
            if snapshot.remote_running && snapshot.remote_frequency_hz > 0 {
                write!(w, "Frequency: {} Hz\n", snapshot.remote_frequency_hz)?;
                w.write_str("Status: Running\n")?;
            } else {
                w.write_str("Status: Stopped\n")?;
            }
        }
    }

    let pwm_shown = matches!(snapshot.mode, ClockMode::HighFrequency)
        || (snapshot.mode == ClockMode::Remote && snapshot.pwm_active);
    if pwm_shown {
        w.write_str("Clock State: PWM Active\n")?;
    } else if snapshot.clock_high {
        w.write_str("Clock State: HIGH\n")?;
    } else {
        w.write_str("Clock State: LOW\n")?;
    }

    if snapshot.power_on {
        w.write_str("Power State: ON\n")?;
    } else {
        w.write_str("Power State: OFF\n")?;
    }

    w.write_str("===========================\n\n")
}

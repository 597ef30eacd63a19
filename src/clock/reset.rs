//! Reset Pulse Sequencer
//!
//! Drives the dedicated reset output low for the span of a fixed number of
//! clock cycles, then releases it. How "six cycles" is measured depends on
//! the mode that was active when the pulse was triggered: single-step
//! sessions count rising edges of the output line, every other mode runs a
//! time budget derived from the active frequency. The choice is latched at
//! trigger time and never changes mid-session.

use crate::config::{
    RESET_CYCLES, RESET_DONE_INDICATOR_MS, RESET_FALLBACK_MS, RESET_MIN_PULSE_MS,
};
use crate::types::ClockMode;

/// Hardware-facing side of the sequencer
///
/// The reset line idles high and is asserted low for the duration of a
/// session.
pub trait ResetLine {
    /// Drive the reset output line
    fn set_reset_level(&mut self, high: bool);
}

/// Error returned when a pulse is requested while one is running
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetBusy;

/// In-flight reset pulse bookkeeping
#[derive(Clone, Copy, Debug)]
struct ResetSession {
    /// Trigger timestamp in milliseconds
    started_at_ms: u32,
    /// Rising edges seen so far (edge-wait sessions only)
    cycles_observed: u32,
    /// True when completion is edge-counted rather than timed
    edge_wait: bool,
    /// Output level snapshot from the previous tick
    last_level: bool,
}

/// The reset pulse sequencer
#[derive(Clone, Copy, Debug, Default)]
pub struct ResetSequencer {
    session: Option<ResetSession>,
    completed_at_ms: Option<u32>,
}

impl ResetSequencer {
    /// Create an idle sequencer (line released high)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: None,
            completed_at_ms: None,
        }
    }

    /// Check whether a pulse is currently running
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Check whether the reset output is currently asserted (low)
    #[must_use]
    pub const fn line_asserted(&self) -> bool {
        self.session.is_some()
    }

    /// Trigger a reset pulse
    ///
    /// Latches the completion strategy from the mode active right now and
    /// snapshots the output level for edge detection, then asserts the
    /// line. Refused while a session is running.
    ///
    /// # Errors
    ///
    /// Returns [`ResetBusy`] if a pulse is already in flight.
    pub fn start(
        &mut self,
        mode: ClockMode,
        output_level: bool,
        now_ms: u32,
        line: &mut impl ResetLine,
    ) -> Result<(), ResetBusy> {
        if self.session.is_some() {
            return Err(ResetBusy);
        }

        self.session = Some(ResetSession {
            started_at_ms: now_ms,
            cycles_observed: 0,
            edge_wait: mode == ClockMode::SingleStep,
            last_level: output_level,
        });
        line.set_reset_level(false);
        Ok(())
    }

    /// Advance the sequencer one polling tick
    ///
    /// `active_frequency_hz` is the frequency the timed branch budgets
    /// against; `None` or zero falls back to the fixed default budget.
    /// Returns true on the tick the pulse completes.
    pub fn advance(
        &mut self,
        now_ms: u32,
        output_level: bool,
        active_frequency_hz: Option<u32>,
        line: &mut impl ResetLine,
    ) -> bool {
        let Some(mut session) = self.session else {
            return false;
        };

        let done = if session.edge_wait {
            let rising = !session.last_level && output_level;
            if rising {
                session.cycles_observed += 1;
            }
            // Snapshot refreshes every tick, completed or not
            session.last_level = output_level;
            session.cycles_observed >= RESET_CYCLES
        } else {
            let elapsed_ms = now_ms.wrapping_sub(session.started_at_ms);
            elapsed_ms >= Self::required_ms(active_frequency_hz)
        };

        if done {
            line.set_reset_level(true);
            self.session = None;
            self.completed_at_ms = Some(now_ms);
            true
        } else {
            self.session = Some(session);
            false
        }
    }

    /// Time budget for a timed session, in milliseconds
    ///
    /// Rounds the six-cycle span up to whole milliseconds and never drops
    /// below the visibility floor.
    #[must_use]
    pub const fn required_ms(active_frequency_hz: Option<u32>) -> u32 {
        let budget = match active_frequency_hz {
            Some(hz) => {
                if hz > 0 {
                    (RESET_CYCLES * 1000).div_ceil(hz)
                } else {
                    RESET_FALLBACK_MS
                }
            }
            None => RESET_FALLBACK_MS,
        };
        if budget < RESET_MIN_PULSE_MS {
            RESET_MIN_PULSE_MS
        } else {
            budget
        }
    }

    /// Check the "just completed" indicator window, clearing it on expiry
    pub fn indicator_lit(&mut self, now_ms: u32) -> bool {
        match self.completed_at_ms {
            Some(at) if now_ms.wrapping_sub(at) < RESET_DONE_INDICATOR_MS => true,
            Some(_) => {
                self.completed_at_ms = None;
                false
            }
            None => false,
        }
    }
}

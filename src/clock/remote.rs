//! Remote-Control Session
//!
//! Ephemeral state for the remote-control mode: the line assembler, the
//! inactivity deadline, the remembered `freq` value, and the running flag.
//! The session is re-armed on every entry into remote mode and torn down
//! when the mode is left.

use crate::config::REMOTE_TIMEOUT_MS;
use crate::protocol::{InputEvent, LineAssembler};
use crate::types::Frequency;

/// Remote-control session state
#[derive(Debug, Default)]
pub struct RemoteSession {
    assembler: LineAssembler,
    last_activity_ms: u32,
    frequency_hz: u32,
    running: bool,
}

impl RemoteSession {
    /// Create an idle session
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assembler: LineAssembler::new(),
            last_activity_ms: 0,
            frequency_hz: 0,
            running: false,
        }
    }

    /// Re-arm the session on mode entry
    pub fn arm(&mut self, now_ms: u32) {
        self.clear();
        self.last_activity_ms = now_ms;
    }

    /// Refresh the inactivity deadline
    pub fn touch(&mut self, now_ms: u32) {
        self.last_activity_ms = now_ms;
    }

    /// Check whether the inactivity deadline has passed
    #[must_use]
    pub fn expired(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_activity_ms) > REMOTE_TIMEOUT_MS
    }

    /// Feed one console byte into the line assembler
    pub fn feed(&mut self, byte: u8) -> InputEvent {
        self.assembler.feed(byte)
    }

    /// Remembered remote frequency in Hz, 0 when never set
    #[must_use]
    pub const fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Check whether the remote clock is marked running
    #[must_use]
    pub const fn running(&self) -> bool {
        self.running
    }

    /// Check whether a partial command line is buffered
    #[must_use]
    pub fn line_pending(&self) -> bool {
        !self.assembler.is_empty()
    }

    /// Remember a commanded frequency and mark the clock running
    pub fn mark_running(&mut self, frequency: Frequency) {
        self.frequency_hz = frequency.as_hz();
        self.running = true;
    }

    /// Mark the clock stopped; the remembered frequency is kept
    pub fn mark_stopped(&mut self) {
        self.running = false;
    }

    /// Tear the session down (mode exit)
    pub fn clear(&mut self) {
        self.assembler.clear();
        self.frequency_hz = 0;
        self.running = false;
    }
}

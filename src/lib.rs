//! Multimode Clock Source Firmware Library
//!
//! This library provides the core functionality for an RP2040-based bench
//! clock source. The instrument synthesizes a 50%-duty square wave under
//! four selectable modes (single step, low frequency, high frequency,
//! remote control) and exposes a line-oriented remote-control protocol on
//! its console UART, with a status mirror on a second UART.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Mode Controller  │  Reset Sequencer  │  Remote Protocol     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    SYNTHESIS LAYER                           │
//! │  PWM Parameter Solvers  │  Pot Mapping  │  Signal Synth      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  PWM Slice  │  ADC  │  UART  │  GPIO / LEDs                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Single owner for every piece of state**: the mode lives in the
//!   controller, the signal state in the synthesizer, sessions in their
//!   owning components
//! - **Type-driven design**: custom types enforce invariants at compile time
//! - **No unsafe in application code**: all unsafe isolated in the HAL layer
//! - **Pure decision core, imperative shell**: hardware effects go through
//!   trait seams so the whole control core runs on the host
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_rp;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Provides safe abstractions over RP2040 peripherals.
#[cfg(feature = "embedded")]
pub mod hal;

/// Clock Control Logic
///
/// Mode state machine, signal synthesis, and reset sequencing.
pub mod clock;

/// Debounced Input Handling
///
/// Per-input debounce tracking for buttons and gestures.
pub mod input;

/// Power Switching
///
/// The instrument's power output latch.
pub mod power;

/// Remote-Control Protocol
///
/// Line assembly and command grammar for the console UART.
pub mod protocol;

/// Status Reporting
///
/// Bordered status block emitted on both text streams.
pub mod status;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}

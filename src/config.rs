//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the multimode clock source.
//! All pin mappings, clock frequencies, timing windows, and protocol limits
//! are centralized here.

/// System clock frequency (RP2040 @ 125 MHz), the PWM reference clock
pub const SYSTEM_CLOCK_HZ: u32 = 125_000_000;

/// Button debounce window in milliseconds
pub const DEBOUNCE_DELAY_MS: u32 = 50;

/// Main polling loop interval in milliseconds
pub const UPDATE_INTERVAL_MS: u32 = 10;

/// Minimum frequency in Hz for low-frequency mode
pub const MIN_LOW_FREQ_HZ: u32 = 1;

/// Maximum frequency for the first 20% of the potentiometer range
pub const POT_RANGE1_MAX_HZ: u32 = 100;

/// Maximum frequency for the remaining 80% of the potentiometer range
pub const POT_RANGE2_MAX_HZ: u32 = 100_000;

/// ADC count at the 20% potentiometer split (4095 * 0.2)
pub const POT_RANGE1_TOP: u16 = 819;

/// Full-scale ADC count (12-bit)
pub const POT_FULL_SCALE: u16 = 4095;

/// Fixed high-frequency mode output (1 MHz)
pub const HIGH_FREQ_OUTPUT_HZ: u32 = 1_000_000;

/// PWM clock divider for the fixed 1 MHz output
pub const HIGH_FREQ_DIVIDER: u32 = 125;

/// PWM wrap value for the fixed 1 MHz output
pub const HIGH_FREQ_WRAP: u16 = 1;

/// Frequencies below this floor are generated by software toggling;
/// at or above it the PWM slice takes over (255 * 65536 counts of the
/// reference clock is ~7.5 Hz, the slowest the hardware can represent)
pub const SOFT_TOGGLE_CEILING_HZ: u32 = 8;

/// Output cycles a reset pulse must span before releasing
pub const RESET_CYCLES: u32 = 6;

/// Minimum reset pulse width in milliseconds (visibility floor)
pub const RESET_MIN_PULSE_MS: u32 = 10;

/// Reset pulse width fallback when no frequency is determinable
pub const RESET_FALLBACK_MS: u32 = 60;

/// Duration of the "reset completed" indicator window in milliseconds
pub const RESET_DONE_INDICATOR_MS: u32 = 250;

/// Remote-control menu inactivity timeout in milliseconds (30 seconds)
pub const REMOTE_TIMEOUT_MS: u32 = 30_000;

/// Remote command line buffer size in bytes
pub const CMD_BUFFER_SIZE: usize = 32;

/// Minimum frequency accepted by the remote `freq` command (1 Hz)
pub const MIN_REMOTE_FREQ_HZ: u32 = 1;

/// Maximum frequency accepted by the remote `freq` command (1 MHz)
pub const MAX_REMOTE_FREQ_HZ: u32 = 1_000_000;

/// Console UART baud rate
pub const UART_BAUD_RATE: u32 = 115_200;

/// Status mirror UART baud rate
pub const UART1_BAUD_RATE: u32 = 115_200;

/// Capacity of the console output buffer drained each poll
pub const CONSOLE_BUFFER_SIZE: usize = 1024;

/// Capacity of the status mirror output buffer drained each poll
pub const MIRROR_BUFFER_SIZE: usize = 512;

/// Pin assignments for GPIO
pub mod pins {
    //! RP2040 GPIO assignments matching the schematic

    /// Button 1: single step / manual toggle
    pub const BUTTON_SINGLE_STEP: u8 = 2;

    /// Button 2: low-frequency mode
    pub const BUTTON_LOW_FREQ: u8 = 3;

    /// Button 3: high-frequency mode
    pub const BUTTON_HIGH_FREQ: u8 = 4;

    /// Clock activity indicator
    pub const LED_CLOCK_ACTIVITY: u8 = 5;

    /// Single step mode indicator
    pub const LED_SINGLE_STEP: u8 = 6;

    /// Low-frequency mode indicator
    pub const LED_LOW_FREQ: u8 = 7;

    /// High-frequency mode indicator
    pub const LED_HIGH_FREQ: u8 = 8;

    /// Main clock output pin (PWM slice 4, channel B)
    pub const CLOCK_OUTPUT: u8 = 9;

    /// Remote-control mode indicator
    pub const LED_REMOTE_MODE: u8 = 10;

    /// Reset pulse button
    pub const BUTTON_RESET: u8 = 11;

    /// Power toggle button
    pub const BUTTON_POWER: u8 = 12;

    /// Reset output line (idle high, asserted low during a pulse)
    pub const RESET_OUTPUT: u8 = 13;

    /// Power output line (asserted low = powered on)
    pub const POWER_OUTPUT: u8 = 14;

    /// Lit while the reset output is held low
    pub const LED_RESET_LOW: u8 = 15;

    /// Console UART TX (UART0)
    pub const UART0_TX: u8 = 0;

    /// Console UART RX (UART0)
    pub const UART0_RX: u8 = 1;

    /// Mirror UART TX (UART1)
    pub const UART1_TX: u8 = 20;

    /// Mirror UART RX (UART1, unused but claimed)
    pub const UART1_RX: u8 = 21;

    /// Lit briefly when a reset pulse completes
    pub const LED_RESET_HIGH: u8 = 18;

    /// Lit while the power latch is on
    pub const LED_POWER_ON: u8 = 19;

    /// ADC0 - potentiometer input (GPIO 26)
    pub const POTENTIOMETER: u8 = 26;
}

//! Remote-Control Protocol
//!
//! Line assembly and command parsing for the console UART. The assembler
//! consumes one byte at a time, echoing printable input and handling
//! erase, and hands completed lines to the grammar. The grammar is fixed
//! and case-sensitive; leading spaces are stripped before matching.

use core::fmt;

use heapless::{String, Vec};

use crate::config::{CMD_BUFFER_SIZE, MAX_REMOTE_FREQ_HZ, MIN_REMOTE_FREQ_HZ};
use crate::types::Frequency;

/// Prompt printed after every response
pub const PROMPT: &str = "Cmd> ";

/// A parsed remote command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `stop` - halt generation and drop the line low
    Stop,
    /// `toggle` - halt generation and flip the line once
    Toggle,
    /// `freq <Hz>` - retune and run
    SetFrequency(Frequency),
    /// `reset` - trigger a reset pulse
    Reset,
    /// `power on`
    PowerOn,
    /// `power off`
    PowerOff,
    /// `menu` - reprint the command menu
    Menu,
    /// `status` - print the status block
    Status,
    /// A line of nothing but spaces; accepted and ignored
    Empty,
}

/// Rejection produced by the grammar
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// `freq` with no value token
    MissingFrequency,
    /// `freq` token containing anything but ASCII digits
    MalformedFrequency,
    /// Well-formed number outside the accepted range
    FrequencyOutOfRange,
    /// No rule matched; carries the offending line
    Unknown(String<CMD_BUFFER_SIZE>),
}

impl CommandError {
    /// Write the rejection message exactly as shown on the console
    ///
    /// # Errors
    ///
    /// Propagates the writer's error.
    pub fn write_message<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        match self {
            Self::MissingFrequency => w.write_str("Missing frequency value. Usage: freq <Hz>\n"),
            Self::MalformedFrequency => {
                w.write_str("Invalid frequency format. Use numbers only.\n")
            }
            Self::FrequencyOutOfRange => write!(
                w,
                "Invalid frequency. Range: {MIN_REMOTE_FREQ_HZ} Hz to {MAX_REMOTE_FREQ_HZ} Hz\n"
            ),
            Self::Unknown(line) => {
                write!(w, "Unknown command: {line}\nType 'menu' for help\n")
            }
        }
    }
}

impl Command {
    /// Parse one completed line
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing the rejection; the caller
    /// reports it inline and mutates nothing.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let cmd = line.trim_start_matches(' ');

        match cmd {
            "" => return Ok(Self::Empty),
            "stop" => return Ok(Self::Stop),
            "toggle" => return Ok(Self::Toggle),
            "reset" => return Ok(Self::Reset),
            "power on" => return Ok(Self::PowerOn),
            "power off" => return Ok(Self::PowerOff),
            "menu" => return Ok(Self::Menu),
            "status" => return Ok(Self::Status),
            _ => {}
        }

        if let Some(rest) = cmd.strip_prefix("freq ") {
            return Self::parse_frequency(rest);
        }

        let mut unknown = String::new();
        // The line already fits the assembler's buffer
        let _ = unknown.push_str(cmd);
        Err(CommandError::Unknown(unknown))
    }

    fn parse_frequency(token: &str) -> Result<Self, CommandError> {
        let token = token.trim_start_matches(' ');

        if token.is_empty() {
            return Err(CommandError::MissingFrequency);
        }
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommandError::MalformedFrequency);
        }

        // Digits only from here; parse failure can only mean overflow
        let hz: u64 = token
            .parse()
            .map_err(|_| CommandError::FrequencyOutOfRange)?;
        if hz < u64::from(MIN_REMOTE_FREQ_HZ) || hz > u64::from(MAX_REMOTE_FREQ_HZ) {
            return Err(CommandError::FrequencyOutOfRange);
        }

        Frequency::from_hz(hz as u32)
            .map(Self::SetFrequency)
            .ok_or(CommandError::FrequencyOutOfRange)
    }
}

/// What the assembler wants done with one received byte
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Byte ignored (control character, or buffer full)
    Ignored,
    /// Printable byte buffered; echo it back
    Echo(char),
    /// Last character erased; echo a destructive backspace
    Erase,
    /// Line terminator on an empty buffer; reprint the prompt only
    EmptyLine,
    /// A completed line, parsed
    Line(Result<Command, CommandError>),
}

/// Byte-at-a-time line assembler for the console
///
/// The buffer is bounded; printable input beyond capacity is dropped
/// rather than grown or wrapped.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: Vec<u8, CMD_BUFFER_SIZE>,
}

impl LineAssembler {
    /// Create an empty assembler
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed one received byte
    pub fn feed(&mut self, byte: u8) -> InputEvent {
        match byte {
            b'\r' | b'\n' => {
                if self.buffer.is_empty() {
                    return InputEvent::EmptyLine;
                }
                let parsed = core::str::from_utf8(&self.buffer)
                    .map_or_else(|_| Err(self.unknown_line()), Command::parse);
                self.buffer.clear();
                InputEvent::Line(parsed)
            }
            0x08 | 0x7f => {
                if self.buffer.pop().is_some() {
                    InputEvent::Erase
                } else {
                    InputEvent::Ignored
                }
            }
            0x20..=0x7e => {
                if self.buffer.len() < CMD_BUFFER_SIZE - 1 {
                    // Push cannot fail below capacity
                    let _ = self.buffer.push(byte);
                    InputEvent::Echo(char::from(byte))
                } else {
                    InputEvent::Ignored
                }
            }
            _ => InputEvent::Ignored,
        }
    }

    /// Discard any partially assembled line
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Check whether a partial line is buffered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn unknown_line(&self) -> CommandError {
        let mut line = String::new();
        for byte in &self.buffer {
            let _ = line.push(char::from(*byte));
        }
        CommandError::Unknown(line)
    }
}

/// Write the remote-control menu
///
/// # Errors
///
/// Propagates the writer's error.
pub fn write_menu<W: fmt::Write>(w: &mut W) -> fmt::Result {
    w.write_str("\n=== UART Control Mode ===\n")?;
    w.write_str("Commands:\n")?;
    w.write_str("  stop      - Stop the clock\n")?;
    w.write_str("  toggle    - Toggle clock state once\n")?;
    w.write_str("  freq <Hz> - Set frequency (1Hz to 1MHz) and run\n")?;
    w.write_str("  reset     - Trigger reset pulse (6 clock cycles)\n")?;
    w.write_str("  power on  - Turn power ON\n")?;
    w.write_str("  power off - Turn power OFF\n")?;
    w.write_str("  menu      - Show this menu again\n")?;
    w.write_str("  status    - Show current status\n")?;
    w.write_str("\nPress any button to return to previous mode\n")?;
    w.write_str("Mode will timeout after 30 seconds of inactivity\n")?;
    w.write_str("\n")
}

//! Controller Integration Tests
//!
//! Drives the full decision core against a recording board double:
//! mode-transition side effects, the remote session lifecycle, power
//! edges, and reset sequencing through the polling loop.
//! Run with: cargo test --features std --test controller_tests

use clockgen_firmware::clock::calc::{free_running_params, frequency_from_pot, DutyParams};
use clockgen_firmware::clock::controller::{Board, ButtonLevels, Controller};
use clockgen_firmware::clock::reset::ResetLine;
use clockgen_firmware::clock::synth::SignalSink;
use clockgen_firmware::power::PowerLine;
use clockgen_firmware::types::{ClockMode, GenerationMethod};

/// Records everything the controller drives at the hardware
#[derive(Default)]
struct BenchBoard {
    pot: u16,
    level: Option<bool>,
    active_pwm: Option<DutyParams>,
    active_toggle_us: Option<u32>,
    generation_stops: u32,
    reset_level: Option<bool>,
    power_enabled: Option<bool>,
}

impl SignalSink for BenchBoard {
    fn set_level(&mut self, high: bool) {
        self.level = Some(high);
    }
    fn start_toggle(&mut self, half_period_us: u32) {
        self.active_toggle_us = Some(half_period_us);
    }
    fn start_pwm(&mut self, params: DutyParams) {
        self.active_pwm = Some(params);
    }
    fn stop_generation(&mut self) {
        self.generation_stops += 1;
        self.active_pwm = None;
        self.active_toggle_us = None;
    }
}

impl ResetLine for BenchBoard {
    fn set_reset_level(&mut self, high: bool) {
        self.reset_level = Some(high);
    }
}

impl PowerLine for BenchBoard {
    fn set_power_enabled(&mut self, on: bool) {
        self.power_enabled = Some(on);
    }
}

impl Board for BenchBoard {
    fn read_pot(&mut self) -> u16 {
        self.pot
    }
}

const IDLE: ButtonLevels = ButtonLevels {
    single_step: false,
    low_freq: false,
    high_freq: false,
    reset: false,
    power: false,
};

fn press_single() -> ButtonLevels {
    ButtonLevels {
        single_step: true,
        ..IDLE
    }
}

fn press_low() -> ButtonLevels {
    ButtonLevels {
        low_freq: true,
        ..IDLE
    }
}

fn press_high() -> ButtonLevels {
    ButtonLevels {
        high_freq: true,
        ..IDLE
    }
}

fn press_gesture() -> ButtonLevels {
    ButtonLevels {
        low_freq: true,
        high_freq: true,
        ..IDLE
    }
}

fn press_reset() -> ButtonLevels {
    ButtonLevels {
        reset: true,
        ..IDLE
    }
}

fn press_power() -> ButtonLevels {
    ButtonLevels {
        power: true,
        ..IDLE
    }
}

/// Bring a controller up and drop the startup chatter
fn started(board: &mut BenchBoard) -> Controller {
    let mut controller = Controller::new();
    controller.startup(1000, board);
    controller.clear_console();
    controller.clear_mirror();
    controller
}

/// Enter remote mode via the gesture and settle the button guard
fn in_remote(controller: &mut Controller, board: &mut BenchBoard, now: u32) {
    controller.poll(now, &press_gesture(), board);
    assert_eq!(controller.mode(), ClockMode::Remote);
    controller.poll(now + 20, &IDLE, board);
    controller.clear_console();
    controller.clear_mirror();
}

fn feed_line(controller: &mut Controller, board: &mut BenchBoard, now: u32, line: &str) {
    for byte in line.bytes() {
        controller.handle_console_byte(byte, now, board);
    }
}

// ============================================================================
// Startup Tests
// ============================================================================

#[test]
fn startup_enters_single_step_with_a_status_report() {
    let mut board = BenchBoard::default();
    let mut controller = Controller::new();
    controller.startup(1000, &mut board);

    assert_eq!(controller.mode(), ClockMode::SingleStep);
    assert_eq!(controller.signal().frequency_hz, 0);
    assert!(!controller.power_on());

    let console = controller.console_output();
    assert!(console.contains("Multimode Clock Source Starting..."));
    assert!(console.contains("Mode: Single Step"));
    assert!(console.contains("Status: Waiting for button press"));
    assert!(console.contains("Clock State: LOW"));
    assert!(console.contains("Power State: OFF"));

    // The mirror stream carries the block but not the banner
    let mirror = controller.mirror_output();
    assert!(mirror.contains("Mode: Single Step"));
    assert!(!mirror.contains("Starting"));
}

// ============================================================================
// Mode Transition Tests
// ============================================================================

#[test]
fn low_frequency_entry_resamples_the_pot_immediately() {
    let mut board = BenchBoard::default();
    board.pot = 2048;
    let mut controller = started(&mut board);

    controller.poll(1100, &press_low(), &mut board);

    assert_eq!(controller.mode(), ClockMode::LowFrequency);
    let expected = frequency_from_pot(2048);
    assert_eq!(controller.signal().frequency_hz, expected);
    assert!(expected > 0);
    // Generation started within the same poll iteration
    assert_eq!(controller.signal().method, GenerationMethod::HardwarePwm);
    assert!(board.active_pwm.is_some());
    assert!(controller.console_output().contains("Mode: Low Frequency"));
}

#[test]
fn low_frequency_tracks_pot_movement() {
    let mut board = BenchBoard::default();
    board.pot = 2048;
    let mut controller = started(&mut board);
    controller.poll(1100, &press_low(), &mut board);
    controller.clear_console();

    board.pot = 4095;
    controller.poll(1200, &IDLE, &mut board);

    assert_eq!(controller.signal().frequency_hz, 100_000);
    // A frequency change republishes the status block
    assert!(controller.console_output().contains("Frequency: 100000 Hz"));
}

#[test]
fn steady_pot_does_not_republish_status() {
    let mut board = BenchBoard::default();
    board.pot = 2048;
    let mut controller = started(&mut board);
    controller.poll(1100, &press_low(), &mut board);
    controller.clear_console();

    controller.poll(1200, &IDLE, &mut board);
    assert!(controller.console_output().is_empty());
}

#[test]
fn pot_floor_runs_the_software_toggler() {
    let mut board = BenchBoard::default();
    board.pot = 0;
    let mut controller = started(&mut board);

    controller.poll(1100, &press_low(), &mut board);

    assert_eq!(controller.signal().frequency_hz, 1);
    assert_eq!(controller.signal().method, GenerationMethod::SoftwareToggle);
    // 1 Hz toggles every half second
    assert_eq!(board.active_toggle_us, Some(500_000));
}

#[test]
fn high_frequency_entry_uses_the_fixed_pair() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    controller.poll(1100, &press_high(), &mut board);

    assert_eq!(controller.mode(), ClockMode::HighFrequency);
    assert_eq!(controller.signal().frequency_hz, 1_000_000);
    assert_eq!(board.active_pwm, Some(DutyParams::new(125, 1, 1)));
    let console = controller.console_output();
    assert!(console.contains("Frequency: 1000000 Hz (1MHz)"));
    assert!(console.contains("Clock State: PWM Active"));
}

#[test]
fn mode_change_stops_generation_and_drops_the_line() {
    let mut board = BenchBoard::default();
    board.pot = 4095;
    let mut controller = started(&mut board);
    controller.poll(1100, &press_low(), &mut board);
    assert!(board.active_pwm.is_some());

    controller.poll(1200, &press_single(), &mut board);

    assert_eq!(controller.mode(), ClockMode::SingleStep);
    assert!(board.active_pwm.is_none());
    assert_eq!(board.level, Some(false));
    assert_eq!(controller.signal().frequency_hz, 0);
}

// ============================================================================
// Single Step Tests
// ============================================================================

#[test]
fn single_step_button_toggles_in_its_own_mode() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    controller.poll(1100, &press_single(), &mut board);
    assert_eq!(controller.mode(), ClockMode::SingleStep);
    assert!(controller.signal().is_high);
    assert_eq!(board.level, Some(true));
    // A manual pulse is not a status event
    assert!(!controller.console_output().contains("==="));

    controller.poll(1200, &press_single(), &mut board);
    assert!(!controller.signal().is_high);
}

#[test]
fn single_step_presses_inside_the_window_are_dropped() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    controller.poll(1100, &press_single(), &mut board);
    controller.poll(1130, &press_single(), &mut board);

    // Second press fell inside the 50 ms window
    assert!(controller.signal().is_high);
}

// ============================================================================
// Remote Session Tests
// ============================================================================

#[test]
fn gesture_enters_remote_and_prints_the_menu() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    controller.poll(1100, &press_gesture(), &mut board);

    assert_eq!(controller.mode(), ClockMode::Remote);
    let console = controller.console_output();
    assert!(console.contains("=== UART Control Mode ==="));
    assert!(console.contains("Cmd> "));
    assert!(console.contains("Mode: UART Control"));
}

#[test]
fn held_gesture_does_not_bounce_straight_back_out() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    controller.poll(1100, &press_gesture(), &mut board);
    // Buttons still held on the next polls
    controller.poll(1110, &press_gesture(), &mut board);
    controller.poll(1120, &press_gesture(), &mut board);

    assert_eq!(controller.mode(), ClockMode::Remote);
}

#[test]
fn freq_command_runs_the_free_solver_and_marks_running() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);

    feed_line(&mut controller, &mut board, 1300, "freq 50\r");

    assert!(controller.remote().running());
    assert_eq!(controller.remote().frequency_hz(), 50);
    assert_eq!(controller.signal().frequency_hz, 50);
    assert_eq!(board.active_pwm, Some(free_running_params(50)));

    let console = controller.console_output();
    assert!(console.contains("Frequency set to 50 Hz and running"));
    assert!(console.contains("Status: Running"));
    assert!(console.ends_with("Cmd> "));
}

#[test]
fn out_of_range_freq_is_rejected_without_state_change() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);

    feed_line(&mut controller, &mut board, 1300, "freq 2000000\r");

    assert!(!controller.remote().running());
    assert_eq!(controller.remote().frequency_hz(), 0);
    assert!(board.active_pwm.is_none());
    assert!(controller
        .console_output()
        .contains("Invalid frequency. Range: 1 Hz to 1000000 Hz"));
}

#[test]
fn unknown_command_is_rejected_without_state_change() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);

    feed_line(&mut controller, &mut board, 1300, "bogus\r");

    assert!(!controller.remote().running());
    let console = controller.console_output();
    assert!(console.contains("Unknown command: bogus"));
    assert!(console.contains("Type 'menu' for help"));
}

#[test]
fn stop_command_halts_and_keeps_the_remembered_frequency() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);
    feed_line(&mut controller, &mut board, 1300, "freq 50\r");
    controller.clear_console();

    feed_line(&mut controller, &mut board, 1400, "stop\r");

    assert!(!controller.remote().running());
    assert_eq!(controller.remote().frequency_hz(), 50);
    assert!(board.active_pwm.is_none());
    assert_eq!(board.level, Some(false));
    assert!(controller.console_output().contains("Clock stopped"));
}

#[test]
fn toggle_command_halts_generation_then_flips_once() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);
    feed_line(&mut controller, &mut board, 1300, "freq 50\r");
    controller.clear_console();

    feed_line(&mut controller, &mut board, 1400, "toggle\r");

    assert!(!controller.remote().running());
    assert!(board.active_pwm.is_none());
    assert!(controller.signal().is_high);
    assert!(controller.console_output().contains("Clock toggled to HIGH"));
}

#[test]
fn button_press_exits_remote_to_the_previous_mode() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    controller.poll(1100, &press_high(), &mut board);
    in_remote(&mut controller, &mut board, 1200);

    controller.poll(1400, &press_single(), &mut board);

    assert_eq!(controller.mode(), ClockMode::HighFrequency);
    assert!(controller
        .console_output()
        .contains("Button pressed - returning to High Frequency mode"));
}

#[test]
fn deadline_expiry_exits_remote_to_the_previous_mode() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);

    // A byte pushes the deadline out
    controller.handle_console_byte(b's', 5000, &mut board);
    controller.poll(35_000, &IDLE, &mut board);
    assert_eq!(controller.mode(), ClockMode::Remote);

    controller.poll(35_001, &IDLE, &mut board);
    assert_eq!(controller.mode(), ClockMode::SingleStep);
    assert!(controller
        .console_output()
        .contains("UART menu timeout - returning to Single Step mode"));
}

#[test]
fn leaving_remote_tears_the_session_down() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);
    feed_line(&mut controller, &mut board, 1300, "freq 50\r");

    controller.poll(1400, &press_single(), &mut board);

    assert!(!controller.remote().running());
    assert_eq!(controller.remote().frequency_hz(), 0);
    assert!(!controller.remote().line_pending());
}

#[test]
fn bytes_outside_remote_mode_are_discarded() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    feed_line(&mut controller, &mut board, 1100, "freq 50\r");

    assert_eq!(controller.mode(), ClockMode::SingleStep);
    assert!(!controller.remote().running());
    assert!(controller.console_output().is_empty());
}

// ============================================================================
// Power Tests
// ============================================================================

#[test]
fn power_button_drives_the_latch_and_line() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    controller.poll(1100, &press_power(), &mut board);
    assert!(controller.power_on());
    assert_eq!(board.power_enabled, Some(true));
    assert!(controller.console_output().contains("Power ON"));

    controller.poll(1200, &press_power(), &mut board);
    assert!(!controller.power_on());
    assert_eq!(board.power_enabled, Some(false));
    assert!(controller.console_output().contains("Power OFF"));
}

#[test]
fn power_on_edge_forces_single_step_from_any_mode() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    controller.poll(1100, &press_high(), &mut board);
    assert_eq!(controller.mode(), ClockMode::HighFrequency);

    controller.poll(1200, &press_power(), &mut board);

    assert_eq!(controller.mode(), ClockMode::SingleStep);
    assert!(controller
        .console_output()
        .contains("Power ON - automatically switched to Mode 1 (Single Step)"));
}

#[test]
fn power_on_edge_interrupts_remote_and_clears_the_session() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);
    feed_line(&mut controller, &mut board, 1300, "freq 50\r");
    // A half-typed line is waiting when the edge arrives
    feed_line(&mut controller, &mut board, 1350, "stat");
    assert!(controller.remote().line_pending());

    controller.poll(1400, &press_power(), &mut board);

    assert!(controller.power_on());
    assert_eq!(controller.mode(), ClockMode::SingleStep);
    assert!(!controller.remote().running());
    assert_eq!(controller.remote().frequency_hz(), 0);
    assert!(!controller.remote().line_pending());
}

#[test]
fn power_off_does_not_change_the_mode() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    controller.poll(1100, &press_power(), &mut board);
    controller.poll(1200, &press_high(), &mut board);

    controller.poll(1300, &press_power(), &mut board);

    assert!(!controller.power_on());
    assert_eq!(controller.mode(), ClockMode::HighFrequency);
}

#[test]
fn remote_power_on_command_returns_to_single_step() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);

    feed_line(&mut controller, &mut board, 1300, "power on\r");

    assert!(controller.power_on());
    assert_eq!(controller.mode(), ClockMode::SingleStep);
    let console = controller.console_output();
    assert!(console.contains("Power turned ON"));
    assert!(console.contains("Automatically switched to Mode 1 (Single Step)"));
}

// ============================================================================
// Reset Sequencing Tests
// ============================================================================

#[test]
fn reset_button_starts_a_pulse_and_reports_it() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    controller.poll(1100, &press_reset(), &mut board);

    assert!(controller.reset_active());
    assert_eq!(board.reset_level, Some(false));
    assert!(controller.console_output().contains("Reset pulse initiated"));
}

#[test]
fn second_reset_request_is_refused() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    controller.poll(1100, &press_reset(), &mut board);
    controller.clear_console();

    controller.poll(1200, &press_reset(), &mut board);

    assert!(controller
        .console_output()
        .contains("Reset pulse already active"));
}

#[test]
fn single_step_reset_completes_after_six_rising_edges() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    controller.poll(1100, &press_reset(), &mut board);

    // Each accepted press flips the line; every second press is a rising
    // edge the sequencer counts
    let mut now = 1100;
    for press in 1..=11 {
        now += 60;
        controller.poll(now, &press_single(), &mut board);
        if press < 11 {
            assert!(controller.reset_active(), "completed early at press {press}");
        }
    }

    assert!(!controller.reset_active());
    assert_eq!(board.reset_level, Some(true));
    assert!(controller.console_output().contains("Reset pulse complete"));
}

#[test]
fn high_frequency_reset_runs_the_visibility_floor() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    controller.poll(1100, &press_high(), &mut board);

    controller.poll(1200, &press_reset(), &mut board);
    controller.poll(1209, &IDLE, &mut board);
    assert!(controller.reset_active());

    controller.poll(1210, &IDLE, &mut board);
    assert!(!controller.reset_active());
}

#[test]
fn remote_reset_command_defers_to_the_sequencer() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    in_remote(&mut controller, &mut board, 1100);

    feed_line(&mut controller, &mut board, 1300, "reset\r");
    assert!(controller.reset_active());
    assert!(controller.console_output().contains("Reset pulse initiated"));
    controller.clear_console();

    feed_line(&mut controller, &mut board, 1350, "reset\r");
    assert!(controller
        .console_output()
        .contains("Reset pulse already active"));
}

// ============================================================================
// Indicator Tests
// ============================================================================

#[test]
fn led_snapshot_follows_the_mode() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);

    let leds = controller.led_snapshot(1000);
    assert!(leds.single_step);
    assert!(!leds.low_freq && !leds.high_freq && !leds.remote);

    controller.poll(1100, &press_high(), &mut board);
    let leds = controller.led_snapshot(1100);
    assert!(leds.high_freq);
    assert!(leds.clock_activity, "PWM lights the activity indicator");
}

#[test]
fn reset_leds_track_the_pulse_lifecycle() {
    let mut board = BenchBoard::default();
    let mut controller = started(&mut board);
    controller.poll(1100, &press_high(), &mut board);
    controller.poll(1200, &press_reset(), &mut board);

    let leds = controller.led_snapshot(1205);
    assert!(leds.reset_low);
    assert!(!leds.reset_done);

    controller.poll(1210, &IDLE, &mut board);
    let leds = controller.led_snapshot(1210);
    assert!(!leds.reset_low);
    assert!(leds.reset_done);

    let leds = controller.led_snapshot(1500);
    assert!(!leds.reset_done, "indicator window is 250 ms");
}

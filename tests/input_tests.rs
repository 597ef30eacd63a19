//! Debounce Tracker Tests
//!
//! Run with: cargo test --features std --test input_tests

use clockgen_firmware::input::{ButtonId, DebounceTracker};

// ============================================================================
// Basic Debounce Window Tests
// ============================================================================

#[test]
fn accepts_a_stable_press() {
    let mut tracker = DebounceTracker::new();
    assert!(tracker.record_if_stable(ButtonId::SingleStep, true, 1000));
}

#[test]
fn never_accepts_twice_within_the_window() {
    let mut tracker = DebounceTracker::new();
    assert!(tracker.record_if_stable(ButtonId::SingleStep, true, 1000));

    for dt in 1..=50 {
        assert!(
            !tracker.record_if_stable(ButtonId::SingleStep, true, 1000 + dt),
            "accepted again after only {dt} ms"
        );
    }
}

#[test]
fn accepts_the_first_assertion_after_the_window() {
    let mut tracker = DebounceTracker::new();
    assert!(tracker.record_if_stable(ButtonId::Reset, true, 1000));
    assert!(!tracker.record_if_stable(ButtonId::Reset, true, 1050));
    assert!(tracker.record_if_stable(ButtonId::Reset, true, 1051));
}

#[test]
fn unasserted_input_is_never_accepted() {
    let mut tracker = DebounceTracker::new();
    assert!(!tracker.record_if_stable(ButtonId::Power, false, 1000));
    // A false return leaves the timer untouched
    assert!(tracker.record_if_stable(ButtonId::Power, true, 1001));
}

// ============================================================================
// Per-Input Independence Tests
// ============================================================================

#[test]
fn inputs_keep_independent_timers() {
    let mut tracker = DebounceTracker::new();
    assert!(tracker.record_if_stable(ButtonId::SingleStep, true, 1000));

    // Another input accepts inside the first one's window
    assert!(tracker.record_if_stable(ButtonId::LowFreq, true, 1010));
    assert!(tracker.record_if_stable(ButtonId::HighFreq, true, 1020));

    // And the first input's own window is unaffected by them
    assert!(!tracker.record_if_stable(ButtonId::SingleStep, true, 1040));
    assert!(tracker.record_if_stable(ButtonId::SingleStep, true, 1051));
}

#[test]
fn gesture_input_does_not_disturb_its_buttons() {
    let mut tracker = DebounceTracker::new();
    assert!(tracker.record_if_stable(ButtonId::RemoteGesture, true, 1000));
    // The gesture shares physical buttons with these ids but not timers
    assert!(tracker.record_if_stable(ButtonId::LowFreq, true, 1001));
    assert!(tracker.record_if_stable(ButtonId::HighFreq, true, 1001));
}

#[test]
fn holding_retriggers_once_per_window() {
    let mut tracker = DebounceTracker::new();
    let mut accepted = 0;
    for t in 0..1000u32 {
        if tracker.record_if_stable(ButtonId::SingleStep, true, 1000 + t) {
            accepted += 1;
        }
    }
    // 1 s of holding at a 50 ms window: the first accept plus one per
    // elapsed window
    assert!((15..=20).contains(&accepted), "accepted {accepted} times");
}

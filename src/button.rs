//! Button logic: classify raw down/up edges into short and long presses.
//!
//! The GPIO ISR posts `ButtonDown`/`ButtonUp` through the bus; this module
//! runs in the supervisor loop and turns them into `ButtonPress` (a debounced
//! short press) or `ButtonLongPress`. Long presses are announced at the
//! 3-second mark while the button is still held — the hold timer posts
//! `ButtonHoldExpired` and release is not awaited.

use core::time::Duration;

use crate::events::{EventBus, EventCode};
use crate::timers::{TimerId, TimerPort};

/// Presses shorter than this are contact bounce.
pub const DEBOUNCE_MS: u64 = 100;
/// Upper bound for a short press.
pub const SHORT_PRESS_MAX_MS: u64 = 1999;
/// Lower bound for a long press.
pub const LONG_PRESS_MIN_MS: u64 = 3000;

/// Debounce state. One instance per (single) button.
#[derive(Debug, Default)]
pub struct ButtonLogic {
    is_down: bool,
    down_at_ms: u64,
}

impl ButtonLogic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw down edge. Arms the hold timer; a re-triggered edge (bounce on
    /// the way down) just restarts it.
    pub fn on_down(&mut self, now_ms: u64, timers: &mut impl TimerPort) {
        self.is_down = true;
        self.down_at_ms = now_ms;
        timers.arm_oneshot(
            TimerId::ButtonHold,
            Duration::from_millis(LONG_PRESS_MIN_MS),
            EventCode::ButtonHoldExpired,
            None,
        );
    }

    /// Raw up edge: classify by hold duration.
    pub fn on_up(&mut self, now_ms: u64, timers: &mut impl TimerPort, bus: &EventBus) {
        if !self.is_down {
            // Spurious, or the hold timer already emitted the long press.
            return;
        }
        timers.cancel(TimerId::ButtonHold);
        self.is_down = false;
        let held_ms = now_ms.saturating_sub(self.down_at_ms);
        if (DEBOUNCE_MS..=SHORT_PRESS_MAX_MS).contains(&held_ms) {
            bus.post(EventCode::ButtonPress);
        } else if held_ms >= LONG_PRESS_MIN_MS {
            // Normally the hold timer got here first; this is the backstop
            // for a late or lost timer event.
            bus.post(EventCode::ButtonLongPress);
        }
        // In-between durations produce nothing.
    }

    /// The hold timer fired. Emits the long press if the button is still
    /// down; a tick that arrives after release is ignored.
    pub fn on_hold_expired(&mut self, bus: &EventBus) {
        if self.is_down {
            self.is_down = false;
            bus.post(EventCode::ButtonLongPress);
        }
    }

    pub fn is_down(&self) -> bool {
        self.is_down
    }
}

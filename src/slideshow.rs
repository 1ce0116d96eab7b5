//! Slideshow sequencer: rotate icon+value screens on the OLED.
//!
//! An integer cursor walks the factor metadata table; −1 means "show the
//! splash and rotate in freshly arrived data". A pending one-shot message
//! (mode banners, "No WiFi") overrides the next scheduled view once.
//!
//! New snapshots are staged in `next` and swapped in only at the splash
//! slot, so one rotation always shows one consistent observation.

use core::time::Duration;

use crate::events::{EventBus, EventCode};
use crate::ports::DisplayPort;
use crate::sensor::{FACTORS, SensorSnapshot};
use crate::timers::{TimerId, TimerPort};

pub struct Slideshow {
    running: bool,
    /// −1 is the splash slot; 0.. index [`FACTORS`].
    next_view: i32,
    current: Option<Box<SensorSnapshot>>,
    next: Option<Box<SensorSnapshot>>,
    pending_message: Option<String>,
}

impl Default for Slideshow {
    fn default() -> Self {
        Self::new()
    }
}

impl Slideshow {
    pub fn new() -> Self {
        Self { running: false, next_view: -1, current: None, next: None, pending_message: None }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start (or restart) the rotation. Posts one immediate tick so the
    /// first screen does not wait out a full period.
    pub fn start(&mut self, timers: &mut impl TimerPort, bus: &EventBus) {
        self.running = true;
        timers.arm_periodic(
            TimerId::SlideshowTick,
            slideshow_period(),
            EventCode::SlideshowWork,
            None,
        );
        bus.post(EventCode::SlideshowWork);
    }

    /// Halt the rotation. Late ticks are gated by the running flag.
    pub fn stop(&mut self, timers: &mut impl TimerPort) {
        self.running = false;
        timers.cancel(TimerId::SlideshowTick);
    }

    /// Rewind to the splash slot.
    pub fn reset(&mut self) {
        self.next_view = -1;
    }

    /// Stage a new observation; replaces any not-yet-shown one.
    pub fn new_data(&mut self, snapshot: Box<SensorSnapshot>) {
        self.next = Some(snapshot);
    }

    /// Show a message in the next slot, once; replaces any pending one.
    pub fn show_message_once(&mut self, message: String) {
        self.pending_message = Some(message);
    }

    /// One `SlideshowWork` tick: render the next screen.
    pub fn tick(&mut self, display: &mut impl DisplayPort) {
        if !self.running {
            return;
        }
        loop {
            if let Some(msg) = self.pending_message.take() {
                // The cursor does not advance; the overridden view shows
                // next time around.
                display.text(&msg);
                return;
            }

            if self.next_view == -1 {
                display.splash();
                if let Some(next) = self.next.take() {
                    self.current = Some(next);
                }
                self.next_view = 0;
                return;
            }

            let Some(current) = self.current.as_deref() else {
                // Nothing to show yet; wrap to the splash.
                self.next_view = -1;
                continue;
            };

            let Some(meta) = FACTORS.get(self.next_view as usize) else {
                // Past the last factor; wrap.
                self.next_view = -1;
                continue;
            };

            if !meta.displayable {
                self.next_view += 1;
                continue;
            }
            let Some(value) = current.display_value(meta.factor) else {
                // Invalid this round; try the next factor.
                self.next_view += 1;
                continue;
            };

            display.view(meta.factor, &value, meta.display_unit);
            self.next_view += 1;
            return;
        }
    }
}

fn slideshow_period() -> Duration {
    crate::cadence::slideshow_tick()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::display::{Rendered, SimDisplay};
    use crate::adapters::timer::FakeTimers;
    use crate::sensor::Factor;

    fn rig() -> (Slideshow, SimDisplay, FakeTimers, EventBus) {
        (Slideshow::new(), SimDisplay::new(), FakeTimers::new(), EventBus::new())
    }

    fn snapshot() -> Box<SensorSnapshot> {
        Box::new(SensorSnapshot {
            sequence: 1,
            timestamp: 10,
            temperature_c: Some(21.0),
            humidity_pct: Some(40.0),
            eco2_ppm: Some(700),
            air_status: Some(0),
            ..SensorSnapshot::default()
        })
    }

    #[test]
    fn no_data_shows_splash_forever() {
        let (mut show, mut display, mut timers, bus) = rig();
        show.start(&mut timers, &bus);
        for _ in 0..3 {
            show.tick(&mut display);
        }
        assert!(display.rendered.iter().all(|r| matches!(r, Rendered::Splash)));
        assert_eq!(display.rendered.len(), 3);
    }

    #[test]
    fn rotation_skips_invalid_and_nondisplayable_factors() {
        let (mut show, mut display, mut timers, bus) = rig();
        show.start(&mut timers, &bus);
        show.new_data(snapshot());

        // Splash swaps the data in, then the three valid factors rotate,
        // then splash again. airsensor (valid but non-displayable) and the
        // invalid factors never appear.
        let mut seen = Vec::new();
        for _ in 0..5 {
            show.tick(&mut display);
            seen.push(display.rendered.last().unwrap().clone());
        }
        assert!(matches!(seen[0], Rendered::Splash));
        assert!(matches!(seen[1], Rendered::View { factor: Factor::Temperature, .. }));
        assert!(matches!(seen[2], Rendered::View { factor: Factor::Humidity, .. }));
        assert!(matches!(seen[3], Rendered::View { factor: Factor::Co2, .. }));
        assert!(matches!(seen[4], Rendered::Splash));
    }

    #[test]
    fn message_overrides_one_slot_without_advancing() {
        let (mut show, mut display, mut timers, bus) = rig();
        show.start(&mut timers, &bus);
        show.new_data(snapshot());
        show.tick(&mut display); // Splash.

        show.show_message_once("Monitoring mode".into());
        show.tick(&mut display);
        assert!(matches!(
            display.rendered.last(),
            Some(Rendered::Text(t)) if t == "Monitoring mode"
        ));

        // The overridden view (temperature) shows next.
        show.tick(&mut display);
        assert!(matches!(
            display.rendered.last(),
            Some(Rendered::View { factor: Factor::Temperature, .. })
        ));
    }

    #[test]
    fn newer_message_replaces_pending_one() {
        let (mut show, mut display, mut timers, bus) = rig();
        show.start(&mut timers, &bus);
        show.show_message_once("first".into());
        show.show_message_once("second".into());
        show.tick(&mut display);
        assert!(matches!(display.rendered.last(), Some(Rendered::Text(t)) if t == "second"));
        // Shown exactly once.
        show.tick(&mut display);
        assert!(matches!(display.rendered.last(), Some(Rendered::Splash)));
    }

    #[test]
    fn new_data_swaps_in_only_at_splash() {
        let (mut show, mut display, mut timers, bus) = rig();
        show.start(&mut timers, &bus);
        show.new_data(snapshot());
        show.tick(&mut display); // Splash: snapshot #1 active.
        show.tick(&mut display); // Temperature of #1.

        let mut newer = snapshot();
        newer.temperature_c = Some(30.0);
        show.new_data(newer);
        show.tick(&mut display); // Humidity — still #1.
        assert!(matches!(
            display.rendered.last(),
            Some(Rendered::View { factor: Factor::Humidity, .. })
        ));
        show.tick(&mut display); // CO2 of #1.
        show.tick(&mut display); // Splash: #2 swapped in.
        show.tick(&mut display);
        assert!(matches!(
            display.rendered.last(),
            Some(Rendered::View { factor: Factor::Temperature, value, .. }) if value == "30.0"
        ));
    }

    #[test]
    fn stop_gates_late_ticks() {
        let (mut show, mut display, mut timers, bus) = rig();
        show.start(&mut timers, &bus);
        show.stop(&mut timers);
        show.tick(&mut display); // Tick already queued at stop time.
        assert!(display.rendered.is_empty());
        assert!(!timers.is_armed(TimerId::SlideshowTick));
    }

    #[test]
    fn reset_rewinds_to_splash() {
        let (mut show, mut display, mut timers, bus) = rig();
        show.start(&mut timers, &bus);
        show.new_data(snapshot());
        show.tick(&mut display); // Splash.
        show.tick(&mut display); // Temperature.
        show.reset();
        show.tick(&mut display);
        assert!(matches!(display.rendered.last(), Some(Rendered::Splash)));
    }
}

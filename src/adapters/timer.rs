//! Timer adapter.
//!
//! [`EspTimers`] backs [`TimerPort`] with the esp_timer service; callbacks
//! run in the timer task (not ISR context) and only post to the event bus.
//! [`FakeTimers`] is the host backend: it records what is armed and lets
//! tests fire expiries by hand.

use core::time::Duration;

use crate::events::{EventBus, EventCode};
use crate::timers::{TimerId, TimerPort};

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use std::sync::Arc;

    use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};
    use log::warn;

    use super::{Duration, EventBus, EventCode, TimerId, TimerPort};

    /// TimerPort over the esp_timer service. One slot per [`TimerId`];
    /// re-arming a slot drops (and thereby cancels) the previous timer.
    pub struct EspTimers {
        service: EspTaskTimerService,
        bus: Arc<EventBus>,
        slots: [Option<EspTimer<'static>>; TimerId::COUNT],
    }

    impl EspTimers {
        pub fn new(bus: Arc<EventBus>) -> Result<Self, crate::error::Error> {
            let service =
                EspTaskTimerService::new().map_err(|_| crate::error::Error::Init("esp_timer"))?;
            Ok(Self { service, bus, slots: [const { None }; TimerId::COUNT] })
        }

        fn arm(
            &mut self,
            id: TimerId,
            after: Duration,
            periodic: bool,
            code: EventCode,
            arg: Option<u32>,
        ) {
            let bus = Arc::clone(&self.bus);
            let timer = self.service.timer(move || match arg {
                Some(value) => bus.post_scalar(code, value),
                None => bus.post(code),
            });
            match timer {
                Ok(timer) => {
                    let armed = if periodic { timer.every(after) } else { timer.after(after) };
                    if let Err(e) = armed {
                        warn!("timer {id:?}: arm failed: {e}");
                        return;
                    }
                    // Replaces (and cancels) whatever was in the slot.
                    self.slots[id.index()] = Some(timer);
                }
                Err(e) => warn!("timer {id:?}: create failed: {e}"),
            }
        }
    }

    impl TimerPort for EspTimers {
        fn arm_oneshot(
            &mut self,
            id: TimerId,
            after: Duration,
            code: EventCode,
            arg: Option<u32>,
        ) {
            self.arm(id, after, false, code, arg);
        }

        fn arm_periodic(
            &mut self,
            id: TimerId,
            period: Duration,
            code: EventCode,
            arg: Option<u32>,
        ) {
            self.arm(id, period, true, code, arg);
        }

        fn cancel(&mut self, id: TimerId) {
            self.slots[id.index()] = None;
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspTimers;

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

/// What a slot currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedTimer {
    pub after: Duration,
    pub periodic: bool,
    pub code: EventCode,
    pub arg: Option<u32>,
}

/// Recording TimerPort for host tests: nothing fires until the test says
/// so.
#[derive(Debug, Default)]
pub struct FakeTimers {
    slots: [Option<ArmedTimer>; TimerId::COUNT],
}

impl FakeTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slots[id.index()].is_some()
    }

    pub fn armed(&self, id: TimerId) -> Option<&ArmedTimer> {
        self.slots[id.index()].as_ref()
    }

    pub fn armed_duration(&self, id: TimerId) -> Option<Duration> {
        self.armed(id).map(|t| t.after)
    }

    pub fn armed_code(&self, id: TimerId) -> Option<EventCode> {
        self.armed(id).map(|t| t.code)
    }

    /// Fire a slot: post its event and, for a one-shot, disarm it.
    /// Returns false if nothing was armed.
    pub fn fire(&mut self, id: TimerId, bus: &EventBus) -> bool {
        let Some(armed) = self.slots[id.index()].clone() else {
            return false;
        };
        match armed.arg {
            Some(value) => bus.post_scalar(armed.code, value),
            None => bus.post(armed.code),
        }
        if !armed.periodic {
            self.slots[id.index()] = None;
        }
        true
    }
}

impl TimerPort for FakeTimers {
    fn arm_oneshot(&mut self, id: TimerId, after: Duration, code: EventCode, arg: Option<u32>) {
        self.slots[id.index()] = Some(ArmedTimer { after, periodic: false, code, arg });
    }

    fn arm_periodic(&mut self, id: TimerId, period: Duration, code: EventCode, arg: Option<u32>) {
        self.slots[id.index()] = Some(ArmedTimer { after: period, periodic: true, code, arg });
    }

    fn cancel(&mut self, id: TimerId) {
        self.slots[id.index()] = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_replaces_and_fire_clears_oneshot() {
        let bus = EventBus::new();
        let mut timers = FakeTimers::new();
        timers.arm_oneshot(
            TimerId::Master,
            Duration::from_secs(60),
            EventCode::CommActivityExpired,
            None,
        );
        timers.arm_oneshot(TimerId::Master, Duration::from_secs(30), EventCode::SleepStart, None);
        assert_eq!(timers.armed_code(TimerId::Master), Some(EventCode::SleepStart));

        assert!(timers.fire(TimerId::Master, &bus));
        assert!(!timers.is_armed(TimerId::Master));
        assert_eq!(bus.try_receive().unwrap().code, EventCode::SleepStart);
        assert!(!timers.fire(TimerId::Master, &bus));
    }

    #[test]
    fn periodic_stays_armed_after_fire() {
        let bus = EventBus::new();
        let mut timers = FakeTimers::new();
        timers.arm_periodic(
            TimerId::SlideshowTick,
            Duration::from_secs(2),
            EventCode::SlideshowWork,
            None,
        );
        assert!(timers.fire(TimerId::SlideshowTick, &bus));
        assert!(timers.is_armed(TimerId::SlideshowTick));
    }
}

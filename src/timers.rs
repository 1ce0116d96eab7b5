//! Timer port — the boundary between components and the platform timers.
//!
//! Components never touch the timer hardware; they arm named timers through
//! [`TimerPort`], and each expiry posts a scalar event to the bus. Callbacks
//! run in the timer service's own task context and must only post — core
//! state is mutated exclusively by the supervisor loop's handlers.
//!
//! "Stop" cannot unpost an already-queued tick, so every component gates its
//! tick handling on its own running flag.

use core::time::Duration;

use crate::events::EventCode;

/// Identity of every timer in the system. One slot per id: re-arming an id
/// replaces its pending expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    /// The supervisor's single window timeout. The payload code varies per
    /// window (comm activity, relaxation, sleep, monitoring).
    Master,
    /// Wi-Fi station connect retry (~500 ms).
    WifiRetry,
    /// Broker state-machine tick (~500 ms backoff).
    BrokerWork,
    /// Time-service retry (10 s).
    TimeRetry,
    /// Slideshow advance (2 s period).
    SlideshowTick,
    /// Sensor warmup sub-interval (one-shot, re-armed per tick).
    MonitorWarmup,
    /// PIR integration (1 s period).
    MonitorPir,
    /// Microphone integration (10 ms period).
    MonitorMems,
    /// Button long-press detection (3 s one-shot).
    ButtonHold,
}

impl TimerId {
    pub const COUNT: usize = 9;

    pub const fn index(self) -> usize {
        match self {
            Self::Master => 0,
            Self::WifiRetry => 1,
            Self::BrokerWork => 2,
            Self::TimeRetry => 3,
            Self::SlideshowTick => 4,
            Self::MonitorWarmup => 5,
            Self::MonitorPir => 6,
            Self::MonitorMems => 7,
            Self::ButtonHold => 8,
        }
    }
}

/// Platform timer service.
///
/// One-shot timers fire once; periodic timers fire until cancelled. Either
/// way the expiry posts `code` (with `arg`, if any) to the event bus.
pub trait TimerPort {
    /// Arm a one-shot timer, replacing any pending expiry for `id`.
    fn arm_oneshot(&mut self, id: TimerId, after: Duration, code: EventCode, arg: Option<u32>);

    /// Arm a periodic timer, replacing any pending schedule for `id`.
    fn arm_periodic(&mut self, id: TimerId, period: Duration, code: EventCode, arg: Option<u32>);

    /// Cancel a timer. Already-posted events are not recalled.
    fn cancel(&mut self, id: TimerId);
}

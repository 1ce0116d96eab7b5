//! Time service: one-shot clock synchronization against a network source.
//!
//! Runs only inside the comm window. On success the system clock is
//! stepped, and the adjustment (delta seconds) is recorded in the scratch
//! area so that observations captured before the sync can be re-stamped by
//! the broker client.
//!
//! Once the clock has been configured the service never runs again for the
//! life of the process.

use log::{info, warn};

use crate::events::{EventBus, EventCode};
use crate::ports::{ClockPort, StoragePort, TimeFetch, TimeSourcePort};
use crate::scratch::PersistentScratch;
use crate::timers::{TimerId, TimerPort};

/// Plausibility window for a fetched epoch; anything outside is a bogus
/// answer from the source and is retried later.
const EPOCH_MIN: i64 = 1_680_000_000; // 2023-03-28
const EPOCH_MAX: i64 = 2_145_916_800; // 2038-01-01

pub struct TimeSync {
    active: bool,
}

impl Default for TimeSync {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSync {
    pub fn new() -> Self {
        Self { active: false }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the comm window should be opened for this service.
    pub fn have_work(&self, scratch: &PersistentScratch) -> bool {
        !scratch.time_configured || self.active
    }

    /// Begin a sync attempt. No-op once the clock is configured.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        &mut self,
        source: &mut impl TimeSourcePort,
        clock: &mut impl ClockPort,
        scratch: &mut PersistentScratch,
        storage: &mut impl StoragePort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        if scratch.time_configured {
            return;
        }
        info!("time: attempting to configure clock");
        self.active = true;
        source.begin();
        self.step(source, clock, scratch, storage, timers, bus);
    }

    /// A `CommTimeWork` tick.
    #[allow(clippy::too_many_arguments)]
    pub fn work(
        &mut self,
        source: &mut impl TimeSourcePort,
        clock: &mut impl ClockPort,
        scratch: &mut PersistentScratch,
        storage: &mut impl StoragePort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        if scratch.time_configured || !self.active {
            // Spurious tick after the window closed or after success.
            return;
        }
        self.step(source, clock, scratch, storage, timers, bus);
    }

    #[allow(clippy::too_many_arguments)]
    fn step(
        &mut self,
        source: &mut impl TimeSourcePort,
        clock: &mut impl ClockPort,
        scratch: &mut PersistentScratch,
        storage: &mut impl StoragePort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        bus.post(EventCode::CommActivity);
        match source.try_fetch() {
            TimeFetch::Ready(epoch) => {
                if !(EPOCH_MIN..EPOCH_MAX).contains(&epoch) {
                    // Usually a spurious answer; retry in the next window.
                    warn!("time: implausible epoch {epoch}, will retry later");
                    self.stop(source, timers);
                    return;
                }
                let now = clock.epoch();
                clock.set_epoch(epoch);
                scratch.time_adjust = epoch - now;
                scratch.time_configured = true;
                scratch.save(storage);
                info!("time: configured, adjustment {}s", scratch.time_adjust);
                self.stop(source, timers);
            }
            TimeFetch::Pending => {
                timers.arm_oneshot(
                    TimerId::TimeRetry,
                    crate::cadence::time_retry(),
                    EventCode::CommTimeWork,
                    None,
                );
            }
            TimeFetch::Failed => {
                // Source seems dead; retry in the next comm window.
                warn!("time: fetch failed, will retry later");
                self.stop(source, timers);
            }
        }
    }

    /// Abandon any in-flight attempt and stop the retry timer.
    pub fn stop(&mut self, source: &mut impl TimeSourcePort, timers: &mut impl TimerPort) {
        self.active = false;
        source.stop();
        timers.cancel(TimerId::TimeRetry);
    }
}

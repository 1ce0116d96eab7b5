//! Monitoring pipeline: warmup, window integration, snapshot emit.
//!
//! A monitoring window runs in two phases:
//!
//! 1. **Warmup** — the warmup time is split into five equal sub-intervals;
//!    each tick reads all sensors and discards the values (which keeps the
//!    chips exercised while they stabilise).
//! 2. **Integration** — the PIR is OR-ed into a latch once a second and the
//!    microphone max-sampled every 10 ms until the window closes.
//!
//! `stop` takes the final gated snapshot and posts it as `MonitorData`
//! (owned). Ticks arriving after `stop` are gated out by the running flag;
//! the timers cannot unpost them.

use core::time::Duration;

use log::info;

use crate::cadence::{self, DisplayMode};
use crate::events::{EventBus, EventCode, Payload};
use crate::ports::{ClockPort, DevicePort};
use crate::sensor::Sampler;
use crate::timers::{TimerId, TimerPort};

/// Warmup sub-intervals per window. Always exactly five.
pub const WARMUP_ITERATIONS: u32 = 5;

const PIR_PERIOD: Duration = Duration::from_secs(1);
const MEMS_PERIOD: Duration = Duration::from_millis(10);

/// Sub-step selector carried in the `MonitorWork` scalar payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MonitorTick {
    Warmup = 0,
    GoToWork = 1,
    SamplePir = 2,
    SampleMems = 3,
}

impl MonitorTick {
    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Warmup),
            1 => Some(Self::GoToWork),
            2 => Some(Self::SamplePir),
            3 => Some(Self::SampleMems),
            _ => None,
        }
    }
}

pub struct Monitor {
    running: bool,
    warmup_count: u32,
    sampler: Sampler,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor {
    pub fn new() -> Self {
        Self { running: false, warmup_count: 0, sampler: Sampler::new() }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The peripherals were power-cycled; the air sensor lost its
    /// compensation point.
    pub fn notify_power_cycle(&mut self) {
        self.sampler.on_power_cycle();
    }

    /// Open the monitoring window: begin the warmup sequence.
    ///
    /// # Panics
    ///
    /// The window must be longer than the warmup it contains; a
    /// configuration where it is not cannot produce a single observation
    /// and is a firmware bug.
    pub fn start(&mut self, mode: DisplayMode, timers: &mut impl TimerPort) {
        if self.running {
            return;
        }
        assert!(
            cadence::monitoring_window_s(mode) > cadence::sensor_warmup_time_s(mode),
            "monitoring window shorter than sensor warmup"
        );
        self.running = true;
        self.warmup_count = 0;
        timers.arm_oneshot(
            TimerId::MonitorWarmup,
            warmup_slice(mode),
            EventCode::MonitorWork,
            Some(MonitorTick::Warmup as u32),
        );
    }

    /// A `MonitorWork` tick. `which` is the scalar payload.
    pub fn tick(
        &mut self,
        which: u32,
        device: &mut impl DevicePort,
        clock: &impl ClockPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
        mode: DisplayMode,
    ) {
        if !self.running {
            return; // Late tick after stop.
        }
        match MonitorTick::from_u32(which) {
            Some(MonitorTick::Warmup) => {
                // Read and discard; the chips appreciate the attention.
                let _ = self.sampler.capture(device, clock.epoch());
                self.sampler.sample_pir(device);
                self.sampler.sample_mems(device);
                self.warmup_count += 1;
                if self.warmup_count < WARMUP_ITERATIONS {
                    timers.arm_oneshot(
                        TimerId::MonitorWarmup,
                        warmup_slice(mode),
                        EventCode::MonitorWork,
                        Some(MonitorTick::Warmup as u32),
                    );
                } else {
                    bus.post_scalar(EventCode::MonitorWork, MonitorTick::GoToWork as u32);
                }
            }
            Some(MonitorTick::GoToWork) => {
                self.sampler.reset_window();
                self.sampler.sample_pir(device);
                self.sampler.sample_mems(device);
                timers.arm_periodic(
                    TimerId::MonitorPir,
                    PIR_PERIOD,
                    EventCode::MonitorWork,
                    Some(MonitorTick::SamplePir as u32),
                );
                timers.arm_periodic(
                    TimerId::MonitorMems,
                    MEMS_PERIOD,
                    EventCode::MonitorWork,
                    Some(MonitorTick::SampleMems as u32),
                );
            }
            Some(MonitorTick::SamplePir) => self.sampler.sample_pir(device),
            Some(MonitorTick::SampleMems) => self.sampler.sample_mems(device),
            None => panic!("monitoring tick with unknown selector {which}"),
        }
    }

    /// Close the window: stop the timers, take the final snapshot, and
    /// post it (owned) as `MonitorData`.
    pub fn stop(
        &mut self,
        device: &mut impl DevicePort,
        clock: &impl ClockPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        if !self.running {
            return;
        }
        self.running = false;
        timers.cancel(TimerId::MonitorWarmup);
        timers.cancel(TimerId::MonitorPir);
        timers.cancel(TimerId::MonitorMems);
        let snapshot = self.sampler.capture(device, clock.epoch());
        info!("monitor: observation #{} complete", snapshot.sequence);
        bus.post_owned(EventCode::MonitorData, Payload::Snapshot(Box::new(snapshot)));
    }
}

fn warmup_slice(mode: DisplayMode) -> Duration {
    Duration::from_millis(
        u64::from(cadence::sensor_warmup_time_s(mode)) * 1000 / u64::from(WARMUP_ITERATIONS),
    )
}

//! Timing policy.
//!
//! All window lengths and tick rates in one place. Most depend on the
//! display mode: slideshow keeps the device powered and chatty, monitoring
//! stretches everything out to save the battery.

use core::time::Duration;

/// The two run modes, toggled by a short button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Stay powered, rotate readings on the display, sample often.
    #[default]
    Slideshow,
    /// Power down between observations; rare uploads.
    Monitoring,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Slideshow => Self::Monitoring,
            Self::Monitoring => Self::Slideshow,
        }
    }

    /// Banner text shown when the mode is toggled or committed.
    pub fn banner(self) -> &'static str {
        match self {
            Self::Slideshow => "Slideshow mode",
            Self::Monitoring => "Monitoring mode",
        }
    }
}

const MINUTE: u32 = 60;
const HOUR: u32 = 60 * 60;

/// Comm window stays open this long after the last activity.
pub fn comm_activity_timeout_s() -> u32 {
    60
}

/// Slideshow runs this long after the comm window closes, before sleep.
pub fn comm_relaxation_timeout_s() -> u32 {
    60
}

/// Length of the sleep window in monitoring mode.
pub fn monitoring_mode_sleep_s() -> u32 {
    HOUR
}

/// Length of the sleep window in slideshow mode (device stays powered).
pub fn slideshow_mode_sleep_s() -> u32 {
    5 * MINUTE
}

/// Station-mode connect retry cadence.
pub fn wifi_retry() -> Duration {
    Duration::from_millis(500)
}

/// Broker state-machine retry/backoff cadence.
pub fn broker_retry() -> Duration {
    Duration::from_millis(500)
}

/// Time-service retry cadence within a comm window.
pub fn time_retry() -> Duration {
    Duration::from_secs(10)
}

/// Slideshow advance period.
pub fn slideshow_tick() -> Duration {
    Duration::from_secs(2)
}

/// Sensor warmup ahead of the real sampling.
///
/// In slideshow mode the sensors are already powered, but zero is not a
/// valid warmup.
pub fn sensor_warmup_time_s(mode: DisplayMode) -> u32 {
    match mode {
        DisplayMode::Slideshow => 1,
        DisplayMode::Monitoring => 15,
    }
}

/// Length of the monitoring window. Must exceed the warmup (checked by the
/// monitor on start); the margin is what the PIR and microphone integrate
/// over.
pub fn monitoring_window_s(mode: DisplayMode) -> u32 {
    sensor_warmup_time_s(mode) + 15
}

/// How often an observation is captured for upload.
pub fn default_capture_interval_s(mode: DisplayMode) -> u32 {
    match mode {
        DisplayMode::Slideshow => MINUTE,
        DisplayMode::Monitoring => 30 * MINUTE,
    }
}

/// How long captured observations are held before a broker connection is
/// worth the power.
pub fn upload_interval_s(mode: DisplayMode) -> u32 {
    match mode {
        DisplayMode::Slideshow => 5 * MINUTE,
        DisplayMode::Monitoring => 4 * HOUR,
    }
}

/// Hard ceiling on time between broker connections. The device must check
/// in for control messages even with nothing to upload — a disabled device
/// produces no outbound traffic but still needs to hear "enable".
pub fn max_unconnected_time_s() -> u32 {
    4 * HOUR
}

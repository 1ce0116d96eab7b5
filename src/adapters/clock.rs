//! Clock adapter: wall-clock epoch plus monotonic uptime.
//!
//! The epoch view is *virtual*: a base plus the monotonic uptime. Stepping
//! the clock moves the base (and, on the device, the system RTC). Keeping
//! the virtual view independent of the system clock means a concurrent
//! SNTP step cannot yank the epoch out from under the time service while
//! it is computing the adjustment delta.

use crate::ports::ClockPort;

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct EspClock {
    /// Epoch seconds at boot (uptime zero).
    base: i64,
}

#[cfg(target_os = "espidf")]
impl EspClock {
    pub fn new() -> Self {
        // Whatever the RTC thinks at boot; usually some time in 1970.
        let base = Self::system_epoch();
        Self { base }
    }

    fn system_epoch() -> i64 {
        let mut tv = esp_idf_svc::sys::timeval { tv_sec: 0, tv_usec: 0 };
        // SAFETY: gettimeofday writes the struct we hand it; no aliasing.
        unsafe {
            esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut());
        }
        tv.tv_sec as i64
    }

    fn uptime_us() -> u64 {
        // SAFETY: esp_timer_get_time reads a monotonic counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }
}

#[cfg(target_os = "espidf")]
impl Default for EspClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
impl ClockPort for EspClock {
    fn epoch(&self) -> i64 {
        self.base + (Self::uptime_us() / 1_000_000) as i64
    }

    fn set_epoch(&mut self, epoch: i64) {
        self.base = epoch - (Self::uptime_us() / 1_000_000) as i64;
        let tv = esp_idf_svc::sys::timeval {
            tv_sec: epoch as esp_idf_svc::sys::time_t,
            tv_usec: 0,
        };
        // SAFETY: settimeofday reads the struct we hand it.
        unsafe {
            esp_idf_svc::sys::settimeofday(&tv, core::ptr::null_mut());
        }
    }

    fn uptime_ms(&self) -> u64 {
        Self::uptime_us() / 1000
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

/// Host-side clock with manually advanced time, for tests and simulation.
#[derive(Debug, Clone)]
pub struct SimClock {
    epoch: i64,
    uptime_ms: u64,
}

impl SimClock {
    pub fn new(epoch: i64) -> Self {
        Self { epoch, uptime_ms: 0 }
    }

    /// Advance both the epoch and the uptime by `seconds`.
    pub fn advance(&mut self, seconds: i64) {
        self.epoch += seconds;
        self.uptime_ms += (seconds.max(0) as u64) * 1000;
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.uptime_ms += ms;
        self.epoch += (ms / 1000) as i64;
    }
}

impl ClockPort for SimClock {
    fn epoch(&self) -> i64 {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: i64) {
        self.epoch = epoch;
    }

    fn uptime_ms(&self) -> u64 {
        self.uptime_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_clock_advances_and_steps() {
        let mut clock = SimClock::new(1000);
        clock.advance(5);
        assert_eq!(clock.epoch(), 1005);
        assert_eq!(clock.uptime_ms(), 5000);
        clock.set_epoch(2_000_000);
        assert_eq!(clock.epoch(), 2_000_000);
        // Uptime is monotonic and unaffected by epoch steps.
        assert_eq!(clock.uptime_ms(), 5000);
    }
}

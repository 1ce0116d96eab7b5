//! Network time source adapter.
//!
//! Implements [`TimeSourcePort`]. On the device this wraps ESP-IDF SNTP:
//! `begin` spins the service up, `try_fetch` reports `Pending` until the
//! sync completes, then hands back the synchronized epoch. The simulation
//! backend returns whatever the test scripted.

use crate::ports::{TimeFetch, TimeSourcePort};

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::sntp::{EspSntp, SyncStatus};
    use log::warn;

    use super::{TimeFetch, TimeSourcePort};

    /// TimeSourcePort over ESP-IDF SNTP (pool.ntp.org by default).
    pub struct EspSntpSource {
        sntp: Option<EspSntp<'static>>,
    }

    impl Default for EspSntpSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl EspSntpSource {
        pub fn new() -> Self {
            Self { sntp: None }
        }

        fn system_epoch() -> i64 {
            let mut tv = esp_idf_svc::sys::timeval { tv_sec: 0, tv_usec: 0 };
            // SAFETY: gettimeofday writes the struct we hand it.
            unsafe {
                esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut());
            }
            tv.tv_sec as i64
        }
    }

    impl TimeSourcePort for EspSntpSource {
        fn begin(&mut self) {
            if self.sntp.is_none() {
                match EspSntp::new_default() {
                    Ok(sntp) => self.sntp = Some(sntp),
                    Err(e) => warn!("sntp: init failed: {e}"),
                }
            }
        }

        fn try_fetch(&mut self) -> TimeFetch {
            let Some(sntp) = self.sntp.as_ref() else {
                return TimeFetch::Failed;
            };
            match sntp.get_sync_status() {
                // SNTP has already stepped the system clock; reading it
                // back gives the synchronized epoch.
                SyncStatus::Completed => TimeFetch::Ready(Self::system_epoch()),
                SyncStatus::InProgress | SyncStatus::Reset => TimeFetch::Pending,
            }
        }

        fn stop(&mut self) {
            self.sntp = None; // Drop shuts the service down.
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspSntpSource;

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

/// Scriptable time source for host tests.
#[derive(Debug)]
pub struct SimTimeSource {
    result: TimeFetch,
    began: bool,
}

impl Default for SimTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTimeSource {
    pub fn new() -> Self {
        Self { result: TimeFetch::Pending, began: false }
    }

    pub fn set_result(&mut self, result: TimeFetch) {
        self.result = result;
    }

    pub fn began(&self) -> bool {
        self.began
    }
}

impl TimeSourcePort for SimTimeSource {
    fn begin(&mut self) {
        self.began = true;
    }

    fn try_fetch(&mut self) -> TimeFetch {
        self.result
    }

    fn stop(&mut self) {
        self.began = false;
    }
}

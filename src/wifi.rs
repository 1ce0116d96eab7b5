//! Wi-Fi connection manager.
//!
//! Drives the station-mode join across the three configured access points,
//! starting from the one that last worked (persisted in the scratch
//! record). The radio itself is behind [`WifiPort`]; this module owns the
//! retry policy and the `CommWifiUp`/`CommWifiFailed` notifications.
//!
//! `disable` cannot unpost retry events already in the queue, so the
//! supervisor tolerates `CommWifiRetry`/`CommWifiUp`/`CommWifiFailed`
//! arriving after the window closed — they land in `Stopped` and do
//! nothing.

use log::info;

use crate::events::{EventBus, EventCode};
use crate::ports::{StoragePort, WifiPort};
use crate::prefs::PrefStore;
use crate::scratch::PersistentScratch;
use crate::timers::{TimerId, TimerPort};

/// Join attempts per access point before moving to the next one.
const MAX_RETRIES_PER_AP: u32 = 10;
/// Configured access point slots.
const AP_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Starting,
    Retrying,
    Connected,
    Failed,
    Stopped,
}

pub struct WifiManager {
    state: WifiState,
    /// Access point currently being tried, 0..3.
    current_ap: usize,
    /// Slots consumed this attempt; three strikes and the window fails.
    aps_tried: usize,
    /// Retry ticks burned on the current slot.
    retries_on_ap: u32,
}

impl Default for WifiManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiManager {
    pub fn new() -> Self {
        Self { state: WifiState::Stopped, current_ap: 0, aps_tried: 0, retries_on_ap: 0 }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Open the station link: start from the last successful access point
    /// and work through the slots. Posts `CommWifiUp` or `CommWifiFailed`.
    #[allow(clippy::too_many_arguments)]
    pub fn enable_start(
        &mut self,
        prefs: &PrefStore,
        scratch: &mut PersistentScratch,
        storage: &mut impl StoragePort,
        radio: &mut impl WifiPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        self.aps_tried = 0;
        self.current_ap = usize::from(scratch.last_access_point) % AP_SLOTS;
        self.state = WifiState::Starting;
        self.connect_step(prefs, scratch, storage, radio, timers, bus);
    }

    /// A `CommWifiRetry` tick: advance the connect state machine.
    #[allow(clippy::too_many_arguments)]
    pub fn enable_retry(
        &mut self,
        prefs: &PrefStore,
        scratch: &mut PersistentScratch,
        storage: &mut impl StoragePort,
        radio: &mut impl WifiPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        self.connect_step(prefs, scratch, storage, radio, timers, bus);
    }

    #[allow(clippy::too_many_arguments)]
    fn connect_step(
        &mut self,
        prefs: &PrefStore,
        scratch: &mut PersistentScratch,
        storage: &mut impl StoragePort,
        radio: &mut impl WifiPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        loop {
            match self.state {
                WifiState::Starting => {
                    // Starting is re-entered once per slot; after all three
                    // the whole window fails.
                    if self.aps_tried == AP_SLOTS {
                        self.state = WifiState::Failed;
                        bus.post(EventCode::CommWifiFailed);
                        radio.leave();
                        info!("wifi: failed to connect to any access point");
                        return;
                    }
                    let ssid = prefs.access_point_ssid(self.current_ap + 1).to_owned();
                    let password = prefs.access_point_password(self.current_ap + 1).to_owned();
                    self.aps_tried += 1;
                    if ssid.is_empty() {
                        self.current_ap = (self.current_ap + 1) % AP_SLOTS;
                        continue;
                    }
                    self.retries_on_ap = 0;
                    info!("wifi: trying access point [{ssid}]");
                    let password = if password.is_empty() { None } else { Some(password) };
                    // A refusal from the radio counts as one missed tick;
                    // the retry timer re-drives the machine either way.
                    let _ = radio.join(&ssid, password.as_deref());
                    timers.arm_oneshot(
                        TimerId::WifiRetry,
                        crate::cadence::wifi_retry(),
                        EventCode::CommWifiRetry,
                        None,
                    );
                    self.state = WifiState::Retrying;
                    return;
                }
                WifiState::Retrying => {
                    if radio.is_up() {
                        scratch.last_access_point = self.current_ap as u8;
                        scratch.save(storage);
                        self.state = WifiState::Connected;
                        bus.post(EventCode::CommWifiUp);
                        info!(
                            "wifi: connected, ip {}",
                            radio.local_ip().unwrap_or_else(|| "?".into())
                        );
                        return;
                    }
                    if self.retries_on_ap == MAX_RETRIES_PER_AP {
                        self.current_ap = (self.current_ap + 1) % AP_SLOTS;
                        self.state = WifiState::Starting;
                        continue;
                    }
                    self.retries_on_ap += 1;
                    timers.arm_oneshot(
                        TimerId::WifiRetry,
                        crate::cadence::wifi_retry(),
                        EventCode::CommWifiRetry,
                        None,
                    );
                    return;
                }
                // Connected, Failed, Stopped: late tick, nothing to do.
                _ => return,
            }
        }
    }

    /// Close the station link and stop retrying.
    pub fn disable(&mut self, radio: &mut impl WifiPort, timers: &mut impl TimerPort) {
        match self.state {
            WifiState::Retrying | WifiState::Connected => {
                info!("wifi: disconnected");
                radio.leave();
            }
            _ => {}
        }
        timers.cancel(TimerId::WifiRetry);
        self.state = WifiState::Stopped;
    }

    /// Local IP while connected.
    pub fn local_ip(&self, radio: &impl WifiPort) -> Option<String> {
        if self.state == WifiState::Connected { radio.local_ip() } else { None }
    }

    /// Provisioning: stand up the open soft AP. Synchronous; returns the
    /// assigned IP.
    pub fn create_access_point(
        &mut self,
        radio: &mut impl WifiPort,
        ssid: &str,
        password: Option<&str>,
    ) -> Result<String, crate::error::NetError> {
        let ip = radio.start_access_point(ssid, password)?;
        self.state = WifiState::Connected;
        info!("wifi: soft AP [{ssid}], ip {ip}");
        Ok(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::nvs::MemStorage;
    use crate::adapters::timer::FakeTimers;
    use crate::adapters::wifi::SimWifi;

    struct Rig {
        prefs: PrefStore,
        scratch: PersistentScratch,
        storage: MemStorage,
        radio: SimWifi,
        timers: FakeTimers,
        bus: EventBus,
        mgr: WifiManager,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                prefs: PrefStore::new(),
                scratch: PersistentScratch::default(),
                storage: MemStorage::new(),
                radio: SimWifi::new(),
                timers: FakeTimers::new(),
                bus: EventBus::new(),
                mgr: WifiManager::new(),
            }
        }

        fn start(&mut self) {
            self.mgr.enable_start(
                &self.prefs,
                &mut self.scratch,
                &mut self.storage,
                &mut self.radio,
                &mut self.timers,
                &self.bus,
            );
        }

        fn retry(&mut self) {
            self.mgr.enable_retry(
                &self.prefs,
                &mut self.scratch,
                &mut self.storage,
                &mut self.radio,
                &mut self.timers,
                &self.bus,
            );
        }

        fn drain(&self) -> Vec<EventCode> {
            let mut out = Vec::new();
            while let Some(ev) = self.bus.try_receive() {
                out.push(ev.code);
            }
            out
        }
    }

    #[test]
    fn no_configured_networks_fails_immediately() {
        let mut rig = Rig::new();
        rig.start();
        assert_eq!(rig.mgr.state(), WifiState::Failed);
        assert_eq!(rig.drain(), vec![EventCode::CommWifiFailed]);
        assert!(!rig.timers.is_armed(TimerId::WifiRetry));
    }

    #[test]
    fn first_ap_connects_and_persists_index() {
        let mut rig = Rig::new();
        rig.prefs.set_access_point_ssid(1, "alpha");
        rig.start();
        assert_eq!(rig.mgr.state(), WifiState::Retrying);
        assert_eq!(rig.radio.join_attempts(), ["alpha"]);

        rig.radio.set_up(true);
        rig.retry();
        assert_eq!(rig.mgr.state(), WifiState::Connected);
        assert_eq!(rig.drain(), vec![EventCode::CommWifiUp]);
        assert_eq!(PersistentScratch::load(&rig.storage).last_access_point, 0);
    }

    #[test]
    fn second_ap_connects_after_ten_retries_on_first() {
        let mut rig = Rig::new();
        rig.prefs.set_access_point_ssid(1, "alpha");
        rig.prefs.set_access_point_ssid(2, "beta");
        rig.prefs.set_access_point_password(2, "s3cret");
        rig.start();

        // alpha never comes up: 10 retry ticks, then the manager moves on.
        for _ in 0..MAX_RETRIES_PER_AP {
            rig.retry();
            assert_eq!(rig.mgr.state(), WifiState::Retrying);
        }
        rig.retry(); // 11th tick: advance to beta.
        assert_eq!(rig.radio.join_attempts(), ["alpha", "beta"]);
        assert_eq!(rig.radio.last_password(), Some("s3cret".to_string()));

        rig.radio.set_up(true);
        rig.retry();
        assert_eq!(rig.mgr.state(), WifiState::Connected);
        assert_eq!(PersistentScratch::load(&rig.storage).last_access_point, 1);
    }

    #[test]
    fn failure_does_not_touch_persisted_index() {
        let mut rig = Rig::new();
        rig.scratch.last_access_point = 2;
        rig.scratch.save(&mut rig.storage);
        rig.prefs.set_access_point_ssid(3, "gamma");
        rig.start();
        // gamma (slot 3, the persisted starting point) never answers.
        for _ in 0..(MAX_RETRIES_PER_AP * 3 + 10) {
            rig.retry();
            if rig.mgr.state() == WifiState::Failed {
                break;
            }
        }
        assert_eq!(rig.mgr.state(), WifiState::Failed);
        assert_eq!(PersistentScratch::load(&rig.storage).last_access_point, 2);
    }

    #[test]
    fn starts_from_persisted_access_point() {
        let mut rig = Rig::new();
        rig.prefs.set_access_point_ssid(1, "alpha");
        rig.prefs.set_access_point_ssid(2, "beta");
        rig.scratch.last_access_point = 1;
        rig.start();
        assert_eq!(rig.radio.join_attempts(), ["beta"]);
    }

    #[test]
    fn empty_slots_are_skipped() {
        let mut rig = Rig::new();
        rig.prefs.set_access_point_ssid(3, "gamma");
        rig.start();
        // Slots 1 and 2 are empty; the manager lands on gamma directly.
        assert_eq!(rig.radio.join_attempts(), ["gamma"]);
        assert_eq!(rig.mgr.state(), WifiState::Retrying);
    }

    #[test]
    fn disable_is_idempotent_and_late_ticks_are_inert() {
        let mut rig = Rig::new();
        rig.prefs.set_access_point_ssid(1, "alpha");
        rig.start();
        rig.mgr.disable(&mut rig.radio, &mut rig.timers);
        assert_eq!(rig.mgr.state(), WifiState::Stopped);
        assert!(!rig.timers.is_armed(TimerId::WifiRetry));

        // A retry tick that was already queued arrives after disable.
        rig.retry();
        assert_eq!(rig.mgr.state(), WifiState::Stopped);
        assert!(rig.drain().is_empty());

        rig.mgr.disable(&mut rig.radio, &mut rig.timers);
        assert_eq!(rig.mgr.state(), WifiState::Stopped);
    }

    #[test]
    fn local_ip_only_while_connected() {
        let mut rig = Rig::new();
        rig.prefs.set_access_point_ssid(1, "alpha");
        rig.start();
        assert_eq!(rig.mgr.local_ip(&rig.radio), None);
        rig.radio.set_up(true);
        rig.retry();
        assert!(rig.mgr.local_ip(&rig.radio).is_some());
    }
}

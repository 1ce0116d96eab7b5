//! Main supervisor: the state machine that sequences the device's life.
//!
//! One cycle walks through four windows, each closed by the single master
//! timeout or by an explicit completion event:
//!
//! ```text
//! StartCycle ──▶ comm window ──▶ relaxation ──▶ sleep window ──▶
//!     ▲          (Wi-Fi up,                     (peripherals
//!     │           broker + time                  off in
//!     │           service run)                   monitoring mode)
//!     │                                              │
//!     └────── MonitorStop ◀── monitoring window ◀── PostSleep
//! ```
//!
//! Every handler runs to completion on the single consumer; the other
//! execution contexts (timers, ISRs, the MQTT callback thread) only post.
//! A short button press toggles the tentative mode, committed at the next
//! `SleepStart`; a long press abandons the cycle for provisioning mode.

use core::time::Duration;

use log::{info, warn};

use crate::broker::BrokerClient;
use crate::button::ButtonLogic;
use crate::cadence::{self, DisplayMode};
use crate::events::{Event, EventBus, EventCode, Payload};
use crate::monitor::Monitor;
use crate::ports::{
    BrokerTransport, ClockPort, DevicePort, DisplayPort, EntropyPort, StoragePort, TimeSourcePort,
    WifiPort,
};
use crate::prefs::PrefStore;
use crate::scratch::PersistentScratch;
use crate::sensor::SensorSnapshot;
use crate::slideshow::Slideshow;
use crate::timers::{TimerId, TimerPort};
use crate::timesync::TimeSync;
use crate::wifi::WifiManager;

/// Everything the supervisor reaches hardware through. One struct so the
/// call sites stay readable; each field is an independent port.
pub struct Platform<D, DS, R, BT, TS, ST, CL, TM, EN> {
    pub device: D,
    pub display: DS,
    pub radio: R,
    pub transport: BT,
    pub time_source: TS,
    pub storage: ST,
    pub clock: CL,
    pub timers: TM,
    pub entropy: EN,
}

/// What the caller should do after a handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep consuming events.
    Continue,
    /// Enter provisioning mode; the supervisor has already shut the
    /// subsystems down.
    Provision,
}

pub struct Supervisor {
    pub(crate) prefs: PrefStore,
    pub(crate) scratch: PersistentScratch,
    pub(crate) wifi: WifiManager,
    pub(crate) broker: BrokerClient,
    pub(crate) timesync: TimeSync,
    pub(crate) monitor: Monitor,
    pub(crate) slideshow: Slideshow,
    pub(crate) button: ButtonLogic,

    /// Committed mode; decides sleep length, warmup, upload cadence.
    mode: DisplayMode,
    /// Tentative mode, toggled by short presses, committed at SleepStart.
    next_mode: DisplayMode,

    in_wifi_window: bool,
    in_communication_window: bool,
    in_monitoring_window: bool,
    in_sleep_window: bool,
    /// First cycle after boot: shortened comm window, no relaxation or
    /// sleep before the first observation.
    first_time: bool,

    /// Most recent observation, kept for diagnostics.
    last_snapshot: Option<SensorSnapshot>,
}

impl Supervisor {
    /// Build the supervisor around already-loaded configuration.
    pub fn new(prefs: PrefStore, scratch: PersistentScratch) -> Self {
        Self {
            prefs,
            scratch,
            wifi: WifiManager::new(),
            broker: BrokerClient::new(),
            timesync: TimeSync::new(),
            monitor: Monitor::new(),
            slideshow: Slideshow::new(),
            button: ButtonLogic::new(),
            mode: DisplayMode::Slideshow,
            next_mode: DisplayMode::Slideshow,
            in_wifi_window: false,
            in_communication_window: false,
            in_monitoring_window: false,
            in_sleep_window: false,
            first_time: true,
            last_snapshot: None,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_sleeping(&self) -> bool {
        self.in_sleep_window
    }

    pub fn last_snapshot(&self) -> Option<&SensorSnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn prefs(&self) -> &PrefStore {
        &self.prefs
    }

    pub fn broker(&self) -> &BrokerClient {
        &self.broker
    }

    /// Kick the state machine off. The slideshow starts regardless of
    /// mode; mode only matters between communication and monitoring.
    pub fn boot(&mut self, bus: &EventBus) {
        info!("SnappySense running!");
        bus.post(EventCode::SlideshowStart);
        bus.post(EventCode::StartCycle);
    }

    /// Handle one event to completion.
    #[allow(clippy::too_many_lines)]
    pub fn handle<D, DS, R, BT, TS, ST, CL, TM, EN>(
        &mut self,
        ev: Event,
        p: &mut Platform<D, DS, R, BT, TS, ST, CL, TM, EN>,
        bus: &EventBus,
    ) -> Control
    where
        D: DevicePort,
        DS: DisplayPort,
        R: WifiPort,
        BT: BrokerTransport,
        TS: TimeSourcePort,
        ST: StoragePort,
        CL: ClockPort,
        TM: TimerPort,
        EN: EntropyPort,
    {
        match ev.code {
            // ── Cycle control ─────────────────────────────────

            EventCode::StartCycle => {
                // Communicate only when somebody has work; the predicates
                // also rate-limit how often the radio comes up.
                let comm_work = self.timesync.have_work(&self.scratch)
                    || self.broker.have_work(&p.clock, self.mode, &self.scratch);
                if comm_work {
                    bus.post(EventCode::CommStart);
                } else {
                    bus.post(EventCode::PostComm);
                }
            }

            EventCode::CommStart => {
                // Answered by CommWifiUp or CommWifiFailed.
                self.in_wifi_window = true;
                self.wifi.enable_start(
                    &self.prefs,
                    &mut self.scratch,
                    &mut p.storage,
                    &mut p.radio,
                    &mut p.timers,
                    bus,
                );
            }

            EventCode::CommWifiRetry => {
                self.wifi.enable_retry(
                    &self.prefs,
                    &mut self.scratch,
                    &mut p.storage,
                    &mut p.radio,
                    &mut p.timers,
                    bus,
                );
            }

            EventCode::CommWifiFailed => {
                if self.in_wifi_window {
                    bus.post_owned(EventCode::Message, Payload::Text("No WiFi".into()));
                    self.in_wifi_window = false;
                    bus.post(EventCode::PostComm);
                }
            }

            EventCode::CommWifiUp => {
                if !self.in_wifi_window {
                    // Late arrival after disable; the link is already down.
                    return Control::Continue;
                }
                self.in_communication_window = true;
                if self.timesync.have_work(&self.scratch) {
                    self.timesync.start(
                        &mut p.time_source,
                        &mut p.clock,
                        &mut self.scratch,
                        &mut p.storage,
                        &mut p.timers,
                        bus,
                    );
                }
                if self.broker.have_work(&p.clock, self.mode, &self.scratch) {
                    self.broker.start(
                        &mut p.transport,
                        &self.prefs,
                        &p.clock,
                        &mut p.timers,
                        bus,
                    );
                }
                self.arm_comm_timeout(&mut p.timers);
            }

            EventCode::CommActivity => {
                // Keep the window open a while longer, unless it already
                // closed and this is a straggler.
                if self.in_communication_window {
                    self.arm_comm_timeout(&mut p.timers);
                }
            }

            EventCode::CommActivityExpired => {
                if self.in_communication_window || self.in_wifi_window {
                    bus.post(EventCode::PostComm);
                }
                if self.in_communication_window {
                    self.broker.stop(&mut p.transport, &mut p.timers);
                    self.timesync.stop(&mut p.time_source, &mut p.timers);
                    self.in_communication_window = false;
                }
                if self.in_wifi_window {
                    self.wifi.disable(&mut p.radio, &mut p.timers);
                    self.in_wifi_window = false;
                }
            }

            EventCode::PostComm => {
                // Let the slideshow run a bit before deciding the mode.
                debug_assert!(!self.in_communication_window && !self.in_wifi_window);
                if self.first_time {
                    bus.post(EventCode::SleepStart);
                } else {
                    p.timers.arm_oneshot(
                        TimerId::Master,
                        Duration::from_secs(u64::from(cadence::comm_relaxation_timeout_s())),
                        EventCode::SleepStart,
                        None,
                    );
                }
            }

            EventCode::SleepStart => {
                if self.first_time {
                    bus.post(EventCode::PostSleep);
                } else {
                    self.mode = self.next_mode;
                    info!("mode: {}", self.mode.banner());
                    match self.mode {
                        DisplayMode::Slideshow => {
                            p.timers.arm_oneshot(
                                TimerId::Master,
                                Duration::from_secs(u64::from(cadence::slideshow_mode_sleep_s())),
                                EventCode::PostSleep,
                                None,
                            );
                        }
                        DisplayMode::Monitoring => {
                            bus.post(EventCode::SlideshowStop);
                            p.timers.arm_oneshot(
                                TimerId::Master,
                                Duration::from_secs(u64::from(cadence::monitoring_mode_sleep_s())),
                                EventCode::PostSleep,
                                None,
                            );
                            info!("nap time, sleep mode activated");
                            p.device.power_off();
                            self.in_sleep_window = true;
                        }
                    }
                }
            }

            EventCode::PostSleep => {
                if self.in_sleep_window {
                    // Reached from the timeout or from a button press;
                    // either way any pending timeout is stale.
                    p.timers.cancel(TimerId::Master);
                    p.device.power_on();
                    self.monitor.notify_power_cycle();
                    self.in_sleep_window = false;
                    bus.post(EventCode::SlideshowReset);
                    bus.post(EventCode::SlideshowStart);
                }
                bus.post(EventCode::MonitorStart);
                self.first_time = false;
            }

            EventCode::MonitorStart => {
                info!("monitoring window opens");
                self.in_monitoring_window = true;
                self.monitor.start(self.mode, &mut p.timers);
                p.timers.arm_oneshot(
                    TimerId::Master,
                    Duration::from_secs(u64::from(cadence::monitoring_window_s(self.mode))),
                    EventCode::MonitorStop,
                    None,
                );
            }

            EventCode::MonitorStop => {
                self.monitor.stop(&mut p.device, &p.clock, &mut p.timers, bus);
                bus.post(EventCode::StartCycle);
                info!("monitoring window closes");
                self.in_monitoring_window = false;
            }

            // ── Notifications ─────────────────────────────────

            EventCode::MonitorData => {
                let Payload::Snapshot(snapshot) = ev.payload else {
                    warn!("monitor data without snapshot payload");
                    return Control::Continue;
                };
                info!("monitor data received");
                // Each consumer owns its own copy.
                self.broker.enqueue_observation(
                    snapshot.clone(),
                    &self.prefs,
                    &self.scratch,
                    &p.clock,
                    self.mode,
                );
                self.last_snapshot = Some((*snapshot).clone());
                self.slideshow.new_data(snapshot);
            }

            EventCode::ButtonPress => {
                if self.in_sleep_window {
                    // Wake up; PostSleep cancels the pending timeout.
                    bus.post(EventCode::PostSleep);
                    bus.post_owned(EventCode::Message, Payload::Text(self.mode.banner().into()));
                } else {
                    self.next_mode = self.next_mode.toggled();
                    bus.post(EventCode::SlideshowReset);
                    bus.post_owned(
                        EventCode::Message,
                        Payload::Text(self.next_mode.banner().into()),
                    );
                    bus.post(EventCode::SlideshowStart);
                }
            }

            EventCode::ButtonLongPress => {
                // Major mode change: shut everything down and hand over to
                // provisioning. There is no way back but reset.
                p.timers.cancel(TimerId::Master);
                self.slideshow.stop(&mut p.timers);

                if self.in_sleep_window {
                    info!("powered up for provisioning mode");
                    p.device.power_on();
                    self.monitor.notify_power_cycle();
                    self.in_sleep_window = false;
                }
                if self.in_monitoring_window {
                    // Stops all monitoring timers. A late MonitorData is
                    // benign; provisioning discards it.
                    self.monitor.stop(&mut p.device, &p.clock, &mut p.timers, bus);
                    self.in_monitoring_window = false;
                }
                if self.in_communication_window {
                    // May strand unsent data and an unconfigured clock;
                    // nobody cares about a little lost data here.
                    self.broker.stop(&mut p.transport, &mut p.timers);
                    self.timesync.stop(&mut p.time_source, &mut p.timers);
                    self.in_communication_window = false;
                }
                if self.in_wifi_window {
                    self.wifi.disable(&mut p.radio, &mut p.timers);
                    self.in_wifi_window = false;
                }
                return Control::Provision;
            }

            EventCode::EnableDevice => self.prefs.set_device_enabled(true),
            EventCode::DisableDevice => self.prefs.set_device_enabled(false),

            EventCode::SetCaptureInterval => {
                if let Payload::Scalar(seconds) = ev.payload {
                    self.broker.set_capture_interval(seconds);
                }
            }

            // ── Component ticks ───────────────────────────────

            EventCode::MonitorWork => {
                let Payload::Scalar(which) = ev.payload else {
                    warn!("monitor work without selector");
                    return Control::Continue;
                };
                self.monitor.tick(which, &mut p.device, &p.clock, &mut p.timers, bus, self.mode);
            }

            EventCode::CommBrokerWork => {
                self.broker.work(
                    &mut p.transport,
                    &self.prefs,
                    &self.scratch,
                    &p.clock,
                    &mut p.timers,
                    bus,
                    self.mode,
                );
            }

            EventCode::CommTimeWork => {
                self.timesync.work(
                    &mut p.time_source,
                    &mut p.clock,
                    &mut self.scratch,
                    &mut p.storage,
                    &mut p.timers,
                    bus,
                );
            }

            // ── Display / slideshow ───────────────────────────

            EventCode::Message => {
                if let Payload::Text(text) = ev.payload {
                    self.slideshow.show_message_once(text);
                }
            }
            EventCode::SlideshowReset => self.slideshow.reset(),
            EventCode::SlideshowStart => self.slideshow.start(&mut p.timers, bus),
            EventCode::SlideshowStop => self.slideshow.stop(&mut p.timers),
            EventCode::SlideshowWork => self.slideshow.tick(&mut p.display),

            // ── Button edges ──────────────────────────────────

            EventCode::ButtonDown => self.button.on_down(p.clock.uptime_ms(), &mut p.timers),
            EventCode::ButtonUp => {
                self.button.on_up(p.clock.uptime_ms(), &mut p.timers, bus);
            }
            EventCode::ButtonHoldExpired => self.button.on_hold_expired(bus),

            // Web events exist only in provisioning mode.
            EventCode::WebRequest | EventCode::WebRequestFailed => {
                panic!("web event outside provisioning mode");
            }
        }
        Control::Continue
    }

    fn arm_comm_timeout(&self, timers: &mut impl TimerPort) {
        let mut timeout_ms = u64::from(cadence::comm_activity_timeout_s()) * 1000;
        if self.first_time {
            // Shorten the first window; it improves the boot UX.
            timeout_ms /= 2;
        }
        timers.arm_oneshot(
            TimerId::Master,
            Duration::from_millis(timeout_ms),
            EventCode::CommActivityExpired,
            None,
        );
    }
}

/// The normal-operation main loop: consume events until a long press asks
/// for provisioning. The caller then stands up the web server adapter and
/// hands over to [`crate::provision::run`].
pub fn run_main_loop<D, DS, R, BT, TS, ST, CL, TM, EN>(
    supervisor: &mut Supervisor,
    p: &mut Platform<D, DS, R, BT, TS, ST, CL, TM, EN>,
    bus: &EventBus,
) where
    D: DevicePort,
    DS: DisplayPort,
    R: WifiPort,
    BT: BrokerTransport,
    TS: TimeSourcePort,
    ST: StoragePort,
    CL: ClockPort,
    TM: TimerPort,
    EN: EntropyPort,
{
    supervisor.boot(bus);
    loop {
        let ev = bus.receive();
        match supervisor.handle(ev, p, bus) {
            Control::Continue => {}
            Control::Provision => return,
        }
    }
}

/// Provisioning entry: runs until the device restarts (never, on
/// hardware; after the recorded restart, in simulation).
pub fn run_provisioning<D, DS, R, BT, TS, ST, CL, TM, EN>(
    supervisor: &mut Supervisor,
    p: &mut Platform<D, DS, R, BT, TS, ST, CL, TM, EN>,
    bus: &EventBus,
) where
    D: DevicePort,
    DS: DisplayPort,
    R: WifiPort,
    BT: BrokerTransport,
    TS: TimeSourcePort,
    ST: StoragePort,
    CL: ClockPort,
    TM: TimerPort,
    EN: EntropyPort,
{
    crate::provision::run(
        &mut supervisor.prefs,
        &mut p.storage,
        &mut supervisor.wifi,
        &mut p.radio,
        &mut p.display,
        &mut p.device,
        &p.clock,
        &mut p.timers,
        &mut p.entropy,
        bus,
    );
}

//! Broker client: publish/subscribe over the configured transport.
//!
//! Owns the store-and-forward queues and the connection state machine,
//! driven one step per `CommBrokerWork` tick — no handler ever blocks on
//! the network.
//!
//! ```text
//! Starting ─▶ Connecting ─▶ Connected ─▶ Subscribed ─▶ Running
//!     │            │                                      │
//!     ▼            ▼ (10 tries)                           ▼ (link drop)
//!   Failed       Failed                                Stopped
//! ```
//!
//! Outbound observations wait in a bounded queue until a connection is
//! worth the power; observations captured before the clock was synchronized
//! wait in a separate delayed queue and are re-stamped with the sync delta
//! before promotion. Both queues drop their oldest element on overflow.

pub mod inbound;

use std::collections::VecDeque;

use log::{info, warn};
use serde::Serialize;

use crate::cadence::{self, DisplayMode};
use crate::events::{EventBus, EventCode};
use crate::ports::{BrokerTransport, ClockPort, TransportAuth, TransportConfig};
use crate::prefs::{BrokerAuth, PrefStore};
use crate::scratch::PersistentScratch;
use crate::sensor::{SensorSnapshot, json};
use crate::timers::{TimerId, TimerPort};

/// Startup-announcement schema version.
const STARTUP_VERSION: &str = "1.0.0";

/// Bound on both the outbound and the delayed queue; overflow drops the
/// least-recent element.
pub const MAX_QUEUED: usize = 100;

/// Largest message the transport buffers; longer outbound bodies are
/// dropped, longer inbound payloads discarded.
const MAX_MESSAGE_SIZE: usize = 1024;
const MAX_INCOMING_SIZE: usize = 1023;

/// Connect attempts before the comm window gives up on the broker.
const MAX_CONNECT_RETRIES: u32 = 10;

/// Connection cycles after boot during which the client connects eagerly:
/// control messages are often delivered on later connections.
const EARLY_CYCLES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerState {
    Starting,
    Connecting,
    Connected,
    Subscribed,
    Running,
    Failed,
    Stopped,
}

/// One queued publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub body: String,
}

#[derive(Serialize)]
struct StartupMessage<'a> {
    version: &'a str,
    sent: u64,
    interval: u32,
}

pub struct BrokerClient {
    state: BrokerState,
    retries: u32,
    /// Epoch of the last successful connect.
    last_connect: i64,
    /// Epoch of the last accepted capture.
    last_capture: i64,
    early_times: bool,
    connect_cycles: u32,
    startup_sent: bool,
    /// Capture interval in monitoring mode; remotely settable.
    monitoring_capture_interval_s: u32,
    outbound: VecDeque<OutboundMessage>,
    delayed: VecDeque<SensorSnapshot>,
}

impl Default for BrokerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerClient {
    pub fn new() -> Self {
        Self {
            state: BrokerState::Stopped,
            retries: 0,
            last_connect: 0,
            last_capture: 0,
            early_times: true,
            connect_cycles: 0,
            startup_sent: false,
            monitoring_capture_interval_s: cadence::default_capture_interval_s(
                DisplayMode::Monitoring,
            ),
            outbound: VecDeque::new(),
            delayed: VecDeque::new(),
        }
    }

    pub fn state(&self) -> BrokerState {
        self.state
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    pub fn delayed_len(&self) -> usize {
        self.delayed.len()
    }

    /// Remote `interval` control: set the monitoring-mode capture interval.
    pub fn set_capture_interval(&mut self, seconds: u32) {
        self.monitoring_capture_interval_s = seconds;
    }

    /// The capture interval currently in force for a mode.
    pub fn capture_interval_for_upload_s(&self, mode: DisplayMode) -> u32 {
        match mode {
            DisplayMode::Slideshow => cadence::default_capture_interval_s(mode),
            DisplayMode::Monitoring => self.monitoring_capture_interval_s,
        }
    }

    // ── Work policy ───────────────────────────────────────────

    /// Whether the next comm window should bring the broker up.
    pub fn have_work(
        &self,
        clock: &impl ClockPort,
        mode: DisplayMode,
        scratch: &PersistentScratch,
    ) -> bool {
        let delta = clock.epoch() - self.last_connect;

        // Hold data for a while; a connection per observation would burn
        // the battery.
        if !self.outbound.is_empty() && delta >= i64::from(cadence::upload_interval_s(mode)) {
            return true;
        }
        if !self.delayed.is_empty() && scratch.time_adjustment() > 0 {
            return true;
        }
        // Connect every so often regardless, to hear control messages — a
        // disabled device produces nothing outbound but must be able to
        // hear "enable". Early after boot, connect eagerly.
        delta >= i64::from(cadence::max_unconnected_time_s()) || self.early_times
    }

    // ── Observation intake ────────────────────────────────────

    /// Take ownership of one observation and queue it per policy.
    pub fn enqueue_observation(
        &mut self,
        snapshot: Box<SensorSnapshot>,
        prefs: &PrefStore,
        scratch: &PersistentScratch,
        clock: &impl ClockPort,
        mode: DisplayMode,
    ) {
        if !prefs.device_enabled() {
            return; // Disabled devices observe nothing.
        }
        let now = clock.epoch();
        if self.last_capture > 0
            && now - self.last_capture < i64::from(self.capture_interval_for_upload_s(mode))
        {
            return; // Too soon since the last accepted capture.
        }
        self.last_capture = now;

        if scratch.time_adjustment() == 0 {
            // The clock is still at its boot default; hold the snapshot
            // until the delta is known.
            info!("broker: holding observation until clock sync");
            if self.delayed.len() >= MAX_QUEUED {
                warn!("broker: delayed queue full, dropping oldest");
                self.delayed.pop_front();
            }
            self.delayed.push_back(*snapshot);
            return;
        }

        self.promote_delayed(prefs, scratch);
        self.enqueue_snapshot(&snapshot, prefs);
    }

    /// Re-stamp every delayed snapshot with the sync delta and move it to
    /// the outbound queue, FIFO.
    fn promote_delayed(&mut self, prefs: &PrefStore, scratch: &PersistentScratch) {
        let adjust = scratch.time_adjustment();
        if adjust <= 0 {
            return;
        }
        while let Some(mut snap) = self.delayed.pop_front() {
            snap.timestamp += adjust;
            self.enqueue_snapshot(&snap, prefs);
        }
    }

    fn enqueue_snapshot(&mut self, snapshot: &SensorSnapshot, prefs: &PrefStore) {
        let topic = format!(
            "snappy/observation/{}/{}",
            prefs.broker_device_class(),
            prefs.broker_device_id()
        );
        self.enqueue(OutboundMessage { topic, body: json::format_observation(snapshot) });
    }

    fn enqueue(&mut self, message: OutboundMessage) {
        if self.outbound.len() >= MAX_QUEUED {
            warn!("broker: outbound queue full, dropping oldest");
            self.outbound.pop_front();
        }
        self.outbound.push_back(message);
    }

    fn enqueue_startup_message(&mut self, prefs: &PrefStore, clock: &impl ClockPort, mode: DisplayMode) {
        let topic = format!(
            "snappy/startup/{}/{}",
            prefs.broker_device_class(),
            prefs.broker_device_id()
        );
        let body = StartupMessage {
            version: STARTUP_VERSION,
            sent: clock.epoch().max(0) as u64,
            interval: self.capture_interval_for_upload_s(mode),
        };
        match serde_json::to_string(&body) {
            Ok(body) => self.enqueue(OutboundMessage { topic, body }),
            Err(e) => warn!("broker: startup message serialization failed: {e}"),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Open the broker leg of the comm window.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        &mut self,
        transport: &mut impl BrokerTransport,
        prefs: &PrefStore,
        clock: &impl ClockPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        self.state = BrokerState::Starting;
        self.retries = 0;
        if self.early_times {
            self.connect_cycles += 1;
            if self.connect_cycles > EARLY_CYCLES {
                self.early_times = false;
            }
        }
        self.connect(transport, prefs, clock, timers, bus);
    }

    /// Close the broker leg: drop the connection, stop ticking.
    pub fn stop(&mut self, transport: &mut impl BrokerTransport, timers: &mut impl TimerPort) {
        transport.disconnect();
        timers.cancel(TimerId::BrokerWork);
        self.state = BrokerState::Stopped;
    }

    // ── State machine ─────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn connect(
        &mut self,
        transport: &mut impl BrokerTransport,
        prefs: &PrefStore,
        clock: &impl ClockPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
    ) {
        if self.state == BrokerState::Starting {
            let auth = match prefs.broker_auth() {
                BrokerAuth::Certificate => {
                    if !prefs.broker_tls() {
                        // x509 without TLS is rejected by broker_auth();
                        // belt-and-braces here.
                        warn!("broker: cert auth requires TLS");
                        self.state = BrokerState::Failed;
                        return;
                    }
                    TransportAuth::Certificate {
                        cert_pem: prefs.broker_device_cert().into(),
                        key_pem: prefs.broker_private_key().into(),
                    }
                }
                BrokerAuth::UserPass => TransportAuth::UserPass {
                    username: prefs.broker_username().into(),
                    password: prefs.broker_password().into(),
                },
                BrokerAuth::Unknown => {
                    // No retry for a configuration hole.
                    warn!("broker: bad auth setting, possibly missing data");
                    self.state = BrokerState::Failed;
                    return;
                }
            };
            let config = TransportConfig {
                host: prefs.broker_host().into(),
                port: prefs.broker_port(),
                client_id: prefs.broker_device_id().into(),
                tls_root_cert: if prefs.broker_tls() {
                    Some(prefs.broker_root_cert().into())
                } else {
                    None
                },
                auth,
                keep_session: true,
            };
            if transport.configure(&config).is_err() {
                warn!("broker: transport refused configuration");
                self.state = BrokerState::Failed;
                return;
            }
            info!("broker: connecting to {}:{}", config.host, config.port);
            self.state = BrokerState::Connecting;
        }

        if self.state == BrokerState::Connecting {
            bus.post(EventCode::CommActivity);
            match transport.connect() {
                Ok(()) => {
                    info!("broker: accepted");
                    self.state = BrokerState::Connected;
                    self.last_connect = clock.epoch();
                    bus.post(EventCode::CommBrokerWork);
                }
                Err(e) => {
                    warn!("broker: connect failed: {e}");
                    self.retries += 1;
                    if self.retries < MAX_CONNECT_RETRIES {
                        self.arm_work_timer(timers);
                    } else {
                        warn!("broker: rejected");
                        self.state = BrokerState::Failed;
                    }
                }
            }
        }
    }

    /// One `CommBrokerWork` tick.
    #[allow(clippy::too_many_arguments)]
    pub fn work(
        &mut self,
        transport: &mut impl BrokerTransport,
        prefs: &PrefStore,
        scratch: &PersistentScratch,
        clock: &impl ClockPort,
        timers: &mut impl TimerPort,
        bus: &EventBus,
        mode: DisplayMode,
    ) {
        match self.state {
            BrokerState::Connecting => {
                self.connect(transport, prefs, clock, timers, bus);
            }
            BrokerState::Connected => {
                if !transport.is_connected() {
                    self.stop(transport, timers);
                    return;
                }
                self.subscribe(transport, prefs);
                self.state = BrokerState::Subscribed;
                bus.post(EventCode::CommActivity);
                bus.post(EventCode::CommBrokerWork);
            }
            BrokerState::Subscribed => {
                if !transport.is_connected() {
                    self.stop(transport, timers);
                    return;
                }
                self.state = BrokerState::Running;
                if !self.startup_sent {
                    // Exactly once per process lifetime.
                    self.enqueue_startup_message(prefs, clock, mode);
                    self.startup_sent = true;
                }
                bus.post(EventCode::CommActivity);
                bus.post(EventCode::CommBrokerWork);
            }
            BrokerState::Running => {
                if !transport.is_connected() {
                    self.stop(transport, timers);
                    return;
                }
                self.promote_delayed(prefs, scratch);
                if !self.outbound.is_empty() {
                    self.send_one(transport);
                    bus.post(EventCode::CommActivity);
                } else if self.poll_inbound(transport, bus) {
                    // Inbound traffic is rare: the odd enable/disable or
                    // interval change.
                    bus.post(EventCode::CommActivity);
                }
                self.arm_work_timer(timers);
            }
            // Starting, Failed, Stopped: nothing to do on a tick.
            _ => {}
        }
    }

    fn subscribe(&mut self, transport: &mut impl BrokerTransport, prefs: &PrefStore) {
        // Brokers have been observed to require re-subscription on every
        // reconnect even with the session kept.
        let id = prefs.broker_device_id();
        let class = prefs.broker_device_class();
        if !id.is_empty() {
            self.try_subscribe(transport, &format!("snappy/control/{id}"));
        }
        if !class.is_empty() {
            self.try_subscribe(transport, &format!("snappy/control-class/{class}"));
        }
        self.try_subscribe(transport, "snappy/control-all");
        if !id.is_empty() {
            self.try_subscribe(transport, &format!("snappy/command/{id}"));
        }
    }

    fn try_subscribe(&mut self, transport: &mut impl BrokerTransport, topic: &str) {
        if let Err(e) = transport.subscribe(topic, 1) {
            warn!("broker: subscribe {topic} failed: {e}");
        }
    }

    /// Send the message at the front of the queue.
    fn send_one(&mut self, transport: &mut impl BrokerTransport) {
        let Some(first) = self.outbound.front() else {
            return;
        };
        if first.body.len() > MAX_MESSAGE_SIZE {
            warn!("broker: message too long ({} bytes), dropped", first.body.len());
            self.outbound.pop_front();
            return;
        }
        match transport.publish(&first.topic, first.body.as_bytes()) {
            Ok(()) => {
                self.outbound.pop_front();
                info!("broker: sent one message");
            }
            Err(e) => {
                // Keep the message; the link check on the next tick decides
                // whether the connection is gone.
                warn!("broker: publish failed: {e}");
            }
        }
    }

    fn poll_inbound(&mut self, transport: &mut impl BrokerTransport, bus: &EventBus) -> bool {
        let Some(message) = transport.poll() else {
            return false;
        };
        if message.payload.len() > MAX_INCOMING_SIZE {
            warn!(
                "broker: incoming message too long, {} bytes, discarded",
                message.payload.len()
            );
            return true;
        }
        inbound::dispatch(&message, bus);
        true
    }

    fn arm_work_timer(&self, timers: &mut impl TimerPort) {
        timers.arm_oneshot(
            TimerId::BrokerWork,
            cadence::broker_retry(),
            EventCode::CommBrokerWork,
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::SimClock;
    use crate::adapters::mqtt::SimTransport;
    use crate::adapters::timer::FakeTimers;
    use crate::ports::InboundMessage;

    struct Rig {
        broker: BrokerClient,
        transport: SimTransport,
        prefs: PrefStore,
        scratch: PersistentScratch,
        clock: SimClock,
        timers: FakeTimers,
        bus: EventBus,
        mode: DisplayMode,
    }

    impl Rig {
        fn new() -> Self {
            let mut prefs = PrefStore::new();
            prefs.set_string("mqtt-auth", "pass");
            prefs.set_string("mqtt-username", "dev");
            prefs.set_string("mqtt-password", "pw");
            prefs.set_string("mqtt-id", "snp1");
            prefs.set_string("mqtt-class", "snappysense");
            prefs.set_string("mqtt-endpoint-host", "broker.example");
            Self {
                broker: BrokerClient::new(),
                transport: SimTransport::new(),
                prefs,
                scratch: PersistentScratch::default(),
                clock: SimClock::new(1_700_000_000),
                timers: FakeTimers::new(),
                bus: EventBus::new(),
                mode: DisplayMode::Monitoring,
            }
        }

        fn synced() -> Self {
            let mut rig = Self::new();
            rig.scratch.time_adjust = 1_699_999_000;
            rig.scratch.time_configured = true;
            rig
        }

        fn start(&mut self) {
            self.broker.start(
                &mut self.transport,
                &self.prefs,
                &self.clock,
                &mut self.timers,
                &self.bus,
            );
        }

        fn work(&mut self) {
            self.broker.work(
                &mut self.transport,
                &self.prefs,
                &self.scratch,
                &self.clock,
                &mut self.timers,
                &self.bus,
                self.mode,
            );
        }

        fn run_to_running(&mut self) {
            self.start();
            while self.broker.state() != BrokerState::Running {
                self.work();
            }
        }

        fn enqueue(&mut self, snap: SensorSnapshot) {
            self.broker.enqueue_observation(
                Box::new(snap),
                &self.prefs,
                &self.scratch,
                &self.clock,
                self.mode,
            );
        }

        fn snapshot(seq: u32, ts: i64) -> SensorSnapshot {
            SensorSnapshot {
                sequence: seq,
                timestamp: ts,
                temperature_c: Some(20.0),
                ..SensorSnapshot::default()
            }
        }
    }

    #[test]
    fn connects_subscribes_and_announces_once() {
        let mut rig = Rig::synced();
        rig.run_to_running();
        let subs: Vec<&str> = rig.transport.subscriptions().iter().map(String::as_str).collect();
        assert_eq!(
            subs,
            [
                "snappy/control/snp1",
                "snappy/control-class/snappysense",
                "snappy/control-all",
                "snappy/command/snp1",
            ]
        );
        // The startup announcement is queued; one more pass sends it.
        rig.work();
        let sent = rig.transport.published();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "snappy/startup/snappysense/snp1");
        assert!(sent[0].1.starts_with("{\"version\":\"1.0.0\",\"sent\":"), "{}", sent[0].1);
        assert!(sent[0].1.contains("\"interval\":1800"));

        // Stop/start again within the same process: no second announcement.
        rig.broker.stop(&mut rig.transport, &mut rig.timers);
        rig.transport.reset_log();
        rig.run_to_running();
        rig.work();
        assert!(rig.transport.published().is_empty());
    }

    #[test]
    fn bad_auth_fails_without_retry() {
        let mut rig = Rig::new();
        rig.prefs.set_string("mqtt-username", "");
        rig.start();
        assert_eq!(rig.broker.state(), BrokerState::Failed);
        assert!(!rig.timers.is_armed(TimerId::BrokerWork));
    }

    #[test]
    fn connect_retries_ten_times_then_fails() {
        let mut rig = Rig::new();
        rig.transport.refuse_connect(true);
        rig.start();
        let mut ticks = 0;
        while rig.broker.state() == BrokerState::Connecting && ticks < 20 {
            assert!(rig.timers.is_armed(TimerId::BrokerWork));
            rig.timers.cancel(TimerId::BrokerWork);
            rig.work();
            ticks += 1;
        }
        assert_eq!(rig.broker.state(), BrokerState::Failed);
        assert_eq!(ticks, (MAX_CONNECT_RETRIES - 1) as usize);
    }

    #[test]
    fn link_drop_returns_to_stopped() {
        let mut rig = Rig::synced();
        rig.run_to_running();
        rig.transport.drop_link();
        rig.work();
        assert_eq!(rig.broker.state(), BrokerState::Stopped);
    }

    #[test]
    fn observations_enqueue_and_send_fifo() {
        let mut rig = Rig::synced();
        rig.enqueue(Rig::snapshot(1, 1_700_000_000));
        rig.clock.advance(i64::from(cadence::default_capture_interval_s(DisplayMode::Monitoring)));
        rig.enqueue(Rig::snapshot(2, 1_700_001_800));
        assert_eq!(rig.broker.outbound_len(), 2);

        rig.run_to_running();
        rig.work(); // startup
        rig.work(); // obs 1
        rig.work(); // obs 2
        let sent = rig.transport.published();
        assert_eq!(sent.len(), 3);
        assert!(sent[1].1.contains("\"sequenceno\":1"));
        assert!(sent[2].1.contains("\"sequenceno\":2"));
        assert!(sent[1].0.ends_with("observation/snappysense/snp1"));
    }

    #[test]
    fn disabled_device_discards_observations() {
        let mut rig = Rig::synced();
        rig.prefs.set_device_enabled(false);
        rig.enqueue(Rig::snapshot(1, 1));
        assert_eq!(rig.broker.outbound_len(), 0);
        assert_eq!(rig.broker.delayed_len(), 0);
    }

    #[test]
    fn capture_interval_rate_limits() {
        let mut rig = Rig::synced();
        rig.enqueue(Rig::snapshot(1, 1_700_000_000));
        rig.clock.advance(10); // Well under the 1800 s interval.
        rig.enqueue(Rig::snapshot(2, 1_700_000_010));
        assert_eq!(rig.broker.outbound_len(), 1);

        rig.broker.set_capture_interval(5);
        rig.clock.advance(6);
        rig.enqueue(Rig::snapshot(3, 1_700_000_016));
        assert_eq!(rig.broker.outbound_len(), 2);
    }

    #[test]
    fn pre_sync_observations_wait_then_promote_with_delta() {
        let mut rig = Rig::new(); // Clock not configured.
        rig.clock = SimClock::new(1000);
        for (seq, ts) in [(1u32, 100i64), (2, 200), (3, 300)] {
            rig.enqueue(Rig::snapshot(seq, ts));
            rig.clock.advance(1_000_000); // Clear the capture rate limit.
        }
        assert_eq!(rig.broker.delayed_len(), 3);
        assert_eq!(rig.broker.outbound_len(), 0);

        // Time sync lands: Δ = +1.7e9.
        rig.scratch.time_adjust = 1_700_000_000;
        rig.scratch.time_configured = true;
        assert!(rig.broker.have_work(&rig.clock, rig.mode, &rig.scratch));

        rig.run_to_running();
        for _ in 0..4 {
            rig.work();
        }
        let sent = rig.transport.published();
        let observations: Vec<&String> =
            sent.iter().filter(|(t, _)| t.contains("observation")).map(|(_, b)| b).collect();
        assert_eq!(observations.len(), 3);
        assert!(observations[0].contains("\"sent\":1700000100"), "{}", observations[0]);
        assert!(observations[1].contains("\"sent\":1700000200"));
        assert!(observations[2].contains("\"sent\":1700000300"));
        // FIFO by sequence.
        assert!(observations[0].contains("\"sequenceno\":1"));
        assert!(observations[2].contains("\"sequenceno\":3"));
    }

    #[test]
    fn outbound_overflow_drops_oldest() {
        let mut rig = Rig::synced();
        // Get the startup announcement out of the way first.
        rig.run_to_running();
        rig.work();
        rig.broker.stop(&mut rig.transport, &mut rig.timers);
        rig.transport.reset_log();

        // Fill the queue past its bound while disconnected.
        for seq in 1..=(MAX_QUEUED as u32 + 1) {
            rig.enqueue(Rig::snapshot(seq, 1_700_000_000 + i64::from(seq)));
            rig.clock.advance(1_000_000);
        }
        assert_eq!(rig.broker.outbound_len(), MAX_QUEUED);

        rig.run_to_running();
        rig.work(); // First remaining observation.
        let sent = rig.transport.published();
        assert!(
            sent[0].1.contains("\"sequenceno\":2"),
            "observation #1 should have been dropped: {}",
            sent[0].1
        );
    }

    #[test]
    fn have_work_policy() {
        let mut rig = Rig::synced();
        // Fresh boot: early times connect eagerly even with nothing queued.
        assert!(rig.broker.have_work(&rig.clock, rig.mode, &rig.scratch));

        // Burn the early cycles.
        for _ in 0..=EARLY_CYCLES {
            rig.start();
            rig.broker.stop(&mut rig.transport, &mut rig.timers);
        }
        assert!(!rig.broker.have_work(&rig.clock, rig.mode, &rig.scratch));

        // Queued data alone is not enough until the upload interval passed
        // (slideshow mode, whose 5-minute interval is well under the
        // 4-hour unconnected ceiling).
        rig.mode = DisplayMode::Slideshow;
        rig.enqueue(Rig::snapshot(1, 1_700_000_000));
        assert!(!rig.broker.have_work(&rig.clock, rig.mode, &rig.scratch));
        rig.clock.advance(i64::from(cadence::upload_interval_s(rig.mode)));
        assert!(rig.broker.have_work(&rig.clock, rig.mode, &rig.scratch));
    }

    #[test]
    fn max_unconnected_time_forces_checkin() {
        let mut rig = Rig::synced();
        for _ in 0..=EARLY_CYCLES {
            rig.start();
            rig.broker.stop(&mut rig.transport, &mut rig.timers);
        }
        assert!(!rig.broker.have_work(&rig.clock, rig.mode, &rig.scratch));
        rig.clock.advance(i64::from(cadence::max_unconnected_time_s()));
        assert!(rig.broker.have_work(&rig.clock, rig.mode, &rig.scratch));
    }

    #[test]
    fn oversize_outbound_dropped_oversize_inbound_discarded() {
        let mut rig = Rig::synced();
        rig.run_to_running();
        rig.work(); // Flush startup.
        rig.broker.enqueue(OutboundMessage {
            topic: "snappy/observation/x/y".into(),
            body: "x".repeat(MAX_MESSAGE_SIZE + 1),
        });
        rig.work();
        assert_eq!(rig.broker.outbound_len(), 0);
        assert_eq!(rig.transport.published().len(), 1, "only the startup went out");

        rig.transport.push_inbound(InboundMessage {
            topic: "snappy/control/snp1".into(),
            payload: vec![b'x'; MAX_INCOMING_SIZE + 1],
        });
        rig.work();
        // Discarded without a dispatch: no Enable/Disable/SetInterval events.
        while let Some(ev) = rig.bus.try_receive() {
            assert!(
                !matches!(
                    ev.code,
                    EventCode::EnableDevice
                        | EventCode::DisableDevice
                        | EventCode::SetCaptureInterval
                ),
                "oversize message must not dispatch"
            );
        }
    }

    #[test]
    fn running_polls_inbound_when_queue_empty() {
        let mut rig = Rig::synced();
        rig.run_to_running();
        rig.work(); // Flush startup.
        rig.transport.push_inbound(InboundMessage {
            topic: "snappy/control/snp1".into(),
            payload: b"{\"enable\":0}".to_vec(),
        });
        rig.work();
        let mut saw_disable = false;
        while let Some(ev) = rig.bus.try_receive() {
            saw_disable |= ev.code == EventCode::DisableDevice;
        }
        assert!(saw_disable);
    }
}

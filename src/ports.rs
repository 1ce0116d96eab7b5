//! Port traits — the boundary between the domain core and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ domain (supervisor, monitor, broker, …)
//! ```
//!
//! Driven adapters (I²C sensor facade, OLED, radio, MQTT transport, SNTP,
//! NVS, wall clock) implement these traits. The domain consumes them via
//! generics at call sites, so every state machine runs unmodified on the
//! host under mock adapters.

use crate::error::{BrokerError, NetError, StorageError};
use crate::sensor::Factor;

// ───────────────────────────────────────────────────────────────
// Device port (peripheral power + raw sensor sampling)
// ───────────────────────────────────────────────────────────────

/// Raw values from the environmental combo sensor, pre-conversion.
///
/// Voltages and counts are exactly what the chip reports; the monitoring
/// pipeline applies calibration curves and validity gates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawEnvironment {
    /// Degrees Celsius; the chip reports −45.0 when the reading is bogus.
    pub temperature_c: f32,
    /// Relative humidity in percent; 0 means no reading.
    pub humidity_pct: f32,
    /// UV sensor output voltage (0.99 V quiescent … ~2.9 V full scale).
    pub uv_volts: f32,
    /// Raw illuminance counts, before the response-curve correction.
    pub light_counts: f32,
    /// Atmospheric pressure in hPa; 0 means no reading.
    pub pressure_hpa: u16,
    /// Altitude estimate in meters, derived from pressure by the chip.
    pub altitude_m: f32,
}

/// Raw values from the air-quality sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawAir {
    /// 0 normal, 1 warmup, 2 initial startup, 3 invalid.
    pub status: u8,
    /// Air quality index, 1–5 when meaningful.
    pub aqi: u8,
    /// Total volatile organic compounds, ppb.
    pub tvoc_ppb: u16,
    /// Equivalent CO₂, ppm.
    pub eco2_ppm: u16,
}

/// The sensor-node hardware: one power gate, the I²C sensor pair, and the
/// two GPIO sensors. Readings return `None` when the peripheral did not
/// answer (not powered, not present, bus error).
pub trait DevicePort {
    /// Power the peripheral rail on and re-initialise the I²C devices.
    /// Blocks for the ≥1000 ms settle the hardware needs; callers invoke
    /// this only from the supervisor loop, never from a timer callback.
    fn power_on(&mut self);

    /// Drop the peripheral rail. I²C is unusable until `power_on`.
    fn power_off(&mut self);

    fn is_powered(&self) -> bool;

    /// Read the environmental combo sensor.
    fn read_environment(&mut self) -> Option<RawEnvironment>;

    /// Read the air-quality sensor.
    fn read_air(&mut self) -> Option<RawAir>;

    /// Hand the air sensor a temperature/humidity compensation point.
    /// `humidity` is a fraction in [0, 1].
    fn calibrate_air(&mut self, temperature_c: f32, humidity: f32);

    /// Sample the passive IR motion sensor. True while motion is seen.
    fn read_motion(&mut self) -> bool;

    /// Sample the microphone ADC. Raw counts, ~1500 quiescent.
    fn read_noise(&mut self) -> u16;

    /// Reboot the device. Provisioning mode exits only through here.
    fn restart(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// The 128×32 OLED, at the granularity the slideshow needs.
pub trait DisplayPort {
    /// Render the boot/rotation splash (logo).
    fn splash(&mut self);

    /// Render a short multi-line text message, e.g. "No WiFi".
    fn text(&mut self, message: &str);

    /// Render one factor view: icon on the left, value and unit beside it.
    fn view(&mut self, factor: Factor, value: &str, unit: &str);

    /// Clear the panel.
    fn clear(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Wi-Fi port (the radio itself; policy lives in wifi::WifiManager)
// ───────────────────────────────────────────────────────────────

/// The underlying station/AP radio operations.
pub trait WifiPort {
    /// Begin joining the given network. Non-blocking; poll `is_up`.
    fn join(&mut self, ssid: &str, password: Option<&str>) -> Result<(), NetError>;

    /// Whether the station link is up (associated + addressed).
    fn is_up(&self) -> bool;

    /// Tear the station link down and power the radio off.
    fn leave(&mut self);

    /// Local IP while the station link is up.
    fn local_ip(&self) -> Option<String>;

    /// Stand up an open soft access point; returns its IP. Synchronous.
    fn start_access_point(&mut self, ssid: &str, password: Option<&str>)
    -> Result<String, NetError>;
}

// ───────────────────────────────────────────────────────────────
// Broker transport (the socket/MQTT layer under broker::BrokerClient)
// ───────────────────────────────────────────────────────────────

/// Which credential set the transport should present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportAuth {
    /// Username/password pair.
    UserPass { username: String, password: String },
    /// Client certificate + private key (PEM). Requires TLS.
    Certificate { cert_pem: String, key_pem: String },
}

/// Everything the transport needs before `connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub tls_root_cert: Option<String>,
    pub auth: TransportAuth,
    /// Sessions are not clean: the broker keeps subscriptions, though we
    /// resubscribe anyway (observed broker behaviour).
    pub keep_session: bool,
}

/// An inbound publish delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// The publish/subscribe wire under the broker client. All calls are
/// non-blocking or bounded-time; long work is split across `CommBrokerWork`
/// ticks by the client.
pub trait BrokerTransport {
    /// Stage connection parameters. Must precede `connect`.
    fn configure(&mut self, config: &TransportConfig) -> Result<(), BrokerError>;

    /// One connect attempt against the configured endpoint.
    fn connect(&mut self) -> Result<(), BrokerError>;

    fn is_connected(&self) -> bool;

    fn subscribe(&mut self, topic: &str, qos: u8) -> Result<(), BrokerError>;

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerError>;

    /// Poll for one inbound message, if any arrived.
    fn poll(&mut self) -> Option<InboundMessage>;

    fn disconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time source port
// ───────────────────────────────────────────────────────────────

/// Outcome of one network time poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFetch {
    /// Got an epoch timestamp (seconds, UTC).
    Ready(i64),
    /// Query in flight; ask again on the next tick.
    Pending,
    /// The source refused; give up for this comm window.
    Failed,
}

/// One-shot network time synchronization source (SNTP).
pub trait TimeSourcePort {
    /// Start a query against the configured server.
    fn begin(&mut self);

    /// Poll the in-flight query.
    fn try_fetch(&mut self) -> TimeFetch;

    /// Abandon any in-flight query.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Storage port
// ───────────────────────────────────────────────────────────────

/// Persistent namespaced key-value storage (NVS).
///
/// Writes are atomic per key; the firmware only writes at explicit `save`
/// points and at clock-sync/AP-success bookkeeping.
pub trait StoragePort {
    fn get_i32(&self, namespace: &str, key: &str) -> Result<i32, StorageError>;
    fn set_i32(&mut self, namespace: &str, key: &str, value: i32) -> Result<(), StorageError>;

    fn get_str(&self, namespace: &str, key: &str) -> Result<String, StorageError>;
    fn set_str(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError>;

    fn get_blob(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError>;
    fn set_blob(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError>;

    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Wall-clock and monotonic time.
pub trait ClockPort {
    /// Seconds since the Unix epoch, per the system clock. Uncorrected
    /// until the time service has run once.
    fn epoch(&self) -> i64;

    /// Step the system clock to the given epoch second.
    fn set_epoch(&mut self, epoch: i64);

    /// Milliseconds since boot, monotonic.
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Entropy port
// ───────────────────────────────────────────────────────────────

/// A few random bits for the provisioning SSID fallback. Not cryptographic.
pub trait EntropyPort {
    fn random_u32(&mut self) -> u32;
}

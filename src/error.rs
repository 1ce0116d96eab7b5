//! Unified error types for the SnappySense firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level event-loop error handling uniform. Transient I/O failures
//! (Wi-Fi join, broker connect, time fetch, I²C read) are retried by their
//! owning state machines and never escalate past the current window; only
//! invariant violations abort.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Persistent key-value storage failed.
    Storage(StorageError),
    /// A broker (publish/subscribe) operation failed.
    Broker(BrokerError),
    /// Network connectivity failed.
    Net(NetError),
    /// Configuration script error, with line number and both message forms.
    Script(ScriptError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Broker(e) => write!(f, "broker: {e}"),
            Self::Net(e) => write!(f, "net: {e}"),
            Self::Script(e) => write!(f, "config script: {}", e.long),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error from the storage backend.
    IoError,
    /// Stored bytes failed to decode as the expected type.
    Corrupted,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
            Self::Corrupted => write!(f, "stored value corrupted"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Broker errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    /// The auth preferences name a method but lack its credentials.
    BadAuthConfig,
    /// TCP/TLS connect to the endpoint failed.
    ConnectFailed,
    /// Broker rejected the subscription.
    SubscribeFailed,
    /// Publish was refused or truncated by the transport.
    PublishFailed,
    /// The underlying connection dropped.
    Disconnected,
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadAuthConfig => write!(f, "bad auth configuration"),
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::Disconnected => write!(f, "connection dropped"),
        }
    }
}

impl From<BrokerError> for Error {
    fn from(e: BrokerError) -> Self {
        Self::Broker(e)
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// No access point could be joined.
    NoAccessPoint,
    /// Station-mode join failed at the radio level.
    JoinFailed,
    /// The soft access point could not be brought up.
    SoftApFailed,
    /// Time fetch from the network time source failed.
    TimeFetchFailed,
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAccessPoint => write!(f, "no access point reachable"),
            Self::JoinFailed => write!(f, "join failed"),
            Self::SoftApFailed => write!(f, "soft AP failed"),
            Self::TimeFetchFailed => write!(f, "time fetch failed"),
        }
    }
}

impl From<NetError> for Error {
    fn from(e: NetError) -> Self {
        Self::Net(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration-script errors
// ---------------------------------------------------------------------------

/// Error from the config-script evaluator.
///
/// `short` fits the 128×32 OLED; `long` goes to the log and the HTTP caller.
/// The evaluator reports the first failing line and stops; in-memory
/// preference state may be partially mutated at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number of the failing statement.
    pub line: u32,
    /// Short message for the device display.
    pub short: &'static str,
    /// Full message for logs and HTTP responses.
    pub long: String,
}

impl ScriptError {
    pub fn new(line: u32, short: &'static str, long: String) -> Self {
        Self { line, short, long }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.long)
    }
}

impl From<ScriptError> for Error {
    fn from(e: ScriptError) -> Self {
        Self::Script(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

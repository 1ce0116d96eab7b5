//! The persisted scratch record.
//!
//! Two tiny facts survive power loss outside the preference table: which
//! access point last worked (so reconnects start there) and the clock
//! adjustment from the last successful time sync. Stored as one postcard
//! blob; a missing or undecodable blob falls back to defaults.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::ports::StoragePort;
use crate::prefs::PREFS_NAMESPACE;

const SCRATCH_KEY: &str = "scratch";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentScratch {
    /// Index (0..3) of the last access point that reached `Connected`.
    /// Updated only on a successful join, never on failure.
    pub last_access_point: u8,
    /// Seconds the clock moved at the last sync.
    pub time_adjust: i64,
    /// Whether the clock has ever been set from the network.
    pub time_configured: bool,
}

impl PersistentScratch {
    /// Load from storage; defaults when absent or undecodable.
    pub fn load(storage: &impl StoragePort) -> Self {
        match storage.get_blob(PREFS_NAMESPACE, SCRATCH_KEY) {
            Ok(blob) => postcard::from_bytes(&blob).unwrap_or_else(|e| {
                warn!("scratch: undecodable ({e}), using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist. Best-effort: a failed write costs one reconnect hint and
    /// one re-sync, nothing more.
    pub fn save(&self, storage: &mut impl StoragePort) {
        match postcard::to_allocvec(self) {
            Ok(blob) => {
                if let Err(e) = storage.set_blob(PREFS_NAMESPACE, SCRATCH_KEY, &blob) {
                    warn!("scratch: save failed: {e}");
                }
            }
            Err(e) => warn!("scratch: encode failed: {e}"),
        }
    }

    /// The clock delta to apply to pre-sync timestamps; 0 until the clock
    /// has been configured once.
    pub fn time_adjustment(&self) -> i64 {
        if self.time_configured { self.time_adjust } else { 0 }
    }
}

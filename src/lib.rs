//! SnappySense firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is confined to `adapters` and
//! guarded by `#[cfg(target_os = "espidf")]`; everything else — the
//! supervisor state machine, the monitoring pipeline, the broker client,
//! preferences, the slideshow, provisioning — runs on the host against
//! the simulation adapters.

#![deny(unused_must_use)]

pub mod broker;
pub mod button;
pub mod cadence;
pub mod display;
pub mod events;
pub mod monitor;
pub mod prefs;
pub mod provision;
pub mod scratch;
pub mod sensor;
pub mod slideshow;
pub mod supervisor;
pub mod timers;
pub mod timesync;
pub mod wifi;

pub mod error;
pub mod pins;
pub mod ports;

// ESP-IDF-only code is guarded by cfg attributes inside.
pub mod adapters;

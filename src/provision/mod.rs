//! Provisioning (access-point) mode.
//!
//! Entered on a long button press; the only way out is a device restart.
//! The device stands up an open soft AP, shows its SSID and IP on the
//! OLED, and serves the configuration routes in [`http`]. Events keep
//! flowing through the same bus as in normal operation, but the loop here
//! recognizes only web requests and the button.

pub mod http;

use std::sync::mpsc;

use log::{info, warn};

use crate::button::ButtonLogic;
use crate::events::{EventBus, EventCode, Payload};
use crate::ports::{
    ClockPort, DevicePort, DisplayPort, EntropyPort, StoragePort, WifiPort,
};
use crate::prefs::PrefStore;
use crate::timers::TimerPort;
use crate::wifi::WifiManager;

pub use http::WebReply;

/// One HTTP request in flight: the server adapter posts this (owned) and
/// blocks on the reply channel until the loop has handled it.
#[derive(Debug)]
pub struct WebRequest {
    /// First request line, e.g. "POST /config HTTP/1.1".
    pub request_line: String,
    /// Decoded request body.
    pub body: String,
    /// Where the reply goes.
    pub reply_to: mpsc::Sender<WebReply>,
}

/// The SSID to advertise: the configured name, or a randomized fallback
/// so every unprovisioned device is distinguishable.
pub fn access_point_name(prefs: &PrefStore, entropy: &mut impl EntropyPort) -> String {
    let configured = prefs.web_config_access_point();
    if !configured.is_empty() {
        return configured.to_owned();
    }
    let bits = entropy.random_u32();
    format!("snp_{:04x}_{:04x}_cfg", bits >> 16, bits & 0xFFFF)
}

/// Run provisioning until the user restarts the device.
///
/// Returns only in simulation (where `DevicePort::restart` is recorded,
/// not performed); on hardware the restart never comes back.
#[allow(clippy::too_many_arguments)]
pub fn run(
    prefs: &mut PrefStore,
    storage: &mut impl StoragePort,
    wifi: &mut WifiManager,
    radio: &mut impl WifiPort,
    display: &mut impl DisplayPort,
    device: &mut impl DevicePort,
    clock: &impl ClockPort,
    timers: &mut impl TimerPort,
    entropy: &mut impl EntropyPort,
    bus: &EventBus,
) {
    let ssid = access_point_name(prefs, entropy);
    let ip = match wifi.create_access_point(radio, &ssid, None) {
        Ok(ip) => ip,
        Err(e) => {
            // Nothing sensible to retry; the user has to power-cycle.
            warn!("provision: access point failed: {e}");
            display.text("AP config failed.\n\nPress reset button!");
            return;
        }
    };
    display.text(&format!("{ssid}\n\n{ip}"));
    info!("provision: serving on {ip} as [{ssid}]");

    let mut button = ButtonLogic::new();
    loop {
        let ev = bus.receive();
        match ev.code {
            EventCode::WebRequest => {
                let Payload::Web(request) = ev.payload else {
                    warn!("provision: web request without payload");
                    continue;
                };
                let outcome =
                    http::handle_request(&request.request_line, &request.body, prefs, storage);
                if let Some(screen) = outcome.screen {
                    display.text(&screen);
                }
                if request.reply_to.send(outcome.reply).is_err() {
                    warn!("provision: client went away before the reply");
                }
            }
            EventCode::WebRequestFailed => {
                let Payload::Web(request) = ev.payload else {
                    continue;
                };
                let _ = request.reply_to.send(http::failed_request(&request.request_line));
            }
            EventCode::ButtonDown => button.on_down(clock.uptime_ms(), timers),
            EventCode::ButtonUp => button.on_up(clock.uptime_ms(), timers, bus),
            EventCode::ButtonHoldExpired => button.on_hold_expired(bus),
            EventCode::ButtonLongPress => {
                info!("provision: restart requested");
                device.restart();
                return;
            }
            // Stray events from the previous mode (slideshow ticks, comm
            // retries) are expected and ignored.
            other => {
                log::debug!("provision: ignoring event {other:?}");
            }
        }
    }
}

//! Provisioning flow: long press tears normal operation down, the AP
//! loop serves the config routes, and only a restart leaves it.

use std::sync::mpsc;

use snappysense::events::{EventCode, Payload};
use snappysense::ports::{BrokerTransport, DevicePort};
use snappysense::prefs::PrefStore;
use snappysense::provision::{WebReply, WebRequest};
use snappysense::supervisor::{Control, run_provisioning};
use snappysense::timers::TimerId;

use crate::rig::Rig;

fn queue_web(rig: &Rig, request_line: &str, body: &str) -> mpsc::Receiver<WebReply> {
    let (tx, rx) = mpsc::channel();
    rig.bus.post_owned(
        EventCode::WebRequest,
        Payload::Web(Box::new(WebRequest {
            request_line: request_line.into(),
            body: body.into(),
            reply_to: tx,
        })),
    );
    rx
}

#[test]
fn long_press_requests_provisioning_and_shuts_subsystems_down() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    rig.supervisor.boot(&rig.bus);
    rig.drain();
    rig.connect_wifi(); // Mid comm window.

    assert_eq!(rig.press_button(3500), Control::Provision);
    // Everything that could still tick is disarmed.
    assert!(!rig.platform.timers.is_armed(TimerId::Master));
    assert!(!rig.platform.timers.is_armed(TimerId::SlideshowTick));
    assert!(!rig.platform.timers.is_armed(TimerId::BrokerWork));
    assert!(!rig.platform.timers.is_armed(TimerId::TimeRetry));
    assert!(!rig.platform.timers.is_armed(TimerId::WifiRetry));
    assert!(!rig.platform.transport.is_connected());
}

#[test]
fn long_press_from_sleep_powers_back_up_first() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    rig.supervisor.boot(&rig.bus);
    rig.drain();
    rig.connect_wifi();
    rig.fire(TimerId::Master); // Comm closes (first cycle, straight on).
    rig.press_button(500); // Tentative: monitoring mode.
    rig.fire(TimerId::Master); // MonitorStop.
    rig.connect_wifi();
    rig.fire(TimerId::Master); // Comm closes.
    rig.fire(TimerId::Master); // Relaxation → sleep, peripherals off.
    assert!(rig.supervisor.is_sleeping());
    assert!(!rig.platform.device.is_powered());

    assert_eq!(rig.press_button(3500), Control::Provision);
    assert!(rig.platform.device.is_powered(), "screen needs power for the AP info");
}

#[test]
fn provisioning_serves_config_and_exits_via_restart() {
    let mut rig = Rig::with_prefs(PrefStore::new());
    rig.supervisor.boot(&rig.bus);
    rig.drain();
    assert_eq!(rig.press_button(3500), Control::Provision);

    // Queue a whole provisioning session, ending in the restart press.
    let form = queue_web(&rig, "GET / HTTP/1.1", "");
    let config = queue_web(
        &rig,
        "POST /config HTTP/1.1",
        "version 2.0.0\nset ssid1 lab\nset password1 lab-pass-1\nsave\nend",
    );
    let show = queue_web(&rig, "GET /show HTTP/1.1", "");
    rig.bus.post(EventCode::ButtonLongPress);

    run_provisioning(&mut rig.supervisor, &mut rig.platform, &rig.bus);

    assert!(rig.platform.device.was_restarted());
    assert_eq!(form.recv().unwrap().status, "200 OK");
    assert_eq!(config.recv().unwrap().status, "200 OK");
    let show_body = show.recv().unwrap().body;
    assert!(show_body.contains("lab"), "{show_body}");
    assert!(!show_body.contains("lab-pass-1"), "passwords stay redacted: {show_body}");

    // The script's save went to NVS: a fresh load sees the network.
    let mut reloaded = PrefStore::new();
    reloaded.load(&rig.platform.storage);
    assert_eq!(reloaded.access_point_ssid(1), "lab");
    assert_eq!(reloaded.access_point_password(1), "lab-pass-1");
}

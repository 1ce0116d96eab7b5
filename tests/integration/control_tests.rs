//! Remote-control flow: control messages arriving over the broker steer
//! the supervisor (enable/disable, capture interval).

use snappysense::ports::{InboundMessage, TimeFetch};
use snappysense::timers::TimerId;

use crate::rig::Rig;

/// Boot, connect, sync the clock, close the comm window, and run the
/// first monitoring window to completion.
fn run_first_observation(rig: &mut Rig) {
    rig.supervisor.boot(&rig.bus);
    rig.drain();
    rig.connect_wifi();
    rig.platform.time_source.set_result(TimeFetch::Ready(1_700_000_000));
    rig.fire(TimerId::TimeRetry);
    rig.fire(TimerId::Master); // Comm closes.
    for _ in 0..5 {
        rig.fire(TimerId::MonitorWarmup);
    }
    rig.fire(TimerId::Master); // MonitorStop.
}

fn deliver_control(rig: &mut Rig, payload: &str) {
    rig.platform.transport.push_inbound(InboundMessage {
        topic: "snappy/control/snp-test-1".into(),
        payload: payload.as_bytes().to_vec(),
    });
    // The broker polls for inbound on its work tick when the outbound
    // queue is empty.
    rig.fire(TimerId::BrokerWork);
}

#[test]
fn disable_stops_observation_intake_and_enable_restores_it() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    run_first_observation(&mut rig);
    rig.connect_wifi(); // Second comm window flushes observation #1.
    let baseline = rig
        .platform
        .transport
        .published()
        .iter()
        .filter(|(t, _)| t.starts_with("snappy/observation/"))
        .count();
    assert_eq!(baseline, 1);

    deliver_control(&mut rig, "{\"enable\":0}");
    assert!(!rig.supervisor.prefs().device_enabled());

    // Run the next monitoring window; its observation must be discarded.
    rig.fire(TimerId::Master); // Comm closes.
    rig.fire(TimerId::Master); // Relaxation.
    rig.fire(TimerId::Master); // Slideshow-mode sleep.
    for _ in 0..5 {
        rig.fire(TimerId::MonitorWarmup);
    }
    rig.platform.clock.advance(3600); // Clear the capture rate limit.
    rig.fire(TimerId::Master); // MonitorStop: enqueue short-circuits.
    rig.connect_wifi();
    // Drain broker ticks until idle.
    for _ in 0..6 {
        rig.fire(TimerId::BrokerWork);
    }
    let after_disable = rig
        .platform
        .transport
        .published()
        .iter()
        .filter(|(t, _)| t.starts_with("snappy/observation/"))
        .count();
    assert_eq!(after_disable, 1, "disabled device publishes nothing new");

    // Re-enable over the same channel.
    deliver_control(&mut rig, "{\"enable\":1}");
    assert!(rig.supervisor.prefs().device_enabled());
}

#[test]
fn interval_control_reaches_the_broker_client() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    run_first_observation(&mut rig);
    rig.connect_wifi();

    deliver_control(&mut rig, "{\"interval\":60}");

    use snappysense::cadence::DisplayMode;
    let broker = rig.supervisor.broker();
    assert_eq!(broker.capture_interval_for_upload_s(DisplayMode::Monitoring), 60);
    // Slideshow mode keeps its fixed cadence.
    assert_eq!(broker.capture_interval_for_upload_s(DisplayMode::Slideshow), 60);
}

#[test]
fn garbage_control_messages_change_nothing() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    run_first_observation(&mut rig);
    rig.connect_wifi();

    deliver_control(&mut rig, "not json");
    deliver_control(&mut rig, "{\"unknown\":true}");
    assert!(rig.supervisor.prefs().device_enabled());

    // Command topic is reserved; nothing happens either.
    rig.platform.transport.push_inbound(InboundMessage {
        topic: "snappy/command/snp-test-1".into(),
        payload: b"{\"actuator\":\"fan\"}".to_vec(),
    });
    rig.fire(TimerId::BrokerWork);
    assert!(rig.supervisor.prefs().device_enabled());
}

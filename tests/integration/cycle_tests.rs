//! Full-cycle tests: boot → comm window → sleep → monitoring → repeat,
//! with the master timeout and component timers fired by hand.

use snappysense::adapters::display::Rendered;
use snappysense::cadence::DisplayMode;
use snappysense::events::EventCode;
use snappysense::ports::{ClockPort, DevicePort, TimeFetch};
use snappysense::scratch::PersistentScratch;
use snappysense::supervisor::Control;
use snappysense::timers::TimerId;

use crate::rig::Rig;

/// Walk a rig from boot through a successful Wi-Fi join; leaves the comm
/// window open with the broker already announced.
fn boot_through_comm(rig: &mut Rig) {
    rig.supervisor.boot(&rig.bus);
    assert_eq!(rig.drain(), Control::Continue);

    // The Wi-Fi manager is retrying; let the link come up.
    assert!(rig.platform.timers.is_armed(TimerId::WifiRetry));
    assert_eq!(rig.connect_wifi(), Control::Continue);

    // Comm window open: master timeout armed with the activity code.
    assert_eq!(rig.master_code(), Some(EventCode::CommActivityExpired));
}

#[test]
fn first_cycle_without_wifi_falls_through_to_monitoring() {
    let mut rig = Rig::new(); // No networks configured.
    rig.supervisor.boot(&rig.bus);
    rig.drain();

    // The join failed outright; the user was told.
    rig.fire(TimerId::SlideshowTick);
    assert!(
        rig.platform.display.rendered.iter().any(|r| matches!(
            r,
            Rendered::Text(t) if t == "No WiFi"
        )),
        "expected the No WiFi banner, got {:?}",
        rig.platform.display.rendered
    );

    // And the cycle moved on to monitoring regardless.
    assert_eq!(rig.master_code(), Some(EventCode::MonitorStop));
    assert!(rig.platform.timers.is_armed(TimerId::MonitorWarmup));
}

#[test]
fn comm_window_connects_syncs_time_and_announces() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    boot_through_comm(&mut rig);

    // The broker got through its state machine and sent the startup
    // announcement.
    let published = rig.platform.transport.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "snappy/startup/snappysense/snp-test-1");
    assert_eq!(rig.platform.transport.subscriptions().len(), 4);

    // Time sync is pending; complete it on the retry tick.
    assert!(rig.platform.timers.is_armed(TimerId::TimeRetry));
    rig.platform.time_source.set_result(TimeFetch::Ready(1_700_000_000));
    rig.fire(TimerId::TimeRetry);
    assert_eq!(rig.platform.clock.epoch(), 1_700_000_000);

    // The adjustment was persisted for the broker's delayed queue.
    let scratch = PersistentScratch::load(&rig.platform.storage);
    assert!(scratch.time_configured);
    assert_eq!(scratch.time_adjust, 1_700_000_000 - 1000);
}

#[test]
fn full_first_cycle_produces_an_observation() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    boot_through_comm(&mut rig);
    rig.platform.time_source.set_result(TimeFetch::Ready(1_700_000_000));
    rig.fire(TimerId::TimeRetry);

    // Idle the comm window out; first cycle skips relaxation and sleep.
    rig.fire(TimerId::Master); // CommActivityExpired
    assert_eq!(rig.master_code(), Some(EventCode::MonitorStop));

    // Warmup: five slices, then integration timers take over.
    for _ in 0..5 {
        assert!(rig.platform.timers.is_armed(TimerId::MonitorWarmup));
        rig.fire(TimerId::MonitorWarmup);
    }
    assert!(!rig.platform.timers.is_armed(TimerId::MonitorWarmup));
    assert!(rig.platform.timers.is_armed(TimerId::MonitorPir));
    assert!(rig.platform.timers.is_armed(TimerId::MonitorMems));

    // Some motion mid-window.
    rig.platform.device.set_motion(true);
    rig.fire(TimerId::MonitorPir);

    // Window closes: one observation lands everywhere.
    rig.fire(TimerId::Master); // MonitorStop
    let snapshot = rig.supervisor.last_snapshot().expect("snapshot retained");
    assert_eq!(snapshot.motion, Some(true));
    assert_eq!(snapshot.temperature_c, Some(22.5));

    // The next cycle's comm window is already opening (early times);
    // connecting flushes the queued observation.
    assert!(rig.platform.timers.is_armed(TimerId::WifiRetry), "second comm window under way");
    rig.connect_wifi();
    let observations: Vec<_> = rig
        .platform
        .transport
        .published()
        .into_iter()
        .filter(|(topic, _)| topic.starts_with("snappy/observation/"))
        .collect();
    assert_eq!(observations.len(), 1);
    assert!(observations[0].1.contains("\"F#motion\":1"), "{}", observations[0].1);
}

#[test]
fn short_press_toggles_mode_and_monitoring_mode_sleeps_dark() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    boot_through_comm(&mut rig);
    rig.platform.time_source.set_result(TimeFetch::Ready(1_700_000_000));
    rig.fire(TimerId::TimeRetry);
    rig.fire(TimerId::Master); // Comm closes; monitoring starts (first cycle).

    // Toggle to monitoring mode mid-cycle; banner shows on the next tick.
    rig.press_button(500);
    rig.fire(TimerId::SlideshowTick);
    assert_eq!(rig.platform.display.last_text(), Some("Monitoring mode"));
    // Not committed yet.
    assert_eq!(rig.supervisor.mode(), DisplayMode::Slideshow);

    // Close the monitoring window; run the second cycle's comm window out.
    rig.fire(TimerId::Master); // MonitorStop → StartCycle → comm again.
    rig.connect_wifi();
    rig.fire(TimerId::Master); // CommActivityExpired
    assert_eq!(rig.master_code(), Some(EventCode::SleepStart), "relaxation before sleep");
    rig.fire(TimerId::Master); // SleepStart commits the mode.

    assert_eq!(rig.supervisor.mode(), DisplayMode::Monitoring);
    assert!(rig.supervisor.is_sleeping());
    assert!(!rig.platform.device.is_powered(), "peripherals off in the sleep window");
    assert_eq!(rig.master_code(), Some(EventCode::PostSleep));

    // Sleep expires: peripherals return, slideshow restarts, monitoring
    // window opens.
    rig.fire(TimerId::Master);
    assert!(rig.platform.device.is_powered());
    assert!(!rig.supervisor.is_sleeping());
    assert_eq!(rig.master_code(), Some(EventCode::MonitorStop));
    assert_eq!(rig.platform.device.power_cycles(), 2);
}

#[test]
fn button_press_during_sleep_wakes_early() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    boot_through_comm(&mut rig);
    rig.platform.time_source.set_result(TimeFetch::Ready(1_700_000_000));
    rig.fire(TimerId::TimeRetry);
    rig.fire(TimerId::Master); // Comm closes, monitoring (first cycle).
    rig.press_button(500); // Toggle to monitoring mode.
    rig.fire(TimerId::Master); // MonitorStop.
    rig.connect_wifi();
    rig.fire(TimerId::Master); // Comm closes.
    rig.fire(TimerId::Master); // Relaxation → SleepStart; now asleep.
    assert!(rig.supervisor.is_sleeping());

    rig.press_button(500);
    assert!(!rig.supervisor.is_sleeping(), "a press in the sleep window wakes the device");
    // The committed mode's banner shows, and monitoring starts.
    rig.fire(TimerId::SlideshowTick);
    assert_eq!(rig.platform.display.last_text(), Some("Monitoring mode"));
    assert_eq!(rig.master_code(), Some(EventCode::MonitorStop));
}

#[test]
fn observations_before_time_sync_wait_in_the_delayed_queue() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    // The time source never answers this cycle.
    rig.supervisor.boot(&rig.bus);
    rig.drain();
    rig.connect_wifi();
    rig.fire(TimerId::Master); // Comm closes without a sync.

    for _ in 0..5 {
        rig.fire(TimerId::MonitorWarmup);
    }
    rig.fire(TimerId::Master); // MonitorStop: observation captured.

    // The snapshot is held, not queued for upload.
    assert_eq!(rig.supervisor.last_snapshot().unwrap().timestamp, 1000);
    let observations = rig
        .platform
        .transport
        .published()
        .into_iter()
        .filter(|(topic, _)| topic.starts_with("snappy/observation/"))
        .count();
    assert_eq!(observations, 0, "nothing published before the clock is right");
}

#[test]
fn monitoring_windows_pair_with_stops_across_cycles() {
    let mut rig = Rig::with_prefs(Rig::provisioned_prefs());
    boot_through_comm(&mut rig);
    rig.platform.time_source.set_result(TimeFetch::Ready(1_700_000_000));
    rig.fire(TimerId::TimeRetry);
    rig.fire(TimerId::Master);

    // Three consecutive cycles; each monitoring window opens and closes
    // exactly once, and the master slot always holds the right close code.
    for cycle in 0..3 {
        assert_eq!(
            rig.master_code(),
            Some(EventCode::MonitorStop),
            "cycle {cycle}: monitoring window open"
        );
        for _ in 0..5 {
            rig.fire(TimerId::MonitorWarmup);
        }
        rig.fire(TimerId::Master); // MonitorStop.

        // Comm window follows (early times connect eagerly).
        rig.connect_wifi();
        assert_eq!(rig.master_code(), Some(EventCode::CommActivityExpired));
        rig.fire(TimerId::Master); // Close comm.
        assert_eq!(rig.master_code(), Some(EventCode::SleepStart));
        rig.fire(TimerId::Master); // Relaxation over.
        assert_eq!(rig.master_code(), Some(EventCode::PostSleep));
        rig.fire(TimerId::Master); // Slideshow-mode sleep over.
    }
}

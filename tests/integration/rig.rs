//! Shared test rig: a full supervisor wired to simulation adapters.

use snappysense::adapters::clock::SimClock;
use snappysense::adapters::device::SimDevice;
use snappysense::adapters::display::SimDisplay;
use snappysense::adapters::mqtt::SimTransport;
use snappysense::adapters::nvs::MemStorage;
use snappysense::adapters::sntp::SimTimeSource;
use snappysense::adapters::timer::FakeTimers;
use snappysense::adapters::wifi::SimWifi;
use snappysense::events::{EventBus, EventCode};
use snappysense::ports::EntropyPort;
use snappysense::prefs::PrefStore;
use snappysense::scratch::PersistentScratch;
use snappysense::supervisor::{Control, Platform, Supervisor};
use snappysense::timers::TimerId;

pub struct FixedEntropy(pub u32);

impl EntropyPort for FixedEntropy {
    fn random_u32(&mut self) -> u32 {
        self.0
    }
}

pub type SimPlatform = Platform<
    SimDevice,
    SimDisplay,
    SimWifi,
    SimTransport,
    SimTimeSource,
    MemStorage,
    SimClock,
    FakeTimers,
    FixedEntropy,
>;

pub struct Rig {
    pub supervisor: Supervisor,
    pub platform: SimPlatform,
    pub bus: EventBus,
}

impl Rig {
    /// A rig with factory prefs and an unsynchronized clock.
    pub fn new() -> Self {
        Self::with_prefs(PrefStore::new())
    }

    pub fn with_prefs(prefs: PrefStore) -> Self {
        let mut device = SimDevice::new();
        // On hardware the facade powers the rail at construction.
        use snappysense::ports::DevicePort;
        device.power_on();
        let platform = Platform {
            device,
            display: SimDisplay::new(),
            radio: SimWifi::new(),
            transport: SimTransport::new(),
            time_source: SimTimeSource::new(),
            storage: MemStorage::new(),
            clock: SimClock::new(1000),
            timers: FakeTimers::new(),
            entropy: FixedEntropy(0xABCD_1234),
        };
        Self {
            supervisor: Supervisor::new(prefs, PersistentScratch::default()),
            platform,
            bus: EventBus::new(),
        }
    }

    /// Prefs for a device with one working network and a broker account.
    pub fn provisioned_prefs() -> PrefStore {
        let mut prefs = PrefStore::new();
        prefs.set_access_point_ssid(1, "homenet");
        prefs.set_access_point_password(1, "hunter2hunter2");
        prefs.set_string("mqtt-auth", "pass");
        prefs.set_string("mqtt-username", "dev");
        prefs.set_string("mqtt-password", "pw");
        prefs.set_string("mqtt-id", "snp-test-1");
        prefs.set_string("mqtt-class", "snappysense");
        prefs.set_string("mqtt-endpoint-host", "broker.example");
        prefs
    }

    /// Process every queued event; report whether provisioning was
    /// requested along the way.
    pub fn drain(&mut self) -> Control {
        while let Some(ev) = self.bus.try_receive() {
            if self.supervisor.handle(ev, &mut self.platform, &self.bus) == Control::Provision {
                return Control::Provision;
            }
        }
        Control::Continue
    }

    /// Fire a timer (if armed) and process the fallout.
    pub fn fire(&mut self, id: TimerId) -> Control {
        self.platform.timers.fire(id, &self.bus);
        self.drain()
    }

    /// Let the simulated link come up and deliver the pending retry tick.
    pub fn connect_wifi(&mut self) -> Control {
        self.platform.radio.set_up(true);
        self.fire(TimerId::WifiRetry)
    }

    /// Events currently armed on the master timeout slot.
    pub fn master_code(&self) -> Option<EventCode> {
        self.platform.timers.armed_code(TimerId::Master)
    }

    pub fn post(&mut self, code: EventCode) -> Control {
        self.bus.post(code);
        self.drain()
    }

    /// Drive a full press of the given duration through the event bus.
    pub fn press_button(&mut self, ms: u64) -> Control {
        self.bus.post(EventCode::ButtonDown);
        let control = self.drain();
        if control == Control::Provision {
            return control;
        }
        if ms >= 3000 {
            // The hold timer beats the release.
            return self.fire(TimerId::ButtonHold);
        }
        self.platform.clock.advance_ms(ms);
        self.bus.post(EventCode::ButtonUp);
        self.drain()
    }
}

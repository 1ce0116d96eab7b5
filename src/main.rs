//! SnappySense firmware — main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspDevice      EspDisplay     EspWifiRadio    EspMqttTransport│
//! │  (sensors+power) (SSD1306)     (station/AP)    (broker wire)   │
//! │  EspSntpSource  NvsStorage     EspClock        EspTimers       │
//! │                                                                │
//! │  ──────────────── Port trait boundary ─────────────────────    │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           Supervisor (pure logic, event-driven)        │    │
//! │  │  Wi-Fi mgr · broker · time · monitor · slideshow · btn │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  One event bus; timers and ISRs only post, the supervisor      │
//! │  loop is the single consumer.                                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::gpio::{InterruptType, OutputPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;
use esp_idf_svc::eventloop::EspSystemEventLoop;

use snappysense::adapters::clock::EspClock;
use snappysense::adapters::device::EspDevice;
use snappysense::adapters::display::EspDisplay;
use snappysense::adapters::http;
use snappysense::adapters::mqtt::EspMqttTransport;
use snappysense::adapters::nvs::NvsStorage;
use snappysense::adapters::sntp::EspSntpSource;
use snappysense::adapters::timer::EspTimers;
use snappysense::adapters::wifi::EspWifiRadio;
use snappysense::events::{EventBus, EventCode};
use snappysense::ports::EntropyPort;
use snappysense::prefs::PrefStore;
use snappysense::scratch::PersistentScratch;
use snappysense::supervisor::{Platform, Supervisor, run_main_loop, run_provisioning};

/// Bus handle for the button ISR, which cannot capture.
static ISR_BUS: OnceLock<Arc<EventBus>> = OnceLock::new();

/// Hardware RNG for the provisioning SSID fallback.
struct EspEntropy;

impl EntropyPort for EspEntropy {
    fn random_u32(&mut self) -> u32 {
        // SAFETY: esp_random has no preconditions once the RF subsystem
        // or the bootloader entropy source is up.
        unsafe { esp_idf_svc::sys::esp_random() }
    }
}

/// Unrecoverable invariant violations end here: announce, then halt until
/// the user presses reset.
fn install_panic_halt() {
    std::panic::set_hook(Box::new(|info| {
        log::error!("panic: {info}");
        log::error!("Press reset button!");
        loop {
            std::thread::sleep(core::time::Duration::from_secs(1));
        }
    }));
}

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init().map_err(|e| anyhow!("logger: {e:?}"))?;
    install_panic_halt();

    info!("SnappySense v{} starting", env!("CARGO_PKG_VERSION"));

    let bus = Arc::new(EventBus::new());
    let _ = ISR_BUS.set(Arc::clone(&bus));

    // ── Storage, configuration, scratch ───────────────────────
    let storage = NvsStorage::new().context("NVS init")?;
    let mut prefs = PrefStore::new();
    prefs.load(&storage);
    let scratch = PersistentScratch::load(&storage);

    // ── Peripherals ───────────────────────────────────────────
    let peripherals = Peripherals::take().context("peripherals")?;
    let sysloop = EspSystemEventLoop::take().context("event loop")?;

    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio23, // SDA
        peripherals.pins.gpio22, // SCL
        &i2c_config,
    )
    .context("i2c")?;
    let i2c = std::rc::Rc::new(std::cell::RefCell::new(i2c));

    // The display and the sensor facade share the bus handle; both run on
    // the main task only.
    let display = EspDisplay::new(std::rc::Rc::clone(&i2c));
    let adc = AdcDriver::new(peripherals.adc1).context("adc")?;
    let device = EspDevice::new(
        peripherals.pins.gpio26.downgrade_output(), // power enable (A0)
        std::rc::Rc::clone(&i2c),
        adc,
        peripherals.pins.gpio34, // PIR (A2)
        peripherals.pins.gpio39, // MEMS mic (A3)
    )
    .map_err(|e| anyhow!("device: {e}"))?;

    // ── Button ISR: raw edges onto the bus ────────────────────
    // The board wires the button active-high with its own divider; no
    // internal pull wanted.
    let mut button_pin =
        PinDriver::input(peripherals.pins.gpio25).context("button gpio")?;
    button_pin.set_pull(Pull::Floating).context("button pull")?;
    button_pin.set_interrupt_type(InterruptType::AnyEdge).context("button irq type")?;
    // SAFETY: the handler runs in ISR context and only posts to the
    // lock-free ring; no allocation, no locks, no core state.
    unsafe {
        button_pin
            .subscribe(|| {
                if let Some(bus) = ISR_BUS.get() {
                    // SAFETY: gpio_get_level is ISR-safe register access.
                    let level = unsafe {
                        esp_idf_svc::sys::gpio_get_level(snappysense::pins::BUTTON_GPIO)
                    };
                    bus.post_from_isr(if level != 0 {
                        EventCode::ButtonDown
                    } else {
                        EventCode::ButtonUp
                    });
                }
            })
            .context("button isr")?;
    }
    button_pin.enable_interrupt().context("button irq enable")?;

    // ── Remaining adapters ────────────────────────────────────
    let radio = EspWifiRadio::new(peripherals.modem, sysloop, None)
        .map_err(|e| anyhow!("wifi: {e}"))?;
    let transport = EspMqttTransport::new();
    let time_source = EspSntpSource::new();
    let clock = EspClock::new();
    let timers = EspTimers::new(Arc::clone(&bus)).map_err(|e| anyhow!("timers: {e}"))?;

    let mut platform = Platform {
        device,
        display,
        radio,
        transport,
        time_source,
        storage,
        clock,
        timers,
        entropy: EspEntropy,
    };

    // ── Run ───────────────────────────────────────────────────
    let mut supervisor = Supervisor::new(prefs, scratch);
    run_main_loop(&mut supervisor, &mut platform, &bus);

    // A long press landed: serve provisioning until the user resets.
    info!("entering provisioning mode");
    let _server = match http::start(Arc::clone(&bus)) {
        Ok(server) => Some(server),
        Err(e) => {
            warn!("provisioning server failed: {e}");
            None
        }
    };
    run_provisioning(&mut supervisor, &mut platform, &bus);
    unreachable!("provisioning exits only through device restart");
}

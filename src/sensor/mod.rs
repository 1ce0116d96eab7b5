//! Sensor data model.
//!
//! [`SensorSnapshot`] is one immutable observation: a sequence number, a
//! timestamp, and an optional value per factor. `None` means the factor was
//! invalid or unsupported at capture time — the validity gates live in
//! [`convert`], the capture logic in [`Sampler`].
//!
//! [`FACTORS`] is the per-factor metadata table driving both the slideshow
//! (icons, display formatting, units) and the wire format (JSON keys,
//! ordering).

pub mod convert;
pub mod json;

use crate::ports::DevicePort;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One observation. Created by the monitoring pipeline at window close;
/// consumers (broker, slideshow) each get their own copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Monotonically increasing per boot; wraps silently.
    pub sequence: u32,
    /// Seconds since the Unix epoch, UTC. Uncorrected before time sync.
    pub timestamp: i64,

    /// Degrees Celsius.
    pub temperature_c: Option<f32>,
    /// Relative humidity, percent 0–100.
    pub humidity_pct: Option<f32>,
    /// Ultraviolet intensity index, 0–15.
    pub uv_index: Option<f32>,
    /// Illuminance, lux.
    pub illuminance_lx: Option<f32>,
    /// Atmospheric pressure, hPa.
    pub pressure_hpa: Option<u16>,
    /// Altitude, meters above sea level.
    pub altitude_m: Option<f32>,
    /// Air sensor status: 0 normal, 1 warmup, 2 initial startup, 3 invalid.
    pub air_status: Option<u8>,
    /// Air quality index, 1 (excellent) – 5 (unhealthy).
    pub aqi: Option<u8>,
    /// Total volatile organic compounds, ppb.
    pub tvoc_ppb: Option<u16>,
    /// Equivalent CO₂, ppm. Five bands from excellent (400–600) up.
    pub eco2_ppm: Option<u16>,
    /// Motion seen at any point during the window.
    pub motion: Option<bool>,
    /// Maximum raw microphone reading over the window. The scale is the
    /// ADC's: ~1500 counts quiescent, noisier rooms push toward 2200+.
    pub noise_raw: Option<u16>,
}

// ---------------------------------------------------------------------------
// Factors and metadata
// ---------------------------------------------------------------------------

/// The environmental factors a snapshot can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    Temperature,
    Humidity,
    Uv,
    Light,
    Pressure,
    Altitude,
    AirSensor,
    AirQuality,
    Tvoc,
    Co2,
    Motion,
    Noise,
}

/// A factor value, typed for formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorValue {
    Float(f32),
    Int(u32),
    Bool(bool),
}

/// Metadata row for one factor.
pub struct FactorMeta {
    pub factor: Factor,
    /// Wire key; prefixed with `F#` in observation JSON.
    pub json_key: &'static str,
    /// For humans.
    pub explanatory_text: &'static str,
    /// Unit label that fits next to the icon on the display.
    pub display_unit: &'static str,
    /// Proper unit name.
    pub unit_text: &'static str,
    /// False for rows the slideshow skips (no sensible visual form).
    pub displayable: bool,
}

/// Factor metadata, in wire order. The slideshow iterates it in the same
/// order, skipping non-displayable rows and invalid values.
pub static FACTORS: &[FactorMeta] = &[
    FactorMeta {
        factor: Factor::Temperature,
        json_key: "temperature",
        explanatory_text: "Temperature",
        display_unit: "C",
        unit_text: "C",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Humidity,
        json_key: "humidity",
        explanatory_text: "Humidity",
        display_unit: "%",
        unit_text: "%",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Uv,
        json_key: "uv",
        explanatory_text: "Ultraviolet intensity",
        display_unit: "",
        unit_text: "mW/cm^2",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Light,
        json_key: "light",
        explanatory_text: "Luminous intensity",
        display_unit: "lx",
        unit_text: "lx",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Pressure,
        json_key: "pressure",
        explanatory_text: "Atmospheric pressure",
        display_unit: "hpa",
        unit_text: "hpa",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Altitude,
        json_key: "altitude",
        explanatory_text: "Altitude",
        display_unit: "m",
        unit_text: "m",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::AirSensor,
        json_key: "airsensor",
        explanatory_text: "Air sensor status",
        display_unit: "",
        unit_text: "",
        displayable: false,
    },
    FactorMeta {
        factor: Factor::AirQuality,
        json_key: "airquality",
        explanatory_text: "Air quality index",
        display_unit: "",
        unit_text: "",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Tvoc,
        json_key: "tvoc",
        explanatory_text: "Concentration of total volatile organic compounds",
        display_unit: "ppb",
        unit_text: "ppb",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Co2,
        json_key: "co2",
        explanatory_text: "Carbon dioxide equivalent concentration",
        display_unit: "ppm",
        unit_text: "ppm",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Motion,
        json_key: "motion",
        explanatory_text: "Motion detected",
        display_unit: "",
        unit_text: "",
        displayable: true,
    },
    FactorMeta {
        factor: Factor::Noise,
        json_key: "noise",
        explanatory_text: "Noise value",
        display_unit: "",
        unit_text: "",
        displayable: true,
    },
];

impl SensorSnapshot {
    /// The typed value of a factor, `None` when invalid/unsupported.
    pub fn factor_value(&self, factor: Factor) -> Option<FactorValue> {
        match factor {
            Factor::Temperature => self.temperature_c.map(FactorValue::Float),
            Factor::Humidity => self.humidity_pct.map(FactorValue::Float),
            Factor::Uv => self.uv_index.map(FactorValue::Float),
            Factor::Light => self.illuminance_lx.map(FactorValue::Float),
            Factor::Pressure => self.pressure_hpa.map(|v| FactorValue::Int(u32::from(v))),
            Factor::Altitude => self.altitude_m.map(FactorValue::Float),
            Factor::AirSensor => self.air_status.map(|v| FactorValue::Int(u32::from(v))),
            Factor::AirQuality => self.aqi.map(|v| FactorValue::Int(u32::from(v))),
            Factor::Tvoc => self.tvoc_ppb.map(|v| FactorValue::Int(u32::from(v))),
            Factor::Co2 => self.eco2_ppm.map(|v| FactorValue::Int(u32::from(v))),
            Factor::Motion => self.motion.map(FactorValue::Bool),
            Factor::Noise => self.noise_raw.map(|v| FactorValue::Int(u32::from(v))),
        }
    }

    /// Short display form for the slideshow; loses precision on purpose.
    /// `None` when the factor has no value.
    pub fn display_value(&self, factor: Factor) -> Option<String> {
        let value = self.factor_value(factor)?;
        Some(match (factor, value) {
            // One decimal fits the panel for these two.
            (Factor::Temperature | Factor::Humidity, FactorValue::Float(v)) => format!("{v:.1}"),
            (Factor::Light | Factor::Altitude, FactorValue::Float(v)) => format!("{}", v as i32),
            (_, FactorValue::Float(v)) => format!("{v}"),
            (_, FactorValue::Int(v)) => format!("{v}"),
            (_, FactorValue::Bool(v)) => format!("{}", i32::from(v)),
        })
    }
}

// ---------------------------------------------------------------------------
// Sampler
// ---------------------------------------------------------------------------

/// Capture-side state that spans snapshots: the sequence counter, the
/// once-per-power-up air-sensor calibration latch, and the PIR/microphone
/// window accumulators.
#[derive(Debug, Default)]
pub struct Sampler {
    sequence: u32,
    air_primed: bool,
    pir_latch: bool,
    mems_max: u16,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the air-sensor calibration; call after a peripheral power
    /// cycle, which resets the chip.
    pub fn on_power_cycle(&mut self) {
        self.air_primed = false;
    }

    /// Zero the PIR/microphone accumulators at the start of a window.
    pub fn reset_window(&mut self) {
        self.pir_latch = false;
        self.mems_max = 0;
    }

    /// OR one PIR sample into the window latch.
    pub fn sample_pir(&mut self, device: &mut impl DevicePort) {
        if device.read_motion() {
            self.pir_latch = true;
        }
    }

    /// Take the max of the window so far and one microphone sample.
    pub fn sample_mems(&mut self, device: &mut impl DevicePort) {
        self.mems_max = self.mems_max.max(device.read_noise());
    }

    pub fn motion_latched(&self) -> bool {
        self.pir_latch
    }

    pub fn noise_max(&self) -> u16 {
        self.mems_max
    }

    /// Read every sensor and build a gated snapshot.
    ///
    /// Air readings are taken only once the sensor has been handed a valid
    /// temperature/humidity compensation point, which happens here the
    /// first time both are simultaneously valid. Status 3 (invalid)
    /// suppresses the three air factors.
    pub fn capture(&mut self, device: &mut impl DevicePort, epoch: i64) -> SensorSnapshot {
        let mut snap = SensorSnapshot {
            sequence: self.sequence,
            timestamp: epoch,
            ..SensorSnapshot::default()
        };
        self.sequence = self.sequence.wrapping_add(1);

        if let Some(env) = device.read_environment() {
            snap.temperature_c = convert::gate_temperature(env.temperature_c);
            snap.humidity_pct = convert::gate_humidity(env.humidity_pct);
            snap.uv_index = Some(convert::uv_index_from_volts(env.uv_volts));
            snap.illuminance_lx = Some(convert::lux_from_counts(env.light_counts));
            snap.pressure_hpa = convert::gate_pressure(env.pressure_hpa);
            snap.altitude_m = Some(env.altitude_m);
        }

        if !self.air_primed {
            if let (Some(t), Some(h)) = (snap.temperature_c, snap.humidity_pct) {
                device.calibrate_air(t, h / 100.0);
                self.air_primed = true;
            }
        }
        if self.air_primed {
            if let Some(air) = device.read_air() {
                snap.air_status = Some(air.status);
                if air.status != 3 {
                    snap.aqi = convert::gate_aqi(air.aqi);
                    snap.tvoc_ppb = convert::gate_tvoc(air.tvoc_ppb);
                    snap.eco2_ppm = convert::gate_eco2(air.eco2_ppm);
                }
            }
        }

        snap.motion = Some(self.pir_latch);
        snap.noise_raw = Some(self.mems_max);
        snap
    }
}

//! Sensor-node hardware facade.
//!
//! Implements [`DevicePort`] for SnappySense HW 1.1.0: one power-enable
//! GPIO gating the peripheral rail, the SEN0500 environmental combo sensor
//! and the ENS160 air sensor on I²C, the PIR on an analog pin, and the
//! MEMS microphone on another.
//!
//! Values leave this module raw (voltages, counts, sentinel failures);
//! calibration curves and validity gates are applied by the monitoring
//! pipeline.

use crate::ports::{DevicePort, RawAir, RawEnvironment};

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::adc::ADC1;
    use esp_idf_hal::adc::attenuation::DB_11;
    use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
    use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
    use esp_idf_hal::gpio::{ADCPin, AnyOutputPin, Output, PinDriver};
    use esp_idf_hal::i2c::I2cDriver;
    use log::{info, warn};

    use super::{DevicePort, RawAir, RawEnvironment};
    use crate::pins;

    // SEN0500 protocol-adapter registers (16-bit big-endian payloads; the
    // register number is sent shifted left one bit).
    const SEN0500_ADDR: u8 = 0x22;
    const SEN0500_REG_DEVICE_ADDR: u8 = 0x02;
    const SEN0500_REG_UV: u8 = 0x08;
    const SEN0500_REG_LIGHT: u8 = 0x09;
    const SEN0500_REG_TEMP: u8 = 0x0A;
    const SEN0500_REG_HUMIDITY: u8 = 0x0B;
    const SEN0500_REG_PRESSURE: u8 = 0x0C;
    const SEN0500_REG_ELEVATION: u8 = 0x0D;

    // ENS160 registers (16-bit payloads little-endian).
    const ENS160_ADDR: u8 = 0x53;
    const ENS160_PART_ID: u16 = 0x160;
    const ENS160_REG_PART_ID: u8 = 0x00;
    const ENS160_REG_OPMODE: u8 = 0x10;
    const ENS160_REG_CONFIG: u8 = 0x11;
    const ENS160_REG_TEMP_IN: u8 = 0x13;
    const ENS160_REG_STATUS: u8 = 0x20;
    const ENS160_REG_AQI: u8 = 0x21;
    const ENS160_REG_TVOC: u8 = 0x22;
    const ENS160_REG_ECO2: u8 = 0x24;
    const ENS160_STANDARD_MODE: u8 = 0x02;

    /// PIR output is a slow analog high while motion is seen.
    const PIR_ACTIVE_COUNTS: u16 = 2048;

    /// Settle time after raising the peripheral rail. 100 ms is not
    /// enough; 1000 ms has proven reliable.
    const POWER_SETTLE_MS: u64 = 1000;

    type SharedAdc = std::sync::Arc<AdcDriver<'static, ADC1>>;
    type AdcChannel<P> = AdcChannelDriver<'static, P, SharedAdc>;

    /// I²C bus handle shared with the display; main task only.
    pub type SharedI2c = std::rc::Rc<std::cell::RefCell<I2cDriver<'static>>>;

    pub struct EspDevice<P, M>
    where
        P: ADCPin<Adc = esp_idf_hal::adc::ADC1>,
        M: ADCPin<Adc = esp_idf_hal::adc::ADC1>,
    {
        power: PinDriver<'static, AnyOutputPin, Output>,
        i2c: SharedI2c,
        pir: AdcChannel<P>,
        mic: AdcChannel<M>,
        powered: bool,
        env_present: bool,
        air_present: bool,
    }

    impl<P, M> EspDevice<P, M>
    where
        P: ADCPin<Adc = esp_idf_hal::adc::ADC1>,
        M: ADCPin<Adc = esp_idf_hal::adc::ADC1>,
    {
        /// Take the pins and bus, raise the rail, probe the chips.
        pub fn new(
            power_pin: AnyOutputPin,
            i2c: SharedI2c,
            adc: AdcDriver<'static, ADC1>,
            pir_pin: P,
            mic_pin: M,
        ) -> Result<Self, crate::error::Error> {
            let adc = std::sync::Arc::new(adc);
            let config = AdcChannelConfig { attenuation: DB_11, ..AdcChannelConfig::default() };
            let pir = AdcChannelDriver::new(std::sync::Arc::clone(&adc), pir_pin, &config)
                .map_err(|_| crate::error::Error::Init("pir adc"))?;
            let mic = AdcChannelDriver::new(adc, mic_pin, &config)
                .map_err(|_| crate::error::Error::Init("mic adc"))?;
            let power = PinDriver::output(power_pin)
                .map_err(|_| crate::error::Error::Init("power gpio"))?;
            let mut device = Self {
                power,
                i2c,
                pir,
                mic,
                powered: false,
                env_present: false,
                air_present: false,
            };
            device.power_on();
            Ok(device)
        }

        // ── SEN0500 ───────────────────────────────────────────

        fn sen0500_read_u16(&mut self, reg: u8) -> Option<u16> {
            let command = [reg << 1];
            let mut buf = [0u8; 2];
            let mut i2c = self.i2c.borrow_mut();
            i2c.write(SEN0500_ADDR, &command, pins::I2C_TIMEOUT_TICKS).ok()?;
            i2c.read(SEN0500_ADDR, &mut buf, pins::I2C_TIMEOUT_TICKS).ok()?;
            Some(u16::from_be_bytes(buf))
        }

        fn sen0500_probe(&mut self) -> bool {
            match self.sen0500_read_u16(SEN0500_REG_DEVICE_ADDR) {
                Some(response) => (response & 0xFF) == u16::from(SEN0500_ADDR),
                None => false,
            }
        }

        // ── ENS160 ────────────────────────────────────────────

        fn ens160_write_u8(&mut self, reg: u8, value: u8) -> bool {
            self.i2c
                .borrow_mut()
                .write(ENS160_ADDR, &[reg, value], pins::I2C_TIMEOUT_TICKS)
                .is_ok()
        }

        fn ens160_read(&mut self, reg: u8, buf: &mut [u8]) -> bool {
            self.i2c
                .borrow_mut()
                .write_read(ENS160_ADDR, &[reg], buf, pins::I2C_TIMEOUT_TICKS)
                .is_ok()
        }

        fn ens160_read_u8(&mut self, reg: u8) -> Option<u8> {
            let mut buf = [0u8; 1];
            if self.ens160_read(reg, &mut buf) { Some(buf[0]) } else { None }
        }

        fn ens160_read_u16(&mut self, reg: u8) -> Option<u16> {
            let mut buf = [0u8; 2];
            if self.ens160_read(reg, &mut buf) { Some(u16::from_le_bytes(buf)) } else { None }
        }

        fn ens160_probe(&mut self) -> bool {
            if self.ens160_read_u16(ENS160_REG_PART_ID) != Some(ENS160_PART_ID) {
                return false;
            }
            let ok = self.ens160_write_u8(ENS160_REG_OPMODE, ENS160_STANDARD_MODE);
            std::thread::sleep(core::time::Duration::from_millis(20));
            // Interrupt pin unused.
            let _ = self.ens160_write_u8(ENS160_REG_CONFIG, 0);
            ok
        }
    }

    impl<P, M> DevicePort for EspDevice<P, M>
    where
        P: ADCPin<Adc = esp_idf_hal::adc::ADC1>,
        M: ADCPin<Adc = esp_idf_hal::adc::ADC1>,
    {
        fn power_on(&mut self) {
            if self.powered {
                return;
            }
            if let Err(e) = self.power.set_high() {
                warn!("device: power enable failed: {e}");
                return;
            }
            std::thread::sleep(core::time::Duration::from_millis(POWER_SETTLE_MS));
            self.env_present = self.sen0500_probe();
            self.air_present = self.ens160_probe();
            self.powered = true;
            info!(
                "device: powered on (environment {}, air {})",
                self.env_present, self.air_present
            );
        }

        fn power_off(&mut self) {
            // Unconditional, so it doubles as a peripheral reset.
            if let Err(e) = self.power.set_low() {
                warn!("device: power disable failed: {e}");
            }
            self.powered = false;
            self.env_present = false;
            self.air_present = false;
        }

        fn is_powered(&self) -> bool {
            self.powered
        }

        fn read_environment(&mut self) -> Option<RawEnvironment> {
            if !self.powered || !self.env_present {
                return None;
            }
            let temp = self.sen0500_read_u16(SEN0500_REG_TEMP)?;
            let humidity = self.sen0500_read_u16(SEN0500_REG_HUMIDITY)?;
            let uv = self.sen0500_read_u16(SEN0500_REG_UV)?;
            let light = self.sen0500_read_u16(SEN0500_REG_LIGHT)?;
            let pressure = self.sen0500_read_u16(SEN0500_REG_PRESSURE)?;
            let elevation = self.sen0500_read_u16(SEN0500_REG_ELEVATION).unwrap_or(0);
            Some(RawEnvironment {
                temperature_c: -45.0 + (f32::from(temp as i16) * 175.0) / 1024.0 / 64.0,
                humidity_pct: f32::from(humidity) * 100.0 / 65536.0,
                uv_volts: 3.0 * f32::from(uv) / 1024.0,
                light_counts: f32::from(light),
                pressure_hpa: pressure,
                altitude_m: f32::from(elevation as i16),
            })
        }

        fn read_air(&mut self) -> Option<RawAir> {
            if !self.powered || !self.air_present {
                return None;
            }
            let status = (self.ens160_read_u8(ENS160_REG_STATUS)? >> 2) & 3;
            Some(RawAir {
                status,
                aqi: self.ens160_read_u8(ENS160_REG_AQI)?,
                tvoc_ppb: self.ens160_read_u16(ENS160_REG_TVOC)?,
                eco2_ppm: self.ens160_read_u16(ENS160_REG_ECO2)?,
            })
        }

        fn calibrate_air(&mut self, temperature_c: f32, humidity: f32) {
            if !self.powered || !self.air_present {
                return;
            }
            // TEMP_IN is Kelvin × 64, RH_IN is %RH × 512, both little-endian.
            let t = ((temperature_c + 273.15) * 64.0) as u16;
            let rh = (humidity * 100.0 * 512.0) as u16;
            let buf = [
                ENS160_REG_TEMP_IN,
                (t & 0xFF) as u8,
                (t >> 8) as u8,
                (rh & 0xFF) as u8,
                (rh >> 8) as u8,
            ];
            if self.i2c.borrow_mut().write(ENS160_ADDR, &buf, pins::I2C_TIMEOUT_TICKS).is_err() {
                warn!("device: air compensation write failed");
            }
        }

        fn read_motion(&mut self) -> bool {
            if !self.powered {
                return false;
            }
            match self.pir.read() {
                Ok(counts) => counts > PIR_ACTIVE_COUNTS,
                Err(_) => false,
            }
        }

        fn read_noise(&mut self) -> u16 {
            if !self.powered {
                return 0;
            }
            self.mic.read().unwrap_or(0)
        }

        fn restart(&mut self) {
            // SAFETY: esp_restart never returns; nothing to clean up.
            unsafe {
                esp_idf_svc::sys::esp_restart();
            }
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::{EspDevice, SharedI2c};

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

/// Scriptable hardware for host tests and simulation runs.
#[derive(Debug)]
pub struct SimDevice {
    powered: bool,
    power_cycles: u32,
    env: Option<RawEnvironment>,
    air: Option<RawAir>,
    motion: bool,
    noise: u16,
    calibrations: Vec<(f32, f32)>,
    restarted: bool,
}

impl Default for SimDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDevice {
    pub fn new() -> Self {
        Self {
            powered: false,
            power_cycles: 0,
            env: Some(RawEnvironment {
                temperature_c: 22.5,
                humidity_pct: 41.0,
                uv_volts: 1.1,
                light_counts: 240.0,
                pressure_hpa: 1013,
                altitude_m: 25.0,
            }),
            air: Some(RawAir { status: 0, aqi: 2, tvoc_ppb: 60, eco2_ppm: 650 }),
            motion: false,
            noise: 1500,
            calibrations: Vec::new(),
            restarted: false,
        }
    }

    pub fn set_environment(&mut self, env: Option<RawEnvironment>) {
        self.env = env;
    }

    pub fn set_air(&mut self, air: Option<RawAir>) {
        self.air = air;
    }

    pub fn set_motion(&mut self, motion: bool) {
        self.motion = motion;
    }

    pub fn set_noise(&mut self, noise: u16) {
        self.noise = noise;
    }

    pub fn calibrations(&self) -> &[(f32, f32)] {
        &self.calibrations
    }

    pub fn power_cycles(&self) -> u32 {
        self.power_cycles
    }

    pub fn was_restarted(&self) -> bool {
        self.restarted
    }
}

impl DevicePort for SimDevice {
    fn power_on(&mut self) {
        if !self.powered {
            self.powered = true;
            self.power_cycles += 1;
        }
    }

    fn power_off(&mut self) {
        self.powered = false;
    }

    fn is_powered(&self) -> bool {
        self.powered
    }

    fn read_environment(&mut self) -> Option<RawEnvironment> {
        if self.powered { self.env } else { None }
    }

    fn read_air(&mut self) -> Option<RawAir> {
        if self.powered { self.air } else { None }
    }

    fn calibrate_air(&mut self, temperature_c: f32, humidity: f32) {
        self.calibrations.push((temperature_c, humidity));
    }

    fn read_motion(&mut self) -> bool {
        self.powered && self.motion
    }

    fn read_noise(&mut self) -> u16 {
        if self.powered { self.noise } else { 0 }
    }

    fn restart(&mut self) {
        self.restarted = true;
    }
}

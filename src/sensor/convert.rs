//! Calibration curves and validity gates for raw sensor values.
//!
//! The combo sensor reports some channels raw (a UV photodiode voltage, an
//! uncorrected illuminance count) and flags failure on others only through
//! sentinel values. Everything numeric about turning chip output into
//! factors lives here.

/// Map the UV photodiode output voltage onto the 0–15 intensity index.
/// 0.99 V is the quiescent output, ~2.9 V full scale.
pub fn uv_index_from_volts(volts: f32) -> f32 {
    map_range(volts, 0.99, 2.9, 0.0, 15.0)
}

/// Correct the raw illuminance counts with the sensor's response-curve
/// polynomial (vendor fit).
pub fn lux_from_counts(counts: f32) -> f32 {
    counts
        * (1.0023
            + counts * (8.1488e-5 + counts * (-9.3924e-9 + counts * 6.013_5e-13)))
}

fn map_range(v: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    (v - in_lo) * (out_hi - out_lo) / (in_hi - in_lo) + out_lo
}

// ---------------------------------------------------------------------------
// Validity gates
// ---------------------------------------------------------------------------

/// The chip reports −45.0 °C when it has no reading.
pub fn gate_temperature(v: f32) -> Option<f32> {
    if v == -45.0 { None } else { Some(v) }
}

/// Humidity 0 means no reading.
pub fn gate_humidity(v: f32) -> Option<f32> {
    if v == 0.0 { None } else { Some(v) }
}

/// Pressure 0 means no reading.
pub fn gate_pressure(v: u16) -> Option<u16> {
    if v > 0 { Some(v) } else { None }
}

/// AQI is defined on 1–5 only.
pub fn gate_aqi(v: u8) -> Option<u8> {
    if (1..=5).contains(&v) { Some(v) } else { None }
}

/// tVOC is defined on 1–65000 ppb.
pub fn gate_tvoc(v: u16) -> Option<u16> {
    if v > 0 && v <= 65000 { Some(v) } else { None }
}

/// eCO₂ readings at or below the 400 ppm floor are not meaningful.
pub fn gate_eco2(v: u16) -> Option<u16> {
    if v > 400 { Some(v) } else { None }
}

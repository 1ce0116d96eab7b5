//! Observation wire format.
//!
//! One JSON object per observation: fixed `sequenceno` and `sent` fields,
//! then one entry per *valid* factor keyed `F#<factor>` in metadata order.
//! Absent keys mean invalid/unsupported. Numbers use the locale-independent
//! serde_json formatting; serializing, parsing, and serializing again
//! reproduces the bytes exactly.

use log::warn;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{FACTORS, Factor, FactorValue, SensorSnapshot};

struct Observation<'a>(&'a SensorSnapshot);

impl Serialize for Observation<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let snap = self.0;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("sequenceno", &snap.sequence)?;
        map.serialize_entry("sent", &snap.timestamp.max(0))?;
        for meta in FACTORS {
            if let Some(value) = snap.factor_value(meta.factor) {
                // Factor keys carry the F# prefix to avoid clashes with the
                // fixed fields.
                let mut key = String::with_capacity(meta.json_key.len() + 2);
                key.push_str("F#");
                key.push_str(meta.json_key);
                match value {
                    FactorValue::Float(v) => map.serialize_entry(&key, &v)?,
                    FactorValue::Int(v) => map.serialize_entry(&key, &v)?,
                    FactorValue::Bool(v) => map.serialize_entry(&key, &u32::from(v))?,
                }
            }
        }
        map.end()
    }
}

/// Serialize one observation for publishing.
pub fn format_observation(snap: &SensorSnapshot) -> String {
    serde_json::to_string(&Observation(snap)).unwrap_or_else(|e| {
        warn!("observation serialization failed: {e}");
        String::from("{}")
    })
}

/// Parse an observation payload back into a snapshot. Unknown keys are
/// ignored; missing factor keys come back `None`.
pub fn parse_observation(payload: &str) -> Option<SensorSnapshot> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    let obj = value.as_object()?;

    let mut snap = SensorSnapshot {
        sequence: obj.get("sequenceno")?.as_u64()? as u32,
        timestamp: obj.get("sent")?.as_i64()?,
        ..SensorSnapshot::default()
    };

    let float = |key: &str| -> Option<f32> {
        obj.get(key).and_then(serde_json::Value::as_f64).map(|v| v as f32)
    };
    let int = |key: &str| -> Option<u64> { obj.get(key).and_then(serde_json::Value::as_u64) };

    for meta in FACTORS {
        let key = format!("F#{}", meta.json_key);
        match meta.factor {
            Factor::Temperature => snap.temperature_c = float(&key),
            Factor::Humidity => snap.humidity_pct = float(&key),
            Factor::Uv => snap.uv_index = float(&key),
            Factor::Light => snap.illuminance_lx = float(&key),
            Factor::Pressure => snap.pressure_hpa = int(&key).map(|v| v as u16),
            Factor::Altitude => snap.altitude_m = float(&key),
            Factor::AirSensor => snap.air_status = int(&key).map(|v| v as u8),
            Factor::AirQuality => snap.aqi = int(&key).map(|v| v as u8),
            Factor::Tvoc => snap.tvoc_ppb = int(&key).map(|v| v as u16),
            Factor::Co2 => snap.eco2_ppm = int(&key).map(|v| v as u16),
            Factor::Motion => snap.motion = int(&key).map(|v| v != 0),
            Factor::Noise => snap.noise_raw = int(&key).map(|v| v as u16),
        }
    }
    Some(snap)
}

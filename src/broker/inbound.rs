//! Inbound message dispatch.
//!
//! Control messages steer the device: `enable` (0/1) and `interval`
//! (capture interval, seconds), plus an optional `version` kept for
//! forward compatibility. Anything malformed is logged and dropped — the
//! dispatcher never takes the device down.

use log::{info, warn};

use crate::events::{EventBus, EventCode};
use crate::ports::InboundMessage;

/// Topic prefix for all three control subscriptions (`control/<id>`,
/// `control-class/<class>`, `control-all`).
const CONTROL_PREFIX: &str = "snappy/control";
const COMMAND_PREFIX: &str = "snappy/command/";

/// Parse one inbound message and post the resulting events.
pub fn dispatch(message: &InboundMessage, bus: &EventBus) {
    let Ok(text) = core::str::from_utf8(&message.payload) else {
        warn!("broker: inbound payload is not UTF-8, discarded");
        return;
    };
    if message.topic.starts_with(CONTROL_PREFIX) {
        dispatch_control(text, bus);
    } else if message.topic.starts_with(COMMAND_PREFIX) {
        // Reserved; nothing is defined at present.
        warn!("broker: invalid command message\n{text}");
    } else {
        warn!("broker: unknown incoming message\n{}\n{text}", message.topic);
    }
}

fn dispatch_control(text: &str, bus: &EventBus) {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(text) else {
        warn!("broker: invalid control message\n{text}");
        return;
    };
    let Some(obj) = json.as_object() else {
        warn!("broker: invalid control message\n{text}");
        return;
    };

    let mut fields = 0;
    if obj.contains_key("version") {
        // A missing version means 1.0.0. Every later field is optional, so
        // there is nothing to gate on yet; the field is accepted so that
        // future senders can rely on it.
        fields += 1;
    }
    if let Some(flag) = obj.get("enable").and_then(value_as_flag) {
        info!("broker: enable {}", u8::from(flag));
        bus.post(if flag { EventCode::EnableDevice } else { EventCode::DisableDevice });
        fields += 1;
    }
    if let Some(interval) = obj.get("interval").and_then(serde_json::Value::as_u64) {
        info!("broker: set capture interval for upload {interval}");
        bus.post_scalar(EventCode::SetCaptureInterval, interval as u32);
        fields += 1;
    }
    // Unknown fields are ignored; a message carrying nothing we recognize
    // is noise worth logging.
    if fields == 0 {
        warn!("broker: invalid control message\n{text}");
    }
}

/// `enable` is specified as 0|1 but tolerant parsing costs nothing.
fn value_as_flag(value: &serde_json::Value) -> Option<bool> {
    if let Some(n) = value.as_u64() {
        return Some(n != 0);
    }
    value.as_bool()
}

//! Broker transport adapter.
//!
//! Implements [`BrokerTransport`] — the MQTT wire under the broker client.
//! The ESP backend wraps the ESP-IDF MQTT client; connection state and
//! inbound messages cross from its callback thread through atomics and a
//! mutex-guarded queue, both drained from the main task.

use crate::error::BrokerError;
use crate::ports::{BrokerTransport, InboundMessage, TransportConfig};

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use std::collections::VecDeque;
    use std::ffi::CString;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use esp_idf_svc::mqtt::client::{
        EspMqttClient, EventPayload, MqttClientConfiguration, MqttProtocolVersion, QoS,
    };
    use log::{info, warn};

    use super::{BrokerError, BrokerTransport, InboundMessage, TransportConfig};
    use crate::ports::TransportAuth;

    #[derive(Default)]
    struct Shared {
        connected: AtomicBool,
        inbound: Mutex<VecDeque<InboundMessage>>,
    }

    /// BrokerTransport over the ESP-IDF MQTT client.
    pub struct EspMqttTransport {
        config: Option<TransportConfig>,
        client: Option<EspMqttClient<'static>>,
        shared: Arc<Shared>,
    }

    impl Default for EspMqttTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl EspMqttTransport {
        pub fn new() -> Self {
            Self { config: None, client: None, shared: Arc::new(Shared::default()) }
        }

        fn broker_url(config: &TransportConfig) -> String {
            let scheme = if config.tls_root_cert.is_some() { "mqtts" } else { "mqtt" };
            format!("{scheme}://{}:{}", config.host, config.port)
        }
    }

    impl BrokerTransport for EspMqttTransport {
        fn configure(&mut self, config: &TransportConfig) -> Result<(), BrokerError> {
            if config.host.is_empty() {
                return Err(BrokerError::BadAuthConfig);
            }
            self.config = Some(config.clone());
            Ok(())
        }

        fn connect(&mut self) -> Result<(), BrokerError> {
            let config = self.config.as_ref().ok_or(BrokerError::BadAuthConfig)?;
            let url = Self::broker_url(config);

            // The TLS layer wants NUL-terminated PEM buffers; keep the
            // CStrings alive past client creation.
            let pem = |s: &str| CString::new(s).map_err(|_| BrokerError::BadAuthConfig);
            let ca_pem = match config.tls_root_cert.as_deref() {
                Some(ca) => Some(pem(ca)?),
                None => None,
            };
            let (client_pem, key_pem) = match &config.auth {
                TransportAuth::Certificate { cert_pem, key_pem } => {
                    (Some(pem(cert_pem)?), Some(pem(key_pem)?))
                }
                TransportAuth::UserPass { .. } => (None, None),
            };

            let mut mqtt_config = MqttClientConfiguration {
                client_id: Some(&config.client_id),
                protocol_version: Some(MqttProtocolVersion::V3_1_1),
                disable_clean_session: config.keep_session,
                buffer_size: 1024,
                out_buffer_size: 1024,
                ..MqttClientConfiguration::default()
            };
            if let Some(ca) = ca_pem.as_deref() {
                mqtt_config.server_certificate = Some(esp_idf_svc::tls::X509::pem(ca));
            }
            if let (Some(cert), Some(key)) = (client_pem.as_deref(), key_pem.as_deref()) {
                mqtt_config.client_certificate = Some(esp_idf_svc::tls::X509::pem(cert));
                mqtt_config.private_key = Some(esp_idf_svc::tls::X509::pem(key));
            }
            if let TransportAuth::UserPass { username, password } = &config.auth {
                mqtt_config.username = Some(username);
                mqtt_config.password = Some(password);
            }

            let shared = Arc::clone(&self.shared);
            let client = EspMqttClient::new_cb(&url, &mqtt_config, move |event| {
                match event.payload() {
                    EventPayload::Connected(_) => {
                        info!("mqtt: connected");
                        shared.connected.store(true, Ordering::Release);
                    }
                    EventPayload::Disconnected => {
                        shared.connected.store(false, Ordering::Release);
                    }
                    EventPayload::Received { topic, data, .. } => {
                        if let Some(topic) = topic {
                            let mut q = shared
                                .inbound
                                .lock()
                                .unwrap_or_else(std::sync::PoisonError::into_inner);
                            q.push_back(InboundMessage {
                                topic: topic.to_owned(),
                                payload: data.to_vec(),
                            });
                        }
                    }
                    EventPayload::Error(e) => warn!("mqtt: {e}"),
                    _ => {}
                }
            })
            .map_err(|e| {
                warn!("mqtt: client create failed: {e}");
                BrokerError::ConnectFailed
            })?;

            self.client = Some(client);
            // The connection completes asynchronously; the broker client's
            // retry ticks poll `is_connected`.
            if self.shared.connected.load(Ordering::Acquire) {
                Ok(())
            } else {
                // Give the stack one tick; callers retry on failure.
                std::thread::sleep(core::time::Duration::from_millis(250));
                if self.shared.connected.load(Ordering::Acquire) {
                    Ok(())
                } else {
                    Err(BrokerError::ConnectFailed)
                }
            }
        }

        fn is_connected(&self) -> bool {
            self.shared.connected.load(Ordering::Acquire)
        }

        fn subscribe(&mut self, topic: &str, qos: u8) -> Result<(), BrokerError> {
            let qos = match qos {
                0 => QoS::AtMostOnce,
                1 => QoS::AtLeastOnce,
                _ => QoS::ExactlyOnce,
            };
            self.client
                .as_mut()
                .ok_or(BrokerError::Disconnected)?
                .subscribe(topic, qos)
                .map(|_| ())
                .map_err(|_| BrokerError::SubscribeFailed)
        }

        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerError> {
            self.client
                .as_mut()
                .ok_or(BrokerError::Disconnected)?
                .publish(topic, QoS::AtLeastOnce, false, payload)
                .map(|_| ())
                .map_err(|_| BrokerError::PublishFailed)
        }

        fn poll(&mut self) -> Option<InboundMessage> {
            self.shared
                .inbound
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .pop_front()
        }

        fn disconnect(&mut self) {
            self.client = None; // Drop closes the connection.
            self.shared.connected.store(false, Ordering::Release);
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspMqttTransport;

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

use std::collections::VecDeque;

/// Scriptable loopback transport for host tests.
#[derive(Debug, Default)]
pub struct SimTransport {
    configured: Option<TransportConfig>,
    connected: bool,
    refuse_connect: bool,
    subscriptions: Vec<String>,
    published: Vec<(String, String)>,
    inbound: VecDeque<InboundMessage>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse_connect(&mut self, refuse: bool) {
        self.refuse_connect = refuse;
    }

    /// Simulate the link dropping out from under the client.
    pub fn drop_link(&mut self) {
        self.connected = false;
    }

    /// Stage an inbound publish for the next `poll`.
    pub fn push_inbound(&mut self, message: InboundMessage) {
        self.inbound.push_back(message);
    }

    pub fn configured(&self) -> Option<&TransportConfig> {
        self.configured.as_ref()
    }

    pub fn subscriptions(&self) -> &[String] {
        &self.subscriptions
    }

    /// `(topic, body)` pairs in publish order.
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.clone()
    }

    pub fn reset_log(&mut self) {
        self.subscriptions.clear();
        self.published.clear();
    }
}

impl BrokerTransport for SimTransport {
    fn configure(&mut self, config: &TransportConfig) -> Result<(), BrokerError> {
        self.configured = Some(config.clone());
        Ok(())
    }

    fn connect(&mut self) -> Result<(), BrokerError> {
        if self.refuse_connect {
            return Err(BrokerError::ConnectFailed);
        }
        if self.configured.is_none() {
            return Err(BrokerError::BadAuthConfig);
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn subscribe(&mut self, topic: &str, _qos: u8) -> Result<(), BrokerError> {
        if !self.connected {
            return Err(BrokerError::Disconnected);
        }
        self.subscriptions.push(topic.to_owned());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerError> {
        if !self.connected {
            return Err(BrokerError::Disconnected);
        }
        self.published
            .push((topic.to_owned(), String::from_utf8_lossy(payload).into_owned()));
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        if !self.connected {
            return None;
        }
        self.inbound.pop_front()
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

//! Wi-Fi radio adapter.
//!
//! Implements [`WifiPort`] — the raw join/leave/soft-AP operations under
//! the connection manager. Retry policy and access-point rotation live in
//! [`crate::wifi::WifiManager`], not here.

use crate::error::NetError;
use crate::ports::WifiPort;

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::wifi::{
        AccessPointConfiguration, AuthMethod, ClientConfiguration, Configuration, EspWifi,
    };
    use log::{info, warn};

    use super::{NetError, WifiPort};

    /// WifiPort over the ESP-IDF Wi-Fi driver.
    pub struct EspWifiRadio {
        wifi: EspWifi<'static>,
    }

    impl EspWifiRadio {
        pub fn new(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
        ) -> Result<Self, NetError> {
            let wifi = EspWifi::new(modem, sysloop, nvs).map_err(|e| {
                warn!("wifi: driver init failed: {e}");
                NetError::JoinFailed
            })?;
            Ok(Self { wifi })
        }
    }

    impl WifiPort for EspWifiRadio {
        fn join(&mut self, ssid: &str, password: Option<&str>) -> Result<(), NetError> {
            let config = Configuration::Client(ClientConfiguration {
                ssid: ssid.try_into().map_err(|()| NetError::JoinFailed)?,
                password: password.unwrap_or("").try_into().map_err(|()| NetError::JoinFailed)?,
                auth_method: if password.is_some() {
                    AuthMethod::WPA2Personal
                } else {
                    AuthMethod::None
                },
                ..ClientConfiguration::default()
            });
            self.wifi.set_configuration(&config).map_err(|_| NetError::JoinFailed)?;
            self.wifi.start().map_err(|_| NetError::JoinFailed)?;
            // Non-blocking: the manager polls `is_up` on its retry ticks.
            self.wifi.connect().map_err(|_| NetError::JoinFailed)?;
            Ok(())
        }

        fn is_up(&self) -> bool {
            self.wifi.is_up().unwrap_or(false)
        }

        fn leave(&mut self) {
            if let Err(e) = self.wifi.disconnect() {
                info!("wifi: disconnect: {e}");
            }
            if let Err(e) = self.wifi.stop() {
                info!("wifi: stop: {e}");
            }
        }

        fn local_ip(&self) -> Option<String> {
            self.wifi.sta_netif().get_ip_info().ok().map(|info| info.ip.to_string())
        }

        fn start_access_point(
            &mut self,
            ssid: &str,
            password: Option<&str>,
        ) -> Result<String, NetError> {
            let config = Configuration::AccessPoint(AccessPointConfiguration {
                ssid: ssid.try_into().map_err(|()| NetError::SoftApFailed)?,
                password: password.unwrap_or("").try_into().map_err(|()| NetError::SoftApFailed)?,
                auth_method: if password.is_some() {
                    AuthMethod::WPA2Personal
                } else {
                    AuthMethod::None
                },
                ..AccessPointConfiguration::default()
            });
            self.wifi.set_configuration(&config).map_err(|_| NetError::SoftApFailed)?;
            self.wifi.start().map_err(|_| NetError::SoftApFailed)?;
            let ip = self
                .wifi
                .ap_netif()
                .get_ip_info()
                .map_err(|_| NetError::SoftApFailed)?
                .ip
                .to_string();
            Ok(ip)
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspWifiRadio;

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

/// Scriptable radio for host tests: the test decides when the link is up.
#[derive(Debug, Default)]
pub struct SimWifi {
    up: bool,
    joins: Vec<String>,
    last_password: Option<String>,
    ap: Option<String>,
    refuse_ap: bool,
}

impl SimWifi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the link coming up (or dropping).
    pub fn set_up(&mut self, up: bool) {
        self.up = up;
    }

    /// SSIDs handed to `join`, in order.
    pub fn join_attempts(&self) -> &[String] {
        &self.joins
    }

    pub fn last_password(&self) -> Option<String> {
        self.last_password.clone()
    }

    pub fn active_ap(&self) -> Option<&str> {
        self.ap.as_deref()
    }

    pub fn refuse_access_point(&mut self, refuse: bool) {
        self.refuse_ap = refuse;
    }
}

impl WifiPort for SimWifi {
    fn join(&mut self, ssid: &str, password: Option<&str>) -> Result<(), NetError> {
        self.joins.push(ssid.to_owned());
        self.last_password = password.map(str::to_owned);
        Ok(())
    }

    fn is_up(&self) -> bool {
        self.up
    }

    fn leave(&mut self) {
        self.up = false;
    }

    fn local_ip(&self) -> Option<String> {
        if self.up { Some("192.168.1.40".into()) } else { None }
    }

    fn start_access_point(
        &mut self,
        ssid: &str,
        _password: Option<&str>,
    ) -> Result<String, NetError> {
        if self.refuse_ap {
            return Err(NetError::SoftApFailed);
        }
        self.ap = Some(ssid.to_owned());
        self.up = true;
        Ok("192.168.4.1".into())
    }
}

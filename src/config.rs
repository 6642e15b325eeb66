//! Static configuration of a session.
//!
//! Timeouts mirror the carrier configuration surface; the per-subscription
//! carrier bundle is serializable so hosts can carry it in their own
//! subscription records.

use embassy_time::Duration;
use heapless::String;
use serde::{Deserialize, Serialize};

use crate::gateway::MAX_PACKAGE_LEN;

/// Listening window after an outgoing transfer.
pub const DEFAULT_LISTEN_FROM_SENDING: Duration = Duration::from_millis(180_000);
/// Listening window after an incoming transfer.
pub const DEFAULT_LISTEN_FROM_RECEIVING: Duration = Duration::from_millis(30_000);
/// NB-IoT inactivity window in `NotConnected`/`Connected`.
pub const DEFAULT_NB_IOT_INACTIVITY: Duration = Duration::from_millis(180_000);
/// Shortened timeout applied to listening and NB-IoT inactivity in demo mode.
pub const DEMO_TIMEOUT: Duration = Duration::from_millis(3_000);

const DEFAULT_SCREEN_OFF_INACTIVITY_SEC: u32 = 30;
const DEFAULT_P2P_SMS_INACTIVITY_SEC: u32 = 180;
const DEFAULT_ESOS_INACTIVITY_SEC: u32 = 600;

/// Per-subscription carrier timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CarrierBundle {
    pub screen_off_inactivity_timeout_sec: u32,
    pub p2p_sms_inactivity_timeout_sec: u32,
    pub esos_inactivity_timeout_sec: u32,
}

impl Default for CarrierBundle {
    fn default() -> Self {
        Self {
            screen_off_inactivity_timeout_sec: DEFAULT_SCREEN_OFF_INACTIVITY_SEC,
            p2p_sms_inactivity_timeout_sec: DEFAULT_P2P_SMS_INACTIVITY_SEC,
            esos_inactivity_timeout_sec: DEFAULT_ESOS_INACTIVITY_SEC,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub(crate) satellite_supported: bool,
    pub(crate) mock_modem_allowed: bool,
    pub(crate) screen_off_auto_disable: bool,
    pub(crate) gateway_package: String<MAX_PACKAGE_LEN>,
    pub(crate) listen_from_sending: Duration,
    pub(crate) listen_from_receiving: Duration,
    pub(crate) nb_iot_inactivity: Duration,
    pub(crate) demo_nb_iot_inactivity: Duration,
    pub(crate) carrier: CarrierBundle,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            satellite_supported: true,
            mock_modem_allowed: false,
            screen_off_auto_disable: true,
            gateway_package: String::new(),
            listen_from_sending: DEFAULT_LISTEN_FROM_SENDING,
            listen_from_receiving: DEFAULT_LISTEN_FROM_RECEIVING,
            nb_iot_inactivity: DEFAULT_NB_IOT_INACTIVITY,
            demo_nb_iot_inactivity: DEMO_TIMEOUT,
            carrier: CarrierBundle::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_satellite_supported(self, satellite_supported: bool) -> Self {
        Config {
            satellite_supported,
            ..self
        }
    }

    /// Allow the test-only surface (mock modem deployments only).
    pub fn with_mock_modem_allowed(self) -> Self {
        Config {
            mock_modem_allowed: true,
            ..self
        }
    }

    pub fn with_screen_off_auto_disable(self, screen_off_auto_disable: bool) -> Self {
        Config {
            screen_off_auto_disable,
            ..self
        }
    }

    /// Target gateway service. Names longer than the configured bound are
    /// truncated to empty, which disables binding.
    pub fn with_gateway_package(self, package: &str) -> Self {
        let gateway_package = String::try_from(package).unwrap_or_default();
        Config {
            gateway_package,
            ..self
        }
    }

    pub fn with_listen_from_sending(self, listen_from_sending: Duration) -> Self {
        Config {
            listen_from_sending,
            ..self
        }
    }

    pub fn with_listen_from_receiving(self, listen_from_receiving: Duration) -> Self {
        Config {
            listen_from_receiving,
            ..self
        }
    }

    pub fn with_nb_iot_inactivity(self, nb_iot_inactivity: Duration) -> Self {
        Config {
            nb_iot_inactivity,
            ..self
        }
    }

    pub fn with_demo_nb_iot_inactivity(self, demo_nb_iot_inactivity: Duration) -> Self {
        Config {
            demo_nb_iot_inactivity,
            ..self
        }
    }

    pub fn with_carrier_bundle(self, carrier: CarrierBundle) -> Self {
        Config { carrier, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_carrier_configuration() {
        let config = Config::default();
        assert_eq!(config.listen_from_sending, Duration::from_millis(180_000));
        assert_eq!(config.listen_from_receiving, Duration::from_millis(30_000));
        assert_eq!(config.carrier.screen_off_inactivity_timeout_sec, 30);
        assert_eq!(config.carrier.p2p_sms_inactivity_timeout_sec, 180);
        assert_eq!(config.carrier.esos_inactivity_timeout_sec, 600);
        assert!(config.satellite_supported);
        assert!(!config.mock_modem_allowed);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::new()
            .with_gateway_package("com.example.gateway")
            .with_listen_from_sending(Duration::from_secs(60))
            .with_satellite_supported(false);
        assert_eq!(config.gateway_package.as_str(), "com.example.gateway");
        assert_eq!(config.listen_from_sending, Duration::from_secs(60));
        assert!(!config.satellite_supported);
    }
}

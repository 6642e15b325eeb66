//! Contracts of the external collaborators.
//!
//! The session core never talks to hardware or other processes directly;
//! everything it needs from the outside world comes in through these traits.

use embassy_time::Duration;

use crate::types::{ModemState, OperationResult};

/// Failure of a request issued to the satellite modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemError {
    RadioUnavailable,
    InvalidArguments,
    RequestFailed,
}

/// Failure to bind the gateway service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatewayError {
    ServiceNotFound,
    Refused,
}

/// A listener callback could not be delivered. The registry evicts the
/// listener and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeliveryError;

/// Command surface of the satellite radio.
///
/// Requests are asynchronous on the radio side: the session issues a request
/// and returns; where a completion matters (cellular scan disable) the host
/// posts it back through
/// [`SatelliteSession::on_cellular_scan_disabled`](crate::session::SatelliteSession::on_cellular_scan_disabled).
pub trait SatelliteModem {
    /// Toggle satellite listening mode. `timeout` is the window the radio
    /// should keep listening for incoming pages.
    fn request_listening_enabled(
        &mut self,
        enabled: bool,
        timeout: Duration,
    ) -> Result<(), ModemError>;

    /// Toggle cellular scanning while satellite mode is on. Completion is
    /// reported back as an event when `enabled == false`.
    fn enable_cellular_scanning(&mut self, enabled: bool) -> Result<(), ModemError>;

    /// Ask the platform to enable or disable the satellite entirely. Used by
    /// the screen-off inactivity handling.
    fn request_satellite_enabled(&mut self, enable: bool, emergency: bool)
        -> Result<(), ModemError>;

    /// Abort outstanding requests and release radio resources. Published on
    /// every entry to the `Off` state.
    fn abort_pending_requests(&mut self, result: OperationResult);
}

/// View of the datagram subsystem.
pub trait DatagramService {
    /// Forwarded before listeners are notified, on every state entry.
    fn on_modem_state_changed(&mut self, state: ModemState);

    /// No outgoing datagram is pending or in flight.
    fn is_send_idle(&self) -> bool;

    /// No poll for incoming datagrams is pending or in flight.
    fn is_poll_idle(&self) -> bool;
}

/// Properties of the active satellite subscription. Queried at each relevant
/// transition, never cached by the session.
pub trait Subscription {
    /// The satellite bearer requires an explicit NB-IoT attach instead of
    /// direct idle-to-transfer switching.
    fn is_attach_required(&self) -> bool;

    /// The subscription is NTN-only; gates the NB-IoT inactivity timer.
    fn is_ntn_only(&self) -> bool;

    /// The NB-IoT carrier-roaming feature is enabled for this carrier.
    fn carrier_roaming_nb_iot_enabled(&self) -> bool;

    /// Emergency-satellite-over-SMS roaming is supported.
    fn esos_supported(&self) -> bool;

    /// Point-to-point SMS roaming is supported.
    fn p2p_sms_supported(&self) -> bool;
}

/// Observer of session state. Callbacks must not block; a failed delivery
/// evicts the listener from the registry.
pub trait SessionListener {
    fn on_state_changed(&self, state: ModemState) -> Result<(), DeliveryError>;
    fn on_emergency_changed(&self, emergency: bool) -> Result<(), DeliveryError>;
}

/// Connection to the gateway service process.
pub trait GatewayTransport {
    fn bind(&mut self, package: &str) -> Result<(), GatewayError>;
    fn unbind(&mut self);
}

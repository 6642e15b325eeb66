//! Shared vocabulary of the session: modem states, datagram transfer
//! phases and the timer kinds driving automatic transitions.

/// Operational state of the satellite modem, as published to the datagram
/// subsystem and to registered listeners.
///
/// Exactly one state is current at any time. `Unavailable` is terminal for
/// the lifetime of a session on devices without satellite support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemState {
    Unknown,
    Off,
    Enabling,
    Disabling,
    Idle,
    Transferring,
    Listening,
    NotConnected,
    Connected,
    Unavailable,
}

/// Progress of an outgoing datagram, as reported by the datagram subsystem.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendState {
    #[default]
    Idle,
    WaitingToConnect,
    Sending,
    SendSuccess,
    SendFailed,
}

/// Progress of an incoming datagram, as reported by the datagram subsystem.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveState {
    #[default]
    None,
    Idle,
    WaitingToConnect,
    Receiving,
    ReceiveSuccess,
    ReceiveFailed,
}

/// Combined send/receive transfer state carried by datagram events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DatagramTransferState {
    pub send: SendState,
    pub receive: ReceiveState,
}

impl DatagramTransferState {
    pub const fn new(send: SendState, receive: ReceiveState) -> Self {
        Self { send, receive }
    }

    /// An outgoing transfer is in flight or just completed successfully.
    pub fn is_sending(&self) -> bool {
        matches!(self.send, SendState::Sending | SendState::SendSuccess)
    }

    /// An incoming transfer is in flight or just completed successfully.
    ///
    /// `ReceiveState::None` counts as receiving. Counter-intuitive, but
    /// relied upon by the inactivity handling in `NotConnected`.
    pub fn is_receiving(&self) -> bool {
        matches!(
            self.receive,
            ReceiveState::Receiving | ReceiveState::ReceiveSuccess | ReceiveState::None
        )
    }

    /// Both directions report `Idle`.
    pub fn is_idle(&self) -> bool {
        self.send == SendState::Idle && self.receive == ReceiveState::Idle
    }

    /// Either direction is waiting for the bearer to come up.
    pub fn is_waiting_to_connect(&self) -> bool {
        self.send == SendState::WaitingToConnect || self.receive == ReceiveState::WaitingToConnect
    }

    /// Either direction ended in failure.
    pub fn has_failure(&self) -> bool {
        self.send == SendState::SendFailed || self.receive == ReceiveState::ReceiveFailed
    }
}

/// The named deadlines of the session. At most one timer of each kind is
/// pending at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerKind {
    /// Leaves `Listening` for `Idle` when no transfer resumes.
    Listening,
    /// Leaves `NotConnected`/`Connected` for `Idle` on NB-IoT inactivity.
    NbIotInactivity,
    /// Requests a non-emergency satellite disable after the screen stays off.
    ScreenOffInactivity,
    /// Leaves `NotConnected` for `Idle` while carrier-roaming and unaligned.
    CarrierRoamingInactivity,
    /// Retries binding the gateway service with exponential backoff.
    GatewayRebind,
}

impl TimerKind {
    pub const ALL: [TimerKind; 5] = [
        TimerKind::Listening,
        TimerKind::NbIotInactivity,
        TimerKind::ScreenOffInactivity,
        TimerKind::CarrierRoamingInactivity,
        TimerKind::GatewayRebind,
    ];
}

/// Result code attached to modem request completions and to the cleanup
/// notification published on entry to `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationResult {
    Success,
    RequestAborted,
    ModemError,
    InvalidState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sending_predicate_covers_success() {
        let t = DatagramTransferState::new(SendState::SendSuccess, ReceiveState::Idle);
        assert!(t.is_sending());
        let t = DatagramTransferState::new(SendState::SendFailed, ReceiveState::Idle);
        assert!(!t.is_sending());
        assert!(t.has_failure());
    }

    #[test]
    fn receive_none_counts_as_receiving() {
        let t = DatagramTransferState::new(SendState::Idle, ReceiveState::None);
        assert!(t.is_receiving());
        assert!(!t.is_idle());
    }

    #[test]
    fn idle_requires_both_directions() {
        assert!(DatagramTransferState::new(SendState::Idle, ReceiveState::Idle).is_idle());
        assert!(!DatagramTransferState::new(SendState::Idle, ReceiveState::None).is_idle());
        assert!(!DatagramTransferState::new(SendState::Sending, ReceiveState::Idle).is_idle());
    }

    #[test]
    fn waiting_to_connect_on_either_direction() {
        assert!(
            DatagramTransferState::new(SendState::WaitingToConnect, ReceiveState::Idle)
                .is_waiting_to_connect()
        );
        assert!(
            DatagramTransferState::new(SendState::Idle, ReceiveState::WaitingToConnect)
                .is_waiting_to_connect()
        );
    }
}

#![cfg_attr(not(test), no_std)]

//! # Satellite session
//!
//! Session state machine for NB-IoT NTN satellite modems. The crate owns
//! the lifecycle of the modem between "off" and "connected": when it may be
//! enabled, which operational sub-state it occupies (idle, listening,
//! transferring a datagram, attached to the non-terrestrial network), when
//! it must be torn down, and how inactivity and carrier-roaming timers
//! drive automatic transitions. A bound connection to a host gateway
//! service is kept alive with exponential-backoff reconnection while the
//! satellite is operational.
//!
//! The radio itself, the datagram subsystem and the subscription registry
//! are external collaborators reached through the traits in [`traits`];
//! hosts feed their callbacks into [`session::SatelliteSession`] and drive
//! timers by calling [`SatelliteSession::poll`] from their tick source.
//!
//! All inputs are serialized through one cooperative dispatcher, so the
//! session can be driven from a single task or thread without locking.
//!
//! ```ignore
//! let config = Config::new().with_gateway_package("com.example.gateway");
//! let mut session = SatelliteSession::new(modem, datagrams, subscription, transport, config);
//!
//! session.on_satellite_enablement_started(true);
//! session.on_satellite_enabled_state_changed(true);
//! // ... feed modem / datagram / screen events, call session.poll() on a tick.
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod error;
pub mod session;
pub mod traits;
pub mod types;

mod event;
mod gateway;
mod listener;
mod timer;

#[cfg(test)]
mod test_helpers;

pub use config::{CarrierBundle, Config};
pub use error::Error;
pub use gateway::BindState;
pub use session::SatelliteSession;
pub use traits::{
    DatagramService, GatewayTransport, SatelliteModem, SessionListener, Subscription,
};
pub use types::{
    DatagramTransferState, ModemState, OperationResult, ReceiveState, SendState, TimerKind,
};

//! The satellite session state machine.
//!
//! A nine-state automaton reconciling three asynchronous input streams
//! (datagram transfer progress, modem state reports, enablement requests)
//! with five inactivity/retry timers. All inputs are serialized through one
//! cooperative dispatcher: a callback enqueues its event and the queue is
//! drained to quiescence before the callback returns, so state queries
//! always reflect the last committed transition.

use embassy_time::{Duration, Instant};

use crate::config::{Config, DEMO_TIMEOUT};
use crate::error::Error;
use crate::event::{Event, EventKind, EventQueue};
use crate::gateway::{BindOutcome, BindState, GatewayBinder};
use crate::listener::ListenerRegistry;
use crate::timer::TimerSet;
use crate::traits::{
    DatagramService, GatewayTransport, SatelliteModem, SessionListener, Subscription,
};
use crate::types::{
    DatagramTransferState, ModemState, OperationResult, ReceiveState, SendState, TimerKind,
};

/// Current position in the state chart. The `Listening` variant owns the
/// timeout chosen when the state was entered.
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Unavailable,
    Off,
    Enabling,
    Idle,
    Transferring,
    Listening { timeout: Duration },
    NotConnected,
    Connected,
    Disabling,
}

impl State {
    fn modem_state(self) -> ModemState {
        match self {
            State::Unavailable => ModemState::Unavailable,
            State::Off => ModemState::Off,
            State::Enabling => ModemState::Enabling,
            State::Idle => ModemState::Idle,
            State::Transferring => ModemState::Transferring,
            State::Listening { .. } => ModemState::Listening,
            State::NotConnected => ModemState::NotConnected,
            State::Connected => ModemState::Connected,
            State::Disabling => ModemState::Disabling,
        }
    }
}

/// Snapshot of the configured durations, restored by the test surface.
struct ConfiguredTimeouts {
    listen_from_sending: Duration,
    listen_from_receiving: Duration,
    nb_iot_inactivity: Duration,
}

pub struct SatelliteSession<'a, M, D, S, T>
where
    M: SatelliteModem,
    D: DatagramService,
    S: Subscription,
    T: GatewayTransport,
{
    modem: M,
    datagrams: D,
    subscription: S,

    config: Config,
    defaults: ConfiguredTimeouts,

    state: State,
    previous: ModemState,

    is_demo_mode: bool,
    is_emergency: bool,
    is_screen_on: bool,
    is_device_aligned: bool,
    sending_triggered_during_transferring: bool,
    disable_cellular_in_progress: bool,
    screen_monitoring: bool,

    queue: EventQueue,
    timers: TimerSet,
    listeners: ListenerRegistry<'a>,
    gateway: GatewayBinder<T>,
    dispatching: bool,
}

impl<'a, M, D, S, T> SatelliteSession<'a, M, D, S, T>
where
    M: SatelliteModem,
    D: DatagramService,
    S: Subscription,
    T: GatewayTransport,
{
    /// Create a session and enter its initial state: `Off` when satellite is
    /// supported on this device, the terminal `Unavailable` otherwise.
    pub fn new(modem: M, datagrams: D, subscription: S, transport: T, config: Config) -> Self {
        let defaults = ConfiguredTimeouts {
            listen_from_sending: config.listen_from_sending,
            listen_from_receiving: config.listen_from_receiving,
            nb_iot_inactivity: config.nb_iot_inactivity,
        };
        let gateway = GatewayBinder::new(transport, config.gateway_package.clone());
        let state = if config.satellite_supported {
            State::Off
        } else {
            State::Unavailable
        };

        let mut session = Self {
            modem,
            datagrams,
            subscription,
            config,
            defaults,
            state,
            previous: ModemState::Unknown,
            is_demo_mode: false,
            is_emergency: false,
            is_screen_on: true,
            is_device_aligned: false,
            sending_triggered_during_transferring: false,
            disable_cellular_in_progress: false,
            screen_monitoring: false,
            queue: EventQueue::new(),
            timers: TimerSet::new(),
            listeners: ListenerRegistry::new(),
            gateway,
            dispatching: false,
        };
        session.enter_state(state, Instant::now());
        session
    }

    // --- Inbound surface -------------------------------------------------

    /// Datagram transfer progress changed. `send == Sending` additionally
    /// latches the send-triggered flag consumed by the next `Listening`
    /// entry to pick its timeout.
    pub fn on_datagram_transfer_state_changed(&mut self, send: SendState, receive: ReceiveState) {
        if send == SendState::Sending {
            self.sending_triggered_during_transferring = true;
        }
        self.post(Event::DatagramTransferState(DatagramTransferState::new(
            send, receive,
        )));
    }

    /// The platform started enabling (`true`) or disabling (`false`) the
    /// satellite.
    pub fn on_satellite_enablement_started(&mut self, enable: bool) {
        self.post(Event::EnablementStarted { enable });
    }

    /// The platform finished flipping satellite enablement.
    pub fn on_satellite_enabled_state_changed(&mut self, enabled: bool) {
        self.post(Event::EnabledStateChanged { enabled });
    }

    /// An enablement (or disablement) request failed.
    pub fn on_satellite_enablement_failed(&mut self, was_enabling: bool) {
        self.post(Event::EnablementFailed { was_enabling });
    }

    /// The radio reported its own state.
    pub fn on_satellite_modem_state_changed(&mut self, state: ModemState) {
        self.post(Event::ModemStateChanged(state));
    }

    /// Completion of an earlier cellular-scan-disable request.
    pub fn on_cellular_scan_disabled(&mut self, result: OperationResult) {
        self.post(Event::CellularScanDisabled(result));
    }

    pub fn on_screen_state_changed(&mut self, on: bool) {
        self.post(Event::ScreenStateChanged { on });
    }

    /// Fanned out to listeners; never consumed by the state machine.
    pub fn on_emergency_mode_changed(&mut self, emergency: bool) {
        self.post(Event::EmergencyModeChanged { emergency });
    }

    pub fn set_device_aligned_with_satellite(&mut self, aligned: bool) {
        self.post(Event::DeviceAlignedChanged { aligned });
    }

    /// Demo mode swaps the listening and NB-IoT inactivity durations for
    /// their demo values the next time they are computed.
    pub fn set_demo_mode(&mut self, demo: bool) {
        self.is_demo_mode = demo;
    }

    /// Fire any due timers and dispatch their expiry events.
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    // --- Gateway liveness ------------------------------------------------

    pub fn on_gateway_connected(&mut self) {
        self.gateway.on_connected();
        self.stop_timer(TimerKind::GatewayRebind);
    }

    pub fn on_gateway_disconnected(&mut self) {
        self.gateway.on_disconnected();
    }

    pub fn on_gateway_binding_died(&mut self) {
        self.gateway_binding_died_at(Instant::now());
    }

    // --- Observers -------------------------------------------------------

    /// Register an observer under a stable identity. The current state (and
    /// in carrier-roaming mode the current emergency flag) is delivered
    /// synchronously before the listener is added.
    pub fn register_listener(
        &mut self,
        id: u32,
        listener: &'a dyn SessionListener,
    ) -> Result<(), Error> {
        let emergency = if self.subscription.carrier_roaming_nb_iot_enabled() {
            Some(self.is_emergency)
        } else {
            None
        };
        self.listeners
            .register(id, listener, self.state.modem_state(), emergency)
    }

    pub fn unregister_listener(&mut self, id: u32) {
        self.listeners.unregister(id);
    }

    // --- Accessors -------------------------------------------------------

    pub fn current_state(&self) -> ModemState {
        self.state.modem_state()
    }

    pub fn previous_state(&self) -> ModemState {
        self.previous
    }

    pub fn is_demo_mode(&self) -> bool {
        self.is_demo_mode
    }

    pub fn is_emergency_mode(&self) -> bool {
        self.is_emergency
    }

    pub fn is_screen_on(&self) -> bool {
        self.is_screen_on
    }

    pub fn gateway_state(&self) -> BindState {
        self.gateway.state()
    }

    // --- Test-only surface (mock modem deployments) ----------------------

    /// Override the listening and NB-IoT inactivity durations. `0` restores
    /// the configured values.
    pub fn set_satellite_listening_timeout_duration(
        &mut self,
        timeout_millis: u64,
    ) -> Result<(), Error> {
        if !self.config.mock_modem_allowed {
            return Err(Error::TestSurfaceNotAllowed);
        }
        if timeout_millis == 0 {
            self.config.listen_from_sending = self.defaults.listen_from_sending;
            self.config.listen_from_receiving = self.defaults.listen_from_receiving;
            self.config.nb_iot_inactivity = self.defaults.nb_iot_inactivity;
        } else {
            let timeout = Duration::from_millis(timeout_millis);
            self.config.listen_from_sending = timeout;
            self.config.listen_from_receiving = timeout;
            self.config.nb_iot_inactivity = timeout;
        }
        Ok(())
    }

    /// Redirect the gateway binding. `None` or the literal `"null"` clears
    /// the target; any other name unbinds and rebinds unconditionally.
    pub fn set_satellite_gateway_service_package_name(
        &mut self,
        package: Option<&str>,
    ) -> Result<(), Error> {
        if !self.config.mock_modem_allowed {
            return Err(Error::TestSurfaceNotAllowed);
        }
        self.stop_timer(TimerKind::GatewayRebind);
        self.gateway.set_package(package);
        self.gateway_bind_attempt(Instant::now());
        Ok(())
    }

    // --- Dispatch --------------------------------------------------------

    fn post(&mut self, event: Event) {
        self.post_at(event, Instant::now());
    }

    pub(crate) fn post_at(&mut self, event: Event, now: Instant) {
        self.queue.push(event);
        self.drain(now);
    }

    pub(crate) fn poll_at(&mut self, now: Instant) {
        while let Some(kind) = self.timers.take_due(now) {
            self.queue.push(Event::TimerExpired(kind));
        }
        self.drain(now);
    }

    fn drain(&mut self, now: Instant) {
        if self.dispatching {
            // Already inside the dispatcher; the active drain loop picks
            // the event up.
            return;
        }
        self.dispatching = true;
        while let Some(event) = self.queue.pop() {
            self.handle(event, now);
        }
        self.dispatching = false;
    }

    fn handle(&mut self, event: Event, now: Instant) {
        match event {
            Event::EmergencyModeChanged { emergency } => {
                return self.handle_emergency_changed(emergency)
            }
            Event::ScreenStateChanged { on } => return self.handle_screen_changed(on, now),
            Event::DeviceAlignedChanged { aligned } => {
                return self.handle_aligned_changed(aligned, now)
            }
            Event::TimerExpired(TimerKind::ScreenOffInactivity) => {
                return self.handle_screen_off_expired()
            }
            Event::TimerExpired(TimerKind::GatewayRebind) => {
                return self.gateway_bind_attempt(now)
            }
            _ => {}
        }

        match self.state {
            State::Unavailable => self.unexpected(event),
            State::Off => self.handle_off(event, now),
            State::Enabling => self.handle_enabling(event, now),
            State::Idle => self.handle_idle(event, now),
            State::Transferring => self.handle_transferring(event, now),
            State::Listening { .. } => self.handle_listening(event, now),
            State::NotConnected => self.handle_not_connected(event, now),
            State::Connected => self.handle_connected(event, now),
            State::Disabling => self.handle_disabling(event, now),
        }
    }

    fn handle_off(&mut self, event: Event, now: Instant) {
        match event {
            Event::EnablementStarted { enable: true } => self.transition(State::Enabling, now),
            _ => self.unexpected(event),
        }
    }

    fn handle_enabling(&mut self, event: Event, now: Instant) {
        match event {
            Event::EnabledStateChanged { enabled: true } => {
                if self.subscription.is_attach_required() {
                    self.transition(State::NotConnected, now);
                } else {
                    self.transition(State::Idle, now);
                }
            }
            Event::EnabledStateChanged { enabled: false } => {
                // Deferred radio reports belong to the aborted attempt and
                // must not leak into a later session.
                self.queue.remove(EventKind::ModemStateChanged);
                self.transition(State::Off, now);
            }
            Event::EnablementFailed { was_enabling: true } => self.transition(State::Off, now),
            Event::ModemStateChanged(ModemState::Off) => {
                self.queue.remove(EventKind::ModemStateChanged);
                self.transition(State::Off, now);
            }
            Event::ModemStateChanged(_) => self.queue.defer(event),
            Event::EnablementStarted { enable: false } => self.transition(State::Disabling, now),
            _ => self.unexpected(event),
        }
    }

    fn handle_idle(&mut self, event: Event, now: Instant) {
        match event {
            Event::EnablementStarted { enable: false } => self.transition(State::Disabling, now),
            Event::EnabledStateChanged { enabled: false } => self.transition(State::Off, now),
            Event::ModemStateChanged(ModemState::Off) => self.transition(State::Off, now),
            Event::DatagramTransferState(transfer) => {
                if self.subscription.is_attach_required() {
                    if transfer.is_waiting_to_connect() {
                        self.request_cellular_scan_off();
                    }
                } else if transfer.is_sending() || transfer.is_receiving() {
                    self.transition(State::Transferring, now);
                }
            }
            Event::CellularScanDisabled(result) => {
                if !self.disable_cellular_in_progress {
                    self.unexpected(event);
                    return;
                }
                self.disable_cellular_in_progress = false;
                if result == OperationResult::Success {
                    self.transition(State::NotConnected, now);
                } else {
                    debug!("cellular scan disable completed with {:?}, staying in Idle", result);
                }
            }
            _ => self.unexpected(event),
        }
    }

    fn handle_transferring(&mut self, event: Event, now: Instant) {
        match event {
            Event::DatagramTransferState(transfer) => {
                if transfer.is_sending() || transfer.is_receiving() {
                    return;
                }
                if self.subscription.is_attach_required() {
                    self.transition(State::Connected, now);
                } else if transfer.has_failure() {
                    self.transition(State::Idle, now);
                } else {
                    let timeout = self.listening_timeout();
                    self.transition(State::Listening { timeout }, now);
                }
            }
            Event::ModemStateChanged(ModemState::NotConnected) => {
                self.transition(State::NotConnected, now)
            }
            Event::ModemStateChanged(ModemState::Off) => self.transition(State::Off, now),
            Event::EnabledStateChanged { enabled: false } => self.transition(State::Off, now),
            Event::EnablementStarted { enable: false } => self.transition(State::Disabling, now),
            _ => self.unexpected(event),
        }
    }

    fn handle_listening(&mut self, event: Event, now: Instant) {
        match event {
            Event::TimerExpired(TimerKind::Listening) => self.transition(State::Idle, now),
            Event::DatagramTransferState(transfer) => {
                if transfer.is_sending() || transfer.is_receiving() {
                    self.transition(State::Transferring, now);
                }
            }
            Event::ModemStateChanged(ModemState::Off) => self.transition(State::Off, now),
            Event::EnabledStateChanged { enabled: false } => self.transition(State::Off, now),
            Event::EnablementStarted { enable: false } => self.transition(State::Disabling, now),
            _ => self.unexpected(event),
        }
    }

    fn handle_not_connected(&mut self, event: Event, now: Instant) {
        match event {
            Event::ModemStateChanged(ModemState::Connected) => {
                self.transition(State::Connected, now)
            }
            Event::ModemStateChanged(ModemState::Off) => self.transition(State::Off, now),
            Event::TimerExpired(TimerKind::NbIotInactivity)
            | Event::TimerExpired(TimerKind::CarrierRoamingInactivity) => {
                self.transition(State::Idle, now)
            }
            Event::DatagramTransferState(transfer) => {
                if transfer.is_waiting_to_connect() {
                    self.stop_timer(TimerKind::NbIotInactivity);
                    self.stop_timer(TimerKind::CarrierRoamingInactivity);
                } else if transfer.is_idle() {
                    self.start_nb_iot_timer(now);
                    self.evaluate_carrier_roaming_timer(now);
                } else if transfer.is_sending() || transfer.is_receiving() {
                    self.stop_timer(TimerKind::NbIotInactivity);
                    self.start_nb_iot_timer(now);
                    self.stop_timer(TimerKind::CarrierRoamingInactivity);
                    self.evaluate_carrier_roaming_timer(now);
                }
            }
            Event::EnabledStateChanged { enabled: false } => self.transition(State::Off, now),
            Event::EnablementStarted { enable: false } => self.transition(State::Disabling, now),
            _ => self.unexpected(event),
        }
    }

    fn handle_connected(&mut self, event: Event, now: Instant) {
        match event {
            Event::ModemStateChanged(ModemState::NotConnected) => {
                self.transition(State::NotConnected, now)
            }
            Event::ModemStateChanged(ModemState::Off) => self.transition(State::Off, now),
            Event::TimerExpired(TimerKind::NbIotInactivity) => self.transition(State::Idle, now),
            Event::DatagramTransferState(transfer) => {
                if transfer.is_sending() || transfer.is_receiving() {
                    self.transition(State::Transferring, now);
                }
            }
            Event::EnabledStateChanged { enabled: false } => self.transition(State::Off, now),
            Event::EnablementStarted { enable: false } => self.transition(State::Disabling, now),
            _ => self.unexpected(event),
        }
    }

    fn handle_disabling(&mut self, event: Event, now: Instant) {
        match event {
            Event::EnabledStateChanged { enabled: true } => {
                self.previous = ModemState::NotConnected;
            }
            Event::EnabledStateChanged { enabled: false } => self.transition(State::Off, now),
            Event::EnablementFailed { was_enabling: true } => {
                self.previous = ModemState::Off;
            }
            Event::EnablementFailed { was_enabling: false } => {
                // The disable request failed; fall back to where we were.
                // Listening counts as connected for restoration purposes.
                let target = match self.previous {
                    ModemState::Connected | ModemState::Transferring | ModemState::Listening => {
                        State::Connected
                    }
                    ModemState::Enabling => State::Enabling,
                    ModemState::Off => State::Off,
                    _ => State::NotConnected,
                };
                self.transition(target, now);
            }
            Event::ModemStateChanged(ModemState::NotConnected) => {
                self.previous = ModemState::NotConnected;
            }
            Event::ModemStateChanged(ModemState::Off) => {
                // The authoritative EnabledStateChanged settles the outcome.
                self.queue.defer(event);
            }
            _ => self.unexpected(event),
        }
    }

    // --- Cross-state events ----------------------------------------------

    fn handle_emergency_changed(&mut self, emergency: bool) {
        if self.is_emergency == emergency {
            return;
        }
        self.is_emergency = emergency;
        if emergency {
            self.stop_timer(TimerKind::ScreenOffInactivity);
        }
        self.listeners.broadcast_emergency(emergency);
    }

    fn handle_screen_changed(&mut self, on: bool, now: Instant) {
        self.is_screen_on = on;
        if !self.screen_monitoring {
            return;
        }
        if on {
            self.stop_timer(TimerKind::ScreenOffInactivity);
        } else if !self.is_emergency && self.config.screen_off_auto_disable {
            let timeout =
                Duration::from_secs(self.config.carrier.screen_off_inactivity_timeout_sec as u64);
            self.start_timer(TimerKind::ScreenOffInactivity, timeout, now);
        }
    }

    fn handle_screen_off_expired(&mut self) {
        info!("screen-off inactivity expired, requesting satellite disable");
        if let Err(e) = self.modem.request_satellite_enabled(false, false) {
            warn!("satellite disable request failed: {:?}", e);
        }
    }

    fn handle_aligned_changed(&mut self, aligned: bool, now: Instant) {
        self.is_device_aligned = aligned;
        if aligned {
            self.stop_timer(TimerKind::CarrierRoamingInactivity);
        } else {
            self.evaluate_carrier_roaming_timer(now);
        }
    }

    // --- Transitions -----------------------------------------------------

    fn transition(&mut self, next: State, now: Instant) {
        let from = self.state;
        debug!(
            "transition {:?} -> {:?}",
            from.modem_state(),
            next.modem_state()
        );
        self.exit_state(from, now);
        self.previous = from.modem_state();
        self.state = next;
        self.queue.replay_deferred();
        self.enter_state(next, now);
    }

    fn enter_state(&mut self, state: State, now: Instant) {
        match state {
            State::Unavailable => self.publish_state(),
            State::Off => {
                self.modem
                    .abort_pending_requests(OperationResult::RequestAborted);
                self.sending_triggered_during_transferring = false;
                self.disable_cellular_in_progress = false;
                for kind in TimerKind::ALL {
                    self.stop_timer(kind);
                }
                self.gateway.unbind();
                self.publish_state();
                self.screen_monitoring = false;
            }
            State::Enabling | State::Disabling => self.publish_state(),
            State::Idle => {
                self.sending_triggered_during_transferring = false;
                self.stop_timer(TimerKind::NbIotInactivity);
                self.modem.enable_cellular_scanning(true).ok();
                self.publish_state();
            }
            State::Transferring => {
                self.stop_timer(TimerKind::NbIotInactivity);
                self.publish_state();
            }
            State::Listening { timeout } => {
                self.modem.request_listening_enabled(true, timeout).ok();
                self.start_timer(TimerKind::Listening, timeout, now);
                self.publish_state();
                self.sending_triggered_during_transferring = false;
            }
            State::NotConnected => {
                self.start_nb_iot_timer(now);
                self.evaluate_carrier_roaming_timer(now);
                self.publish_state();
            }
            State::Connected => {
                self.start_nb_iot_timer(now);
                self.publish_state();
            }
        }
    }

    fn exit_state(&mut self, state: State, now: Instant) {
        match state {
            State::Off => {
                self.screen_monitoring = true;
                self.gateway_bind_attempt(now);
            }
            State::Idle => {
                if !self.subscription.is_attach_required() {
                    self.modem.enable_cellular_scanning(false).ok();
                }
            }
            State::Listening { .. } => {
                self.stop_timer(TimerKind::Listening);
                self.modem
                    .request_listening_enabled(false, Duration::from_millis(0))
                    .ok();
            }
            State::NotConnected => {
                self.stop_timer(TimerKind::CarrierRoamingInactivity);
            }
            _ => {}
        }
    }

    fn publish_state(&mut self) {
        let state = self.state.modem_state();
        info!("satellite session state: {:?}", state);
        self.datagrams.on_modem_state_changed(state);
        self.listeners.broadcast_state(state);
    }

    // --- Timers ----------------------------------------------------------

    fn start_timer(&mut self, kind: TimerKind, duration: Duration, now: Instant) {
        if !self.timers.arm(kind, now + duration) {
            trace!("timer {:?} already pending", kind);
        }
    }

    fn stop_timer(&mut self, kind: TimerKind) {
        self.timers.disarm(kind);
        // Guarantee a disarmed expiry never runs, even when already queued.
        self.queue.remove(EventKind::Timer(kind));
    }

    /// The NB-IoT inactivity timer only runs on NTN-only subscriptions and
    /// only while the datagram subsystem is idle in both directions.
    fn start_nb_iot_timer(&mut self, now: Instant) {
        if !self.subscription.is_ntn_only() {
            return;
        }
        if !self.datagrams.is_send_idle() || !self.datagrams.is_poll_idle() {
            return;
        }
        let duration = if self.is_demo_mode {
            self.config.demo_nb_iot_inactivity
        } else {
            self.config.nb_iot_inactivity
        };
        self.start_timer(TimerKind::NbIotInactivity, duration, now);
    }

    fn evaluate_carrier_roaming_timer(&mut self, now: Instant) {
        if self.state != State::NotConnected {
            return;
        }
        if !self.subscription.carrier_roaming_nb_iot_enabled() {
            return;
        }
        if !self.subscription.esos_supported() && !self.subscription.p2p_sms_supported() {
            return;
        }
        if self.is_device_aligned {
            return;
        }
        let seconds = if self.is_emergency {
            self.config.carrier.esos_inactivity_timeout_sec
        } else if self.subscription.p2p_sms_supported() {
            self.config.carrier.p2p_sms_inactivity_timeout_sec
        } else {
            debug!("no carrier-roaming inactivity timeout applies");
            return;
        };
        if !self.datagrams.is_send_idle() || !self.datagrams.is_poll_idle() {
            return;
        }
        self.start_timer(
            TimerKind::CarrierRoamingInactivity,
            Duration::from_secs(seconds as u64),
            now,
        );
    }

    // --- Modem / gateway plumbing ----------------------------------------

    fn listening_timeout(&self) -> Duration {
        if self.is_demo_mode {
            DEMO_TIMEOUT
        } else if self.sending_triggered_during_transferring {
            self.config.listen_from_sending
        } else {
            self.config.listen_from_receiving
        }
    }

    fn request_cellular_scan_off(&mut self) {
        if self.disable_cellular_in_progress {
            debug!("cellular scan disable already in flight");
            return;
        }
        self.disable_cellular_in_progress = true;
        if let Err(e) = self.modem.enable_cellular_scanning(false) {
            warn!("cellular scan disable request failed: {:?}", e);
            self.disable_cellular_in_progress = false;
        }
    }

    fn gateway_bind_attempt(&mut self, now: Instant) {
        match self.gateway.try_bind() {
            BindOutcome::Retry(delay) => self.start_timer(TimerKind::GatewayRebind, delay, now),
            BindOutcome::Started | BindOutcome::Skipped => {}
        }
    }

    pub(crate) fn gateway_binding_died_at(&mut self, now: Instant) {
        if let BindOutcome::Retry(delay) = self.gateway.on_binding_died() {
            self.start_timer(TimerKind::GatewayRebind, delay, now);
        }
    }

    fn unexpected(&self, event: Event) {
        debug!(
            "unexpected {:?} in {:?}, ignoring",
            event.kind(),
            self.state.modem_state()
        );
    }

    #[cfg(test)]
    pub(crate) fn is_timer_armed(&self, kind: TimerKind) -> bool {
        self.timers.is_armed(kind)
    }

    #[cfg(test)]
    pub(crate) fn queue_is_drained(&self) -> bool {
        self.queue.is_empty()
    }
}

//! Mock collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embassy_time::Duration;

use crate::traits::{
    DatagramService, DeliveryError, GatewayError, GatewayTransport, ModemError, SatelliteModem,
    SessionListener, Subscription,
};
use crate::types::{ModemState, OperationResult};

#[derive(Default)]
struct ModemLog {
    listening_calls: Vec<(bool, Duration)>,
    scan_calls: Vec<bool>,
    enable_requests: Vec<(bool, bool)>,
    aborts: Vec<OperationResult>,
    fail_scan_requests: bool,
}

#[derive(Clone, Default)]
pub struct MockModem {
    log: Rc<RefCell<ModemLog>>,
}

impl MockModem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listening_calls(&self) -> Vec<(bool, Duration)> {
        self.log.borrow().listening_calls.clone()
    }

    pub fn scan_calls(&self) -> Vec<bool> {
        self.log.borrow().scan_calls.clone()
    }

    pub fn enable_requests(&self) -> Vec<(bool, bool)> {
        self.log.borrow().enable_requests.clone()
    }

    pub fn aborts(&self) -> Vec<OperationResult> {
        self.log.borrow().aborts.clone()
    }

    pub fn fail_scan_requests(&self, fail: bool) {
        self.log.borrow_mut().fail_scan_requests = fail;
    }
}

impl SatelliteModem for MockModem {
    fn request_listening_enabled(
        &mut self,
        enabled: bool,
        timeout: Duration,
    ) -> Result<(), ModemError> {
        self.log.borrow_mut().listening_calls.push((enabled, timeout));
        Ok(())
    }

    fn enable_cellular_scanning(&mut self, enabled: bool) -> Result<(), ModemError> {
        let mut log = self.log.borrow_mut();
        if log.fail_scan_requests {
            return Err(ModemError::RequestFailed);
        }
        log.scan_calls.push(enabled);
        Ok(())
    }

    fn request_satellite_enabled(
        &mut self,
        enable: bool,
        emergency: bool,
    ) -> Result<(), ModemError> {
        self.log.borrow_mut().enable_requests.push((enable, emergency));
        Ok(())
    }

    fn abort_pending_requests(&mut self, result: OperationResult) {
        self.log.borrow_mut().aborts.push(result);
    }
}

struct DatagramLog {
    send_idle: bool,
    poll_idle: bool,
    states: Vec<ModemState>,
}

#[derive(Clone)]
pub struct MockDatagrams {
    inner: Rc<RefCell<DatagramLog>>,
}

impl MockDatagrams {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DatagramLog {
                send_idle: true,
                poll_idle: true,
                states: Vec::new(),
            })),
        }
    }

    pub fn set_idle(&self, send_idle: bool, poll_idle: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.send_idle = send_idle;
        inner.poll_idle = poll_idle;
    }

    pub fn states(&self) -> Vec<ModemState> {
        self.inner.borrow().states.clone()
    }
}

impl DatagramService for MockDatagrams {
    fn on_modem_state_changed(&mut self, state: ModemState) {
        self.inner.borrow_mut().states.push(state);
    }

    fn is_send_idle(&self) -> bool {
        self.inner.borrow().send_idle
    }

    fn is_poll_idle(&self) -> bool {
        self.inner.borrow().poll_idle
    }
}

#[derive(Default)]
struct SubscriptionFlags {
    attach_required: bool,
    ntn_only: bool,
    carrier_roaming_nb_iot: bool,
    esos: bool,
    p2p_sms: bool,
}

#[derive(Clone, Default)]
pub struct MockSubscription {
    flags: Rc<RefCell<SubscriptionFlags>>,
}

impl MockSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attach_required(&self, value: bool) {
        self.flags.borrow_mut().attach_required = value;
    }

    pub fn set_ntn_only(&self, value: bool) {
        self.flags.borrow_mut().ntn_only = value;
    }

    pub fn set_carrier_roaming_nb_iot(&self, value: bool) {
        self.flags.borrow_mut().carrier_roaming_nb_iot = value;
    }

    pub fn set_esos(&self, value: bool) {
        self.flags.borrow_mut().esos = value;
    }

    pub fn set_p2p_sms(&self, value: bool) {
        self.flags.borrow_mut().p2p_sms = value;
    }
}

impl Subscription for MockSubscription {
    fn is_attach_required(&self) -> bool {
        self.flags.borrow().attach_required
    }

    fn is_ntn_only(&self) -> bool {
        self.flags.borrow().ntn_only
    }

    fn carrier_roaming_nb_iot_enabled(&self) -> bool {
        self.flags.borrow().carrier_roaming_nb_iot
    }

    fn esos_supported(&self) -> bool {
        self.flags.borrow().esos
    }

    fn p2p_sms_supported(&self) -> bool {
        self.flags.borrow().p2p_sms
    }
}

pub struct MockListener {
    states: RefCell<Vec<ModemState>>,
    emergencies: RefCell<Vec<bool>>,
    fail: Cell<bool>,
}

impl MockListener {
    pub fn new() -> Self {
        Self {
            states: RefCell::new(Vec::new()),
            emergencies: RefCell::new(Vec::new()),
            fail: Cell::new(false),
        }
    }

    pub fn fail_deliveries(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn states(&self) -> Vec<ModemState> {
        self.states.borrow().clone()
    }

    pub fn emergencies(&self) -> Vec<bool> {
        self.emergencies.borrow().clone()
    }
}

impl SessionListener for MockListener {
    fn on_state_changed(&self, state: ModemState) -> Result<(), DeliveryError> {
        if self.fail.get() {
            return Err(DeliveryError);
        }
        self.states.borrow_mut().push(state);
        Ok(())
    }

    fn on_emergency_changed(&self, emergency: bool) -> Result<(), DeliveryError> {
        if self.fail.get() {
            return Err(DeliveryError);
        }
        self.emergencies.borrow_mut().push(emergency);
        Ok(())
    }
}

#[derive(Default)]
struct TransportLog {
    binds: Vec<String>,
    unbinds: usize,
    fail: bool,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Rc<RefCell<TransportLog>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_binds(&self, fail: bool) {
        self.inner.borrow_mut().fail = fail;
    }

    pub fn bind_count(&self) -> usize {
        self.inner.borrow().binds.len()
    }

    pub fn last_package(&self) -> Option<String> {
        self.inner.borrow().binds.last().cloned()
    }

    pub fn unbind_count(&self) -> usize {
        self.inner.borrow().unbinds
    }
}

impl GatewayTransport for MockTransport {
    fn bind(&mut self, package: &str) -> Result<(), GatewayError> {
        let mut inner = self.inner.borrow_mut();
        inner.binds.push(package.into());
        if inner.fail {
            return Err(GatewayError::ServiceNotFound);
        }
        Ok(())
    }

    fn unbind(&mut self) {
        self.inner.borrow_mut().unbinds += 1;
    }
}

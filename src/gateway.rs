//! Gateway service binding with exponential-backoff reconnection.
//!
//! The session keeps a bound connection to a named gateway service while the
//! satellite is operational. Binding failures and died bindings are retried
//! with exponential backoff; the retry deadline itself lives in the session
//! timer set under [`TimerKind::GatewayRebind`](crate::types::TimerKind).

use embassy_time::Duration;
use heapless::String;

use crate::traits::GatewayTransport;

pub(crate) const BACKOFF_INITIAL: Duration = Duration::from_secs(2);
pub(crate) const BACKOFF_MAX: Duration = Duration::from_secs(64);
const BACKOFF_MULTIPLIER: u32 = 2;

pub(crate) const MAX_PACKAGE_LEN: usize = 64;

/// Multiplicative backoff with a clamp. `notify_failed` advances the delay;
/// `reset` returns to the initial delay.
pub(crate) struct ExponentialBackoff {
    current: Duration,
    initial: Duration,
    max: Duration,
    multiplier: u32,
}

impl ExponentialBackoff {
    pub const fn new(initial: Duration, max: Duration, multiplier: u32) -> Self {
        Self {
            current: initial,
            initial,
            max,
            multiplier,
        }
    }

    pub fn delay(&self) -> Duration {
        self.current
    }

    pub fn notify_failed(&mut self) {
        let next = self.current * self.multiplier;
        self.current = if next > self.max { self.max } else { next };
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Binding state of the gateway connection. Encoding it as a sum type keeps
/// "bound and binding are never both true" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindState {
    Unbound,
    Binding,
    Bound,
}

/// What the session should do after a binder operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindOutcome {
    /// A bind is in flight; wait for the connected callback.
    Started,
    /// The bind failed; retry after the given delay.
    Retry(Duration),
    /// Nothing to do (no target package, or already binding/bound).
    Skipped,
}

pub(crate) struct GatewayBinder<T: GatewayTransport> {
    transport: T,
    package: String<MAX_PACKAGE_LEN>,
    state: BindState,
    backoff: ExponentialBackoff,
}

impl<T: GatewayTransport> GatewayBinder<T> {
    pub fn new(transport: T, package: String<MAX_PACKAGE_LEN>) -> Self {
        Self {
            transport,
            package,
            state: BindState::Unbound,
            backoff: ExponentialBackoff::new(BACKOFF_INITIAL, BACKOFF_MAX, BACKOFF_MULTIPLIER),
        }
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    #[cfg(test)]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Replace the target package. `None` and the literal `"null"` clear the
    /// target. Any existing binding is torn down either way.
    pub fn set_package(&mut self, package: Option<&str>) {
        self.unbind();
        self.package.clear();
        match package {
            None | Some("null") => {}
            Some(name) => {
                if self.package.push_str(name).is_err() {
                    error!("gateway package name too long, clearing target");
                    self.package.clear();
                }
            }
        }
    }

    /// Attempt to bind. Never called re-entrantly while `Binding` or
    /// `Bound`; retrying stops while no package is configured.
    pub fn try_bind(&mut self) -> BindOutcome {
        if self.package.is_empty() {
            debug!("no gateway package configured, not binding");
            return BindOutcome::Skipped;
        }
        if self.state != BindState::Unbound {
            return BindOutcome::Skipped;
        }

        match self.transport.bind(&self.package) {
            Ok(()) => {
                self.state = BindState::Binding;
                BindOutcome::Started
            }
            Err(e) => {
                let delay = self.backoff.delay();
                self.backoff.notify_failed();
                warn!("gateway bind failed: {:?}, retrying in {:?}", e, delay);
                BindOutcome::Retry(delay)
            }
        }
    }

    pub fn on_connected(&mut self) {
        if self.state != BindState::Binding {
            warn!("gateway connected while {:?}, ignoring", self.state);
            return;
        }
        self.state = BindState::Bound;
        self.backoff.reset();
    }

    /// The service went away but the binding survives; the platform will
    /// reconnect on its own.
    pub fn on_disconnected(&mut self) {
        self.state = BindState::Unbound;
    }

    /// The binding itself died; tear it down and retry with backoff.
    pub fn on_binding_died(&mut self) -> BindOutcome {
        self.transport.unbind();
        self.state = BindState::Unbound;
        let delay = self.backoff.delay();
        self.backoff.notify_failed();
        BindOutcome::Retry(delay)
    }

    /// Tear down the binding and forget any retry progress.
    pub fn unbind(&mut self) {
        if self.state != BindState::Unbound {
            self.transport.unbind();
            self.state = BindState::Unbound;
        }
        self.backoff.reset();
    }
}

//! Registry of session observers.
//!
//! Listeners are keyed by a caller-supplied stable identity; registering a
//! duplicate identity overwrites the previous handle. Broadcasts iterate a
//! snapshot taken under a short critical section, so a removal triggered by
//! a delivery failure never invalidates the iteration.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::{FnvIndexMap, Vec};

use crate::error::Error;
use crate::traits::SessionListener;
use crate::types::ModemState;

pub(crate) const MAX_LISTENERS: usize = 8;

struct Inner<'a> {
    listeners: FnvIndexMap<u32, &'a dyn SessionListener, MAX_LISTENERS>,
}

pub(crate) struct ListenerRegistry<'a> {
    shared: Mutex<NoopRawMutex, RefCell<Inner<'a>>>,
}

impl<'a> ListenerRegistry<'a> {
    pub fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Inner {
                listeners: FnvIndexMap::new(),
            })),
        }
    }

    /// Deliver the current state (and, in carrier-roaming mode, the current
    /// emergency flag) synchronously, then add the listener. A listener
    /// whose initial delivery fails is not added.
    pub fn register(
        &self,
        id: u32,
        listener: &'a dyn SessionListener,
        state: ModemState,
        emergency: Option<bool>,
    ) -> Result<(), Error> {
        if listener.on_state_changed(state).is_err() {
            warn!("listener {} failed initial state delivery, not added", id);
            return Ok(());
        }
        if let Some(emergency) = emergency {
            if listener.on_emergency_changed(emergency).is_err() {
                warn!("listener {} failed initial emergency delivery, not added", id);
                return Ok(());
            }
        }

        self.shared.lock(|inner| {
            let mut inner = inner.borrow_mut();
            // Duplicate identities overwrite the existing handle.
            inner.listeners.remove(&id);
            inner
                .listeners
                .insert(id, listener)
                .map(|_| ())
                .map_err(|_| Error::ListenerTableFull)
        })
    }

    /// Remove by identity; a no-op when absent.
    pub fn unregister(&self, id: u32) {
        self.shared.lock(|inner| {
            inner.borrow_mut().listeners.remove(&id);
        });
    }

    pub fn broadcast_state(&self, state: ModemState) {
        self.deliver(|listener| listener.on_state_changed(state));
    }

    pub fn broadcast_emergency(&self, emergency: bool) {
        self.deliver(|listener| listener.on_emergency_changed(emergency));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.shared.lock(|inner| inner.borrow().listeners.len())
    }

    fn deliver<F>(&self, mut notify: F)
    where
        F: FnMut(&'a dyn SessionListener) -> Result<(), crate::traits::DeliveryError>,
    {
        let snapshot: Vec<(u32, &'a dyn SessionListener), MAX_LISTENERS> =
            self.shared.lock(|inner| {
                let inner = inner.borrow();
                let mut copy = Vec::new();
                for (id, listener) in inner.listeners.iter() {
                    // Snapshot capacity matches the map capacity.
                    copy.push((*id, *listener)).ok();
                }
                copy
            });

        let mut failed: Vec<u32, MAX_LISTENERS> = Vec::new();
        for (id, listener) in snapshot {
            if notify(listener).is_err() {
                warn!("listener {} failed delivery, evicting", id);
                failed.push(id).ok();
            }
        }

        if !failed.is_empty() {
            self.shared.lock(|inner| {
                let mut inner = inner.borrow_mut();
                for id in &failed {
                    inner.listeners.remove(id);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockListener;

    #[test]
    fn register_delivers_initial_state() {
        let listener = MockListener::new();
        let registry = ListenerRegistry::new();
        registry
            .register(1, &listener, ModemState::Off, None)
            .unwrap();
        assert_eq!(listener.states(), [ModemState::Off]);
        assert_eq!(listener.emergencies(), []);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_in_carrier_roaming_mode_also_delivers_emergency() {
        let listener = MockListener::new();
        let registry = ListenerRegistry::new();
        registry
            .register(1, &listener, ModemState::Idle, Some(true))
            .unwrap();
        assert_eq!(listener.states(), [ModemState::Idle]);
        assert_eq!(listener.emergencies(), [true]);
    }

    #[test]
    fn duplicate_identity_overwrites() {
        let first = MockListener::new();
        let second = MockListener::new();
        let registry = ListenerRegistry::new();
        registry.register(7, &first, ModemState::Off, None).unwrap();
        registry.register(7, &second, ModemState::Off, None).unwrap();
        assert_eq!(registry.len(), 1);

        registry.broadcast_state(ModemState::Enabling);
        assert_eq!(first.states(), [ModemState::Off]);
        assert_eq!(second.states(), [ModemState::Off, ModemState::Enabling]);
    }

    #[test]
    fn failing_listener_is_evicted_and_others_still_delivered() {
        let healthy = MockListener::new();
        let broken = MockListener::new();
        let registry = ListenerRegistry::new();
        registry.register(1, &healthy, ModemState::Off, None).unwrap();
        registry.register(2, &broken, ModemState::Off, None).unwrap();
        broken.fail_deliveries(true);

        registry.broadcast_state(ModemState::Idle);
        assert_eq!(registry.len(), 1);
        assert_eq!(healthy.states(), [ModemState::Off, ModemState::Idle]);

        // The evicted listener no longer hears anything.
        broken.fail_deliveries(false);
        registry.broadcast_state(ModemState::Listening);
        assert_eq!(broken.states(), [ModemState::Off]);
        assert_eq!(healthy.states(), [ModemState::Off, ModemState::Idle, ModemState::Listening]);
    }

    #[test]
    fn unregister_is_silent_on_unknown_identity() {
        let registry = ListenerRegistry::new();
        registry.unregister(42);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn register_fails_when_table_is_full() {
        let listeners: std::vec::Vec<MockListener> =
            (0..=MAX_LISTENERS).map(|_| MockListener::new()).collect();
        let registry = ListenerRegistry::new();
        for (id, listener) in listeners.iter().take(MAX_LISTENERS).enumerate() {
            registry
                .register(id as u32, listener, ModemState::Off, None)
                .unwrap();
        }
        assert_eq!(registry.len(), MAX_LISTENERS);

        assert_eq!(
            registry.register(
                MAX_LISTENERS as u32,
                &listeners[MAX_LISTENERS],
                ModemState::Off,
                None
            ),
            Err(Error::ListenerTableFull)
        );
        assert_eq!(registry.len(), MAX_LISTENERS);

        // A known identity still overwrites in place on a full table.
        registry
            .register(0, &listeners[0], ModemState::Off, None)
            .unwrap();
        assert_eq!(registry.len(), MAX_LISTENERS);
    }
}

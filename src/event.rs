//! Event vocabulary and the dispatcher's queue.
//!
//! All inputs to the state machine are funneled through [`EventQueue`]:
//! collaborator callbacks, timer expiries and replayed deferred events share
//! one FIFO so that every handler runs to completion before the next event
//! dispatches.

use heapless::Deque;

use crate::types::{DatagramTransferState, ModemState, OperationResult, TimerKind};

const QUEUE_DEPTH: usize = 16;
const DEFER_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    DatagramTransferState(DatagramTransferState),
    EnablementStarted { enable: bool },
    EnabledStateChanged { enabled: bool },
    EnablementFailed { was_enabling: bool },
    ModemStateChanged(ModemState),
    CellularScanDisabled(OperationResult),
    ScreenStateChanged { on: bool },
    EmergencyModeChanged { emergency: bool },
    DeviceAlignedChanged { aligned: bool },
    TimerExpired(TimerKind),
}

/// Discriminant used for removal of pending events by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    DatagramTransferState,
    EnablementStarted,
    EnabledStateChanged,
    EnablementFailed,
    ModemStateChanged,
    CellularScanDisabled,
    ScreenStateChanged,
    EmergencyModeChanged,
    DeviceAlignedChanged,
    Timer(TimerKind),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::DatagramTransferState(_) => EventKind::DatagramTransferState,
            Event::EnablementStarted { .. } => EventKind::EnablementStarted,
            Event::EnabledStateChanged { .. } => EventKind::EnabledStateChanged,
            Event::EnablementFailed { .. } => EventKind::EnablementFailed,
            Event::ModemStateChanged(_) => EventKind::ModemStateChanged,
            Event::CellularScanDisabled(_) => EventKind::CellularScanDisabled,
            Event::ScreenStateChanged { .. } => EventKind::ScreenStateChanged,
            Event::EmergencyModeChanged { .. } => EventKind::EmergencyModeChanged,
            Event::DeviceAlignedChanged { .. } => EventKind::DeviceAlignedChanged,
            Event::TimerExpired(kind) => EventKind::Timer(*kind),
        }
    }
}

/// FIFO of pending events plus the per-transition side queue of deferred
/// events.
///
/// Deferred events are replayed ahead of the main queue when the machine
/// transitions, preserving their relative order. Removal by kind searches
/// both queues.
pub(crate) struct EventQueue {
    main: Deque<Event, QUEUE_DEPTH>,
    deferred: Deque<Event, DEFER_DEPTH>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            main: Deque::new(),
            deferred: Deque::new(),
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.main.push_back(event).is_err() {
            error!("event queue full, dropping {:?}", event.kind());
        }
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.main.pop_front()
    }

    /// Park `event` until the next transition completes.
    pub fn defer(&mut self, event: Event) {
        if self.deferred.push_back(event).is_err() {
            error!("deferred queue full, dropping {:?}", event.kind());
        }
    }

    /// Move all deferred events to the front of the main queue, keeping
    /// their relative order.
    pub fn replay_deferred(&mut self) {
        while let Some(event) = self.deferred.pop_back() {
            if self.main.push_front(event).is_err() {
                error!("event queue full, dropping deferred {:?}", event.kind());
            }
        }
    }

    /// Drop every pending and deferred event of `kind`.
    pub fn remove(&mut self, kind: EventKind) {
        Self::retain_not(&mut self.main, kind);
        Self::retain_not(&mut self.deferred, kind);
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    #[cfg(test)]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    fn retain_not<const N: usize>(queue: &mut Deque<Event, N>, kind: EventKind) {
        for _ in 0..queue.len() {
            if let Some(event) = queue.pop_front() {
                if event.kind() != kind {
                    // Rotation keeps relative order; capacity is unchanged.
                    let _ = queue.push_back(event);
                }
            }
        }
    }
}

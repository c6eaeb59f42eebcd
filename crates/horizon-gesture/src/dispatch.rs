//! Delivery of recognized gesture events to the host.
//!
//! The engine is agnostic about how events reach application code; it only
//! needs a deliver capability per attached handler. The host supplies an
//! [`EventDispatcherFactory`]; at attach time the engine asks it for a
//! dispatcher matching the requested [`DeliveryChannel`].

use std::sync::{Arc, Mutex};

use horizon_gesture_core::ViewTag;

use crate::event::{GestureEvent, StateChangeEvent};

/// How events for one attached handler reach application code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    /// Synchronous bridge call into application code.
    Synchronous,
    /// Direct injection into the host's animation driver.
    AnimationDriver,
    /// Direct injection into a worklet runtime.
    Worklet,
}

/// Sink for one attached handler's outgoing events.
pub trait EventDispatcher: Send {
    /// Deliver a state transition.
    fn on_state_change(&mut self, event: &StateChangeEvent);

    /// Deliver a progress update or raw touch data.
    fn on_gesture_event(&mut self, event: &GestureEvent);
}

/// Creates dispatchers on demand, one per handler attachment.
pub trait EventDispatcherFactory: Send {
    /// Create a dispatcher delivering through `channel` for the given view.
    fn create(&mut self, channel: DeliveryChannel, view_tag: ViewTag) -> Box<dyn EventDispatcher>;
}

/// An outgoing event captured by [`RecordingDispatcher`].
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingRecord {
    StateChange(StateChangeEvent),
    Gesture(GestureEvent),
}

/// Shared buffer of recorded outgoing events.
pub type RecordedEvents = Arc<Mutex<Vec<OutgoingRecord>>>;

/// A dispatcher that appends every event to a shared buffer.
///
/// Used by the engine's tests and useful for headless hosts that drain
/// events themselves.
#[derive(Debug, Clone)]
pub struct RecordingDispatcher {
    events: RecordedEvents,
}

impl RecordingDispatcher {
    /// Create a dispatcher writing into `events`.
    pub fn new(events: RecordedEvents) -> Self {
        Self { events }
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn on_state_change(&mut self, event: &StateChangeEvent) {
        self.events
            .lock()
            .expect("event buffer poisoned")
            .push(OutgoingRecord::StateChange(event.clone()));
    }

    fn on_gesture_event(&mut self, event: &GestureEvent) {
        self.events
            .lock()
            .expect("event buffer poisoned")
            .push(OutgoingRecord::Gesture(event.clone()));
    }
}

/// A factory handing out [`RecordingDispatcher`]s over one shared buffer.
#[derive(Debug, Default)]
pub struct RecordingDispatcherFactory {
    events: RecordedEvents,
}

impl RecordingDispatcherFactory {
    /// Create a factory with a fresh buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared buffer every created dispatcher appends to.
    pub fn events(&self) -> RecordedEvents {
        Arc::clone(&self.events)
    }
}

impl EventDispatcherFactory for RecordingDispatcherFactory {
    fn create(&mut self, _channel: DeliveryChannel, _view_tag: ViewTag) -> Box<dyn EventDispatcher> {
        Box::new(RecordingDispatcher::new(Arc::clone(&self.events)))
    }
}

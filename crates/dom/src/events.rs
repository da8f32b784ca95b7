//! Synchronous event listener registry.
//!
//! Handlers are plain boxed closures keyed by (target, event name) and run
//! in registration order when an event of that name is dispatched at that
//! exact target. Dispatch is synchronous and single-pass; there is no
//! bubbling and no deregistration primitive, so callers that need to stop
//! listening keep their own guard state inside the closure.

use crate::arena::Document;
use crate::types::NodeId;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a listener is attached to: one node, or the document as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTarget {
    Document,
    Node(NodeId),
}

/// A synthesized event delivered to handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub target: EventTarget,
}

/// Boxed handler invoked with the event only; the single-threaded model
/// keeps the document out of reach while dispatch is in flight.
pub type Handler = Box<dyn FnMut(&Event)>;

#[derive(Default)]
pub struct EventRegistry {
    listeners: AHashMap<(EventTarget, String), Vec<Handler>>,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventRegistry")
            .field("keys", &self.listeners.len())
            .field("handlers", &total)
            .finish()
    }
}

impl Document {
    /// Register a handler for `event` at `target`.
    pub fn add_listener(&mut self, target: EventTarget, event: &str, handler: Handler) {
        self.registry
            .listeners
            .entry((target, event.to_string()))
            .or_default()
            .push(handler);
    }

    pub fn listener_count(&self, target: EventTarget, event: &str) -> usize {
        self.registry
            .listeners
            .get(&(target, event.to_string()))
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Synthesize an event and fire every handler registered for it at
    /// `target`, in registration order. Returns how many ran.
    pub fn dispatch_event(&mut self, target: EventTarget, event: &str) -> usize {
        let ev = Event {
            name: event.to_string(),
            target,
        };
        match self.registry.listeners.get_mut(&(target, event.to_string())) {
            Some(handlers) => {
                for handler in handlers.iter_mut() {
                    handler(&ev);
                }
                handlers.len()
            }
            None => 0,
        }
    }
}

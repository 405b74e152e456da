//! Event dispatch
//!
//! Each container owns a dispatcher. Handlers run synchronously, in
//! registration order, after the state change that produced the event.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use scrollsync_platform::{Axis, NodeId};

use crate::error::ScrollError;

/// Event kinds a container emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A scrollbar position changed
    Scrolling,
    /// Edge auto-scroll stepped during a drag
    DragScroll,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::Scrolling => "scrolling",
            EventKind::DragScroll => "dragScroll",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ScrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scrolling" => Ok(EventKind::Scrolling),
            "dragScroll" | "drag_scroll" => Ok(EventKind::DragScroll),
            other => Err(ScrollError::InvalidEventKind(other.to_string())),
        }
    }
}

/// An event emitted by a container
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollEvent {
    Scrolling {
        surface: NodeId,
        axis: Axis,
        /// Element the triggering input was aimed at
        target: Option<NodeId>,
        /// Internal position: 100 at the start, 0 at the end
        position: f32,
    },
    DragScroll {
        surface: NodeId,
        /// Element under the pointer after the step
        target: Option<NodeId>,
    },
}

impl ScrollEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ScrollEvent::Scrolling { .. } => EventKind::Scrolling,
            ScrollEvent::DragScroll { .. } => EventKind::DragScroll,
        }
    }

    pub fn surface(&self) -> NodeId {
        match self {
            ScrollEvent::Scrolling { surface, .. } | ScrollEvent::DragScroll { surface, .. } => {
                *surface
            }
        }
    }

    /// Percent scrolled from the start, for `Scrolling` events
    pub fn percent_scrolled(&self) -> Option<f32> {
        match self {
            ScrollEvent::Scrolling { position, .. } => Some(100.0 - position),
            ScrollEvent::DragScroll { .. } => None,
        }
    }
}

/// Event handler function type
pub type EventHandler = Arc<dyn Fn(&ScrollEvent) + Send + Sync>;

/// Dispatches events to registered handlers
#[derive(Default)]
pub struct EventDispatcher {
    handlers: FxHashMap<EventKind, Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler for an event kind
    pub fn register<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&ScrollEvent) + Send + Sync + 'static,
    {
        self.register_shared(kind, Arc::new(handler));
    }

    /// Register a handler that may also be registered elsewhere
    pub fn register_shared(&mut self, kind: EventKind, handler: EventHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Dispatch an event to all handlers of its kind
    pub fn dispatch(&self, event: &ScrollEvent) {
        if let Some(handlers) = self.handlers.get(&event.kind()) {
            for handler in handlers {
                handler(event);
            }
        }
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("scrolling", &self.handler_count(EventKind::Scrolling))
            .field("drag_scroll", &self.handler_count(EventKind::DragScroll))
            .finish()
    }
}

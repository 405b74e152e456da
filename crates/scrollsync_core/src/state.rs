//! Lifecycle and interaction state machines
//!
//! Flat state machines expressed as enums. Each state type declares how an
//! event moves it, and `None` means the event is ignored in that state.

use std::fmt::Debug;
use std::hash::Hash;

/// State types driven by discrete events
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    type Event: Copy + Debug;

    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: Self::Event) -> Option<Self>;
}

/// Apply `event` to `state`, returning whether a transition happened
pub fn advance<S: StateTransitions>(state: &mut S, event: S::Event) -> bool {
    match state.on_event(event) {
        Some(next) => {
            if next != *state {
                tracing::debug!(from = ?*state, to = ?next, ?event, "state transition");
            }
            *state = next;
            true
        }
        None => false,
    }
}

/// Events in a container's life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Reflow, resize, or any scroll-affecting input
    Update,
    /// Teardown
    Clear,
}

/// Container lifecycle: active until cleared, cleared forever after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerState {
    #[default]
    Active,
    Cleared,
}

impl ContainerState {
    pub fn is_active(&self) -> bool {
        matches!(self, ContainerState::Active)
    }
}

impl StateTransitions for ContainerState {
    type Event = LifecycleEvent;

    fn on_event(&self, event: LifecycleEvent) -> Option<Self> {
        match (self, event) {
            (ContainerState::Active, LifecycleEvent::Update) => Some(ContainerState::Active),
            (ContainerState::Active, LifecycleEvent::Clear) => Some(ContainerState::Cleared),
            (ContainerState::Cleared, _) => None,
        }
    }
}

/// Thumb drag events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    /// Primary button pressed on the thumb
    Press,
    /// Button released anywhere
    Release,
}

/// Which listener set a scrollbar has bound
///
/// Idle scrollbars listen for thumb presses and track clicks; dragging
/// scrollbars listen for window-wide moves and the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

impl DragPhase {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragPhase::Dragging)
    }
}

impl StateTransitions for DragPhase {
    type Event = DragEvent;

    fn on_event(&self, event: DragEvent) -> Option<Self> {
        match (self, event) {
            (DragPhase::Idle, DragEvent::Press) => Some(DragPhase::Dragging),
            (DragPhase::Dragging, DragEvent::Release) => Some(DragPhase::Idle),
            _ => None,
        }
    }
}

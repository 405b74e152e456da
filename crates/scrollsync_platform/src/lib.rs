//! Scrollsync Platform Boundary
//!
//! The scrollbar engine treats its host as a provided API. This crate
//! defines that API:
//!
//! - **Geometry**: client/content/outer extents, scroll and screen offsets
//! - **Element hosting**: creating, attaching and styling visuals
//! - **Listeners**: input bindings, mutation observation, timers
//! - **Events**: the vocabulary a host uses to report input and changes
//!
//! A [`headless::HeadlessPlatform`] implements every capability in memory
//! for tests and scripted replays.

pub mod error;
pub mod event;
pub mod geometry;
pub mod headless;
pub mod platform;

slotmap::new_key_type! {
    /// Opaque identity of an element owned by the platform
    pub struct NodeId;
}

pub use error::PlatformError;
pub use event::{
    DeltaMode, MutationRecord, NotificationSource, PlatformEvent, PointerEvent, RawWheel,
    TimerToken, PRIMARY_BUTTON,
};
pub use geometry::{Axis, Length, Point, Size, StyleProp};
pub use platform::{
    Binding, ElementHost, ElementKind, Flag, GeometryProvider, InputKind, ListenTarget,
    ListenerHost, Platform,
};

//! Capability traits the engine requires from its host
//!
//! The engine never talks to a windowing system directly. Everything it
//! needs (element extents, scroll offsets, visual element management,
//! listener and mutation bookkeeping, timers) goes through these traits.

use std::time::Duration;

use smallvec::SmallVec;

use crate::event::TimerToken;
use crate::geometry::{Axis, Length, Point, Size, StyleProp};
use crate::NodeId;

/// Kind of visual element the engine creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Full-length rail, doubles as the positioned "bar"
    Track(Axis),
    /// Draggable handle inside a track
    Thumb(Axis),
}

/// Boolean state exposed on visuals for assistive technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Thumb covers the whole track
    Hidden,
    /// Thumb is being dragged
    Pressed,
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    Element(NodeId),
    /// The whole input surface, so drags leaving the element still track
    Window,
}

/// Input kinds a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Wheel,
    PointerDown,
    PointerMove,
    PointerUp,
    Click,
    WindowResize,
}

/// A single listener registration
///
/// `owner` disambiguates registrations sharing a target and kind (two
/// scrollbars both listening to window pointer moves, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub target: ListenTarget,
    pub kind: InputKind,
    pub owner: NodeId,
}

impl Binding {
    pub fn element(target: NodeId, kind: InputKind, owner: NodeId) -> Self {
        Self {
            target: ListenTarget::Element(target),
            kind,
            owner,
        }
    }

    pub fn window(kind: InputKind, owner: NodeId) -> Self {
        Self {
            target: ListenTarget::Window,
            kind,
            owner,
        }
    }
}

/// Read access to element geometry
pub trait GeometryProvider {
    /// Inner visible size, excluding borders and native scrollbars
    fn client_size(&self, node: NodeId) -> Size;

    /// Full scrollable content size
    fn content_size(&self, node: NodeId) -> Size;

    /// Outer layout size including borders
    fn outer_size(&self, node: NodeId) -> Size;

    /// Layout offset relative to the positioned parent
    fn layout_offset(&self, node: NodeId) -> Point;

    /// Current scroll offsets
    fn scroll_offset(&self, node: NodeId) -> Point;

    /// Absolute offset relative to the root
    fn screen_offset(&self, node: NodeId) -> Point;

    /// Element whose scroll offset is authoritative for `node`.
    ///
    /// Differs from `node` only when `node` stands in for the document.
    fn viewport_of(&self, node: NodeId) -> NodeId {
        node
    }

    /// Topmost element at a page coordinate
    fn element_at(&self, point: Point) -> Option<NodeId>;

    /// Inclusive containment test
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Embedded frames that are direct children of `node`
    fn embedded_frames(&self, node: NodeId) -> SmallVec<[NodeId; 2]>;

    /// Content extent of an embedded frame's document
    fn frame_content_size(&self, frame: NodeId) -> Size;
}

/// Mutation of elements and their attributes
pub trait ElementHost {
    fn set_scroll_offset(&mut self, node: NodeId, axis: Axis, value: f32);

    fn create_element(&mut self, kind: ElementKind) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    fn remove_child(&mut self, parent: NodeId, child: NodeId);

    fn set_style(&mut self, element: NodeId, prop: StyleProp, value: Length);

    fn set_flag(&mut self, element: NodeId, flag: Flag, on: bool);

    fn set_class(&mut self, element: NodeId, class: &str, on: bool);

    /// Declared scroll axes attribute, e.g. `"x,y"`
    fn scroll_axes(&self, node: NodeId) -> Option<String>;

    fn set_scroll_axes(&mut self, node: NodeId, axes: &str);

    /// Last size delta written by a resize source
    fn resize_marker(&self, node: NodeId) -> Option<Point>;

    fn set_resize_marker(&mut self, node: NodeId, delta: Point);
}

/// Listener, observation, and timer bookkeeping
pub trait ListenerHost {
    fn listen(&mut self, binding: Binding);

    fn unlisten(&mut self, binding: Binding);

    /// Report child-list and attribute changes of `target` to `observer`
    fn observe(&mut self, observer: NodeId, target: NodeId);

    /// Stop every observation registered by `observer`
    fn disconnect(&mut self, observer: NodeId);

    /// Deliver `PlatformEvent::Timer(token)` after `after`, replacing any
    /// pending timer with the same token
    fn schedule(&mut self, token: TimerToken, after: Duration);

    fn cancel(&mut self, token: TimerToken);
}

/// Everything the engine needs from its host
pub trait Platform: GeometryProvider + ElementHost + ListenerHost {}

impl<T: GeometryProvider + ElementHost + ListenerHost + ?Sized> Platform for T {}

//! Headless platform for testing.
//!
//! Keeps an in-memory element tree with just enough layout to drive the
//! engine without a window:
//! - Surfaces and frames carry explicit client/content sizes and scroll
//!   offsets, clamped the way a browser clamps them
//! - Tracks span their parent surface along their axis
//! - Thumbs resolve their extent and offset from the styles the engine
//!   writes on them
//! - Child-list and resize-marker changes on observed nodes are queued as
//!   mutation notifications, scheduled timers are kept until fired

use std::collections::VecDeque;
use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::event::{MutationRecord, NotificationSource, PlatformEvent, TimerToken};
use crate::geometry::{Axis, Length, Point, Size, StyleProp};
use crate::platform::{
    Binding, ElementHost, ElementKind, Flag, GeometryProvider, InputKind, ListenTarget,
    ListenerHost,
};
use crate::NodeId;

/// Configuration for the headless element tree.
#[derive(Clone, Debug)]
pub struct HeadlessConfig {
    /// Cross-axis thickness of tracks and thumbs in pixels.
    pub track_thickness: f32,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            track_thickness: 10.0,
        }
    }
}

/// Role of a node in the headless tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Surface,
    Frame,
    Track(Axis),
    Thumb(Axis),
}

#[derive(Debug)]
struct Node {
    role: NodeRole,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    client: Size,
    content: Size,
    outer: Option<Size>,
    scroll: Point,
    screen_offset: Point,
    styles: FxHashMap<StyleProp, Length>,
    flags: FxHashSet<Flag>,
    classes: FxHashSet<String>,
    scroll_axes: Option<String>,
    resize_marker: Option<Point>,
}

impl Node {
    fn new(role: NodeRole) -> Self {
        Self {
            role,
            parent: None,
            children: SmallVec::new(),
            client: Size::ZERO,
            content: Size::ZERO,
            outer: None,
            scroll: Point::ZERO,
            screen_offset: Point::ZERO,
            styles: FxHashMap::default(),
            flags: FxHashSet::default(),
            classes: FxHashSet::default(),
            scroll_axes: None,
            resize_marker: None,
        }
    }

    fn max_scroll(&self) -> Point {
        Point::new(
            (self.content.width - self.client.width).max(0.0),
            (self.content.height - self.client.height).max(0.0),
        )
    }

    fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        self.scroll = Point::new(
            self.scroll.x.clamp(0.0, max.x),
            self.scroll.y.clamp(0.0, max.y),
        );
    }
}

/// An in-memory platform.
pub struct HeadlessPlatform {
    config: HeadlessConfig,
    nodes: SlotMap<NodeId, Node>,
    viewports: FxHashMap<NodeId, NodeId>,
    listeners: FxHashSet<Binding>,
    observers: FxHashMap<NodeId, SmallVec<[NodeId; 2]>>,
    timers: FxHashMap<TimerToken, Duration>,
    pending: VecDeque<PlatformEvent>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

impl HeadlessPlatform {
    /// Create a new headless platform with the given configuration.
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            config,
            nodes: SlotMap::with_key(),
            viewports: FxHashMap::default(),
            listeners: FxHashSet::default(),
            observers: FxHashMap::default(),
            timers: FxHashMap::default(),
            pending: VecDeque::new(),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    /// Add a scrollable surface with the given client and content sizes.
    pub fn add_surface(&mut self, client: Size, content: Size) -> NodeId {
        let mut node = Node::new(NodeRole::Surface);
        node.client = client;
        node.content = content;
        self.nodes.insert(node)
    }

    /// Add an embedded frame under `parent`.
    pub fn add_frame(&mut self, parent: NodeId, client: Size, content: Size) -> NodeId {
        let mut node = Node::new(NodeRole::Frame);
        node.client = client;
        node.content = content;
        let frame = self.nodes.insert(node);
        self.append_child(parent, frame);
        frame
    }

    /// Declare that `viewport` holds the authoritative scroll offset of `node`.
    pub fn set_viewport(&mut self, node: NodeId, viewport: NodeId) {
        self.viewports.insert(node, viewport);
    }

    pub fn set_client_size(&mut self, node: NodeId, client: Size) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.client = client;
            n.clamp_scroll();
        }
    }

    pub fn set_content_size(&mut self, node: NodeId, content: Size) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.content = content;
            n.clamp_scroll();
        }
    }

    /// Override the outer size (defaults to the client size).
    pub fn set_outer_size(&mut self, node: NodeId, outer: Size) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.outer = Some(outer);
        }
    }

    pub fn set_screen_offset(&mut self, node: NodeId, offset: Point) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.screen_offset = offset;
        }
    }

    pub fn role(&self, node: NodeId) -> Option<NodeRole> {
        self.nodes.get(node).map(|n| n.role)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn style(&self, element: NodeId, prop: StyleProp) -> Option<Length> {
        self.nodes
            .get(element)
            .and_then(|n| n.styles.get(&prop).copied())
    }

    pub fn flag(&self, element: NodeId, flag: Flag) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|n| n.flags.contains(&flag))
    }

    pub fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|n| n.classes.contains(class))
    }

    pub fn is_listening(&self, binding: &Binding) -> bool {
        self.listeners.contains(binding)
    }

    /// Whether anything listens for `kind` on `target`.
    pub fn has_listener(&self, target: ListenTarget, kind: InputKind) -> bool {
        self.listeners
            .iter()
            .any(|b| b.target == target && b.kind == kind)
    }

    pub fn is_observed(&self, target: NodeId) -> bool {
        self.observers.values().any(|targets| targets.contains(&target))
    }

    /// Delay of the pending timer for `token`, if any.
    pub fn scheduled(&self, token: TimerToken) -> Option<Duration> {
        self.timers.get(&token).copied()
    }

    /// Queue every pending timer as a notification.
    pub fn fire_timers(&mut self) {
        let mut tokens: Vec<_> = self.timers.drain().collect();
        tokens.sort_by_key(|(_, after)| *after);
        for (token, _) in tokens {
            self.pending.push_back(PlatformEvent::Timer(token));
        }
    }

    /// Queue an arbitrary notification.
    pub fn push(&mut self, event: PlatformEvent) {
        self.pending.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn notify(&mut self, target: NodeId, record: MutationRecord) {
        if self.is_observed(target) {
            tracing::trace!(?target, ?record, "mutation queued");
            self.pending.push_back(PlatformEvent::Mutation {
                observed: target,
                record,
            });
        }
    }

    /// Length of the surface a track spans.
    fn track_length(&self, track: NodeId, axis: Axis) -> f32 {
        self.nodes
            .get(track)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .map(|p| p.client.along(axis))
            .unwrap_or(0.0)
    }

    fn thumb_geometry(&self, thumb: NodeId, axis: Axis) -> (f32, f32) {
        let Some(node) = self.nodes.get(thumb) else {
            return (0.0, 0.0);
        };
        let track_len = node
            .parent
            .map(|track| self.track_length(track, axis))
            .unwrap_or(0.0);
        let extent = node
            .styles
            .get(&axis.extent_prop())
            .map(|l| l.resolve(track_len))
            .unwrap_or(track_len);
        let offset = node
            .styles
            .get(&axis.start_prop())
            .map(|l| l.resolve(track_len))
            .unwrap_or(0.0);
        (offset, extent)
    }

    fn element_size(&self, node: NodeId, outer: bool) -> Size {
        let Some(n) = self.nodes.get(node) else {
            return Size::ZERO;
        };
        let thickness = self.config.track_thickness;
        match n.role {
            NodeRole::Surface | NodeRole::Frame => {
                if outer {
                    n.outer.unwrap_or(n.client)
                } else {
                    n.client
                }
            }
            NodeRole::Track(axis) => {
                Size::new(thickness, thickness).with(axis, self.track_length(node, axis))
            }
            NodeRole::Thumb(axis) => {
                let (_, extent) = self.thumb_geometry(node, axis);
                Size::new(thickness, thickness).with(axis, extent)
            }
        }
    }
}

impl GeometryProvider for HeadlessPlatform {
    fn client_size(&self, node: NodeId) -> Size {
        self.element_size(node, false)
    }

    fn content_size(&self, node: NodeId) -> Size {
        match self.nodes.get(node) {
            Some(n) if matches!(n.role, NodeRole::Surface | NodeRole::Frame) => Size::new(
                n.content.width.max(n.client.width),
                n.content.height.max(n.client.height),
            ),
            Some(_) => self.element_size(node, false),
            None => Size::ZERO,
        }
    }

    fn outer_size(&self, node: NodeId) -> Size {
        self.element_size(node, true)
    }

    fn layout_offset(&self, node: NodeId) -> Point {
        match self.nodes.get(node).map(|n| n.role) {
            Some(NodeRole::Thumb(axis)) => {
                let (offset, _) = self.thumb_geometry(node, axis);
                Point::ZERO.with(axis, offset)
            }
            _ => Point::ZERO,
        }
    }

    fn scroll_offset(&self, node: NodeId) -> Point {
        self.nodes.get(node).map(|n| n.scroll).unwrap_or_default()
    }

    fn screen_offset(&self, node: NodeId) -> Point {
        let mut offset = Point::ZERO;
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.nodes.get(id) else { break };
            offset.x += n.screen_offset.x;
            offset.y += n.screen_offset.y;
            current = n.parent;
        }
        offset
    }

    fn viewport_of(&self, node: NodeId) -> NodeId {
        self.viewports.get(&node).copied().unwrap_or(node)
    }

    fn element_at(&self, point: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.role == NodeRole::Surface)
            .filter(|(id, n)| {
                let origin = self.screen_offset(*id);
                point.x >= origin.x
                    && point.y >= origin.y
                    && point.x < origin.x + n.client.width
                    && point.y < origin.y + n.client.height
            })
            .map(|(id, _)| id)
            .last()
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn embedded_frames(&self, node: NodeId) -> SmallVec<[NodeId; 2]> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.role(*child) == Some(NodeRole::Frame))
            .collect()
    }

    fn frame_content_size(&self, frame: NodeId) -> Size {
        self.nodes.get(frame).map(|n| n.content).unwrap_or_default()
    }
}

impl ElementHost for HeadlessPlatform {
    fn set_scroll_offset(&mut self, node: NodeId, axis: Axis, value: f32) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.scroll = n.scroll.with(axis, value);
            n.clamp_scroll();
        }
    }

    fn create_element(&mut self, kind: ElementKind) -> NodeId {
        let (role, class) = match kind {
            ElementKind::Track(axis) => (NodeRole::Track(axis), "track"),
            ElementKind::Thumb(axis) => (NodeRole::Thumb(axis), "thumb"),
        };
        let mut node = Node::new(role);
        node.classes.insert(class.to_string());
        if let ElementKind::Track(axis) = kind {
            node.classes.insert(axis.as_str().to_string());
        }
        self.nodes.insert(node)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            tracing::warn!(?parent, ?child, "append on unknown node");
            return;
        }
        if let Some(old) = self.parent(child) {
            if let Some(n) = self.nodes.get_mut(old) {
                n.children.retain(|c| *c != child);
            }
        }
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.notify(parent, MutationRecord::ChildList);
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(p) = self.nodes.get_mut(parent) else {
            return;
        };
        let before = p.children.len();
        p.children.retain(|c| *c != child);
        if p.children.len() == before {
            return;
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        self.notify(parent, MutationRecord::ChildList);
    }

    fn set_style(&mut self, element: NodeId, prop: StyleProp, value: Length) {
        if let Some(n) = self.nodes.get_mut(element) {
            n.styles.insert(prop, value);
        }
    }

    fn set_flag(&mut self, element: NodeId, flag: Flag, on: bool) {
        if let Some(n) = self.nodes.get_mut(element) {
            if on {
                n.flags.insert(flag);
            } else {
                n.flags.remove(&flag);
            }
        }
    }

    fn set_class(&mut self, element: NodeId, class: &str, on: bool) {
        if let Some(n) = self.nodes.get_mut(element) {
            if on {
                n.classes.insert(class.to_string());
            } else {
                n.classes.remove(class);
            }
        }
    }

    fn scroll_axes(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node).and_then(|n| n.scroll_axes.clone())
    }

    fn set_scroll_axes(&mut self, node: NodeId, axes: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.scroll_axes = Some(axes.to_string());
        }
        self.notify(node, MutationRecord::Attribute);
    }

    fn resize_marker(&self, node: NodeId) -> Option<Point> {
        self.nodes.get(node).and_then(|n| n.resize_marker)
    }

    fn set_resize_marker(&mut self, node: NodeId, delta: Point) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.resize_marker = Some(delta);
        }
        self.notify(node, MutationRecord::ResizeMarker);
    }
}

impl ListenerHost for HeadlessPlatform {
    fn listen(&mut self, binding: Binding) {
        self.listeners.insert(binding);
    }

    fn unlisten(&mut self, binding: Binding) {
        self.listeners.remove(&binding);
    }

    fn observe(&mut self, observer: NodeId, target: NodeId) {
        let targets = self.observers.entry(observer).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    fn disconnect(&mut self, observer: NodeId) {
        self.observers.remove(&observer);
    }

    fn schedule(&mut self, token: TimerToken, after: Duration) {
        tracing::trace!(owner = ?token.owner, ?after, "timer scheduled");
        self.timers.insert(token, after);
    }

    fn cancel(&mut self, token: TimerToken) {
        self.timers.remove(&token);
    }
}

impl NotificationSource for HeadlessPlatform {
    fn next_notification(&mut self) -> Option<PlatformEvent> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(platform: &mut HeadlessPlatform) -> NodeId {
        platform.add_surface(Size::new(400.0, 300.0), Size::new(800.0, 900.0))
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut platform = HeadlessPlatform::default();
        let node = surface(&mut platform);

        platform.set_scroll_offset(node, Axis::Y, 10_000.0);
        assert_eq!(platform.scroll_offset(node).y, 600.0);

        platform.set_scroll_offset(node, Axis::X, -5.0);
        assert_eq!(platform.scroll_offset(node).x, 0.0);
    }

    #[test]
    fn test_resize_reclamps_scroll() {
        let mut platform = HeadlessPlatform::default();
        let node = surface(&mut platform);
        platform.set_scroll_offset(node, Axis::Y, 600.0);

        platform.set_client_size(node, Size::new(400.0, 350.0));
        assert_eq!(platform.scroll_offset(node).y, 550.0);
    }

    #[test]
    fn test_thumb_geometry_follows_styles() {
        let mut platform = HeadlessPlatform::default();
        let node = surface(&mut platform);
        let track = platform.create_element(ElementKind::Track(Axis::Y));
        let thumb = platform.create_element(ElementKind::Thumb(Axis::Y));
        platform.append_child(track, thumb);
        platform.append_child(node, track);

        platform.set_style(thumb, StyleProp::Height, Length::Percent(50.0));
        platform.set_style(thumb, StyleProp::Top, Length::Percent(25.0));

        assert_eq!(platform.client_size(track).height, 300.0);
        assert_eq!(platform.client_size(track).width, 10.0);
        assert_eq!(platform.outer_size(thumb).height, 150.0);
        assert_eq!(platform.layout_offset(thumb).y, 75.0);
        assert!(platform.has_class(track, "track"));
        assert!(platform.has_class(track, "y"));
    }

    #[test]
    fn test_observed_mutations_are_queued() {
        let mut platform = HeadlessPlatform::default();
        let node = surface(&mut platform);
        let track = platform.create_element(ElementKind::Track(Axis::X));

        platform.append_child(node, track);
        assert_eq!(platform.pending(), 0);

        platform.observe(node, node);
        platform.remove_child(node, track);
        platform.set_resize_marker(node, Point::new(0.0, 5.0));

        assert_eq!(
            platform.next_notification(),
            Some(PlatformEvent::Mutation {
                observed: node,
                record: MutationRecord::ChildList
            })
        );
        assert_eq!(
            platform.next_notification(),
            Some(PlatformEvent::Mutation {
                observed: node,
                record: MutationRecord::ResizeMarker
            })
        );
        assert_eq!(platform.next_notification(), None);

        platform.disconnect(node);
        platform.append_child(node, track);
        assert_eq!(platform.pending(), 0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let mut platform = HeadlessPlatform::default();
        let node = surface(&mut platform);
        let track = platform.create_element(ElementKind::Track(Axis::X));
        let thumb = platform.create_element(ElementKind::Thumb(Axis::X));
        platform.append_child(track, thumb);
        platform.append_child(node, track);

        assert!(platform.contains(node, node));
        assert!(platform.contains(node, thumb));
        assert!(!platform.contains(thumb, track));
    }

    #[test]
    fn test_timers() {
        let mut platform = HeadlessPlatform::default();
        let node = surface(&mut platform);
        let token = TimerToken { owner: node };

        platform.schedule(token, Duration::from_millis(30));
        assert_eq!(platform.scheduled(token), Some(Duration::from_millis(30)));

        platform.fire_timers();
        assert_eq!(platform.scheduled(token), None);
        assert_eq!(platform.next_notification(), Some(PlatformEvent::Timer(token)));
    }
}

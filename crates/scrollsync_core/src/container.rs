//! Scroll container
//!
//! A [`Container`] wraps one scrollable surface. It owns the surface's
//! metrics and up to one [`Scrollbar`] per axis, turns platform input into
//! scrollbar updates, and emits [`ScrollEvent`]s to its subscribers.
//!
//! Metrics are written only by [`Container::update_dimensions`]; every
//! other operation reads them.

use scrollsync_platform::{
    Axis, Binding, InputKind, Length, MutationRecord, NodeId, Platform, PlatformEvent, Point,
    PointerEvent, Size, StyleProp, TimerToken,
};
use smallvec::SmallVec;

use crate::autoscroll::{EdgeAutoScroll, EdgeBounds};
use crate::config::{ResizeSource, ScrollbarConfig};
use crate::error::{Result, ScrollError};
use crate::events::{EventDispatcher, EventHandler, EventKind, ScrollEvent};
use crate::scrollbar::{ScrollInput, Scrollbar, SurfaceView};
use crate::state::{advance, ContainerState, LifecycleEvent};
use crate::wheel::{normalize, NormalizedWheel};

/// Class set on surfaces scrolling on both axes
pub const DUO_CLASS: &str = "duo";

/// Last measured geometry of a surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    /// Viewport client width
    pub width: f32,
    /// Viewport client height
    pub height: f32,
    pub content: Size,
    /// Scrollable range per axis
    pub scrollable_content: Point,
    /// Visible fraction of the content per axis
    pub window_content_ratio: Point,
    /// Screen offset of the surface
    pub offset: Point,
}

impl Metrics {
    fn measure<P: Platform + ?Sized>(platform: &P, node: NodeId, viewport: NodeId) -> Self {
        let client = platform.client_size(viewport);
        let content = platform.content_size(viewport);
        let mut metrics = Self {
            width: client.width,
            height: client.height,
            content,
            offset: platform.screen_offset(node),
            ..Self::default()
        };
        for axis in Axis::ALL {
            let range = (content.along(axis) - client.along(axis)).max(0.0);
            let ratio = if content.along(axis) > 0.0 {
                client.along(axis) / content.along(axis)
            } else {
                0.0
            };
            metrics.scrollable_content = metrics.scrollable_content.with(axis, range);
            metrics.window_content_ratio = metrics.window_content_ratio.with(axis, ratio);
        }
        metrics
    }

    pub fn client(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Scrollable range along `axis`
    pub fn scrollable(&self, axis: Axis) -> f32 {
        self.scrollable_content.along(axis)
    }
}

/// Parse a scroll-axes attribute such as `"x, y"`.
///
/// Unknown tokens are skipped with a warning and duplicates collapse.
pub fn parse_axes(attr: &str) -> SmallVec<[Axis; 2]> {
    let mut axes = SmallVec::new();
    for token in attr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<Axis>() {
            Ok(axis) if !axes.contains(&axis) => axes.push(axis),
            Ok(_) => {}
            Err(err) => tracing::warn!(token, %err, "ignoring scroll axis"),
        }
    }
    axes
}

fn format_axes(axes: &[Axis]) -> String {
    axes.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(",")
}

/// A scrollable surface with its custom scrollbars
#[derive(Debug)]
pub struct Container {
    node: NodeId,
    /// Element holding the authoritative scroll offset
    viewport: NodeId,
    config: ScrollbarConfig,
    metrics: Metrics,
    x: Option<Scrollbar>,
    y: Option<Scrollbar>,
    frames: SmallVec<[NodeId; 2]>,
    events: EventDispatcher,
    state: ContainerState,
    autoscroll: EdgeAutoScroll,
}

impl Container {
    /// Wrap `node`, creating scrollbars for the axes its scroll-axes
    /// attribute declares.
    pub fn new<P: Platform + ?Sized>(platform: &mut P, node: NodeId, config: ScrollbarConfig) -> Self {
        let viewport = platform.viewport_of(node);
        let axes = parse_axes(platform.scroll_axes(node).as_deref().unwrap_or_default());

        let mut container = Self {
            node,
            viewport,
            config,
            metrics: Metrics::measure(platform, node, viewport),
            x: None,
            y: None,
            frames: platform.embedded_frames(node),
            events: EventDispatcher::new(),
            state: ContainerState::Active,
            autoscroll: EdgeAutoScroll::default(),
        };

        tracing::debug!(?node, ?axes, "container created");
        container.create_scrollbars(platform, &axes);
        container
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn viewport(&self) -> NodeId {
        self.viewport
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn config(&self) -> &ScrollbarConfig {
        &self.config
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn scrollbar(&self, axis: Axis) -> Option<&Scrollbar> {
        match axis {
            Axis::X => self.x.as_ref(),
            Axis::Y => self.y.as_ref(),
        }
    }

    /// Active axes, x first
    pub fn axes(&self) -> SmallVec<[Axis; 2]> {
        Axis::ALL
            .into_iter()
            .filter(|axis| self.scrollbar(*axis).is_some())
            .collect()
    }

    pub fn frames(&self) -> &[NodeId] {
        &self.frames
    }

    fn slot_mut(&mut self, axis: Axis) -> &mut Option<Scrollbar> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    fn scrollbars_mut(&mut self) -> impl Iterator<Item = &mut Scrollbar> {
        self.x.iter_mut().chain(self.y.iter_mut())
    }

    /// Scrollbar for `axis` together with the surface data it updates against
    fn split(&mut self, axis: Axis) -> Option<(&mut Scrollbar, SurfaceView<'_>)> {
        let Self {
            viewport,
            metrics,
            x,
            y,
            ..
        } = self;
        let (bar, sibling) = match axis {
            Axis::X => (x.as_mut()?, y.as_ref()),
            Axis::Y => (y.as_mut()?, x.as_ref()),
        };
        let view = SurfaceView {
            viewport: *viewport,
            metrics,
            sibling_bar: sibling.map(Scrollbar::track),
        };
        Some((bar, view))
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(ScrollError::Cleared)
        }
    }

    fn timer(&self) -> TimerToken {
        TimerToken { owner: self.node }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Subscribe to an event kind
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&ScrollEvent) + Send + Sync + 'static,
    {
        self.events.register(kind, handler);
    }

    /// Subscribe a handler shared with other containers
    pub fn on_shared(&mut self, kind: EventKind, handler: EventHandler) {
        self.events.register_shared(kind, handler);
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    fn emit_scrolling(&self, axis: Axis, target: Option<NodeId>) {
        if let Some(bar) = self.scrollbar(axis) {
            self.events.dispatch(&ScrollEvent::Scrolling {
                surface: self.node,
                axis,
                target,
                position: bar.position(),
            });
        }
    }

    // =========================================================================
    // Reflow
    // =========================================================================

    /// Create scrollbars for `axes` that do not have one yet, then reflow
    pub fn create_scrollbars<P: Platform + ?Sized>(&mut self, platform: &mut P, axes: &[Axis]) {
        for &axis in axes {
            let node = self.node;
            let slot = self.slot_mut(axis);
            if slot.is_none() {
                *slot = Some(Scrollbar::new(platform, node, axis));
            }
        }
        self.insert_scrollbars(platform);
        self.update_duo(platform);
    }

    /// Idempotent reflow: size frames, remeasure, attach missing bars and
    /// rebind listeners.
    pub fn insert_scrollbars<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        if !self.state.is_active() {
            return;
        }
        let node = self.node;
        platform.disconnect(node);

        self.frames = platform.embedded_frames(node);
        self.size_frames(platform);
        self.update_dimensions(platform, None);

        for bar in self.x.iter().chain(self.y.iter()) {
            if !platform.contains(node, bar.track()) {
                platform.append_child(node, bar.track());
            }
            bar.bind_idle(platform);
        }
        self.bind_surface(platform);

        platform.observe(node, node);
        for &frame in &self.frames {
            platform.observe(node, frame);
        }
        advance(&mut self.state, LifecycleEvent::Update);
    }

    fn bind_surface<P: Platform + ?Sized>(&self, platform: &mut P) {
        let node = self.node;
        platform.listen(Binding::element(self.viewport, InputKind::Wheel, node));
        for &frame in &self.frames {
            platform.listen(Binding::element(frame, InputKind::Wheel, node));
        }
        platform.listen(Binding::element(node, InputKind::PointerDown, node));
        if self.config.resize_source == ResizeSource::Poll {
            platform.listen(Binding::window(InputKind::WindowResize, node));
        }
    }

    /// Stretch embedded frames to their content where it exceeds the viewport
    fn size_frames<P: Platform + ?Sized>(&self, platform: &mut P) {
        for &frame in &self.frames {
            let content = platform.frame_content_size(frame);
            let height = if content.height > self.metrics.height {
                Length::Px(content.height)
            } else {
                Length::Percent(100.0)
            };
            let width = if content.width > self.metrics.width {
                Length::Px(content.width)
            } else {
                Length::Percent(100.0)
            };
            platform.set_style(frame, StyleProp::Height, height);
            platform.set_style(frame, StyleProp::Width, width);
        }
    }

    /// Remeasure the viewport and rewrite every scrollbar's geometry.
    ///
    /// `adjust` shrinks one axis' scrollable range on top of the fresh
    /// measurement, for hosts whose content extent lags their layout.
    pub fn update_dimensions<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        adjust: Option<(Axis, f32)>,
    ) {
        let mut metrics = Metrics::measure(platform, self.node, self.viewport);
        if let Some((axis, amount)) = adjust {
            let range = metrics.scrollable(axis) - amount;
            metrics.scrollable_content = metrics.scrollable_content.with(axis, range);
        }
        self.metrics = metrics;

        let scroll = platform.scroll_offset(self.viewport);
        let min_thumb = self.config.min_thumb_percent;

        for bar in self.scrollbars_mut() {
            let axis = bar.axis();
            let ratio = metrics.window_content_ratio.along(axis);
            let ratio = if ratio > 0.0 { ratio } else { 1.0 };
            let size = (ratio * 100.0).clamp(0.0, 100.0).max(min_thumb);

            let range = metrics.scrollable(axis);
            let offset = scroll.along(axis);
            let scrolled = if range > 0.0 {
                let scrollable = ((range - offset) / range * 100.0).clamp(0.0, 100.0);
                100.0 - scrollable
            } else {
                0.0
            };

            bar.redraw(platform, size, scrolled, offset);
        }

        tracing::trace!(
            node = ?self.node,
            width = metrics.width,
            height = metrics.height,
            range_x = metrics.scrollable_content.x,
            range_y = metrics.scrollable_content.y,
            "dimensions updated"
        );
    }

    /// React to a viewport size change.
    ///
    /// Each axis whose client extent changed gets the boundary correction
    /// against its remeasured range.
    pub fn resize_scrollbars<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        if !self.state.is_active() {
            return;
        }
        self.size_frames(platform);

        let resized = platform.resize_marker(self.node).unwrap_or(Point::ZERO);
        let previous = self.metrics.client();
        let client = platform.client_size(self.viewport);

        for axis in Axis::ALL {
            if client.along(axis) == previous.along(axis) {
                continue;
            }
            let Some((bar, view)) = self.split(axis) else {
                continue;
            };
            bar.resize_scrollbar(platform, &view, resized);
            self.update_dimensions(platform, None);
        }

        tracing::debug!(node = ?self.node, ?resized, "scrollbars resized");
        advance(&mut self.state, LifecycleEvent::Update);
    }

    /// Public reflow trigger after external content changes
    pub fn refresh<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<()> {
        self.ensure_active()?;
        self.insert_scrollbars(platform);
        Ok(())
    }

    // =========================================================================
    // Reconfiguration and teardown
    // =========================================================================

    /// Remove the scrollbar on `axis`, if any
    pub fn remove_scrollbar<P: Platform + ?Sized>(&mut self, platform: &mut P, axis: Axis) -> bool {
        match self.slot_mut(axis).take() {
            Some(bar) => {
                bar.detach(platform);
                tracing::debug!(node = ?self.node, %axis, "scrollbar removed");
                true
            }
            None => false,
        }
    }

    /// Tear down every scrollbar and rebuild with `axes`
    pub fn set_scrollbars<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        axes: &[Axis],
    ) -> Result<()> {
        self.ensure_active()?;
        for axis in Axis::ALL {
            self.remove_scrollbar(platform, axis);
        }

        let mut unique: SmallVec<[Axis; 2]> = SmallVec::new();
        for &axis in axes {
            if !unique.contains(&axis) {
                unique.push(axis);
            }
        }
        platform.set_scroll_axes(self.node, &format_axes(&unique));
        self.create_scrollbars(platform, &unique);
        Ok(())
    }

    fn update_duo<P: Platform + ?Sized>(&self, platform: &mut P) {
        let duo = self.x.is_some() && self.y.is_some();
        platform.set_class(self.node, DUO_CLASS, duo);
    }

    /// Disconnect observation, remove all visuals and listeners. Terminal.
    pub fn clear<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<()> {
        self.ensure_active()?;
        let node = self.node;

        platform.disconnect(node);
        for axis in Axis::ALL {
            self.remove_scrollbar(platform, axis);
        }
        self.stop_autoscroll(platform);

        platform.unlisten(Binding::element(self.viewport, InputKind::Wheel, node));
        for &frame in &self.frames {
            platform.unlisten(Binding::element(frame, InputKind::Wheel, node));
        }
        platform.unlisten(Binding::element(node, InputKind::PointerDown, node));
        platform.unlisten(Binding::window(InputKind::WindowResize, node));
        platform.set_class(node, DUO_CLASS, false);

        advance(&mut self.state, LifecycleEvent::Clear);
        tracing::debug!(?node, "container cleared");
        Ok(())
    }

    // =========================================================================
    // Programmatic access
    // =========================================================================

    /// Jump `axis` to an internal position (100 = start, 0 = end)
    pub fn scroll_to<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        axis: Axis,
        position: f32,
    ) -> Result<f32> {
        self.ensure_active()?;
        let (bar, view) = self.split(axis).ok_or(ScrollError::AxisNotActive(axis))?;
        let offset = bar.jump_to(platform, &view, position);
        let track = bar.track();
        self.emit_scrolling(axis, Some(track));
        Ok(offset)
    }

    /// Percent scrolled from the start along `axis`
    pub fn position(&self, axis: Axis) -> Result<f32> {
        self.ensure_active()?;
        self.scrollbar(axis)
            .map(Scrollbar::percent_scrolled)
            .ok_or(ScrollError::AxisNotActive(axis))
    }

    /// Move `axis` by a relative input, emitting `scrolling` when it applies
    pub fn scroll<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        axis: Axis,
        input: ScrollInput,
        target: Option<NodeId>,
    ) -> Option<f32> {
        if !self.state.is_active() {
            return None;
        }
        let (bar, view) = self.split(axis)?;
        let offset = bar.scroll(platform, &view, input)?;
        self.emit_scrolling(axis, target);
        Some(offset)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle a platform event addressed to this container.
    ///
    /// Returns whether the event changed anything.
    pub fn handle<P: Platform + ?Sized>(&mut self, platform: &mut P, event: &PlatformEvent) -> bool {
        if !self.state.is_active() {
            return false;
        }

        match event {
            PlatformEvent::Wheel { target, wheel } => {
                if *target == self.viewport || self.frames.contains(target) {
                    self.wheel(platform, normalize(wheel), *target)
                } else {
                    false
                }
            }
            PlatformEvent::PointerDown(pointer) => self.pointer_down(platform, pointer),
            PlatformEvent::PointerMove(pointer) => self.pointer_move(platform, pointer),
            PlatformEvent::PointerUp(_) => self.pointer_up(platform),
            PlatformEvent::Click(pointer) => self.track_click(platform, pointer),
            PlatformEvent::Mutation { observed, record } => {
                if *observed != self.node && !self.frames.contains(observed) {
                    return false;
                }
                match record {
                    MutationRecord::ChildList => {
                        self.insert_scrollbars(platform);
                        true
                    }
                    MutationRecord::ResizeMarker => {
                        self.resize_scrollbars(platform);
                        true
                    }
                    MutationRecord::Attribute => false,
                }
            }
            PlatformEvent::Resized { node } if *node == self.node => {
                self.resize_scrollbars(platform);
                true
            }
            PlatformEvent::Timer(token) if *token == self.timer() => {
                self.autoscroll_step(platform)
            }
            _ => false,
        }
    }

    fn wheel<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        wheel: NormalizedWheel,
        target: NodeId,
    ) -> bool {
        if wheel.is_zero() {
            return false;
        }
        let mut moved = false;
        for axis in Axis::ALL {
            if wheel.spin(axis) != 0.0 {
                moved |= self
                    .scroll(platform, axis, ScrollInput::Wheel(wheel), Some(target))
                    .is_some();
            }
        }
        moved
    }

    fn thumb_axis(&self, element: NodeId) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|axis| self.scrollbar(*axis).is_some_and(|bar| bar.thumb() == element))
    }

    fn pointer_down<P: Platform + ?Sized>(&mut self, platform: &mut P, pointer: &PointerEvent) -> bool {
        if let Some(axis) = self.thumb_axis(pointer.target) {
            return match self.slot_mut(axis) {
                Some(bar) => bar.start(platform, pointer),
                None => false,
            };
        }

        if !pointer.is_primary() || !platform.contains(self.node, pointer.target) {
            return false;
        }
        self.autoscroll.arm(pointer.position);
        platform.listen(Binding::window(InputKind::PointerMove, self.node));
        platform.listen(Binding::window(InputKind::PointerUp, self.node));
        true
    }

    fn pointer_move<P: Platform + ?Sized>(&mut self, platform: &mut P, pointer: &PointerEvent) -> bool {
        let mut moved = false;
        for axis in Axis::ALL {
            if self.scrollbar(axis).is_some_and(Scrollbar::is_dragging) {
                let coord = pointer.position.along(axis);
                moved |= self
                    .scroll(platform, axis, ScrollInput::Pointer(coord), Some(pointer.target))
                    .is_some();
            }
        }

        if self.autoscroll.is_armed() {
            let bounds = EdgeBounds {
                origin: self.metrics.offset,
                width: self.metrics.width,
                height: self.metrics.height,
                margin: self.config.edge_margin,
            };
            let eligible: SmallVec<[Axis; 2]> = Axis::ALL
                .into_iter()
                .filter(|axis| {
                    self.scrollbar(*axis)
                        .is_some_and(|bar| !platform.contains(bar.track(), pointer.target))
                })
                .collect();
            let was_running = self.autoscroll.is_running();
            let started =
                self.autoscroll
                    .track(pointer.position, bounds, |axis| eligible.contains(&axis));

            if started.is_some() {
                moved |= self.autoscroll_step(platform);
            } else if was_running && !self.autoscroll.is_running() {
                platform.cancel(self.timer());
            }
        }
        moved
    }

    fn pointer_up<P: Platform + ?Sized>(&mut self, platform: &mut P) -> bool {
        let mut released = false;
        for bar in self.scrollbars_mut() {
            released |= bar.stop(platform);
        }
        if self.autoscroll.is_armed() {
            self.stop_autoscroll(platform);
            released = true;
        }
        released
    }

    fn track_click<P: Platform + ?Sized>(&mut self, platform: &mut P, pointer: &PointerEvent) -> bool {
        // Track clicks are only live while no thumb is held
        if self.x.iter().chain(self.y.iter()).any(Scrollbar::is_dragging) {
            return false;
        }
        let Some(axis) = Axis::ALL.into_iter().find(|axis| {
            self.scrollbar(*axis)
                .is_some_and(|bar| platform.contains(bar.track(), pointer.target))
        }) else {
            return false;
        };

        let Some((bar, view)) = self.split(axis) else {
            return false;
        };
        if bar.scroll_to(platform, &view, pointer).is_none() {
            return false;
        }
        let track = bar.track();
        self.emit_scrolling(axis, Some(track));
        true
    }

    fn stop_autoscroll<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        platform.cancel(self.timer());
        platform.unlisten(Binding::window(InputKind::PointerMove, self.node));
        platform.unlisten(Binding::window(InputKind::PointerUp, self.node));
        self.autoscroll.disarm();
    }

    /// One edge auto-scroll step; reschedules itself while the run lasts
    fn autoscroll_step<P: Platform + ?Sized>(&mut self, platform: &mut P) -> bool {
        let Some((axis, delta)) = self.autoscroll.step() else {
            platform.cancel(self.timer());
            return false;
        };

        self.scroll(platform, axis, ScrollInput::Delta(delta), None);

        let target = platform.element_at(self.autoscroll.pointer());
        self.events.dispatch(&ScrollEvent::DragScroll {
            surface: self.node,
            target,
        });

        let delay = self.autoscroll.delay(self.config.autoscroll_ms_per_px);
        platform.schedule(self.timer(), delay);
        tracing::trace!(node = ?self.node, %axis, delta, ?delay, "edge auto-scroll step");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use scrollsync_platform::headless::HeadlessPlatform;
    use scrollsync_platform::{ElementHost, Flag, GeometryProvider, ListenTarget, RawWheel};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn setup(axes: &str) -> (HeadlessPlatform, Container) {
        let mut platform = HeadlessPlatform::default();
        let node = platform.add_surface(Size::new(400.0, 300.0), Size::new(800.0, 900.0));
        platform.set_scroll_axes(node, axes);
        let container = Container::new(&mut platform, node, ScrollbarConfig::default());
        (platform, container)
    }

    #[test]
    fn test_parse_axes_is_lenient() {
        assert_eq!(parse_axes(" y , x,y").as_slice(), &[Axis::Y, Axis::X]);
        assert_eq!(parse_axes("x,z").as_slice(), &[Axis::X]);
        assert!(parse_axes("").is_empty());
    }

    #[test]
    fn test_initial_metrics() {
        let (platform, container) = setup("x,y");
        let metrics = container.metrics();
        assert_eq!(metrics.scrollable_content, Point::new(400.0, 600.0));
        assert!(approx(metrics.window_content_ratio.x, 0.5));
        assert!(approx(metrics.window_content_ratio.y, 1.0 / 3.0));

        let x = container.scrollbar(Axis::X).unwrap();
        let y = container.scrollbar(Axis::Y).unwrap();
        assert_eq!(platform.style(x.thumb(), StyleProp::Width), Some(Length::Percent(50.0)));
        match platform.style(y.thumb(), StyleProp::Height) {
            Some(Length::Percent(size)) => assert!(approx(size, 100.0 / 3.0)),
            other => panic!("unexpected thumb height {other:?}"),
        }
        assert!(platform.has_class(container.node(), DUO_CLASS));
        assert_eq!(container.position(Axis::Y).unwrap(), 0.0);
    }

    #[test]
    fn test_small_ratio_uses_min_thumb() {
        let mut platform = HeadlessPlatform::default();
        let node = platform.add_surface(Size::new(400.0, 100.0), Size::new(400.0, 5000.0));
        platform.set_scroll_axes(node, "y");
        let container = Container::new(&mut platform, node, ScrollbarConfig::default());

        let thumb = container.scrollbar(Axis::Y).unwrap().thumb();
        assert_eq!(platform.style(thumb, StyleProp::Height), Some(Length::Percent(8.0)));
        assert!(!platform.flag(thumb, Flag::Hidden));
    }

    #[test]
    fn test_content_fits_hides_thumb() {
        let mut platform = HeadlessPlatform::default();
        let node = platform.add_surface(Size::new(400.0, 300.0), Size::new(400.0, 300.0));
        platform.set_scroll_axes(node, "y");
        let container = Container::new(&mut platform, node, ScrollbarConfig::default());

        let bar = container.scrollbar(Axis::Y).unwrap();
        assert!(platform.flag(bar.thumb(), Flag::Hidden));
        assert_eq!(bar.position(), 100.0);
        assert!(!platform.has_class(node, DUO_CLASS));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let (mut platform, mut container) = setup("x,y");
        let node = container.node();
        let thumb = container.scrollbar(Axis::Y).unwrap().thumb();
        let children = platform.children(node).to_vec();
        let size = platform.style(thumb, StyleProp::Height);
        let offset = platform.style(thumb, StyleProp::Top);

        container.insert_scrollbars(&mut platform);
        container.insert_scrollbars(&mut platform);

        assert_eq!(platform.children(node), children.as_slice());
        assert_eq!(platform.style(thumb, StyleProp::Height), size);
        assert_eq!(platform.style(thumb, StyleProp::Top), offset);
    }

    #[test]
    fn test_scroll_to_round_trip() {
        let (mut platform, mut container) = setup("x,y");
        for p in [0.0_f32, 12.5, 37.0, 50.0, 99.0, 100.0] {
            let offset = container.scroll_to(&mut platform, Axis::Y, p).unwrap();
            assert!(approx(container.position(Axis::Y).unwrap(), 100.0 - p));
            assert_eq!(offset, (600.0_f32 / 100.0 * (100.0 - p)).floor());
            assert_eq!(platform.scroll_offset(container.node()).y, offset);
        }
    }

    #[test]
    fn test_scroll_to_missing_axis() {
        let (mut platform, mut container) = setup("y");
        assert_eq!(
            container.scroll_to(&mut platform, Axis::X, 50.0),
            Err(ScrollError::AxisNotActive(Axis::X))
        );
        assert_eq!(container.position(Axis::X), Err(ScrollError::AxisNotActive(Axis::X)));
    }

    #[test]
    fn test_cross_axis_coupling() {
        let (mut platform, mut container) = setup("x,y");
        let x_track = container.scrollbar(Axis::X).unwrap().track();
        let y_track = container.scrollbar(Axis::Y).unwrap().track();

        let offset = container.scroll_to(&mut platform, Axis::Y, 30.0).unwrap();
        assert_eq!(platform.style(x_track, StyleProp::Bottom), Some(Length::Px(-offset)));

        let offset = container.scroll_to(&mut platform, Axis::X, 80.0).unwrap();
        assert_eq!(platform.style(y_track, StyleProp::Right), Some(Length::Px(-offset)));
    }

    #[test]
    fn test_wheel_emits_scrolling() {
        let (mut platform, mut container) = setup("x,y");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        container.on(EventKind::Scrolling, move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let node = container.node();
        let handled = container.handle(
            &mut platform,
            &PlatformEvent::Wheel {
                target: node,
                wheel: RawWheel::pixels(0.0, 30.0),
            },
        );

        assert!(handled);
        assert!(platform.scroll_offset(node).y > 0.0);
        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            ScrollEvent::Scrolling { axis: Axis::Y, position, .. } if position < 100.0
        ));
    }

    #[test]
    fn test_set_scrollbars_rebuilds() {
        let (mut platform, mut container) = setup("x,y");
        let node = container.node();
        let old_track = container.scrollbar(Axis::X).unwrap().track();

        container.set_scrollbars(&mut platform, &[Axis::Y, Axis::Y]).unwrap();

        assert_eq!(container.axes().as_slice(), &[Axis::Y]);
        assert!(!platform.contains(node, old_track));
        assert!(!platform.has_class(node, DUO_CLASS));
        assert_eq!(platform.scroll_axes(node).as_deref(), Some("y"));
        assert_eq!(platform.children(node).len(), 1);
    }

    #[test]
    fn test_clear_is_terminal() {
        let (mut platform, mut container) = setup("x,y");
        let node = container.node();
        container.clear(&mut platform).unwrap();

        assert!(platform.children(node).is_empty());
        assert!(!platform.is_observed(node));
        assert!(!platform.has_listener(ListenTarget::Element(node), InputKind::Wheel));
        assert_eq!(container.state(), ContainerState::Cleared);
        assert_eq!(container.clear(&mut platform), Err(ScrollError::Cleared));
        assert_eq!(container.position(Axis::Y), Err(ScrollError::Cleared));
        assert!(!container.handle(
            &mut platform,
            &PlatformEvent::Wheel {
                target: node,
                wheel: RawWheel::pixels(0.0, 30.0),
            },
        ));
    }

    #[test]
    fn test_frames_are_sized_and_listened() {
        let mut platform = HeadlessPlatform::default();
        let node = platform.add_surface(Size::new(400.0, 300.0), Size::new(800.0, 900.0));
        let frame = platform.add_frame(node, Size::new(400.0, 300.0), Size::new(200.0, 1200.0));
        platform.set_scroll_axes(node, "y");
        let container = Container::new(&mut platform, node, ScrollbarConfig::default());

        assert_eq!(container.frames(), &[frame]);
        assert_eq!(platform.style(frame, StyleProp::Height), Some(Length::Px(1200.0)));
        assert_eq!(platform.style(frame, StyleProp::Width), Some(Length::Percent(100.0)));
        assert!(platform.is_listening(&Binding::element(frame, InputKind::Wheel, node)));
        assert!(platform.is_observed(frame));
    }
}

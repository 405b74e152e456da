//! Single-axis scrollbar
//!
//! A scrollbar owns a track/thumb pair and the authoritative `position` of
//! its axis. Position runs from 100 (scroll offset 0, the start) down to 0
//! (scroll offset at its maximum, the end). Every update path converges on
//! [`Scrollbar::apply_position`], which writes the real scroll offset back
//! to the surface and redraws the thumb.
//!
//! # Input families
//!
//! - **Pointer drag**: the pointer coordinate is turned into a new thumb
//!   offset, so `position = 100 - scrolled`
//! - **Wheel / synthetic delta**: the delta is a scroll intent, so
//!   `position = position - delta` (in percent of thumb travel)
//! - **Track click**: jumps so the thumb centers under the pointer
//!
//! Drag and track-click listeners are mutually exclusive: an idle scrollbar
//! binds thumb press and track click, a dragging one binds window-wide
//! pointer move and release.

use scrollsync_platform::{
    Axis, Binding, ElementKind, Flag, InputKind, Length, NodeId, Platform, Point, PointerEvent,
};

use crate::container::Metrics;
use crate::state::{advance, DragEvent, DragPhase};
use crate::wheel::NormalizedWheel;

/// Lowest position (scroll offset at its maximum)
pub const POSITION_END: f32 = 0.0;
/// Highest position (scroll offset 0)
pub const POSITION_START: f32 = 100.0;

/// Input that moves a scrollbar relative to where it is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollInput {
    Wheel(NormalizedWheel),
    /// Pointer coordinate along the axis during a thumb drag
    Pointer(f32),
    /// Synthetic drag delta in pixels of thumb travel, positive towards the end
    Delta(f32),
}

/// Surface data a scrollbar reads while updating
#[derive(Debug, Clone, Copy)]
pub(crate) struct SurfaceView<'a> {
    pub viewport: NodeId,
    pub metrics: &'a Metrics,
    /// Track of the perpendicular scrollbar, if any
    pub sibling_bar: Option<NodeId>,
}

#[derive(Debug, Clone, Copy)]
enum ThumbPlacement {
    /// Derived from position
    Proportional,
    /// Pixel offset from the track start
    Px(f32),
}

fn clamp_position(value: f32) -> f32 {
    if value.is_nan() {
        return POSITION_END;
    }
    value.clamp(POSITION_END, POSITION_START)
}

/// A scrollbar for one axis of a container
#[derive(Debug)]
pub struct Scrollbar {
    axis: Axis,
    /// Owning container's surface, by identity only
    surface: NodeId,
    track: NodeId,
    thumb: NodeId,
    position: f32,
    /// Pointer coordinate at drag start
    start_position: f32,
    /// Thumb pixel offset at drag start
    thumb_start: f32,
    drag: DragPhase,
}

impl Scrollbar {
    /// Create the track/thumb pair. Attaching to the surface is left to the
    /// container's reflow.
    pub(crate) fn new<P: Platform + ?Sized>(platform: &mut P, surface: NodeId, axis: Axis) -> Self {
        let track = platform.create_element(ElementKind::Track(axis));
        let thumb = platform.create_element(ElementKind::Thumb(axis));
        platform.append_child(track, thumb);

        Self {
            axis,
            surface,
            track,
            thumb,
            position: POSITION_START,
            start_position: 0.0,
            thumb_start: 0.0,
            drag: DragPhase::Idle,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn surface(&self) -> NodeId {
        self.surface
    }

    /// Track element, which is also the positioned bar
    pub fn track(&self) -> NodeId {
        self.track
    }

    pub fn thumb(&self) -> NodeId {
        self.thumb
    }

    /// Internal position: 100 at the start, 0 at the end
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Percent scrolled from the start
    pub fn percent_scrolled(&self) -> f32 {
        POSITION_START - self.position
    }

    pub fn start_position(&self) -> f32 {
        self.start_position
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag
    }

    /// Track length and thumb length along the axis
    fn extents<P: Platform + ?Sized>(&self, platform: &P) -> (f32, f32) {
        (
            platform.client_size(self.track).along(self.axis),
            platform.outer_size(self.thumb).along(self.axis),
        )
    }

    // =========================================================================
    // Listener sets
    // =========================================================================

    fn press_binding(&self) -> Binding {
        Binding::element(self.thumb, InputKind::PointerDown, self.thumb)
    }

    fn click_binding(&self) -> Binding {
        Binding::element(self.track, InputKind::Click, self.track)
    }

    fn move_binding(&self) -> Binding {
        Binding::window(InputKind::PointerMove, self.thumb)
    }

    fn release_binding(&self) -> Binding {
        Binding::window(InputKind::PointerUp, self.thumb)
    }

    /// Bind the idle listener set, unless mid-drag
    pub(crate) fn bind_idle<P: Platform + ?Sized>(&self, platform: &mut P) {
        if !self.drag.is_dragging() {
            platform.listen(self.click_binding());
            platform.listen(self.press_binding());
        }
    }

    /// Unbind every listener and detach the bar from the surface
    pub(crate) fn detach<P: Platform + ?Sized>(&self, platform: &mut P) {
        platform.unlisten(self.press_binding());
        platform.unlisten(self.click_binding());
        platform.unlisten(self.move_binding());
        platform.unlisten(self.release_binding());
        if platform.contains(self.surface, self.track) {
            platform.remove_child(self.surface, self.track);
        }
    }

    // =========================================================================
    // Drag lifecycle
    // =========================================================================

    /// Begin a thumb drag. Returns false for non-primary buttons or when a
    /// drag is already running.
    pub(crate) fn start<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        event: &PointerEvent,
    ) -> bool {
        if !event.is_primary() || !advance(&mut self.drag, DragEvent::Press) {
            return false;
        }

        platform.set_resize_marker(self.surface, Point::ZERO);
        platform.set_flag(self.thumb, Flag::Pressed, true);

        self.start_position = event.position.along(self.axis);
        self.thumb_start = platform.layout_offset(self.thumb).along(self.axis);

        platform.unlisten(self.press_binding());
        platform.unlisten(self.click_binding());
        platform.listen(self.move_binding());
        platform.listen(self.release_binding());

        tracing::debug!(axis = %self.axis, start = self.start_position, thumb = self.thumb_start, "thumb drag started");
        true
    }

    /// End a thumb drag regardless of where the pointer is
    pub(crate) fn stop<P: Platform + ?Sized>(&mut self, platform: &mut P) -> bool {
        if !advance(&mut self.drag, DragEvent::Release) {
            return false;
        }

        platform.set_flag(self.thumb, Flag::Pressed, false);
        platform.unlisten(self.move_binding());
        platform.unlisten(self.release_binding());
        platform.listen(self.press_binding());
        platform.listen(self.click_binding());

        tracing::debug!(axis = %self.axis, position = self.position, "thumb drag ended");
        true
    }

    // =========================================================================
    // Position updates
    // =========================================================================

    /// Move by a wheel, drag tick, or synthetic delta.
    ///
    /// Returns the scroll offset written, or None when the input does not
    /// apply (pointer input outside a drag, or a thumb with no room to move).
    pub(crate) fn scroll<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        view: &SurfaceView<'_>,
        input: ScrollInput,
    ) -> Option<f32> {
        let (track_len, thumb_len) = self.extents(platform);
        let travel = track_len - thumb_len;
        if travel <= 0.0 {
            tracing::trace!(axis = %self.axis, "thumb fills track, scroll ignored");
            return None;
        }

        self.position = match input {
            ScrollInput::Pointer(coord) => {
                if !self.drag.is_dragging() {
                    return None;
                }
                let scrolled = (coord - self.start_position + self.thumb_start) / travel * 100.0;
                clamp_position(POSITION_START - scrolled)
            }
            ScrollInput::Wheel(wheel) => {
                let scrolled = -wheel.spin(self.axis) / travel * 100.0;
                clamp_position(self.position + scrolled)
            }
            ScrollInput::Delta(delta) => {
                let scrolled = -delta / travel * 100.0;
                clamp_position(self.position + scrolled)
            }
        };

        Some(self.apply_position(platform, view, ThumbPlacement::Proportional))
    }

    /// Jump so the thumb centers under a click on the track.
    ///
    /// Clicks whose target is not the track itself (a click on the thumb
    /// bubbling up, say) are ignored.
    pub(crate) fn scroll_to<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        view: &SurfaceView<'_>,
        event: &PointerEvent,
    ) -> Option<f32> {
        if event.target != self.track || self.drag.is_dragging() {
            return None;
        }

        let (track_len, thumb_len) = self.extents(platform);
        let travel = track_len - thumb_len;
        if travel <= 0.0 {
            return None;
        }

        platform.set_resize_marker(self.surface, Point::ZERO);

        let pointer = event.position.along(self.axis) - view.metrics.offset.along(self.axis);
        self.position = clamp_position((track_len - thumb_len / 2.0 - pointer) / travel * 100.0);

        Some(self.apply_position(platform, view, ThumbPlacement::Px(pointer - thumb_len / 2.0)))
    }

    /// Set the position directly
    pub(crate) fn jump_to<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        view: &SurfaceView<'_>,
        position: f32,
    ) -> f32 {
        self.position = clamp_position(position);
        self.apply_position(platform, view, ThumbPlacement::Proportional)
    }

    /// Write the scroll offset for the current position and redraw.
    ///
    /// The boundaries are pinned: 100 always writes 0 and 0 always writes the
    /// full scrollable range, so repeated boundary hits never drift.
    fn apply_position<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        view: &SurfaceView<'_>,
        placement: ThumbPlacement,
    ) -> f32 {
        let axis = self.axis;
        let range = view.metrics.scrollable(axis);
        let (track_len, thumb_len) = self.extents(platform);
        let travel = (track_len - thumb_len).max(0.0);

        let offset = if self.position >= POSITION_START {
            0.0
        } else if self.position <= POSITION_END {
            range
        } else {
            (range / 100.0 * (POSITION_START - self.position)).floor()
        };

        platform.set_scroll_offset(view.viewport, axis, offset);
        let written = platform.scroll_offset(view.viewport).along(axis);

        let thumb_offset = if self.position >= POSITION_START {
            Length::Px(0.0)
        } else if self.position <= POSITION_END {
            Length::Px(travel)
        } else {
            match placement {
                ThumbPlacement::Px(px) => Length::Px(px),
                ThumbPlacement::Proportional if track_len > 0.0 => {
                    Length::Percent((POSITION_START - self.position) * travel / track_len)
                }
                ThumbPlacement::Proportional => Length::Px(0.0),
            }
        };

        platform.set_style(self.track, axis.start_prop(), Length::Px(written));
        platform.set_style(self.thumb, axis.start_prop(), thumb_offset);

        // The perpendicular bar lives inside the scrolled surface; push it
        // back so the corner stays clear
        if let Some(sibling) = view.sibling_bar {
            platform.set_style(sibling, axis.end_prop(), Length::Px(-written));
        }

        tracing::trace!(%axis, position = self.position, offset = written, "scrollbar moved");
        written
    }

    /// Rewrite thumb geometry from freshly measured metrics.
    ///
    /// `size` is the thumb size in percent of the track, `scrolled` the
    /// percent scrolled from the start, `scroll` the raw offset.
    pub(crate) fn redraw<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        size: f32,
        scrolled: f32,
        scroll: f32,
    ) {
        let axis = self.axis;
        let thumb_offset = (100.0 - size) / 100.0 * scrolled;
        self.position = clamp_position(POSITION_START - scrolled);

        platform.set_style(self.thumb, axis.extent_prop(), Length::Percent(size));
        platform.set_style(self.thumb, axis.start_prop(), Length::Percent(thumb_offset));
        platform.set_flag(self.thumb, Flag::Hidden, size >= 100.0);
        platform.set_style(self.track, axis.start_prop(), Length::Px(scroll));
    }

    /// Keep boundary semantics across a viewport resize.
    ///
    /// At the end (position 0) the offset is pinned to the freshly measured
    /// range, whichever way the viewport changed; at the start it is reset
    /// to 0. Anywhere else nothing is corrected. Returns whether the bar was
    /// pinned to the end.
    pub(crate) fn resize_scrollbar<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        view: &SurfaceView<'_>,
        resized: Point,
    ) -> bool {
        let axis = self.axis;
        let viewport = view.viewport;
        let range = platform.content_size(viewport).along(axis)
            - platform.client_size(viewport).along(axis);

        if self.position <= POSITION_END && range >= 0.0 {
            platform.set_scroll_offset(viewport, axis, range);

            if let Some(sibling) = view.sibling_bar {
                let cross = axis.cross();
                let scroll = platform.scroll_offset(viewport);
                let overshoot = scroll.along(cross)
                    - (platform.content_size(viewport).along(cross)
                        - platform.client_size(viewport).along(cross));
                platform.set_style(sibling, axis.end_prop(), Length::Px(-scroll.along(axis)));
                if overshoot > 0.0 {
                    platform.set_scroll_offset(viewport, cross, scroll.along(cross) - overshoot);
                }
            }

            tracing::debug!(%axis, delta = resized.along(axis), range, "pinned to end across resize");
            true
        } else {
            if self.position >= POSITION_START {
                platform.set_scroll_offset(viewport, axis, 0.0);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollsync_platform::headless::HeadlessPlatform;
    use scrollsync_platform::{ElementHost, GeometryProvider, Size, StyleProp};

    struct Fixture {
        platform: HeadlessPlatform,
        node: NodeId,
        metrics: Metrics,
        bar: Scrollbar,
    }

    /// Viewport 400x300 over 800x900 content, y scrollbar with a 50% thumb
    fn fixture() -> Fixture {
        let mut platform = HeadlessPlatform::default();
        let node = platform.add_surface(Size::new(400.0, 300.0), Size::new(800.0, 900.0));
        let bar = Scrollbar::new(&mut platform, node, Axis::Y);
        platform.append_child(node, bar.track());
        platform.set_style(bar.thumb(), StyleProp::Height, Length::Percent(50.0));

        let metrics = Metrics {
            width: 400.0,
            height: 300.0,
            content: Size::new(800.0, 900.0),
            scrollable_content: Point::new(400.0, 600.0),
            window_content_ratio: Point::new(0.5, 1.0 / 3.0),
            offset: Point::ZERO,
        };

        Fixture {
            platform,
            node,
            metrics,
            bar,
        }
    }

    fn view(node: NodeId, metrics: &Metrics) -> SurfaceView<'_> {
        SurfaceView {
            viewport: node,
            metrics,
            sibling_bar: None,
        }
    }

    fn wheel(spin_y: f32) -> ScrollInput {
        ScrollInput::Wheel(NormalizedWheel {
            spin_y,
            pixel_y: spin_y * 10.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_wheel_towards_end() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);

        // travel = 300 - 150 = 150; 3 spins = 2% of travel
        let offset = bar.scroll(&mut platform, &v, wheel(3.0)).unwrap();
        assert!((bar.position() - 98.0).abs() < 1e-4);
        assert_eq!(offset, (600.0_f32 / 100.0 * (100.0 - bar.position())).floor());
        assert!(offset > 0.0);
    }

    #[test]
    fn test_wheel_towards_start_at_start_is_clamped() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);

        let offset = bar.scroll(&mut platform, &v, wheel(-3.0)).unwrap();
        assert_eq!(bar.position(), POSITION_START);
        assert_eq!(offset, 0.0);
        assert_eq!(platform.style(bar.thumb(), StyleProp::Top), Some(Length::Px(0.0)));
    }

    #[test]
    fn test_boundaries_are_exact() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);

        for _ in 0..5 {
            let end = bar.jump_to(&mut platform, &v, -20.0);
            assert_eq!(bar.position(), POSITION_END);
            assert_eq!(end, 600.0);
            assert_eq!(platform.style(bar.thumb(), StyleProp::Top), Some(Length::Px(150.0)));

            let start = bar.jump_to(&mut platform, &v, 250.0);
            assert_eq!(bar.position(), POSITION_START);
            assert_eq!(start, 0.0);
        }
    }

    #[test]
    fn test_offset_monotonic_in_position() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);

        let mut previous = f32::NEG_INFINITY;
        for step in (0..=100).rev() {
            let offset = bar.jump_to(&mut platform, &v, step as f32);
            assert!(offset >= previous, "offset went backwards at {step}");
            previous = offset;
        }
    }

    #[test]
    fn test_pointer_requires_drag() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);

        assert_eq!(bar.scroll(&mut platform, &v, ScrollInput::Pointer(40.0)), None);
        assert_eq!(bar.position(), POSITION_START);
    }

    #[test]
    fn test_drag_follows_pointer() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);
        let thumb = bar.thumb();

        assert!(bar.start(&mut platform, &PointerEvent::new(thumb, Point::new(395.0, 20.0))));
        assert!(bar.is_dragging());
        assert!(platform.flag(thumb, Flag::Pressed));

        // 75px of 150px travel
        bar.scroll(&mut platform, &v, ScrollInput::Pointer(95.0)).unwrap();
        assert!((bar.position() - 50.0).abs() < 1e-4);
        assert_eq!(platform.scroll_offset(node).y, 300.0);

        // Far past the end
        bar.scroll(&mut platform, &v, ScrollInput::Pointer(2000.0)).unwrap();
        assert_eq!(bar.position(), POSITION_END);
        assert_eq!(platform.scroll_offset(node).y, 600.0);

        assert!(bar.stop(&mut platform));
        assert!(!platform.flag(thumb, Flag::Pressed));
        assert!(!bar.stop(&mut platform));
    }

    #[test]
    fn test_secondary_button_does_not_drag() {
        let Fixture { mut platform, mut bar, .. } = fixture();
        let thumb = bar.thumb();
        let event = PointerEvent::new(thumb, Point::new(0.0, 10.0)).with_button(2);
        assert!(!bar.start(&mut platform, &event));
        assert!(!bar.is_dragging());
    }

    #[test]
    fn test_drag_swaps_listeners() {
        let Fixture { mut platform, mut bar, .. } = fixture();
        bar.bind_idle(&mut platform);
        let thumb = bar.thumb();
        let press = Binding::element(thumb, InputKind::PointerDown, thumb);
        let moves = Binding::window(InputKind::PointerMove, thumb);
        let click = Binding::element(bar.track(), InputKind::Click, bar.track());

        assert!(platform.is_listening(&press));
        assert!(platform.is_listening(&click));
        bar.start(&mut platform, &PointerEvent::new(thumb, Point::ZERO));
        assert!(!platform.is_listening(&press));
        assert!(!platform.is_listening(&click));
        assert!(platform.is_listening(&moves));

        // Reflow mid-drag keeps the drag listener set
        bar.bind_idle(&mut platform);
        assert!(!platform.is_listening(&press));
        assert!(!platform.is_listening(&click));

        bar.stop(&mut platform);
        assert!(platform.is_listening(&press));
        assert!(platform.is_listening(&click));
        assert!(!platform.is_listening(&moves));
    }

    #[test]
    fn test_track_click_ignores_thumb_target() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);
        let thumb = bar.thumb();

        let click = PointerEvent::new(thumb, Point::new(395.0, 290.0));
        assert_eq!(bar.scroll_to(&mut platform, &v, &click), None);
        assert_eq!(bar.position(), POSITION_START);
        assert_eq!(platform.scroll_offset(node).y, 0.0);
    }

    #[test]
    fn test_track_click_centers_thumb() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);
        let track = bar.track();

        // Pointer at 150 centers a 150px thumb at 75..225: halfway
        let offset = bar
            .scroll_to(&mut platform, &v, &PointerEvent::new(track, Point::new(395.0, 150.0)))
            .unwrap();
        assert!((bar.position() - 50.0).abs() < 1e-4);
        assert_eq!(offset, 300.0);
        assert_eq!(platform.style(bar.thumb(), StyleProp::Top), Some(Length::Px(75.0)));

        // Near the bottom clamps to the end
        bar.scroll_to(&mut platform, &v, &PointerEvent::new(track, Point::new(395.0, 299.0)))
            .unwrap();
        assert_eq!(bar.position(), POSITION_END);
        assert_eq!(platform.scroll_offset(node).y, 600.0);
    }

    #[test]
    fn test_sibling_bar_is_pushed_back() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let sibling = platform.create_element(ElementKind::Track(Axis::X));
        let v = SurfaceView {
            sibling_bar: Some(sibling),
            ..view(node, &metrics)
        };

        let offset = bar.jump_to(&mut platform, &v, 25.0);
        assert_eq!(offset, 450.0);
        assert_eq!(platform.style(sibling, StyleProp::Bottom), Some(Length::Px(-450.0)));
    }

    #[test]
    fn test_resize_at_end_stays_pinned_when_growing() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);
        bar.jump_to(&mut platform, &v, POSITION_END);

        // Platform clamps 600 down to the new 550 range
        platform.set_client_size(node, Size::new(400.0, 350.0));
        assert!(bar.resize_scrollbar(&mut platform, &v, Point::new(0.0, 50.0)));
        assert_eq!(platform.scroll_offset(node).y, 550.0);
    }

    #[test]
    fn test_resize_at_end_stays_pinned_when_shrinking() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);
        bar.jump_to(&mut platform, &v, POSITION_END);

        platform.set_client_size(node, Size::new(400.0, 250.0));
        assert_eq!(platform.scroll_offset(node).y, 600.0);
        assert!(bar.resize_scrollbar(&mut platform, &v, Point::new(0.0, -50.0)));
        assert_eq!(platform.scroll_offset(node).y, 650.0);
    }

    #[test]
    fn test_resize_mid_scroll_is_not_corrected() {
        let Fixture { mut platform, node, metrics, mut bar } = fixture();
        let v = view(node, &metrics);
        bar.jump_to(&mut platform, &v, 40.0);
        let before = platform.scroll_offset(node).y;

        platform.set_client_size(node, Size::new(400.0, 350.0));
        assert!(!bar.resize_scrollbar(&mut platform, &v, Point::new(0.0, 50.0)));
        assert_eq!(platform.scroll_offset(node).y, before);
    }
}

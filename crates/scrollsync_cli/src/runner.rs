//! Scenario replay on the headless platform

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use scrollsync_core::{ContainerId, EventKind, Registry, ResizeSource, ScrollEvent};
use scrollsync_platform::headless::{HeadlessPlatform, NodeRole};
use scrollsync_platform::{
    Axis, ElementHost, Flag, GeometryProvider, NodeId, PlatformEvent, Point, PointerEvent, RawWheel,
    Size,
};

use crate::scenario::{Scenario, Step};

/// Everything a replay produced
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub events: Vec<EventRecord>,
    pub snapshots: Vec<Snapshot>,
}

#[derive(Debug, Serialize)]
pub struct EventRecord {
    /// 1-based step that produced the event
    pub step: usize,
    pub kind: String,
    pub surface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    /// Percent scrolled from the start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrolled: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub surfaces: Vec<SurfaceState>,
}

#[derive(Debug, Serialize)]
pub struct SurfaceState {
    pub name: String,
    pub active: bool,
    pub scroll: [f32; 2],
    pub axes: Vec<AxisState>,
}

#[derive(Debug, Serialize)]
pub struct AxisState {
    pub axis: Axis,
    pub scrolled: f32,
    pub thumb_size: Option<String>,
    pub thumb_offset: Option<String>,
    pub hidden: bool,
}

struct Surface {
    name: String,
    node: NodeId,
    container: ContainerId,
}

/// Replays one scenario
pub struct Runner {
    platform: HeadlessPlatform,
    registry: Registry,
    surfaces: Vec<Surface>,
    names: HashMap<NodeId, String>,
    inbox: Arc<Mutex<Vec<ScrollEvent>>>,
    report: Report,
}

impl Runner {
    /// Build the surfaces and register them
    pub fn new(scenario: &Scenario) -> Self {
        let mut platform = HeadlessPlatform::default();
        let mut registry = Registry::new(scenario.config);
        let mut surfaces = Vec::new();
        let mut names = HashMap::new();

        for spec in &scenario.surfaces {
            let node = platform.add_surface(
                Size::new(spec.client[0], spec.client[1]),
                Size::new(spec.content[0], spec.content[1]),
            );
            platform.set_screen_offset(node, Point::new(spec.offset[0], spec.offset[1]));
            platform.set_scroll_axes(node, &spec.axes);
            for frame in &spec.frames {
                platform.add_frame(
                    node,
                    Size::new(spec.client[0], spec.client[1]),
                    Size::new(frame[0], frame[1]),
                );
            }

            let container = registry.create_one(&mut platform, node);
            names.insert(node, spec.name.clone());
            surfaces.push(Surface {
                name: spec.name.clone(),
                node,
                container,
            });
        }
        registry.pump(&mut platform);

        let inbox = Arc::new(Mutex::new(Vec::new()));
        for kind in [EventKind::Scrolling, EventKind::DragScroll] {
            let sink = inbox.clone();
            registry.on_any(kind, move |event| {
                if let Ok(mut events) = sink.lock() {
                    events.push(event.clone());
                }
            });
        }

        Self {
            platform,
            registry,
            surfaces,
            names,
            inbox,
            report: Report::default(),
        }
    }

    /// Run every step and return the report
    pub fn run(mut self, scenario: &Scenario) -> Result<Report> {
        for (index, step) in scenario.steps.iter().enumerate() {
            let number = index + 1;
            tracing::info!(step = number, ?step, "running step");
            self.apply(number, step)
                .with_context(|| format!("Step {number} failed"))?;
            self.registry.pump(&mut self.platform);
            self.collect(number);
        }
        Ok(self.report)
    }

    fn surface(&self, name: &str) -> Result<&Surface> {
        self.surfaces
            .iter()
            .find(|s| s.name == name)
            .with_context(|| format!("Unknown surface '{name}'"))
    }

    fn dispatch(&mut self, event: PlatformEvent) {
        self.registry.dispatch(&mut self.platform, &event);
        self.registry.pump(&mut self.platform);
    }

    fn apply(&mut self, number: usize, step: &Step) -> Result<()> {
        match step {
            Step::Wheel {
                surface,
                dx,
                dy,
                mode,
            } => {
                let node = self.surface(surface)?.node;
                let target = self.platform.viewport_of(node);
                self.dispatch(PlatformEvent::Wheel {
                    target,
                    wheel: RawWheel::with_mode(*dx, *dy, *mode),
                });
            }
            Step::Drag {
                surface,
                axis,
                from,
                to,
                steps,
            } => {
                let thumb = self.scrollbar_part(surface, *axis, true)?;
                let at = |coord: f32| Point::ZERO.with(*axis, coord);

                self.dispatch(PlatformEvent::PointerDown(PointerEvent::new(thumb, at(*from))));
                let moves = (*steps).max(1);
                for i in 1..=moves {
                    let coord = from + (to - from) * i as f32 / moves as f32;
                    self.dispatch(PlatformEvent::PointerMove(PointerEvent::new(thumb, at(coord))));
                }
                self.dispatch(PlatformEvent::PointerUp(PointerEvent::new(thumb, at(*to))));
            }
            Step::Click {
                surface,
                axis,
                at,
            } => {
                let track = self.scrollbar_part(surface, *axis, false)?;
                let position = Point::ZERO.with(*axis, *at);
                self.dispatch(PlatformEvent::Click(PointerEvent::new(track, position)));
            }
            Step::ScrollTo {
                surface,
                axis,
                position,
            } => {
                let node = self.surface(surface)?.node;
                self.registry
                    .scroll_to(&mut self.platform, node, *axis, *position)?;
            }
            Step::ResizeViewport {
                surface,
                width,
                height,
            } => {
                let node = self.surface(surface)?.node;
                let viewport = self.platform.viewport_of(node);
                self.platform.set_client_size(viewport, Size::new(*width, *height));
                let event = match self.registry.config().resize_source {
                    ResizeSource::Poll => PlatformEvent::WindowResize,
                    ResizeSource::External => PlatformEvent::Resized { node },
                };
                self.dispatch(event);
            }
            Step::SetContent {
                surface,
                width,
                height,
            } => {
                let node = self.surface(surface)?.node;
                let viewport = self.platform.viewport_of(node);
                self.platform.set_content_size(viewport, Size::new(*width, *height));
            }
            Step::PollResize => self.dispatch(PlatformEvent::WindowResize),
            Step::Refresh { surface: None } => self.registry.refresh_all(&mut self.platform),
            Step::Refresh {
                surface: Some(name),
            } => {
                let id = self.surface(name)?.container;
                if let Some(container) = self.registry.get_mut(id) {
                    container.refresh(&mut self.platform)?;
                }
            }
            Step::SetAxes { surface, axes } => {
                let id = self.surface(surface)?.container;
                let axes = scrollsync_core::parse_axes(axes);
                if let Some(container) = self.registry.get_mut(id) {
                    container.set_scrollbars(&mut self.platform, &axes)?;
                }
            }
            Step::Clear { surface: None } => self.registry.clear_all(&mut self.platform),
            Step::Clear {
                surface: Some(name),
            } => {
                let node = self.surface(name)?.node;
                self.registry.clear(&mut self.platform, node)?;
            }
            Step::Report { label } => {
                let snapshot = self.snapshot(number, label.clone());
                self.report.snapshots.push(snapshot);
            }
        }
        Ok(())
    }

    /// Thumb (or track) of `surface`'s scrollbar on `axis`
    fn scrollbar_part(&self, surface: &str, axis: Axis, thumb: bool) -> Result<NodeId> {
        let id = self.surface(surface)?.container;
        let bar = self
            .registry
            .get(id)
            .and_then(|c| c.scrollbar(axis))
            .with_context(|| format!("Surface '{surface}' has no {axis} scrollbar"))?;
        Ok(if thumb { bar.thumb() } else { bar.track() })
    }

    fn describe(&self, node: NodeId) -> String {
        if let Some(name) = self.names.get(&node) {
            return name.clone();
        }
        match self.platform.role(node) {
            Some(NodeRole::Track(axis)) => format!("track:{axis}"),
            Some(NodeRole::Thumb(axis)) => format!("thumb:{axis}"),
            Some(NodeRole::Frame) => "frame".to_string(),
            Some(NodeRole::Surface) | None => "unknown".to_string(),
        }
    }

    fn collect(&mut self, step: usize) {
        let events = match self.inbox.lock() {
            Ok(mut inbox) => std::mem::take(&mut *inbox),
            Err(_) => return,
        };

        for event in events {
            let record = match &event {
                ScrollEvent::Scrolling {
                    surface,
                    axis,
                    target,
                    ..
                } => EventRecord {
                    step,
                    kind: event.kind().to_string(),
                    surface: self.describe(*surface),
                    axis: Some(*axis),
                    scrolled: event.percent_scrolled(),
                    target: target.map(|t| self.describe(t)),
                },
                ScrollEvent::DragScroll { surface, target } => EventRecord {
                    step,
                    kind: event.kind().to_string(),
                    surface: self.describe(*surface),
                    axis: None,
                    scrolled: None,
                    target: target.map(|t| self.describe(t)),
                },
            };
            self.report.events.push(record);
        }
    }

    fn snapshot(&self, step: usize, label: Option<String>) -> Snapshot {
        let surfaces = self
            .surfaces
            .iter()
            .map(|surface| {
                let container = self.registry.get(surface.container);
                let viewport = self.platform.viewport_of(surface.node);
                let scroll = self.platform.scroll_offset(viewport);
                let axes = container
                    .map(|c| {
                        c.axes()
                            .into_iter()
                            .filter_map(|axis| {
                                let bar = c.scrollbar(axis)?;
                                let thumb = bar.thumb();
                                Some(AxisState {
                                    axis,
                                    scrolled: bar.percent_scrolled(),
                                    thumb_size: self
                                        .platform
                                        .style(thumb, axis.extent_prop())
                                        .map(|l| l.to_string()),
                                    thumb_offset: self
                                        .platform
                                        .style(thumb, axis.start_prop())
                                        .map(|l| l.to_string()),
                                    hidden: self.platform.flag(thumb, Flag::Hidden),
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                SurfaceState {
                    name: surface.name.clone(),
                    active: container.is_some_and(|c| c.is_active()),
                    scroll: [scroll.x, scroll.y],
                    axes,
                }
            })
            .collect();

        Snapshot {
            step,
            label,
            surfaces,
        }
    }
}

/// Human-readable rendering of a report
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let mut snapshots = report.snapshots.iter().peekable();

    let mut write_snapshots_until = |out: &mut String, step: usize| {
        while let Some(snapshot) = snapshots.next_if(|s| s.step <= step) {
            render_snapshot(out, snapshot);
        }
    };

    for event in &report.events {
        write_snapshots_until(&mut out, event.step.saturating_sub(1));
        let _ = write!(out, "[step {}] {} {}", event.step, event.kind, event.surface);
        if let Some(axis) = event.axis {
            let _ = write!(out, " {axis}");
        }
        if let Some(scrolled) = event.scrolled {
            let _ = write!(out, " {scrolled:.2}%");
        }
        if let Some(target) = &event.target {
            let _ = write!(out, " target={target}");
        }
        out.push('\n');
    }
    write_snapshots_until(&mut out, usize::MAX);
    out
}

fn render_snapshot(out: &mut String, snapshot: &Snapshot) {
    let _ = write!(out, "[step {}] report", snapshot.step);
    if let Some(label) = &snapshot.label {
        let _ = write!(out, " \"{label}\"");
    }
    out.push('\n');

    for surface in &snapshot.surfaces {
        if !surface.active {
            let _ = writeln!(out, "  {}: cleared", surface.name);
            continue;
        }
        let _ = writeln!(
            out,
            "  {}: scroll=({}, {})",
            surface.name, surface.scroll[0], surface.scroll[1]
        );
        for axis in &surface.axes {
            let _ = writeln!(
                out,
                "    {}: {:.2}% thumb {} @ {}{}",
                axis.axis,
                axis.scrolled,
                axis.thumb_size.as_deref().unwrap_or("-"),
                axis.thumb_offset.as_deref().unwrap_or("-"),
                if axis.hidden { " (hidden)" } else { "" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb_percent(state: &AxisState) -> Option<f32> {
        state
            .thumb_size
            .as_deref()
            .and_then(|s| s.strip_suffix('%'))
            .and_then(|s| s.parse().ok())
    }

    fn run(toml: &str) -> Report {
        let scenario = Scenario::parse(toml).unwrap();
        Runner::new(&scenario).run(&scenario).unwrap()
    }

    #[test]
    fn test_example_replays() {
        let report = run(crate::scenario::EXAMPLE);
        assert_eq!(report.snapshots.len(), 2);
        assert!(report.events.iter().any(|e| e.kind == "scrolling"));

        let initial = &report.snapshots[0].surfaces[0];
        assert_eq!(initial.scroll, [0.0, 0.0]);
        assert_eq!(thumb_percent(&initial.axes[0]), Some(50.0));

        // Pinned to the end across the 50px viewport growth
        let resized = &report.snapshots[1].surfaces[0];
        assert_eq!(resized.scroll[1], 550.0);
    }

    #[test]
    fn test_drag_events_carry_step() {
        let report = run(
            r#"
            [[surface]]
            name = "a"
            axes = "y"
            client = [400.0, 300.0]
            content = [400.0, 900.0]

            [[step]]
            action = "drag"
            surface = "a"
            axis = "y"
            from = 10.0
            to = 110.0
            steps = 2

            [[step]]
            action = "report"
            "#,
        );

        assert_eq!(report.events.len(), 2);
        assert!(report.events.iter().all(|e| e.step == 1));
        let last = report.events.last().unwrap();
        assert!((last.scrolled.unwrap() - 50.0).abs() < 1e-3);
        assert_eq!(report.snapshots[0].surfaces[0].scroll, [0.0, 300.0]);
    }

    #[test]
    fn test_clear_reports_inactive() {
        let report = run(
            r#"
            [[surface]]
            name = "a"
            client = [100.0, 100.0]
            content = [100.0, 400.0]

            [[step]]
            action = "clear"

            [[step]]
            action = "report"
            label = "gone"
            "#,
        );
        let surface = &report.snapshots[0].surfaces[0];
        assert!(!surface.active);
        assert!(surface.axes.is_empty());

        let text = render_text(&report);
        assert!(text.contains("report \"gone\""));
        assert!(text.contains("a: cleared"));
    }

    #[test]
    fn test_scroll_to_on_missing_axis_fails() {
        let scenario = Scenario::parse(
            r#"
            [[surface]]
            name = "a"
            axes = "y"
            client = [100.0, 100.0]
            content = [400.0, 400.0]

            [[step]]
            action = "scroll_to"
            surface = "a"
            axis = "x"
            position = 50.0
            "#,
        )
        .unwrap();
        let err = Runner::new(&scenario).run(&scenario).unwrap_err();
        assert!(format!("{err:#}").contains("No scrollbar on axis x"));
    }
}

//! Scenario file handling

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use scrollsync_core::ScrollbarConfig;
use scrollsync_platform::{Axis, DeltaMode};

/// A replayable scenario (scenario.toml)
#[derive(Debug, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: ScrollbarConfig,
    #[serde(rename = "surface")]
    pub surfaces: Vec<SurfaceSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// A scrollable surface to register
#[derive(Debug, Deserialize, Serialize)]
pub struct SurfaceSpec {
    pub name: String,
    /// Scroll-axes attribute, e.g. `"x,y"`
    #[serde(default = "default_axes")]
    pub axes: String,
    /// Viewport client size `[width, height]`
    pub client: [f32; 2],
    /// Content size `[width, height]`
    pub content: [f32; 2],
    /// Screen offset `[x, y]`
    #[serde(default)]
    pub offset: [f32; 2],
    /// Embedded frames, by content size
    #[serde(default)]
    pub frames: Vec<[f32; 2]>,
}

fn default_axes() -> String {
    "y".to_string()
}

fn default_steps() -> u32 {
    1
}

/// One scripted action
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Wheel over the surface's viewport
    Wheel {
        surface: String,
        #[serde(default)]
        dx: f32,
        #[serde(default)]
        dy: f32,
        #[serde(default)]
        mode: DeltaMode,
    },
    /// Press the thumb at `from`, move to `to`, release
    Drag {
        surface: String,
        axis: Axis,
        from: f32,
        to: f32,
        #[serde(default = "default_steps")]
        steps: u32,
    },
    /// Click the track at a screen coordinate along the axis
    Click { surface: String, axis: Axis, at: f32 },
    /// Jump to an internal position (100 = start, 0 = end)
    ScrollTo {
        surface: String,
        axis: Axis,
        position: f32,
    },
    /// Change the viewport size and notify the way the config says
    ResizeViewport {
        surface: String,
        width: f32,
        height: f32,
    },
    /// Change the content size (follow with `refresh`)
    SetContent {
        surface: String,
        width: f32,
        height: f32,
    },
    PollResize,
    /// Reflow one surface, or all of them
    Refresh {
        #[serde(default)]
        surface: Option<String>,
    },
    SetAxes { surface: String, axes: String },
    /// Tear down one surface, or all of them
    Clear {
        #[serde(default)]
        surface: Option<String>,
    },
    /// Snapshot scroll offsets and thumb geometry
    Report {
        #[serde(default)]
        label: Option<String>,
    },
}

impl Step {
    /// Surface the step addresses, if any
    pub fn surface(&self) -> Option<&str> {
        match self {
            Step::Wheel { surface, .. }
            | Step::Drag { surface, .. }
            | Step::Click { surface, .. }
            | Step::ScrollTo { surface, .. }
            | Step::ResizeViewport { surface, .. }
            | Step::SetContent { surface, .. }
            | Step::SetAxes { surface, .. } => Some(surface),
            Step::Refresh { surface } | Step::Clear { surface } => surface.as_deref(),
            Step::PollResize | Step::Report { .. } => None,
        }
    }
}

impl Scenario {
    /// Parse and validate a scenario from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.surfaces.is_empty() {
            bail!("Scenario declares no surfaces");
        }

        let mut names = HashSet::new();
        for surface in &self.surfaces {
            if !names.insert(surface.name.as_str()) {
                bail!("Duplicate surface '{}'", surface.name);
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(name) = step.surface() {
                if !names.contains(name) {
                    bail!("Step {} refers to unknown surface '{}'", index + 1, name);
                }
            }
            if let Step::Drag { steps: 0, .. } = step {
                bail!("Step {}: drag needs at least one move", index + 1);
            }
        }
        Ok(())
    }
}

/// Scenario written by `scrollsync init`
pub const EXAMPLE: &str = r#"# Scrollsync scenario
#
# Surfaces are registered in order, then steps run one after another.
# Positions are internal: 100 is the start of the content, 0 the end.

[config]
min_thumb_percent = 8.0
edge_margin = 40.0
autoscroll_ms_per_px = 10.0
resize_source = "poll"

[[surface]]
name = "list"
axes = "x,y"
client = [400.0, 300.0]
content = [800.0, 900.0]

[[step]]
action = "report"
label = "initial"

[[step]]
action = "wheel"
surface = "list"
dy = 120.0

[[step]]
action = "drag"
surface = "list"
axis = "y"
from = 10.0
to = 110.0
steps = 4

[[step]]
action = "click"
surface = "list"
axis = "x"
at = 380.0

[[step]]
action = "scroll_to"
surface = "list"
axis = "y"
position = 0.0

[[step]]
action = "resize_viewport"
surface = "list"
width = 400.0
height = 350.0

[[step]]
action = "report"
label = "after resize"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_parses() {
        let scenario = Scenario::parse(EXAMPLE).unwrap();
        assert_eq!(scenario.surfaces.len(), 1);
        assert_eq!(scenario.surfaces[0].axes, "x,y");
        assert_eq!(scenario.steps.len(), 7);
        assert!(matches!(
            scenario.steps[2],
            Step::Drag { axis: Axis::Y, steps: 4, .. }
        ));
    }

    #[test]
    fn test_defaults() {
        let scenario = Scenario::parse(
            r#"
            [[surface]]
            name = "a"
            client = [100.0, 100.0]
            content = [100.0, 400.0]

            [[step]]
            action = "poll_resize"
            "#,
        )
        .unwrap();
        assert_eq!(scenario.config, ScrollbarConfig::default());
        assert_eq!(scenario.surfaces[0].axes, "y");
        assert_eq!(scenario.surfaces[0].offset, [0.0, 0.0]);
        assert!(matches!(scenario.steps[0], Step::PollResize));
    }

    #[test]
    fn test_unknown_surface_is_rejected() {
        let err = Scenario::parse(
            r#"
            [[surface]]
            name = "a"
            client = [100.0, 100.0]
            content = [100.0, 400.0]

            [[step]]
            action = "refresh"
            surface = "b"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown surface 'b'"));
    }

    #[test]
    fn test_duplicate_surface_is_rejected() {
        let err = Scenario::parse(
            r#"
            [[surface]]
            name = "a"
            client = [100.0, 100.0]
            content = [100.0, 400.0]

            [[surface]]
            name = "a"
            client = [100.0, 100.0]
            content = [100.0, 400.0]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate surface"));
    }
}

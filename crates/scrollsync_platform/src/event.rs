//! Input and notification vocabulary delivered by the host
//!
//! The host translates its native events into [`PlatformEvent`]s and hands
//! them to the engine in the order they were observed.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::NodeId;

/// Primary mouse button index
pub const PRIMARY_BUTTON: u8 = 0;

/// Unit a raw wheel delta is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Raw wheel payload as reported by the input source
///
/// Every field is optional because different sources report different
/// subsets: modern sources fill `delta`, legacy sources `wheel_delta*`, and
/// some only `detail`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawWheel {
    pub delta_x: Option<f32>,
    pub delta_y: Option<f32>,
    pub delta_mode: DeltaMode,
    /// Legacy single-axis delta, 120 per notch, positive = away from user
    pub wheel_delta: Option<f32>,
    pub wheel_delta_x: Option<f32>,
    pub wheel_delta_y: Option<f32>,
    /// Legacy line count, positive = towards the end
    pub detail: Option<f32>,
    /// Legacy flag: `detail` refers to the horizontal axis
    pub horizontal_axis: bool,
}

impl RawWheel {
    /// Modern pixel delta
    pub fn pixels(delta_x: f32, delta_y: f32) -> Self {
        Self {
            delta_x: Some(delta_x),
            delta_y: Some(delta_y),
            ..Default::default()
        }
    }

    /// Modern delta in the given unit
    pub fn with_mode(delta_x: f32, delta_y: f32, mode: DeltaMode) -> Self {
        Self {
            delta_mode: mode,
            ..Self::pixels(delta_x, delta_y)
        }
    }
}

/// Pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Innermost element under the pointer
    pub target: NodeId,
    /// Page coordinates
    pub position: Point,
    pub button: u8,
}

impl PointerEvent {
    pub fn new(target: NodeId, position: Point) -> Self {
        Self {
            target,
            position,
            button: PRIMARY_BUTTON,
        }
    }

    pub fn with_button(mut self, button: u8) -> Self {
        self.button = button;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.button == PRIMARY_BUTTON
    }
}

/// Structural change reported by mutation observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children were added or removed under the observed node
    ChildList,
    /// The resize marker attribute of the observed node changed
    ResizeMarker,
    /// Any other attribute changed
    Attribute,
}

/// Token identifying a scheduled timer; one timer per owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub owner: NodeId,
}

/// Everything the host can deliver to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    Wheel { target: NodeId, wheel: RawWheel },
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    Click(PointerEvent),
    Mutation { observed: NodeId, record: MutationRecord },
    /// Size-change notification from an external resize source
    Resized { node: NodeId },
    /// The host window changed size
    WindowResize,
    Timer(TimerToken),
}

/// A queue of pending notifications the engine can drain
pub trait NotificationSource {
    fn next_notification(&mut self) -> Option<PlatformEvent>;
}

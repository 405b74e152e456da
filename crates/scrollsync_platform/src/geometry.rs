//! Geometry value types shared between the engine and its host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// A scroll dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

impl Axis {
    /// Both axes, horizontal first
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// The perpendicular axis
    pub const fn cross(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Style property holding the leading offset along this axis (`left`/`top`)
    pub const fn start_prop(self) -> StyleProp {
        match self {
            Axis::X => StyleProp::Left,
            Axis::Y => StyleProp::Top,
        }
    }

    /// Style property holding the extent along this axis (`width`/`height`)
    pub const fn extent_prop(self) -> StyleProp {
        match self {
            Axis::X => StyleProp::Width,
            Axis::Y => StyleProp::Height,
        }
    }

    /// Style property used to push the perpendicular bar out of the way
    /// when this axis scrolls (`right` for x, `bottom` for y).
    pub const fn end_prop(self) -> StyleProp {
        match self {
            Axis::X => StyleProp::Right,
            Axis::Y => StyleProp::Bottom,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            other => Err(PlatformError::InvalidAttribute(format!(
                "unknown axis `{other}`"
            ))),
        }
    }
}

/// A 2D point or displacement in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component along `axis`
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Replace the component along `axis`
    pub fn with(mut self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
        self
    }
}

/// A width/height pair in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extent along `axis` (width for x, height for y)
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    pub fn with(mut self, axis: Axis, value: f32) -> Self {
        match axis {
            Axis::X => self.width = value,
            Axis::Y => self.height = value,
        }
        self
    }
}

/// Geometric style properties the engine writes on its visuals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProp {
    Left,
    Top,
    Right,
    Bottom,
    Width,
    Height,
}

/// A style length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Percentage of the containing element along the same axis
    Percent(f32),
}

impl Length {
    /// Resolve against the containing extent
    pub fn resolve(&self, containing: f32) -> f32 {
        match *self {
            Length::Px(px) => px,
            Length::Percent(pct) => containing * pct / 100.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Percent(v) => write!(f, "{v}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_parse() {
        assert_eq!(" x ".parse::<Axis>().unwrap(), Axis::X);
        assert_eq!("Y".parse::<Axis>().unwrap(), Axis::Y);
        assert!(matches!(
            "z".parse::<Axis>(),
            Err(PlatformError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn test_axis_props() {
        assert_eq!(Axis::X.cross(), Axis::Y);
        assert_eq!(Axis::Y.start_prop(), StyleProp::Top);
        assert_eq!(Axis::X.end_prop(), StyleProp::Right);
        assert_eq!(Axis::Y.extent_prop(), StyleProp::Height);
    }

    #[test]
    fn test_length_resolve() {
        assert_eq!(Length::Percent(50.0).resolve(300.0), 150.0);
        assert_eq!(Length::Px(12.0).resolve(300.0), 12.0);
    }
}

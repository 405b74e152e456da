//! Wheel delta normalization
//!
//! Input sources disagree on units (pixels, lines, pages) and on which
//! fields they fill. [`normalize`] folds every variant into one
//! pixel-equivalent delta plus a coarse "spin" per axis. Positive values
//! scroll towards the end of the content (content moves up/left).

use scrollsync_platform::{Axis, DeltaMode, RawWheel};

/// Pixels per legacy spin unit
pub const PIXEL_STEP: f32 = 10.0;
/// Pixels per line when the source reports lines
pub const LINE_HEIGHT: f32 = 40.0;
/// Pixels per page when the source reports pages
pub const PAGE_HEIGHT: f32 = 800.0;

/// Legacy wheel delta per notch
const WHEEL_DELTA_PER_NOTCH: f32 = 120.0;

/// A wheel delta in uniform units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedWheel {
    pub spin_x: f32,
    pub spin_y: f32,
    pub pixel_x: f32,
    pub pixel_y: f32,
}

impl NormalizedWheel {
    pub fn spin(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.spin_x,
            Axis::Y => self.spin_y,
        }
    }

    pub fn pixels(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.pixel_x,
            Axis::Y => self.pixel_y,
        }
    }

    /// No scroll requested on either axis
    pub fn is_zero(&self) -> bool {
        self.spin_x == 0.0 && self.spin_y == 0.0
    }
}

/// Normalize a raw wheel payload.
pub fn normalize(raw: &RawWheel) -> NormalizedWheel {
    let mut spin_x = 0.0;
    let mut spin_y = 0.0;

    // Legacy fields, oldest first so newer ones win
    if let Some(detail) = raw.detail {
        spin_y = detail;
    }
    if let Some(delta) = raw.wheel_delta {
        spin_y = -delta / WHEEL_DELTA_PER_NOTCH;
    }
    if let Some(delta) = raw.wheel_delta_y {
        spin_y = -delta / WHEEL_DELTA_PER_NOTCH;
    }
    if let Some(delta) = raw.wheel_delta_x {
        spin_x = -delta / WHEEL_DELTA_PER_NOTCH;
    }
    if raw.horizontal_axis {
        spin_x = spin_y;
        spin_y = 0.0;
    }

    let mut pixel_x = spin_x * PIXEL_STEP;
    let mut pixel_y = spin_y * PIXEL_STEP;

    if let Some(delta) = raw.delta_y {
        pixel_y = delta;
    }
    if let Some(delta) = raw.delta_x {
        pixel_x = delta;
    }

    if pixel_x != 0.0 || pixel_y != 0.0 {
        let scale = match raw.delta_mode {
            DeltaMode::Pixel => 1.0,
            DeltaMode::Line => LINE_HEIGHT,
            DeltaMode::Page => PAGE_HEIGHT,
        };
        pixel_x *= scale;
        pixel_y *= scale;
    }

    // Sources without a spin still get a unit spin in the right direction
    if pixel_x != 0.0 && spin_x == 0.0 {
        spin_x = if pixel_x < 1.0 { -1.0 } else { 1.0 };
    }
    if pixel_y != 0.0 && spin_y == 0.0 {
        spin_y = if pixel_y < 1.0 { -1.0 } else { 1.0 };
    }

    NormalizedWheel {
        spin_x,
        spin_y,
        pixel_x,
        pixel_y,
    }
}

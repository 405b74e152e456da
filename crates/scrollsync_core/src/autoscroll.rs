//! Edge auto-scroll
//!
//! While the primary button is held on a surface, holding the pointer near
//! an edge keeps scrolling that way. Each run steps by the last pointer
//! displacement and retriggers after a delay proportional to it, so small
//! movements near the edge scroll slowly and often.

use std::time::Duration;

use scrollsync_platform::{Axis, Point};

/// Surface bounds the edge bands are measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgeBounds {
    /// Screen offset of the surface
    pub origin: Point,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct EdgeAutoScroll {
    armed: bool,
    pointer: Point,
    /// Pixels to step per tick, signed towards the edge
    delta: f32,
    /// Axis of the running auto-scroll
    active: Option<Axis>,
}

impl EdgeAutoScroll {
    pub fn arm(&mut self, at: Point) {
        *self = Self {
            armed: true,
            pointer: at,
            ..Self::default()
        };
    }

    pub fn disarm(&mut self) {
        *self = Self::default();
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Feed a pointer move.
    ///
    /// Returns the axis to start scrolling on when this move begins a run.
    /// `eligible` decides whether an axis may start (it has a scrollbar and
    /// the pointer is not over its track).
    pub fn track(
        &mut self,
        pointer: Point,
        bounds: EdgeBounds,
        eligible: impl Fn(Axis) -> bool,
    ) -> Option<Axis> {
        if !self.armed {
            return None;
        }

        let dx = pointer.x - self.pointer.x;
        let dy = pointer.y - self.pointer.y;
        let local = Point::new(pointer.x - bounds.origin.x, pointer.y - bounds.origin.y);
        let step = |d: f32, toward_end: bool| match (d == 0.0, toward_end) {
            (true, true) => 1.0,
            (true, false) => -1.0,
            (false, _) => d,
        };

        let hit = if dx >= 0.0 && local.x > bounds.width - bounds.margin {
            Some((Axis::X, step(dx, true)))
        } else if dx <= 0.0 && local.x < bounds.margin {
            Some((Axis::X, step(dx, false)))
        } else if dy >= 0.0 && local.y > bounds.height - bounds.margin {
            Some((Axis::Y, step(dy, true)))
        } else if dy <= 0.0 && local.y < bounds.margin {
            Some((Axis::Y, step(dy, false)))
        } else {
            None
        };
        self.pointer = pointer;

        match hit {
            Some((axis, delta)) => match self.active {
                Some(active) => {
                    if active == axis {
                        self.delta = delta;
                    }
                    None
                }
                None if eligible(axis) => {
                    self.delta = delta;
                    self.active = Some(axis);
                    Some(axis)
                }
                None => None,
            },
            None => {
                self.active = None;
                None
            }
        }
    }

    /// Axis and delta of the next step, if a run is active
    pub fn step(&self) -> Option<(Axis, f32)> {
        self.active.map(|axis| (axis, self.delta))
    }

    /// Delay before the next step
    pub fn delay(&self, ms_per_px: f32) -> Duration {
        let micros = (ms_per_px * self.delta.abs() * 1000.0).round().max(0.0);
        Duration::from_micros(micros as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: EdgeBounds = EdgeBounds {
        origin: Point::new(100.0, 50.0),
        width: 400.0,
        height: 300.0,
        margin: 40.0,
    };

    fn armed_at(x: f32, y: f32) -> EdgeAutoScroll {
        let mut auto = EdgeAutoScroll::default();
        auto.arm(Point::new(x, y));
        auto
    }

    #[test]
    fn test_unarmed_ignores_moves() {
        let mut auto = EdgeAutoScroll::default();
        assert_eq!(auto.track(Point::new(495.0, 200.0), BOUNDS, |_| true), None);
        assert!(!auto.is_running());
    }

    #[test]
    fn test_right_edge_starts_x() {
        let mut auto = armed_at(300.0, 200.0);
        assert_eq!(auto.track(Point::new(470.0, 200.0), BOUNDS, |_| true), Some(Axis::X));
        assert_eq!(auto.step(), Some((Axis::X, 170.0)));

        // Already running: no restart, delta follows the pointer
        assert_eq!(auto.track(Point::new(475.0, 200.0), BOUNDS, |_| true), None);
        assert_eq!(auto.step(), Some((Axis::X, 5.0)));
    }

    #[test]
    fn test_stationary_pointer_steps_by_one() {
        // Stationary inside the top band: x checks fail, top band matches
        let mut auto = armed_at(300.0, 70.0);
        assert_eq!(auto.track(Point::new(300.0, 70.0), BOUNDS, |_| true), Some(Axis::Y));
        assert_eq!(auto.step(), Some((Axis::Y, -1.0)));
    }

    #[test]
    fn test_bottom_edge_and_leaving_band() {
        let mut auto = armed_at(300.0, 200.0);
        assert_eq!(auto.track(Point::new(300.0, 330.0), BOUNDS, |_| true), Some(Axis::Y));
        assert_eq!(auto.step(), Some((Axis::Y, 130.0)));

        auto.track(Point::new(300.0, 200.0), BOUNDS, |_| true);
        assert!(!auto.is_running());
        assert!(auto.is_armed());
    }

    #[test]
    fn test_ineligible_axis_does_not_start() {
        let mut auto = armed_at(300.0, 200.0);
        assert_eq!(auto.track(Point::new(480.0, 200.0), BOUNDS, |axis| axis == Axis::Y), None);
        assert!(!auto.is_running());
    }

    #[test]
    fn test_delay_scales_with_delta() {
        let mut auto = armed_at(300.0, 200.0);
        auto.track(Point::new(300.0, 340.0), BOUNDS, |_| true);
        assert_eq!(auto.delay(10.0), Duration::from_millis(1400));
    }
}

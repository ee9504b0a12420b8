//! Snap layouts: which zone the cursor is over while dragging, and what
//! rectangle a zone covers on an output.

use std::fmt;

use crate::core::geometry::Rect;

/// Distance from an output edge that arms an edge snap.
pub const SNAP_EDGE_THRESHOLD: f64 = 16.0;
/// Distance from the top/bottom that turns a side snap into a quadrant.
pub const SNAP_CORNER_THRESHOLD: f64 = 48.0;
/// Strip at the bottom of every output kept free for the taskbar.
pub const TASKBAR_HEIGHT: i32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SnapZone {
    #[default]
    None,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Maximize,
}

impl SnapZone {
    pub fn name(&self) -> &'static str {
        match self {
            SnapZone::None => "none",
            SnapZone::Left => "left",
            SnapZone::Right => "right",
            SnapZone::TopLeft => "top-left",
            SnapZone::TopRight => "top-right",
            SnapZone::BottomLeft => "bottom-left",
            SnapZone::BottomRight => "bottom-right",
            SnapZone::Maximize => "maximize",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == SnapZone::None
    }
}

impl fmt::Display for SnapZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a layout-space cursor position against the output it is on.
/// First match wins: top edge (away from the sides) maximizes, then the
/// left edge, then the right edge.
pub fn snap_zone_at(x: f64, y: f64, output: Rect) -> SnapZone {
    let rx = x - output.x as f64;
    let ry = y - output.y as f64;
    let w = output.width as f64;
    let h = output.height as f64;

    let at_left = rx < SNAP_EDGE_THRESHOLD;
    let at_right = rx > w - SNAP_EDGE_THRESHOLD;
    let at_top = ry < SNAP_EDGE_THRESHOLD;
    let near_top = ry < SNAP_CORNER_THRESHOLD;
    let near_bottom = ry > h - SNAP_CORNER_THRESHOLD;

    if at_top && !at_left && !at_right {
        return SnapZone::Maximize;
    }
    if at_left {
        return if near_top {
            SnapZone::TopLeft
        } else if near_bottom {
            SnapZone::BottomLeft
        } else {
            SnapZone::Left
        };
    }
    if at_right {
        return if near_top {
            SnapZone::TopRight
        } else if near_bottom {
            SnapZone::BottomRight
        } else {
            SnapZone::Right
        };
    }
    SnapZone::None
}

/// Outer frame rectangle for `zone` on `output`, or `None` for
/// [`SnapZone::None`].
pub fn zone_geometry(zone: SnapZone, output: Rect) -> Option<Rect> {
    let usable_h = output.height - TASKBAR_HEIGHT;
    let half_w = output.width / 2;
    let half_h = usable_h / 2;
    let (ox, oy) = (output.x, output.y);

    let rect = match zone {
        SnapZone::None => return None,
        SnapZone::Left => Rect::new(ox, oy, half_w, usable_h),
        SnapZone::Right => Rect::new(ox + half_w, oy, half_w, usable_h),
        SnapZone::TopLeft => Rect::new(ox, oy, half_w, half_h),
        SnapZone::TopRight => Rect::new(ox + half_w, oy, half_w, half_h),
        SnapZone::BottomLeft => Rect::new(ox, oy + half_h, half_w, half_h),
        SnapZone::BottomRight => Rect::new(ox + half_w, oy + half_h, half_w, half_h),
        SnapZone::Maximize => Rect::new(ox, oy, output.width, usable_h),
    };
    Some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: Rect = Rect::new(0, 0, 1920, 1080);

    #[test]
    fn test_zone_at_edges_and_corners() {
        assert_eq!(snap_zone_at(5.0, 500.0, OUTPUT), SnapZone::Left);
        assert_eq!(snap_zone_at(5.0, 30.0, OUTPUT), SnapZone::TopLeft);
        assert_eq!(snap_zone_at(5.0, 1070.0, OUTPUT), SnapZone::BottomLeft);
        assert_eq!(snap_zone_at(1915.0, 500.0, OUTPUT), SnapZone::Right);
        assert_eq!(snap_zone_at(1915.0, 10.0, OUTPUT), SnapZone::TopRight);
        assert_eq!(snap_zone_at(1915.0, 1050.0, OUTPUT), SnapZone::BottomRight);
        assert_eq!(snap_zone_at(960.0, 3.0, OUTPUT), SnapZone::Maximize);
        assert_eq!(snap_zone_at(960.0, 500.0, OUTPUT), SnapZone::None);
        // top-left pixel is a corner, not maximize
        assert_eq!(snap_zone_at(0.0, 0.0, OUTPUT), SnapZone::TopLeft);
    }

    #[test]
    fn test_zone_at_thresholds() {
        assert_eq!(snap_zone_at(15.9, 500.0, OUTPUT), SnapZone::Left);
        assert_eq!(snap_zone_at(16.0, 500.0, OUTPUT), SnapZone::None);
        assert_eq!(snap_zone_at(1904.0, 500.0, OUTPUT), SnapZone::None);
        assert_eq!(snap_zone_at(1904.1, 500.0, OUTPUT), SnapZone::Right);
        assert_eq!(snap_zone_at(5.0, 47.9, OUTPUT), SnapZone::TopLeft);
        assert_eq!(snap_zone_at(5.0, 48.0, OUTPUT), SnapZone::Left);
        assert_eq!(snap_zone_at(500.0, 16.0, OUTPUT), SnapZone::None);
    }

    #[test]
    fn test_zone_at_is_relative_to_output() {
        let second = Rect::new(1920, 0, 1280, 1024);
        assert_eq!(snap_zone_at(1925.0, 500.0, second), SnapZone::Left);
        assert_eq!(snap_zone_at(3195.0, 500.0, second), SnapZone::Right);
        assert_eq!(snap_zone_at(2500.0, 2.0, second), SnapZone::Maximize);
    }

    #[test]
    fn test_zone_at_is_pure() {
        for &(x, y) in &[(5.0, 500.0), (1900.0, 1060.0), (800.0, 4.0), (800.0, 800.0)] {
            assert_eq!(snap_zone_at(x, y, OUTPUT), snap_zone_at(x, y, OUTPUT));
        }
    }

    #[test]
    fn test_zone_geometry_reserves_taskbar() {
        let output = Rect::new(0, 0, 1920, 1040);
        assert_eq!(zone_geometry(SnapZone::Left, output), Some(Rect::new(0, 0, 960, 992)));
        assert_eq!(zone_geometry(SnapZone::Right, output), Some(Rect::new(960, 0, 960, 992)));
        assert_eq!(zone_geometry(SnapZone::TopRight, output), Some(Rect::new(960, 0, 960, 496)));
        assert_eq!(
            zone_geometry(SnapZone::BottomLeft, output),
            Some(Rect::new(0, 496, 960, 496))
        );
        assert_eq!(zone_geometry(SnapZone::Maximize, output), Some(Rect::new(0, 0, 1920, 992)));
        assert_eq!(zone_geometry(SnapZone::None, output), None);
    }

    #[test]
    fn test_zone_geometry_offset_output() {
        let output = Rect::new(1920, 100, 1280, 1024);
        assert_eq!(
            zone_geometry(SnapZone::BottomRight, output),
            Some(Rect::new(2560, 588, 640, 488))
        );
    }

    #[test]
    fn test_zone_names() {
        assert_eq!(SnapZone::TopLeft.to_string(), "top-left");
        assert_eq!(SnapZone::Maximize.name(), "maximize");
        assert_eq!(SnapZone::default(), SnapZone::None);
    }
}

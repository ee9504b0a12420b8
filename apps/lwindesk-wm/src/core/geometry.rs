use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in output-layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        !self.is_empty()
            && x >= self.x as f64
            && y >= self.y as f64
            && x < (self.x + self.width) as f64
            && y < (self.y + self.height) as f64
    }

    /// Smallest rectangle covering both. An empty side is ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = (self.x + self.width).max(other.x + other.width);
        let y2 = (self.y + self.height).max(other.y + other.height);
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Clamp a point into the rectangle (right/bottom edge inclusive of the
    /// last pixel).
    pub fn clamp_point(&self, x: f64, y: f64) -> (f64, f64) {
        if self.is_empty() {
            return (x, y);
        }
        let max_x = (self.x + self.width - 1) as f64;
        let max_y = (self.y + self.height - 1) as f64;
        (x.clamp(self.x as f64, max_x), y.clamp(self.y as f64, max_y))
    }
}

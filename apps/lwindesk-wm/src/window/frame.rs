/// Height of the server-side title bar.
pub const TITLEBAR_HEIGHT: i32 = 32;
/// Width of each caption button slot. The renderer lays the slots out with
/// the same constant, right to left: close, maximize, minimize.
pub const BUTTON_WIDTH: i32 = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationRegion {
    TitleBar,
    Minimize,
    Maximize,
    Close,
}

impl DecorationRegion {
    /// Classify a point relative to the title bar's top-left corner.
    /// Returns `None` outside the bar.
    pub fn classify(width: i32, x: f64, y: f64) -> Option<DecorationRegion> {
        if width <= 0 || x < 0.0 || y < 0.0 || x >= width as f64 || y >= TITLEBAR_HEIGHT as f64 {
            return None;
        }

        let w = width as f64;
        let slot = BUTTON_WIDTH as f64;
        if x >= w - slot {
            Some(DecorationRegion::Close)
        } else if x >= w - 2.0 * slot {
            Some(DecorationRegion::Maximize)
        } else if x >= w - 3.0 * slot {
            Some(DecorationRegion::Minimize)
        } else {
            Some(DecorationRegion::TitleBar)
        }
    }

    /// Left edge of this region's slot in a bar of the given width.
    pub fn slot_x(&self, width: i32) -> i32 {
        match self {
            DecorationRegion::Close => width - BUTTON_WIDTH,
            DecorationRegion::Maximize => width - 2 * BUTTON_WIDTH,
            DecorationRegion::Minimize => width - 3 * BUTTON_WIDTH,
            DecorationRegion::TitleBar => 0,
        }
    }
}

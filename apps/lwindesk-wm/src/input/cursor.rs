use crate::core::event::ResizeEdges;
use crate::core::geometry::Rect;
use crate::window::snap::SnapZone;
use crate::window::view::ViewId;

/// Cursor theme names handed to the backend.
pub const CURSOR_DEFAULT: &str = "default";
pub const CURSOR_MOVE: &str = "grabbing";

/// Theme name for a resize grab on the given edges.
pub fn resize_cursor(edges: ResizeEdges) -> &'static str {
    let top = edges.contains(ResizeEdges::TOP);
    let bottom = edges.contains(ResizeEdges::BOTTOM);
    let left = edges.contains(ResizeEdges::LEFT);
    let right = edges.contains(ResizeEdges::RIGHT);
    match (top, bottom, left, right) {
        (true, _, true, _) => "nw-resize",
        (true, _, _, true) => "ne-resize",
        (_, true, true, _) => "sw-resize",
        (_, true, _, true) => "se-resize",
        (true, _, _, _) => "n-resize",
        (_, true, _, _) => "s-resize",
        (_, _, true, _) => "w-resize",
        (_, _, _, true) => "e-resize",
        _ => CURSOR_DEFAULT,
    }
}

/// Interactive pointer state. A grabbed view exists exactly in the `Move`
/// and `Resize` states, and a pending snap only while moving.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CursorMode {
    #[default]
    Passthrough,
    Move {
        view: ViewId,
        grab_x: f64,
        grab_y: f64,
        pending_snap: SnapZone,
    },
    Resize {
        view: ViewId,
        grab_x: f64,
        grab_y: f64,
        geobox: Rect,
        edges: ResizeEdges,
    },
}

impl CursorMode {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, CursorMode::Passthrough)
    }

    pub fn grabbed_view(&self) -> Option<ViewId> {
        match *self {
            CursorMode::Passthrough => None,
            CursorMode::Move { view, .. } | CursorMode::Resize { view, .. } => Some(view),
        }
    }

    pub fn pending_snap(&self) -> SnapZone {
        match *self {
            CursorMode::Move { pending_snap, .. } => pending_snap,
            _ => SnapZone::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_accessors() {
        let mode = CursorMode::default();
        assert!(mode.is_passthrough());
        assert_eq!(mode.grabbed_view(), None);
        assert_eq!(mode.pending_snap(), SnapZone::None);

        let mode = CursorMode::Move {
            view: ViewId(4),
            grab_x: 10.0,
            grab_y: 5.0,
            pending_snap: SnapZone::Left,
        };
        assert_eq!(mode.grabbed_view(), Some(ViewId(4)));
        assert_eq!(mode.pending_snap(), SnapZone::Left);

        let mode = CursorMode::Resize {
            view: ViewId(2),
            grab_x: 0.0,
            grab_y: 0.0,
            geobox: Rect::new(0, 0, 640, 480),
            edges: ResizeEdges::BOTTOM | ResizeEdges::RIGHT,
        };
        assert_eq!(mode.grabbed_view(), Some(ViewId(2)));
        assert_eq!(mode.pending_snap(), SnapZone::None);
    }

    #[test]
    fn test_resize_cursor_names() {
        assert_eq!(resize_cursor(ResizeEdges::TOP | ResizeEdges::LEFT), "nw-resize");
        assert_eq!(resize_cursor(ResizeEdges::BOTTOM | ResizeEdges::RIGHT), "se-resize");
        assert_eq!(resize_cursor(ResizeEdges::RIGHT), "e-resize");
        assert_eq!(resize_cursor(ResizeEdges::empty()), CURSOR_DEFAULT);
    }
}

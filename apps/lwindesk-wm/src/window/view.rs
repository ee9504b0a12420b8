use std::fmt;

use crate::core::event::SurfaceId;
use crate::core::geometry::Rect;
use crate::window::decoration::Decoration;
use crate::window::placement::ShellRole;
use crate::window::snap::SnapZone;
use crate::window::LAYER_NORMAL;

/// Stable handle of a managed view. Ids are never reused, so a stale handle
/// simply stops resolving once its view is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

#[derive(Debug)]
pub struct View {
    pub id: ViewId,
    pub surface: SurfaceId,
    pub title: Option<String>,
    /// Top-left of the frame (title bar included) in layout coordinates.
    pub x: i32,
    pub y: i32,
    pub mapped: bool,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub is_snapped: bool,
    pub snap_zone: SnapZone,
    /// Position and surface size before the first snap/maximize.
    pub saved_geometry: Rect,
    pub workspace: usize,
    pub decoration: Decoration,
    pub layer: u16,
}

impl View {
    pub fn new(id: ViewId, surface: SurfaceId, title: Option<String>, workspace: usize) -> Self {
        Self {
            id,
            surface,
            title,
            x: 0,
            y: 0,
            mapped: false,
            is_minimized: false,
            is_maximized: false,
            is_snapped: false,
            snap_zone: SnapZone::None,
            saved_geometry: Rect::default(),
            workspace,
            decoration: Decoration::default(),
            layer: LAYER_NORMAL,
        }
    }

    pub fn shell_role(&self) -> Option<ShellRole> {
        self.title.as_deref().and_then(ShellRole::from_title)
    }

    /// Windows belonging to the desktop shell process.
    pub fn is_shell(&self) -> bool {
        self.shell_role().is_some()
    }

    /// Shell windows follow every workspace.
    pub fn is_sticky(&self) -> bool {
        self.is_shell()
    }

    pub fn is_visible(&self, active_workspace: usize) -> bool {
        self.mapped && !self.is_minimized && (self.is_sticky() || self.workspace == active_workspace)
    }

    /// Eligible for Alt-Tab.
    pub fn is_cycle_target(&self) -> bool {
        self.mapped && !self.is_minimized && !self.is_shell()
    }

    /// Layout position of the client surface's top-left corner.
    pub fn surface_origin(&self) -> (i32, i32) {
        (self.x, self.y + self.decoration.offset())
    }

    /// Outer rectangle for a surface of the given size.
    pub fn frame_rect(&self, surface: Rect) -> Rect {
        Rect::new(self.x, self.y, surface.width, surface.height + self.decoration.offset())
    }

    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingRenderer;

    #[test]
    fn test_visibility() {
        let mut view = View::new(ViewId(1), SurfaceId(1), Some("Terminal".into()), 0);
        assert!(!view.is_visible(0));
        view.mapped = true;
        assert!(view.is_visible(0));
        assert!(!view.is_visible(1));
        view.is_minimized = true;
        assert!(!view.is_visible(0));
        assert!(!view.is_cycle_target());
    }

    #[test]
    fn test_shell_windows_are_sticky() {
        let mut view = View::new(ViewId(1), SurfaceId(1), Some("lwindesk-taskbar".into()), 0);
        view.mapped = true;
        assert!(view.is_shell());
        assert!(view.is_visible(3));
        assert!(!view.is_cycle_target());

        let untitled = View::new(ViewId(2), SurfaceId(2), None, 0);
        assert!(!untitled.is_shell());
    }

    #[test]
    fn test_decoration_offsets_surface() {
        let mut view = View::new(ViewId(1), SurfaceId(1), None, 0);
        view.x = 100;
        view.y = 50;
        assert_eq!(view.surface_origin(), (100, 50));

        view.decoration.enable(&mut CountingRenderer::default(), 640, None);
        assert_eq!(view.surface_origin(), (100, 82));
        assert_eq!(
            view.frame_rect(Rect::new(0, 0, 640, 480)),
            Rect::new(100, 50, 640, 512)
        );
    }
}

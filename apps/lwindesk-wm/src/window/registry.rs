//! Ownership of all views, their focus order, and point queries.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::core::backend::Backend;
use crate::core::event::SurfaceId;
use crate::window::frame::DecorationRegion;
use crate::window::view::{View, ViewId};

/// What lies under a layout-space point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// Client content; `sx, sy` are surface-local.
    Surface {
        view: ViewId,
        surface: SurfaceId,
        sx: f64,
        sy: f64,
    },
    Decoration {
        view: ViewId,
        region: DecorationRegion,
    },
    Background,
}

impl Hit {
    pub fn view(&self) -> Option<ViewId> {
        match *self {
            Hit::Surface { view, .. } | Hit::Decoration { view, .. } => Some(view),
            Hit::Background => None,
        }
    }
}

/// Owns every view. The z-order holds mapped views only, front first, and
/// never contains an id twice.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: HashMap<ViewId, View>,
    by_surface: HashMap<SurfaceId, ViewId>,
    z_order: Vec<ViewId>,
    focused: Option<ViewId>,
    next_id: u64,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, surface: SurfaceId, title: Option<String>, workspace: usize) -> ViewId {
        self.next_id += 1;
        let id = ViewId(self.next_id);
        debug!("Creating {} for surface {:?} ({:?})", id, surface, title);
        self.views.insert(id, View::new(id, surface, title, workspace));
        self.by_surface.insert(surface, id);
        id
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn lookup(&self, surface: SurfaceId) -> Option<ViewId> {
        self.by_surface.get(&surface).copied()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// Focus order, front (topmost) first.
    pub fn z_order(&self) -> &[ViewId] {
        &self.z_order
    }

    pub fn front(&self) -> Option<ViewId> {
        self.z_order.first().copied()
    }

    /// The view holding keyboard focus.
    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    /// Topmost view in focus order that is visible on `active_workspace`.
    pub fn front_visible(&self, active_workspace: usize) -> Option<ViewId> {
        self.z_order
            .iter()
            .copied()
            .find(|id| self.views.get(id).map(|v| v.is_visible(active_workspace)).unwrap_or(false))
    }

    /// Insert at the front of the z-order and mark mapped.
    pub fn map(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get_mut(&id) else {
            return false;
        };
        view.mapped = true;
        self.z_order.retain(|&v| v != id);
        self.z_order.insert(0, id);
        true
    }

    /// Remove from the z-order and drop keyboard focus if it was here.
    pub fn unmap(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get_mut(&id) else {
            return false;
        };
        view.mapped = false;
        self.z_order.retain(|&v| v != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        true
    }

    /// Raise and activate a view, moving keyboard focus to it.
    pub fn focus(&mut self, id: ViewId, backend: &mut dyn Backend) -> bool {
        if self.focused == Some(id) {
            return false;
        }
        let Some(surface) = self.views.get(&id).map(|v| v.surface) else {
            return false;
        };

        if let Some(prev) = self.focused.and_then(|p| self.views.get(&p)) {
            backend.set_activated(prev.surface, false);
        }

        if self.views.get(&id).map(|v| v.mapped).unwrap_or(false) {
            self.z_order.retain(|&v| v != id);
            self.z_order.insert(0, id);
        }
        backend.set_activated(surface, true);
        backend.keyboard_enter(surface);
        self.focused = Some(id);
        debug!("Focused {}", id);
        true
    }

    /// Deactivate the focused view and leave the keyboard unfocused.
    pub fn blur(&mut self, backend: &mut dyn Backend) -> bool {
        let Some(prev) = self.focused.take() else {
            return false;
        };
        if let Some(view) = self.views.get(&prev) {
            backend.set_activated(view.surface, false);
        }
        backend.keyboard_clear_focus();
        debug!("Keyboard focus cleared from {}", prev);
        true
    }

    /// Hide a view. The z-order is left alone.
    pub fn minimize(&mut self, id: ViewId) -> bool {
        match self.views.get_mut(&id) {
            Some(view) if !view.is_minimized => {
                view.is_minimized = true;
                info!("Minimized {} ({})", id, view.title_str());
                true
            }
            _ => false,
        }
    }

    pub fn unminimize(&mut self, id: ViewId, backend: &mut dyn Backend) -> bool {
        let Some(view) = self.views.get_mut(&id) else {
            return false;
        };
        view.is_minimized = false;
        self.focus(id, backend);
        true
    }

    /// Ask the client to close. State changes arrive later as unmap and
    /// destroy events.
    pub fn close(&self, id: ViewId, backend: &mut dyn Backend) -> bool {
        match self.views.get(&id) {
            Some(view) => {
                backend.send_close(view.surface);
                true
            }
            None => false,
        }
    }

    /// Free a view. The decoration goes first so nothing can hit-test into
    /// it afterwards.
    pub fn destroy(&mut self, id: ViewId) -> Option<View> {
        if let Some(view) = self.views.get_mut(&id) {
            view.decoration.disable();
        }
        self.z_order.retain(|&v| v != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        let view = self.views.remove(&id)?;
        self.by_surface.remove(&view.surface);
        debug!("Destroyed {}", id);
        Some(view)
    }

    /// Visible views top to bottom: the z-order, stably grouped by layer.
    pub fn stacking_order(&self, active_workspace: usize) -> Vec<ViewId> {
        let mut order: Vec<(u16, ViewId)> = self
            .z_order
            .iter()
            .filter_map(|id| self.views.get(id))
            .filter(|v| v.is_visible(active_workspace))
            .map(|v| (v.layer, v.id))
            .collect();
        order.sort_by(|a, b| b.0.cmp(&a.0));
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Topmost decoration or surface under a layout point.
    pub fn hit_test(&self, lx: f64, ly: f64, active_workspace: usize, backend: &dyn Backend) -> Hit {
        for id in self.stacking_order(active_workspace) {
            let Some(view) = self.views.get(&id) else {
                continue;
            };

            let (dx, dy) = (lx - view.x as f64, ly - view.y as f64);
            if let Some(region) = view.decoration.hit_test(dx, dy) {
                return Hit::Decoration { view: id, region };
            }

            let geo = backend.geometry(view.surface);
            let (ox, oy) = view.surface_origin();
            let (sx, sy) = (lx - ox as f64, ly - oy as f64);
            if sx >= 0.0 && sy >= 0.0 && sx < geo.width as f64 && sy < geo.height as f64 {
                return Hit::Surface {
                    view: id,
                    surface: view.surface,
                    sx,
                    sy,
                };
            }
        }
        Hit::Background
    }

    /// Alt-Tab target: the first eligible view after the visible front one,
    /// wrapping around to the start but never back onto the front view
    /// itself. Views on other workspaces are skipped.
    pub fn next_cycle_target(&self, active_workspace: usize) -> Option<ViewId> {
        let current = self.front_visible(active_workspace)?;
        let start = self.z_order.iter().position(|&v| v == current)?;
        let eligible = |id: &&ViewId| {
            self.views
                .get(*id)
                .map(|v| v.is_cycle_target() && v.is_visible(active_workspace))
                .unwrap_or(false)
        };

        self.z_order[start + 1..]
            .iter()
            .find(eligible)
            .or_else(|| self.z_order[..start].iter().find(eligible))
            .copied()
    }

    /// Move a view to the back of the focus order.
    pub fn lower(&mut self, id: ViewId) {
        if self.z_order.contains(&id) {
            self.z_order.retain(|&v| v != id);
            self.z_order.push(id);
        }
    }
}

use lwindesk_config::WmConfig;
use lwindesk_ipc::IpcMessage;
use tracing::{debug, info, trace, warn};

use crate::core::backend::Backend;
use crate::core::event::{
    Command, Event, EventSink, KeyboardEvent, OutputEvent, PointerEvent, ResizeEdges, SurfaceEvent,
    SurfaceId,
};
use crate::core::geometry::Rect;
use crate::core::output::OutputLayout;
use crate::input::cursor::{resize_cursor, CursorMode, CURSOR_DEFAULT, CURSOR_MOVE};
use crate::input::keyboard::{lookup, Action, KeyOutcome, Keysym, Modifiers, SuperTracker};
use crate::window::draw::{Artwork, TitlebarRenderer};
use crate::window::frame::{DecorationRegion, TITLEBAR_HEIGHT};
use crate::window::placement::center_window;
use crate::window::registry::{Hit, ViewRegistry};
use crate::window::snap::{snap_zone_at, zone_geometry, SnapZone};
use crate::window::view::ViewId;
use crate::window::workspace::WorkspaceManager;

/// One entry of the draw order handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub view: ViewId,
    pub surface: SurfaceId,
    pub frame: Rect,
    pub surface_origin: (i32, i32),
    pub decoration: Option<&'a Artwork>,
}

/// The policy core: consumes backend events, keeps view, workspace and
/// input state consistent, and issues commands back to the backend.
pub struct WindowManager<B: Backend, R: TitlebarRenderer> {
    backend: B,
    renderer: R,
    views: ViewRegistry,
    workspaces: WorkspaceManager,
    outputs: OutputLayout,
    cursor: CursorMode,
    cursor_x: f64,
    cursor_y: f64,
    pointer_focus: Option<SurfaceId>,
    super_tracker: SuperTracker,
    notifications: Vec<IpcMessage>,
    default_size: (i32, i32),
}

impl<B: Backend, R: TitlebarRenderer> WindowManager<B, R> {
    pub fn new(backend: B, renderer: R, config: &WmConfig) -> Self {
        Self {
            backend,
            renderer,
            views: ViewRegistry::new(),
            workspaces: WorkspaceManager::with_names(&config.workspaces),
            outputs: OutputLayout::new(),
            cursor: CursorMode::Passthrough,
            cursor_x: 0.0,
            cursor_y: 0.0,
            pointer_focus: None,
            super_tracker: SuperTracker::default(),
            notifications: Vec::new(),
            default_size: (config.window.default_width, config.window.default_height),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    pub fn workspaces(&self) -> &WorkspaceManager {
        &self.workspaces
    }

    pub fn outputs(&self) -> &OutputLayout {
        &self.outputs
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor
    }

    pub fn cursor_position(&self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn pointer_focus(&self) -> Option<SurfaceId> {
        self.pointer_focus
    }

    /// Messages for the shell produced since the last call.
    pub fn drain_notifications(&mut self) -> Vec<IpcMessage> {
        std::mem::take(&mut self.notifications)
    }

    /// Visible views bottom to top, ready for compositing.
    pub fn draw_order(&self) -> Vec<DrawItem<'_>> {
        let active = self.workspaces.active();
        self.views
            .stacking_order(active)
            .into_iter()
            .rev()
            .filter_map(|id| self.views.get(id))
            .map(|view| DrawItem {
                view: view.id,
                surface: view.surface,
                frame: view.frame_rect(self.backend.geometry(view.surface)),
                surface_origin: view.surface_origin(),
                decoration: view.decoration.artwork(),
            })
            .collect()
    }

    fn notify(&mut self, message: IpcMessage) {
        info!("Notifying shell: {}", message);
        self.notifications.push(message);
    }

    // --- surface lifecycle ---

    fn handle_surface(&mut self, surface: SurfaceId, event: SurfaceEvent) {
        if let SurfaceEvent::Created { title } = event {
            self.create_view(surface, title);
            return;
        }

        let Some(id) = self.views.lookup(surface) else {
            debug!("Event {:?} for unknown surface {:?}", event, surface);
            return;
        };

        match event {
            SurfaceEvent::Created { .. } => {}
            SurfaceEvent::Mapped => self.map_view(id),
            SurfaceEvent::Unmapped => self.unmap_view(id),
            SurfaceEvent::Committed { initial } => {
                if initial {
                    self.backend.set_size(surface, 0, 0);
                }
                self.update_decoration(id);
            }
            SurfaceEvent::Destroyed => self.destroy_view(id),
            SurfaceEvent::TitleChanged { title } => {
                if let Some(view) = self.views.get_mut(id) {
                    view.title = title;
                }
                self.update_decoration(id);
            }
            SurfaceEvent::MoveRequested => self.begin_move(id, true),
            SurfaceEvent::ResizeRequested { edges } => self.begin_resize(id, edges),
            SurfaceEvent::MaximizeRequested => self.toggle_maximize(id),
            SurfaceEvent::MinimizeRequested => {
                self.views.minimize(id);
            }
            SurfaceEvent::FullscreenRequested { fullscreen } => {
                info!("Fullscreen request ({}) for {} ignored", fullscreen, id);
            }
        }
    }

    fn create_view(&mut self, surface: SurfaceId, title: Option<String>) {
        if let Some(existing) = self.views.lookup(surface) {
            warn!("Surface {:?} already managed as {}", surface, existing);
            return;
        }
        let workspace = self.workspaces.active();
        let id = self.views.create(surface, title, workspace);
        self.workspaces.adopt(id);
    }

    fn map_view(&mut self, id: ViewId) {
        if !self.views.map(id) {
            return;
        }
        let extents = self.outputs.extents();
        let (default_w, default_h) = self.default_size;

        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if let Some(role) = view.shell_role() {
            view.layer = role.layer();
            (view.x, view.y) = role.position(extents);
            info!("Mapped shell window {:?} at {},{}", role, view.x, view.y);
        } else {
            let geo = self.backend.geometry(view.surface);
            let w = if geo.width > 0 { geo.width } else { default_w };
            let h = if geo.height > 0 { geo.height } else { default_h };
            view.decoration.enable(&mut self.renderer, w, view.title.as_deref());
            (view.x, view.y) = center_window(extents, w, h);
            info!("Mapped {} ({}) at {},{}", id, view.title_str(), view.x, view.y);
        }

        self.views.focus(id, &mut self.backend);
    }

    fn unmap_view(&mut self, id: ViewId) {
        self.release_references(id);
        self.views.unmap(id);
    }

    fn destroy_view(&mut self, id: ViewId) {
        self.release_references(id);
        if let Some(view) = self.views.destroy(id) {
            self.workspaces.forget(id);
            debug!("Freed {} ({})", id, view.title_str());
        }
    }

    /// Drop the grab and pointer focus if they point at `id`.
    fn release_references(&mut self, id: ViewId) {
        if self.cursor.grabbed_view() == Some(id) {
            debug!("Cancelling grab on {}", id);
            self.cursor = CursorMode::Passthrough;
        }
        let surface = self.views.get(id).map(|v| v.surface);
        if surface.is_some() && self.pointer_focus == surface {
            self.clear_pointer_focus();
        }
    }

    fn update_decoration(&mut self, id: ViewId) {
        if let Some(view) = self.views.get_mut(id) {
            let geo = self.backend.geometry(view.surface);
            if view.decoration.update(&mut self.renderer, geo.width, view.title.as_deref()) {
                debug!("Re-rendered decoration of {} at width {}", id, geo.width);
            }
        }
    }

    // --- snapping ---

    /// Snap on the output under the view, falling back to the one under the
    /// cursor.
    pub fn snap(&mut self, id: ViewId, zone: SnapZone) {
        let output = self.views.get(id).and_then(|v| {
            self.outputs
                .output_at(v.x as f64 + 1.0, v.y as f64 + 1.0)
                .or_else(|| self.outputs.output_at(self.cursor_x, self.cursor_y))
        });
        self.snap_on(id, zone, output);
    }

    fn snap_on(&mut self, id: ViewId, zone: SnapZone, output: Option<Rect>) {
        if zone.is_none() {
            return;
        }
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let geo = self.backend.geometry(view.surface);
        if !view.is_snapped && !view.is_maximized {
            view.saved_geometry = Rect::new(view.x, view.y, geo.width, geo.height);
        }
        let Some(target) = output.and_then(|o| zone_geometry(zone, o)) else {
            return;
        };

        let mut surface_h = target.height;
        if view.decoration.is_enabled() {
            surface_h = (surface_h - TITLEBAR_HEIGHT).max(1);
        }
        self.backend.set_size(view.surface, target.width, surface_h);
        view.x = target.x;
        view.y = target.y;
        view.is_snapped = true;
        view.is_maximized = zone == SnapZone::Maximize;
        view.snap_zone = zone;
        info!("Snapped {} to {}", id, zone);

        self.update_decoration(id);
    }

    /// Return a snapped or maximized view to its saved geometry.
    pub fn restore(&mut self, id: ViewId) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if !view.is_snapped && !view.is_maximized {
            return;
        }
        let saved = view.saved_geometry;
        self.backend.set_size(view.surface, saved.width, saved.height);
        view.x = saved.x;
        view.y = saved.y;
        view.is_snapped = false;
        view.is_maximized = false;
        view.snap_zone = SnapZone::None;
        info!("Restored {} to {},{} {}x{}", id, saved.x, saved.y, saved.width, saved.height);

        self.update_decoration(id);
    }

    pub fn toggle_maximize(&mut self, id: ViewId) {
        match self.views.get(id).map(|v| v.is_maximized) {
            Some(true) => self.restore(id),
            Some(false) => self.snap(id, SnapZone::Maximize),
            None => {}
        }
    }

    // --- pointer ---

    fn begin_move(&mut self, id: ViewId, require_pointer_focus: bool) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        if require_pointer_focus && self.pointer_focus != Some(view.surface) {
            debug!("Move request from {} without pointer focus", id);
            return;
        }
        self.cursor = CursorMode::Move {
            view: id,
            grab_x: self.cursor_x - view.x as f64,
            grab_y: self.cursor_y - view.y as f64,
            pending_snap: SnapZone::None,
        };
        self.backend.set_cursor_image(CURSOR_MOVE);
    }

    fn begin_resize(&mut self, id: ViewId, edges: ResizeEdges) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        if self.pointer_focus != Some(view.surface) {
            debug!("Resize request from {} without pointer focus", id);
            return;
        }
        let geo = self.backend.geometry(view.surface);
        self.cursor = CursorMode::Resize {
            view: id,
            grab_x: self.cursor_x - view.x as f64,
            grab_y: self.cursor_y - view.y as f64,
            geobox: Rect::new(view.x, view.y, geo.width, geo.height),
            edges,
        };
        self.backend.set_cursor_image(resize_cursor(edges));
    }

    fn clear_pointer_focus(&mut self) {
        if self.pointer_focus.take().is_some() {
            self.backend.pointer_clear_focus();
        }
    }

    fn warp(&mut self, x: f64, y: f64) {
        let extents = self.outputs.extents();
        let (x, y) = extents.clamp_point(x, y);
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Motion { time, dx, dy } => {
                self.warp(self.cursor_x + dx, self.cursor_y + dy);
                self.process_motion(time);
            }
            PointerEvent::MotionAbsolute { time, x, y } => {
                self.warp(x, y);
                self.process_motion(time);
            }
            PointerEvent::Button { time, button, pressed } => self.handle_button(time, button, pressed),
            PointerEvent::Axis { time, orientation, delta, discrete } => {
                self.backend.pointer_axis(time, orientation, delta, discrete);
            }
            PointerEvent::Frame => self.backend.pointer_frame(),
        }
    }

    fn process_motion(&mut self, time: u32) {
        let (cx, cy) = (self.cursor_x, self.cursor_y);
        match self.cursor {
            CursorMode::Move { view, grab_x, grab_y, .. } => {
                if let Some(v) = self.views.get_mut(view) {
                    v.x = (cx - grab_x) as i32;
                    v.y = (cy - grab_y) as i32;
                }
                let zone = self
                    .outputs
                    .output_at(cx, cy)
                    .map(|o| snap_zone_at(cx, cy, o))
                    .unwrap_or_default();
                if let CursorMode::Move { ref mut pending_snap, .. } = self.cursor {
                    *pending_snap = zone;
                }
            }
            // Geometry is not adjusted while resizing.
            CursorMode::Resize { .. } => {}
            CursorMode::Passthrough => {
                let active = self.workspaces.active();
                match self.views.hit_test(cx, cy, active, &self.backend) {
                    Hit::Decoration { .. } => {
                        self.backend.set_cursor_image(CURSOR_DEFAULT);
                        self.clear_pointer_focus();
                    }
                    Hit::Surface { surface, sx, sy, .. } => {
                        if self.pointer_focus != Some(surface) {
                            self.backend.pointer_enter(surface, sx, sy);
                            self.pointer_focus = Some(surface);
                        }
                        self.backend.pointer_motion(time, sx, sy);
                    }
                    Hit::Background => {
                        self.backend.set_cursor_image(CURSOR_DEFAULT);
                        self.clear_pointer_focus();
                    }
                }
            }
        }
    }

    fn handle_button(&mut self, time: u32, button: u32, pressed: bool) {
        if !pressed {
            if let CursorMode::Move { view, pending_snap, .. } = self.cursor {
                if !pending_snap.is_none() {
                    let output = self.outputs.output_at(self.cursor_x, self.cursor_y);
                    self.snap_on(view, pending_snap, output);
                }
            }
            if !self.cursor.is_passthrough() {
                self.cursor = CursorMode::Passthrough;
                self.backend.set_cursor_image(CURSOR_DEFAULT);
            }
            self.backend.pointer_button(time, button, false);
            return;
        }

        let active = self.workspaces.active();
        match self.views.hit_test(self.cursor_x, self.cursor_y, active, &self.backend) {
            Hit::Decoration { view, region } => {
                self.views.focus(view, &mut self.backend);
                match region {
                    DecorationRegion::Close => {
                        self.views.close(view, &mut self.backend);
                    }
                    DecorationRegion::Maximize => self.toggle_maximize(view),
                    DecorationRegion::Minimize => {
                        self.views.minimize(view);
                    }
                    DecorationRegion::TitleBar => self.begin_move(view, false),
                }
            }
            hit => {
                self.backend.pointer_button(time, button, true);
                if let Some(view) = hit.view() {
                    self.views.focus(view, &mut self.backend);
                }
            }
        }
    }

    // --- keyboard ---

    fn handle_keyboard(&mut self, event: KeyboardEvent) {
        match event {
            KeyboardEvent::Key { time, keycode, keysyms, modifiers, pressed } => {
                self.handle_key(time, keycode, &keysyms, modifiers, pressed)
            }
            KeyboardEvent::Modifiers { modifiers } => self.backend.keyboard_modifiers(modifiers),
        }
    }

    fn handle_key(&mut self, time: u32, keycode: u32, keysyms: &[Keysym], modifiers: Modifiers, pressed: bool) {
        match self.super_tracker.feed(keycode, pressed) {
            KeyOutcome::Swallowed => return,
            KeyOutcome::ToggleStartMenu => {
                self.notify(IpcMessage::ToggleStartMenu);
                return;
            }
            KeyOutcome::Forward => {}
        }

        if pressed {
            if let Some(action) = keysyms.iter().find_map(|&sym| lookup(sym, modifiers)) {
                debug!("Key binding {:?}", action);
                self.run_action(action);
                return;
            }
        }

        let active = self.workspaces.active();
        let has_target = self
            .views
            .focused()
            .and_then(|id| self.views.get(id))
            .map(|v| v.is_visible(active))
            .unwrap_or(false);
        if has_target {
            self.backend.keyboard_key(time, keycode, pressed);
        } else {
            trace!("Dropping key {} with no visible focus", keycode);
        }
    }

    fn run_action(&mut self, action: Action) {
        let front = self.views.front_visible(self.workspaces.active());
        match action {
            Action::ShowDesktop => {
                let targets: Vec<ViewId> = self
                    .views
                    .z_order()
                    .iter()
                    .copied()
                    .filter(|&id| self.views.get(id).map(|v| v.mapped && !v.is_minimized).unwrap_or(false))
                    .collect();
                for id in targets {
                    self.views.minimize(id);
                }
                self.notify(IpcMessage::ShowDesktop);
            }
            Action::Snap(zone) => {
                if let Some(id) = front {
                    self.snap(id, zone);
                }
            }
            Action::Restore => {
                if let Some(id) = front {
                    self.restore(id);
                }
            }
            Action::SwitchWorkspace(index) => self.switch_workspace(index),
            Action::CloseFocused => {
                if let Some(id) = front {
                    self.views.close(id, &mut self.backend);
                }
            }
            Action::CycleWindows => {
                self.cycle();
                self.notify(IpcMessage::CycleWindow);
            }
        }
    }

    /// Alt-Tab: focus the next eligible view and send the current one to the
    /// back, so repeated cycling visits every window once.
    pub fn cycle(&mut self) {
        let active = self.workspaces.active();
        let Some(current) = self.views.front_visible(active) else {
            return;
        };
        let Some(next) = self.views.next_cycle_target(active) else {
            return;
        };
        if next == current {
            return;
        }
        self.views.lower(current);
        self.views.focus(next, &mut self.backend);
    }

    // --- workspaces ---

    pub fn switch_workspace(&mut self, index: usize) {
        if !self.workspaces.switch(index) {
            return;
        }
        self.drop_hidden_references();
        self.refocus_active();
    }

    /// Cancel a grab and clear pointer focus that refer to views no longer
    /// visible on the active workspace.
    fn drop_hidden_references(&mut self) {
        let active = self.workspaces.active();
        if let Some(grabbed) = self.cursor.grabbed_view() {
            if !self.views.get(grabbed).map(|v| v.is_visible(active)).unwrap_or(false) {
                debug!("Cancelling grab on hidden {}", grabbed);
                self.cursor = CursorMode::Passthrough;
                self.backend.set_cursor_image(CURSOR_DEFAULT);
            }
        }
        if let Some(surface) = self.pointer_focus {
            let visible = self
                .views
                .lookup(surface)
                .and_then(|id| self.views.get(id))
                .map(|v| v.is_visible(active))
                .unwrap_or(false);
            if !visible {
                self.clear_pointer_focus();
            }
        }
    }

    /// Give keyboard focus to the topmost window on the active workspace, or
    /// to nothing when it has none.
    fn refocus_active(&mut self) {
        let active = self.workspaces.active();
        let top = self.views.z_order().iter().copied().find(|&id| {
            self.views
                .get(id)
                .map(|v| v.is_visible(active) && v.is_cycle_target())
                .unwrap_or(false)
        });
        match top {
            Some(id) => {
                self.views.focus(id, &mut self.backend);
            }
            None => {
                self.views.blur(&mut self.backend);
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Activate { surface } => {
                let Some(id) = self.views.lookup(surface) else {
                    return;
                };
                let home = self.views.get(id).filter(|v| !v.is_sticky()).map(|v| v.workspace);
                if let Some(index) = home {
                    self.switch_workspace(index);
                }
                if self.views.get(id).map(|v| v.is_minimized).unwrap_or(false) {
                    self.views.unminimize(id, &mut self.backend);
                } else {
                    self.views.focus(id, &mut self.backend);
                }
            }
            Command::CreateWorkspace { name } => {
                self.workspaces.create(name);
            }
            Command::SwitchWorkspace { index } => self.switch_workspace(index),
            Command::MoveToWorkspace { surface, index } => {
                let Some(id) = self.views.lookup(surface) else {
                    return;
                };
                let moved = match self.views.get_mut(id) {
                    Some(view) => self.workspaces.move_view(view, index),
                    None => false,
                };
                if !moved {
                    return;
                }
                info!("Moved {} to workspace {}", id, index);
                self.drop_hidden_references();
                let active = self.workspaces.active();
                let focus_hidden = self
                    .views
                    .focused()
                    .and_then(|f| self.views.get(f))
                    .map(|v| !v.is_visible(active))
                    .unwrap_or(false);
                if focus_hidden {
                    self.refocus_active();
                }
            }
        }
    }

    fn handle_output(&mut self, event: OutputEvent) {
        match event {
            OutputEvent::Added { name, rect } => self.outputs.add(name, rect),
            OutputEvent::Removed { name } => {
                self.outputs.remove(&name);
            }
        }
        if !self.outputs.is_empty() {
            self.warp(self.cursor_x, self.cursor_y);
        }
    }
}

impl<B: Backend, R: TitlebarRenderer> EventSink for WindowManager<B, R> {
    fn on_event(&mut self, event: Event) {
        match event {
            Event::Surface { surface, event } => self.handle_surface(surface, event),
            Event::Pointer(event) => self.handle_pointer(event),
            Event::Keyboard(event) => self.handle_keyboard(event),
            Event::Output(event) => self.handle_output(event),
            Event::Command(command) => self.handle_command(command),
        }
    }
}

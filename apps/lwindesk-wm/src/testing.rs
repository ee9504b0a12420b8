//! Test doubles for the backend and renderer.

use std::collections::HashMap;

use crate::core::backend::Backend;
use crate::core::event::{AxisOrientation, SurfaceId};
use crate::core::geometry::Rect;
use crate::input::keyboard::Modifiers;
use crate::window::draw::{Artwork, TitlebarRenderer};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetActivated(SurfaceId, bool),
    SetSize(SurfaceId, i32, i32),
    SendClose(SurfaceId),
    KeyboardEnter(SurfaceId),
    KeyboardClearFocus,
    KeyboardKey(u32, bool),
    KeyboardModifiers(Modifiers),
    PointerEnter(SurfaceId, f64, f64),
    PointerMotion(f64, f64),
    PointerButton(u32, bool),
    PointerAxis(f64),
    PointerFrame,
    PointerClearFocus,
    SetCursor(String),
}

/// Records every command. A non-zero `set_size` is applied immediately, as
/// if the client acked and committed at once.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    geometry: HashMap<SurfaceId, Rect>,
}

impl RecordingBackend {
    pub fn set_geometry(&mut self, surface: SurfaceId, rect: Rect) {
        self.geometry.insert(surface, rect);
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn last_size(&self, surface: SurfaceId) -> Option<(i32, i32)> {
        self.calls.iter().rev().find_map(|c| match *c {
            Call::SetSize(s, w, h) if s == surface => Some((w, h)),
            _ => None,
        })
    }
}

impl Backend for RecordingBackend {
    fn set_activated(&mut self, surface: SurfaceId, activated: bool) {
        self.calls.push(Call::SetActivated(surface, activated));
    }

    fn set_size(&mut self, surface: SurfaceId, width: i32, height: i32) {
        self.calls.push(Call::SetSize(surface, width, height));
        if width > 0 && height > 0 {
            self.geometry.insert(surface, Rect::new(0, 0, width, height));
        }
    }

    fn send_close(&mut self, surface: SurfaceId) {
        self.calls.push(Call::SendClose(surface));
    }

    fn geometry(&self, surface: SurfaceId) -> Rect {
        self.geometry.get(&surface).copied().unwrap_or_default()
    }

    fn keyboard_enter(&mut self, surface: SurfaceId) {
        self.calls.push(Call::KeyboardEnter(surface));
    }

    fn keyboard_clear_focus(&mut self) {
        self.calls.push(Call::KeyboardClearFocus);
    }

    fn keyboard_key(&mut self, _time: u32, keycode: u32, pressed: bool) {
        self.calls.push(Call::KeyboardKey(keycode, pressed));
    }

    fn keyboard_modifiers(&mut self, modifiers: Modifiers) {
        self.calls.push(Call::KeyboardModifiers(modifiers));
    }

    fn pointer_enter(&mut self, surface: SurfaceId, sx: f64, sy: f64) {
        self.calls.push(Call::PointerEnter(surface, sx, sy));
    }

    fn pointer_motion(&mut self, _time: u32, sx: f64, sy: f64) {
        self.calls.push(Call::PointerMotion(sx, sy));
    }

    fn pointer_button(&mut self, _time: u32, button: u32, pressed: bool) {
        self.calls.push(Call::PointerButton(button, pressed));
    }

    fn pointer_axis(&mut self, _time: u32, _orientation: AxisOrientation, delta: f64, _discrete: i32) {
        self.calls.push(Call::PointerAxis(delta));
    }

    fn pointer_frame(&mut self) {
        self.calls.push(Call::PointerFrame);
    }

    fn pointer_clear_focus(&mut self) {
        self.calls.push(Call::PointerClearFocus);
    }

    fn set_cursor_image(&mut self, name: &str) {
        self.calls.push(Call::SetCursor(name.to_string()));
    }
}

/// Counts render requests and returns blank artwork of the requested size.
#[derive(Debug, Default)]
pub struct CountingRenderer {
    pub renders: usize,
}

impl TitlebarRenderer for CountingRenderer {
    fn render(&mut self, width: i32, height: i32, _title: &str) -> Artwork {
        self.renders += 1;
        Artwork {
            width,
            height,
            pixels: vec![0; (width.max(0) * height.max(0)) as usize],
        }
    }
}

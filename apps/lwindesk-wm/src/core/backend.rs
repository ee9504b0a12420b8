use crate::core::event::{AxisOrientation, SurfaceId};
use crate::core::geometry::Rect;
use crate::input::keyboard::Modifiers;

/// Commands the window manager issues to the display-server side.
///
/// Surface commands address client toplevels. Seat commands route input
/// to whichever surface the window manager picked; the backend is not
/// expected to make focus decisions of its own.
pub trait Backend {
    fn set_activated(&mut self, surface: SurfaceId, activated: bool);
    /// `(0, 0)` lets the client choose its own size.
    fn set_size(&mut self, surface: SurfaceId, width: i32, height: i32);
    fn send_close(&mut self, surface: SurfaceId);
    /// Current content geometry; only width and height are meaningful.
    fn geometry(&self, surface: SurfaceId) -> Rect;

    fn keyboard_enter(&mut self, surface: SurfaceId);
    fn keyboard_clear_focus(&mut self);
    fn keyboard_key(&mut self, time: u32, keycode: u32, pressed: bool);
    fn keyboard_modifiers(&mut self, _modifiers: Modifiers) {}

    fn pointer_enter(&mut self, surface: SurfaceId, sx: f64, sy: f64);
    fn pointer_motion(&mut self, time: u32, sx: f64, sy: f64);
    fn pointer_button(&mut self, time: u32, button: u32, pressed: bool);
    fn pointer_axis(&mut self, _time: u32, _orientation: AxisOrientation, _delta: f64, _discrete: i32) {}
    fn pointer_frame(&mut self) {}
    fn pointer_clear_focus(&mut self);

    /// Named cursor image from the cursor theme.
    fn set_cursor_image(&mut self, name: &str);
}

//! A backend with no display server behind it.
//!
//! Used by `lwindesk-wm --replay` to drive the policy core from a recorded
//! event stream. Clients are simulated as acking every configure at once.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::backend::Backend;
use crate::core::event::{AxisOrientation, Event, EventSink, SurfaceId};
use crate::core::geometry::Rect;
use crate::input::keyboard::Modifiers;
use crate::window::error::{log_warn, WmError};

#[derive(Debug)]
pub struct HeadlessBackend {
    geometry: HashMap<SurfaceId, Rect>,
    default_size: (i32, i32),
    cursor_image: String,
}

impl HeadlessBackend {
    /// `default_size` is what a simulated client picks when told to choose
    /// its own size.
    pub fn new(default_width: i32, default_height: i32) -> Self {
        Self {
            geometry: HashMap::new(),
            default_size: (default_width, default_height),
            cursor_image: String::from("default"),
        }
    }

    pub fn cursor_image(&self) -> &str {
        &self.cursor_image
    }
}

impl Backend for HeadlessBackend {
    fn set_activated(&mut self, surface: SurfaceId, activated: bool) {
        debug!("set_activated {:?} {}", surface, activated);
    }

    fn set_size(&mut self, surface: SurfaceId, width: i32, height: i32) {
        let (width, height) = if width <= 0 || height <= 0 {
            match self.geometry.get(&surface) {
                Some(geo) => (geo.width, geo.height),
                None => self.default_size,
            }
        } else {
            (width, height)
        };
        debug!("configure {:?} {}x{}", surface, width, height);
        self.geometry.insert(surface, Rect::new(0, 0, width, height));
    }

    fn send_close(&mut self, surface: SurfaceId) {
        debug!("send_close {:?}", surface);
    }

    fn geometry(&self, surface: SurfaceId) -> Rect {
        self.geometry.get(&surface).copied().unwrap_or_default()
    }

    fn keyboard_enter(&mut self, surface: SurfaceId) {
        debug!("keyboard enter {:?}", surface);
    }

    fn keyboard_clear_focus(&mut self) {
        debug!("keyboard focus cleared");
    }

    fn keyboard_key(&mut self, time: u32, keycode: u32, pressed: bool) {
        trace!("key {} {} at {}", keycode, pressed, time);
    }

    fn keyboard_modifiers(&mut self, modifiers: Modifiers) {
        trace!("modifiers {:?}", modifiers);
    }

    fn pointer_enter(&mut self, surface: SurfaceId, sx: f64, sy: f64) {
        debug!("pointer enter {:?} at {},{}", surface, sx, sy);
    }

    fn pointer_motion(&mut self, time: u32, sx: f64, sy: f64) {
        trace!("pointer motion {},{} at {}", sx, sy, time);
    }

    fn pointer_button(&mut self, time: u32, button: u32, pressed: bool) {
        trace!("pointer button {} {} at {}", button, pressed, time);
    }

    fn pointer_axis(&mut self, time: u32, orientation: AxisOrientation, delta: f64, _discrete: i32) {
        trace!("pointer axis {:?} {} at {}", orientation, delta, time);
    }

    fn pointer_clear_focus(&mut self) {
        debug!("pointer focus cleared");
    }

    fn set_cursor_image(&mut self, name: &str) {
        if self.cursor_image != name {
            debug!("cursor image {}", name);
            self.cursor_image = name.to_string();
        }
    }
}

/// Parse one line of a replay file. Blank lines and `#` comments yield
/// `None`.
pub fn parse_replay_line(line_no: usize, line: &str) -> Result<Option<Event>, WmError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| WmError::Replay { line: line_no, source })
}

/// Parse one replay line and hand the event to `sink`. Malformed lines are
/// logged and skipped. Returns whether an event was dispatched.
pub fn replay_line<S: EventSink>(sink: &mut S, line_no: usize, line: &str) -> bool {
    match log_warn(parse_replay_line(line_no, line), "replay") {
        Some(Some(event)) => {
            sink.on_event(event);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::SurfaceEvent;
    use crate::window::draw::RaqoteRenderer;
    use crate::window::manager::WindowManager;
    use lwindesk_config::WmConfig;

    #[test]
    fn test_client_picks_default_size() {
        let mut backend = HeadlessBackend::new(800, 600);
        backend.set_size(SurfaceId(1), 0, 0);
        assert_eq!(backend.geometry(SurfaceId(1)), Rect::new(0, 0, 800, 600));

        backend.set_size(SurfaceId(1), 1024, 768);
        backend.set_size(SurfaceId(1), 0, 0);
        assert_eq!(backend.geometry(SurfaceId(1)), Rect::new(0, 0, 1024, 768));
        assert!(backend.geometry(SurfaceId(2)).is_empty());
    }

    #[test]
    fn test_parse_replay_line() {
        assert!(parse_replay_line(1, "").unwrap().is_none());
        assert!(parse_replay_line(2, "   # a comment").unwrap().is_none());
        assert_eq!(
            parse_replay_line(3, r#"{"surface":{"surface":4,"event":"destroyed"}}"#).unwrap(),
            Some(Event::Surface { surface: SurfaceId(4), event: SurfaceEvent::Destroyed })
        );
        match parse_replay_line(9, "{not json") {
            Err(WmError::Replay { line, .. }) => assert_eq!(line, 9),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_replay_session() {
        let script = r#"
            # one output and one terminal
            {"output":{"added":{"name":"DP-1","rect":{"x":0,"y":0,"width":1920,"height":1080}}}}
            {"surface":{"surface":1,"event":{"created":{"title":"Terminal"}}}}
            {"surface":{"surface":1,"event":{"committed":{"initial":true}}}}
            {"surface":{"surface":1,"event":"mapped"}}
            {"pointer":{"motion_absolute":{"time":1,"x":700.0,"y":270.0}}}
            {"pointer":{"button":{"time":2,"button":272,"pressed":true}}}
            {"pointer":{"motion_absolute":{"time":3,"x":1915.0,"y":500.0}}}
            {"pointer":{"button":"oops"}}
            {"pointer":{"button":{"time":4,"button":272,"pressed":false}}}
        "#;

        let config = WmConfig::default();
        let mut wm = WindowManager::new(HeadlessBackend::new(640, 480), RaqoteRenderer, &config);
        let dispatched = script
            .lines()
            .enumerate()
            .filter(|(i, line)| replay_line(&mut wm, i + 1, line))
            .count();
        // the comment, blank lines and the malformed button are skipped
        assert_eq!(dispatched, 8);

        let id = wm.views().lookup(SurfaceId(1)).expect("view");
        let view = wm.views().get(id).expect("view");
        assert!(view.is_snapped);
        assert_eq!((view.x, view.y), (960, 0));
        assert_eq!(wm.backend().geometry(SurfaceId(1)), Rect::new(0, 0, 960, 1000));
        assert_eq!(wm.backend().cursor_image(), "default");
        assert_eq!(wm.draw_order().len(), 1);
    }
}

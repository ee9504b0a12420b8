//! Everything the display-server side can tell the window manager.
//!
//! Each source (surfaces, pointer, keyboard, outputs, external commands)
//! has its own payload enum; [`Event`] is the single type the event loop
//! dispatches. The serde form is what `--replay` files contain, one JSON
//! object per line, e.g. `{"surface":{"surface":3,"event":"mapped"}}`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;
use crate::input::keyboard::{Keysym, Modifiers};

/// Handle of a client surface, assigned by the display-server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u64);

bitflags! {
    /// Edges grabbed by an interactive resize request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ResizeEdges: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceEvent {
    Created {
        #[serde(default)]
        title: Option<String>,
    },
    Mapped,
    Unmapped,
    Committed {
        #[serde(default)]
        initial: bool,
    },
    Destroyed,
    TitleChanged {
        title: Option<String>,
    },
    MoveRequested,
    ResizeRequested {
        edges: ResizeEdges,
    },
    MaximizeRequested,
    MinimizeRequested,
    FullscreenRequested {
        #[serde(default)]
        fullscreen: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEvent {
    /// Relative motion from a mouse.
    Motion { time: u32, dx: f64, dy: f64 },
    /// Absolute position in layout coordinates (tablets, nested sessions).
    MotionAbsolute { time: u32, x: f64, y: f64 },
    Button { time: u32, button: u32, pressed: bool },
    Axis {
        time: u32,
        orientation: AxisOrientation,
        delta: f64,
        #[serde(default)]
        discrete: i32,
    },
    Frame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardEvent {
    /// `keycode` is the raw evdev code; `keysyms` are the layout-translated
    /// symbols for it.
    Key {
        time: u32,
        keycode: u32,
        #[serde(default)]
        keysyms: Vec<Keysym>,
        #[serde(default)]
        modifiers: Modifiers,
        pressed: bool,
    },
    Modifiers { modifiers: Modifiers },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputEvent {
    Added { name: String, rect: Rect },
    Removed { name: String },
}

/// Requests from outside the input path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Unminimize (if needed) and focus.
    Activate { surface: SurfaceId },
    CreateWorkspace { name: String },
    SwitchWorkspace { index: usize },
    MoveToWorkspace { surface: SurfaceId, index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Surface { surface: SurfaceId, event: SurfaceEvent },
    Pointer(PointerEvent),
    Keyboard(KeyboardEvent),
    Output(OutputEvent),
    Command(Command),
}

/// Anything that consumes the event stream.
pub trait EventSink {
    fn on_event(&mut self, event: Event);
}

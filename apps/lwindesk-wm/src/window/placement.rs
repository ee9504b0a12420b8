use crate::core::geometry::Rect;
use crate::window::frame::TITLEBAR_HEIGHT;
use crate::window::snap::TASKBAR_HEIGHT;
use crate::window::{LAYER_DESKTOP, LAYER_DOCK, LAYER_NOTIFICATION};

/// Titles with this prefix belong to the desktop shell.
pub const SHELL_PREFIX: &str = "lwindesk-";

/// Gap between popups and the screen edge or taskbar.
const POPUP_MARGIN: i32 = 12;

/// The shell's windows, recognised by their exact titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellRole {
    StartMenu,
    Notifications,
    QuickSettings,
    Desktop,
    /// Any other shell-prefixed title.
    Taskbar,
}

impl ShellRole {
    pub fn from_title(title: &str) -> Option<ShellRole> {
        if !title.starts_with(SHELL_PREFIX) {
            return None;
        }
        Some(match title {
            "lwindesk-startmenu" => ShellRole::StartMenu,
            "lwindesk-notifications" => ShellRole::Notifications,
            "lwindesk-quicksettings" => ShellRole::QuickSettings,
            "lwindesk-desktop" => ShellRole::Desktop,
            _ => ShellRole::Taskbar,
        })
    }

    pub fn layer(&self) -> u16 {
        match self {
            ShellRole::Desktop => LAYER_DESKTOP,
            ShellRole::Taskbar => LAYER_DOCK,
            ShellRole::StartMenu | ShellRole::Notifications | ShellRole::QuickSettings => {
                LAYER_NOTIFICATION
            }
        }
    }

    /// Fixed position on a layout of the given extents.
    pub fn position(&self, extents: Rect) -> (i32, i32) {
        let (w, h) = (extents.width, extents.height);
        let above_taskbar = h - TASKBAR_HEIGHT - POPUP_MARGIN;
        match self {
            ShellRole::StartMenu => ((w - 640) / 2, above_taskbar - 720),
            ShellRole::Notifications => (w - 380 - POPUP_MARGIN, above_taskbar - 600),
            ShellRole::QuickSettings => (w - 360 - POPUP_MARGIN, above_taskbar - 400),
            ShellRole::Desktop => (0, 0),
            ShellRole::Taskbar => (0, h - TASKBAR_HEIGHT),
        }
    }
}

/// Centre a decorated window in the area above the taskbar.
pub fn center_window(extents: Rect, width: i32, height: i32) -> (i32, i32) {
    let x = (extents.width - width) / 2;
    let y = (extents.height - TASKBAR_HEIGHT - (height + TITLEBAR_HEIGHT)) / 2;
    (x.max(0), y.max(0))
}

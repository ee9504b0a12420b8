//! Keyboard policy: the super tap/chord tracker and the fixed binding table.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::window::snap::SnapZone;

/// Raw evdev codes for the two super keys. The tracker works on these, not
/// on keysyms, since symbol translation depends on the layout.
pub const KEY_LEFTMETA: u32 = 125;
pub const KEY_RIGHTMETA: u32 = 126;

/// A layout-translated key symbol (XKB keysym value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keysym(pub u32);

#[allow(non_upper_case_globals)]
impl Keysym {
    pub const KEY_d: Keysym = Keysym(0x0064);
    pub const KEY_D: Keysym = Keysym(0x0044);
    pub const KEY_q: Keysym = Keysym(0x0071);
    pub const KEY_Q: Keysym = Keysym(0x0051);
    pub const KEY_1: Keysym = Keysym(0x0031);
    pub const KEY_9: Keysym = Keysym(0x0039);
    pub const KEY_Tab: Keysym = Keysym(0xff09);
    pub const KEY_Left: Keysym = Keysym(0xff51);
    pub const KEY_Up: Keysym = Keysym(0xff52);
    pub const KEY_Right: Keysym = Keysym(0xff53);
    pub const KEY_Down: Keysym = Keysym(0xff54);
    pub const KEY_F4: Keysym = Keysym(0xffc1);
}

bitflags! {
    /// Keyboard modifier state, bit-compatible with wlroots' `WLR_MODIFIER_*`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const SHIFT = 1;
        const CAPS = 2;
        const CTRL = 4;
        const ALT = 8;
        const MOD2 = 16;
        const MOD3 = 32;
        const LOGO = 64;
        const MOD5 = 128;
    }
}

/// What a key press turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Deliver to the focused surface.
    Forward,
    /// Swallowed by the super tracker; nothing else to do.
    Swallowed,
    /// Super tapped on its own.
    ToggleStartMenu,
}

/// Distinguishes a super tap (toggle the start menu) from super held as a
/// chord modifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuperTracker {
    pressed: bool,
    used_in_combo: bool,
}

impl SuperTracker {
    pub fn is_super_key(keycode: u32) -> bool {
        keycode == KEY_LEFTMETA || keycode == KEY_RIGHTMETA
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn used_in_combo(&self) -> bool {
        self.used_in_combo
    }

    /// Feed one physical key transition.
    pub fn feed(&mut self, keycode: u32, pressed: bool) -> KeyOutcome {
        if Self::is_super_key(keycode) {
            if pressed {
                self.pressed = true;
                self.used_in_combo = false;
                return KeyOutcome::Swallowed;
            }
            let tapped = self.pressed && !self.used_in_combo;
            self.pressed = false;
            self.used_in_combo = false;
            return if tapped {
                KeyOutcome::ToggleStartMenu
            } else {
                KeyOutcome::Swallowed
            };
        }

        if pressed && self.pressed {
            self.used_in_combo = true;
        }
        KeyOutcome::Forward
    }
}

/// A window-manager action bound to a key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ShowDesktop,
    Snap(SnapZone),
    Restore,
    SwitchWorkspace(usize),
    CloseFocused,
    CycleWindows,
}

/// Look a keysym up in the fixed binding table. Super bindings take
/// precedence over alt bindings.
pub fn lookup(sym: Keysym, modifiers: Modifiers) -> Option<Action> {
    if modifiers.contains(Modifiers::LOGO) {
        if let Some(action) = super_binding(sym) {
            return Some(action);
        }
    }
    if modifiers.contains(Modifiers::ALT) {
        return alt_binding(sym);
    }
    None
}

fn super_binding(sym: Keysym) -> Option<Action> {
    match sym {
        Keysym::KEY_d | Keysym::KEY_D => Some(Action::ShowDesktop),
        Keysym::KEY_Left => Some(Action::Snap(SnapZone::Left)),
        Keysym::KEY_Right => Some(Action::Snap(SnapZone::Right)),
        Keysym::KEY_Up => Some(Action::Snap(SnapZone::Maximize)),
        Keysym::KEY_Down => Some(Action::Restore),
        Keysym::KEY_q | Keysym::KEY_Q => Some(Action::CloseFocused),
        Keysym(s) if (Keysym::KEY_1.0..=Keysym::KEY_9.0).contains(&s) => {
            Some(Action::SwitchWorkspace((s - Keysym::KEY_1.0) as usize))
        }
        _ => None,
    }
}

fn alt_binding(sym: Keysym) -> Option<Action> {
    match sym {
        Keysym::KEY_Tab => Some(Action::CycleWindows),
        Keysym::KEY_F4 => Some(Action::CloseFocused),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_tap_toggles_start_menu() {
        let mut t = SuperTracker::default();
        assert_eq!(t.feed(KEY_LEFTMETA, true), KeyOutcome::Swallowed);
        assert!(t.is_pressed());
        assert_eq!(t.feed(KEY_LEFTMETA, false), KeyOutcome::ToggleStartMenu);
        assert!(!t.is_pressed());
    }

    #[test]
    fn test_super_chord_does_not_toggle() {
        let mut t = SuperTracker::default();
        t.feed(KEY_RIGHTMETA, true);
        // 'd'
        assert_eq!(t.feed(32, true), KeyOutcome::Forward);
        assert!(t.used_in_combo());
        assert_eq!(t.feed(32, false), KeyOutcome::Forward);
        assert_eq!(t.feed(KEY_RIGHTMETA, false), KeyOutcome::Swallowed);

        // a fresh tap afterwards works again
        t.feed(KEY_LEFTMETA, true);
        assert_eq!(t.feed(KEY_LEFTMETA, false), KeyOutcome::ToggleStartMenu);
    }

    #[test]
    fn test_release_without_press_is_swallowed() {
        let mut t = SuperTracker::default();
        assert_eq!(t.feed(KEY_LEFTMETA, false), KeyOutcome::Swallowed);
    }

    #[test]
    fn test_binding_table() {
        let sup = Modifiers::LOGO;
        assert_eq!(lookup(Keysym::KEY_d, sup), Some(Action::ShowDesktop));
        assert_eq!(lookup(Keysym::KEY_D, sup | Modifiers::SHIFT), Some(Action::ShowDesktop));
        assert_eq!(lookup(Keysym::KEY_Left, sup), Some(Action::Snap(SnapZone::Left)));
        assert_eq!(lookup(Keysym::KEY_Up, sup), Some(Action::Snap(SnapZone::Maximize)));
        assert_eq!(lookup(Keysym::KEY_Down, sup), Some(Action::Restore));
        assert_eq!(lookup(Keysym::KEY_1, sup), Some(Action::SwitchWorkspace(0)));
        assert_eq!(lookup(Keysym::KEY_9, sup), Some(Action::SwitchWorkspace(8)));
        assert_eq!(lookup(Keysym(0x30), sup), None);
        assert_eq!(lookup(Keysym::KEY_q, sup), Some(Action::CloseFocused));

        assert_eq!(lookup(Keysym::KEY_Tab, Modifiers::ALT), Some(Action::CycleWindows));
        assert_eq!(lookup(Keysym::KEY_F4, Modifiers::ALT), Some(Action::CloseFocused));
        assert_eq!(lookup(Keysym::KEY_Tab, Modifiers::empty()), None);
        assert_eq!(lookup(Keysym::KEY_d, Modifiers::ALT), None);

        // super wins when both are held
        assert_eq!(
            lookup(Keysym::KEY_q, Modifiers::LOGO | Modifiers::ALT),
            Some(Action::CloseFocused)
        );
        assert_eq!(
            lookup(Keysym::KEY_Tab, Modifiers::LOGO | Modifiers::ALT),
            Some(Action::CycleWindows)
        );
    }
}

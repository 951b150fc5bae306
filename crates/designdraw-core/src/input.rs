//! Pointer and keyboard events fed into the interaction controller.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Platform command key: Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer press, move or release.
///
/// `position` is in screen space; the controller subtracts its pan offset
/// to get canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Plain left-button event.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character.
    Character(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Tab,
}

/// A key press with the modifiers held at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Lowercased character, if this is a character key.
    pub fn character(&self) -> Option<char> {
        match self.key {
            Key::Character(c) => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::CTRL.command());
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.command());
        assert!(!Modifiers::SHIFT.command());
    }

    #[test]
    fn test_key_character_lowercases() {
        assert_eq!(KeyEvent::new(Key::Character('Z')).character(), Some('z'));
        assert_eq!(KeyEvent::new(Key::Enter).character(), None);
    }

    #[test]
    fn test_pointer_event_builder() {
        let event = PointerEvent::new(Point::new(1.0, 2.0))
            .with_button(MouseButton::Right)
            .with_modifiers(Modifiers::SHIFT);
        assert_eq!(event.button, MouseButton::Right);
        assert!(event.modifiers.shift);
    }
}

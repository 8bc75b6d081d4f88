//! Input event types for keyboard, pointer, focus, and file delivery

use std::str::FromStr;

use crate::error::PlatformError;
use crate::file::DroppedFile;

/// Input events delivered to a focused or hovered widget
#[derive(Clone, Debug)]
pub enum InputEvent {
    /// Mouse event
    Mouse(MouseEvent),
    /// Keyboard event
    Keyboard(KeyboardEvent),
    /// Widget gained (`true`) or lost (`false`) keyboard focus
    FocusChanged(bool),
    /// Drag-and-drop event carrying files
    Drag(DragEvent),
    /// Result of a native file picker the widget asked for
    FilePicker(FilePickerEvent),
}

impl InputEvent {
    /// Whether this is a key press (not a release)
    pub fn is_key_press(&self) -> bool {
        matches!(
            self,
            InputEvent::Keyboard(KeyboardEvent {
                state: KeyState::Pressed,
                ..
            })
        )
    }
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse events
#[derive(Clone, Debug)]
pub enum MouseEvent {
    /// Mouse moved to position
    Moved {
        /// X position in window coordinates
        x: f32,
        /// Y position in window coordinates
        y: f32,
    },
    /// Mouse button pressed
    ButtonPressed {
        /// Which button was pressed
        button: MouseButton,
        /// X position when pressed
        x: f32,
        /// Y position when pressed
        y: f32,
    },
    /// Mouse button released
    ButtonReleased {
        /// Which button was released
        button: MouseButton,
        /// X position when released
        x: f32,
        /// Y position when released
        y: f32,
    },
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Other button with index
    Other(u16),
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keyboard event
#[derive(Clone, Debug)]
pub struct KeyboardEvent {
    /// The key that was pressed or released
    pub key: Key,
    /// Whether the key was pressed or released
    pub state: KeyState,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    /// A key press without modifiers
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
        }
    }

    /// A key release without modifiers
    pub fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
            modifiers: Modifiers::default(),
        }
    }
}

/// Key press/release state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key was pressed
    Pressed,
    /// Key was released
    Released,
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS, Windows key on Windows)
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

/// Key codes relevant to form widgets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    // Special keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    // Character input
    Char(char),

    // Unknown key
    Unknown,
}

impl FromStr for Key {
    type Err = PlatformError;

    /// Parse a key name such as `down`, `enter` or `esc` (case-insensitive)
    ///
    /// A single character parses as [`Key::Char`].
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name.to_ascii_lowercase().as_str() {
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            "delete" | "del" => Key::Delete,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(PlatformError::UnknownKey(name.to_string())),
                }
            }
        };
        Ok(key)
    }
}

// ============================================================================
// File Delivery
// ============================================================================

/// Drag-and-drop events over a window
#[derive(Clone, Debug)]
pub enum DragEvent {
    /// A drag carrying files entered the window at a position
    Entered {
        /// X position in window coordinates
        x: f32,
        /// Y position in window coordinates
        y: f32,
    },
    /// The drag moved
    Hovered {
        /// X position in window coordinates
        x: f32,
        /// Y position in window coordinates
        y: f32,
    },
    /// The drag left the window or was cancelled
    Left,
    /// Files were dropped at a position
    Dropped {
        /// X position in window coordinates
        x: f32,
        /// Y position in window coordinates
        y: f32,
        /// Dropped files, in the order the platform reported them
        files: Vec<DroppedFile>,
    },
}

/// Outcome of a native file picker
#[derive(Clone, Debug)]
pub enum FilePickerEvent {
    /// The user chose files
    Selected(Vec<DroppedFile>),
    /// The picker was dismissed
    Cancelled,
}

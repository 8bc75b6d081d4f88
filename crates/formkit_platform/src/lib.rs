//! formkit Platform Abstraction Layer
//!
//! This crate provides platform-agnostic input types for form widgets:
//!
//! - [`InputEvent`] - Keyboard, pointer, focus, drag-and-drop, and file picker input
//! - [`Bounds`] - Rendered widget rectangles for hit testing
//! - [`DroppedFile`] - File metadata delivered by a drop or a picker
//!
//! Platform backends convert their native events into these types before
//! handing them to widgets, so widget logic never depends on a windowing
//! library.
//!
//! # Example
//!
//! ```rust
//! use formkit_platform::*;
//!
//! let event = InputEvent::Keyboard(KeyboardEvent::pressed(Key::Down));
//! assert!(event.is_key_press());
//!
//! let trigger = Bounds::new(0.0, 0.0, 200.0, 40.0);
//! assert!(trigger.contains(10.0, 10.0));
//! ```

mod error;
mod file;
mod geometry;
mod input;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use file::{DroppedFile, FALLBACK_MIME_TYPE};
pub use geometry::Bounds;
pub use input::{
    DragEvent, FilePickerEvent, InputEvent, Key, KeyState, KeyboardEvent, Modifiers,
    MouseButton, MouseEvent,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::file::DroppedFile;
    pub use crate::geometry::Bounds;
    pub use crate::input::{
        DragEvent, FilePickerEvent, InputEvent, Key, KeyState, KeyboardEvent, Modifiers,
        MouseButton, MouseEvent,
    };
}

//! formkit Widget Library
//!
//! Form fields whose behavior does not reduce to a native control.
//!
//! # Architecture
//!
//! The widget system is built on three pillars:
//!
//! 1. **Explicit State Machines**: Each widget owns a plain state struct
//!    ([`ComboboxState`], [`FileIntakeState`]) created on mount and dropped on
//!    unmount. Every user event is a named transition on that struct.
//!
//! 2. **Effect Requests**: Transitions never touch the form container or a
//!    rendering surface. They return [`Effects`](formkit_core::Effects)
//!    (write value, revalidate, scroll into view, open the file picker).
//!
//! 3. **Injected Form State**: Controllers ([`Combobox`], [`FileIntake`])
//!    apply the form-facing effects through a borrowed
//!    [`FormState`](formkit_core::FormState) and return the rest to the host.
//!
//! # Example
//!
//! ```rust
//! use formkit_core::{FieldValue, FormState, MemoryForm};
//! use formkit_platform::Key;
//! use formkit_widgets::prelude::*;
//!
//! let mut form = MemoryForm::new();
//! let mut country = combobox("country")
//!     .option("us", "United States")
//!     .option("de", "Germany")
//!     .mount(&form);
//!
//! // Handle events (from platform)
//! country.handle_event(&mut form, ComboboxEvent::Key(Key::Enter));
//! country.handle_event(&mut form, ComboboxEvent::Key(Key::Down));
//! country.handle_event(&mut form, ComboboxEvent::Key(Key::Down));
//! country.handle_event(&mut form, ComboboxEvent::Key(Key::Enter));
//!
//! assert_eq!(form.value("country"), FieldValue::text("de"));
//! assert!(!country.is_open());
//! ```

pub mod accessibility;
pub mod combobox;
pub mod file_intake;
pub mod scroll;

#[cfg(test)]
mod testing;

pub use accessibility::{
    is_activation_key, ComboboxAccessibility, FileTriggerAccessibility, ListboxAccessibility,
    OptionAccessibility, Role, ACTIVATION_KEYS,
};
pub use combobox::{
    combobox, Combobox, ComboboxBuilder, ComboboxConfig, ComboboxEvent, ComboboxLayout,
    ComboboxOption, ComboboxState, Phase, DEFAULT_PLACEHOLDER,
};
pub use file_intake::{
    file_intake, normalize, ByteSize, FileCount, FileIntake, FileIntakeBuilder, FileIntakeConfig,
    FileIntakeEvent, FileIntakeState, IntakeRejection,
};
pub use scroll::ListViewport;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::combobox::{
        combobox, Combobox, ComboboxBuilder, ComboboxConfig, ComboboxEvent, ComboboxLayout,
        ComboboxOption,
    };
    pub use crate::file_intake::{
        file_intake, FileIntake, FileIntakeBuilder, FileIntakeConfig, FileIntakeEvent,
        IntakeRejection,
    };
    pub use crate::scroll::ListViewport;
}

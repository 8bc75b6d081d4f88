//! Accessibility descriptions exposed by form widgets
//!
//! Widgets describe themselves as plain data; a renderer maps these onto the
//! platform's accessibility API (or onto ARIA attributes on the web).

use formkit_platform::Key;

/// Accessibility role of a rendered element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Combobox,
    Listbox,
    Option,
    Button,
}

impl Role {
    /// ARIA role name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Combobox => "combobox",
            Role::Listbox => "listbox",
            Role::Option => "option",
            Role::Button => "button",
        }
    }
}

/// Combobox trigger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboboxAccessibility {
    pub role: Role,
    /// Text currently on the trigger
    pub label: String,
    /// Whether the listbox is shown
    pub expanded: bool,
    pub disabled: bool,
    /// Id of the controlled listbox
    pub controls: String,
    /// Id of the highlighted option, while one is highlighted
    pub active_descendant: Option<String>,
    /// Present only while expanded
    pub listbox: Option<ListboxAccessibility>,
}

/// Candidate list of an open combobox
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListboxAccessibility {
    pub id: String,
    pub role: Role,
    pub options: Vec<OptionAccessibility>,
}

/// One candidate inside a listbox
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionAccessibility {
    pub id: String,
    pub role: Role,
    pub label: String,
    /// Whether this option holds the committed value
    pub selected: bool,
}

/// File intake trigger: an activatable region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTriggerAccessibility {
    pub role: Role,
    pub label: String,
    pub disabled: bool,
    /// Files are being dragged over the drop zone
    pub drag_active: bool,
    /// Keys that activate the trigger like a pointer click
    pub activation_keys: [Key; 2],
}

/// Keys that activate a button-like trigger
pub const ACTIVATION_KEYS: [Key; 2] = [Key::Enter, Key::Space];

/// Whether `key` activates a button-like trigger
pub fn is_activation_key(key: Key) -> bool {
    ACTIVATION_KEYS.contains(&key)
}

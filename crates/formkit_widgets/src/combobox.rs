//! Combobox widget - dropdown selection without a native list box
//!
//! The Combobox provides:
//! - Two-state machine: closed and open (with an optional highlighted candidate)
//! - Keyboard traversal that wraps in both directions
//! - Commit on Enter or pointer click, which is the only write to the form
//! - Dismissal on Escape, focus loss, or a pointer press outside the widget
//! - Scroll-into-view requests whenever the keyboard moves the highlight
//!
//! Option values are expected to be unique within one combobox. With
//! duplicate values the highlight on open lands on the first match.
//!
//! # Example
//!
//! ```rust
//! use formkit_core::{FieldValue, FormState, MemoryForm};
//! use formkit_platform::Key;
//! use formkit_widgets::combobox::{combobox, ComboboxEvent};
//!
//! let mut form = MemoryForm::new();
//! form.set_value("size", FieldValue::text("m"));
//!
//! let mut size = combobox("size")
//!     .option("s", "Small")
//!     .option("m", "Medium")
//!     .option("l", "Large")
//!     .placeholder("Pick a size")
//!     .mount(&form);
//!
//! size.handle_event(&mut form, ComboboxEvent::TriggerClick);
//! assert_eq!(size.highlighted_index(), Some(1));
//!
//! size.handle_event(&mut form, ComboboxEvent::Key(Key::Escape));
//! assert!(!size.is_open());
//! assert_eq!(size.display_label(), "Medium");
//! ```

use formkit_core::{dispatch, Effect, Effects, FieldValue, FormState, ScrollBlock};
use formkit_platform::{Bounds, InputEvent, Key, KeyState, KeyboardEvent, MouseButton, MouseEvent};
use smallvec::smallvec;

use crate::accessibility::{
    ComboboxAccessibility, ListboxAccessibility, OptionAccessibility, Role,
};

/// Trigger text when nothing is selected and no placeholder is configured
pub const DEFAULT_PLACEHOLDER: &str = "Select an option";

/// A selectable candidate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboboxOption {
    /// The value (stored in the form when committed)
    pub value: String,
    /// The display label shown in the list and on the trigger
    pub label: String,
}

impl ComboboxOption {
    /// Create a new option with value and label
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Combobox configuration
#[derive(Clone, Debug, Default)]
pub struct ComboboxConfig {
    /// Trigger text when nothing is selected
    pub placeholder: Option<String>,
    /// Whether the widget ignores all interaction
    pub disabled: bool,
}

impl ComboboxConfig {
    /// Create a new combobox config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder text
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set whether the combobox is disabled
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Open/closed phase; a highlight only exists while open
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Candidate list hidden
    #[default]
    Closed,
    /// Candidate list visible, with the keyboard-focus candidate (if any)
    Open { highlighted: Option<usize> },
}

/// Events a combobox reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComboboxEvent {
    /// Pointer click on the trigger surface
    TriggerClick,
    /// Pointer click on the candidate at this index
    OptionClick(usize),
    /// Pointer moved over the candidate at this index
    OptionHover(usize),
    /// Pointer press outside the trigger and the open list
    OutsidePointer,
    /// Keyboard focus left the widget
    FocusLost,
    /// Key pressed while the widget has focus
    Key(Key),
}

/// Combobox state machine
///
/// Each method is one transition. Methods that need the form or the host
/// return [`Effects`] instead of acting on them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComboboxState {
    phase: Phase,
    selected: Option<String>,
}

impl ComboboxState {
    /// Create closed state with a seeded selection
    pub fn new(selected: Option<String>) -> Self {
        Self {
            phase: Phase::Closed,
            selected,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the candidate list is visible
    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open { .. })
    }

    /// Keyboard-focus candidate (always `None` while closed)
    pub fn highlighted_index(&self) -> Option<usize> {
        match self.phase {
            Phase::Open { highlighted } => highlighted,
            Phase::Closed => None,
        }
    }

    /// Committed value
    pub fn selected_value(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Show the list, highlighting the selected candidate if it is present
    ///
    /// No-op if already open.
    pub fn open(&mut self, options: &[ComboboxOption]) -> Effects {
        if self.is_open() {
            return Effects::new();
        }
        let highlighted = self
            .selected
            .as_deref()
            .and_then(|value| options.iter().position(|opt| opt.value == value));
        self.phase = Phase::Open { highlighted };
        highlighted.map(scroll_to).into_iter().collect()
    }

    /// Hide the list and drop the highlight. Idempotent.
    pub fn close(&mut self) {
        self.phase = Phase::Closed;
    }

    /// Close without committing
    pub fn dismiss(&mut self) {
        self.close();
    }

    /// Move the highlight by `delta`, wrapping around both ends
    ///
    /// No highlight counts as one before index 0, so moving forward from it
    /// lands on the first candidate. No-op while closed or with no options.
    pub fn move_highlight(&mut self, len: usize, delta: isize) -> Effects {
        let Phase::Open { highlighted } = self.phase else {
            return Effects::new();
        };
        if len == 0 {
            return Effects::new();
        }
        let current = highlighted.map_or(-1, |index| index as isize);
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.phase = Phase::Open {
            highlighted: Some(next),
        };
        smallvec![scroll_to(next)]
    }

    /// Highlight `index` directly (pointer hover, Home/End)
    ///
    /// Returns whether the highlight changed.
    pub fn set_highlight(&mut self, len: usize, index: usize) -> bool {
        match self.phase {
            Phase::Open { highlighted } if index < len && highlighted != Some(index) => {
                self.phase = Phase::Open {
                    highlighted: Some(index),
                };
                true
            }
            _ => false,
        }
    }

    /// Select the candidate at `index`, then close
    ///
    /// Emits the form write and revalidation request. No-op while closed or
    /// when `index` is out of range.
    pub fn commit(&mut self, options: &[ComboboxOption], index: usize) -> Effects {
        if !self.is_open() {
            return Effects::new();
        }
        let Some(option) = options.get(index) else {
            return Effects::new();
        };
        self.selected = Some(option.value.clone());
        self.close();
        smallvec![
            Effect::SetValue(FieldValue::text(&option.value)),
            Effect::Revalidate
        ]
    }

    /// Apply one event
    pub fn transition(&mut self, options: &[ComboboxOption], event: ComboboxEvent) -> Effects {
        match event {
            // Repeated open requests leave an open list untouched
            ComboboxEvent::TriggerClick => self.open(options),
            ComboboxEvent::OptionClick(index) => self.commit(options, index),
            ComboboxEvent::OptionHover(index) => {
                // The hovered row is under the pointer, so it is already visible
                self.set_highlight(options.len(), index);
                Effects::new()
            }
            ComboboxEvent::OutsidePointer | ComboboxEvent::FocusLost => {
                self.dismiss();
                Effects::new()
            }
            ComboboxEvent::Key(key) => self.handle_key(options, key),
        }
    }

    fn handle_key(&mut self, options: &[ComboboxOption], key: Key) -> Effects {
        let len = options.len();
        match (self.phase, key) {
            (Phase::Closed, Key::Enter | Key::Space) => self.open(options),
            (Phase::Closed, _) => Effects::new(),
            (Phase::Open { .. }, Key::Down) => self.move_highlight(len, 1),
            (Phase::Open { .. }, Key::Up) => self.move_highlight(len, -1),
            (Phase::Open { .. }, Key::Home) if len > 0 => self.jump_to(len, 0),
            (Phase::Open { .. }, Key::End) if len > 0 => self.jump_to(len, len - 1),
            (
                Phase::Open {
                    highlighted: Some(index),
                },
                Key::Enter,
            ) => self.commit(options, index),
            (Phase::Open { .. }, Key::Escape | Key::Tab) => {
                self.dismiss();
                Effects::new()
            }
            _ => Effects::new(),
        }
    }

    fn jump_to(&mut self, len: usize, index: usize) -> Effects {
        if self.set_highlight(len, index) {
            smallvec![scroll_to(index)]
        } else {
            Effects::new()
        }
    }
}

fn scroll_to(index: usize) -> Effect {
    Effect::ScrollIntoView {
        index,
        block: ScrollBlock::Nearest,
    }
}

/// Rendered rectangles of a combobox, supplied by the host after layout
///
/// Used to route raw pointer input to [`ComboboxEvent`]s.
#[derive(Clone, Debug, Default)]
pub struct ComboboxLayout {
    /// Trigger surface
    pub trigger: Bounds,
    /// Candidate list container (only meaningful while open)
    pub list: Option<Bounds>,
    /// One rectangle per candidate, in option order
    pub options: Vec<Bounds>,
}

impl ComboboxLayout {
    /// Layout of a closed combobox
    pub fn new(trigger: Bounds) -> Self {
        Self {
            trigger,
            list: None,
            options: Vec::new(),
        }
    }

    /// Add the open list and its candidate rows
    pub fn with_list(mut self, list: Bounds, options: Vec<Bounds>) -> Self {
        self.list = Some(list);
        self.options = options;
        self
    }

    /// Whether a point lies inside the widget's rendered boundary
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.trigger.contains(x, y) || self.list.is_some_and(|list| list.contains(x, y))
    }

    /// Candidate under a point
    pub fn option_at(&self, x: f32, y: f32) -> Option<usize> {
        self.options.iter().position(|row| row.contains(x, y))
    }

    /// Translate a raw input event into a combobox event
    ///
    /// Keyboard input is assumed to be delivered only while the widget has
    /// focus.
    pub fn route(&self, event: &InputEvent, is_open: bool) -> Option<ComboboxEvent> {
        match event {
            InputEvent::Mouse(MouseEvent::ButtonPressed { button, x, y }) => {
                if is_open && !self.contains(*x, *y) {
                    return Some(ComboboxEvent::OutsidePointer);
                }
                if *button != MouseButton::Left {
                    return None;
                }
                if self.trigger.contains(*x, *y) {
                    Some(ComboboxEvent::TriggerClick)
                } else if is_open {
                    self.option_at(*x, *y).map(ComboboxEvent::OptionClick)
                } else {
                    None
                }
            }
            InputEvent::Mouse(MouseEvent::Moved { x, y }) if is_open => {
                self.option_at(*x, *y).map(ComboboxEvent::OptionHover)
            }
            // Chorded keys are host shortcuts
            InputEvent::Keyboard(KeyboardEvent {
                key,
                state: KeyState::Pressed,
                modifiers,
            }) if modifiers.is_empty() => Some(ComboboxEvent::Key(*key)),
            InputEvent::FocusChanged(false) => Some(ComboboxEvent::FocusLost),
            _ => None,
        }
    }
}

/// Combobox controller for one form field
///
/// Owns the options, the configuration, and the state machine. The committed
/// value lives in the form container under [`name`](Self::name).
#[derive(Clone, Debug)]
pub struct Combobox {
    name: String,
    options: Vec<ComboboxOption>,
    config: ComboboxConfig,
    state: ComboboxState,
}

impl Combobox {
    /// Mount a combobox, seeding the selection from the form's current value
    pub fn mount(
        name: impl Into<String>,
        options: Vec<ComboboxOption>,
        config: ComboboxConfig,
        form: &dyn FormState,
    ) -> Self {
        let name = name.into();
        let selected = match form.value(&name).into_choice(&name) {
            Ok(selected) => selected,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring seeded combobox value");
                None
            }
        };
        tracing::trace!(field = %name, ?selected, options = options.len(), "combobox mounted");

        Self {
            name,
            options,
            config,
            state: ComboboxState::new(selected),
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidates in display order
    pub fn options(&self) -> &[ComboboxOption] {
        &self.options
    }

    /// Configuration
    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    /// State machine snapshot
    pub fn state(&self) -> &ComboboxState {
        &self.state
    }

    /// Whether the candidate list is visible
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Keyboard-focus candidate
    pub fn highlighted_index(&self) -> Option<usize> {
        self.state.highlighted_index()
    }

    /// Committed value
    pub fn selected_value(&self) -> Option<&str> {
        self.state.selected_value()
    }

    /// Option matching the committed value
    pub fn selected_option(&self) -> Option<&ComboboxOption> {
        let value = self.state.selected_value()?;
        self.options.iter().find(|opt| opt.value == value)
    }

    /// Text for the trigger surface
    pub fn display_label(&self) -> &str {
        match self.selected_option() {
            Some(option) => &option.label,
            None => self
                .config
                .placeholder
                .as_deref()
                .unwrap_or(DEFAULT_PLACEHOLDER),
        }
    }

    /// Whether the widget ignores interaction
    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    /// Enable or disable the widget; disabling closes an open list
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled && self.state.is_open() {
            tracing::debug!(field = %self.name, "combobox disabled while open");
            self.state.dismiss();
        }
        self.config.disabled = disabled;
    }

    /// Schema error for this field, shown inline next to the trigger
    pub fn error(&self, form: &dyn FormState) -> Option<String> {
        form.error_for(&self.name)
    }

    /// Show the candidate list
    pub fn open(&mut self) -> Effects {
        if self.config.disabled {
            return Effects::new();
        }
        self.state.open(&self.options)
    }

    /// Hide the candidate list
    pub fn close(&mut self) {
        if !self.config.disabled {
            self.state.close();
        }
    }

    /// Close without committing
    pub fn dismiss(&mut self) {
        self.close();
    }

    /// Move the highlight by `delta`
    pub fn move_highlight(&mut self, delta: isize) -> Effects {
        if self.config.disabled {
            return Effects::new();
        }
        self.state.move_highlight(self.options.len(), delta)
    }

    /// Commit the candidate at `index` into the form
    pub fn commit(&mut self, form: &mut dyn FormState, index: usize) -> Effects {
        if self.config.disabled {
            return Effects::new();
        }
        let effects = self.state.commit(&self.options, index);
        self.finish(form, effects)
    }

    /// Handle one combobox event
    pub fn handle_event(&mut self, form: &mut dyn FormState, event: ComboboxEvent) -> Effects {
        if self.config.disabled {
            tracing::trace!(field = %self.name, ?event, "combobox disabled, event ignored");
            return Effects::new();
        }

        let was_open = self.state.is_open();
        let effects = self.state.transition(&self.options, event);
        let is_open = self.state.is_open();

        if was_open != is_open {
            tracing::debug!(
                field = %self.name,
                ?event,
                open = is_open,
                highlighted = ?self.state.highlighted_index(),
                "combobox toggled"
            );
        }

        self.finish(form, effects)
    }

    /// Route a raw input event through `layout`, then handle it
    pub fn handle_input(
        &mut self,
        form: &mut dyn FormState,
        input: &InputEvent,
        layout: &ComboboxLayout,
    ) -> Effects {
        match layout.route(input, self.state.is_open()) {
            Some(event) => self.handle_event(form, event),
            None => Effects::new(),
        }
    }

    /// Accessibility tree for the trigger and, while open, its listbox
    pub fn accessibility(&self) -> ComboboxAccessibility {
        let listbox_id = format!("{}-listbox", self.name);
        let option_id = |index: usize| format!("{}-option-{}", self.name, index);

        let listbox = self.state.is_open().then(|| ListboxAccessibility {
            id: listbox_id.clone(),
            role: Role::Listbox,
            options: self
                .options
                .iter()
                .enumerate()
                .map(|(index, opt)| OptionAccessibility {
                    id: option_id(index),
                    role: Role::Option,
                    label: opt.label.clone(),
                    selected: self.state.selected_value() == Some(opt.value.as_str()),
                })
                .collect(),
        });

        ComboboxAccessibility {
            role: Role::Combobox,
            label: self.display_label().to_string(),
            expanded: self.state.is_open(),
            disabled: self.config.disabled,
            controls: listbox_id,
            active_descendant: self.state.highlighted_index().map(option_id),
            listbox,
        }
    }

    fn finish(&mut self, form: &mut dyn FormState, effects: Effects) -> Effects {
        if let Some(Effect::SetValue(value)) = effects.iter().find(|e| e.is_form_effect()) {
            tracing::debug!(field = %self.name, value = ?value.as_text(), "combobox committed");
        }
        dispatch(form, &self.name, effects)
    }
}

/// Create a combobox builder
pub fn combobox(name: impl Into<String>) -> ComboboxBuilder {
    ComboboxBuilder {
        name: name.into(),
        options: Vec::new(),
        config: ComboboxConfig::default(),
    }
}

/// Builder for mounting comboboxes
pub struct ComboboxBuilder {
    name: String,
    options: Vec<ComboboxOption>,
    config: ComboboxConfig,
}

impl ComboboxBuilder {
    /// Add an option
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(ComboboxOption::new(value, label));
        self
    }

    /// Add multiple options
    pub fn options(mut self, options: impl IntoIterator<Item = ComboboxOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Set the placeholder text
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = Some(placeholder.into());
        self
    }

    /// Set whether the combobox is disabled
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    /// Mount the combobox against a form
    pub fn mount(self, form: &dyn FormState) -> Combobox {
        Combobox::mount(self.name, self.options, self.config, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingForm};

    fn abc() -> Vec<ComboboxOption> {
        vec![
            ComboboxOption::new("A", "Alpha"),
            ComboboxOption::new("B", "Bravo"),
            ComboboxOption::new("C", "Charlie"),
        ]
    }

    fn mounted(form: &RecordingForm) -> Combobox {
        Combobox::mount("letter", abc(), ComboboxConfig::default(), form)
    }

    fn key(key: Key) -> ComboboxEvent {
        ComboboxEvent::Key(key)
    }

    #[test]
    fn test_mount_seeds_selection_closed() {
        let form = RecordingForm::new().with_value("letter", FieldValue::text("B"));
        let combo = mounted(&form);

        assert!(!combo.is_open());
        assert_eq!(combo.highlighted_index(), None);
        assert_eq!(combo.selected_value(), Some("B"));
        assert_eq!(combo.display_label(), "Bravo");
    }

    #[test]
    fn test_mount_ignores_mismatched_value() {
        let form = RecordingForm::new().with_value("letter", FieldValue::Files(Vec::new()));
        let combo = mounted(&form);
        assert_eq!(combo.selected_value(), None);
        assert_eq!(combo.display_label(), DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_open_highlights_selected() {
        let mut state = ComboboxState::new(Some("C".into()));
        let effects = state.open(&abc());

        assert_eq!(state.highlighted_index(), Some(2));
        assert_eq!(
            effects.as_slice(),
            &[Effect::ScrollIntoView {
                index: 2,
                block: ScrollBlock::Nearest
            }]
        );
    }

    #[test]
    fn test_open_without_match_highlights_nothing() {
        let mut state = ComboboxState::new(Some("Z".into()));
        assert!(state.open(&abc()).is_empty());
        assert!(state.is_open());
        assert_eq!(state.highlighted_index(), None);
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut state = ComboboxState::new(None);
        state.open(&abc());
        state.move_highlight(3, 1);
        state.move_highlight(3, 1);

        assert!(state.open(&abc()).is_empty());
        assert_eq!(state.highlighted_index(), Some(1));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut state = ComboboxState::new(None);
        state.open(&abc());
        state.close();
        state.close();
        assert_eq!(state.phase(), Phase::Closed);
        assert_eq!(state.highlighted_index(), None);
    }

    #[test]
    fn test_move_highlight_wraps_both_ways() {
        let mut state = ComboboxState::new(None);
        state.open(&abc());

        state.move_highlight(3, 1);
        assert_eq!(state.highlighted_index(), Some(0));
        state.move_highlight(3, -1);
        assert_eq!(state.highlighted_index(), Some(2));
        state.move_highlight(3, 1);
        assert_eq!(state.highlighted_index(), Some(0));
    }

    #[test]
    fn test_move_back_from_nothing() {
        // No highlight sits one before index 0, so stepping back lands at len - 2
        let mut state = ComboboxState::new(None);
        state.open(&abc());
        state.move_highlight(3, -1);
        assert_eq!(state.highlighted_index(), Some(1));

        let mut single = ComboboxState::new(None);
        single.open(&abc()[..1]);
        single.move_highlight(1, -1);
        assert_eq!(single.highlighted_index(), Some(0));
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        for len in 1..=6 {
            let options: Vec<_> = (0..len)
                .map(|i| ComboboxOption::new(format!("v{}", i), format!("Label {}", i)))
                .collect();
            for start in 0..len {
                let mut state = ComboboxState::new(Some(format!("v{}", start)));
                state.open(&options);
                let before = state.highlighted_index();
                for _ in 0..len {
                    state.move_highlight(len, 1);
                }
                assert_eq!(state.highlighted_index(), before, "len {} start {}", len, start);
            }
        }
    }

    #[test]
    fn test_move_with_no_options_or_closed_is_noop() {
        let mut state = ComboboxState::new(None);
        assert!(state.move_highlight(3, 1).is_empty());
        assert!(!state.is_open());

        state.open(&[]);
        assert!(state.move_highlight(0, 1).is_empty());
        assert_eq!(state.highlighted_index(), None);
    }

    #[test]
    fn test_commit_closes_and_writes_once() {
        let mut form = RecordingForm::new();
        let mut combo = mounted(&form);
        combo.open();

        let host = combo.commit(&mut form, 1);

        assert!(host.is_empty());
        assert!(!combo.is_open());
        assert_eq!(combo.highlighted_index(), None);
        assert_eq!(combo.selected_value(), Some("B"));
        assert_eq!(
            form.calls,
            vec![
                Call::SetValue("letter".into(), FieldValue::text("B")),
                Call::Validate("letter".into()),
            ]
        );
    }

    #[test]
    fn test_commit_out_of_range_or_closed_is_noop() {
        let mut form = RecordingForm::new();
        let mut combo = mounted(&form);

        combo.commit(&mut form, 0);
        assert!(form.calls.is_empty());

        combo.open();
        combo.commit(&mut form, 3);
        assert!(combo.is_open());
        assert!(form.calls.is_empty());
    }

    #[test]
    fn test_scenario_open_move_commit() {
        let mut form = RecordingForm::new().with_value("letter", FieldValue::text("B"));
        let mut combo = mounted(&form);

        combo.open();
        assert_eq!(combo.highlighted_index(), Some(1));
        combo.move_highlight(1);
        assert_eq!(combo.highlighted_index(), Some(2));
        combo.commit(&mut form, 2);

        assert_eq!(combo.selected_value(), Some("C"));
        assert!(!combo.is_open());
        assert_eq!(form.value("letter"), FieldValue::text("C"));
    }

    #[test]
    fn test_keyboard_contract() {
        let mut form = RecordingForm::new();
        let mut combo = mounted(&form);

        // Closed: arrows do nothing, Space opens
        combo.handle_event(&mut form, key(Key::Down));
        assert!(!combo.is_open());
        combo.handle_event(&mut form, key(Key::Space));
        assert!(combo.is_open());

        // Enter without a highlight stays open
        combo.handle_event(&mut form, key(Key::Enter));
        assert!(combo.is_open());
        assert!(form.calls.is_empty());

        let host = combo.handle_event(&mut form, key(Key::Up));
        assert_eq!(combo.highlighted_index(), Some(1));
        assert_eq!(
            host.as_slice(),
            &[Effect::ScrollIntoView {
                index: 1,
                block: ScrollBlock::Nearest
            }]
        );

        combo.handle_event(&mut form, key(Key::Enter));
        assert!(!combo.is_open());
        assert_eq!(form.value("letter"), FieldValue::text("B"));

        // Closed: Enter reopens on the committed value
        combo.handle_event(&mut form, key(Key::Enter));
        assert_eq!(combo.highlighted_index(), Some(1));
    }

    #[test]
    fn test_home_end_jump() {
        let mut form = RecordingForm::new();
        let mut combo = mounted(&form);
        combo.open();

        let host = combo.handle_event(&mut form, key(Key::End));
        assert_eq!(combo.highlighted_index(), Some(2));
        assert_eq!(host.len(), 1);

        combo.handle_event(&mut form, key(Key::Home));
        assert_eq!(combo.highlighted_index(), Some(0));

        // Already there: no scroll request
        assert!(combo.handle_event(&mut form, key(Key::Home)).is_empty());
    }

    #[test]
    fn test_dismissal_never_writes() {
        let mut form = RecordingForm::new().with_value("letter", FieldValue::text("A"));
        let mut combo = mounted(&form);

        for event in [
            key(Key::Escape),
            key(Key::Tab),
            ComboboxEvent::OutsidePointer,
            ComboboxEvent::FocusLost,
        ] {
            combo.open();
            combo.move_highlight(1);
            combo.handle_event(&mut form, event);

            assert!(!combo.is_open(), "{:?} should close", event);
            assert_eq!(combo.highlighted_index(), None);
            assert_eq!(combo.selected_value(), Some("A"));
        }
        assert!(form.calls.is_empty());
        assert_eq!(form.value("letter"), FieldValue::text("A"));
    }

    #[test]
    fn test_trigger_click_while_open_keeps_highlight() {
        let mut form = RecordingForm::new().with_value("letter", FieldValue::text("B"));
        let mut combo = mounted(&form);

        combo.handle_event(&mut form, ComboboxEvent::TriggerClick);
        combo.handle_event(&mut form, key(Key::Down));
        assert_eq!(combo.highlighted_index(), Some(2));

        let host = combo.handle_event(&mut form, ComboboxEvent::TriggerClick);
        assert!(host.is_empty());
        assert!(combo.is_open());
        assert_eq!(combo.highlighted_index(), Some(2));
        assert!(form.calls.is_empty());
    }

    #[test]
    fn test_hover_and_click() {
        let mut form = RecordingForm::new();
        let mut combo = mounted(&form);
        combo.handle_event(&mut form, ComboboxEvent::TriggerClick);

        let host = combo.handle_event(&mut form, ComboboxEvent::OptionHover(2));
        assert!(host.is_empty());
        assert_eq!(combo.highlighted_index(), Some(2));

        combo.handle_event(&mut form, ComboboxEvent::OptionHover(7));
        assert_eq!(combo.highlighted_index(), Some(2));

        combo.handle_event(&mut form, ComboboxEvent::OptionClick(0));
        assert_eq!(combo.selected_value(), Some("A"));
        assert_eq!(form.writes(), 1);
    }

    #[test]
    fn test_disabled_accepts_no_transitions() {
        let mut form = RecordingForm::new();
        let mut combo = combobox("letter")
            .options(abc())
            .disabled(true)
            .mount(&form);

        combo.handle_event(&mut form, ComboboxEvent::TriggerClick);
        combo.handle_event(&mut form, key(Key::Enter));
        assert!(combo.open().is_empty());
        assert!(!combo.is_open());

        combo.set_disabled(false);
        combo.open();
        combo.move_highlight(1);
        combo.set_disabled(true);
        assert!(!combo.is_open());

        combo.commit(&mut form, 0);
        assert!(form.calls.is_empty());
        assert!(combo.accessibility().disabled);
    }

    #[test]
    fn test_error_is_surfaced_without_blocking() {
        let mut form = RecordingForm::new().with_error("letter", "This field is required");
        let mut combo = mounted(&form);

        assert_eq!(combo.error(&form).as_deref(), Some("This field is required"));
        combo.open();
        combo.commit(&mut form, 0);
        assert_eq!(combo.selected_value(), Some("A"));
    }

    #[test]
    fn test_layout_routing() {
        let trigger = Bounds::new(0.0, 0.0, 200.0, 40.0);
        let rows: Vec<_> = (0..3)
            .map(|i| Bounds::new(0.0, 44.0 + 30.0 * i as f32, 200.0, 30.0))
            .collect();
        let layout = ComboboxLayout::new(trigger).with_list(Bounds::new(0.0, 44.0, 200.0, 90.0), rows);

        let press = |x, y| {
            InputEvent::Mouse(MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x,
                y,
            })
        };

        assert_eq!(layout.route(&press(10.0, 10.0), false), Some(ComboboxEvent::TriggerClick));
        assert_eq!(layout.route(&press(10.0, 80.0), true), Some(ComboboxEvent::OptionClick(1)));
        assert_eq!(layout.route(&press(500.0, 500.0), true), Some(ComboboxEvent::OutsidePointer));
        assert_eq!(layout.route(&press(500.0, 500.0), false), None);
        assert_eq!(
            layout.route(&InputEvent::Mouse(MouseEvent::Moved { x: 5.0, y: 120.0 }), true),
            Some(ComboboxEvent::OptionHover(2))
        );
        assert_eq!(
            layout.route(&InputEvent::Keyboard(KeyboardEvent::released(Key::Down)), true),
            None
        );
        let mut chord = KeyboardEvent::pressed(Key::Down);
        chord.modifiers.ctrl = true;
        assert_eq!(layout.route(&InputEvent::Keyboard(chord), true), None);
        assert_eq!(
            layout.route(&InputEvent::Keyboard(KeyboardEvent::pressed(Key::Down)), true),
            Some(ComboboxEvent::Key(Key::Down))
        );
        assert_eq!(
            layout.route(&InputEvent::FocusChanged(false), true),
            Some(ComboboxEvent::FocusLost)
        );
    }

    #[test]
    fn test_handle_input_outside_dismisses() {
        let mut form = RecordingForm::new();
        let mut combo = mounted(&form);
        let layout = ComboboxLayout::new(Bounds::new(0.0, 0.0, 100.0, 30.0));

        let click_trigger = InputEvent::Mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x: 5.0,
            y: 5.0,
        });
        combo.handle_input(&mut form, &click_trigger, &layout);
        assert!(combo.is_open());

        let right_click_away = InputEvent::Mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Right,
            x: 300.0,
            y: 300.0,
        });
        combo.handle_input(&mut form, &right_click_away, &layout);
        assert!(!combo.is_open());
    }

    #[test]
    fn test_accessibility_tree() {
        let mut form = RecordingForm::new().with_value("letter", FieldValue::text("C"));
        let mut combo = mounted(&form);

        let closed = combo.accessibility();
        assert_eq!(closed.role, Role::Combobox);
        assert!(!closed.expanded);
        assert!(closed.listbox.is_none());
        assert_eq!(closed.controls, "letter-listbox");

        combo.handle_event(&mut form, ComboboxEvent::TriggerClick);
        let open = combo.accessibility();
        assert!(open.expanded);
        assert_eq!(open.active_descendant.as_deref(), Some("letter-option-2"));

        let listbox = open.listbox.unwrap();
        assert_eq!(listbox.id, "letter-listbox");
        let selected: Vec<bool> = listbox.options.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, false, true]);
    }
}

//! File intake widget - drag-and-drop and picker attachments
//!
//! The FileIntake accumulates validated files into its form slot:
//! - Files arrive from a drop payload or a picker result and are normalized
//!   into [`FileEntry`] values first
//! - Each batch is checked per file against capacity, duplicates, content
//!   type, and size, in that order
//! - Accepted files are written back in a single write; at most one
//!   rejection message survives per batch
//!
//! # Example
//!
//! ```rust
//! use formkit_core::{FileEntry, FormState, MemoryForm};
//! use formkit_widgets::file_intake::file_intake;
//!
//! let mut form = MemoryForm::new();
//! let mut photos = file_intake("photos")
//!     .max_files(2)
//!     .allowed_content_types(["image/*"])
//!     .mount(&form);
//!
//! photos.accept_batch(&mut form, &[
//!     FileEntry::new("a.png", 1200, "image/png"),
//!     FileEntry::new("notes.txt", 80, "text/plain"),
//! ]);
//!
//! assert_eq!(form.value("photos").file_count(), 1);
//! assert_eq!(
//!     photos.last_rejection_reason().as_deref(),
//!     Some("notes.txt is not an accepted file type (text/plain)")
//! );
//! ```

use std::fmt;

use formkit_core::{dispatch, ContentHandle, Effect, Effects, FieldValue, FileEntry, FormState};
use formkit_platform::{
    Bounds, DragEvent, DroppedFile, FilePickerEvent, InputEvent, Key, KeyState, KeyboardEvent,
    MouseButton, MouseEvent, FALLBACK_MIME_TYPE,
};
use rustc_hash::FxHashSet;
use smallvec::smallvec;
use thiserror::Error;

use crate::accessibility::{is_activation_key, FileTriggerAccessibility, Role, ACTIVATION_KEYS};

const DEFAULT_LABEL: &str = "Choose files";

/// A byte count rendered in binary units (`5.0 MB`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSize(pub u64);

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        const THRESHOLD: f64 = 1024.0;

        let mut size = self.0 as f64;
        let mut unit_index = 0;

        while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
            size /= THRESHOLD;
            unit_index += 1;
        }

        if unit_index == 0 {
            write!(f, "{} {}", self.0, UNITS[unit_index])
        } else {
            write!(f, "{:.1} {}", size, UNITS[unit_index])
        }
    }
}

/// A file count with the noun attached (`1 file`, `3 files`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileCount(pub usize);

impl fmt::Display for FileCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => f.write_str("1 file"),
            n => write!(f, "{} files", n),
        }
    }
}

/// Why a candidate file was turned away
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntakeRejection {
    #[error("You can only upload up to {max}")]
    TooManyFiles { max: FileCount },

    #[error("{name} has already been added")]
    Duplicate { name: String },

    #[error("{name} is not an accepted file type ({mime_type})")]
    InvalidType { name: String, mime_type: String },

    #[error("{name} exceeds the maximum size of {limit}")]
    TooLarge { name: String, limit: ByteSize },
}

/// File intake configuration
#[derive(Clone, Debug, Default)]
pub struct FileIntakeConfig {
    /// Cap on the number of accepted files
    pub max_files: Option<usize>,
    /// Per-file size limit in bytes
    pub max_size_per_file_bytes: Option<u64>,
    /// Content-type allow-list; empty admits everything
    ///
    /// Entries may be exact (`application/pdf`) or wildcards (`image/*`).
    pub allowed_content_types: Vec<String>,
    /// Trigger text
    pub label: Option<String>,
    /// Whether the widget ignores all interaction
    pub disabled: bool,
}

impl FileIntakeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_files(mut self, max: usize) -> Self {
        self.max_files = Some(max);
        self
    }

    pub fn max_size_per_file_bytes(mut self, bytes: u64) -> Self {
        self.max_size_per_file_bytes = Some(bytes);
        self
    }

    pub fn allowed_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_content_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether `mime_type` passes the allow-list (ASCII case-insensitive)
    pub fn accepts_type(&self, mime_type: &str) -> bool {
        if self.allowed_content_types.is_empty() {
            return true;
        }
        self.allowed_content_types
            .iter()
            .any(|pattern| content_type_matches(pattern, mime_type))
    }

    fn check(&self, file: &FileEntry) -> Option<IntakeRejection> {
        if !self.accepts_type(&file.mime_type) {
            return Some(IntakeRejection::InvalidType {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }
        match self.max_size_per_file_bytes {
            Some(limit) if file.byte_size > limit => Some(IntakeRejection::TooLarge {
                name: file.name.clone(),
                limit: ByteSize(limit),
            }),
            _ => None,
        }
    }
}

fn content_type_matches(pattern: &str, mime_type: &str) -> bool {
    if pattern == "*/*" || pattern.eq_ignore_ascii_case(mime_type) {
        return true;
    }
    match (pattern.strip_suffix("/*"), mime_type.split_once('/')) {
        (Some(wanted), Some((kind, _))) => wanted.eq_ignore_ascii_case(kind),
        _ => false,
    }
}

/// Turn platform payloads into entries, dropping any without readable metadata
pub fn normalize(files: &[DroppedFile]) -> Vec<FileEntry> {
    files
        .iter()
        .filter_map(|file| {
            let Some(byte_size) = file.byte_size else {
                tracing::warn!(name = %file.name, "excluding unreadable file");
                return None;
            };
            let mime_type = file.mime_type.as_deref().unwrap_or(FALLBACK_MIME_TYPE);
            let content = file
                .path
                .clone()
                .map_or(ContentHandle::Detached, ContentHandle::Path);
            Some(FileEntry::new(&file.name, byte_size, mime_type).with_content(content))
        })
        .collect()
}

/// Events a file intake reacts to
#[derive(Clone, Debug, PartialEq)]
pub enum FileIntakeEvent {
    /// Pointer activation of the trigger
    TriggerActivate,
    /// Key pressed while the trigger has focus
    Key(Key),
    /// A drag carrying files moved over the drop zone
    DragEnter,
    /// The drag left the drop zone or was cancelled
    DragLeave,
    /// Files dropped onto the drop zone
    Drop(Vec<DroppedFile>),
    /// Files chosen in the picker
    PickerResult(Vec<DroppedFile>),
    /// Remove the accepted file at this index
    Remove(usize),
}

impl FileIntakeEvent {
    /// Translate a raw input event for a drop zone covering `zone`
    pub fn route(input: &InputEvent, zone: &Bounds, drag_active: bool) -> Option<Self> {
        match input {
            InputEvent::Mouse(MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x,
                y,
            }) if zone.contains(*x, *y) => Some(Self::TriggerActivate),
            // Chorded keys are host shortcuts
            InputEvent::Keyboard(KeyboardEvent {
                key,
                state: KeyState::Pressed,
                modifiers,
            }) if modifiers.is_empty() => Some(Self::Key(*key)),
            InputEvent::Drag(DragEvent::Entered { x, y } | DragEvent::Hovered { x, y }) => {
                if zone.contains(*x, *y) {
                    (!drag_active).then_some(Self::DragEnter)
                } else {
                    drag_active.then_some(Self::DragLeave)
                }
            }
            InputEvent::Drag(DragEvent::Left) => drag_active.then_some(Self::DragLeave),
            InputEvent::Drag(DragEvent::Dropped { x, y, files }) => {
                if zone.contains(*x, *y) {
                    Some(Self::Drop(files.clone()))
                } else {
                    drag_active.then_some(Self::DragLeave)
                }
            }
            InputEvent::FilePicker(FilePickerEvent::Selected(files)) => {
                Some(Self::PickerResult(files.clone()))
            }
            _ => None,
        }
    }
}

/// File intake state machine
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileIntakeState {
    accepted: Vec<FileEntry>,
    last_rejection: Option<IntakeRejection>,
    drag_active: bool,
}

impl FileIntakeState {
    /// Create state around already accepted files
    pub fn new(accepted: Vec<FileEntry>) -> Self {
        Self {
            accepted,
            ..Self::default()
        }
    }

    /// Accepted files in acceptance order
    pub fn accepted(&self) -> &[FileEntry] {
        &self.accepted
    }

    /// Most recent rejection
    pub fn last_rejection(&self) -> Option<&IntakeRejection> {
        self.last_rejection.as_ref()
    }

    /// Message for the most recent rejection
    pub fn last_rejection_reason(&self) -> Option<String> {
        self.last_rejection.as_ref().map(ToString::to_string)
    }

    /// Whether files are being dragged over the drop zone
    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Free slots under the configured cap (`None` when uncapped)
    pub fn remaining_slots(&self, config: &FileIntakeConfig) -> Option<usize> {
        config
            .max_files
            .map(|max| max.saturating_sub(self.accepted.len()))
    }

    /// Validate `incoming` in order and append what passes
    ///
    /// A capacity failure stops the walk; any other failure skips only that
    /// file. The last failure in the batch becomes the rejection, and a batch
    /// without failures clears it.
    pub fn accept_batch(&mut self, config: &FileIntakeConfig, incoming: &[FileEntry]) -> Effects {
        let (staged, rejection) = self.stage(config, incoming);

        tracing::debug!(
            incoming = incoming.len(),
            staged = staged.len(),
            accepted = self.accepted.len() + staged.len(),
            rejection = ?rejection.as_ref().map(ToString::to_string),
            "file batch processed"
        );

        self.last_rejection = rejection;
        if staged.is_empty() {
            return Effects::new();
        }
        self.accepted.extend(staged);
        self.write()
    }

    fn stage(
        &self,
        config: &FileIntakeConfig,
        incoming: &[FileEntry],
    ) -> (Vec<FileEntry>, Option<IntakeRejection>) {
        let allowed_slots = self.remaining_slots(config);
        let mut seen: FxHashSet<_> = self.accepted.iter().map(FileEntry::identity_key).collect();
        let mut staged: Vec<FileEntry> = Vec::new();
        let mut rejection = None;

        for file in incoming {
            if let (Some(slots), Some(max)) = (allowed_slots, config.max_files) {
                if staged.len() >= slots {
                    rejection = Some(IntakeRejection::TooManyFiles {
                        max: FileCount(max),
                    });
                    break;
                }
            }

            let failure = if seen.contains(&file.identity_key()) {
                Some(IntakeRejection::Duplicate {
                    name: file.name.clone(),
                })
            } else {
                config.check(file)
            };

            match failure {
                Some(failure) => {
                    tracing::debug!(name = %file.name, reason = %failure, "file rejected");
                    rejection = Some(failure);
                }
                None => {
                    seen.insert(file.identity_key());
                    staged.push(file.clone());
                }
            }
        }

        (staged, rejection)
    }

    /// Remove the accepted file at `index` and clear the rejection
    ///
    /// The rejection is cleared even when `index` is out of range; nothing
    /// is written in that case.
    pub fn remove(&mut self, index: usize) -> Effects {
        self.last_rejection = None;
        if index >= self.accepted.len() {
            return Effects::new();
        }
        let removed = self.accepted.remove(index);
        tracing::debug!(name = %removed.name, remaining = self.accepted.len(), "file removed");
        self.write()
    }

    /// Apply one event
    pub fn transition(&mut self, config: &FileIntakeConfig, event: FileIntakeEvent) -> Effects {
        match event {
            FileIntakeEvent::TriggerActivate => smallvec![Effect::OpenFilePicker],
            FileIntakeEvent::Key(key) if is_activation_key(key) => {
                smallvec![Effect::OpenFilePicker]
            }
            FileIntakeEvent::Key(_) => Effects::new(),
            FileIntakeEvent::DragEnter => {
                self.drag_active = true;
                Effects::new()
            }
            FileIntakeEvent::DragLeave => {
                self.drag_active = false;
                Effects::new()
            }
            FileIntakeEvent::Drop(files) => {
                self.drag_active = false;
                self.accept_batch(config, &normalize(&files))
            }
            FileIntakeEvent::PickerResult(files) => self.accept_batch(config, &normalize(&files)),
            FileIntakeEvent::Remove(index) => self.remove(index),
        }
    }

    fn write(&self) -> Effects {
        smallvec![
            Effect::SetValue(FieldValue::Files(self.accepted.clone())),
            Effect::Revalidate
        ]
    }
}

/// File intake controller for one form field
#[derive(Clone, Debug)]
pub struct FileIntake {
    name: String,
    config: FileIntakeConfig,
    state: FileIntakeState,
}

impl FileIntake {
    /// Mount a file intake, seeding accepted files from the form's value
    ///
    /// Seeded files are trusted as they are and are not revalidated against
    /// the configuration.
    pub fn mount(name: impl Into<String>, config: FileIntakeConfig, form: &dyn FormState) -> Self {
        let name = name.into();
        let accepted = match form.value(&name).into_files(&name) {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring seeded file value");
                Vec::new()
            }
        };
        tracing::trace!(field = %name, accepted = accepted.len(), "file intake mounted");

        Self {
            name,
            config,
            state: FileIntakeState::new(accepted),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &FileIntakeConfig {
        &self.config
    }

    pub fn state(&self) -> &FileIntakeState {
        &self.state
    }

    pub fn accepted(&self) -> &[FileEntry] {
        self.state.accepted()
    }

    pub fn accepted_count(&self) -> usize {
        self.state.accepted().len()
    }

    /// Sum of accepted file sizes
    pub fn total_bytes(&self) -> ByteSize {
        ByteSize(self.state.accepted().iter().map(|f| f.byte_size).sum())
    }

    pub fn remaining_slots(&self) -> Option<usize> {
        self.state.remaining_slots(&self.config)
    }

    pub fn last_rejection(&self) -> Option<&IntakeRejection> {
        self.state.last_rejection()
    }

    pub fn last_rejection_reason(&self) -> Option<String> {
        self.state.last_rejection_reason()
    }

    pub fn is_drag_active(&self) -> bool {
        self.state.is_drag_active()
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    /// Enable or disable the widget; disabling drops the drag highlight
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.state.drag_active = false;
        }
        self.config.disabled = disabled;
    }

    /// Schema error for this field
    pub fn error(&self, form: &dyn FormState) -> Option<String> {
        form.error_for(&self.name)
    }

    /// Validate and append a normalized batch
    pub fn accept_batch(&mut self, form: &mut dyn FormState, incoming: &[FileEntry]) -> Effects {
        if self.config.disabled {
            return Effects::new();
        }
        let effects = self.state.accept_batch(&self.config, incoming);
        dispatch(form, &self.name, effects)
    }

    /// Remove the accepted file at `index`
    pub fn remove(&mut self, form: &mut dyn FormState, index: usize) -> Effects {
        if self.config.disabled {
            return Effects::new();
        }
        let effects = self.state.remove(index);
        dispatch(form, &self.name, effects)
    }

    /// Handle one file intake event
    ///
    /// Returns the effects the host must carry out (opening the picker).
    pub fn handle_event(&mut self, form: &mut dyn FormState, event: FileIntakeEvent) -> Effects {
        if self.config.disabled {
            tracing::trace!(field = %self.name, ?event, "file intake disabled, event ignored");
            return Effects::new();
        }
        let effects = self.state.transition(&self.config, event);
        dispatch(form, &self.name, effects)
    }

    /// Route a raw input event against the drop zone, then handle it
    pub fn handle_input(
        &mut self,
        form: &mut dyn FormState,
        input: &InputEvent,
        zone: &Bounds,
    ) -> Effects {
        match FileIntakeEvent::route(input, zone, self.state.is_drag_active()) {
            Some(event) => self.handle_event(form, event),
            None => Effects::new(),
        }
    }

    pub fn accessibility(&self) -> FileTriggerAccessibility {
        FileTriggerAccessibility {
            role: Role::Button,
            label: self
                .config
                .label
                .clone()
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            disabled: self.config.disabled,
            drag_active: self.state.is_drag_active(),
            activation_keys: ACTIVATION_KEYS,
        }
    }
}

/// Create a file intake builder
pub fn file_intake(name: impl Into<String>) -> FileIntakeBuilder {
    FileIntakeBuilder {
        name: name.into(),
        config: FileIntakeConfig::default(),
    }
}

/// Builder for mounting file intakes
pub struct FileIntakeBuilder {
    name: String,
    config: FileIntakeConfig,
}

impl FileIntakeBuilder {
    pub fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = Some(max);
        self
    }

    pub fn max_size_per_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_size_per_file_bytes = Some(bytes);
        self
    }

    pub fn allowed_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.allowed_content_types(types);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: FileIntakeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mount(self, form: &dyn FormState) -> FileIntake {
        FileIntake::mount(self.name, self.config, form)
    }
}

//! A mounted form: one controller per field over an in-memory form state

use anyhow::Result;
use formkit_core::{Effect, Effects, FieldValue, FormState, MemoryForm};
use formkit_platform::DroppedFile;
use formkit_widgets::{
    Combobox, ComboboxEvent, FileIntake, FileIntakeEvent, ListViewport,
};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::FormDefinition;
use crate::script::{Action, Step};

/// Row height and visible row count of the simulated candidate list
const ROW_HEIGHT: f32 = 32.0;
const VISIBLE_ROWS: usize = 5;

enum Control {
    Combobox {
        widget: Combobox,
        viewport: ListViewport,
    },
    Files(FileIntake),
}

pub struct Session {
    form: MemoryForm,
    controls: IndexMap<String, Control>,
}

impl Session {
    /// Mount every field of `definition` against a fresh form
    pub fn new(definition: &FormDefinition) -> Result<Self> {
        definition.validate()?;
        let form = MemoryForm::with_schema(definition.schema()?);

        let mut controls = IndexMap::new();
        for field in &definition.fields {
            let control = if let Some((options, config)) = field.combobox() {
                let viewport = ListViewport::new(
                    ROW_HEIGHT,
                    ROW_HEIGHT * VISIBLE_ROWS as f32,
                    options.len(),
                );
                Control::Combobox {
                    widget: Combobox::mount(&field.name, options, config, &form),
                    viewport,
                }
            } else if let Some(config) = field.file_intake() {
                Control::Files(FileIntake::mount(&field.name, config, &form))
            } else {
                continue;
            };
            controls.insert(field.name.clone(), control);
        }

        debug!(fields = controls.len(), "session mounted");
        Ok(Self { form, controls })
    }

    pub fn form(&self) -> &MemoryForm {
        &self.form
    }

    /// Apply one script step
    pub fn apply(&mut self, step: &Step) -> Result<()> {
        let Some(control) = self.controls.get_mut(&step.field) else {
            anyhow::bail!("No field named `{}`", step.field);
        };
        let form = &mut self.form;

        let effects = match control {
            Control::Combobox { widget, viewport } => {
                let effects = apply_combobox(widget, form, &step.action)?;
                if !widget.is_open() {
                    viewport.offset = 0.0;
                }
                for effect in &effects {
                    viewport.apply(effect);
                }
                effects
            }
            Control::Files(widget) => apply_files(widget, form, &step.action)?,
        };

        for effect in &effects {
            if let Effect::OpenFilePicker = effect {
                info!(field = %step.field, "file picker requested");
            }
        }
        Ok(())
    }

    /// Validate every field, as a submit would
    pub fn validate_all(&mut self) {
        self.form.validate_all();
    }

    /// Snapshot of every field in definition order
    pub fn report(&self) -> IndexMap<String, FieldReport> {
        self.controls
            .iter()
            .map(|(name, control)| {
                let state = match control {
                    Control::Combobox { widget, viewport } => ControlReport::Combobox {
                        label: widget.display_label().to_string(),
                        open: widget.is_open(),
                        highlighted: widget.highlighted_index(),
                        scroll_offset: viewport.offset,
                    },
                    Control::Files(widget) => ControlReport::Files {
                        count: widget.accepted_count(),
                        total: widget.total_bytes().to_string(),
                        remaining_slots: widget.remaining_slots(),
                        rejection: widget.last_rejection_reason(),
                    },
                };
                let report = FieldReport {
                    value: self.form.value(name),
                    error: self.form.error_for(name),
                    state,
                };
                (name.clone(), report)
            })
            .collect()
    }
}

fn apply_combobox(widget: &mut Combobox, form: &mut MemoryForm, action: &Action) -> Result<Effects> {
    let event = match action {
        Action::Open => ComboboxEvent::TriggerClick,
        Action::Key(key) => ComboboxEvent::Key(*key),
        Action::Click(index) => ComboboxEvent::OptionClick(*index),
        Action::Hover(index) => ComboboxEvent::OptionHover(*index),
        Action::Outside => ComboboxEvent::OutsidePointer,
        Action::Blur => ComboboxEvent::FocusLost,
        Action::Disable | Action::Enable => {
            widget.set_disabled(matches!(action, Action::Disable));
            return Ok(Effects::new());
        }
        Action::Drop(_) | Action::Pick(_) | Action::Remove(_) => {
            anyhow::bail!("`{}` is a combobox and does not take files", widget.name())
        }
    };
    Ok(widget.handle_event(form, event))
}

fn apply_files(widget: &mut FileIntake, form: &mut MemoryForm, action: &Action) -> Result<Effects> {
    let event = match action {
        Action::Open => FileIntakeEvent::TriggerActivate,
        Action::Key(key) => FileIntakeEvent::Key(*key),
        Action::Drop(paths) => {
            let files = paths.iter().map(DroppedFile::inspect_or_unreadable).collect();
            FileIntakeEvent::Drop(files)
        }
        Action::Pick(paths) => {
            let files = paths.iter().map(DroppedFile::inspect_or_unreadable).collect();
            FileIntakeEvent::PickerResult(files)
        }
        Action::Remove(index) => FileIntakeEvent::Remove(*index),
        Action::Disable | Action::Enable => {
            widget.set_disabled(matches!(action, Action::Disable));
            return Ok(Effects::new());
        }
        Action::Click(_) | Action::Hover(_) | Action::Outside | Action::Blur => {
            anyhow::bail!("`{}` is a file field and has no option list", widget.name())
        }
    };
    Ok(widget.handle_event(form, event))
}

/// Printed state of one field
#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub value: FieldValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub state: ControlReport,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlReport {
    Combobox {
        label: String,
        open: bool,
        highlighted: Option<usize>,
        scroll_offset: f32,
    },
    Files {
        count: usize,
        total: String,
        remaining_slots: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        rejection: Option<String>,
    },
}

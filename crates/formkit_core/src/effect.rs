//! Side-effect requests produced by widget transitions
//!
//! Transition functions never touch the form container or a rendering
//! surface directly. They return a list of [`Effect`]s; [`dispatch`] applies
//! the form-facing ones and hands back whatever the host still has to do.

use smallvec::SmallVec;

use crate::form::FormState;
use crate::value::FieldValue;

/// Vertical alignment for scroll-into-view requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    /// Align to top of viewport
    Start,
    /// Align to center of viewport
    Center,
    /// Align to bottom of viewport
    End,
    /// Scroll minimum distance to make visible
    #[default]
    Nearest,
}

/// A side effect requested by a widget transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write a new value into this field's form slot
    SetValue(FieldValue),
    /// Ask the form container to revalidate this field
    Revalidate,
    /// Scroll the candidate at `index` into the visible region of its list
    ScrollIntoView { index: usize, block: ScrollBlock },
    /// Ask the host to show its native file picker
    OpenFilePicker,
}

impl Effect {
    /// Whether the form container (rather than the host) handles this effect
    pub fn is_form_effect(&self) -> bool {
        matches!(self, Effect::SetValue(_) | Effect::Revalidate)
    }
}

/// Effects from a single transition (rarely more than a couple)
pub type Effects = SmallVec<[Effect; 4]>;

/// Apply form effects for `name` in order and return the host effects
pub fn dispatch(form: &mut dyn FormState, name: &str, effects: Effects) -> Effects {
    let mut host = Effects::new();
    for effect in effects {
        match effect {
            Effect::SetValue(value) => {
                tracing::trace!(field = name, kind = value.kind(), "set_value");
                form.set_value(name, value);
            }
            Effect::Revalidate => form.validate(name),
            other => host.push(other),
        }
    }
    host
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryForm;
    use crate::schema::{FieldRule, Schema};
    use smallvec::smallvec;

    #[test]
    fn test_dispatch_splits_effects() {
        let mut form = MemoryForm::with_schema(Schema::new().field("f", vec![FieldRule::Required]));
        let effects: Effects = smallvec![
            Effect::SetValue(FieldValue::text("a")),
            Effect::Revalidate,
            Effect::ScrollIntoView {
                index: 2,
                block: ScrollBlock::Nearest
            },
        ];

        let host = dispatch(&mut form, "f", effects);

        assert_eq!(form.value("f"), FieldValue::text("a"));
        assert_eq!(form.error_for("f"), None);
        assert_eq!(host.len(), 1);
        assert!(!host[0].is_form_effect());
    }

    #[test]
    fn test_dispatch_applies_in_order() {
        let mut form = MemoryForm::with_schema(Schema::new().field("f", vec![FieldRule::Required]));
        // Revalidating before the write sees the old (empty) value
        let effects: Effects = smallvec![Effect::Revalidate, Effect::SetValue(FieldValue::text("a"))];

        dispatch(&mut form, "f", effects);

        assert_eq!(form.error_for("f").as_deref(), Some("This field is required"));
    }
}

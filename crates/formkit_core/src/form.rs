//! The form state interface
//!
//! Widgets never own their persisted value. They read and write it through
//! the form container that the surrounding application provides, which also
//! owns schema validation and the error messages shown next to each field.

use crate::value::FieldValue;

/// A form state container
///
/// Implementations are keyed by field name. A widget only ever touches the
/// slot for its own name.
pub trait FormState {
    /// Current value for `name` (`FieldValue::Null` when unset)
    fn value(&self, name: &str) -> FieldValue;

    /// Replace the value for `name`
    fn set_value(&mut self, name: &str, value: FieldValue);

    /// Re-run validation for `name`, updating its error state
    fn validate(&mut self, name: &str);

    /// Current validation error for `name`, if any
    fn error_for(&self, name: &str) -> Option<String>;
}

impl<F: FormState + ?Sized> FormState for &mut F {
    fn value(&self, name: &str) -> FieldValue {
        (**self).value(name)
    }

    fn set_value(&mut self, name: &str, value: FieldValue) {
        (**self).set_value(name, value)
    }

    fn validate(&mut self, name: &str) {
        (**self).validate(name)
    }

    fn error_for(&self, name: &str) -> Option<String> {
        (**self).error_for(name)
    }
}

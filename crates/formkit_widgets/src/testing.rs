//! Recording form container for controller tests

use formkit_core::{FieldValue, FormState};
use rustc_hash::FxHashMap;

/// A call made against the form container
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    SetValue(String, FieldValue),
    Validate(String),
}

/// Implements only the form interface and records every mutating call
#[derive(Debug, Default)]
pub struct RecordingForm {
    pub values: FxHashMap<String, FieldValue>,
    pub errors: FxHashMap<String, String>,
    pub calls: Vec<Call>,
}

impl RecordingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, name: &str, value: FieldValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn with_error(mut self, name: &str, message: &str) -> Self {
        self.errors.insert(name.to_string(), message.to_string());
        self
    }

    pub fn writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::SetValue(..)))
            .count()
    }
}

impl FormState for RecordingForm {
    fn value(&self, name: &str) -> FieldValue {
        self.values.get(name).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, name: &str, value: FieldValue) {
        self.calls.push(Call::SetValue(name.to_string(), value.clone()));
        self.values.insert(name.to_string(), value);
    }

    fn validate(&mut self, name: &str) {
        self.calls.push(Call::Validate(name.to_string()));
    }

    fn error_for(&self, name: &str) -> Option<String> {
        self.errors.get(name).cloned()
    }
}

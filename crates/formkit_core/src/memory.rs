//! In-memory form container
//!
//! [`MemoryForm`] keeps field values and error messages in plain maps and
//! validates against a [`Schema`]. It is what the playground and the widget
//! tests run against; a real application plugs its own container in through
//! [`FormState`].
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use formkit_core::{FieldValue, FormState, MemoryForm};
//!
//! let mut form = MemoryForm::new();
//! let writes = Rc::new(Cell::new(0));
//! let seen = writes.clone();
//! let handle = form.subscribe("country", move |_value| seen.set(seen.get() + 1));
//!
//! form.set_value("country", FieldValue::text("fr"));
//! form.unsubscribe(handle);
//! form.set_value("country", FieldValue::text("de"));
//!
//! assert_eq!(writes.get(), 1);
//! ```

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::form::FormState;
use crate::schema::Schema;
use crate::value::FieldValue;

new_key_type! {
    /// Unique identifier for a field subscription
    pub struct SubscriberId;
}

struct Subscriber {
    name: String,
    callback: Box<dyn Fn(&FieldValue)>,
}

/// Handle for unsubscribing from field updates
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: SubscriberId,
}

/// A form container backed by hash maps
#[derive(Default)]
pub struct MemoryForm {
    values: FxHashMap<String, FieldValue>,
    errors: FxHashMap<String, String>,
    schema: Schema,
    /// Removed subscriptions free their slot for reuse
    subscribers: SlotMap<SubscriberId, Subscriber>,
}

impl MemoryForm {
    /// Create an empty form with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty form validated by `schema`
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// The schema this form validates against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Subscribe to value changes for `name`
    pub fn subscribe<F>(&mut self, name: &str, callback: F) -> SubscriptionHandle
    where
        F: Fn(&FieldValue) + 'static,
    {
        let id = self.subscribers.insert(Subscriber {
            name: name.to_string(),
            callback: Box::new(callback),
        });
        SubscriptionHandle { id }
    }

    /// Stop receiving updates for a subscription
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.subscribers.remove(handle.id);
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Revalidate every field declared in the schema or holding a value
    pub fn validate_all(&mut self) {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.extend(
            self.schema
                .names()
                .filter(|name| !self.values.contains_key(*name))
                .map(str::to_string),
        );
        for name in names {
            self.validate(&name);
        }
    }

    /// Whether any field currently has an error
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drop a field's value and error
    pub fn clear(&mut self, name: &str) {
        self.values.remove(name);
        self.errors.remove(name);
    }

    fn notify_subscribers(&self, name: &str, value: &FieldValue) {
        for subscriber in self.subscribers.values() {
            if subscriber.name == name {
                (subscriber.callback)(value);
            }
        }
    }
}

impl FormState for MemoryForm {
    fn value(&self, name: &str) -> FieldValue {
        self.values.get(name).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, name: &str, value: FieldValue) {
        self.notify_subscribers(name, &value);
        self.values.insert(name.to_string(), value);
    }

    fn validate(&mut self, name: &str) {
        let value = self.value(name);
        match self.schema.validate(name, &value) {
            Some(message) => {
                tracing::debug!(field = name, %message, "validation failed");
                self.errors.insert(name.to_string(), message);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }

    fn error_for(&self, name: &str) -> Option<String> {
        self.errors.get(name).cloned()
    }
}

impl std::fmt::Debug for MemoryForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryForm")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("schema", &self.schema)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldRule;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_unset_value_is_null() {
        let form = MemoryForm::new();
        assert_eq!(form.value("missing"), FieldValue::Null);
        assert_eq!(form.error_for("missing"), None);
    }

    #[test]
    fn test_validate_sets_and_clears_error() {
        let mut form =
            MemoryForm::with_schema(Schema::new().field("name", vec![FieldRule::Required]));

        form.validate("name");
        assert_eq!(form.error_for("name").as_deref(), Some("This field is required"));
        assert!(form.has_errors());

        form.set_value("name", FieldValue::text("Ada"));
        // Writing alone does not revalidate
        assert!(form.has_errors());

        form.validate("name");
        assert_eq!(form.error_for("name"), None);
        assert!(!form.has_errors());
    }

    #[test]
    fn test_subscribers_see_each_write() {
        let mut form = MemoryForm::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        form.subscribe("pick", move |value| sink.borrow_mut().push(value.clone()));
        form.subscribe("other", |_| panic!("wrong field notified"));

        form.set_value("pick", FieldValue::text("a"));
        form.set_value("pick", FieldValue::Null);

        assert_eq!(
            *seen.borrow(),
            vec![FieldValue::text("a"), FieldValue::Null]
        );
    }

    #[test]
    fn test_unsubscribe_frees_slots() {
        let mut form = MemoryForm::new();
        for _ in 0..1000 {
            let handle = form.subscribe("pick", |_| {});
            form.unsubscribe(handle);
        }
        assert_eq!(form.subscriber_count(), 0);
        assert!(form.subscribers.capacity() < 16);

        let kept = Rc::new(RefCell::new(0));
        let sink = kept.clone();
        let first = form.subscribe("pick", |_| panic!("unsubscribed callback ran"));
        form.subscribe("pick", move |_| *sink.borrow_mut() += 1);
        form.unsubscribe(first);

        form.set_value("pick", FieldValue::text("a"));
        assert_eq!(*kept.borrow(), 1);
        assert_eq!(form.subscriber_count(), 1);
        assert!(format!("{:?}", form).contains("subscribers: 1"));
    }

    #[test]
    fn test_validate_all_and_clear() {
        let schema = Schema::new()
            .field("a", vec![FieldRule::Required])
            .field("b", vec![FieldRule::OneOf(vec!["x".into()])]);
        let mut form = MemoryForm::with_schema(schema);
        form.set_value("b", FieldValue::text("y"));

        form.validate_all();
        assert!(form.error_for("a").is_some());
        assert!(form.error_for("b").is_some());

        form.clear("b");
        assert_eq!(form.error_for("b"), None);
        assert_eq!(form.value("b"), FieldValue::Null);
    }
}

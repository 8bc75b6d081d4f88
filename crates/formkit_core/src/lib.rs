//! formkit Core
//!
//! This crate provides the foundational pieces shared by formkit field widgets:
//!
//! - **Field Values**: The [`FieldValue`] stored in a form slot, including
//!   accepted [`FileEntry`] attachments
//! - **Form State Interface**: The [`FormState`] trait widgets read and write
//!   through (get/set value, revalidate, error lookup)
//! - **Effects**: Side-effect requests returned by widget transitions
//! - **Rule Validation**: A small declarative [`Schema`] and an in-memory
//!   [`MemoryForm`] container for tests and tooling
//!
//! # Example
//!
//! ```rust
//! use formkit_core::{FieldRule, FieldValue, FormState, MemoryForm, Schema};
//!
//! let schema = Schema::new().field("country", vec![FieldRule::Required]);
//! let mut form = MemoryForm::with_schema(schema);
//!
//! form.validate("country");
//! assert_eq!(form.error_for("country").as_deref(), Some("This field is required"));
//!
//! form.set_value("country", FieldValue::text("de"));
//! form.validate("country");
//! assert_eq!(form.error_for("country"), None);
//! ```

pub mod effect;
pub mod error;
pub mod form;
pub mod memory;
pub mod schema;
pub mod value;

pub use effect::{dispatch, Effect, Effects, ScrollBlock};
pub use error::{FormError, Result};
pub use form::FormState;
pub use memory::{MemoryForm, SubscriptionHandle};
pub use schema::{FieldRule, Schema};
pub use value::{ContentHandle, FieldValue, FileEntry, IdentityKey};

//! Declarative field rules
//!
//! A deliberately small stand-in for a real schema validator: each field name
//! maps to an ordered list of rules and the first failing rule's message
//! becomes the field's error.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::value::FieldValue;

/// A single validation rule
///
/// In TOML, unit rules are plain strings and parameterized rules are inline
/// tables: `rules = ["required", { min_files = 1 }]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    /// Value must not be empty
    Required,
    /// At least this many files
    MinFiles(usize),
    /// At most this many files
    MaxFiles(usize),
    /// Text value must be one of these
    OneOf(Vec<String>),
}

impl FieldRule {
    /// Rule name as written in configuration
    pub fn name(&self) -> &'static str {
        match self {
            FieldRule::Required => "required",
            FieldRule::MinFiles(_) => "min_files",
            FieldRule::MaxFiles(_) => "max_files",
            FieldRule::OneOf(_) => "one_of",
        }
    }

    /// Check `value`, returning the error message if the rule fails
    pub fn check(&self, value: &FieldValue) -> Option<String> {
        match self {
            FieldRule::Required => value
                .is_empty()
                .then(|| "This field is required".to_string()),
            FieldRule::MinFiles(min) => (value.file_count() < *min)
                .then(|| format!("Select at least {}", count_files(*min))),
            FieldRule::MaxFiles(max) => (value.file_count() > *max)
                .then(|| format!("Select at most {}", count_files(*max))),
            // Empty choices are the business of `Required`
            FieldRule::OneOf(allowed) => match value.as_text() {
                Some(text) if !text.is_empty() && !allowed.iter().any(|a| a == text) => {
                    Some("Select a valid option".to_string())
                }
                _ => None,
            },
        }
    }
}

fn count_files(n: usize) -> String {
    if n == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", n)
    }
}

/// Rules for every field of a form
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: FxHashMap<String, Vec<FieldRule>>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: declare rules for a field (replacing earlier rules)
    pub fn field(mut self, name: impl Into<String>, rules: Vec<FieldRule>) -> Self {
        self.fields.insert(name.into(), rules);
        self
    }

    /// Declare rules for a field, rejecting duplicate declarations
    pub fn insert(&mut self, name: impl Into<String>, rules: Vec<FieldRule>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(FormError::DuplicateField(name));
        }
        self.fields.insert(name, rules);
        Ok(())
    }

    /// Rules declared for `name` (empty if undeclared)
    pub fn rules(&self, name: &str) -> &[FieldRule] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Whether `name` is declared
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Names of all declared fields
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Validate a value for `name`; the first failing rule wins
    pub fn validate(&self, name: &str, value: &FieldValue) -> Option<String> {
        self.rules(name).iter().find_map(|rule| rule.check(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FileEntry;

    fn files(n: usize) -> FieldValue {
        FieldValue::Files(
            (0..n)
                .map(|i| FileEntry::new(format!("f{}.txt", i), 10, "text/plain"))
                .collect(),
        )
    }

    #[test]
    fn test_required() {
        let rule = FieldRule::Required;
        assert_eq!(rule.check(&FieldValue::Null).as_deref(), Some("This field is required"));
        assert_eq!(rule.check(&FieldValue::text("x")), None);
        assert!(rule.check(&files(0)).is_some());
    }

    #[test]
    fn test_file_counts() {
        assert_eq!(
            FieldRule::MinFiles(1).check(&files(0)).as_deref(),
            Some("Select at least 1 file")
        );
        assert_eq!(FieldRule::MinFiles(1).check(&files(1)), None);
        assert_eq!(
            FieldRule::MaxFiles(2).check(&files(3)).as_deref(),
            Some("Select at most 2 files")
        );
    }

    #[test]
    fn test_one_of_ignores_empty() {
        let rule = FieldRule::OneOf(vec!["a".into(), "b".into()]);
        assert_eq!(rule.check(&FieldValue::Null), None);
        assert_eq!(rule.check(&FieldValue::text("b")), None);
        assert_eq!(rule.check(&FieldValue::text("z")).as_deref(), Some("Select a valid option"));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let schema = Schema::new().field(
            "docs",
            vec![FieldRule::Required, FieldRule::MinFiles(2)],
        );
        assert_eq!(
            schema.validate("docs", &FieldValue::Null).as_deref(),
            Some("This field is required")
        );
        assert_eq!(
            schema.validate("docs", &files(1)).as_deref(),
            Some("Select at least 2 files")
        );
        assert_eq!(schema.validate("undeclared", &FieldValue::Null), None);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut schema = Schema::new();
        schema.insert("a", vec![]).unwrap();
        assert_eq!(
            schema.insert("a", vec![FieldRule::Required]),
            Err(FormError::DuplicateField("a".into()))
        );
        // First declaration stays
        assert!(schema.contains("a"));
        assert!(schema.rules("a").is_empty());
        assert!(!schema.contains("b"));
    }

    #[test]
    fn test_rules_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            rules: Vec<FieldRule>,
        }

        let doc: Doc = toml::from_str(r#"rules = ["required", { min_files = 1 }, { one_of = ["x"] }]"#)
            .unwrap();
        assert_eq!(
            doc.rules,
            vec![
                FieldRule::Required,
                FieldRule::MinFiles(1),
                FieldRule::OneOf(vec!["x".into()])
            ]
        );
    }
}

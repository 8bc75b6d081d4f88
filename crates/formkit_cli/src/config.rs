//! Form definition file handling
//!
//! A form definition is a TOML file with one `[[field]]` table per field:
//!
//! ```toml
//! [[field]]
//! name = "country"
//! kind = "combobox"
//! options = [{ value = "us", label = "United States" }]
//! rules = ["required"]
//!
//! [[field]]
//! name = "attachments"
//! kind = "files"
//! max_files = 3
//! rules = [{ min_files = 1 }]
//! ```

use anyhow::{Context, Result};
use formkit_core::{FieldRule, FormError, Schema};
use formkit_widgets::{ComboboxConfig, ComboboxOption, FileIntakeConfig};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A whole form
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FormDefinition {
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDefinition>,
}

/// One field of a form
#[derive(Debug, Deserialize, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<FieldRule>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Widget-specific settings, selected by `kind`
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Combobox {
        #[serde(default)]
        placeholder: Option<String>,
        #[serde(default)]
        options: Vec<OptionDefinition>,
    },
    Files {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        max_files: Option<usize>,
        /// Per-file limit in bytes
        #[serde(default)]
        max_size_per_file: Option<u64>,
        #[serde(default)]
        allowed_content_types: Vec<String>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptionDefinition {
    pub value: String,
    pub label: String,
}

impl FormDefinition {
    /// Load a definition from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the rule schema, rejecting duplicates and misplaced rules
    pub fn schema(&self) -> std::result::Result<Schema, FormError> {
        let mut schema = Schema::new();
        for field in &self.fields {
            field.check_rules()?;
            schema.insert(&field.name, field.rules.clone())?;
        }
        Ok(schema)
    }

    /// Full consistency check
    pub fn validate(&self) -> Result<()> {
        self.schema()?;
        for field in &self.fields {
            if field.name.trim().is_empty() {
                anyhow::bail!("Field names must not be empty");
            }
            if let FieldKind::Combobox { options, .. } = &field.kind {
                let mut seen = FxHashSet::default();
                for option in options {
                    if !seen.insert(option.value.as_str()) {
                        anyhow::bail!(
                            "Field `{}` lists option `{}` more than once",
                            field.name,
                            option.value
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

impl FieldDefinition {
    pub fn is_combobox(&self) -> bool {
        matches!(self.kind, FieldKind::Combobox { .. })
    }

    fn check_rules(&self) -> std::result::Result<(), FormError> {
        let invalid = |rule: &FieldRule, reason: String| FormError::InvalidRule {
            field: self.name.clone(),
            rule: rule.name(),
            reason,
        };

        for rule in &self.rules {
            match (&self.kind, rule) {
                (FieldKind::Combobox { .. }, FieldRule::MinFiles(_) | FieldRule::MaxFiles(_)) => {
                    return Err(invalid(rule, "only file fields hold files".into()));
                }
                (FieldKind::Files { .. }, FieldRule::OneOf(_)) => {
                    return Err(invalid(rule, "only combobox fields hold a choice".into()));
                }
                (FieldKind::Combobox { options, .. }, FieldRule::OneOf(allowed)) => {
                    if let Some(missing) = allowed
                        .iter()
                        .find(|value| !options.iter().any(|opt| &opt.value == *value))
                    {
                        return Err(invalid(rule, format!("`{}` is not an option", missing)));
                    }
                }
                (
                    FieldKind::Files {
                        max_files: Some(cap),
                        ..
                    },
                    FieldRule::MinFiles(min),
                ) if min > cap => {
                    return Err(invalid(
                        rule,
                        format!("at least {} files can never fit under max_files = {}", min, cap),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Combobox settings, if this is a combobox field
    pub fn combobox(&self) -> Option<(Vec<ComboboxOption>, ComboboxConfig)> {
        let FieldKind::Combobox {
            placeholder,
            options,
        } = &self.kind
        else {
            return None;
        };
        let mut config = ComboboxConfig::new().disabled(self.disabled);
        if let Some(placeholder) = placeholder {
            config = config.placeholder(placeholder);
        }
        let options = options
            .iter()
            .map(|opt| ComboboxOption::new(&opt.value, &opt.label))
            .collect();
        Some((options, config))
    }

    /// File intake settings, if this is a file field
    pub fn file_intake(&self) -> Option<FileIntakeConfig> {
        let FieldKind::Files {
            label,
            max_files,
            max_size_per_file,
            allowed_content_types,
        } = &self.kind
        else {
            return None;
        };
        Some(FileIntakeConfig {
            max_files: *max_files,
            max_size_per_file_bytes: *max_size_per_file,
            allowed_content_types: allowed_content_types.clone(),
            label: label.clone(),
            disabled: self.disabled,
        })
    }
}

//! Generator configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;
use crate::listener::ListenerRule;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "synergy-maker.json";

/// Configuration for the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Directory the TypeScript entity classes are written to.
    pub out_dir: PathBuf,

    /// Directory the CRUD edit forms are written to.
    pub forms_dir: PathBuf,

    /// JSON metadata export.
    pub metadata_path: PathBuf,

    /// Package the runtime base classes are imported from.
    pub bundle_name: String,

    /// Prefix of the editor snippets shipped with the runtime.
    pub snippet_prefix: String,

    /// Prefix of generated edit-form component names.
    pub edit_form_prefix: String,

    /// Root key of the translation labels used by the edit forms.
    pub translation_prefix: String,

    /// Overwrite existing edit forms instead of writing a `-generated` copy.
    pub overwrite_forms: bool,

    pub policy: MergePolicy,

    /// Header/import rules applied by the built-in listener.
    pub rules: Vec<ListenerRule>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("assets/entity"),
            forms_dir: PathBuf::from("assets/components/form"),
            metadata_path: PathBuf::from("synergy-metadata.json"),
            bundle_name: "@synergy/runtime".to_string(),
            snippet_prefix: "synergy".to_string(),
            edit_form_prefix: "Sp".to_string(),
            translation_prefix: "synergy".to_string(),
            overwrite_forms: false,
            policy: MergePolicy::default(),
            rules: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| GeneratorError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, GeneratorError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Immutable merge rules shared by every entity of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergePolicy {
    /// Identity and bookkeeping fields owned by the runtime base class.
    pub skipped_fields: BTreeSet<String>,

    /// Permitted `extends` migrations: current base -> allowed replacements.
    pub allowed_migrations: BTreeMap<String, BTreeSet<String>>,

    /// Base class assumed when a header declares no `extends`.
    pub default_base: String,

    /// Backend classes mapped to `Date`.
    pub date_classes: BTreeSet<String>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        let skipped_fields = [
            "id",
            "createdAt",
            "updatedAt",
            "createdBy",
            "updatedBy",
            "entityName",
            "scheduledAt",
            "executedAt",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let mut allowed_migrations = BTreeMap::new();
        allowed_migrations.insert(
            "Entity".to_string(),
            ["ScheduledEventEntity", "SimulationEntity", "TimeEventEntity"]
                .into_iter()
                .map(String::from)
                .collect(),
        );
        allowed_migrations.insert(
            "TimeEventEntity".to_string(),
            std::iter::once("ScheduledEventEntity".to_string()).collect(),
        );

        let date_classes = [
            "DateTimeInterface",
            "DateTime",
            "DateTimeImmutable",
            "\\DateTimeInterface",
            "\\DateTime",
            "\\DateTimeImmutable",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            skipped_fields,
            allowed_migrations,
            default_base: "Entity".to_string(),
            date_classes,
        }
    }
}

impl MergePolicy {
    pub fn is_skipped(&self, field: &str) -> bool {
        self.skipped_fields.contains(field)
    }

    pub fn allows_migration(&self, from: &str, to: &str) -> bool {
        self.allowed_migrations
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    pub fn is_date_class(&self, class_name: &str) -> bool {
        self.date_classes.contains(class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_list() {
        let policy = MergePolicy::default();
        assert!(policy.allows_migration("Entity", "ScheduledEventEntity"));
        assert!(policy.allows_migration("TimeEventEntity", "ScheduledEventEntity"));
        assert!(!policy.allows_migration("ScheduledEventEntity", "Entity"));
        assert!(!policy.allows_migration("Entity", "Whatever"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "outDir": "front/entity", "policy": { "defaultBase": "Model" } }"#)
                .unwrap();
        assert_eq!(config.out_dir, PathBuf::from("front/entity"));
        assert_eq!(config.edit_form_prefix, "Sp");
        assert_eq!(config.policy.default_base, "Model");
        assert!(config.policy.is_skipped("createdAt"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = GeneratorConfig::load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.policy.default_base, "Entity");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        let err = GeneratorConfig::load(&path).unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigInvalid { .. }));
    }
}

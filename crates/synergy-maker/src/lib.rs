//! # synergy-maker
//!
//! Regenerates TypeScript entity classes from backend entity metadata without
//! losing what developers wrote into them between runs, and projects the same
//! metadata into Vue edit forms.
//!
//! ## Architecture
//!
//! ```text
//!   Metadata (JSON export)        Existing <Entity>.ts (or scaffold)
//!          │                                  │
//!          ▼                                  ▼
//! ┌──────────────────┐              ┌──────────────────┐
//! │     Classify     │              │     Extract      │  tree-sitter
//! │ (field → member) │              │ (text → model)   │
//! └────────┬─────────┘              └────────┬─────────┘
//!          │        listener proposals       │
//!          └───────────────┬─────────────────┘
//!                          ▼
//!                ┌──────────────────┐
//!                │      Merge       │  textual presence wins
//!                │ (model → plan)   │
//!                └────────┬─────────┘
//!                         ▼
//!                ┌──────────────────┐
//!                │      Inject      │  marker-based, one write
//!                │ (plan → text)    │
//!                └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use synergy_maker::{Generator, GeneratorConfig, GeneratorToggles, JsonMetadataSource};
//!
//! let config = GeneratorConfig::load_or_default("synergy-maker.json".as_ref())?;
//! let metadata = JsonMetadataSource::load(&config.metadata_path)?;
//!
//! let mut generator = Generator::new(&config, &metadata, GeneratorToggles::default())?;
//! let summary = generator.build_all(&metadata.entity_types(), |_| {});
//! ```

pub mod codegen;
pub mod config;
pub mod crud_form;
pub mod diagnostic;
pub mod entity;
pub mod extract;
pub mod listener;
pub mod merge;
pub mod metadata;

pub use config::{GeneratorConfig, MergePolicy, CONFIG_FILE_NAME};
pub use crud_form::{CrudFormGenerator, FormReport};
pub use diagnostic::{FieldError, GeneratorError};
pub use entity::{BatchReport, EntityClassGenerator, EntityReport};
pub use listener::{EntityContext, GenerationListener, ListenerRule, Proposals, RuleListener};
pub use metadata::{FieldDescriptor, JsonMetadataSource, MetadataSource};

use tracing::error;

/// Which generators [`Generator::build`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorToggles {
    pub entity: bool,
    pub crud_form: bool,
}

impl Default for GeneratorToggles {
    fn default() -> Self {
        Self {
            entity: true,
            crud_form: false,
        }
    }
}

/// Everything produced for one entity.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub entity_type: String,
    pub entity: Option<EntityReport>,
    pub form: Option<FormReport>,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub built: Vec<BuildReport>,
    pub failed: Vec<(String, GeneratorError)>,
}

impl BuildSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the enabled generators over entities.
pub struct Generator<'a> {
    metadata: &'a dyn MetadataSource,
    toggles: GeneratorToggles,
    entities: EntityClassGenerator<'a>,
    forms: CrudFormGenerator<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        metadata: &'a dyn MetadataSource,
        toggles: GeneratorToggles,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            metadata,
            toggles,
            entities: EntityClassGenerator::new(config, metadata)?,
            forms: CrudFormGenerator::new(config, metadata),
        })
    }

    pub fn toggles(&self) -> GeneratorToggles {
        self.toggles
    }

    pub fn entities_mut(&mut self) -> &mut EntityClassGenerator<'a> {
        &mut self.entities
    }

    pub fn forms_mut(&mut self) -> &mut CrudFormGenerator<'a> {
        &mut self.forms
    }

    /// Resolves a short or fully-qualified name to an entity type.
    pub fn resolve(&self, name: &str) -> Result<String, GeneratorError> {
        self.metadata
            .find_entity_type(name.trim())
            .ok_or_else(|| GeneratorError::UnknownEntity {
                name: name.trim().to_string(),
            })
    }

    /// Runs the enabled generators for one entity type.
    pub fn build(&mut self, entity_type: &str) -> Result<BuildReport, GeneratorError> {
        let entity = if self.toggles.entity {
            Some(self.entities.generate(entity_type)?)
        } else {
            None
        };
        let form = if self.toggles.crud_form {
            Some(self.forms.generate(entity_type)?)
        } else {
            None
        };

        Ok(BuildReport {
            entity_type: entity_type.to_string(),
            entity,
            form,
        })
    }

    /// Builds every entity type; a failure does not stop the others.
    /// `on_start` is called with each entity type before it is built.
    pub fn build_all(&mut self, entity_types: &[String], mut on_start: impl FnMut(&str)) -> BuildSummary {
        let mut summary = BuildSummary::default();
        for entity_type in entity_types {
            on_start(entity_type);
            match self.build(entity_type) {
                Ok(report) => summary.built.push(report),
                Err(e) => {
                    error!("{}: {}", entity_type, e);
                    summary.failed.push((entity_type.clone(), e));
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "entities": [
            { "class": "App\\Entity\\Customer", "fields": [ { "name": "name", "type": "string" } ] }
        ]
    }"#;

    #[test]
    fn test_toggles_select_generators() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            out_dir: dir.path().join("entity"),
            forms_dir: dir.path().join("form"),
            ..GeneratorConfig::default()
        };
        let metadata = JsonMetadataSource::from_json(EXPORT).unwrap();

        let toggles = GeneratorToggles {
            entity: false,
            crud_form: true,
        };
        let mut generator = Generator::new(&config, &metadata, toggles).unwrap();
        let entity_type = generator.resolve("customer").unwrap();
        let report = generator.build(&entity_type).unwrap();

        assert!(report.entity.is_none());
        assert!(report.form.is_some());
        assert!(!config.out_dir.join("Customer.ts").exists());
        assert!(config.forms_dir.join("SpCustomerEditForm.vue").exists());
    }

    #[test]
    fn test_build_all_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            out_dir: dir.path().join("entity"),
            ..GeneratorConfig::default()
        };
        let metadata = JsonMetadataSource::from_json(EXPORT).unwrap();
        let mut generator = Generator::new(&config, &metadata, GeneratorToggles::default()).unwrap();

        let mut started = Vec::new();
        let summary = generator.build_all(
            &["App\\Entity\\Missing".to_string(), "App\\Entity\\Customer".to_string()],
            |entity_type| started.push(entity_type.to_string()),
        );

        assert_eq!(started.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.built.len(), 1);
        assert!(!summary.is_success());
        assert!(config.out_dir.join("Customer.ts").exists());
    }

    #[test]
    fn test_unknown_name() {
        let config = GeneratorConfig::default();
        let metadata = JsonMetadataSource::from_json(EXPORT).unwrap();
        let generator = Generator::new(&config, &metadata, GeneratorToggles::default()).unwrap();
        assert!(matches!(generator.resolve("Nope"), Err(GeneratorError::UnknownEntity { .. })));
    }
}

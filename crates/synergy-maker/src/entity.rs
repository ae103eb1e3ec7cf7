//! Per-entity file lifecycle: load or scaffold, extract, plan, inject, write.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::codegen::{inject, DefaultScaffold, ScaffoldContext, ScaffoldTemplate};
use crate::config::GeneratorConfig;
use crate::diagnostic::GeneratorError;
use crate::extract::Extractor;
use crate::listener::{EntityContext, GenerationListener, Proposals, RuleListener};
use crate::merge::{DiagnosticLevel, MergePlanner, PlanDiagnostic, PlanRequest};
use crate::metadata::{short_class_name, FieldDescriptor, MetadataSource};

/// Outcome of generating one entity file.
#[derive(Debug, Clone)]
pub struct EntityReport {
    pub entity_type: String,
    pub short_name: String,
    pub path: PathBuf,
    /// The file did not exist and was created from the scaffold.
    pub scaffolded: bool,
    /// The written text differs from what was on disk.
    pub changed: bool,
    /// `property amount`, `getter customer`, ...
    pub added: Vec<String>,
    pub diagnostics: Vec<PlanDiagnostic>,
}

impl EntityReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Error)
    }
}

/// Outcome of a batch. Failures do not stop the batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<EntityReport>,
    pub failed: Vec<(String, GeneratorError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Regenerates TypeScript entity classes in place.
pub struct EntityClassGenerator<'a> {
    config: &'a GeneratorConfig,
    metadata: &'a dyn MetadataSource,
    extractor: Extractor,
    scaffold: Box<dyn ScaffoldTemplate + 'a>,
    listeners: Vec<Box<dyn GenerationListener + 'a>>,
}

impl<'a> EntityClassGenerator<'a> {
    /// Creates a generator with the default scaffold and a listener for the
    /// configured rules.
    pub fn new(config: &'a GeneratorConfig, metadata: &'a dyn MetadataSource) -> Result<Self, GeneratorError> {
        let mut generator = Self {
            config,
            metadata,
            extractor: Extractor::new()?,
            scaffold: Box::new(DefaultScaffold),
            listeners: Vec::new(),
        };
        if !config.rules.is_empty() {
            generator.add_listener(Box::new(RuleListener::new(config.rules.clone())));
        }
        Ok(generator)
    }

    pub fn with_scaffold(mut self, scaffold: Box<dyn ScaffoldTemplate + 'a>) -> Self {
        self.scaffold = scaffold;
        self
    }

    /// Listeners are consulted in registration order.
    pub fn add_listener(&mut self, listener: Box<dyn GenerationListener + 'a>) {
        self.listeners.push(listener);
    }

    /// Name of the generated class and file for `entity_type`.
    pub fn short_name(&self, entity_type: &str) -> String {
        self.metadata
            .display_name(entity_type)
            .unwrap_or_else(|| short_class_name(entity_type).to_string())
    }

    pub fn output_path(&self, entity_type: &str) -> PathBuf {
        self.config.out_dir.join(format!("{}.ts", self.short_name(entity_type)))
    }

    /// Generates one entity.
    ///
    /// Any error leaves the file on disk as it was: the text is only written
    /// once, after injection succeeded.
    pub fn generate(&mut self, entity_type: &str) -> Result<EntityReport, GeneratorError> {
        let short_name = self.short_name(entity_type);
        let out_dir = &self.config.out_dir;
        std::fs::create_dir_all(out_dir).map_err(|e| GeneratorError::io(out_dir, e.to_string()))?;

        let path = self.output_path(entity_type);
        let scaffolded = !path.exists();
        let source = if scaffolded {
            debug!("scaffolding {}", path.display());
            self.scaffold.render(&ScaffoldContext {
                class_name: entity_type,
                short_name: &short_name,
                config: self.config,
            })
        } else {
            std::fs::read_to_string(&path).map_err(|e| GeneratorError::io(&path, e.to_string()))?
        };

        let fields = self.metadata.describe_fields(entity_type)?;
        let model = self.extractor.extract(&source, &path)?;

        let interfaces = self.metadata.interfaces(entity_type);
        let mut proposals = Proposals::default();
        let ctx = EntityContext {
            class_name: entity_type,
            short_name: &short_name,
            interfaces: &interfaces,
            fields: &fields,
        };
        for listener in &self.listeners {
            listener.collect_proposals(&ctx, &mut proposals);
        }

        let display_names = self.resolve_display_names(&fields)?;

        let request = PlanRequest {
            short_name: &short_name,
            fields: &fields,
            display_names: &display_names,
            proposals: &proposals,
        };
        let plan = MergePlanner::new(&self.config.policy).plan(&model, &request);

        for diagnostic in &plan.diagnostics {
            log_diagnostic(&short_name, diagnostic);
        }
        for planned in &plan.members {
            info!("{}: adding {}", short_name, planned.member.describe());
        }

        let output = inject(&source, &plan)?;
        std::fs::write(&path, &output).map_err(|e| GeneratorError::io(&path, e.to_string()))?;

        Ok(EntityReport {
            entity_type: entity_type.to_string(),
            short_name,
            path,
            scaffolded,
            changed: scaffolded || output != source,
            added: plan.members.iter().map(|m| m.member.describe()).collect(),
            diagnostics: plan.diagnostics,
        })
    }

    /// Generates every entity in `entity_types`, one after the other.
    pub fn generate_batch(&mut self, entity_types: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        for entity_type in entity_types {
            match self.generate(entity_type) {
                Ok(entity) => report.generated.push(entity),
                Err(e) => {
                    error!("{}: {}", entity_type, e);
                    report.failed.push((entity_type.clone(), e));
                }
            }
        }
        report
    }

    /// Display names of the relation targets that will get an accessor.
    fn resolve_display_names(&self, fields: &[FieldDescriptor]) -> Result<BTreeMap<String, String>, GeneratorError> {
        let mut names = BTreeMap::new();
        for field in fields {
            if field.ignore || field.is_collection || self.config.policy.is_skipped(&field.name) {
                continue;
            }
            let Some(target) = field.relation_target_type.as_deref().map(str::trim) else {
                continue;
            };
            if target.is_empty() || names.contains_key(target) {
                continue;
            }
            let display = self
                .metadata
                .display_name(target)
                .ok_or_else(|| GeneratorError::UnresolvedDisplayName {
                    entity_type: target.to_string(),
                })?;
            names.insert(target.to_string(), display);
        }
        Ok(names)
    }
}

fn log_diagnostic(short_name: &str, diagnostic: &PlanDiagnostic) {
    let subject = match &diagnostic.field {
        Some(field) => format!("{}.{}", short_name, field),
        None => short_name.to_string(),
    };
    match diagnostic.level {
        DiagnosticLevel::Debug => debug!("{}: {}", subject, diagnostic.message),
        DiagnosticLevel::Info => info!("{}: {}", subject, diagnostic.message),
        DiagnosticLevel::Warning => warn!("{}: {}", subject, diagnostic.message),
        DiagnosticLevel::Error => error!("{}: {}", subject, diagnostic.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::JsonMetadataSource;

    const EXPORT: &str = r#"{
        "entities": [
            {
                "class": "App\\Entity\\Invoice",
                "fields": [
                    { "name": "amount", "type": "float" },
                    { "name": "customer", "type": "object", "target": "App\\Entity\\Customer", "nullable": true }
                ]
            },
            { "class": "App\\Entity\\Customer", "fields": [ { "name": "name", "type": "string" } ] },
            {
                "class": "App\\Entity\\Orphan",
                "fields": [ { "name": "owner", "type": "object", "target": "App\\Entity\\Ghost" } ]
            }
        ]
    }"#;

    fn config(dir: &tempfile::TempDir) -> GeneratorConfig {
        GeneratorConfig {
            out_dir: dir.path().join("entity"),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_scaffold_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let metadata = JsonMetadataSource::from_json(EXPORT).unwrap();
        let mut generator = EntityClassGenerator::new(&config, &metadata).unwrap();

        let first = generator.generate("App\\Entity\\Invoice").unwrap();
        assert!(first.scaffolded);
        assert!(first.path.ends_with("Invoice.ts"));
        assert_eq!(first.added.len(), 5);

        let second = generator.generate("App\\Entity\\Invoice").unwrap();
        assert!(!second.scaffolded);
        assert!(!second.changed);
        assert!(second.added.is_empty());
    }

    #[test]
    fn test_unresolved_relation_target_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let metadata = JsonMetadataSource::from_json(EXPORT).unwrap();
        let mut generator = EntityClassGenerator::new(&config, &metadata).unwrap();

        let err = generator.generate("App\\Entity\\Orphan").unwrap_err();
        assert!(matches!(err, GeneratorError::UnresolvedDisplayName { ref entity_type } if entity_type == "App\\Entity\\Ghost"));
        assert!(!config.out_dir.join("Orphan.ts").exists());
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let metadata = JsonMetadataSource::from_json(EXPORT).unwrap();
        let mut generator = EntityClassGenerator::new(&config, &metadata).unwrap();

        let types = vec![
            "App\\Entity\\Orphan".to_string(),
            "App\\Entity\\Missing".to_string(),
            "App\\Entity\\Customer".to_string(),
        ];
        let report = generator.generate_batch(&types);
        assert!(!report.is_success());
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.generated[0].short_name, "Customer");
    }
}

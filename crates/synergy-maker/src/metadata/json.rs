//! JSON metadata export.
//!
//! The backend dumps its entity metadata once (`synergy-metadata.json`):
//!
//! ```json
//! {
//!   "entities": [
//!     {
//!       "class": "App\\Entity\\Invoice",
//!       "name": "Invoice",
//!       "interfaces": ["App\\Entity\\Interface\\ScheduledEventInterface"],
//!       "fields": [
//!         { "name": "amount", "type": "float" },
//!         { "name": "customer", "type": "object", "target": "App\\Entity\\Customer", "nullable": true }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;
use super::{short_class_name, FieldDescriptor, MetadataSource};

/// Top-level document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub entities: Vec<EntityMetadata>,
}

/// Metadata for one managed entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Fully-qualified backend class.
    pub class: String,

    /// Display name; defaults to the short class name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl EntityMetadata {
    fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| short_class_name(&self.class))
    }
}

/// [`MetadataSource`] backed by a JSON metadata export.
#[derive(Debug, Clone, Default)]
pub struct JsonMetadataSource {
    document: MetadataDocument,
}

impl JsonMetadataSource {
    pub fn new(document: MetadataDocument) -> Self {
        Self { document }
    }

    /// Load an export from disk.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let document: MetadataDocument =
            serde_json::from_str(&content).map_err(|e| GeneratorError::MetadataInvalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self::new(document))
    }

    /// Parse an export held in memory.
    pub fn from_json(content: &str) -> Result<Self, GeneratorError> {
        let document: MetadataDocument =
            serde_json::from_str(content).map_err(|e| GeneratorError::MetadataInvalid {
                path: "<inline>".into(),
                message: e.to_string(),
            })?;
        Ok(Self::new(document))
    }

    fn entity(&self, entity_type: &str) -> Option<&EntityMetadata> {
        self.document.entities.iter().find(|e| e.class == entity_type)
    }
}

impl MetadataSource for JsonMetadataSource {
    fn describe_fields(&self, entity_type: &str) -> Result<Vec<FieldDescriptor>, GeneratorError> {
        self.entity(entity_type)
            .map(|e| e.fields.clone())
            .ok_or_else(|| GeneratorError::UnknownEntity {
                name: entity_type.to_string(),
            })
    }

    fn display_name(&self, entity_type: &str) -> Option<String> {
        self.entity(entity_type).map(|e| e.display_name().to_string())
    }

    fn interfaces(&self, entity_type: &str) -> Vec<String> {
        self.entity(entity_type)
            .map(|e| e.interfaces.clone())
            .unwrap_or_default()
    }

    fn entity_types(&self) -> Vec<String> {
        self.document.entities.iter().map(|e| e.class.clone()).collect()
    }

    fn find_entity_type(&self, name: &str) -> Option<String> {
        if let Some(entity) = self.entity(name) {
            return Some(entity.class.clone());
        }
        self.document
            .entities
            .iter()
            .find(|e| e.display_name().eq_ignore_ascii_case(name))
            .map(|e| e.class.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::BuiltinType;

    const EXPORT: &str = r#"{
        "entities": [
            {
                "class": "App\\Entity\\Invoice",
                "interfaces": ["App\\Entity\\Interface\\ScheduledEventInterface"],
                "fields": [
                    { "name": "id", "type": "string" },
                    { "name": "amount", "type": "float" },
                    { "name": "customer", "type": "object", "target": "App\\Entity\\Customer", "nullable": true }
                ]
            },
            { "class": "App\\Entity\\Customer", "name": "Client", "fields": [] }
        ]
    }"#;

    #[test]
    fn test_describe_fields_keeps_order() {
        let source = JsonMetadataSource::from_json(EXPORT).unwrap();
        let fields = source.describe_fields("App\\Entity\\Invoice").unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "amount", "customer"]);
        assert_eq!(fields[1].builtin_type, BuiltinType::Float);
        assert!(fields[2].is_relation());
    }

    #[test]
    fn test_display_name_defaults_to_short_class() {
        let source = JsonMetadataSource::from_json(EXPORT).unwrap();
        assert_eq!(source.display_name("App\\Entity\\Invoice").as_deref(), Some("Invoice"));
        assert_eq!(source.display_name("App\\Entity\\Customer").as_deref(), Some("Client"));
        assert_eq!(source.display_name("App\\Entity\\Missing"), None);
    }

    #[test]
    fn test_find_entity_type_by_short_or_full_name() {
        let source = JsonMetadataSource::from_json(EXPORT).unwrap();
        assert_eq!(source.find_entity_type("invoice").as_deref(), Some("App\\Entity\\Invoice"));
        assert_eq!(source.find_entity_type("App\\Entity\\Customer").as_deref(), Some("App\\Entity\\Customer"));
        assert_eq!(source.find_entity_type("Nope"), None);
    }

    #[test]
    fn test_unknown_entity_is_an_error() {
        let source = JsonMetadataSource::from_json(EXPORT).unwrap();
        let err = source.describe_fields("App\\Entity\\Nope").unwrap_err();
        assert!(matches!(err, GeneratorError::UnknownEntity { .. }));
    }

    #[test]
    fn test_interfaces() {
        let source = JsonMetadataSource::from_json(EXPORT).unwrap();
        assert_eq!(source.interfaces("App\\Entity\\Invoice").len(), 1);
        assert!(source.interfaces("App\\Entity\\Customer").is_empty());
    }
}

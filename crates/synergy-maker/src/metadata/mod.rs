//! Entity metadata: the field descriptors generation is driven by.
//!
//! The generator never inspects the backend entity classes itself. A
//! [`MetadataSource`] yields, per entity type, the ordered field list and the
//! display name of every managed entity, and the rest of the pipeline is a pure
//! function of that data plus the current contents of the generated file.

mod json;

pub use json::JsonMetadataSource;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;

/// Builtin type of a field as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuiltinType {
    String,
    Int,
    Float,
    Bool,
    Date,
    Object,
    Array,
    /// Anything else. Kept so that one odd field does not reject the whole
    /// metadata document; classification fails for that field only.
    Other(String),
}

impl BuiltinType {
    pub fn as_str(&self) -> &str {
        match self {
            BuiltinType::String => "string",
            BuiltinType::Int => "int",
            BuiltinType::Float => "float",
            BuiltinType::Bool => "bool",
            BuiltinType::Date => "date",
            BuiltinType::Object => "object",
            BuiltinType::Array => "array",
            BuiltinType::Other(name) => name,
        }
    }
}

impl From<String> for BuiltinType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => BuiltinType::String,
            "int" => BuiltinType::Int,
            "float" => BuiltinType::Float,
            "bool" => BuiltinType::Bool,
            "date" => BuiltinType::Date,
            "object" => BuiltinType::Object,
            "array" => BuiltinType::Array,
            _ => BuiltinType::Other(value),
        }
    }
}

impl From<BuiltinType> for String {
    fn from(value: BuiltinType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of an entity, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub builtin_type: BuiltinType,

    /// Backend class of object-typed fields (e.g. `DateTimeImmutable`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Fully-qualified type of the referenced managed entity, for relations.
    #[serde(default, rename = "target", skip_serializing_if = "Option::is_none")]
    pub relation_target_type: Option<String>,

    #[serde(default, rename = "collection")]
    pub is_collection: bool,

    #[serde(default, rename = "nullable")]
    pub is_nullable: bool,

    #[serde(default)]
    pub ignore: bool,
}

impl FieldDescriptor {
    /// Creates a non-nullable scalar field.
    pub fn scalar(name: impl Into<String>, builtin_type: BuiltinType) -> Self {
        Self {
            name: name.into(),
            builtin_type,
            class_name: None,
            relation_target_type: None,
            is_collection: false,
            is_nullable: false,
            ignore: false,
        }
    }

    /// Creates a to-one relation to `target`.
    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            name: name.into(),
            builtin_type: BuiltinType::Object,
            class_name: Some(target.clone()),
            relation_target_type: Some(target),
            is_collection: false,
            is_nullable: true,
            ignore: false,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn collection(mut self) -> Self {
        self.is_collection = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn is_relation(&self) -> bool {
        self.relation_target_type.is_some()
    }
}

/// Where entity metadata comes from.
pub trait MetadataSource {
    /// Ordered fields of `entity_type`.
    fn describe_fields(&self, entity_type: &str) -> Result<Vec<FieldDescriptor>, GeneratorError>;

    /// Short display name of a managed entity type (e.g. `Customer`).
    fn display_name(&self, entity_type: &str) -> Option<String>;

    /// Interfaces implemented by the backend class, used by listener rules.
    fn interfaces(&self, _entity_type: &str) -> Vec<String> {
        Vec::new()
    }

    /// Every managed entity type, in a stable order.
    fn entity_types(&self) -> Vec<String>;

    /// Resolves a user-supplied name (short or fully-qualified) to an entity type.
    fn find_entity_type(&self, name: &str) -> Option<String>;
}

/// Last segment of a namespaced class name: `App\Entity\Invoice` -> `Invoice`.
pub fn short_class_name(class_name: &str) -> &str {
    class_name
        .rsplit(&['\\', '.', ':', '/'][..])
        .find(|segment| !segment.is_empty())
        .unwrap_or(class_name)
}

//! Field classification: what kind of member a field turns into.

use crate::config::MergePolicy;
use crate::diagnostic::FieldError;
use crate::metadata::{BuiltinType, FieldDescriptor};

/// TypeScript type of a synthesized member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    String,
    Number,
    Boolean,
    Date,
    Object,
    /// Arrays are declared as `object` but default to `[]`.
    Array,
    /// Another generated entity class.
    Entity(String),
}

impl TsType {
    pub fn name(&self) -> &str {
        match self {
            TsType::String => "string",
            TsType::Number => "number",
            TsType::Boolean => "boolean",
            TsType::Date => "Date",
            TsType::Object | TsType::Array => "object",
            TsType::Entity(name) => name,
        }
    }
}

/// Type names that never need an import.
pub const BUILTIN_TYPE_NAMES: &[&str] = &["string", "number", "boolean", "Date", "object"];

/// Default initializer of a non-nullable member of type `ts_type`.
pub fn default_literal(ts_type: &TsType) -> Result<&'static str, FieldError> {
    match ts_type {
        TsType::String => Ok("''"),
        TsType::Number => Ok("0"),
        TsType::Boolean => Ok("true"),
        TsType::Date => Ok("new Date()"),
        TsType::Object => Ok("{}"),
        TsType::Array => Ok("[]"),
        TsType::Entity(name) => Err(FieldError::NoDefaultLiteral {
            ts_type: name.clone(),
        }),
    }
}

/// Why a field produces no member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Explicit opt-out in the metadata.
    Ignored,
    /// Identity or bookkeeping field owned by the base class.
    Reserved,
    /// To-many relations are not synthesized.
    CollectionRelation,
}

/// Outcome of classifying one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Skip(SkipReason),
    Scalar {
        name: String,
        ts_type: TsType,
        nullable: bool,
        default_literal: String,
    },
    /// A to-one relation; becomes an id property plus a lazy accessor.
    Relation {
        name: String,
        target_type: String,
    },
}

/// Classifies one field.
pub fn classify(field: &FieldDescriptor, policy: &MergePolicy) -> Result<Classification, FieldError> {
    if field.ignore {
        return Ok(Classification::Skip(SkipReason::Ignored));
    }
    if policy.is_skipped(&field.name) {
        return Ok(Classification::Skip(SkipReason::Reserved));
    }

    if let Some(target) = &field.relation_target_type {
        if field.is_collection {
            return Ok(Classification::Skip(SkipReason::CollectionRelation));
        }
        let target = target.trim();
        if target.is_empty() {
            return Err(FieldError::UnclassifiableRelation);
        }
        return Ok(Classification::Relation {
            name: field.name.clone(),
            target_type: target.to_string(),
        });
    }

    let ts_type = scalar_type(field, policy)?;
    let default = if field.is_nullable {
        "null"
    } else {
        default_literal(&ts_type)?
    };

    Ok(Classification::Scalar {
        name: field.name.clone(),
        ts_type,
        nullable: field.is_nullable,
        default_literal: default.to_string(),
    })
}

fn scalar_type(field: &FieldDescriptor, policy: &MergePolicy) -> Result<TsType, FieldError> {
    match &field.builtin_type {
        BuiltinType::String => Ok(TsType::String),
        BuiltinType::Int | BuiltinType::Float => Ok(TsType::Number),
        BuiltinType::Bool => Ok(TsType::Boolean),
        BuiltinType::Date => Ok(TsType::Date),
        BuiltinType::Array => Ok(TsType::Array),
        BuiltinType::Object => match field.class_name.as_deref() {
            Some(class) if policy.is_date_class(class) => Ok(TsType::Date),
            Some(_) => Ok(TsType::Object),
            None => Err(FieldError::ObjectWithoutClass),
        },
        BuiltinType::Other(name) => Err(FieldError::UnsupportedType {
            builtin: name.clone(),
        }),
    }
}

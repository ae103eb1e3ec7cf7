//! Generator error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort generation of one entity (or the whole run, for
/// configuration and metadata loading).
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum GeneratorError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access file '{}': {message}", path.display())]
    #[diagnostic(code(synergy::io::access_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(synergy::parse::init_failed))]
    ParserInitFailed,

    #[error("Failed to parse file: {}", path.display())]
    #[diagnostic(code(synergy::parse::parse_failed))]
    ParseFailed {
        path: PathBuf,
    },

    // =========================================================================
    // Injection Errors
    // =========================================================================
    #[error("Marker '{marker}' not found")]
    #[diagnostic(
        code(synergy::inject::marker_missing),
        help("Generated files must keep the `// --imports--`, `// ---properties---` and `// ---methods---` comment lines. Restore the missing one and run again.")
    )]
    MarkerMissing {
        marker: String,
    },

    // =========================================================================
    // Metadata Errors
    // =========================================================================
    #[error("Entity '{name}' not found in metadata")]
    #[diagnostic(
        code(synergy::metadata::unknown_entity),
        help("Use the short class name (e.g. `Invoice`) or the fully-qualified class name from the metadata export.")
    )]
    UnknownEntity {
        name: String,
    },

    #[error("No entity name found for related type '{entity_type}'")]
    #[diagnostic(
        code(synergy::metadata::unresolved_display_name),
        help("Every relation target must itself be a managed entity listed in the metadata export.")
    )]
    UnresolvedDisplayName {
        entity_type: String,
    },

    #[error("Invalid metadata in '{}': {message}", path.display())]
    #[diagnostic(code(synergy::metadata::invalid))]
    MetadataInvalid {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration in '{}': {message}", path.display())]
    #[diagnostic(code(synergy::config::invalid))]
    ConfigInvalid {
        path: PathBuf,
        message: String,
    },
}

impl GeneratorError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Recoverable, field-level failures. The field is skipped with a warning and
/// the rest of the entity is still generated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("unknown type: {builtin}")]
    UnsupportedType {
        builtin: String,
    },

    #[error("could not convert object field without a class")]
    ObjectWithoutClass,

    #[error("no default value for type {ts_type}")]
    NoDefaultLiteral {
        ts_type: String,
    },

    #[error("relation target is empty")]
    UnclassifiableRelation,
}

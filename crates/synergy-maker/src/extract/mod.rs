//! Structural extraction of generated TypeScript files.
//!
//! The extractor answers one question for the merge planner: what does the
//! file already declare? It records property declarations, accessors, the
//! import table and class headers, wherever they appear in the file, and
//! ignores everything else. Commented-out code is invisible to it, which is
//! how a developer hands a member back to the generator.

pub mod model;
pub mod parser;

use std::path::Path;

use crate::diagnostic::GeneratorError;
pub use model::{ClassHeader, ImportDecl, ImportEntry, PropertyDecl, StructuralModel, Visibility};
use parser::TypeScriptParser;

/// Reusable extractor; holds one tree-sitter parser.
pub struct Extractor {
    parser: TypeScriptParser,
}

impl Extractor {
    /// Creates a new extractor.
    pub fn new() -> Result<Self, GeneratorError> {
        Ok(Self {
            parser: TypeScriptParser::new()?,
        })
    }

    /// Extracts the structural model of `source`; `path` is only used for errors.
    pub fn extract(&mut self, source: &str, path: &Path) -> Result<StructuralModel, GeneratorError> {
        self.parser.parse(source, path)
    }
}

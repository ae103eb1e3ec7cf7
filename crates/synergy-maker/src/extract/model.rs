//! Structural model of a generated TypeScript file.

use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostic::Span;

/// What the extractor saw in the current file text.
///
/// Always recomputed from the file; never stored anywhere else.
#[derive(Debug, Default, Clone)]
pub struct StructuralModel {
    /// Visibility-qualified property declarations, first occurrence wins.
    pub properties: BTreeMap<String, PropertyDecl>,
    /// Getter names outside comments.
    pub getters: BTreeSet<String>,
    /// Setter names outside comments.
    pub setters: BTreeSet<String>,
    /// Import declarations keyed by module path.
    pub imports: BTreeMap<String, ImportDecl>,
    /// Class headers keyed by class name.
    pub classes: BTreeMap<String, ClassHeader>,
}

impl StructuralModel {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn has_getter(&self, name: &str) -> bool {
        self.getters.contains(name)
    }

    pub fn has_setter(&self, name: &str) -> bool {
        self.setters.contains(name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassHeader> {
        self.classes.get(name)
    }
}

/// Property visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// A property declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub visibility: Visibility,
    /// The whole declaration, including its `;`.
    pub span: Span,
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub path: String,
    pub entry: ImportEntry,
    /// The whole statement.
    pub span: Span,
}

/// Symbols imported from one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportEntry {
    pub default: Option<String>,
    /// Named specifiers as written (`Foo`, `Foo as Bar`).
    pub named: Vec<String>,
    /// `* as Name`
    pub namespace: Option<String>,
    /// `import type ...`
    pub type_only: bool,
}

impl ImportEntry {
    pub fn default_import(name: impl Into<String>) -> Self {
        Self {
            default: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            named: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// A class declaration header: `class Name extends Base implements A, B {`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
    pub name: String,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    /// The heritage part: from the end of the name (or its type parameters)
    /// up to and including the opening brace.
    pub span: Span,
}

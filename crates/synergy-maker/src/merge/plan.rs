//! Merge plan types.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::diagnostic::Span;
use crate::extract::ImportEntry;

/// One of the three insertion points of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Imports,
    Properties,
    Methods,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Imports, Slot::Properties, Slot::Methods];

    /// Token identifying the marker line.
    pub fn marker(&self) -> &'static str {
        match self {
            Slot::Imports => "--imports--",
            Slot::Properties => "---properties---",
            Slot::Methods => "---methods---",
        }
    }

    /// Indentation of content inserted at this slot.
    pub fn indent(&self) -> &'static str {
        match self {
            Slot::Imports => "",
            Slot::Properties | Slot::Methods => "    ",
        }
    }
}

/// A member synthesized from metadata. Carries everything needed to render it.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesizedMember {
    /// `public amount: number = 0;`
    ScalarProperty {
        name: String,
        ts_type: String,
        nullable: bool,
        default_literal: String,
    },
    /// `public customerId: string | null = null;`
    RelationIdProperty {
        name: String,
        relation: String,
    },
    /// `private _customer: Customer | null = null;`
    BackingField {
        name: String,
        target_type: String,
    },
    /// Lazily resolved getter over the backing field.
    RelationAccessor {
        name: String,
        backing_private_name: String,
        target_type: String,
        id_property: String,
    },
    /// Setter clearing the backing field so the next read resolves again.
    Setter {
        name: String,
        backing_private_name: String,
        target_type: String,
        /// Further `(property, expression)` assignments made by the setter.
        additional_resets: Vec<(String, String)>,
    },
}

impl SynthesizedMember {
    pub fn name(&self) -> &str {
        match self {
            SynthesizedMember::ScalarProperty { name, .. }
            | SynthesizedMember::RelationIdProperty { name, .. }
            | SynthesizedMember::BackingField { name, .. }
            | SynthesizedMember::RelationAccessor { name, .. }
            | SynthesizedMember::Setter { name, .. } => name,
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            SynthesizedMember::ScalarProperty { .. }
            | SynthesizedMember::RelationIdProperty { .. }
            | SynthesizedMember::BackingField { .. } => Slot::Properties,
            SynthesizedMember::RelationAccessor { .. } | SynthesizedMember::Setter { .. } => Slot::Methods,
        }
    }

    /// Short description for reports: `property amount`, `getter customer`.
    pub fn describe(&self) -> String {
        let kind = match self {
            SynthesizedMember::ScalarProperty { .. } | SynthesizedMember::RelationIdProperty { .. } => "property",
            SynthesizedMember::BackingField { .. } => "backing field",
            SynthesizedMember::RelationAccessor { .. } => "getter",
            SynthesizedMember::Setter { .. } => "setter",
        };
        format!("{} {}", kind, self.name())
    }
}

/// Where synthesized text goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Inserted right above the marker of the content's slot.
    Slot,
    /// Replaces an existing declaration in place.
    Replace(Span),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMember {
    pub member: SynthesizedMember,
    pub placement: Placement,
}

/// Reconciled class header replacing the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRewrite {
    pub class_name: String,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    /// Heritage part of the current header; the name is never rewritten.
    pub span: Span,
}

/// Symbols that must be importable from a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequirement {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub named: Vec<String>,
}

impl ImportRequirement {
    pub fn new(path: impl Into<String>, default: Option<&str>, named: &[&str]) -> Self {
        Self {
            path: path.into(),
            default: default.map(String::from),
            named: named.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// An import line to write: a new one at the imports slot, or a rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportChange {
    pub path: String,
    pub entry: ImportEntry,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Non-fatal observation made while planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDiagnostic {
    pub level: DiagnosticLevel,
    pub field: Option<String>,
    pub message: String,
}

impl PlanDiagnostic {
    pub fn new(level: DiagnosticLevel, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level,
            field: field.map(String::from),
            message: message.into(),
        }
    }
}

/// Everything one generation pass will change in a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergePlan {
    pub members: Vec<PlannedMember>,
    pub header: Option<HeaderRewrite>,
    pub imports: Vec<ImportChange>,
    pub diagnostics: Vec<PlanDiagnostic>,
}

impl MergePlan {
    /// True when applying the plan would not change the file.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.header.is_none() && self.imports.is_empty()
    }

    /// Slots whose marker must be present for the plan to apply.
    pub fn required_slots(&self) -> BTreeSet<Slot> {
        let mut slots: BTreeSet<Slot> = self
            .members
            .iter()
            .filter(|m| m.placement == Placement::Slot)
            .map(|m| m.member.slot())
            .collect();
        if self.imports.iter().any(|i| i.placement == Placement::Slot) {
            slots.insert(Slot::Imports);
        }
        slots
    }

    /// Diagnostics at or above `level`.
    pub fn diagnostics_at(&self, level: DiagnosticLevel) -> impl Iterator<Item = &PlanDiagnostic> {
        self.diagnostics.iter().filter(move |d| d.level >= level)
    }

    pub fn member(&self, name: &str) -> Option<&PlannedMember> {
        self.members.iter().find(|m| m.member.name() == name)
    }
}

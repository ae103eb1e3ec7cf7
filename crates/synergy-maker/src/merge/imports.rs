//! Import reconciliation keyed by module path.

use std::collections::BTreeMap;

use crate::extract::{ImportDecl, ImportEntry};
use super::plan::{DiagnosticLevel, ImportChange, ImportRequirement, Placement, PlanDiagnostic};

/// Requirements accumulated for one file, merged by path.
#[derive(Debug, Default)]
pub struct ImportTable {
    order: Vec<String>,
    required: BTreeMap<String, ImportEntry>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a requirement. A later default for the same path wins; named
    /// specifiers accumulate.
    pub fn require(&mut self, requirement: &ImportRequirement) {
        let path = requirement.path.trim();
        if path.is_empty() {
            return;
        }
        if !self.required.contains_key(path) {
            self.order.push(path.to_string());
        }
        let entry = self.required.entry(path.to_string()).or_default();
        if let Some(default) = requirement.default.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            entry.default = Some(default.to_string());
        }
        union_named(&mut entry.named, &requirement.named);
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Diffs the requirements against the imports already present.
    pub fn reconcile(
        &self,
        existing: &BTreeMap<String, ImportDecl>,
        diagnostics: &mut Vec<PlanDiagnostic>,
    ) -> Vec<ImportChange> {
        let mut changes = Vec::new();

        for path in &self.order {
            let Some(wanted) = self.required.get(path) else {
                continue;
            };

            let Some(decl) = existing.get(path) else {
                changes.push(ImportChange {
                    path: path.clone(),
                    entry: wanted.clone(),
                    placement: Placement::Slot,
                });
                continue;
            };

            let mut merged = decl.entry.clone();
            if wanted.default.is_some() {
                merged.default = wanted.default.clone();
            }
            union_named(&mut merged.named, &wanted.named);

            if merged == decl.entry {
                continue;
            }
            if decl.entry.namespace.is_some() && merged.named != decl.entry.named {
                // `* as X` cannot be combined with `{ ... }` in one statement.
                diagnostics.push(PlanDiagnostic::new(
                    DiagnosticLevel::Warning,
                    None,
                    format!("cannot add named imports to namespace import of '{}'", path),
                ));
                continue;
            }

            changes.push(ImportChange {
                path: path.clone(),
                entry: merged,
                placement: Placement::Replace(decl.span),
            });
        }

        changes
    }
}

fn union_named(into: &mut Vec<String>, names: &[String]) {
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !into.iter().any(|n| n == name) {
            into.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Span;

    fn existing(path: &str, entry: ImportEntry) -> BTreeMap<String, ImportDecl> {
        let mut map = BTreeMap::new();
        map.insert(
            path.to_string(),
            ImportDecl {
                path: path.to_string(),
                entry,
                span: Span::new(0, 30, 0),
            },
        );
        map
    }

    #[test]
    fn test_new_paths_go_to_slot_in_order() {
        let mut table = ImportTable::new();
        table.require(&ImportRequirement::new("./Customer", Some("Customer"), &[]));
        table.require(&ImportRequirement::new("./Address", Some("Address"), &[]));

        let mut diagnostics = Vec::new();
        let changes = table.reconcile(&BTreeMap::new(), &mut diagnostics);
        let paths: Vec<_> = changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["./Customer", "./Address"]);
        assert!(changes.iter().all(|c| c.placement == Placement::Slot));
    }

    #[test]
    fn test_requirements_merge_by_path() {
        let mut table = ImportTable::new();
        table.require(&ImportRequirement::new("@synergy/runtime", None, &["A", "B"]));
        table.require(&ImportRequirement::new("@synergy/runtime", Some("Runtime"), &["B", " C "]));

        let changes = table.reconcile(&BTreeMap::new(), &mut Vec::new());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].entry.default.as_deref(), Some("Runtime"));
        assert_eq!(changes[0].entry.named, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_satisfied_import_is_untouched() {
        let mut table = ImportTable::new();
        table.require(&ImportRequirement::new("./Customer", Some("Customer"), &[]));

        let changes = table.reconcile(&existing("./Customer", ImportEntry::default_import("Customer")), &mut Vec::new());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_existing_import_is_extended_in_place() {
        let mut table = ImportTable::new();
        table.require(&ImportRequirement::new("../mixins", None, &["Schedulable"]));

        let current = existing("../mixins", ImportEntry::named(["Auditable"]));
        let changes = table.reconcile(&current, &mut Vec::new());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].entry.named, vec!["Auditable", "Schedulable"]);
        assert_eq!(changes[0].placement, Placement::Replace(Span::new(0, 30, 0)));
    }

    #[test]
    fn test_namespace_import_is_not_extended() {
        let mut table = ImportTable::new();
        table.require(&ImportRequirement::new("../mixins", None, &["Schedulable"]));

        let current = existing(
            "../mixins",
            ImportEntry {
                namespace: Some("Mixins".to_string()),
                ..ImportEntry::default()
            },
        );
        let mut diagnostics = Vec::new();
        let changes = table.reconcile(&current, &mut diagnostics);
        assert!(changes.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, DiagnosticLevel::Warning);
    }
}

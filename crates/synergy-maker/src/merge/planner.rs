//! Merge planning: decides what to add given what the file already has.
//!
//! Textual presence wins. Anything the file declares, whoever wrote it, is
//! left alone; only missing members are synthesized. The planner never looks
//! at the file text itself, only at the [`StructuralModel`] extracted from it,
//! which keeps it a pure function of (model, fields, proposals).

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::MergePolicy;
use crate::extract::StructuralModel;
use crate::listener::Proposals;
use crate::metadata::{short_class_name, FieldDescriptor};

use super::classify::{classify, Classification, SkipReason, BUILTIN_TYPE_NAMES};
use super::header::reconcile;
use super::imports::ImportTable;
use super::plan::*;

/// Input of one planning pass.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    /// Name of the class the file declares.
    pub short_name: &'a str,
    /// Fields in metadata order.
    pub fields: &'a [FieldDescriptor],
    /// Display names of relation targets, keyed by target entity type.
    pub display_names: &'a BTreeMap<String, String>,
    pub proposals: &'a Proposals,
}

pub struct MergePlanner<'p> {
    policy: &'p MergePolicy,
}

impl<'p> MergePlanner<'p> {
    pub fn new(policy: &'p MergePolicy) -> Self {
        Self { policy }
    }

    pub fn plan(&self, model: &StructuralModel, request: &PlanRequest<'_>) -> MergePlan {
        let mut builder = PlanBuilder {
            model,
            request,
            plan: MergePlan::default(),
            planned: BTreeSet::new(),
            imports: ImportTable::new(),
        };

        for requirement in &request.proposals.imports {
            builder.imports.require(requirement);
        }

        builder.plan_header(self.policy);

        for field in request.fields {
            match classify(field, self.policy) {
                Ok(classification) => builder.plan_field(field, classification),
                Err(e) => builder.diagnostic(
                    DiagnosticLevel::Warning,
                    Some(&field.name),
                    format!("field skipped: {}", e),
                ),
            }
        }

        let imports = builder.imports.reconcile(&model.imports, &mut builder.plan.diagnostics);
        builder.plan.imports = imports;
        builder.plan
    }
}

struct PlanBuilder<'a, 'r> {
    model: &'a StructuralModel,
    request: &'a PlanRequest<'r>,
    plan: MergePlan,
    /// Names of properties and getters planned so far in this pass.
    planned: BTreeSet<String>,
    imports: ImportTable,
}

impl PlanBuilder<'_, '_> {
    fn diagnostic(&mut self, level: DiagnosticLevel, field: Option<&str>, message: impl Into<String>) {
        self.plan.diagnostics.push(PlanDiagnostic::new(level, field, message));
    }

    fn exists(&self, name: &str) -> bool {
        self.model.has_property(name) || self.model.has_getter(name) || self.planned.contains(name)
    }

    fn push(&mut self, member: SynthesizedMember, placement: Placement) {
        if !matches!(member, SynthesizedMember::Setter { .. }) {
            self.planned.insert(member.name().to_string());
        }
        self.plan.members.push(PlannedMember { member, placement });
    }

    fn plan_header(&mut self, policy: &MergePolicy) {
        let model = self.model;
        let short_name = self.request.short_name;
        let Some(current) = model.class(short_name) else {
            self.diagnostic(
                DiagnosticLevel::Warning,
                None,
                format!("class {} not found, header left unchanged", short_name),
            );
            return;
        };

        let proposals = self.request.proposals;
        let decision = reconcile(current, proposals.extends.as_deref(), &proposals.implements, policy);

        if let Some((already, desired)) = &decision.rejected {
            self.diagnostic(
                DiagnosticLevel::Error,
                None,
                format!("cannot change extends from {} to {}", already, desired),
            );
        }

        if decision.changes(current) {
            self.plan.header = Some(HeaderRewrite {
                class_name: current.name.clone(),
                extends: decision.extends,
                implements: decision.implements,
                span: current.span,
            });
        }
    }

    fn plan_field(&mut self, field: &FieldDescriptor, classification: Classification) {
        match classification {
            Classification::Skip(reason) => {
                let (level, message) = match reason {
                    SkipReason::Ignored => (DiagnosticLevel::Debug, "ignored"),
                    SkipReason::Reserved => (DiagnosticLevel::Debug, "reserved field"),
                    SkipReason::CollectionRelation => {
                        (DiagnosticLevel::Warning, "collection relations are not generated")
                    }
                };
                self.diagnostic(level, Some(&field.name), message);
            }
            Classification::Scalar {
                name,
                ts_type,
                nullable,
                default_literal,
            } => {
                if self.exists(&name) {
                    debug!("already exists : {}", name);
                    return;
                }
                self.push(
                    SynthesizedMember::ScalarProperty {
                        name,
                        ts_type: ts_type.name().to_string(),
                        nullable,
                        default_literal,
                    },
                    Placement::Slot,
                );
            }
            Classification::Relation { name, target_type } => self.plan_relation(name, &target_type),
        }
    }

    /// The getter stands for the whole pair: if it (or a property of the same
    /// name) exists, nothing is generated. Otherwise every half is produced,
    /// rewriting halves that survive from an earlier run in place.
    fn plan_relation(&mut self, name: String, target_type: &str) {
        if self.exists(&name) {
            debug!("already exists : {}", name);
            return;
        }

        let display = self
            .request
            .display_names
            .get(target_type)
            .cloned()
            .unwrap_or_else(|| short_class_name(target_type).to_string());
        let id_property = format!("{}Id", name);
        let backing = format!("_{}", name);

        if !self.planned.contains(&id_property) {
            let placement = self.placement_of(&name, &id_property);
            self.push(
                SynthesizedMember::RelationIdProperty {
                    name: id_property.clone(),
                    relation: name.clone(),
                },
                placement,
            );
        }
        if !self.planned.contains(&backing) {
            let placement = self.placement_of(&name, &backing);
            self.push(
                SynthesizedMember::BackingField {
                    name: backing.clone(),
                    target_type: display.clone(),
                },
                placement,
            );
        }

        self.push(
            SynthesizedMember::RelationAccessor {
                name: name.clone(),
                backing_private_name: backing.clone(),
                target_type: display.clone(),
                id_property: id_property.clone(),
            },
            Placement::Slot,
        );

        if self.model.has_setter(&name) {
            debug!("setter already exists : {}", name);
        } else {
            self.push(
                SynthesizedMember::Setter {
                    name: name.clone(),
                    backing_private_name: backing,
                    target_type: display.clone(),
                    additional_resets: vec![(id_property, "value?.id ?? null".to_string())],
                },
                Placement::Slot,
            );
        }

        if display != self.request.short_name && !BUILTIN_TYPE_NAMES.contains(&display.as_str()) {
            self.imports
                .require(&ImportRequirement::new(format!("./{}", display), Some(&display), &[]));
        }
    }

    fn placement_of(&mut self, relation: &str, property: &str) -> Placement {
        match self.model.properties.get(property).map(|decl| decl.span) {
            Some(span) => {
                self.diagnostic(
                    DiagnosticLevel::Info,
                    Some(relation),
                    format!("rewriting {} in place", property),
                );
                Placement::Replace(span)
            }
            None => Placement::Slot,
        }
    }
}

//! Hook letting external code shape the header and imports of an entity.
//!
//! Listeners are asked once per entity, before planning, and all write into
//! the same [`Proposals`]. The planner only ever sees the final proposal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::merge::ImportRequirement;
use crate::metadata::{short_class_name, FieldDescriptor};

/// What a listener knows about the entity being generated.
#[derive(Debug, Clone)]
pub struct EntityContext<'a> {
    pub class_name: &'a str,
    pub short_name: &'a str,
    /// Interfaces the source entity implements, as reported by the metadata.
    pub interfaces: &'a [String],
    pub fields: &'a [FieldDescriptor],
}

impl EntityContext<'_> {
    /// Matches either the fully qualified or the short interface name.
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces
            .iter()
            .any(|i| i == interface || short_class_name(i) == interface)
    }
}

/// Desired header values and extra imports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Proposals {
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub imports: Vec<ImportRequirement>,
}

impl Proposals {
    pub fn set_extends(&mut self, extends: impl Into<String>) {
        self.extends = Some(extends.into());
    }

    pub fn add_implements(&mut self, interface: impl Into<String>) {
        let interface = interface.into();
        if !self.implements.contains(&interface) {
            self.implements.push(interface);
        }
    }

    pub fn add_import(&mut self, requirement: ImportRequirement) {
        self.imports.push(requirement);
    }

    pub fn is_empty(&self) -> bool {
        self.extends.is_none() && self.implements.is_empty() && self.imports.is_empty()
    }
}

pub trait GenerationListener {
    fn collect_proposals(&self, ctx: &EntityContext<'_>, proposals: &mut Proposals);
}

/// A configured rule. Every selector that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListenerRule {
    /// Entity short or fully qualified names; empty means any entity.
    pub entities: Vec<String>,
    /// Interface the source entity must implement.
    pub when_implements: Option<String>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub imports: Vec<ImportRequirement>,
}

impl ListenerRule {
    pub fn matches(&self, ctx: &EntityContext<'_>) -> bool {
        let entity_matches = self.entities.is_empty()
            || self
                .entities
                .iter()
                .any(|e| e == ctx.class_name || e.eq_ignore_ascii_case(ctx.short_name));
        let interface_matches = self
            .when_implements
            .as_deref()
            .map_or(true, |i| ctx.implements(i));
        entity_matches && interface_matches
    }
}

/// Listener driven by [`ListenerRule`]s from the configuration.
#[derive(Debug, Clone, Default)]
pub struct RuleListener {
    rules: Vec<ListenerRule>,
}

impl RuleListener {
    pub fn new(rules: Vec<ListenerRule>) -> Self {
        Self { rules }
    }
}

impl GenerationListener for RuleListener {
    fn collect_proposals(&self, ctx: &EntityContext<'_>, proposals: &mut Proposals) {
        for rule in self.rules.iter().filter(|r| r.matches(ctx)) {
            debug!("rule applies to {}", ctx.short_name);
            if let Some(extends) = &rule.extends {
                proposals.set_extends(extends.clone());
            }
            for interface in &rule.implements {
                proposals.add_implements(interface.clone());
            }
            for import in &rule.imports {
                proposals.add_import(import.clone());
            }
        }
    }
}

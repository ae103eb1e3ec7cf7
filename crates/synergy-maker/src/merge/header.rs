//! Class header reconciliation.

use tracing::debug;

use crate::config::MergePolicy;
use crate::extract::ClassHeader;

/// Result of reconciling the declared header with the desired one.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDecision {
    pub extends: Option<String>,
    pub implements: Vec<String>,
    /// `(current, desired)` when an `extends` change was refused.
    pub rejected: Option<(String, String)>,
}

impl HeaderDecision {
    /// Whether the decided header differs from what `current` declares.
    pub fn changes(&self, current: &ClassHeader) -> bool {
        self.extends != current.extends || self.implements != current.implements
    }
}

/// Reconciles `extends` through the migration allow-list and unions
/// `implements`. Interfaces are never removed.
pub fn reconcile(
    current: &ClassHeader,
    desired_extends: Option<&str>,
    desired_implements: &[String],
    policy: &MergePolicy,
) -> HeaderDecision {
    let already = current
        .extends
        .clone()
        .or_else(|| Some(policy.default_base.clone()).filter(|b| !b.is_empty()));

    let mut extends = desired_extends.map(String::from).or_else(|| already.clone());
    let mut rejected = None;

    if let Some(already) = &already {
        if extends.as_deref() != Some(already.as_str()) {
            let desired = extends.clone().unwrap_or_default();
            if policy.allows_migration(already, &desired) {
                debug!("overwriting extends : {}", desired);
            } else {
                rejected = Some((already.clone(), desired));
                extends = Some(already.clone());
            }
        }
    }

    let mut implements = current.implements.clone();
    for interface in desired_implements {
        let interface = interface.trim();
        if !interface.is_empty() && !implements.iter().any(|i| i == interface) {
            implements.push(interface.to_string());
        }
    }

    HeaderDecision {
        extends,
        implements,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Span;

    fn header(extends: Option<&str>, implements: &[&str]) -> ClassHeader {
        ClassHeader {
            name: "Invoice".to_string(),
            extends: extends.map(String::from),
            implements: implements.iter().map(|s| s.to_string()).collect(),
            span: Span::new(0, 10, 0),
        }
    }

    #[test]
    fn test_keeps_current_without_proposal() {
        let current = header(Some("Entity"), &[]);
        let decision = reconcile(&current, None, &[], &MergePolicy::default());
        assert_eq!(decision.extends.as_deref(), Some("Entity"));
        assert!(decision.rejected.is_none());
        assert!(!decision.changes(&current));
    }

    #[test]
    fn test_allowed_migration() {
        let current = header(Some("Entity"), &[]);
        let decision = reconcile(&current, Some("ScheduledEventEntity"), &[], &MergePolicy::default());
        assert_eq!(decision.extends.as_deref(), Some("ScheduledEventEntity"));
        assert!(decision.changes(&current));
    }

    #[test]
    fn test_rejected_migration_keeps_current() {
        let current = header(Some("ScheduledEventEntity"), &[]);
        let decision = reconcile(&current, Some("SimulationEntity"), &[], &MergePolicy::default());
        assert_eq!(decision.extends.as_deref(), Some("ScheduledEventEntity"));
        assert_eq!(
            decision.rejected,
            Some(("ScheduledEventEntity".to_string(), "SimulationEntity".to_string()))
        );
        assert!(!decision.changes(&current));
    }

    #[test]
    fn test_implicit_default_base() {
        let current = header(None, &[]);
        let decision = reconcile(&current, None, &[], &MergePolicy::default());
        assert_eq!(decision.extends.as_deref(), Some("Entity"));
        assert!(decision.changes(&current));

        let decision = reconcile(&current, Some("TimeEventEntity"), &[], &MergePolicy::default());
        assert_eq!(decision.extends.as_deref(), Some("TimeEventEntity"));
    }

    #[test]
    fn test_implements_is_a_union() {
        let current = header(Some("Entity"), &["Printable"]);
        let desired = vec!["Auditable".to_string(), "Printable".to_string(), " ".to_string()];
        let decision = reconcile(&current, None, &desired, &MergePolicy::default());
        assert_eq!(decision.implements, vec!["Printable".to_string(), "Auditable".to_string()]);
    }
}

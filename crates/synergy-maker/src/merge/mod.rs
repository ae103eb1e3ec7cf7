//! Merge planning.
//!
//! Turns the field descriptors of an entity, the structural model of its
//! current file and the listener proposals into a [`MergePlan`]: the members,
//! imports and header changes that the injector will apply.

pub mod classify;
pub mod header;
pub mod imports;
pub mod plan;
pub mod planner;

pub use classify::{classify, Classification, SkipReason, TsType};
pub use plan::{
    DiagnosticLevel, HeaderRewrite, ImportChange, ImportRequirement, MergePlan, Placement, PlanDiagnostic,
    PlannedMember, Slot, SynthesizedMember,
};
pub use planner::{MergePlanner, PlanRequest};

//! TypeScript text generation.
//!
//! - `members`: text of synthesized members, import lines and class headers
//! - `inject`: applies a [`MergePlan`](crate::merge::MergePlan) to file text
//! - `scaffold`: first version of a file that does not exist yet
//!
//! Nothing here decides *what* to write; that is the planner's job.

pub mod inject;
pub mod members;
pub mod naming;
pub mod scaffold;

pub use inject::{inject, TextBuffer};
pub use scaffold::{DefaultScaffold, ScaffoldContext, ScaffoldTemplate};

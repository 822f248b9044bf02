//! Approval registry for the human-in-the-loop execution gate (spec.md §4.8).

#![forbid(unsafe_code)]

mod registry;

pub use registry::{ApprovalRegistry, ApprovalStatus};

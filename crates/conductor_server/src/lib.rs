//! Axum HTTP front-end for the orchestrator (spec.md §6).
//!
//! Thin request/response plumbing only: every handler delegates straight to
//! `conductor_engine`, which owns all orchestration semantics.

mod api;

pub use api::{create_router, AppState};

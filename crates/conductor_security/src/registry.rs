//! Approval registry: tracks which `approval_requested` log ids are
//! outstanding and enforces `perform`'s idempotency rule (spec.md §4.8,
//! §7 "Reference error").

use conductor_error::{SecurityError, SecurityErrorKind, SecurityResult};
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Lifecycle of one registered approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    /// Registered, not yet consumed by `perform`.
    Requested,
    /// Consumed by a prior `perform` call; the referenced task is running.
    Consumed,
}

/// Tracks outstanding `approval_requested` logs by id, keyed to the task and
/// skills they authorize.
///
/// `conductor_engine` registers an entry when it writes an
/// `approval_requested` log, and consumes it when `perform` is called with
/// the matching log id. A second `perform` call for the same id is rejected
/// rather than re-executing the skill (spec.md's idempotency rule).
#[derive(Debug, Default)]
pub struct ApprovalRegistry {
    entries: HashMap<Uuid, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    task_id: Uuid,
    status: ApprovalStatus,
}

impl ApprovalRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created `approval_requested` log as awaiting `perform`.
    #[instrument(skip(self))]
    pub fn register(&mut self, log_id: Uuid, task_id: Uuid) {
        debug!(%log_id, %task_id, "registering approval");
        self.entries.insert(
            log_id,
            Entry {
                task_id,
                status: ApprovalStatus::Requested,
            },
        );
    }

    /// Consume an approval: the first `perform` call for a log id succeeds
    /// and returns the task id to execute; every subsequent call for the
    /// same id fails with `AlreadyProcessed`.
    #[instrument(skip(self))]
    pub fn consume(&mut self, log_id: Uuid) -> SecurityResult<Uuid> {
        let entry = self
            .entries
            .get_mut(&log_id)
            .ok_or_else(|| SecurityError::new(SecurityErrorKind::UnknownLog(log_id.to_string())))?;

        match entry.status {
            ApprovalStatus::Requested => {
                entry.status = ApprovalStatus::Consumed;
                debug!(%log_id, task_id = %entry.task_id, "approval consumed");
                Ok(entry.task_id)
            }
            ApprovalStatus::Consumed => {
                debug!(%log_id, "approval already processed");
                Err(SecurityError::new(SecurityErrorKind::AlreadyProcessed(log_id.to_string())))
            }
        }
    }

    /// Current status of a registered log id, if known.
    pub fn status(&self, log_id: Uuid) -> Option<ApprovalStatus> {
        self.entries.get(&log_id).map(|e| e.status)
    }
}

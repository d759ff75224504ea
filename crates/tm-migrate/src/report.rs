//! Outcomes returned by runner operations.

use crate::ledger::LedgerRecord;
use serde::Serialize;
use tm_core::ChangeSetId;

/// Change-sets applied by one `run`, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub applied: Vec<ChangeSetId>,
}

impl RunReport {
    /// Number of change-sets applied.
    pub fn count(&self) -> usize {
        self.applied.len()
    }

    /// True when nothing was pending.
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Drift between the change-set store and the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub applied_count: usize,
    pub pending_count: usize,
    /// Ledger records ordered by `applied_at`.
    pub applied: Vec<LedgerRecord>,
    /// Unapplied change-sets ordered by identifier.
    pub pending: Vec<ChangeSetId>,
    /// Ledger identifiers whose forward script is no longer in the store.
    pub orphaned: Vec<ChangeSetId>,
}

impl StatusReport {
    pub(crate) fn new(
        applied: Vec<LedgerRecord>,
        pending: Vec<ChangeSetId>,
        orphaned: Vec<ChangeSetId>,
    ) -> Self {
        Self {
            applied_count: applied.len(),
            pending_count: pending.len(),
            applied,
            pending,
            orphaned,
        }
    }

    /// Applied identifiers in ledger order.
    pub fn applied_identifiers(&self) -> Vec<&ChangeSetId> {
        self.applied.iter().map(|r| &r.identifier).collect()
    }

    /// True when every stored change-set has been applied.
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Result of `rollback_last`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// The ledger was empty.
    NothingToRollBack,
    /// The named change-set was reverted and its record removed.
    RolledBack(ChangeSetId),
}

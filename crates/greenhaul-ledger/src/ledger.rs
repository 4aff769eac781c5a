//! The score ledger: monotonic delivery counters and the completion flag.
//!
//! Counters only ever grow. Every [`record`](ScoreLedger::record) computes
//! the new totals with checked arithmetic before writing any of them, so a
//! failed record leaves the ledger untouched. The completion flag is sticky:
//! once the policy is met it stays set for the rest of the session.

use serde::{Deserialize, Serialize};

use greenhaul_types::Settlement;

use crate::LedgerError;
use crate::completion::CompletionPolicy;

/// Accumulated delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Orders settled.
    pub orders_completed: u32,
    /// Units delivered across all settlements.
    pub items_delivered: u64,
    /// Points earned across all settlements.
    pub total_score: u64,
}

/// Snapshot of progress toward completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStatus {
    /// Whether the policy has been met at any point.
    pub completed: bool,
    /// Counters at the time of the snapshot.
    pub totals: LedgerTotals,
    /// The thresholds being evaluated.
    pub policy: CompletionPolicy,
}

/// Accumulates settlements and tracks completion.
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    policy: CompletionPolicy,
    totals: LedgerTotals,
    completed: bool,
}

impl ScoreLedger {
    /// Create an empty ledger evaluated against `policy`.
    pub const fn new(policy: CompletionPolicy) -> Self {
        Self {
            policy,
            totals: LedgerTotals {
                orders_completed: 0,
                items_delivered: 0,
                total_score: 0,
            },
            completed: false,
        }
    }

    /// Add one settlement to the counters and re-evaluate completion.
    ///
    /// Returns `true` if this record is the one that completed the session.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if a counter would overflow. The
    /// ledger is unchanged in that case.
    pub fn record(&mut self, settlement: &Settlement) -> Result<bool, LedgerError> {
        let orders_completed = self
            .totals
            .orders_completed
            .checked_add(1)
            .ok_or(LedgerError::Overflow("orders completed"))?;
        let items_delivered = self
            .totals
            .items_delivered
            .checked_add(u64::from(settlement.total_deliverable))
            .ok_or(LedgerError::Overflow("items delivered"))?;
        let total_score = self
            .totals
            .total_score
            .checked_add(settlement.score)
            .ok_or(LedgerError::Overflow("total score"))?;

        self.totals = LedgerTotals {
            orders_completed,
            items_delivered,
            total_score,
        };
        Ok(self.evaluate())
    }

    /// Re-evaluate the completion policy.
    ///
    /// Returns `true` only on the call that first sets the flag.
    pub const fn evaluate(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = self.policy.is_met(&self.totals);
        self.completed
    }

    /// Whether the session has been completed.
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Current counters.
    pub const fn totals(&self) -> LedgerTotals {
        self.totals
    }

    /// The completion thresholds.
    pub const fn policy(&self) -> &CompletionPolicy {
        &self.policy
    }

    /// Snapshot of completion progress.
    pub const fn completion_status(&self) -> CompletionStatus {
        CompletionStatus {
            completed: self.completed,
            totals: self.totals,
            policy: self.policy,
        }
    }
}

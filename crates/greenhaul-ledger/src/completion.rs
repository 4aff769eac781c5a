//! The map completion policy.
//!
//! A policy holds up to three thresholds. A threshold of zero is disabled;
//! the policy is met as soon as any enabled threshold is reached. A policy
//! with every threshold disabled is never met.

use serde::{Deserialize, Serialize};

use crate::ledger::LedgerTotals;

/// OR-combined completion thresholds. Mirrors the `completion` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPolicy {
    /// Completed orders needed. Zero disables the threshold.
    #[serde(default = "default_orders_required")]
    pub orders_required: u32,

    /// Delivered units needed. Zero disables the threshold.
    #[serde(default)]
    pub items_required: u64,

    /// Total score needed. Zero disables the threshold.
    #[serde(default)]
    pub score_required: u64,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            orders_required: default_orders_required(),
            items_required: 0,
            score_required: 0,
        }
    }
}

impl CompletionPolicy {
    /// Whether any enabled threshold is reached by `totals`.
    pub const fn is_met(&self, totals: &LedgerTotals) -> bool {
        (self.orders_required > 0 && totals.orders_completed >= self.orders_required)
            || (self.items_required > 0 && totals.items_delivered >= self.items_required)
            || (self.score_required > 0 && totals.total_score >= self.score_required)
    }

    /// Whether at least one threshold is enabled.
    pub const fn has_requirements(&self) -> bool {
        self.orders_required > 0 || self.items_required > 0 || self.score_required > 0
    }
}

const fn default_orders_required() -> u32 {
    10
}

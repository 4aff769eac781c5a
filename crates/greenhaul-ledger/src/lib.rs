//! Delivery settlement and scoring for the Greenhaul simulation.
//!
//! Delivering an order is a two-step affair. First the [`fulfillment`]
//! computation compares the order with what the player carries and produces
//! a [`Settlement`]: how much of each item can be handed over, whether the
//! order is fully satisfied, and how many points it earns. Then the caller
//! applies the settlement: the carried items are decremented, the scheduler
//! completes the order, and the [`ScoreLedger`] accumulates the counters.
//!
//! # Modules
//!
//! - [`fulfillment`] -- [`settle`] and [`apply_settlement`], pure
//!   settlement arithmetic, and [`ScoringRules`].
//! - [`completion`] -- [`CompletionPolicy`], the OR-combined win condition.
//! - [`ledger`] -- [`ScoreLedger`], monotonic counters and the sticky
//!   completion flag.
//! - [`history`] -- Per-order scores, per-map summaries and the
//!   multi-map [`Campaign`].
//!
//! # Scoring
//!
//! ```text
//! score = total_deliverable * points_per_item + (is_full ? full_order_bonus : 0)
//! ```
//!
//! [`Settlement`]: greenhaul_types::Settlement
//! [`settle`]: fulfillment::settle
//! [`apply_settlement`]: fulfillment::apply_settlement
//! [`ScoringRules`]: fulfillment::ScoringRules
//! [`CompletionPolicy`]: completion::CompletionPolicy
//! [`ScoreLedger`]: ledger::ScoreLedger
//! [`Campaign`]: history::Campaign

pub mod completion;
pub mod fulfillment;
pub mod history;
pub mod ledger;

// Re-export primary types at crate root.
pub use completion::CompletionPolicy;
pub use fulfillment::{ScoringRules, apply_settlement, settle};
pub use history::{Campaign, DeliveredItem, ItemTotal, OrderScore, SessionSummary};
pub use ledger::{CompletionStatus, LedgerTotals, ScoreLedger};

use greenhaul_types::ItemId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when settling deliveries or accumulating scores.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A counter or sum would exceed its integer range.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// Applying a settlement would take more of an item than is carried.
    #[error("cannot remove {required} x {item_id}: only {carried} carried")]
    InsufficientCarried {
        /// The item that is short.
        item_id: ItemId,
        /// Units carried.
        carried: u32,
        /// Units the settlement removes.
        required: u32,
    },
}

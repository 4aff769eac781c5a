//! Core data structs: plant requests, order records and settlements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::OrderState;
use crate::ids::{ItemId, LocationKey, OrderId};

// ---------------------------------------------------------------------------
// PlantRequest
// ---------------------------------------------------------------------------

/// One line of an order: a quantity of a single plant item.
///
/// Immutable once the order catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRequest {
    /// The requested item.
    pub item_id: ItemId,
    /// Display names keyed by locale code (`"fi"`, `"en"`, ...).
    pub names: BTreeMap<String, String>,
    /// Requested quantity. Always at least 1.
    pub requested_amount: u32,
}

impl PlantRequest {
    /// Create a request without display names.
    pub fn new(item_id: impl Into<ItemId>, requested_amount: u32) -> Self {
        Self {
            item_id: item_id.into(),
            names: BTreeMap::new(),
            requested_amount,
        }
    }

    /// Return the display name for `locale`, if the catalog supplied one.
    pub fn name(&self, locale: &str) -> Option<&str> {
        self.names.get(locale).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// OrderRecord
// ---------------------------------------------------------------------------

/// A single customer order and its lifecycle timer.
///
/// The scheduler owns exactly one record per logical order and moves it by
/// value between its state collections. `countdown` is `Some` only while the
/// order is [`Incoming`](OrderState::Incoming) (time until it becomes
/// visible) or [`Visible`](OrderState::Visible) (time left to accept).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Catalog-unique order identifier.
    pub order_id: OrderId,
    /// Customer location the order is delivered to.
    pub location: LocationKey,
    /// Optional customer contact address from the location directory.
    pub customer_email: Option<String>,
    /// Requested plants. Never empty.
    pub requests: Vec<PlantRequest>,
    /// Current lifecycle state.
    pub state: OrderState,
    /// Maximum visibility delay in seconds. The rolled delay falls in
    /// `[base_delay / 2, base_delay]`.
    pub base_delay: f64,
    /// Remaining seconds on the active timer, if any.
    pub countdown: Option<f64>,
}

impl OrderRecord {
    /// Create a fresh, [`Available`](OrderState::Available) order.
    pub fn new(
        order_id: impl Into<OrderId>,
        location: impl Into<LocationKey>,
        requests: Vec<PlantRequest>,
        base_delay: f64,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            location: location.into(),
            customer_email: None,
            requests,
            state: OrderState::Available,
            base_delay,
            countdown: None,
        }
    }

    /// Total requested quantity per item.
    ///
    /// Lines naming the same item are summed. Returns `None` on overflow.
    pub fn requested_by_item(&self) -> Option<BTreeMap<ItemId, u32>> {
        let mut totals: BTreeMap<ItemId, u32> = BTreeMap::new();
        for request in &self.requests {
            let entry = totals.entry(request.item_id.clone()).or_insert(0);
            *entry = entry.checked_add(request.requested_amount)?;
        }
        Some(totals)
    }

    /// Total requested quantity across all lines. Returns `None` on overflow.
    pub fn total_requested(&self) -> Option<u32> {
        self.requests
            .iter()
            .try_fold(0_u32, |acc, r| acc.checked_add(r.requested_amount))
    }
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// The outcome of settling an order against a carried inventory.
///
/// Produced by the fulfillment computation and consumed by the scheduler
/// (to complete the order) and the score ledger (to accumulate counters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The order this settlement was computed for.
    pub order_id: OrderId,
    /// Quantity actually transferable per requested item.
    pub deliverable: BTreeMap<ItemId, u32>,
    /// Sum of `deliverable`.
    pub total_deliverable: u32,
    /// Sum of all requested quantities.
    pub total_requested: u32,
    /// At least one unit can be delivered.
    pub eligible: bool,
    /// Every requested line is fully satisfied.
    pub is_full: bool,
    /// Points earned, including the full-delivery bonus when applicable.
    pub score: u64,
}

//! Domain events emitted by the simulation components.

use greenhaul_types::{ItemId, LocationKey, OrderId};
use serde::{Deserialize, Serialize};

/// Something observable that happened inside the core.
///
/// Components never print or log directly; they hand these to the
/// [`EventSink`](crate::EventSink) injected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// An order left the pool in a batch and is waiting out its delay.
    OrderIncoming {
        /// The released order.
        order_id: OrderId,
        /// Its customer location.
        location: LocationKey,
        /// Rolled visibility delay in seconds.
        delay: f64,
    },

    /// A batch release finished.
    BatchReleased {
        /// Orders moved to INCOMING, in selection order.
        orders: Vec<OrderId>,
        /// Seconds until the next batch may be considered.
        next_batch_in: f64,
    },

    /// Batch release was skipped because too many orders are accepted.
    BatchThrottled {
        /// Orders currently accepted.
        accepted: usize,
        /// Configured active order limit.
        limit: u32,
        /// Seconds until the next attempt.
        retry_in: f64,
    },

    /// Batch release found nothing in the pool.
    PoolEmpty,

    /// An order became visible to the player (alert cue).
    OrderVisible {
        /// The order.
        order_id: OrderId,
        /// Its customer location.
        location: LocationKey,
        /// Seconds the player has to accept it.
        accept_time: f64,
    },

    /// A visible order was not accepted in time and went back to the pool.
    OrderExpired {
        /// The order.
        order_id: OrderId,
    },

    /// The player accepted an order.
    OrderAccepted {
        /// The order.
        order_id: OrderId,
        /// Its customer location.
        location: LocationKey,
    },

    /// An accepted order was delivered and settled.
    OrderCompleted {
        /// The order.
        order_id: OrderId,
        /// Units delivered.
        items_delivered: u32,
        /// Whether every requested line was satisfied.
        is_full: bool,
        /// Points earned.
        score: u64,
    },

    /// Periodic snapshot of the scheduler's collection sizes.
    SchedulerStatus {
        /// Orders in the pool.
        available: usize,
        /// Orders waiting to become visible.
        incoming: usize,
        /// Orders the player can accept.
        visible: usize,
        /// Orders awaiting delivery.
        accepted: usize,
    },

    /// A greenhouse growth event added one unit to each listed item.
    SupplyGrew {
        /// Items that grew, in selection order.
        items: Vec<ItemId>,
        /// Seconds until the next growth event.
        next_growth_in: f64,
    },

    /// A growth event fired but every item was already at the cap.
    SupplySaturated,

    /// One unit was taken out of the greenhouse.
    StockTaken {
        /// The item.
        item_id: ItemId,
        /// Units left in the greenhouse.
        remaining: u32,
    },

    /// One unit was put back into the greenhouse.
    StockReturned {
        /// The item.
        item_id: ItemId,
        /// Units now in the greenhouse.
        stock: u32,
    },

    /// A return was refused because the item is at the cap.
    StockReturnRefused {
        /// The item.
        item_id: ItemId,
    },

    /// The session met one of its completion thresholds for the first time.
    CompletionReached {
        /// Orders completed so far.
        orders_completed: u32,
        /// Units delivered so far.
        items_delivered: u64,
        /// Score so far.
        total_score: u64,
    },
}

impl GameEvent {
    /// Short machine-readable name of the event kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::OrderIncoming { .. } => "order_incoming",
            Self::BatchReleased { .. } => "batch_released",
            Self::BatchThrottled { .. } => "batch_throttled",
            Self::PoolEmpty => "pool_empty",
            Self::OrderVisible { .. } => "order_visible",
            Self::OrderExpired { .. } => "order_expired",
            Self::OrderAccepted { .. } => "order_accepted",
            Self::OrderCompleted { .. } => "order_completed",
            Self::SchedulerStatus { .. } => "scheduler_status",
            Self::SupplyGrew { .. } => "supply_grew",
            Self::SupplySaturated => "supply_saturated",
            Self::StockTaken { .. } => "stock_taken",
            Self::StockReturned { .. } => "stock_returned",
            Self::StockReturnRefused { .. } => "stock_return_refused",
            Self::CompletionReached { .. } => "completion_reached",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = GameEvent::OrderExpired {
            order_id: OrderId::new("o7"),
        };
        let json = serde_json::to_value(&event).ok();
        let tag = json
            .as_ref()
            .and_then(|v| v.get("type"))
            .and_then(|v| v.as_str());
        assert_eq!(tag, Some("order_expired"));
        assert_eq!(event.kind(), "order_expired");
    }
}

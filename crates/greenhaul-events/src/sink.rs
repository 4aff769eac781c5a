//! Event sinks: where components send their [`GameEvent`]s.
//!
//! Every component receives an `Arc<dyn EventSink>` in its constructor.
//! The host decides what happens to the events: forward them to `tracing`
//! ([`TracingSink`]), buffer them for a UI or a test ([`RecordingSink`]),
//! or drop them ([`NullSink`]).

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::event::GameEvent;

/// A receiver of domain events.
///
/// Implementations must be cheap and must not call back into the component
/// that emitted the event.
pub trait EventSink: Send + Sync + core::fmt::Debug {
    /// Handle one event.
    fn emit(&self, event: &GameEvent);
}

/// Shared handle to an event sink.
pub type SharedSink = Arc<dyn EventSink>;

/// Forwards every event to `tracing`.
///
/// Lifecycle transitions log at `info`; stock movement and periodic status
/// log at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a tracing sink.
    pub const fn new() -> Self {
        Self
    }

    /// Create a tracing sink behind a [`SharedSink`] handle.
    pub fn shared() -> SharedSink {
        Arc::new(Self)
    }
}

impl EventSink for TracingSink {
    fn emit(&self, event: &GameEvent) {
        match event {
            GameEvent::OrderIncoming {
                order_id,
                location,
                delay,
            } => info!(%order_id, %location, delay, "Order incoming"),
            GameEvent::BatchReleased {
                orders,
                next_batch_in,
            } => info!(count = orders.len(), next_batch_in, "Batch released"),
            GameEvent::BatchThrottled {
                accepted,
                limit,
                retry_in,
            } => debug!(accepted, limit, retry_in, "Active order limit reached"),
            GameEvent::PoolEmpty => debug!("No available orders for next batch"),
            GameEvent::OrderVisible {
                order_id,
                location,
                accept_time,
            } => info!(%order_id, %location, accept_time, "Order visible"),
            GameEvent::OrderExpired { order_id } => {
                info!(%order_id, "Order expired, returned to pool");
            }
            GameEvent::OrderAccepted { order_id, location } => {
                info!(%order_id, %location, "Order accepted");
            }
            GameEvent::OrderCompleted {
                order_id,
                items_delivered,
                is_full,
                score,
            } => info!(%order_id, items_delivered, is_full, score, "Order completed"),
            GameEvent::SchedulerStatus {
                available,
                incoming,
                visible,
                accepted,
            } => debug!(available, incoming, visible, accepted, "Order status"),
            GameEvent::SupplyGrew {
                items,
                next_growth_in,
            } => debug!(?items, next_growth_in, "Greenhouse grew"),
            GameEvent::SupplySaturated => debug!("No plants can grow, all at max"),
            GameEvent::StockTaken { item_id, remaining } => {
                debug!(%item_id, remaining, "Took plant");
            }
            GameEvent::StockReturned { item_id, stock } => {
                debug!(%item_id, stock, "Returned plant");
            }
            GameEvent::StockReturnRefused { item_id } => {
                debug!(%item_id, "Cannot return plant, at max inventory");
            }
            GameEvent::CompletionReached {
                orders_completed,
                items_delivered,
                total_score,
            } => info!(
                orders_completed,
                items_delivered, total_score, "Completion requirements met"
            ),
        }
    }
}

/// Buffers events in memory until drained.
///
/// Useful for a UI layer that polls once per frame, and for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of every event recorded so far.
    pub fn events(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Remove and return every event recorded so far.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .map(|mut guard| core::mem::take(&mut *guard))
            .unwrap_or_default()
    }

    /// Count recorded events of the given [`kind`](GameEvent::kind).
    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .map(|guard| guard.iter().filter(|e| e.kind() == kind).count())
            .unwrap_or(0)
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &GameEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &GameEvent) {}
}

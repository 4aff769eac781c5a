//! The order lifecycle scheduler.
//!
//! Every order lives in exactly one of five collections, matching its
//! [`OrderState`]. Records are moved by value between collections, so an
//! order can never be in two places at once.
//!
//! Each [`tick`](OrderLifecycleScheduler::tick) runs three steps:
//!
//! 1. **Expire** -- visible orders whose accept window ran out return to the
//!    pool with their timers cleared.
//! 2. **Promote** -- incoming orders whose delay ran out become visible and
//!    start their accept window.
//! 3. **Release** -- if nothing was incoming or visible when the tick began,
//!    the batch timer counts down and, once it runs out, a new batch moves
//!    from the pool to incoming.
//!
//! Timers that run past zero transition immediately; the overshoot is not
//! carried into the next timer. Orders that change collection during a tick
//! are not counted down again in the same tick.

use std::collections::BTreeSet;

use greenhaul_events::{GameEvent, SharedSink};
use greenhaul_types::{OrderId, OrderRecord, OrderState, Settlement};
use rand::Rng;

use crate::batch::{roll_delay, select_batch};
use crate::config::ScheduleConfig;
use crate::error::OrderError;

/// Seconds between periodic status events.
pub const STATUS_INTERVAL: f64 = 5.0;

/// Seconds before retrying a batch blocked by the active order limit.
pub const THROTTLE_RETRY: f64 = 1.0;

/// A completed order together with the settlement that completed it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedOrder {
    /// The order record, in state [`Completed`](OrderState::Completed).
    pub record: OrderRecord,
    /// The settlement applied at delivery.
    pub settlement: Settlement,
}

/// What happened to orders during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerTick {
    /// Orders moved from the pool to incoming, in selection order.
    pub released: Vec<OrderId>,
    /// Orders that became visible. A non-empty list is the alert cue.
    pub made_visible: Vec<OrderId>,
    /// Orders whose accept window ran out.
    pub expired: Vec<OrderId>,
}

impl SchedulerTick {
    /// Whether nothing changed state this tick.
    pub fn is_empty(&self) -> bool {
        self.released.is_empty() && self.made_visible.is_empty() && self.expired.is_empty()
    }

    /// Whether at least one order became visible this tick.
    pub fn has_new_visible(&self) -> bool {
        !self.made_visible.is_empty()
    }
}

/// Owns every order and drives it through its lifecycle.
#[derive(Debug)]
pub struct OrderLifecycleScheduler {
    config: ScheduleConfig,
    available: Vec<OrderRecord>,
    incoming: Vec<OrderRecord>,
    visible: Vec<OrderRecord>,
    accepted: Vec<OrderRecord>,
    completed: Vec<CompletedOrder>,
    /// Seconds until the next batch may be released.
    batch_timer: f64,
    /// Seconds since the last status event.
    status_timer: f64,
    sink: SharedSink,
}

impl OrderLifecycleScheduler {
    /// Create an empty scheduler.
    ///
    /// The batch timer starts at zero, so the first tick releases a batch.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: ScheduleConfig, sink: SharedSink) -> Result<Self, OrderError> {
        config.validate()?;
        Ok(Self {
            config,
            available: Vec::new(),
            incoming: Vec::new(),
            visible: Vec::new(),
            accepted: Vec::new(),
            completed: Vec::new(),
            batch_timer: 0.0,
            status_timer: 0.0,
            sink,
        })
    }

    /// Add orders to the pool.
    ///
    /// Every record is reset to [`Available`](OrderState::Available) with no
    /// timer. Either all records are added or none are.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::DuplicateOrder`] if an identifier repeats within
    /// `orders` or is already known to the scheduler.
    pub fn load(
        &mut self,
        orders: impl IntoIterator<Item = OrderRecord>,
    ) -> Result<usize, OrderError> {
        let mut known: BTreeSet<OrderId> = self.all_ids().cloned().collect();
        let mut staged = Vec::new();
        for mut order in orders {
            if !known.insert(order.order_id.clone()) {
                return Err(OrderError::DuplicateOrder {
                    order_id: order.order_id,
                });
            }
            order.state = OrderState::Available;
            order.countdown = None;
            staged.push(order);
        }
        let count = staged.len();
        self.available.extend(staged);
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance every timer by `dt` seconds.
    ///
    /// Negative or non-finite `dt` is treated as zero. This never fails:
    /// an empty pool or a reached active order limit are no-op paths.
    pub fn tick(&mut self, dt: f64, rng: &mut impl Rng) -> SchedulerTick {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut report = SchedulerTick::default();

        self.status_timer += dt;
        if self.status_timer >= STATUS_INTERVAL {
            self.status_timer = 0.0;
            self.emit_status();
        }

        let idle = self.incoming.is_empty() && self.visible.is_empty();

        self.expire_visible(dt, &mut report);
        self.promote_incoming(dt, &mut report);

        if idle {
            self.batch_timer -= dt;
            if self.batch_timer <= 0.0 {
                self.release_batch(rng, &mut report);
            }
        }

        report
    }

    fn expire_visible(&mut self, dt: f64, report: &mut SchedulerTick) {
        let (expired, waiting) = count_down(std::mem::take(&mut self.visible), dt);
        self.visible = waiting;
        for mut order in expired {
            order.state = OrderState::Available;
            order.countdown = None;
            self.sink.emit(&GameEvent::OrderExpired {
                order_id: order.order_id.clone(),
            });
            report.expired.push(order.order_id.clone());
            self.available.push(order);
        }
    }

    fn promote_incoming(&mut self, dt: f64, report: &mut SchedulerTick) {
        let (arrived, waiting) = count_down(std::mem::take(&mut self.incoming), dt);
        self.incoming = waiting;
        for mut order in arrived {
            order.state = OrderState::Visible;
            order.countdown = Some(self.config.accept_time);
            self.sink.emit(&GameEvent::OrderVisible {
                order_id: order.order_id.clone(),
                location: order.location.clone(),
                accept_time: self.config.accept_time,
            });
            report.made_visible.push(order.order_id.clone());
            self.visible.push(order);
        }
    }

    /// Release a batch now, regardless of the batch timer.
    ///
    /// Applies the active order limit and the empty pool rule exactly like
    /// a timer-driven release.
    pub fn force_release(&mut self, rng: &mut impl Rng) -> Vec<OrderId> {
        let mut report = SchedulerTick::default();
        self.release_batch(rng, &mut report);
        report.released
    }

    fn release_batch(&mut self, rng: &mut impl Rng, report: &mut SchedulerTick) {
        let limit = usize::try_from(self.config.active_order_limit).unwrap_or(usize::MAX);
        if self.accepted.len() >= limit {
            self.batch_timer = THROTTLE_RETRY;
            self.sink.emit(&GameEvent::BatchThrottled {
                accepted: self.accepted.len(),
                limit: self.config.active_order_limit,
                retry_in: THROTTLE_RETRY,
            });
            return;
        }

        if self.available.is_empty() {
            self.batch_timer = 0.0;
            self.sink.emit(&GameEvent::PoolEmpty);
            return;
        }

        let batch_size = usize::try_from(self.config.batch_size).unwrap_or(usize::MAX);
        let picked = select_batch(&self.available, batch_size, rng);

        let mut slots: Vec<Option<OrderRecord>> = std::mem::take(&mut self.available)
            .into_iter()
            .map(Some)
            .collect();
        let mut released = Vec::with_capacity(picked.len());
        for index in picked {
            if let Some(order) = slots.get_mut(index).and_then(Option::take) {
                released.push(order);
            }
        }
        self.available = slots.into_iter().flatten().collect();

        for mut order in released {
            let delay = roll_delay(order.base_delay, rng);
            order.state = OrderState::Incoming;
            order.countdown = Some(delay);
            self.sink.emit(&GameEvent::OrderIncoming {
                order_id: order.order_id.clone(),
                location: order.location.clone(),
                delay,
            });
            report.released.push(order.order_id.clone());
            self.incoming.push(order);
        }

        self.batch_timer = self.config.batch_delay;
        self.sink.emit(&GameEvent::BatchReleased {
            orders: report.released.clone(),
            next_batch_in: self.batch_timer,
        });
    }

    fn emit_status(&self) {
        self.sink.emit(&GameEvent::SchedulerStatus {
            available: self.available.len(),
            incoming: self.incoming.len(),
            visible: self.visible.len(),
            accepted: self.accepted.len(),
        });
    }

    // -----------------------------------------------------------------------
    // Player operations
    // -----------------------------------------------------------------------

    /// Accept a visible order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidTransition`] if the order is not
    /// visible, or [`OrderError::UnknownOrder`] if it does not exist.
    pub fn accept(&mut self, order_id: &str) -> Result<&OrderRecord, OrderError> {
        let Some(position) = self.visible.iter().position(|o| o.order_id.as_str() == order_id)
        else {
            return Err(self.wrong_state(order_id, OrderState::Visible));
        };

        let mut order = self.visible.remove(position);
        order.state = OrderState::Accepted;
        order.countdown = None;
        self.sink.emit(&GameEvent::OrderAccepted {
            order_id: order.order_id.clone(),
            location: order.location.clone(),
        });
        self.accepted.push(order);
        self.accepted
            .last()
            .ok_or_else(|| OrderError::UnknownOrder {
                order_id: OrderId::new(order_id),
            })
    }

    /// Complete an accepted order with its settlement.
    ///
    /// The settlement is stored with the record for later scoring.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::SettlementMismatch`] if `settlement` was
    /// computed for a different order, [`OrderError::InvalidTransition`] if
    /// the order is not accepted, or [`OrderError::UnknownOrder`] if it does
    /// not exist.
    pub fn settle(
        &mut self,
        order_id: &str,
        settlement: Settlement,
    ) -> Result<&CompletedOrder, OrderError> {
        if settlement.order_id.as_str() != order_id {
            return Err(OrderError::SettlementMismatch {
                order_id: OrderId::new(order_id),
                settlement_for: settlement.order_id,
            });
        }

        let Some(position) = self.accepted.iter().position(|o| o.order_id.as_str() == order_id)
        else {
            return Err(self.wrong_state(order_id, OrderState::Accepted));
        };

        let mut record = self.accepted.remove(position);
        record.state = OrderState::Completed;
        record.countdown = None;
        self.sink.emit(&GameEvent::OrderCompleted {
            order_id: record.order_id.clone(),
            items_delivered: settlement.total_deliverable,
            is_full: settlement.is_full,
            score: settlement.score,
        });
        self.completed.push(CompletedOrder { record, settlement });
        self.completed
            .last()
            .ok_or_else(|| OrderError::UnknownOrder {
                order_id: OrderId::new(order_id),
            })
    }

    fn wrong_state(&self, order_id: &str, expected: OrderState) -> OrderError {
        match self.state_of(order_id) {
            Some(actual) => OrderError::InvalidTransition {
                order_id: OrderId::new(order_id),
                expected,
                actual,
            },
            None => OrderError::UnknownOrder {
                order_id: OrderId::new(order_id),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current state of an order, or `None` if it is unknown.
    pub fn state_of(&self, order_id: &str) -> Option<OrderState> {
        self.order(order_id).map(|o| o.state)
    }

    /// Look up an order in any collection.
    pub fn order(&self, order_id: &str) -> Option<&OrderRecord> {
        self.available
            .iter()
            .chain(&self.incoming)
            .chain(&self.visible)
            .chain(&self.accepted)
            .chain(self.completed.iter().map(|c| &c.record))
            .find(|o| o.order_id.as_str() == order_id)
    }

    /// Orders currently in `state`.
    pub fn orders_in(&self, state: OrderState) -> Vec<&OrderRecord> {
        match state {
            OrderState::Available => self.available.iter().collect(),
            OrderState::Incoming => self.incoming.iter().collect(),
            OrderState::Visible => self.visible.iter().collect(),
            OrderState::Accepted => self.accepted.iter().collect(),
            OrderState::Completed => self.completed.iter().map(|c| &c.record).collect(),
        }
    }

    /// Number of orders currently in `state`.
    pub fn count(&self, state: OrderState) -> usize {
        match state {
            OrderState::Available => self.available.len(),
            OrderState::Incoming => self.incoming.len(),
            OrderState::Visible => self.visible.len(),
            OrderState::Accepted => self.accepted.len(),
            OrderState::Completed => self.completed.len(),
        }
    }

    /// Orders in the pool.
    pub fn available(&self) -> &[OrderRecord] {
        &self.available
    }

    /// Orders waiting out their visibility delay.
    pub fn incoming(&self) -> &[OrderRecord] {
        &self.incoming
    }

    /// Orders the player can accept.
    pub fn visible(&self) -> &[OrderRecord] {
        &self.visible
    }

    /// Orders awaiting delivery.
    pub fn accepted(&self) -> &[OrderRecord] {
        &self.accepted
    }

    /// Completed orders with their settlements, in completion order.
    pub fn completed(&self) -> &[CompletedOrder] {
        &self.completed
    }

    /// Number of visible orders (the phone badge).
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of accepted orders.
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Total number of orders across all collections.
    pub fn len(&self) -> usize {
        OrderState::ALL.iter().map(|&s| self.count(s)).sum()
    }

    /// Whether no orders are loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seconds until the next batch may be released.
    pub const fn batch_timer(&self) -> f64 {
        self.batch_timer
    }

    /// The schedule configuration.
    pub const fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    fn all_ids(&self) -> impl Iterator<Item = &OrderId> {
        self.available
            .iter()
            .chain(&self.incoming)
            .chain(&self.visible)
            .chain(&self.accepted)
            .chain(self.completed.iter().map(|c| &c.record))
            .map(|o| &o.order_id)
    }
}

/// Count every timer down by `dt`. Returns `(elapsed, still_running)`.
fn count_down(orders: Vec<OrderRecord>, dt: f64) -> (Vec<OrderRecord>, Vec<OrderRecord>) {
    orders
        .into_iter()
        .map(|mut order| {
            order.countdown = Some(order.countdown.unwrap_or(0.0) - dt);
            order
        })
        .partition(|order| order.countdown.is_none_or(|c| c <= 0.0))
}

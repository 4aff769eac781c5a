//! The game session: one map run wired together.
//!
//! A [`GameSession`] owns the order scheduler, the greenhouse, the player's
//! carried plants and the score ledger, plus the seeded RNG they share. The
//! host calls [`tick`](GameSession::tick) once per frame and forwards
//! player actions between ticks:
//!
//! - [`accept`](GameSession::accept) a visible order,
//! - [`pick`](GameSession::pick) a plant from the greenhouse,
//! - [`drop_item`](GameSession::drop_item) a carried plant back into it,
//! - [`deliver`](GameSession::deliver) to an accepted order's customer.
//!
//! Every action either succeeds completely or returns an error with the
//! session unchanged.

use std::collections::BTreeMap;

use greenhaul_events::{GameEvent, SharedSink};
use greenhaul_ledger::{
    CompletionStatus, LedgerTotals, OrderScore, ScoreLedger, ScoringRules, SessionSummary, settle,
};
use greenhaul_orders::{OrderCatalog, OrderError, OrderLifecycleScheduler, SchedulerTick};
use greenhaul_supply::SupplyGrowthSimulator;
use greenhaul_types::{ItemId, OrderId, OrderRecord, OrderState, SessionId, Settlement};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::carried::{CarriedInventory, InventoryError};
use crate::config::SessionConfig;
use crate::error::SessionError;

/// What happened during one session tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTick {
    /// Order transitions.
    pub orders: SchedulerTick,
    /// Items grown by a greenhouse growth event, if one fired.
    pub grown: Option<Vec<ItemId>>,
    /// Whether the session is completed after this tick.
    pub completed: bool,
    /// Whether this tick is the one that completed it.
    pub newly_completed: bool,
}

/// One map run.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    map_name: String,
    scheduler: OrderLifecycleScheduler,
    supply: SupplyGrowthSimulator,
    carried: CarriedInventory,
    ledger: ScoreLedger,
    scoring: ScoringRules,
    rng: SmallRng,
    sink: SharedSink,
    /// Simulated seconds since the session started.
    elapsed: f64,
}

impl GameSession {
    /// Start a session over `catalog`.
    ///
    /// The greenhouse stocks every item any order requests plus the plants
    /// listed in `config.supply.plants`. The RNG is seeded from
    /// `config.session.seed`, or from the operating system when no seed is
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the configuration is invalid,
    /// [`SessionError::Supply`] if the catalog requests no items, or
    /// [`SessionError::Order`] if the catalog repeats an order id.
    pub fn new(
        config: &SessionConfig,
        catalog: OrderCatalog,
        sink: SharedSink,
    ) -> Result<Self, SessionError> {
        let rng = config
            .session
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        Self::with_rng(config, catalog, sink, rng)
    }

    /// Start a session with an explicit RNG.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::new`].
    pub fn with_rng(
        config: &SessionConfig,
        catalog: OrderCatalog,
        sink: SharedSink,
        mut rng: SmallRng,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let mut items = catalog.item_ids();
        items.extend(config.supply.plants.iter().cloned());
        let supply = SupplyGrowthSimulator::new(items, &config.supply, &mut rng, sink.clone())?;

        let mut scheduler = OrderLifecycleScheduler::new(config.orders.clone(), sink.clone())?;
        let loaded = scheduler.load(catalog.into_orders())?;

        let id = SessionId::new();
        info!(
            session_id = %id,
            map = %config.session.map_name,
            orders = loaded,
            items = supply.items().count(),
            "Session started"
        );

        Ok(Self {
            id,
            map_name: config.session.map_name.clone(),
            scheduler,
            supply,
            carried: CarriedInventory::new(config.player.carry_capacity),
            ledger: ScoreLedger::new(config.completion),
            scoring: config.scoring,
            rng,
            sink,
            elapsed: 0.0,
        })
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the session by `dt` seconds.
    ///
    /// Runs the scheduler, then the greenhouse, then re-evaluates the
    /// completion policy. Negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, dt: f64) -> SessionTick {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        let orders = self.scheduler.tick(dt, &mut self.rng);
        let grown = self.supply.tick(dt, &mut self.rng);
        let newly_completed = self.ledger.evaluate();
        if newly_completed {
            self.emit_completion();
        }

        SessionTick {
            orders,
            grown,
            completed: self.ledger.is_completed(),
            newly_completed,
        }
    }

    // -----------------------------------------------------------------------
    // Player actions
    // -----------------------------------------------------------------------

    /// Accept a visible order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] if the order is unknown or not visible.
    pub fn accept(&mut self, order_id: &str) -> Result<(), SessionError> {
        self.scheduler.accept(order_id)?;
        Ok(())
    }

    /// Take one plant from the greenhouse into the carried inventory.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Inventory`] if the player's hands are full,
    /// or [`SessionError::OutOfStock`] if the greenhouse has none left.
    pub fn pick(&mut self, item_id: &ItemId) -> Result<(), SessionError> {
        if !self.carried.can_pick(1) {
            return Err(InventoryError::OverCapacity {
                item_id: item_id.clone(),
                attempted: 1,
                current_load: self.carried.total(),
                capacity: self.carried.capacity(),
            }
            .into());
        }
        if !self.supply.take(item_id) {
            return Err(SessionError::OutOfStock {
                item_id: item_id.clone(),
            });
        }
        if let Err(e) = self.carried.add(item_id, 1) {
            // Below the ceiling right after a take, so the return succeeds.
            let _ = self.supply.return_item(item_id);
            return Err(e.into());
        }
        Ok(())
    }

    /// Put one carried plant back into the greenhouse.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Inventory`] if no such plant is carried, or
    /// [`SessionError::ReturnRefused`] if the greenhouse is full of it.
    pub fn drop_item(&mut self, item_id: &ItemId) -> Result<(), SessionError> {
        self.carried.remove(item_id, 1)?;
        if !self.supply.return_item(item_id) {
            // One slot was just freed, so re-adding cannot exceed capacity.
            self.carried.add(item_id, 1)?;
            return Err(SessionError::ReturnRefused {
                item_id: item_id.clone(),
            });
        }
        Ok(())
    }

    /// Compute what delivering to `order_id` would settle, without doing it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] if the order is unknown, or
    /// [`SessionError::Ledger`] on arithmetic overflow.
    pub fn delivery_preview(&self, order_id: &str) -> Result<Settlement, SessionError> {
        let order = self
            .scheduler
            .order(order_id)
            .ok_or_else(|| OrderError::UnknownOrder {
                order_id: OrderId::new(order_id),
            })?;
        Ok(settle(order, self.carried.as_map(), self.scoring)?)
    }

    /// Deliver carried plants to an accepted order and complete it.
    ///
    /// Hands over `min(requested, carried)` of every requested item, moves
    /// the order to COMPLETED, and adds the settlement to the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Order`] if the order is unknown or not
    /// accepted, [`SessionError::IneligibleDelivery`] if nothing carried
    /// matches the order, or [`SessionError::Ledger`] on overflow.
    pub fn deliver(&mut self, order_id: &str) -> Result<Settlement, SessionError> {
        let order = self.accepted_order(order_id)?;
        let settlement = settle(order, self.carried.as_map(), self.scoring)?;
        if !settlement.eligible {
            return Err(SessionError::IneligibleDelivery {
                order_id: OrderId::new(order_id),
            });
        }

        // Check the ledger can take it before anything changes.
        let mut ledger = self.ledger.clone();
        let newly_completed = ledger.record(&settlement)?;

        self.carried.apply_settlement(&settlement)?;
        self.scheduler.settle(order_id, settlement.clone())?;
        self.ledger = ledger;
        if newly_completed {
            self.emit_completion();
        }
        Ok(settlement)
    }

    fn accepted_order(&self, order_id: &str) -> Result<&OrderRecord, OrderError> {
        let order = self
            .scheduler
            .order(order_id)
            .ok_or_else(|| OrderError::UnknownOrder {
                order_id: OrderId::new(order_id),
            })?;
        if order.state != OrderState::Accepted {
            return Err(OrderError::InvalidTransition {
                order_id: order.order_id.clone(),
                expected: OrderState::Accepted,
                actual: order.state,
            });
        }
        Ok(order)
    }

    fn emit_completion(&self) {
        let totals = self.ledger.totals();
        self.sink.emit(&GameEvent::CompletionReached {
            orders_completed: totals.orders_completed,
            items_delivered: totals.items_delivered,
            total_score: totals.total_score,
        });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Display name of the map.
    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    /// Simulated seconds since the session started.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Orders the player can accept.
    pub fn visible_orders(&self) -> &[OrderRecord] {
        self.scheduler.visible()
    }

    /// Orders awaiting delivery.
    pub fn accepted_orders(&self) -> &[OrderRecord] {
        self.scheduler.accepted()
    }

    /// Number of visible orders.
    pub fn visible_count(&self) -> usize {
        self.scheduler.visible_count()
    }

    /// Number of accepted orders.
    pub fn accepted_count(&self) -> usize {
        self.scheduler.accepted_count()
    }

    /// Look up an order in any state.
    pub fn order(&self, order_id: &str) -> Option<&OrderRecord> {
        self.scheduler.order(order_id)
    }

    /// Greenhouse stock of `item_id`.
    pub fn stock(&self, item_id: &str) -> u32 {
        self.supply.stock(item_id)
    }

    /// Whether the greenhouse has at least one `item_id`.
    pub fn can_take(&self, item_id: &str) -> bool {
        self.supply.can_take(item_id)
    }

    /// Greenhouse stock of every item.
    pub fn stock_snapshot(&self) -> BTreeMap<ItemId, u32> {
        self.supply.snapshot()
    }

    /// Total plants in the greenhouse.
    pub fn total_stock(&self) -> u64 {
        self.supply.total_stock()
    }

    /// The player's carried plants.
    pub const fn carried(&self) -> &CarriedInventory {
        &self.carried
    }

    /// Progress toward completion.
    pub const fn completion_status(&self) -> CompletionStatus {
        self.ledger.completion_status()
    }

    /// Whether the map is completed.
    pub const fn is_completed(&self) -> bool {
        self.ledger.is_completed()
    }

    /// Current ledger counters.
    pub const fn totals(&self) -> LedgerTotals {
        self.ledger.totals()
    }

    /// Read access to the scheduler.
    pub const fn scheduler(&self) -> &OrderLifecycleScheduler {
        &self.scheduler
    }

    /// Read access to the greenhouse.
    pub const fn supply(&self) -> &SupplyGrowthSimulator {
        &self.supply
    }

    /// Score summary of the orders completed so far.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Ledger`] on overflow.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let scores = self
            .scheduler
            .completed()
            .iter()
            .map(|c| OrderScore::from_settlement(&c.record, &c.settlement))
            .collect();
        Ok(SessionSummary::new(self.id, self.map_name.clone(), scores)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use std::sync::Arc;

    use greenhaul_events::{NullSink, RecordingSink};

    use super::*;

    const CATALOG: &str = r#"{
        "Harbor": [
            { "order_id": "h1", "base_delay": 2, "plants": [
                { "item_id": "apple", "amount": 2 },
                { "item_id": "basil", "amount": 1 }
            ] }
        ]
    }"#;

    fn config() -> SessionConfig {
        let mut config = SessionConfig::default();
        config.session.seed = Some(42);
        config.supply.initial_amount = 3;
        config
    }

    fn session() -> GameSession {
        let catalog = OrderCatalog::from_json(CATALOG).unwrap();
        GameSession::new(&config(), catalog, Arc::new(NullSink)).unwrap()
    }

    fn accept_h1(s: &mut GameSession) {
        for _ in 0..20 {
            if s.visible_count() > 0 {
                break;
            }
            let _ = s.tick(0.5);
        }
        s.accept("h1").unwrap();
    }

    #[test]
    fn greenhouse_stocks_catalog_items() {
        let s = session();
        assert_eq!(s.stock("apple"), 3);
        assert_eq!(s.stock("basil"), 3);
        assert_eq!(s.total_stock(), 6);
        assert_eq!(s.map_name(), "Map 1");
    }

    #[test]
    fn pick_moves_stock_into_hands() {
        let mut s = session();
        let apple = ItemId::new("apple");
        s.pick(&apple).unwrap();
        assert_eq!(s.stock("apple"), 2);
        assert_eq!(s.carried().count("apple"), 1);
    }

    #[test]
    fn pick_out_of_stock() {
        let mut s = session();
        let apple = ItemId::new("apple");
        for _ in 0..3 {
            s.pick(&apple).unwrap();
        }
        assert!(matches!(
            s.pick(&apple),
            Err(SessionError::OutOfStock { .. })
        ));
        assert_eq!(s.carried().count("apple"), 3);
    }

    #[test]
    fn pick_with_full_hands_changes_nothing() {
        let mut cfg = config();
        cfg.player.carry_capacity = 1;
        let catalog = OrderCatalog::from_json(CATALOG).unwrap();
        let mut s = GameSession::new(&cfg, catalog, Arc::new(NullSink)).unwrap();
        s.pick(&ItemId::new("apple")).unwrap();

        let err = s.pick(&ItemId::new("basil")).unwrap_err();
        assert!(matches!(err, SessionError::Inventory { .. }));
        assert_eq!(s.stock("basil"), 3);
    }

    #[test]
    fn unrequested_plants_are_stocked_grow_and_can_be_picked() {
        let mut cfg = config();
        cfg.supply.initial_amount = 0;
        cfg.supply.grow_time_min = 1.0;
        cfg.supply.grow_time_max = 1.0;
        cfg.supply.plants = vec![ItemId::new("rose"), ItemId::new("apple")];
        let catalog = OrderCatalog::from_json(CATALOG).unwrap();
        let mut s = GameSession::new(&cfg, catalog, Arc::new(NullSink)).unwrap();

        let stocked: Vec<ItemId> = s.stock_snapshot().into_keys().collect();
        assert_eq!(
            stocked,
            vec![ItemId::new("apple"), ItemId::new("basil"), ItemId::new("rose")]
        );
        let rose = ItemId::new("rose");
        assert!(s.pick(&rose).is_err());

        // Three growable items and grow_amount 3: every item grows once.
        let report = s.tick(1.0);
        assert_eq!(report.grown.as_ref().map(Vec::len), Some(3));
        assert_eq!(s.stock("rose"), 1);

        s.pick(&rose).unwrap();
        assert_eq!(s.carried().count("rose"), 1);
        assert_eq!(s.stock("rose"), 0);
    }

    #[test]
    fn drop_returns_plant() {
        let mut s = session();
        let apple = ItemId::new("apple");
        s.pick(&apple).unwrap();
        s.drop_item(&apple).unwrap();
        assert_eq!(s.stock("apple"), 3);
        assert!(s.carried().is_empty());

        assert!(matches!(
            s.drop_item(&apple),
            Err(SessionError::Inventory { .. })
        ));
    }

    #[test]
    fn drop_refused_when_greenhouse_full_keeps_plant_in_hands() {
        let mut cfg = config();
        cfg.supply.initial_amount = 7;
        cfg.supply.grow_time_min = 1.0;
        cfg.supply.grow_time_max = 1.0;
        let catalog = OrderCatalog::from_json(CATALOG).unwrap();
        let mut s = GameSession::new(&cfg, catalog, Arc::new(NullSink)).unwrap();
        let apple = ItemId::new("apple");
        s.pick(&apple).unwrap();
        // Regrow apple back to the ceiling.
        while s.stock("apple") < 7 {
            let _ = s.tick(1.0);
        }

        assert!(matches!(
            s.drop_item(&apple),
            Err(SessionError::ReturnRefused { .. })
        ));
        assert_eq!(s.carried().count("apple"), 1);
        assert_eq!(s.stock("apple"), 7);
    }

    #[test]
    fn partial_delivery_settles_and_empties_hands() {
        let mut s = session();
        accept_h1(&mut s);
        s.pick(&ItemId::new("apple")).unwrap();
        s.pick(&ItemId::new("basil")).unwrap();

        let preview = s.delivery_preview("h1").unwrap();
        assert_eq!(preview.total_deliverable, 2);
        assert_eq!(s.carried().total(), 2);

        let settlement = s.deliver("h1").unwrap();
        assert_eq!(settlement, preview);
        assert!(!settlement.is_full);
        assert_eq!(settlement.score, 20);
        assert!(s.carried().is_empty());
        assert_eq!(s.order("h1").unwrap().state, OrderState::Completed);
        assert_eq!(s.totals().items_delivered, 2);
    }

    #[test]
    fn ineligible_delivery_changes_nothing() {
        let mut s = session();
        accept_h1(&mut s);
        let err = s.deliver("h1").unwrap_err();
        assert!(matches!(err, SessionError::IneligibleDelivery { .. }));
        assert_eq!(s.order("h1").unwrap().state, OrderState::Accepted);
        assert_eq!(s.totals(), LedgerTotals::default());
    }

    #[test]
    fn deliver_requires_accepted_order() {
        let mut s = session();
        s.pick(&ItemId::new("apple")).unwrap();
        assert!(matches!(
            s.deliver("h1"),
            Err(SessionError::Order {
                source: OrderError::InvalidTransition { .. }
            })
        ));
        assert!(matches!(
            s.deliver("nope"),
            Err(SessionError::Order {
                source: OrderError::UnknownOrder { .. }
            })
        ));
        assert_eq!(s.carried().count("apple"), 1);
    }

    #[test]
    fn single_order_threshold_completes_and_emits_once() {
        let mut cfg = config();
        cfg.completion.orders_required = 1;
        let sink = Arc::new(RecordingSink::new());
        let catalog = OrderCatalog::from_json(CATALOG).unwrap();
        let mut s = GameSession::new(&cfg, catalog, sink.clone()).unwrap();
        accept_h1(&mut s);
        s.pick(&ItemId::new("apple")).unwrap();
        s.deliver("h1").unwrap();

        assert!(s.is_completed());
        let report = s.tick(0.1);
        assert!(report.completed);
        assert!(!report.newly_completed);
        assert_eq!(sink.count("completion_reached"), 1);
    }

    #[test]
    fn summary_reflects_completed_orders() {
        let mut s = session();
        accept_h1(&mut s);
        s.pick(&ItemId::new("apple")).unwrap();
        s.pick(&ItemId::new("apple")).unwrap();
        s.pick(&ItemId::new("basil")).unwrap();
        s.deliver("h1").unwrap();

        let summary = s.summary().unwrap();
        assert_eq!(summary.session_id, s.id());
        assert_eq!(summary.orders_completed, 1);
        assert_eq!(summary.items_delivered, 3);
        assert_eq!(summary.total_score, 50);
        let score = summary.order_scores.first().unwrap();
        assert!(score.is_full);
    }

    #[test]
    fn elapsed_ignores_bad_dt() {
        let mut s = session();
        let _ = s.tick(1.5);
        let _ = s.tick(-3.0);
        let _ = s.tick(f64::NAN);
        assert_eq!(s.elapsed(), 1.5);
    }

    #[test]
    fn session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<GameSession>();
    }
}

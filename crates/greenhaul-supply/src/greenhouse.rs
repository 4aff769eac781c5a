//! The greenhouse: per-item plant stock that grows on a randomized clock.
//!
//! Growth runs in discrete events. A clock accumulates elapsed time, and
//! once it reaches the current interval a growth event fires, the interval
//! is re-rolled uniformly from `[grow_time_min, grow_time_max]`, and the
//! clock restarts at zero.
//!
//! A growth event picks up to `grow_amount` distinct items that are below
//! `inventory_max` and adds exactly one unit to each. Items at the ceiling
//! never grow, so `0 <= stock <= inventory_max` holds for every item at all
//! times.

use std::collections::BTreeMap;

use greenhaul_events::{GameEvent, SharedSink};
use greenhaul_types::ItemId;
use rand::Rng;

use crate::config::SupplyConfig;
use crate::error::SupplyError;

/// Bounded, randomly replenished plant stock.
#[derive(Debug)]
pub struct SupplyGrowthSimulator {
    /// Units on hand per item. Every stocked item has an entry.
    stock: BTreeMap<ItemId, u32>,

    /// Per-item ceiling.
    inventory_max: u32,

    /// Distinct items grown per event.
    grow_amount: u32,

    /// Interval lower bound in seconds.
    grow_time_min: f64,

    /// Interval upper bound in seconds.
    grow_time_max: f64,

    /// Seconds accumulated toward the next growth event.
    clock: f64,

    /// Seconds between the previous growth event and the next one.
    next_interval: f64,

    /// Where growth and stock events are reported.
    sink: SharedSink,
}

impl SupplyGrowthSimulator {
    /// Create a greenhouse stocking `items`, each at `initial_amount`.
    ///
    /// The first growth interval is rolled immediately from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyError::InvalidConfig`] if the configuration fails
    /// validation, or [`SupplyError::NoItems`] if `items` is empty.
    pub fn new(
        items: impl IntoIterator<Item = ItemId>,
        config: &SupplyConfig,
        rng: &mut impl Rng,
        sink: SharedSink,
    ) -> Result<Self, SupplyError> {
        config.validate()?;

        let stock: BTreeMap<ItemId, u32> = items
            .into_iter()
            .map(|item| (item, config.initial_amount))
            .collect();
        if stock.is_empty() {
            return Err(SupplyError::NoItems);
        }

        let mut simulator = Self {
            stock,
            inventory_max: config.inventory_max,
            grow_amount: config.grow_amount,
            grow_time_min: config.grow_time_min,
            grow_time_max: config.grow_time_max,
            clock: 0.0,
            next_interval: 0.0,
            sink,
        };
        simulator.roll_next_interval(rng);
        Ok(simulator)
    }

    /// Advance the growth clock by `dt` seconds.
    ///
    /// Returns `None` if no growth event fired this tick, otherwise the
    /// items that grew (empty when every item was already at the ceiling).
    /// Negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, dt: f64, rng: &mut impl Rng) -> Option<Vec<ItemId>> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += dt;

        if self.clock < self.next_interval {
            return None;
        }

        let grown = self.grow(rng);
        self.roll_next_interval(rng);
        if !grown.is_empty() {
            self.sink.emit(&GameEvent::SupplyGrew {
                items: grown.clone(),
                next_growth_in: self.next_interval,
            });
        }
        Some(grown)
    }

    /// Run one growth event now, without touching the clock.
    ///
    /// Picks `min(grow_amount, growable)` distinct items uniformly at random
    /// from those below the ceiling and adds one unit to each. Returns the
    /// items that grew, in selection order.
    pub fn grow(&mut self, rng: &mut impl Rng) -> Vec<ItemId> {
        let mut growable: Vec<ItemId> = self
            .stock
            .iter()
            .filter(|(_, count)| **count < self.inventory_max)
            .map(|(item, _)| item.clone())
            .collect();

        if growable.is_empty() {
            self.sink.emit(&GameEvent::SupplySaturated);
            return Vec::new();
        }

        let pool_len = growable.len();
        let grow_count = usize::try_from(self.grow_amount)
            .unwrap_or(usize::MAX)
            .min(pool_len);

        // Partial Fisher-Yates: the first `grow_count` slots become the sample.
        for i in 0..grow_count {
            let j = rng.random_range(i..pool_len);
            growable.swap(i, j);
        }
        growable.truncate(grow_count);

        for item in &growable {
            if let Some(count) = self.stock.get_mut(item) {
                // Below the ceiling by construction of `growable`.
                *count = count.saturating_add(1).min(self.inventory_max);
            }
        }
        growable
    }

    /// Take one unit of `item_id`.
    ///
    /// Returns `false` (and changes nothing) if the item is out of stock or
    /// not stocked by this greenhouse.
    pub fn take(&mut self, item_id: &ItemId) -> bool {
        let Some(count) = self.stock.get_mut(item_id) else {
            return false;
        };
        let Some(remaining) = count.checked_sub(1) else {
            return false;
        };
        *count = remaining;
        self.sink.emit(&GameEvent::StockTaken {
            item_id: item_id.clone(),
            remaining,
        });
        true
    }

    /// Put one unit of `item_id` back.
    ///
    /// An item the greenhouse does not stock yet gets an entry and joins the
    /// growth set. Returns `false` (and changes nothing) if the item is
    /// already at the ceiling.
    pub fn return_item(&mut self, item_id: &ItemId) -> bool {
        let current = self.stock(item_id.as_str());
        if current >= self.inventory_max {
            self.sink.emit(&GameEvent::StockReturnRefused {
                item_id: item_id.clone(),
            });
            return false;
        }
        // Below the ceiling, so this cannot overflow.
        let stock = current.saturating_add(1);
        self.stock.insert(item_id.clone(), stock);
        self.sink.emit(&GameEvent::StockReturned {
            item_id: item_id.clone(),
            stock,
        });
        true
    }

    /// Units of `item_id` on hand. Unknown items have zero stock.
    pub fn stock(&self, item_id: &str) -> u32 {
        self.stock.get(item_id).copied().unwrap_or(0)
    }

    /// Whether at least one unit of `item_id` can be taken.
    pub fn can_take(&self, item_id: &str) -> bool {
        self.stock(item_id) > 0
    }

    /// Total units across all items.
    pub fn total_stock(&self) -> u64 {
        self.stock.values().map(|&count| u64::from(count)).sum()
    }

    /// Copy of the whole stock table, for display.
    pub fn snapshot(&self) -> BTreeMap<ItemId, u32> {
        self.stock.clone()
    }

    /// Stocked items, in key order.
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.stock.keys()
    }

    /// Per-item ceiling.
    pub const fn inventory_max(&self) -> u32 {
        self.inventory_max
    }

    /// Seconds accumulated toward the next growth event.
    pub const fn clock(&self) -> f64 {
        self.clock
    }

    /// Length of the current growth interval in seconds.
    pub const fn next_interval(&self) -> f64 {
        self.next_interval
    }

    /// Roll a new interval and restart the clock.
    fn roll_next_interval(&mut self, rng: &mut impl Rng) {
        self.next_interval = if self.grow_time_max > self.grow_time_min {
            rng.random_range(self.grow_time_min..=self.grow_time_max)
        } else {
            self.grow_time_min
        };
        self.clock = 0.0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::sync::Arc;

    use greenhaul_events::{NullSink, RecordingSink};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn items(names: &[&str]) -> Vec<ItemId> {
        names.iter().map(|n| ItemId::new(*n)).collect()
    }

    fn make(names: &[&str], config: &SupplyConfig, rng: &mut SmallRng) -> SupplyGrowthSimulator {
        SupplyGrowthSimulator::new(items(names), config, rng, Arc::new(NullSink)).unwrap()
    }

    #[test]
    fn starts_with_initial_amount_everywhere() {
        let mut rng = SmallRng::seed_from_u64(42);
        let cfg = SupplyConfig {
            initial_amount: 2,
            ..SupplyConfig::default()
        };
        let sim = make(&["apple", "basil", "fern"], &cfg, &mut rng);
        assert_eq!(sim.stock("apple"), 2);
        assert_eq!(sim.stock("fern"), 2);
        assert_eq!(sim.total_stock(), 6);
        assert!(sim.next_interval() >= 30.0 && sim.next_interval() <= 60.0);
    }

    #[test]
    fn rejects_empty_item_list() {
        let mut rng = SmallRng::seed_from_u64(1);
        let result = SupplyGrowthSimulator::new(
            Vec::new(),
            &SupplyConfig::default(),
            &mut rng,
            Arc::new(NullSink),
        );
        assert!(matches!(result, Err(SupplyError::NoItems)));
    }

    #[test]
    fn no_growth_before_interval_elapses() {
        let mut rng = SmallRng::seed_from_u64(7);
        let cfg = SupplyConfig {
            grow_time_min: 10.0,
            grow_time_max: 10.0,
            ..SupplyConfig::default()
        };
        let mut sim = make(&["apple"], &cfg, &mut rng);
        assert!(sim.tick(9.5, &mut rng).is_none());
        assert_eq!(sim.stock("apple"), 1);
        assert_eq!(sim.clock(), 9.5);
    }

    #[test]
    fn growth_event_fires_and_resets_clock() {
        let mut rng = SmallRng::seed_from_u64(7);
        let cfg = SupplyConfig {
            grow_time_min: 10.0,
            grow_time_max: 10.0,
            grow_amount: 1,
            ..SupplyConfig::default()
        };
        let mut sim = make(&["apple"], &cfg, &mut rng);
        let grown = sim.tick(10.0, &mut rng).unwrap();
        assert_eq!(grown, items(&["apple"]));
        assert_eq!(sim.stock("apple"), 2);
        assert_eq!(sim.clock(), 0.0);
    }

    #[test]
    fn growth_picks_distinct_items_and_adds_one_each() {
        let mut rng = SmallRng::seed_from_u64(99);
        let cfg = SupplyConfig {
            initial_amount: 0,
            grow_amount: 3,
            ..SupplyConfig::default()
        };
        let mut sim = make(&["a", "b", "c", "d", "e"], &cfg, &mut rng);
        let grown = sim.grow(&mut rng);
        assert_eq!(grown.len(), 3);

        let mut unique = grown.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);
        assert_eq!(sim.total_stock(), 3);
        for item in &grown {
            assert_eq!(sim.stock(item.as_str()), 1);
        }
    }

    #[test]
    fn grow_amount_larger_than_growable_set() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cfg = SupplyConfig {
            initial_amount: 7,
            inventory_max: 7,
            grow_amount: 5,
            ..SupplyConfig::default()
        };
        let mut sim = make(&["a", "b", "c"], &cfg, &mut rng);
        assert!(sim.take(&ItemId::new("b")));
        let grown = sim.grow(&mut rng);
        assert_eq!(grown, items(&["b"]));
        assert_eq!(sim.stock("b"), 7);
    }

    #[test]
    fn saturated_greenhouse_does_not_change() {
        let mut rng = SmallRng::seed_from_u64(5);
        let cfg = SupplyConfig {
            initial_amount: 7,
            inventory_max: 7,
            grow_time_min: 1.0,
            grow_time_max: 1.0,
            ..SupplyConfig::default()
        };
        let sink = Arc::new(RecordingSink::new());
        let mut sim =
            SupplyGrowthSimulator::new(items(&["apple", "basil"]), &cfg, &mut rng, sink.clone())
                .unwrap();
        let before = sim.snapshot();

        let grown = sim.tick(1.0, &mut rng);
        assert_eq!(grown, Some(Vec::new()));
        assert_eq!(sim.snapshot(), before);
        assert_eq!(sink.count("supply_saturated"), 1);
        assert_eq!(sink.count("supply_grew"), 0);
    }

    #[test]
    fn stock_never_exceeds_ceiling_over_long_run() {
        let mut rng = SmallRng::seed_from_u64(2024);
        let cfg = SupplyConfig {
            initial_amount: 0,
            inventory_max: 4,
            grow_amount: 2,
            grow_time_min: 0.5,
            grow_time_max: 1.5,
            ..SupplyConfig::default()
        };
        let mut sim = make(&["a", "b", "c"], &cfg, &mut rng);
        for _ in 0..2_000 {
            let _ = sim.tick(0.25, &mut rng);
            for item in ["a", "b", "c"] {
                assert!(sim.stock(item) <= 4);
            }
        }
        assert_eq!(sim.total_stock(), 12);
    }

    #[test]
    fn take_until_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sim = make(&["apple"], &SupplyConfig::default(), &mut rng);
        let apple = ItemId::new("apple");
        assert!(sim.can_take("apple"));
        assert!(sim.take(&apple));
        assert!(!sim.can_take("apple"));
        assert!(!sim.take(&apple));
        assert_eq!(sim.stock("apple"), 0);
    }

    #[test]
    fn return_refused_at_ceiling() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cfg = SupplyConfig {
            initial_amount: 6,
            inventory_max: 7,
            ..SupplyConfig::default()
        };
        let mut sim = make(&["apple"], &cfg, &mut rng);
        let apple = ItemId::new("apple");
        assert!(sim.return_item(&apple));
        assert_eq!(sim.stock("apple"), 7);
        assert!(!sim.return_item(&apple));
        assert_eq!(sim.stock("apple"), 7);
    }

    #[test]
    fn unknown_item_cannot_be_taken() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sim = make(&["apple"], &SupplyConfig::default(), &mut rng);
        let rose = ItemId::new("rose");
        assert!(!sim.take(&rose));
        assert_eq!(sim.stock("rose"), 0);
        assert_eq!(sim.items().count(), 1);
    }

    #[test]
    fn returning_unknown_item_stocks_it() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cfg = SupplyConfig {
            initial_amount: 7,
            grow_time_min: 1.0,
            grow_time_max: 1.0,
            ..SupplyConfig::default()
        };
        let mut sim = make(&["apple"], &cfg, &mut rng);
        let rose = ItemId::new("rose");
        assert!(sim.return_item(&rose));
        assert_eq!(sim.stock("rose"), 1);
        assert!(sim.take(&rose));
        assert_eq!(sim.stock("rose"), 0);

        // Apple is full, so the next growth event can only grow the rose.
        assert_eq!(sim.tick(1.0, &mut rng), Some(vec![rose]));
        assert_eq!(sim.stock("rose"), 1);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sim = make(&["apple"], &SupplyConfig::default(), &mut rng);
        assert!(sim.tick(-5.0, &mut rng).is_none());
        assert!(sim.tick(f64::NAN, &mut rng).is_none());
        assert_eq!(sim.clock(), 0.0);
    }

    #[test]
    fn same_seed_same_growth() {
        let cfg = SupplyConfig {
            initial_amount: 0,
            grow_amount: 2,
            ..SupplyConfig::default()
        };
        let names = ["a", "b", "c", "d", "e", "f"];
        let mut rng_a = SmallRng::seed_from_u64(11);
        let mut rng_b = SmallRng::seed_from_u64(11);
        let mut sim_a = make(&names, &cfg, &mut rng_a);
        let mut sim_b = make(&names, &cfg, &mut rng_b);
        for _ in 0..50 {
            assert_eq!(sim_a.tick(5.0, &mut rng_a), sim_b.tick(5.0, &mut rng_b));
        }
    }
}

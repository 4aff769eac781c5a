//! The player's carried plants.
//!
//! The player carries plants subject to a capacity limit across all items
//! (`carry_capacity`). Adding checks the limit; removing checks the held
//! quantity. Entries that reach zero are dropped, so the map only ever holds
//! positive counts.

use std::collections::BTreeMap;

use greenhaul_ledger::LedgerError;
use greenhaul_types::{ItemId, Settlement};

/// Errors from carried inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Adding would exceed the carry capacity.
    #[error("cannot carry {attempted} more {item_id}: load {current_load}/{capacity}")]
    OverCapacity {
        /// The item being added.
        item_id: ItemId,
        /// Units being added.
        attempted: u32,
        /// Units carried before the attempt.
        current_load: u32,
        /// Maximum units carried.
        capacity: u32,
    },

    /// Removing more than is carried.
    #[error("cannot remove {requested} {item_id}: only {available} carried")]
    Insufficient {
        /// The item being removed.
        item_id: ItemId,
        /// Units requested.
        requested: u32,
        /// Units carried.
        available: u32,
    },
}

/// Plants carried by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarriedInventory {
    items: BTreeMap<ItemId, u32>,
    capacity: u32,
}

impl CarriedInventory {
    /// Create an empty inventory holding at most `capacity` plants.
    pub const fn new(capacity: u32) -> Self {
        Self {
            items: BTreeMap::new(),
            capacity,
        }
    }

    /// Total plants carried.
    ///
    /// Bounded by the capacity, so the sum cannot overflow.
    pub fn total(&self) -> u32 {
        self.items
            .values()
            .fold(0_u32, |acc, &count| acc.saturating_add(count))
    }

    /// Units of `item_id` carried.
    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    /// Whether `amount` more plants fit.
    pub fn can_pick(&self, amount: u32) -> bool {
        self.total()
            .checked_add(amount)
            .is_some_and(|load| load <= self.capacity)
    }

    /// Free slots left.
    pub fn free_space(&self) -> u32 {
        self.capacity.saturating_sub(self.total())
    }

    /// Maximum plants carried.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The carried counts, for settlement.
    pub const fn as_map(&self) -> &BTreeMap<ItemId, u32> {
        &self.items
    }

    /// Add `amount` units of `item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::OverCapacity`] if the new load would exceed
    /// the capacity. Nothing changes in that case.
    pub fn add(&mut self, item_id: &ItemId, amount: u32) -> Result<(), InventoryError> {
        let current_load = self.total();
        let over = || InventoryError::OverCapacity {
            item_id: item_id.clone(),
            attempted: amount,
            current_load,
            capacity: self.capacity,
        };
        let new_load = current_load.checked_add(amount).ok_or_else(over)?;
        if new_load > self.capacity {
            return Err(over());
        }

        let entry = self.items.entry(item_id.clone()).or_insert(0);
        // Bounded by new_load, which fits in u32.
        *entry = entry.saturating_add(amount);
        if *entry == 0 {
            self.items.remove(item_id);
        }
        Ok(())
    }

    /// Remove `amount` units of `item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Insufficient`] if fewer than `amount` are
    /// carried. Nothing changes in that case.
    pub fn remove(&mut self, item_id: &ItemId, amount: u32) -> Result<(), InventoryError> {
        let available = self.count(item_id.as_str());
        let Some(remaining) = available.checked_sub(amount) else {
            return Err(InventoryError::Insufficient {
                item_id: item_id.clone(),
                requested: amount,
                available,
            });
        };

        if remaining == 0 {
            self.items.remove(item_id);
        } else {
            self.items.insert(item_id.clone(), remaining);
        }
        Ok(())
    }

    /// Remove what `settlement` delivers.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientCarried`] if the settlement was not
    /// computed against this inventory. Nothing changes in that case.
    pub fn apply_settlement(&mut self, settlement: &Settlement) -> Result<(), LedgerError> {
        greenhaul_ledger::apply_settlement(&mut self.items, settlement)
    }
}

//! Settlement arithmetic: what a delivery hands over and what it earns.
//!
//! [`settle`] is pure. It never checks carry capacity (delivery only removes
//! items) and never mutates the inventory; [`apply_settlement`] performs the
//! decrement once the caller has decided to go ahead.

use std::collections::BTreeMap;

use greenhaul_types::{ItemId, OrderRecord, Settlement};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Points awarded per delivery. Mirrors the `scoring` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Points per delivered unit.
    #[serde(default = "default_points_per_item")]
    pub points_per_item: u32,

    /// Extra points when every requested line is fully satisfied.
    #[serde(default = "default_full_order_bonus")]
    pub full_order_bonus: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            points_per_item: default_points_per_item(),
            full_order_bonus: default_full_order_bonus(),
        }
    }
}

const fn default_points_per_item() -> u32 {
    10
}

const fn default_full_order_bonus() -> u32 {
    20
}

/// Compute the settlement of `order` against the `carried` items.
///
/// Request lines naming the same item are summed first, so
/// `deliverable[item] = min(requested[item], carried[item])`. The result is
/// `eligible` when at least one unit can be delivered and `is_full` when the
/// delivered total equals the requested total.
///
/// # Errors
///
/// Returns [`LedgerError::Overflow`] if a quantity sum or the score exceeds
/// its integer range.
pub fn settle(
    order: &OrderRecord,
    carried: &BTreeMap<ItemId, u32>,
    rules: ScoringRules,
) -> Result<Settlement, LedgerError> {
    let requested = order
        .requested_by_item()
        .ok_or(LedgerError::Overflow("requested quantities"))?;

    let mut deliverable = BTreeMap::new();
    let mut total_deliverable: u32 = 0;
    let mut total_requested: u32 = 0;
    for (item_id, &wanted) in &requested {
        let have = carried.get(item_id).copied().unwrap_or(0);
        let give = wanted.min(have);
        total_requested = total_requested
            .checked_add(wanted)
            .ok_or(LedgerError::Overflow("total requested"))?;
        total_deliverable = total_deliverable
            .checked_add(give)
            .ok_or(LedgerError::Overflow("total deliverable"))?;
        deliverable.insert(item_id.clone(), give);
    }

    let eligible = total_deliverable > 0;
    let is_full = total_deliverable == total_requested;

    let base = u64::from(total_deliverable)
        .checked_mul(u64::from(rules.points_per_item))
        .ok_or(LedgerError::Overflow("score"))?;
    let bonus = if is_full {
        u64::from(rules.full_order_bonus)
    } else {
        0
    };
    let score = base
        .checked_add(bonus)
        .ok_or(LedgerError::Overflow("score"))?;

    Ok(Settlement {
        order_id: order.order_id.clone(),
        deliverable,
        total_deliverable,
        total_requested,
        eligible,
        is_full,
        score,
    })
}

/// Remove the delivered units from `carried`.
///
/// Entries that drop to zero are removed. Either every line is applied or
/// none is.
///
/// # Errors
///
/// Returns [`LedgerError::InsufficientCarried`] if any line removes more
/// than is carried.
pub fn apply_settlement(
    carried: &mut BTreeMap<ItemId, u32>,
    settlement: &Settlement,
) -> Result<(), LedgerError> {
    for (item_id, &give) in &settlement.deliverable {
        let have = carried.get(item_id).copied().unwrap_or(0);
        if have < give {
            return Err(LedgerError::InsufficientCarried {
                item_id: item_id.clone(),
                carried: have,
                required: give,
            });
        }
    }

    for (item_id, &give) in &settlement.deliverable {
        if give == 0 {
            continue;
        }
        if let Some(count) = carried.get_mut(item_id) {
            *count = count.saturating_sub(give);
            if *count == 0 {
                carried.remove(item_id);
            }
        }
    }
    Ok(())
}

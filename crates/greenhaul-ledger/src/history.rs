//! Score history: per-order scores, per-map summaries and campaign totals.
//!
//! An [`OrderScore`] is built from a completed order and the settlement
//! that completed it, so it records what was actually delivered rather
//! than what was requested. A [`SessionSummary`] gathers the scores of one
//! map; a [`Campaign`] accumulates summaries across maps.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use greenhaul_types::{ItemId, LocationKey, OrderId, OrderRecord, SessionId, Settlement};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// One delivered item line of a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredItem {
    /// The item.
    pub item_id: ItemId,
    /// Display names keyed by locale, taken from the order's request.
    pub names: BTreeMap<String, String>,
    /// Units delivered.
    pub amount: u32,
}

/// Score data for a single completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderScore {
    /// The order.
    pub order_id: OrderId,
    /// Its customer location.
    pub location: LocationKey,
    /// Units delivered.
    pub items_delivered: u32,
    /// Units requested.
    pub items_requested: u32,
    /// Whether the delivery satisfied every line.
    pub is_full: bool,
    /// Points earned.
    pub score: u64,
    /// Delivered lines with a non-zero amount, in item order.
    pub delivered: Vec<DeliveredItem>,
}

impl OrderScore {
    /// Build the score of `record` as completed by `settlement`.
    pub fn from_settlement(record: &OrderRecord, settlement: &Settlement) -> Self {
        let delivered = settlement
            .deliverable
            .iter()
            .filter(|&(_, &amount)| amount > 0)
            .map(|(item_id, &amount)| DeliveredItem {
                item_id: item_id.clone(),
                names: record
                    .requests
                    .iter()
                    .find(|r| &r.item_id == item_id)
                    .map(|r| r.names.clone())
                    .unwrap_or_default(),
                amount,
            })
            .collect();

        Self {
            order_id: record.order_id.clone(),
            location: record.location.clone(),
            items_delivered: settlement.total_deliverable,
            items_requested: settlement.total_requested,
            is_full: settlement.is_full,
            score: settlement.score,
            delivered,
        }
    }
}

/// The score of one map run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The session that produced these scores.
    pub session_id: SessionId,
    /// Display name of the map.
    pub map_name: String,
    /// Orders completed.
    pub orders_completed: u32,
    /// Units delivered.
    pub items_delivered: u64,
    /// Points earned.
    pub total_score: u64,
    /// Per-order scores, in completion order.
    pub order_scores: Vec<OrderScore>,
}

impl SessionSummary {
    /// Summarize `order_scores` for the map `map_name`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if a total exceeds its range.
    pub fn new(
        session_id: SessionId,
        map_name: impl Into<String>,
        order_scores: Vec<OrderScore>,
    ) -> Result<Self, LedgerError> {
        let orders_completed = u32::try_from(order_scores.len())
            .map_err(|_too_many| LedgerError::Overflow("orders completed"))?;
        let mut items_delivered: u64 = 0;
        let mut total_score: u64 = 0;
        for score in &order_scores {
            items_delivered = items_delivered
                .checked_add(u64::from(score.items_delivered))
                .ok_or(LedgerError::Overflow("items delivered"))?;
            total_score = total_score
                .checked_add(score.score)
                .ok_or(LedgerError::Overflow("total score"))?;
        }
        Ok(Self {
            session_id,
            map_name: map_name.into(),
            orders_completed,
            items_delivered,
            total_score,
            order_scores,
        })
    }

    /// Plain-text summary, one line per order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.map_name);
        let _ = writeln!(out, "  Orders: {}", self.orders_completed);
        let _ = writeln!(out, "  Items: {}", self.items_delivered);
        let _ = writeln!(out, "  Score: {}", self.total_score);
        let _ = write!(out, "  Deliveries:");
        for order in &self.order_scores {
            let kind = if order.is_full { "FULL" } else { "PARTIAL" };
            let _ = write!(
                out,
                "\n    {}: {} items, +{} ({kind})",
                order.location, order.items_delivered, order.score
            );
        }
        out
    }
}

/// Running per-item delivery total across a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTotal {
    /// Display names from the first delivery of the item.
    pub names: BTreeMap<String, String>,
    /// Units delivered across all maps.
    pub delivered: u64,
}

/// Scores accumulated over several maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    maps: Vec<SessionSummary>,
    item_totals: BTreeMap<ItemId, ItemTotal>,
}

impl Campaign {
    /// Create an empty campaign.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished map.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if an item total would overflow.
    /// The campaign is unchanged in that case.
    pub fn add(&mut self, summary: SessionSummary) -> Result<(), LedgerError> {
        let mut totals = self.item_totals.clone();
        for line in summary.order_scores.iter().flat_map(|o| &o.delivered) {
            let entry = totals
                .entry(line.item_id.clone())
                .or_insert_with(|| ItemTotal {
                    names: line.names.clone(),
                    delivered: 0,
                });
            entry.delivered = entry
                .delivered
                .checked_add(u64::from(line.amount))
                .ok_or(LedgerError::Overflow("item total"))?;
        }
        self.item_totals = totals;
        self.maps.push(summary);
        Ok(())
    }

    /// Forget every map.
    pub fn reset(&mut self) {
        self.maps.clear();
        self.item_totals.clear();
    }

    /// Finished maps, in the order they were added.
    pub fn maps(&self) -> &[SessionSummary] {
        &self.maps
    }

    /// Number of finished maps.
    pub fn maps_completed(&self) -> usize {
        self.maps.len()
    }

    /// Orders completed across all maps.
    pub fn total_orders(&self) -> u64 {
        self.maps
            .iter()
            .fold(0_u64, |acc, m| acc.saturating_add(u64::from(m.orders_completed)))
    }

    /// Units delivered across all maps.
    pub fn total_items(&self) -> u64 {
        self.maps
            .iter()
            .fold(0_u64, |acc, m| acc.saturating_add(m.items_delivered))
    }

    /// Points earned across all maps.
    pub fn total_score(&self) -> u64 {
        self.maps
            .iter()
            .fold(0_u64, |acc, m| acc.saturating_add(m.total_score))
    }

    /// Delivered units per item across all maps.
    pub fn item_totals(&self) -> &BTreeMap<ItemId, ItemTotal> {
        &self.item_totals
    }

    /// Text summary of the map at `index` (zero-based), if it exists.
    pub fn map_summary(&self, index: usize) -> Option<String> {
        self.maps.get(index).map(SessionSummary::text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use greenhaul_types::PlantRequest;

    use super::*;

    fn completed(id: &str, location: &str, delivered: &[(&str, u32)], full: bool) -> OrderScore {
        let mut apple = PlantRequest::new("apple", 2);
        apple.names.insert("en".to_owned(), "Apple".to_owned());
        let record = OrderRecord::new(id, location, vec![apple, PlantRequest::new("basil", 1)], 4.0);

        let deliverable: BTreeMap<ItemId, u32> = delivered
            .iter()
            .map(|&(item, n)| (ItemId::new(item), n))
            .collect();
        let total: u32 = deliverable.values().sum();
        let settlement = Settlement {
            order_id: OrderId::new(id),
            deliverable,
            total_deliverable: total,
            total_requested: 3,
            eligible: total > 0,
            is_full: full,
            score: u64::from(total) * 10 + if full { 20 } else { 0 },
        };
        OrderScore::from_settlement(&record, &settlement)
    }

    #[test]
    fn order_score_records_actual_delivery() {
        let score = completed("o1", "Harbor", &[("apple", 1), ("basil", 0)], false);
        assert_eq!(score.items_delivered, 1);
        assert_eq!(score.items_requested, 3);
        assert!(!score.is_full);
        assert_eq!(score.delivered.len(), 1);

        let line = score.delivered.first().unwrap();
        assert_eq!(line.item_id.as_str(), "apple");
        assert_eq!(line.names.get("en").map(String::as_str), Some("Apple"));
    }

    #[test]
    fn summary_totals_and_text() {
        let scores = vec![
            completed("o1", "Harbor", &[("apple", 2), ("basil", 1)], true),
            completed("o2", "Mill", &[("apple", 1)], false),
        ];
        let summary = SessionSummary::new(SessionId::new(), "Map 1", scores).unwrap();
        assert_eq!(summary.orders_completed, 2);
        assert_eq!(summary.items_delivered, 4);
        assert_eq!(summary.total_score, 50 + 10);

        let text = summary.text();
        assert!(text.starts_with("Map 1\n"));
        assert!(text.contains("  Score: 60"));
        assert!(text.contains("    Harbor: 3 items, +50 (FULL)"));
        assert!(text.contains("    Mill: 1 items, +10 (PARTIAL)"));
    }

    #[test]
    fn campaign_accumulates_maps_and_items() {
        let mut campaign = Campaign::new();
        let first = SessionSummary::new(
            SessionId::new(),
            "Map 1",
            vec![completed("o1", "Harbor", &[("apple", 2), ("basil", 1)], true)],
        )
        .unwrap();
        let second = SessionSummary::new(
            SessionId::new(),
            "Map 2",
            vec![completed("o9", "Mill", &[("apple", 1)], false)],
        )
        .unwrap();
        campaign.add(first).unwrap();
        campaign.add(second).unwrap();

        assert_eq!(campaign.maps_completed(), 2);
        assert_eq!(campaign.total_orders(), 2);
        assert_eq!(campaign.total_items(), 4);
        assert_eq!(campaign.total_score(), 60);

        let apple = campaign.item_totals().get("apple").unwrap();
        assert_eq!(apple.delivered, 3);
        assert_eq!(apple.names.get("en").map(String::as_str), Some("Apple"));
        assert_eq!(campaign.item_totals().get("basil").unwrap().delivered, 1);

        assert!(campaign.map_summary(1).unwrap().starts_with("Map 2"));
        assert!(campaign.map_summary(2).is_none());

        campaign.reset();
        assert_eq!(campaign.maps_completed(), 0);
        assert!(campaign.item_totals().is_empty());
    }

    #[test]
    fn summary_round_trips_through_json() {
        let summary = SessionSummary::new(
            SessionId::new(),
            "Map 1",
            vec![completed("o1", "Harbor", &[("apple", 2)], false)],
        )
        .unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        let back: SessionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}

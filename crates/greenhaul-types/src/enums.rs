//! Enumeration types for the Greenhaul simulation.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a customer order.
///
/// ```text
/// AVAILABLE --batch--> INCOMING --delay--> VISIBLE --accept--> ACCEPTED --settle--> COMPLETED
///     ^                                        |
///     +---------------- accept window expires -+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// In the pool, eligible for a future batch.
    Available,
    /// Released in a batch, waiting out its visibility delay.
    Incoming,
    /// Shown to the player; can be accepted until the accept window runs out.
    Visible,
    /// Accepted by the player and awaiting delivery.
    Accepted,
    /// Delivered and settled. Terminal.
    Completed,
}

impl OrderState {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Available,
        Self::Incoming,
        Self::Visible,
        Self::Accepted,
        Self::Completed,
    ];

    /// Whether a countdown timer runs while the order is in this state.
    pub const fn is_timed(self) -> bool {
        matches!(self, Self::Incoming | Self::Visible)
    }

    /// Lowercase name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Incoming => "incoming",
            Self::Visible => "visible",
            Self::Accepted => "accepted",
            Self::Completed => "completed",
        }
    }
}

impl core::fmt::Display for OrderState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_incoming_and_visible_are_timed() {
        let timed: Vec<OrderState> = OrderState::ALL
            .iter()
            .copied()
            .filter(|s| s.is_timed())
            .collect();
        assert_eq!(timed, vec![OrderState::Incoming, OrderState::Visible]);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&OrderState::Visible).ok();
        assert_eq!(json.as_deref(), Some("\"visible\""));
    }
}

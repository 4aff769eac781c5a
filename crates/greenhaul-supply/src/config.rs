//! Greenhouse supply configuration.
//!
//! Mirrors the `supply` section of `greenhaul-config.yaml`. Defaults match
//! the shipped maps: one plant of each kind at start, three plants grow
//! every 30 to 60 seconds, at most seven of a kind.

use greenhaul_types::ItemId;
use serde::Deserialize;

use crate::error::SupplyError;

/// Tunables for the greenhouse growth process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplyConfig {
    /// Stock of every item when the session starts.
    #[serde(default = "default_initial_amount")]
    pub initial_amount: u32,

    /// How many distinct items grow by one unit per growth event.
    #[serde(default = "default_grow_amount")]
    pub grow_amount: u32,

    /// Shortest interval between growth events, in seconds.
    #[serde(default = "default_grow_time_min")]
    pub grow_time_min: f64,

    /// Longest interval between growth events, in seconds.
    #[serde(default = "default_grow_time_max")]
    pub grow_time_max: f64,

    /// Per-item stock ceiling.
    #[serde(default = "default_inventory_max")]
    pub inventory_max: u32,

    /// Plant species the greenhouse grows in addition to the ones orders
    /// ask for. Unrequested plants share the growth draws and can be picked.
    #[serde(default)]
    pub plants: Vec<ItemId>,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            initial_amount: default_initial_amount(),
            grow_amount: default_grow_amount(),
            grow_time_min: default_grow_time_min(),
            grow_time_max: default_grow_time_max(),
            inventory_max: default_inventory_max(),
            plants: Vec::new(),
        }
    }
}

impl SupplyConfig {
    /// Check that the configuration describes a usable growth process.
    ///
    /// # Errors
    ///
    /// Returns [`SupplyError::InvalidConfig`] if an interval bound is
    /// negative or not finite, if the bounds are inverted, or if the
    /// starting stock exceeds the ceiling.
    pub fn validate(&self) -> Result<(), SupplyError> {
        if !self.grow_time_min.is_finite() || self.grow_time_min < 0.0 {
            return Err(SupplyError::InvalidConfig {
                reason: format!(
                    "grow_time_min must be a non-negative number, got {}",
                    self.grow_time_min
                ),
            });
        }
        if !self.grow_time_max.is_finite() || self.grow_time_max < self.grow_time_min {
            return Err(SupplyError::InvalidConfig {
                reason: format!(
                    "grow_time_max ({}) must be a number no smaller than grow_time_min ({})",
                    self.grow_time_max, self.grow_time_min
                ),
            });
        }
        if self.initial_amount > self.inventory_max {
            return Err(SupplyError::InvalidConfig {
                reason: format!(
                    "initial_amount ({}) exceeds inventory_max ({})",
                    self.initial_amount, self.inventory_max
                ),
            });
        }
        Ok(())
    }
}

const fn default_initial_amount() -> u32 {
    1
}

const fn default_grow_amount() -> u32 {
    3
}

const fn default_grow_time_min() -> f64 {
    30.0
}

const fn default_grow_time_max() -> f64 {
    60.0
}

const fn default_inventory_max() -> u32 {
    7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SupplyConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_interval() {
        let cfg = SupplyConfig {
            grow_time_min: 10.0,
            grow_time_max: 5.0,
            ..SupplyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_negative_interval() {
        let cfg = SupplyConfig {
            grow_time_min: -1.0,
            ..SupplyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_initial_above_max() {
        let cfg = SupplyConfig {
            initial_amount: 8,
            inventory_max: 7,
            ..SupplyConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn fixed_interval_is_allowed() {
        let cfg = SupplyConfig {
            grow_time_min: 5.0,
            grow_time_max: 5.0,
            ..SupplyConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }
}

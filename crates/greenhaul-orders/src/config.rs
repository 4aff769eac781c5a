//! Order scheduling configuration.
//!
//! Mirrors the `orders` section of `greenhaul-config.yaml`.

use serde::Deserialize;

use crate::error::OrderError;

/// Timing and throttling parameters for batch release.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleConfig {
    /// Maximum number of orders released per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Seconds between a batch release and the next one.
    #[serde(default = "default_batch_delay")]
    pub batch_delay: f64,

    /// Seconds the player has to accept a visible order.
    #[serde(default = "default_accept_time")]
    pub accept_time: f64,

    /// No new batch is released while this many orders are accepted.
    #[serde(default = "default_active_order_limit")]
    pub active_order_limit: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay: default_batch_delay(),
            accept_time: default_accept_time(),
            active_order_limit: default_active_order_limit(),
        }
    }
}

impl ScheduleConfig {
    /// Check that the configuration can drive the scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidConfig`] if the batch size or the active
    /// order limit is zero, the batch delay is negative or not finite, or the
    /// accept window is not a positive finite number.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.batch_size == 0 {
            return Err(OrderError::InvalidConfig {
                reason: String::from("batch_size must be at least 1"),
            });
        }
        if self.active_order_limit == 0 {
            return Err(OrderError::InvalidConfig {
                reason: String::from("active_order_limit must be at least 1"),
            });
        }
        if !self.batch_delay.is_finite() || self.batch_delay < 0.0 {
            return Err(OrderError::InvalidConfig {
                reason: format!(
                    "batch_delay must be a non-negative number, got {}",
                    self.batch_delay
                ),
            });
        }
        if !self.accept_time.is_finite() || self.accept_time <= 0.0 {
            return Err(OrderError::InvalidConfig {
                reason: format!(
                    "accept_time must be a positive number, got {}",
                    self.accept_time
                ),
            });
        }
        Ok(())
    }
}

const fn default_batch_size() -> u32 {
    3
}

const fn default_batch_delay() -> f64 {
    10.0
}

const fn default_accept_time() -> f64 {
    15.0
}

const fn default_active_order_limit() -> u32 {
    6
}

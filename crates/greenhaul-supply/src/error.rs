//! Error types for the `greenhaul-supply` crate.

/// Errors that can occur when building a supply simulator.
///
/// Steady-state operations (`tick`, `take`, `return_item`) never fail; they
/// report boundary conditions through their return values.
#[derive(Debug, thiserror::Error)]
pub enum SupplyError {
    /// The supply configuration is unusable.
    #[error("invalid supply configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// No items were given to stock.
    #[error("greenhouse must stock at least one item")]
    NoItems,
}

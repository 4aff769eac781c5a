//! Error types for the `greenhaul-orders` crate.

use greenhaul_types::{OrderId, OrderState};

/// Errors returned by the order lifecycle scheduler.
///
/// Timer-driven transitions never fail; only explicit player operations
/// and scheduler setup can.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// The order exists but is not in the state the operation requires.
    #[error("order {order_id} is {actual}, expected {expected}")]
    InvalidTransition {
        /// The order the operation targeted.
        order_id: OrderId,
        /// The state the operation requires.
        expected: OrderState,
        /// The state the order is actually in.
        actual: OrderState,
    },

    /// No order with this identifier is known to the scheduler.
    #[error("unknown order: {order_id}")]
    UnknownOrder {
        /// The identifier that was looked up.
        order_id: OrderId,
    },

    /// An order with this identifier is already loaded.
    #[error("duplicate order: {order_id}")]
    DuplicateOrder {
        /// The repeated identifier.
        order_id: OrderId,
    },

    /// A settlement computed for one order was applied to another.
    #[error("settlement for {settlement_for} cannot complete order {order_id}")]
    SettlementMismatch {
        /// The order being completed.
        order_id: OrderId,
        /// The order the settlement was computed for.
        settlement_for: OrderId,
    },

    /// The schedule configuration is unusable.
    #[error("invalid schedule configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Errors that can occur when loading an order catalog or customer directory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to read a catalog file from disk.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The content is not valid JSON or has the wrong shape.
    #[error("failed to parse catalog JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// An order entry has no `order_id`.
    #[error("order without order_id at location {location}")]
    MissingOrderId {
        /// The location whose list contains the entry.
        location: String,
    },

    /// A plant entry names no item.
    #[error("order {order_id} has a plant entry without an item id")]
    MissingItem {
        /// The order containing the entry.
        order_id: OrderId,
    },

    /// An order requests no plants.
    #[error("order {order_id} requests no plants")]
    EmptyOrder {
        /// The empty order.
        order_id: OrderId,
    },

    /// A plant entry requests zero units.
    #[error("order {order_id} requests zero units of {item_id}")]
    ZeroAmount {
        /// The order containing the entry.
        order_id: OrderId,
        /// The item requested with amount zero.
        item_id: String,
    },

    /// An order's base delay is negative.
    #[error("order {order_id} has invalid base delay {value}")]
    InvalidDelay {
        /// The offending order.
        order_id: OrderId,
        /// The delay as written in the catalog.
        value: f64,
    },

    /// Two entries share an `order_id`.
    #[error("duplicate order_id in catalog: {order_id}")]
    DuplicateOrder {
        /// The repeated identifier.
        order_id: OrderId,
    },
}

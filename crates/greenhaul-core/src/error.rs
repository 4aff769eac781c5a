//! Error types for the `greenhaul-core` crate.

use greenhaul_ledger::LedgerError;
use greenhaul_orders::{LoadError, OrderError};
use greenhaul_supply::SupplyError;
use greenhaul_types::{ItemId, OrderId};

use crate::carried::InventoryError;
use crate::config::ConfigError;

/// Errors returned by [`GameSession`](crate::session::GameSession).
///
/// Every error is returned before the session changes state, so a failed
/// player action can simply be reported and ignored.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An order operation was rejected by the scheduler.
    #[error("order error: {source}")]
    Order {
        /// The underlying scheduler error.
        #[from]
        source: OrderError,
    },

    /// The greenhouse could not be built.
    #[error("supply error: {source}")]
    Supply {
        /// The underlying supply error.
        #[from]
        source: SupplyError,
    },

    /// Settlement or score accounting failed.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// The carried inventory rejected a change.
    #[error("inventory error: {source}")]
    Inventory {
        /// The underlying inventory error.
        #[from]
        source: InventoryError,
    },

    /// The order catalog could not be loaded.
    #[error("load error: {source}")]
    Load {
        /// The underlying load error.
        #[from]
        source: LoadError,
    },

    /// The configuration is unusable.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// Delivery attempted while carrying nothing the order asks for.
    #[error("nothing carried can be delivered to order {order_id}")]
    IneligibleDelivery {
        /// The order the player tried to deliver.
        order_id: OrderId,
    },

    /// The greenhouse has none of the item left.
    #[error("greenhouse is out of {item_id}")]
    OutOfStock {
        /// The requested item.
        item_id: ItemId,
    },

    /// The greenhouse will not take the item back.
    #[error("greenhouse cannot take back {item_id}")]
    ReturnRefused {
        /// The item being put back.
        item_id: ItemId,
    },
}

//! Shared type definitions for the Greenhaul delivery simulation.
//!
//! This crate is the single source of truth for the data that flows between
//! the order scheduler, the greenhouse supply simulator, and the settlement
//! ledger. It carries no behavior beyond small derived queries.
//!
//! # Modules
//!
//! - [`ids`] -- Strongly-typed keys for orders, items, locations and sessions
//! - [`enums`] -- The order lifecycle state enumeration
//! - [`structs`] -- Plant requests, order records and settlement results

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::OrderState;
pub use ids::{ItemId, LocationKey, OrderId, SessionId};
pub use structs::{OrderRecord, PlantRequest, Settlement};

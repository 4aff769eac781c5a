//! Session facade for the Greenhaul delivery simulation.
//!
//! This crate wires the order scheduler, the greenhouse and the score
//! ledger into a single [`GameSession`] that a host drives frame by frame.
//! It also owns the session configuration and the player's carried
//! inventory.
//!
//! # Modules
//!
//! - [`carried`] -- [`CarriedInventory`], capacity-limited player hands.
//! - [`config`] -- [`SessionConfig`] loaded from `greenhaul-config.yaml`.
//! - [`error`] -- [`SessionError`], the union of every failure.
//! - [`logging`] -- `tracing` subscriber installation.
//! - [`session`] -- [`GameSession`] and its per-tick report.
//!
//! [`CarriedInventory`]: carried::CarriedInventory
//! [`SessionConfig`]: config::SessionConfig
//! [`SessionError`]: error::SessionError
//! [`GameSession`]: session::GameSession

pub mod carried;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use carried::{CarriedInventory, InventoryError};
pub use config::{ConfigError, LoggingConfig, PlayerConfig, SessionConfig, SessionSection};
pub use error::SessionError;
pub use logging::LoggingError;
pub use session::{GameSession, SessionTick};

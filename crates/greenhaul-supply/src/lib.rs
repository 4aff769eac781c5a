//! Greenhouse supply for the Greenhaul simulation.
//!
//! The greenhouse holds a bounded stock of every plant item and replenishes
//! it in randomized growth events. It knows nothing about orders; the player
//! takes plants out and may put them back.
//!
//! # Modules
//!
//! - [`config`] -- [`SupplyConfig`], the growth tunables and their defaults.
//! - [`error`] -- Construction errors.
//! - [`greenhouse`] -- [`SupplyGrowthSimulator`]: stock, growth clock,
//!   take and return.
//!
//! [`SupplyConfig`]: config::SupplyConfig
//! [`SupplyGrowthSimulator`]: greenhouse::SupplyGrowthSimulator

pub mod config;
pub mod error;
pub mod greenhouse;

pub use config::SupplyConfig;
pub use error::SupplyError;
pub use greenhouse::SupplyGrowthSimulator;

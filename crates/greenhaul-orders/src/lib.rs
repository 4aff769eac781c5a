//! Order catalog loading and lifecycle scheduling for the Greenhaul simulation.
//!
//! Orders move through a five-state lifecycle:
//!
//! ```text
//! AVAILABLE --batch--> INCOMING --delay--> VISIBLE --accept--> ACCEPTED --settle--> COMPLETED
//! ```
//!
//! and a visible order that is not accepted in time falls back to AVAILABLE.
//!
//! # Modules
//!
//! - [`batch`] -- Location-diverse batch selection and delay rolling.
//! - [`catalog`] -- [`OrderCatalog`] and [`CustomerDirectory`] JSON loading.
//! - [`config`] -- [`ScheduleConfig`], batch timing and throttling.
//! - [`error`] -- [`OrderError`] and [`LoadError`].
//! - [`scheduler`] -- [`OrderLifecycleScheduler`], the per-order state
//!   machine and its tick loop.
//!
//! [`OrderCatalog`]: catalog::OrderCatalog
//! [`CustomerDirectory`]: catalog::CustomerDirectory
//! [`ScheduleConfig`]: config::ScheduleConfig
//! [`OrderError`]: error::OrderError
//! [`LoadError`]: error::LoadError
//! [`OrderLifecycleScheduler`]: scheduler::OrderLifecycleScheduler

pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod scheduler;

pub use catalog::{CustomerDirectory, OrderCatalog};
pub use config::ScheduleConfig;
pub use error::{LoadError, OrderError};
pub use scheduler::{CompletedOrder, OrderLifecycleScheduler, SchedulerTick};

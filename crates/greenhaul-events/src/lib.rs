//! Domain events and injectable sinks for the Greenhaul simulation.
//!
//! The scheduler, the supply simulator and the session facade report what
//! they do as [`GameEvent`] values handed to an [`EventSink`]. There is no
//! process-wide logger inside the core: the sink is passed in by whoever
//! builds the component, and [`TracingSink`] bridges events to `tracing`.

pub mod event;
pub mod sink;

pub use event::GameEvent;
pub use sink::{EventSink, NullSink, RecordingSink, SharedSink, TracingSink};

//! # State
//!
//! The event-driven state machine the rendering layer observes, plus the
//! pure filter pipeline it delegates to.

pub mod filter;
pub mod machine;

pub use filter::FilterCriteria;
pub use machine::{
    AppState, Event, LoadedState, TransactionStateMachine, WriteOperation,
};

//! Periodic scheduling

pub mod tick;

pub use tick::{CoordinatorTick, TickJob, TickLoop, TickLoopConfig};

//! Screen layout and the per-tick render cycle

pub mod cycle;
pub mod layout;

pub use cycle::{render, run_cycle, CycleOutcome};
pub use layout::Layout;

//! Plugin lifecycle state machine
//!
//! Explicit, finite and deterministic: the host drives it with activate and
//! deactivate events, and the controller consults it before every tick.

pub mod events;
pub mod machine;

pub use events::LifecycleEvent;
pub use machine::LifecycleState;

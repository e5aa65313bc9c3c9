//! Configuration types
//!
//! Plugin settings as written by the user, and the validated form the
//! lifecycle controller activates with.

pub mod activation;
pub mod types;

pub use activation::*;
pub use types::*;

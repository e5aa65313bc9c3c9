//! Value acquisition
//!
//! Sampling slots from the data source and normalising their values.

pub mod sampler;
pub mod transform;

pub use sampler::{parse_timestamp, sample, sample_all, RenderState, SlotSample};
pub use transform::{normalize, POSITION_PATH};

//! Cloud generation: the per-cycle geometry pipeline.

pub mod builder;

pub use builder::CloudBuilder;

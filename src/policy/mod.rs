//! Render policy definitions.

pub mod v1;
pub mod scoring;

pub use v1::{PolicyError, RenderPolicyV1};
pub use scoring::{depth_threshold, is_drawn, is_significant, visual_weight};

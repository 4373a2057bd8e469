//! Per-region presentation scores.

use super::v1::RenderPolicyV1;

/// Area cutoff for drawing a region at `depth`.
///
/// ```text
/// threshold(depth) = depth_base - depth * depth_step
/// ```
pub fn depth_threshold(depth: usize, policy: &RenderPolicyV1) -> i64 {
    policy
        .depth_base
        .saturating_sub((depth as i64).saturating_mul(policy.depth_step))
}

/// True if a region is large enough to be reported at all.
pub fn is_significant(area: u64, policy: &RenderPolicyV1) -> bool {
    area >= policy.significance_threshold
}

/// True if a significant region gets its own diagram node at `depth`.
pub fn is_drawn(area: u64, depth: usize, policy: &RenderPolicyV1) -> bool {
    is_significant(area, policy) && (area as i128) > depth_threshold(depth, policy) as i128
}

/// Visual weight of a region relative to the whole image.
///
/// Formula:
/// ```text
/// weight = scale_factor * (area / total_area) ^ scale_exponent
/// ```
///
/// The emitter passes the real cell count of the encoded grid as
/// `total_area`, so the padding columns are excluded. Normalising by every
/// encoded cell instead (about twice as many) would shrink each weight by
/// a factor of roughly `2^scale_exponent`.
///
/// A zero `total_area` yields zero.
pub fn visual_weight(area: u64, total_area: u64, policy: &RenderPolicyV1) -> f64 {
    if total_area == 0 {
        return 0.0;
    }
    let fraction = area as f64 / total_area as f64;
    policy.scale_factor * fraction.powf(policy.scale_exponent)
}

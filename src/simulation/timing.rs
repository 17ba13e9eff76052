//! Adaptive green-phase timing
//!
//! The busier approach is granted a longer green at the expense of the
//! quieter one. Yellow duration is fixed and shared by all intersections.

use super::types::MIN_GREEN_SECS;

/// Compute (green_ns, green_ew) durations from the current densities
///
/// The approach with strictly higher density gets `base + adjustment`;
/// the other gets `base - adjustment`. Equal densities favor east-west.
/// Both results are clamped to at least `MIN_GREEN_SECS` so a large
/// adjustment can never produce a zero-length (or underflowed) green.
///
/// Pure and total: no side effects, defined for every input combination.
pub fn green_durations(ns_density: u8, ew_density: u8, base: u64, adjustment: u64) -> (u64, u64) {
    let longer = base.saturating_add(adjustment).max(MIN_GREEN_SECS);
    let shorter = base.saturating_sub(adjustment).max(MIN_GREEN_SECS);
    if ns_density > ew_density {
        (longer, shorter)
    } else {
        (shorter, longer)
    }
}

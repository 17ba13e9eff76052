//! Standalone traffic-signal simulation
//!
//! One worker thread per intersection drives a cyclic light program
//! whose green durations adapt to sampled traffic density. The binary
//! and the integration tests both consume this module through the
//! re-exports below.

mod controller;
mod intersection;
mod sampler;
mod sink;
mod timing;
mod types;

pub use controller::SimController;
pub use intersection::Intersection;
pub use sampler::TrafficSampler;
pub use sink::{FileSink, LogSink, MultiSink, StatusSink};
pub use timing::green_durations;
pub use types::{
    IntersectionId, LightState, Phase, PhaseSnapshot, SimConfig, BASE_GREEN_SECS,
    DEFAULT_INTERSECTIONS, DEFAULT_RUN_SECS, DENSITY_MAX, GREEN_ADJUST_SECS, MAX_INTERSECTIONS,
    MIN_GREEN_SECS, YELLOW_SECS,
};

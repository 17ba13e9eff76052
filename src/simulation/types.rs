//! Core types and tuning constants for the signal simulation
//!
//! These are standalone types shared by the sampler, the timing policy,
//! and the per-intersection state machine.

use std::time::Duration;

/// Maximum number of intersections one simulation run may control
pub const MAX_INTERSECTIONS: usize = 10;

/// Fallback intersection count when the requested count is out of range
pub const DEFAULT_INTERSECTIONS: usize = 3;

/// Baseline green-phase duration in simulated seconds
pub const BASE_GREEN_SECS: u64 = 20;

/// Seconds shifted from the quieter approach to the busier one each cycle
pub const GREEN_ADJUST_SECS: u64 = 5;

/// Fixed yellow-phase duration shared by all intersections
pub const YELLOW_SECS: u64 = 5;

/// Lower bound on any green duration, whatever the configured constants
pub const MIN_GREEN_SECS: u64 = 1;

/// Upper bound (inclusive) of a sampled traffic density reading
pub const DENSITY_MAX: u8 = 10;

/// Wall-clock bound after which a run auto-stops, in seconds
pub const DEFAULT_RUN_SECS: u64 = 120;

/// A unique identifier for an intersection, dense 0..n within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntersectionId(pub usize);

impl std::fmt::Display for IntersectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The state of the signal facing one approach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Yellow,
    Green,
}

impl LightState {
    /// Uppercase name for display sinks
    pub fn as_str(&self) -> &'static str {
        match self {
            LightState::Red => "RED",
            LightState::Yellow => "YELLOW",
            LightState::Green => "GREEN",
        }
    }
}

/// One step of the cyclic signal program
///
/// The cycle is NsGreen -> NsYellow -> EwGreen -> EwYellow and back to
/// NsGreen. There is no terminal phase; a worker leaves the cycle only
/// when its intersection is deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NsGreen,
    NsYellow,
    EwGreen,
    EwYellow,
}

impl Phase {
    /// The phase that follows this one in the cycle
    pub fn next(&self) -> Phase {
        match self {
            Phase::NsGreen => Phase::NsYellow,
            Phase::NsYellow => Phase::EwGreen,
            Phase::EwGreen => Phase::EwYellow,
            Phase::EwYellow => Phase::NsGreen,
        }
    }

    /// Signal states for the two approaches while this phase holds
    pub fn lights(&self) -> (LightState, LightState) {
        match self {
            Phase::NsGreen => (LightState::Green, LightState::Red),
            Phase::NsYellow => (LightState::Yellow, LightState::Red),
            Phase::EwGreen => (LightState::Red, LightState::Green),
            Phase::EwYellow => (LightState::Red, LightState::Yellow),
        }
    }
}

/// A consistent copy of one intersection's state, taken under its lock
///
/// Emitted to the status sink once per phase transition and returned by
/// `Intersection::snapshot` for external readers. A snapshot is never
/// torn: both lights, the densities, and the green durations all belong
/// to the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSnapshot {
    pub id: IntersectionId,
    /// Phase the intersection is holding (or about to hold)
    pub phase: Phase,
    pub north_south: LightState,
    pub east_west: LightState,
    /// North-south traffic density, 0..=10
    pub ns_density: u8,
    /// East-west traffic density, 0..=10
    pub ew_density: u8,
    /// Green duration assigned to north-south for the current cycle
    pub green_ns_secs: u64,
    /// Green duration assigned to east-west for the current cycle
    pub green_ew_secs: u64,
}

/// Tuning knobs shared by every intersection in a run
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Baseline green duration in simulated seconds
    pub base_green_secs: u64,
    /// Seconds shifted toward the busier approach
    pub adjust_secs: u64,
    /// Fixed yellow duration in simulated seconds
    pub yellow_secs: u64,
    /// Wall-clock length of one simulated second
    ///
    /// One real second by default; tests shrink this to milliseconds so
    /// full cycles complete quickly without changing any timing contract.
    pub time_unit: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            base_green_secs: BASE_GREEN_SECS,
            adjust_secs: GREEN_ADJUST_SECS,
            yellow_secs: YELLOW_SECS,
            time_unit: Duration::from_secs(1),
        }
    }
}

impl SimConfig {
    /// Wall-clock duration of one simulated second span of `secs`
    pub fn scaled(&self, secs: u64) -> Duration {
        self.time_unit
            .saturating_mul(u32::try_from(secs).unwrap_or(u32::MAX))
    }

    /// Wall-clock duration of the longest possible cycle
    ///
    /// Both greens at their maximum plus both yellows. Shutdown uses this
    /// as the bound on how long a cooperative worker may lag behind a
    /// deactivation request.
    pub fn worst_case_cycle(&self) -> Duration {
        let secs = 2 * (self.base_green_secs + self.adjust_secs) + 2 * self.yellow_secs;
        self.scaled(secs.max(1))
    }
}

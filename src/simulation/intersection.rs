//! Per-intersection signal state machine
//!
//! Each intersection is driven by exactly one worker thread through the
//! cyclic program NsGreen -> NsYellow -> EwGreen -> EwYellow. At the top
//! of every cycle the worker refreshes the density readings and
//! recomputes the green durations for that cycle.
//!
//! Locking discipline: light mutation and snapshot emission happen while
//! the intersection's lock is held, so readers never observe a torn
//! state; the timed hold for each phase happens after the lock is
//! released, so status reads are never starved by a long green.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use super::sampler::TrafficSampler;
use super::sink::StatusSink;
use super::timing::green_durations;
use super::types::{IntersectionId, LightState, Phase, PhaseSnapshot, SimConfig};

/// Mutable intersection state, guarded by the intersection's lock
struct Core {
    phase: Phase,
    north_south: LightState,
    east_west: LightState,
    ns_density: u8,
    ew_density: u8,
    green_ns_secs: u64,
    green_ew_secs: u64,
    sampler: TrafficSampler,
}

impl Core {
    fn snapshot(&self, id: IntersectionId) -> PhaseSnapshot {
        PhaseSnapshot {
            id,
            phase: self.phase,
            north_south: self.north_south,
            east_west: self.east_west,
            ns_density: self.ns_density,
            ew_density: self.ew_density,
            green_ns_secs: self.green_ns_secs,
            green_ew_secs: self.green_ew_secs,
        }
    }
}

/// One independently controlled intersection
///
/// The owning worker is the only writer of the guarded state; everything
/// else observes it through [`Intersection::snapshot`] or requests
/// termination through [`Intersection::deactivate`].
pub struct Intersection {
    id: IntersectionId,
    config: SimConfig,
    active: AtomicBool,
    core: Mutex<Core>,
}

impl Intersection {
    /// Create an intersection in its initial split: NS red, EW green
    ///
    /// Densities are sampled immediately; green durations start at the
    /// configured base for both approaches and adapt from the first
    /// cycle onward.
    pub fn new(id: IntersectionId, config: SimConfig, mut sampler: TrafficSampler) -> Self {
        let (ns_density, ew_density) = sampler.sample();
        Self {
            id,
            config,
            active: AtomicBool::new(true),
            core: Mutex::new(Core {
                phase: Phase::EwGreen,
                north_south: LightState::Red,
                east_west: LightState::Green,
                ns_density,
                ew_density,
                green_ns_secs: config.base_green_secs,
                green_ew_secs: config.base_green_secs,
                sampler,
            }),
        }
    }

    pub fn id(&self) -> IntersectionId {
        self.id
    }

    /// Whether the control loop should keep cycling
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Request cooperative termination
    ///
    /// Observed by the worker at its next phase boundary; an in-flight
    /// timed hold is never interrupted, so the worker may lag behind
    /// this call by up to one phase duration.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Consistent copy of the current state for external readers
    pub fn snapshot(&self) -> PhaseSnapshot {
        self.lock_core().snapshot(self.id)
    }

    /// Drive the signal program until deactivated
    ///
    /// Runs on the owning worker thread. Emits one snapshot to `sink`
    /// per phase transition, while the lock is held.
    pub fn run(&self, sink: &dyn StatusSink) {
        let mut next = Phase::NsGreen;
        while self.is_active() {
            let hold_secs = {
                let mut core = self.lock_core();
                if next == Phase::NsGreen {
                    // Top of the cycle: fresh densities, fresh timings.
                    let (ns, ew) = core.sampler.sample();
                    core.ns_density = ns;
                    core.ew_density = ew;
                    let (green_ns, green_ew) = green_durations(
                        ns,
                        ew,
                        self.config.base_green_secs,
                        self.config.adjust_secs,
                    );
                    core.green_ns_secs = green_ns;
                    core.green_ew_secs = green_ew;
                }
                core.phase = next;
                let (north_south, east_west) = next.lights();
                core.north_south = north_south;
                core.east_west = east_west;
                sink.emit(&core.snapshot(self.id));
                match next {
                    Phase::NsGreen => core.green_ns_secs,
                    Phase::EwGreen => core.green_ew_secs,
                    Phase::NsYellow | Phase::EwYellow => self.config.yellow_secs,
                }
            };
            thread::sleep(self.config.scaled(hold_secs));
            next = next.next();
        }
    }

    /// Lock the core, recovering the guard if a previous holder panicked
    fn lock_core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

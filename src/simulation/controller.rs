//! Simulation controller: worker lifecycle for a set of intersections
//!
//! Spawns one OS thread per intersection, lets each run its own signal
//! program independently, and coordinates a cooperative shutdown that
//! never abandons a worker mid-cycle.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use log::{error, info, warn};

use super::intersection::Intersection;
use super::sampler::TrafficSampler;
use super::sink::StatusSink;
use super::types::{IntersectionId, SimConfig, DEFAULT_INTERSECTIONS, MAX_INTERSECTIONS};

/// Extra wall-clock slack granted on top of the worst-case cycle when
/// waiting for workers to stop
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

struct Worker {
    id: IntersectionId,
    handle: JoinHandle<()>,
}

/// Owns a fixed set of intersections and the worker thread driving each
///
/// The intersection collection is immutable in membership once
/// [`SimController::start`] returns, so shutdown can iterate it without
/// synchronization. Workers exit cooperatively: deactivation is observed
/// at phase boundaries, which bounds shutdown latency by one phase hold.
pub struct SimController {
    intersections: Vec<Arc<Intersection>>,
    workers: Vec<Worker>,
    exits: Receiver<IntersectionId>,
    config: SimConfig,
    stopped: bool,
}

impl SimController {
    /// Create and activate `requested` intersections with ids 0..n
    ///
    /// A request outside 1..=10 falls back to the default of 3. That is
    /// a documented correction, not a failure. A worker that cannot be
    /// spawned is reported by id and skipped; the run continues with the
    /// remaining intersections.
    pub fn start(
        requested: i64,
        config: SimConfig,
        seed: Option<u64>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        let count = validated_count(requested);
        info!("initializing {count} intersections");

        let (exit_tx, exit_rx) = mpsc::channel();
        let mut intersections = Vec::with_capacity(count);
        let mut workers = Vec::with_capacity(count);

        for n in 0..count {
            let id = IntersectionId(n);
            let sampler = match seed {
                // Derive a distinct stream per intersection from the base seed.
                Some(seed) => TrafficSampler::with_seed(seed.wrapping_add(n as u64)),
                None => TrafficSampler::new(),
            };
            let intersection = Arc::new(Intersection::new(id, config, sampler));

            let worker_intersection = Arc::clone(&intersection);
            let worker_sink = Arc::clone(&sink);
            let worker_exit = exit_tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("intersection-{n}"))
                .spawn(move || {
                    worker_intersection.run(worker_sink.as_ref());
                    // Receiver gone means shutdown already returned; nothing to report.
                    let _ = worker_exit.send(id);
                });

            match spawned {
                Ok(handle) => {
                    intersections.push(intersection);
                    workers.push(Worker { id, handle });
                }
                Err(err) => {
                    error!("failed to start worker for intersection {id}: {err}");
                }
            }
        }

        Self {
            intersections,
            workers,
            exits: exit_rx,
            config,
            stopped: false,
        }
    }

    /// The intersections under this controller's ownership
    pub fn intersections(&self) -> &[Arc<Intersection>] {
        &self.intersections
    }

    /// Number of intersections actually running
    pub fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    /// Block for `duration`, then stop every intersection
    ///
    /// The automatic shutdown path for a bounded run.
    pub fn run_for(&mut self, duration: Duration) -> Result<()> {
        thread::sleep(duration);
        self.stop()
    }

    /// Deactivate every intersection and wait for all workers to finish
    ///
    /// Deactivation is cooperative: each worker notices it at its next
    /// phase boundary, so this waits up to one worst-case cycle (plus
    /// grace) for the exit signals. A worker that misses that bound has
    /// violated the cancellation contract; its id is surfaced in the
    /// returned error rather than silently abandoned. Idempotent.
    pub fn stop(&mut self) -> Result<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;

        info!("shutting down {} intersections", self.intersections.len());
        for intersection in &self.intersections {
            intersection.deactivate();
        }

        let mut pending: Vec<IntersectionId> = self.workers.iter().map(|w| w.id).collect();
        let deadline = Instant::now() + self.config.worst_case_cycle() + SHUTDOWN_GRACE;
        while !pending.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.exits.recv_timeout(remaining) {
                Ok(id) => pending.retain(|p| *p != id),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let mut stuck = Vec::new();
        for worker in self.workers.drain(..) {
            // A worker that never signaled but has finished panicked out
            // of its loop; join it to reap the thread. A still-running
            // one would block join forever, so it is reported instead.
            if pending.contains(&worker.id) && !worker.handle.is_finished() {
                stuck.push(worker.id);
                continue;
            }
            if worker.handle.join().is_err() {
                warn!("worker for intersection {} panicked", worker.id);
            }
        }

        if !stuck.is_empty() {
            bail!(
                "workers for intersections {:?} did not stop within the cooperative bound",
                stuck.iter().map(|id| id.0).collect::<Vec<_>>()
            );
        }
        info!("all workers stopped");
        Ok(())
    }
}

/// Clamp a requested intersection count to the documented fallback
fn validated_count(requested: i64) -> usize {
    if (1..=MAX_INTERSECTIONS as i64).contains(&requested) {
        requested as usize
    } else {
        warn!(
            "requested intersection count {requested} is outside 1..={MAX_INTERSECTIONS}, \
             falling back to {DEFAULT_INTERSECTIONS}"
        );
        DEFAULT_INTERSECTIONS
    }
}

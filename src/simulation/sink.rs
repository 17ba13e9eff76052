//! Status sinks for phase-transition snapshots
//!
//! The state machine guarantees the field set and the emission timing
//! (one snapshot per phase transition, taken under the intersection's
//! lock); how a snapshot is rendered is entirely a sink concern.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use log::{info, warn};

use super::types::PhaseSnapshot;

/// Receiver for per-phase status snapshots
///
/// Implementations must be cheap and non-blocking where possible: `emit`
/// runs while the emitting intersection's lock is held.
pub trait StatusSink: Send + Sync {
    /// Accept one snapshot. Must not panic.
    fn emit(&self, snapshot: &PhaseSnapshot);
}

/// Sink that renders snapshots as structured log lines
pub struct LogSink;

impl StatusSink for LogSink {
    fn emit(&self, s: &PhaseSnapshot) {
        info!(
            "intersection {}: NS {} (density {}/10, green {}s) | EW {} (density {}/10, green {}s)",
            s.id,
            s.north_south.as_str(),
            s.ns_density,
            s.green_ns_secs,
            s.east_west.as_str(),
            s.ew_density,
            s.green_ew_secs,
        );
    }
}

/// Sink that appends one record per snapshot to a file
///
/// Write failures are logged and dropped; a full disk must not stall a
/// control loop.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) the record file in append mode
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open status record file {}", path.display()))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl StatusSink for FileSink {
    fn emit(&self, s: &PhaseSnapshot) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let result = writeln!(
            file,
            "intersection {}: NS: {} ({}), EW: {} ({})",
            s.id,
            s.north_south.as_str(),
            s.ns_density,
            s.east_west.as_str(),
            s.ew_density,
        );
        if let Err(err) = result {
            warn!("failed to append status record for intersection {}: {err}", s.id);
        }
    }
}

/// Fan-out sink delivering every snapshot to each inner sink in order
pub struct MultiSink {
    sinks: Vec<Box<dyn StatusSink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Box<dyn StatusSink>>) -> Self {
        Self { sinks }
    }
}

impl StatusSink for MultiSink {
    fn emit(&self, snapshot: &PhaseSnapshot) {
        for sink in &self.sinks {
            sink.emit(snapshot);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// QQSS-ISLM Kernel — Trajectory Sinks
// ─────────────────────────────────────────────────────────────────────
//! Output sinks receiving tick records from the driver.
//!
//! The driver never opens files itself; whoever wants output on disk
//! passes a [`JsonLinesSink`] wrapping their own writer.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use qqss_types::{QqssError, QqssResult};

use crate::driver::TickRecord;

/// Trait for trajectory consumers.
pub trait TrajectorySink {
    fn record(&mut self, tick: &TickRecord) -> QqssResult<()>;

    /// Called once after the last tick of a run.
    fn finish(&mut self) -> QqssResult<()> {
        Ok(())
    }
}

/// Collects records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<TickRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            records: Vec::with_capacity(n),
        }
    }

    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TickRecord> {
        self.records
    }
}

impl TrajectorySink for MemorySink {
    fn record(&mut self, tick: &TickRecord) -> QqssResult<()> {
        self.records.push(tick.clone());
        Ok(())
    }
}

/// Writes one JSON object per tick, newline-delimited.
///
/// Non-finite floats serialise as `null`; the record's `finite` flag
/// stays authoritative.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TrajectorySink for JsonLinesSink<W> {
    fn record(&mut self, tick: &TickRecord) -> QqssResult<()> {
        serde_json::to_writer(&mut self.writer, tick)
            .map_err(|e| QqssError::Sink(format!("serialise tick {}: {e}", tick.t)))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| QqssError::Sink(format!("write tick {}: {e}", tick.t)))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> QqssResult<()> {
        self.writer
            .flush()
            .map_err(|e| QqssError::Sink(format!("flush: {e}")))
    }
}

/// Thread-safe collector for parameter sweeps.
///
/// Each clone made with [`for_run`](Self::for_run) tags its records with
/// a run id and appends into one shared buffer guarded by a
/// `parking_lot::Mutex`.
#[derive(Debug, Clone, Default)]
pub struct SharedSink {
    run: usize,
    store: Arc<Mutex<Vec<(usize, TickRecord)>>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle writing into the same buffer under run id `run`.
    pub fn for_run(&self, run: usize) -> Self {
        Self {
            run,
            store: Arc::clone(&self.store),
        }
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Records of one run, in tick order.
    pub fn run_records(&self, run: usize) -> Vec<TickRecord> {
        let mut ticks: Vec<TickRecord> = self
            .store
            .lock()
            .iter()
            .filter(|(id, _)| *id == run)
            .map(|(_, tick)| tick.clone())
            .collect();
        ticks.sort_by_key(|tick| tick.t);
        ticks
    }
}

impl TrajectorySink for SharedSink {
    fn record(&mut self, tick: &TickRecord) -> QqssResult<()> {
        self.store.lock().push((self.run, tick.clone()));
        Ok(())
    }
}

/// Forwards every record to two sinks in order.
///
/// Recording stops at the first sink error. `finish` is called on both
/// sinks even if the first one fails; the first error wins.
#[derive(Debug, Default)]
pub struct TeeSink<A, B> {
    first: A,
    second: B,
}

impl<A: TrajectorySink, B: TrajectorySink> TeeSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: TrajectorySink, B: TrajectorySink> TrajectorySink for TeeSink<A, B> {
    fn record(&mut self, tick: &TickRecord) -> QqssResult<()> {
        self.first.record(tick)?;
        self.second.record(tick)
    }

    fn finish(&mut self) -> QqssResult<()> {
        let first = self.first.finish();
        let second = self.second.finish();
        first.and(second)
    }
}

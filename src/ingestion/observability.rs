//! Observer capability for ingestion outcomes.
//!
//! Observation is an injected capability, not process-wide state: callers
//! that want metrics or alerting pass an observer through
//! [`crate::ingestion::IngestOptions`], and the core itself stays
//! side-effect-free.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::IngestError;

use super::unified::SourceFormat;

/// Severity classification used for observer callbacks and alerting
/// thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the ingestion call failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about one ingestion attempt.
#[derive(Debug, Clone)]
pub struct IngestContext {
    /// The source path used for ingestion.
    pub path: PathBuf,
    /// Format used for ingestion.
    pub format: SourceFormat,
}

/// Minimal stats reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Records produced, or defined names resolved.
    pub rows: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait IngestObserver: Send + Sync {
    /// Called when an ingestion call succeeds.
    fn on_success(&self, _ctx: &IngestContext, _stats: IngestStats) {}

    /// Called when an ingestion call fails.
    fn on_failure(&self, _ctx: &IngestContext, _severity: Severity, _error: &IngestError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestContext, severity: Severity, error: &IngestError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestObserver>>,
}

impl CompositeObserver {
    /// Create a composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestContext, stats: IngestStats) {
        for observer in &self.observers {
            observer.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestContext, severity: Severity, error: &IngestError) {
        for observer in &self.observers {
            observer.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestContext, severity: Severity, error: &IngestError) {
        for observer in &self.observers {
            observer.on_alert(ctx, severity, error);
        }
    }
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl IngestObserver for StdErrObserver {
    fn on_success(&self, ctx: &IngestContext, stats: IngestStats) {
        eprintln!(
            "[proforma][ok] format={:?} path={} rows={}",
            ctx.format,
            ctx.path.display(),
            stats.rows
        );
    }

    fn on_failure(&self, ctx: &IngestContext, severity: Severity, error: &IngestError) {
        eprintln!(
            "[proforma][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &IngestContext, severity: Severity, error: &IngestError) {
        eprintln!(
            "[proforma][ALERT][{:?}] format={:?} path={} err={}",
            severity,
            ctx.format,
            ctx.path.display(),
            error
        );
    }
}

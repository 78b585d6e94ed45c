//! Per-unit diagnostic log with checkpoint/rollback.
//!
//! The log is ordered and append-mostly. The only way entries disappear is
//! [`DiagnosticLog::rollback`], which truncates to a previously taken
//! [`Checkpoint`]. Speculative parse paths use this to leave the log exactly
//! as long as it was before the attempt.

use crate::{Diagnostic, ErrorGuaranteed};

/// Configuration for diagnostic recording.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept before further ones are dropped (0 = unlimited).
    pub error_limit: usize,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig { error_limit: 100 }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig { error_limit: 0 }
    }
}

/// Marker returned by [`DiagnosticLog::checkpoint`].
///
/// Only meaningful for the log that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Checkpoint {
    len: usize,
    dropped: usize,
}

impl Checkpoint {
    /// Log length at the time the checkpoint was taken.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the checkpoint was taken on an empty log.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Ordered diagnostics of one compilation unit.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticLog {
    /// Recorded diagnostics, in emission order.
    entries: Vec<Diagnostic>,
    /// Errors dropped because the limit was reached.
    dropped: usize,
    /// Configuration.
    config: DiagnosticConfig,
}

impl DiagnosticLog {
    /// Create a new log with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    /// Create a log with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticLog {
            entries: Vec::new(),
            dropped: 0,
            config,
        }
    }

    /// Append a diagnostic.
    ///
    /// Returns `true` if it was recorded, `false` if the error limit dropped it.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        if self.config.error_limit > 0 && self.entries.len() >= self.config.error_limit {
            self.dropped += 1;
            return false;
        }
        self.entries.push(diag);
        true
    }

    /// Record an error diagnostic and return proof that it happened.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        self.push(diag);
        ErrorGuaranteed::new()
    }

    /// Mark the current end of the log.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.entries.len(),
            dropped: self.dropped,
        }
    }

    /// Discard everything recorded after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        debug_assert!(
            checkpoint.len <= self.entries.len(),
            "rollback to checkpoint {} beyond log length {}",
            checkpoint.len,
            self.entries.len()
        );
        self.entries.truncate(checkpoint.len);
        self.dropped = checkpoint.dropped;
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of errors dropped by the error limit.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Check if any errors were recorded.
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// The most recently recorded diagnostic.
    pub fn last(&self) -> Option<&Diagnostic> {
        self.entries.last()
    }

    /// All diagnostics in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Consume the log, yielding its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.entries
    }
}

//! Per-line diagnostics.
//!
//! The normalizer never fails on a bad line. Instead it hands every skipped
//! line and every timestamp token it could not resolve to a [`LineObserver`].
//! Library users plug in their own observer to collect diagnostics; the CLI
//! uses [`TracingObserver`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Mutex;
//! use chatroster::normalizer::ChatNormalizer;
//! use chatroster::observer::{LineObserver, SkipReason};
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<usize>>);
//!
//! impl LineObserver for Collect {
//!     fn on_skipped(&self, line_no: usize, _line: &str, reason: &SkipReason) {
//!         if !reason.is_noise() {
//!             self.0.lock().unwrap().push(line_no);
//!         }
//!     }
//! }
//!
//! let normalizer = ChatNormalizer::new().with_observer(Collect::default());
//! let transcript = normalizer
//!     .normalize_str("12/05/23, 10:30 am - Alice: hi\nstray continuation")
//!     .unwrap();
//! assert_eq!(transcript.stats.unrecognized, 1);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::parsing::classify::LineError;

/// Why a line contributed nothing to the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Blank line or encryption banner
    Noise,
    /// No grammar or template matched
    Unrecognized,
    /// Matched, but the captured parts were unusable
    Failed(LineError),
}

impl SkipReason {
    pub fn is_noise(&self) -> bool {
        matches!(self, SkipReason::Noise)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Noise => write!(f, "noise"),
            SkipReason::Unrecognized => write!(f, "unrecognized"),
            SkipReason::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Receives per-line diagnostics from a parse.
///
/// Line numbers are 1-based. Both methods default to doing nothing.
pub trait LineObserver: Send + Sync {
    /// A line was skipped.
    fn on_skipped(&self, _line_no: usize, _line: &str, _reason: &SkipReason) {}

    /// A date or time token fit no known layout and was kept verbatim.
    fn on_unresolved(&self, _line_no: usize, _token: &str) {}
}

/// Shared observer handle, as stored by the normalizer.
pub type SharedObserver = Arc<dyn LineObserver>;

/// Discards everything. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LineObserver for NoopObserver {}

/// Forwards diagnostics to `tracing`.
///
/// Noise goes to `trace`, everything else to `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LineObserver for TracingObserver {
    fn on_skipped(&self, line_no: usize, line: &str, reason: &SkipReason) {
        match reason {
            SkipReason::Noise => trace!(line_no, "skipping noise line"),
            SkipReason::Unrecognized => debug!(line_no, line, "skipping unrecognized line"),
            SkipReason::Failed(err) => {
                debug!(line_no, line, error = %err, "skipping malformed line");
            }
        }
    }

    fn on_unresolved(&self, line_no: usize, token: &str) {
        debug!(line_no, token, "timestamp token kept verbatim");
    }
}

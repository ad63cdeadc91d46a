//! Turn metrics.
//!
//! Timings collected for every turn; `Dispatcher::handle_verbose` returns them
//! for the CLI trace and for spotting slow turns.
//!
//! ## Design notes
//!
//! - `lock_wait` is separate from `transition` so contention on one session
//!   (rapid double-submit) shows up on its own.
//! - `fallback` stays zero unless the fallback collaborator was called.

use std::time::Duration;

use serde::Serialize;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct TurnMetrics {
    /// Total elapsed time for the turn.
    pub total: Duration,
    /// Normalization, trigger scan and city extraction.
    pub analyze: Duration,
    /// Time spent waiting for the session lock.
    pub lock_wait: Duration,
    /// The state-machine step, including any booking hand-off.
    pub transition: Duration,
    /// Time spent in the fallback collaborator.
    pub fallback: Duration,
    /// Rendering the reply text.
    pub render: Duration,
}

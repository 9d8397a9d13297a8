use std::time::Duration;

#[cfg(feature = "config")]
use serde::Deserialize;

/// Pacing and default-capacity tunables for the graph builder and runtime.
///
/// The spec pins these as best-effort constants (§4.4, §9); this struct just
/// gives them one place to live instead of scattering magic numbers through
/// the scheduler, and a seam for an embedding application to override them.
/// Loading overrides from a file is an external-collaborator concern (spec
/// §1 Non-goals exclude file loading from the core) — the `config` feature
/// only adds `Deserialize` so a caller can do that loading itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Deserialize))]
pub struct RuntimeConfig {
    /// Capacity used for an edge with no explicit `[n]` (spec §3: "default 1
    /// if not specified by the edge").
    pub default_queue_capacity: usize,
    /// Capacity used for a bracketed edge that omits its size, e.g. `[]->`
    /// (spec §4.2: "if the number is omitted the default is 10").
    pub default_buffered_capacity: usize,
    /// Pacing sleep for source and sink workers, in milliseconds (spec §4.4:
    /// "~30 Hz target").
    pub pace_millis: u64,
    /// Cooperative yield for intermediate-stage workers, in milliseconds
    /// (spec §4.4: "~1 ms").
    pub yield_millis: u64,
    /// Backoff between non-blocking `try_pop` retries while a worker waits
    /// for input, in milliseconds. Bounds shutdown latency (spec §5:
    /// "polling granularity <= pacing interval").
    pub poll_millis: u64,
}

impl RuntimeConfig {
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_millis)
    }

    pub fn stage_yield(&self) -> Duration {
        Duration::from_millis(self.yield_millis)
    }

    pub fn poll_backoff(&self) -> Duration {
        Duration::from_millis(self.poll_millis)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_queue_capacity: 1,
            default_buffered_capacity: 10,
            pace_millis: 33,
            yield_millis: 1,
            poll_millis: 1,
        }
    }
}

//!  src/util/debounce.rs
//!  ===================================================================
//!  Caller-driven debounce for text input and persistence writes.
//!
//!  • A single pending slot per debouncer: each new value replaces the
//!    previous one and restarts the quiet-period timer.
//!  • No background task and no clock of its own: the owner passes `now`
//!    to `schedule`/`poll`, so the pure engines stay timer-free and tests
//!    need no fake time.
//!  • A pending value always commits eventually, on `poll` after the
//!    deadline or on `flush` (focus loss, shutdown).

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::trace;

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period after the last change.
    #[serde(with = "humantime_serde")]
    pub delay: Duration,

    /// Upper bound from the first pending change, so constant typing
    /// still commits.
    #[serde(default, with = "humantime_serde")]
    pub max_delay: Option<Duration>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::persist()
    }
}

impl DebounceConfig {
    /// Notes editing
    #[must_use]
    pub const fn notes_input() -> Self {
        Self {
            delay: Duration::from_millis(300),
            max_delay: Some(Duration::from_millis(2000)),
        }
    }

    /// Search box
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: Duration::from_millis(250),
            max_delay: Some(Duration::from_millis(1000)),
        }
    }

    /// Writing the record collection to storage
    #[must_use]
    pub const fn persist() -> Self {
        Self {
            delay: Duration::from_millis(300),
            max_delay: Some(Duration::from_millis(3000)),
        }
    }
}

/* =========================== PendingWrite =========================== */

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    first_at: Instant,
    last_at: Instant,
}

/// Coalesces rapid updates into one eventual commit.
#[derive(Debug, Clone)]
pub struct PendingWrite<T> {
    cfg: DebounceConfig,
    slot: Option<Pending<T>>,
}

impl<T> PendingWrite<T> {
    #[must_use]
    pub const fn new(cfg: DebounceConfig) -> Self {
        Self { cfg, slot: None }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn schedule(&mut self, value: T, now: Instant) {
        let first_at = self.slot.as_ref().map_or(now, |pending| pending.first_at);
        self.slot = Some(Pending {
            value,
            first_at,
            last_at: now,
        });
        trace!("pending write rescheduled");
    }

    /// When the pending value becomes due, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|pending| {
            let quiet = pending.last_at + self.cfg.delay;
            self.cfg
                .max_delay
                .map_or(quiet, |cap| quiet.min(pending.first_at + cap))
        })
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|due| now >= due) {
            self.flush()
        } else {
            None
        }
    }

    /// Take the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.slot.take().map(|pending| pending.value)
    }

    /// Peek at the pending value.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.slot.as_ref().map(|pending| &pending.value)
    }

    /// Drop the pending value without committing it.
    pub fn cancel(&mut self) {
        self.slot = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

impl<T> Default for PendingWrite<T> {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

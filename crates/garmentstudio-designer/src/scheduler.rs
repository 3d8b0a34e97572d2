//! Recomposite scheduling policy.
//!
//! Full 2048x2048 recomposition is too expensive to run on every
//! pointer-move, so interactive edits are debounced: the cheap
//! display-resolution preview updates immediately while the full-resolution
//! pass fires on the trailing edge of an input burst. Discrete edits
//! (upload completion, explicit setter calls, removal) recomposite without
//! waiting.
//!
//! The policy object is pure: callers pass in the current instant, which
//! keeps the trailing-edge behavior unit-testable without sleeping.

use std::time::{Duration, Instant};

use garmentstudio_core::constants::RECOMPOSITE_QUIET_MS;

/// Counters describing scheduler activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Edits marked since construction.
    pub edits: u64,
    /// Full-resolution composites acknowledged.
    pub composites: u64,
}

/// Trailing-edge debounce for full-resolution recomposition.
#[derive(Debug, Clone)]
pub struct RecompositeScheduler {
    quiet_period: Duration,
    dirty: bool,
    /// Dirty due to a continuous interaction (drag) rather than a discrete
    /// edit; only interactive edits wait for the quiet period.
    interactive: bool,
    last_edit: Option<Instant>,
    stats: SchedulerStats,
}

impl RecompositeScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            dirty: false,
            interactive: false,
            last_edit: None,
            stats: SchedulerStats::default(),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record a discrete edit; the next poll recomposites immediately.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty = true;
        self.interactive = false;
        self.last_edit = Some(now);
        self.stats.edits += 1;
    }

    /// Record an interactive (drag) edit; recomposition waits for the
    /// trailing edge of the burst.
    pub fn mark_interactive(&mut self, now: Instant) {
        self.dirty = true;
        self.interactive = true;
        self.last_edit = Some(now);
        self.stats.edits += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a full-resolution recomposite should run now.
    pub fn should_recomposite(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        if !self.interactive {
            return true;
        }
        match self.last_edit {
            Some(last) => now.duration_since(last) >= self.quiet_period,
            None => true,
        }
    }

    /// Mark the pending work as done.
    pub fn acknowledge(&mut self) {
        self.dirty = false;
        self.interactive = false;
        self.stats.composites += 1;
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

impl Default for RecompositeScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(RECOMPOSITE_QUIET_MS))
    }
}

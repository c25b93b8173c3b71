//! Join/leave pairing for cumulative voice time

use chrono::{DateTime, Duration, Utc};

/// Folds an ascending sequence of `voice` transitions into a total.
///
/// A join opens an interval (re-anchoring any open one), a leave closes it.
/// Orphan leaves are ignored, a trailing join contributes nothing, and a
/// leave stamped before its join contributes zero.
#[derive(Debug, Clone, Default)]
pub struct VoiceDurationAccumulator {
    open: Option<DateTime<Utc>>,
    total: Duration,
}

impl VoiceDurationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transition
    pub fn push(&mut self, state: bool, at: DateTime<Utc>) {
        if state {
            self.open = Some(at);
            return;
        }
        if let Some(joined) = self.open.take() {
            let span = at - joined;
            if span > Duration::zero() {
                self.total = self.total + span;
            }
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Whether a join is still waiting for its leave
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

impl Extend<(bool, DateTime<Utc>)> for VoiceDurationAccumulator {
    fn extend<I: IntoIterator<Item = (bool, DateTime<Utc>)>>(&mut self, iter: I) {
        for (state, at) in iter {
            self.push(state, at);
        }
    }
}

impl FromIterator<(bool, DateTime<Utc>)> for VoiceDurationAccumulator {
    fn from_iter<I: IntoIterator<Item = (bool, DateTime<Utc>)>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

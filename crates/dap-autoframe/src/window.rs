//! Duty window computation (spec §4.4.1).

use chrono::{DateTime, Utc};

use dap_activity::Activity;

/// The `[start, end)` instant span of a duty, widened so far by manual
/// boundaries and (later) commute synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DutyWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DutyWindow {
    /// `dutyStart = min(payload.start)`, `dutyEnd = max(payload.end)` (spec
    /// §4.4.1). Panics if `payload` is empty — callers only build a window
    /// for a non-empty duty.
    pub fn from_payload<'a>(payload: impl IntoIterator<Item = &'a Activity>) -> Self {
        let mut start: Option<DateTime<Utc>> = None;
        let mut end: Option<DateTime<Utc>> = None;
        for activity in payload {
            start = Some(start.map_or(activity.start, |s| s.min(activity.start)));
            let eff_end = activity.effective_end();
            end = Some(end.map_or(eff_end, |e| e.max(eff_end)));
        }
        let start = start.expect("duty window requires at least one payload activity");
        let end = end.expect("duty window requires at least one payload activity");
        Self { start, end: end.max(start) }
    }

    /// Widen `self.start` to `candidate` only if it's earlier (spec §4.4.1:
    /// "honor only when it widens the window").
    pub fn widen_start(&mut self, candidate: DateTime<Utc>) {
        if candidate < self.start {
            self.start = candidate;
        }
    }

    /// Widen `self.end` to `candidate` only if it's later.
    pub fn widen_end(&mut self, candidate: DateTime<Utc>) {
        if candidate > self.end {
            self.end = candidate;
        }
    }

    pub fn span_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }
}

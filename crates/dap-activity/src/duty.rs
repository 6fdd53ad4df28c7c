//! `Duty` — the synthesized per-owner-per-day container (spec §3).

use chrono::NaiveDate;

use dap_core::{Owner, ServiceId};

/// One owner's work on one logical day (spec §3, glossary). Never persisted
/// as such — it exists only as an in-memory grouping the grouper builds and
/// the autoframer/compliance layer consume.
#[derive(Clone, Debug)]
pub struct Duty {
    pub service_id: ServiceId,
    pub owner: Owner,
    pub day_key: NaiveDate,
    /// Ids of the activities belonging to this duty, in the working map.
    /// Kept as ids (not owned `Activity` clones) so callers mutate the
    /// shared working map directly rather than through a second copy.
    pub activity_ids: Vec<String>,
}

impl Duty {
    pub fn new(service_id: ServiceId, owner: Owner) -> Self {
        let day_key = service_id.day;
        Self { service_id, owner, day_key, activity_ids: Vec::new() }
    }
}

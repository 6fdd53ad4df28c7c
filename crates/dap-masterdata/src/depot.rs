//! Home depot: a resource-pool-derived location group with four allowed
//! site-id sets (spec §4.4.3).

use std::collections::BTreeSet;

/// A home depot and the site ids it allows for each duty-boundary role.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomeDepot {
    pub id: String,

    /// Sites where a duty may legally start or end.
    pub site_ids: BTreeSet<String>,
    /// Sites where a regular break may be placed.
    pub break_site_ids: BTreeSet<String>,
    /// Sites where a short break may be placed.
    pub short_break_site_ids: BTreeSet<String>,
    /// Sites where an overnight stay is allowed.
    pub overnight_site_ids: BTreeSet<String>,
}

impl HomeDepot {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn allows_start_end(&self, site_id: &str) -> bool {
        self.site_ids.contains(site_id)
    }

    pub fn allows_break(&self, site_id: &str) -> bool {
        self.break_site_ids.contains(site_id)
    }

    pub fn allows_short_break(&self, site_id: &str) -> bool {
        self.short_break_site_ids.contains(site_id)
    }

    pub fn allows_overnight(&self, site_id: &str) -> bool {
        self.overnight_site_ids.contains(site_id)
    }
}

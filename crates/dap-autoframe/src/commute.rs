//! Commute synthesis (spec §4.4.4).

use dap_activity::Activity;
use dap_core::{ActivityTypeId, ManagedId, ServiceId};

use crate::depot::DepotSelection;
use crate::window::DutyWindow;

/// Emit the commute-in/commute-out activities implied by `selection`,
/// widening `window` by exactly the walk time on each side that has one
/// (spec §4.4.4: "For each side of the duty where both an operational point
/// and a walk time are available").
pub fn synthesize_commutes(
    service_id: &ServiceId,
    window: &mut DutyWindow,
    selection: &DepotSelection,
    start_op: Option<&str>,
    end_op: Option<&str>,
    commute_type_id: &ActivityTypeId,
) -> Vec<Activity> {
    let mut out = Vec::new();
    let Some(site_id) = selection.site_id.clone() else {
        return out;
    };

    if let (Some(op), Some(minutes)) = (start_op, selection.walk_in_minutes) {
        let commute_end = window.start;
        let commute_start = commute_end - chrono::Duration::minutes(minutes);
        let id = ManagedId::CommuteStart(service_id.clone()).to_string();
        let mut a = Activity::new(id, commute_start, commute_type_id.clone());
        a.end = Some(commute_end);
        a.from = Some(site_id.clone());
        a.to = Some(op.to_string());
        a.service_id = Some(service_id.clone());
        a.attributes.is_commute = true;
        window.widen_start(commute_start);
        out.push(a);
    }

    if let (Some(op), Some(minutes)) = (end_op, selection.walk_out_minutes) {
        let commute_start = window.end;
        let commute_end = commute_start + chrono::Duration::minutes(minutes);
        let id = ManagedId::CommuteEnd(service_id.clone()).to_string();
        let mut a = Activity::new(id, commute_start, commute_type_id.clone());
        a.end = Some(commute_end);
        a.from = Some(op.to_string());
        a.to = Some(site_id.clone());
        a.service_id = Some(service_id.clone());
        a.attributes.is_commute = true;
        window.widen_end(commute_end);
        out.push(a);
    }

    out
}

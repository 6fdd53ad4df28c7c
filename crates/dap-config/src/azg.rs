//! AZG rule bundle parameters (spec §4.5 table).
//!
//! Every rule is wrapped in [`AzgRule<P>`], which carries the `enabled` flag
//! and the optional `resource_kinds` filter shared by all AZG rules
//! (spec §9: "each AZG rule accepts an optional resourceKinds filter").

use dap_core::OwnerKind;

/// One AZG rule's enablement, resource-kind filter, and rule-specific
/// parameters.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AzgRule<P> {
    pub enabled: bool,
    /// `None` means the rule applies to every owner kind.
    pub resource_kinds: Option<Vec<OwnerKind>>,
    pub params: P,
}

impl<P> AzgRule<P> {
    pub fn applies_to(&self, kind: OwnerKind) -> bool {
        self.enabled
            && self
                .resource_kinds
                .as_ref()
                .map(|ks| ks.contains(&kind))
                .unwrap_or(true)
    }
}

impl<P: Default> Default for AzgRule<P> {
    fn default() -> Self {
        Self { enabled: true, resource_kinds: None, params: P::default() }
    }
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakStandardMinParams {
    pub standard_min_minutes: i64,
    pub interruption_threshold_minutes: i64,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakMidpointParams {
    pub long_duty_threshold_minutes: i64,
    pub tolerance_minutes: i64,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakMaxCountParams {
    pub max_count: usize,
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForbiddenNightParams {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for ForbiddenNightParams {
    fn default() -> Self {
        Self { start_hour: 0, end_hour: 4 }
    }
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferParams {
    pub buffer_minutes: i64,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvgParams {
    pub window_days: i64,
    pub max_avg_minutes: i64,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestMinParams {
    pub min_rest_minutes: i64,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NightStreakParams {
    pub max_consecutive_days: usize,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Night28dParams {
    pub window_days: i64,
    pub max_count: usize,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinCountParams {
    pub min_count: usize,
}

/// The full, per-rule AZG bundle (spec §4.5 table, one field per row).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AzgConfig {
    pub break_required: AzgRule<()>,
    pub break_standard_min: AzgRule<BreakStandardMinParams>,
    pub break_midpoint: AzgRule<BreakMidpointParams>,
    pub break_max_count: AzgRule<BreakMaxCountParams>,
    pub break_too_short: AzgRule<()>,
    pub break_forbidden_night: AzgRule<ForbiddenNightParams>,
    pub work_exceed_buffer: AzgRule<BufferParams>,
    pub duty_span_exceed_buffer: AzgRule<BufferParams>,
    pub work_avg_7d: AzgRule<AvgParams>,
    pub work_avg_365d: AzgRule<AvgParams>,
    pub duty_span_avg_28d: AzgRule<AvgParams>,
    pub rest_avg_28d: AzgRule<AvgParams>,
    pub rest_min: AzgRule<RestMinParams>,
    pub night_streak_max: AzgRule<NightStreakParams>,
    pub night_28d_max: AzgRule<Night28dParams>,
    pub rest_days_year_min: AzgRule<MinCountParams>,
    pub rest_sundays_year_min: AzgRule<MinCountParams>,
}

impl Default for AzgConfig {
    fn default() -> Self {
        Self {
            break_required: AzgRule::default(),
            break_standard_min: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: BreakStandardMinParams {
                    standard_min_minutes: 45,
                    interruption_threshold_minutes: 540,
                },
            },
            break_midpoint: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: BreakMidpointParams {
                    long_duty_threshold_minutes: 540,
                    tolerance_minutes: 60,
                },
            },
            break_max_count: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: BreakMaxCountParams { max_count: 3 },
            },
            break_too_short: AzgRule::default(),
            break_forbidden_night: AzgRule::default(),
            work_exceed_buffer: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: BufferParams { buffer_minutes: 30 },
            },
            duty_span_exceed_buffer: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: BufferParams { buffer_minutes: 30 },
            },
            work_avg_7d: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: AvgParams { window_days: 7, max_avg_minutes: 480 },
            },
            work_avg_365d: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: AvgParams { window_days: 365, max_avg_minutes: 450 },
            },
            duty_span_avg_28d: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: AvgParams { window_days: 28, max_avg_minutes: 540 },
            },
            rest_avg_28d: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: AvgParams { window_days: 28, max_avg_minutes: 660 },
            },
            rest_min: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: RestMinParams { min_rest_minutes: 660 },
            },
            night_streak_max: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: NightStreakParams { max_consecutive_days: 4 },
            },
            night_28d_max: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: Night28dParams { window_days: 28, max_count: 10 },
            },
            rest_days_year_min: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: MinCountParams { min_count: 96 },
            },
            rest_sundays_year_min: AzgRule {
                enabled: true,
                resource_kinds: None,
                params: MinCountParams { min_count: 40 },
            },
        }
    }
}

//! Conflict taxonomy as a closed enum (spec §9 "Conflict taxonomy" note).
//!
//! Known codes carry a fixed severity; unknown codes (written by a future
//! rule version, or round-tripped from storage) still parse and still
//! display, defaulting to [`Severity::Clean`] per spec §7 ("unknown codes
//! map to 0").

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Three-state conflict severity. Numeric value matches spec §3
/// (`service_conflict_level` is 0/1/2).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Severity {
    #[default]
    Clean = 0,
    Warn = 1,
    Error = 2,
}

impl Severity {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Clamp `self` to `max` (spec §7: "clamps at maxConflictLevel").
    pub fn clamp_to(self, max: Severity) -> Severity {
        if self > max { max } else { self }
    }
}

macro_rules! known_codes {
    ($($variant:ident => $str:literal : $sev:ident),+ $(,)?) => {
        /// Codes emitted by the worktime, home-depot, and AZG rule layers.
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum KnownCode {
            $($variant),+
        }

        impl KnownCode {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(KnownCode::$variant => $str),+
                }
            }

            pub fn severity(self) -> Severity {
                match self {
                    $(KnownCode::$variant => Severity::$sev),+
                }
            }

            fn from_str_opt(s: &str) -> Option<KnownCode> {
                match s {
                    $($str => Some(KnownCode::$variant)),+,
                    _ => None,
                }
            }
        }
    };
}

known_codes! {
    MaxDutySpan                      => "MAX_DUTY_SPAN" : Error,
    MaxWork                          => "MAX_WORK" : Error,
    MaxContinuous                    => "MAX_CONTINUOUS" : Error,
    NoBreakWindow                    => "NO_BREAK_WINDOW" : Warn,

    CapacityOverlap                  => "CAPACITY_OVERLAP" : Error,
    LocationSequence                 => "LOCATION_SEQUENCE" : Warn,

    HomeDepotNotFound                => "HOME_DEPOT_NOT_FOUND" : Error,
    WalkTimeMissingStart             => "WALK_TIME_MISSING_START" : Warn,
    WalkTimeMissingEnd               => "WALK_TIME_MISSING_END" : Warn,
    HomeDepotStartLocationMissing    => "HOME_DEPOT_START_LOCATION_MISSING" : Warn,
    HomeDepotEndLocationMissing      => "HOME_DEPOT_END_LOCATION_MISSING" : Warn,
    HomeDepotSiteNotFound            => "HOME_DEPOT_SITE_NOT_FOUND" : Error,
    HomeDepotNoSites                 => "HOME_DEPOT_NO_SITES" : Error,
    HomeDepotNotInDepot              => "HOME_DEPOT_NOT_IN_DEPOT" : Warn,
    HomeDepotOvernightSiteForbidden  => "HOME_DEPOT_OVERNIGHT_SITE_FORBIDDEN" : Error,
    HomeDepotOvernightLocationMissing=> "HOME_DEPOT_OVERNIGHT_LOCATION_MISSING" : Warn,

    AzgBreakRequired                 => "AZG_BREAK_REQUIRED" : Error,
    AzgBreakStandardMin              => "AZG_BREAK_STANDARD_MIN" : Warn,
    AzgBreakMidpoint                 => "AZG_BREAK_MIDPOINT" : Warn,
    AzgBreakMaxCount                 => "AZG_BREAK_MAX_COUNT" : Warn,
    AzgBreakTooShort                 => "AZG_BREAK_TOO_SHORT" : Error,
    AzgBreakForbiddenNight           => "AZG_BREAK_FORBIDDEN_NIGHT" : Warn,
    AzgWorkExceedBuffer              => "AZG_WORK_EXCEED_BUFFER" : Warn,
    AzgDutySpanExceedBuffer          => "AZG_DUTY_SPAN_EXCEED_BUFFER" : Warn,
    AzgWorkAvg7d                     => "AZG_WORK_AVG_7D" : Error,
    AzgWorkAvg365d                   => "AZG_WORK_AVG_365D" : Error,
    AzgDutySpanAvg28d                => "AZG_DUTY_SPAN_AVG_28D" : Error,
    AzgRestAvg28d                    => "AZG_REST_AVG_28D" : Error,
    AzgRestMin                       => "AZG_REST_MIN" : Error,
    AzgNightStreakMax                => "AZG_NIGHT_STREAK_MAX" : Error,
    AzgNight28dMax                   => "AZG_NIGHT_28D_MAX" : Error,
    AzgRestDaysYearMin               => "AZG_REST_DAYS_YEAR_MIN" : Warn,
    AzgRestSundaysYearMin            => "AZG_REST_SUNDAYS_YEAR_MIN" : Warn,
}

impl fmt::Display for KnownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A conflict code: either one of the fixed [`KnownCode`]s or an unrecognized
/// string preserved for round-tripping (spec §9: "model as
/// `Code::Known(k) | Code::Unknown(String)`").
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Code {
    Known(KnownCode),
    Unknown(String),
}

impl Code {
    pub fn as_str(&self) -> &str {
        match self {
            Code::Known(k) => k.as_str(),
            Code::Unknown(s) => s.as_str(),
        }
    }

    /// Unknown codes map to [`Severity::Clean`] (spec §7).
    pub fn severity(&self) -> Severity {
        match self {
            Code::Known(k) => k.severity(),
            Code::Unknown(_) => Severity::Clean,
        }
    }
}

impl From<KnownCode> for Code {
    fn from(k: KnownCode) -> Self {
        Code::Known(k)
    }
}

impl FromStr for Code {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match KnownCode::from_str_opt(s) {
            Some(k) => Code::Known(k),
            None => Code::Unknown(s.to_string()),
        })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// `service_conflict_codes` must be "strictly ascending" (spec §8) — codes
// compare lexicographically by their string form regardless of variant.
impl PartialOrd for Code {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Code {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/// Union the level across multiple codes, then clamp to `max`.
pub fn union_severity<'a>(codes: impl IntoIterator<Item = &'a Code>, max: Severity) -> Severity {
    codes
        .into_iter()
        .map(Code::severity)
        .max()
        .unwrap_or_default()
        .clamp_to(max)
}

/// Sort and dedupe a code list into the canonical `service_conflict_codes`
/// representation (spec §8: "strictly ascending ... no duplicates").
pub fn canonicalize_codes(mut codes: Vec<Code>) -> Vec<Code> {
    codes.sort();
    codes.dedup();
    codes
}

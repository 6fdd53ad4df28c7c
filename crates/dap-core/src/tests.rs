//! Unit tests for dap-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ManagedId, Owner, OwnerKind, PauseDirection, ServiceId, Stage};
    use chrono::NaiveDate;

    fn svc() -> ServiceId {
        ServiceId::new(Stage::Base, "PS-1", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn service_id_display_and_roundtrip() {
        let s = svc();
        assert_eq!(s.to_string(), "svc:base:PS-1:2025-01-01");
        let parsed: ServiceId = s.to_string().parse().unwrap();
        assert_eq!(parsed, s);
    }

    #[test]
    fn managed_id_boundary_roundtrip() {
        let id = ManagedId::Start(svc());
        let s = id.to_string();
        assert_eq!(s, "svcstart:svc:base:PS-1:2025-01-01");
        assert_eq!(s.parse::<ManagedId>().unwrap(), id);
    }

    #[test]
    fn managed_id_break_roundtrip() {
        let id = ManagedId::Break(svc(), 2);
        let s = id.to_string();
        assert_eq!(s, "svcbreak:svc:base:PS-1:2025-01-01:2");
        assert_eq!(s.parse::<ManagedId>().unwrap(), id);
    }

    #[test]
    fn managed_id_commute_pause_roundtrip() {
        let id = ManagedId::CommutePause(svc(), PauseDirection::In, 3);
        let s = id.to_string();
        assert_eq!(s, "svccommute:svc:base:PS-1:2025-01-01:pause-in-3");
        assert_eq!(s.parse::<ManagedId>().unwrap(), id);
    }

    #[test]
    fn managed_id_rejects_garbage() {
        assert!("not-a-managed-id".parse::<ManagedId>().is_err());
        assert!("svcstart:not-svc".parse::<ManagedId>().is_err());
    }

    #[test]
    fn owner_construction() {
        let o = Owner::new("PS-1", OwnerKind::Personnel);
        assert_eq!(o.resource_id, "PS-1");
        assert_eq!(o.kind, OwnerKind::Personnel);
    }
}

#[cfg(test)]
mod code {
    use crate::{canonicalize_codes, Code, KnownCode, Severity};

    #[test]
    fn severity_clamp() {
        assert_eq!(Severity::Error.clamp_to(Severity::Warn), Severity::Warn);
        assert_eq!(Severity::Clean.clamp_to(Severity::Warn), Severity::Clean);
    }

    #[test]
    fn unknown_code_roundtrips_and_is_clean() {
        let code: Code = "SOME_FUTURE_CODE".parse().unwrap();
        assert_eq!(code.as_str(), "SOME_FUTURE_CODE");
        assert_eq!(code.severity(), Severity::Clean);
    }

    #[test]
    fn known_code_roundtrips() {
        let code: Code = "MAX_WORK".parse().unwrap();
        assert_eq!(code, Code::Known(KnownCode::MaxWork));
        assert_eq!(code.severity(), Severity::Error);
    }

    #[test]
    fn canonicalize_sorts_and_dedupes() {
        let codes = vec![
            Code::Known(KnownCode::MaxWork),
            Code::Known(KnownCode::CapacityOverlap),
            Code::Known(KnownCode::MaxWork),
        ];
        let out = canonicalize_codes(codes);
        let strs: Vec<&str> = out.iter().map(Code::as_str).collect();
        assert_eq!(strs, vec!["CAPACITY_OVERLAP", "MAX_WORK"]);
    }
}

#[cfg(test)]
mod calendar {
    use crate::calendar::{ascension_day, is_sunday_like, parse_variant_year, timetable_year_bounds};
    use chrono::NaiveDate;

    #[test]
    fn timetable_year_starts_on_sunday() {
        let (start, end) = timetable_year_bounds(2025);
        assert_eq!(start.weekday().num_days_from_sunday(), 0);
        assert!(start >= NaiveDate::from_ymd_opt(2025, 12, 10).unwrap());
        assert!(start <= NaiveDate::from_ymd_opt(2025, 12, 16).unwrap());
        assert_eq!(end, timetable_year_bounds(2026).0.pred_opt().unwrap());
    }

    #[test]
    fn new_year_and_christmas_are_sunday_like() {
        let ny = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let xmas = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert!(is_sunday_like(ny, &[]));
        assert!(is_sunday_like(xmas, &[]));
    }

    #[test]
    fn ascension_day_is_a_thursday() {
        use chrono::{Datelike, Weekday};
        let asc = ascension_day(2025);
        assert_eq!(asc.weekday(), Weekday::Thu);
        assert!(is_sunday_like(asc, &[]));
    }

    #[test]
    fn ordinary_weekday_is_not_sunday_like() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(); // a Wednesday
        assert!(!is_sunday_like(d, &[]));
    }

    #[test]
    fn configured_extra_is_sunday_like() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        assert!(is_sunday_like(d, &[d]));
    }

    #[test]
    fn parse_variant_year_prod_and_sim() {
        assert_eq!(parse_variant_year("PROD-2025/26"), Some(2025));
        assert_eq!(parse_variant_year("SIM-2025/26-foo"), Some(2025));
        assert_eq!(parse_variant_year("garbage"), None);
    }
}

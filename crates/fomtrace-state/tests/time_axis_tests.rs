use fomtrace_protocol::Timestamp;
use fomtrace_state::*;

fn ts(raw: &str) -> Timestamp {
    Timestamp::parse(raw).unwrap()
}

fn axis() -> TimeAxis {
    // 1000px for one second, gridline every 100ms.
    TimeAxis::new(1000.0, 1_000_000, 100_000).unwrap()
}

#[test]
fn test_first_anchor_seeds_start() {
    let mut a = axis();
    assert!(a.start().is_none());
    assert!(a.anchor(ts("2016-03-24-09:18:46.359427942")));
    assert_eq!(a.start(), Some(ts("2016-03-24-09:18:46.359427")));
    assert!(!a.anchor(ts("2016-03-24-09:18:47.000000")), "anchor fires once");
    assert_eq!(a.start(), Some(ts("2016-03-24-09:18:46.359427")), "start is immutable");
}

#[test]
fn test_configured_start_survives_anchor() {
    let mut a = axis().with_start(ts("2016-03-24-09:18:46.000000"));
    assert!(a.anchor(ts("2016-03-24-09:18:46.500000")), "first anchor still reported");
    assert_eq!(a.start(), Some(ts("2016-03-24-09:18:46.000000")));
    assert_eq!(a.position(ts("2016-03-24-09:18:46.500000")), 500.0);
}

#[test]
fn test_position_of_start_is_zero() {
    let mut a = axis();
    let t0 = ts("2016-03-24-09:18:46.359427942");
    a.anchor(t0);
    assert_eq!(a.position(t0), 0.0);
}

#[test]
fn test_position_monotonic_and_linear() {
    let mut a = axis();
    a.anchor(ts("2016-03-24-09:18:46.000000"));
    let mut last = f64::NEG_INFINITY;
    for us in (0..2_000_000).step_by(37_000) {
        let y = a.position(ts("2016-03-24-09:18:46.000000").checked_add_micros(us).unwrap());
        assert!(y >= last, "position must not decrease");
        last = y;
    }
    assert_eq!(a.position(ts("2016-03-24-09:18:46.250000")), 250.0);
}

#[test]
fn test_position_spans_midnight() {
    let mut a = TimeAxis::new(1000.0, 2_000_000, 100_000).unwrap();
    a.anchor(ts("2016-03-24-23:59:59.500000"));
    assert_eq!(a.position(ts("2016-03-25-00:00:00.500000")), 500.0);
}

#[test]
fn test_position_before_start_is_negative() {
    let mut a = axis();
    a.anchor(ts("2016-03-24-09:18:46.500000"));
    let y = a.position(ts("2016-03-24-09:18:46.400000"));
    assert_eq!(y, -100.0);
    assert!(!a.is_visible(y));
}

#[test]
fn test_visibility_window() {
    let a = axis();
    assert!(a.is_visible(0.0));
    assert!(a.is_visible(999.9));
    assert!(!a.is_visible(1000.0));
    assert!(!a.is_visible(-0.1));
}

#[test]
fn test_gridlines_cover_window_inclusive() {
    let mut a = axis();
    assert!(a.gridlines().is_empty(), "no gridlines before the start is known");
    a.anchor(ts("2016-03-24-09:18:46.000000"));
    let lines = a.gridlines();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0].y, 0.0);
    assert_eq!(lines[10].y, 1000.0);
    assert_eq!(lines[3].time, ts("2016-03-24-09:18:46.300000"));
}

#[test]
fn test_invalid_axis_rejected() {
    assert!(TimeAxis::new(0.0, 1, 1).is_err());
    assert!(TimeAxis::new(10.0, 0, 1).is_err());
    assert!(TimeAxis::new(10.0, 1, 0).is_err());
}

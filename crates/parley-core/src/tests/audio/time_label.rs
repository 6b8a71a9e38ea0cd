use crate::{format_clock, progress_fraction};

/// WHAT: Clock labels floor to whole seconds in m:ss
/// WHY: Duration and position labels must match the ticking counter
#[test]
fn given_second_counts_when_formatting_then_minutes_and_padded_seconds() {
    // Given / When / Then: Representative values render as m:ss
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(5.9), "0:05");
    assert_eq!(format_clock(65.0), "1:05");
    assert_eq!(format_clock(600.0), "10:00");
}

/// WHAT: Invalid seconds render as zero
/// WHY: A player reporting NaN must not break the label
#[test]
fn given_negative_or_nan_seconds_when_formatting_then_zero() {
    assert_eq!(format_clock(-3.0), "0:00");
    assert_eq!(format_clock(f64::NAN), "0:00");
    assert_eq!(format_clock(f64::INFINITY), "0:00");
}

/// WHAT: Progress fraction stays in [0, 1]
/// WHY: The progress bar width is computed from it directly
#[test]
fn given_edge_positions_when_computing_progress_then_clamped() {
    assert_eq!(progress_fraction(1.0, 0.0), 0.0);
    assert_eq!(progress_fraction(1.0, -2.0), 0.0);
    assert_eq!(progress_fraction(f64::NAN, 4.0), 0.0);
    assert_eq!(progress_fraction(-1.0, 4.0), 0.0);
    assert_eq!(progress_fraction(6.0, 4.0), 1.0);
    assert!((progress_fraction(1.0, 4.0) - 0.25).abs() < f64::EPSILON);
}

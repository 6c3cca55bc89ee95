use econ_dash::metrics::{Trend, compute_delta, format_magnitude, format_magnitude_locale};

#[test]
fn magnitude_examples() {
    assert_eq!(format_magnitude(1_500_000_000_000.0), "1.50T");
    assert_eq!(format_magnitude(2_300_000.0), "2.30M");
    assert_eq!(format_magnitude(42.5), "42.50");
    assert_eq!(format_magnitude(-5_000_000_000.0), "-5.00B");
}

#[test]
fn magnitude_thresholds_use_absolute_value() {
    assert_eq!(format_magnitude(-2_300_000.0), "-2.30M");
    assert_eq!(format_magnitude(-999_999.99), "-999999.99");
    assert_eq!(format_magnitude(-1.0e12), "-1.00T");
    assert_eq!(format_magnitude(12_345.0e12), "12345.00T");
}

#[test]
fn magnitude_locale_grouping() {
    assert_eq!(format_magnitude_locale(12_345.0e12, "en"), "12,345.00T");
    assert_eq!(format_magnitude_locale(987_654.321, "de"), "987.654,32");
    assert_eq!(format_magnitude_locale(-0.5, "fr"), "-0,50");
}

#[test]
fn delta_examples() {
    let d = compute_delta(&[50.0]).unwrap();
    assert_eq!((d.latest, d.delta), (50.0, 0.0));
    assert_eq!(Trend::from_delta(d.delta), Trend::Down);

    let d = compute_delta(&[40.0, 55.0]).unwrap();
    assert_eq!((d.latest, d.delta), (55.0, 15.0));
    assert_eq!(Trend::from_delta(d.delta), Trend::Up);
}

#[test]
fn delta_of_empty_series_is_none() {
    assert!(compute_delta(&[]).is_none());
}

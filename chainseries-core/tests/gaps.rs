use chainseries_core::{Gap, Metric, TimeSeries, detect_gaps_as_of};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn series(dates: &[NaiveDate]) -> TimeSeries {
    TimeSeries::from_daily(Metric::Price, dates.iter().map(|x| (*x, 100.0)))
}

#[test]
fn single_missing_day_is_a_gap_at_tolerance_one() {
    let s = series(&[d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 4)]);
    let gaps = detect_gaps_as_of(&s, 1, d(2024, 1, 5));
    assert_eq!(
        gaps,
        vec![Gap {
            start: d(2024, 1, 3),
            end: d(2024, 1, 3)
        }]
    );
}

#[test]
fn single_missing_day_is_tolerated_at_tolerance_two() {
    let s = series(&[d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 4)]);
    assert!(detect_gaps_as_of(&s, 2, d(2024, 1, 5)).is_empty());
}

#[test]
fn trailing_gap_runs_to_yesterday() {
    let s = series(&[d(2024, 1, 1), d(2024, 1, 2)]);
    let gaps = detect_gaps_as_of(&s, 1, d(2024, 1, 10));
    assert_eq!(
        gaps,
        vec![Gap {
            start: d(2024, 1, 3),
            end: d(2024, 1, 9)
        }]
    );
}

#[test]
fn missing_today_is_not_a_gap() {
    let s = series(&[d(2024, 1, 8), d(2024, 1, 9)]);
    assert!(detect_gaps_as_of(&s, 1, d(2024, 1, 10)).is_empty());
    // yesterday missing is within tolerance too
    let s = series(&[d(2024, 1, 7), d(2024, 1, 8)]);
    assert!(detect_gaps_as_of(&s, 1, d(2024, 1, 10)).is_empty());
}

#[test]
fn short_series_have_no_gaps() {
    assert!(detect_gaps_as_of(&TimeSeries::empty(Metric::Price), 1, d(2024, 6, 1)).is_empty());
    let s = series(&[d(2020, 1, 1)]);
    assert!(detect_gaps_as_of(&s, 1, d(2024, 6, 1)).is_empty());
}

#[test]
fn interior_and_trailing_gaps_are_chronological() {
    let s = series(&[d(2024, 1, 1), d(2024, 1, 5), d(2024, 1, 6)]);
    let gaps = detect_gaps_as_of(&s, 1, d(2024, 1, 12));
    assert_eq!(gaps.len(), 2);
    assert_eq!(gaps[0].start, d(2024, 1, 2));
    assert_eq!(gaps[0].end, d(2024, 1, 4));
    assert_eq!(gaps[1].start, d(2024, 1, 7));
    assert_eq!(gaps[1].end, d(2024, 1, 11));
}

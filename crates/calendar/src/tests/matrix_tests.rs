use chrono::{Datelike, NaiveDate};

use crate::{build_month, CalendarCell, CalendarError, MonthCursor, DAYS_PER_WEEK};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn february_2024_starts_on_thursday_with_29_days() {
    let matrix = build_month(2024, 1, None).expect("build");
    let first_week = matrix.weeks()[0];

    assert!(first_week[..4].iter().all(CalendarCell::is_padding));
    assert_eq!(first_week[4].date, Some(date(2024, 2, 1)));
    assert_eq!(first_week[5].date, Some(date(2024, 2, 2)));
    assert_eq!(first_week[6].date, Some(date(2024, 2, 3)));
    assert_eq!(matrix.dates().count(), 29);
    assert_eq!(matrix.title(), "February 2024");
}

#[test]
fn every_month_tiles_into_full_weeks_with_contiguous_dates() {
    for year in [1999, 2000, 2023, 2024, 2025, 2100] {
        for month0 in 0..12 {
            let matrix = build_month(year, month0, None).expect("build");
            assert!(!matrix.weeks().is_empty());
            assert!(matrix.weeks().len() <= 6, "{year}-{month0} uses too many rows");

            let cells: usize = matrix.weeks().iter().map(|week| week.len()).sum();
            assert_eq!(cells % DAYS_PER_WEEK, 0);

            let first = date(year, month0 + 1, 1);
            let expected: Vec<NaiveDate> = first
                .iter_days()
                .take_while(|d| d.month() == first.month())
                .collect();
            let actual: Vec<NaiveDate> = matrix.dates().collect();
            assert_eq!(actual, expected, "dates differ for {year}-{month0}");
        }
    }
}

#[test]
fn first_concrete_cell_sits_in_the_weekday_column_of_the_first() {
    for month0 in 0..12 {
        let matrix = build_month(2025, month0, None).expect("build");
        let first_week = matrix.weeks()[0];
        let column = first_week
            .iter()
            .position(|cell| !cell.is_padding())
            .expect("first week has a date");
        let first = date(2025, month0 + 1, 1);
        assert_eq!(column as u32, first.weekday().num_days_from_sunday());
    }
}

#[test]
fn padding_only_appears_at_the_edges() {
    // June 2025: Sunday the 1st, Monday the 30th.
    let matrix = build_month(2025, 5, None).expect("build");
    assert!(!matrix.weeks()[0][0].is_padding());

    let last = matrix.weeks().last().expect("last week");
    assert_eq!(last[1].date, Some(date(2025, 6, 30)));
    assert!(last[2..].iter().all(CalendarCell::is_padding));
}

#[test]
fn marks_only_the_supplied_today() {
    let today = date(2025, 6, 17);
    let matrix = build_month(2025, 5, Some(today)).expect("build");
    let flagged: Vec<NaiveDate> = matrix
        .weeks()
        .iter()
        .flatten()
        .filter(|cell| cell.is_today)
        .filter_map(|cell| cell.date)
        .collect();
    assert_eq!(flagged, vec![today]);

    let other_month = build_month(2025, 6, Some(today)).expect("build");
    assert!(other_month.weeks().iter().flatten().all(|cell| !cell.is_today));
}

#[test]
fn rebuilding_with_same_inputs_is_identical() {
    let today = Some(date(2024, 2, 29));
    assert_eq!(
        build_month(2024, 1, today).expect("first"),
        build_month(2024, 1, today).expect("second")
    );
}

#[test]
fn rejects_out_of_range_month() {
    assert_eq!(build_month(2025, 12, None), Err(CalendarError::InvalidMonth(12)));
    assert!(matches!(
        build_month(i32::MAX, 0, None),
        Err(CalendarError::OutOfRange { .. })
    ));
}

#[test]
fn month_cursor_rolls_over_year_boundaries() {
    let january = MonthCursor::new(2025, 0);
    assert_eq!(january.previous(), MonthCursor::new(2024, 11));
    assert_eq!(MonthCursor::new(2024, 11).next(), january);
    assert_eq!(january.label(), "January 2025");

    let cursor = MonthCursor::containing(date(2024, 2, 29));
    assert_eq!(cursor, MonthCursor::new(2024, 1));
    assert!(cursor.contains(date(2024, 2, 1)));
    assert!(!cursor.contains(date(2024, 3, 1)));
    assert_eq!(cursor.build(None).expect("build").dates().count(), 29);
}

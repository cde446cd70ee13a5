//! Month layout and day binning for the schedule views.
//!
//! Both halves are pure: the desktop client rebuilds them every frame and the
//! CLI prints them directly.

mod binder;
mod matrix;

pub use binder::{bind_assignments, day_key, parse_day, shifts_on, ShiftsByDay};
pub use matrix::{
    build_month, CalendarCell, CalendarError, MonthCursor, MonthMatrix, Week, DAYS_PER_WEEK,
    WEEKDAY_LABELS,
};

#[cfg(test)]
#[path = "tests/matrix_tests.rs"]
mod matrix_tests;

#[cfg(test)]
#[path = "tests/binder_tests.rs"]
mod binder_tests;

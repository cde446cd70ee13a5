use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DAYS_PER_WEEK: usize = 7;

/// Column headers, Sunday first to match `num_days_from_sunday`.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("month index {0} is outside 0..=11")]
    InvalidMonth(u32),
    #[error("year {year} month {month0} cannot be represented")]
    OutOfRange { year: i32, month0: u32 },
}

/// One slot of the grid. `date` is `None` for the padding before the 1st and
/// after the last day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalendarCell {
    pub date: Option<NaiveDate>,
    pub is_today: bool,
}

impl CalendarCell {
    pub const PADDING: CalendarCell = CalendarCell {
        date: None,
        is_today: false,
    };

    pub fn is_padding(&self) -> bool {
        self.date.is_none()
    }
}

pub type Week = [CalendarCell; DAYS_PER_WEEK];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMatrix {
    year: i32,
    month0: u32,
    weeks: Vec<Week>,
}

impl MonthMatrix {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month (January = 0).
    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Concrete dates in grid order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks
            .iter()
            .flat_map(|week| week.iter())
            .filter_map(|cell| cell.date)
    }

    pub fn title(&self) -> String {
        MonthCursor::new(self.year, self.month0).label()
    }
}

/// Lays out `year`/`month0` as Sunday-first weeks.
///
/// The first week is prefixed with one padding cell per weekday before the
/// 1st and the last week is filled with trailing padding, so every week holds
/// exactly seven cells. A cell is flagged `is_today` when its date equals
/// `today`.
pub fn build_month(
    year: i32,
    month0: u32,
    today: Option<NaiveDate>,
) -> Result<MonthMatrix, CalendarError> {
    if month0 > 11 {
        return Err(CalendarError::InvalidMonth(month0));
    }
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .ok_or(CalendarError::OutOfRange { year, month0 })?;

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells = Vec::with_capacity(6 * DAYS_PER_WEEK);
    cells.extend(std::iter::repeat(CalendarCell::PADDING).take(leading));
    cells.extend(
        first
            .iter_days()
            .take_while(|date| date.month() == first.month())
            .map(|date| CalendarCell {
                date: Some(date),
                is_today: today == Some(date),
            }),
    );
    while cells.len() % DAYS_PER_WEEK != 0 {
        cells.push(CalendarCell::PADDING);
    }

    let weeks = cells
        .chunks_exact(DAYS_PER_WEEK)
        .map(|chunk| {
            let mut week = [CalendarCell::PADDING; DAYS_PER_WEEK];
            week.copy_from_slice(chunk);
            week
        })
        .collect();

    Ok(MonthMatrix {
        year,
        month0,
        weeks,
    })
}

/// The month currently selected on the landing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month0: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month0: u32) -> Self {
        Self {
            year,
            month0: month0.min(11),
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    pub fn previous(self) -> Self {
        self.shift(-1)
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn build(&self, today: Option<NaiveDate>) -> Result<MonthMatrix, CalendarError> {
        build_month(self.year, self.month0, today)
    }

    /// e.g. `June 2025`.
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month0 + 1),
        }
    }

    fn shift(self, delta: i32) -> Self {
        let Some(first) = self.first_day() else {
            return self;
        };
        let moved = if delta >= 0 {
            first.checked_add_months(Months::new(delta.unsigned_abs()))
        } else {
            first.checked_sub_months(Months::new(delta.unsigned_abs()))
        };
        moved.map(Self::containing).unwrap_or(self)
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use shared::protocol::{local_datetime, AssignmentRecord};
use tracing::warn;

/// `YYYY-MM-DD` → assignments on that day, in the order they arrived.
pub type ShiftsByDay = BTreeMap<String, Vec<AssignmentRecord>>;

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Truncates a wire date to its UTC calendar day.
///
/// Accepts RFC 3339 timestamps (converted to UTC first), offset-less
/// date-times (taken as UTC) and plain dates.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(stamped) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamped.with_timezone(&Utc).date_naive());
    }
    if let Some(local) = local_datetime::parse(raw) {
        return Some(local.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Groups assignment records by day.
///
/// The day comes from the record's own `date`, falling back to `shift.date`.
/// Records with neither, or with a date that does not parse, are skipped with
/// a warning.
pub fn bind_assignments(records: &[AssignmentRecord]) -> ShiftsByDay {
    let mut by_day = ShiftsByDay::new();
    for record in records {
        let Some(raw) = record.raw_date() else {
            warn!(
                assignment_id = ?record.id,
                shift_id = ?record.effective_shift_id(),
                "assignment record has neither date nor shift.date; skipping"
            );
            continue;
        };
        let Some(day) = parse_day(raw) else {
            warn!(
                assignment_id = ?record.id,
                raw_date = raw,
                "assignment record date is not a recognised format; skipping"
            );
            continue;
        };
        by_day.entry(day_key(day)).or_default().push(record.clone());
    }
    by_day
}

pub fn shifts_on(by_day: &ShiftsByDay, date: NaiveDate) -> &[AssignmentRecord] {
    by_day
        .get(&day_key(date))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{AssignmentId, Role, ShiftId, UserId, WorkerId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: WorkerId,
    pub name: String,
    pub role: Role,
}

/// Body of `POST /api/scheduler`: a profile without its server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkerProfile {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub date: NaiveDate,
    pub required_role: String,
    #[serde(with = "local_datetime")]
    pub start_time: NaiveDateTime,
    #[serde(with = "local_datetime")]
    pub end_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
}

impl Shift {
    pub fn is_for_role(&self, role: Role) -> bool {
        role.matches(&self.required_role)
    }

    pub fn time_range_label(&self) -> String {
        format!(
            "{}-{}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignShiftRequest {
    pub shift_id: ShiftId,
    pub worker_id: WorkerId,
}

/// One entry of `GET /api/shift-assignments/worker/{id}`.
///
/// The service has returned both a flattened form (shift fields copied onto
/// the assignment) and a nested form (`shift: {...}`), so every field is
/// optional and dates stay as raw strings until the calendar binds them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AssignmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<ShiftId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<AssignedShiftRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedShiftRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShiftId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl AssignmentRecord {
    /// Direct `date` first, then `shift.date`.
    pub fn raw_date(&self) -> Option<&str> {
        self.date
            .as_deref()
            .or_else(|| self.shift.as_ref().and_then(|shift| shift.date.as_deref()))
    }

    pub fn effective_shift_id(&self) -> Option<ShiftId> {
        self.shift_id
            .or_else(|| self.shift.as_ref().and_then(|shift| shift.id))
    }

    pub fn effective_role(&self) -> Option<&str> {
        self.required_role.as_deref().or_else(|| {
            self.shift
                .as_ref()
                .and_then(|shift| shift.required_role.as_deref())
        })
    }

    /// `HH:MM-HH:MM` when both bounds parse, otherwise whatever is present.
    pub fn time_range_label(&self) -> Option<String> {
        let start = self.start_time.as_deref().or_else(|| {
            self.shift
                .as_ref()
                .and_then(|shift| shift.start_time.as_deref())
        });
        let end = self.end_time.as_deref().or_else(|| {
            self.shift
                .as_ref()
                .and_then(|shift| shift.end_time.as_deref())
        });
        match (start, end) {
            (Some(start), Some(end)) => Some(format!("{}-{}", clock_part(start), clock_part(end))),
            (Some(start), None) => Some(clock_part(start)),
            (None, Some(end)) => Some(format!("-{}", clock_part(end))),
            (None, None) => None,
        }
    }
}

fn clock_part(raw: &str) -> String {
    local_datetime::parse(raw)
        .map(|parsed| parsed.format("%H:%M").to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Local date-times as the scheduling service prints them: seconds are dropped when
/// zero, so `2025-06-01T09:00` and `2025-06-01T09:00:00.000` both occur.
pub mod local_datetime {
    use chrono::NaiveDateTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format("%Y-%m-%dT%H:%M:%S"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid local date-time '{raw}'")))
    }
}

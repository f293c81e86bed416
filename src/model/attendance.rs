use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::campus::Campus;

/// Duration values that mean "no lateness" / "no early departure".
pub const ZERO_SENTINELS: [&str; 4] = ["00:00", "00:00:00", "0", ""];

/// Number of positional columns a muster row must carry.
pub const MUSTER_COLUMNS: usize = 15;

/// One row of punch data for one staff member on one day.
///
/// Field names serialize in camelCase; that is the persisted blob layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "sn": 1,
    "ecode": "RAM12",
    "name": "Ramesh Kale",
    "shift": "GS",
    "scheduledInTime": "09:00",
    "scheduledOutTime": "17:00",
    "actualInTime": "09:12",
    "actualOutTime": "17:02",
    "workDuration": "7:50",
    "ot": "00:00",
    "totalDuration": "7:50",
    "lateBy": "00:12",
    "earlyGoingBy": "00:00",
    "status": "Present",
    "punchRecord": "09:12:in(TD), 17:02:out(TD)",
    "campus": "vadgaon"
}))]
pub struct AttendanceRecord {
    pub sn: i64,
    pub ecode: String,
    pub name: String,
    pub shift: String,
    pub scheduled_in_time: String,
    pub scheduled_out_time: String,
    pub actual_in_time: String,
    pub actual_out_time: String,
    pub work_duration: String,
    pub ot: String,
    pub total_duration: String,
    pub late_by: String,
    pub early_going_by: String,
    pub status: String,
    pub punch_record: String,
    pub campus: Campus,
}

impl AttendanceRecord {
    /// The one "present" predicate used by every aggregation.
    /// `"Present (No OutPunch)"` does not count.
    pub fn is_present(&self) -> bool {
        self.status.trim() == "Present"
    }

    pub fn is_late(&self) -> bool {
        is_nonzero_duration(&self.late_by)
    }

    pub fn left_early(&self) -> bool {
        is_nonzero_duration(&self.early_going_by)
    }
}

pub fn is_nonzero_duration(value: &str) -> bool {
    !ZERO_SENTINELS.contains(&value.trim())
}

#[cfg(test)]
pub(crate) fn sample(ecode: &str, name: &str, status: &str, campus: Campus) -> AttendanceRecord {
    AttendanceRecord {
        sn: 1,
        ecode: ecode.to_string(),
        name: name.to_string(),
        shift: "GS".to_string(),
        scheduled_in_time: "09:00".to_string(),
        scheduled_out_time: "17:00".to_string(),
        actual_in_time: "09:00".to_string(),
        actual_out_time: "17:00".to_string(),
        work_duration: "8:00".to_string(),
        ot: "00:00".to_string(),
        total_duration: "8:00".to_string(),
        late_by: "00:00".to_string(),
        early_going_by: "00:00".to_string(),
        status: status.to_string(),
        punch_record: "09:00:in(TD), 17:00:out(TD)".to_string(),
        campus,
    }
}

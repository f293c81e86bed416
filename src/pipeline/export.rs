use std::borrow::Cow;
use std::fmt::Write as _;

use chrono::NaiveDate;
use strum_macros::EnumIter;

use crate::model::{
    attendance::AttendanceRecord,
    stats::{ReportRow, Stats},
};

/// Columns of the attendance summary export, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum AttendanceColumn {
    Sn,
    ECode,
    Name,
    Shift,
    ScheduledIn,
    ScheduledOut,
    ActualIn,
    ActualOut,
    WorkDuration,
    Ot,
    TotalDuration,
    LateBy,
    EarlyGoingBy,
    Status,
    PunchRecord,
}

pub const SUMMARY_COLUMNS: [AttendanceColumn; 15] = [
    AttendanceColumn::Sn,
    AttendanceColumn::ECode,
    AttendanceColumn::Name,
    AttendanceColumn::Shift,
    AttendanceColumn::ScheduledIn,
    AttendanceColumn::ScheduledOut,
    AttendanceColumn::ActualIn,
    AttendanceColumn::ActualOut,
    AttendanceColumn::WorkDuration,
    AttendanceColumn::Ot,
    AttendanceColumn::TotalDuration,
    AttendanceColumn::LateBy,
    AttendanceColumn::EarlyGoingBy,
    AttendanceColumn::Status,
    AttendanceColumn::PunchRecord,
];

impl AttendanceColumn {
    pub fn header(&self) -> &'static str {
        match self {
            AttendanceColumn::Sn => "SN",
            AttendanceColumn::ECode => "ECode",
            AttendanceColumn::Name => "Name",
            AttendanceColumn::Shift => "Shift",
            AttendanceColumn::ScheduledIn => "Scheduled In",
            AttendanceColumn::ScheduledOut => "Scheduled Out",
            AttendanceColumn::ActualIn => "Actual In",
            AttendanceColumn::ActualOut => "Actual Out",
            AttendanceColumn::WorkDuration => "Work Duration",
            AttendanceColumn::Ot => "OT",
            AttendanceColumn::TotalDuration => "Total Duration",
            AttendanceColumn::LateBy => "Late By",
            AttendanceColumn::EarlyGoingBy => "Early Going By",
            AttendanceColumn::Status => "Status",
            AttendanceColumn::PunchRecord => "Punch Record",
        }
    }

    pub fn value<'a>(&self, record: &'a AttendanceRecord) -> Cow<'a, str> {
        let field = match self {
            AttendanceColumn::Sn => return Cow::Owned(record.sn.to_string()),
            AttendanceColumn::ECode => &record.ecode,
            AttendanceColumn::Name => &record.name,
            AttendanceColumn::Shift => &record.shift,
            AttendanceColumn::ScheduledIn => &record.scheduled_in_time,
            AttendanceColumn::ScheduledOut => &record.scheduled_out_time,
            AttendanceColumn::ActualIn => &record.actual_in_time,
            AttendanceColumn::ActualOut => &record.actual_out_time,
            AttendanceColumn::WorkDuration => &record.work_duration,
            AttendanceColumn::Ot => &record.ot,
            AttendanceColumn::TotalDuration => &record.total_duration,
            AttendanceColumn::LateBy => &record.late_by,
            AttendanceColumn::EarlyGoingBy => &record.early_going_by,
            AttendanceColumn::Status => &record.status,
            AttendanceColumn::PunchRecord => &record.punch_record,
        };
        Cow::Borrowed(field)
    }
}

/// Quote a field only when it needs it, doubling embedded quotes.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn push_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !out.is_empty() {
        out.push('\n');
    }
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field.as_ref()));
    }
}

/// Header line plus one line per record. No trailing newline.
pub fn export_csv<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    columns: &[AttendanceColumn],
) -> String {
    let mut out = String::new();
    push_row(&mut out, columns.iter().map(|c| c.header()));
    for record in records {
        push_row(&mut out, columns.iter().map(|c| c.value(record)));
    }
    out
}

pub fn daily_report_csv(rows: &[ReportRow]) -> String {
    let mut out = String::new();
    push_row(&mut out, ["category", "count", "percentage"]);
    for row in rows {
        push_row(
            &mut out,
            [
                row.category.to_string(),
                row.count.to_string(),
                format!("{:.1}", row.percentage),
            ],
        );
    }
    out
}

/// Download name for the staff report. The search term is reduced to ASCII
/// letters, digits, `-` and `_`; whitespace becomes `-`.
pub fn staff_report_filename(search: Option<&str>, date: NaiveDate) -> String {
    let label: String = search
        .unwrap_or_default()
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('-'),
            _ => None,
        })
        .collect();
    let label = if label.is_empty() { "all" } else { label.as_str() };
    format!("attendance-report-{}-{}.txt", label, date.format("%Y-%m-%d"))
}

/// Plain-text staff report: filtered details followed by the dashboard summary.
pub fn staff_report<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    search: Option<&str>,
    stats: &Stats,
    generated_on: NaiveDate,
) -> String {
    let records: Vec<&AttendanceRecord> = records.into_iter().collect();
    let search = search.map(str::trim).filter(|s| !s.is_empty());

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "STES Staff Attendance Report");
    let _ = writeln!(out, "Generated on: {}", generated_on.format("%B %-d, %Y"));
    match search {
        Some(term) => {
            let _ = writeln!(out, "Filtered by: {}", term);
        }
        None => {
            let _ = writeln!(out, "All Staff");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Records: {}", records.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "Staff Details:");

    for (index, record) in records.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", index + 1, record.name, record.ecode);
        let _ = writeln!(out, "   Status: {}", record.status);
        let _ = writeln!(out, "   In Time: {}", record.actual_in_time);
        let _ = writeln!(out, "   Out Time: {}", record.actual_out_time);
        let _ = writeln!(out, "   Duration: {}", record.work_duration);
        let _ = writeln!(out, "   Campus: {}", record.campus.display_name());
        let _ = writeln!(out, "   Late By: {}", record.late_by);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "- Total Staff: {}", stats.total_staff);
    let _ = writeln!(out, "- Present Today: {}", stats.present_today);
    let _ = writeln!(out, "- Absent Today: {}", stats.absent_today);
    let _ = writeln!(out, "- Late Today: {}", stats.late_today);
    out
}

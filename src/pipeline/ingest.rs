use std::io::Cursor;
use std::str::FromStr;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use derive_more::Display;
use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::model::{
    attendance::{AttendanceRecord, MUSTER_COLUMNS},
    campus::Campus,
};
use crate::store::RecordStore;

#[derive(Debug, Display)]
pub enum IngestError {
    #[display(fmt = "Unrecognized campus '{}'", _0)]
    InvalidCampus(String),
    #[display(fmt = "Error processing the spreadsheet, please check the format: {}", _0)]
    UnreadableFile(String),
    #[display(fmt = "The uploaded file has no attendance rows")]
    EmptyFile,
    #[display(fmt = "Failed to save attendance data: {}", _0)]
    Storage(String),
}

impl std::error::Error for IngestError {}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IngestSummary {
    #[schema(example = "vadgaon")]
    pub campus: Campus,
    #[schema(example = 118)]
    pub records_parsed: usize,
    #[schema(example = 2)]
    pub records_skipped: usize,
}

/// Records decoded from one muster sheet.
#[derive(Debug)]
pub struct ParsedMuster {
    pub records: Vec<AttendanceRecord>,
    pub skipped: usize,
}

pub fn parse_campus(campus: &str) -> Result<Campus, IngestError> {
    let campus = campus.trim();
    Campus::from_str(campus).map_err(|_| IngestError::InvalidCampus(campus.to_string()))
}

/// Parse `bytes` as a muster sheet for `campus` and replace that campus in
/// `store`. The store is untouched unless every step before the write
/// succeeds.
pub fn ingest(
    bytes: &[u8],
    campus: &str,
    store: &dyn RecordStore,
) -> Result<IngestSummary, IngestError> {
    let campus = parse_campus(campus)?;
    let parsed = parse_muster(bytes, campus)?;

    let summary = IngestSummary {
        campus,
        records_parsed: parsed.records.len(),
        records_skipped: parsed.skipped,
    };

    store
        .replace_campus(campus, parsed.records)
        .map_err(|e| IngestError::Storage(format!("{:#}", e)))?;

    info!(
        campus = %campus,
        parsed = summary.records_parsed,
        skipped = summary.records_skipped,
        "Muster ingested"
    );
    Ok(summary)
}

/// Decode the first worksheet. Row 0 is the header; rows with fewer than
/// fifteen cells are skipped. Only a sheet without data rows is an error.
pub fn parse_muster(bytes: &[u8], campus: Campus) -> Result<ParsedMuster, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::UnreadableFile(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::UnreadableFile("workbook has no sheets".to_string()))?
        .map_err(|e| IngestError::UnreadableFile(e.to_string()))?;

    // calamine trims leading empty columns off the used range
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    if range.height() < 2 {
        warn!(campus = %campus, "Muster file has no data rows");
        return Err(IngestError::EmptyFile);
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in range.rows().enumerate().skip(1) {
        let width = col_offset + effective_len(row);
        if width < MUSTER_COLUMNS {
            debug!(row = index, width, "Skipping short muster row");
            skipped += 1;
            continue;
        }

        let cell = |col: usize| col.checked_sub(col_offset).and_then(|i| row.get(i));
        let text = |col: usize| cell(col).map(cell_text).unwrap_or_default();

        records.push(AttendanceRecord {
            sn: cell(0).map(cell_int).unwrap_or(0),
            ecode: text(1),
            name: text(2),
            shift: text(3),
            scheduled_in_time: text(4),
            scheduled_out_time: text(5),
            actual_in_time: text(6),
            actual_out_time: text(7),
            work_duration: text(8),
            ot: text(9),
            total_duration: text(10),
            late_by: text(11),
            early_going_by: text(12),
            status: text(13),
            punch_record: text(14),
            campus,
        });
    }

    if records.is_empty() {
        warn!(campus = %campus, skipped, "Every muster row was too short");
    }

    Ok(ParsedMuster { records, skipped })
}

/// Row length ignoring trailing empty cells.
fn effective_len(row: &[Data]) -> usize {
    row.iter()
        .rposition(|c| !matches!(c, Data::Empty))
        .map_or(0, |i| i + 1)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => clock_text(dt.as_f64(), dt.is_duration()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

fn cell_int(cell: &Data) -> i64 {
    match cell {
        Data::Int(i) => *i,
        Data::Float(f) => *f as i64,
        Data::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Spreadsheet day fraction as `HH:MM`. Durations keep whole days as hours.
fn clock_text(serial: f64, is_duration: bool) -> String {
    let days = if is_duration { serial } else { serial.fract() };
    let minutes = (days * 1440.0).round().max(0.0) as u64;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

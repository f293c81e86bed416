use crate::api::attendance::{AttendanceListResponse, AttendanceQuery, StatsResponse};
use crate::api::campus::CampusInfo;
use crate::api::reports::DailyReportResponse;
use crate::model::{
    attendance::AttendanceRecord,
    campus::Campus,
    stats::{ReportRow, Stats},
};
use crate::pipeline::ingest::IngestSummary;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "STES Attendance API",
        version = "0.1.0",
        description = r#"
## STES Staff Attendance

Punch-clock muster sheets are uploaded per campus and aggregated into the
attendance dashboard.

### Key Features
- **Muster upload**
  - One spreadsheet per campus; a new upload replaces that campus's records
- **Attendance**
  - Search, status filter, pagination, dashboard counters, CSV export
- **Reports**
  - Daily present/absent/late breakdown and plain-text staff reports

### Response Format
- JSON for data endpoints, `text/csv` and `text/plain` downloads for exports
- Errors are `{"message": "..."}`
"#,
    ),
    paths(
        crate::api::campus::list_campuses,
        crate::api::muster::upload_muster,

        crate::api::attendance::list_attendance,
        crate::api::attendance::attendance_stats,
        crate::api::attendance::export_attendance,
        crate::api::attendance::clear_attendance,

        crate::api::reports::daily,
        crate::api::reports::daily_export,
        crate::api::reports::staff
    ),
    components(
        schemas(
            AttendanceRecord,
            Campus,
            CampusInfo,
            IngestSummary,
            Stats,
            StatsResponse,
            AttendanceQuery,
            AttendanceListResponse,
            ReportRow,
            DailyReportResponse
        )
    ),
    tags(
        (name = "Muster", description = "Spreadsheet upload APIs"),
        (name = "Attendance", description = "Attendance listing and export APIs"),
        (name = "Reports", description = "Report APIs"),
    )
)]
pub struct ApiDoc;

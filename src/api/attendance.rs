use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use crate::api::{attachment, load_records};
use crate::config::Config;
use crate::error::ApiError;
use crate::model::{attendance::AttendanceRecord, stats::Stats};
use crate::pipeline::{
    aggregate::{RecordFilter, compute_stats, filter_records, paginate, total_pages},
    export::{SUMMARY_COLUMNS, export_csv},
};
use crate::store::RecordStore;

const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceQuery {
    #[schema(example = "ram")]
    /// Case-insensitive match on name or employee code
    pub search: Option<String>,
    #[schema(example = "Present")]
    /// Exact status, ignoring case; "all" disables the filter
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Page number (start with 1)
    pub page: Option<usize>,
    #[schema(example = 10)]
    /// Records per page
    pub per_page: Option<usize>,
}

impl AttendanceQuery {
    fn filter(&self) -> RecordFilter {
        RecordFilter::new(self.search.as_deref(), self.status.as_deref())
    }
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: usize,
    #[schema(example = 10)]
    pub per_page: usize,
    #[schema(example = 25)]
    pub total: usize,
    #[schema(example = 3)]
    pub total_pages: usize,
}

#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: Stats,
    /// Present share in whole percent
    #[schema(example = 84)]
    pub attendance_rate: u32,
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(
        ("search", Query, description = "Search by name or employee code"),
        ("status", Query, description = "Filter by status, or \"all\""),
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated attendance records", body = AttendanceListResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    store: web::Data<dyn RecordStore>,
    config: web::Data<Config>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = load_records(&store).await?;
    let filter = query.filter();
    let matched: Vec<&AttendanceRecord> = filter_records(&records, &filter).collect();

    let per_page = query
        .per_page
        .unwrap_or(config.default_page_size)
        .clamp(1, MAX_PAGE_SIZE);
    let total_pages = total_pages(matched.len(), per_page);
    let page = query.page.unwrap_or(1).clamp(1, total_pages.max(1));

    debug!(?query, total = matched.len(), page, per_page, "Listing attendance");

    let data = paginate(&matched, page, per_page)
        .iter()
        .map(|r| (*r).clone())
        .collect();

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page,
        per_page,
        total: matched.len(),
        total_pages,
    }))
}

/// Dashboard counters
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(
        ("search", Query, description = "Search by name or employee code"),
        ("status", Query, description = "Filter by status, or \"all\"")
    ),
    responses(
        (status = 200, description = "Counters over the matching records", body = StatsResponse)
    ),
    tag = "Attendance"
)]
pub async fn attendance_stats(
    store: web::Data<dyn RecordStore>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = load_records(&store).await?;
    let filter = query.filter();
    let stats = compute_stats(filter_records(&records, &filter));

    Ok(HttpResponse::Ok().json(StatsResponse {
        attendance_rate: stats.attendance_rate(),
        stats,
    }))
}

/// Export the matching records as CSV
#[utoipa::path(
    get,
    path = "/api/attendance/export",
    params(
        ("search", Query, description = "Search by name or employee code"),
        ("status", Query, description = "Filter by status, or \"all\"")
    ),
    responses(
        (status = 200, description = "attendance-summary.csv", content_type = "text/csv", body = String)
    ),
    tag = "Attendance"
)]
pub async fn export_attendance(
    store: web::Data<dyn RecordStore>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = load_records(&store).await?;
    let filter = query.filter();
    let csv = export_csv(filter_records(&records, &filter), &SUMMARY_COLUMNS);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(attachment("attendance-summary.csv"))
        .body(csv))
}

/// Clear all attendance data
#[utoipa::path(
    delete,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Every stored record removed", body = Object, example = json!({
            "message": "All attendance data cleared"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clear_attendance(store: web::Data<dyn RecordStore>) -> Result<HttpResponse, ApiError> {
    let store = store.into_inner();
    // waits on the store's write lock
    web::block(move || store.clear())
        .await
        .map_err(|e| {
            error!(error = %e, "Clear task failed");
            ApiError::Internal
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to clear attendance data");
            ApiError::Internal
        })?;

    info!("Attendance data cleared");
    Ok(HttpResponse::Ok().json(json!({
        "message": "All attendance data cleared"
    })))
}

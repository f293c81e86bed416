use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::{attachment, load_records};
use crate::error::ApiError;
use crate::model::stats::ReportRow;
use crate::pipeline::{
    aggregate::{RecordFilter, compute_stats, daily_report, filter_records},
    export::{daily_report_csv, staff_report, staff_report_filename},
};
use crate::store::RecordStore;

#[derive(Serialize, ToSchema)]
pub struct DailyReportResponse {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub generated_on: NaiveDate,
    #[schema(example = 120)]
    pub total_staff: usize,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StaffReportQuery {
    /// Search by staff name
    pub search: Option<String>,
}

/// Present / absent / late breakdown of the stored records
#[utoipa::path(
    get,
    path = "/api/reports/daily",
    responses(
        (status = 200, description = "Daily breakdown", body = DailyReportResponse)
    ),
    tag = "Reports"
)]
pub async fn daily(store: web::Data<dyn RecordStore>) -> Result<HttpResponse, ApiError> {
    let records = load_records(&store).await?;
    let stats = compute_stats(&records);

    Ok(HttpResponse::Ok().json(DailyReportResponse {
        generated_on: Local::now().date_naive(),
        total_staff: stats.total_staff,
        rows: daily_report(&stats),
    }))
}

/// Daily breakdown as CSV
#[utoipa::path(
    get,
    path = "/api/reports/daily/export",
    responses(
        (status = 200, description = "daily-report-YYYY-MM-DD.csv", content_type = "text/csv", body = String)
    ),
    tag = "Reports"
)]
pub async fn daily_export(store: web::Data<dyn RecordStore>) -> Result<HttpResponse, ApiError> {
    let records = load_records(&store).await?;
    let csv = daily_report_csv(&daily_report(&compute_stats(&records)));
    let filename = format!("daily-report-{}.csv", Local::now().format("%Y-%m-%d"));

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(attachment(filename))
        .body(csv))
}

/// Plain-text staff report
///
/// Lists the staff whose name matches `search` and ends with the dashboard
/// summary over every stored record.
#[utoipa::path(
    get,
    path = "/api/reports/staff",
    params(StaffReportQuery),
    responses(
        (status = 200, description = "attendance-report-{search|all}-YYYY-MM-DD.txt", content_type = "text/plain", body = String)
    ),
    tag = "Reports"
)]
pub async fn staff(
    store: web::Data<dyn RecordStore>,
    query: web::Query<StaffReportQuery>,
) -> Result<HttpResponse, ApiError> {
    let records = load_records(&store).await?;
    let search = query.search.as_deref();
    let filter = RecordFilter::by_name(search.map(str::trim));
    let today = Local::now().date_naive();

    let report = staff_report(
        filter_records(&records, &filter),
        search,
        &compute_stats(&records),
        today,
    );

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(attachment(staff_report_filename(search, today)))
        .body(report))
}

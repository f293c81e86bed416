use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{error, instrument, warn};
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::pipeline::ingest::{IngestError, ingest};
use crate::store::RecordStore;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Campus the muster belongs to (vadgaon, lonavala, pune, nashik)
    pub campus: Option<String>,
}

/// Upload a muster spreadsheet for one campus
///
/// The request body is the raw spreadsheet file. Every stored record of the
/// campus is replaced by the rows of the first worksheet.
#[utoipa::path(
    post,
    path = "/api/muster",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Muster ingested", body = crate::pipeline::ingest::IngestSummary),
        (status = 400, description = "Unknown campus", body = Object, example = json!({
            "message": "Unrecognized campus 'mumbai'"
        })),
        (status = 422, description = "Unreadable or empty spreadsheet", body = Object, example = json!({
            "message": "The uploaded file has no attendance rows"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Muster"
)]
#[instrument(
    name = "muster_upload",
    skip_all,
    fields(campus = ?query.campus, bytes = body.len())
)]
pub async fn upload_muster(
    store: web::Data<dyn RecordStore>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let campus = query.into_inner().campus.unwrap_or_default();
    let store = store.into_inner();

    // spreadsheet decoding and the blob write both block
    let result = web::block(move || ingest(&body, &campus, store.as_ref()))
        .await
        .map_err(|e| {
            error!(error = %e, "Muster ingest task failed");
            ApiError::Internal
        })?;

    match result {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e @ IngestError::Storage(_)) => {
            error!(error = %e, "Muster could not be stored");
            Err(e.into())
        }
        Err(e) => {
            warn!(error = %e, "Muster upload rejected");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{seeded_store, temp_store};
    use crate::model::{attendance::sample, campus::Campus};
    use crate::pipeline::ingest::fixtures::{muster_xlsx, row};
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn upload_replaces_campus_and_reports_counts() {
        let (_dir, store) = seeded_store(vec![
            sample("P1", "Old Pune", "Present", Campus::Pune),
            sample("N1", "Nashik", "Absent", Campus::Nashik),
        ]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store.clone()))
                .route("/muster", web::post().to(upload_muster)),
        )
        .await;

        let mut short = row(3, "P3", "Short Row", "Absent", "00:00");
        short.truncate(5);
        let bytes = muster_xlsx(&[row(1, "P8", "New Pune", "Present", "00:00"), short]);

        let req = test::TestRequest::post()
            .uri("/muster?campus=pune")
            .set_payload(bytes)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["campus"], "pune");
        assert_eq!(body["records_parsed"], 1);
        assert_eq!(body["records_skipped"], 1);

        let mut codes: Vec<String> = store.load().into_iter().map(|r| r.ecode).collect();
        codes.sort();
        assert_eq!(codes, vec!["N1", "P8"]);
    }

    #[actix_web::test]
    async fn upload_of_only_short_rows_succeeds_and_empties_campus() {
        let (_dir, store) = seeded_store(vec![
            sample("P1", "Old Pune", "Present", Campus::Pune),
            sample("N1", "Nashik", "Absent", Campus::Nashik),
        ]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store.clone()))
                .route("/muster", web::post().to(upload_muster)),
        )
        .await;

        let mut a = row(1, "P2", "Short", "Present", "00:00");
        a.truncate(10);
        let mut b = row(2, "P3", "Shorter", "Absent", "00:00");
        b.truncate(12);

        let req = test::TestRequest::post()
            .uri("/muster?campus=pune")
            .set_payload(muster_xlsx(&[a, b]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["records_parsed"], 0);
        assert_eq!(body["records_skipped"], 2);

        let codes: Vec<String> = store.load().into_iter().map(|r| r.ecode).collect();
        assert_eq!(codes, vec!["N1"]);
    }

    #[actix_web::test]
    async fn missing_campus_is_bad_request() {
        let (_dir, store) = temp_store();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store))
                .route("/muster", web::post().to(upload_muster)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/muster")
            .set_payload(muster_xlsx(&[row(1, "E1", "A", "Present", "00:00")]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn non_spreadsheet_body_is_unprocessable() {
        let (_dir, store) = seeded_store(vec![sample("V1", "V", "Present", Campus::Vadgaon)]);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store.clone()))
                .route("/muster", web::post().to(upload_muster)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/muster?campus=vadgaon")
            .set_payload("SN,ECode,Name")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().starts_with("Error processing"));
        assert_eq!(store.load().len(), 1);
    }
}

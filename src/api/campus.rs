use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::model::campus::Campus;

#[derive(Serialize, ToSchema)]
pub struct CampusInfo {
    #[schema(example = "vadgaon")]
    pub id: Campus,
    #[schema(example = "Vadgaon Campus")]
    pub name: &'static str,
}

/// Campuses accepted by the muster upload
#[utoipa::path(
    get,
    path = "/api/campuses",
    responses(
        (status = 200, description = "Campus list", body = [CampusInfo])
    ),
    tag = "Muster"
)]
pub async fn list_campuses() -> impl Responder {
    let campuses: Vec<CampusInfo> = Campus::iter()
        .map(|id| CampusInfo {
            id,
            name: id.display_name(),
        })
        .collect();

    HttpResponse::Ok().json(campuses)
}

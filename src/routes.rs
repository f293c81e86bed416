use crate::{
    api::{attendance, campus, muster, reports},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(per_ms.max(1))
            .burst_size(requests_per_min.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_else(GovernorConfig::default);
        Governor::new(&cfg)
    }

    let upload_limiter = build_limiter(config.rate_upload_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter) // rate limiting
            .route("/campuses", web::get().to(campus::list_campuses))
            .service(
                web::resource("/muster")
                    .app_data(web::PayloadConfig::new(config.max_upload_bytes))
                    .wrap(upload_limiter)
                    .route(web::post().to(muster::upload_muster)),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::delete().to(attendance::clear_attendance)),
                    )
                    // /attendance/stats
                    .service(
                        web::resource("/stats").route(web::get().to(attendance::attendance_stats)),
                    )
                    // /attendance/export
                    .service(
                        web::resource("/export")
                            .route(web::get().to(attendance::export_attendance)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .service(web::resource("/daily").route(web::get().to(reports::daily)))
                    .service(
                        web::resource("/daily/export").route(web::get().to(reports::daily_export)),
                    )
                    .service(web::resource("/staff").route(web::get().to(reports::staff))),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::seeded_store;
    use crate::model::{attendance::sample, campus::Campus};
    use crate::pipeline::ingest::fixtures::{muster_xlsx, row};
    use actix_web::{App, http::StatusCode, test};
    use std::net::SocketAddr;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[actix_web::test]
    async fn upload_then_read_back_through_the_api() {
        let (_dir, store) = seeded_store(vec![sample("N1", "Nashik", "Absent", Campus::Nashik)]);
        let config = Config::default();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store.clone()))
                .app_data(web::Data::new(config.clone()))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let bytes = muster_xlsx(&[
            row(1, "RAM12", "Suresh Patil", "Present", "00:05"),
            row(2, "E2", "Ramesh Kale", "Present (No OutPunch)", "00:00"),
        ]);
        let req = test::TestRequest::post()
            .uri("/api/muster?campus=lonavala")
            .peer_addr(peer())
            .set_payload(bytes)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/attendance/stats")
            .peer_addr(peer())
            .to_request();
        let stats: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["total_staff"], 3);
        assert_eq!(stats["present_today"], 1);
        assert_eq!(stats["absent_today"], 2);
        assert_eq!(stats["late_today"], 1);

        let req = test::TestRequest::get()
            .uri("/api/attendance?search=RAM")
            .peer_addr(peer())
            .to_request();
        let list: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list["total"], 2);
        assert_eq!(list["data"][0]["campus"], "lonavala");
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected() {
        let (_dir, store) = seeded_store(Vec::new());
        let config = Config {
            max_upload_bytes: 16,
            ..Config::default()
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(store.clone()))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/muster?campus=pune")
            .peer_addr(peer())
            .set_payload(vec![0u8; 64])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(store.load().is_empty());
    }
}

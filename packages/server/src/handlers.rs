//! HTTP handler functions for the vehicle watch API.

use actix_web::{HttpResponse, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use uuid::Uuid;
use vehicle_watch_alerts::{AlertError, EvidenceUpload, NewAlert};
use vehicle_watch_server_models::{
    ApiHealth, ApiPolice, ApiSuspectedVehicle, ApiVehicleRecord, CrimeReportRequest, EntryRequest,
    PoliceDashboardResponse, RegisterAccountRequest, StatusUpdateRequest, VehicleListQuery,
    VehicleListResponse,
};
use vehicle_watch_tracker::TrackerError;
use vehicle_watch_vehicle_models::{DateRange, SuspicionCheck as _, TrackedRecord, summarize};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/vehicles/`
///
/// Lists records whose entry time falls in the requested range, each
/// classified against the current alert set, plus summary counts.
pub async fn list_vehicles(
    state: web::Data<AppState>,
    params: web::Query<VehicleListQuery>,
) -> HttpResponse {
    let range = DateRange::new(params.from, params.to);
    let listed = state.tracker.list_records(range, state.alerts.as_ref());
    let summary = summarize(&listed);
    let records: Vec<ApiVehicleRecord> = listed.into_iter().map(ApiVehicleRecord::from).collect();

    HttpResponse::Ok().json(VehicleListResponse { records, summary })
}

/// `POST /api/vehicles/entry`
pub async fn record_entry(
    state: web::Data<AppState>,
    body: web::Json<EntryRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    match state
        .tracker
        .record_entry(&request.regs_no, request.slot_position.as_deref())
    {
        Ok(record) => {
            let suspected = state.alerts.matches(&record.registration_number);
            HttpResponse::Created().json(ApiVehicleRecord::from(TrackedRecord {
                record,
                suspected,
            }))
        }
        Err(e) => tracker_error_response(&e),
    }
}

/// `POST /api/vehicles/{id}/exit`
pub async fn record_exit(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let record_id = path.into_inner();

    match state.tracker.record_exit(record_id) {
        Ok(record) => {
            let suspected = state.alerts.matches(&record.registration_number);
            HttpResponse::Ok().json(ApiVehicleRecord::from(TrackedRecord {
                record,
                suspected,
            }))
        }
        Err(e) => tracker_error_response(&e),
    }
}

/// `POST /api/crime-reports`
///
/// Files a suspect-vehicle alert from a complaint submission. The
/// evidence image arrives base64-encoded; the core enforces the 5 MiB
/// ceiling on the decoded bytes.
pub async fn file_crime_report(
    state: web::Data<AppState>,
    body: web::Json<CrimeReportRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    let evidence = match request.image {
        Some(encoded) => match BASE64.decode(encoded.as_bytes()) {
            Ok(bytes) => Some(EvidenceUpload {
                bytes,
                content_type: request
                    .image_content_type
                    .unwrap_or_else(|| "image/jpeg".to_string()),
            }),
            Err(e) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Invalid image encoding: {e}")
                }));
            }
        },
        None => None,
    };

    let new_alert = NewAlert {
        registration_number: request.vehicle_number,
        crime_attempted: request.crime_type,
        spotted_location: request.location,
        reporter_reference: request.user_id,
        extra_info: request.extra_info,
        evidence,
    };

    match state.alerts.file_alert(new_alert) {
        Ok(alert) => HttpResponse::Created().json(ApiSuspectedVehicle::from(alert)),
        Err(e) => alert_error_response(&e),
    }
}

/// `POST /api/alerts/{id}/status`
pub async fn update_alert_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<StatusUpdateRequest>,
) -> HttpResponse {
    let alert_id = path.into_inner();
    let request = body.into_inner();

    match state
        .alerts
        .advance_status(alert_id, request.status, request.found_location)
    {
        Ok(alert) => HttpResponse::Ok().json(ApiSuspectedVehicle::from(alert)),
        Err(e) => alert_error_response(&e),
    }
}

/// `POST /api/police-accounts`
pub async fn register_account(
    state: web::Data<AppState>,
    body: web::Json<RegisterAccountRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    match state
        .alerts
        .register_account(&request.username, &request.locations)
    {
        Ok(account) => HttpResponse::Created().json(ApiPolice::from(account)),
        Err(e) => alert_error_response(&e),
    }
}

/// `GET /api/police-dashboard/{id}/`
///
/// Returns the account's relevant alerts, most recent first, alongside
/// the account itself.
pub async fn police_dashboard(state: web::Data<AppState>, path: web::Path<Uuid>) -> HttpResponse {
    let account_id = path.into_inner();

    let account = match state.alerts.account(account_id) {
        Ok(account) => account,
        Err(e) => return alert_error_response(&e),
    };

    match state.alerts.alerts_for(account_id) {
        Ok(alerts) => HttpResponse::Ok().json(PoliceDashboardResponse {
            police: ApiPolice::from(account),
            suspected_vehicles: alerts.into_iter().map(ApiSuspectedVehicle::from).collect(),
        }),
        Err(e) => alert_error_response(&e),
    }
}

/// Maps tracker errors to HTTP responses: validation is client-correctable
/// (400), missing records are 404, state-precondition violations are 409.
fn tracker_error_response(e: &TrackerError) -> HttpResponse {
    log::debug!("Rejected tracker request: {e}");
    let body = serde_json::json!({ "error": e.to_string() });

    match e {
        TrackerError::Validation { .. } => HttpResponse::BadRequest().json(body),
        TrackerError::NotFound { .. } => HttpResponse::NotFound().json(body),
        TrackerError::SlotConflict { .. } | TrackerError::AlreadyExited { .. } => {
            HttpResponse::Conflict().json(body)
        }
    }
}

/// Maps alert board errors to HTTP responses.
fn alert_error_response(e: &AlertError) -> HttpResponse {
    log::debug!("Rejected alert request: {e}");
    let body = serde_json::json!({ "error": e.to_string() });

    match e {
        AlertError::Validation { .. } => HttpResponse::BadRequest().json(body),
        AlertError::NotFound { .. } | AlertError::AccountNotFound { .. } => {
            HttpResponse::NotFound().json(body)
        }
        AlertError::InvalidTransition { .. } => HttpResponse::Conflict().json(body),
        AlertError::PayloadTooLarge(_) => HttpResponse::PayloadTooLarge().json(body),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use serde_json::{Value, json};
    use vehicle_watch_alerts::AlertBoard;
    use vehicle_watch_tracker::PresenceTracker;

    use super::*;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            tracker: Arc::new(PresenceTracker::new()),
            alerts: Arc::new(AlertBoard::new()),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .service(crate::api_scope()),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = app!(state());
        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/health").to_request())
                .await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn alert_filed_after_entry_flags_listing() {
        let state = state();
        let app = app!(state);

        let entry: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/vehicles/entry")
                .set_json(json!({ "regs_no": "xy-42", "slot_position": "A1" }))
                .to_request(),
        )
        .await;
        assert_eq!(entry["regs_no"], "XY-42");
        assert_eq!(entry["status"], "INSIDE");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/crime-reports")
                .set_json(json!({
                    "user_id": "user-17",
                    "vehicle_number": "XY-42",
                    "location": "MG Road",
                    "crime_type": "Hit and Run"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        let listing: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/vehicles/").to_request(),
        )
        .await;
        assert_eq!(listing["records"][0]["status"], "SUSPECTED");
        assert_eq!(listing["records"][0]["in_parking"], true);
        assert_eq!(listing["summary"]["total"], 1);
        assert_eq!(listing["summary"]["inside"], 1);
        assert_eq!(listing["summary"]["suspected"], 1);
    }

    #[actix_web::test]
    async fn occupied_slot_conflicts() {
        let app = app!(state());

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/vehicles/entry")
                .set_json(json!({ "regs_no": "ABC-1", "slot_position": "A1" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/vehicles/entry")
                .set_json(json!({ "regs_no": "ABC-2", "slot_position": "A1" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn double_exit_conflicts_and_unknown_record_is_404() {
        let app = app!(state());

        let entry: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/vehicles/entry")
                .set_json(json!({ "regs_no": "AB-12", "slot_position": null }))
                .to_request(),
        )
        .await;
        let id = entry["id"].as_str().unwrap().to_string();

        let exit_uri = format!("/api/vehicles/{id}/exit");
        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri(&exit_uri).to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri(&exit_uri).to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

        let missing = format!("/api/vehicles/{}/exit", Uuid::new_v4());
        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri(&missing).to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn dashboard_shows_relevant_alerts() {
        let app = app!(state());

        let police: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/police-accounts")
                .set_json(json!({ "username": "officer-rao", "locations": ["MG Road"] }))
                .to_request(),
        )
        .await;
        let police_id = police["id"].as_str().unwrap().to_string();

        for (plate, location) in [("AB-1", "MG Road, Sector 4"), ("AB-2", "Harbor Bridge")] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/api/crime-reports")
                    .set_json(json!({
                        "user_id": "user-17",
                        "vehicle_number": plate,
                        "location": location,
                        "crime_type": "Theft"
                    }))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        }

        let dashboard: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/police-dashboard/{police_id}/"))
                .to_request(),
        )
        .await;
        assert_eq!(dashboard["police"]["username"], "officer-rao");
        let vehicles = dashboard["suspected_vehicles"].as_array().unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0]["regs_no"], "AB-1");
        assert_eq!(vehicles[0]["status"], "pending");
    }

    #[actix_web::test]
    async fn backward_status_transition_conflicts() {
        let app = app!(state());

        let alert: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/crime-reports")
                .set_json(json!({
                    "user_id": "user-17",
                    "vehicle_number": "XY-42",
                    "location": "MG Road",
                    "crime_type": "Theft"
                }))
                .to_request(),
        )
        .await;
        let status_uri = format!("/api/alerts/{}/status", alert["id"].as_str().unwrap());

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&status_uri)
                .set_json(json!({ "status": "resolved", "found_location": "Central Garage" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&status_uri)
                .set_json(json!({ "status": "pending" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn malformed_image_encoding_is_rejected() {
        let app = app!(state());

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/crime-reports")
                .set_json(json!({
                    "user_id": "user-17",
                    "vehicle_number": "XY-42",
                    "location": "MG Road",
                    "crime_type": "Theft",
                    "image": "not base64!!"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}

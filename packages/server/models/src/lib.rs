#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the vehicle watch server.
//!
//! These types are serialized to JSON for the REST API. Field names
//! (`regs_no`, `in_date_time`, ...) follow the wire shapes the operator
//! and police dashboards already render, so they must stay stable; they
//! are kept separate from the core types to allow independent evolution
//! of the API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vehicle_watch_alert_models::{Alert, AlertStatus, MonitoringAccount};
use vehicle_watch_vehicle_models::{PresenceSummary, TrackedRecord, VehicleStatus};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server considers itself healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// A vehicle record as returned by the record manager listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiVehicleRecord {
    /// Unique record ID.
    pub id: Uuid,
    /// Normalized plate.
    pub regs_no: String,
    /// Entry detection time.
    pub in_date_time: DateTime<Utc>,
    /// Exit detection time, absent while the vehicle is inside.
    pub out_date_time: Option<DateTime<Utc>>,
    /// Whether the vehicle is currently inside.
    pub in_parking: bool,
    /// Assigned slot, if any.
    pub slot_position: Option<String>,
    /// Display classification (`SUSPECTED` outranks `INSIDE`).
    pub status: VehicleStatus,
}

impl From<TrackedRecord> for ApiVehicleRecord {
    fn from(tracked: TrackedRecord) -> Self {
        let status = tracked.status();
        let record = tracked.record;
        Self {
            id: record.id,
            regs_no: record.registration_number.to_string(),
            in_date_time: record.entry_time,
            out_date_time: record.exit_time(),
            in_parking: record.in_parking(),
            slot_position: record.slot_position,
            status,
        }
    }
}

/// Response body for the record manager listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleListResponse {
    /// Records in the requested range.
    pub records: Vec<ApiVehicleRecord>,
    /// Aggregate counts over `records`.
    pub summary: PresenceSummary,
}

/// Query parameters for the record manager listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleListQuery {
    /// Minimum entry time (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Maximum entry time (RFC 3339).
    pub to: Option<DateTime<Utc>>,
}

/// Request body for recording a vehicle entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRequest {
    /// Raw plate as read by the entry sensor.
    pub regs_no: String,
    /// Slot to assign, if any.
    pub slot_position: Option<String>,
}

/// Request body for filing a crime report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrimeReportRequest {
    /// Opaque reference to the submitting user.
    pub user_id: String,
    /// Reported plate.
    pub vehicle_number: String,
    /// Where the vehicle was spotted.
    pub location: String,
    /// Reported crime type.
    pub crime_type: String,
    /// Optional free-text notes.
    pub extra_info: Option<String>,
    /// Optional base64-encoded evidence image.
    pub image: Option<String>,
    /// Content type of `image` (defaults to `image/jpeg`).
    pub image_content_type: Option<String>,
}

/// Request body for advancing an alert's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// Target status.
    pub status: AlertStatus,
    /// Where the vehicle was found, recorded on resolution.
    pub found_location: Option<String>,
}

/// Request body for registering a police monitoring account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAccountRequest {
    /// Display name.
    pub username: String,
    /// Watched locations.
    pub locations: Vec<String>,
}

/// A suspect-vehicle alert as rendered on the police dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuspectedVehicle {
    /// Unique alert ID.
    pub id: Uuid,
    /// Normalized plate.
    pub regs_no: String,
    /// Where the vehicle was spotted.
    pub spotted_location: String,
    /// Where the vehicle was found, absent until resolution.
    pub found_location: Option<String>,
    /// Reported crime type.
    pub crime_attempted: String,
    /// Reference to the submitting user.
    pub user: String,
    /// When the complaint was filed.
    pub date_time: DateTime<Utc>,
    /// Investigation status.
    pub status: AlertStatus,
}

impl From<Alert> for ApiSuspectedVehicle {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            regs_no: alert.registration_number.to_string(),
            spotted_location: alert.spotted_location,
            found_location: alert.found_location,
            crime_attempted: alert.crime_attempted,
            user: alert.reporter_reference,
            date_time: alert.created_at,
            status: alert.status,
        }
    }
}

/// A police account as echoed by the dashboard endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPolice {
    /// Unique account ID.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Watched locations (normalized).
    pub locations: Vec<String>,
}

impl From<MonitoringAccount> for ApiPolice {
    fn from(account: MonitoringAccount) -> Self {
        Self {
            id: account.id,
            username: account.username,
            locations: account.locations.into_iter().collect(),
        }
    }
}

/// Response body for the police dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliceDashboardResponse {
    /// The requesting account.
    pub police: ApiPolice,
    /// Relevant alerts, most recent first.
    pub suspected_vehicles: Vec<ApiSuspectedVehicle>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use vehicle_watch_vehicle_models::{Presence, RegistrationNumber, VehicleRecord};

    use super::*;

    #[test]
    fn vehicle_record_wire_shape() {
        let entry = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let tracked = TrackedRecord {
            record: VehicleRecord {
                id: Uuid::nil(),
                registration_number: RegistrationNumber::parse("XY-42").unwrap(),
                entry_time: entry,
                presence: Presence::Inside,
                slot_position: Some("A1".to_string()),
            },
            suspected: true,
        };

        let api = ApiVehicleRecord::from(tracked);
        assert_eq!(api.status, VehicleStatus::Suspected);
        assert!(api.in_parking);

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["regs_no"], "XY-42");
        assert_eq!(json["slot_position"], "A1");
        assert_eq!(json["out_date_time"], serde_json::Value::Null);
        assert_eq!(json["status"], "SUSPECTED");
    }

    #[test]
    fn suspected_vehicle_wire_shape() {
        let alert = Alert {
            id: Uuid::nil(),
            registration_number: RegistrationNumber::parse("XY-42").unwrap(),
            crime_attempted: "Hit and Run".to_string(),
            spotted_location: "MG Road".to_string(),
            found_location: None,
            reporter_reference: "user-17".to_string(),
            extra_info: None,
            evidence: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            status: AlertStatus::Pending,
        };

        let json = serde_json::to_value(ApiSuspectedVehicle::from(alert)).unwrap();
        assert_eq!(json["regs_no"], "XY-42");
        assert_eq!(json["user"], "user-17");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["found_location"], serde_json::Value::Null);
    }

    #[test]
    fn status_update_request_parses_lowercase_status() {
        let request: StatusUpdateRequest =
            serde_json::from_str(r#"{"status":"investigating"}"#).unwrap();
        assert_eq!(request.status, AlertStatus::Investigating);
        assert_eq!(request.found_location, None);
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Suspect-vehicle alert board.
//!
//! Owns the set of complaint-filed alerts and the registry of police
//! monitoring accounts. Exposes complaint intake, the monotonic status
//! lifecycle, per-account relevance filtering, and the read-only
//! `matches` predicate the presence tracker uses to derive `suspected`.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vehicle_watch_alert_models::{
    Alert, AlertStatus, EvidenceImage, MAX_EXTRA_INFO_CHARS, MonitoringAccount,
};
use vehicle_watch_vehicle_models::{RegistrationNumber, SuspicionCheck};

/// Errors that can occur during alert board operations.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// A required input field is missing or malformed.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending input field.
        field: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// No alert exists with the given ID.
    #[error("Alert not found: {id}")]
    NotFound {
        /// The requested alert ID.
        id: Uuid,
    },

    /// No monitoring account exists with the given ID.
    #[error("Monitoring account not found: {id}")]
    AccountNotFound {
        /// The requested account ID.
        id: Uuid,
    },

    /// The requested status does not follow the monotonic lifecycle order
    /// from the alert's current status.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// The alert's current status.
        from: AlertStatus,
        /// The rejected target status.
        to: AlertStatus,
    },

    /// The evidence attachment exceeds the size ceiling.
    #[error(transparent)]
    PayloadTooLarge(#[from] vehicle_watch_alert_models::EvidenceTooLargeError),
}

/// A binary attachment as submitted with a complaint, before the size
/// ceiling has been checked.
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    /// Raw attachment bytes.
    pub bytes: Vec<u8>,
    /// Declared content type (e.g. `image/jpeg`).
    pub content_type: String,
}

/// Input for filing a new alert. Fields arrive raw from the intake form
/// and are validated and normalized by [`AlertBoard::file_alert`].
#[derive(Debug, Clone)]
pub struct NewAlert {
    /// Reported plate, normalized on intake.
    pub registration_number: String,
    /// Reported crime type.
    pub crime_attempted: String,
    /// Where the vehicle was spotted.
    pub spotted_location: String,
    /// Opaque reference to the submitting user.
    pub reporter_reference: String,
    /// Optional free-text notes.
    pub extra_info: Option<String>,
    /// Optional evidence attachment.
    pub evidence: Option<EvidenceUpload>,
}

/// The shared alert set and monitoring account registry.
///
/// Same readers-writer discipline as the presence tracker: feeds and the
/// `matches` predicate run under read locks, intake and status changes
/// under write locks.
#[derive(Debug, Default)]
pub struct AlertBoard {
    alerts: RwLock<Vec<Alert>>,
    accounts: RwLock<HashMap<Uuid, MonitoringAccount>>,
}

impl AlertBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a new alert from a complaint submission. The alert starts in
    /// [`AlertStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Validation`] if the plate, crime type, or
    /// location are empty (or the notes exceed [`MAX_EXTRA_INFO_CHARS`]),
    /// or [`AlertError::PayloadTooLarge`] if the attachment exceeds the
    /// ceiling.
    ///
    /// # Panics
    ///
    /// Panics if the alert set lock is poisoned.
    pub fn file_alert(&self, new_alert: NewAlert) -> Result<Alert, AlertError> {
        self.file_alert_at(new_alert, Utc::now())
    }

    /// Files a new alert with an explicit submission time.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::file_alert`].
    ///
    /// # Panics
    ///
    /// Panics if the alert set lock is poisoned.
    pub fn file_alert_at(
        &self,
        new_alert: NewAlert,
        created_at: DateTime<Utc>,
    ) -> Result<Alert, AlertError> {
        let registration_number = RegistrationNumber::parse(&new_alert.registration_number)
            .map_err(|e| AlertError::Validation {
                field: "vehicle_number",
                message: e.to_string(),
            })?;

        let crime_attempted = required_text(&new_alert.crime_attempted, "crime_type")?;
        let spotted_location = required_text(&new_alert.spotted_location, "location")?;

        let extra_info = new_alert
            .extra_info
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if let Some(info) = &extra_info {
            let chars = info.chars().count();
            if chars > MAX_EXTRA_INFO_CHARS {
                return Err(AlertError::Validation {
                    field: "extra_info",
                    message: format!("{chars} characters, limit is {MAX_EXTRA_INFO_CHARS}"),
                });
            }
        }

        let evidence = new_alert
            .evidence
            .map(|upload| EvidenceImage::new(upload.bytes, upload.content_type))
            .transpose()?;

        let alert = Alert {
            id: Uuid::new_v4(),
            registration_number,
            crime_attempted,
            spotted_location,
            found_location: None,
            reporter_reference: new_alert.reporter_reference,
            extra_info,
            evidence,
            created_at,
            status: AlertStatus::Pending,
        };

        log::info!(
            "Alert {} filed for plate {} ({})",
            alert.id,
            alert.registration_number,
            alert.crime_attempted
        );

        let mut alerts = self.alerts.write().expect("alert set lock poisoned");
        alerts.push(alert.clone());
        Ok(alert)
    }

    /// Advances an alert's status, recording the found location when one
    /// is provided (typically on resolution).
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::NotFound`] if no alert has the given ID, or
    /// [`AlertError::InvalidTransition`] if `next` does not follow the
    /// monotonic order from the alert's current status.
    ///
    /// # Panics
    ///
    /// Panics if the alert set lock is poisoned.
    pub fn advance_status(
        &self,
        alert_id: Uuid,
        next: AlertStatus,
        found_location: Option<String>,
    ) -> Result<Alert, AlertError> {
        let mut alerts = self.alerts.write().expect("alert set lock poisoned");

        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or(AlertError::NotFound { id: alert_id })?;

        if !alert.status.can_advance_to(next) {
            return Err(AlertError::InvalidTransition {
                from: alert.status,
                to: next,
            });
        }

        alert.status = next;
        if let Some(location) = found_location {
            let location = location.trim().to_string();
            if !location.is_empty() {
                alert.found_location = Some(location);
            }
        }

        log::info!("Alert {} advanced to {}", alert.id, alert.status);

        Ok(alert.clone())
    }

    /// Registers a police monitoring account with a watch list of
    /// locations. Locations are normalized; empty entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::Validation`] if the username is empty.
    ///
    /// # Panics
    ///
    /// Panics if the account registry lock is poisoned.
    pub fn register_account(
        &self,
        username: &str,
        locations: &[String],
    ) -> Result<MonitoringAccount, AlertError> {
        let username = required_text(username, "username")?;

        let locations = locations
            .iter()
            .map(|l| MonitoringAccount::normalize_location(l))
            .filter(|l| !l.is_empty())
            .collect();

        let account = MonitoringAccount {
            id: Uuid::new_v4(),
            username,
            locations,
        };

        let mut accounts = self.accounts.write().expect("account registry lock poisoned");
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Looks up a monitoring account.
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::AccountNotFound`] if no account has the
    /// given ID.
    ///
    /// # Panics
    ///
    /// Panics if the account registry lock is poisoned.
    pub fn account(&self, account_id: Uuid) -> Result<MonitoringAccount, AlertError> {
        let accounts = self.accounts.read().expect("account registry lock poisoned");
        accounts
            .get(&account_id)
            .cloned()
            .ok_or(AlertError::AccountNotFound { id: account_id })
    }

    /// Returns the alerts relevant to a monitoring account, most recent
    /// first.
    ///
    /// An alert is relevant when its spotted or found location falls
    /// under the account's watch list (see
    /// [`MonitoringAccount::watches`]).
    ///
    /// # Errors
    ///
    /// Returns [`AlertError::AccountNotFound`] if no account has the
    /// given ID.
    ///
    /// # Panics
    ///
    /// Panics if a lock is poisoned.
    pub fn alerts_for(&self, account_id: Uuid) -> Result<Vec<Alert>, AlertError> {
        let account = self.account(account_id)?;

        let alerts = self.alerts.read().expect("alert set lock poisoned");
        let mut relevant: Vec<Alert> = alerts
            .iter()
            .filter(|a| {
                account.watches(&a.spotted_location)
                    || a.found_location
                        .as_deref()
                        .is_some_and(|found| account.watches(found))
            })
            .cloned()
            .collect();

        relevant.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(relevant)
    }
}

impl SuspicionCheck for AlertBoard {
    /// Whether any non-resolved alert's plate equals the given one.
    /// Read-only; safe to call on every listing request.
    fn matches(&self, plate: &RegistrationNumber) -> bool {
        let alerts = self.alerts.read().expect("alert set lock poisoned");
        alerts
            .iter()
            .any(|a| a.is_active() && a.registration_number == *plate)
    }
}

/// Trims a required free-text field, rejecting empty input.
fn required_text(raw: &str, field: &'static str) -> Result<String, AlertError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AlertError::Validation {
            field,
            message: format!("{field} is required"),
        });
    }
    Ok(trimmed.to_string())
}

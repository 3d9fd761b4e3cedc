#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Suspect-vehicle alert types and the alert status lifecycle.
//!
//! An alert is one citizen complaint flagging a plate as connected to a
//! crime. Its status moves through a monotonic `pending → investigating →
//! resolved` lifecycle; a plate counts as *suspected* while it has at
//! least one non-resolved alert.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;
use vehicle_watch_vehicle_models::RegistrationNumber;

/// Maximum evidence attachment size in bytes (5 MiB, matching the intake
/// form's upload ceiling).
pub const MAX_EVIDENCE_BYTES: usize = 5 * 1024 * 1024;

/// Maximum length of the free-text `extra_info` field in characters.
pub const MAX_EXTRA_INFO_CHARS: usize = 500;

/// Investigation status of an alert.
///
/// Transitions are monotonic: each step must move strictly forward in
/// `pending → investigating → resolved` order. Skipping `investigating`
/// is allowed; any backward step is not.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertStatus {
    /// Filed, no police action yet.
    Pending,
    /// Actively being investigated.
    Investigating,
    /// Closed; the plate no longer counts as suspected.
    Resolved,
}

impl AlertStatus {
    /// Position in the monotonic lifecycle order.
    #[must_use]
    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Investigating => 1,
            Self::Resolved => 2,
        }
    }

    /// Whether moving from `self` to `next` is a valid (strictly forward)
    /// transition.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        next.rank() > self.rank()
    }

    /// Whether an alert in this status still flags its plate as suspected.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Resolved)
    }
}

/// A binary evidence attachment submitted with a complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceImage {
    bytes: Vec<u8>,
    content_type: String,
}

impl EvidenceImage {
    /// Wraps attachment bytes, enforcing the size ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceTooLargeError`] if `bytes` exceeds
    /// [`MAX_EVIDENCE_BYTES`].
    pub fn new(bytes: Vec<u8>, content_type: String) -> Result<Self, EvidenceTooLargeError> {
        if bytes.len() > MAX_EVIDENCE_BYTES {
            return Err(EvidenceTooLargeError { size: bytes.len() });
        }
        Ok(Self {
            bytes,
            content_type,
        })
    }

    /// The attachment bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The declared content type (e.g. `image/jpeg`).
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Error returned when an evidence attachment exceeds the size ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceTooLargeError {
    /// The rejected attachment's size in bytes.
    pub size: usize,
}

impl std::fmt::Display for EvidenceTooLargeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "evidence attachment is {} bytes, limit is {MAX_EVIDENCE_BYTES}",
            self.size
        )
    }
}

impl std::error::Error for EvidenceTooLargeError {}

/// One complaint report flagging a plate as connected to a crime.
///
/// Alerts are never deleted; resolution is recorded by advancing `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Unique alert ID.
    pub id: Uuid,
    /// Normalized plate, matched against vehicle records by exact string
    /// equality.
    pub registration_number: RegistrationNumber,
    /// Reported crime type (free text; vocabulary enforced by the intake
    /// UI, not here).
    pub crime_attempted: String,
    /// Where the vehicle was spotted when the crime occurred.
    pub spotted_location: String,
    /// Where the vehicle was eventually found, populated on resolution.
    pub found_location: Option<String>,
    /// Opaque reference to the submitting user.
    pub reporter_reference: String,
    /// Optional free-text notes, at most [`MAX_EXTRA_INFO_CHARS`] chars.
    pub extra_info: Option<String>,
    /// Optional evidence attachment. Not part of the wire shape.
    #[serde(skip)]
    pub evidence: Option<EvidenceImage>,
    /// When the complaint was filed.
    pub created_at: DateTime<Utc>,
    /// Investigation status.
    pub status: AlertStatus,
}

impl Alert {
    /// Whether this alert still flags its plate as suspected.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// A police account scoped to a set of watched locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringAccount {
    /// Unique account ID.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Watched locations, stored normalized (trimmed, lowercased).
    pub locations: BTreeSet<String>,
}

impl MonitoringAccount {
    /// Normalizes a location string for matching: trimmed and lowercased.
    #[must_use]
    pub fn normalize_location(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Whether the given alert location falls under this account's watch
    /// list.
    ///
    /// Matching rule: case-insensitive containment in either direction.
    /// Alert locations are free text ("street address or landmark") while
    /// the watch list holds area names, so "MG Road, Sector 4" matches a
    /// watched "mg road" and vice versa.
    #[must_use]
    pub fn watches(&self, location: &str) -> bool {
        let location = Self::normalize_location(location);
        if location.is_empty() {
            return false;
        }
        self.locations
            .iter()
            .any(|watched| location.contains(watched.as_str()) || watched.contains(&location))
    }
}

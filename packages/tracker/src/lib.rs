#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Vehicle presence tracker.
//!
//! Owns the append-only table of parking records: creation on entry
//! detection, a single mutation on exit detection, and suspect-annotated
//! date-range listings. The `suspected` flag is derived at read time via
//! [`SuspicionCheck`] so alerts filed after a vehicle entered still
//! surface on its record.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vehicle_watch_vehicle_models::{
    DateRange, Presence, RegistrationNumber, SuspicionCheck, TrackedRecord, VehicleRecord,
};

pub use vehicle_watch_vehicle_models::{PresenceSummary, summarize};

/// Errors that can occur during presence tracking operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// A required input field is missing or malformed.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending input field.
        field: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// No record exists with the given ID.
    #[error("Vehicle record not found: {id}")]
    NotFound {
        /// The requested record ID.
        id: Uuid,
    },

    /// The slot already holds a vehicle that has not exited.
    #[error("Slot {slot} is already occupied")]
    SlotConflict {
        /// The contested slot.
        slot: String,
    },

    /// The record's exit was already detected.
    ///
    /// A second exit for the same record means a duplicate or faulty
    /// sensor event, so this is a hard error rather than an idempotent
    /// no-op. The stored record is left unchanged.
    #[error("Record {id} already exited at {exited_at}")]
    AlreadyExited {
        /// The record ID.
        id: Uuid,
        /// When the exit was originally detected.
        exited_at: DateTime<Utc>,
    },
}

/// The shared table of parking records.
///
/// One readers-writer lock over the table: listings run under the read
/// lock with arbitrary concurrency, while entries and exits take the
/// write lock, which also serializes the per-slot occupancy check against
/// concurrent entry-detection events.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    records: RwLock<Vec<VehicleRecord>>,
}

impl PresenceTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry-detection event at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] if the plate or a provided
    /// slot is empty after normalization, or
    /// [`TrackerError::SlotConflict`] if the slot already holds a
    /// non-exited record.
    ///
    /// # Panics
    ///
    /// Panics if the record table lock is poisoned.
    pub fn record_entry(
        &self,
        plate: &str,
        slot: Option<&str>,
    ) -> Result<VehicleRecord, TrackerError> {
        self.record_entry_at(plate, slot, Utc::now())
    }

    /// Records an entry-detection event carrying its own timestamp.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::record_entry`].
    ///
    /// # Panics
    ///
    /// Panics if the record table lock is poisoned.
    pub fn record_entry_at(
        &self,
        plate: &str,
        slot: Option<&str>,
        entry_time: DateTime<Utc>,
    ) -> Result<VehicleRecord, TrackerError> {
        let registration_number =
            RegistrationNumber::parse(plate).map_err(|e| TrackerError::Validation {
                field: "registration_number",
                message: e.to_string(),
            })?;

        let slot_position = slot
            .map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Err(TrackerError::Validation {
                        field: "slot_position",
                        message: "slot identifier is empty".to_string(),
                    })
                } else {
                    Ok(trimmed.to_string())
                }
            })
            .transpose()?;

        let mut records = self.records.write().expect("record table lock poisoned");

        if let Some(slot) = &slot_position {
            let occupied = records
                .iter()
                .any(|r| r.in_parking() && r.slot_position.as_deref() == Some(slot));
            if occupied {
                return Err(TrackerError::SlotConflict { slot: slot.clone() });
            }
        }

        let record = VehicleRecord {
            id: Uuid::new_v4(),
            registration_number,
            entry_time,
            presence: Presence::Inside,
            slot_position,
        };

        log::info!(
            "Vehicle {} entered{}",
            record.registration_number,
            record
                .slot_position
                .as_deref()
                .map_or_else(String::new, |s| format!(" at slot {s}"))
        );

        records.push(record.clone());
        Ok(record)
    }

    /// Records an exit-detection event at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] if no record has the given ID,
    /// or [`TrackerError::AlreadyExited`] if the record's exit was already
    /// detected.
    ///
    /// # Panics
    ///
    /// Panics if the record table lock is poisoned.
    pub fn record_exit(&self, record_id: Uuid) -> Result<VehicleRecord, TrackerError> {
        self.record_exit_at(record_id, Utc::now())
    }

    /// Records an exit-detection event carrying its own timestamp.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::record_exit`].
    ///
    /// # Panics
    ///
    /// Panics if the record table lock is poisoned.
    pub fn record_exit_at(
        &self,
        record_id: Uuid,
        exit_time: DateTime<Utc>,
    ) -> Result<VehicleRecord, TrackerError> {
        let mut records = self.records.write().expect("record table lock poisoned");

        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or(TrackerError::NotFound { id: record_id })?;

        if let Some(exited_at) = record.exit_time() {
            return Err(TrackerError::AlreadyExited {
                id: record_id,
                exited_at,
            });
        }

        record.presence = Presence::Exited { at: exit_time };

        log::info!("Vehicle {} exited", record.registration_number);

        Ok(record.clone())
    }

    /// Lists records whose entry time falls in `range`, each annotated
    /// with its `suspected` flag computed against the current alert set.
    ///
    /// # Panics
    ///
    /// Panics if the record table lock is poisoned.
    #[must_use]
    pub fn list_records(
        &self,
        range: DateRange,
        alerts: &dyn SuspicionCheck,
    ) -> Vec<TrackedRecord> {
        let records = self.records.read().expect("record table lock poisoned");

        records
            .iter()
            .filter(|r| range.contains(r.entry_time))
            .map(|r| TrackedRecord {
                record: r.clone(),
                suspected: alerts.matches(&r.registration_number),
            })
            .collect()
    }
}

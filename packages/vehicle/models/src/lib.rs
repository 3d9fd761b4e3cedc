#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Vehicle presence record types and plate normalization.
//!
//! This crate defines the canonical shapes for a single vehicle's parking
//! session: the normalized registration number, the two-state presence
//! lifecycle, and the read-time status classification used by the record
//! manager and police dashboard views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// A normalized license plate string.
///
/// Plates are matched by exact string equality across the whole system, so
/// every plate entering the system goes through the same normalization:
/// trimmed and uppercased. The newtype makes it impossible to compare an
/// unnormalized plate against a stored one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationNumber(String);

impl RegistrationNumber {
    /// Normalizes and validates a raw plate string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPlateError`] if the input is empty after trimming.
    pub fn parse(raw: &str) -> Result<Self, InvalidPlateError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(InvalidPlateError);
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized plate string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RegistrationNumber {
    type Error = InvalidPlateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistrationNumber> for String {
    fn from(plate: RegistrationNumber) -> Self {
        plate.0
    }
}

impl std::str::FromStr for RegistrationNumber {
    type Err = InvalidPlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned when a plate string is empty after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPlateError;

impl std::fmt::Display for InvalidPlateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "registration number is empty after normalization")
    }
}

impl std::error::Error for InvalidPlateError {}

/// Whether a vehicle is still inside the facility.
///
/// An explicit two-state lifecycle instead of a nullable exit timestamp, so
/// "exit happens once" is enforced structurally: the exit time only exists
/// on the `Exited` variant and the tracker never transitions backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Presence {
    /// The vehicle has entered and not yet exited.
    Inside,
    /// The vehicle exited at the given time.
    Exited {
        /// When the exit was detected.
        at: DateTime<Utc>,
    },
}

impl Presence {
    /// Returns the exit time, if the vehicle has exited.
    #[must_use]
    pub const fn exited_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Inside => None,
            Self::Exited { at } => Some(at),
        }
    }
}

/// One vehicle's single entry-to-exit session within the facility.
///
/// Records are append-only audit history: they are created by an
/// entry-detection event, mutated exactly once by an exit-detection event,
/// and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Unique record ID, immutable.
    pub id: Uuid,
    /// Normalized plate. Not unique across records; a plate can re-enter
    /// many times.
    pub registration_number: RegistrationNumber,
    /// When the entry was detected, immutable.
    pub entry_time: DateTime<Utc>,
    /// Presence lifecycle state.
    pub presence: Presence,
    /// Assigned slot, set at entry and retained after exit.
    pub slot_position: Option<String>,
}

impl VehicleRecord {
    /// Whether the vehicle is currently inside. Always derived from
    /// [`Presence`], never stored independently.
    #[must_use]
    pub const fn in_parking(&self) -> bool {
        matches!(self.presence, Presence::Inside)
    }

    /// Returns the exit time, if the vehicle has exited.
    #[must_use]
    pub const fn exit_time(&self) -> Option<DateTime<Utc>> {
        self.presence.exited_at()
    }
}

/// Display-facing classification of a record.
///
/// Not stored; computed at read time from the record's presence and the
/// current alert set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    /// A non-resolved alert matches the plate. Takes priority over
    /// `Inside` so an active alert is never hidden by presence.
    Suspected,
    /// No matching alert, vehicle still inside.
    Inside,
    /// No matching alert, vehicle has exited.
    Exited,
}

impl VehicleStatus {
    /// Classifies a record given its read-time `suspected` flag.
    #[must_use]
    pub const fn classify(record: &VehicleRecord, suspected: bool) -> Self {
        if suspected {
            Self::Suspected
        } else if record.in_parking() {
            Self::Inside
        } else {
            Self::Exited
        }
    }
}

/// A [`VehicleRecord`] annotated with its read-time `suspected` flag.
///
/// The flag is computed against the alert set current at listing time, not
/// the alert set at entry time, so an alert filed while a vehicle is
/// parked retroactively flags the existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRecord {
    /// The underlying record.
    pub record: VehicleRecord,
    /// Whether a non-resolved alert matches the plate right now.
    pub suspected: bool,
}

impl TrackedRecord {
    /// Returns the display classification for this record.
    #[must_use]
    pub const fn status(&self) -> VehicleStatus {
        VehicleStatus::classify(&self.record, self.suspected)
    }
}

/// Inclusive entry-time filter for record listings. `None` bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Minimum entry time.
    pub from: Option<DateTime<Utc>>,
    /// Maximum entry time.
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Creates a range with both bounds set.
    #[must_use]
    pub const fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    /// Whether `time` falls within this range.
    #[must_use]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| time >= from) && self.to.is_none_or(|to| time <= to)
    }
}

/// Aggregate counts over a record listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSummary {
    /// Total number of records.
    pub total: usize,
    /// Records with the vehicle still inside.
    pub inside: usize,
    /// Records currently flagged as suspected.
    pub suspected: usize,
}

/// Read-only predicate used to derive a record's `suspected` flag at
/// listing time.
///
/// Implementations must be side-effect-free so the derivation stays pure
/// and safe to call on every listing request. The alert board implements
/// this against its current non-resolved alert set.
pub trait SuspicionCheck {
    /// Whether any active alert matches the plate.
    fn matches(&self, plate: &RegistrationNumber) -> bool;
}

/// Computes summary counts over annotated records in a single pass.
///
/// The counts are independent: a record can contribute to both `inside`
/// and `suspected`.
#[must_use]
pub fn summarize(records: &[TrackedRecord]) -> PresenceSummary {
    let mut summary = PresenceSummary {
        total: records.len(),
        ..PresenceSummary::default()
    };
    for tracked in records {
        if tracked.record.in_parking() {
            summary.inside += 1;
        }
        if tracked.suspected {
            summary.suspected += 1;
        }
    }
    summary
}

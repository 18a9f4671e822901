use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open date interval `[start, end)` at day granularity.
///
/// A guest holding `[start, end)` occupies the nights `start ..= end - 1`
/// and vacates on `end`. Callers working with timestamps must normalize to
/// the calendar date before building a range; the engine never compares
/// anything finer than a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start < end, "DateRange start must be before end");
        Self { start, end }
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// The single overlap predicate. Two half-open ranges overlap iff
    /// `a.start < b.end && b.start < a.end`; sharing a boundary is not an
    /// overlap, so back-to-back stays are legal.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `date`'s night falls inside this range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Inclusive report window `[start, end]` — both endpoint dates are reported
/// on. Deliberately a distinct type from [`DateRange`]: reservations are
/// half-open, report windows are not, and the two must not be unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "ReportWindow start must not be after end");
        Self { start, end }
    }

    /// Number of dates covered, counting both endpoints.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// A reservation intersects the window iff it starts no later than the
    /// inclusive end and ends after the start.
    pub fn intersects(&self, range: &DateRange) -> bool {
        range.start <= self.end && range.end > self.start
    }

    pub fn iter_dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            let next = d.checked_add_days(Days::new(1))?;
            (next <= end).then_some(next)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedType {
    Single,
    Double,
    Queen,
    King,
}

impl BedType {
    /// Guest capacity of one bed. A pure function of the type; the subtype
    /// never changes it.
    pub fn capacity(self) -> u32 {
        match self {
            BedType::Single => 1,
            BedType::Double | BedType::Queen | BedType::King => 2,
        }
    }
}

/// Descriptive only — carried on the record, ignored by capacity math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedSubtype {
    Standard,
    Sofa,
    Bunk,
    Rollaway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub id: Ulid,
    pub bed_type: BedType,
    pub bed_subtype: BedSubtype,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: Ulid,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: Ulid,
    pub property_id: Ulid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: Ulid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Free-form preference bag; opaque to the engine.
    pub preferences: HashMap<String, String>,
    pub contact_emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Ulid,
    pub guest_id: Ulid,
    pub room_id: Ulid,
    pub dates: DateRange,
    pub num_guests: u32,
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_confirmed(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }
}

/// A room plus everything the conflict and reporting paths need: its bed
/// composition and its full reservation history, sorted by start date.
#[derive(Debug, Clone)]
pub struct RoomState {
    pub id: Ulid,
    pub building_id: Ulid,
    pub name: String,
    pub room_number: String,
    /// Amenity bag; opaque to the engine.
    pub amenities: Vec<String>,
    pub beds: Vec<Bed>,
    /// All reservations ever made for this room, cancelled ones included,
    /// sorted by `dates.start`.
    pub reservations: Vec<Reservation>,
}

impl RoomState {
    pub fn new(
        id: Ulid,
        building_id: Ulid,
        name: String,
        room_number: String,
        amenities: Vec<String>,
    ) -> Self {
        Self {
            id,
            building_id,
            name,
            room_number,
            amenities,
            beds: Vec::new(),
            reservations: Vec::new(),
        }
    }

    /// Derived guest capacity: the sum of each bed's per-type value.
    /// Recomputed on every access — never cached — so bed changes are
    /// reflected immediately.
    pub fn capacity(&self) -> u32 {
        self.beds.iter().map(|b| b.bed_type.capacity()).sum()
    }

    /// Insert a reservation maintaining sort order by start date.
    pub fn insert_reservation(&mut self, reservation: Reservation) {
        let pos = self
            .reservations
            .binary_search_by_key(&reservation.dates.start, |r| r.dates.start)
            .unwrap_or_else(|e| e);
        self.reservations.insert(pos, reservation);
    }

    pub fn reservation(&self, id: Ulid) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == id)
    }

    pub fn reservation_mut(&mut self, id: Ulid) -> Option<&mut Reservation> {
        self.reservations.iter_mut().find(|r| r.id == id)
    }

    /// Reservations whose range overlaps the query window, any status.
    /// Binary search skips everything starting at or after `query.end`.
    pub fn overlapping(&self, query: &DateRange) -> impl Iterator<Item = &Reservation> {
        let right_bound = self
            .reservations
            .partition_point(|r| r.dates.start < query.end);
        self.reservations[..right_bound]
            .iter()
            .filter(move |r| r.dates.end > query.start)
    }

    /// Confirmed reservations overlapping the query window — the set every
    /// conflict and occupancy decision is made against.
    pub fn confirmed_overlapping(&self, query: &DateRange) -> impl Iterator<Item = &Reservation> {
        self.overlapping(query).filter(|r| r.is_confirmed())
    }
}

// ── Query result types ───────────────────────────────────────────

/// Room summary without the reservation list — what list queries hand back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInfo {
    pub id: Ulid,
    pub building_id: Ulid,
    pub name: String,
    pub room_number: String,
    pub capacity: u32,
}

impl From<&RoomState> for RoomInfo {
    fn from(room: &RoomState) -> Self {
        Self {
            id: room.id,
            building_id: room.building_id,
            name: room.name.clone(),
            room_number: room.room_number.clone(),
            capacity: room.capacity(),
        }
    }
}

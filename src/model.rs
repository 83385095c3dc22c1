use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Minutes since midnight — the only time-of-day type.
pub type Min = u16;

/// Money in minor units (e.g. cents).
pub type Money = i64;

pub const MINUTES_PER_DAY: Min = 24 * 60;

/// Build a time of day from wall-clock hours and minutes.
pub const fn hm(hour: Min, minute: Min) -> Min {
    hour * 60 + minute
}

/// Half-open time-of-day range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Min,
    pub end: Min,
}

impl TimeRange {
    pub fn new(start: Min, end: Min) -> Self {
        debug_assert!(start < end, "TimeRange start must be before end");
        Self { start, end }
    }

    pub fn duration_min(&self) -> Min {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Min) -> bool {
        self.start <= t && t < self.end
    }
}

/// A half-day sub-period of an amenity's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Morning,
    Afternoon,
}

impl Slot {
    /// The fixed wall-clock window a reserved slot occupies.
    pub const fn window(&self) -> TimeRange {
        match self {
            Slot::Morning => TimeRange { start: hm(6, 0), end: hm(12, 0) },
            Slot::Afternoon => TimeRange { start: hm(12, 0), end: hm(18, 0) },
        }
    }
}

/// The booking unit a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    WholeDay,
    HalfDay,
    Hourly,
}

/// A validated booking unit. Once a request passes shape validation the
/// slot/time payload is carried here and cannot be absent or mismatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingKind {
    WholeDay,
    HalfDay(Slot),
    Hourly(TimeRange),
}

impl BookingKind {
    pub fn granularity(&self) -> Granularity {
        match self {
            BookingKind::WholeDay => Granularity::WholeDay,
            BookingKind::HalfDay(_) => Granularity::HalfDay,
            BookingKind::Hourly(_) => Granularity::Hourly,
        }
    }
}

/// Per-granularity charges for an amenity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    pub per_day: Money,
    pub per_half_day: Money,
    pub per_hour: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Active,
    Inactive,
}

/// A bookable shared facility (clubhouse, court, hall).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: Ulid,
    pub name: String,
    /// How many people the facility admits. Informational.
    pub capacity: u32,
    pub pricing: PriceTable,
    pub availability: Availability,
}

/// A committed reservation of one amenity on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub amenity_id: Ulid,
    /// Calendar day the booking occupies; no time component.
    pub date: NaiveDate,
    pub kind: BookingKind,
    pub booked_by: Ulid,
    pub fee: Money,
    pub created_at: DateTime<Utc>,
}

/// The unvalidated shape the HTTP collaborator hands over. `slot` is only
/// meaningful for half-day requests, `start`/`end` only for hourly ones;
/// shape validation turns this into a `BookingKind` or rejects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub amenity_id: Ulid,
    pub date: NaiveDate,
    pub granularity: Granularity,
    #[serde(default)]
    pub slot: Option<Slot>,
    #[serde(default)]
    pub start: Option<Min>,
    #[serde(default)]
    pub end: Option<Min>,
    pub booked_by: Ulid,
}

/// Proposed changes to an existing booking. The granularity itself never
/// changes; date moves apply to any booking, slot/time fields only to the
/// matching granularity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingChange {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub slot: Option<Slot>,
    #[serde(default)]
    pub start: Option<Min>,
    #[serde(default)]
    pub end: Option<Min>,
}

use async_trait::async_trait;
use chrono::NaiveDate;
use ulid::Ulid;

use crate::engine::EngineError;
use crate::model::{Amenity, Booking};

/// Persistence seam for bookings.
///
/// Implementations must make `reserve` and `update` atomic with respect
/// to other writers on the same (amenity, date): re-check the conflict
/// rules inside a serializable transaction, enforce a uniqueness
/// constraint on the slot key, or hold an equivalent compare-and-reserve
/// lock. A snapshot check by the caller is never the sole guard.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// All bookings for one amenity on one calendar day.
    async fn find_day(
        &self,
        amenity_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, EngineError>;

    /// All bookings for one amenity on or after `from`, date-sorted.
    async fn find_from(
        &self,
        amenity_id: Ulid,
        from: NaiveDate,
    ) -> Result<Vec<Booking>, EngineError>;

    /// All bookings placed by one member, across amenities, date-sorted.
    async fn find_by_booker(&self, booked_by: Ulid) -> Result<Vec<Booking>, EngineError>;

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError>;

    /// Commit `booking` if its slot is still free. Among concurrent
    /// competitors for the same slot key, at most one wins; the rest get
    /// `EngineError::Conflict`.
    async fn reserve(&self, booking: Booking) -> Result<Booking, EngineError>;

    /// Replace the stored booking `id` with `updated`, re-validating the
    /// target day with the booking itself excluded from the existing set.
    async fn update(&self, id: Ulid, updated: Booking) -> Result<Booking, EngineError>;

    /// Remove a booking, freeing its slot. `false` if the id is unknown.
    async fn delete(&self, id: Ulid) -> Result<bool, EngineError>;
}

/// Amenity lookup seam. Administration of the directory itself belongs to
/// whoever owns the implementation.
#[async_trait]
pub trait AmenityDirectory: Send + Sync {
    async fn get(&self, id: Ulid) -> Result<Option<Amenity>, EngineError>;
}

use chrono::{Days, NaiveDate};
use ulid::Ulid;

use crate::limits::UPCOMING_HORIZON_DAYS;
use crate::model::{Booking, BookingKind, Slot};

use super::{Engine, EngineError};

impl Engine {
    /// Dates (sorted, deduplicated) on which the amenity is fully booked:
    /// a whole-day booking, or both half-day slots reserved. Hourly
    /// bookings never fill a day on their own. Used to grey out calendar
    /// days; bounded by the scan horizon.
    pub async fn upcoming_dates(
        &self,
        amenity_id: Ulid,
        from: NaiveDate,
    ) -> Result<Vec<NaiveDate>, EngineError> {
        let horizon = from
            .checked_add_days(Days::new(UPCOMING_HORIZON_DAYS))
            .ok_or(EngineError::Validation("date is out of range"))?;
        let bookings = self.store.find_from(amenity_id, from).await?;

        // `find_from` returns date-sorted bookings; walk one day at a time.
        let mut full = Vec::new();
        let mut i = 0;
        while i < bookings.len() {
            let date = bookings[i].date;
            let (mut whole, mut morning, mut afternoon) = (false, false, false);
            while i < bookings.len() && bookings[i].date == date {
                match bookings[i].kind {
                    BookingKind::WholeDay => whole = true,
                    BookingKind::HalfDay(Slot::Morning) => morning = true,
                    BookingKind::HalfDay(Slot::Afternoon) => afternoon = true,
                    BookingKind::Hourly(_) => {}
                }
                i += 1;
            }
            if date < horizon && (whole || (morning && afternoon)) {
                full.push(date);
            }
        }
        Ok(full)
    }

    /// Day schedule for one amenity.
    pub async fn bookings_for(
        &self,
        amenity_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, EngineError> {
        self.store.find_day(amenity_id, date).await
    }

    /// Every booking a member currently holds, across amenities.
    pub async fn bookings_by_member(&self, member: Ulid) -> Result<Vec<Booking>, EngineError> {
        self.store.find_by_booker(member).await
    }
}

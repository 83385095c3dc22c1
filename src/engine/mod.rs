pub(crate) mod conflict;
mod error;
mod fees;
mod queries;

pub use conflict::{Conflict, check};
pub use error::EngineError;
pub use fees::quote;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use ulid::Ulid;

use crate::model::{
    Amenity, Availability, Booking, BookingChange, BookingKind, Granularity, MINUTES_PER_DAY, Min,
    Money, ReservationRequest, TimeRange,
};
use crate::observability;
use crate::store::{AmenityDirectory, BookingStore};

/// Outcome of a dry-run validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    /// The slot is free; a matching create would charge this fee.
    Available { fee: Money },
    /// The slot is taken; a matching create would refuse for this reason.
    Unavailable { reason: Conflict },
}

/// Reservation service: validates request shape, runs the conflict rules
/// against current bookings, and commits through the injected store.
pub struct Engine {
    store: Arc<dyn BookingStore>,
    amenities: Arc<dyn AmenityDirectory>,
}

impl Engine {
    /// Collaborators are injected; their lifecycle belongs to the
    /// composition root.
    pub fn new(store: Arc<dyn BookingStore>, amenities: Arc<dyn AmenityDirectory>) -> Self {
        Self { store, amenities }
    }

    /// Dry-run a reservation request: same shape checks and conflict
    /// verdict as `create`, no persistence.
    pub async fn validate(&self, req: &ReservationRequest) -> Result<Decision, EngineError> {
        match self.evaluate(req).await {
            Ok((_, fee)) => Ok(Decision::Available { fee }),
            Err(EngineError::Conflict(reason)) => Ok(Decision::Unavailable { reason }),
            Err(e) => Err(e),
        }
    }

    /// Reserve a slot. The snapshot conflict check here gives the same
    /// verdict as `validate`; the store re-runs the rules under its day
    /// lock before committing, so a racing competitor cannot slip in
    /// between check and insert.
    pub async fn create(&self, req: &ReservationRequest) -> Result<Booking, EngineError> {
        let (kind, fee) = self.evaluate(req).await.inspect_err(record_refusal)?;
        let booking = Booking {
            id: Ulid::new(),
            amenity_id: req.amenity_id,
            date: req.date,
            kind,
            booked_by: req.booked_by,
            fee,
            created_at: Utc::now(),
        };
        let committed = self
            .store
            .reserve(booking)
            .await
            .inspect_err(record_refusal)?;
        metrics::counter!(
            observability::RESERVATIONS_TOTAL,
            "granularity" => observability::granularity_label(kind.granularity()),
        )
        .increment(1);
        debug!(booking = %committed.id, amenity = %committed.amenity_id, "booking reserved");
        Ok(committed)
    }

    /// Apply time/date changes to an existing booking. The store
    /// re-validates the target day with the booking itself excluded and
    /// commits atomically; the fee is requoted when the times changed.
    pub async fn update(&self, id: Ulid, change: BookingChange) -> Result<Booking, EngineError> {
        let current = self.store.get(id).await?.ok_or(EngineError::NotFound(id))?;
        let kind = apply_change(&current.kind, &change)?;
        let date = change.date.unwrap_or(current.date);

        let fee = if kind == current.kind {
            current.fee
        } else {
            let amenity = self.amenity(current.amenity_id).await?;
            fees::quote(&kind, &amenity.pricing)?
        };

        let updated = Booking { date, kind, fee, ..current };
        let committed = self
            .store
            .update(id, updated)
            .await
            .inspect_err(record_refusal)?;
        debug!(booking = %id, "booking updated");
        Ok(committed)
    }

    /// Cancel a booking, freeing its slot. Cancelling an unknown or
    /// already-cancelled id is `NotFound`, never silent success.
    pub async fn delete(&self, id: Ulid) -> Result<(), EngineError> {
        if self.store.delete(id).await? {
            metrics::counter!(observability::CANCELLATIONS_TOTAL).increment(1);
            debug!(booking = %id, "booking cancelled");
            Ok(())
        } else {
            Err(EngineError::NotFound(id))
        }
    }

    /// Shape check, fee quote, and a snapshot conflict evaluation.
    async fn evaluate(
        &self,
        req: &ReservationRequest,
    ) -> Result<(BookingKind, Money), EngineError> {
        let amenity = self.amenity(req.amenity_id).await?;
        if amenity.availability != Availability::Active {
            return Err(EngineError::Validation("amenity is not open for booking"));
        }
        let kind = resolve_kind(req)?;
        let fee = fees::quote(&kind, &amenity.pricing)?;
        let existing = self.store.find_day(req.amenity_id, req.date).await?;
        conflict::check(&existing, &kind).map_err(EngineError::Conflict)?;
        Ok((kind, fee))
    }

    async fn amenity(&self, id: Ulid) -> Result<Amenity, EngineError> {
        self.amenities
            .get(id)
            .await?
            .ok_or(EngineError::NotFound(id))
    }
}

/// Collapse an unvalidated request into a typed booking kind. Fields
/// missing for the declared granularity are errors, never defaulted.
fn resolve_kind(req: &ReservationRequest) -> Result<BookingKind, EngineError> {
    match req.granularity {
        Granularity::WholeDay => Ok(BookingKind::WholeDay),
        Granularity::HalfDay => match req.slot {
            Some(slot) => Ok(BookingKind::HalfDay(slot)),
            None => Err(EngineError::Validation(
                "slot is required for half-day bookings",
            )),
        },
        Granularity::Hourly => {
            let (Some(start), Some(end)) = (req.start, req.end) else {
                return Err(EngineError::Validation(
                    "start and end times are required for hourly bookings",
                ));
            };
            hourly_range(start, end)
        }
    }
}

fn hourly_range(start: Min, end: Min) -> Result<BookingKind, EngineError> {
    if start >= MINUTES_PER_DAY || end > MINUTES_PER_DAY {
        return Err(EngineError::Validation("time of day is out of range"));
    }
    if start >= end {
        return Err(EngineError::Validation("start time must be before end time"));
    }
    Ok(BookingKind::Hourly(TimeRange::new(start, end)))
}

/// Merge requested field changes into the stored kind. Fields that do not
/// apply to the booking's granularity are rejected rather than ignored:
/// the caller is confused about what it is editing.
fn apply_change(kind: &BookingKind, change: &BookingChange) -> Result<BookingKind, EngineError> {
    match kind {
        BookingKind::WholeDay => {
            if change.slot.is_some() || change.start.is_some() || change.end.is_some() {
                return Err(EngineError::Validation(
                    "whole-day bookings have no slot or times to change",
                ));
            }
            Ok(BookingKind::WholeDay)
        }
        BookingKind::HalfDay(slot) => {
            if change.start.is_some() || change.end.is_some() {
                return Err(EngineError::Validation(
                    "half-day bookings have no times to change",
                ));
            }
            Ok(BookingKind::HalfDay(change.slot.unwrap_or(*slot)))
        }
        BookingKind::Hourly(range) => {
            if change.slot.is_some() {
                return Err(EngineError::Validation(
                    "hourly bookings have no slot to change",
                ));
            }
            let start = change.start.unwrap_or(range.start);
            let end = change.end.unwrap_or(range.end);
            hourly_range(start, end)
        }
    }
}

fn record_refusal(err: &EngineError) {
    match err {
        EngineError::Conflict(reason) => {
            metrics::counter!(observability::CONFLICTS_TOTAL, "reason" => reason.as_str())
                .increment(1);
        }
        EngineError::Validation(_) | EngineError::LimitExceeded(_) => {
            metrics::counter!(observability::VALIDATION_FAILURES_TOTAL).increment(1);
        }
        _ => {}
    }
}

use serde::{Deserialize, Serialize};

use crate::model::{Booking, BookingKind, Slot, TimeRange};

/// Why a requested booking was refused. A refusal is a business outcome,
/// not a transient failure; callers report it and do not retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conflict {
    /// A whole-day booking owns the date.
    WholeDayBlocked,
    /// The requested half-day slot is already occupied.
    SlotTaken,
    /// The requested hourly range overlaps an existing hourly booking.
    RangeOverlap,
    /// The requested start time falls inside a reserved half-day window.
    HalfDayConflict,
}

impl Conflict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conflict::WholeDayBlocked => "whole_day_blocked",
            Conflict::SlotTaken => "slot_taken",
            Conflict::RangeOverlap => "range_overlap",
            Conflict::HalfDayConflict => "half_day_conflict",
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `kind` may join `existing`. Pure; `existing` must hold
/// exactly the bookings of the target (amenity, date) — for an update,
/// with the booking being edited filtered out by the caller.
pub fn check(existing: &[Booking], kind: &BookingKind) -> Result<(), Conflict> {
    match kind {
        BookingKind::WholeDay => check_whole_day(existing),
        BookingKind::HalfDay(slot) => check_half_day(existing, *slot),
        BookingKind::Hourly(range) => check_hourly(existing, range),
    }
}

/// A whole-day booking monopolizes the amenity: any existing booking
/// blocks it. The reason names the strongest blocker present.
fn check_whole_day(existing: &[Booking]) -> Result<(), Conflict> {
    if existing.is_empty() {
        return Ok(());
    }
    if has_whole_day(existing) {
        return Err(Conflict::WholeDayBlocked);
    }
    if existing
        .iter()
        .any(|b| matches!(b.kind, BookingKind::HalfDay(_)))
    {
        return Err(Conflict::SlotTaken);
    }
    Err(Conflict::RangeOverlap)
}

fn check_half_day(existing: &[Booking], slot: Slot) -> Result<(), Conflict> {
    if has_whole_day(existing) {
        return Err(Conflict::WholeDayBlocked);
    }
    if existing.iter().any(|b| b.kind == BookingKind::HalfDay(slot)) {
        return Err(Conflict::SlotTaken);
    }
    Ok(())
}

fn check_hourly(existing: &[Booking], range: &TimeRange) -> Result<(), Conflict> {
    if has_whole_day(existing) {
        return Err(Conflict::WholeDayBlocked);
    }
    for b in existing {
        if let BookingKind::Hourly(other) = &b.kind
            && other.overlaps(range)
        {
            return Err(Conflict::RangeOverlap);
        }
    }
    // Only the start is held against reserved half-day windows; a range
    // that merely ends inside one is allowed.
    for b in existing {
        if let BookingKind::HalfDay(slot) = b.kind
            && slot.window().contains_instant(range.start)
        {
            return Err(Conflict::HalfDayConflict);
        }
    }
    Ok(())
}

fn has_whole_day(existing: &[Booking]) -> bool {
    existing.iter().any(|b| matches!(b.kind, BookingKind::WholeDay))
}

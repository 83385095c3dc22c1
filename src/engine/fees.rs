use crate::model::{BookingKind, Money, PriceTable};

use super::EngineError;

/// Quote the total charge for a booking. Day and half-day rates are flat;
/// hourly bookings bill every started hour in full.
pub fn quote(kind: &BookingKind, prices: &PriceTable) -> Result<Money, EngineError> {
    match kind {
        BookingKind::WholeDay => Ok(prices.per_day),
        BookingKind::HalfDay(_) => Ok(prices.per_half_day),
        BookingKind::Hourly(range) => {
            let minutes = range.duration_min();
            if minutes == 0 {
                return Err(EngineError::Validation("booking duration must be positive"));
            }
            Ok(prices.per_hour * Money::from(minutes.div_ceil(60)))
        }
    }
}

//! Hard bounds on externally supplied input.

/// Most bookings a single (amenity, date) bucket will accept. Hourly
/// slots are the only granularity that can stack, and a day has 24 of
/// them at the minimum duration the fee model bills for.
pub const MAX_BOOKINGS_PER_DAY: usize = 64;

/// Longest amenity name accepted by the directory, in bytes.
pub const MAX_NAME_LEN: usize = 256;

/// How far ahead the fully-booked-dates scan looks.
pub const UPCOMING_HORIZON_DAYS: u64 = 366;

use crate::model::Granularity;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings committed. Labels: granularity.
pub const RESERVATIONS_TOTAL: &str = "pavilion_reservations_total";

/// Counter: requests refused by the conflict rules. Labels: reason.
pub const CONFLICTS_TOTAL: &str = "pavilion_conflicts_total";

/// Counter: requests rejected before the conflict rules ran.
pub const VALIDATION_FAILURES_TOTAL: &str = "pavilion_validation_failures_total";

/// Counter: bookings cancelled.
pub const CANCELLATIONS_TOTAL: &str = "pavilion_cancellations_total";

/// Map a granularity to a short label for metrics.
pub fn granularity_label(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::WholeDay => "whole_day",
        Granularity::HalfDay => "half_day",
        Granularity::Hourly => "hourly",
    }
}

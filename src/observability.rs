// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: reservations created.
pub const RESERVATIONS_CREATED_TOTAL: &str = "innkeep_reservations_created_total";

/// Counter: reservations cancelled.
pub const RESERVATIONS_CANCELLED_TOTAL: &str = "innkeep_reservations_cancelled_total";

/// Counter: creation attempts rejected by the conflict check.
pub const CONFLICTS_DETECTED_TOTAL: &str = "innkeep_conflicts_detected_total";

/// Counter: reports computed. Labels: kind.
pub const REPORTS_TOTAL: &str = "innkeep_reports_total";

/// Histogram: report computation latency in seconds. Labels: kind.
pub const REPORT_DURATION_SECONDS: &str = "innkeep_report_duration_seconds";

/// Report kind labels for [`REPORTS_TOTAL`] / [`REPORT_DURATION_SECONDS`].
pub mod report_kind {
    pub const DAILY: &str = "daily";
    pub const SUMMARY: &str = "summary";
    pub const REVENUE: &str = "revenue";
    pub const OCCUPANCY: &str = "occupancy";
    pub const FORECAST: &str = "forecast";
}

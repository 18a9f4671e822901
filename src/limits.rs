//! Operational limits and fixed business policy.

/// Flat nightly rate in dollars. The only pricing rule the engine knows;
/// every revenue figure is a multiple of this.
pub const FLAT_NIGHTLY_RATE: f64 = 100.0;

/// Forecast confidence attached to every projected entry. The forecast is a
/// deterministic replay of the occupancy computation, not a model.
pub const FORECAST_CONFIDENCE: f64 = 0.8;

/// Max length for property/building/room/guest names.
pub const MAX_NAME_LEN: usize = 256;

/// Max length for a reservation's special-requests text.
pub const MAX_SPECIAL_REQUESTS_LEN: usize = 2048;

/// Widest reservation interval accepted, in nights.
pub const MAX_STAY_NIGHTS: i64 = 366;

/// Widest report window accepted, in days (inclusive span).
pub const MAX_REPORT_WINDOW_DAYS: i64 = 1827; // ~5 years

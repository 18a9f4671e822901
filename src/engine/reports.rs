use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::debug;
use ulid::Ulid;

use crate::limits::*;
use crate::model::{DateRange, ReportWindow};
use crate::observability::{self, report_kind};

use super::conflict::{occupied_room_count, validate_window};
use super::{Engine, EngineError};

// ── Report types ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StayEntry {
    pub reservation_id: Ulid,
    pub room_number: String,
    pub guest_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StayingEntry {
    pub reservation_id: Ulid,
    pub room_number: String,
    pub guest_name: String,
    pub end_date: NaiveDate,
}

/// Store-wide occupancy snapshot for a single date.
#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub occupancy_rate: f64,
    pub check_ins: Vec<StayEntry>,
    pub check_outs: Vec<StayEntry>,
    pub staying: Vec<StayingEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildingSummary {
    pub id: Ulid,
    pub name: String,
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub revenue: f64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub occupancy_rate: f64,
    pub revenue: f64,
    pub avg_daily_rate: f64,
    pub buildings: Vec<BuildingSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueByDate {
    pub date: NaiveDate,
    pub revenue: f64,
    pub bookings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub total_revenue: f64,
    pub total_bookings: usize,
    pub revenue_by_date: Vec<RevenueByDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyByDate {
    pub date: NaiveDate,
    pub occupied_rooms: usize,
    pub total_rooms: usize,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccupancyReport {
    pub total_rooms: usize,
    pub avg_occupancy_rate: f64,
    pub occupancy_by_date: Vec<OccupancyByDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastByDate {
    pub date: NaiveDate,
    pub predicted_occupancy: f64,
    pub predicted_revenue: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub total_predicted_revenue: f64,
    pub avg_predicted_occupancy: f64,
    pub forecast_by_date: Vec<ForecastByDate>,
}

fn observe_report(kind: &'static str, started: Instant) {
    metrics::counter!(observability::REPORTS_TOTAL, "kind" => kind).increment(1);
    metrics::histogram!(observability::REPORT_DURATION_SECONDS, "kind" => kind)
        .record(started.elapsed().as_secs_f64());
}

fn rate(occupied: usize, total: usize) -> f64 {
    if total > 0 {
        occupied as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Clip a reservation to a report window and count the nights that fall
/// inside. The window end is the last reported date, so a stay reaching it
/// only earns revenue up to that date's midnight.
fn clipped_nights(range: &DateRange, window: &ReportWindow) -> i64 {
    let clip_start = range.start.max(window.start);
    let clip_end = range.end.min(window.end);
    (clip_end - clip_start).num_days()
}

impl Engine {
    /// Occupancy snapshot across every room in the store for one date.
    /// `check_ins` start that day; `check_outs` spend their final night that
    /// day and vacate the next morning.
    pub async fn daily_report(&self, date: NaiveDate) -> DailyReport {
        let started = Instant::now();
        let rooms = self.store.snapshot_all_rooms().await;

        let mut occupied_rooms = 0usize;
        let mut check_ins = Vec::new();
        let mut check_outs = Vec::new();
        let mut staying = Vec::new();

        let day_after = date
            .checked_add_days(Days::new(1))
            .expect("date arithmetic overflow");

        for room in &rooms {
            for res in &room.reservations {
                if !res.is_confirmed() || !res.dates.contains(date) {
                    continue;
                }
                occupied_rooms += 1;
                let guest_name = self
                    .store
                    .get_guest(&res.guest_id)
                    .map(|g| g.name)
                    .unwrap_or_else(|| "unknown".into());
                let entry = StayEntry {
                    reservation_id: res.id,
                    room_number: room.room_number.clone(),
                    guest_name: guest_name.clone(),
                };
                if res.dates.start == date {
                    check_ins.push(entry.clone());
                }
                if res.dates.end == day_after {
                    check_outs.push(entry.clone());
                }
                staying.push(StayingEntry {
                    reservation_id: res.id,
                    room_number: room.room_number.clone(),
                    guest_name,
                    end_date: res.dates.end,
                });
            }
        }

        let report = DailyReport {
            total_rooms: rooms.len(),
            occupied_rooms,
            occupancy_rate: rate(occupied_rooms, rooms.len()),
            check_ins,
            check_outs,
            staying,
        };
        observe_report(report_kind::DAILY, started);
        report
    }

    /// Revenue and occupancy totals for a property over an inclusive
    /// window, with per-building sub-aggregates. A room with several
    /// sequential bookings in the window counts as occupied once.
    pub async fn property_summary(
        &self,
        property_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PropertySummary, EngineError> {
        let window = validate_window(start_date, end_date)?;
        let started = Instant::now();
        let rooms = self.store.snapshot_property_rooms(&property_id).await;

        if rooms.is_empty() {
            observe_report(report_kind::SUMMARY, started);
            return Ok(PropertySummary {
                total_rooms: 0,
                occupied_rooms: 0,
                occupancy_rate: 0.0,
                revenue: 0.0,
                avg_daily_rate: 0.0,
                buildings: Vec::new(),
            });
        }

        let mut buildings: BTreeMap<Ulid, BuildingSummary> = BTreeMap::new();
        for room in &rooms {
            let entry = buildings.entry(room.building_id).or_insert_with(|| {
                let name = self
                    .store
                    .get_building(&room.building_id)
                    .map(|b| b.name)
                    .unwrap_or_default();
                BuildingSummary {
                    id: room.building_id,
                    name,
                    total_rooms: 0,
                    occupied_rooms: 0,
                    revenue: 0.0,
                    occupancy_rate: 0.0,
                }
            });
            entry.total_rooms += 1;
        }

        let mut occupied: HashSet<Ulid> = HashSet::new();
        let mut total_revenue = 0.0;

        for room in &rooms {
            for res in &room.reservations {
                if !res.is_confirmed() || !window.intersects(&res.dates) {
                    continue;
                }
                let building = buildings
                    .get_mut(&room.building_id)
                    .expect("building initialized above");
                if occupied.insert(room.id) {
                    building.occupied_rooms += 1;
                }
                let nights = clipped_nights(&res.dates, &window);
                let room_revenue = nights as f64 * FLAT_NIGHTLY_RATE;
                total_revenue += room_revenue;
                building.revenue += room_revenue;
            }
        }

        let total_rooms = rooms.len();
        let occupied_count = occupied.len();
        let days_in_range = window.days();
        let avg_daily_rate = if occupied_count > 0 && days_in_range > 0 {
            total_revenue / occupied_count as f64 / days_in_range as f64
        } else {
            0.0
        };

        let buildings: Vec<BuildingSummary> = buildings
            .into_values()
            .map(|mut b| {
                b.occupancy_rate = rate(b.occupied_rooms, b.total_rooms);
                b
            })
            .collect();

        debug!(
            property = %property_id,
            total_rooms,
            occupied = occupied_count,
            revenue = total_revenue,
            "property summary computed"
        );
        observe_report(report_kind::SUMMARY, started);
        Ok(PropertySummary {
            total_rooms,
            occupied_rooms: occupied_count,
            occupancy_rate: rate(occupied_count, total_rooms),
            revenue: total_revenue,
            avg_daily_rate,
            buildings,
        })
    }

    /// Per-date revenue for a property: each clipped stay's revenue is
    /// spread evenly over its occupied nights, and `bookings` counts every
    /// reservation touching a date.
    pub async fn property_revenue(
        &self,
        property_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RevenueReport, EngineError> {
        let window = validate_window(start_date, end_date)?;
        let started = Instant::now();
        let rooms = self.store.snapshot_property_rooms(&property_id).await;

        let mut total_revenue = 0.0;
        let mut total_bookings = 0usize;
        let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

        for room in &rooms {
            for res in &room.reservations {
                if !res.is_confirmed() || !window.intersects(&res.dates) {
                    continue;
                }
                let clip_start = res.dates.start.max(window.start);
                let clip_end = res.dates.end.min(window.end);
                let nights = (clip_end - clip_start).num_days();
                let room_revenue = nights as f64 * FLAT_NIGHTLY_RATE;
                total_revenue += room_revenue;
                total_bookings += 1;

                let daily_revenue = if nights > 0 {
                    room_revenue / nights as f64
                } else {
                    0.0
                };
                let mut date = clip_start;
                while date < clip_end {
                    let bucket = by_date.entry(date).or_insert((0.0, 0));
                    bucket.0 += daily_revenue;
                    bucket.1 += 1;
                    date = date
                        .checked_add_days(Days::new(1))
                        .expect("date arithmetic overflow");
                }
            }
        }

        let revenue_by_date = by_date
            .into_iter()
            .map(|(date, (revenue, bookings))| RevenueByDate {
                date,
                revenue,
                bookings,
            })
            .collect();

        observe_report(report_kind::REVENUE, started);
        Ok(RevenueReport {
            total_revenue,
            total_bookings,
            revenue_by_date,
        })
    }

    /// Distinct occupied rooms per date across the inclusive window, plus
    /// the mean rate over all dates.
    pub async fn property_occupancy(
        &self,
        property_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<OccupancyReport, EngineError> {
        let window = validate_window(start_date, end_date)?;
        let started = Instant::now();
        let rooms = self.store.snapshot_property_rooms(&property_id).await;

        if rooms.is_empty() {
            observe_report(report_kind::OCCUPANCY, started);
            return Ok(OccupancyReport {
                total_rooms: 0,
                avg_occupancy_rate: 0.0,
                occupancy_by_date: Vec::new(),
            });
        }

        let total_rooms = rooms.len();
        let occupancy_by_date: Vec<OccupancyByDate> = window
            .iter_dates()
            .map(|date| {
                let occupied = occupied_room_count(&rooms, date);
                OccupancyByDate {
                    date,
                    occupied_rooms: occupied,
                    total_rooms,
                    occupancy_rate: rate(occupied, total_rooms),
                }
            })
            .collect();

        let avg_occupancy_rate = if occupancy_by_date.is_empty() {
            0.0
        } else {
            occupancy_by_date
                .iter()
                .map(|d| d.occupancy_rate)
                .sum::<f64>()
                / occupancy_by_date.len() as f64
        };

        observe_report(report_kind::OCCUPANCY, started);
        Ok(OccupancyReport {
            total_rooms,
            avg_occupancy_rate,
            occupancy_by_date,
        })
    }

    /// Deterministic projection: the occupancy-by-date computation relabeled
    /// as a prediction, revenue at the flat rate, fixed confidence. Not a
    /// statistical model.
    pub async fn property_forecast(
        &self,
        property_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ForecastReport, EngineError> {
        let window = validate_window(start_date, end_date)?;
        let started = Instant::now();
        let rooms = self.store.snapshot_property_rooms(&property_id).await;

        if rooms.is_empty() {
            observe_report(report_kind::FORECAST, started);
            return Ok(ForecastReport {
                total_predicted_revenue: 0.0,
                avg_predicted_occupancy: 0.0,
                forecast_by_date: Vec::new(),
            });
        }

        let total_rooms = rooms.len();
        let forecast_by_date: Vec<ForecastByDate> = window
            .iter_dates()
            .map(|date| {
                let occupied = occupied_room_count(&rooms, date);
                ForecastByDate {
                    date,
                    predicted_occupancy: rate(occupied, total_rooms),
                    predicted_revenue: occupied as f64 * FLAT_NIGHTLY_RATE,
                    confidence: FORECAST_CONFIDENCE,
                }
            })
            .collect();

        let total_predicted_revenue = forecast_by_date.iter().map(|d| d.predicted_revenue).sum();
        let avg_predicted_occupancy = if forecast_by_date.is_empty() {
            0.0
        } else {
            forecast_by_date
                .iter()
                .map(|d| d.predicted_occupancy)
                .sum::<f64>()
                / forecast_by_date.len() as f64
        };

        observe_report(report_kind::FORECAST, started);
        Ok(ForecastReport {
            total_predicted_revenue,
            avg_predicted_occupancy,
            forecast_by_date,
        })
    }
}

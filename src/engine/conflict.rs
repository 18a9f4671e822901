use chrono::{NaiveDate, Utc};

use crate::limits::*;
use crate::model::{DateRange, ReportWindow, Reservation, RoomState};

use super::EngineError;

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Validate a prospective reservation interval: strictly positive length,
/// bounded width.
pub(crate) fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, EngineError> {
    if start >= end {
        return Err(EngineError::InvalidDateRange { start, end });
    }
    let range = DateRange::new(start, end);
    if range.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(range)
}

/// Validate a report window: start may equal end (a one-day report), but
/// never exceed it, and the window has a width cap.
pub(crate) fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<ReportWindow, EngineError> {
    if start > end {
        return Err(EngineError::InvalidDateRange { start, end });
    }
    let window = ReportWindow::new(start, end);
    if window.days() > MAX_REPORT_WINDOW_DAYS {
        return Err(EngineError::LimitExceeded("report window too wide"));
    }
    Ok(window)
}

/// Scan the room's confirmed reservations for an overlap with `range`.
/// Err carries the first conflicting reservation id.
pub(crate) fn check_no_conflict(room: &RoomState, range: &DateRange) -> Result<(), EngineError> {
    match room.confirmed_overlapping(range).next() {
        Some(existing) => Err(EngineError::RoomUnavailable {
            conflicting: existing.id,
        }),
        None => Ok(()),
    }
}

/// All confirmed reservations conflicting with `range`, for availability
/// responses that report the blockers.
pub(crate) fn collect_conflicts<'a>(
    room: &'a RoomState,
    range: &DateRange,
) -> Vec<&'a Reservation> {
    room.confirmed_overlapping(range).collect()
}

/// Distinct rooms among `rooms` with a confirmed reservation covering
/// `date`'s night. Shared by the occupancy and forecast reports — the
/// forecast is this computation relabeled.
pub(crate) fn occupied_room_count(rooms: &[RoomState], date: NaiveDate) -> usize {
    rooms
        .iter()
        .filter(|room| {
            room.reservations
                .iter()
                .any(|r| r.is_confirmed() && r.dates.contains(date))
        })
        .count()
}

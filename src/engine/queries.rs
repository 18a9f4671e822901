use chrono::NaiveDate;
use serde::Serialize;
use ulid::Ulid;

use crate::model::{Reservation, RoomInfo};

use super::conflict::{collect_conflicts, validate_range};
use super::{Engine, EngineError};

/// One confirmed reservation blocking a requested range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictInfo {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guest_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomAvailability {
    pub available: bool,
    pub conflicts: Vec<ConflictInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccupiedRoom {
    pub room: RoomInfo,
    pub conflicts: Vec<ConflictInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyAvailability {
    pub total_rooms: usize,
    pub available_rooms: Vec<RoomInfo>,
    pub occupied_rooms: Vec<OccupiedRoom>,
}

impl Engine {
    fn conflict_info(&self, reservation: &Reservation) -> ConflictInfo {
        let guest_name = self
            .store
            .get_guest(&reservation.guest_id)
            .map(|g| g.name)
            .unwrap_or_else(|| "unknown".into());
        ConflictInfo {
            start_date: reservation.dates.start,
            end_date: reservation.dates.end,
            guest_name,
        }
    }

    /// Is the room free for `[start_date, end_date)`? Lists every confirmed
    /// reservation in the way when it is not. Sharing a boundary with an
    /// existing stay is not a conflict.
    pub async fn check_availability(
        &self,
        room_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RoomAvailability, EngineError> {
        let range = validate_range(start_date, end_date)?;
        let room = self
            .store
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = room.read().await;
        let conflicts: Vec<ConflictInfo> = collect_conflicts(&guard, &range)
            .into_iter()
            .map(|r| self.conflict_info(r))
            .collect();
        Ok(RoomAvailability {
            available: conflicts.is_empty(),
            conflicts,
        })
    }

    /// Partition a property's rooms into available and occupied for the
    /// range. An unknown property simply has no rooms.
    pub async fn property_availability(
        &self,
        property_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PropertyAvailability, EngineError> {
        let range = validate_range(start_date, end_date)?;
        let rooms = self.store.snapshot_property_rooms(&property_id).await;

        let mut available_rooms = Vec::new();
        let mut occupied_rooms = Vec::new();
        for room in &rooms {
            let conflicts: Vec<ConflictInfo> = collect_conflicts(room, &range)
                .into_iter()
                .map(|r| self.conflict_info(r))
                .collect();
            if conflicts.is_empty() {
                available_rooms.push(RoomInfo::from(room));
            } else {
                occupied_rooms.push(OccupiedRoom {
                    room: RoomInfo::from(room),
                    conflicts,
                });
            }
        }
        Ok(PropertyAvailability {
            total_rooms: rooms.len(),
            available_rooms,
            occupied_rooms,
        })
    }

    pub async fn get_reservation(&self, reservation_id: Ulid) -> Result<Reservation, EngineError> {
        let room_id = self
            .store
            .room_for_reservation(&reservation_id)
            .ok_or(EngineError::ReservationNotFound(reservation_id))?;
        let room = self
            .store
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = room.read().await;
        guard
            .reservation(reservation_id)
            .cloned()
            .ok_or(EngineError::ReservationNotFound(reservation_id))
    }

    pub async fn get_room_info(&self, room_id: Ulid) -> Result<RoomInfo, EngineError> {
        let room = self
            .store
            .snapshot_room(&room_id)
            .await
            .ok_or(EngineError::RoomNotFound(room_id))?;
        Ok(RoomInfo::from(&room))
    }

    /// Every reservation a guest ever made, newest stay first. Cancelled
    /// reservations stay in the history.
    pub async fn guest_history(&self, guest_id: Ulid) -> Result<Vec<Reservation>, EngineError> {
        if self.store.get_guest(&guest_id).is_none() {
            return Err(EngineError::GuestNotFound(guest_id));
        }
        let mut history: Vec<Reservation> = Vec::new();
        for room in self.store.snapshot_all_rooms().await {
            history.extend(
                room.reservations
                    .iter()
                    .filter(|r| r.guest_id == guest_id)
                    .cloned(),
            );
        }
        history.sort_by(|a, b| b.dates.start.cmp(&a.dates.start));
        Ok(history)
    }
}

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::conflict::{check_no_conflict, today, validate_range};
use super::{Engine, EngineError};

fn validate_name(name: &str, field: &'static str) -> Result<String, EngineError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::EmptyField(field));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(EngineError::LimitExceeded("name too long"));
    }
    Ok(trimmed.to_string())
}

impl Engine {
    // ── Hierarchy ────────────────────────────────────────────

    pub fn create_property(&self, name: &str, address: &str) -> Result<Property, EngineError> {
        let property = Property {
            id: Ulid::new(),
            name: validate_name(name, "property name")?,
            address: validate_name(address, "property address")?,
        };
        self.store.insert_property(property.clone());
        debug!(property = %property.id, "property created");
        Ok(property)
    }

    pub fn add_building(&self, property_id: Ulid, name: &str) -> Result<Building, EngineError> {
        let name = validate_name(name, "building name")?;
        if !self.store.contains_property(&property_id) {
            return Err(EngineError::PropertyNotFound(property_id));
        }
        let building = Building {
            id: Ulid::new(),
            property_id,
            name,
        };
        self.store.insert_building(building.clone());
        debug!(building = %building.id, property = %property_id, "building created");
        Ok(building)
    }

    /// Add a room to a building. Room numbers are unique within a building.
    pub async fn add_room(
        &self,
        building_id: Ulid,
        name: &str,
        room_number: &str,
        amenities: Vec<String>,
    ) -> Result<RoomInfo, EngineError> {
        let name = validate_name(name, "room name")?;
        let room_number = validate_name(room_number, "room number")?;
        if self.store.get_building(&building_id).is_none() {
            return Err(EngineError::BuildingNotFound(building_id));
        }
        for sibling_id in self.store.rooms_for_building(&building_id) {
            if let Some(sibling) = self.store.get_room(&sibling_id) {
                let guard = sibling.read().await;
                if guard.room_number == room_number {
                    return Err(EngineError::DuplicateRoomNumber {
                        building_id,
                        room_number,
                    });
                }
            }
        }

        let id = Ulid::new();
        let state = RoomState::new(id, building_id, name, room_number, amenities);
        let info = RoomInfo::from(&state);
        self.store
            .insert_room(id, building_id, Arc::new(RwLock::new(state)));
        debug!(room = %id, building = %building_id, "room created");
        Ok(info)
    }

    pub async fn add_bed(
        &self,
        room_id: Ulid,
        bed_type: BedType,
        bed_subtype: BedSubtype,
    ) -> Result<Bed, EngineError> {
        let room = self
            .store
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let mut guard = room.write().await;
        let bed = Bed {
            id: Ulid::new(),
            bed_type,
            bed_subtype,
        };
        guard.beds.push(bed.clone());
        debug!(room = %room_id, bed = %bed.id, capacity = guard.capacity(), "bed added");
        Ok(bed)
    }

    pub async fn remove_bed(&self, room_id: Ulid, bed_id: Ulid) -> Result<(), EngineError> {
        let room = self
            .store
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let mut guard = room.write().await;
        let pos = guard
            .beds
            .iter()
            .position(|b| b.id == bed_id)
            .ok_or(EngineError::BedNotFound(bed_id))?;
        guard.beds.remove(pos);
        debug!(room = %room_id, bed = %bed_id, capacity = guard.capacity(), "bed removed");
        Ok(())
    }

    // ── Guests ───────────────────────────────────────────────

    pub fn create_guest(
        &self,
        name: &str,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<Guest, EngineError> {
        let name = validate_name(name, "guest name")?;
        if email.is_none() && phone.is_none() {
            return Err(EngineError::MissingContact);
        }
        let guest = Guest {
            id: Ulid::new(),
            name,
            email,
            phone,
            preferences: Default::default(),
            contact_emails: Vec::new(),
        };
        self.store.insert_guest(guest.clone());
        debug!(guest = %guest.id, "guest created");
        Ok(guest)
    }

    // ── Reservation lifecycle ────────────────────────────────

    /// Create a confirmed reservation. Validation order is fixed: date
    /// range, past-date, room, guest, capacity, conflict — the first
    /// failing check wins. The conflict check and the insert run under the
    /// room's write lock as one atomic unit.
    pub async fn create_reservation(
        &self,
        guest_id: Ulid,
        room_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        num_guests: u32,
        special_requests: Option<String>,
    ) -> Result<Reservation, EngineError> {
        self.create_reservation_on(
            guest_id,
            room_id,
            start_date,
            end_date,
            num_guests,
            special_requests,
            today(),
        )
        .await
    }

    /// Inner creation path with an injected "today" so tests can pin the
    /// clock.
    pub(crate) async fn create_reservation_on(
        &self,
        guest_id: Ulid,
        room_id: Ulid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        num_guests: u32,
        special_requests: Option<String>,
        today: NaiveDate,
    ) -> Result<Reservation, EngineError> {
        let range = validate_range(start_date, end_date)?;
        if start_date < today {
            return Err(EngineError::PastDateRejected {
                start: start_date,
                today,
            });
        }
        let room = self
            .store
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        if self.store.get_guest(&guest_id).is_none() {
            return Err(EngineError::GuestNotFound(guest_id));
        }
        if num_guests == 0 {
            return Err(EngineError::EmptyField("guest count"));
        }
        if let Some(ref text) = special_requests
            && text.len() > MAX_SPECIAL_REQUESTS_LEN
        {
            return Err(EngineError::LimitExceeded("special requests too long"));
        }

        let mut guard = room.write().await;
        let capacity = guard.capacity();
        if num_guests > capacity {
            return Err(EngineError::CapacityExceeded {
                requested: num_guests,
                capacity,
            });
        }
        if let Err(e) = check_no_conflict(&guard, &range) {
            metrics::counter!(observability::CONFLICTS_DETECTED_TOTAL).increment(1);
            return Err(e);
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: Ulid::new(),
            guest_id,
            room_id,
            dates: range,
            num_guests,
            special_requests,
            status: ReservationStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        guard.insert_reservation(reservation.clone());
        self.store.index_reservation(reservation.id, room_id);
        drop(guard);

        metrics::counter!(observability::RESERVATIONS_CREATED_TOTAL).increment(1);
        info!(
            reservation = %reservation.id,
            room = %room_id,
            start = %start_date,
            end = %end_date,
            "reservation confirmed"
        );
        Ok(reservation)
    }

    /// Cancel a confirmed reservation. Cancellation is terminal and never
    /// deletes the record; the dates become bookable again immediately.
    /// Cancelling twice is an error, not a silent success.
    pub async fn cancel_reservation(&self, reservation_id: Ulid) -> Result<(), EngineError> {
        let (room_id, mut guard) = self.resolve_reservation_write(&reservation_id).await?;
        let reservation = guard
            .reservation_mut(reservation_id)
            .ok_or(EngineError::ReservationNotFound(reservation_id))?;
        if reservation.status != ReservationStatus::Confirmed {
            return Err(EngineError::AlreadyCancelled(reservation_id));
        }
        reservation.status = ReservationStatus::Cancelled;
        reservation.updated_at = Utc::now();
        drop(guard);

        metrics::counter!(observability::RESERVATIONS_CANCELLED_TOTAL).increment(1);
        info!(reservation = %reservation_id, room = %room_id, "reservation cancelled");
        Ok(())
    }
}

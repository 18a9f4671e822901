use dashmap::DashMap;
use ulid::Ulid;

use crate::model::{Building, Guest, Property, RoomState};

use super::SharedRoomState;

/// The record store the engine runs against: concurrent id → record maps
/// plus the hierarchy and reverse indexes. Rooms carry their reservation
/// lists and sit behind per-room locks; everything else is plain data.
pub struct RecordStore {
    properties: DashMap<Ulid, Property>,
    buildings: DashMap<Ulid, Building>,
    guests: DashMap<Ulid, Guest>,
    rooms: DashMap<Ulid, SharedRoomState>,
    /// Reverse lookup: reservation id → room id.
    reservation_to_room: DashMap<Ulid, Ulid>,
    /// Property → buildings index for O(1) child lookups.
    buildings_by_property: DashMap<Ulid, Vec<Ulid>>,
    /// Building → rooms index.
    rooms_by_building: DashMap<Ulid, Vec<Ulid>>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            properties: DashMap::new(),
            buildings: DashMap::new(),
            guests: DashMap::new(),
            rooms: DashMap::new(),
            reservation_to_room: DashMap::new(),
            buildings_by_property: DashMap::new(),
            rooms_by_building: DashMap::new(),
        }
    }

    // ── Properties and buildings ─────────────────────────────

    pub fn insert_property(&self, property: Property) {
        self.properties.insert(property.id, property);
    }

    pub fn get_property(&self, id: &Ulid) -> Option<Property> {
        self.properties.get(id).map(|e| e.value().clone())
    }

    pub fn contains_property(&self, id: &Ulid) -> bool {
        self.properties.contains_key(id)
    }

    pub fn insert_building(&self, building: Building) {
        self.buildings_by_property
            .entry(building.property_id)
            .or_default()
            .push(building.id);
        self.buildings.insert(building.id, building);
    }

    pub fn get_building(&self, id: &Ulid) -> Option<Building> {
        self.buildings.get(id).map(|e| e.value().clone())
    }

    pub fn buildings_for_property(&self, property_id: &Ulid) -> Vec<Ulid> {
        self.buildings_by_property
            .get(property_id)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    // ── Rooms ────────────────────────────────────────────────

    pub fn insert_room(&self, id: Ulid, building_id: Ulid, state: SharedRoomState) {
        self.rooms_by_building.entry(building_id).or_default().push(id);
        self.rooms.insert(id, state);
    }

    pub fn get_room(&self, id: &Ulid) -> Option<SharedRoomState> {
        self.rooms.get(id).map(|e| e.value().clone())
    }

    pub fn rooms_for_building(&self, building_id: &Ulid) -> Vec<Ulid> {
        self.rooms_by_building
            .get(building_id)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    /// All room ids belonging to a property, resolved through its buildings.
    pub fn rooms_for_property(&self, property_id: &Ulid) -> Vec<Ulid> {
        self.buildings_for_property(property_id)
            .iter()
            .flat_map(|bid| self.rooms_for_building(bid))
            .collect()
    }

    pub fn room_ids(&self) -> Vec<Ulid> {
        self.rooms.iter().map(|e| *e.key()).collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    // ── Guests ───────────────────────────────────────────────

    pub fn insert_guest(&self, guest: Guest) {
        self.guests.insert(guest.id, guest);
    }

    pub fn get_guest(&self, id: &Ulid) -> Option<Guest> {
        self.guests.get(id).map(|e| e.value().clone())
    }

    // ── Reservation index ────────────────────────────────────

    /// Record which room holds a reservation. The reservation record itself
    /// lives inside the room's state, under the room lock.
    pub fn index_reservation(&self, reservation_id: Ulid, room_id: Ulid) {
        self.reservation_to_room.insert(reservation_id, room_id);
    }

    pub fn room_for_reservation(&self, reservation_id: &Ulid) -> Option<Ulid> {
        self.reservation_to_room
            .get(reservation_id)
            .map(|e| *e.value())
    }

    /// Snapshot one room's state (beds + reservations) for read paths.
    pub async fn snapshot_room(&self, id: &Ulid) -> Option<RoomState> {
        let room = self.get_room(id)?;
        let guard = room.read().await;
        Some(guard.clone())
    }

    /// Snapshot every room of a property. Each room is copied under its own
    /// read lock; a report sees each room atomically but is not linearizable
    /// with concurrent writes across rooms, which is all reporting needs.
    pub async fn snapshot_property_rooms(&self, property_id: &Ulid) -> Vec<RoomState> {
        let mut out = Vec::new();
        for id in self.rooms_for_property(property_id) {
            if let Some(state) = self.snapshot_room(&id).await {
                out.push(state);
            }
        }
        out
    }

    /// Snapshot all rooms in the store, for store-wide reports.
    pub async fn snapshot_all_rooms(&self) -> Vec<RoomState> {
        let mut out = Vec::new();
        for id in self.room_ids() {
            if let Some(state) = self.snapshot_room(&id).await {
                out.push(state);
            }
        }
        out
    }
}

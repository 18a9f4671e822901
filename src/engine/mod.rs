mod conflict;
mod error;
mod mutations;
mod queries;
mod reports;
mod store;

pub use error::EngineError;
pub use queries::{ConflictInfo, OccupiedRoom, PropertyAvailability, RoomAvailability};
pub use reports::{
    BuildingSummary, DailyReport, ForecastByDate, ForecastReport, OccupancyByDate,
    OccupancyReport, PropertySummary, RevenueByDate, RevenueReport, StayEntry, StayingEntry,
};
pub use store::RecordStore;

use std::sync::Arc;

use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::RoomState;

pub type SharedRoomState = Arc<RwLock<RoomState>>;

/// The reservation engine. All state lives in the [`RecordStore`]; methods
/// are request-scoped and short-lived. Reservation creation serializes per
/// room: the conflict check and the insert happen under one room write lock,
/// so two concurrent creators can never both pass the check against the same
/// snapshot.
pub struct Engine {
    pub store: RecordStore,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            store: RecordStore::new(),
        }
    }

    /// Lookup reservation → room, get the room, acquire its write lock.
    pub(super) async fn resolve_reservation_write(
        &self,
        reservation_id: &Ulid,
    ) -> Result<(Ulid, tokio::sync::OwnedRwLockWriteGuard<RoomState>), EngineError> {
        let room_id = self
            .store
            .room_for_reservation(reservation_id)
            .ok_or(EngineError::ReservationNotFound(*reservation_id))?;
        let room = self
            .store
            .get_room(&room_id)
            .ok_or(EngineError::RoomNotFound(room_id))?;
        let guard = room.write_owned().await;
        Ok((room_id, guard))
    }
}

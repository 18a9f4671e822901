use chrono::NaiveDate;
use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    /// Start date not strictly before end date (or report start after end).
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    /// Reservation start date before today at creation time.
    PastDateRejected { start: NaiveDate, today: NaiveDate },
    PropertyNotFound(Ulid),
    BuildingNotFound(Ulid),
    RoomNotFound(Ulid),
    BedNotFound(Ulid),
    GuestNotFound(Ulid),
    ReservationNotFound(Ulid),
    /// Requested guests exceed the room's derived capacity.
    CapacityExceeded { requested: u32, capacity: u32 },
    /// Overlap with an existing confirmed reservation.
    RoomUnavailable { conflicting: Ulid },
    /// Cancellation requested on a reservation not in confirmed state.
    AlreadyCancelled(Ulid),
    /// Room number already taken within the building.
    DuplicateRoomNumber { building_id: Ulid, room_number: String },
    /// Guest created without any contact method.
    MissingContact,
    /// A required text field was empty.
    EmptyField(&'static str),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidDateRange { start, end } => {
                write!(f, "invalid date range: {start} .. {end}")
            }
            EngineError::PastDateRejected { start, today } => {
                write!(f, "start date {start} is in the past (today is {today})")
            }
            EngineError::PropertyNotFound(id) => write!(f, "property not found: {id}"),
            EngineError::BuildingNotFound(id) => write!(f, "building not found: {id}"),
            EngineError::RoomNotFound(id) => write!(f, "room not found: {id}"),
            EngineError::BedNotFound(id) => write!(f, "bed not found: {id}"),
            EngineError::GuestNotFound(id) => write!(f, "guest not found: {id}"),
            EngineError::ReservationNotFound(id) => write!(f, "reservation not found: {id}"),
            EngineError::CapacityExceeded { requested, capacity } => {
                write!(f, "room capacity exceeded: {requested} guests, capacity {capacity}")
            }
            EngineError::RoomUnavailable { conflicting } => {
                write!(f, "room is not available: conflicts with reservation {conflicting}")
            }
            EngineError::AlreadyCancelled(id) => {
                write!(f, "reservation already cancelled: {id}")
            }
            EngineError::DuplicateRoomNumber { building_id, room_number } => {
                write!(f, "room number {room_number} already exists in building {building_id}")
            }
            EngineError::MissingContact => {
                write!(f, "guest needs at least one contact method (email or phone)")
            }
            EngineError::EmptyField(field) => write!(f, "{field} cannot be empty"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

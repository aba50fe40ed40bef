use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod reservation_repository;
pub mod seat_repository;

pub use reservation_repository::SqliteReservationRepository;
pub use seat_repository::SqliteSeatRepository;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Joined listing (seat number, payment, username), optionally scoped
    /// to one flight.
    async fn list(&self, flight_id: Option<Uuid>) -> Result<Vec<ReservationSummary>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>>;
    /// Confirmed reservations on the flight that have no passenger row yet.
    async fn list_awaiting_passenger(&self, flight_id: Uuid) -> Result<Vec<PassengerSlot>>;
}

#[async_trait]
pub trait SeatRepository: Send + Sync {
    /// Seat numbers on the flight still open for booking.
    async fn list_available_numbers(&self, flight_id: Uuid) -> Result<Vec<String>>;
}

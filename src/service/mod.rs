pub mod booking_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;

pub use booking_service::{BookingOutcome, BookingService, UpdateOutcome};

pub struct ServiceContext {
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub seat_repo: Arc<dyn SeatRepository>,
    pub booking_service: Arc<BookingService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        reservation_repo: Arc<dyn ReservationRepository>,
        seat_repo: Arc<dyn SeatRepository>,
        db_pool: SqlitePool,
    ) -> Self {
        let booking_service = Arc::new(BookingService::new(db_pool.clone()));

        Self {
            reservation_repo,
            seat_repo,
            booking_service,
            db_pool,
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PassengerDetails;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub seat_id: Uuid,
    pub status: ReservationStatus,
    pub booking_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Canceled => "Canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(ReservationStatus::Pending),
            "Confirmed" => Some(ReservationStatus::Confirmed),
            "Canceled" => Some(ReservationStatus::Canceled),
            _ => None,
        }
    }
}

/// A fully validated booking request, shared by create and update.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub seat_number: String,
    pub status: ReservationStatus,
    pub booking_date: NaiveDate,
    pub passenger: Option<PassengerDetails>,
}

/// One row of the joined reservation listing (seat number, payment, username).
#[derive(Debug, Clone, Serialize)]
pub struct ReservationSummary {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub seat_number: String,
    pub status: ReservationStatus,
    pub booking_date: NaiveDate,
    pub payment_id: Option<Uuid>,
    pub amount_cents: Option<i64>,
    pub username: Option<String>,
}

/// A Confirmed reservation still missing its passenger record.
#[derive(Debug, Clone, Serialize)]
pub struct PassengerSlot {
    pub reservation_id: Uuid,
    pub seat_id: Uuid,
    pub seat_number: String,
}

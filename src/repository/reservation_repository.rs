use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{PassengerSlot, Reservation, ReservationStatus, ReservationSummary},
    error::{AppError, Result},
    repository::ReservationRepository,
};

#[derive(FromRow)]
struct ReservationRow {
    id: String,
    user_id: String,
    flight_id: String,
    seat_id: String,
    status: String,
    booking_date: NaiveDate,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct SummaryRow {
    id: String,
    user_id: String,
    flight_id: String,
    seat_number: String,
    status: String,
    booking_date: NaiveDate,
    payment_id: Option<String>,
    amount_cents: Option<i64>,
    username: Option<String>,
}

#[derive(FromRow)]
struct SlotRow {
    reservation_id: String,
    seat_id: String,
    seat_number: String,
}

pub struct SqliteReservationRepository {
    pool: SqlitePool,
}

impl SqliteReservationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_uuid(s: &str) -> Result<Uuid> {
        Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
    }

    fn parse_status(s: &str) -> Result<ReservationStatus> {
        ReservationStatus::parse(s)
            .ok_or_else(|| AppError::Database(format!("Invalid reservation status: {}", s)))
    }

    fn row_to_reservation(row: ReservationRow) -> Result<Reservation> {
        Ok(Reservation {
            id: Self::parse_uuid(&row.id)?,
            user_id: Self::parse_uuid(&row.user_id)?,
            flight_id: Self::parse_uuid(&row.flight_id)?,
            seat_id: Self::parse_uuid(&row.seat_id)?,
            status: Self::parse_status(&row.status)?,
            booking_date: row.booking_date,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn row_to_summary(row: SummaryRow) -> Result<ReservationSummary> {
        Ok(ReservationSummary {
            reservation_id: Self::parse_uuid(&row.id)?,
            user_id: Self::parse_uuid(&row.user_id)?,
            flight_id: Self::parse_uuid(&row.flight_id)?,
            seat_number: row.seat_number,
            status: Self::parse_status(&row.status)?,
            booking_date: row.booking_date,
            payment_id: row.payment_id.as_deref().map(Self::parse_uuid).transpose()?,
            amount_cents: row.amount_cents,
            username: row.username,
        })
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepository {
    async fn list(&self, flight_id: Option<Uuid>) -> Result<Vec<ReservationSummary>> {
        let base = r#"
            SELECT
                r.id, r.user_id, r.flight_id, s.seat_number,
                r.status, r.booking_date,
                p.id AS payment_id, p.amount_cents,
                u.username
            FROM reservations r
            JOIN seats s ON s.id = r.seat_id
            LEFT JOIN payments p ON p.reservation_id = r.id
            LEFT JOIN users u ON u.id = r.user_id
        "#;

        let rows = match flight_id {
            Some(flight_id) => {
                let query = format!("{base} WHERE r.flight_id = ? ORDER BY r.created_at");
                sqlx::query_as::<_, SummaryRow>(&query)
                    .bind(flight_id.to_string())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{base} ORDER BY r.created_at");
                sqlx::query_as::<_, SummaryRow>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(Self::row_to_summary).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, user_id, flight_id, seat_id, status,
                   booking_date, created_at, updated_at
            FROM reservations
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_reservation(r)?)),
            None => Ok(None),
        }
    }

    async fn list_awaiting_passenger(&self, flight_id: Uuid) -> Result<Vec<PassengerSlot>> {
        let rows = sqlx::query_as::<_, SlotRow>(
            r#"
            SELECT r.id AS reservation_id, s.id AS seat_id, s.seat_number
            FROM reservations r
            JOIN seats s ON s.id = r.seat_id
            LEFT JOIN passengers p ON p.reservation_id = r.id
            WHERE r.flight_id = ? AND r.status = 'Confirmed' AND p.id IS NULL
            ORDER BY s.seat_number
            "#,
        )
        .bind(flight_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PassengerSlot {
                    reservation_id: Self::parse_uuid(&row.reservation_id)?,
                    seat_id: Self::parse_uuid(&row.seat_id)?,
                    seat_number: row.seat_number,
                })
            })
            .collect()
    }
}

use chrono::{NaiveDate, Utc};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::{
    domain::{
        pricing, transition, BookingRequest, PassengerAction, PassengerDetails, PaymentAction,
        PaymentStatus, ReservationStatus, SeatAction,
    },
    error::{AppError, Result},
};

/// Result of a successful create.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub reservation_id: Uuid,
    pub seat_id: Uuid,
    pub amount_cents: i64,
}

/// Result of a successful update. A date-only update deliberately touches
/// nothing but the booking date.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    DateOnly,
    Applied { seat_id: Uuid, amount_cents: i64 },
}

#[derive(FromRow)]
struct PriorReservation {
    seat_id: String,
    status: String,
    flight_id: String,
}

/// Applies the lifecycle decision table. Validation and pricing lookups run
/// against the pool; every multi-row write sequence then runs in a single
/// transaction so a partial failure rolls back whole.
pub struct BookingService {
    pool: SqlitePool,
}

impl BookingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: BookingRequest) -> Result<BookingOutcome> {
        self.ensure_user_exists(req.user_id).await?;

        let seat = self.lookup_seat(req.flight_id, &req.seat_number).await?;

        let plan = transition::create_plan(req.status).ok_or_else(|| {
            AppError::BadRequest("Cannot create a reservation with status Canceled".to_string())
        })?;

        let amount_cents = self.price_booking(req.flight_id, &seat.seat_class).await?;

        let reservation_id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO reservations (id, user_id, flight_id, seat_id, status,
                                      booking_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reservation_id.to_string())
        .bind(req.user_id.to_string())
        .bind(req.flight_id.to_string())
        .bind(seat.id.to_string())
        .bind(req.status.as_str())
        .bind(req.booking_date)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        self.apply_payment(&mut tx, plan.payment, reservation_id, req.user_id, amount_cents)
            .await?;
        // Create plans always claim; the guarded update inside the
        // transaction is what rejects a concurrent double-booking.
        self.claim_open_seat(&mut tx, seat.id).await?;
        self.apply_passenger(&mut tx, plan.passenger, reservation_id, seat.id, &req.passenger)
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation = %reservation_id,
            status = req.status.as_str(),
            "reservation created"
        );

        Ok(BookingOutcome {
            reservation_id,
            seat_id: seat.id,
            amount_cents,
        })
    }

    pub async fn update(&self, reservation_id: Uuid, req: BookingRequest) -> Result<UpdateOutcome> {
        let prior = sqlx::query_as::<_, PriorReservation>(
            "SELECT seat_id, status, flight_id FROM reservations WHERE id = ?",
        )
        .bind(reservation_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        let prior_seat_id = parse_uuid(&prior.seat_id)?;
        let prior_status = ReservationStatus::parse(&prior.status)
            .ok_or_else(|| AppError::Database(format!("Invalid reservation status: {}", prior.status)))?;
        let prior_flight_id = parse_uuid(&prior.flight_id)?;

        let seat = self.lookup_seat(req.flight_id, &req.seat_number).await?;

        // Same flight, same seat, same status: only the booking date moves.
        // No payment, passenger, or seat churn.
        if req.flight_id == prior_flight_id
            && seat.id == prior_seat_id
            && req.status == prior_status
        {
            self.touch_booking_date(reservation_id, req.booking_date).await?;
            return Ok(UpdateOutcome::DateOnly);
        }

        let amount_cents = self.price_booking(req.flight_id, &seat.seat_class).await?;

        let prior_payment_status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM payments WHERE reservation_id = ?",
        )
        .bind(reservation_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .map(|s| {
            PaymentStatus::parse(&s)
                .ok_or_else(|| AppError::Database(format!("Invalid payment status: {}", s)))
        })
        .transpose()?;

        let plan = transition::update_plan(req.status, prior_payment_status);
        let now = Utc::now().naive_utc();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE reservations
            SET user_id = ?, flight_id = ?, seat_id = ?, status = ?,
                booking_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(req.user_id.to_string())
        .bind(req.flight_id.to_string())
        .bind(seat.id.to_string())
        .bind(req.status.as_str())
        .bind(req.booking_date)
        .bind(now)
        .bind(reservation_id.to_string())
        .execute(&mut *tx)
        .await?;

        if seat.id != prior_seat_id {
            self.release_seat(&mut tx, prior_seat_id, reservation_id).await?;
        }

        // A reservation keeps the seat it already holds. Any other claim is
        // guarded inside the transaction; canceling never claims.
        let holds_seat = seat.id == prior_seat_id && prior_status != ReservationStatus::Canceled;
        match plan.seat {
            SeatAction::Claim if holds_seat => {}
            SeatAction::Claim => self.claim_open_seat(&mut tx, seat.id).await?,
            SeatAction::Release => self.release_seat(&mut tx, seat.id, reservation_id).await?,
        }

        self.apply_payment(&mut tx, plan.payment, reservation_id, req.user_id, amount_cents)
            .await?;
        self.apply_passenger(&mut tx, plan.passenger, reservation_id, seat.id, &req.passenger)
            .await?;

        tx.commit().await?;

        tracing::info!(
            reservation = %reservation_id,
            from = prior_status.as_str(),
            to = req.status.as_str(),
            "reservation updated"
        );

        Ok(UpdateOutcome::Applied {
            seat_id: seat.id,
            amount_cents,
        })
    }

    pub async fn delete(&self, reservation_id: Uuid) -> Result<()> {
        let prior = sqlx::query_as::<_, PriorReservation>(
            "SELECT seat_id, status, flight_id FROM reservations WHERE id = ?",
        )
        .bind(reservation_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        let payment_status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM payments WHERE reservation_id = ?",
        )
        .bind(reservation_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let paid = payment_status.as_deref() == Some("Successful");
        if paid || prior.status == "Confirmed" {
            return Err(AppError::BadRequest(
                "Cannot delete a reservation with a successful payment or confirmed status; cancel it instead"
                    .to_string(),
            ));
        }

        let prior_seat_id = parse_uuid(&prior.seat_id)?;

        let mut tx = self.pool.begin().await?;

        self.release_seat(&mut tx, prior_seat_id, reservation_id).await?;
        sqlx::query("DELETE FROM passengers WHERE reservation_id = ?")
            .bind(reservation_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM payments WHERE reservation_id = ?")
            .bind(reservation_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(reservation_id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(reservation = %reservation_id, "reservation deleted");

        Ok(())
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> Result<()> {
        sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(())
    }

    async fn lookup_seat(&self, flight_id: Uuid, seat_number: &str) -> Result<crate::domain::Seat> {
        #[derive(FromRow)]
        struct SeatRow {
            id: String,
            seat_class: String,
            available: bool,
        }

        let row = sqlx::query_as::<_, SeatRow>(
            "SELECT id, seat_class, available FROM seats WHERE seat_number = ? AND flight_id = ?",
        )
        .bind(seat_number)
        .bind(flight_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Seat not found for this flight".to_string()))?;

        Ok(crate::domain::Seat {
            id: parse_uuid(&row.id)?,
            flight_id,
            seat_number: seat_number.to_string(),
            seat_class: row.seat_class,
            available: row.available,
        })
    }

    async fn price_booking(&self, flight_id: Uuid, seat_class: &str) -> Result<i64> {
        let price_cents =
            sqlx::query_scalar::<_, i64>("SELECT price_cents FROM flights WHERE id = ?")
                .bind(flight_id.to_string())
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

        let multiplier = sqlx::query_scalar::<_, f64>(
            "SELECT multiplier FROM seat_multipliers WHERE seat_class = ?",
        )
        .bind(seat_class)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Seat multiplier not found".to_string()))?;

        Ok(pricing::amount_cents(price_cents, multiplier))
    }

    async fn touch_booking_date(&self, reservation_id: Uuid, date: NaiveDate) -> Result<()> {
        sqlx::query("UPDATE reservations SET booking_date = ?, updated_at = ? WHERE id = ?")
            .bind(date)
            .bind(Utc::now().naive_utc())
            .bind(reservation_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Claims a seat only while it is still open. Losing a race for the seat
    /// surfaces as the same rejection a plainly taken seat gets.
    async fn claim_open_seat(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        seat_id: Uuid,
    ) -> Result<()> {
        let claimed =
            sqlx::query("UPDATE seats SET available = FALSE WHERE id = ? AND available = TRUE")
                .bind(seat_id.to_string())
                .execute(&mut **tx)
                .await?;
        if claimed.rows_affected() == 0 {
            return Err(AppError::BadRequest("Seat is already reserved".to_string()));
        }
        Ok(())
    }

    /// Frees a seat unless another active reservation still holds it.
    async fn release_seat(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        seat_id: Uuid,
        reservation_id: Uuid,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE seats SET available = TRUE
            WHERE id = ?
              AND NOT EXISTS (
                  SELECT 1 FROM reservations r
                  WHERE r.seat_id = seats.id
                    AND r.id <> ?
                    AND r.status IN ('Pending', 'Confirmed')
              )
            "#,
        )
        .bind(seat_id.to_string())
        .bind(reservation_id.to_string())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn apply_payment(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        action: PaymentAction,
        reservation_id: Uuid,
        user_id: Uuid,
        amount_cents: i64,
    ) -> Result<()> {
        let status = match action {
            PaymentAction::UpsertPending => PaymentStatus::Pending,
            PaymentAction::UpsertSuccessful => PaymentStatus::Successful,
            PaymentAction::Preserve => return Ok(()),
            PaymentAction::Delete => {
                sqlx::query("DELETE FROM payments WHERE reservation_id = ?")
                    .bind(reservation_id.to_string())
                    .execute(&mut **tx)
                    .await?;
                return Ok(());
            }
        };

        let now = Utc::now().naive_utc();
        let paid_at = match status {
            PaymentStatus::Successful => Some(now),
            PaymentStatus::Pending => None,
        };

        let existing = sqlx::query_scalar::<_, String>(
            "SELECT id FROM payments WHERE reservation_id = ?",
        )
        .bind(reservation_id.to_string())
        .fetch_optional(&mut **tx)
        .await?;

        match existing {
            Some(payment_id) => {
                sqlx::query(
                    r#"
                    UPDATE payments
                    SET user_id = ?, amount_cents = ?, status = ?,
                        paid_at = COALESCE(paid_at, ?), updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(user_id.to_string())
                .bind(amount_cents)
                .bind(status.as_str())
                .bind(paid_at)
                .bind(now)
                .bind(payment_id)
                .execute(&mut **tx)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO payments (id, reservation_id, user_id, amount_cents,
                                          status, payment_method, paid_at,
                                          created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, NULL, ?, ?, ?)
                    "#,
                )
                .bind(Uuid::new_v4().to_string())
                .bind(reservation_id.to_string())
                .bind(user_id.to_string())
                .bind(amount_cents)
                .bind(status.as_str())
                .bind(paid_at)
                .bind(now)
                .bind(now)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }

    async fn apply_passenger(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        action: PassengerAction,
        reservation_id: Uuid,
        seat_id: Uuid,
        details: &Option<PassengerDetails>,
    ) -> Result<()> {
        match action {
            PassengerAction::Remove => {
                sqlx::query("DELETE FROM passengers WHERE reservation_id = ?")
                    .bind(reservation_id.to_string())
                    .execute(&mut **tx)
                    .await?;
            }
            PassengerAction::Upsert => {
                let details = details.clone().unwrap_or_default();

                let existing = sqlx::query_scalar::<_, String>(
                    "SELECT id FROM passengers WHERE reservation_id = ?",
                )
                .bind(reservation_id.to_string())
                .fetch_optional(&mut **tx)
                .await?;

                match existing {
                    Some(passenger_id) => {
                        sqlx::query(
                            r#"
                            UPDATE passengers
                            SET seat_id = ?, first_name = ?, middle_name = ?,
                                last_name = ?, nationality = ?, birth_date = ?,
                                address = ?, passport_number = ?
                            WHERE id = ?
                            "#,
                        )
                        .bind(seat_id.to_string())
                        .bind(&details.first_name)
                        .bind(&details.middle_name)
                        .bind(&details.last_name)
                        .bind(&details.nationality)
                        .bind(details.birth_date)
                        .bind(&details.address)
                        .bind(&details.passport_number)
                        .bind(passenger_id)
                        .execute(&mut **tx)
                        .await?;
                    }
                    None => {
                        sqlx::query(
                            r#"
                            INSERT INTO passengers (id, reservation_id, seat_id,
                                                    first_name, middle_name, last_name,
                                                    nationality, birth_date, address,
                                                    passport_number)
                            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                            "#,
                        )
                        .bind(Uuid::new_v4().to_string())
                        .bind(reservation_id.to_string())
                        .bind(seat_id.to_string())
                        .bind(&details.first_name)
                        .bind(&details.middle_name)
                        .bind(&details.last_name)
                        .bind(&details.nationality)
                        .bind(details.birth_date)
                        .bind(&details.address)
                        .bind(&details.passport_number)
                        .execute(&mut **tx)
                        .await?;
                    }
                }
            }
        }

        Ok(())
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
}

mod common;

use chrono::NaiveDate;
use skybook::{
    domain::{BookingRequest, PassengerDetails, ReservationStatus},
    error::AppError,
    repository::{ReservationRepository, SqliteReservationRepository},
    service::{BookingService, UpdateOutcome},
};
use uuid::Uuid;

use common::{passenger_exists, payment_row, reservation_status, seat_available, setup};

fn booking_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
}

fn request(
    fixture: &common::Fixture,
    seat_number: &str,
    status: ReservationStatus,
) -> BookingRequest {
    BookingRequest {
        user_id: fixture.user_id,
        flight_id: fixture.flight_id,
        seat_number: seat_number.to_string(),
        status,
        booking_date: booking_date(),
        passenger: Some(PassengerDetails {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            passport_number: Some("P1234567".to_string()),
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn create_confirmed_books_payment_and_passenger() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    // Business seat: 100.00 base x 1.5 multiplier
    let outcome = service
        .create(request(&fixture, "1A", ReservationStatus::Confirmed))
        .await?;

    assert_eq!(outcome.seat_id, fixture.business_seat);
    assert_eq!(outcome.amount_cents, 15_000);

    let payment = payment_row(&fixture.pool, outcome.reservation_id).await?.unwrap();
    assert_eq!(payment, (15_000, "Successful".to_string()));
    assert!(passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(!seat_available(&fixture.pool, fixture.business_seat).await?);

    Ok(())
}

#[tokio::test]
async fn create_pending_defers_passenger() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    let payment = payment_row(&fixture.pool, outcome.reservation_id).await?.unwrap();
    assert_eq!(payment, (10_000, "Pending".to_string()));
    assert!(!passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(!seat_available(&fixture.pool, fixture.economy_seat).await?);

    Ok(())
}

#[tokio::test]
async fn create_rejects_unavailable_seat() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    let err = service
        .create(request(&fixture, "12A", ReservationStatus::Confirmed))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn create_rejects_canceled_status() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let err = service
        .create(request(&fixture, "12A", ReservationStatus::Canceled))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(seat_available(&fixture.pool, fixture.economy_seat).await?);

    Ok(())
}

#[tokio::test]
async fn create_reports_missing_lookups_as_not_found() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let mut unknown_user = request(&fixture, "12A", ReservationStatus::Pending);
    unknown_user.user_id = Uuid::new_v4();
    assert!(matches!(
        service.create(unknown_user).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    let unknown_seat = request(&fixture, "99Z", ReservationStatus::Pending);
    assert!(matches!(
        service.create(unknown_seat).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    // Seat class with no multiplier row
    common::insert_seat(&fixture.pool, fixture.flight_id, "2A", "Suite", true).await?;
    let no_multiplier = request(&fixture, "2A", ReservationStatus::Pending);
    assert!(matches!(
        service.create(no_multiplier).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    Ok(())
}

#[tokio::test]
async fn cancel_confirmed_preserves_successful_payment() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "1A", ReservationStatus::Confirmed))
        .await?;

    service
        .update(
            outcome.reservation_id,
            request(&fixture, "1A", ReservationStatus::Canceled),
        )
        .await?;

    let payment = payment_row(&fixture.pool, outcome.reservation_id).await?.unwrap();
    assert_eq!(payment, (15_000, "Successful".to_string()));
    assert!(!passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(seat_available(&fixture.pool, fixture.business_seat).await?);
    assert_eq!(
        reservation_status(&fixture.pool, outcome.reservation_id).await?,
        Some("Canceled".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn cancel_pending_deletes_pending_payment() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    service
        .update(
            outcome.reservation_id,
            request(&fixture, "12A", ReservationStatus::Canceled),
        )
        .await?;

    assert!(payment_row(&fixture.pool, outcome.reservation_id).await?.is_none());
    assert!(!passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(seat_available(&fixture.pool, fixture.economy_seat).await?);

    Ok(())
}

#[tokio::test]
async fn confirming_pending_completes_payment_and_adds_passenger() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    service
        .update(
            outcome.reservation_id,
            request(&fixture, "12A", ReservationStatus::Confirmed),
        )
        .await?;

    let payment = payment_row(&fixture.pool, outcome.reservation_id).await?.unwrap();
    assert_eq!(payment.1, "Successful");
    assert!(passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(!seat_available(&fixture.pool, fixture.economy_seat).await?);

    Ok(())
}

#[tokio::test]
async fn demoting_confirmed_to_pending_drops_passenger_keeps_payment() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "1A", ReservationStatus::Confirmed))
        .await?;

    service
        .update(
            outcome.reservation_id,
            request(&fixture, "1A", ReservationStatus::Pending),
        )
        .await?;

    // The payment already went through; dropping back to Pending never
    // reverses it.
    let payment = payment_row(&fixture.pool, outcome.reservation_id).await?.unwrap();
    assert_eq!(payment.1, "Successful");
    assert!(!passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(!seat_available(&fixture.pool, fixture.business_seat).await?);

    Ok(())
}

#[tokio::test]
async fn date_only_update_writes_nothing_else() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    // Reprice the flight; a date-only update must not touch the payment.
    sqlx::query("UPDATE flights SET price_cents = 99999 WHERE id = ?")
        .bind(fixture.flight_id.to_string())
        .execute(&fixture.pool)
        .await?;

    let mut date_change = request(&fixture, "12A", ReservationStatus::Pending);
    date_change.booking_date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();

    let result = service.update(outcome.reservation_id, date_change).await?;
    assert!(matches!(result, UpdateOutcome::DateOnly));

    let payment = payment_row(&fixture.pool, outcome.reservation_id).await?.unwrap();
    assert_eq!(payment, (10_000, "Pending".to_string()));
    assert!(!seat_available(&fixture.pool, fixture.economy_seat).await?);

    let date = sqlx::query_scalar::<_, NaiveDate>(
        "SELECT booking_date FROM reservations WHERE id = ?",
    )
    .bind(outcome.reservation_id.to_string())
    .fetch_one(&fixture.pool)
    .await?;
    assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());

    Ok(())
}

#[tokio::test]
async fn seat_change_releases_previous_seat() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    service
        .update(
            outcome.reservation_id,
            request(&fixture, "12B", ReservationStatus::Pending),
        )
        .await?;

    assert!(seat_available(&fixture.pool, fixture.economy_seat).await?);
    assert!(!seat_available(&fixture.pool, fixture.economy_seat2).await?);

    Ok(())
}

#[tokio::test]
async fn moving_onto_an_occupied_seat_is_rejected() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;
    let second = service
        .create(request(&fixture, "12B", ReservationStatus::Pending))
        .await?;

    let err = service
        .update(second.reservation_id, request(&fixture, "12A", ReservationStatus::Pending))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // Canceling never needs seat availability; it frees the canceled
    // booking's own seat and leaves the occupied target alone.
    service
        .update(second.reservation_id, request(&fixture, "12A", ReservationStatus::Canceled))
        .await?;
    assert!(seat_available(&fixture.pool, fixture.economy_seat2).await?);
    assert!(!seat_available(&fixture.pool, fixture.economy_seat).await?);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_cannot_double_book_a_seat() -> anyhow::Result<()> {
    // Both bookings race for 12A on one shared database file; the seat claim
    // runs inside each write transaction, so exactly one can win.
    let db_path = std::env::temp_dir().join(format!("skybook-test-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let fixture = common::setup_with_url(&url).await?;
    let service = std::sync::Arc::new(BookingService::new(fixture.pool.clone()));

    let first = tokio::spawn({
        let service = service.clone();
        let req = request(&fixture, "12A", ReservationStatus::Pending);
        async move { service.create(req).await }
    });
    let second = tokio::spawn({
        let service = service.clone();
        let req = request(&fixture, "12A", ReservationStatus::Confirmed);
        async move { service.create(req).await }
    });

    let results = [first.await?, second.await?];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    let holders = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reservations WHERE seat_id = ? AND status IN ('Pending', 'Confirmed')",
    )
    .bind(fixture.economy_seat.to_string())
    .fetch_one(&fixture.pool)
    .await?;
    assert_eq!(holders, 1);
    assert!(!seat_available(&fixture.pool, fixture.economy_seat).await?);

    fixture.pool.close().await;
    std::fs::remove_file(&db_path).ok();

    Ok(())
}

#[tokio::test]
async fn reactivating_a_canceled_booking_reclaims_the_seat() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;
    service
        .update(outcome.reservation_id, request(&fixture, "12A", ReservationStatus::Canceled))
        .await?;
    assert!(seat_available(&fixture.pool, fixture.economy_seat).await?);

    service
        .update(outcome.reservation_id, request(&fixture, "12A", ReservationStatus::Pending))
        .await?;
    assert!(!seat_available(&fixture.pool, fixture.economy_seat).await?);

    // Once someone else has taken the seat, reactivation loses it.
    service
        .update(outcome.reservation_id, request(&fixture, "12A", ReservationStatus::Canceled))
        .await?;
    let other = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;
    let err = service
        .update(outcome.reservation_id, request(&fixture, "12A", ReservationStatus::Pending))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(
        reservation_status(&fixture.pool, other.reservation_id).await?,
        Some("Pending".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn deleting_a_canceled_booking_leaves_a_rebooked_seat_held() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let canceled = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;
    service
        .update(canceled.reservation_id, request(&fixture, "12A", ReservationStatus::Canceled))
        .await?;

    // Someone else books the freed seat before the cleanup delete.
    let rebooked = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    service.delete(canceled.reservation_id).await?;

    assert!(reservation_status(&fixture.pool, canceled.reservation_id).await?.is_none());
    assert_eq!(
        reservation_status(&fixture.pool, rebooked.reservation_id).await?,
        Some("Pending".to_string())
    );
    assert!(!seat_available(&fixture.pool, fixture.economy_seat).await?);

    Ok(())
}

#[tokio::test]
async fn delete_confirmed_is_forbidden_and_writes_nothing() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "1A", ReservationStatus::Confirmed))
        .await?;

    let err = service.delete(outcome.reservation_id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert!(reservation_status(&fixture.pool, outcome.reservation_id).await?.is_some());
    assert!(payment_row(&fixture.pool, outcome.reservation_id).await?.is_some());
    assert!(passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(!seat_available(&fixture.pool, fixture.business_seat).await?);

    Ok(())
}

#[tokio::test]
async fn delete_pending_removes_all_related_rows() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "12A", ReservationStatus::Pending))
        .await?;

    service.delete(outcome.reservation_id).await?;

    assert!(reservation_status(&fixture.pool, outcome.reservation_id).await?.is_none());
    assert!(payment_row(&fixture.pool, outcome.reservation_id).await?.is_none());
    assert!(!passenger_exists(&fixture.pool, outcome.reservation_id).await?);
    assert!(seat_available(&fixture.pool, fixture.economy_seat).await?);

    Ok(())
}

#[tokio::test]
async fn delete_missing_reservation_is_not_found() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());

    let err = service.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn listing_joins_seat_payment_and_username() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());
    let repo = SqliteReservationRepository::new(fixture.pool.clone());

    let outcome = service
        .create(request(&fixture, "1A", ReservationStatus::Confirmed))
        .await?;

    let summaries = repo.list(Some(fixture.flight_id)).await?;
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.reservation_id, outcome.reservation_id);
    assert_eq!(summary.seat_number, "1A");
    assert_eq!(summary.amount_cents, Some(15_000));
    assert_eq!(summary.username.as_deref(), Some("alice"));

    let reservation = repo.find_by_id(outcome.reservation_id).await?.unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(reservation.seat_id, fixture.business_seat);
    assert!(repo.find_by_id(Uuid::new_v4()).await?.is_none());

    // Scoped to an unrelated flight: empty
    assert!(repo.list(Some(Uuid::new_v4())).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn awaiting_passenger_lists_confirmed_without_passenger() -> anyhow::Result<()> {
    let fixture = setup().await?;
    let service = BookingService::new(fixture.pool.clone());
    let repo = SqliteReservationRepository::new(fixture.pool.clone());

    // Booked through the service: the passenger row exists, so nothing to do.
    let booked = service
        .create(request(&fixture, "1A", ReservationStatus::Confirmed))
        .await?;
    assert!(repo.list_awaiting_passenger(fixture.flight_id).await?.is_empty());

    // Strip the passenger row; the slot shows up again.
    sqlx::query("DELETE FROM passengers WHERE reservation_id = ?")
        .bind(booked.reservation_id.to_string())
        .execute(&fixture.pool)
        .await?;

    let slots = repo.list_awaiting_passenger(fixture.flight_id).await?;
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].reservation_id, booked.reservation_id);
    assert_eq!(slots[0].seat_number, "1A");

    Ok(())
}

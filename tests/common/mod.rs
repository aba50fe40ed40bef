#![allow(dead_code)] // each test binary uses a different subset of helpers

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// In-memory database with one user, one flight priced 100.00, the standard
/// multipliers (Economy 1.0, Business 1.5), and three open seats.
pub struct Fixture {
    pub pool: SqlitePool,
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub economy_seat: Uuid,  // 12A
    pub economy_seat2: Uuid, // 12B
    pub business_seat: Uuid, // 1A
}

pub async fn setup() -> anyhow::Result<Fixture> {
    setup_with_url(":memory:").await
}

/// Same fixture on a caller-chosen database, e.g. a temp file when a test
/// needs several connections to see one database.
pub async fn setup_with_url(url: &str) -> anyhow::Result<Fixture> {
    let pool = SqlitePool::connect(url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    for (seat_class, multiplier) in [("Economy", 1.0_f64), ("Business", 1.5_f64)] {
        sqlx::query("INSERT INTO seat_multipliers (seat_class, multiplier) VALUES (?, ?)")
            .bind(seat_class)
            .bind(multiplier)
            .execute(&pool)
            .await?;
    }

    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, username, email, created_at) VALUES (?, ?, ?, ?)")
        .bind(user_id.to_string())
        .bind("alice")
        .bind("alice@example.com")
        .bind(Utc::now().naive_utc())
        .execute(&pool)
        .await?;

    let flight_id = Uuid::new_v4();
    sqlx::query("INSERT INTO flights (id, flight_number, price_cents) VALUES (?, ?, ?)")
        .bind(flight_id.to_string())
        .bind("SB1001")
        .bind(10_000_i64)
        .execute(&pool)
        .await?;

    let economy_seat = insert_seat(&pool, flight_id, "12A", "Economy", true).await?;
    let economy_seat2 = insert_seat(&pool, flight_id, "12B", "Economy", true).await?;
    let business_seat = insert_seat(&pool, flight_id, "1A", "Business", true).await?;

    Ok(Fixture {
        pool,
        user_id,
        flight_id,
        economy_seat,
        economy_seat2,
        business_seat,
    })
}

pub async fn insert_seat(
    pool: &SqlitePool,
    flight_id: Uuid,
    seat_number: &str,
    seat_class: &str,
    available: bool,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO seats (id, flight_id, seat_number, seat_class, available) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(flight_id.to_string())
    .bind(seat_number)
    .bind(seat_class)
    .bind(available)
    .execute(pool)
    .await?;
    Ok(id)
}

pub async fn seat_available(pool: &SqlitePool, seat_id: Uuid) -> anyhow::Result<bool> {
    let available = sqlx::query_scalar::<_, bool>("SELECT available FROM seats WHERE id = ?")
        .bind(seat_id.to_string())
        .fetch_one(pool)
        .await?;
    Ok(available)
}

/// (amount_cents, status) of the reservation's payment row, if any.
pub async fn payment_row(
    pool: &SqlitePool,
    reservation_id: Uuid,
) -> anyhow::Result<Option<(i64, String)>> {
    let row = sqlx::query_as::<_, (i64, String)>(
        "SELECT amount_cents, status FROM payments WHERE reservation_id = ?",
    )
    .bind(reservation_id.to_string())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn passenger_exists(pool: &SqlitePool, reservation_id: Uuid) -> anyhow::Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM passengers WHERE reservation_id = ?",
    )
    .bind(reservation_id.to_string())
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn reservation_status(
    pool: &SqlitePool,
    reservation_id: Uuid,
) -> anyhow::Result<Option<String>> {
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM reservations WHERE id = ?")
        .bind(reservation_id.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(status)
}

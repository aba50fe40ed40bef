use chrono::Utc;
use clap::Parser;
use fake::faker::internet::en::{FreeEmail, Username};
use fake::Fake;
use rand::Rng;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

/// Seeds demo data: users, flights with seats, and the seat-class pricing
/// multipliers the booking flow depends on.
#[derive(Parser)]
struct Args {
    /// Database to seed; falls back to DATABASE_URL, then sqlite:skybook.db
    #[arg(long)]
    database_url: Option<String>,

    /// Number of flights to create
    #[arg(long, default_value_t = 3)]
    flights: u32,

    /// Seat rows per flight (6 seats per row, A-F)
    #[arg(long, default_value_t = 10)]
    rows: u32,

    /// Number of users to create
    #[arg(long, default_value_t = 5)]
    users: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:skybook.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    println!("💺 Creating seat multipliers...");
    for (seat_class, multiplier) in [("Economy", 1.0), ("Business", 1.5), ("First", 2.0)] {
        sqlx::query(
            "INSERT OR IGNORE INTO seat_multipliers (seat_class, multiplier) VALUES (?, ?)",
        )
        .bind(seat_class)
        .bind(multiplier)
        .execute(&db_pool)
        .await?;
    }

    println!("👥 Creating users...");
    for _ in 0..args.users {
        let username: String = Username().fake();
        let email: String = FreeEmail().fake();
        sqlx::query("INSERT INTO users (id, username, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&username)
            .bind(&email)
            .bind(Utc::now().naive_utc())
            .execute(&db_pool)
            .await
            .ok(); // duplicate fake usernames are fine to skip
    }
    println!("  ✅ Created {} users", args.users);

    println!("✈️  Creating flights and seats...");
    let mut rng = rand::thread_rng();
    for i in 0..args.flights {
        let flight_id = Uuid::new_v4();
        let flight_number = format!("SB{:04}", rng.gen_range(1000..10000));
        let price_cents: i64 = rng.gen_range(50..400) * 100;

        sqlx::query(
            "INSERT INTO flights (id, flight_number, price_cents) VALUES (?, ?, ?)",
        )
        .bind(flight_id.to_string())
        .bind(&flight_number)
        .bind(price_cents)
        .execute(&db_pool)
        .await?;

        for row in 1..=args.rows {
            let seat_class = match row {
                1 => "First",
                2..=3 => "Business",
                _ => "Economy",
            };
            for letter in ["A", "B", "C", "D", "E", "F"] {
                sqlx::query(
                    r#"
                    INSERT INTO seats (id, flight_id, seat_number, seat_class, available)
                    VALUES (?, ?, ?, ?, TRUE)
                    "#,
                )
                .bind(Uuid::new_v4().to_string())
                .bind(flight_id.to_string())
                .bind(format!("{}{}", row, letter))
                .bind(seat_class)
                .execute(&db_pool)
                .await?;
            }
        }

        println!(
            "  ✅ Flight {}/{}: {} ({} seats, {:.2} base)",
            i + 1,
            args.flights,
            flight_number,
            args.rows * 6,
            price_cents as f64 / 100.0
        );
    }

    println!("🎉 Seeding complete");
    Ok(())
}

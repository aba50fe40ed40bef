/// Booking amount: flight base price scaled by the seat-class multiplier.
/// Always recomputed against the requested flight and seat, never cached.
pub fn amount_cents(price_cents: i64, multiplier: f64) -> i64 {
    (price_cents as f64 * multiplier).round() as i64
}

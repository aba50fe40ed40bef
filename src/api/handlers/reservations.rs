use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{BookingRequest, PassengerDetails, ReservationStatus, ReservationSummary},
    error::{AppError, Result},
    service::UpdateOutcome,
};

#[derive(Debug, Deserialize)]
pub struct FlightParams {
    #[serde(rename = "flightID")]
    flight_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReservationDto {
    #[serde(rename = "reservationID")]
    reservation_id: Uuid,
    #[serde(rename = "userID")]
    user_id: Uuid,
    #[serde(rename = "flightID")]
    flight_id: Uuid,
    #[serde(rename = "seatNumber")]
    seat_number: String,
    status: ReservationStatus,
    #[serde(rename = "bookingDate")]
    booking_date: NaiveDate,
    #[serde(rename = "paymentID")]
    payment_id: Option<Uuid>,
    amount: Option<i64>,
    username: Option<String>,
}

impl From<ReservationSummary> for ReservationDto {
    fn from(summary: ReservationSummary) -> Self {
        Self {
            reservation_id: summary.reservation_id,
            user_id: summary.user_id,
            flight_id: summary.flight_id,
            seat_number: summary.seat_number,
            status: summary.status,
            booking_date: summary.booking_date,
            payment_id: summary.payment_id,
            amount: summary.amount_cents,
            username: summary.username,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<FlightParams>,
) -> Result<Json<Vec<ReservationDto>>> {
    let reservations = state.service_context.reservation_repo
        .list(params.flight_id)
        .await?;

    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct PassengerInfoDto {
    #[serde(rename = "Firstname")]
    first_name: Option<String>,
    #[serde(rename = "Middlename")]
    middle_name: Option<String>,
    #[serde(rename = "Lastname")]
    last_name: Option<String>,
    #[serde(rename = "Nationality")]
    nationality: Option<String>,
    #[serde(rename = "BirthDate")]
    birth_date: Option<NaiveDate>,
    #[serde(rename = "Address")]
    address: Option<String>,
    #[serde(rename = "PassportNumber")]
    passport_number: Option<String>,
}

impl From<PassengerInfoDto> for PassengerDetails {
    fn from(dto: PassengerInfoDto) -> Self {
        Self {
            first_name: dto.first_name,
            middle_name: dto.middle_name,
            last_name: dto.last_name,
            nationality: dto.nationality,
            birth_date: dto.birth_date,
            address: dto.address,
            passport_number: dto.passport_number,
        }
    }
}

/// Create/update body. Fields are optional so an incomplete body surfaces
/// as a 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct BookingDto {
    #[serde(rename = "userID")]
    user_id: Option<Uuid>,
    #[serde(rename = "flightID")]
    flight_id: Option<Uuid>,
    #[serde(rename = "seatNumber")]
    seat_number: Option<String>,
    status: Option<String>,
    #[serde(rename = "bookingDate")]
    booking_date: Option<NaiveDate>,
    #[serde(rename = "passengerInfo")]
    passenger_info: Option<PassengerInfoDto>,
}

impl BookingDto {
    fn into_request(self) -> Result<BookingRequest> {
        let (user_id, flight_id, seat_number, status, booking_date) = match (
            self.user_id,
            self.flight_id,
            self.seat_number,
            self.status,
            self.booking_date,
        ) {
            (Some(u), Some(f), Some(s), Some(st), Some(d)) if !s.is_empty() => (u, f, s, st, d),
            _ => return Err(AppError::BadRequest("Missing required fields".to_string())),
        };

        let status = ReservationStatus::parse(&status)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid reservation status: {}", status)))?;

        Ok(BookingRequest {
            user_id,
            flight_id,
            seat_number,
            status,
            booking_date,
            passenger: self.passenger_info.map(Into::into),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    message: String,
    #[serde(rename = "reservationID")]
    reservation_id: Uuid,
    #[serde(rename = "seatID")]
    seat_id: Uuid,
    amount: i64,
}

pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<BookingDto>,
) -> Result<(StatusCode, Json<CreateResponse>)> {
    let request = dto.into_request()?;

    let outcome = state.service_context.booking_service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            message: "Reservation created successfully".to_string(),
            reservation_id: outcome.reservation_id,
            seat_id: outcome.seat_id,
            amount: outcome.amount_cents,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    message: String,
    #[serde(rename = "seatID", skip_serializing_if = "Option::is_none")]
    seat_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<i64>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<BookingDto>,
) -> Result<Json<UpdateResponse>> {
    let request = dto.into_request()?;

    let outcome = state.service_context.booking_service.update(id, request).await?;

    let response = match outcome {
        UpdateOutcome::DateOnly => UpdateResponse {
            message: "Booking date updated only".to_string(),
            seat_id: None,
            amount: None,
        },
        UpdateOutcome::Applied { seat_id, amount_cents } => UpdateResponse {
            message: "Reservation updated successfully".to_string(),
            seat_id: Some(seat_id),
            amount: Some(amount_cents),
        },
    };

    Ok(Json(response))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.service_context.booking_service.delete(id).await?;

    Ok(Json(serde_json::json!({
        "message": "Reservation and related data deleted. Seat set to available."
    })))
}

#[derive(Debug, Serialize)]
pub struct PassengerSlotDto {
    #[serde(rename = "reservationId")]
    reservation_id: Uuid,
    #[serde(rename = "seatId")]
    seat_id: Uuid,
    #[serde(rename = "seatNumber")]
    seat_number: String,
}

pub async fn list_awaiting_passenger(
    State(state): State<AppState>,
    Query(params): Query<FlightParams>,
) -> Result<Json<Vec<PassengerSlotDto>>> {
    let flight_id = params
        .flight_id
        .ok_or_else(|| AppError::BadRequest("Missing flightID".to_string()))?;

    let slots = state.service_context.reservation_repo
        .list_awaiting_passenger(flight_id)
        .await?;

    Ok(Json(
        slots
            .into_iter()
            .map(|slot| PassengerSlotDto {
                reservation_id: slot.reservation_id,
                seat_id: slot.seat_id,
                seat_number: slot.seat_number,
            })
            .collect(),
    ))
}

#[derive(Debug, Serialize)]
pub struct AvailableSeatDto {
    #[serde(rename = "seatNumber")]
    seat_number: String,
}

pub async fn available_seats(
    State(state): State<AppState>,
    Query(params): Query<FlightParams>,
) -> Result<Json<Vec<AvailableSeatDto>>> {
    let flight_id = params
        .flight_id
        .ok_or_else(|| AppError::BadRequest("Missing flightID".to_string()))?;

    let numbers = state.service_context.seat_repo
        .list_available_numbers(flight_id)
        .await?;

    Ok(Json(
        numbers
            .into_iter()
            .map(|seat_number| AvailableSeatDto { seat_number })
            .collect(),
    ))
}

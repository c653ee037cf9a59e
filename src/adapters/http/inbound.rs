// HTTP inbound handlers for the reservation authority.
//
// Responsibilities
// - Translate requests into catalog reads, availability lookups, reservation and lifecycle
//   commands, and booking queries.
// - Map outcomes to status codes: 201 created, 404 unknown booking, 409 slot taken or an
//   invalid lifecycle move, 422 malformed body or a booking the policy refuses (unknown
//   service or professional, closed date, time off the grid).

use crate::application::errors::ApplicationError;
use crate::core::booking::confirmed::{BookingStatus, ConfirmedBooking};
use crate::core::booking::decider::change_status::command::ChangeBookingStatus;
use crate::core::booking_flow::draft::CompleteBooking;
use crate::core::catalog::Service;
use crate::core::client::{ClientDetailsInput, validate_client_details};
use crate::core::ports::{CommitError, ReservationCoordinator};
use crate::core::slot::{SlotKey, TimeLabel};
use crate::shell::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

#[derive(Serialize)]
struct ServiceListing {
    #[serde(flatten)]
    service: Service,
    price_label: String,
}

pub async fn list_services(State(state): State<AppState>) -> Response {
    match state.catalog.list_services().await {
        Ok(services) => {
            let listings: Vec<ServiceListing> = services
                .into_iter()
                .map(|service| ServiceListing {
                    price_label: service.price.format(&state.currency_code),
                    service,
                })
                .collect();
            Json(listings).into_response()
        }
        Err(err) => {
            error!(error = %err, "listing services failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn list_professionals(State(state): State<AppState>) -> Response {
    match state.catalog.list_professionals().await {
        Ok(professionals) => Json(professionals).into_response(),
        Err(err) => {
            error!(error = %err, "listing professionals failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct AvailabilityParams {
    pub professional_id: String,
    pub date: NaiveDate,
}

pub async fn availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> Response {
    match state
        .availability
        .available_slots(&params.professional_id, params.date)
        .await
    {
        Ok(slots) => Json(slots).into_response(),
        Err(err) => {
            error!(error = %err, "availability lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn slot_board(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> Response {
    match state
        .availability
        .slot_board(&params.professional_id, params.date)
        .await
    {
        Ok(board) => Json(board).into_response(),
        Err(err) => {
            error!(error = %err, "slot board lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn create_booking(
    State(state): State<AppState>,
    body: Result<Json<CompleteBooking>, JsonRejection>,
) -> Response {
    let Json(mut booking) = match body {
        Ok(b) => b,
        Err(rejection) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()),
    };

    let input = ClientDetailsInput {
        name: booking.client.name.clone(),
        email: booking.client.email.clone(),
        phone: booking.client.phone.clone(),
        notes: booking.notes.clone(),
    };
    match validate_client_details(&input) {
        Ok((contact, notes)) => {
            booking.client = contact;
            booking.notes = notes;
        }
        Err(validation) => return (StatusCode::UNPROCESSABLE_ENTITY, Json(validation)).into_response(),
    }

    match state.reserve_handler.commit(&booking).await {
        Ok(confirmed) => (StatusCode::CREATED, Json(confirmed)).into_response(),
        Err(CommitError::SlotTaken(key)) => {
            warn!(slot = %key, "reservation rejected, slot taken");
            error_response(StatusCode::CONFLICT, format!("slot {key} is already taken"))
        }
        Err(CommitError::Rejected(problems)) => {
            warn!(%problems, "reservation rejected by policy");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(problems)).into_response()
        }
        Err(CommitError::Transport(err)) => {
            error!(error = %err, "reservation failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_booking(State(state): State<AppState>, Path(booking_id): Path<String>) -> Response {
    match state.queries.get_booking(&booking_id).await {
        Ok(Some(view)) => Json(ConfirmedBooking::from(view)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("booking {booking_id} not found")),
        Err(err) => {
            error!(error = %err, "booking lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize, Default)]
pub struct FindBookingsParams {
    pub professional_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeLabel>,
}

/// Tuple lookup reads the slot stream; the other filters read the projection.
pub async fn find_bookings(
    State(state): State<AppState>,
    Query(params): Query<FindBookingsParams>,
) -> Response {
    let result: anyhow::Result<Vec<ConfirmedBooking>> = match params {
        FindBookingsParams {
            professional_id: Some(professional_id),
            date: Some(date),
            time: Some(time),
        } => {
            let key = SlotKey::new(professional_id, date, time);
            state
                .reserve_handler
                .current_holder(&key)
                .await
                .map(|holder| holder.into_iter().collect())
                .map_err(anyhow::Error::from)
        }
        FindBookingsParams {
            professional_id: Some(professional_id),
            date,
            time: None,
        } => state
            .queries
            .list_by_professional(&professional_id)
            .await
            .map(|views| {
                views
                    .into_iter()
                    .filter(|view| date.is_none_or(|d| view.date == d))
                    .map(ConfirmedBooking::from)
                    .collect()
            }),
        FindBookingsParams {
            professional_id: None,
            date: Some(date),
            time: None,
        } => state
            .queries
            .list_by_date(date)
            .await
            .map(|views| views.into_iter().map(ConfirmedBooking::from).collect()),
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "filter by professional_id, date, or professional_id with date and time",
            );
        }
    };
    match result {
        Ok(bookings) => Json(bookings).into_response(),
        Err(err) => {
            error!(error = %err, "booking search failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn change_status(state: AppState, booking_id: String, status: BookingStatus) -> Response {
    let command = ChangeBookingStatus {
        booking_id,
        status,
        changed_at: Utc::now().timestamp_millis(),
    };
    match state.change_status_handler.handle(command).await {
        Ok(booking) => Json(booking).into_response(),
        Err(ApplicationError::NotFound(id)) => {
            error_response(StatusCode::NOT_FOUND, format!("booking {id} not found"))
        }
        Err(ApplicationError::Domain(reason)) => error_response(StatusCode::CONFLICT, reason.to_string()),
        Err(err) => {
            error!(error = %err, "status change failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn confirm_booking(State(state): State<AppState>, Path(booking_id): Path<String>) -> Response {
    change_status(state, booking_id, BookingStatus::Confirmed).await
}

pub async fn complete_booking(State(state): State<AppState>, Path(booking_id): Path<String>) -> Response {
    change_status(state, booking_id, BookingStatus::Completed).await
}

pub async fn cancel_booking(State(state): State<AppState>, Path(booking_id): Path<String>) -> Response {
    change_status(state, booking_id, BookingStatus::Cancelled).await
}

// HTTP client for the reservation authority.
//
// Purpose
// - Implement CatalogSource, AvailabilitySource and ReservationCoordinator over the routes
//   served by adapters::http::inbound, so a booking flow can run against a remote server.
//
// Error mapping
// - 409 on POST /bookings is SlotTaken. Any other 4xx is Rejected: the server answered and
//   stored nothing. 5xx and other statuses are Status(code), the outcome is unknown.
// - Connection failures are Unreachable, timeouts are Timeout, bad payloads are Decode.

use crate::core::booking::confirmed::ConfirmedBooking;
use crate::core::booking_flow::draft::CompleteBooking;
use crate::core::catalog::{Professional, Service};
use crate::core::client::{Field, ValidationError};
use crate::core::ports::{
    AvailabilitySource, CatalogSource, CommitError, ReservationCoordinator, TransportError,
};
use crate::core::slot::{SlotKey, TimeLabel};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, warn};

pub struct HttpBookingClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBookingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Backend(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }
        response.json::<T>().await.map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Unreachable(err.to_string())
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Backend(err.to_string())
    }
}

#[async_trait]
impl CatalogSource for HttpBookingClient {
    async fn list_services(&self) -> Result<Vec<Service>, TransportError> {
        self.get_json("/services", &[]).await
    }

    async fn list_professionals(&self) -> Result<Vec<Professional>, TransportError> {
        self.get_json("/professionals", &[]).await
    }
}

#[async_trait]
impl AvailabilitySource for HttpBookingClient {
    async fn available_slots(
        &self,
        professional_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeLabel>, TransportError> {
        self.get_json(
            "/availability",
            &[
                ("professional_id", professional_id.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl ReservationCoordinator for HttpBookingClient {
    async fn commit(&self, booking: &CompleteBooking) -> Result<ConfirmedBooking, CommitError> {
        let response = self
            .http
            .post(self.url("/bookings"))
            .json(booking)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match response.status() {
            StatusCode::CREATED | StatusCode::OK => Ok(response
                .json::<ConfirmedBooking>()
                .await
                .map_err(map_reqwest_error)?),
            StatusCode::CONFLICT => {
                debug!(slot = %booking.slot_key(), "server reported the slot as taken");
                Err(CommitError::SlotTaken(booking.slot_key()))
            }
            status if status.is_client_error() => {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, slot = %booking.slot_key(), "server rejected the booking");
                let problems = serde_json::from_str::<ValidationError>(&body)
                    .ok()
                    .filter(|problems| !problems.is_empty())
                    .unwrap_or_else(|| {
                        ValidationError::single(Field::Booking, format!("rejected with {status}: {body}"))
                    });
                Err(CommitError::Rejected(problems))
            }
            status => {
                error!(%status, "unexpected status from POST /bookings");
                Err(CommitError::Transport(TransportError::Status(status.as_u16())))
            }
        }
    }

    async fn find_booking(&self, key: &SlotKey) -> Result<Option<ConfirmedBooking>, TransportError> {
        let bookings: Vec<ConfirmedBooking> = self
            .get_json(
                "/bookings",
                &[
                    ("professional_id", key.professional_id.clone()),
                    ("date", key.date.format("%Y-%m-%d").to_string()),
                    ("time", key.time.to_string()),
                ],
            )
            .await?;
        Ok(bookings.into_iter().find(|b| b.status.is_active()))
    }
}

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::http::inbound;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/services", get(inbound::list_services))
        .route("/professionals", get(inbound::list_professionals))
        .route("/availability", get(inbound::availability))
        .route("/slots", get(inbound::slot_board))
        .route(
            "/bookings",
            get(inbound::find_bookings).post(inbound::create_booking),
        )
        .route("/bookings/{id}", get(inbound::get_booking))
        .route("/bookings/{id}/confirm", post(inbound::confirm_booking))
        .route("/bookings/{id}/complete", post(inbound::complete_booking))
        .route("/bookings/{id}/cancel", post(inbound::cancel_booking))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

use crate::adapters::http::client::HttpBookingClient;
use crate::adapters::in_memory::in_memory_notifier::InMemoryNotifier;
use crate::core::availability::WorkingHours;
use crate::core::booking::confirmed::BookingStatus;
use crate::core::booking_flow::errors::FlowError;
use crate::core::booking_flow::machine::{BookingFlow, FlowSettings};
use crate::core::booking_flow::step::Step;
use crate::core::client::{Field, SessionContext};
use crate::core::ports::{AvailabilitySource, CatalogSource, CommitError, ReservationCoordinator, TransportError};
use crate::core::slot::TimeLabel;
use crate::shell::http::router;
use crate::test_support::fixtures::app::{TestApp, client_details, make_app};
use crate::test_support::fixtures::commands::make_complete_booking;
use chrono::NaiveDate;
use std::time::Duration;

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn at(hour: u32) -> TimeLabel {
    TimeLabel::new(hour, 0).unwrap()
}

async fn serve(app: &TestApp) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(app.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base url of a port nothing listens on.
async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client(base_url: String) -> HttpBookingClient {
    HttpBookingClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn a_flow_books_through_the_http_client() {
    let app = make_app(WorkingHours::default());
    let remote = client(serve(&app).await);
    let notifier = InMemoryNotifier::new();

    let mut flow = BookingFlow::start(
        SessionContext::Anonymous,
        &remote,
        app.settings.clone(),
        app.clock.clone(),
    )
    .await
    .unwrap();
    assert_eq!(flow.catalog().services.len(), 2);

    flow.select_service("svc-haircut").unwrap();
    flow.select_professional("pro-alex").unwrap();
    flow.select_date(june(10)).unwrap();
    let slots = flow.load_availability(&remote).await.unwrap();
    assert_eq!(slots.first(), Some(&at(9)));
    flow.select_time(at(14)).unwrap();
    flow.submit_client_details(client_details("Juan Perez", "juan@example.com"))
        .unwrap();

    let confirmation = flow.confirm(&remote, &notifier).await.unwrap();
    assert_eq!(confirmation.booking.status, BookingStatus::Pending);
    assert_eq!(confirmation.summary.client_email, "juan@example.com");

    let held = remote
        .find_booking(&confirmation.booking.slot_key())
        .await
        .unwrap();
    assert_eq!(held.map(|b| b.id), Some(confirmation.booking.id));
    let slots = remote.available_slots("pro-alex", june(10)).await.unwrap();
    assert!(!slots.contains(&at(14)));
}

#[tokio::test]
async fn a_taken_slot_comes_back_as_slot_taken() {
    let app = make_app(WorkingHours::default());
    let remote = client(serve(&app).await);
    let booking = make_complete_booking();

    assert!(remote.commit(&booking).await.is_ok());
    assert_eq!(
        remote.commit(&booking).await,
        Err(CommitError::SlotTaken(booking.slot_key()))
    );
}

#[tokio::test]
async fn an_unreachable_server_is_a_transport_error() {
    let remote = client(closed_port().await);
    assert!(matches!(
        remote.commit(&make_complete_booking()).await,
        Err(CommitError::Transport(TransportError::Unreachable(_)))
    ));
    assert!(matches!(
        remote.list_services().await,
        Err(TransportError::Unreachable(_))
    ));
}

#[tokio::test]
async fn a_commit_retried_after_an_outage_is_checked_before_booking() {
    let app = make_app(WorkingHours::default());
    let remote = client(serve(&app).await);
    let offline = client(closed_port().await);
    let notifier = InMemoryNotifier::new();

    let mut flow = BookingFlow::start(
        SessionContext::Anonymous,
        &remote,
        app.settings.clone(),
        app.clock.clone(),
    )
    .await
    .unwrap();
    flow.select_service("svc-haircut").unwrap();
    flow.select_professional("pro-alex").unwrap();
    flow.select_date(june(10)).unwrap();
    flow.load_availability(&remote).await.unwrap();
    flow.select_time(at(14)).unwrap();
    flow.submit_client_details(client_details("Juan Perez", "juan@example.com"))
        .unwrap();

    let failed = flow.confirm(&offline, &notifier).await.unwrap_err();
    assert!(matches!(failed, FlowError::Transport(TransportError::Unreachable(_))));
    assert_eq!(failed.user_message(), "Could not reach the server. Please try again.");
    assert_eq!(flow.step(), Step::Confirm);

    let confirmation = flow.confirm(&remote, &notifier).await.unwrap();
    assert_eq!(confirmation.booking.time, at(14));
    assert_eq!(flow.step(), Step::SelectService);
}

#[tokio::test]
async fn a_refused_booking_comes_back_as_rejected() {
    let app = make_app(WorkingHours::default());
    let remote = client(serve(&app).await);
    let mut booking = make_complete_booking();
    booking.service_id = "svc-nope".into();
    booking.time = TimeLabel::new(3, 17).unwrap();

    match remote.commit(&booking).await {
        Err(CommitError::Rejected(problems)) => {
            assert!(problems.get(Field::Service).is_some());
            assert!(problems.get(Field::Time).is_some());
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert_eq!(remote.find_booking(&booking.slot_key()).await.unwrap(), None);
}

#[tokio::test]
async fn a_refused_booking_is_not_treated_as_an_unknown_outcome() {
    let app = make_app(WorkingHours::default());
    let remote = client(serve(&app).await);
    let notifier = InMemoryNotifier::new();
    let open_every_day = FlowSettings {
        hours: WorkingHours {
            closed_weekday: None,
            ..WorkingHours::default()
        },
        ..app.settings.clone()
    };

    let mut flow = BookingFlow::start(SessionContext::Anonymous, &remote, open_every_day, app.clock.clone())
        .await
        .unwrap();
    flow.select_service("svc-haircut").unwrap();
    flow.select_professional("pro-alex").unwrap();
    flow.select_date(june(15)).unwrap();
    assert!(flow.load_availability(&remote).await.unwrap().is_empty());
    flow.select_time(at(14)).unwrap();
    flow.submit_client_details(client_details("Juan Perez", "juan@example.com"))
        .unwrap();

    match flow.confirm(&remote, &notifier).await {
        Err(FlowError::Validation(problems)) => {
            assert_eq!(problems.get(Field::Date), Some("the salon is closed on that day"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(flow.step(), Step::Confirm);
    assert!(!flow.has_unresolved_commit());
    assert!(notifier.sent.lock().await.is_empty());
}

use crate::adapters::in_memory::in_memory_notifier::InMemoryNotifier;
use crate::adapters::notifications::LogEmailNotifier;
use crate::application::query_handlers::bookings_queries::BookingQueries;
use crate::core::availability::WorkingHours;
use crate::core::booking::confirmed::{BookingStatus, ConfirmedBooking};
use crate::core::booking_flow::draft::CompleteBooking;
use crate::core::booking_flow::errors::FlowError;
use crate::core::booking_flow::machine::BookingFlow;
use crate::core::booking_flow::step::Step;
use crate::core::client::{Field, SessionContext};
use crate::core::ports::{AvailabilitySource, CommitError, ReservationCoordinator, TransportError};
use crate::core::slot::{SlotKey, TimeLabel};
use crate::shell::config::AppConfig;
use crate::test_support::fixtures::app::{TestApp, client_details, identified_session, make_app};
use async_trait::async_trait;
use chrono::NaiveDate;
use rstest::rstest;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn at(hour: u32) -> TimeLabel {
    TimeLabel::new(hour, 0).unwrap()
}

async fn start(app: &TestApp, session: SessionContext) -> BookingFlow {
    BookingFlow::start(
        session,
        app.state.catalog.as_ref(),
        app.settings.clone(),
        app.clock.clone(),
    )
    .await
    .unwrap()
}

/// Walks service, professional and date, then loads availability for the date.
async fn walk_to_time(app: &TestApp, flow: &mut BookingFlow, date: NaiveDate) -> Vec<TimeLabel> {
    assert_eq!(flow.select_service("svc-haircut"), Ok(Step::SelectProfessional));
    assert_eq!(flow.select_professional("pro-alex"), Ok(Step::SelectDate));
    assert_eq!(flow.select_date(date), Ok(Step::SelectTime));
    flow.load_availability(app.state.availability.as_ref())
        .await
        .unwrap()
}

struct CountingAvailability<'a> {
    inner: &'a dyn AvailabilitySource,
    requests: Mutex<Vec<String>>,
}

#[async_trait]
impl<'a> AvailabilitySource for CountingAvailability<'a> {
    async fn available_slots(
        &self,
        professional_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeLabel>, TransportError> {
        self.requests.lock().await.push(professional_id.to_string());
        self.inner.available_slots(professional_id, date).await
    }
}

struct CountingCoordinator {
    commits: AtomicUsize,
}

#[async_trait]
impl ReservationCoordinator for CountingCoordinator {
    async fn commit(&self, booking: &CompleteBooking) -> Result<ConfirmedBooking, CommitError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Err(CommitError::SlotTaken(booking.slot_key()))
    }

    async fn find_booking(&self, _key: &SlotKey) -> Result<Option<ConfirmedBooking>, TransportError> {
        Ok(None)
    }
}

/// Commits for real, then reports a timeout the first time, as if the response was lost.
struct LostResponseCoordinator<'a> {
    inner: &'a dyn ReservationCoordinator,
    lost_once: AtomicBool,
    commits: AtomicUsize,
}

#[async_trait]
impl<'a> ReservationCoordinator for LostResponseCoordinator<'a> {
    async fn commit(&self, booking: &CompleteBooking) -> Result<ConfirmedBooking, CommitError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        let result = self.inner.commit(booking).await;
        if !self.lost_once.swap(true, Ordering::SeqCst) {
            return Err(CommitError::Transport(TransportError::Timeout));
        }
        result
    }

    async fn find_booking(&self, key: &SlotKey) -> Result<Option<ConfirmedBooking>, TransportError> {
        self.inner.find_booking(key).await
    }
}

/// Times out the first commit before it reaches the authority.
struct DroppedRequestCoordinator<'a> {
    inner: &'a dyn ReservationCoordinator,
    dropped_once: AtomicBool,
    lookups: Mutex<Vec<SlotKey>>,
}

#[async_trait]
impl<'a> ReservationCoordinator for DroppedRequestCoordinator<'a> {
    async fn commit(&self, booking: &CompleteBooking) -> Result<ConfirmedBooking, CommitError> {
        if !self.dropped_once.swap(true, Ordering::SeqCst) {
            return Err(CommitError::Transport(TransportError::Timeout));
        }
        self.inner.commit(booking).await
    }

    async fn find_booking(&self, key: &SlotKey) -> Result<Option<ConfirmedBooking>, TransportError> {
        self.lookups.lock().await.push(key.clone());
        self.inner.find_booking(key).await
    }
}

#[tokio::test]
async fn identified_client_skips_details_and_books() {
    let app = make_app(WorkingHours::default());
    let notifier = InMemoryNotifier::new();
    let mut flow = start(&app, identified_session()).await;

    let slots = walk_to_time(&app, &mut flow, june(10)).await;
    assert!(slots.contains(&at(14)));
    assert_eq!(flow.select_time(at(14)), Ok(Step::Confirm));
    assert_eq!(
        flow.path(),
        vec![Step::SelectService, Step::SelectProfessional, Step::SelectDate, Step::SelectTime]
    );
    assert_eq!(flow.draft().client_name.as_deref(), Some("Maria Lopez"));
    assert_eq!(flow.draft().client_email.as_deref(), Some("maria@example.com"));
    assert_eq!(flow.draft().client_phone.as_deref(), Some("+56 9 8765 4321"));

    let confirmation = flow
        .confirm(app.state.reserve_handler.as_ref(), &notifier)
        .await
        .unwrap();
    assert_eq!(confirmation.booking.status, BookingStatus::Pending);
    assert_eq!(confirmation.booking.user_id.as_deref(), Some("user-fixed-0001"));
    assert_eq!(confirmation.summary.service_name, "Haircut");
    assert_eq!(confirmation.summary.professional_name, "Alex");
    assert!(confirmation
        .message_link
        .as_deref()
        .is_some_and(|link| link.starts_with("https://wa.me/56987654321?text=")));
    assert_eq!(notifier.sent.lock().await.len(), 1);

    assert_eq!(flow.step(), Step::SelectService);
    assert!(flow.draft().is_empty());

    let stored = app
        .state
        .queries
        .get_booking(&confirmation.booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.time, at(14));
    let remaining = app
        .state
        .availability
        .available_slots("pro-alex", june(10))
        .await
        .unwrap();
    assert!(!remaining.contains(&at(14)));
}

#[tokio::test]
async fn anonymous_client_with_invalid_email_stays_on_details() {
    let app = make_app(WorkingHours::default());
    let mut flow = start(&app, SessionContext::Anonymous).await;
    walk_to_time(&app, &mut flow, june(10)).await;
    assert_eq!(flow.select_time(at(14)), Ok(Step::SelectClientDetails));

    match flow.submit_client_details(client_details("Juan Perez", "not-an-email")) {
        Err(FlowError::Validation(errors)) => {
            assert!(errors.get(Field::Email).is_some());
            assert!(errors.get(Field::Name).is_none());
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(flow.step(), Step::SelectClientDetails);
    assert_eq!(flow.draft().client_email, None);

    assert_eq!(
        flow.submit_client_details(client_details("Juan Perez", "juan@example.com")),
        Ok(Step::Confirm)
    );
}

#[tokio::test]
async fn changing_professional_requires_a_fresh_slot_list() {
    let hours = WorkingHours {
        closed_weekday: None,
        ..WorkingHours::default()
    };
    let app = make_app(hours);
    let source = CountingAvailability {
        inner: app.state.availability.as_ref(),
        requests: Mutex::new(Vec::new()),
    };
    let mut flow = start(&app, SessionContext::Anonymous).await;

    flow.select_service("svc-haircut").unwrap();
    flow.select_professional("pro-alex").unwrap();
    flow.select_date(june(15)).unwrap();
    flow.load_availability(&source).await.unwrap();
    assert!(flow.available_slots().is_some());

    assert_eq!(flow.go_back(), Ok(Step::SelectDate));
    assert_eq!(flow.go_back(), Ok(Step::SelectProfessional));
    assert_eq!(flow.select_professional("pro-sam"), Ok(Step::SelectDate));
    assert_eq!(flow.select_date(june(15)), Ok(Step::SelectTime));

    assert!(flow.available_slots().is_none());
    assert_eq!(flow.select_time(at(14)), Err(FlowError::AvailabilityStale));

    flow.load_availability(&source).await.unwrap();
    assert_eq!(*source.requests.lock().await, vec!["pro-alex", "pro-sam"]);
    assert_eq!(flow.select_time(at(14)), Ok(Step::SelectClientDetails));
}

#[rstest]
#[case::identified(identified_session())]
#[case::anonymous(SessionContext::Anonymous)]
#[tokio::test]
async fn going_back_from_confirm_unwinds_to_an_empty_draft(#[case] session: SessionContext) {
    let app = make_app(WorkingHours::default());
    let mut flow = start(&app, session).await;
    walk_to_time(&app, &mut flow, june(10)).await;
    if flow.select_time(at(14)) == Ok(Step::SelectClientDetails) {
        flow.submit_client_details(client_details("Juan Perez", "juan@example.com"))
            .unwrap();
    }
    assert_eq!(flow.step(), Step::Confirm);

    let mut expected = flow.path();
    while let Some(previous) = expected.pop() {
        assert_eq!(flow.go_back(), Ok(previous));
    }
    assert_eq!(flow.step(), Step::SelectService);
    assert!(flow.draft().is_empty());
    assert_eq!(flow.go_back(), Ok(Step::SelectService));
}

#[tokio::test]
async fn an_incomplete_draft_never_reaches_the_coordinator() {
    let app = make_app(WorkingHours::default());
    let notifier = InMemoryNotifier::new();
    let coordinator = CountingCoordinator {
        commits: AtomicUsize::new(0),
    };
    let mut flow = start(&app, SessionContext::Anonymous).await;
    flow.select_service("svc-haircut").unwrap();

    let result = flow.confirm(&coordinator, &notifier).await;
    assert!(matches!(result, Err(FlowError::Incomplete(_))));
    assert_eq!(coordinator.commits.load(Ordering::SeqCst), 0);
    assert!(notifier.sent.lock().await.is_empty());
}

#[tokio::test]
async fn a_failed_confirmation_email_does_not_undo_the_booking() {
    let app = make_app(WorkingHours::default());
    let mut notifier = InMemoryNotifier::new();
    notifier.toggle_offline();
    let mut flow = start(&app, identified_session()).await;
    walk_to_time(&app, &mut flow, june(10)).await;
    flow.select_time(at(14)).unwrap();

    let confirmation = flow
        .confirm(app.state.reserve_handler.as_ref(), &notifier)
        .await
        .unwrap();
    assert!(app
        .state
        .queries
        .get_booking(&confirmation.booking.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn a_lost_commit_response_is_resolved_without_a_second_booking() {
    let app = make_app(WorkingHours::default());
    let notifier = InMemoryNotifier::new();
    let coordinator = LostResponseCoordinator {
        inner: app.state.reserve_handler.as_ref(),
        lost_once: AtomicBool::new(false),
        commits: AtomicUsize::new(0),
    };
    let mut flow = start(&app, identified_session()).await;
    walk_to_time(&app, &mut flow, june(10)).await;
    flow.select_time(at(14)).unwrap();

    let first = flow.confirm(&coordinator, &notifier).await;
    assert_eq!(first.unwrap_err(), FlowError::Transport(TransportError::Timeout));
    assert_eq!(flow.step(), Step::Confirm);

    let confirmation = flow.confirm(&coordinator, &notifier).await.unwrap();
    assert_eq!(coordinator.commits.load(Ordering::SeqCst), 1);
    let on_date = app.state.queries.list_by_date(june(10)).await.unwrap();
    assert_eq!(on_date.len(), 1);
    assert_eq!(on_date[0].booking_id, confirmation.booking.id);
}

#[tokio::test]
async fn a_lost_commit_is_found_even_after_choosing_another_time() {
    let app = make_app(WorkingHours::default());
    let notifier = InMemoryNotifier::new();
    let coordinator = LostResponseCoordinator {
        inner: app.state.reserve_handler.as_ref(),
        lost_once: AtomicBool::new(false),
        commits: AtomicUsize::new(0),
    };
    let mut flow = start(&app, identified_session()).await;
    walk_to_time(&app, &mut flow, june(10)).await;
    flow.select_time(at(14)).unwrap();
    let first = flow.confirm(&coordinator, &notifier).await;
    assert_eq!(first.unwrap_err(), FlowError::Transport(TransportError::Timeout));

    assert_eq!(flow.go_back(), Ok(Step::SelectTime));
    let slots = flow
        .load_availability(app.state.availability.as_ref())
        .await
        .unwrap();
    assert!(!slots.contains(&at(14)));
    assert_eq!(flow.select_time(at(15)), Ok(Step::Confirm));

    let confirmation = flow.confirm(&coordinator, &notifier).await.unwrap();
    assert_eq!(confirmation.booking.time, at(14));
    assert_eq!(confirmation.summary.time, at(14));
    assert_eq!(coordinator.commits.load(Ordering::SeqCst), 1);
    assert!(!flow.has_unresolved_commit());

    let on_date = app.state.queries.list_by_date(june(10)).await.unwrap();
    assert_eq!(on_date.len(), 1);
    assert_eq!(on_date[0].booking_id, confirmation.booking.id);
}

#[tokio::test]
async fn a_commit_that_never_arrived_lets_the_client_book_another_time() {
    let app = make_app(WorkingHours::default());
    let notifier = InMemoryNotifier::new();
    let coordinator = DroppedRequestCoordinator {
        inner: app.state.reserve_handler.as_ref(),
        dropped_once: AtomicBool::new(false),
        lookups: Mutex::new(Vec::new()),
    };
    let mut flow = start(&app, identified_session()).await;
    walk_to_time(&app, &mut flow, june(10)).await;
    flow.select_time(at(14)).unwrap();
    assert!(flow.confirm(&coordinator, &notifier).await.is_err());

    flow.reset();
    walk_to_time(&app, &mut flow, june(10)).await;
    flow.select_time(at(15)).unwrap();
    let confirmation = flow.confirm(&coordinator, &notifier).await.unwrap();

    assert_eq!(confirmation.booking.time, at(15));
    assert_eq!(
        *coordinator.lookups.lock().await,
        vec![SlotKey::new("pro-alex", june(10), at(14))]
    );
    let on_date = app.state.queries.list_by_date(june(10)).await.unwrap();
    assert_eq!(on_date.len(), 1);
}

#[tokio::test]
async fn a_flow_configured_from_the_environment_confirms_through_the_email_log() {
    let config = AppConfig::from_lookup(|key| match key {
        "SALON_NAME" => Some("Studio Norte".to_string()),
        "CLOSED_WEEKDAY" => Some("Tue".to_string()),
        _ => None,
    });
    let app = make_app(config.working_hours());
    let mut flow = BookingFlow::start(
        identified_session(),
        app.state.catalog.as_ref(),
        config.flow_settings(),
        app.clock.clone(),
    )
    .await
    .unwrap();

    flow.select_service("svc-haircut").unwrap();
    flow.select_professional("pro-alex").unwrap();
    assert!(matches!(flow.select_date(june(10)), Err(FlowError::Validation(_))));
    assert!(!flow.offered_dates().contains(&june(10)));
    flow.select_date(june(11)).unwrap();
    flow.load_availability(app.state.availability.as_ref())
        .await
        .unwrap();
    flow.select_time(at(14)).unwrap();

    let confirmation = flow
        .confirm(app.state.reserve_handler.as_ref(), &LogEmailNotifier)
        .await
        .unwrap();
    assert_eq!(confirmation.summary.salon_name, "Studio Norte");
    assert!(confirmation.summary.email_body().contains("at Studio Norte."));
    assert_eq!(confirmation.booking.date, june(11));
}

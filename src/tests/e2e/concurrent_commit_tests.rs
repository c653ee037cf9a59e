use crate::adapters::in_memory::in_memory_notifier::InMemoryNotifier;
use crate::application::query_handlers::bookings_queries::BookingQueries;
use crate::core::availability::WorkingHours;
use crate::core::booking_flow::errors::FlowError;
use crate::core::booking_flow::machine::BookingFlow;
use crate::core::booking_flow::step::Step;
use crate::core::client::SessionContext;
use crate::core::ports::{CommitError, ReservationCoordinator};
use crate::core::slot::{SlotKey, TimeLabel};
use crate::test_support::fixtures::app::{TestApp, client_details, make_app};
use crate::test_support::fixtures::commands::make_complete_booking;
use chrono::NaiveDate;

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn at(hour: u32) -> TimeLabel {
    TimeLabel::new(hour, 0).unwrap()
}

async fn flow_at_confirm(app: &TestApp, name: &str, email: &str) -> BookingFlow {
    let mut flow = BookingFlow::start(
        SessionContext::Anonymous,
        app.state.catalog.as_ref(),
        app.settings.clone(),
        app.clock.clone(),
    )
    .await
    .unwrap();
    flow.select_service("svc-haircut").unwrap();
    flow.select_professional("pro-alex").unwrap();
    flow.select_date(june(10)).unwrap();
    flow.load_availability(app.state.availability.as_ref())
        .await
        .unwrap();
    flow.select_time(at(14)).unwrap();
    flow.submit_client_details(client_details(name, email)).unwrap();
    assert_eq!(flow.step(), Step::Confirm);
    flow
}

#[tokio::test]
async fn two_flows_racing_for_one_slot_get_one_booking() {
    let app = make_app(WorkingHours::default());
    app.event_store.set_delay_append_ms(10);
    let notifier = InMemoryNotifier::new();
    let coordinator = app.state.reserve_handler.as_ref();

    let mut first = flow_at_confirm(&app, "Juan Perez", "juan@example.com").await;
    let mut second = flow_at_confirm(&app, "Ana Rojas", "ana@example.com").await;

    let (a, b) = tokio::join!(
        first.confirm(coordinator, &notifier),
        second.confirm(coordinator, &notifier)
    );

    let key = SlotKey::new("pro-alex", june(10), at(14));
    let (winner, loser_flow, loser_result) = match (a, b) {
        (Ok(won), Err(lost)) => (won, &mut second, lost),
        (Err(lost), Ok(won)) => (won, &mut first, lost),
        other => panic!("expected exactly one winner, got {other:?}"),
    };
    assert_eq!(loser_result, FlowError::SlotConflict(key.clone()));
    assert_eq!(loser_result.user_message(), "That time was just taken. Please pick another time.");
    assert_eq!(loser_flow.step(), Step::SelectTime);
    assert_eq!(loser_flow.draft().time, None);
    assert!(loser_flow.available_slots().is_none());

    let slots = loser_flow
        .load_availability(app.state.availability.as_ref())
        .await
        .unwrap();
    assert!(!slots.contains(&at(14)));
    assert_eq!(loser_flow.select_time(at(15)), Ok(Step::SelectClientDetails));

    let holder = coordinator.find_booking(&key).await.unwrap().unwrap();
    assert_eq!(holder.id, winner.booking.id);
    assert_eq!(notifier.sent.lock().await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_parallel_commits_leave_exactly_one_holder() {
    let app = make_app(WorkingHours::default());
    app.event_store.set_delay_append_ms(5);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let handler = app.state.reserve_handler.clone();
            let mut booking = make_complete_booking();
            booking.client.email = format!("client-{i}@example.com");
            tokio::spawn(async move { handler.commit(&booking).await })
        })
        .collect();

    let mut won = 0;
    let mut taken = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(CommitError::SlotTaken(_)) => taken += 1,
            Err(other) => panic!("unexpected commit failure: {other}"),
        }
    }
    assert_eq!(won, 1);
    assert_eq!(taken, 7);

    let on_date = app.state.queries.list_by_date(june(10)).await.unwrap();
    assert_eq!(on_date.len(), 1);
}

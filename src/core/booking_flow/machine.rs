// BookingFlow drives one booking session from service selection to a committed booking.
//
// Purpose
// - Enforce step preconditions, record the realized path for back navigation, and assemble
//   the draft handed to the reservation authority.
//
// Responsibilities
// - Forward moves go through transitions::next_step; each one pushes a (step, draft) snapshot.
// - Availability and commit calls are split into begin/apply pairs carrying a ticket. Every
//   navigation bumps the generation so results for a step the flow has left are dropped.
// - A commit whose outcome is unknown (transport failure) stays on record through back
//   navigation and reset. Every later commit attempt first looks those slots up, and a booking
//   that did land is returned instead of making a second one.
//
// Boundaries
// - Owns its state exclusively; callers hold it behind &mut. Ports are passed per call.

use crate::core::availability::WorkingHours;
use crate::core::booking::confirmed::ConfirmedBooking;
use crate::core::booking_flow::draft::{CompleteBooking, DraftBooking, IncompleteBookingError};
use crate::core::booking_flow::errors::FlowError;
use crate::core::booking_flow::slot_cache::SlotCache;
use crate::core::booking_flow::step::Step;
use crate::core::booking_flow::transitions::{ClientKind, FlowEvent, next_step, planned_path};
use crate::core::catalog::Catalog;
use crate::core::client::{ClientDetailsInput, SessionContext, validate_client_details};
use crate::core::notification::BookingSummary;
use crate::core::ports::{
    AvailabilitySource, BookingNotifier, CatalogSource, Clock, CommitError, ReservationCoordinator, TransportError,
};
use crate::core::slot::TimeLabel;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    pub hours: WorkingHours,
    pub salon_name: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            hours: WorkingHours::default(),
            salon_name: "La Tribu".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityTicket {
    generation: u64,
    pub professional_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTicket {
    generation: u64,
    pub booking: CompleteBooking,
    /// Earlier attempts that ended without a known outcome. Each is looked up before committing.
    pub unresolved: Vec<CompleteBooking>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub booking: ConfirmedBooking,
    pub summary: BookingSummary,
    pub message_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitPhase {
    Idle,
    InFlight(u64),
}

pub struct BookingFlow {
    session: SessionContext,
    catalog: Catalog,
    settings: FlowSettings,
    clock: Arc<dyn Clock>,
    step: Step,
    draft: DraftBooking,
    history: Vec<(Step, DraftBooking)>,
    slots: SlotCache,
    generation: u64,
    commit: CommitPhase,
    unresolved: Vec<CompleteBooking>,
}

impl BookingFlow {
    pub fn new(
        session: SessionContext,
        catalog: Catalog,
        settings: FlowSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session,
            catalog,
            settings,
            clock,
            step: Step::SelectService,
            draft: DraftBooking::default(),
            history: Vec::new(),
            slots: SlotCache::default(),
            generation: 0,
            commit: CommitPhase::Idle,
            unresolved: Vec::new(),
        }
    }

    /// Fetch the catalog once for this session and start a flow on it.
    pub async fn start(
        session: SessionContext,
        source: &dyn CatalogSource,
        settings: FlowSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FlowError> {
        let services = source.list_services().await?;
        let professionals = source.list_professionals().await?;
        debug!(
            services = services.len(),
            professionals = professionals.len(),
            "catalog loaded for booking session"
        );
        Ok(Self::new(session, Catalog::new(services, professionals), settings, clock))
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &DraftBooking {
        &self.draft
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// True while an earlier commit may or may not have been stored.
    pub fn has_unresolved_commit(&self) -> bool {
        !self.unresolved.is_empty()
    }

    /// Realized path so far, oldest first, excluding the current step.
    pub fn path(&self) -> Vec<Step> {
        self.history.iter().map(|(step, _)| *step).collect()
    }

    pub fn client_kind(&self) -> ClientKind {
        if self.session.is_identified() {
            ClientKind::Identified
        } else {
            ClientKind::Anonymous
        }
    }

    /// Steps shown in the progress bar for this session.
    pub fn planned_steps(&self) -> Vec<Step> {
        planned_path(self.client_kind())
    }

    pub fn offered_dates(&self) -> Vec<NaiveDate> {
        self.settings.hours.offered_dates(self.clock.today())
    }

    /// Slots for the current professional and date, if they have been fetched since the last change.
    pub fn available_slots(&self) -> Option<&[TimeLabel]> {
        match (&self.draft.professional_id, self.draft.date) {
            (Some(pid), Some(date)) if self.slots.is_fresh_for(pid, date) => Some(self.slots.slots()),
            _ => None,
        }
    }

    /// Form values for the client-details step: what the draft holds, else the session profile.
    pub fn client_details_prefill(&self) -> ClientDetailsInput {
        let known = self.session.prefill();
        ClientDetailsInput {
            name: self.draft.client_name.clone().unwrap_or(known.name),
            email: self.draft.client_email.clone().unwrap_or(known.email),
            phone: self.draft.client_phone.clone().unwrap_or(known.phone),
            notes: self.draft.notes.clone(),
        }
    }

    /// Apply deep-link parameters on a fresh flow.
    ///
    /// A known service moves to SelectProfessional; a known service and professional move on
    /// to SelectDate. Unknown ids and a professional without a service are ignored.
    pub fn preselect(&mut self, service_id: Option<&str>, professional_id: Option<&str>) -> Step {
        if self.step != Step::SelectService || !self.history.is_empty() {
            debug!(step = %self.step, "preselection ignored on a flow already in progress");
            return self.step;
        }
        let Some(service_id) = service_id else {
            if professional_id.is_some() {
                debug!(?professional_id, "professional preselection without a service ignored");
            }
            return self.step;
        };
        if let Err(err) = self.select_service(service_id) {
            debug!(service_id, error = %err, "service preselection ignored");
            return self.step;
        }
        if let Some(professional_id) = professional_id {
            if let Err(err) = self.select_professional(professional_id) {
                debug!(professional_id, error = %err, "professional preselection ignored");
            }
        }
        self.step
    }

    pub fn select_service(&mut self, service_id: &str) -> Result<Step, FlowError> {
        self.expect_step(Step::SelectService)?;
        if self.catalog.service(service_id).is_none() {
            return Err(FlowError::UnknownSelection(service_id.to_string()));
        }
        let mut draft = self.draft.clone();
        draft.service_id = Some(service_id.to_string());
        self.advance(FlowEvent::ServiceChosen, draft)
    }

    pub fn select_professional(&mut self, professional_id: &str) -> Result<Step, FlowError> {
        self.expect_step(Step::SelectProfessional)?;
        if !self
            .catalog
            .professional(professional_id)
            .is_some_and(|p| p.active)
        {
            return Err(FlowError::UnknownSelection(professional_id.to_string()));
        }
        let mut draft = self.draft.clone();
        draft.professional_id = Some(professional_id.to_string());
        self.slots.invalidate();
        self.advance(FlowEvent::ProfessionalChosen, draft)
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<Step, FlowError> {
        self.expect_step(Step::SelectDate)?;
        self.settings.hours.check_date(date, self.clock.today())?;
        let mut draft = self.draft.clone();
        draft.date = Some(date);
        self.slots.invalidate();
        self.advance(FlowEvent::DateChosen, draft)
    }

    pub fn begin_availability_fetch(&mut self) -> Result<AvailabilityTicket, FlowError> {
        self.expect_step(Step::SelectTime)?;
        let (Some(professional_id), Some(date)) = (self.draft.professional_id.clone(), self.draft.date)
        else {
            return Err(IncompleteBookingError {
                missing: vec!["professional_id", "date"],
            }
            .into());
        };
        if self.slots.in_flight() == Some(self.generation) {
            return Err(FlowError::Busy);
        }
        self.slots.mark_in_flight(self.generation);
        debug!(%professional_id, %date, generation = self.generation, "availability fetch started");
        Ok(AvailabilityTicket {
            generation: self.generation,
            professional_id,
            date,
        })
    }

    /// Store a fetch result. Returns false when the result was dropped because the flow moved on.
    pub fn apply_availability(
        &mut self,
        ticket: AvailabilityTicket,
        result: Result<Vec<TimeLabel>, TransportError>,
    ) -> Result<bool, FlowError> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping availability for a step the flow has left"
            );
            return Ok(false);
        }
        match result {
            Ok(slots) => {
                debug!(count = slots.len(), "availability applied");
                self.slots.fill(&ticket.professional_id, ticket.date, slots);
                Ok(true)
            }
            Err(err) => {
                error!(error = %err, professional_id = %ticket.professional_id, date = %ticket.date, "availability fetch failed");
                self.slots.clear_in_flight();
                Err(FlowError::Transport(err))
            }
        }
    }

    pub async fn load_availability(
        &mut self,
        source: &dyn AvailabilitySource,
    ) -> Result<Vec<TimeLabel>, FlowError> {
        let ticket = self.begin_availability_fetch()?;
        let result = source
            .available_slots(&ticket.professional_id, ticket.date)
            .await;
        if !self.apply_availability(ticket, result)? {
            return Err(FlowError::Superseded);
        }
        Ok(self.slots.slots().to_vec())
    }

    /// Choose a time from the freshly fetched slot list.
    ///
    /// Identified clients get their profile contact copied in and go straight to Confirm.
    pub fn select_time(&mut self, time: TimeLabel) -> Result<Step, FlowError> {
        self.expect_step(Step::SelectTime)?;
        if self.available_slots().is_none() {
            return Err(FlowError::AvailabilityStale);
        }
        let mut draft = self.draft.clone();
        draft.time = Some(time);
        if let Some(contact) = self.session.identified_contact() {
            draft.set_client(contact);
        }
        self.advance(FlowEvent::TimeChosen, draft)
    }

    pub fn submit_client_details(&mut self, input: ClientDetailsInput) -> Result<Step, FlowError> {
        self.expect_step(Step::SelectClientDetails)?;
        let (contact, notes) = validate_client_details(&input)?;
        let mut draft = self.draft.clone();
        draft.set_client(contact);
        draft.notes = notes;
        self.advance(FlowEvent::DetailsSubmitted, draft)
    }

    /// Return to the previous step of the realized path, restoring the draft as it was there.
    pub fn go_back(&mut self) -> Result<Step, FlowError> {
        if matches!(self.commit, CommitPhase::InFlight(g) if g == self.generation) {
            return Err(FlowError::Busy);
        }
        let Some((step, draft)) = self.history.pop() else {
            return Ok(self.step);
        };
        debug!(from = %self.step, to = %step, "going back");
        self.step = step;
        self.draft = draft;
        self.generation += 1;
        self.commit = CommitPhase::Idle;
        self.slots
            .keep_only(self.draft.professional_id.as_deref(), self.draft.date);
        Ok(self.step)
    }

    /// Abandon the session and start over with an empty draft. Unresolved commits are kept.
    pub fn reset(&mut self) {
        self.step = Step::SelectService;
        self.draft = DraftBooking::default();
        self.history.clear();
        self.slots.invalidate();
        self.generation += 1;
        self.commit = CommitPhase::Idle;
    }

    pub fn begin_commit(&mut self) -> Result<CommitTicket, FlowError> {
        let booking = self.draft.complete(self.session.user_id())?;
        self.expect_step(Step::Confirm)?;
        if matches!(self.commit, CommitPhase::InFlight(g) if g == self.generation) {
            return Err(FlowError::Busy);
        }
        self.commit = CommitPhase::InFlight(self.generation);
        info!(slot = %booking.slot_key(), unresolved = self.unresolved.len(), "commit started");
        Ok(CommitTicket {
            generation: self.generation,
            booking,
            unresolved: self.unresolved.clone(),
        })
    }

    pub fn finish_commit(
        &mut self,
        ticket: CommitTicket,
        result: Result<ConfirmedBooking, CommitError>,
    ) -> Result<Confirmation, FlowError> {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "commit result arrived after the flow moved on"
            );
            return Err(FlowError::Superseded);
        }
        self.commit = CommitPhase::Idle;
        if !matches!(result, Err(CommitError::Transport(_))) {
            // Earlier attempts were all looked up before a definite answer could arrive.
            self.unresolved.clear();
        }
        match result {
            Ok(booking) => {
                info!(booking_id = %booking.id, slot = %booking.slot_key(), "booking committed");
                let summary = BookingSummary::new(&booking, &self.catalog, &self.settings.salon_name);
                let message_link = summary.message_link();
                self.complete_session();
                Ok(Confirmation {
                    booking,
                    summary,
                    message_link,
                })
            }
            Err(CommitError::SlotTaken(key)) => {
                warn!(slot = %key, "slot taken at commit, returning to time selection");
                self.rewind_to(Step::SelectTime);
                Err(FlowError::SlotConflict(key))
            }
            Err(CommitError::Rejected(problems)) => {
                warn!(slot = %ticket.booking.slot_key(), %problems, "booking rejected by the authority");
                Err(FlowError::Validation(problems))
            }
            Err(CommitError::Transport(err)) => {
                error!(error = %err, slot = %ticket.booking.slot_key(), "commit outcome unknown");
                if !self.unresolved.contains(&ticket.booking) {
                    self.unresolved.push(ticket.booking);
                }
                Err(FlowError::Transport(err))
            }
        }
    }

    /// Commit the draft, then send the confirmation email on a best-effort basis.
    pub async fn confirm(
        &mut self,
        coordinator: &dyn ReservationCoordinator,
        notifier: &dyn BookingNotifier,
    ) -> Result<Confirmation, FlowError> {
        let ticket = self.begin_commit()?;
        let outcome = if ticket.unresolved.is_empty() {
            coordinator.commit(&ticket.booking).await
        } else {
            resolve_unknown_outcome(coordinator, &ticket.unresolved, &ticket.booking).await
        };
        let confirmation = self.finish_commit(ticket, outcome)?;
        if let Err(err) = notifier.send_booking_confirmation(&confirmation.summary).await {
            warn!(booking_id = %confirmation.booking.id, error = %err, "confirmation email failed");
        }
        Ok(confirmation)
    }

    fn expect_step(&self, expected: Step) -> Result<(), FlowError> {
        if self.step != expected {
            return Err(FlowError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn advance(&mut self, event: FlowEvent, draft: DraftBooking) -> Result<Step, FlowError> {
        let next = next_step(self.step, event, self.client_kind()).ok_or(FlowError::WrongStep {
            expected: self.step,
            actual: self.step,
        })?;
        debug!(from = %self.step, to = %next, "step advanced");
        let previous = std::mem::replace(&mut self.draft, draft);
        self.history.push((self.step, previous));
        self.step = next;
        self.generation += 1;
        Ok(next)
    }

    fn rewind_to(&mut self, target: Step) {
        if let Some(index) = self.history.iter().rposition(|(step, _)| *step == target) {
            self.history.truncate(index + 1);
            if let Some((step, draft)) = self.history.pop() {
                self.step = step;
                self.draft = draft;
            }
        }
        self.slots.invalidate();
        self.generation += 1;
    }

    fn complete_session(&mut self) {
        let next = next_step(self.step, FlowEvent::Committed, self.client_kind())
            .unwrap_or(Step::SelectService);
        self.step = next;
        self.draft = DraftBooking::default();
        self.history.clear();
        self.slots.invalidate();
        self.generation += 1;
    }
}

/// Resolve earlier commits that may or may not have landed before committing `booking`.
///
/// An earlier attempt found stored is returned as the outcome, whatever the draft now holds.
/// Someone else holding the slot `booking` asks for is a conflict. Otherwise `booking` is
/// committed.
async fn resolve_unknown_outcome(
    coordinator: &dyn ReservationCoordinator,
    unresolved: &[CompleteBooking],
    booking: &CompleteBooking,
) -> Result<ConfirmedBooking, CommitError> {
    let key = booking.slot_key();
    let mut wanted_slot_taken = false;
    for earlier in unresolved {
        let earlier_key = earlier.slot_key();
        match coordinator.find_booking(&earlier_key).await? {
            Some(existing) if is_same_request(&existing, earlier) => {
                info!(booking_id = %existing.id, slot = %earlier_key, "previous commit had landed");
                return Ok(existing);
            }
            Some(_) if earlier_key == key => wanted_slot_taken = true,
            _ => debug!(slot = %earlier_key, "previous commit did not land"),
        }
    }
    if wanted_slot_taken {
        return Err(CommitError::SlotTaken(key));
    }
    coordinator.commit(booking).await
}

fn is_same_request(existing: &ConfirmedBooking, booking: &CompleteBooking) -> bool {
    existing.service_id == booking.service_id
        && existing.client.email.eq_ignore_ascii_case(&booking.client.email)
        && existing.user_id == booking.user_id
}

// Step graph of the booking wizard.
//
// The path is variable length: identified clients skip SelectClientDetails. Every forward
// move is looked up here; nothing else in the flow does step arithmetic.

use crate::core::booking_flow::step::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    ServiceChosen,
    ProfessionalChosen,
    DateChosen,
    TimeChosen,
    DetailsSubmitted,
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Identified,
    Anonymous,
}

// (from, event, client kind or None for any, to)
const TRANSITIONS: &[(Step, FlowEvent, Option<ClientKind>, Step)] = &[
    (Step::SelectService, FlowEvent::ServiceChosen, None, Step::SelectProfessional),
    (Step::SelectProfessional, FlowEvent::ProfessionalChosen, None, Step::SelectDate),
    (Step::SelectDate, FlowEvent::DateChosen, None, Step::SelectTime),
    (Step::SelectTime, FlowEvent::TimeChosen, Some(ClientKind::Identified), Step::Confirm),
    (Step::SelectTime, FlowEvent::TimeChosen, Some(ClientKind::Anonymous), Step::SelectClientDetails),
    (Step::SelectClientDetails, FlowEvent::DetailsSubmitted, None, Step::Confirm),
    (Step::Confirm, FlowEvent::Committed, None, Step::SelectService),
];

pub fn next_step(from: Step, event: FlowEvent, kind: ClientKind) -> Option<Step> {
    TRANSITIONS
        .iter()
        .find(|(f, e, k, _)| *f == from && *e == event && k.is_none_or(|k| k == kind))
        .map(|(_, _, _, to)| *to)
}

/// Steps a client of this kind walks through, SelectService to Confirm.
pub fn planned_path(kind: ClientKind) -> Vec<Step> {
    let mut path = vec![Step::SelectService];
    let mut current = Step::SelectService;
    while current != Step::Confirm {
        let next = TRANSITIONS
            .iter()
            .filter(|(f, e, k, _)| *f == current && *e != FlowEvent::Committed && k.is_none_or(|k| k == kind))
            .map(|(_, _, _, to)| *to)
            .next();
        match next {
            Some(step) => {
                path.push(step);
                current = step;
            }
            None => break,
        }
    }
    path
}

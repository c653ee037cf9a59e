// Post-commit confirmation content: the email summary and the messaging deep link.
//
// Boundaries
// - Builds text only. Delivery goes through the BookingNotifier port and is best effort.

use crate::core::booking::confirmed::ConfirmedBooking;
use crate::core::catalog::Catalog;
use crate::core::slot::TimeLabel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MESSAGE_LINK_BASE: &str = "https://wa.me";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub booking_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub service_name: String,
    pub professional_name: String,
    pub date: NaiveDate,
    pub time: TimeLabel,
    pub salon_name: String,
}

impl BookingSummary {
    /// Names come from the catalog snapshot; unknown ids fall back to the raw id.
    pub fn new(booking: &ConfirmedBooking, catalog: &Catalog, salon_name: &str) -> Self {
        let service_name = catalog
            .service(&booking.service_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| booking.service_id.clone());
        let professional_name = catalog
            .professional(&booking.professional_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| booking.professional_id.clone());
        Self {
            booking_id: booking.id.clone(),
            client_name: booking.client.name.clone(),
            client_email: booking.client.email.clone(),
            client_phone: booking.client.phone.clone(),
            service_name,
            professional_name,
            date: booking.date,
            time: booking.time,
            salon_name: salon_name.to_string(),
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%A, %-d %B %Y").to_string()
    }

    pub fn email_subject(&self) -> String {
        format!("Booking confirmation - {}", self.service_name)
    }

    pub fn email_body(&self) -> String {
        format!(
            "Hello {client},\n\n\
             Your booking is confirmed:\n\n\
             Service: {service}\n\
             Professional: {professional}\n\
             Date: {date}\n\
             Time: {time}\n\
             Booking ID: {id}\n\n\
             We look forward to seeing you at {salon}.\n\n\
             If you need to cancel or change your booking, please contact us.\n",
            client = self.client_name,
            service = self.service_name,
            professional = self.professional_name,
            date = self.formatted_date(),
            time = self.time,
            id = self.booking_id,
            salon = self.salon_name,
        )
    }

    pub fn message_text(&self) -> String {
        format!(
            "Hi {client}, your booking at {salon} is confirmed:\n\n\
             Service: {service}\n\
             Professional: {professional}\n\
             Date: {date}\n\
             Time: {time}\n\n\
             ID: {id}\n\n\
             See you soon!",
            client = self.client_name,
            salon = self.salon_name,
            service = self.service_name,
            professional = self.professional_name,
            date = self.formatted_date(),
            time = self.time,
            id = self.booking_id,
        )
    }

    pub fn message_link(&self) -> Option<String> {
        message_link(&self.client_phone, &self.message_text())
    }
}

/// Deep link that opens a chat with `phone` and `text` prefilled.
///
/// Non-digits are stripped from the phone; `None` when nothing is left.
pub fn message_link(phone: &str, text: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!(
        "{MESSAGE_LINK_BASE}/{digits}?text={}",
        urlencoding::encode(text)
    ))
}

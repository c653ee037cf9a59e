// Email notifier that writes the confirmation to the log instead of sending it.
//
// Stands in for a mail provider; swapping one in only means another BookingNotifier.

use crate::core::notification::BookingSummary;
use crate::core::ports::BookingNotifier;
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct LogEmailNotifier;

#[async_trait]
impl BookingNotifier for LogEmailNotifier {
    async fn send_booking_confirmation(&self, summary: &BookingSummary) -> anyhow::Result<()> {
        info!(
            to = %summary.client_email,
            subject = %summary.email_subject(),
            booking_id = %summary.booking_id,
            body = %summary.email_body(),
            "booking confirmation email"
        );
        Ok(())
    }
}

// Recording notifier for tests: keeps every summary it was asked to send.

use crate::core::notification::BookingSummary;
use crate::core::ports::BookingNotifier;
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryNotifier {
    pub sent: Mutex<Vec<BookingSummary>>,
    is_offline: bool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait]
impl BookingNotifier for InMemoryNotifier {
    async fn send_booking_confirmation(&self, summary: &BookingSummary) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Mail provider offline"));
        }
        self.sent.lock().await.push(summary.clone());
        Ok(())
    }
}

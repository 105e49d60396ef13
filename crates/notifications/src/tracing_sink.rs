//! Notification sink that writes each notification to the tracing pipeline.

use chrono::{DateTime, Utc};

use crate::notification::Notification;
use crate::sink::{NotificationSink, NotifyError};

/// Logs notifications as structured JSON payloads at `info` level.
///
/// This is the default delivery channel when no external transport is wired:
/// log shippers pick the records up from the `stockflow::notifications` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, notification: Notification) -> Result<(), NotifyError> {
        let payload =
            serde_json::to_string(&notification).map_err(|e| NotifyError::Transport(e.to_string()))?;

        tracing::info!(
            target: "stockflow::notifications",
            notification_type = notification.notification_type(),
            product = notification.product_name(),
            %payload,
            "notification sent"
        );
        Ok(())
    }
}

impl NotificationSink for TracingNotificationSink {
    fn send_delay_notification(&self, lead_time_days: u32, product_name: &str) -> Result<(), NotifyError> {
        self.emit(Notification::delay(lead_time_days, product_name))
    }

    fn send_out_of_stock_notification(&self, product_name: &str) -> Result<(), NotifyError> {
        self.emit(Notification::out_of_stock(product_name))
    }

    fn send_expiration_notification(
        &self,
        product_name: &str,
        expiry_date: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        self.emit(Notification::expiration(product_name, expiry_date))
    }
}

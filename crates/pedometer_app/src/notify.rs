//! Goal-achievement notifications.
//!
//! Delivery is best effort: a failing [`Notifier`] never aborts a step
//! update, the failure is reported back as [`NotifyOutcome::Failed`].

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::AppResult;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub timeout: Duration,
}

impl Notification {
    pub fn goal_reached(steps: u64) -> Self {
        Self {
            title: "Goal reached!".to_string(),
            message: format!(
                "You walked {} steps! Daily goal achieved!",
                pedometer_core::activity::format_thousands(steps)
            ),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum NotifyOutcome {
    Delivered,
    Failed(String),
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, notification: &Notification) -> AppResult<()>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        (**self).notify(notification).await
    }
}

/// Writes notifications to the log. Used on desktop where no system
/// notification service is wired up.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        info!(
            title = %notification.title,
            timeout_secs = notification.timeout.as_secs(),
            "{}",
            notification.message
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_message_uses_separators() {
        let n = Notification::goal_reached(10_250);
        assert_eq!(n.message, "You walked 10,250 steps! Daily goal achieved!");
        assert_eq!(n.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn log_notifier_never_fails() {
        assert!(LogNotifier.notify(&Notification::goal_reached(1)).await.is_ok());
    }
}
